use criterion::{black_box, criterion_group, criterion_main, Criterion};
use planar::{BBox, Extent, Vector2};
use skirmish_core::entity::{Entity, EntityTag};
use skirmish_core::ranking::{merge_sort, rank_by_importance, SortOrder};
use skirmish_core::steering::ObstacleAvoidance;
use skirmish_core::world::World;

/// A crowded arena: shapes on a grid around the player.
fn crowded_world(count: usize) -> World {
    let mut world = World::new(Extent::new(800.0, 400.0));
    let entities = (0..count)
        .map(|i| {
            let tag = EntityTag::ALL[i % EntityTag::ALL.len()];
            #[allow(clippy::cast_precision_loss)]
            let (x, y) = ((i % 20) as f64 * 40.0, (i / 20) as f64 * 40.0);
            Entity::new(tag, BBox::new(x, y, 12.0, 12.0))
        })
        .collect();
    world.set_entities(entities);
    world
}

fn bench_rank_by_importance(c: &mut Criterion) {
    let world = crowded_world(200);
    let player = world.player_center();

    c.bench_function("rank_by_importance_200", |b| {
        b.iter(|| black_box(rank_by_importance(world.entities(), black_box(player))))
    });
}

fn bench_merge_sort(c: &mut Criterion) {
    // Pseudo-random but fixed input
    let input: Vec<u32> = (0..1000u32).map(|i| i.wrapping_mul(2_654_435_761) % 997).collect();

    c.bench_function("merge_sort_1000", |b| {
        b.iter(|| black_box(merge_sort(black_box(input.clone()), SortOrder::Descending)))
    });
}

fn bench_steer(c: &mut Criterion) {
    // Player sits in the middle of the grid so both sensing circles see shapes
    let world = crowded_world(200);
    let avoidance = ObstacleAvoidance::default();

    c.bench_function("steer_crowded", |b| {
        b.iter(|| black_box(avoidance.steer(black_box(Vector2::new(1.0, 0.3)), &world)))
    });
}

criterion_group!(benches, bench_rank_by_importance, bench_merge_sort, bench_steer);
criterion_main!(benches);
