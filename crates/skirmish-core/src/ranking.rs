//! Stable merge sort and target importance ranking.
//!
//! [`merge_sort_by`] is a plain top-down merge sort over an owned `Vec`,
//! parameterized by a three-way comparison closure and a [`SortOrder`]. Both
//! orders are stable: equal elements keep their input order.
//!
//! [`rank_by_importance`] uses it to order perceived entities by how much the
//! agent wants to go after them.
//!
//! # Example
//!
//! ```
//! use skirmish_core::ranking::{merge_sort_by, SortOrder};
//!
//! let words = vec!["bb", "a", "cc", "d"];
//! let sorted = merge_sort_by(words, SortOrder::Descending, |a, b| a.len().cmp(&b.len()));
//! assert_eq!(sorted, vec!["bb", "cc", "a", "d"]);
//! ```

use std::cmp::Ordering;

use planar::Vector2;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Distance under which an entity earns a proximity bonus.
pub const PROXIMITY_RANGE: f64 = 200.0;

/// Divisor applied to the proximity bonus.
pub const PROXIMITY_DIVISOR: f64 = 10.0;

// =============================================================================
// Merge Sort
// =============================================================================

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortOrder {
    /// Whether the left element goes first given `left.cmp(right)`.
    ///
    /// Equal elements always keep the left one first.
    #[must_use]
    pub const fn keeps_left(self, ordering: Ordering) -> bool {
        match self {
            SortOrder::Ascending => !matches!(ordering, Ordering::Greater),
            SortOrder::Descending => !matches!(ordering, Ordering::Less),
        }
    }
}

/// Sorts `items` with a stable merge sort.
///
/// # Arguments
///
/// * `items` - Elements to sort, consumed
/// * `order` - Ascending or descending
/// * `compare` - Three-way comparison between two elements
///
/// # Returns
///
/// A permutation of `items` sorted according to `order`.
pub fn merge_sort_by<T, F>(items: Vec<T>, order: SortOrder, mut compare: F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    sort_recursive(items, order, &mut compare)
}

/// Sorts `items` by their natural ordering.
pub fn merge_sort<T: Ord>(items: Vec<T>, order: SortOrder) -> Vec<T> {
    merge_sort_by(items, order, Ord::cmp)
}

fn sort_recursive<T, F>(mut items: Vec<T>, order: SortOrder, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = sort_recursive(items, order, compare);
    let right = sort_recursive(right, order, compare);
    merge(left, right, order, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, order: SortOrder, compare: &mut F) -> Vec<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => order.keeps_left(compare(l, r)),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}

// =============================================================================
// Importance
// =============================================================================

/// Importance of `entity` to a player centred at `player_center`.
///
/// Tag base score plus `max(200 - distance, 0) / 10`, where distance is the
/// rounded distance between centers.
#[must_use]
pub fn importance(entity: &Entity, player_center: Vector2) -> f64 {
    let distance = player_center.distance_to(entity.center());
    let proximity = (PROXIMITY_RANGE - distance).max(0.0) / PROXIMITY_DIVISOR;
    entity.tag.base_score() + proximity
}

/// An entity paired with its importance score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a> {
    /// The scored entity
    pub entity: &'a Entity,
    /// Its importance
    pub score: f64,
}

/// Scores every entity and sorts them most important first.
///
/// Entities with equal scores keep their order in `entities`.
#[must_use]
pub fn rank_by_importance(entities: &[Entity], player_center: Vector2) -> Vec<Ranked<'_>> {
    let scored: Vec<Ranked<'_>> = entities
        .iter()
        .map(|entity| Ranked {
            entity,
            score: importance(entity, player_center),
        })
        .collect();
    merge_sort_by(scored, SortOrder::Descending, |a, b| a.score.total_cmp(&b.score))
}
