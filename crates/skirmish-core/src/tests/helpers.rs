//! Scripted capabilities for driving the pipeline in tests.
//!
//! The detector sees a shared "scene" of entities in frame coordinates and
//! honours crops, origins, exclusions and limits the way a real detector
//! must. Trackers follow a per-role script. Both are shared through
//! `Rc<RefCell<..>>` so tests can change the scene between frames and
//! inspect what the pipeline asked for.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use planar::{BBox, Extent, Vector2};

use crate::actuator::Actuator;
use crate::agent::Agent;
use crate::behavior::Command;
use crate::config::AgentConfig;
use crate::entity::{Entity, EntityTag};
use crate::error::{Result, SkirmishError};
use crate::perception::{DetectRequest, Detector, Frame, FrameSource, Tracker, TrackerFactory, TrackerRole};

// =============================================================================
// Frames
// =============================================================================

/// A frame that only knows which part of the capture it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestFrame {
    /// Size of this (possibly cropped) frame
    pub size: Extent,
    /// Position of this frame's top-left in capture coordinates
    pub offset: Vector2,
}

impl TestFrame {
    /// Full capture frame.
    pub fn capture(width: f64, height: f64) -> Self {
        Self {
            size: Extent::new(width, height),
            offset: Vector2::ZERO,
        }
    }

    /// Region of the capture this frame shows.
    pub fn visible(&self) -> BBox {
        BBox::new(self.offset.x(), self.offset.y(), self.size.width, self.size.height)
    }
}

impl Frame for TestFrame {
    fn size(&self) -> Extent {
        self.size
    }

    fn crop(&self, region: &BBox) -> Self {
        Self {
            size: region.extent(),
            offset: self.offset + region.origin(),
        }
    }
}

/// Default 800x400 capture frame.
pub fn capture_frame() -> TestFrame {
    TestFrame::capture(800.0, 400.0)
}

// =============================================================================
// Detector
// =============================================================================

/// What the scripted detector can see and what it was asked.
#[derive(Debug, Default)]
pub struct DetectorScript {
    /// Entities present, in capture coordinates
    pub scene: Vec<Entity>,
    /// Fail every call
    pub fail: bool,
    /// Every request received
    pub requests: Vec<DetectRequest>,
    /// Visible region of every frame received
    pub regions: Vec<BBox>,
}

impl DetectorScript {
    /// Requests that were full-frame detections.
    pub fn full_frame_requests(&self) -> usize {
        self.requests.iter().filter(|r| r.limit.is_none()).count()
    }
}

/// Detector reading from a shared [`DetectorScript`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector(pub Rc<RefCell<DetectorScript>>);

impl Detector<TestFrame> for ScriptedDetector {
    fn detect(&mut self, frame: &TestFrame, request: &DetectRequest) -> Result<Vec<Entity>> {
        let mut script = self.0.borrow_mut();
        if script.fail {
            return Err(SkirmishError::Detector("scripted failure".to_string()));
        }
        script.requests.push(*request);
        let visible = frame.visible();
        script.regions.push(visible);

        let mut found = Vec::new();
        for entity in &script.scene {
            if !entity.bbox.overlaps(&visible) {
                continue;
            }
            // frame-local box, then shifted by the requested origin
            let local = entity.bbox.translated(-frame.offset);
            let bbox = local.translated(request.origin);
            if request.excludes(&bbox) {
                continue;
            }
            found.push(Entity::new(entity.tag, bbox));
            if request.is_satisfied(found.len()) {
                break;
            }
        }
        Ok(found)
    }
}

// =============================================================================
// Trackers
// =============================================================================

/// How scripted trackers of one role behave.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrackerMode {
    /// Report the initial box forever
    #[default]
    Hold,
    /// Always lose the target
    Fail,
    /// Move the box by a fixed offset every frame
    Drift(Vector2),
}

/// Shared tracker behaviour and a log of what was created.
#[derive(Debug, Default)]
pub struct TrackerScript {
    /// Mode for player trackers
    pub player: TrackerMode,
    /// Mode for entity trackers
    pub entity: TrackerMode,
    /// Roles of every tracker created
    pub created: Vec<TrackerRole>,
    /// Every `init` call
    pub inits: Vec<(TrackerRole, BBox)>,
}

impl TrackerScript {
    fn mode(&self, role: TrackerRole) -> TrackerMode {
        match role {
            TrackerRole::Player => self.player,
            TrackerRole::Entity => self.entity,
        }
    }
}

/// Tracker following its role's [`TrackerMode`].
#[derive(Debug)]
pub struct ScriptedTracker {
    role: TrackerRole,
    script: Rc<RefCell<TrackerScript>>,
    bbox: Option<BBox>,
}

impl Tracker<TestFrame> for ScriptedTracker {
    fn init(&mut self, _frame: &TestFrame, bbox: BBox) {
        self.script.borrow_mut().inits.push((self.role, bbox));
        self.bbox = Some(bbox);
    }

    fn update(&mut self, _frame: &TestFrame) -> Option<BBox> {
        let mode = self.script.borrow().mode(self.role);
        match mode {
            TrackerMode::Hold => self.bbox,
            TrackerMode::Fail => None,
            TrackerMode::Drift(step) => {
                let moved = self.bbox?.translated(step);
                self.bbox = Some(moved);
                Some(moved)
            }
        }
    }
}

/// Factory handing out [`ScriptedTracker`]s.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTrackerFactory(pub Rc<RefCell<TrackerScript>>);

impl TrackerFactory<TestFrame> for ScriptedTrackerFactory {
    fn create(&mut self, role: TrackerRole) -> Box<dyn Tracker<TestFrame>> {
        self.0.borrow_mut().created.push(role);
        Box::new(ScriptedTracker {
            role,
            script: Rc::clone(&self.0),
            bbox: None,
        })
    }
}

// =============================================================================
// Source and Actuator
// =============================================================================

/// Frame source replaying a fixed list; exhausted means no frame.
#[derive(Debug, Default)]
pub struct VecSource {
    /// Frames still to deliver
    pub frames: VecDeque<Option<TestFrame>>,
    /// Fail the next acquire
    pub fail: bool,
}

impl VecSource {
    /// Source delivering `count` full capture frames.
    pub fn repeat(count: usize) -> Self {
        Self {
            frames: std::iter::repeat(Some(capture_frame())).take(count).collect(),
            fail: false,
        }
    }
}

impl FrameSource<TestFrame> for VecSource {
    fn acquire(&mut self) -> Result<Option<TestFrame>> {
        if self.fail {
            return Err(SkirmishError::FrameSource("scripted failure".to_string()));
        }
        Ok(self.frames.pop_front().flatten())
    }
}

/// Actuator recording every call as a [`Command`].
#[derive(Debug, Default)]
pub struct RecordingActuator {
    /// Calls in order
    pub commands: Vec<Command>,
    /// Fail every call
    pub fail: bool,
}

impl Actuator for RecordingActuator {
    fn move_towards(&mut self, direction: Vector2) -> Result<()> {
        if self.fail {
            return Err(SkirmishError::Actuator("scripted failure".to_string()));
        }
        self.commands.push(Command::Move { direction });
        Ok(())
    }

    fn shoot(&mut self, target: Vector2) -> Result<()> {
        if self.fail {
            return Err(SkirmishError::Actuator("scripted failure".to_string()));
        }
        self.commands.push(Command::Shoot { target });
        Ok(())
    }
}

// =============================================================================
// Factories
// =============================================================================

/// A 10x10 entity of `tag` with its top-left at `(x, y)`.
pub fn shape_at(tag: EntityTag, x: f64, y: f64) -> Entity {
    Entity::new(tag, BBox::new(x, y, 10.0, 10.0))
}

/// A 10x10 square with its top-left at `(x, y)`.
pub fn square_at(x: f64, y: f64) -> Entity {
    shape_at(EntityTag::Square, x, y)
}

/// Handles to the shared scripts behind an agent.
#[derive(Debug, Clone, Default)]
pub struct Scripts {
    /// Detector scene and request log
    pub detector: Rc<RefCell<DetectorScript>>,
    /// Tracker modes and creation log
    pub trackers: Rc<RefCell<TrackerScript>>,
}

impl Scripts {
    /// Scripts with the given scene and tracker modes.
    pub fn new(scene: Vec<Entity>, player: TrackerMode, entity: TrackerMode) -> Self {
        let scripts = Self::default();
        scripts.detector.borrow_mut().scene = scene;
        {
            let mut trackers = scripts.trackers.borrow_mut();
            trackers.player = player;
            trackers.entity = entity;
        }
        scripts
    }

    /// Boxed detector reading these scripts.
    pub fn detector(&self) -> Box<dyn Detector<TestFrame>> {
        Box::new(ScriptedDetector(Rc::clone(&self.detector)))
    }

    /// Boxed tracker factory reading these scripts.
    pub fn trackers(&self) -> Box<dyn TrackerFactory<TestFrame>> {
        Box::new(ScriptedTrackerFactory(Rc::clone(&self.trackers)))
    }

    /// Replace the detector scene.
    pub fn set_scene(&self, scene: Vec<Entity>) {
        self.detector.borrow_mut().scene = scene;
    }
}

/// An agent over `scripts`, with the player selected at `view_center`.
pub fn scripted_agent(config: AgentConfig, scripts: &Scripts, view_center: Vector2) -> Agent<TestFrame> {
    let mut agent = Agent::new(config, scripts.detector(), scripts.trackers()).unwrap();
    agent.initialize(&capture_frame(), view_center);
    agent
}

// =============================================================================
// Tests for helpers
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_tracks_offset() {
        let crop = capture_frame()
            .crop(&BBox::new(100.0, 50.0, 40.0, 30.0))
            .crop(&BBox::new(10.0, 10.0, 5.0, 5.0));
        assert_eq!(crop.offset, Vector2::new(110.0, 60.0));
        assert_eq!(crop.size, Extent::new(5.0, 5.0));
    }

    #[test]
    fn detector_maps_crop_back_to_capture() {
        let scripts = Scripts::new(vec![square_at(120.0, 70.0)], TrackerMode::Hold, TrackerMode::Hold);
        let mut detector = ScriptedDetector(Rc::clone(&scripts.detector));
        let region = BBox::new(100.0, 50.0, 60.0, 60.0);
        let crop = capture_frame().crop(&region);
        let found = detector
            .detect(&crop, &DetectRequest::single_at(region.origin()))
            .unwrap();
        assert_eq!(found, vec![square_at(120.0, 70.0)]);
    }

    #[test]
    fn detector_honours_exclusion_and_limit() {
        let scripts = Scripts::new(
            vec![square_at(0.0, 0.0), square_at(100.0, 0.0), square_at(200.0, 0.0)],
            TrackerMode::Hold,
            TrackerMode::Hold,
        );
        let mut detector = ScriptedDetector(Rc::clone(&scripts.detector));
        let request = DetectRequest {
            limit: Some(1),
            origin: Vector2::ZERO,
            exclude: Some(BBox::new(0.0, 0.0, 5.0, 5.0)),
        };
        let found = detector.detect(&capture_frame(), &request).unwrap();
        assert_eq!(found, vec![square_at(100.0, 0.0)]);
    }

    #[test]
    fn drift_tracker_moves() {
        let script = Rc::new(RefCell::new(TrackerScript {
            entity: TrackerMode::Drift(Vector2::new(1.0, 0.0)),
            ..TrackerScript::default()
        }));
        let mut factory = ScriptedTrackerFactory(Rc::clone(&script));
        let mut tracker = factory.create(TrackerRole::Entity);
        let frame = capture_frame();
        assert_eq!(tracker.update(&frame), None);
        tracker.init(&frame, BBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(tracker.update(&frame), Some(BBox::new(1.0, 0.0, 1.0, 1.0)));
        assert_eq!(tracker.update(&frame), Some(BBox::new(2.0, 0.0, 1.0, 1.0)));
    }
}
