//! Hand tracking collaborator and the hands mailbox
//!
//! The tracker runs on its own cadence (~30 Hz) and overwrites the mailbox
//! with each detection. The game loop takes whatever is there once per tick.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use glam::Vec2;

use crate::consts::MAX_HANDS;
use crate::error::TrackingError;
use crate::sim::Hand;

/// MediaPipe landmark indices for the wrist and the four knuckles (MCP joints)
const PALM_LANDMARKS: [usize; 5] = [0, 5, 9, 13, 17];
const LANDMARK_COUNT: usize = 21;

/// External hand tracker (camera + pose model)
pub trait HandTracker {
    /// Request the camera and load the model. Detections go to `sender`.
    fn initialize(&mut self, sender: HandSender)
    -> impl Future<Output = Result<(), TrackingError>>;

    fn start_detection(&mut self);

    fn stop_detection(&mut self);
}

type Slot = Rc<RefCell<Option<Vec<Hand>>>>;

/// Create a connected sender/receiver pair sharing one slot
pub fn hand_channel() -> (HandSender, HandReceiver) {
    let slot: Slot = Rc::new(RefCell::new(None));
    (
        HandSender {
            slot: Rc::clone(&slot),
        },
        HandReceiver { slot },
    )
}

/// Tracker side of the mailbox
#[derive(Debug, Clone)]
pub struct HandSender {
    slot: Slot,
}

impl HandSender {
    /// Replace whatever detection is waiting with this one
    pub fn publish(&self, mut hands: Vec<Hand>) {
        hands.truncate(MAX_HANDS);
        *self.slot.borrow_mut() = Some(hands);
    }

    /// Publish a detection result; a failed frame is skipped and logged
    pub fn deliver(&self, result: Result<Vec<Hand>, TrackingError>) {
        match result {
            Ok(hands) => self.publish(hands),
            Err(e) => log::warn!("Error detecting hands: {}", e),
        }
    }
}

/// Game loop side of the mailbox
#[derive(Debug)]
pub struct HandReceiver {
    slot: Slot,
}

impl HandReceiver {
    /// Take the latest detection, if a new one arrived
    pub fn take(&self) -> Option<Vec<Hand>> {
        self.slot.borrow_mut().take()
    }

    /// Drop any pending detection
    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

/// Run/stop switch for a polling detection loop
///
/// Each `start` hands out a fresh generation. A pending step from an earlier
/// generation sees `is_current` turn false and exits, so a quick stop/start
/// never leaves two loops alive.
#[derive(Debug, Default)]
pub struct DetectionGate {
    running: Cell<bool>,
    generation: Cell<u32>,
}

impl DetectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new loop; `None` when one is already running
    pub fn start(&self) -> Option<u32> {
        if self.running.replace(true) {
            return None;
        }
        Some(self.bump())
    }

    /// Stop the current loop, invalidating any pending step
    pub fn stop(&self) {
        self.running.set(false);
        self.bump();
    }

    /// Whether a step from `generation` should keep going
    pub fn is_current(&self, generation: u32) -> bool {
        self.running.get() && self.generation.get() == generation
    }

    fn bump(&self) -> u32 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }
}

/// Palm center from detector keypoints
///
/// With a full 21-point hand the wrist and knuckles are averaged; otherwise all
/// points are. Returns `None` for an empty set.
pub fn hand_center(keypoints: &[Vec2]) -> Option<Vec2> {
    if keypoints.is_empty() {
        return None;
    }
    if keypoints.len() == LANDMARK_COUNT {
        let sum: Vec2 = PALM_LANDMARKS.iter().map(|&i| keypoints[i]).sum();
        return Some(sum / PALM_LANDMARKS.len() as f32);
    }
    let sum: Vec2 = keypoints.iter().copied().sum();
    Some(sum / keypoints.len() as f32)
}

/// Scale a video-space point to canvas space, mirrored horizontally
///
/// The video is shown flipped, so a hand on the player's right appears on the
/// right of the canvas.
pub fn to_canvas(point: Vec2, video_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let scale = canvas_size / video_size.max(Vec2::ONE);
    Vec2::new(canvas_size.x - point.x * scale.x, point.y * scale.y)
}

/// Convert raw detections (flattened x,y pairs per hand) into canvas hands
pub fn hands_from_keypoints(raw: &[Vec<f32>], video_size: Vec2, canvas_size: Vec2) -> Vec<Hand> {
    raw.iter()
        .filter_map(|flat| {
            let points: Vec<Vec2> = flat
                .chunks_exact(2)
                .map(|xy| Vec2::new(xy[0], xy[1]))
                .collect();
            hand_center(&points)
        })
        .take(MAX_HANDS)
        .map(|center| {
            let pos = to_canvas(center, video_size, canvas_size);
            Hand::new(pos.x, pos.y)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_keeps_latest_only() {
        let (tx, rx) = hand_channel();
        assert_eq!(rx.take(), None);

        tx.publish(vec![Hand::new(1.0, 1.0)]);
        tx.publish(vec![Hand::new(2.0, 2.0), Hand::new(3.0, 3.0)]);
        assert_eq!(
            rx.take(),
            Some(vec![Hand::new(2.0, 2.0), Hand::new(3.0, 3.0)])
        );
        // Consumed once
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_publish_truncates_to_two_hands() {
        let (tx, rx) = hand_channel();
        tx.publish(vec![Hand::new(1.0, 1.0); 4]);
        assert_eq!(rx.take().map(|h| h.len()), Some(MAX_HANDS));
    }

    #[test]
    fn test_failed_detection_is_skipped() {
        let (tx, rx) = hand_channel();
        tx.deliver(Ok(vec![Hand::new(5.0, 5.0)]));
        tx.deliver(Err(TrackingError::Detection("model busy".into())));
        assert_eq!(rx.take(), Some(vec![Hand::new(5.0, 5.0)]));

        tx.deliver(Err(TrackingError::Detection("model busy".into())));
        assert_eq!(rx.take(), None);
    }

    #[test]
    fn test_empty_detection_is_delivered() {
        let (tx, rx) = hand_channel();
        tx.deliver(Ok(Vec::new()));
        assert_eq!(rx.take(), Some(Vec::new()));
    }

    #[test]
    fn test_gate_single_loop() {
        let gate = DetectionGate::new();
        let first = gate.start().unwrap();
        assert!(gate.is_current(first));
        // Already running: no second loop
        assert_eq!(gate.start(), None);
        assert!(gate.is_current(first));
    }

    #[test]
    fn test_gate_restart_retires_pending_step() {
        let gate = DetectionGate::new();
        let first = gate.start().unwrap();

        // Hidden then shown again before the first loop's timer fires
        gate.stop();
        assert!(!gate.is_current(first));
        let second = gate.start().unwrap();

        assert!(!gate.is_current(first));
        assert!(gate.is_current(second));
    }

    #[test]
    fn test_gate_stop_ends_loop() {
        let gate = DetectionGate::new();
        let generation = gate.start().unwrap();
        gate.stop();
        assert!(!gate.is_current(generation));
        // Stopping twice is harmless
        gate.stop();
        assert!(gate.start().is_some());
    }

    #[test]
    fn test_hand_center_full_landmarks() {
        let mut points = vec![Vec2::new(1000.0, 1000.0); LANDMARK_COUNT];
        for &i in &PALM_LANDMARKS {
            points[i] = Vec2::new(10.0 * i as f32, 20.0);
        }
        let center = hand_center(&points).unwrap();
        // mean of 0, 50, 90, 130, 170
        assert!((center.x - 88.0).abs() < 1e-4);
        assert!((center.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_hand_center_partial() {
        let points = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0)];
        assert_eq!(hand_center(&points), Some(Vec2::new(5.0, 10.0)));
        assert_eq!(hand_center(&[]), None);
    }

    #[test]
    fn test_to_canvas_mirrors_and_scales() {
        let video = Vec2::new(320.0, 240.0);
        let canvas = Vec2::new(640.0, 480.0);
        assert_eq!(to_canvas(Vec2::new(0.0, 0.0), video, canvas), Vec2::new(640.0, 0.0));
        assert_eq!(
            to_canvas(Vec2::new(80.0, 60.0), video, canvas),
            Vec2::new(480.0, 120.0)
        );
    }

    #[test]
    fn test_hands_from_keypoints() {
        let raw = vec![
            vec![100.0, 100.0, 120.0, 140.0],
            Vec::new(),
            vec![600.0, 400.0],
            vec![1.0, 1.0],
        ];
        let hands = hands_from_keypoints(&raw, Vec2::new(640.0, 480.0), Vec2::new(640.0, 480.0));
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0], Hand::new(530.0, 120.0));
        assert_eq!(hands[1], Hand::new(40.0, 400.0));
    }
}
