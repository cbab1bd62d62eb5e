//! Platform abstraction layer
//!
//! Handles the browser-side collaborators:
//! - Hand tracking (webcam + pose detection model)
//! - The single-slot "latest hands" mailbox between tracker and game loop
//! - Mapping detector keypoints into mirrored canvas space

pub mod hands;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use hands::{
    DetectionGate, HandReceiver, HandSender, HandTracker, hand_center, hand_channel,
    hands_from_keypoints, to_canvas,
};
#[cfg(target_arch = "wasm32")]
pub use web::WebHandTracker;
