//! Browser hand tracker
//!
//! Thin shim over the TensorFlow.js hand-pose-detection library, which the
//! page loads as a global. Detection runs every ~33 ms and publishes into the
//! hands mailbox; a `DetectionGate` keeps it to one loop at a time.

use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use super::hands::{DetectionGate, HandSender, HandTracker, hands_from_keypoints};
use crate::consts::DETECTION_INTERVAL_MS;
use crate::error::TrackingError;

#[wasm_bindgen(inline_js = "
    let detector = null;

    export async function start_camera(video) {
        const stream = await navigator.mediaDevices.getUserMedia({
            video: { width: 640, height: 480, facingMode: 'user' },
        });
        video.srcObject = stream;
        await new Promise((resolve) => { video.onloadedmetadata = resolve; });
        await video.play();
    }

    export async function load_detector() {
        const model = handPoseDetection.SupportedModels.MediaPipeHands;
        detector = await handPoseDetection.createDetector(model, {
            runtime: 'tfjs',
            modelType: 'lite',
            maxHands: 2,
        });
    }

    export async function estimate_hands(video) {
        if (!detector) { throw new Error('detector not loaded'); }
        const hands = await detector.estimateHands(video);
        return hands.map((h) => Float32Array.from(h.keypoints.flatMap((k) => [k.x, k.y])));
    }
")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn start_camera(video: &HtmlVideoElement) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn load_detector() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn estimate_hands(video: &HtmlVideoElement) -> Result<JsValue, JsValue>;
}

/// State shared with the running detection loop
struct DetectionLoop {
    video: HtmlVideoElement,
    sender: HandSender,
    canvas_size: Vec2,
    gate: DetectionGate,
}

/// Webcam + pose model tracker
pub struct WebHandTracker {
    video: HtmlVideoElement,
    canvas_size: Vec2,
    running: Option<Rc<DetectionLoop>>,
}

impl WebHandTracker {
    pub fn new(video: HtmlVideoElement, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            video,
            canvas_size: Vec2::new(canvas_width, canvas_height),
            running: None,
        }
    }
}

impl HandTracker for WebHandTracker {
    async fn initialize(&mut self, sender: HandSender) -> Result<(), TrackingError> {
        start_camera(&self.video)
            .await
            .map_err(|e| TrackingError::CameraUnavailable(format!("{:?}", e)))?;
        load_detector()
            .await
            .map_err(|e| TrackingError::ModelLoad(format!("{:?}", e)))?;

        self.running = Some(Rc::new(DetectionLoop {
            video: self.video.clone(),
            sender,
            canvas_size: self.canvas_size,
            gate: DetectionGate::new(),
        }));
        log::info!("Hand tracking initialized successfully");
        Ok(())
    }

    fn start_detection(&mut self) {
        let Some(detection) = &self.running else {
            log::error!("{}", TrackingError::NotInitialized);
            return;
        };
        if let Some(generation) = detection.gate.start() {
            detect_step(Rc::clone(detection), generation);
        }
    }

    fn stop_detection(&mut self) {
        if let Some(detection) = &self.running {
            detection.gate.stop();
        }
    }
}

/// Run one detection, publish it, and schedule the next
fn detect_step(detection: Rc<DetectionLoop>, generation: u32) {
    if !detection.gate.is_current(generation) {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        let result = detect_once(&detection).await;
        // Stopped or restarted while the model was busy
        if !detection.gate.is_current(generation) {
            return;
        }
        detection.sender.deliver(result);
        schedule_next(detection, generation);
    });
}

async fn detect_once(detection: &DetectionLoop) -> Result<Vec<crate::sim::Hand>, TrackingError> {
    let value = estimate_hands(&detection.video)
        .await
        .map_err(|e| TrackingError::Detection(format!("{:?}", e)))?;
    let array: js_sys::Array = value
        .dyn_into()
        .map_err(|_| TrackingError::Detection("unexpected detector output".into()))?;
    let raw: Vec<Vec<f32>> = array
        .iter()
        .map(|hand| js_sys::Float32Array::new(&hand).to_vec())
        .collect();

    let video_size = Vec2::new(
        detection.video.video_width() as f32,
        detection.video.video_height() as f32,
    );
    Ok(hands_from_keypoints(&raw, video_size, detection.canvas_size))
}

fn schedule_next(detection: Rc<DetectionLoop>, generation: u32) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move || detect_step(detection, generation));
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        DETECTION_INTERVAL_MS,
    );
    closure.forget();
}
