use std::collections::VecDeque;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use gesture_commander::frame::AcquisitionError;
use gesture_commander::{CameraFeed, ClassifyError, Frame, Gesture, GestureClassifier};

/// Replays queued outcomes; answers `Unknown` once the queue is empty.
#[derive(Default)]
pub struct ScriptedClassifier {
    outcomes: Mutex<VecDeque<Result<Gesture, ClassifyError>>>,
    calls: Mutex<Vec<Frame>>,
}

impl ScriptedClassifier {
    pub fn new(outcomes: impl IntoIterator<Item = Result<Gesture, ClassifyError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl GestureClassifier for ScriptedClassifier {
    fn classify(&self, frame: &Frame) -> Result<Gesture, ClassifyError> {
        self.calls.lock().unwrap().push(frame.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Gesture::Unknown))
    }
}

/// Camera whose on/off flag stays observable after it is boxed.
pub struct FakeCamera {
    active: Arc<AtomicBool>,
}

impl FakeCamera {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let active = Arc::new(AtomicBool::new(false));
        (
            Self {
                active: Arc::clone(&active),
            },
            active,
        )
    }
}

impl CameraFeed for FakeCamera {
    fn start(&mut self) -> Result<(), AcquisitionError> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, AcquisitionError> {
        Ok(Frame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xDB]))
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
