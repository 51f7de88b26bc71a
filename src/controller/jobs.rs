use std::panic::{self, AssertUnwindSafe};
use std::sync::{
    Arc,
    mpsc::{Receiver, Sender, TryRecvError},
};
use std::thread;

use crate::classifier::{ClassifyError, GestureClassifier};
use crate::frame::Frame;
use crate::gesture::Gesture;
use crate::schedule::SessionId;

#[derive(Debug)]
pub(crate) struct ClassifyJob {
    pub(crate) session: SessionId,
    pub(crate) frame: Frame,
}

#[derive(Debug)]
pub(crate) struct ClassifyResult {
    pub(crate) session: SessionId,
    pub(crate) outcome: Result<Gesture, ClassifyError>,
}

/// Runs classification off the event loop and hands results back through a channel.
pub(crate) struct ClassifyJobs {
    classifier: Arc<dyn GestureClassifier>,
    message_tx: Sender<ClassifyResult>,
    message_rx: Receiver<ClassifyResult>,
}

impl ClassifyJobs {
    pub(crate) fn new(classifier: Arc<dyn GestureClassifier>) -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            classifier,
            message_tx,
            message_rx,
        }
    }

    pub(crate) fn begin(&self, job: ClassifyJob) {
        let tx = self.message_tx.clone();
        let classifier = Arc::clone(&self.classifier);
        thread::spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| classifier.classify(&job.frame)))
                .unwrap_or_else(|payload| {
                    let reason = panic_reason(payload.as_ref());
                    tracing::error!(session = job.session, "Classifier panicked: {reason}");
                    Err(ClassifyError::Unknown(format!("classifier panicked: {reason}")))
                });
            let _ = tx.send(ClassifyResult {
                session: job.session,
                outcome,
            });
        });
    }

    pub(crate) fn try_recv(&self) -> Option<ClassifyResult> {
        match self.message_rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
