//! Recognition orchestrator: capture, classify, act, cool down.
//!
//! The controller is driven by the host's event loop. User intents call into
//! it directly; `tick` is called once per frame to collect classifier results,
//! run due action-phase steps and advance the cooldown. All state lives here,
//! so no locking is involved: the only work off the loop thread is the
//! classifier call itself.

mod input;
mod jobs;
mod session;

pub use session::{ActionStage, InputMode, Phase, RecognitionRejected, SessionView};

use std::sync::Arc;
use std::time::Instant;

use jobs::{ClassifyJob, ClassifyJobs, ClassifyResult};
use session::{ActionTask, failure_message};

use crate::classifier::{ClassifyError, GestureClassifier};
use crate::command_log::CommandLog;
use crate::config::{CommanderConfig, TimingSettings};
use crate::cooldown::{CooldownEvent, CooldownTimer};
use crate::device::{ActionDispatcher, DeviceState};
use crate::frame::{CameraFeed, Frame};
use crate::gesture::Gesture;
use crate::schedule::{SessionId, TaskSchedule};

const ACTION_FINISHED_MESSAGE: &str = "Action finished.";

pub struct RecognitionController {
    timing: TimingSettings,
    jobs: ClassifyJobs,
    camera: Option<Box<dyn CameraFeed>>,
    input_mode: InputMode,
    uploaded: Option<Frame>,
    phase: Phase,
    last_error: Option<String>,
    last_gesture: Option<Gesture>,
    dispatcher: ActionDispatcher,
    log: CommandLog,
    cooldown: CooldownTimer,
    schedule: TaskSchedule<ActionTask>,
    next_session: SessionId,
}

impl RecognitionController {
    pub fn new(
        config: &CommanderConfig,
        classifier: Arc<dyn GestureClassifier>,
        camera: Option<Box<dyn CameraFeed>>,
    ) -> Self {
        Self {
            timing: config.timing.clone(),
            jobs: ClassifyJobs::new(classifier),
            camera,
            input_mode: InputMode::default(),
            uploaded: None,
            phase: Phase::Idle,
            last_error: None,
            last_gesture: None,
            dispatcher: ActionDispatcher::default(),
            log: CommandLog::with_capacity(config.log_capacity),
            cooldown: CooldownTimer::new(),
            schedule: TaskSchedule::new(),
            next_session: 1,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn device_state(&self) -> DeviceState {
        self.dispatcher.state()
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.log
    }

    pub fn cooldown(&self) -> &CooldownTimer {
        &self.cooldown
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            loading: matches!(self.phase, Phase::Requesting { .. }),
            performing_action: matches!(self.phase, Phase::ActionInProgress { .. }),
            on_cooldown: self.cooldown.is_blocking(),
            cooldown_remaining: self.cooldown.remaining_seconds(),
            error: self.last_error.clone(),
            last_gesture: self.last_gesture,
            bulb_on: self.dispatcher.state().bulb_on,
            camera_on: self.camera_active(),
            input_mode: self.input_mode,
            has_frame: self.frame_available(),
            log: self.log.entries().map(|entry| entry.display_line()).collect(),
        }
    }

    /// Start a recognition cycle if nothing is in flight and no cooldown runs.
    ///
    /// A refused request leaves the phase untouched. Acquisition failures are
    /// shown to the user but do not start a cooldown.
    pub fn request_recognition(&mut self) -> Result<SessionId, RecognitionRejected> {
        match self.phase {
            Phase::Requesting { .. } => return Err(self.reject(RecognitionRejected::Busy)),
            Phase::ActionInProgress { .. } => {
                return Err(self.reject(RecognitionRejected::PerformingAction));
            }
            Phase::Idle | Phase::Error => {}
        }
        if self.cooldown.is_blocking() {
            return Err(self.reject(RecognitionRejected::OnCooldown {
                remaining_seconds: self.cooldown.remaining_seconds(),
            }));
        }
        let frame = match self.capture_frame() {
            Ok(frame) => frame,
            Err(RecognitionRejected::Acquisition(err)) => {
                tracing::warn!("Frame capture failed: {err}");
                self.last_error = Some(err.to_string());
                return Err(RecognitionRejected::Acquisition(err));
            }
            Err(other) => return Err(self.reject(other)),
        };

        let session = self.next_session;
        self.next_session += 1;
        self.phase = Phase::Requesting { session };
        self.last_error = None;
        self.last_gesture = None;
        tracing::info!(session, bytes = frame.bytes.len(), "Recognition requested");
        self.jobs.begin(ClassifyJob { session, frame });
        Ok(session)
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Collect classifier results, run due action steps and advance the cooldown.
    pub fn tick_at(&mut self, now: Instant) {
        while let Some(result) = self.jobs.try_recv() {
            self.handle_classify_result(result, now);
        }
        for (session, task) in self.schedule.take_due(now) {
            self.handle_action_task(session, task, now);
        }
        if let Some(CooldownEvent::Expired) = self.cooldown.poll_at(now) {
            tracing::info!("Cooldown finished; recognition re-enabled");
        }
    }

    fn reject(&self, reason: RecognitionRejected) -> RecognitionRejected {
        tracing::debug!("Recognition request rejected: {reason}");
        reason
    }

    fn handle_classify_result(&mut self, result: ClassifyResult, now: Instant) {
        let current = match self.phase {
            Phase::Requesting { session } => session,
            _ => {
                tracing::debug!(session = result.session, "Dropping stale classifier result");
                return;
            }
        };
        if result.session != current {
            tracing::debug!(session = result.session, "Dropping stale classifier result");
            return;
        }

        match result.outcome {
            Ok(Gesture::Unknown) => {
                self.last_gesture = Some(Gesture::Unknown);
                self.dispatcher.dispatch(Gesture::Unknown, &mut self.log);
                self.phase = Phase::Idle;
                self.cooldown.start_at(self.timing.cooldown_seconds, now);
            }
            Ok(gesture) => {
                self.last_gesture = Some(gesture);
                self.log
                    .record(format!("Detected: {}", gesture.command_label()));
                let outcome = self.dispatcher.dispatch(gesture, &mut self.log);
                let stage = if outcome.mutated() {
                    self.schedule.schedule(
                        current,
                        now + self.timing.action_delay(),
                        ActionTask::FinishAction,
                    );
                    ActionStage::Performing
                } else {
                    self.log.record(ACTION_FINISHED_MESSAGE);
                    self.schedule
                        .schedule(current, now + self.timing.settle_delay(), ActionTask::Settle);
                    ActionStage::Settling
                };
                self.phase = Phase::ActionInProgress {
                    session: current,
                    gesture,
                    stage,
                };
                self.cooldown.start_at(self.timing.cooldown_seconds, now);
            }
            Err(err) => self.handle_classify_error(err, now),
        }
    }

    fn handle_classify_error(&mut self, err: ClassifyError, now: Instant) {
        let window = match err {
            ClassifyError::QuotaExhausted(_) => self.timing.quota_cooldown_seconds,
            _ => self.timing.cooldown_seconds,
        };
        tracing::warn!("Recognition failed: {err}");
        self.last_error = Some(failure_message(&err, window));
        self.phase = Phase::Error;
        if self.input_mode == InputMode::Camera {
            self.stop_feed();
        }
        self.cooldown.start_at(window, now);
    }

    fn handle_action_task(&mut self, session: SessionId, task: ActionTask, now: Instant) {
        let Phase::ActionInProgress {
            session: current,
            gesture,
            ..
        } = self.phase
        else {
            return;
        };
        if session != current {
            return;
        }
        match task {
            ActionTask::FinishAction => {
                self.log.record(ACTION_FINISHED_MESSAGE);
                self.phase = Phase::ActionInProgress {
                    session,
                    gesture,
                    stage: ActionStage::Settling,
                };
                self.schedule
                    .schedule(session, now + self.timing.settle_delay(), ActionTask::Settle);
            }
            ActionTask::Settle => {
                self.last_gesture = None;
                self.phase = Phase::Idle;
                tracing::debug!(session, "Recognition cycle complete");
            }
        }
    }

    /// Drop everything tied to the current session: pending action steps,
    /// the cooldown, and any in-flight result.
    fn end_session(&mut self) {
        self.cooldown.cancel();
        let session = match self.phase {
            Phase::Requesting { session } | Phase::ActionInProgress { session, .. } => session,
            Phase::Idle | Phase::Error => return,
        };
        let dropped = self.schedule.cancel_session(session);
        tracing::debug!(session, dropped, "Recognition session torn down");
        self.phase = Phase::Idle;
        self.last_gesture = None;
    }
}

impl Drop for RecognitionController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
