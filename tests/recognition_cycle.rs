mod support;

use support::{
    commander_env::CommanderEnvGuard,
    fakes::{FakeCamera, ScriptedClassifier},
    http::{json_response, serve_once},
};

use gesture_commander::classifier::ClassifierSetupError;
use gesture_commander::config::{self, ClassifierSettings, CommanderConfig};
use gesture_commander::controller::{Phase, RecognitionController};
use gesture_commander::{GeminiClassifier, Gesture, GestureClassifier};
use std::sync::{Arc, atomic::Ordering};
use std::time::{Duration, Instant};

struct CycleHarness {
    controller: RecognitionController,
    start: Instant,
}

impl CycleHarness {
    fn with_classifier(config: &CommanderConfig, classifier: Arc<dyn GestureClassifier>) -> (Self, Arc<std::sync::atomic::AtomicBool>) {
        let (camera, camera_on) = FakeCamera::new();
        let mut controller = RecognitionController::new(config, classifier, Some(Box::new(camera)));
        controller.start_camera().expect("start fake camera");
        (
            Self {
                controller,
                start: Instant::now(),
            },
            camera_on,
        )
    }

    fn at(&self, millis: u64) -> Instant {
        self.start + Duration::from_millis(millis)
    }

    fn wait_for_response(&mut self) {
        for _ in 0..400 {
            self.controller.tick_at(self.start);
            if !self.controller.view().loading {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("classifier response never arrived");
    }

    fn log_texts(&self) -> Vec<String> {
        self.controller
            .command_log()
            .entries()
            .map(|entry| entry.description.clone())
            .collect()
    }
}

#[test]
fn one_finger_turns_bulb_on_then_finishes() {
    let classifier = ScriptedClassifier::new([Ok(Gesture::OneFinger)]);
    let (mut harness, _) =
        CycleHarness::with_classifier(&CommanderConfig::default(), classifier.clone());
    assert!(!harness.controller.device_state().bulb_on);

    harness.controller.request_recognition().expect("request accepted");
    harness.wait_for_response();

    let view = harness.controller.view();
    assert!(view.bulb_on);
    assert!(view.performing_action);
    assert!(view.on_cooldown);
    assert_eq!(view.cooldown_remaining, 5);
    assert_eq!(view.last_gesture, Some(Gesture::OneFinger));
    assert_eq!(
        harness.log_texts(),
        vec!["Action: Turn Bulb On", "Detected: Turn Bulb On"]
    );

    harness.controller.tick_at(harness.at(1_000));
    assert_eq!(harness.log_texts()[0], "Action finished.");

    harness.controller.tick_at(harness.at(2_500));
    let view = harness.controller.view();
    assert!(!view.performing_action);
    assert_eq!(view.last_gesture, None);
    assert!(view.on_cooldown);

    harness.controller.tick_at(harness.at(5_000));
    assert!(harness.controller.view().can_request());
    assert_eq!(classifier.call_count(), 1);
}

#[test]
fn quota_rejection_enters_error_and_stops_camera() {
    let body = r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
    let url = serve_once(json_response("429 Too Many Requests", body));
    let mut config = CommanderConfig::default();
    config.timing.quota_cooldown_seconds = 180;
    let settings = ClassifierSettings {
        endpoint: url,
        ..ClassifierSettings::default()
    };
    let classifier = Arc::new(GeminiClassifier::new(&settings, "test-key"));
    let (mut harness, camera_on) = CycleHarness::with_classifier(&config, classifier);

    harness.controller.request_recognition().expect("request accepted");
    harness.wait_for_response();

    let view = harness.controller.view();
    assert_eq!(harness.controller.phase(), Phase::Error);
    assert!(view.error.as_deref().is_some_and(|msg| msg.starts_with("API Quota Exhausted.")));
    assert!(!view.bulb_on);
    assert!(view.log.is_empty());
    assert!(view.on_cooldown);
    assert_eq!(view.cooldown_remaining, 180);
    assert!(!camera_on.load(Ordering::SeqCst));
    assert!(!view.camera_on);
}

#[test]
fn unknown_gesture_logs_and_skips_action_phase() {
    let classifier = ScriptedClassifier::new([Ok(Gesture::Unknown)]);
    let (mut harness, _) = CycleHarness::with_classifier(&CommanderConfig::default(), classifier);

    harness.controller.request_recognition().expect("request accepted");
    harness.wait_for_response();

    let view = harness.controller.view();
    assert_eq!(harness.controller.phase(), Phase::Idle);
    assert!(!view.performing_action);
    assert!(!view.bulb_on);
    assert_eq!(view.last_gesture, Some(Gesture::Unknown));
    assert_eq!(harness.log_texts(), vec!["No specific gesture recognized."]);
    assert!(view.on_cooldown);
    assert_eq!(view.cooldown_remaining, 5);
}

#[test]
fn toggles_across_cycles_with_configured_timing() {
    let mut config = CommanderConfig::default();
    config.timing.cooldown_seconds = 1;
    config.timing.action_delay_ms = 10;
    config.timing.settle_delay_ms = 10;
    config.log_capacity = 4;
    let classifier = ScriptedClassifier::new([
        Ok(Gesture::ThreeFingers),
        Ok(Gesture::ThreeFingers),
    ]);
    let (mut harness, _) = CycleHarness::with_classifier(&config, classifier);

    harness.controller.request_recognition().expect("first request");
    harness.wait_for_response();
    assert!(harness.controller.device_state().bulb_on);
    harness.controller.tick_at(harness.at(10));
    harness.controller.tick_at(harness.at(20));
    harness.controller.tick_at(harness.at(1_000));

    harness.start = harness.at(1_000);
    harness.controller.request_recognition().expect("second request");
    harness.wait_for_response();
    assert!(!harness.controller.device_state().bulb_on);
    assert_eq!(harness.controller.command_log().len(), 4);
    assert_eq!(harness.log_texts()[0], "Action: Toggle Bulb");
}

#[test]
fn client_setup_reads_key_from_configured_env_var() {
    let temp = tempfile::tempdir().expect("create tempdir");
    let env = CommanderEnvGuard::set_config_home(temp.path().to_path_buf());
    let mut cfg = CommanderConfig::default();
    cfg.classifier.api_key_env = "GESTURE_COMMANDER_IT_KEY".to_string();
    config::save(&cfg).expect("save config");

    let loaded = config::load_or_default().expect("load config");
    assert_eq!(loaded.classifier.api_key_env, "GESTURE_COMMANDER_IT_KEY");

    env.remove_var("GESTURE_COMMANDER_IT_KEY");
    let err = GeminiClassifier::from_settings(&loaded.classifier).unwrap_err();
    assert!(matches!(err, ClassifierSetupError::MissingApiKey { .. }));

    env.set_var("GESTURE_COMMANDER_IT_KEY", "from-env");
    assert!(GeminiClassifier::from_settings(&loaded.classifier).is_ok());
    env.remove_var("GESTURE_COMMANDER_IT_KEY");
}
