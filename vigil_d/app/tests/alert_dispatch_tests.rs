use std::time::{Duration, Instant};

use common::{AlertConfig, AlertLevel, AlertOutput, Assessment, AttentionLevel, FaceStatus};
use vigil_d::dispatcher::{AlertGovernor, Dispatcher};
use vigil_d::sinks::create_backend;

fn alerting_assessment(level: AlertLevel) -> Assessment {
    Assessment {
        face_detected: true,
        status: FaceStatus::EyesClosed,
        level: AttentionLevel::Alert,
        gaze_left: None,
        gaze_right: None,
        eyes_open: false,
        head_movement: 0.0,
        alert: Some(level),
    }
}

/// An un-initialized UDP backend has no socket, so emits are silent
/// no-ops. That makes it a convenient test double.
fn silent_dispatcher(cooldown_secs: f32) -> Dispatcher {
    let config = AlertConfig {
        output_mode: AlertOutput::Udp,
        ..AlertConfig::default()
    };
    Dispatcher::new(create_backend(&config), cooldown_secs)
}

mod governor {
    use super::*;

    #[test]
    fn first_alert_passes() {
        let mut governor = AlertGovernor::new(2.0);
        assert!(governor.permit_at(AlertLevel::Standard, Instant::now()));
    }

    #[test]
    fn repeat_within_cooldown_is_suppressed() {
        let mut governor = AlertGovernor::new(2.0);
        let t0 = Instant::now();
        assert!(governor.permit_at(AlertLevel::Warning, t0));
        assert!(!governor.permit_at(AlertLevel::Warning, t0 + Duration::from_millis(500)));
    }

    #[test]
    fn repeat_after_cooldown_passes() {
        let mut governor = AlertGovernor::new(2.0);
        let t0 = Instant::now();
        assert!(governor.permit_at(AlertLevel::Warning, t0));
        assert!(governor.permit_at(AlertLevel::Warning, t0 + Duration::from_secs(3)));
    }

    #[test]
    fn levels_cool_down_independently() {
        let mut governor = AlertGovernor::new(2.0);
        let t0 = Instant::now();
        assert!(governor.permit_at(AlertLevel::Standard, t0));
        // A different level is not throttled by the first.
        assert!(governor.permit_at(AlertLevel::Critical, t0 + Duration::from_millis(10)));
    }

    #[test]
    fn reset_clears_cooldowns() {
        let mut governor = AlertGovernor::new(60.0);
        let t0 = Instant::now();
        assert!(governor.permit_at(AlertLevel::Standard, t0));
        assert!(!governor.permit_at(AlertLevel::Standard, t0 + Duration::from_secs(1)));
        governor.reset();
        assert!(governor.permit_at(AlertLevel::Standard, t0 + Duration::from_secs(2)));
    }

    #[test]
    fn zero_cooldown_never_suppresses() {
        let mut governor = AlertGovernor::new(0.0);
        let t0 = Instant::now();
        assert!(governor.permit_at(AlertLevel::Standard, t0));
        assert!(governor.permit_at(AlertLevel::Standard, t0));
    }
}

mod dispatcher {
    use super::*;

    #[test]
    fn quiet_assessment_emits_nothing() {
        let mut dispatcher = silent_dispatcher(2.0);
        let event = dispatcher.dispatch(&Assessment::idle()).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn alert_carries_the_tone_for_its_level() {
        let mut dispatcher = silent_dispatcher(2.0);
        let event = dispatcher
            .dispatch(&alerting_assessment(AlertLevel::Critical))
            .unwrap()
            .expect("first alert should pass the governor");

        assert_eq!(event.level, AlertLevel::Critical);
        assert_eq!(event.status, FaceStatus::EyesClosed);
        assert_eq!((event.frequency_hz, event.duration_ms), (1500, 600));
    }

    #[test]
    fn held_condition_is_throttled() {
        let mut dispatcher = silent_dispatcher(60.0);
        let assessment = alerting_assessment(AlertLevel::Warning);

        assert!(dispatcher.dispatch(&assessment).unwrap().is_some());
        // Same condition on the next frame: inside the cooldown.
        assert!(dispatcher.dispatch(&assessment).unwrap().is_none());

        dispatcher.reset();
        assert!(dispatcher.dispatch(&assessment).unwrap().is_some());
    }

    #[test]
    fn tone_table_matches_levels() {
        assert_eq!(AlertLevel::Standard.tone(), (800, 200));
        assert_eq!(AlertLevel::Warning.tone(), (1200, 400));
        assert_eq!(AlertLevel::Critical.tone(), (1500, 600));
    }
}
