//! 설정 및 와이어링 통합 테스트.
//!
//! AppConfig → ConfigManager → 분석 컴포넌트 생성 검증.

use chrono::Utc;
use mockview_core::config::AppConfig;
use mockview_core::config_manager::ConfigManager;
use mockview_core::models::frame::Frame;
use mockview_core::models::warning::WarningKind;
use mockview_vision::alert::AlertPolicy;
use mockview_vision::analyzer::SessionAnalyzer;
use mockview_vision::history::EmotionHistory;
use mockview_vision::sampler::FrameSampler;
use mockview_vision::skin::SkinDetector;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    assert!(config.validate().is_ok());

    // 샘플러
    assert_eq!(config.sampler.interval_ms, 1000);
    assert!(config.sampler.frames_dir.is_none());

    // 분석 임계값
    assert_eq!(config.analysis.block_size, 20);
    assert_eq!(config.analysis.min_skin_pixels, 1000);

    // 경고 정책
    assert_eq!(config.alerts.movement_threshold, 5000);
    assert_eq!(config.alerts.movement_display_ms, 15_000);
    assert_eq!(config.alerts.multiple_person_cooldown_ms, 60_000);
    assert_eq!(config.alerts.tab_switch_display_ms, 10_000);
    assert!(!config.alerts.multiple_person_enabled);

    // 히스토리
    assert_eq!(config.history.capacity, 30);
    assert_eq!(config.history.throttle_ms, 3000);
}

#[test]
fn config_file_roundtrip_through_manager() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let manager = ConfigManager::with_path(path.clone()).unwrap();
    assert!(path.exists());

    manager
        .update_with(|c| {
            c.sampler.interval_ms = 500;
            c.alerts.multiple_person_enabled = true;
        })
        .unwrap();

    let reopened = ConfigManager::with_path(path).unwrap();
    let config = reopened.get();
    assert_eq!(config.sampler.interval_ms, 500);
    assert!(config.alerts.multiple_person_enabled);
}

#[test]
fn partial_json_fills_defaults() {
    let json = r#"{ "alerts": { "movement_threshold": 8000 } }"#;
    let config: AppConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.alerts.movement_threshold, 8000);
    assert_eq!(config.alerts.tab_switch_display_ms, 10_000);
    assert_eq!(config.history.capacity, 30);
    assert!(config.validate().is_ok());
}

#[test]
fn components_build_from_config() {
    let config = AppConfig::default_config();

    let _detector = SkinDetector::new(&config.analysis);
    let history = EmotionHistory::from_config(&config.history);
    assert_eq!(history.capacity(), 30);

    let policy = AlertPolicy::new(config.alerts.clone());
    assert_eq!(policy.trigger_count(WarningKind::Movement), 0);

    let sampler = FrameSampler::new(&config.sampler);
    assert!(!sampler.is_running());
}

#[test]
fn default_config_leaves_multiple_person_off() {
    let config = AppConfig::default_config();

    let now = Utc::now();
    let mut analyzer = SessionAnalyzer::new(&config, now);
    let crowd = Frame::from_pixel(200, 200, [210, 140, 110, 255], now);
    let outcome = analyzer.analyze(crowd);

    assert!(outcome.face_regions > config.alerts.face_region_threshold);
    assert!(!analyzer.alerts().is_active(WarningKind::MultiplePerson));
}

#[test]
fn custom_movement_threshold_flows_into_analyzer() {
    let mut config = AppConfig::default_config();
    config.alerts.movement_threshold = u64::MAX - 1;

    let now = Utc::now();
    let mut analyzer = SessionAnalyzer::new(&config, now);
    analyzer.analyze(Frame::from_pixel(100, 100, [0, 0, 0, 255], now));
    let outcome = analyzer.analyze(Frame::from_pixel(100, 100, [255, 255, 255, 255], now));

    assert_eq!(outcome.motion, Some(100 * 100 * 765));
    assert!(!analyzer.alerts().is_active(WarningKind::Movement));
}

#[test]
fn enabled_multiple_person_flows_into_analyzer() {
    let mut config = AppConfig::default_config();
    config.alerts.multiple_person_enabled = true;

    let now = Utc::now();
    let mut analyzer = SessionAnalyzer::new(&config, now);
    analyzer.analyze(Frame::from_pixel(200, 200, [210, 140, 110, 255], now));
    assert!(analyzer.alerts().is_active(WarningKind::MultiplePerson));
}

#[test]
fn out_of_range_durations_fail_validation_before_wiring() {
    let json = r#"{ "history": { "throttle_ms": 9223372036854775808 } }"#;
    let config: AppConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_err());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "alerts": { "movement_display_ms": 100000000000000000 } }"#)
        .unwrap();
    assert!(ConfigManager::with_path(path).is_err());
}
