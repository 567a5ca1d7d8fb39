//! 비전 파이프라인 통합 테스트.
//!
//! 이미지 파일 → 소스 → 샘플러 → 분석기 → 이벤트/세션 요약 cross-crate 연동.

use chrono::{Duration, Utc};
use image::{Rgba, RgbaImage};
use mockview_core::config::AppConfig;
use mockview_core::models::event::{AnalysisEvent, MonitorSignal};
use mockview_core::models::face::EmotionLabel;
use mockview_core::models::frame::Frame;
use mockview_core::models::warning::WarningKind;
use mockview_core::ports::video::VideoSource;
use mockview_vision::analyzer::SessionAnalyzer;
use mockview_vision::sampler::FrameSampler;
use mockview_vision::source::{frame_from_image, ImageSequenceSource, StaticSource};
use mockview_vision::{emotion, landmarks, metrics, skin::SkinDetector};
use std::path::Path;

const SKIN: Rgba<u8> = Rgba([210, 140, 110, 255]);
const WALL: Rgba<u8> = Rgba([40, 70, 130, 255]);

/// 배경 위 스킨 사각형 하나
fn face_image(w: u32, h: u32, face: (u32, u32, u32, u32)) -> RgbaImage {
    let (fx, fy, fw, fh) = face;
    RgbaImage::from_fn(w, h, |x, y| {
        if x >= fx && x < fx + fw && y >= fy && y < fy + fh {
            SKIN
        } else {
            WALL
        }
    })
}

fn write_frames(dir: &Path, images: &[RgbaImage]) {
    for (i, img) in images.iter().enumerate() {
        img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
    }
}

fn fast_config() -> AppConfig {
    let mut config = AppConfig::default_config();
    config.sampler.interval_ms = 5;
    config
}

/// 스킨 검출 → 랜드마크 → 메트릭 → 감정 (순수 함수 체인)
#[test]
fn detection_chain_on_decoded_image() {
    let img = image::DynamicImage::ImageRgba8(face_image(160, 120, (40, 20, 60, 60)));
    let frame = frame_from_image(&img, Utc::now()).unwrap();

    let face = SkinDetector::default().detect(&frame).expect("얼굴 검출");
    assert_eq!((face.x, face.y, face.w, face.h), (40, 20, 59, 59));

    let m = metrics::compute(&landmarks::approximate(&face), &face);
    assert_eq!(m.smile_factor, 0.4);
    assert_eq!(m.mouth_open, 4.0);
    assert_eq!(emotion::classify(&m), EmotionLabel::Happy);
}

/// 이미지 시퀀스 재생 → 세션 요약
#[tokio::test]
async fn image_sequence_session_report() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(
        dir.path(),
        &[
            face_image(160, 120, (40, 20, 60, 60)),
            face_image(160, 120, (40, 20, 60, 60)),
            RgbaImage::from_pixel(160, 120, WALL),
        ],
    );

    let config = fast_config();
    let mut sampler = FrameSampler::new(&config.sampler);
    let mut events = sampler.subscribe();

    sampler
        .start(
            Box::new(ImageSequenceSource::new(dir.path(), false)),
            SessionAnalyzer::new(&config, Utc::now()),
        )
        .await
        .unwrap();
    let report = sampler.wait().await.expect("세션 요약");

    assert_eq!(report.frames_analyzed, 3);
    assert_eq!(report.faces_detected, 2);
    assert_eq!(report.dominant_emotion, Some(EmotionLabel::Happy));
    // 얼굴 → 빈 배경 전환에서 큰 모션
    assert_eq!(report.warnings_of(WarningKind::Movement), 1);
    assert_eq!(report.warnings_of(WarningKind::MultiplePerson), 0);

    let mut emotion_updates = 0;
    while let Ok(event) = events.try_recv() {
        if matches!(event, AnalysisEvent::EmotionUpdated { .. }) {
            emotion_updates += 1;
        }
    }
    assert_eq!(emotion_updates, 2);
}

/// 분석기 직접 구동: 탭 전환, 다수 인물 쿨다운, 움직임 만료를 한 세션에서
#[test]
fn analyzer_session_timeline() {
    let mut config = AppConfig::default_config();
    config.alerts.multiple_person_enabled = true;
    let start = Utc::now();
    let mut analyzer = SessionAnalyzer::with_session_id("timeline", &config, start);

    let crowd = Frame::from_pixel(200, 200, [210, 140, 110, 255], start);
    let outcome = analyzer.analyze(crowd.clone());
    assert!(outcome.face_regions > 12);
    assert!(outcome.events.contains(&AnalysisEvent::WarningRaised {
        kind: WarningKind::MultiplePerson,
        timestamp: start,
    }));

    analyzer.handle_signal(MonitorSignal::AcknowledgeMultiplePerson, start);
    analyzer.handle_signal(MonitorSignal::VisibilityHidden, start + Duration::seconds(1));

    // 30초 뒤 같은 장면: 쿨다운 안이므로 재발동 없음, 탭 전환은 만료
    let t30 = start + Duration::seconds(30);
    let outcome = analyzer.analyze(crowd.with_timestamp(t30));
    assert!(!outcome.events.iter().any(|e| matches!(
        e,
        AnalysisEvent::WarningRaised {
            kind: WarningKind::MultiplePerson,
            ..
        }
    )));
    assert!(outcome.events.contains(&AnalysisEvent::WarningCleared {
        kind: WarningKind::TabSwitch,
        timestamp: t30,
    }));

    // 60초 경과 → 재발동
    let t61 = start + Duration::seconds(61);
    let outcome = analyzer.analyze(crowd.with_timestamp(t61));
    assert!(outcome.events.contains(&AnalysisEvent::WarningRaised {
        kind: WarningKind::MultiplePerson,
        timestamp: t61,
    }));

    let report = analyzer.report(t61);
    assert_eq!(report.warnings_of(WarningKind::MultiplePerson), 2);
    assert_eq!(report.warnings_of(WarningKind::TabSwitch), 1);
    assert_eq!(report.peak_motion, 0);
}

/// UI 신호 → 카메라 끄기 확인 → 샘플러 종료 + 장치 해제
#[tokio::test]
async fn camera_disable_flow_through_sampler() {
    let config = fast_config();
    let mut sampler = FrameSampler::new(&config.sampler);
    let signals = sampler.signals();

    let frame = Frame::from_pixel(32, 32, [40, 70, 130, 255], Utc::now());
    let source = StaticSource::new(frame);
    let released = source.released_flag();

    sampler
        .start(Box::new(source), SessionAnalyzer::new(&config, Utc::now()))
        .await
        .unwrap();

    // 취소 → 계속 실행
    signals.send(MonitorSignal::CameraToggleOff).await.unwrap();
    signals
        .send(MonitorSignal::ResolveCameraDisable { confirm: false })
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    assert!(sampler.is_running());

    // 확인 → 종료
    signals.send(MonitorSignal::CameraToggleOff).await.unwrap();
    signals
        .send(MonitorSignal::ResolveCameraDisable { confirm: true })
        .await
        .unwrap();
    let report = sampler.wait().await.unwrap();

    assert_eq!(report.warnings_of(WarningKind::CameraDisable), 2);
    assert!(released.load(std::sync::atomic::Ordering::SeqCst));
}

/// 해상도가 바뀌는 시퀀스에서도 모션만 생략하고 계속 진행
#[tokio::test]
async fn resolution_change_skips_motion_only() {
    let dir = tempfile::tempdir().unwrap();
    write_frames(
        dir.path(),
        &[
            RgbaImage::from_pixel(64, 48, WALL),
            RgbaImage::from_pixel(128, 96, WALL),
            RgbaImage::from_pixel(128, 96, WALL),
        ],
    );

    let mut source = ImageSequenceSource::new(dir.path(), false);
    source.acquire().await.unwrap();
    let mut analyzer = SessionAnalyzer::new(&AppConfig::default_config(), Utc::now());

    let mut motions = Vec::new();
    while let Ok(frame) = source.grab_frame().await {
        motions.push(analyzer.analyze(frame).motion);
    }
    assert_eq!(motions, vec![None, None, Some(0)]);
}
