//! 세션 단위 분석기.
//!
//! 틱 하나의 파이프라인: 만료 처리 → 스킨 검출 → 랜드마크/메트릭/감정 →
//! 얼굴 영역 수(다수 인물) → 모션(움직임) → 이전 프레임 교체.
//! 분석 상태(히스토리, 이전 프레임, 경고 정책)의 유일한 소유자다.

use chrono::{DateTime, Utc};
use mockview_core::config::{AppConfig, EmotionThresholds};
use mockview_core::models::event::{AnalysisEvent, MonitorSignal};
use mockview_core::models::face::{EmotionLabel, FacialMetrics};
use mockview_core::models::frame::{FaceBox, Frame};
use mockview_core::models::session::SessionReport;
use mockview_core::models::warning::{CameraDecision, WarningKind};
use tracing::{debug, info};
use uuid::Uuid;

use crate::alert::AlertPolicy;
use crate::emotion;
use crate::history::EmotionHistory;
use crate::landmarks;
use crate::metrics;
use crate::motion;
use crate::report::{self, TickStats};
use crate::skin::SkinDetector;

/// 틱 하나의 분석 결과
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// 검출된 얼굴 박스
    pub face: Option<FaceBox>,
    /// 현재 감정 라벨 (얼굴이 없으면 직전 값 유지)
    pub emotion: EmotionLabel,
    /// 이번 틱 메트릭 (얼굴이 없으면 `None`)
    pub metrics: Option<FacialMetrics>,
    /// 얼굴 영역 블록 수
    pub face_regions: u32,
    /// 모션 레벨 (첫 틱, 해상도 변경 시 `None`)
    pub motion: Option<u64>,
    /// 이번 틱에 발생한 이벤트
    pub events: Vec<AnalysisEvent>,
}

/// 세션 분석기
pub struct SessionAnalyzer {
    session_id: String,
    started_at: DateTime<Utc>,
    detector: SkinDetector,
    emotion_thresholds: EmotionThresholds,
    prev_frame: Option<Frame>,
    history: EmotionHistory,
    alerts: AlertPolicy,
    current_emotion: EmotionLabel,
    current_metrics: FacialMetrics,
    stats: TickStats,
    camera_stopped: bool,
}

impl SessionAnalyzer {
    /// 새 세션 분석기 (세션 ID는 UUID v4)
    pub fn new(config: &AppConfig, started_at: DateTime<Utc>) -> Self {
        Self::with_session_id(Uuid::new_v4().to_string(), config, started_at)
    }

    pub fn with_session_id(
        session_id: impl Into<String>,
        config: &AppConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        let session_id = session_id.into();
        info!("세션 분석기 생성: {session_id}");
        Self {
            session_id,
            started_at,
            detector: SkinDetector::new(&config.analysis),
            emotion_thresholds: config.analysis.emotion,
            prev_frame: None,
            history: EmotionHistory::from_config(&config.history),
            alerts: AlertPolicy::new(config.alerts.clone()),
            current_emotion: EmotionLabel::Neutral,
            current_metrics: FacialMetrics::default(),
            stats: TickStats::default(),
            camera_stopped: false,
        }
    }

    /// 프레임 하나 분석
    pub fn analyze(&mut self, frame: Frame) -> TickOutcome {
        let now = frame.captured_at();
        let mut events = self.expire(now);

        let scan = self.detector.scan(&frame);

        let mut tick_metrics = None;
        if let Some(face) = scan.face {
            let points = landmarks::approximate(&face);
            let m = metrics::compute(&points, &face);
            let label = emotion::classify_with(&m, &self.emotion_thresholds);

            self.current_emotion = label;
            self.current_metrics = m;
            self.history.record(label, m, now);
            tick_metrics = Some(m);

            events.push(AnalysisEvent::EmotionUpdated {
                emotion: label,
                metrics: m,
                face,
                timestamp: now,
            });
        }

        if self.alerts.observe_face_regions(scan.face_regions, now) {
            events.push(AnalysisEvent::WarningRaised {
                kind: WarningKind::MultiplePerson,
                timestamp: now,
            });
        }

        let level = motion::estimate(self.prev_frame.as_ref(), Some(&frame));
        if let Some(level) = level {
            events.push(AnalysisEvent::MotionMeasured {
                level,
                timestamp: now,
            });
            if self.alerts.observe_motion(level, now) {
                events.push(AnalysisEvent::WarningRaised {
                    kind: WarningKind::Movement,
                    timestamp: now,
                });
            }
        }

        self.stats.observe(scan.face.is_some(), level);
        self.prev_frame = Some(frame);

        debug!(
            "틱 분석 완료: 감정 {}, 영역 {}, 모션 {:?}, 이벤트 {}",
            self.current_emotion,
            scan.face_regions,
            level,
            events.len()
        );

        TickOutcome {
            face: scan.face,
            emotion: self.current_emotion,
            metrics: tick_metrics,
            face_regions: scan.face_regions,
            motion: level,
            events,
        }
    }

    /// 표시 시간이 지난 경고 해제
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<AnalysisEvent> {
        self.alerts
            .expire(now)
            .into_iter()
            .map(|kind| AnalysisEvent::WarningCleared {
                kind,
                timestamp: now,
            })
            .collect()
    }

    /// UI 신호 처리
    pub fn handle_signal(&mut self, signal: MonitorSignal, now: DateTime<Utc>) -> Vec<AnalysisEvent> {
        let mut events = self.expire(now);

        match signal {
            MonitorSignal::VisibilityHidden => {
                if self.alerts.visibility_hidden(now) {
                    events.push(AnalysisEvent::WarningRaised {
                        kind: WarningKind::TabSwitch,
                        timestamp: now,
                    });
                }
            }
            MonitorSignal::DismissTabSwitch => {
                if self.alerts.dismiss_tab_switch() {
                    events.push(AnalysisEvent::WarningCleared {
                        kind: WarningKind::TabSwitch,
                        timestamp: now,
                    });
                }
            }
            MonitorSignal::AcknowledgeMultiplePerson => {
                if self.alerts.acknowledge_multiple_person() {
                    events.push(AnalysisEvent::WarningCleared {
                        kind: WarningKind::MultiplePerson,
                        timestamp: now,
                    });
                }
            }
            MonitorSignal::CameraToggleOff => {
                if self.alerts.request_camera_disable(now) {
                    events.push(AnalysisEvent::WarningRaised {
                        kind: WarningKind::CameraDisable,
                        timestamp: now,
                    });
                }
            }
            MonitorSignal::ResolveCameraDisable { confirm } => {
                if let Some(decision) = self.alerts.resolve_camera_disable(confirm) {
                    events.push(AnalysisEvent::WarningCleared {
                        kind: WarningKind::CameraDisable,
                        timestamp: now,
                    });
                    events.push(AnalysisEvent::CameraDecided {
                        decision,
                        timestamp: now,
                    });
                    if decision == CameraDecision::Confirmed {
                        self.camera_stopped = true;
                    }
                }
            }
            MonitorSignal::ResetAlerts => events.extend(self.reset_alerts(now)),
        }

        events
    }

    /// 모든 경고 해제 (다수 인물 쿨다운 기록은 유지)
    pub fn reset_alerts(&mut self, now: DateTime<Utc>) -> Vec<AnalysisEvent> {
        self.alerts
            .reset()
            .into_iter()
            .map(|kind| AnalysisEvent::WarningCleared {
                kind,
                timestamp: now,
            })
            .collect()
    }

    /// 카메라 끄기가 확인되었는지
    pub fn camera_stopped(&self) -> bool {
        self.camera_stopped
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_emotion(&self) -> EmotionLabel {
        self.current_emotion
    }

    pub fn current_metrics(&self) -> FacialMetrics {
        self.current_metrics
    }

    pub fn history(&self) -> &EmotionHistory {
        &self.history
    }

    pub fn alerts(&self) -> &AlertPolicy {
        &self.alerts
    }

    /// 세션 요약
    pub fn report(&self, ended_at: DateTime<Utc>) -> SessionReport {
        report::build(
            &self.session_id,
            self.started_at,
            ended_at,
            &self.history,
            &self.alerts,
            &self.stats,
        )
    }
}
