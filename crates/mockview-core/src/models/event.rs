//! 분석 이벤트 / 모니터링 신호 모델.
//!
//! `AnalysisEvent`는 분석 루프 → UI 방향, `MonitorSignal`은 UI → 분석 루프 방향이다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::face::{EmotionLabel, FacialMetrics};
use crate::models::frame::FaceBox;
use crate::models::warning::{CameraDecision, WarningKind};

/// 분석 루프가 발행하는 이벤트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisEvent {
    /// 얼굴 검출 → 감정 라벨 갱신
    EmotionUpdated {
        emotion: EmotionLabel,
        metrics: FacialMetrics,
        face: FaceBox,
        timestamp: DateTime<Utc>,
    },
    /// 모션 레벨 측정
    MotionMeasured {
        level: u64,
        timestamp: DateTime<Utc>,
    },
    /// 경고 발동
    WarningRaised {
        kind: WarningKind,
        timestamp: DateTime<Utc>,
    },
    /// 경고 해제 (만료, 확인, 취소 포함)
    WarningCleared {
        kind: WarningKind,
        timestamp: DateTime<Utc>,
    },
    /// 카메라 끄기 확인 결과
    CameraDecided {
        decision: CameraDecision,
        timestamp: DateTime<Utc>,
    },
}

/// UI/세션 레이어에서 들어오는 신호
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MonitorSignal {
    /// 페이지 가시성 hidden 전환
    VisibilityHidden,
    /// 탭 전환 경고 닫기
    DismissTabSwitch,
    /// 다수 인물 경고 확인
    AcknowledgeMultiplePerson,
    /// 사용자가 카메라 끄기 토글
    CameraToggleOff,
    /// 카메라 끄기 확인 대화상자 응답
    ResolveCameraDisable { confirm: bool },
    /// 외부 리셋: 표시 중인 경고 모두 해제 (다수 인물 쿨다운은 유지)
    ResetAlerts,
}
