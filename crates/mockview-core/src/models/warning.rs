//! 사용자 경고 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 경고 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// 과도한 움직임
    Movement,
    /// 화면 내 다수 인물
    MultiplePerson,
    /// 탭/창 전환
    TabSwitch,
    /// 카메라 끄기 확인
    CameraDisable,
}

impl WarningKind {
    pub const ALL: [WarningKind; 4] = [
        WarningKind::Movement,
        WarningKind::MultiplePerson,
        WarningKind::TabSwitch,
        WarningKind::CameraDisable,
    ];

    /// 직렬화 이름과 동일한 키
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::Movement => "movement",
            WarningKind::MultiplePerson => "multiple_person",
            WarningKind::TabSwitch => "tab_switch",
            WarningKind::CameraDisable => "camera_disable",
        }
    }

    /// UI 표시 문구
    pub fn message(&self) -> &'static str {
        match self {
            WarningKind::Movement => "Excessive movement detected. Please stay still and face the camera.",
            WarningKind::MultiplePerson => "Multiple people detected in the camera frame.",
            WarningKind::TabSwitch => "Switching tabs during the interview is not allowed.",
            WarningKind::CameraDisable => "Turning off the camera will end the monitored interview. Continue?",
        }
    }
}

/// 경고 상태 (유형별)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningState {
    #[default]
    Dormant,
    Active,
    /// 해제되었지만 쿨다운 창 안 (재발동 불가)
    CoolingDown,
}

/// 표시 중인 경고
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWarning {
    pub kind: WarningKind,
    pub raised_at: DateTime<Utc>,
    /// 자동 해제 시각 (`None`이면 명시적 해제 필요)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// 카메라 끄기 확인 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraDecision {
    /// 카메라 중지
    Confirmed,
    /// 취소 (Dormant 복귀)
    Cancelled,
}
