//! 면접 세션 모델.
//!
//! 세션 종료 시 결과 페이지에 표시되는 분석 요약.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::face::EmotionLabel;
use crate::models::warning::WarningKind;

/// 세션 분석 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// 세션 고유 ID
    pub session_id: String,
    /// 세션 시작 시각
    pub started_at: DateTime<Utc>,
    /// 세션 종료 시각
    pub ended_at: DateTime<Utc>,
    /// 분석한 프레임 수
    pub frames_analyzed: u64,
    /// 얼굴이 검출된 프레임 수
    pub faces_detected: u64,
    /// 히스토리 기준 감정 분포 (라벨별 항목 수)
    pub emotion_counts: BTreeMap<String, u32>,
    /// 최빈 감정 (히스토리가 비었으면 `None`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_emotion: Option<EmotionLabel>,
    /// 히스토리 평균 confidence (소수점 2자리)
    pub average_confidence: f64,
    /// 경고 유형별 발동 횟수
    pub warning_counts: BTreeMap<String, u32>,
    /// 최대 모션 레벨
    pub peak_motion: u64,
}

impl SessionReport {
    /// 세션 길이 (초)
    pub fn duration_secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds()
    }

    /// 특정 경고 발동 횟수
    pub fn warnings_of(&self, kind: WarningKind) -> u32 {
        self.warning_counts.get(kind.as_str()).copied().unwrap_or(0)
    }

    /// 얼굴 검출률 (0.0 ~ 1.0)
    pub fn detection_rate(&self) -> f64 {
        if self.frames_analyzed == 0 {
            return 0.0;
        }
        self.faces_detected as f64 / self.frames_analyzed as f64
    }
}
