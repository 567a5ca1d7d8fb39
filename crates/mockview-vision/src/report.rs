//! 세션 요약 생성.
//!
//! 감정 분포는 (쓰로틀된) 히스토리 기준이다. 틱 단위 집계는 `TickStats`가 담당한다.

use chrono::{DateTime, Utc};
use mockview_core::models::face::EmotionLabel;
use mockview_core::models::session::SessionReport;
use mockview_core::models::warning::WarningKind;
use std::collections::BTreeMap;

use crate::alert::AlertPolicy;
use crate::history::EmotionHistory;
use crate::metrics::round2;

/// 틱 단위 누적 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub frames_analyzed: u64,
    pub faces_detected: u64,
    pub peak_motion: u64,
}

impl TickStats {
    /// 한 틱 결과 반영
    pub fn observe(&mut self, face_found: bool, motion: Option<u64>) {
        self.frames_analyzed += 1;
        if face_found {
            self.faces_detected += 1;
        }
        if let Some(level) = motion {
            self.peak_motion = self.peak_motion.max(level);
        }
    }
}

/// 최빈 감정. 동률이면 `EmotionLabel::ALL` 순서상 앞선 라벨
pub fn dominant_emotion(history: &EmotionHistory) -> Option<EmotionLabel> {
    let mut best: Option<(EmotionLabel, usize)> = None;
    for label in EmotionLabel::ALL {
        let count = history.count_of(label);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((label, count)),
        }
    }
    best.map(|(label, _)| label)
}

/// 히스토리 평균 confidence
pub fn average_confidence(history: &EmotionHistory) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let sum: f64 = history.iter().map(|e| e.metrics.confidence).sum();
    round2(sum / history.len() as f64)
}

/// 세션 요약 생성
pub fn build(
    session_id: &str,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    history: &EmotionHistory,
    alerts: &AlertPolicy,
    stats: &TickStats,
) -> SessionReport {
    let emotion_counts: BTreeMap<String, u32> = EmotionLabel::ALL
        .into_iter()
        .map(|label| (label.as_str().to_string(), history.count_of(label) as u32))
        .collect();

    let warning_counts: BTreeMap<String, u32> = WarningKind::ALL
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), alerts.trigger_count(kind)))
        .collect();

    SessionReport {
        session_id: session_id.to_string(),
        started_at,
        ended_at,
        frames_analyzed: stats.frames_analyzed,
        faces_detected: stats.faces_detected,
        emotion_counts,
        dominant_emotion: dominant_emotion(history),
        average_confidence: average_confidence(history),
        warning_counts,
        peak_motion: stats.peak_motion,
    }
}
