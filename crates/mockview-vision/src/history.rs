//! 감정 히스토리.
//!
//! 삽입 순서 유지, 최대 용량 초과 시 가장 오래된 항목 제거 (FIFO).
//! 샘플링 주기와 무관하게 쓰로틀 간격당 최대 한 항목만 기록한다.

use chrono::{DateTime, Duration, Utc};
use mockview_core::config::{HistoryConfig, HISTORY_CAPACITY};
use mockview_core::models::face::{EmotionHistoryEntry, EmotionLabel, FacialMetrics};
use std::collections::VecDeque;
use tracing::debug;

use crate::millis;

/// 용량 제한 + 쓰로틀 감정 히스토리
#[derive(Debug, Clone)]
pub struct EmotionHistory {
    entries: VecDeque<EmotionHistoryEntry>,
    capacity: usize,
    throttle: Duration,
    last_recorded: Option<DateTime<Utc>>,
}

impl EmotionHistory {
    /// 새 히스토리 생성
    pub fn new(capacity: usize, throttle_ms: u64) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.clamp(1, HISTORY_CAPACITY)),
            capacity: capacity.max(1),
            throttle: millis(throttle_ms),
            last_recorded: None,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity, config.throttle_ms)
    }

    /// 항목 기록. 쓰로틀에 걸리면 `false`
    pub fn record(
        &mut self,
        emotion: EmotionLabel,
        metrics: FacialMetrics,
        timestamp: DateTime<Utc>,
    ) -> bool {
        if self.is_throttled(timestamp) {
            return false;
        }

        self.entries.push_back(EmotionHistoryEntry {
            emotion,
            metrics,
            timestamp,
        });
        self.last_recorded = Some(timestamp);

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        debug!("감정 히스토리 기록: {emotion} ({}개)", self.entries.len());
        true
    }

    fn is_throttled(&self, now: DateTime<Utc>) -> bool {
        match self.last_recorded {
            Some(last) => now - last < self.throttle,
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 오래된 순 순회
    pub fn iter(&self) -> impl Iterator<Item = &EmotionHistoryEntry> {
        self.entries.iter()
    }

    /// 가장 최근 항목
    pub fn latest(&self) -> Option<&EmotionHistoryEntry> {
        self.entries.back()
    }

    /// 라벨별 항목 수
    pub fn count_of(&self, emotion: EmotionLabel) -> usize {
        self.entries.iter().filter(|e| e.emotion == emotion).count()
    }

    /// 전체 삭제 (세션 종료)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_recorded = None;
    }
}

impl Default for EmotionHistory {
    fn default() -> Self {
        Self::from_config(&HistoryConfig::default())
    }
}
