//! # mockview-vision
//!
//! 웹캠 프레임 분석 크레이트.
//! 스킨 영역 검출, 랜드마크 근사, 얼굴 메트릭, 감정 분류, 모션 추정,
//! 경고 정책, 그리고 이를 주기적으로 돌리는 프레임 샘플러를 담당한다.
//!
//! 모든 검출은 색상/기하 휴리스틱이다. 학습된 모델은 쓰지 않는다.

pub mod alert;
pub mod analyzer;
pub mod emotion;
pub mod history;
pub mod landmarks;
pub mod metrics;
pub mod motion;
pub mod report;
pub mod sampler;
pub mod skin;
pub mod source;

use chrono::{DateTime, Duration, Utc};

/// 밀리초 설정값 → chrono 간격. 표현 범위를 넘으면 최대 간격으로 포화
pub(crate) fn millis(ms: u64) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

/// `now + ms`. 오버플로 시 표현 가능한 최대 시각 (사실상 만료 없음)
pub(crate) fn deadline(now: DateTime<Utc>, ms: u64) -> DateTime<Utc> {
    now.checked_add_signed(millis(ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
