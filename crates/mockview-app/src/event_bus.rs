//! 분석 이벤트 중계.
//!
//! 샘플러의 `broadcast` 이벤트를 구독해 로그로 남기고, 필요하면 JSON Lines로
//! stdout에 흘린다. UI가 붙는 자리다.

use mockview_core::models::event::AnalysisEvent;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// 중계 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub received: u64,
    pub warnings_raised: u64,
    /// 느린 구독으로 놓친 이벤트 수
    pub lagged: u64,
}

/// 이벤트 한 줄 요약
pub fn describe(event: &AnalysisEvent) -> String {
    match event {
        AnalysisEvent::EmotionUpdated {
            emotion, metrics, ..
        } => format!(
            "감정 {emotion} (mouth {:.2}, brow {:.2}, smile {:.2}, conf {:.2})",
            metrics.mouth_open, metrics.eyebrow_raise, metrics.smile_factor, metrics.confidence
        ),
        AnalysisEvent::MotionMeasured { level, .. } => format!("모션 {level}"),
        AnalysisEvent::WarningRaised { kind, .. } => {
            format!("경고 발동 [{}] {}", kind.as_str(), kind.message())
        }
        AnalysisEvent::WarningCleared { kind, .. } => format!("경고 해제 [{}]", kind.as_str()),
        AnalysisEvent::CameraDecided { decision, .. } => format!("카메라 끄기 {:?}", decision),
    }
}

/// 채널이 닫힐 때까지 이벤트 중계
pub async fn relay(mut rx: broadcast::Receiver<AnalysisEvent>, emit_json: bool) -> RelayStats {
    let mut stats = RelayStats::default();

    loop {
        match rx.recv().await {
            Ok(event) => {
                stats.received += 1;
                match &event {
                    AnalysisEvent::WarningRaised { .. } => {
                        stats.warnings_raised += 1;
                        warn!("{}", describe(&event));
                    }
                    AnalysisEvent::MotionMeasured { .. } => debug!("{}", describe(&event)),
                    _ => info!("{}", describe(&event)),
                }

                if emit_json {
                    match serde_json::to_string(&event) {
                        Ok(line) => println!("{line}"),
                        Err(e) => warn!("이벤트 직렬화 실패: {e}"),
                    }
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!("이벤트 {n}개 유실 (구독 지연)");
                stats.lagged += n;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    debug!("이벤트 중계 종료: {:?}", stats);
    stats
}
