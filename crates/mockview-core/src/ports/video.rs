//! 비디오 소스 포트.
//!
//! 구현: `mockview-vision::source` (이미지 시퀀스, 정적 프레임).
//! 실제 웹캠 장치는 세션 라이프사이클 코드가 이 trait으로 감싸서 주입한다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 라이브 프레임 공급원
#[async_trait]
pub trait VideoSource: Send {
    /// 장치 획득. 실패하면 `CoreError::DeviceUnavailable`을 한 번 보고하고 재시도하지 않는다.
    async fn acquire(&mut self) -> Result<(), CoreError>;

    /// 프레임 공급 준비 여부. 준비 전 틱은 건너뛴다.
    fn is_ready(&self) -> bool;

    /// 현재 프레임 캡처 (네이티브 해상도)
    async fn grab_frame(&mut self) -> Result<Frame, CoreError>;

    /// 장치 해제. 여러 번 호출해도 안전해야 한다.
    async fn release(&mut self);
}
