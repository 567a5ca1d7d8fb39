//! MOCKVIEW 핵심 에러 타입.
//!
//! 분석 파이프라인 자체는 실패 경로가 없다 (얼굴 미검출, 첫 틱 등은 모두 `None`).
//! 에러는 설정 로드, 프레임 생성, 캡처 장치 획득 단계에서만 발생한다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 프레임 버퍼 크기가 해상도와 맞지 않음
    #[error("잘못된 프레임: {width}x{height}, 버퍼 {len}바이트")]
    InvalidFrame {
        width: u32,
        height: u32,
        len: usize,
    },

    /// 캡처 장치를 사용할 수 없음 (획득 시점에 한 번만 보고)
    #[error("캡처 장치 사용 불가: {0}")]
    DeviceUnavailable(String),

    /// 프레임 소스가 더 이상 프레임을 제공하지 않음
    #[error("프레임 소스 종료")]
    SourceExhausted,

    /// 이미지 디코딩 실패
    #[error("이미지 디코딩 실패: {0}")]
    Decode(String),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}
