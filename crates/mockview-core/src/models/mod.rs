//! MOCKVIEW 도메인 모델.
//!
//! 세션 단위 인메모리 분석 파이프라인이 주고받는 데이터 구조체를 정의한다.
//! 어느 것도 영속화되지 않으며, UI 전달용으로 `serde` 직렬화를 구현한다.

pub mod event;
pub mod face;
pub mod frame;
pub mod session;
pub mod warning;
