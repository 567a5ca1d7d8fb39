//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터(`mockview-vision::source` 등)가 이 trait을 구현하며,
//! `mockview-app`에서 `Box<dyn T>`로 와이어링한다.
//!
//! async trait은 `async_trait` 매크로로 object safety를 보장한다.

pub mod video;
