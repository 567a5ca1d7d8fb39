//! 프레임(웹캠 래스터) 모델.
//!
//! 샘플링 시점 하나에 캡처된 RGBA8 래스터와, 스킨 영역 검출 결과인
//! 얼굴 박스를 정의한다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// RGBA 채널 수
pub const CHANNELS: usize = 4;

/// 캡처된 프레임 (width × height RGBA8)
///
/// 버퍼 길이는 항상 `width * height * 4`이다. 생성 시 검증된다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
    captured_at: DateTime<Utc>,
}

impl Frame {
    /// 원시 RGBA 버퍼로 프레임 생성
    pub fn new(
        width: u32,
        height: u32,
        data: Vec<u8>,
        captured_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|p| p.checked_mul(CHANNELS));

        if expected != Some(data.len()) {
            return Err(CoreError::InvalidFrame {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
            captured_at,
        })
    }

    /// 단색 프레임 생성
    pub fn from_pixel(width: u32, height: u32, rgba: [u8; 4], captured_at: DateTime<Utc>) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
            captured_at,
        }
    }

    /// 캡처 시각만 바꾼 복사본
    pub fn with_timestamp(&self, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at,
            ..self.clone()
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 캡처 시각
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// 원시 RGBA 바이트
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// (x, y) 픽셀. 범위 밖이면 `None`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let px = &self.data[offset..offset + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// (x, y) 픽셀 덮어쓰기. 범위 밖이면 무시
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[offset..offset + CHANNELS].copy_from_slice(&rgba);
    }
}

/// 스킨 픽셀 바운딩 박스 (틱마다 새로 계산, 추적 없음)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}
