//! 스킨 영역 검출.
//!
//! 색상 임계값 휴리스틱 (학습된 검출기 아님). 두 개의 독립 패스:
//! - 블록 패스: 20x20 블록별 스킨 비율 → 얼굴 영역 블록 수 (다수 인물 경고 입력)
//! - 전체 스캔: 스킨 픽셀 전체의 바운딩 박스 → `FaceBox`
//!
//! 피부색 배경, 조명 변화에서 오검출하는 것은 알려진 한계다.

use mockview_core::config::{AnalysisConfig, SkinThresholds};
use mockview_core::models::frame::{FaceBox, Frame, CHANNELS};
use tracing::debug;

/// 한 프레임의 스킨 스캔 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinScan {
    /// 얼굴 박스 (스킨 픽셀이 최소 개수 미만이면 `None`)
    pub face: Option<FaceBox>,
    /// 스킨 비율이 임계값을 넘은 블록 수
    pub face_regions: u32,
    /// 전체 스킨 픽셀 수
    pub skin_pixels: u64,
}

/// 스킨 톤 판정
#[inline]
pub fn is_skin(r: u8, g: u8, b: u8, t: &SkinThresholds) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    r > t.min_red
        && g > t.min_green
        && b > t.min_blue
        && max - min > t.min_spread
        && r.abs_diff(g) > t.min_red_green_gap
        && r > g
        && r > b
}

/// 스킨 영역 검출기
#[derive(Debug, Clone)]
pub struct SkinDetector {
    block_size: u32,
    block_skin_ratio: f64,
    min_skin_pixels: u64,
    thresholds: SkinThresholds,
}

impl SkinDetector {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            block_size: config.block_size.max(1),
            block_skin_ratio: config.block_skin_ratio,
            min_skin_pixels: config.min_skin_pixels,
            thresholds: config.skin,
        }
    }

    /// 프레임 스캔
    pub fn scan(&self, frame: &Frame) -> SkinScan {
        let face_regions = self.count_face_regions(frame);
        let (face, skin_pixels) = self.bounding_box(frame);

        debug!(
            "스킨 스캔: 픽셀 {skin_pixels}, 얼굴 영역 블록 {face_regions}, 얼굴 {}",
            face.is_some()
        );

        SkinScan {
            face,
            face_regions,
            skin_pixels,
        }
    }

    /// 얼굴 박스만 필요한 경우
    pub fn detect(&self, frame: &Frame) -> Option<FaceBox> {
        self.bounding_box(frame).0
    }

    /// 블록 패스: 가장자리 블록은 프레임 경계로 잘라 실제 픽셀 수 기준으로 비율 계산
    pub fn count_face_regions(&self, frame: &Frame) -> u32 {
        let (w, h) = frame.dimensions();
        let raw = frame.as_raw();
        let stride = w as usize * CHANNELS;
        let mut regions = 0u32;

        for start_y in (0..h).step_by(self.block_size as usize) {
            for start_x in (0..w).step_by(self.block_size as usize) {
                let end_x = (start_x + self.block_size).min(w);
                let end_y = (start_y + self.block_size).min(h);

                let mut skin = 0u32;
                let mut total = 0u32;
                for y in start_y as usize..end_y as usize {
                    let row_offset = y * stride;
                    for x in start_x as usize..end_x as usize {
                        let offset = row_offset + x * CHANNELS;
                        if is_skin(raw[offset], raw[offset + 1], raw[offset + 2], &self.thresholds)
                        {
                            skin += 1;
                        }
                        total += 1;
                    }
                }

                if total > 0 && skin as f64 / total as f64 > self.block_skin_ratio {
                    regions += 1;
                }
            }
        }

        regions
    }

    /// 전체 해상도 스캔: 스킨 픽셀 min/max 좌표
    fn bounding_box(&self, frame: &Frame) -> (Option<FaceBox>, u64) {
        let w = frame.width();
        let raw = frame.as_raw();

        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut count = 0u64;

        for (i, px) in raw.chunks_exact(CHANNELS).enumerate() {
            if !is_skin(px[0], px[1], px[2], &self.thresholds) {
                continue;
            }
            let x = (i % w as usize) as u32;
            let y = (i / w as usize) as u32;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            count += 1;
        }

        if count == 0 || count < self.min_skin_pixels {
            return (None, count);
        }

        let face = FaceBox {
            x: min_x,
            y: min_y,
            w: max_x - min_x,
            h: max_y - min_y,
        };
        (Some(face), count)
    }
}

impl Default for SkinDetector {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}
