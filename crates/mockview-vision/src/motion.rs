//! 모션 추정.
//!
//! 연속 두 프레임의 픽셀별 |ΔR|+|ΔG|+|ΔB| 합. 해상도로 정규화하지 않으므로
//! 임계값은 입력 해상도에 맞춰 잡아야 한다.

use mockview_core::models::frame::{Frame, CHANNELS};
use tracing::debug;

/// 두 프레임 간 모션 레벨
///
/// 해상도가 다르면 `None`.
pub fn motion_level(prev: &Frame, curr: &Frame) -> Option<u64> {
    if prev.dimensions() != curr.dimensions() {
        debug!(
            "해상도 불일치로 모션 생략: {:?} → {:?}",
            prev.dimensions(),
            curr.dimensions()
        );
        return None;
    }

    // 바이트 슬라이스 직접 접근 (get_pixel 대신 4바이트 stride 순회)
    let level: u64 = prev
        .as_raw()
        .chunks_exact(CHANNELS)
        .zip(curr.as_raw().chunks_exact(CHANNELS))
        .map(|(p, c)| {
            (p[0].abs_diff(c[0]) as u64)
                + (p[1].abs_diff(c[1]) as u64)
                + (p[2].abs_diff(c[2]) as u64)
        })
        .sum();

    Some(level)
}

/// 이전 프레임이 없으면 (첫 틱) `None`
pub fn estimate(prev: Option<&Frame>, curr: Option<&Frame>) -> Option<u64> {
    motion_level(prev?, curr?)
}
