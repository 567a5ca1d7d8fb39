//! 랜드마크 근사.
//!
//! 실제 얼굴 특징점 검출이 아니다. 얼굴 박스의 고정 비율 위치로 8개 점을 만든다.
//! 비율을 바꾸면 감정 분류 결과가 바뀌므로 관찰 가능한 동작 변경으로 취급한다.

use mockview_core::models::face::{LandmarkPoint, Landmarks, Point};
use mockview_core::models::frame::FaceBox;

/// 박스 내 (너비 비율, 높이 비율)
pub fn fraction(id: LandmarkPoint) -> (f64, f64) {
    match id {
        LandmarkPoint::LeftMouthCorner => (0.30, 0.70),
        LandmarkPoint::RightMouthCorner => (0.70, 0.70),
        LandmarkPoint::TopLip => (0.50, 0.65),
        LandmarkPoint::BottomLip => (0.50, 0.75),
        LandmarkPoint::LeftBrow => (0.30, 0.30),
        LandmarkPoint::RightBrow => (0.70, 0.30),
        LandmarkPoint::LeftEye => (0.35, 0.40),
        LandmarkPoint::RightEye => (0.65, 0.40),
    }
}

/// 얼굴 박스 → 랜드마크 (순수 함수, 항상 성공)
pub fn approximate(face: &FaceBox) -> Landmarks {
    let x = face.x as f64;
    let y = face.y as f64;
    let w = face.w as f64;
    let h = face.h as f64;

    let points = LandmarkPoint::ALL.map(|id| {
        let (fx, fy) = fraction(id);
        Point::new(x + fx * w, y + fy * h)
    });

    Landmarks::from_points(points)
}
