//! 얼굴 메트릭 계산.
//!
//! 랜드마크 간 유클리드 거리로 정규화 비율을 만든다. 분모가 0이면 0을 쓴다.

use mockview_core::models::face::{FacialMetrics, LandmarkPoint, Landmarks};
use mockview_core::models::frame::FaceBox;

/// 소수점 2자리 반올림. 비유한값은 0
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// confidence = min(1, (smile + eyebrow) * 0.5)
pub fn confidence_from(smile_factor: f64, eyebrow_raise: f64) -> f64 {
    ((smile_factor + eyebrow_raise) * 0.5).min(1.0)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// 랜드마크 + 얼굴 박스 → 메트릭 (순수 함수)
pub fn compute(landmarks: &Landmarks, face: &FaceBox) -> FacialMetrics {
    let face_width = face.w as f64;

    let mouth_width = landmarks
        .get(LandmarkPoint::RightMouthCorner)
        .distance(&landmarks.get(LandmarkPoint::LeftMouthCorner));
    let lip_gap = landmarks
        .get(LandmarkPoint::TopLip)
        .distance(&landmarks.get(LandmarkPoint::BottomLip));
    let brow_span = landmarks
        .get(LandmarkPoint::RightBrow)
        .distance(&landmarks.get(LandmarkPoint::LeftBrow));

    let mouth_open = ratio(mouth_width, lip_gap);
    let eyebrow_raise = ratio(brow_span, face_width);
    let smile_factor = ratio(mouth_width, face_width);
    let confidence = confidence_from(smile_factor, eyebrow_raise);

    FacialMetrics {
        mouth_open: round2(mouth_open),
        eyebrow_raise: round2(eyebrow_raise),
        smile_factor: round2(smile_factor),
        confidence: round2(confidence),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks;

    #[test]
    fn proportional_landmarks_give_aspect_based_metrics() {
        let face = FaceBox {
            x: 0,
            y: 0,
            w: 200,
            h: 250,
        };
        let metrics = compute(&landmarks::approximate(&face), &face);

        // 입 너비 0.4w, 입술 간격 0.1h → 0.4*200 / 0.1*250 = 3.2
        assert_eq!(metrics.mouth_open, 3.2);
        assert_eq!(metrics.smile_factor, 0.4);
        assert_eq!(metrics.eyebrow_raise, 0.4);
        assert_eq!(metrics.confidence, 0.4);
    }

    #[test]
    fn degenerate_box_yields_zeros() {
        let face = FaceBox {
            x: 3,
            y: 3,
            w: 0,
            h: 0,
        };
        let metrics = compute(&landmarks::approximate(&face), &face);
        assert_eq!(metrics, FacialMetrics::default());
    }

    #[test]
    fn zero_height_only_zeros_mouth_open() {
        let face = FaceBox {
            x: 0,
            y: 0,
            w: 100,
            h: 0,
        };
        let metrics = compute(&landmarks::approximate(&face), &face);
        assert_eq!(metrics.mouth_open, 0.0);
        assert_eq!(metrics.smile_factor, 0.4);
        assert!(metrics.confidence.is_finite());
    }

    #[test]
    fn confidence_is_clamped() {
        for (smile, brow) in [(0.0, 0.0), (0.4, 0.4), (1.5, 0.9), (3.0, 7.0), (0.3, 1.7)] {
            let c = confidence_from(smile, brow);
            assert_eq!(c, ((smile + brow) * 0.5_f64).min(1.0));
            assert!((0.0..=1.0).contains(&c));
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(1.234_56), 1.23);
        assert_eq!(round2(0.005_1), 0.01);
        assert_eq!(round2(f64::NAN), 0.0);
        assert_eq!(round2(f64::INFINITY), 0.0);
    }
}
