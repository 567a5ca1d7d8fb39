//! 감정 분류.
//!
//! 고정 임계값 규칙, 먼저 일치한 규칙이 이긴다. 보정 데이터 없이 정한 값이므로
//! 임계값 조정은 제품 판단이 필요하다.

use mockview_core::config::EmotionThresholds;
use mockview_core::models::face::{EmotionLabel, FacialMetrics};

/// 기본 임계값으로 분류
pub fn classify(metrics: &FacialMetrics) -> EmotionLabel {
    classify_with(metrics, &EmotionThresholds::default())
}

/// 지정 임계값으로 분류 (순수 함수)
pub fn classify_with(metrics: &FacialMetrics, t: &EmotionThresholds) -> EmotionLabel {
    let smile = metrics.smile_factor;
    let mouth = metrics.mouth_open;
    let brow = metrics.eyebrow_raise;

    if smile > t.happy_min_smile && mouth > t.happy_min_mouth_open {
        EmotionLabel::Happy
    } else if smile < t.sad_max_smile && brow < t.sad_max_eyebrow {
        EmotionLabel::Sad
    } else if brow > t.angry_min_eyebrow && mouth < t.angry_max_mouth_open {
        EmotionLabel::Angry
    } else if mouth > t.surprised_min_mouth_open {
        EmotionLabel::Surprised
    } else {
        EmotionLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(smile: f64, mouth: f64, brow: f64) -> FacialMetrics {
        FacialMetrics {
            mouth_open: mouth,
            eyebrow_raise: brow,
            smile_factor: smile,
            confidence: (smile + brow) * 0.5,
        }
    }

    #[test]
    fn happy_rule() {
        assert_eq!(classify(&metrics(0.2, 1.5, 0.05)), EmotionLabel::Happy);
    }

    #[test]
    fn sad_rule() {
        assert_eq!(classify(&metrics(0.05, 1.0, 0.05)), EmotionLabel::Sad);
    }

    #[test]
    fn angry_rule() {
        assert_eq!(classify(&metrics(0.1, 0.5, 0.3)), EmotionLabel::Angry);
    }

    #[test]
    fn surprised_rule() {
        // 미소가 작아 Happy 불가, 눈썹이 커 Sad 불가
        assert_eq!(classify(&metrics(0.1, 2.5, 0.15)), EmotionLabel::Surprised);
    }

    #[test]
    fn neutral_fallback() {
        assert_eq!(classify(&metrics(0.1, 1.0, 0.15)), EmotionLabel::Neutral);
    }

    #[test]
    fn first_match_wins() {
        // Happy와 Surprised 모두 만족 → Happy
        assert_eq!(classify(&metrics(0.4, 3.2, 0.4)), EmotionLabel::Happy);
        // Sad와 Surprised 모두 만족 → Sad
        assert_eq!(classify(&metrics(0.0, 2.5, 0.0)), EmotionLabel::Sad);
    }

    #[test]
    fn boundaries_are_strict() {
        // smile == 0.15 는 Happy 아님
        assert_ne!(classify(&metrics(0.15, 1.5, 0.15)), EmotionLabel::Happy);
        // mouth == 2.0 은 Surprised 아님
        assert_eq!(classify(&metrics(0.1, 2.0, 0.15)), EmotionLabel::Neutral);
    }

    #[test]
    fn classification_is_deterministic() {
        let samples = [
            metrics(0.2, 1.5, 0.05),
            metrics(0.05, 1.0, 0.05),
            metrics(0.1, 0.5, 0.3),
            metrics(0.1, 2.5, 0.15),
            metrics(0.33, 0.9, 0.12),
        ];
        for m in samples {
            let first = classify(&m);
            for _ in 0..10 {
                assert_eq!(classify(&m), first);
            }
        }
    }

    #[test]
    fn custom_thresholds() {
        let strict = EmotionThresholds {
            happy_min_smile: 0.5,
            ..EmotionThresholds::default()
        };
        let m = metrics(0.4, 3.2, 0.4);
        assert_eq!(classify_with(&m, &strict), EmotionLabel::Surprised);
    }
}
