//! 얼굴 분석 모델.
//!
//! 랜드마크는 실제 검출 결과가 아니라 얼굴 박스 비율로 만든 근사값이다.
//! 메트릭/감정 라벨은 그 근사값에서 결정적으로 유도된다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 2D 좌표 (프레임 픽셀 단위)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 유클리드 거리
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// 랜드마크 식별자 (고정 8개)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkPoint {
    LeftMouthCorner,
    RightMouthCorner,
    TopLip,
    BottomLip,
    LeftBrow,
    RightBrow,
    LeftEye,
    RightEye,
}

impl LandmarkPoint {
    /// 전체 식별자 (선언 순서)
    pub const ALL: [LandmarkPoint; 8] = [
        LandmarkPoint::LeftMouthCorner,
        LandmarkPoint::RightMouthCorner,
        LandmarkPoint::TopLip,
        LandmarkPoint::BottomLip,
        LandmarkPoint::LeftBrow,
        LandmarkPoint::RightBrow,
        LandmarkPoint::LeftEye,
        LandmarkPoint::RightEye,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// 고정 크기 랜드마크 맵
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    points: [Point; 8],
}

impl Landmarks {
    /// `LandmarkPoint::ALL` 순서의 좌표 배열로 생성
    pub fn from_points(points: [Point; 8]) -> Self {
        Self { points }
    }

    pub fn get(&self, id: LandmarkPoint) -> Point {
        self.points[id.index()]
    }

    /// (식별자, 좌표) 순회
    pub fn iter(&self) -> impl Iterator<Item = (LandmarkPoint, Point)> + '_ {
        LandmarkPoint::ALL.iter().map(|id| (*id, self.get(*id)))
    }
}

/// 랜드마크 거리 기반 정규화 비율 (소수점 2자리 반올림)
///
/// 네 필드 모두 항상 유한값이다. 입력이 퇴화하면 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacialMetrics {
    pub mouth_open: f64,
    pub eyebrow_raise: f64,
    pub smile_factor: f64,
    /// 항상 [0, 1]
    pub confidence: f64,
}

/// 감정 라벨 (닫힌 집합)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Surprised,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 5] = [
        EmotionLabel::Happy,
        EmotionLabel::Sad,
        EmotionLabel::Angry,
        EmotionLabel::Surprised,
        EmotionLabel::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "Happy",
            EmotionLabel::Sad => "Sad",
            EmotionLabel::Angry => "Angry",
            EmotionLabel::Surprised => "Surprised",
            EmotionLabel::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 감정 히스토리 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionHistoryEntry {
    pub emotion: EmotionLabel,
    pub metrics: FacialMetrics,
    pub timestamp: DateTime<Utc>,
}
