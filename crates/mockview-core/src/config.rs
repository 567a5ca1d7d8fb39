//! 애플리케이션 설정 구조체.
//!
//! 샘플링 주기, 스킨/감정/모션 임계값, 경고 표시 시간과 쿨다운, 감정 히스토리
//! 용량을 정의한다. 모든 기본값은 휴리스틱의 동작 계약이므로 이름 있는 상수로 둔다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

// ============================================================
// 휴리스틱 상수
// ============================================================

/// 프레임 샘플링 주기 (밀리초)
pub const SAMPLE_INTERVAL_MS: u64 = 1_000;

/// 스킨 블록 크기 (픽셀)
pub const SKIN_BLOCK_SIZE: u32 = 20;
/// 블록을 얼굴 영역으로 판정하는 스킨 픽셀 비율
pub const SKIN_BLOCK_RATIO: f64 = 0.30;
/// 얼굴 검출 최소 스킨 픽셀 수
pub const MIN_SKIN_PIXELS: u64 = 1_000;
pub const SKIN_MIN_RED: u8 = 95;
pub const SKIN_MIN_GREEN: u8 = 40;
pub const SKIN_MIN_BLUE: u8 = 20;
/// max(r,g,b) - min(r,g,b) 하한
pub const SKIN_MIN_SPREAD: u8 = 15;
/// |r - g| 하한
pub const SKIN_MIN_RED_GREEN_GAP: u8 = 15;

pub const HAPPY_MIN_SMILE: f64 = 0.15;
pub const HAPPY_MIN_MOUTH_OPEN: f64 = 1.2;
pub const SAD_MAX_SMILE: f64 = 0.08;
pub const SAD_MAX_EYEBROW: f64 = 0.1;
pub const ANGRY_MIN_EYEBROW: f64 = 0.2;
pub const ANGRY_MAX_MOUTH_OPEN: f64 = 0.8;
pub const SURPRISED_MIN_MOUTH_OPEN: f64 = 2.0;

/// 움직임 경고 모션 레벨 임계값 (해상도 비정규화)
pub const MOVEMENT_THRESHOLD: u64 = 5_000;
pub const MOVEMENT_DISPLAY_MS: u64 = 15_000;
/// 다수 인물 경고 얼굴 영역 블록 수 임계값
pub const FACE_REGION_THRESHOLD: u32 = 12;
pub const MULTIPLE_PERSON_COOLDOWN_MS: u64 = 60_000;
pub const TAB_SWITCH_DISPLAY_MS: u64 = 10_000;

pub const HISTORY_CAPACITY: usize = 30;
pub const HISTORY_THROTTLE_MS: u64 = 3_000;

/// 밀리초 설정값 상한 (24시간)
pub const MAX_DURATION_MS: u64 = 86_400_000;
/// 감정 히스토리 용량 상한
pub const MAX_HISTORY_CAPACITY: usize = 10_000;
/// 이벤트/신호 채널 용량 상한
pub const MAX_CHANNEL_CAPACITY: usize = 65_536;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 프레임 샘플러 설정
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// 스킨 검출 / 감정 분류 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 경고 정책 설정
    #[serde(default)]
    pub alerts: AlertConfig,
    /// 감정 히스토리 설정
    #[serde(default)]
    pub history: HistoryConfig,
}

// ============================================================
// 샘플러 설정
// ============================================================

/// 프레임 샘플러 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// 샘플링 주기 (밀리초)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// 재생할 이미지 시퀀스 디렉토리 (None이면 CLI 인자 필요)
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,
    /// 시퀀스 끝에서 처음으로 되감기
    #[serde(default)]
    pub loop_frames: bool,
    /// 분석 이벤트 브로드캐스트 용량
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// 모니터링 신호 채널 용량
    #[serde(default = "default_signal_capacity")]
    pub signal_capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            frames_dir: None,
            loop_frames: false,
            event_capacity: default_event_capacity(),
            signal_capacity: default_signal_capacity(),
        }
    }
}

impl SamplerConfig {
    /// 샘플링 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ============================================================
// 분석 설정
// ============================================================

/// 스킨 톤 판정 임계값
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkinThresholds {
    #[serde(default = "default_min_red")]
    pub min_red: u8,
    #[serde(default = "default_min_green")]
    pub min_green: u8,
    #[serde(default = "default_min_blue")]
    pub min_blue: u8,
    #[serde(default = "default_min_spread")]
    pub min_spread: u8,
    #[serde(default = "default_min_red_green_gap")]
    pub min_red_green_gap: u8,
}

impl Default for SkinThresholds {
    fn default() -> Self {
        Self {
            min_red: SKIN_MIN_RED,
            min_green: SKIN_MIN_GREEN,
            min_blue: SKIN_MIN_BLUE,
            min_spread: SKIN_MIN_SPREAD,
            min_red_green_gap: SKIN_MIN_RED_GREEN_GAP,
        }
    }
}

/// 감정 분류 임계값 (보정 데이터 없이 경험적으로 정한 값)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionThresholds {
    #[serde(default = "default_happy_min_smile")]
    pub happy_min_smile: f64,
    #[serde(default = "default_happy_min_mouth_open")]
    pub happy_min_mouth_open: f64,
    #[serde(default = "default_sad_max_smile")]
    pub sad_max_smile: f64,
    #[serde(default = "default_sad_max_eyebrow")]
    pub sad_max_eyebrow: f64,
    #[serde(default = "default_angry_min_eyebrow")]
    pub angry_min_eyebrow: f64,
    #[serde(default = "default_angry_max_mouth_open")]
    pub angry_max_mouth_open: f64,
    #[serde(default = "default_surprised_min_mouth_open")]
    pub surprised_min_mouth_open: f64,
}

impl Default for EmotionThresholds {
    fn default() -> Self {
        Self {
            happy_min_smile: HAPPY_MIN_SMILE,
            happy_min_mouth_open: HAPPY_MIN_MOUTH_OPEN,
            sad_max_smile: SAD_MAX_SMILE,
            sad_max_eyebrow: SAD_MAX_EYEBROW,
            angry_min_eyebrow: ANGRY_MIN_EYEBROW,
            angry_max_mouth_open: ANGRY_MAX_MOUTH_OPEN,
            surprised_min_mouth_open: SURPRISED_MIN_MOUTH_OPEN,
        }
    }
}

/// 스킨 검출 / 감정 분류 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// 블록 크기 (픽셀)
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    /// 얼굴 영역 블록 판정 비율
    #[serde(default = "default_block_skin_ratio")]
    pub block_skin_ratio: f64,
    /// 얼굴 검출 최소 스킨 픽셀 수
    #[serde(default = "default_min_skin_pixels")]
    pub min_skin_pixels: u64,
    #[serde(default)]
    pub skin: SkinThresholds,
    #[serde(default)]
    pub emotion: EmotionThresholds,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            block_skin_ratio: default_block_skin_ratio(),
            min_skin_pixels: default_min_skin_pixels(),
            skin: SkinThresholds::default(),
            emotion: EmotionThresholds::default(),
        }
    }
}

// ============================================================
// 경고 설정
// ============================================================

/// 경고 정책 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// 움직임 경고 모션 레벨 임계값
    #[serde(default = "default_movement_threshold")]
    pub movement_threshold: u64,
    /// 움직임 경고 표시 시간 (밀리초)
    #[serde(default = "default_movement_display_ms")]
    pub movement_display_ms: u64,
    /// 다수 인물 검출 활성화 (얼굴 하나가 가까우면 오탐하므로 기본 꺼짐)
    #[serde(default)]
    pub multiple_person_enabled: bool,
    /// 다수 인물 판정 얼굴 영역 블록 수
    #[serde(default = "default_face_region_threshold")]
    pub face_region_threshold: u32,
    /// 다수 인물 경고 재발동 쿨다운 (밀리초)
    #[serde(default = "default_multiple_person_cooldown_ms")]
    pub multiple_person_cooldown_ms: u64,
    /// 탭 전환 경고 표시 시간 (밀리초)
    #[serde(default = "default_tab_switch_display_ms")]
    pub tab_switch_display_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            movement_threshold: default_movement_threshold(),
            movement_display_ms: default_movement_display_ms(),
            multiple_person_enabled: false,
            face_region_threshold: default_face_region_threshold(),
            multiple_person_cooldown_ms: default_multiple_person_cooldown_ms(),
            tab_switch_display_ms: default_tab_switch_display_ms(),
        }
    }
}

/// 감정 히스토리 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// 최대 항목 수 (FIFO 제거)
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
    /// 항목 간 최소 간격 (밀리초)
    #[serde(default = "default_history_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
            throttle_ms: default_history_throttle_ms(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 샘플링 주기를 Duration으로 반환
    pub fn sample_interval(&self) -> Duration {
        self.sampler.interval()
    }

    /// 루프를 멈추게 하거나 시각 계산을 넘치게 하는 값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let durations = [
            ("sampler.interval_ms", self.sampler.interval_ms),
            ("alerts.movement_display_ms", self.alerts.movement_display_ms),
            (
                "alerts.multiple_person_cooldown_ms",
                self.alerts.multiple_person_cooldown_ms,
            ),
            ("alerts.tab_switch_display_ms", self.alerts.tab_switch_display_ms),
            ("history.throttle_ms", self.history.throttle_ms),
        ];
        for (field, ms) in durations {
            if ms > MAX_DURATION_MS {
                return Err(invalid(field, "24시간(86400000ms) 이하여야 함"));
            }
        }
        if self.sampler.interval_ms == 0 {
            return Err(invalid("sampler.interval_ms", "0보다 커야 함"));
        }

        let capacities = [
            ("sampler.event_capacity", self.sampler.event_capacity),
            ("sampler.signal_capacity", self.sampler.signal_capacity),
        ];
        for (field, capacity) in capacities {
            if capacity == 0 || capacity > MAX_CHANNEL_CAPACITY {
                return Err(invalid(field, "1 ~ 65536 범위여야 함"));
            }
        }

        if self.analysis.block_size == 0 {
            return Err(invalid("analysis.block_size", "0보다 커야 함"));
        }
        if !(0.0..=1.0).contains(&self.analysis.block_skin_ratio) {
            return Err(invalid("analysis.block_skin_ratio", "0.0 ~ 1.0 범위여야 함"));
        }
        if self.history.capacity == 0 || self.history.capacity > MAX_HISTORY_CAPACITY {
            return Err(invalid("history.capacity", "1 ~ 10000 범위여야 함"));
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> CoreError {
    CoreError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_interval_ms() -> u64 {
    SAMPLE_INTERVAL_MS
}
fn default_event_capacity() -> usize {
    128
}
fn default_signal_capacity() -> usize {
    32
}
fn default_block_size() -> u32 {
    SKIN_BLOCK_SIZE
}
fn default_block_skin_ratio() -> f64 {
    SKIN_BLOCK_RATIO
}
fn default_min_skin_pixels() -> u64 {
    MIN_SKIN_PIXELS
}
fn default_min_red() -> u8 {
    SKIN_MIN_RED
}
fn default_min_green() -> u8 {
    SKIN_MIN_GREEN
}
fn default_min_blue() -> u8 {
    SKIN_MIN_BLUE
}
fn default_min_spread() -> u8 {
    SKIN_MIN_SPREAD
}
fn default_min_red_green_gap() -> u8 {
    SKIN_MIN_RED_GREEN_GAP
}
fn default_happy_min_smile() -> f64 {
    HAPPY_MIN_SMILE
}
fn default_happy_min_mouth_open() -> f64 {
    HAPPY_MIN_MOUTH_OPEN
}
fn default_sad_max_smile() -> f64 {
    SAD_MAX_SMILE
}
fn default_sad_max_eyebrow() -> f64 {
    SAD_MAX_EYEBROW
}
fn default_angry_min_eyebrow() -> f64 {
    ANGRY_MIN_EYEBROW
}
fn default_angry_max_mouth_open() -> f64 {
    ANGRY_MAX_MOUTH_OPEN
}
fn default_surprised_min_mouth_open() -> f64 {
    SURPRISED_MIN_MOUTH_OPEN
}
fn default_movement_threshold() -> u64 {
    MOVEMENT_THRESHOLD
}
fn default_movement_display_ms() -> u64 {
    MOVEMENT_DISPLAY_MS
}
fn default_face_region_threshold() -> u32 {
    FACE_REGION_THRESHOLD
}
fn default_multiple_person_cooldown_ms() -> u64 {
    MULTIPLE_PERSON_COOLDOWN_MS
}
fn default_tab_switch_display_ms() -> u64 {
    TAB_SWITCH_DISPLAY_MS
}
fn default_history_capacity() -> usize {
    HISTORY_CAPACITY
}
fn default_history_throttle_ms() -> u64 {
    HISTORY_THROTTLE_MS
}
