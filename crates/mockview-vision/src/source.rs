//! 비디오 소스 구현.
//!
//! - `ImageSequenceSource`: 디렉토리의 이미지 파일을 이름 순으로 재생 (녹화 면접 재생)
//! - `StaticSource`: 같은 프레임을 반복 공급 (테스트, 데모)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::DynamicImage;
use mockview_core::error::CoreError;
use mockview_core::models::frame::Frame;
use mockview_core::ports::video::VideoSource;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// 지원 확장자 (소문자)
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// `DynamicImage` → RGBA8 프레임
pub fn frame_from_image(image: &DynamicImage, captured_at: DateTime<Utc>) -> Result<Frame, CoreError> {
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    Frame::new(w, h, rgba.into_raw(), captured_at)
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 디렉토리의 이미지 파일 목록 (파일명 정렬)
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, CoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        CoreError::DeviceUnavailable(format!("프레임 디렉토리 열기 실패 {}: {e}", dir.display()))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// 이미지 시퀀스 소스
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    cursor: usize,
    loop_frames: bool,
    ready: bool,
}

impl ImageSequenceSource {
    pub fn new(dir: impl Into<PathBuf>, loop_frames: bool) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            cursor: 0,
            loop_frames,
            ready: false,
        }
    }

    /// 획득된 프레임 파일 수
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn next_path(&mut self) -> Result<PathBuf, CoreError> {
        if self.cursor >= self.files.len() {
            if !self.loop_frames || self.files.is_empty() {
                return Err(CoreError::SourceExhausted);
            }
            debug!("프레임 시퀀스 처음부터 반복");
            self.cursor = 0;
        }
        let path = self.files[self.cursor].clone();
        self.cursor += 1;
        Ok(path)
    }
}

#[async_trait]
impl VideoSource for ImageSequenceSource {
    async fn acquire(&mut self) -> Result<(), CoreError> {
        let files = list_frames(&self.dir)?;
        if files.is_empty() {
            return Err(CoreError::DeviceUnavailable(format!(
                "프레임 이미지 없음: {}",
                self.dir.display()
            )));
        }

        info!(
            "이미지 시퀀스 소스 획득: {} ({}개, 반복 {})",
            self.dir.display(),
            files.len(),
            self.loop_frames
        );
        self.files = files;
        self.cursor = 0;
        self.ready = true;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    async fn grab_frame(&mut self) -> Result<Frame, CoreError> {
        if !self.ready {
            return Err(CoreError::DeviceUnavailable(
                "이미지 시퀀스 소스가 획득되지 않음".to_string(),
            ));
        }

        let path = self.next_path()?;
        let captured_at = Utc::now();

        // 디코딩은 블로킹 작업 → 별도 스레드
        let decoded = tokio::task::spawn_blocking(move || {
            image::open(&path).map_err(|e| CoreError::Decode(format!("{}: {e}", path.display())))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("디코딩 태스크 실패: {e}")))??;

        frame_from_image(&decoded, captured_at)
    }

    async fn release(&mut self) {
        if self.ready {
            info!("이미지 시퀀스 소스 해제: {}", self.dir.display());
        }
        self.ready = false;
        self.files.clear();
        self.cursor = 0;
    }
}

/// 정적 프레임 소스
///
/// 매 캡처마다 같은 래스터에 현재 시각을 찍어 돌려준다.
pub struct StaticSource {
    frame: Frame,
    available: bool,
    warmup: Duration,
    acquired_at: Option<Instant>,
    remaining: Option<usize>,
    released: Arc<AtomicBool>,
}

impl StaticSource {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            available: true,
            warmup: Duration::ZERO,
            acquired_at: None,
            remaining: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 획득이 항상 실패하는 소스 (권한 거부, 장치 없음)
    pub fn unavailable(frame: Frame) -> Self {
        Self {
            available: false,
            ..Self::new(frame)
        }
    }

    /// 획득 후 준비까지 걸리는 시간 (준비 전 틱은 건너뛰어짐)
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// 지정 횟수 공급 후 `SourceExhausted`
    pub fn with_limit(mut self, frames: usize) -> Self {
        self.remaining = Some(frames);
        self
    }

    /// 해제 여부 확인용 플래그
    pub fn released_flag(&self) -> Arc<AtomicBool> {
        self.released.clone()
    }
}

#[async_trait]
impl VideoSource for StaticSource {
    async fn acquire(&mut self) -> Result<(), CoreError> {
        if !self.available {
            return Err(CoreError::DeviceUnavailable(
                "카메라 권한이 거부되었거나 장치가 없음".to_string(),
            ));
        }
        self.acquired_at = Some(Instant::now());
        self.released.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.acquired_at
            .is_some_and(|at| at.elapsed() >= self.warmup)
    }

    async fn grab_frame(&mut self) -> Result<Frame, CoreError> {
        if !self.is_ready() {
            return Err(CoreError::DeviceUnavailable("정적 소스 준비 안 됨".to_string()));
        }
        if let Some(remaining) = self.remaining.as_mut() {
            if *remaining == 0 {
                return Err(CoreError::SourceExhausted);
            }
            *remaining -= 1;
        }
        Ok(self.frame.with_timestamp(Utc::now()))
    }

    async fn release(&mut self) {
        self.acquired_at = None;
        self.released.store(true, Ordering::SeqCst);
    }
}
