//! # mockview-app
//!
//! MOCKVIEW 바이너리 진입점.
//! 설정 로드, 로깅 초기화, 비디오 소스/분석기 와이어링, 세션 라이프사이클.

mod event_bus;
mod lifecycle;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use mockview_core::config::AppConfig;
use mockview_core::config_manager::ConfigManager;
use mockview_core::models::session::SessionReport;
use mockview_vision::analyzer::SessionAnalyzer;
use mockview_vision::sampler::FrameSampler;
use mockview_vision::source::ImageSequenceSource;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// MOCKVIEW 모의 면접 웹캠 분석기
///
/// 녹화된 프레임 시퀀스를 재생하며 감정/움직임/다수 인물 경고를 분석한다.
#[derive(Parser, Debug)]
#[command(name = "mockview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 프레임 이미지 디렉토리 (png/jpg/bmp, 파일명 순 재생)
    #[arg(long, short = 'f')]
    frames_dir: Option<PathBuf>,

    /// 프레임 시퀀스 반복 재생
    #[arg(long)]
    loop_frames: bool,

    /// 샘플링 간격 (밀리초)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// 세션 최대 길이 (초). 지정하지 않으면 소스 소진 또는 Ctrl+C까지
    #[arg(long)]
    duration_secs: Option<u64>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// CLI로 덮어쓴 값을 설정 파일에 저장
    #[arg(long)]
    save_config: bool,

    /// 분석 이벤트를 JSON Lines로 stdout에 출력
    #[arg(long)]
    events: bool,

    /// 세션 요약 JSON 저장 경로
    #[arg(long)]
    report_out: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 배너 출력
fn print_banner() {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║                  MOCKVIEW                    ║");
    println!("║        모의 면접 웹캠 휴리스틱 분석기        ║");
    println!("╚══════════════════════════════════════════════╝");
    println!();
}

/// 설정 관리자 열기
fn open_config(path: Option<PathBuf>) -> Option<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    match manager {
        Ok(manager) => {
            info!("설정 파일: {:?}", manager.config_path());
            Some(manager)
        }
        Err(e) => {
            warn!("설정 관리자 초기화 실패, 기본 설정 사용: {e}");
            None
        }
    }
}

/// 설정 로드 + CLI 덮어쓰기. `--save-config`이면 파일에도 반영
fn resolve_config(manager: Option<&ConfigManager>, args: &Args) -> Result<AppConfig> {
    let Some(manager) = manager else {
        if args.save_config {
            warn!("설정 관리자 없음: --save-config 무시");
        }
        let mut config = AppConfig::default_config();
        apply_overrides(&mut config, args);
        return Ok(config);
    };

    if args.save_config {
        let saved = manager
            .update_with(|c| apply_overrides(c, args))
            .context("설정 저장 실패")?;
        info!("설정 저장: {}", manager.config_path().display());
        return Ok(saved);
    }

    let mut config = manager.get();
    apply_overrides(&mut config, args);
    Ok(config)
}

/// CLI 인자로 설정 덮어쓰기
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(dir) = &args.frames_dir {
        config.sampler.frames_dir = Some(dir.clone());
    }
    if args.loop_frames {
        config.sampler.loop_frames = true;
    }
    if let Some(ms) = args.interval_ms {
        config.sampler.interval_ms = ms;
    }
}

/// 세션 요약 출력
fn print_report(report: &SessionReport) -> Result<()> {
    println!();
    println!("── 세션 요약 ({}) ──", report.session_id);
    println!("  길이          : {}초", report.duration_secs());
    println!(
        "  분석 프레임   : {} (얼굴 검출 {:.0}%)",
        report.frames_analyzed,
        report.detection_rate() * 100.0
    );
    match report.dominant_emotion {
        Some(emotion) => println!("  주요 감정     : {emotion}"),
        None => println!("  주요 감정     : -"),
    }
    println!("  평균 신뢰도   : {:.2}", report.average_confidence);
    println!("  최대 모션     : {}", report.peak_motion);
    for (kind, count) in &report.warning_counts {
        println!("  경고 {kind:<16}: {count}");
    }
    println!();
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// 세션 종료 원인
enum Ending {
    /// 소스 소진, 카메라 끄기 확인
    Finished(Option<SessionReport>),
    /// 시그널, 최대 길이 도달
    Interrupted,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // tracing 초기화
    let log_filter = format!(
        "mockview={},mockview_app={},mockview_core={},mockview_vision={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    print_banner();

    let manager = open_config(args.config.clone());
    let config = resolve_config(manager.as_ref(), &args)?;
    config.validate().context("설정 검증 실패")?;

    let frames_dir = config
        .sampler
        .frames_dir
        .clone()
        .ok_or_else(|| anyhow!("프레임 디렉토리가 지정되지 않음 (--frames-dir 또는 sampler.frames_dir)"))?;

    // ── 라이프사이클 ──
    let lifecycle = Arc::new(LifecycleManager::new());
    let mut shutdown_rx = lifecycle.subscribe();
    let signal_lifecycle = lifecycle.clone();
    tokio::spawn(async move {
        signal_lifecycle.wait_for_signal().await;
    });

    // ── 샘플러 + 이벤트 중계 ──
    let mut sampler = FrameSampler::new(&config.sampler);
    let relay_task = tokio::spawn(event_bus::relay(sampler.subscribe(), args.events));

    let source = ImageSequenceSource::new(frames_dir.clone(), config.sampler.loop_frames);
    let analyzer = SessionAnalyzer::new(&config, Utc::now());
    sampler
        .start(Box::new(source), analyzer)
        .await
        .with_context(|| format!("비디오 소스 시작 실패: {}", frames_dir.display()))?;

    info!("MOCKVIEW 세션 실행 중 (Ctrl+C로 종료)");

    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };

    let ending = tokio::select! {
        report = sampler.wait() => Ending::Finished(report),
        _ = shutdown_rx.changed() => Ending::Interrupted,
        _ = deadline => {
            info!("세션 최대 길이 도달");
            Ending::Interrupted
        }
    };

    let report = match ending {
        Ending::Finished(report) => report,
        Ending::Interrupted => sampler.stop().await,
    };

    // 송신측을 모두 닫아 중계 태스크 종료
    drop(sampler);
    match relay_task.await {
        Ok(stats) => info!(
            "이벤트 {}개 중계 (경고 {}, 유실 {})",
            stats.received, stats.warnings_raised, stats.lagged
        ),
        Err(e) => warn!("이벤트 중계 태스크 실패: {e}"),
    }

    let report = report.ok_or_else(|| anyhow!("세션 요약을 만들지 못함"))?;
    print_report(&report)?;

    if let Some(path) = &args.report_out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("세션 요약 저장 실패: {}", path.display()))?;
        info!("세션 요약 저장: {}", path.display());
    }

    info!("MOCKVIEW 종료");
    Ok(())
}
