//! 프레임 샘플러.
//!
//! 고정 주기로 `VideoSource`에서 프레임을 가져와 `SessionAnalyzer`에 넘기는
//! 취소 가능한 주기 태스크. UI 신호는 mpsc로 같은 태스크에 들어오므로
//! 분석 상태는 태스크 하나만 소유한다.

use chrono::Utc;
use mockview_core::config::SamplerConfig;
use mockview_core::error::CoreError;
use mockview_core::models::event::{AnalysisEvent, MonitorSignal};
use mockview_core::models::session::SessionReport;
use mockview_core::ports::video::VideoSource;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::analyzer::SessionAnalyzer;

/// 프레임 샘플러
pub struct FrameSampler {
    interval: Duration,
    shutdown_tx: watch::Sender<bool>,
    event_tx: broadcast::Sender<AnalysisEvent>,
    signal_tx: mpsc::Sender<MonitorSignal>,
    signal_rx: Option<mpsc::Receiver<MonitorSignal>>,
    handle: Option<JoinHandle<SessionReport>>,
}

impl FrameSampler {
    pub fn new(config: &SamplerConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(config.event_capacity.max(1));
        let (signal_tx, signal_rx) = mpsc::channel(config.signal_capacity.max(1));
        Self {
            interval: config.interval(),
            shutdown_tx,
            event_tx,
            signal_tx,
            signal_rx: Some(signal_rx),
            handle: None,
        }
    }

    /// 분석 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.event_tx.subscribe()
    }

    /// UI 신호 송신기
    pub fn signals(&self) -> mpsc::Sender<MonitorSignal> {
        self.signal_tx.clone()
    }

    /// 샘플링 태스크 실행 중 여부
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 장치를 획득하고 샘플링 시작
    ///
    /// 획득 실패는 그대로 반환하고 태스크를 띄우지 않는다 (재시도 없음).
    /// 샘플러는 한 세션 전용이다. 한 번 태스크를 띄운 뒤의 호출은
    /// 소스를 건드리지 않고 `CoreError::Internal`을 반환한다.
    pub async fn start(
        &mut self,
        mut source: Box<dyn VideoSource>,
        mut analyzer: SessionAnalyzer,
    ) -> Result<(), CoreError> {
        let Some(mut signal_rx) = self.signal_rx.take() else {
            warn!("샘플러 재시작 시도: 세션 {}", analyzer.session_id());
            return Err(CoreError::Internal("샘플러 재시작 불가".to_string()));
        };

        if let Err(e) = source.acquire().await {
            warn!("비디오 장치 획득 실패: {e}");
            self.signal_rx = Some(signal_rx);
            return Err(e);
        }

        info!(
            "프레임 샘플러 시작: 세션 {}, 주기 {}ms",
            analyzer.session_id(),
            self.interval.as_millis()
        );

        let period = self.interval;
        let event_tx = self.event_tx.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        publish(&event_tx, analyzer.expire(Utc::now()));

                        if !source.is_ready() {
                            debug!("비디오 소스 준비 안 됨: 틱 건너뜀");
                            continue;
                        }

                        match source.grab_frame().await {
                            Ok(frame) => {
                                let outcome = analyzer.analyze(frame);
                                publish(&event_tx, outcome.events);
                            }
                            Err(CoreError::SourceExhausted) => {
                                info!("비디오 소스 소진: 샘플링 종료");
                                break;
                            }
                            Err(e) => {
                                warn!("프레임 캡처 실패 (틱 건너뜀): {e}");
                            }
                        }
                    }
                    Some(signal) = signal_rx.recv() => {
                        debug!("UI 신호 수신: {:?}", signal);
                        publish(&event_tx, analyzer.handle_signal(signal, Utc::now()));
                        if analyzer.camera_stopped() {
                            info!("카메라 끄기 확인: 샘플링 종료");
                            break;
                        }
                    }
                    res = shutdown_rx.changed() => {
                        if res.is_err() || *shutdown_rx.borrow() {
                            info!("프레임 샘플러 종료");
                            break;
                        }
                    }
                }
            }

            source.release().await;
            analyzer.report(Utc::now())
        });

        self.handle = Some(handle);
        Ok(())
    }

    /// 샘플링 중지 + 장치 해제, 세션 요약 반환
    ///
    /// 진행 중인 틱은 끝까지 처리된다. 두 번째 호출부터는 `None`.
    pub async fn stop(&mut self) -> Option<SessionReport> {
        let _ = self.shutdown_tx.send(true);
        self.wait().await
    }

    /// 태스크가 스스로 끝날 때까지 대기 (소스 소진, 카메라 끄기 확인)
    ///
    /// 취소 안전: select! 에서 다른 분기가 이겨도 핸들은 유지된다.
    pub async fn wait(&mut self) -> Option<SessionReport> {
        let handle = self.handle.as_mut()?;
        let result = handle.await;
        self.handle = None;

        match result {
            Ok(report) => {
                info!(
                    "세션 요약: 프레임 {}, 얼굴 {}",
                    report.frames_analyzed, report.faces_detected
                );
                Some(report)
            }
            Err(e) => {
                warn!("샘플링 태스크 비정상 종료: {e}");
                None
            }
        }
    }
}

fn publish(tx: &broadcast::Sender<AnalysisEvent>, events: Vec<AnalysisEvent>) {
    for event in events {
        // 구독자가 없으면 버림
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;
    use chrono::Utc;
    use mockview_core::config::AppConfig;
    use mockview_core::models::frame::Frame;
    use mockview_core::models::warning::{CameraDecision, WarningKind};
    use std::sync::atomic::Ordering;

    fn fast_config() -> SamplerConfig {
        SamplerConfig {
            interval_ms: 10,
            ..SamplerConfig::default()
        }
    }

    fn analyzer() -> SessionAnalyzer {
        SessionAnalyzer::with_session_id("sampler-test", &AppConfig::default(), Utc::now())
    }

    fn wall() -> Frame {
        Frame::from_pixel(40, 30, [30, 60, 120, 255], Utc::now())
    }

    #[tokio::test]
    async fn runs_until_source_exhausted() {
        let mut sampler = FrameSampler::new(&fast_config());
        let source = StaticSource::new(wall()).with_limit(3);
        let released = source.released_flag();

        sampler.start(Box::new(source), analyzer()).await.unwrap();
        let report = sampler.wait().await.unwrap();

        assert_eq!(report.frames_analyzed, 3);
        assert_eq!(report.session_id, "sampler-test");
        assert!(released.load(Ordering::SeqCst));
        assert!(!sampler.is_running());
    }

    #[tokio::test]
    async fn unavailable_device_never_starts() {
        let mut sampler = FrameSampler::new(&fast_config());
        let err = sampler
            .start(Box::new(StaticSource::unavailable(wall())), analyzer())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::DeviceUnavailable(_)));
        assert!(!sampler.is_running());
        assert!(sampler.stop().await.is_none());
    }

    #[tokio::test]
    async fn not_ready_ticks_are_skipped() {
        let mut sampler = FrameSampler::new(&fast_config());
        let source = StaticSource::new(wall()).with_warmup(Duration::from_secs(3600));
        let released = source.released_flag();

        sampler.start(Box::new(source), analyzer()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(sampler.is_running());

        let report = sampler.stop().await.unwrap();
        assert_eq!(report.frames_analyzed, 0);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let mut sampler = FrameSampler::new(&fast_config());
        sampler
            .start(Box::new(StaticSource::new(wall())), analyzer())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(sampler.stop().await.is_some());
        assert!(sampler.stop().await.is_none());
        assert!(!sampler.is_running());
    }

    #[tokio::test]
    async fn second_start_is_rejected_without_touching_source() {
        let mut sampler = FrameSampler::new(&fast_config());
        sampler
            .start(Box::new(StaticSource::new(wall()).with_limit(1)), analyzer())
            .await
            .unwrap();

        // 실행 중 재시작
        let extra = StaticSource::new(wall());
        let extra_released = extra.released_flag();
        let err = sampler
            .start(Box::new(extra), analyzer())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
        assert!(!extra_released.load(Ordering::SeqCst));

        // 종료 후 재시작
        assert!(sampler.wait().await.is_some());
        let err = sampler
            .start(Box::new(StaticSource::new(wall())), analyzer())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
        assert!(!sampler.is_running());
        assert!(sampler.wait().await.is_none());
    }

    #[tokio::test]
    async fn reset_signal_clears_active_warnings() {
        let mut sampler = FrameSampler::new(&SamplerConfig {
            interval_ms: 3_600_000,
            ..SamplerConfig::default()
        });
        let mut events = sampler.subscribe();
        let signals = sampler.signals();

        let mut config = AppConfig::default();
        config.alerts.multiple_person_enabled = true;
        let crowd = Frame::from_pixel(160, 120, [200, 120, 90, 255], Utc::now());
        let analyzer = SessionAnalyzer::with_session_id("reset-test", &config, Utc::now());

        sampler
            .start(Box::new(StaticSource::new(crowd)), analyzer)
            .await
            .unwrap();

        // interval 첫 틱은 즉시: 다수 인물 발동까지 대기 (다음 틱은 1시간 뒤)
        loop {
            match tokio::time::timeout(Duration::from_secs(5), events.recv()).await {
                Ok(Ok(AnalysisEvent::WarningRaised {
                    kind: WarningKind::MultiplePerson,
                    ..
                })) => break,
                Ok(Ok(_)) => {}
                other => panic!("이벤트 수신 실패: {other:?}"),
            }
        }

        signals.send(MonitorSignal::VisibilityHidden).await.unwrap();
        signals.send(MonitorSignal::ResetAlerts).await.unwrap();

        let mut received = Vec::new();
        while received.len() < 3 {
            match tokio::time::timeout(Duration::from_secs(5), events.recv()).await {
                Ok(Ok(event)) => received.push(event),
                other => panic!("이벤트 수신 실패: {other:?}"),
            }
        }
        let kinds: Vec<_> = received
            .iter()
            .map(|e| match e {
                AnalysisEvent::WarningRaised { kind, .. } => ("raised", *kind),
                AnalysisEvent::WarningCleared { kind, .. } => ("cleared", *kind),
                other => panic!("예상 밖 이벤트: {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("raised", WarningKind::TabSwitch),
                ("cleared", WarningKind::MultiplePerson),
                ("cleared", WarningKind::TabSwitch),
            ]
        );

        let report = sampler.stop().await.unwrap();
        assert_eq!(report.warnings_of(WarningKind::MultiplePerson), 1);
        assert_eq!(report.warnings_of(WarningKind::TabSwitch), 1);
    }

    #[tokio::test]
    async fn camera_confirm_stops_sampling() {
        let mut sampler = FrameSampler::new(&fast_config());
        let mut events = sampler.subscribe();
        let signals = sampler.signals();
        let source = StaticSource::new(wall());
        let released = source.released_flag();

        sampler.start(Box::new(source), analyzer()).await.unwrap();
        signals.send(MonitorSignal::CameraToggleOff).await.unwrap();
        signals
            .send(MonitorSignal::ResolveCameraDisable { confirm: true })
            .await
            .unwrap();

        let report = sampler.wait().await.unwrap();
        assert_eq!(report.warnings_of(WarningKind::CameraDisable), 1);
        assert!(released.load(Ordering::SeqCst));

        let mut decided = false;
        while let Ok(event) = events.try_recv() {
            if let AnalysisEvent::CameraDecided { decision, .. } = event {
                assert_eq!(decision, CameraDecision::Confirmed);
                decided = true;
            }
        }
        assert!(decided);
    }

    #[tokio::test]
    async fn publishes_motion_events() {
        let mut sampler = FrameSampler::new(&fast_config());
        let mut events = sampler.subscribe();

        sampler
            .start(Box::new(StaticSource::new(wall()).with_limit(2)), analyzer())
            .await
            .unwrap();
        sampler.wait().await.unwrap();

        let mut motion = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let AnalysisEvent::MotionMeasured { level, .. } = event {
                motion.push(level);
            }
        }
        // 첫 틱은 모션 없음
        assert_eq!(motion, vec![0]);
    }
}
