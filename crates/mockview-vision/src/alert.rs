//! 경고 정책 상태 머신.
//!
//! 유형별 상태 `Dormant → Active → (Dormant | CoolingDown)`.
//! - 움직임: 모션 임계값 초과 시 발동, 15초 후 자동 해제, 쿨다운 없음
//! - 다수 인물: 얼굴 영역 블록 수 초과 + 마지막 발동 후 60초 경과 시 발동, 확인/리셋으로만 해제
//! - 탭 전환: visibility hidden 시 발동, 10초 후 또는 닫기 시 해제
//! - 카메라 끄기: 토글 시 발동, 확인/취소로만 해제 (타임아웃 없음)
//!
//! 시각은 호출자가 넘긴다. 자동 해제는 `expire` 호출 시점에 반영된다.

use chrono::{DateTime, Utc};
use mockview_core::config::AlertConfig;
use mockview_core::models::warning::{ActiveWarning, CameraDecision, WarningKind, WarningState};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::{deadline, millis};

/// 경고 정책
#[derive(Debug, Clone)]
pub struct AlertPolicy {
    config: AlertConfig,
    movement: Option<ActiveWarning>,
    multiple_person: Option<ActiveWarning>,
    /// 다수 인물 마지막 발동 시각 (쿨다운 기준)
    last_multiple_person: Option<DateTime<Utc>>,
    tab_switch: Option<ActiveWarning>,
    camera_disable: Option<ActiveWarning>,
    /// 유형별 누적 발동 횟수
    trigger_counts: HashMap<WarningKind, u32>,
}

impl AlertPolicy {
    /// 새 정책 생성
    pub fn new(config: AlertConfig) -> Self {
        Self {
            config,
            movement: None,
            multiple_person: None,
            last_multiple_person: None,
            tab_switch: None,
            camera_disable: None,
            trigger_counts: HashMap::new(),
        }
    }

    fn slot(&self, kind: WarningKind) -> &Option<ActiveWarning> {
        match kind {
            WarningKind::Movement => &self.movement,
            WarningKind::MultiplePerson => &self.multiple_person,
            WarningKind::TabSwitch => &self.tab_switch,
            WarningKind::CameraDisable => &self.camera_disable,
        }
    }

    fn slot_mut(&mut self, kind: WarningKind) -> &mut Option<ActiveWarning> {
        match kind {
            WarningKind::Movement => &mut self.movement,
            WarningKind::MultiplePerson => &mut self.multiple_person,
            WarningKind::TabSwitch => &mut self.tab_switch,
            WarningKind::CameraDisable => &mut self.camera_disable,
        }
    }

    fn raise(&mut self, kind: WarningKind, now: DateTime<Utc>, display_ms: Option<u64>) {
        let expires_at = display_ms.map(|ms| deadline(now, ms));
        *self.slot_mut(kind) = Some(ActiveWarning {
            kind,
            raised_at: now,
            expires_at,
        });
        *self.trigger_counts.entry(kind).or_insert(0) += 1;
        info!("경고 발동: {:?}", kind);
    }

    fn clear(&mut self, kind: WarningKind) -> bool {
        let was_active = self.slot_mut(kind).take().is_some();
        if was_active {
            debug!("경고 해제: {:?}", kind);
        }
        was_active
    }

    /// 모션 레벨 반영. 새로 발동하면 `true`
    ///
    /// 이미 표시 중이면 표시 시간을 연장하지 않는다.
    pub fn observe_motion(&mut self, level: u64, now: DateTime<Utc>) -> bool {
        if level <= self.config.movement_threshold || self.movement.is_some() {
            return false;
        }
        self.raise(
            WarningKind::Movement,
            now,
            Some(self.config.movement_display_ms),
        );
        true
    }

    /// 얼굴 영역 블록 수 반영. 새로 발동하면 `true`
    pub fn observe_face_regions(&mut self, count: u32, now: DateTime<Utc>) -> bool {
        if !self.config.multiple_person_enabled
            || count <= self.config.face_region_threshold
            || self.multiple_person.is_some()
        {
            return false;
        }

        if self.in_multiple_person_cooldown(now) {
            debug!("다수 인물 경고 쿨다운 중 (블록 {count})");
            return false;
        }

        self.raise(WarningKind::MultiplePerson, now, None);
        self.last_multiple_person = Some(now);
        true
    }

    fn in_multiple_person_cooldown(&self, now: DateTime<Utc>) -> bool {
        match self.last_multiple_person {
            Some(last) => now - last < millis(self.config.multiple_person_cooldown_ms),
            None => false,
        }
    }

    /// 페이지 visibility hidden 전환. 새로 발동하면 `true`
    ///
    /// 표시 중에 다시 숨겨지면 표시 시간을 새로 시작한다.
    pub fn visibility_hidden(&mut self, now: DateTime<Utc>) -> bool {
        if let Some(active) = self.tab_switch.as_mut() {
            active.expires_at = Some(deadline(now, self.config.tab_switch_display_ms));
            return false;
        }
        self.raise(
            WarningKind::TabSwitch,
            now,
            Some(self.config.tab_switch_display_ms),
        );
        true
    }

    /// 탭 전환 경고 닫기
    pub fn dismiss_tab_switch(&mut self) -> bool {
        self.clear(WarningKind::TabSwitch)
    }

    /// 다수 인물 경고 확인 (쿨다운 기록은 유지)
    pub fn acknowledge_multiple_person(&mut self) -> bool {
        self.clear(WarningKind::MultiplePerson)
    }

    /// 카메라 끄기 요청. 확인 대화상자가 새로 열리면 `true`
    pub fn request_camera_disable(&mut self, now: DateTime<Utc>) -> bool {
        if self.camera_disable.is_some() {
            return false;
        }
        self.raise(WarningKind::CameraDisable, now, None);
        true
    }

    /// 카메라 끄기 확인/취소. 대기 중인 요청이 없으면 `None`
    pub fn resolve_camera_disable(&mut self, confirm: bool) -> Option<CameraDecision> {
        if !self.clear(WarningKind::CameraDisable) {
            return None;
        }
        let decision = if confirm {
            CameraDecision::Confirmed
        } else {
            CameraDecision::Cancelled
        };
        info!("카메라 끄기 결정: {:?}", decision);
        Some(decision)
    }

    /// 표시 시간이 지난 경고 해제. 해제된 유형 반환
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<WarningKind> {
        let mut expired = Vec::new();
        for kind in WarningKind::ALL {
            let due = self
                .slot(kind)
                .as_ref()
                .and_then(|w| w.expires_at)
                .is_some_and(|at| now >= at);
            if due {
                self.clear(kind);
                expired.push(kind);
            }
        }
        expired
    }

    /// 외부 리셋: 표시 중인 경고 모두 해제. 다수 인물 쿨다운 기록은 유지
    pub fn reset(&mut self) -> Vec<WarningKind> {
        WarningKind::ALL
            .into_iter()
            .filter(|kind| self.clear(*kind))
            .collect()
    }

    /// 유형별 현재 상태
    pub fn state(&self, kind: WarningKind, now: DateTime<Utc>) -> WarningState {
        if self.slot(kind).is_some() {
            return WarningState::Active;
        }
        if kind == WarningKind::MultiplePerson && self.in_multiple_person_cooldown(now) {
            return WarningState::CoolingDown;
        }
        WarningState::Dormant
    }

    pub fn is_active(&self, kind: WarningKind) -> bool {
        self.slot(kind).is_some()
    }

    /// 표시 중인 경고 목록 (선언 순서)
    pub fn active_warnings(&self) -> Vec<ActiveWarning> {
        WarningKind::ALL
            .into_iter()
            .filter_map(|kind| self.slot(kind).clone())
            .collect()
    }

    /// 누적 발동 횟수
    pub fn trigger_count(&self, kind: WarningKind) -> u32 {
        self.trigger_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self::new(AlertConfig::default())
    }
}
