//! Fallback state machine.

use std::time::{Duration, Instant};

use super::presentation::StaticPresentation;
use super::FallbackReason;
use crate::capability::CapabilityProfile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackState {
    /// Probing and building; nothing presented yet
    Detecting,
    Live3D,
    /// Terminal for the session
    StaticFallback(FallbackReason),
}

/// A state change the caller must act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The scene finished building and survived the grace period
    Ready,
    Fallback(FallbackReason),
}

pub struct FallbackController {
    state: FallbackState,
    started_at: Option<Instant>,
    /// Set while the load clock is paused
    paused_at: Option<Instant>,
    built_at: Option<Instant>,
    grace_period: Duration,
    load_timeout: Duration,
    presentation: StaticPresentation,
}

impl FallbackController {
    pub fn new(grace_period: Duration, load_timeout: Duration, presentation: StaticPresentation) -> Self {
        Self {
            state: FallbackState::Detecting,
            started_at: None,
            paused_at: None,
            built_at: None,
            grace_period,
            load_timeout,
            presentation,
        }
    }

    pub fn state(&self) -> FallbackState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == FallbackState::Live3D
    }

    pub fn is_static(&self) -> bool {
        matches!(self.state, FallbackState::StaticFallback(_))
    }

    pub fn reason(&self) -> Option<FallbackReason> {
        match self.state {
            FallbackState::StaticFallback(reason) => Some(reason),
            _ => None,
        }
    }

    /// The static view, once in fallback.
    pub fn presentation(&self) -> Option<&StaticPresentation> {
        self.is_static().then_some(&self.presentation)
    }

    /// Start detection with the mount-time profile. A capability shortfall
    /// falls back immediately, before any frame is scheduled.
    pub fn begin(&mut self, profile: &CapabilityProfile, now: Instant) -> Option<Transition> {
        if self.state != FallbackState::Detecting {
            return None;
        }
        self.started_at = Some(now);
        profile.shortfall().and_then(|reason| self.enter_fallback(reason))
    }

    /// The initial build finished; the grace period starts now.
    pub fn on_build_complete(&mut self, now: Instant) {
        if self.state == FallbackState::Detecting && self.built_at.is_none() {
            self.built_at = Some(now);
        }
    }

    /// Called after every successfully rendered frame.
    pub fn on_frame(&mut self, now: Instant) -> Option<Transition> {
        if self.state != FallbackState::Detecting {
            return None;
        }
        let built_at = self.built_at?;
        if now.saturating_duration_since(built_at) >= self.grace_period {
            self.state = FallbackState::Live3D;
            log::info!("Scene live after {:?} grace period", self.grace_period);
            return Some(Transition::Ready);
        }
        None
    }

    /// Report a failure from anywhere in the live scene.
    pub fn on_error(&mut self, reason: FallbackReason) -> Option<Transition> {
        self.enter_fallback(reason)
    }

    /// Stop the load clock while the page is hidden and the build cannot
    /// advance.
    pub fn pause(&mut self, now: Instant) {
        if self.state == FallbackState::Detecting && self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Restart the load clock; hidden time does not count toward the timeout.
    pub fn resume(&mut self, now: Instant) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        if let Some(started_at) = self.started_at.as_mut() {
            *started_at += now.saturating_duration_since(paused_at);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Fall back if the initial build has not completed within the load
    /// timeout, not counting paused time.
    pub fn check_timeout(&mut self, now: Instant) -> Option<Transition> {
        if self.state != FallbackState::Detecting || self.built_at.is_some() || self.paused_at.is_some() {
            return None;
        }
        let started_at = self.started_at?;
        if now.saturating_duration_since(started_at) >= self.load_timeout {
            return self.enter_fallback(FallbackReason::Timeout);
        }
        None
    }

    fn enter_fallback(&mut self, reason: FallbackReason) -> Option<Transition> {
        if self.is_static() {
            return None;
        }
        log::warn!("Falling back to static presentation: {}", reason);
        self.state = FallbackState::StaticFallback(reason);
        self.presentation.reason = Some(reason);
        Some(Transition::Fallback(reason))
    }
}
