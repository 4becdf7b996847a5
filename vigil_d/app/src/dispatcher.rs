use std::time::{Duration, Instant};

use anyhow::Result;
use common::{AlertAdapter, AlertEvent, AlertLevel, Assessment};

use crate::sinks::AlertBackend;

/// Per-level cooldown so an alerting condition held across frames does
/// not fire on every single frame at capture rate.
pub struct AlertGovernor {
    cooldown: Duration,
    last_emitted: [Option<Instant>; 3],
}

impl AlertGovernor {
    pub fn new(cooldown_secs: f32) -> Self {
        Self {
            cooldown: Duration::from_secs_f32(cooldown_secs.max(0.0)),
            last_emitted: [None; 3],
        }
    }

    fn slot(level: AlertLevel) -> usize {
        match level {
            AlertLevel::Standard => 0,
            AlertLevel::Warning => 1,
            AlertLevel::Critical => 2,
        }
    }

    pub fn permit(&mut self, level: AlertLevel) -> bool {
        self.permit_at(level, Instant::now())
    }

    pub fn permit_at(&mut self, level: AlertLevel, now: Instant) -> bool {
        let slot = Self::slot(level);
        match self.last_emitted[slot] {
            Some(last) if now.duration_since(last) < self.cooldown => false,
            _ => {
                self.last_emitted[slot] = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_emitted = [None; 3];
    }
}

pub struct Dispatcher {
    backend: AlertBackend,
    governor: AlertGovernor,
}

impl Dispatcher {
    pub fn new(backend: AlertBackend, cooldown_secs: f32) -> Self {
        Self {
            backend,
            governor: AlertGovernor::new(cooldown_secs),
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.backend.initialize()
    }

    /// Emits at most one alert per call, subject to the cooldown.
    /// Returns the event that went out, if any.
    pub fn dispatch(&mut self, assessment: &Assessment) -> Result<Option<AlertEvent>> {
        let Some(level) = assessment.alert else {
            return Ok(None);
        };
        if !self.governor.permit(level) {
            return Ok(None);
        }

        let event = AlertEvent::new(level, assessment.status);
        self.backend.emit(&event)?;
        Ok(Some(event))
    }

    pub fn reset(&mut self) {
        self.governor.reset();
    }
}
