// Copyright (c) 2026 rezky_nightky

use crate::input::Intent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WeatherPhase {
    #[default]
    Clear,
    Raining,
}

/// Idle thresholds, in update steps. Both comparisons are strict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeatherRules {
    pub rain_after: u32,
    pub rainbow_after: u32,
}

impl Default for WeatherRules {
    fn default() -> Self {
        Self {
            rain_after: 60,
            rainbow_after: 300,
        }
    }
}

/// What one call to [`WeatherEngine::advance`] produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeatherReport {
    pub phase: WeatherPhase,
    pub rainbow: bool,
    /// Set only on the step that went Clear -> Raining.
    pub rain_started: bool,
    /// Set only on the step that went Raining -> Clear.
    pub cleared: bool,
}

#[derive(Clone, Debug, Default)]
pub struct WeatherEngine {
    rules: WeatherRules,
    phase: WeatherPhase,
    idle: u32,
}

impl WeatherEngine {
    pub fn new(rules: WeatherRules) -> Self {
        Self {
            rules,
            phase: WeatherPhase::Clear,
            idle: 0,
        }
    }

    pub fn phase(&self) -> WeatherPhase {
        self.phase
    }

    pub fn idle_steps(&self) -> u32 {
        self.idle
    }

    pub fn rainbow(&self) -> bool {
        self.idle > self.rules.rainbow_after
    }

    pub fn advance(&mut self, intent: Intent, player_x: f32, visible_width: f32) -> WeatherReport {
        debug_assert!(visible_width > 0.0, "visible width must be positive");

        let mut rain_started = false;
        let mut cleared = false;

        if intent.is_idle() {
            self.idle = self.idle.saturating_add(1);
            if self.idle > self.rules.rain_after && self.phase == WeatherPhase::Clear {
                self.phase = WeatherPhase::Raining;
                rain_started = true;
            }
        } else {
            self.idle = 0;
            if self.phase == WeatherPhase::Raining && player_x > visible_width / 2.0 {
                self.phase = WeatherPhase::Clear;
                cleared = true;
            }
        }

        // Rainbow and rain are independent; a long enough wait shows both.
        WeatherReport {
            phase: self.phase,
            rainbow: self.rainbow(),
            rain_started,
            cleared,
        }
    }
}
