// Copyright (c) 2026 rezky_nightky

use crate::input::Intent;

pub const START_X: f32 = 100.0;
/// Distance the player keeps from either edge.
pub const MARGIN: f32 = 50.0;
pub const STEP: f32 = 5.0;
pub const WALK_RATE: f32 = 0.2;
pub const WALK_FRAMES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Walk(usize),
    Sheltering,
}

#[derive(Clone, Debug)]
pub struct PlayerAvatar {
    x: f32,
    walk_phase: f32,
}

impl PlayerAvatar {
    pub fn new() -> Self {
        Self {
            x: START_X,
            walk_phase: 0.0,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn step(&mut self, intent: Intent, visible_width: f32) {
        if !intent.is_idle() {
            self.walk_phase += WALK_RATE;
        }
        self.x = clamp_x(self.x + intent.dx() * STEP, visible_width);
    }

    /// Re-applies the margins after the visible area changed.
    pub fn clamp_to(&mut self, visible_width: f32) {
        self.x = clamp_x(self.x, visible_width);
    }

    pub fn pose(&self, intent: Intent) -> Pose {
        if intent.is_idle() {
            Pose::Sheltering
        } else {
            Pose::Walk(self.walk_phase.floor() as usize % WALK_FRAMES)
        }
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, x: f32) {
        self.x = x;
    }
}

impl Default for PlayerAvatar {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_x(x: f32, visible_width: f32) -> f32 {
    let right = visible_width - MARGIN;
    debug_assert!(right >= MARGIN, "visible width {visible_width} leaves no room to walk");
    if right < MARGIN {
        return MARGIN;
    }
    x.clamp(MARGIN, right)
}
