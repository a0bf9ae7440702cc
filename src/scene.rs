// Copyright (c) 2026 rezky_nightky

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    input::{InputState, Intent},
    particles::{ParticleSystem, DEFAULT_DROPS},
    player::{PlayerAvatar, Pose},
    runtime::Viewport,
    weather::{WeatherEngine, WeatherPhase, WeatherReport, WeatherRules},
};

/// Backdrop scroll per step, per unit of intent.
pub const BG_SCROLL: f32 = 3.0;
/// One dash plus its gap on the ground line.
pub const GROUND_DASH_PERIOD: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    pub rules: WeatherRules,
    pub drops: usize,
    pub hold_steps: Option<u32>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            rules: WeatherRules::default(),
            drops: DEFAULT_DROPS,
            hold_steps: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub steps: u64,
    pub rain_starts: u64,
    pub clears: u64,
    pub rainbow_steps: u64,
}

/// Everything the update step mutates, owned in one place.
pub struct Scene {
    config: SceneConfig,
    viewport: Viewport,
    input: InputState,
    player: PlayerAvatar,
    weather: WeatherEngine,
    particles: ParticleSystem,
    bg_offset: f32,
    rng: StdRng,
    paused: bool,
    last_report: WeatherReport,
    stats: SceneStats,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: Viewport, seed: u64) -> Self {
        let mut player = PlayerAvatar::new();
        player.clamp_to(viewport.width());
        Self {
            config,
            viewport,
            input: InputState::new(config.hold_steps),
            player,
            weather: WeatherEngine::new(config.rules),
            particles: ParticleSystem::new(),
            bg_offset: 0.0,
            rng: StdRng::seed_from_u64(seed),
            paused: false,
            last_report: WeatherReport::default(),
            stats: SceneStats::default(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn intent(&self) -> Intent {
        self.input.intent()
    }

    pub fn player(&self) -> &PlayerAvatar {
        &self.player
    }

    pub fn pose(&self) -> Pose {
        self.player.pose(self.input.intent())
    }

    pub fn weather(&self) -> &WeatherEngine {
        &self.weather
    }

    pub fn phase(&self) -> WeatherPhase {
        self.weather.phase()
    }

    pub fn rainbow(&self) -> bool {
        self.weather.rainbow()
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn bg_offset(&self) -> f32 {
        self.bg_offset
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Back to the opening state: clear sky, player at the start, pool
    /// emptied. The random stream carries on so a reset replays differently.
    pub fn reset(&mut self) {
        self.input = InputState::new(self.config.hold_steps);
        self.player = PlayerAvatar::new();
        self.player.clamp_to(self.viewport.width());
        self.weather = WeatherEngine::new(self.config.rules);
        self.particles = ParticleSystem::new();
        self.bg_offset = 0.0;
        self.last_report = WeatherReport::default();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.clamp_to(viewport.width());
        self.particles.set_bounds(viewport.height());
    }

    /// One update step: player, backdrop, weather, then the rain.
    pub fn step(&mut self) -> WeatherReport {
        if self.paused {
            return self.last_report;
        }

        let intent = self.input.intent();
        let width = self.viewport.width();

        self.player.step(intent, width);
        self.bg_offset = (self.bg_offset + intent.dx() * BG_SCROLL).rem_euclid(GROUND_DASH_PERIOD);

        let report = self.weather.advance(intent, self.player.x(), width);
        if report.rain_started {
            self.particles.spawn_all(
                self.config.drops,
                width,
                self.viewport.height(),
                &mut self.rng,
            );
            self.stats.rain_starts += 1;
        }
        if report.cleared {
            self.stats.clears += 1;
        }
        if report.rainbow {
            self.stats.rainbow_steps += 1;
        }

        // The pool freezes while the sky is clear.
        if report.phase == WeatherPhase::Raining {
            self.particles.tick();
        }

        self.input.tick();
        self.stats.steps += 1;
        self.last_report = report;
        report
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut PlayerAvatar {
        &mut self.player
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::player::MARGIN;

    fn scene() -> Scene {
        Scene::new(SceneConfig::default(), Viewport::new(80, 30), 0x5eed)
    }

    fn run_idle(scene: &mut Scene, steps: usize) {
        for _ in 0..steps {
            scene.step();
        }
    }

    #[test]
    fn sixty_one_idle_steps_bring_rain_and_a_full_pool() {
        let mut s = scene();
        run_idle(&mut s, 60);
        assert_eq!(s.phase(), WeatherPhase::Clear);
        assert!(s.particles().is_empty());

        let r = s.step();
        assert!(r.rain_started);
        assert_eq!(s.phase(), WeatherPhase::Raining);
        assert_eq!(s.particles().len(), DEFAULT_DROPS);
    }

    #[test]
    fn long_rain_never_respawns_the_pool() {
        let mut s = scene();
        run_idle(&mut s, 1000);
        assert_eq!(s.particles().len(), DEFAULT_DROPS);
        assert_eq!(s.stats().rain_starts, 1);
    }

    #[test]
    fn walking_right_clears_exactly_past_the_midpoint() {
        let mut s = scene();
        run_idle(&mut s, 61);
        s.player_mut().place_at(390.0);
        s.input_mut().key_down(Intent::Right);

        let mut flipped_at = None;
        for _ in 0..4 {
            let r = s.step();
            if r.cleared {
                flipped_at = Some(s.player().x());
                break;
            }
            assert_eq!(r.phase, WeatherPhase::Raining);
            assert!(s.player().x() <= 400.0);
        }
        assert_eq!(flipped_at, Some(405.0));
        assert_eq!(s.phase(), WeatherPhase::Clear);
    }

    #[test]
    fn walking_left_of_midpoint_keeps_the_rain() {
        let mut s = scene();
        run_idle(&mut s, 61);
        s.input_mut().key_down(Intent::Left);
        run_idle(&mut s, 30);
        assert_eq!(s.phase(), WeatherPhase::Raining);
        assert_eq!(s.weather().idle_steps(), 0);
    }

    #[test]
    fn rain_returns_after_another_idle_spell() {
        let mut s = scene();
        run_idle(&mut s, 61);
        s.player_mut().place_at(600.0);
        s.input_mut().key_down(Intent::Right);
        s.step();
        assert_eq!(s.phase(), WeatherPhase::Clear);

        s.input_mut().key_up();
        run_idle(&mut s, 61);
        assert_eq!(s.phase(), WeatherPhase::Raining);
        assert_eq!(s.stats().rain_starts, 2);
        assert_eq!(s.particles().len(), DEFAULT_DROPS);
    }

    #[test]
    fn pause_freezes_everything() {
        let mut s = scene();
        run_idle(&mut s, 10);
        s.toggle_pause();
        run_idle(&mut s, 100);
        assert_eq!(s.weather().idle_steps(), 10);
        assert_eq!(s.stats().steps, 10);
        s.toggle_pause();
        s.step();
        assert_eq!(s.weather().idle_steps(), 11);
    }

    #[test]
    fn backdrop_scrolls_with_intent_and_wraps() {
        let mut s = scene();
        s.input_mut().key_down(Intent::Right);
        s.step();
        assert_eq!(s.bg_offset(), BG_SCROLL);
        s.input_mut().key_down(Intent::Left);
        s.step();
        s.step();
        assert!((s.bg_offset() - (GROUND_DASH_PERIOD - BG_SCROLL)).abs() < 1e-4);
    }

    #[test]
    fn reset_restores_the_opening_state() {
        let mut s = scene();
        run_idle(&mut s, 80);
        s.reset();
        assert_eq!(s.phase(), WeatherPhase::Clear);
        assert!(s.particles().is_empty());
        assert_eq!(s.weather().idle_steps(), 0);
        assert_eq!(s.player().x(), crate::player::START_X);
    }

    #[test]
    fn resize_keeps_the_player_inside() {
        let mut s = scene();
        s.player_mut().place_at(750.0);
        s.resize(Viewport::new(40, 20));
        assert_eq!(s.player().x(), 400.0 - MARGIN);
    }

    #[test]
    fn key_hold_window_stops_the_walk() {
        let config = SceneConfig {
            hold_steps: Some(3),
            ..SceneConfig::default()
        };
        let mut s = Scene::new(config, Viewport::new(80, 30), 1);
        s.input_mut().key_down(Intent::Right);
        run_idle(&mut s, 10);
        assert_eq!(s.player().x(), 100.0 + 4.0 * 5.0);
        assert_eq!(s.intent(), Intent::Idle);
    }

    proptest! {
        #[test]
        fn idle_counter_tracks_intent(moves in prop::collection::vec(-1i32..=1, 1..300)) {
            let mut s = scene();
            let mut expected = 0u32;
            for m in moves {
                let intent = Intent::from_delta(m);
                if intent.is_idle() {
                    s.input_mut().key_up();
                    expected += 1;
                } else {
                    s.input_mut().key_down(intent);
                    expected = 0;
                }
                s.step();
                prop_assert_eq!(s.weather().idle_steps(), expected);
                let x = s.player().x();
                prop_assert!(x >= MARGIN && x <= s.viewport().width() - MARGIN);
            }
        }
    }
}
