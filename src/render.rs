// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    frame::Frame,
    palette::Palette,
    player::Pose,
    runtime::{Viewport, UNITS_PER_COL, UNITS_PER_ROW},
    scene::{Scene, GROUND_DASH_PERIOD},
    weather::WeatherPhase,
};

/// Height of the ground line above the bottom edge, in logical units.
const GROUND_LIFT: f32 = 50.0;
/// The rainbow band covers this much of the top of the sky.
const RAINBOW_DEPTH: f32 = 100.0;
/// Rain streak tail, relative to its head.
const STREAK_TAIL: (f32, f32) = (3.0, 15.0);

const WALK_SPRITES: [[&str; 3]; 3] = [
    [" o ", "/|\\", "/ \\"],
    [" o ", "/|\\", " |\\"],
    [" o ", "/|\\", "/| "],
];
const SHELTER_SPRITE: [&str; 3] = [".-^-.", " o|  ", "/|\\| "];

/// Paints a [`Scene`] into a [`Frame`]: sky, stars, ground, player, rain and
/// the rainbow band, back to front.
pub struct Renderer {
    palette: Palette,
    stars: usize,
    hud: bool,
    // Separate from the scene's generator so twinkling never perturbs the
    // weather.
    rng: StdRng,
    rainbow: Vec<Color>,
}

impl Renderer {
    pub fn new(palette: Palette, stars: usize, hud: bool, seed: u64) -> Self {
        Self {
            palette,
            stars,
            hud,
            rng: StdRng::seed_from_u64(seed),
            rainbow: Vec::new(),
        }
    }

    pub fn background(&self) -> Option<Color> {
        self.palette.bg
    }

    pub fn draw(&mut self, scene: &Scene, frame: &mut Frame) {
        frame.clear_with_bg(self.palette.bg);
        let vp = scene.viewport();

        self.draw_stars(frame);
        self.draw_ground(scene, vp, frame);
        self.draw_player(scene, vp, frame);
        if scene.phase() == WeatherPhase::Raining {
            self.draw_rain(scene, vp, frame);
        }
        if scene.rainbow() {
            self.draw_rainbow(vp, frame);
        }
        if self.hud {
            self.draw_hud(scene, frame);
        }
    }

    fn draw_stars(&mut self, frame: &mut Frame) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        for _ in 0..self.stars {
            let x = self.rng.random_range(0..frame.width);
            let y = self.rng.random_range(0..frame.height);
            frame.put(x, y, '.', self.palette.star, false);
        }
    }

    fn ground_row(vp: Viewport) -> Option<u16> {
        vp.row_at(vp.height() - GROUND_LIFT)
    }

    fn draw_ground(&self, scene: &Scene, vp: Viewport, frame: &mut Frame) {
        let Some(row) = Self::ground_row(vp) else {
            return;
        };
        let offset = scene.bg_offset();
        for col in 0..frame.width {
            let u = (col as f32 * UNITS_PER_COL + offset).rem_euclid(GROUND_DASH_PERIOD);
            if u < GROUND_DASH_PERIOD / 2.0 {
                frame.put(col, row, '-', self.palette.ground, false);
            }
        }
    }

    fn draw_player(&self, scene: &Scene, vp: Viewport, frame: &mut Frame) {
        let Some(ground) = Self::ground_row(vp) else {
            return;
        };
        let Some(col) = vp.col_at(scene.player().x()) else {
            return;
        };
        let sprite: &[&str; 3] = match scene.pose() {
            Pose::Walk(i) => &WALK_SPRITES[i % WALK_SPRITES.len()],
            Pose::Sheltering => &SHELTER_SPRITE,
        };
        let fg = match scene.phase() {
            WeatherPhase::Raining => self.palette.player_rain,
            WeatherPhase::Clear => self.palette.player_clear,
        };

        let top = ground as i32 - sprite.len() as i32;
        for (i, line) in sprite.iter().enumerate() {
            let y = top + i as i32;
            if y < 0 {
                continue;
            }
            let left = col as i32 - (line.chars().count() as i32) / 2;
            frame.put_str(left, y as u16, line, fg, true, true);
        }
    }

    fn draw_rain(&self, scene: &Scene, vp: Viewport, frame: &mut Frame) {
        if scene.particles().is_empty() {
            return;
        }
        for p in scene.particles().particles() {
            for (dx, dy) in [(0.0, 0.0), STREAK_TAIL] {
                if let Some((x, y)) = vp.cell_at(p.x + dx, p.y + dy) {
                    frame.put(x, y, '|', self.palette.rain, false);
                }
            }
        }
    }

    fn draw_rainbow(&mut self, vp: Viewport, frame: &mut Frame) {
        let rows = ((RAINBOW_DEPTH / UNITS_PER_ROW).ceil() as u16).min(vp.rows);
        if self.rainbow.len() != frame.width as usize {
            self.rainbow = self.palette.rainbow(frame.width);
        }

        if self.rainbow.is_empty() {
            // No colours to tint with: mark the band's top edge instead.
            for col in 0..frame.width {
                frame.put(col, 0, '~', None, false);
            }
            return;
        }

        for row in 0..rows {
            for (col, &color) in self.rainbow.iter().enumerate() {
                frame.tint(col as u16, row, color);
            }
        }
    }

    fn draw_hud(&self, scene: &Scene, frame: &mut Frame) {
        let Some(row) = frame.height.checked_sub(1) else {
            return;
        };
        let phase = match scene.phase() {
            WeatherPhase::Clear => "clear".to_string(),
            WeatherPhase::Raining => format!("rain x{}", scene.particles().len()),
        };
        let text = format!(
            " {} | idle {} | x {:.0} | intent {:+}{}{}",
            phase,
            scene.weather().idle_steps(),
            scene.player().x(),
            scene.intent().sign(),
            if scene.rainbow() { " | rainbow" } else { "" },
            if scene.is_paused() { " | paused" } else { "" },
        );
        frame.put_str(0, row, &text, self.palette.hud, false, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Intent;
    use crate::runtime::ColorMode;
    use crate::scene::SceneConfig;

    fn setup(hud: bool) -> (Scene, Renderer, Frame) {
        let vp = Viewport::new(80, 30);
        let scene = Scene::new(SceneConfig::default(), vp, 11);
        let renderer = Renderer::new(Palette::new(ColorMode::TrueColor, false), 0, hud, 11);
        let frame = Frame::new(vp.cols, vp.rows, renderer.background());
        (scene, renderer, frame)
    }

    fn row_text(frame: &Frame, y: u16) -> String {
        frame.row(y).iter().map(|c| c.ch).collect()
    }

    #[test]
    fn ground_line_sits_fifty_units_up() {
        let (scene, mut r, mut frame) = setup(false);
        r.draw(&scene, &mut frame);
        // 30 rows = 600 units; 550 / 20 = row 27.
        assert!(row_text(&frame, 27).contains('-'));
        assert!(!row_text(&frame, 26).contains('-'));
    }

    #[test]
    fn idle_player_shelters_under_the_umbrella() {
        let (scene, mut r, mut frame) = setup(false);
        r.draw(&scene, &mut frame);
        assert!(row_text(&frame, 24).contains(".-^-."));
        let cell = frame.get(9, 25).unwrap();
        assert_eq!(cell.ch, 'o');
        assert_eq!(cell.fg, r.palette.player_clear);
    }

    #[test]
    fn walking_player_uses_walk_frames() {
        let (mut scene, mut r, mut frame) = setup(false);
        scene.input_mut().key_down(Intent::Right);
        scene.step();
        r.draw(&scene, &mut frame);
        assert!(!row_text(&frame, 24).contains(".-^-."));
        assert_eq!(frame.get(10, 25).map(|c| c.ch), Some('|'));
    }

    #[test]
    fn rain_draws_streaks_and_recolours_the_player() {
        let (mut scene, mut r, mut frame) = setup(false);
        for _ in 0..200 {
            scene.step();
        }
        r.draw(&scene, &mut frame);
        let sprite_cells = (24..=26)
            .flat_map(|y| frame.row(y)[8..=12].iter())
            .filter(|c| "o^.-/".contains(c.ch) && c.fg == r.palette.player_rain)
            .count();
        assert!(sprite_cells > 0);
        let streaks = (0..frame.height)
            .flat_map(|y| frame.row(y).iter())
            .filter(|c| c.ch == '|' && c.fg == r.palette.rain)
            .count();
        assert!(streaks > 0);
    }

    #[test]
    fn rainbow_tints_the_top_band_only() {
        let (mut scene, mut r, mut frame) = setup(false);
        for _ in 0..301 {
            scene.step();
        }
        assert!(scene.rainbow());
        r.draw(&scene, &mut frame);
        assert_ne!(frame.get(0, 0).unwrap().bg, r.palette.bg);
        assert_ne!(frame.get(79, 4).unwrap().bg, frame.get(0, 4).unwrap().bg);
        assert_eq!(frame.get(0, 5).unwrap().bg, r.palette.bg);
    }

    #[test]
    fn stars_are_sprinkled_over_the_sky() {
        let vp = Viewport::new(80, 30);
        let scene = Scene::new(SceneConfig::default(), vp, 1);
        let mut r = Renderer::new(Palette::new(ColorMode::Color256, false), 100, false, 1);
        let mut frame = Frame::new(vp.cols, vp.rows, r.background());
        r.draw(&scene, &mut frame);
        let stars = (0..frame.height)
            .flat_map(|y| frame.row(y).iter())
            .filter(|c| c.ch == '.' && c.fg == r.palette.star)
            .count();
        assert!(stars > 0);
    }

    #[test]
    fn hud_reports_the_weather() {
        let (mut scene, mut r, mut frame) = setup(true);
        for _ in 0..61 {
            scene.step();
        }
        r.draw(&scene, &mut frame);
        let hud = row_text(&frame, 29);
        assert!(hud.contains("rain"));
        assert!(hud.contains("idle 61"));
    }
}
