// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

type Rgb = (u8, u8, u8);

const BACKGROUND: Rgb = (0, 0, 0);
const STAR: Rgb = (255, 255, 255);
const GROUND: Rgb = (0, 255, 255);
const PLAYER_CLEAR: Rgb = (255, 0, 255);
const PLAYER_RAIN: Rgb = (0, 255, 255);
// 70% cyan over black.
const RAIN: Rgb = (0, 179, 179);
// Half-strength red, green and blue over black.
const RAINBOW_STOPS: [Rgb; 3] = [(128, 0, 0), (0, 128, 0), (0, 0, 128)];
const HUD: Rgb = (160, 160, 160);

/// Scene colours resolved for one terminal colour mode. `None` means "leave
/// the terminal's own colour".
#[derive(Clone, Debug)]
pub struct Palette {
    pub mode: ColorMode,
    pub bg: Option<Color>,
    pub star: Option<Color>,
    pub ground: Option<Color>,
    pub player_clear: Option<Color>,
    pub player_rain: Option<Color>,
    pub rain: Option<Color>,
    pub hud: Option<Color>,
}

impl Palette {
    pub fn new(mode: ColorMode, default_background: bool) -> Self {
        let bg = if default_background || mode == ColorMode::Mono {
            None
        } else {
            Some(match mode {
                ColorMode::TrueColor => resolve(mode, BACKGROUND),
                ColorMode::Color16 => Color::Black,
                _ => Color::AnsiValue(16),
            })
        };
        let fg = |rgb| (mode != ColorMode::Mono).then(|| resolve(mode, rgb));

        Self {
            mode,
            bg,
            star: fg(STAR),
            ground: fg(GROUND),
            player_clear: fg(PLAYER_CLEAR),
            player_rain: fg(PLAYER_RAIN),
            rain: fg(RAIN),
            hud: fg(HUD),
        }
    }

    /// Horizontal red -> green -> blue band, one colour per column. Empty in
    /// mono mode, where the overlay falls back to glyphs.
    pub fn rainbow(&self, cols: u16) -> Vec<Color> {
        if self.mode == ColorMode::Mono {
            return Vec::new();
        }
        gradient_from_stops(&RAINBOW_STOPS, cols as usize)
            .into_iter()
            .map(|rgb| resolve(self.mode, rgb))
            .collect()
    }
}

fn resolve(mode: ColorMode, (r, g, b): Rgb) -> Color {
    match mode {
        ColorMode::TrueColor => Color::Rgb { r, g, b },
        ColorMode::Color256 => Color::AnsiValue(rgb_to_ansi256(r, g, b)),
        ColorMode::Color16 => rgb_to_color16(r, g, b),
        ColorMode::Mono => Color::White,
    }
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let to6 = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (to6(r), to6(g), to6(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, (v, v, v))
        }
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::Red, (255, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::Blue, (0, 0, 255)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Cyan, (0, 255, 255)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::Magenta, (255, 0, 255)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::Yellow, (255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2((r, g, b), *rgb))
        .map(|(c, _)| *c)
        .unwrap_or(Color::White)
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let (a, b) = (a as f32, b as f32);
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn gradient_from_stops(stops: &[Rgb], steps: usize) -> Vec<Rgb> {
    match (stops.len(), steps) {
        (0, _) | (_, 0) => return Vec::new(),
        (1, n) => return vec![stops[0]; n],
        (_, 1) => return vec![stops[0]],
        _ => {}
    }

    let segs = stops.len() - 1;
    (0..steps)
        .map(|i| {
            let pos = (i as f32) / ((steps - 1) as f32) * segs as f32;
            let seg = (pos.floor() as usize).min(segs - 1);
            let t = pos - seg as f32;
            let (a, b) = (stops[seg], stops[seg + 1]);
            (lerp_u8(a.0, b.0, t), lerp_u8(a.1, b.1, t), lerp_u8(a.2, b.2, t))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_colors_land_in_the_cube() {
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
        assert_eq!(rgb_to_ansi256(0, 255, 255), 51);
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
    }

    #[test]
    fn greys_prefer_the_gray_ramp() {
        assert_eq!(rgb_to_ansi256(128, 128, 128), 244);
    }

    #[test]
    fn sixteen_color_mapping_picks_the_nearest() {
        assert_eq!(rgb_to_color16(250, 5, 250), Color::Magenta);
        assert_eq!(rgb_to_color16(0, 179, 179), Color::DarkCyan);
    }

    #[test]
    fn gradient_hits_every_stop() {
        let g = gradient_from_stops(&RAINBOW_STOPS, 5);
        assert_eq!(g.len(), 5);
        assert_eq!(g[0], RAINBOW_STOPS[0]);
        assert_eq!(g[2], RAINBOW_STOPS[1]);
        assert_eq!(g[4], RAINBOW_STOPS[2]);
    }

    #[test]
    fn mono_leaves_everything_to_the_terminal() {
        let p = Palette::new(ColorMode::Mono, false);
        assert!(p.bg.is_none());
        assert!(p.player_rain.is_none());
        assert!(p.rainbow(80).is_empty());
    }

    #[test]
    fn rain_and_clear_players_differ() {
        let p = Palette::new(ColorMode::TrueColor, false);
        assert_ne!(p.player_clear, p.player_rain);
        assert_eq!(p.rainbow(80).len(), 80);
        assert_eq!(p.bg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }
}
