// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod frame;
mod input;
mod palette;
mod particles;
mod player;
mod render;
mod runtime;
mod scene;
mod terminal;
mod weather;

use std::env;
use std::fmt::Display;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    color_enabled_stdout, default_params_usage_for_help, print_help_detail, Args, ColorBg,
};
use crate::frame::Frame;
use crate::palette::Palette;
use crate::render::Renderer;
use crate::runtime::{ColorMode, Viewport};
use crate::scene::{Scene, SceneConfig};
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::weather::WeatherRules;

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn build_info() -> &'static str {
    env!("RAINWALK_BUILD")
}

fn git_sha() -> &'static str {
    env!("RAINWALK_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn fail(msg: impl Display) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

fn require_f64_range(name: &str, v: f64, min: f64, max: f64) -> f64 {
    if !v.is_finite() {
        fail(format_args!(
            "failed to apply {} {} (must be a finite number)",
            name, v
        ));
    }
    require_range(name, v, min, max)
}

fn require_range<T: PartialOrd + Display + Copy>(name: &str, v: T, min: T, max: T) -> T {
    if v < min || v > max {
        fail(format_args!(
            "failed to apply {} {} (min {} max {})",
            name, v, min, max
        ));
    }
    v
}

fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

fn parse_color_mode(m: u16) -> Result<ColorMode, String> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        _ => Err(format!("invalid --colormode: {} (allowed: 0,16,8,24)", m)),
    }
}

fn detect_color_mode(args: &Args) -> ColorMode {
    match args.colormode {
        Some(m) => parse_color_mode(m).unwrap_or_else(|e| fail(e)),
        None => detect_color_mode_auto(),
    }
}

fn color_mode_label(m: ColorMode) -> &'static str {
    match m {
        ColorMode::TrueColor => "24-bit truecolor",
        ColorMode::Color256 => "8-bit (256-color)",
        ColorMode::Color16 => "16-color",
        ColorMode::Mono => "mono",
    }
}

/// Converts the key hold window to update steps at the target rate.
fn hold_steps_for(hold_ms: u32, fps: f64) -> u32 {
    ((hold_ms as f64) * fps / 1000.0).ceil().max(1.0) as u32
}

/// Returns false when the key asks to quit.
fn handle_key(scene: &mut Scene, key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Press {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => return false,
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => return false,
            (KeyCode::Char(' '), _) => {
                scene.reset();
                return true;
            }
            (KeyCode::Char('p'), _) => {
                scene.toggle_pause();
                return true;
            }
            _ => {}
        }
    }
    scene.input_mut().apply_key(key);
    true
}

fn print_bitcolor_check(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let auto = detect_color_mode_auto();
    let effective = detect_color_mode(args);
    let or_unset = |s: &str| {
        if s.is_empty() {
            "(unset)".to_string()
        } else {
            s.to_string()
        }
    };

    println!("BITCOLOR CHECK:");
    println!("  COLORTERM: {}", or_unset(&colorterm));
    println!("  TERM: {}", or_unset(&term));
    println!("  auto_detected: {}", color_mode_label(auto));
    if args.colormode.is_some() {
        println!("  forced: {}", color_mode_label(effective));
    }
    println!("  effective: {}", color_mode_label(effective));
}

#[derive(Default)]
struct PerfStats {
    frames: u64,
    drawn_frames: u64,
    work_sum_s: f64,
    work_max_s: f32,
    overshoot_frames: u64,
}

impl PerfStats {
    fn record(&mut self, work_s: f32, did_draw: bool, overshoot: bool) {
        self.frames = self.frames.saturating_add(1);
        if did_draw {
            self.drawn_frames = self.drawn_frames.saturating_add(1);
        }
        self.work_sum_s += work_s as f64;
        self.work_max_s = self.work_max_s.max(work_s);
        if overshoot {
            self.overshoot_frames = self.overshoot_frames.saturating_add(1);
        }
    }

    fn print(&self, elapsed: Duration, target_fps: f64, scene: &Scene) {
        let elapsed_s = elapsed.as_secs_f64().max(0.000_001);
        let frames = self.frames.max(1) as f64;
        let weather = scene.stats();

        println!("PERF STATS:");
        println!("  elapsed_s: {:.3}", elapsed_s);
        println!("  target_fps: {:.3}", target_fps);
        println!("  avg_fps: {:.3}", self.frames as f64 / elapsed_s);
        println!("  frames: {}", self.frames);
        println!(
            "  drawn_frames: {} ({:.1}%)",
            self.drawn_frames,
            self.drawn_frames as f64 / frames * 100.0
        );
        println!("  avg_work_ms: {:.3}", self.work_sum_s / frames * 1000.0);
        println!("  max_work_ms: {:.3}", self.work_max_s as f64 * 1000.0);
        println!(
            "  overshoot_frames: {} ({:.1}%)",
            self.overshoot_frames,
            self.overshoot_frames as f64 / frames * 100.0
        );
        println!("WEATHER STATS:");
        println!("  steps: {}", weather.steps);
        println!("  rain_starts: {}", weather.rain_starts);
        println!("  clears: {}", weather.clears);
        println!("  rainbow_steps: {}", weather.rainbow_steps);
    }
}

fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        print_bitcolor_check(&args);
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        if git_sha().is_empty() {
            println!("Build: {}", build_info());
        } else {
            println!("Build: {} ({})", build_info(), git_sha());
        }
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let color_mode = detect_color_mode(&args);
    let target_fps = require_f64_range("--fps", args.fps, 1.0, 240.0);
    let end_after = match args.duration {
        Some(s) if !s.is_finite() => fail(format_args!(
            "failed to apply --duration {} (must be a finite number)",
            s
        )),
        Some(s) if s > 0.0 => Some(Duration::from_secs_f64(require_f64_range(
            "--duration",
            s,
            0.1,
            86400.0,
        ))),
        _ => None,
    };
    let drops = require_range("--drops", args.drops, 1, 2000);
    let rain_after = require_range("--rain-after", args.rain_after, 1, 100_000);
    let rainbow_after = require_range("--rainbow-after", args.rainbow_after, 1, 1_000_000);
    let hold_ms = require_range("--hold-ms", args.hold_ms, 50, 5000);
    let stars = require_range("--stars", args.stars, 0, 5000);
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;

    let scene_config = SceneConfig {
        rules: WeatherRules {
            rain_after,
            rainbow_after,
        },
        drops,
        hold_steps: (!term.reports_key_release()).then(|| hold_steps_for(hold_ms, target_fps)),
    };
    let mut scene = Scene::new(scene_config, Viewport::new(w, h), seed);

    let palette = Palette::new(
        color_mode,
        matches!(
            args.color_bg,
            ColorBg::DefaultBackground | ColorBg::Transparent
        ),
    );
    let mut renderer = Renderer::new(palette, stars, args.hud, seed.rotate_left(17) ^ 0x5a5a);
    let mut frame = Frame::new(w, h, renderer.background());

    let start_time = Instant::now();
    let end_time = end_after.map(|d| start_time + d);

    let target_period = Duration::from_secs_f64(1.0 / target_fps);
    let mut next_frame = Instant::now();
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::ZERO)? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) => {
                        if !handle_key(&mut scene, &k) {
                            running = false;
                            break;
                        }
                    }
                    Event::Mouse(m) => {
                        scene.input_mut().apply_mouse(&m);
                    }
                    _ => {}
                }
            }

            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }

            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            scene.resize(Viewport::new(nw, nh));
            frame = Frame::new(nw, nh, renderer.background());
            term.invalidate();
        }

        let work_start = Instant::now();
        scene.step();
        renderer.draw(&scene, &mut frame);
        let did_draw = term.draw(&frame)?;
        let work = work_start.elapsed();

        if args.perf_stats {
            perf.record(work.as_secs_f32(), did_draw, work > target_period);
        }

        next_frame += target_period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    if args.perf_stats {
        drop(term);
        perf.print(start_time.elapsed(), target_fps, &scene);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colormode_aliases() {
        assert_eq!(parse_color_mode(0), Ok(ColorMode::Mono));
        assert_eq!(parse_color_mode(16), Ok(ColorMode::Color16));
        assert_eq!(parse_color_mode(256), Ok(ColorMode::Color256));
        assert_eq!(parse_color_mode(32), Ok(ColorMode::TrueColor));
        assert!(parse_color_mode(12).is_err());
    }

    #[test]
    fn hold_window_rounds_up_to_whole_steps() {
        assert_eq!(hold_steps_for(550, 60.0), 33);
        assert_eq!(hold_steps_for(50, 1.0), 1);
    }

    #[test]
    fn quit_and_control_keys_do_not_reach_the_walker() {
        let mut scene = Scene::new(SceneConfig::default(), Viewport::new(80, 30), 3);
        let press = |code, modifiers| KeyEvent::new(code, modifiers);

        assert!(!handle_key(&mut scene, &press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!handle_key(
            &mut scene,
            &press(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(handle_key(&mut scene, &press(KeyCode::Right, KeyModifiers::NONE)));
        assert_eq!(scene.intent(), crate::input::Intent::Right);
        assert!(handle_key(&mut scene, &press(KeyCode::Char('p'), KeyModifiers::NONE)));
        assert!(scene.is_paused());
    }
}
