// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;

use clap::Parser;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainwalk --fps 60 --drops 20 --rain-after 60 --rainbow-after 300 --hold-ms 550 --stars 100 --color-bg black";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_line(line: &str) -> String {
    let is_heading =
        !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();
    if is_heading {
        return format!("\x1b[1;36m{line}\x1b[0m");
    }
    if let Some(rest) = line.strip_prefix("      Example:") {
        return format!("      \x1b[32mExample:\x1b[0m{rest}");
    }
    if let Some(rest) = line.strip_prefix("  rainwalk") {
        return format!("  \x1b[1;34mrainwalk\x1b[0m{rest}");
    }
    if let Some(rest) = line.strip_prefix("  -") {
        return format!("  \x1b[33m-{rest}\x1b[0m");
    }
    line.to_string()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));
        out.push_str(&colorize_line(line));
        out.push_str(nl);
    }
    out
}

fn print_maybe_colored(text: &str) {
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(text));
    } else {
        print!("{}", text);
    }
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainwalk", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "GENERAL",
        help = "Update steps per second (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the rain (default: random)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "hud",
        help_heading = "GENERAL",
        help = "Show a status line with phase, idle steps and position"
    )]
    pub hud: bool,

    #[arg(
        short = 'd',
        long = "drops",
        default_value_t = 20,
        help_heading = "WEATHER",
        help = "Rain streaks per shower (min 1 max 2000)"
    )]
    pub drops: usize,

    #[arg(
        long = "rain-after",
        default_value_t = 60,
        help_heading = "WEATHER",
        help = "Idle steps before it starts raining (min 1 max 100000)"
    )]
    pub rain_after: u32,

    #[arg(
        long = "rainbow-after",
        default_value_t = 300,
        help_heading = "WEATHER",
        help = "Idle steps before the rainbow shows (min 1 max 1000000)"
    )]
    pub rainbow_after: u32,

    #[arg(
        long = "hold-ms",
        default_value_t = 550,
        help_heading = "INPUT",
        help = "Key hold window when the terminal cannot report key releases (min 50 max 5000)"
    )]
    pub hold_ms: u32,

    #[arg(
        long = "stars",
        default_value_t = 100,
        help_heading = "APPEARANCE",
        help = "Twinkling stars per frame (min 0 max 5000)"
    )]
    pub stars: usize,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::Black,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "perf-stats",
        help_heading = "GENERAL",
        help = "Print frame and weather statistics on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn print_help_detail() {
    let block = format!(
        "{}\n\nUSAGE:\n  rainwalk [OPTIONS]\n\nCONTROLS:\n  Left/Right, a/d, h/l   walk\n  mouse drag             walk towards the drag direction\n  space                  reset the scene\n  p                      pause\n  q, Esc, Ctrl-C         quit\n\nGENERAL:\n  -f, --fps <number>\n      Update steps per second; weather thresholds count steps.\n      Example: rainwalk --fps 30\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: rainwalk --duration 10\n\n  --seed <number>\n      Seed the rain so runs repeat.\n      Example: rainwalk --seed 7\n\n  --hud\n      Status line at the bottom.\n      Example: rainwalk --hud\n\n  --perf-stats\n      Print frame and weather statistics on exit.\n      Example: rainwalk --duration 10 --perf-stats\n\nWEATHER:\n  -d, --drops <number>\n      Rain streaks per shower.\n      Example: rainwalk --drops 60\n\n  --rain-after <steps>\n      Idle steps before it starts raining.\n      Example: rainwalk --rain-after 120\n\n  --rainbow-after <steps>\n      Idle steps before the rainbow shows.\n      Example: rainwalk --rainbow-after 600\n\nINPUT:\n  --hold-ms <ms>\n      How long a key press keeps walking on terminals that never report\n      key releases. Auto-repeat keeps re-arming it.\n      Example: rainwalk --hold-ms 400\n\nAPPEARANCE:\n  --stars <number>\n      Twinkling stars per frame (0 disables).\n      Example: rainwalk --stars 0\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: rainwalk --colormode 24\n\n  --color-bg <black|default-background|transparent>\n      Background mode.\n      Example: rainwalk --color-bg transparent\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n\nLIMITS / VALID RANGES:\n",
        DEFAULT_PARAMS_USAGE
    );
    print_maybe_colored(&block);

    println!("  --fps <number>           min 1 max 240");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --drops <number>         min 1 max 2000");
    println!("  --rain-after <steps>     min 1 max 100000");
    println!("  --rainbow-after <steps>  min 1 max 1000000");
    println!("  --hold-ms <ms>           min 50 max 5000");
    println!("  --stars <number>         min 0 max 5000");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256, 24==32)");
}
