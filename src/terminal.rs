// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::frame::Frame;

/// Colours and attributes the terminal is currently set to, so runs of cells
/// only emit escape codes when something changes.
#[derive(Default)]
struct Pen {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
    pos: Option<(u16, u16)>,
}

impl Pen {
    fn apply(&mut self, out: &mut Stdout, cell: &Cell) -> Result<()> {
        if cell.fg != self.fg {
            out.queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
            self.fg = cell.fg;
        }
        if cell.bg != self.bg {
            out.queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
            self.bg = cell.bg;
        }
        if cell.bold != self.bold {
            out.queue(SetAttribute(if cell.bold {
                Attribute::Bold
            } else {
                Attribute::NormalIntensity
            }))?;
            self.bold = cell.bold;
        }
        Ok(())
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Option<Frame>,
    run_buf: String,
    keyboard_enhanced: bool,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<bool> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(EnableMouseCapture)?;
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;

            // Key releases only arrive with the enhancement flags pushed.
            let enhanced = matches!(terminal::supports_keyboard_enhancement(), Ok(true))
                && out
                    .execute(PushKeyboardEnhancementFlags(
                        KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                    ))
                    .is_ok();
            out.flush()?;
            Ok(enhanced)
        })();
        match init_res {
            Ok(keyboard_enhanced) => Ok(Self {
                stdout: out,
                last: None,
                run_buf: String::with_capacity(64),
                keyboard_enhanced,
            }),
            Err(e) => {
                restore_terminal_best_effort();
                Err(e)
            }
        }
    }

    /// Whether key-up events will be delivered. Windows consoles always
    /// report them; elsewhere it depends on the enhancement protocol.
    pub fn reports_key_release(&self) -> bool {
        cfg!(windows) || self.keyboard_enhanced
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<event::Event> {
        event::read()
    }

    /// Flushes the cells that differ from the previous frame. Returns false
    /// when nothing changed.
    pub fn draw(&mut self, frame: &Frame) -> Result<bool> {
        let Self {
            stdout,
            last,
            run_buf,
            ..
        } = self;

        let prev = last
            .as_ref()
            .filter(|l| l.width == frame.width && l.height == frame.height);
        if prev.is_none() {
            stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let changed = |x: u16, y: u16, cell: &Cell| match prev {
            Some(p) => p.get(x, y) != Some(cell),
            None => true,
        };

        let mut pen = Pen::default();
        let mut wrote = false;

        for y in 0..frame.height {
            let row = frame.row(y);
            let mut x = 0usize;
            while x < row.len() {
                let head = row[x];
                if !changed(x as u16, y, &head) {
                    x += 1;
                    continue;
                }

                let start = x as u16;
                run_buf.clear();
                run_buf.push(head.ch);
                x += 1;
                while x < row.len() {
                    let next = &row[x];
                    if !next.same_style(&head) || !changed(x as u16, y, next) {
                        break;
                    }
                    run_buf.push(next.ch);
                    x += 1;
                }

                if pen.pos != Some((start, y)) {
                    stdout.queue(cursor::MoveTo(start, y))?;
                }
                pen.apply(stdout, &head)?;
                stdout.queue(Print(run_buf.as_str()))?;
                pen.pos = ((x as u16) < frame.width).then_some((x as u16, y));
                wrote = true;
            }
        }

        if wrote || prev.is_none() {
            stdout.queue(SetAttribute(Attribute::Reset))?;
            stdout.queue(ResetColor)?;
            stdout.flush()?;
        }

        match last {
            Some(l) => l.copy_from(frame),
            None => *last = Some(frame.clone()),
        }
        Ok(wrote)
    }

    /// Forgets what is on screen so the next draw repaints every cell.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.stdout.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.stdout.execute(DisableMouseCapture);
        let _ = self.stdout.execute(SetAttribute(Attribute::Reset));
        let _ = self.stdout.execute(ResetColor);
        let _ = self.stdout.execute(cursor::Show);
        let _ = self.stdout.execute(terminal::EnableLineWrap);
        let _ = self.stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = self.stdout.flush();
    }
}

/// Used from the panic hook and signal handlers, where the `Terminal` value
/// is out of reach.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    #[cfg(unix)]
    let _ = out.execute(PopKeyboardEnhancementFlags);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}
