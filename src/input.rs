// Copyright (c) 2026 rezky_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};

/// Horizontal movement the player asked for this step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Intent {
    Left,
    #[default]
    Idle,
    Right,
}

impl Intent {
    pub fn from_delta(delta: i32) -> Self {
        match delta.signum() {
            -1 => Intent::Left,
            1 => Intent::Right,
            _ => Intent::Idle,
        }
    }

    pub fn sign(self) -> i8 {
        match self {
            Intent::Left => -1,
            Intent::Idle => 0,
            Intent::Right => 1,
        }
    }

    pub fn dx(self) -> f32 {
        self.sign() as f32
    }

    pub fn is_idle(self) -> bool {
        self == Intent::Idle
    }
}

pub fn direction_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Intent::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Intent::Right),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    None,
    Keys,
    Pointer,
}

/// Current movement intent, fed by key and pointer-drag events.
///
/// Any key release clears the intent, so with both arrows held the most
/// recent event wins. A left-button drag stands in for a touch drag: the
/// intent is the sign of the horizontal distance from where the press
/// started.
///
/// Terminals that never report key releases get a hold window instead: every
/// press or auto-repeat re-arms it, and once `hold_steps` steps pass without
/// one the intent falls back to idle.
#[derive(Clone, Debug)]
pub struct InputState {
    intent: Intent,
    source: Source,
    touch_start: Option<u16>,
    hold_steps: Option<u32>,
    hold_left: u32,
}

impl InputState {
    pub fn new(hold_steps: Option<u32>) -> Self {
        Self {
            intent: Intent::Idle,
            source: Source::None,
            touch_start: None,
            hold_steps,
            hold_left: 0,
        }
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn key_down(&mut self, dir: Intent) {
        self.intent = dir;
        self.source = Source::Keys;
        self.hold_left = self.hold_steps.unwrap_or(0);
    }

    pub fn key_up(&mut self) {
        self.intent = Intent::Idle;
        self.source = Source::None;
        self.hold_left = 0;
    }

    pub fn touch_start(&mut self, col: u16) {
        self.touch_start = Some(col);
    }

    pub fn touch_move(&mut self, col: u16) {
        let Some(start) = self.touch_start else {
            self.touch_start = Some(col);
            return;
        };
        self.intent = Intent::from_delta(col as i32 - start as i32);
        self.source = Source::Pointer;
    }

    pub fn touch_end(&mut self) {
        self.touch_start = None;
        self.intent = Intent::Idle;
        self.source = Source::None;
    }

    /// Returns true when the event was a movement event.
    pub fn apply_key(&mut self, key: &KeyEvent) -> bool {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => match direction_for(key.code) {
                Some(dir) => {
                    self.key_down(dir);
                    true
                }
                None => false,
            },
            KeyEventKind::Release => {
                self.key_up();
                true
            }
        }
    }

    pub fn apply_mouse(&mut self, ev: &MouseEvent) -> bool {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => self.touch_start(ev.column),
            MouseEventKind::Drag(MouseButton::Left) => self.touch_move(ev.column),
            MouseEventKind::Up(MouseButton::Left) => self.touch_end(),
            _ => return false,
        }
        true
    }

    /// Runs once per update step, after the intent has been consumed.
    pub fn tick(&mut self) {
        if self.source != Source::Keys || self.hold_steps.is_none() {
            return;
        }
        if self.hold_left == 0 {
            self.key_up();
        } else {
            self.hold_left -= 1;
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(None)
    }
}
