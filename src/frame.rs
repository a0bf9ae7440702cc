// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;

/// Off-screen cell grid the renderer paints into every frame. The terminal
/// diffs it against the previous frame, so repainting everything is cheap.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; width as usize * height as usize],
            blank,
        }
    }

    pub fn clear_with_bg(&mut self, bg: Option<Color>) {
        self.blank = Cell::blank_with_bg(bg);
        self.cells.fill(self.blank);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let w = self.width as usize;
        let start = (y as usize * w).min(self.cells.len());
        let end = (start + w).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Draws a glyph over whatever background the cell already has.
    pub fn put(&mut self, x: u16, y: u16, ch: char, fg: Option<Color>, bold: bool) {
        if let Some(i) = self.index(x, y) {
            let cell = &mut self.cells[i];
            cell.ch = ch;
            cell.fg = fg;
            cell.bold = bold;
        }
    }

    /// Writes `text` starting at column `x`; spaces are transparent when
    /// `transparent_spaces` is set. Clips at the right edge.
    pub fn put_str(
        &mut self,
        x: i32,
        y: u16,
        text: &str,
        fg: Option<Color>,
        bold: bool,
        transparent_spaces: bool,
    ) {
        for (i, ch) in text.chars().enumerate() {
            let cx = x + i as i32;
            if cx < 0 {
                continue;
            }
            if cx >= self.width as i32 {
                break;
            }
            if transparent_spaces && ch == ' ' {
                continue;
            }
            self.put(cx as u16, y, ch, fg, bold);
        }
    }

    pub fn tint(&mut self, x: u16, y: u16, bg: Color) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].bg = Some(bg);
        }
    }

    /// Copies `other` into `self`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Frame) {
        self.width = other.width;
        self.height = other.height;
        self.blank = other.blank;
        self.cells.clone_from(&other.cells);
    }
}
