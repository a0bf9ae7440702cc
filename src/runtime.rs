// Copyright (c) 2026 rezky_nightky

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

/// Logical units covered by one terminal column.
pub const UNITS_PER_COL: f32 = 10.0;
/// Logical units covered by one terminal row.
pub const UNITS_PER_ROW: f32 = 20.0;

/// Smallest world the scene will simulate; anything narrower would leave the
/// player with no room between its margins.
pub const MIN_COLS: u16 = 12;
pub const MIN_ROWS: u16 = 10;

/// The visible area in terminal cells, and its size in logical units.
///
/// The simulation never sees cells: it works in logical units (the player
/// moves 5 units a step, keeps 50 units off each edge) and the renderer maps
/// units back to cells. An 80x40 terminal is an 800x800 world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    pub fn width(self) -> f32 {
        self.cols.max(MIN_COLS) as f32 * UNITS_PER_COL
    }

    pub fn height(self) -> f32 {
        self.rows.max(MIN_ROWS) as f32 * UNITS_PER_ROW
    }

    pub fn col_at(self, x: f32) -> Option<u16> {
        if !(x >= 0.0) {
            return None;
        }
        let col = (x / UNITS_PER_COL) as u32;
        (col < self.cols as u32).then_some(col as u16)
    }

    pub fn row_at(self, y: f32) -> Option<u16> {
        if !(y >= 0.0) {
            return None;
        }
        let row = (y / UNITS_PER_ROW) as u32;
        (row < self.rows as u32).then_some(row as u16)
    }

    pub fn cell_at(self, x: f32, y: f32) -> Option<(u16, u16)> {
        Some((self.col_at(x)?, self.row_at(y)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighty_by_forty_is_an_800_unit_square() {
        let vp = Viewport::new(80, 40);
        assert_eq!(vp.width(), 800.0);
        assert_eq!(vp.height(), 800.0);
    }

    #[test]
    fn tiny_terminals_still_get_a_minimum_world() {
        let vp = Viewport::new(3, 2);
        assert_eq!(vp.width(), MIN_COLS as f32 * UNITS_PER_COL);
        assert_eq!(vp.height(), MIN_ROWS as f32 * UNITS_PER_ROW);
    }

    #[test]
    fn cell_lookup_rejects_points_outside_the_grid() {
        let vp = Viewport::new(80, 40);
        assert_eq!(vp.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(vp.cell_at(799.9, 799.9), Some((79, 39)));
        assert_eq!(vp.cell_at(800.0, 10.0), None);
        assert_eq!(vp.cell_at(10.0, -0.5), None);
        assert_eq!(vp.cell_at(f32::NAN, 10.0), None);
    }
}
