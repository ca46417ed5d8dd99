//! Grid layout for catalog thumbnails.

use bevy::math::{Rect, UVec2, Vec2};

/// Icon size used when no thumbnail size is known.
pub const DEFAULT_ICON_SIZE: UVec2 = UVec2::splat(100);

/// The grid never collapses below this many columns.
pub const MIN_COLUMNS: u32 = 2;

/// Cell arrangement of a thumbnail grid inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Icons per row.
    pub columns: u32,
    /// Rows needed for every icon.
    pub rows: u32,
    /// Size of one cell in pixels.
    pub icon_size: UVec2,
    /// Number of icons.
    pub count: usize,
}

impl GridLayout {
    /// Lay out `count` icons in a panel `panel_width` wide.
    ///
    /// `icon_size` is usually the size of the first thumbnail; a missing or
    /// degenerate size falls back to [`DEFAULT_ICON_SIZE`].
    pub fn new(panel_width: f32, icon_size: Option<UVec2>, count: usize) -> Self {
        let icon_size = icon_size
            .filter(|size| size.x > 0 && size.y > 0)
            .unwrap_or(DEFAULT_ICON_SIZE);
        let columns = (panel_width.max(0.0) as u32 / icon_size.x).max(MIN_COLUMNS);
        let rows = (count as u32).div_ceil(columns);
        Self {
            columns,
            rows,
            icon_size,
            count,
        }
    }

    /// Total grid size in pixels.
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.columns, self.rows) * self.icon_size
    }

    /// Rectangle of the cell holding item `index`, relative to the grid origin.
    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        if index >= self.count {
            return None;
        }
        let index = index as u32;
        let cell = UVec2::new(index % self.columns, index / self.columns);
        let min = (cell * self.icon_size).as_vec2();
        Some(Rect::from_corners(min, min + self.icon_size.as_vec2()))
    }

    /// Item under `point` (relative to the grid origin), if any.
    pub fn cell_at(&self, point: Vec2) -> Option<usize> {
        if point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = point.x as u32 / self.icon_size.x;
        let row = point.y as u32 / self.icon_size.y;
        if column >= self.columns {
            return None;
        }
        let index = (row * self.columns + column) as usize;
        (index < self.count).then_some(index)
    }
}
