//! Named blur directions.
//!
//! A direction maps every pixel to a normalized position `t` along the blur
//! axis: 0.0 at the sharp end, approaching 1.0 at the blurred end.
//!
//! # Coordinate System
//! - (0, 0) = top-left pixel
//! - Linear directions use `coordinate / extent`, so the first row or column
//!   sits exactly at 0.0
//! - Radial directions measure the distance to `(width / 2, height / 2)`,
//!   normalized by half the image diagonal, so corners sit at 1.0

use serde::{Deserialize, Serialize};

/// Axis along which blur intensity increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Sharp top, blurred bottom.
    #[default]
    TopToBottom,
    /// Sharp bottom, blurred top.
    BottomToTop,
    /// Sharp left, blurred right.
    LeftToRight,
    /// Sharp right, blurred left.
    RightToLeft,
    /// Sharp center, blurred corners.
    CenterToEdges,
    /// Blurred center, sharp corners.
    EdgesToCenter,
}

impl Direction {
    /// Every direction.
    pub const ALL: [Direction; 6] = [
        Direction::TopToBottom,
        Direction::BottomToTop,
        Direction::LeftToRight,
        Direction::RightToLeft,
        Direction::CenterToEdges,
        Direction::EdgesToCenter,
    ];

    /// Normalized position of pixel `(x, y)` in a `width` x `height` image.
    ///
    /// Returns a value in 0.0..=1.0. Both dimensions must be non-zero.
    pub fn position(self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        let (w, h) = (width as f64, height as f64);
        let (px, py) = (x as f64, y as f64);

        let t = match self {
            Direction::TopToBottom => py / h,
            Direction::BottomToTop => (h - 1.0 - py) / h,
            Direction::LeftToRight => px / w,
            Direction::RightToLeft => (w - 1.0 - px) / w,
            Direction::CenterToEdges => radial_distance(px, py, w, h),
            Direction::EdgesToCenter => 1.0 - radial_distance(px, py, w, h),
        };

        t.clamp(0.0, 1.0) as f32
    }

    /// Whether positions depend only on the row.
    #[inline]
    pub(crate) fn is_vertical(self) -> bool {
        matches!(self, Direction::TopToBottom | Direction::BottomToTop)
    }

    /// Whether positions depend only on the column.
    #[inline]
    pub(crate) fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftToRight | Direction::RightToLeft)
    }
}

/// Distance from the image center, normalized by half the diagonal and
/// clamped to 1.0.
#[inline]
fn radial_distance(x: f64, y: f64, w: f64, h: f64) -> f64 {
    let dx = x - w / 2.0;
    let dy = y - h / 2.0;
    let half_diagonal = (w * w + h * h).sqrt() / 2.0;
    if half_diagonal <= 0.0 {
        return 0.0;
    }
    ((dx * dx + dy * dy).sqrt() / half_diagonal).min(1.0)
}
