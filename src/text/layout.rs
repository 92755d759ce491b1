use crate::{
    foundation::core::{Affine, Canvas, Point},
    style::options::Layout,
};

/// Line height as a multiple of the (unscaled) font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.2;
/// Rotation applied by the diagonal layout, in radians.
pub const DIAGONAL_ROTATION_RAD: f64 = -0.2;
/// Corner layout margin as a fraction of the surface size.
pub const CORNER_MARGIN_RATIO: f64 = 0.05;

/// Horizontal anchoring of a line relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    /// The x coordinate is the middle of the line.
    Center,
    /// The x coordinate is the left edge of the line.
    Left,
}

/// Where each caption line goes.
///
/// Line anchors live in the block's local space; `transform` maps that space to the surface.
/// Each anchor's `y` is the vertical middle of its line.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockPlacement {
    /// Local-to-surface transform (identity except for the diagonal layout).
    pub transform: Affine,
    /// Horizontal anchoring of every line.
    pub align: TextAlign,
    /// One anchor per line, in order.
    pub anchors: Vec<Point>,
}

/// Place `line_count` lines spaced by `line_height` according to `layout`.
///
/// `offset_y` (the slide-in offset) is added to every line after placement.
pub fn place_block(
    layout: Layout,
    canvas: Canvas,
    line_count: usize,
    line_height: f64,
    offset_y: f64,
) -> BlockPlacement {
    let w = canvas.width_f64();
    let h = canvas.height_f64();
    let n = line_count as f64;
    let half_block = line_height * (n - 1.0).max(0.0) / 2.0;

    let (transform, align, x, start_y) = match layout {
        Layout::Center => (Affine::IDENTITY, TextAlign::Center, w / 2.0, h / 2.0 - half_block),
        Layout::Top => (Affine::IDENTITY, TextAlign::Center, w / 2.0, h * 0.2 - half_block),
        Layout::Bottom => (Affine::IDENTITY, TextAlign::Center, w / 2.0, h * 0.8 - half_block),
        Layout::Diagonal => (
            Affine::translate((w / 2.0, h / 2.0)) * Affine::rotate(DIAGONAL_ROTATION_RAD),
            TextAlign::Center,
            0.0,
            -half_block,
        ),
        Layout::Corner => (
            Affine::IDENTITY,
            TextAlign::Left,
            w * CORNER_MARGIN_RATIO,
            h - line_height * n - h * CORNER_MARGIN_RATIO,
        ),
    };

    let anchors = (0..line_count)
        .map(|i| Point::new(x, start_y + offset_y + i as f64 * line_height))
        .collect();

    BlockPlacement {
        transform,
        align,
        anchors,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
