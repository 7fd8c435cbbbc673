#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::consts::{CONTROLS_PANEL_HEIGHT_PX, CONTROLS_PANEL_WIDTH_PX};

/// A point in container or page coordinates (CSS pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Clamp one axis so `[pos, pos + extent]` stays inside `[0, bound]`.
///
/// When the extent exceeds the bound the only valid position is 0.
#[must_use]
pub fn clamp_axis(pos: f64, extent: f64, bound: f64) -> f64 {
    let max = (bound - extent).max(0.0);
    if pos.is_nan() {
        return 0.0;
    }
    pos.clamp(0.0, max)
}

/// Clamp an image's top-left corner so its box stays fully inside the container.
#[must_use]
pub fn clamp_to_container(pos: Point, image: Size, container: Size) -> Point {
    Point {
        x: clamp_axis(pos.x, image.width, container.width),
        y: clamp_axis(pos.y, image.height, container.height),
    }
}

/// Place the controls panel at the pointer, shifted left/up so it stays on screen.
#[must_use]
pub fn place_controls_panel(pointer: Point, viewport: Size) -> Point {
    place_panel(pointer, Size::new(CONTROLS_PANEL_WIDTH_PX, CONTROLS_PANEL_HEIGHT_PX), viewport)
}

/// Place a panel of `panel` size at `pointer`, kept inside `viewport`.
#[must_use]
pub fn place_panel(pointer: Point, panel: Size, viewport: Size) -> Point {
    clamp_to_container(pointer, panel, viewport)
}
