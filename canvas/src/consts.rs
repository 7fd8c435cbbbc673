//! Shared numeric constants for the canvas crate.

// ── Transform limits ────────────────────────────────────────────

/// Smallest scale factor an image may reach.
pub const MIN_SCALE: f64 = 0.1;

/// Largest scale factor an image may reach.
pub const MAX_SCALE: f64 = 3.0;

/// Tilt (skew) limit in degrees, applied symmetrically to each axis.
pub const MAX_TILT_DEG: f64 = 45.0;

// ── Upload placement ────────────────────────────────────────────

/// Left offset given to a freshly uploaded image, in CSS pixels.
pub const DEFAULT_POSITION_X: f64 = 50.0;

/// Top offset given to a freshly uploaded image, in CSS pixels.
pub const DEFAULT_POSITION_Y: f64 = 50.0;

/// Stacking order given to a freshly uploaded image.
pub const DEFAULT_Z_INDEX: i64 = 1;

// ── Layout ──────────────────────────────────────────────────────

/// Rendered size assumed for an image the host has not measured yet.
pub const DEFAULT_IMAGE_SIZE_PX: f64 = 200.0;

/// Width reserved for the floating image controls panel.
pub const CONTROLS_PANEL_WIDTH_PX: f64 = 250.0;

/// Height reserved for the floating image controls panel.
pub const CONTROLS_PANEL_HEIGHT_PX: f64 = 400.0;

// ── Presets ─────────────────────────────────────────────────────

/// Tilt applied by the lean and tip presets, in degrees.
pub const PRESET_TILT_DEG: f64 = 15.0;
