//! Per-image visual transform: rotation, scale and tilt.
//!
//! The visual mapping is always `rotate · scale · skew`, applied in the
//! image's own frame (position is stored separately on the record). Rotation
//! accumulates without wraparound; scale and tilt are clamped to the limits
//! in [`crate::consts`] on every mutation.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{MAX_SCALE, MAX_TILT_DEG, MIN_SCALE, PRESET_TILT_DEG};

/// Rotation / scale / tilt state of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Clockwise rotation in degrees. Unbounded.
    pub rotation: f64,
    /// Uniform scale factor in `[MIN_SCALE, MAX_SCALE]`.
    pub scale: f64,
    /// Horizontal skew in degrees in `[-MAX_TILT_DEG, MAX_TILT_DEG]`.
    pub tilt_x: f64,
    /// Vertical skew in degrees in `[-MAX_TILT_DEG, MAX_TILT_DEG]`.
    pub tilt_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { rotation: 0.0, scale: 1.0, tilt_x: 0.0, tilt_y: 0.0 }
    }
}

/// Named tilt settings offered by the controls panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltPreset {
    /// No tilt on either axis.
    Flat,
    /// Top edge leans to the left.
    LeanLeft,
    /// Top edge leans to the right.
    LeanRight,
    /// Sheared as if tipped toward the viewer.
    TipForward,
    /// Sheared as if tipped away from the viewer.
    TipBack,
}

impl TiltPreset {
    /// The `(tilt_x, tilt_y)` pair this preset sets.
    #[must_use]
    pub fn tilt(self) -> (f64, f64) {
        match self {
            Self::Flat => (0.0, 0.0),
            Self::LeanLeft => (PRESET_TILT_DEG, 0.0),
            Self::LeanRight => (-PRESET_TILT_DEG, 0.0),
            Self::TipForward => (0.0, PRESET_TILT_DEG),
            Self::TipBack => (0.0, -PRESET_TILT_DEG),
        }
    }

    /// Parse a preset from its kebab-case name (`lean-left`, `tip-back`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "flat" => Some(Self::Flat),
            "lean-left" => Some(Self::LeanLeft),
            "lean-right" => Some(Self::LeanRight),
            "tip-forward" => Some(Self::TipForward),
            "tip-back" => Some(Self::TipBack),
            _ => None,
        }
    }
}

impl Transform {
    /// Build a transform from raw values, clamping scale and tilt into policy.
    ///
    /// Non-finite inputs fall back to the identity value for that field.
    #[must_use]
    pub fn normalized(rotation: f64, scale: f64, tilt_x: f64, tilt_y: f64) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            rotation: finite_or(rotation, 0.0),
            scale: finite_or(scale, 1.0).clamp(MIN_SCALE, MAX_SCALE),
            tilt_x: clamp_tilt(finite_or(tilt_x, 0.0)),
            tilt_y: clamp_tilt(finite_or(tilt_y, 0.0)),
        }
    }

    /// Add `delta` degrees of rotation.
    pub fn rotate_by(&mut self, delta: f64) {
        if delta.is_finite() {
            self.rotation += delta;
        }
    }

    /// Multiply the scale by `factor`, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn scale_by(&mut self, factor: f64) {
        let next = self.scale * factor;
        if next.is_nan() {
            return;
        }
        self.scale = next.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Add tilt on both axes, each clamped to `±MAX_TILT_DEG`.
    pub fn tilt_by(&mut self, delta_x: f64, delta_y: f64) {
        if delta_x.is_finite() {
            self.tilt_x = clamp_tilt(self.tilt_x + delta_x);
        }
        if delta_y.is_finite() {
            self.tilt_y = clamp_tilt(self.tilt_y + delta_y);
        }
    }

    /// Replace the tilt with a preset's values.
    pub fn apply_preset(&mut self, preset: TiltPreset) {
        let (x, y) = preset.tilt();
        self.tilt_x = clamp_tilt(x);
        self.tilt_y = clamp_tilt(y);
    }

    pub fn reset_tilt(&mut self) {
        self.tilt_x = 0.0;
        self.tilt_y = 0.0;
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// CSS `transform` value: `rotate(..) scale(..) skew(.., ..)`.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "rotate({}deg) scale({}) skew({}deg, {}deg)",
            self.rotation, self.scale, self.tilt_x, self.tilt_y
        )
    }
}

fn clamp_tilt(deg: f64) -> f64 {
    deg.clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
}

/// A single transform edit requested from the controls panel or keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    /// Rotate by the given degrees.
    RotateBy(f64),
    /// Multiply the scale by the given factor.
    ScaleBy(f64),
    /// Add tilt in degrees on each axis.
    TiltBy { dx: f64, dy: f64 },
    /// Replace the tilt with a named preset.
    Preset(TiltPreset),
    /// Zero both tilt axes.
    ResetTilt,
    /// Return to rotation 0, scale 1, no tilt.
    ResetAll,
}

impl Transform {
    /// Apply one edit.
    pub fn apply(&mut self, op: TransformOp) {
        match op {
            TransformOp::RotateBy(delta) => self.rotate_by(delta),
            TransformOp::ScaleBy(factor) => self.scale_by(factor),
            TransformOp::TiltBy { dx, dy } => self.tilt_by(dx, dy),
            TransformOp::Preset(preset) => self.apply_preset(preset),
            TransformOp::ResetTilt => self.reset_tilt(),
            TransformOp::ResetAll => self.reset_all(),
        }
    }
}
