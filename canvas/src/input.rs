//! Input model: pointer buttons, keys, event targets, and the gesture state machine.
//!
//! The host resolves which element a pointer event landed on and hands the
//! engine a [`Target`]; the engine never hit-tests. `InputState` is the active
//! gesture tracked between pointer-down and pointer-up, and `UiState` is the
//! presentation state (selection, controls panel, pending delete prompt) that
//! is never persisted.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Mouse button identifier. Touch contacts are reported as `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or long-press / two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(name.to_owned())
    }

    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.0 == name
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// What a pointer event landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// An image on the canvas, by filename.
    Image(String),
    /// The floating image controls panel.
    Controls,
    /// Anything else on the page.
    Background,
}

/// Interaction phase of a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePhase {
    Idle,
    Selected,
    Dragging,
}

/// Presentation state visible to the renderer. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Filename of the selected image, if any. At most one image is selected.
    pub selected: Option<String>,
    /// Top-left of the controls panel in page coordinates when it is open.
    pub controls_at: Option<Point>,
    /// Image awaiting a delete confirmation from the user.
    pub pending_delete: Option<String>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is moving an image across the canvas.
    Dragging {
        /// Filename of the image being dragged.
        filename: String,
        /// Pointer position relative to the image's top-left at press time.
        offset: Point,
    },
}
