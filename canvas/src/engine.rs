use std::collections::HashMap;

use crate::consts::DEFAULT_IMAGE_SIZE_PX;
use crate::doc::{ImageRecord, ImageStore, ImageUpdate};
use crate::geometry::{Point, Size, clamp_to_container, place_controls_panel};
use crate::input::{Button, ImagePhase, InputState, Key, Target, UiState};
use crate::transform::TransformOp;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Push this full image record to the server.
    PersistImage(ImageUpdate),
    /// Ask the user to confirm deleting this image.
    ConfirmDelete { filename: String },
    /// The user confirmed; delete this image on the server.
    DeleteImage { filename: String },
    /// Open the controls panel at this page position.
    ShowControls { at: Point },
    /// Close the controls panel.
    HideControls,
    RenderNeeded,
}

/// Canvas state: the displayed day's images, selection, and drag gesture.
///
/// Every transform or position change is applied locally first and then
/// reported as [`Action::PersistImage`]; there are no local-only edits.
pub struct CanvasController {
    pub images: ImageStore,
    pub ui: UiState,
    pub input: InputState,
    /// Size of the image container; drags are clamped inside it once known.
    pub container: Option<Size>,
    /// Size of the browser viewport; the controls panel is kept inside it.
    pub viewport: Size,
    measured: HashMap<String, Size>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self {
            images: ImageStore::new(),
            ui: UiState::default(),
            input: InputState::default(),
            container: None,
            viewport: Size::new(0.0, 0.0),
            measured: HashMap::new(),
        }
    }
}

impl CanvasController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the canvas with the images of a freshly loaded day.
    ///
    /// Selection, gestures, the controls panel and measured sizes all belong
    /// to the previous day and are dropped.
    pub fn load_images(&mut self, images: Vec<ImageRecord>) {
        self.images.load_snapshot(images);
        self.images.iter_mut().for_each(ImageRecord::normalize);
        self.ui = UiState::default();
        self.input = InputState::Idle;
        self.measured.clear();
    }

    /// Empty the canvas (e.g. while the next day is loading).
    pub fn clear(&mut self) {
        self.load_images(Vec::new());
    }

    /// Add an image that was just uploaded.
    pub fn add_image(&mut self, mut image: ImageRecord) -> Vec<Action> {
        image.normalize();
        self.images.insert(image);
        vec![Action::RenderNeeded]
    }

    /// Remove an image after the server confirmed its deletion.
    ///
    /// Unknown filenames are ignored so a repeated delete is harmless.
    pub fn apply_delete(&mut self, filename: &str) -> Vec<Action> {
        if self.images.remove(filename).is_none() {
            return Vec::new();
        }
        self.measured.remove(filename);
        if self.ui.pending_delete.as_deref() == Some(filename) {
            self.ui.pending_delete = None;
        }
        if matches!(&self.input, InputState::Dragging { filename: f, .. } if f == filename) {
            self.input = InputState::Idle;
        }
        let mut actions = Vec::new();
        if self.ui.selected.as_deref() == Some(filename) {
            self.ui.selected = None;
            if self.ui.controls_at.take().is_some() {
                actions.push(Action::HideControls);
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Layout ---

    pub fn set_container_size(&mut self, size: Size) {
        self.container = Some(size);
    }

    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Record the rendered size of an image, used for drag clamping.
    pub fn set_image_size(&mut self, filename: &str, size: Size) {
        if self.images.get(filename).is_some() {
            self.measured.insert(filename.to_owned(), size);
        }
    }

    /// Rendered size of an image, or the default when not yet measured.
    #[must_use]
    pub fn image_size(&self, filename: &str) -> Size {
        self.measured
            .get(filename)
            .copied()
            .unwrap_or(Size::new(DEFAULT_IMAGE_SIZE_PX, DEFAULT_IMAGE_SIZE_PX))
    }

    // --- Selection ---

    /// Select an image, deselecting any other in the same step.
    pub fn select(&mut self, filename: &str) -> bool {
        if self.images.get(filename).is_none() {
            return false;
        }
        self.ui.selected = Some(filename.to_owned());
        true
    }

    /// Clear the selection and close the controls panel.
    pub fn deselect(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.ui.controls_at.take().is_some() {
            actions.push(Action::HideControls);
        }
        if self.ui.selected.take().is_some() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Input events ---

    /// Primary press on an image selects it and starts a drag.
    pub fn on_pointer_down(&mut self, target: &Target, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Target::Image(filename) = target else {
            return Vec::new();
        };
        let Some(image) = self.images.get(filename) else {
            return Vec::new();
        };
        let offset = Point::new(pt.x - image.position_x, pt.y - image.position_y);
        self.ui.selected = Some(filename.clone());
        self.input = InputState::Dragging { filename: filename.clone(), offset };
        vec![Action::RenderNeeded]
    }

    /// While dragging, the image follows the pointer, clamped to the container.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let InputState::Dragging { filename, offset } = &self.input else {
            return Vec::new();
        };
        let filename = filename.clone();
        let target = Point::new(pt.x - offset.x, pt.y - offset.y);
        if self.move_clamped(&filename, target) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Release ends the drag: clamp the final position and persist it.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let InputState::Dragging { filename, offset } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let target = Point::new(pt.x - offset.x, pt.y - offset.y);
        if !self.move_clamped(&filename, target) {
            return Vec::new();
        }
        self.persist(&filename)
    }

    /// Click selects an image; a click outside images and controls deselects.
    pub fn on_click(&mut self, target: &Target) -> Vec<Action> {
        match target {
            Target::Image(filename) => {
                if self.select(filename) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            Target::Controls => Vec::new(),
            Target::Background => self.deselect(),
        }
    }

    /// Secondary activation selects an image and opens the controls panel near `page_pt`.
    pub fn on_context_menu(&mut self, target: &Target, page_pt: Point) -> Vec<Action> {
        let Target::Image(filename) = target else {
            return Vec::new();
        };
        if !self.select(filename) {
            return Vec::new();
        }
        let at = place_controls_panel(page_pt, self.viewport);
        self.ui.controls_at = Some(at);
        vec![Action::ShowControls { at }, Action::RenderNeeded]
    }

    /// `Delete` asks to delete the selection; `Escape` closes the controls panel.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if key.is("Delete") {
            if let Some(filename) = self.ui.selected.clone() {
                return self.request_delete(&filename);
            }
            return Vec::new();
        }
        if key.is("Escape") && self.ui.controls_at.take().is_some() {
            return vec![Action::HideControls];
        }
        Vec::new()
    }

    // --- Edits ---

    /// Apply a transform edit to `filename` and persist the result.
    pub fn apply_transform(&mut self, filename: &str, op: TransformOp) -> Vec<Action> {
        let Some(image) = self.images.get_mut(filename) else {
            return Vec::new();
        };
        let mut t = image.transform();
        t.apply(op);
        image.set_transform(t);
        self.persist(filename)
    }

    /// Change an image's caption and persist the result.
    pub fn set_caption(&mut self, filename: &str, caption: &str) -> Vec<Action> {
        let Some(image) = self.images.get_mut(filename) else {
            return Vec::new();
        };
        caption.clone_into(&mut image.caption);
        self.persist(filename)
    }

    /// Ask the user to confirm deleting `filename`.
    pub fn request_delete(&mut self, filename: &str) -> Vec<Action> {
        if self.images.get(filename).is_none() {
            return Vec::new();
        }
        self.ui.pending_delete = Some(filename.to_owned());
        vec![Action::ConfirmDelete { filename: filename.to_owned() }]
    }

    /// Resolve the pending delete prompt.
    pub fn confirm_delete(&mut self, accepted: bool) -> Vec<Action> {
        let Some(filename) = self.ui.pending_delete.take() else {
            return Vec::new();
        };
        if !accepted || self.images.get(&filename).is_none() {
            return Vec::new();
        }
        vec![Action::DeleteImage { filename }]
    }

    // --- Queries ---

    /// The currently selected image, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected.as_deref()
    }

    /// Interaction phase of one image.
    #[must_use]
    pub fn phase(&self, filename: &str) -> ImagePhase {
        match &self.input {
            InputState::Dragging { filename: f, .. } if f == filename => ImagePhase::Dragging,
            _ if self.ui.selected.as_deref() == Some(filename) => ImagePhase::Selected,
            _ => ImagePhase::Idle,
        }
    }

    /// Look up an image by filename.
    #[must_use]
    pub fn image(&self, filename: &str) -> Option<&ImageRecord> {
        self.images.get(filename)
    }

    // --- Internals ---

    /// Move an image, clamped to the container. Until the host reports the
    /// container size the target is taken as-is.
    fn move_clamped(&mut self, filename: &str, target: Point) -> bool {
        let clamped = match self.container {
            Some(container) => clamp_to_container(target, self.image_size(filename), container),
            None => target,
        };
        let Some(image) = self.images.get_mut(filename) else {
            return false;
        };
        image.position_x = clamped.x;
        image.position_y = clamped.y;
        true
    }

    fn persist(&self, filename: &str) -> Vec<Action> {
        match self.images.get(filename) {
            Some(image) => vec![Action::PersistImage(image.to_update()), Action::RenderNeeded],
            None => Vec::new(),
        }
    }
}
