//! The diary page as a single-threaded reactive loop.
//!
//! DESIGN
//! ======
//! A [`DiarySession`] owns all page state: the displayed day, the text buffer,
//! the canvas controller, the auto-save scheduler and the notification slot.
//! Input arrives as [`Event`] messages; every server call runs as a spawned
//! task whose result comes back as a completion and is handled in arrival
//! order on the same loop. Nothing is ever mutated from two places at once.
//!
//! Each request captures the date it was issued for. A completion whose date
//! is no longer displayed never touches the canvas or the text buffer, so a
//! slow load for yesterday cannot overwrite today.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use canvas::engine::{Action, CanvasController};
use canvas::geometry::{Point, Size};
use canvas::input::{Button, ImagePhase, Key, Modifiers, Target};
use canvas::transform::TransformOp;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

use crate::autosave::AutoSaveScheduler;
use crate::config::ClientConfig;
use crate::date_cursor::DateCursor;
use crate::gateway::{DiaryApi, GatewayError, ImageUpload, image_url};
use crate::notify::{Notification, NotificationService};
use crate::{DateKey, DiaryEntry, ImageRecord, ImageUpdate};

// =============================================================================
// EVENTS
// =============================================================================

/// User input delivered to the session.
#[derive(Debug, Clone)]
pub enum Event {
    /// The text area changed; carries the full new content.
    TextEdited(String),
    /// The text area lost focus.
    TextBlurred,
    /// Explicit save (button or Ctrl+S).
    SaveRequested,
    /// Move the displayed day by this many days.
    ChangeDate(i64),
    GoToToday,
    PointerDown { target: Target, at: Point, button: Button },
    PointerMove { at: Point },
    PointerUp { at: Point },
    Click { target: Target },
    ContextMenu { target: Target, at: Point },
    KeyDown { key: Key, modifiers: Modifiers },
    /// Transform the selected image.
    Transform(TransformOp),
    /// Replace the selected image's caption.
    SetCaption(String),
    /// Answer to the delete confirmation prompt.
    ConfirmDelete(bool),
    /// A file was picked; the caption prompt opens.
    FileChosen { name: String, bytes: Vec<u8> },
    /// The caption prompt was submitted.
    UploadCaption(String),
    CancelUpload,
    ContainerResized(Size),
    ViewportResized(Size),
    ImageMeasured { filename: String, size: Size },
    Shutdown,
}

/// Result of a spawned server call, tagged with the day it was issued for.
#[derive(Debug)]
enum Completion {
    Loaded { date: DateKey, result: Result<DiaryEntry, GatewayError> },
    Saved { date: DateKey, result: Result<(), GatewayError> },
    Uploaded { date: DateKey, result: Result<ImageRecord, GatewayError> },
    Updated { date: DateKey, filename: String, result: Result<(), GatewayError> },
    Deleted { date: DateKey, filename: String, result: Result<(), GatewayError> },
}

// =============================================================================
// VIEW
// =============================================================================

/// One image as the page should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageView {
    pub filename: String,
    pub url: String,
    pub caption: String,
    pub left: f64,
    pub top: f64,
    pub z_index: i64,
    /// CSS `transform` value.
    pub transform_css: String,
    pub phase: ImagePhase,
}

/// Snapshot of everything the page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub date: DateKey,
    /// Long form, e.g. "Friday, March 1, 2024".
    pub date_label: String,
    pub text: String,
    pub images: Vec<ImageView>,
    pub selected: Option<String>,
    pub controls_at: Option<Point>,
    /// Image waiting for delete confirmation.
    pub confirm_delete: Option<String>,
    /// File name waiting for a caption.
    pub upload_pending: Option<String>,
    pub notification: Option<Notification>,
    /// True while the displayed day is still loading.
    pub loading: bool,
    /// Text edits not yet sent to the server.
    pub unsaved: bool,
    pub in_flight: usize,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct DiarySession {
    api: Arc<dyn DiaryApi>,
    base_url: String,
    cursor: DateCursor,
    canvas: CanvasController,
    autosave: AutoSaveScheduler,
    notifications: NotificationService,
    text: String,
    pending_upload: Option<ImageUpload>,
    loading: bool,
    tasks: JoinSet<Completion>,
}

impl DiarySession {
    #[must_use]
    pub fn new(api: Arc<dyn DiaryApi>, config: &ClientConfig, cursor: DateCursor) -> Self {
        Self {
            api,
            base_url: config.base_url.clone(),
            cursor,
            canvas: CanvasController::new(),
            autosave: AutoSaveScheduler::new(config.autosave_quiet),
            notifications: NotificationService::new(config.notification_ttl),
            text: String::new(),
            pending_upload: None,
            loading: false,
            tasks: JoinSet::new(),
        }
    }

    /// Drive the page until [`Event::Shutdown`] or the sender is dropped.
    ///
    /// Loads the current day first. On exit, unsaved text is flushed and every
    /// in-flight request is awaited before the session is handed back.
    pub async fn run(mut self, mut events: mpsc::Receiver<Event>) -> Self {
        self.load_current();
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    if !self.handle(event) {
                        break;
                    }
                }
                Some(joined) = self.tasks.join_next() => self.on_joined(joined),
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.tick(Instant::now());
                }
            }
        }
        self.shutdown().await;
        self
    }

    /// Handle one input event. Returns `false` when the session should stop.
    pub fn handle(&mut self, event: Event) -> bool {
        let now = Instant::now();
        match event {
            Event::TextEdited(text) => {
                if self.loading {
                    debug!(date = %self.cursor.current(), "ignoring edit while the day is loading");
                } else {
                    self.text = text;
                    self.autosave.note_edit(now);
                }
            }
            Event::TextBlurred => self.flush_text(),
            Event::SaveRequested => self.save_now(),
            Event::ChangeDate(delta) => self.navigate(delta),
            Event::GoToToday => self.go_to_today(),
            Event::PointerDown { target, at, button } => {
                let actions = self.canvas.on_pointer_down(&target, at, button);
                self.dispatch(actions);
            }
            Event::PointerMove { at } => {
                let actions = self.canvas.on_pointer_move(at);
                self.dispatch(actions);
            }
            Event::PointerUp { at } => {
                let actions = self.canvas.on_pointer_up(at);
                self.dispatch(actions);
            }
            Event::Click { target } => {
                let actions = self.canvas.on_click(&target);
                self.dispatch(actions);
            }
            Event::ContextMenu { target, at } => {
                let actions = self.canvas.on_context_menu(&target, at);
                self.dispatch(actions);
            }
            Event::KeyDown { key, modifiers } => self.on_key(&key, modifiers),
            Event::Transform(op) => {
                if let Some(filename) = self.canvas.selection().map(str::to_owned) {
                    let actions = self.canvas.apply_transform(&filename, op);
                    self.dispatch(actions);
                }
            }
            Event::SetCaption(caption) => {
                if let Some(filename) = self.canvas.selection().map(str::to_owned) {
                    let actions = self.canvas.set_caption(&filename, &caption);
                    self.dispatch(actions);
                }
            }
            Event::ConfirmDelete(accepted) => {
                let actions = self.canvas.confirm_delete(accepted);
                self.dispatch(actions);
            }
            Event::FileChosen { name, bytes } => {
                debug!(file = %name, size = bytes.len(), "file chosen for upload");
                self.pending_upload = Some(ImageUpload::new(name, bytes));
            }
            Event::UploadCaption(caption) => self.upload(&caption),
            Event::CancelUpload => self.pending_upload = None,
            Event::ContainerResized(size) => self.canvas.set_container_size(size),
            Event::ViewportResized(size) => self.canvas.set_viewport_size(size),
            Event::ImageMeasured { filename, size } => self.canvas.set_image_size(&filename, size),
            Event::Shutdown => return false,
        }
        true
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let date = self.cursor.current();
        let images = self
            .canvas
            .images
            .iter()
            .map(|img| ImageView {
                filename: img.filename.clone(),
                url: image_url(&self.base_url, &img.filename),
                caption: img.caption.clone(),
                left: img.position_x,
                top: img.position_y,
                z_index: img.z_index,
                transform_css: img.transform().css(),
                phase: self.canvas.phase(&img.filename),
            })
            .collect();
        SessionView {
            date,
            date_label: date.label(),
            text: self.text.clone(),
            images,
            selected: self.canvas.selection().map(str::to_owned),
            controls_at: self.canvas.ui.controls_at,
            confirm_delete: self.canvas.ui.pending_delete.clone(),
            upload_pending: self.pending_upload.as_ref().map(|u| u.file_name.clone()),
            notification: self.notifications.current(Instant::now()).cloned(),
            loading: self.loading,
            unsaved: self.autosave.is_dirty(),
            in_flight: self.tasks.len(),
        }
    }

    // --- Timers ---

    fn next_deadline(&self) -> Option<Instant> {
        match (self.autosave.next_deadline(), self.notifications.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn tick(&mut self, now: Instant) {
        if self.autosave.poll(now) {
            self.spawn_save(self.cursor.current());
        }
        if let Some(gone) = self.notifications.expire(now) {
            debug!(message = %gone.message, "notification dismissed");
        }
    }

    // --- Text ---

    /// Save right away, regardless of pending edits. The buffer of a day that
    /// is still loading is not the day's text and is never saved.
    fn save_now(&mut self) {
        if self.loading {
            debug!(date = %self.cursor.current(), "ignoring save while the day is loading");
            return;
        }
        self.autosave.flush();
        self.spawn_save(self.cursor.current());
    }

    /// Save only if there are unsaved edits; cancels the debounce either way.
    fn flush_text(&mut self) {
        if self.autosave.flush() {
            self.spawn_save(self.cursor.current());
        }
    }

    // --- Navigation ---

    fn navigate(&mut self, delta: i64) {
        let from = self.cursor.current();
        self.flush_text();
        let to = self.cursor.advance(delta);
        if to == from {
            return;
        }
        info!(%from, %to, "changing day");
        self.enter_day();
    }

    fn go_to_today(&mut self) {
        self.flush_text();
        let to = self.cursor.reset_to_today();
        info!(%to, "going to today");
        self.enter_day();
    }

    fn enter_day(&mut self) {
        self.canvas.clear();
        self.text.clear();
        self.autosave.reset();
        self.pending_upload = None;
        self.load_current();
    }

    // --- Keyboard ---

    fn on_key(&mut self, key: &Key, modifiers: Modifiers) {
        if modifiers.command() {
            if key.is("s") {
                self.save_now();
                return;
            }
            if key.is("ArrowLeft") {
                self.navigate(-1);
                return;
            }
            if key.is("ArrowRight") {
                self.navigate(1);
                return;
            }
        }
        if key.is("Escape") {
            self.pending_upload = None;
        }
        let actions = self.canvas.on_key_down(key);
        self.dispatch(actions);
    }

    // --- Upload ---

    fn upload(&mut self, caption: &str) {
        let now = Instant::now();
        let Some(upload) = self.pending_upload.take() else {
            self.notifications.error("No file selected", now);
            return;
        };
        if let Err(e) = upload.validate() {
            self.notifications.error(format!("Failed to upload image: {e}"), now);
            return;
        }
        let date = self.cursor.current();
        let api = Arc::clone(&self.api);
        let caption = caption.to_owned();
        info!(%date, file = %upload.file_name, "uploading image");
        self.tasks.spawn(async move {
            let result = api.upload_image(date, upload, &caption).await;
            Completion::Uploaded { date, result }
        });
    }

    // --- Canvas actions ---

    fn dispatch(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::PersistImage(update) => self.spawn_update(update),
                Action::DeleteImage { filename } => self.spawn_delete(filename),
                Action::ConfirmDelete { filename } => debug!(%filename, "awaiting delete confirmation"),
                Action::ShowControls { .. } | Action::HideControls | Action::RenderNeeded => {}
            }
        }
    }

    // --- Requests ---

    fn load_current(&mut self) {
        let date = self.cursor.current();
        let api = Arc::clone(&self.api);
        self.loading = true;
        debug!(%date, "loading entry");
        self.tasks.spawn(async move {
            let result = api.fetch_entry(date).await;
            Completion::Loaded { date, result }
        });
    }

    fn spawn_save(&mut self, date: DateKey) {
        let api = Arc::clone(&self.api);
        let content = self.text.clone();
        debug!(%date, len = content.len(), "saving text");
        self.tasks.spawn(async move {
            let result = api.save_text(date, &content).await;
            Completion::Saved { date, result }
        });
    }

    fn spawn_update(&mut self, update: ImageUpdate) {
        let date = self.cursor.current();
        let api = Arc::clone(&self.api);
        self.tasks.spawn(async move {
            let filename = update.filename.clone();
            let result = api.update_image(&update).await;
            Completion::Updated { date, filename, result }
        });
    }

    fn spawn_delete(&mut self, filename: String) {
        let date = self.cursor.current();
        let api = Arc::clone(&self.api);
        info!(%date, %filename, "deleting image");
        self.tasks.spawn(async move {
            let result = api.delete_image(&filename).await;
            Completion::Deleted { date, filename, result }
        });
    }

    // --- Completions ---

    fn on_joined(&mut self, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(completion) => self.on_completion(completion),
            Err(e) => warn!(error = %e, "request task failed"),
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        let now = Instant::now();
        let current = self.cursor.current();
        match completion {
            Completion::Loaded { date, result } => {
                if date != current {
                    debug!(%date, %current, "ignoring load for a day no longer shown");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(entry) => {
                        self.text = entry.content;
                        self.autosave.reset();
                        self.canvas.load_images(entry.images);
                    }
                    Err(e) => {
                        warn!(%date, error = %e, "failed to load entry");
                        self.canvas.clear();
                        let message = describe(&e, "Connection error while loading entry", "Failed to load diary entry");
                        self.notifications.error(message, now);
                    }
                }
            }
            Completion::Saved { date, result } => match result {
                Ok(()) => {
                    info!(%date, "entry saved");
                    self.notifications.success("Diary entry saved successfully!", now);
                }
                Err(e) => {
                    warn!(%date, error = %e, "save failed");
                    if date == current {
                        self.autosave.mark_dirty();
                    }
                    let message = describe(&e, "Connection error while saving", "Failed to save diary entry");
                    self.notifications.error(message, now);
                }
            },
            Completion::Uploaded { date, result } => match result {
                Ok(record) => {
                    info!(%date, filename = %record.filename, "image uploaded");
                    if date == current {
                        let actions = self.canvas.add_image(record);
                        self.dispatch(actions);
                    }
                    self.notifications.success("Image uploaded successfully!", now);
                }
                Err(e) => {
                    warn!(%date, error = %e, "upload failed");
                    let message = describe(&e, "Connection error while uploading", "Failed to upload image");
                    self.notifications.error(message, now);
                }
            },
            Completion::Updated { date, filename, result } => {
                if let Err(e) = result {
                    warn!(%date, %filename, error = %e, "image update failed");
                    if date == current {
                        let message = describe(&e, "Connection error while updating image", "Failed to update image");
                        self.notifications.error(message, now);
                    }
                }
            }
            Completion::Deleted { date, filename, result } => match result {
                Ok(()) => {
                    if date == current {
                        let actions = self.canvas.apply_delete(&filename);
                        self.dispatch(actions);
                    }
                    self.notifications.success("Image deleted", now);
                }
                Err(e) => {
                    warn!(%date, %filename, error = %e, "delete failed");
                    let message = match &e {
                        GatewayError::Network(_) => "Connection error while deleting".to_owned(),
                        GatewayError::Server { message, .. } => format!("Failed to delete: {message}"),
                        other => format!("Failed to delete: {other}"),
                    };
                    self.notifications.error(message, now);
                }
            },
        }
    }

    async fn shutdown(&mut self) {
        self.flush_text();
        while let Some(joined) = self.tasks.join_next().await {
            self.on_joined(joined);
        }
        info!(date = %self.cursor.current(), "session stopped");
    }
}

/// User-facing text for a failed request.
///
/// Network failures get the connection message; server-provided errors are
/// shown as-is; anything else is appended to `fallback`.
fn describe(err: &GatewayError, connection: &str, fallback: &str) -> String {
    match err {
        GatewayError::Network(_) => connection.to_owned(),
        GatewayError::Server { message, .. } => message.clone(),
        other => format!("{fallback}: {other}"),
    }
}
