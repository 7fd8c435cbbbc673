//! Canvas state and input engine for the diary page.
//!
//! This crate owns everything about the photo canvas that can be expressed
//! without I/O: the image records of the displayed day, the per-image
//! transform math, and the pointer/selection state machine. Input handlers
//! return [`engine::Action`]s; the host (the diary session) is responsible for
//! turning them into network calls and confirmation prompts.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Canvas controller: selection, drag, controls panel, actions |
//! | [`doc`] | Diary entry / image record types and the in-memory image store |
//! | [`transform`] | Rotation, scale and tilt state and its CSS derivation |
//! | [`geometry`] | Points, sizes, drag clamping and panel placement |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`consts`] | Shared numeric constants (clamp limits, default placement, etc.) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod input;
pub mod transform;
