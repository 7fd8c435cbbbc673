//! Diary client: the behavior layer behind the diary page.
//!
//! DESIGN
//! ======
//! The page is modelled as a single-threaded reactive loop ([`session`]):
//! input events and network completions arrive as messages and are handled
//! one at a time. The canvas state machine lives in the `canvas` crate and
//! returns actions; this crate turns those actions into HTTP calls through
//! the [`gateway`], debounces text saves ([`autosave`]), and reports outcomes
//! through short-lived notifications ([`notify`]).
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Environment-driven client settings |
//! | [`date_cursor`] | The displayed calendar day |
//! | [`gateway`] | `DiaryApi` trait and its `reqwest` implementation |
//! | [`autosave`] | Debounced text-save scheduling |
//! | [`notify`] | Auto-dismissed status messages |
//! | [`session`] | Event loop tying everything together |

pub mod autosave;
pub mod config;
pub mod date_cursor;
pub mod gateway;
pub mod notify;
pub mod session;

pub use canvas::doc::{DateKey, DiaryEntry, ImageRecord, ImageUpdate};
