//! Document model: diary entries, image records, and the in-memory image store.
//!
//! This module defines the data that describes one day of the diary
//! (`DiaryEntry`), each attached photo and its placement (`ImageRecord`), the
//! canonical date key that addresses an entry (`DateKey`), the full-record
//! update payload sent back to the server (`ImageUpdate`), and the runtime
//! store that owns the images of the displayed day (`ImageStore`).
//!
//! Images are keyed by their server-assigned filename everywhere; there is no
//! separate numeric id.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_POSITION_X, DEFAULT_POSITION_Y, DEFAULT_Z_INDEX};
use crate::transform::Transform;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Keys are four-digit years; outside this range `%Y` is not `YYYY`.
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

/// Error parsing a canonical date key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key `{0}` (expected YYYY-MM-DD)")]
pub struct DateKeyError(pub String);

/// Canonical `YYYY-MM-DD` calendar date addressing one diary entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// A key for `date`, or `None` if its year does not have four digits.
    #[must_use]
    pub fn try_new(date: NaiveDate) -> Option<Self> {
        Self::in_range(date).then_some(Self(date))
    }

    /// Build a key from year/month/day, or `None` if the date does not exist
    /// or falls outside years 0001..=9999.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).and_then(Self::try_new)
    }

    /// Whether `date` formats as a canonical `YYYY-MM-DD` key.
    #[must_use]
    pub fn in_range(date: NaiveDate) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&date.year())
    }

    #[must_use]
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Long display form, e.g. `Friday, March 1, 2024`.
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == 10
            && s.bytes()
                .enumerate()
                .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
        if !well_formed {
            return Err(DateKeyError(s.to_owned()));
        }
        match NaiveDate::parse_from_str(s, DATE_KEY_FORMAT) {
            Ok(date) if Self::in_range(date) => Ok(Self(date)),
            _ => Err(DateKeyError(s.to_owned())),
        }
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// A photo attached to a diary entry, with its placement on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawImageRecord")]
pub struct ImageRecord {
    /// Server-assigned identifier; the only key used for update and delete.
    pub filename: String,
    /// Caption shown above the photo. Empty when the user gave none.
    pub caption: String,
    /// Left offset inside the canvas, in CSS pixels.
    pub position_x: f64,
    /// Top offset inside the canvas, in CSS pixels.
    pub position_y: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Horizontal skew in degrees.
    pub tilt_x: f64,
    /// Vertical skew in degrees.
    pub tilt_y: f64,
    /// Stacking order; higher values are drawn on top.
    pub z_index: i64,
}

/// Wire shape of an image record. Every field but the filename may be absent or null.
#[derive(Deserialize)]
struct RawImageRecord {
    filename: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    position_x: Option<f64>,
    #[serde(default)]
    position_y: Option<f64>,
    #[serde(default)]
    rotation: Option<f64>,
    #[serde(default)]
    scale: Option<f64>,
    #[serde(default)]
    tilt_x: Option<f64>,
    #[serde(default)]
    tilt_y: Option<f64>,
    #[serde(default)]
    z_index: Option<i64>,
}

impl From<RawImageRecord> for ImageRecord {
    fn from(raw: RawImageRecord) -> Self {
        Self {
            filename: raw.filename,
            caption: raw.caption.unwrap_or_default(),
            position_x: raw.position_x.unwrap_or(0.0),
            position_y: raw.position_y.unwrap_or(0.0),
            rotation: raw.rotation.unwrap_or(0.0),
            scale: raw.scale.unwrap_or(1.0),
            tilt_x: raw.tilt_x.unwrap_or(0.0),
            tilt_y: raw.tilt_y.unwrap_or(0.0),
            z_index: raw.z_index.unwrap_or(DEFAULT_Z_INDEX),
        }
    }
}

impl ImageRecord {
    /// A freshly uploaded image at the default placement with an identity transform.
    #[must_use]
    pub fn uploaded(filename: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            caption: caption.into(),
            position_x: DEFAULT_POSITION_X,
            position_y: DEFAULT_POSITION_Y,
            rotation: 0.0,
            scale: 1.0,
            tilt_x: 0.0,
            tilt_y: 0.0,
            z_index: DEFAULT_Z_INDEX,
        }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform { rotation: self.rotation, scale: self.scale, tilt_x: self.tilt_x, tilt_y: self.tilt_y }
    }

    pub fn set_transform(&mut self, t: Transform) {
        self.rotation = t.rotation;
        self.scale = t.scale;
        self.tilt_x = t.tilt_x;
        self.tilt_y = t.tilt_y;
    }

    /// Clamp scale and tilt into the canvas policy, leaving other fields alone.
    pub fn normalize(&mut self) {
        let t = Transform::normalized(self.rotation, self.scale, self.tilt_x, self.tilt_y);
        self.set_transform(t);
    }

    /// Full-record update payload for this image.
    #[must_use]
    pub fn to_update(&self) -> ImageUpdate {
        ImageUpdate {
            filename: self.filename.clone(),
            position_x: self.position_x,
            position_y: self.position_y,
            rotation: self.rotation,
            scale: self.scale,
            tilt_x: self.tilt_x,
            tilt_y: self.tilt_y,
            caption: self.caption.clone(),
        }
    }
}

/// Full overwrite of one image's stored placement. Never a partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUpdate {
    pub filename: String,
    pub position_x: f64,
    pub position_y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub tilt_x: f64,
    pub tilt_y: f64,
    pub caption: String,
}

/// One day of the diary.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    pub date: DateKey,
    pub content: String,
    /// Images in the order the server returned them.
    pub images: Vec<ImageRecord>,
}

impl DiaryEntry {
    /// The entry for a day that has never been saved.
    #[must_use]
    pub fn empty(date: DateKey) -> Self {
        Self { date, content: String::new(), images: Vec::new() }
    }
}

/// In-memory store of the images on the displayed day, in insertion order.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: Vec<ImageRecord>,
}

impl ImageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Insert an image, replacing in place any image with the same filename.
    pub fn insert(&mut self, image: ImageRecord) {
        if let Some(existing) = self.get_mut(&image.filename) {
            *existing = image;
        } else {
            self.images.push(image);
        }
    }

    /// Remove an image by filename, returning it if it was present.
    pub fn remove(&mut self, filename: &str) -> Option<ImageRecord> {
        let idx = self.images.iter().position(|img| img.filename == filename)?;
        Some(self.images.remove(idx))
    }

    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|img| img.filename == filename)
    }

    pub fn get_mut(&mut self, filename: &str) -> Option<&mut ImageRecord> {
        self.images.iter_mut().find(|img| img.filename == filename)
    }

    /// Replace all images with a fresh set, e.g. after switching days.
    pub fn load_snapshot(&mut self, images: Vec<ImageRecord>) {
        self.images.clear();
        for image in images {
            self.insert(image);
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Images in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.images.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ImageRecord> {
        self.images.iter_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
