//! Pure text processing: from raw bytes to chapters.
//!
//! - `encoding`: encoding detection and normalization to UTF-8
//! - `segment`: chapter heading detection and segmentation
//!
//! Neither module touches the file system. The loader ([`crate::model`])
//! reads bytes and calls these functions.

mod encoding;
mod segment;

pub use encoding::{LOW_CONFIDENCE, Normalized, TextEncoding, normalize};
pub use segment::{PREFACE_TITLE, heading_title, segment};
