//! iconset-pixel - clear near-black backgrounds from icon images
//!
//! Pixels whose red, green and blue channels are all below a [`Threshold`]
//! are replaced with fully transparent black. Everything else is kept
//! byte-for-byte.
//!
//! # Example
//! ```no_run
//! use iconset_pixel::{process_file, Threshold};
//!
//! let report = process_file("DevTools.iconset/icon_16x16.png", Threshold::default())?;
//! println!("cleared {} pixels", report.cleared);
//! # Ok::<(), iconset_pixel::ProcessError>(())
//! ```

pub mod error;
pub mod file;
pub mod transform;

pub use error::ProcessError;
pub use file::{process_file, FileReport};
pub use transform::{clear_near_black, is_near_black, Threshold, TRANSPARENT};
