// File: ./src/format/mod.rs
//! Pure conversions used by the form pickers and the invitation renderer.
//!
//! Times travel in two shapes: the 12-hour display string the pickers
//! produce (`"04:00 PM"`) and the 24-hour storage string (`"16:00"`). Dates
//! are stored as ISO `YYYY-MM-DD` and rendered per card language.
//! Nothing here keeps state or touches the filesystem.
pub mod date;
pub mod time;

pub use date::{ShortDate, format_date_long, format_date_short, parse_iso_date};
pub use time::{Period, Time12, to_12_hour, to_24_hour};
