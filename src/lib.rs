//! kox-lister - book and volume metadata extraction for kox.moe.
//!
//! This library provides functionality for:
//! - Reading a book's identity from its landing page
//! - Locating and parsing the volume data feed the page references
//! - Decoding the coded volume fields into readable values

pub mod config;
pub mod console;
mod cookies;
pub mod decode;
pub mod error;
pub mod extract;
pub mod models;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use console::Console;
pub use decode::{decode_extra_info, decode_volume_type};
pub use error::{ConfigError, ListerError};
pub use extract::{
    ExtractOptions, ParseMode, extract_book_info, extract_book_info_and_volumes,
    extract_book_info_and_volumes_with, extract_volumes,
};
pub use models::{BookInfo, VolInfo, VolumeType};
pub use session::{HttpSession, ReqwestSession};
