//! Two-stage extraction of a book and its volume listing.
//!
//! The landing page is fetched once and parsed; the book identity is read
//! from its markup, then the volume feed it references is fetched and parsed.

mod book;
mod volumes;

pub use book::extract_book_info;
pub use volumes::{
    VOLINFO_FIELD_COUNT, VOLINFO_PREFIX_LEN, extract_volumes, find_feed_path, parse_feed,
    parse_volinfo_line,
};

use crate::error::ListerError;
use crate::models::{BookInfo, VolInfo};
use crate::session::HttpSession;
use log::debug;
use scraper::Html;

/// Origin the data feed path is resolved against.
pub const DEFAULT_ORIGIN: &str = "https://kox.moe";

/// How malformed volinfo lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Any bad line aborts the extraction.
    #[default]
    Strict,
    /// Bad lines are logged and skipped.
    Lenient,
}

/// Options for [`extract_book_info_and_volumes_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Origin prepended to the feed path, without a trailing slash.
    pub origin: String,
    pub mode: ParseMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            mode: ParseMode::Strict,
        }
    }
}

/// Extracts the book info and its volumes from a landing page URL, using the
/// default origin in strict mode.
pub async fn extract_book_info_and_volumes(
    session: &dyn HttpSession,
    url: &str,
) -> Result<(BookInfo, Vec<VolInfo>), ListerError> {
    extract_book_info_and_volumes_with(session, url, &ExtractOptions::default()).await
}

/// Extracts the book info and its volumes from a landing page URL.
pub async fn extract_book_info_and_volumes_with(
    session: &dyn HttpSession,
    url: &str,
    options: &ExtractOptions,
) -> Result<(BookInfo, Vec<VolInfo>), ListerError> {
    let body = session.get_text(url).await?;
    let doc = Html::parse_document(&body);

    let book = extract_book_info(url, &doc)?;
    debug!("book {} '{}'", book.id, book.name);

    let volumes = extract_volumes(session, &doc, options).await?;
    Ok((book, volumes))
}
