//! Book identity from the landing page.

use crate::error::ListerError;
use crate::models::BookInfo;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Large highlighted title text.
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("font.text_bglight_big").unwrap());

/// Hidden form field carrying the numeric book id.
static BOOK_ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="bookid"]"#).unwrap());

/// Reads the title and book id from a landing page.
///
/// Author, status and last update are not exposed on this page and are left
/// empty.
pub fn extract_book_info(url: &str, doc: &Html) -> Result<BookInfo, ListerError> {
    let name = doc
        .select(&TITLE_SELECTOR)
        .next()
        .map(|elem| elem.text().collect::<String>())
        .ok_or_else(|| ListerError::RequiredFieldMissing("book title".to_string()))?;

    let id = doc
        .select(&BOOK_ID_SELECTOR)
        .next()
        .and_then(|elem| elem.value().attr("value"))
        .ok_or_else(|| ListerError::RequiredFieldMissing("bookid".to_string()))?
        .to_string();

    Ok(BookInfo {
        id,
        name,
        url: url.to_string(),
        author: String::new(),
        status: String::new(),
        last_update: String::new(),
    })
}
