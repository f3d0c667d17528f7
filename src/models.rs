//! Records produced by the extractors.

use serde::Serialize;
use std::fmt;

/// Identity of one book, read from its landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    /// Site-assigned numeric identifier (kept as text).
    pub id: String,

    /// Display title.
    pub name: String,

    /// Landing page the record was read from.
    pub url: String,

    /// Not exposed by the landing page; always empty.
    pub author: String,

    /// Not exposed by the landing page; always empty.
    pub status: String,

    /// Not exposed by the landing page; always empty.
    pub last_update: String,
}

/// Kind of release a volume entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeType {
    /// 單行本 (tankōbon).
    Volume,
    /// 番外篇 (bonus chapter).
    Extra,
    /// 話 (serialized chapter).
    Serialized,
}

impl VolumeType {
    /// Returns the label the site uses for this type.
    pub fn label(self) -> &'static str {
        match self {
            VolumeType::Volume => "單行本",
            VolumeType::Extra => "番外篇",
            VolumeType::Serialized => "話",
        }
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One release unit belonging to a book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolInfo {
    pub id: String,

    /// Decoded recency/availability label.
    pub extra_info: String,

    /// True when the raw flag is "1".
    pub is_last: bool,

    pub vol_type: VolumeType,

    /// Ordering position as given by the feed.
    pub index: i64,

    /// Page count.
    pub pages: i64,

    /// Display label.
    pub name: String,

    /// File size in the site's units (MB).
    pub size: f64,
}
