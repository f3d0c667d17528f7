//! Volume listing from the book data feed.
//!
//! The landing page does not list volumes itself. Its last
//! `<script language="javascript">` block references a `book_data.php` feed
//! whose `volinfo` lines each carry one volume as a positional,
//! comma-separated record:
//!
//! ```text
//! parent.postMessage("volinfo=<id>,<extra>,<is_last>,<type>,<index>,<name>,<pages>,...,<size>", "*");
//! ```

use super::{ExtractOptions, ParseMode};
use crate::decode::{decode_extra_info, decode_volume_type};
use crate::error::ListerError;
use crate::models::VolInfo;
use crate::session::HttpSession;
use log::{debug, warn};
use regex::Regex;
use scraper::{Html, Selector};
use std::str::FromStr;
use std::sync::LazyLock;

/// Inline scripts that may reference the data feed.
static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[language="javascript"]"#).unwrap());

/// Relative path of the data feed inside the script text.
static FEED_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/book_data\.php\?h=\w+").unwrap());

/// Marker of lines in the feed that describe a volume.
const VOLINFO_MARKER: &str = "volinfo";

/// Length of the wrapper token (`volinfo=`) preceding the record fields.
pub const VOLINFO_PREFIX_LEN: usize = 8;

/// Minimum number of comma separated fields in a record.
pub const VOLINFO_FIELD_COUNT: usize = 12;

// Field positions inside a record.
const FIELD_ID: usize = 0;
const FIELD_EXTRA_INFO: usize = 1;
const FIELD_IS_LAST: usize = 2;
const FIELD_VOL_TYPE: usize = 3;
const FIELD_INDEX: usize = 4;
const FIELD_NAME: usize = 5;
const FIELD_PAGES: usize = 6;
const FIELD_SIZE: usize = 11;

/// Fetches the data feed referenced by the landing page and parses its
/// volume records, in feed order.
///
/// No feed request is made when the page carries no usable feed reference.
pub async fn extract_volumes(
    session: &dyn HttpSession,
    doc: &Html,
    options: &ExtractOptions,
) -> Result<Vec<VolInfo>, ListerError> {
    let script = last_javascript_block(doc)?;
    let feed_path = find_feed_path(&script)?;
    debug!("found data feed {}", feed_path);

    let feed_url = format!("{}{}", options.origin, feed_path);
    let body = session.get_text(&feed_url).await?;

    parse_feed(&body, options.mode)
}

/// Returns the text of the last `<script language="javascript">` block.
fn last_javascript_block(doc: &Html) -> Result<String, ListerError> {
    doc.select(&SCRIPT_SELECTOR)
        .last()
        .map(|elem| elem.text().collect())
        .ok_or(ListerError::NoScriptFound)
}

/// Finds the first `/book_data.php?h=<token>` path in script text.
pub fn find_feed_path(script: &str) -> Result<&str, ListerError> {
    FEED_PATH_REGEX
        .find(script)
        .map(|m| m.as_str())
        .ok_or_else(|| ListerError::PatternNotMatched("/book_data.php?h=<token>".to_string()))
}

/// Parses every `volinfo` line of a feed body.
///
/// In strict mode the first bad line aborts the whole parse; in lenient mode
/// bad lines are logged and skipped.
pub fn parse_feed(body: &str, mode: ParseMode) -> Result<Vec<VolInfo>, ListerError> {
    let mut volumes = Vec::new();

    for line in body.lines().filter(|line| line.contains(VOLINFO_MARKER)) {
        match parse_volinfo_line(line) {
            Ok(vol) => volumes.push(vol),
            Err(e) if mode == ParseMode::Lenient => warn!("skipping volinfo line: {}", e),
            Err(e) => return Err(e),
        }
    }

    debug!("parsed {} volumes", volumes.len());
    Ok(volumes)
}

/// Parses one feed line into a [`VolInfo`].
///
/// The record is the first double-quoted segment of the line with its
/// wrapper token removed.
pub fn parse_volinfo_line(line: &str) -> Result<VolInfo, ListerError> {
    let payload = line
        .split('"')
        .nth(1)
        .ok_or_else(|| ListerError::MalformedRecord(format!("no quoted payload in '{}'", line)))?;

    let record = strip_prefix_chars(payload, VOLINFO_PREFIX_LEN);
    let fields: Vec<&str> = record.split(',').collect();
    if fields.len() < VOLINFO_FIELD_COUNT {
        return Err(ListerError::MalformedRecord(format!(
            "expected {} fields, found {} in '{}'",
            VOLINFO_FIELD_COUNT,
            fields.len(),
            record
        )));
    }

    Ok(VolInfo {
        id: fields[FIELD_ID].to_string(),
        extra_info: decode_extra_info(fields[FIELD_EXTRA_INFO]),
        is_last: fields[FIELD_IS_LAST] == "1",
        vol_type: decode_volume_type(fields[FIELD_VOL_TYPE])?,
        index: parse_number("index", fields[FIELD_INDEX])?,
        name: fields[FIELD_NAME].to_string(),
        pages: parse_number("pages", fields[FIELD_PAGES])?,
        size: parse_number("size", fields[FIELD_SIZE])?,
    })
}

/// Drops the first `count` characters, yielding an empty string when the
/// input is shorter.
fn strip_prefix_chars(s: &str, count: usize) -> &str {
    s.char_indices()
        .nth(count)
        .map_or("", |(offset, _)| &s[offset..])
}

fn parse_number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ListerError> {
    raw.trim()
        .parse()
        .map_err(|_| ListerError::NumericParseFailure {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VolumeType;
    use crate::session::testing::StubSession;

    const SAMPLE_LINE: &str =
        r#"x(...)="volinfo=v1,0,1,單行本,3,VolName,45,f1,f2,f3,f4,12.5""#;

    fn page_with_scripts(scripts: &[&str]) -> Html {
        let blocks: String = scripts
            .iter()
            .map(|s| format!(r#"<script language="javascript">{}</script>"#, s))
            .collect();
        Html::parse_document(&format!("<html><head>{}</head><body></body></html>", blocks))
    }

    #[test]
    fn test_parse_sample_line() {
        let vol = parse_volinfo_line(SAMPLE_LINE).unwrap();
        assert_eq!(vol.id, "v1");
        assert_eq!(vol.extra_info, "無");
        assert!(vol.is_last);
        assert_eq!(vol.vol_type, VolumeType::Volume);
        assert_eq!(vol.index, 3);
        assert_eq!(vol.name, "VolName");
        assert_eq!(vol.pages, 45);
        assert_eq!(vol.size, 12.5);
    }

    #[test]
    fn test_prefix_is_counted_in_characters() {
        let line = r#"postMessage("卷資料一二三四五1001,2,0,話,7,第 07 話,20,a,b,c,d,3.2")"#;
        let vol = parse_volinfo_line(line).unwrap();
        assert_eq!(vol.id, "1001");
        assert_eq!(vol.extra_info, "90天內曾下載/推送");
        assert!(!vol.is_last);
        assert_eq!(vol.vol_type, VolumeType::Serialized);
        assert_eq!(vol.name, "第 07 話");
    }

    #[test]
    fn test_unknown_extra_info_is_kept() {
        let line = r#"a="volinfo=v2,9,0,番外篇,1,Extra,10,f,f,f,f,1""#;
        let vol = parse_volinfo_line(line).unwrap();
        assert_eq!(vol.extra_info, "未知(9)");
        assert_eq!(vol.vol_type, VolumeType::Extra);
        assert_eq!(vol.size, 1.0);
    }

    #[test]
    fn test_line_without_quotes() {
        assert!(matches!(
            parse_volinfo_line("volinfo=v1,0,1"),
            Err(ListerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_short_record() {
        let line = r#"x="volinfo=v1,0,1,單行本,3,VolName,45,f1,f2,f3""#;
        assert!(matches!(
            parse_volinfo_line(line),
            Err(ListerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_payload_shorter_than_prefix() {
        assert!(matches!(
            parse_volinfo_line(r#"x="volinfo""#),
            Err(ListerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_non_numeric_fields() {
        let bad_pages = r#"x="volinfo=v1,0,1,單行本,3,VolName,many,f,f,f,f,12.5""#;
        match parse_volinfo_line(bad_pages) {
            Err(ListerError::NumericParseFailure { field, value }) => {
                assert_eq!(field, "pages");
                assert_eq!(value, "many");
            }
            other => panic!("expected NumericParseFailure, got {:?}", other),
        }

        let bad_size = r#"x="volinfo=v1,0,1,單行本,3,VolName,45,f,f,f,f,big""#;
        assert!(matches!(
            parse_volinfo_line(bad_size),
            Err(ListerError::NumericParseFailure { field: "size", .. })
        ));
    }

    #[test]
    fn test_unknown_volume_type() {
        let line = r#"x="volinfo=v1,0,1,未知,3,VolName,45,f,f,f,f,12.5""#;
        match parse_volinfo_line(line) {
            Err(ListerError::InvalidEnumValue(raw)) => assert_eq!(raw, "未知"),
            other => panic!("expected InvalidEnumValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_feed_filters_and_keeps_order() {
        let body = format!(
            "var x = 1;\n{}\n// comment\n{}\n",
            r#"a="volinfo=b,0,0,話,2,Second,10,f,f,f,f,1.5""#,
            r#"a="volinfo=a,1,1,單行本,1,First,90,f,f,f,f,30""#
        );

        let vols = parse_feed(&body, ParseMode::Strict).unwrap();
        let ids: Vec<&str> = vols.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_parse_feed_strict_aborts_on_bad_line() {
        let body = format!(
            "{}\n{}\n",
            SAMPLE_LINE, r#"x="volinfo=v2,0,1,單行本,3,VolName,45,f1,f2,f3""#
        );

        assert!(matches!(
            parse_feed(&body, ParseMode::Strict),
            Err(ListerError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_parse_feed_lenient_skips_bad_line() {
        let body = format!(
            "{}\n{}\n{}\n",
            r#"x="volinfo=v0,0,1,未知,3,VolName,45,f,f,f,f,12.5""#,
            SAMPLE_LINE,
            r#"x="volinfo=v2,0,1,單行本,3""#
        );

        let vols = parse_feed(&body, ParseMode::Lenient).unwrap();
        assert_eq!(vols.len(), 1);
        assert_eq!(vols[0].id, "v1");
    }

    #[test]
    fn test_find_feed_path() {
        let script = r#"var a = 1; loadData("/book_data.php?h=9f3c2ab1e0");"#;
        assert_eq!(find_feed_path(script).unwrap(), "/book_data.php?h=9f3c2ab1e0");

        assert!(matches!(
            find_feed_path("var a = '/book_data.php?h=';"),
            Err(ListerError::PatternNotMatched(_))
        ));
    }

    #[test]
    fn test_last_javascript_block_is_used() {
        let doc = page_with_scripts(&["var first = 1;", "var last = 2;"]);
        assert_eq!(last_javascript_block(&doc).unwrap(), "var last = 2;");
    }

    #[test]
    fn test_no_javascript_block() {
        let doc = Html::parse_document(
            r#"<html><head><script>var untagged = "/book_data.php?h=abc";</script></head></html>"#,
        );
        assert!(matches!(
            last_javascript_block(&doc),
            Err(ListerError::NoScriptFound)
        ));
    }

    #[tokio::test]
    async fn test_extract_volumes_fetches_feed() {
        let doc = page_with_scripts(&["var a;", r#"x("/book_data.php?h=ab12");"#]);
        let session =
            StubSession::new().with_page("https://kox.moe/book_data.php?h=ab12", SAMPLE_LINE);

        let vols = extract_volumes(&session, &doc, &ExtractOptions::default())
            .await
            .unwrap();
        assert_eq!(vols.len(), 1);
        assert_eq!(session.requests(), ["https://kox.moe/book_data.php?h=ab12"]);
    }

    #[tokio::test]
    async fn test_extract_volumes_uses_configured_origin() {
        let doc = page_with_scripts(&[r#"x("/book_data.php?h=ab12");"#]);
        let session =
            StubSession::new().with_page("https://mox.moe/book_data.php?h=ab12", SAMPLE_LINE);
        let options = ExtractOptions {
            origin: "https://mox.moe".to_string(),
            ..ExtractOptions::default()
        };

        assert_eq!(extract_volumes(&session, &doc, &options).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_no_feed_request_without_pattern() {
        // Only the last block is searched, even if an earlier one matches.
        let doc = page_with_scripts(&[r#"x("/book_data.php?h=ab12");"#, "var nothing;"]);
        let session = StubSession::new();

        let result = extract_volumes(&session, &doc, &ExtractOptions::default()).await;
        assert!(matches!(result, Err(ListerError::PatternNotMatched(_))));
        assert!(session.requests().is_empty());
    }
}
