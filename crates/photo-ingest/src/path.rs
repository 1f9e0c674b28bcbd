//! Storage path derivation
//!
//! Maps a record to `<author>/<year>/<slug>_by_<author>_<id>` below the
//! output directory. [`build_path`] is pure and total: missing or malformed
//! fields fall back to sentinel segments instead of failing.
//!
//! The base filename embeds the raw author handle and id. Two records with the
//! same slug, author and id map to the same files and the later write wins.

use crate::record::{Record, FIELD_AUTHOR, FIELD_DESCRIPTION, FIELD_ID, FIELD_SUBMITTED_AT};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Author segment used when the record has no author
pub const UNKNOWN_AUTHOR: &str = "_unknown";
/// Year segment used when the timestamp is missing or unparsable
pub const UNKNOWN_DATE: &str = "_unknown_date";
/// Slug used when the record has no description
pub const UNTITLED: &str = "untitled";
/// Maximum slug length in characters
pub const MAX_SLUG_LEN: usize = 50;

pub const IMAGE_EXTENSION: &str = "jpg";
pub const METADATA_EXTENSION: &str = "json";

const ILLEGAL_PATH_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

static NON_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap_or_else(|e| panic!("bad slug regex: {e}")));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap_or_else(|e| panic!("bad whitespace regex: {e}")));

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Where one record's image and metadata live, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath {
    author_segment: String,
    year_segment: String,
    slug: String,
    base_name: String,
}

impl StoragePath {
    pub fn author_segment(&self) -> &str {
        &self.author_segment
    }

    pub fn year_segment(&self) -> &str {
        &self.year_segment
    }

    /// File stem shared by the image and its sidecar
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The slug portion of the base name
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// `<output_root>/<author>/<year>`
    pub fn directory(&self, output_root: &Path) -> PathBuf {
        output_root
            .join(&self.author_segment)
            .join(&self.year_segment)
    }

    pub fn image_path(&self, output_root: &Path) -> PathBuf {
        self.directory(output_root)
            .join(format!("{}.{IMAGE_EXTENSION}", self.base_name))
    }

    pub fn metadata_path(&self, output_root: &Path) -> PathBuf {
        self.directory(output_root)
            .join(format!("{}.{METADATA_EXTENSION}", self.base_name))
    }

    /// Image path as recorded in the manifest: `/`-separated and prefixed
    /// with the output directory name, independent of the host platform.
    pub fn manifest_path(&self, output_dir: &str) -> String {
        format!(
            "{}/{}/{}/{}.{IMAGE_EXTENSION}",
            output_dir.trim_end_matches('/'),
            self.author_segment,
            self.year_segment,
            self.base_name
        )
    }
}

/// Derive the storage path for a record
pub fn build_path(record: &Record) -> StoragePath {
    let raw_author = record.get_or_empty(FIELD_AUTHOR);
    let raw_id = record.get_or_empty(FIELD_ID);
    let slug = slugify(record.non_empty(FIELD_DESCRIPTION).unwrap_or(UNTITLED));

    StoragePath {
        author_segment: sanitize_author(raw_author),
        year_segment: year_segment(record.non_empty(FIELD_SUBMITTED_AT)),
        base_name: format!("{slug}_by_{raw_author}_{raw_id}"),
        slug,
    }
}

/// Replace path-hostile characters with `_`; empty input maps to [`UNKNOWN_AUTHOR`]
pub fn sanitize_author(author: &str) -> String {
    if author.is_empty() {
        return UNKNOWN_AUTHOR.to_string();
    }
    author.replace(ILLEGAL_PATH_CHARS, "_")
}

/// Lower-case, keep `[a-z0-9]` and whitespace, join words with `_`, cap at
/// [`MAX_SLUG_LEN`] characters.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept = NON_SLUG_CHARS.replace_all(&lowered, "");
    let joined = WHITESPACE_RUN.replace_all(&kept, "_");
    joined.chars().take(MAX_SLUG_LEN).collect()
}

fn year_segment(submitted_at: Option<&str>) -> String {
    submitted_at
        .and_then(parse_year)
        .filter(|year| (0..=9999).contains(year))
        .map_or_else(|| UNKNOWN_DATE.to_string(), |year| format!("{year:04}"))
}

/// Calendar year of a submission timestamp, if it parses
pub fn parse_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.year());
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.year());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.year())
}
