//! Post model and metadata normalization

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::{ContentError, FrontMatter};

/// Characters escaped inside a single asset URL segment. `%` is left alone so
/// that an already-rewritten path comes out unchanged.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Date-time layouts accepted for `date` without an explicit offset
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts, interpreted as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// The closed set of post tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Sveltekit,
    Svelte,
}

impl Tag {
    pub const ALL: [Tag; 2] = [Tag::Sveltekit, Tag::Svelte];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Sveltekit => "sveltekit",
            Tag::Svelte => "svelte",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown tag {0:?} (expected one of: sveltekit, svelte)")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s.trim())
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Settings that shape how raw metadata becomes a `PostMeta`
#[derive(Debug, Clone)]
pub struct PostOptions {
    /// URL prefix under which post assets are served, e.g. `/posts`
    pub asset_prefix: String,
    /// Zone used for dates written without an offset
    pub timezone: Tz,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            asset_prefix: "/posts".to_string(),
            timezone: Tz::UTC,
        }
    }
}

/// Validated post metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMeta {
    pub title: String,
    pub description: String,
    /// Date as written by the author
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub tags: Vec<Tag>,
    pub published: bool,
    /// Parsed `date`, used for ordering
    #[serde(skip)]
    pub timestamp: DateTime<Utc>,
}

impl PostMeta {
    /// Validate a raw metadata block for the post stored under `slug`.
    ///
    /// `title`, `description` and `date` are required; `published` defaults
    /// to false and `tags` to empty. `cover` is rewritten to an asset URL.
    pub fn from_front_matter(
        slug: &str,
        fm: FrontMatter,
        options: &PostOptions,
    ) -> Result<Self, ContentError> {
        let title = required(slug, "title", fm.title)?;
        if title.trim().is_empty() {
            return Err(ContentError::malformed(slug, "title", "title is empty"));
        }
        let description = required(slug, "description", fm.description)?;
        let date = required(slug, "date", fm.date)?;

        let timestamp = parse_date(&date, options.timezone).ok_or_else(|| {
            ContentError::malformed(slug, "date", format!("cannot parse {:?} as a date", date))
        })?;

        let tags = fm
            .tags
            .iter()
            .map(|t| t.parse::<Tag>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ContentError::malformed(slug, "tags", e.to_string()))?;

        let cover = match fm.cover.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(cover) if is_remote(cover) => Some(cover.to_string()),
            Some(cover) => Some(asset_path(&options.asset_prefix, slug, cover).ok_or_else(
                || ContentError::malformed(slug, "cover", format!("{:?} has no file name", cover)),
            )?),
        };

        Ok(Self {
            title,
            description,
            date,
            cover,
            tags,
            published: fm.published.unwrap_or(false),
            timestamp,
        })
    }
}

fn required(slug: &str, field: &'static str, value: Option<String>) -> Result<String, ContentError> {
    value.ok_or_else(|| ContentError::malformed(slug, field, "missing"))
}

/// A post as it appears in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub slug: String,
    #[serde(flatten)]
    pub meta: PostMeta,
}

impl Post {
    pub fn new(slug: impl Into<String>, meta: PostMeta) -> Self {
        Self {
            slug: slug.into(),
            meta,
        }
    }

    pub fn is_published(&self) -> bool {
        self.meta.published
    }
}

/// A single post resolved for its detail page
#[derive(Debug, Clone, Serialize)]
pub struct LoadedPost {
    /// Rendered HTML body
    pub content: String,
    pub meta: PostMeta,
    pub slug: String,
}

/// Build the served URL of an asset stored next to a post.
///
/// Only the last path segment of `reference` is kept, so `./images/foo.png`
/// and `/posts/hello-world/foo.png` both map to `/posts/hello-world/foo.png`.
/// Returns `None` when the reference has no file name.
pub fn asset_path(prefix: &str, slug: &str, reference: &str) -> Option<String> {
    let file_name = reference
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")?;

    Some(format!(
        "{}/{}/{}",
        prefix.trim_end_matches('/'),
        utf8_percent_encode(slug, SEGMENT),
        utf8_percent_encode(file_name, SEGMENT)
    ))
}

/// Absolute URLs (with a scheme or protocol-relative) are left untouched
pub fn is_remote(reference: &str) -> bool {
    reference.contains("://") || reference.starts_with("//") || reference.starts_with("data:")
}

/// Parse a front-matter date. Values without an offset are read in `tz`.
pub fn parse_date(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(day) = NaiveDate::parse_from_str(s, fmt) {
            return localize(day.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

/// Read `naive` as wall-clock time in `tz`. A time skipped by a DST jump is
/// moved forward by the size of the gap (one hour).
fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
