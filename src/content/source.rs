//! Where post sources come from
//!
//! The collector and loader never touch paths directly. They ask a
//! [`SourceEnumerator`] for every post, or a [`ContentResolver`] for one.
//! [`FsSource`] globs a posts directory; [`MemorySource`] serves a fixed
//! manifest, which is what the tests and embedded builds use.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::ContentError;

lazy_static! {
    /// Directory names usable as slugs: any non-hidden name without separators
    /// or control characters. Rules out `..` and `.hidden` through the leading dot.
    static ref SLUG_RE: Regex = Regex::new(r"^[^./\\\p{Cc}][^/\\\p{Cc}]*$").unwrap();
}

/// Check that `slug` can name a post directory
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Raw source of one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Directory name of the post
    pub slug: String,
    /// Human-readable location, for diagnostics
    pub origin: String,
    /// Unparsed file content
    pub raw: String,
}

/// Lists every post source
pub trait SourceEnumerator {
    fn enumerate(&self) -> Result<Vec<SourceFile>, ContentError>;
}

/// Finds the source of a single post
pub trait ContentResolver {
    fn resolve(&self, slug: &str) -> Result<SourceFile, ContentError>;
}

/// Posts stored as `{root}/{slug}/{file_name}` on disk
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    file_name: String,
}

impl FsSource {
    pub fn new<P: AsRef<Path>>(root: P, file_name: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file_name: file_name.into(),
        }
    }

    fn pattern(&self) -> String {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let file = glob::Pattern::escape(&self.file_name);
        format!("{}/*/{}", root.trim_end_matches('/'), file)
    }
}

impl SourceEnumerator for FsSource {
    fn enumerate(&self) -> Result<Vec<SourceFile>, ContentError> {
        let options = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: true,
        };

        let mut sources = Vec::new();
        for entry in glob::glob_with(&self.pattern(), options)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let Some(slug) = slug_of(&path) else {
                tracing::warn!("Skipping {:?}: directory name is not a valid slug", path);
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(raw) => sources.push(SourceFile {
                    slug,
                    origin: path.display().to_string(),
                    raw,
                }),
                Err(e) => tracing::warn!("Failed to read {:?}: {}", path, e),
            }
        }

        tracing::debug!("Found {} post sources under {:?}", sources.len(), self.root);
        Ok(sources)
    }
}

impl ContentResolver for FsSource {
    fn resolve(&self, slug: &str) -> Result<SourceFile, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::NotFound(slug.to_string()));
        }

        let path = self.root.join(slug).join(&self.file_name);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(SourceFile {
                slug: slug.to_string(),
                origin: path.display().to_string(),
                raw,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ContentError::NotFound(slug.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Slug of a source file: the name of the directory holding it
fn slug_of(path: &Path) -> Option<String> {
    let name = path.parent()?.file_name()?.to_str()?;
    is_valid_slug(name).then(|| name.to_string())
}

/// Posts held in memory, keyed by slug
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    posts: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(mut self, slug: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(slug, raw);
        self
    }

    pub fn insert(&mut self, slug: impl Into<String>, raw: impl Into<String>) {
        self.posts.insert(slug.into(), raw.into());
    }

    fn source_file(slug: &str, raw: &str) -> SourceFile {
        SourceFile {
            slug: slug.to_string(),
            origin: format!("memory:{}", slug),
            raw: raw.to_string(),
        }
    }
}

impl SourceEnumerator for MemorySource {
    fn enumerate(&self) -> Result<Vec<SourceFile>, ContentError> {
        Ok(self
            .posts
            .iter()
            .map(|(slug, raw)| Self::source_file(slug, raw))
            .collect())
    }
}

impl ContentResolver for MemorySource {
    fn resolve(&self, slug: &str) -> Result<SourceFile, ContentError> {
        self.posts
            .get(slug)
            .map(|raw| Self::source_file(slug, raw))
            .ok_or_else(|| ContentError::NotFound(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("post_2.v1"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug(".hidden"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a\\b"));
        assert!(!is_valid_slug("a\nb"));
        assert!(is_valid_slug("héllo-wörld"));
        assert!(is_valid_slug("my post"));
    }

    #[test]
    fn test_non_ascii_slugs_are_listed_and_resolved() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "héllo-wörld/main.md", "accents");
        write(tmp.path(), "my post/main.md", "spaces");
        write(tmp.path(), "ascii/main.md", "plain");

        let source = FsSource::new(tmp.path(), "main.md");
        let mut slugs: Vec<_> = source.enumerate().unwrap().into_iter().map(|s| s.slug).collect();
        slugs.sort();
        assert_eq!(slugs, vec!["ascii", "héllo-wörld", "my post"]);

        assert_eq!(source.resolve("héllo-wörld").unwrap().raw, "accents");
        assert_eq!(source.resolve("my post").unwrap().raw, "spaces");
    }

    #[test]
    fn test_enumerate_posts_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "first/main.md", "one");
        write(tmp.path(), "second/main.md", "two");
        write(tmp.path(), "second/cover.png", "png");
        write(tmp.path(), "no-source/notes.md", "ignored");
        write(tmp.path(), ".hidden/main.md", "ignored");
        write(tmp.path(), "main.md", "not inside a post directory");

        let source = FsSource::new(tmp.path(), "main.md");
        let mut found = source.enumerate().unwrap();
        found.sort_by(|a, b| a.slug.cmp(&b.slug));

        let slugs: Vec<_> = found.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);
        assert_eq!(found[1].raw, "two");
    }

    #[test]
    fn test_enumerate_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let source = FsSource::new(tmp.path().join("nope"), "main.md");
        assert!(source.enumerate().unwrap().is_empty());
    }

    #[test]
    fn test_resolve() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "hello-world/main.md", "hello");

        let source = FsSource::new(tmp.path(), "main.md");
        let file = source.resolve("hello-world").unwrap();
        assert_eq!(file.slug, "hello-world");
        assert_eq!(file.raw, "hello");

        assert!(source.resolve("does-not-exist").unwrap_err().is_not_found());
        assert!(source.resolve("../hello-world").unwrap_err().is_not_found());
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with_post("b", "bee")
            .with_post("a", "ay");

        let all = source.enumerate().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].slug, "a");
        assert_eq!(source.resolve("b").unwrap().raw, "bee");
        assert!(source.resolve("c").unwrap_err().is_not_found());
    }
}
