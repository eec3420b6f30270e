//! Post loader - resolves a single post by slug for its detail page

use std::sync::Arc;

use super::collector::split_source;
use super::post::{asset_path, is_remote};
use super::source::ContentResolver;
use super::{ContentError, LoadedPost, MarkdownRenderer, PostMeta, PostOptions};

/// Loads and renders one post at a time
pub struct PostLoader<R> {
    resolver: R,
    options: PostOptions,
    renderer: Arc<MarkdownRenderer>,
}

impl<R: ContentResolver> PostLoader<R> {
    pub fn new(resolver: R, options: PostOptions, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            resolver,
            options,
            renderer,
        }
    }

    /// Load the post stored under `slug`.
    ///
    /// Drafts load too, so they can be previewed by direct link. Any failure
    /// to find, read or parse the post is reported as `NotFound(slug)`.
    pub fn load_post(&self, slug: &str) -> Result<LoadedPost, ContentError> {
        self.try_load(slug).map_err(|e| {
            if !e.is_not_found() {
                tracing::debug!("Failed to load {}: {}", slug, e);
            }
            ContentError::NotFound(slug.to_string())
        })
    }

    fn try_load(&self, slug: &str) -> Result<LoadedPost, ContentError> {
        let source = self.resolver.resolve(slug)?;
        let (fm, body) = split_source(&source)?;
        let meta = PostMeta::from_front_matter(&source.slug, fm, &self.options)?;

        let prefix = &self.options.asset_prefix;
        let content = self.renderer.render(body, |dest| {
            if is_remote(dest) || dest.starts_with('/') || dest.starts_with('#') {
                None
            } else {
                asset_path(prefix, &source.slug, dest)
            }
        });

        Ok(LoadedPost {
            content,
            meta,
            slug: source.slug.clone(),
        })
    }
}
