//! Post collector - builds the newest-first listing of posts

use std::cmp::Ordering;

use super::source::{SourceEnumerator, SourceFile};
use super::{ContentError, FrontMatter, Post, PostMeta, PostOptions};

/// Every post a source yielded, split into valid and rejected
#[derive(Debug, Default)]
pub struct Collection {
    /// Valid posts (published and drafts), newest first
    pub posts: Vec<Post>,
    /// Posts skipped because of bad metadata
    pub rejected: Vec<ContentError>,
}

impl Collection {
    pub fn published(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| p.is_published())
    }

    pub fn into_published(self) -> Vec<Post> {
        self.posts.into_iter().filter(Post::is_published).collect()
    }
}

/// Scans a source and produces the post listing
pub struct PostCollector<S> {
    source: S,
    options: PostOptions,
}

impl<S: SourceEnumerator> PostCollector<S> {
    pub fn new(source: S, options: PostOptions) -> Self {
        Self { source, options }
    }

    /// Parse every post the source knows about.
    ///
    /// A post with bad metadata is logged and moved to `rejected`; it never
    /// fails the whole collection.
    pub fn collect(&self) -> Result<Collection, ContentError> {
        let mut collection = Collection::default();

        for source in self.source.enumerate()? {
            match parse_post(&source, &self.options) {
                Ok(post) => collection.posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {}: {}", source.origin, e);
                    collection.rejected.push(e);
                }
            }
        }

        collection.posts.sort_by(newest_first);
        Ok(collection)
    }

    /// Published posts, newest first. Same-date posts are ordered by slug.
    pub fn list_published_posts(&self) -> Result<Vec<Post>, ContentError> {
        let collection = self.collect()?;
        let total = collection.posts.len();
        let posts = collection.into_published();
        tracing::debug!("Listing {} published of {} posts", posts.len(), total);
        Ok(posts)
    }
}

/// Parse one source into a post, validating its metadata
pub(crate) fn parse_post(source: &SourceFile, options: &PostOptions) -> Result<Post, ContentError> {
    let (fm, _body) = split_source(source)?;
    let meta = PostMeta::from_front_matter(&source.slug, fm, options)?;
    Ok(Post::new(source.slug.clone(), meta))
}

/// Split a source into its front-matter and body
pub(crate) fn split_source(source: &SourceFile) -> Result<(FrontMatter, &str), ContentError> {
    match FrontMatter::parse(&source.raw) {
        Ok(Some(parts)) => Ok(parts),
        Ok(None) => Err(ContentError::malformed(
            &source.slug,
            "front-matter",
            "no metadata block",
        )),
        Err(e) => Err(ContentError::malformed(
            &source.slug,
            "front-matter",
            e.to_string(),
        )),
    }
}

fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.meta
        .timestamp
        .cmp(&a.meta.timestamp)
        .then_with(|| a.slug.cmp(&b.slug))
}
