//! Content module - discovers, validates and renders posts

pub mod collector;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod source;

pub use collector::{Collection, PostCollector};
pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use loader::PostLoader;
pub use markdown::{MarkdownRenderer, DEFAULT_THEME};
pub use post::{asset_path, parse_date, LoadedPost, Post, PostMeta, PostOptions, Tag, UnknownTag};
pub use source::{ContentResolver, FsSource, MemorySource, SourceEnumerator, SourceFile};
