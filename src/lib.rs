//! blogkit-rs: a markdown blog backend
//!
//! Posts live one per directory under a posts root, each with a `main.md`
//! holding YAML front-matter and a markdown body. This crate lists the
//! published posts newest-first and loads single posts by slug, and serves
//! both over HTTP.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{
    ContentError, FsSource, LoadedPost, MarkdownRenderer, Post, PostCollector, PostLoader,
    PostOptions,
};

/// A blog rooted at a site directory
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts directory (one sub-directory per post)
    pub posts_dir: PathBuf,
    options: PostOptions,
    renderer: Arc<MarkdownRenderer>,
}

impl Blog {
    /// Open the blog in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Open the blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let options = config.post_options()?;
        let renderer = Arc::new(MarkdownRenderer::with_options(
            &config.highlight.theme,
            config.highlight.enable,
        ));

        tracing::debug!("Posts directory: {:?}", posts_dir);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            options,
            renderer,
        })
    }

    /// The on-disk post source
    pub fn source(&self) -> FsSource {
        FsSource::new(&self.posts_dir, self.config.source_file.clone())
    }

    pub fn collector(&self) -> PostCollector<FsSource> {
        PostCollector::new(self.source(), self.options.clone())
    }

    pub fn loader(&self) -> PostLoader<FsSource> {
        PostLoader::new(self.source(), self.options.clone(), self.renderer.clone())
    }

    /// Published posts, newest first
    pub fn list_published_posts(&self) -> Result<Vec<Post>, ContentError> {
        self.collector().list_published_posts()
    }

    /// A single post by slug, drafts included
    pub fn load_post(&self, slug: &str) -> Result<LoadedPost, ContentError> {
        self.loader().load_post(slug)
    }
}
