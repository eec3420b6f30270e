//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::{PostOptions, DEFAULT_THEME};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,

    // Directory
    /// Directory holding one sub-directory per post, relative to the site root
    pub posts_dir: String,
    /// Name of the source file inside each post directory
    pub source_file: String,

    // URL
    /// URL prefix under which post assets (covers, images) are served
    pub asset_prefix: String,

    // Date / Time
    /// IANA zone for front-matter dates without an offset
    pub timezone: String,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            posts_dir: "src/posts".to_string(),
            source_file: "main.md".to_string(),
            asset_prefix: "/posts".to_string(),
            timezone: "UTC".to_string(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.source_file.is_empty() || self.source_file.contains(['/', '\\']) {
            anyhow::bail!("source_file must be a plain file name, got {:?}", self.source_file);
        }
        if !self.asset_prefix.starts_with('/') {
            anyhow::bail!("asset_prefix must start with '/', got {:?}", self.asset_prefix);
        }
        self.tz()?;
        Ok(())
    }

    /// The configured time zone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {:?}: {}", self.timezone, e))
    }

    /// Metadata rules derived from this configuration
    pub fn post_options(&self) -> Result<PostOptions> {
        Ok(PostOptions {
            asset_prefix: self.asset_prefix.clone(),
            timezone: self.tz()?,
        })
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    /// syntect theme name
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: DEFAULT_THEME.to_string(),
        }
    }
}
