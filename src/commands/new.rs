//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::content::Tag;
use crate::Blog;

/// Front-matter written into a freshly created post
#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    tags: &'a [Tag],
    published: bool,
}

/// Create `{posts_dir}/{slug}/{source_file}` for a new post and return its path
pub fn create_post(blog: &Blog, title: &str, tags: &[Tag], published: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let post_dir = blog.posts_dir.join(&slug);
    let file_path = post_dir.join(&blog.config.source_file);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now().with_timezone(&blog.config.tz()?);
    let front_matter = serde_yaml::to_string(&Scaffold {
        title,
        description: "",
        date: now.format("%Y-%m-%d %H:%M").to_string(),
        tags,
        published,
    })?;

    fs::create_dir_all(&post_dir)?;
    fs::write(&file_path, format!("---\n{}---\n\n", front_matter))?;

    tracing::info!("Created post {} at {:?}", slug, file_path);
    Ok(file_path)
}
