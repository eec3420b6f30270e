//! Print a single post

use anyhow::Result;

use crate::Blog;

/// Print the post stored under `slug` as JSON
pub fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.load_post(slug)?;
    println!("{}", serde_json::to_string_pretty(&post)?);
    Ok(())
}
