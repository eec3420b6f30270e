//! Validate every post

use anyhow::Result;

use crate::Blog;

/// Report posts with bad metadata. Fails when any post is rejected.
pub fn run(blog: &Blog) -> Result<()> {
    let collection = blog.collector().collect()?;

    for error in &collection.rejected {
        println!("  ✗ {}", error);
    }

    let drafts = collection.posts.len() - collection.published().count();
    println!(
        "{} valid post(s) ({} draft), {} rejected",
        collection.posts.len(),
        drafts,
        collection.rejected.len()
    );

    if !collection.rejected.is_empty() {
        anyhow::bail!("{} post(s) have malformed metadata", collection.rejected.len());
    }
    Ok(())
}
