//! List posts

use anyhow::Result;

use crate::content::Post;
use crate::Blog;

/// Print posts newest first. `all` includes drafts.
pub fn run(blog: &Blog, all: bool) -> Result<()> {
    let collection = blog.collector().collect()?;

    let posts: Vec<&Post> = if all {
        collection.posts.iter().collect()
    } else {
        collection.published().collect()
    };

    println!("{}", header(&blog.config.title, posts.len()));
    for post in posts {
        println!("{}", format_line(post));
    }

    if !collection.rejected.is_empty() {
        println!(
            "{} post(s) skipped because of bad metadata; run `check` for details",
            collection.rejected.len()
        );
    }

    Ok(())
}

fn header(title: &str, count: usize) -> String {
    format!("{} - Posts ({}):", title, count)
}

fn format_line(post: &Post) -> String {
    let tags = post
        .meta
        .tags
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let draft = if post.is_published() { "" } else { " (draft)" };

    format!(
        "  {} - {} [{}]{}{}",
        post.meta.date,
        post.meta.title,
        post.slug,
        if tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", tags)
        },
        draft
    )
}
