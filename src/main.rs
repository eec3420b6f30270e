//! CLI entry point for blogkit

use anyhow::Result;
use blogkit_rs::content::Tag;
use blogkit_rs::Blog;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogkit")]
#[command(version)]
#[command(about = "List, load and serve markdown blog posts", long_about = None)]
struct Cli {
    /// Set the site directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the posts API and post assets
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List published posts, newest first
    List {
        /// Include drafts
        #[arg(short, long)]
        all: bool,
    },

    /// Print a single post as JSON
    Show {
        /// Post slug (its directory name)
        slug: String,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Tag to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<Tag>,

        /// Mark the post as published right away
        #[arg(long)]
        published: bool,
    },

    /// Validate the metadata of every post
    Check,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogkit_rs=debug,tower_http=debug,info"
    } else {
        "blogkit_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Server { port, ip } => {
            let blog = Blog::new(&base_dir)?;
            tracing::info!("Serving posts from {:?}", blog.posts_dir);
            blogkit_rs::server::start(&blog, &ip, port).await?;
        }

        Commands::List { all } => {
            let blog = Blog::new(&base_dir)?;
            blogkit_rs::commands::list::run(&blog, all)?;
        }

        Commands::Show { slug } => {
            let blog = Blog::new(&base_dir)?;
            blogkit_rs::commands::show::run(&blog, &slug)?;
        }

        Commands::New {
            title,
            tags,
            published,
        } => {
            let blog = Blog::new(&base_dir)?;
            let path = blogkit_rs::commands::new::create_post(&blog, &title, &tags, published)?;
            println!("Created: {:?}", path);
        }

        Commands::Check => {
            let blog = Blog::new(&base_dir)?;
            blogkit_rs::commands::check::run(&blog)?;
        }

        Commands::Version => {
            println!("blogkit version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
