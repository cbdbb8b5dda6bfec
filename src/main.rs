//! CLI entry point for xdyou-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xdyou_site::commands::{self, feed::FeedFormat};
use xdyou_site::Site;

#[derive(Parser)]
#[command(name = "xdyou-site")]
#[command(author = "XDYou Contributors")]
#[command(version)]
#[command(about = "Content, feed and data service for the XDYou website", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
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
    /// Start the HTTP server
    #[command(aliases = ["s", "server"])]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List news items or tags
    List {
        /// Type of content to list (news, tag)
        #[arg(default_value = "news")]
        r#type: String,

        /// Only items in this language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Print a feed to stdout
    Feed {
        #[arg(value_enum, default_value = "rss")]
        format: FeedFormat,

        /// Only items in this language
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Write feeds and the news listing into the public directory
    #[command(alias = "g")]
    Generate,

    /// Create a new news item
    New {
        /// Title of the new item
        title: String,

        /// Language of the item (defaults to $LANG, then the site language)
        #[arg(short, long)]
        lang: Option<String>,

        /// File name without extension (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "xdyou_site=debug,info"
    } else {
        "xdyou_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let env_lang = std::env::var("LANG").ok();

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            xdyou_site::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type, lang } => {
            let site = Site::new(&base_dir)?;
            let filter = commands::lang_filter(lang.as_deref())?;
            commands::list::run(&site, &r#type, filter)?;
        }

        Commands::Feed { format, lang } => {
            let site = Site::new(&base_dir)?;
            let filter = commands::lang_filter(lang.as_deref())?;
            let locale = commands::cli_locale(None, env_lang.as_deref(), site.config.language);
            print!("{}", commands::feed::render(&site, format, locale, filter)?);
        }

        Commands::Generate => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            let written = commands::generate::run(&site)?;
            println!("Generated {} files in {:?}", written.len(), site.public_dir);
        }

        Commands::New { title, lang, slug } => {
            let site = Site::new(&base_dir)?;
            commands::lang_filter(lang.as_deref())?;
            let lang = commands::cli_locale(lang.as_deref(), env_lang.as_deref(), site.config.language);
            tracing::info!("Creating new {} news item with title: {}", lang, title);
            let path = commands::new::create_news(&site, &title, lang, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Version => {
            println!("xdyou-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
