//! CLI entry point for postpress

use anyhow::{Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postpress::generator::IndexUpdate;
use postpress::watch::NotifySource;
use postpress::{Blog, BuildSummary};

#[derive(Debug, Parser)]
#[command(name = "postpress")]
#[command(version)]
#[command(about = "Convert markdown posts to HTML and update the blog index", long_about = None)]
struct Cli {
    /// Set the site root (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Watch for changes and rebuild
    #[arg(short, long)]
    watch: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert all markdown posts and update the index (default)
    #[command(alias = "b")]
    Build {
        /// Watch for changes and rebuild
        #[arg(short, long)]
        watch: bool,
    },

    /// Serve the site locally with caching disabled
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = check_args(&cli) {
        e.exit();
    }

    // Initialize logging
    let filter = if cli.debug {
        "postpress=debug,info"
    } else {
        "postpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine site root
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let blog = Blog::new(&base_dir)?;

    match cli.command.unwrap_or(Commands::Build { watch: false }) {
        Commands::Build { watch: rebuild } => {
            let summary = blog.build()?;
            report(&blog, &summary);

            if cli.watch || rebuild {
                watch(blog).await?;
            }
        }

        Commands::Serve { port, ip } => {
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            postpress::server::start(&blog, &ip, port).await?;
        }
    }

    Ok(())
}

/// Reject flag combinations clap cannot express on its own
fn check_args(cli: &Cli) -> Result<(), clap::Error> {
    if cli.watch && matches!(cli.command, Some(Commands::Serve { .. })) {
        return Err(Cli::command().error(
            ErrorKind::ArgumentConflict,
            "--watch cannot be used with serve",
        ));
    }
    Ok(())
}

/// Print the end-of-run summary
fn report(blog: &Blog, summary: &BuildSummary) {
    if summary.discovered == 0 {
        println!("No markdown files found in {}", blog.source_dir.display());
        return;
    }
    for skipped in &summary.skipped {
        println!("Skipped {}", skipped);
    }
    if let Some(line) = index_line(blog, &summary.index) {
        println!("{}", line);
    }
    println!("Done! Converted {} post(s)", summary.processed);
}

/// What happened to the index, if it was touched
fn index_line(blog: &Blog, update: &IndexUpdate) -> Option<String> {
    match update {
        IndexUpdate::Written {
            entries,
            region_found: true,
        } => Some(format!(
            "Updated {} with {} post(s)",
            blog.index_path.display(),
            entries
        )),
        IndexUpdate::Written {
            region_found: false,
            ..
        } => Some(format!(
            "No listing region in {}; left as is",
            blog.index_path.display()
        )),
        IndexUpdate::Skipped => None,
    }
}

/// Rebuild on source changes until Ctrl+C
async fn watch(blog: Blog) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));

    let flag = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    tokio::task::spawn_blocking(move || {
        let renderer = blog.renderer();
        let mut source = NotifySource::new();
        postpress::commands::build::watch(&blog, renderer.as_ref(), &mut source, &stop)
    })
    .await??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        check_args(&cli)?;
        Ok(cli)
    }

    #[test]
    fn test_watch_with_build() {
        let cli = parse(&["postpress", "--watch"]).unwrap();
        assert!(cli.watch);
        assert!(cli.command.is_none());

        let cli = parse(&["postpress", "build", "--watch"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Build { watch: true })));
    }

    #[test]
    fn test_watch_rejected_with_serve() {
        let err = parse(&["postpress", "serve", "--watch"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        let err = parse(&["postpress", "--watch", "serve"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_index_line_without_region() {
        let blog = Blog::with_config("site", postpress::config::SiteConfig::default());
        let line = index_line(
            &blog,
            &IndexUpdate::Written {
                entries: 2,
                region_found: false,
            },
        )
        .unwrap();
        assert!(line.contains("left as is"));
        assert!(!line.contains("Updated"));

        let line = index_line(
            &blog,
            &IndexUpdate::Written {
                entries: 2,
                region_found: true,
            },
        )
        .unwrap();
        assert!(line.starts_with("Updated") && line.ends_with("with 2 post(s)"));
        assert_eq!(index_line(&blog, &IndexUpdate::Skipped), None);
    }

    #[test]
    fn test_serve_overrides() {
        let cli = parse(&["postpress", "--cwd", "site", "serve", "-p", "9000"]).unwrap();
        assert_eq!(cli.cwd, Some(PathBuf::from("site")));
        assert!(matches!(
            cli.command,
            Some(Commands::Serve {
                port: Some(9000),
                ip: None
            })
        ));
    }
}
