use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quill_cli::commands::{BuildOptions, format_diagnostic, run_build, run_scan};
use quill_core::report::TracingReporter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quill_cli", about = "Static blog builder.")]
struct Cli {
    #[arg(long = "source-dir", short = 's', global = true)]
    source_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Index the articles and report diagnostics.")]
    Scan {
        articles_dir: Option<PathBuf>,
    },
    #[command(about = "Build the site from quill.yaml.")]
    Build {
        #[arg(long, value_name = "PATH", default_value = "out")]
        out: PathBuf,
        #[arg(long)]
        allow_future: bool,
        #[arg(long, help = "Remove the output directory first.")]
        clean: bool,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = root_dir(&cli)?;
    match &cli.command {
        Command::Scan { articles_dir } => {
            let report = run_scan(&root, articles_dir.as_deref())?;
            for diag in &report.diagnostics {
                eprintln!("{}", format_diagnostic(diag));
            }
            println!("documents: {}", report.documents);
            println!("excluded: {}", report.excluded);
            println!("years: {}", report.years);
            println!("tags: {}", report.tags);
            println!("authors: {}", report.authors);
            if report.has_errors() {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Build {
            out,
            allow_future,
            clean,
        } => {
            let options = BuildOptions {
                root,
                out: out.clone(),
                allow_future: *allow_future,
                clean: *clean,
            };
            let summary = run_build(&options, &TracingReporter)?;
            println!(
                "posts: {}, index pages: {}, feeds: {}, excluded: {}",
                summary.posts, summary.index_pages, summary.feeds, summary.excluded
            );
            Ok(())
        }
    }
}

fn root_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.source_dir {
        Some(path) if path.is_absolute() => Ok(path.clone()),
        Some(path) => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            Ok(cwd.join(path))
        }
        None => std::env::current_dir().context("failed to read current directory"),
    }
}
