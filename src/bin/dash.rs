//! Read-only viewer for the VoGit command logs.
//!
//! Polls the two append-only destinations for display; never writes to
//! them.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use vogit::config::Config;

#[derive(Parser)]
#[command(name = "vogit-dash")]
#[command(about = "Voice-Guided Git Automation - log viewer")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Keep polling the logs and print appended lines
    #[arg(short, long)]
    follow: bool,

    /// Poll interval in seconds when following
    #[arg(long, default_value_t = 2)]
    interval: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to resolve working directory")?,
    };
    let config = Config::load(&root)?;

    let flat = root.join(&config.logging.flat_log);
    let detailed = root.join(&config.logging.detailed_log);

    print_section("Command Execution Log", &flat);
    println!();
    print_section("Detailed Log", &detailed);

    if cli.follow {
        follow(
            &[flat.as_path(), detailed.as_path()],
            Duration::from_secs(cli.interval.max(1)),
        )?;
    }

    Ok(())
}

fn print_section(title: &str, path: &Path) {
    println!("== {} ({}) ==", title, path.display());
    match std::fs::read_to_string(path) {
        Ok(content) if !content.is_empty() => print!("{}", content),
        _ => println!("No logs available yet."),
    }
}

/// Tail each file, printing lines appended after startup.
fn follow(paths: &[&Path], interval: Duration) -> Result<()> {
    let mut offsets: Vec<u64> = paths
        .iter()
        .map(|p| std::fs::metadata(p).map(|m| m.len()).unwrap_or(0))
        .collect();

    println!();
    println!("-- following, Ctrl-C to stop --");

    loop {
        std::thread::sleep(interval);

        for (path, offset) in paths.iter().zip(offsets.iter_mut()) {
            let Ok(mut file) = std::fs::File::open(path) else {
                continue;
            };
            let len = file.metadata().map(|m| m.len()).unwrap_or(0);
            if len <= *offset {
                continue;
            }

            file.seek(SeekFrom::Start(*offset))
                .with_context(|| format!("Failed to seek {}", path.display()))?;
            let mut new_text = String::new();
            file.read_to_string(&mut new_text)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            *offset = len;

            for line in new_text.lines() {
                println!("[{}] {}", file_label(path), line);
            }
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
