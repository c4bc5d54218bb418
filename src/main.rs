//! Chartbook CLI — decode chart URLs, reconcile and normalize the
//! persisted standards collection.
//!
//! Batch semantics: a decode failure is local to its URL and never aborts
//! the rest of the batch; a repository failure aborts the whole run.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use chartbook::chart::{ChartDecoder, DecodedChart};
use chartbook::standards::{
    DefaultsNormalizer, RepositoryError, StandardsRepository, StructureReconciler,
};

#[derive(Parser)]
#[command(name = "chartbook", version, about = "iReal-style chart decoder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode chart URLs and print their structure.
    Decode {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Upgrade local song structures from a canonical collection.
    Reconcile {
        /// Canonical collection to reconcile against (read-only).
        #[arg(long)]
        canonical: PathBuf,
        /// Standards snapshot to upgrade; defaults to the home snapshot.
        #[arg(long)]
        standards: Option<PathBuf>,
    },
    /// Fill missing playback defaults in the standards snapshot.
    Normalize {
        #[arg(long)]
        standards: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Command::Decode { urls } => run_decode(&urls),
        Command::Reconcile {
            canonical,
            standards,
        } => run_batch(standards, |repo| run_reconcile(repo, &canonical)),
        Command::Normalize { standards } => run_batch(standards, run_normalize),
    };
    process::exit(code);
}

fn run_decode(urls: &[String]) -> i32 {
    let mut failed = 0usize;
    for url in urls {
        match ChartDecoder::decode(url) {
            Ok(decoded) => print_chart(&decoded),
            Err(e) => {
                eprintln!("decode failed: {e}");
                failed += 1;
            }
        }
    }
    println!("decoded {} of {} charts", urls.len() - failed, urls.len());
    if failed == urls.len() {
        1
    } else {
        0
    }
}

fn print_chart(decoded: &DecodedChart) {
    let song = &decoded.song;
    println!("{} — {}", song.title, song.composer);
    println!(
        "  key {}  style {}  tempo {}",
        song.key, song.style, song.tempo
    );
    for (i, section) in song.sections.iter().enumerate() {
        let label = section
            .label
            .map(|c| c.to_string())
            .unwrap_or_else(|| (i + 1).to_string());
        print!(
            "  section {label}: {} measures, x{}",
            section.measures.len(),
            section.repeats
        );
        if !section.endings.is_empty() {
            print!(", {} endings", section.endings.len());
        }
        println!();
    }
    if decoded.unknown_tokens > 0 {
        println!("  ({} unrecognized tokens ignored)", decoded.unknown_tokens);
    }
}

/// Load-modify-save wrapper shared by the batch subcommands.
fn run_batch(
    standards: Option<PathBuf>,
    op: impl FnOnce(&StandardsRepository) -> Result<(), RepositoryError>,
) -> i32 {
    let repo = match standards {
        Some(path) => StandardsRepository::new(path),
        None => StandardsRepository::open_default(),
    };
    match op(&repo) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            1
        }
    }
}

fn run_reconcile(repo: &StandardsRepository, canonical: &Path) -> Result<(), RepositoryError> {
    let mut local = repo.load_all()?;
    let canonical_entries = StandardsRepository::new(canonical).load_all()?;

    let updated = StructureReconciler::new().reconcile(&mut local, &canonical_entries);
    if updated > 0 {
        repo.save_all(&local)?;
    }
    println!("updated {updated} of {} standards", local.len());
    Ok(())
}

fn run_normalize(repo: &StandardsRepository) -> Result<(), RepositoryError> {
    let mut entries = repo.load_all()?;
    let updated = DefaultsNormalizer::normalize(&mut entries);
    if updated > 0 {
        repo.save_all(&entries)?;
    }
    println!("normalized {updated} of {} standards", entries.len());
    Ok(())
}
