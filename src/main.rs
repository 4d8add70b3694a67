//! bookwash - EPUB content-edit review tool

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use bookwash::{Ledger, Review, read_epub, wash, write_epub};

#[derive(Parser)]
#[command(name = "bookwash")]
#[command(version, about = "Review per-paragraph content edits to EPUB ebooks", long_about = None)]
#[command(after_help = "EXAMPLES:
    bookwash info book.epub                         Show book metadata
    bookwash status book.bookwash                   Show review progress
    bookwash accept-all book.bookwash --language    Accept language softenings
    bookwash apply book.epub book.bookwash out.epub Regenerate with accepted edits")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show book metadata and chapter layout
    Info {
        /// Input EPUB file
        input: String,
    },
    /// Show review progress for a ledger
    Status {
        /// BookWash ledger file
        ledger: String,
    },
    /// Accept all pending changes in a ledger
    AcceptAll {
        /// BookWash ledger file
        ledger: String,
        /// Only accept language-softening changes
        #[arg(long)]
        language: bool,
    },
    /// Regenerate an EPUB applying the accepted changes
    Apply {
        /// Input EPUB file
        input: String,
        /// BookWash ledger file
        ledger: String,
        /// Output EPUB file
        output: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { input } => show_info(&input),
        Commands::Status { ledger } => show_status(&ledger),
        Commands::AcceptAll { ledger, language } => accept_all(&ledger, language),
        Commands::Apply {
            input,
            ledger,
            output,
        } => apply(&input, &ledger, &output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(path: &str) -> bookwash::Result<()> {
    let book = read_epub(path)?;

    println!("File: {path}");
    println!("Title: {}", book.metadata.title);
    if !book.metadata.authors.is_empty() {
        println!("Authors: {}", book.metadata.authors.join(", "));
    }
    if !book.metadata.language.is_empty() {
        println!("Language: {}", book.metadata.language);
    }
    println!("Chapters: {}", book.chapters.len());
    println!("Paragraphs: {}", book.total_paragraphs());
    println!("Assets: {}", book.resources.len());

    for chapter in &book.chapters {
        println!(
            "  {} ({} paragraphs)",
            chapter.title,
            chapter.paragraphs.len()
        );
    }

    Ok(())
}

fn show_status(path: &str) -> bookwash::Result<()> {
    let ledger = Ledger::load(path)?;
    let (pending, accepted, rejected) = ledger.status_counts();

    println!("File: {path}");
    println!("Chapters: {}", ledger.chapters.len());
    println!("Pending: {pending}");
    println!("Accepted: {accepted}");
    println!("Rejected: {rejected}");

    Ok(())
}

fn accept_all(path: &str, language_only: bool) -> bookwash::Result<()> {
    let ledger = Ledger::load(path)?;
    let (before, _, _) = ledger.status_counts();

    let mut review = Review::new(ledger);
    if language_only {
        review.accept_all_language_changes();
    } else {
        review.accept_all();
    }

    let ledger = review.into_ledger();
    let (after, _, _) = ledger.status_counts();
    ledger.save(path)?;

    println!("Accepted {} changes, {after} still pending", before - after);
    Ok(())
}

fn apply(input: &str, ledger_path: &str, output: &str) -> bookwash::Result<()> {
    let book = read_epub(input)?;
    let ledger = Ledger::load(ledger_path)?;

    let washed = wash::apply(&book, &ledger)?;
    write_epub(&washed, output)?;

    let (pending, accepted, rejected) = ledger.status_counts();
    println!("Wrote {output}: {accepted} edits applied ({pending} pending, {rejected} rejected kept original)");
    Ok(())
}
