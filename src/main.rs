//! bindery - HTML chapter tarball to EPUB converter

use std::process::ExitCode;

use clap::Parser;

use bindery::{package_book, read_book, write_epub_file};

#[derive(Parser)]
#[command(name = "bindery")]
#[command(version, about = "Convert a tarball of HTML chapters into an EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    bindery zshguide_html.tar.gz zsh-guide.epub
    bindery --contents-name book.html chapters.tar out.epub")]
struct Cli {
    /// Input tar archive (optionally gzip-compressed)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output EPUB file
    #[arg(value_name = "OUTPUT")]
    output: String,

    /// Base filename of the front-matter (table of contents) member
    #[arg(long, default_value = "zshguide.html")]
    contents_name: String,

    /// Unique identifier for the book (defaults to a random urn:uuid)
    #[arg(long)]
    identifier: Option<String>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> bindery::Result<()> {
    let archive = std::fs::read(&cli.input)?;
    let book = read_book(&archive, &cli.contents_name)?;
    let files = package_book(&book, cli.identifier.as_deref());
    write_epub_file(&files, &cli.output)?;

    if !cli.quiet {
        println!(
            "{}: \"{}\" by {} ({} chapters)",
            cli.output,
            book.metadata.title,
            book.metadata.author,
            book.chapters.len()
        );
    }
    Ok(())
}
