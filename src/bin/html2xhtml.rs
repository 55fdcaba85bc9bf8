//! html2xhtml - standalone file-to-file HTML to XHTML converter

use std::process::ExitCode;

use clap::Parser;

use bindery::normalize;

#[derive(Parser)]
#[command(name = "html2xhtml")]
#[command(version, about = "Convert an HTML file to well-formed XHTML", long_about = None)]
struct Cli {
    /// Input file
    #[arg(short = 'i', value_name = "FILE")]
    input: String,

    /// Output file
    #[arg(short = 'o', value_name = "FILE")]
    output: String,

    /// Target XHTML version (1.0 or 1.1)
    #[arg(short = 'x', value_name = "VERSION", default_value = "1.1")]
    version: String,
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
    let version = cli.version.parse()?;
    let html = std::fs::read(&cli.input)?;
    let xhtml = normalize(&html, version)?;
    std::fs::write(&cli.output, xhtml.as_bytes())?;
    Ok(())
}
