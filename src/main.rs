use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockdoc", about = "Extract plain text from DOCX files")]
struct Args {
    /// Input DOCX file
    input: PathBuf,
    /// Output text file (defaults to stdout)
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        eprintln!("Error: file not found: {}", args.input.display());
        std::process::exit(1);
    }
    if !args.input.is_file() {
        eprintln!("Error: not a file: {}", args.input.display());
        std::process::exit(1);
    }

    let paragraphs = match blockdoc::extract_text(&args.input) {
        Ok(paragraphs) => paragraphs,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let text = paragraphs.join("\n");

    match args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, text) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        None => println!("{text}"),
    }
}
