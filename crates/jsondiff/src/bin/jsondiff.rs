//! `jsondiff` prints the change turning one document into another.
//!
//! Usage:
//!   jsondiff '<from-json>' '<to-json>'
//!
//! `null` stands for a document that does not exist. Nothing is printed when
//! the documents are equal.

use std::io::{self, Write};

use jsondiff::cli::diff_documents;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "jsondiff=warn".to_string()))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (from, to) = match (args.get(1), args.get(2)) {
        (Some(from), Some(to)) => (from, to),
        _ => {
            eprintln!("Usage: jsondiff '<from-json>' '<to-json>'");
            std::process::exit(1);
        }
    };

    match diff_documents(from, to) {
        Ok(change) if change.is_empty() => {}
        Ok(change) => {
            if let Err(e) = writeln!(io::stdout(), "{change}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
