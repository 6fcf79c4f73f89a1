//! `jsondiff-apply` applies a change to a document.
//!
//! Usage:
//!   jsondiff-apply '<change-json>'
//!
//! The document is read from stdin; empty input or `null` means it does not
//! exist yet. Prints the new document, or `null` if the change removed it.

use std::io::{self, Read, Write};

use jsondiff::cli::apply_change;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "jsondiff=warn".to_string()))
        .with_writer(io::stderr)
        .init();

    let change = match std::env::args().nth(1) {
        Some(c) => c,
        None => {
            eprintln!("First argument must be a document change.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match apply_change(&buf, &change) {
        Ok(result) => {
            if let Err(e) = writeln!(io::stdout(), "{result}") {
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
