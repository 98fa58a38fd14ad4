//! Check txrep transaction envelopes: parse, report every error, optionally re-render.
//!
//! Usage:
//!   txrep_check [OPTIONS] [FILE ...]
//!   txrep_check < tx.txt
//!
//! Errors are printed as `FILE:LINE: message`, all of them in one pass.
//!
//! Options:
//!   --fmt, -f          Print the normalized document to stdout. Enum fields whose value
//!                      ended in `?` are rendered with the list of valid symbols.
//!   --source NAME      Name used for stdin in error messages (default `<stdin>`).
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=txrep=debug`).

use anyhow::Context;
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;
use txrep::{transaction, Codec, HelpFields};

/// Parse one document; returns whether it was clean.
fn check(codec: &Codec, source: &str, input: &str, fmt: bool) -> anyhow::Result<bool> {
    let mut env = codec.default_value(&transaction::envelope_spec())?;
    let mut help = HelpFields::new();
    let mut ok = true;
    if let Err(errors) = codec.decode(input, &mut env, &mut help) {
        tracing::debug!(source, errors = errors.len(), first_line = ?errors.first_line(), "decode failed");
        print!("{}", errors.file_error(source));
        ok = false;
    }
    if fmt {
        let encoded = codec.encode(&env, &help);
        for bad in encoded.errors.iter() {
            eprintln!("{}: {}", source, bad);
            ok = false;
        }
        io::stdout().write_all(encoded.text.as_bytes())?;
    }
    Ok(ok)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let fmt = if let Some(pos) = args.iter().position(|a| a == "--fmt" || a == "-f") {
        args.remove(pos);
        true
    } else {
        false
    };
    let source = if let Some(pos) = args.iter().position(|a| a == "--source") {
        args.remove(pos);
        if pos >= args.len() {
            anyhow::bail!("--source requires a name");
        }
        args.remove(pos)
    } else {
        "<stdin>".to_string()
    };

    let codec = transaction::codec().context("building transaction schema")?;
    let mut has_error = false;

    if args.is_empty() {
        let mut input = Vec::new();
        io::stdin().read_to_end(&mut input)?;
        has_error |= !check(&codec, &source, &String::from_utf8_lossy(&input), fmt)?;
    } else {
        for path in &args {
            let input = match std::fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    eprintln!("{}: {}", path, e);
                    has_error = true;
                    continue;
                }
            };
            has_error |= !check(&codec, path, &input, fmt)?;
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
