// src/bin/migrate_batch.rs
//! Batch migration sweep — HE_v1 values in, HE_v2 values out
//!
//! Usage: `migrate_batch [--check] [INPUT]`
//!
//! Reads stored values one per line from INPUT (or stdin) and writes one line
//! per input to stdout. v1 envelopes are upgraded; everything else passes
//! through untouched. Any failure aborts the sweep before output is written.

use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use memory_cipher::{
    is_encrypted, load_config, needs_migration, Config, CoreError, Engine, KeyProvider,
    MasterSecret,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    check_only: bool,
    input: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        check_only: false,
        input: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => args.check_only = true,
            "-" => args.input = None,
            flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
            path => args.input = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn read_lines(input: Option<&PathBuf>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    reader
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read input")
}

fn key_provider(config: &Config, can_prompt: bool) -> Result<KeyProvider> {
    match KeyProvider::from_config(config) {
        Ok(keys) => Ok(keys),
        Err(CoreError::MissingMasterSecret(hint)) if can_prompt => {
            info!("{hint}");
            let secret = rpassword::prompt_password("Master secret: ")?;
            Ok(KeyProvider::new(MasterSecret::new(secret.into_bytes()))?)
        }
        Err(e) => Err(e).context("master secret unavailable"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = parse_args()?;
    let lines = read_lines(args.input.as_ref())?;

    let legacy: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| needs_migration(l))
        .collect();
    let already_current = lines.iter().filter(|l| is_encrypted(l)).count() - legacy.len();
    let plain = lines.len() - legacy.len() - already_current;

    info!(
        total = lines.len(),
        legacy = legacy.len(),
        current = already_current,
        plain,
        "scanned input"
    );

    if args.check_only {
        println!("{}", legacy.len());
        return Ok(());
    }

    let config = load_config().context("failed to load configuration")?;
    // Stdin is busy with data when no input file is given
    let engine =
        Engine::new(key_provider(config, args.input.is_some())?).with_parallel(config.batch.parallel);

    let upgraded = engine
        .migrate_all(&legacy)
        .context("migration aborted, nothing was written")?;

    let mut upgraded = upgraded.into_iter();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &lines {
        if needs_migration(line) {
            match upgraded.next() {
                Some(envelope) => writeln!(out, "{envelope}")?,
                None => bail!("migration returned fewer values than requested"),
            }
        } else {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;

    info!(migrated = legacy.len(), "=== SWEEP COMPLETE ===");
    Ok(())
}
