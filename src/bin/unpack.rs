use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use dictpack::{Container, UnpackSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Longest password read from the terminal prompt.
const MAX_PASSWORD_LEN: usize = 79;

#[derive(Parser)]
#[command(name = "unpack")]
#[command(about = "Decode a dictpack container", long_about = None)]
struct Cli {
    /// Container to read
    input: PathBuf,
    /// Where to write the decoded payload
    output: PathBuf,
    /// Password for encrypted containers (prompted for if needed and not given)
    #[arg(short, long)]
    password: Option<String>,
    /// Don't check the payload against the header checksum
    #[arg(long)]
    no_verify: bool,
    /// Size of the decompression buffer in bytes; output beyond it is dropped
    #[arg(long)]
    capacity: Option<usize>,
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Type the file password and hit enter: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("could not read password")?;
    let word = match line.split_whitespace().next() {
        Some(word) => word,
        None => bail!("invalid password entered"),
    };
    let mut end = word.len().min(MAX_PASSWORD_LEN);
    while !word.is_char_boundary(end) {
        end -= 1;
    }
    Ok(word[..end].to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut cli = Cli::parse();

    if cli.input == cli.output {
        bail!("input and output filename match");
    }

    let input = fs::read(&cli.input)
        .with_context(|| format!("could not read {}", cli.input.display()))?;

    let container = Container::parse(&input).context("header is invalid")?;
    if !cli.no_verify {
        // checked before any password prompt
        container.verify_checksum()?;
    }

    let password = match cli.password.take() {
        Some(p) => Some(p),
        None if container.header().is_encrypted() => Some(prompt_password()?),
        None => None,
    };

    let mut settings = UnpackSettings::default();
    // already checked above
    settings.verify_checksum(false);
    if let Some(p) = password.as_deref() {
        settings.password(p.as_bytes());
    }
    if let Some(capacity) = cli.capacity {
        settings.output_capacity(capacity);
    }

    let output = settings.unpack(&input)?;

    // written last so a bad input never leaves a file behind
    fs::write(&cli.output, &output)
        .with_context(|| format!("could not write {}", cli.output.display()))?;
    info!("wrote {} bytes to {}", output.len(), cli.output.display());

    Ok(())
}
