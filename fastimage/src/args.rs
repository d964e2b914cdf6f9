//! CLI argument definitions for fastimage.

use clap::{Parser, Subcommand};

/// Preload images and manage the loader's caches.
///
/// ## Examples
///
///   fastimage preload https://example.com/a.png https://example.com/b.png
///
///   fastimage preload -H "Authorization: Bearer abc" https://example.com/private.png
#[derive(Parser, Debug)]
#[command(name = "fastimage", version, about, long_about = None)]
pub struct Cli {
    /// Config file (TOML); missing files are ignored
    #[arg(short, long, env = "FASTIMAGE_CONFIG", default_value = "fastimage.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load every uri and print {"finishedCount", "skippedCount"}
    Preload {
        /// Header sent with every request, as "Name: value"
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        #[arg(required = true)]
        uris: Vec<String>,
    },

    ClearMemoryCache,

    ClearDiskCache,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("header '{}' must look like 'Name: value'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header '{}' has an empty name", s));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
