mod args;

use anyhow::Result;
use clap::Parser;

use args::{Cli, Command};
use fastimage::{logging, HttpLoader, ImageSource, Preloader, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::from_file(&cli.config)?;
    settings.validate().map_err(anyhow::Error::msg)?;

    if let Some(log_path) = logging::init_logging(&settings)? {
        tracing::info!("Logging to {}", log_path.display());
    }

    let preloader = Preloader::new(HttpLoader::new(&settings)?, &settings);

    match cli.command {
        Command::Preload { headers, uris } => {
            let sources = uris
                .into_iter()
                .map(|uri| {
                    headers
                        .iter()
                        .fold(ImageSource::new(uri), |source, (name, value)| {
                            source.with_header(name, value)
                        })
                })
                .collect();

            let summary = preloader.preload(sources).await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::ClearMemoryCache => preloader.clear_memory_cache().await?,
        Command::ClearDiskCache => preloader.clear_disk_cache().await?,
    }

    Ok(())
}
