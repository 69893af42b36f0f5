use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use slide_dom_extract::{extract_presentation_by_id, ExtractorConfig};

/// Extracts the slide model of a rendered presentation as JSON.
#[derive(Parser, Debug)]
#[command(name = "slide-extract", version, about)]
struct Args {
    /// Presentation to extract.
    #[arg(long)]
    id: String,

    /// Origin serving the `/pdf-maker` view. Overrides PDF_MAKER_URL / VERCEL_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Browser executable. Overrides PUPPETEER_EXECUTABLE_PATH / CHROME_BIN.
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Working directory for screenshots. Overrides TEMP_DIRECTORY.
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Write the JSON here instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Set default level
        .parse_default_env() // Allow RUST_LOG override
        .init();

    let args = Args::parse();

    // Flags win over the environment; TEMP_DIRECTORY is only required when no flag is given.
    let mut config = match ExtractorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let temp_dir = args.temp_dir.clone().ok_or(e)?;
            ExtractorConfig::from_lookup(|key| match key {
                "TEMP_DIRECTORY" => Some(temp_dir.to_string_lossy().into_owned()),
                _ => std::env::var(key).ok(),
            })?
        }
    };
    if let Some(base_url) = args.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(chrome) = args.chrome {
        config.chrome_executable = Some(chrome);
    }
    if let Some(temp_dir) = args.temp_dir {
        config.temp_directory = temp_dir;
    }

    log::info!("Extracting presentation {}", args.id);
    // Outer budget: launch, navigation and extraction together get twice the navigation timeout.
    let budget = config.timeout * 2;
    let presentation = tokio::time::timeout(budget, extract_presentation_by_id(&config, &args.id))
        .await
        .with_context(|| format!("Extraction timed out after {:?}", budget))??;

    let json = serde_json::to_string_pretty(&presentation)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} slides to {}",
                presentation.slides.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
