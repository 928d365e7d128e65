#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use txt2voice::{config, FilePersister, SpeechKit};

async fn read_text() -> Result<String> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .context("Failed to read text from stdin")?;

    Ok(text.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    config::init().context("Failed to load config")?;
    let config = config::get();

    let text = read_text().await?;
    if text.is_empty() {
        anyhow::bail!("Nothing to synthesize");
    }

    let persister = FilePersister::new(SpeechKit::new(&config.url));
    let request = config.request(text);

    persister
        .save_to_file(&request)
        .await
        .with_context(|| format!("Failed to save {}", request.output_path.display()))?;

    if let Some(mp3_path) = &config.mp3_path {
        persister
            .transcode(&request.output_path, mp3_path)
            .with_context(|| format!("Failed to transcode to {}", mp3_path.display()))?;
    }

    Ok(())
}
