mod config;
mod entry;
mod feed;
mod markup;
mod passage;
mod refs;
mod render;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tracing::info;

use config::{Config, RenderStyle, TitleStyle};
use entry::Entry;

#[derive(Parser)]
#[command(
    name = "gospel_parallels",
    about = "Aland Gospel-parallels synopsis generator (markdown to stdout)"
)]
struct Cli {
    /// Max entries to include (default: all)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Passage embedding style
    #[arg(long, value_enum, default_value = "indented-embed")]
    style: RenderStyle,

    /// Pericope title capitalization variant
    #[arg(long, value_enum, default_value = "paren-aware")]
    title_style: TitleStyle,

    /// Override the spreadsheet feed URL (for testing against a stub)
    #[arg(long, default_value = config::FEED_URL)]
    feed_url: String,

    /// Override the passage API URL (for testing against a stub)
    #[arg(long, default_value = config::PASSAGE_URL)]
    passage_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The document goes to stdout, so all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let config = Config {
        api_key: Config::api_key_from_env()?,
        feed_url: cli.feed_url,
        passage_url: cli.passage_url,
        style: cli.style,
        title_style: cli.title_style,
        limit: cli.limit,
    };

    let http = reqwest::Client::new();

    let records = feed::fetch_records(&http, &config.feed_url).await;
    let mut entries: Vec<Entry> = records
        .iter()
        .map(|r| Entry::from_record(r, config.title_style))
        .collect();
    if let Some(limit) = config.limit {
        entries.truncate(limit);
    }
    info!("Built {} entries", entries.len());

    let client = Arc::new(passage::PassageClient::new(http, &config));
    let fragments = passage::prefetch_fragments(&client, &entries).await?;

    print!("{}", render::render(&entries, &fragments));

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
