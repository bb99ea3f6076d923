mod collect;
mod export;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "douglas-cli")]
#[command(about = "Scrape a douglas.de product category into an xlsx workbook")]
struct Cli {
    /// Workbook path (overrides DOUGLAS_OUTPUT_PATH)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Category listing path, e.g. /de/c/gesicht/gesichtsmasken/120308
    /// (overrides DOUGLAS_CATEGORY_PATH)
    #[arg(long)]
    category: Option<String>,

    /// Scrape and map products without writing the workbook
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut douglas_core::AppConfig) {
        if let Some(output) = &self.output {
            config.output_path.clone_from(output);
        }
        if let Some(category) = &self.category {
            config.category_path.clone_from(category);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = douglas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    cli.apply_to(&mut config);
    tracing::debug!(?config, "configuration loaded");

    collect::run_collect(&config, cli.dry_run).await?;
    Ok(())
}
