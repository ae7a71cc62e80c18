use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod batch;

#[derive(Debug, Parser)]
#[command(
	version = lotscout_cli::VERSION,
	rename_all = "kebab",
	styles = lotscout_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
	/// Overrides worker.batch_limit for this run.
	#[arg(long)]
	pub limit: Option<u32>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = lotscout_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = lotscout_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.providers.embedding.dimensions).await?;

	let limit = args.limit.unwrap_or(config.worker.batch_limit);
	let state = batch::BatchState {
		db,
		embedding: config.providers.embedding,
		delay_ms: config.worker.delay_ms,
	};
	let report = batch::run_batch(&state, limit).await?;

	tracing::info!(
		embedded = report.embedded,
		failed = report.failed,
		"Embedding batch complete."
	);
	Ok(())
}
