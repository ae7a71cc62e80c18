use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = lotscout_worker::Args::parse();
	lotscout_worker::run(args).await
}
