use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = lotscout_api::Args::parse();
	lotscout_api::run(args).await
}
