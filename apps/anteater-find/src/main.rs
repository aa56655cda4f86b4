use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = anteater_find::Args::parse();
	anteater_find::run(args).await
}
