//! `loopsnip`: replays loop snippet sessions against a text file.

mod app;
mod cli;
mod script;

use std::io::Write;

use clap::Parser;
use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let report = app::run(&cli).await?;
	if !cli.in_place {
		let mut stdout = std::io::stdout().lock();
		stdout.write_all(report.text.as_bytes())?;
		stdout.flush()?;
	}
	if cli.status {
		eprintln!("{}", report.status_line());
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("LOOPSNIP_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("loopsnip=debug,loopsnip_editor=debug,loopsnip_config=debug,info")
		} else {
			EnvFilter::new("loopsnip=info,warn")
		}
	});

	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
