//! CLI schema for the loopsnip binary.

use std::path::PathBuf;

use clap::Parser;


#[derive(Parser, Debug)]
#[command(name = "loopsnip")]
#[command(about = "Replay loop snippet sessions against a text file")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Text file to load into the headless editor
	pub file: PathBuf,

	/// JSON script of replay steps
	pub script: PathBuf,

	/// Configuration file (defaults to the user configuration)
	#[arg(long, short = 'c')]
	pub config: Option<PathBuf>,

	/// Initial caret offset in characters (defaults to the end of the file)
	#[arg(long)]
	pub cursor: Option<usize>,

	/// Write the result back to FILE instead of printing it
	#[arg(long)]
	pub in_place: bool,

	/// Print the final session phase and anchor to stderr
	#[arg(long)]
	pub status: bool,

	/// Enable debug logging
	#[arg(long, short = 'v')]
	pub verbose: bool,
}
