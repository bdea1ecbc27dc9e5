//! Loads the inputs, runs the replay and reports the result.

use std::fs;

use anyhow::{Context, ensure};
use loopsnip_config::LoopSnippetConfig;
use loopsnip_editor::{HeadlessEditor, LoopHost, LoopSnippetController, SessionPhase};
use loopsnip_primitives::CharIdx;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::script;

/// Final state of a replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
	pub text: String,
	pub phase: SessionPhase,
	pub anchor: Option<CharIdx>,
}

impl Report {
	/// One-line summary for `--status`.
	pub fn status_line(&self) -> String {
		let phase = match self.phase {
			SessionPhase::Idle => "idle",
			SessionPhase::AwaitingVariant => "awaiting variant",
			SessionPhase::Active { exitable: true } => "active (exitable)",
			SessionPhase::Active { exitable: false } => "active",
		};
		match self.anchor {
			Some(anchor) => format!("session: {phase}, anchor {anchor}"),
			None => format!("session: {phase}"),
		}
	}
}

/// Runs the replay described by `cli`. With `--in-place` the result is
/// also written back to the input file.
pub async fn run(cli: &Cli) -> anyhow::Result<Report> {
	let config = match &cli.config {
		Some(path) => LoopSnippetConfig::load(path)?,
		None => LoopSnippetConfig::load_default()?,
	};
	let text = fs::read_to_string(&cli.file).with_context(|| format!("failed to read {}", cli.file.display()))?;
	let source = fs::read_to_string(&cli.script).with_context(|| format!("failed to read script {}", cli.script.display()))?;
	let steps = script::parse(&source)?;

	let mut host = HeadlessEditor::new();
	let editor = host.open(&text);
	if let Some(cursor) = cli.cursor {
		let len = host.document_len(editor);
		ensure!(cursor <= len, "--cursor {cursor} is past the end of {} ({len} chars)", cli.file.display());
		host.move_to(editor, cursor);
	}

	let mut controller = LoopSnippetController::new(config);
	info!(file = %cli.file.display(), steps = steps.len(), "replaying loop snippet script");
	script::replay(&mut host, &mut controller, editor, &steps).await?;

	let report = Report {
		text: host.text(editor),
		phase: controller.phase(),
		anchor: controller.anchor(),
	};
	debug!(phase = ?report.phase, anchor = ?report.anchor, "replay finished");

	if cli.in_place {
		fs::write(&cli.file, &report.text).with_context(|| format!("failed to write {}", cli.file.display()))?;
	}
	Ok(report)
}
