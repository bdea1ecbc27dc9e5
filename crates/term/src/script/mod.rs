//! Replay scripts: a JSON array of steps run against a headless editor.
//!
//! ```json
//! [
//!   { "step": "pick", "label": "'' | " },
//!   { "step": "insertLoop" },
//!   { "step": "type", "text": "a" },
//!   { "step": "insertLoop" },
//!   { "step": "exitLoop" }
//! ]
//! ```
//!
//! Every step is followed by delivering the notifications it queued, so the
//! session sees edits in the order an editor would report them.

use anyhow::{Context, ensure};
use loopsnip_editor::{HeadlessEditor, LoopHost, LoopSnippetArgs, LoopSnippetController, PickerScript};
use loopsnip_primitives::{CharIdx, EditorId};
use serde::Deserialize;
use tracing::{debug, trace};


/// One replay step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum Step {
	/// Trigger the insert command, with optional command arguments.
	InsertLoop {
		#[serde(default)]
		args: Option<LoopSnippetArgs>,
	},
	/// Run the exit command.
	ExitLoop,
	/// Type at the caret.
	Type { text: String },
	MoveTo { offset: CharIdx },
	Select { anchor: CharIdx, head: CharIdx },
	/// Insert without moving the caret, like a completion provider.
	InsertAt { offset: CharIdx, text: String },
	DeleteRange { start: CharIdx, end: CharIdx },
	/// Answer the next picker with `label`, after typing `filter`.
	Pick {
		#[serde(default)]
		filter: String,
		label: String,
	},
	/// Dismiss the next picker.
	CancelPick,
}

/// Parses a script from JSON source.
pub fn parse(source: &str) -> anyhow::Result<Vec<Step>> {
	serde_json::from_str(source).context("invalid replay script")
}

/// Runs `steps` in `editor`, delivering queued notifications after each.
pub async fn replay(host: &mut HeadlessEditor, controller: &mut LoopSnippetController, editor: EditorId, steps: &[Step]) -> anyhow::Result<()> {
	for (index, step) in steps.iter().enumerate() {
		trace!(index, ?step, "replay step");
		let len = host.document_len(editor);
		let in_bounds = |offset: CharIdx| -> anyhow::Result<()> {
			ensure!(offset <= len, "step {index}: offset {offset} is past the end of the document ({len} chars)");
			Ok(())
		};

		match step {
			Step::InsertLoop { args } => {
				let outcome = controller
					.trigger(host, args.as_ref())
					.await
					.with_context(|| format!("step {index}: insertLoop failed"))?;
				debug!(index, ?outcome, "loop triggered");
			}
			Step::ExitLoop => {
				let ended = controller.exit(host);
				debug!(index, ended, "loop exit requested");
			}
			Step::Type { text } => host.type_text(editor, text),
			Step::MoveTo { offset } => {
				in_bounds(*offset)?;
				host.move_to(editor, *offset);
			}
			Step::Select { anchor, head } => {
				in_bounds(*anchor)?;
				in_bounds(*head)?;
				host.select(editor, *anchor, *head);
			}
			Step::InsertAt { offset, text } => {
				in_bounds(*offset)?;
				host.insert_at(editor, *offset, text);
			}
			Step::DeleteRange { start, end } => {
				ensure!(start <= end, "step {index}: deleteRange start {start} is after end {end}");
				in_bounds(*end)?;
				host.delete_range(editor, *start, *end);
			}
			Step::Pick { filter, label } => host.script_pick(PickerScript::Choose {
				filter: filter.clone(),
				label: label.clone(),
			}),
			Step::CancelPick => host.script_pick(PickerScript::Cancel),
		}
		host.pump(controller);
	}
	Ok(())
}
