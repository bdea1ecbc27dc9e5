//! Common utilities for loop session integration tests.

use loopsnip_config::LoopSnippetConfig;
use loopsnip_editor::{HeadlessEditor, LoopSnippetController, PickerScript, TriggerOutcome};
use loopsnip_primitives::EditorId;

/// A host with one focused document and an idle controller.
pub struct Fixture {
	pub host: HeadlessEditor,
	pub controller: LoopSnippetController,
	pub editor: EditorId,
}

impl Fixture {
	pub fn new(text: &str) -> Self {
		Self::with_config(text, LoopSnippetConfig::default())
	}

	pub fn with_config(text: &str, config: LoopSnippetConfig) -> Self {
		let _ = tracing_subscriber::fmt().with_test_writer().try_init();
		let mut host = HeadlessEditor::new();
		let editor = host.open(text);
		Self {
			host,
			controller: LoopSnippetController::new(config),
			editor,
		}
	}

	/// Triggers once, answering the picker with `pick` if it opens, then
	/// delivers every queued notification.
	pub async fn trigger(&mut self, pick: Option<PickerScript>) -> TriggerOutcome {
		if let Some(pick) = pick {
			self.host.script_pick(pick);
		}
		let outcome = self.controller.trigger(&mut self.host, None).await.expect("trigger failed");
		self.host.pump(&mut self.controller);
		outcome
	}

	pub fn text(&self) -> String {
		self.host.text(self.editor)
	}

	pub fn anchor(&self) -> Option<usize> {
		self.controller.anchor()
	}
}
