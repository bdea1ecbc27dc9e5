use loopsnip_config::LoopSnippetConfig;
use loopsnip_primitives::ContentChange;

use super::{LoopSnippetController, SessionPhase, TriggerOutcome};
use crate::headless::{HeadlessEditor, PickerScript};
use crate::host::IN_LOOP_SNIPPET;

async fn start(host: &mut HeadlessEditor, controller: &mut LoopSnippetController, label: &str) {
	host.script_pick(PickerScript::preset(label));
	let outcome = controller.trigger(host, None).await;
	assert_eq!(outcome, Ok(TriggerOutcome::Started));
	host.pump(controller);
}

/// Must hold at most one session; a trigger while active continues it.
///
/// * Enforced in: `LoopSnippetController::trigger`
/// * Failure symptom: a second picker opens and the first session's listeners leak.
#[tokio::test]
async fn test_single_active_session() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, "'' | ").await;
	let listeners = host.subscription_count();

	assert_eq!(controller.trigger(&mut host, None).await, Ok(TriggerOutcome::Continued));
	host.pump(&mut controller);

	assert_eq!(host.text(editor), "'' | ''");
	assert_eq!(controller.anchor(), Some(7));
	assert_eq!(host.subscription_count(), listeners);
	assert_eq!(controller.phase(), SessionPhase::Active { exitable: true });
}

/// Must apply its own insertion to the anchor before the next trigger runs.
///
/// * Enforced in: `LoopSnippetController::insert_fragment`
/// * Failure symptom: rapid repeated triggers place fragments at a stale anchor, in front of earlier ones.
#[tokio::test]
async fn test_back_to_back_triggers_keep_order() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("");
	let mut controller = LoopSnippetController::default();

	host.script_pick(PickerScript::preset("'' | "));
	assert_eq!(controller.trigger(&mut host, None).await, Ok(TriggerOutcome::Started));
	assert_eq!(controller.anchor(), Some(2));
	assert!(!controller.session().unwrap().is_suppressing());

	assert_eq!(controller.trigger(&mut host, None).await, Ok(TriggerOutcome::Continued));
	assert_eq!(controller.trigger(&mut host, None).await, Ok(TriggerOutcome::Continued));
	host.pump(&mut controller);

	assert_eq!(host.text(editor), "'' | '' | ''");
	assert_eq!(controller.anchor(), Some(12));
	assert_eq!(host.cursor(editor), Some(11));
}

/// Must be idempotent to exit; a second exit is a no-op.
///
/// * Enforced in: `LoopSnippetController::teardown`
/// * Failure symptom: context flag or marker flickers, or unsubscribe is called twice.
#[tokio::test]
async fn test_exit_is_idempotent() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("abc");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, "'' | ").await;
	assert!(host.context(IN_LOOP_SNIPPET));
	assert!(host.marker(editor).is_some());

	assert!(controller.exit(&mut host));
	assert!(!controller.exit(&mut host));
	assert_eq!(controller.phase(), SessionPhase::Idle);
	assert!(!host.context(IN_LOOP_SNIPPET));
	assert_eq!(host.marker(editor), None);
	assert_eq!(host.subscription_count(), 0);
}

/// Must not insert a separator on the first insertion.
///
/// * Enforced in: `LoopSession::next_fragment`
/// * Failure symptom: lists start with a dangling separator such as `, a`.
#[tokio::test]
async fn test_first_insertion_has_no_separator() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("x");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, "'' | ").await;
	assert_eq!(host.text(editor), "x''");
	assert_eq!(host.cursor(editor), Some(2));
}

/// Must count only the first change of the session's own insertion batch.
///
/// * Enforced in: `LoopSession::on_document_change`
/// * Failure symptom: auto-indent or auto-close edits in the same batch push the anchor twice.
#[tokio::test]
async fn test_own_insertion_counts_first_change_only() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, "'' | ").await;
	host.queue_compound_tail(vec![ContentChange::insert(0, "    ")]);
	controller.trigger(&mut host, None).await.unwrap();
	host.pump(&mut controller);

	assert_eq!(host.text(editor), "    '' | ''");
	assert_eq!(controller.anchor(), Some(7));
}

/// Must end the session when an insertion fails, then report the failure.
///
/// * Enforced in: `LoopSnippetController::insert_fragment`
/// * Failure symptom: a session keeps listening to a document that no longer accepts edits.
#[tokio::test]
async fn test_insert_failure_tears_down() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("abc");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, ", ").await;
	let document = controller.session().unwrap().document();
	host.close_document(document);

	assert!(controller.trigger(&mut host, None).await.is_err());
	assert_eq!(controller.phase(), SessionPhase::Idle);
	assert!(!host.context(IN_LOOP_SNIPPET));
	assert_eq!(host.subscription_count(), 0);
	assert_eq!(host.text(editor), "abc");
}

/// Must never be exitable when the exit marker is disabled.
///
/// * Enforced in: `LoopSnippetController::start_session`
/// * Failure symptom: the session ends invisibly when the caret passes an undrawn anchor.
#[tokio::test]
async fn test_hidden_marker_disables_exit() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("");
	let config = LoopSnippetConfig {
		show_exit_marker: false,
		..LoopSnippetConfig::default()
	};
	let mut controller = LoopSnippetController::new(config);

	start(&mut host, &mut controller, "'' | ").await;
	assert_eq!(controller.phase(), SessionPhase::Active { exitable: false });
	assert_eq!(host.marker(editor), None);

	host.move_to(editor, 2);
	host.pump(&mut controller);
	assert!(controller.is_active());
}

/// Must keep the marker on the anchor after every qualifying change.
///
/// * Enforced in: `LoopSnippetController::handle_event`
/// * Failure symptom: the marker lags behind the real insertion point.
#[tokio::test]
async fn test_marker_follows_anchor() {
	let mut host = HeadlessEditor::new();
	let editor = host.open("abc");
	let mut controller = LoopSnippetController::default();

	start(&mut host, &mut controller, "'' | ").await;
	assert_eq!(host.marker_offset(editor), Some(5));

	host.insert_at(editor, 0, "\n\n");
	host.pump(&mut controller);
	assert_eq!(controller.anchor(), Some(7));
	assert_eq!(host.marker_offset(editor), Some(7));
}
