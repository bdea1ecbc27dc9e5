use loopsnip_config::LoopSnippetConfig;
use loopsnip_editor::{IN_LOOP_SNIPPET, LoopHost, LoopSnippetArgs, PickerScript, SessionPhase, TriggerOutcome};
use pretty_assertions::assert_eq;

use crate::common::Fixture;

#[tokio::test]
async fn separator_list_tracks_foreign_insertions() {
	let mut fx = Fixture::new("0123456789");

	assert_eq!(fx.trigger(Some(PickerScript::preset(", "))).await, TriggerOutcome::Started);
	assert_eq!(fx.text(), "0123456789");
	assert_eq!(fx.anchor(), Some(10));

	assert_eq!(fx.trigger(None).await, TriggerOutcome::Continued);
	assert_eq!(fx.text(), "0123456789, ");
	assert_eq!(fx.anchor(), Some(12));

	fx.host.insert_at(fx.editor, 5, "abc");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(15));
	assert_eq!(fx.controller.phase(), SessionPhase::Active { exitable: false });
}

#[tokio::test]
async fn quoted_list_is_built_fragment_by_fragment() {
	let mut fx = Fixture::new("");

	fx.trigger(Some(PickerScript::preset("'' | "))).await;
	assert_eq!(fx.text(), "''");
	assert_eq!(fx.anchor(), Some(2));
	assert_eq!(fx.host.cursor(fx.editor), Some(1));

	fx.host.type_text(fx.editor, "a");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(3));

	fx.trigger(None).await;
	assert_eq!(fx.text(), "'a' | ''");
	assert_eq!(fx.anchor(), Some(8));

	fx.host.type_text(fx.editor, "b");
	fx.host.pump(&mut fx.controller);
	fx.trigger(None).await;
	assert_eq!(fx.text(), "'a' | 'b' | ''");
	assert_eq!(fx.anchor(), Some(14));
	assert_eq!(fx.host.cursor(fx.editor), Some(13));
}

#[tokio::test]
async fn caret_reaching_anchor_ends_session() {
	let mut fx = Fixture::new("abcdefghijklmnopqr");

	fx.trigger(Some(PickerScript::preset("'' | "))).await;
	assert_eq!(fx.anchor(), Some(20));
	assert!(fx.host.marker(fx.editor).is_some());

	fx.host.move_to(fx.editor, 5);
	fx.host.pump(&mut fx.controller);
	assert!(fx.controller.is_active());

	fx.host.move_to(fx.editor, 20);
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.controller.phase(), SessionPhase::Idle);
	assert_eq!(fx.host.marker(fx.editor), None);
	assert!(!fx.host.context(IN_LOOP_SNIPPET));
	assert_eq!(fx.host.subscription_count(), 0);
}

#[tokio::test]
async fn selecting_up_to_anchor_does_not_exit() {
	let mut fx = Fixture::new("");
	fx.trigger(Some(PickerScript::preset("'' | "))).await;

	fx.host.select(fx.editor, 0, 2);
	fx.host.pump(&mut fx.controller);
	assert!(fx.controller.is_active());
}

#[tokio::test]
async fn insertion_at_anchor_depends_on_exitability() {
	let mut exitable = Fixture::new("xy");
	exitable.trigger(Some(PickerScript::preset("'' | "))).await;
	exitable.host.insert_at(exitable.editor, 4, "!");
	exitable.host.pump(&mut exitable.controller);
	assert_eq!(exitable.anchor(), Some(4));

	let mut plain = Fixture::new("xy");
	plain.trigger(Some(PickerScript::preset(" && "))).await;
	plain.host.insert_at(plain.editor, 2, "!");
	plain.host.pump(&mut plain.controller);
	assert_eq!(plain.anchor(), Some(3));
}

#[tokio::test]
async fn custom_snippet_separator_selects_its_placeholder() {
	let mut fx = Fixture::new("a");

	fx.trigger(Some(PickerScript::custom_snippet(" ${1:op} "))).await;
	assert_eq!(fx.host.last_picker_items().last().map(String::as_str), Some("Custom snippet:  ${1:op} "));
	assert_eq!(fx.text(), "a");

	fx.trigger(None).await;
	assert_eq!(fx.text(), "a op ");
	assert_eq!(fx.anchor(), Some(5));
	assert_eq!(fx.host.text_in(fx.editor, fx.host.selection(fx.editor).unwrap().primary()), "op");
}

#[tokio::test]
async fn separator_rendering_empty_leaves_anchor_tracking_intact() {
	let mut fx = Fixture::new("abc");
	fx.host.move_to(fx.editor, 1);

	fx.trigger(Some(PickerScript::custom_snippet("$1"))).await;
	fx.trigger(None).await;
	assert_eq!(fx.text(), "abc");
	assert_eq!(fx.anchor(), Some(1));
	assert!(!fx.controller.session().unwrap().is_suppressing());

	fx.host.insert_at(fx.editor, 3, "zz");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(1));

	fx.host.insert_at(fx.editor, 0, "<");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(2));
}

#[tokio::test]
async fn custom_text_separator_is_literal() {
	let mut fx = Fixture::new("a");
	fx.trigger(Some(PickerScript::custom_text(" ${1:op} "))).await;
	fx.trigger(None).await;
	assert_eq!(fx.text(), "a ${1:op} ");
	assert_eq!(fx.anchor(), Some(10));
}

#[tokio::test]
async fn selection_seeds_wrap_and_inserts_immediately() {
	let config = LoopSnippetConfig {
		use_selected_content_as_snippet: true,
		..LoopSnippetConfig::default()
	};
	let mut fx = Fixture::with_config("foo bar", config);
	fx.host.select(fx.editor, 0, 3);

	fx.trigger(Some(PickerScript::preset(" && "))).await;
	assert_eq!(fx.text(), "foo && foo bar");
	assert_eq!(fx.anchor(), Some(10));

	fx.trigger(None).await;
	assert_eq!(fx.text(), "foo && foo && foo bar");
	assert_eq!(fx.anchor(), Some(17));
}

#[tokio::test]
async fn explicit_arguments_skip_the_picker() {
	let mut fx = Fixture::new("");
	let args = LoopSnippetArgs {
		wrap: Some("[$1]".to_string()),
		separator: Some(", ".to_string()),
		wrap_is_snippet: Some(true),
		..LoopSnippetArgs::default()
	};

	let outcome = fx.controller.trigger(&mut fx.host, Some(&args)).await.unwrap();
	fx.host.pump(&mut fx.controller);
	assert_eq!(outcome, TriggerOutcome::Started);
	assert!(fx.host.last_picker_items().is_empty());
	assert_eq!(fx.text(), "[]");

	fx.trigger(None).await;
	assert_eq!(fx.text(), "[], []");
	assert_eq!(fx.anchor(), Some(6));
	assert_eq!(fx.controller.phase(), SessionPhase::Active { exitable: false });
}

#[tokio::test]
async fn completions_are_requested_after_every_trigger() {
	let config = LoopSnippetConfig {
		trigger_completions: true,
		..LoopSnippetConfig::default()
	};
	let mut fx = Fixture::with_config("", config);
	fx.trigger(Some(PickerScript::preset(", "))).await;
	fx.trigger(None).await;
	assert_eq!(fx.host.completion_requests(), 2);
}

#[tokio::test]
async fn trigger_without_editor_does_nothing() {
	let mut fx = Fixture::new("abc");
	fx.host.focus(None);
	assert_eq!(fx.trigger(Some(PickerScript::preset(", "))).await, TriggerOutcome::NoEditor);
	assert_eq!(fx.controller.phase(), SessionPhase::Idle);
	assert_eq!(fx.host.subscription_count(), 0);
}

#[tokio::test]
async fn cancelled_picker_leaves_no_session() {
	let mut fx = Fixture::new("abc");
	assert_eq!(fx.trigger(Some(PickerScript::Cancel)).await, TriggerOutcome::Cancelled);
	assert_eq!(fx.controller.phase(), SessionPhase::Idle);
	assert!(!fx.host.context(IN_LOOP_SNIPPET));
	assert_eq!(fx.host.subscription_count(), 0);
	assert_eq!(fx.text(), "abc");
}

#[tokio::test]
async fn edits_from_another_view_move_the_anchor() {
	let mut fx = Fixture::new("abc");
	fx.trigger(Some(PickerScript::preset("'' | "))).await;
	assert_eq!(fx.anchor(), Some(5));

	let document = fx.controller.session().unwrap().document();
	let other = fx.host.open_view(document);
	fx.host.insert_at(other, 0, "12");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(7));

	fx.host.move_to(other, 7);
	fx.host.pump(&mut fx.controller);
	assert!(fx.controller.is_active(), "carets in other views never end the session");
}

#[tokio::test]
async fn edits_in_other_documents_are_ignored() {
	let mut fx = Fixture::new("abc");
	fx.trigger(Some(PickerScript::preset(", "))).await;

	let other = fx.host.open("zzz");
	fx.host.insert_at(other, 0, "12345");
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.anchor(), Some(3));
}

#[tokio::test]
async fn deletion_across_anchor_saturates() {
	let mut fx = Fixture::new("abcdef");
	fx.host.move_to(fx.editor, 3);
	fx.trigger(Some(PickerScript::preset(", "))).await;

	fx.host.delete_range(fx.editor, 1, 5);
	fx.host.pump(&mut fx.controller);
	assert_eq!(fx.text(), "af");
	assert_eq!(fx.anchor(), Some(0));
}

#[tokio::test]
async fn session_restarts_after_exit() {
	let mut fx = Fixture::new("");
	fx.trigger(Some(PickerScript::preset(" || "))).await;
	assert!(fx.controller.exit(&mut fx.host));

	assert_eq!(fx.trigger(Some(PickerScript::preset("'' | "))).await, TriggerOutcome::Started);
	assert_eq!(fx.text(), "''");
	assert_eq!(fx.controller.phase(), SessionPhase::Active { exitable: true });
}
