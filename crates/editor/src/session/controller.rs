use loopsnip_config::LoopSnippetConfig;
use loopsnip_primitives::{CharIdx, EditorId};
use tracing::{debug, trace, warn};

use super::state::{FragmentText, InsertTarget, LoopSession, SessionInit, Transition};
use crate::catalog::{LoopSnippetArgs, SnippetVariant, VariantCatalog};
use crate::decoration;
use crate::error::LoopSnippetError;
use crate::host::{HostEvent, IN_LOOP_SNIPPET, ListenerKind, LoopHost, Subscription};

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
	Idle,
	/// The picker is open.
	AwaitingVariant,
	Active {
		exitable: bool,
	},
}

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
	/// No editor had focus.
	NoEditor,
	/// The picker was dismissed.
	Cancelled,
	/// A new session started and its first fragment was handled.
	Started,
	/// The active session inserted one more fragment.
	Continued,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
	Explicit,
	CaretAtAnchor,
	InsertFailed,
}

#[derive(Debug)]
enum Phase {
	Idle,
	AwaitingVariant,
	Active(LoopSession),
}

/// Owns the single loop session and sequences everything that happens to it.
///
/// At most one session exists; triggering while one is active inserts one
/// more fragment into it.
#[derive(Debug)]
pub struct LoopSnippetController {
	config: LoopSnippetConfig,
	catalog: VariantCatalog,
	phase: Phase,
}

impl Default for LoopSnippetController {
	fn default() -> Self {
		Self::new(LoopSnippetConfig::default())
	}
}

impl LoopSnippetController {
	pub fn new(config: LoopSnippetConfig) -> Self {
		Self {
			catalog: VariantCatalog::with_config(&config),
			config,
			phase: Phase::Idle,
		}
	}

	/// Replaces the configuration used by the next session start.
	pub fn set_config(&mut self, config: LoopSnippetConfig) {
		self.catalog = VariantCatalog::with_config(&config);
		self.config = config;
	}

	pub fn config(&self) -> &LoopSnippetConfig {
		&self.config
	}

	pub fn catalog(&self) -> &VariantCatalog {
		&self.catalog
	}

	pub fn phase(&self) -> SessionPhase {
		match &self.phase {
			Phase::Idle => SessionPhase::Idle,
			Phase::AwaitingVariant => SessionPhase::AwaitingVariant,
			Phase::Active(session) => SessionPhase::Active {
				exitable: session.is_exitable(),
			},
		}
	}

	pub fn is_active(&self) -> bool {
		matches!(self.phase, Phase::Active(_))
	}

	/// The active session, if any.
	pub fn session(&self) -> Option<&LoopSession> {
		match &self.phase {
			Phase::Active(session) => Some(session),
			_ => None,
		}
	}

	pub fn anchor(&self) -> Option<CharIdx> {
		self.session().map(LoopSession::anchor)
	}

	/// Starts a session, or inserts one more fragment into the active one.
	///
	/// An insertion failure ends the session before the error is returned.
	pub async fn trigger<H: LoopHost + ?Sized>(&mut self, host: &mut H, args: Option<&LoopSnippetArgs>) -> Result<TriggerOutcome, LoopSnippetError> {
		let Some(editor) = host.active_editor() else {
			trace!("loop snippet trigger without an editor");
			return Ok(TriggerOutcome::NoEditor);
		};

		if self.is_active() {
			trace!(anchor = ?self.anchor(), "loop snippet re-entered");
			self.insert_fragment(host).await?;
			return Ok(TriggerOutcome::Continued);
		}

		self.phase = Phase::AwaitingVariant;
		let variant = match args.and_then(LoopSnippetArgs::explicit_variant) {
			Some(variant) => Some(variant),
			None => {
				let picker = self.catalog.picker();
				host.pick_variant(&picker).await
			}
		};
		let Some(variant) = variant else {
			self.phase = Phase::Idle;
			debug!("loop snippet picker cancelled");
			return Ok(TriggerOutcome::Cancelled);
		};

		let Some(session) = self.start_session(host, editor, variant) else {
			self.phase = Phase::Idle;
			return Ok(TriggerOutcome::NoEditor);
		};
		self.phase = Phase::Active(session);
		self.insert_fragment(host).await?;
		Ok(TriggerOutcome::Started)
	}

	fn start_session<H: LoopHost + ?Sized>(&self, host: &mut H, editor: EditorId, variant: SnippetVariant) -> Option<LoopSession> {
		let document = host.document_of(editor)?;
		let selection = host.selection(editor).unwrap_or_default();
		let config = &self.config;

		let seed_from_selection = variant.lacks_wrap() && config.use_selected_content_as_snippet;
		let wrap = if seed_from_selection {
			host.text_in(editor, selection.primary())
		} else {
			variant.wrap.unwrap_or_default()
		};

		let cursor = if seed_from_selection {
			let collapsed = selection.collapse_to_end();
			host.set_selection(editor, collapsed.clone());
			collapsed.cursor()
		} else {
			selection.cursor()
		};

		let exitable = config.show_exit_marker && variant.exitable_by_typing;
		let mut session = LoopSession::new(SessionInit {
			editor,
			document,
			anchor: cursor,
			first_insertion: !seed_from_selection,
			exitable,
			show_marker: config.show_exit_marker,
			trigger_completions: config.trigger_completions,
			fragment: FragmentText {
				wrap,
				wrap_is_template: variant.wrap_is_template.unwrap_or(config.selected_content_use_snippet),
				separator: variant.separator,
				separator_is_template: variant.separator_is_template,
			},
		});

		let subscribe = |host: &mut H, kind| {
			host.subscribe(Subscription {
				kind,
				editor,
				document,
			})
		};
		let id = subscribe(host, ListenerKind::DocumentChange);
		session.disposables.push(ListenerKind::DocumentChange, id);
		if exitable {
			let id = subscribe(host, ListenerKind::SelectionChange);
			session.disposables.push(ListenerKind::SelectionChange, id);
		}

		host.set_context(IN_LOOP_SNIPPET, true);
		decoration::refresh(host, editor, session.show_marker, Some(session.anchor()));
		debug!(%editor, %document, anchor = cursor, exitable, seed_from_selection, "loop snippet session started");
		Some(session)
	}

	async fn insert_fragment<H: LoopHost + ?Sized>(&mut self, host: &mut H) -> Result<(), LoopSnippetError> {
		let Phase::Active(session) = &mut self.phase else {
			return Ok(());
		};
		let editor = session.editor();

		if let Some(snippet) = session.next_fragment() {
			let at = match session.insert_target() {
				InsertTarget::Cursor => None,
				InsertTarget::Anchor(anchor) => Some(host.offset_to_position(editor, anchor)),
			};
			session.begin_insert();
			trace!(%editor, snippet = snippet.value(), ?at, "inserting loop fragment");
			let inserted = host.insert_snippet(editor, &snippet, at).await;
			match inserted {
				Ok(true) => {}
				Ok(false) => {
					trace!(%editor, "loop fragment rendered empty");
					session.abandon_insert();
				}
				Err(err) => {
					warn!(%editor, error = %err, "loop snippet insertion failed");
					self.teardown(host, ExitReason::InsertFailed);
					return Err(err.into());
				}
			}
			while let Some(event) = host.take_pending_event() {
				self.handle_event(host, &event);
			}
		}

		let Phase::Active(session) = &mut self.phase else {
			return Ok(());
		};
		if session.trigger_completions {
			host.trigger_completions(editor);
		}
		session.finish_insert();
		Ok(())
	}

	/// Ends the active session. Returns false if there was none.
	pub fn exit<H: LoopHost + ?Sized>(&mut self, host: &mut H) -> bool {
		self.teardown(host, ExitReason::Explicit)
	}

	/// Delivers one host notification to the active session.
	pub fn handle_event<H: LoopHost + ?Sized>(&mut self, host: &mut H, event: &HostEvent) -> Transition {
		let Phase::Active(session) = &mut self.phase else {
			return Transition::Unchanged;
		};
		if !session.disposables.holds(event.kind()) {
			return Transition::Unchanged;
		}

		let transition = match event {
			HostEvent::Document(change) => session.on_document_change(change),
			HostEvent::Selection(change) => session.on_selection_change(change),
		};

		match transition {
			Transition::AnchorMoved { .. } => {
				let editor = session.editor();
				session.clamp_anchor(host.document_len(editor));
				decoration::refresh(host, editor, session.show_marker, Some(session.anchor()));
			}
			Transition::Exit => {
				self.teardown(host, ExitReason::CaretAtAnchor);
			}
			Transition::Unchanged => {}
		}
		transition
	}

	fn teardown<H: LoopHost + ?Sized>(&mut self, host: &mut H, reason: ExitReason) -> bool {
		if !self.is_active() {
			return false;
		}
		let Phase::Active(mut session) = std::mem::replace(&mut self.phase, Phase::Idle) else {
			return false;
		};
		for (_, id) in session.disposables.take() {
			host.unsubscribe(id);
		}
		host.set_context(IN_LOOP_SNIPPET, false);
		decoration::refresh(host, session.editor(), session.show_marker, None);
		debug!(editor = %session.editor(), anchor = session.anchor(), ?reason, "loop snippet session ended");
		true
	}
}
