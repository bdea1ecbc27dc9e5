//! In-memory editing surface implementing [`LoopHost`].
//!
//! Documents are ropes, editors are views with a selection. Every edit
//! queues the notifications a GUI editor would send: a change batch first,
//! then a selection change if the caret moved. Nothing is delivered until
//! [`HeadlessEditor::pump`] hands the queue to a controller, which keeps
//! the ordering of the real event loop observable in tests. The one
//! exception is a snippet insertion: the controller drains the queue through
//! [`LoopHost::take_pending_event`] before the insertion round ends, as an
//! editor that fires change events while applying the edit would.

use std::collections::{BTreeMap, VecDeque};

use loopsnip_primitives::rope::{offset_to_position, position_to_offset};
use loopsnip_primitives::snippet::{RenderedSnippet, parse_snippet_template, render};
use loopsnip_primitives::{
	BoxFutureLocal, CharIdx, CharLen, ContentChange, DocumentChange, DocumentId, EditorId, Position, Range, Rope, Selection,
	SelectionChange, SnippetString, SubscriptionId,
};
use tracing::{trace, warn};

use crate::catalog::{SnippetVariant, VariantPicker};
use crate::decoration::MarkerStyle;
use crate::host::{HostError, HostEvent, ListenerKind, LoopHost, Subscription};
use crate::session::LoopSnippetController;

mod picker;

pub use picker::PickerScript;

#[derive(Debug, Clone)]
struct DocumentState {
	text: Rope,
	closed: bool,
}

#[derive(Debug, Clone)]
struct ViewState {
	document: DocumentId,
	selection: Selection,
}

/// A marker drawn by [`LoopHost::set_decoration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnMarker {
	pub style: MarkerStyle,
	pub at: Position,
}

/// Headless host: documents, views, listener registry and an event queue.
#[derive(Debug, Default)]
pub struct HeadlessEditor {
	documents: BTreeMap<DocumentId, DocumentState>,
	views: BTreeMap<EditorId, ViewState>,
	active: Option<EditorId>,
	subscriptions: BTreeMap<SubscriptionId, Subscription>,
	next_id: u64,
	events: VecDeque<HostEvent>,
	picker_script: VecDeque<PickerScript>,
	last_picker_items: Vec<String>,
	compound_tail: Vec<ContentChange>,
	markers: BTreeMap<EditorId, DrawnMarker>,
	context: BTreeMap<&'static str, bool>,
	completion_requests: usize,
}

impl HeadlessEditor {
	pub fn new() -> Self {
		Self::default()
	}

	fn next_id(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id
	}

	/// Opens `text` in a new document and view, focuses the view and puts
	/// the caret at the end.
	pub fn open(&mut self, text: &str) -> EditorId {
		let document = DocumentId(self.next_id());
		let rope = Rope::from(text);
		let end = rope.len_chars();
		self.documents.insert(document, DocumentState { text: rope, closed: false });
		let editor = self.open_view(document);
		if let Some(view) = self.views.get_mut(&editor) {
			view.selection = Selection::point(end);
		}
		editor
	}

	/// Opens another focused view onto an existing document.
	pub fn open_view(&mut self, document: DocumentId) -> EditorId {
		let editor = EditorId(self.next_id());
		self.views.insert(
			editor,
			ViewState {
				document,
				selection: Selection::point(0),
			},
		);
		self.active = Some(editor);
		editor
	}

	pub fn focus(&mut self, editor: Option<EditorId>) {
		self.active = editor;
	}

	/// Marks the document closed; later insertions into it fail.
	pub fn close_document(&mut self, document: DocumentId) {
		if let Some(doc) = self.documents.get_mut(&document) {
			doc.closed = true;
		}
	}

	pub fn text(&self, editor: EditorId) -> String {
		self.rope(editor).map(Rope::to_string).unwrap_or_default()
	}

	pub fn cursor(&self, editor: EditorId) -> Option<CharIdx> {
		self.views.get(&editor).map(|view| view.selection.cursor())
	}

	/// The marker currently drawn in `editor`.
	pub fn marker(&self, editor: EditorId) -> Option<DrawnMarker> {
		self.markers.get(&editor).copied()
	}

	/// The marker position converted back to an offset.
	pub fn marker_offset(&self, editor: EditorId) -> Option<CharIdx> {
		let marker = self.marker(editor)?;
		Some(self.position_to_offset(editor, marker.at))
	}

	pub fn context(&self, key: &str) -> bool {
		self.context.get(key).copied().unwrap_or(false)
	}

	pub fn completion_requests(&self) -> usize {
		self.completion_requests
	}

	/// Number of live listener registrations.
	pub fn subscription_count(&self) -> usize {
		self.subscriptions.len()
	}

	/// Labels shown the last time the picker was opened.
	pub fn last_picker_items(&self) -> &[String] {
		&self.last_picker_items
	}

	/// Queues the answer for the next picker.
	pub fn script_pick(&mut self, script: PickerScript) {
		self.picker_script.push_back(script);
	}

	/// Extra changes appended to the batch of the next snippet insertion, as
	/// an editor that re-indents or auto-closes while inserting would.
	pub fn queue_compound_tail(&mut self, changes: Vec<ContentChange>) {
		self.compound_tail = changes;
	}

	/// Types `text` at the caret, replacing a range selection.
	pub fn type_text(&mut self, editor: EditorId, text: &str) {
		let Some(range) = self.views.get(&editor).map(|view| view.selection.primary()) else {
			return;
		};
		let change = ContentChange::replace(range.min(), range.len(), text);
		let caret = range.min() + change.inserted_len();
		self.apply_batch(editor, vec![change], Some(Selection::point(caret)));
	}

	/// Moves the caret.
	pub fn move_to(&mut self, editor: EditorId, offset: CharIdx) {
		self.select(editor, offset, offset);
	}

	/// Selects `[anchor, head]`.
	pub fn select(&mut self, editor: EditorId, anchor: CharIdx, head: CharIdx) {
		let len = self.document_len(editor);
		self.set_selection(editor, Selection::single(anchor, head).clamp(len));
	}

	/// Inserts `text` at `offset` without moving the caret explicitly, like a
	/// completion provider or another view would.
	pub fn insert_at(&mut self, editor: EditorId, offset: CharIdx, text: &str) {
		self.apply_batch(editor, vec![ContentChange::insert(offset, text)], None);
	}

	/// Deletes `[start, end)`.
	pub fn delete_range(&mut self, editor: EditorId, start: CharIdx, end: CharIdx) {
		self.apply_batch(editor, vec![ContentChange::delete(start, end.saturating_sub(start))], None);
	}

	/// Applies `changes` as one batch. Each change's offsets are taken against
	/// the document as left by the changes before it. `caret`, when given,
	/// replaces the editor's selection afterwards. Returns true if the
	/// document changed.
	pub fn apply_batch(&mut self, editor: EditorId, changes: Vec<ContentChange>, caret: Option<Selection>) -> bool {
		let Some(document) = self.views.get(&editor).map(|view| view.document) else {
			return false;
		};
		let before: Vec<(EditorId, Selection)> = self
			.views
			.iter()
			.filter(|(_, view)| view.document == document)
			.map(|(id, view)| (*id, view.selection.clone()))
			.collect();
		let Some(doc) = self.documents.get_mut(&document) else {
			return false;
		};

		let mut applied = Vec::with_capacity(changes.len());
		for change in changes {
			let len = doc.text.len_chars();
			let start = change.start.min(len);
			let end = (start + change.removed).min(len);
			if start == end && change.text.is_empty() {
				continue;
			}
			doc.text.remove(start..end);
			doc.text.insert(start, &change.text);
			let change = ContentChange::replace(start, end - start, change.text);
			for view in self.views.values_mut().filter(|view| view.document == document) {
				view.selection = map_selection(&view.selection, &change);
			}
			applied.push(change);
		}
		let len = doc.text.len_chars();

		let changed = !applied.is_empty();
		if changed {
			trace!(%document, changes = applied.len(), "headless batch applied");
			self.emit(HostEvent::Document(DocumentChange { document, changes: applied }));
		}
		if let Some(selection) = caret
			&& let Some(view) = self.views.get_mut(&editor)
		{
			view.selection = selection.clamp(len);
		}
		for (id, previous) in before {
			let Some(selection) = self.views.get(&id).map(|view| view.selection.clone()) else {
				continue;
			};
			if selection != previous {
				self.emit(HostEvent::Selection(SelectionChange { editor: id, selection }));
			}
		}
		changed
	}

	fn rope(&self, editor: EditorId) -> Option<&Rope> {
		let view = self.views.get(&editor)?;
		self.documents.get(&view.document).map(|doc| &doc.text)
	}

	fn is_listened(&self, kind: ListenerKind) -> bool {
		self.subscriptions.values().any(|sub| sub.kind == kind)
	}

	fn emit(&mut self, event: HostEvent) {
		if self.is_listened(event.kind()) {
			self.events.push_back(event);
		}
	}

	/// Pops the next notification that still has a listener.
	pub fn next_event(&mut self) -> Option<HostEvent> {
		while let Some(event) = self.events.pop_front() {
			if self.is_listened(event.kind()) {
				return Some(event);
			}
		}
		None
	}

	/// Delivers queued notifications one at a time. Returns how many were
	/// delivered.
	pub fn pump(&mut self, controller: &mut LoopSnippetController) -> usize {
		let mut delivered = 0;
		while let Some(event) = self.next_event() {
			controller.handle_event(self, &event);
			delivered += 1;
		}
		delivered
	}

	fn apply_snippet(&mut self, editor: EditorId, snippet: &SnippetString, at: Option<Position>) -> Result<bool, HostError> {
		let view = self.views.get(&editor).ok_or(HostError::NoSuchEditor(editor))?;
		let document = view.document;
		let selected = view.selection.primary();
		let doc = self.documents.get(&document).ok_or(HostError::DocumentClosed(document))?;
		if doc.closed {
			return Err(HostError::DocumentClosed(document));
		}

		let target = match at {
			Some(position) => Range::point(self.position_to_offset(editor, position)),
			None => selected,
		};
		let rendered = render_or_literal(snippet);
		let start = target.min();
		let caret = rendered.initial_caret();
		let mut changes = vec![ContentChange::replace(start, target.len(), rendered.text)];
		changes.append(&mut self.compound_tail);

		Ok(self.apply_batch(editor, changes, Some(Selection::single(start + caret.start, start + caret.end))))
	}
}

/// Renders template text; text that fails to parse is inserted literally.
fn render_or_literal(snippet: &SnippetString) -> RenderedSnippet {
	match parse_snippet_template(snippet.value()) {
		Ok(template) => render(&template),
		Err(err) => {
			warn!(error = %err, "snippet did not parse, inserting literally");
			RenderedSnippet {
				text: snippet.value().to_string(),
				..RenderedSnippet::default()
			}
		}
	}
}

/// Shifts a selection across an applied change. Positions inside the
/// replaced span collapse to its start; a caret exactly at an insertion
/// point stays before the inserted text.
fn map_selection(selection: &Selection, change: &ContentChange) -> Selection {
	let end = change.start + change.removed;
	let map = |pos: CharIdx| -> CharIdx {
		if pos <= change.start {
			pos
		} else if pos >= end {
			pos.saturating_add_signed(change.delta())
		} else {
			change.start
		}
	};
	let map_range = |r: &Range| Range::new(map(r.anchor), map(r.head));
	let others: Vec<Range> = selection.ranges().iter().skip(1).map(map_range).collect();
	Selection::new(map_range(&selection.primary()), others)
}

impl LoopHost for HeadlessEditor {
	fn active_editor(&self) -> Option<EditorId> {
		self.active
	}

	fn document_of(&self, editor: EditorId) -> Option<DocumentId> {
		self.views.get(&editor).map(|view| view.document)
	}

	fn selection(&self, editor: EditorId) -> Option<Selection> {
		self.views.get(&editor).map(|view| view.selection.clone())
	}

	fn set_selection(&mut self, editor: EditorId, selection: Selection) {
		let Some(view) = self.views.get_mut(&editor) else {
			return;
		};
		if view.selection == selection {
			return;
		}
		view.selection = selection.clone();
		self.emit(HostEvent::Selection(SelectionChange { editor, selection }));
	}

	fn text_in(&self, editor: EditorId, range: Range) -> String {
		let Some(rope) = self.rope(editor) else {
			return String::new();
		};
		let range = range.clamp(rope.len_chars());
		rope.slice(range.min()..range.max()).to_string()
	}

	fn document_len(&self, editor: EditorId) -> CharLen {
		self.rope(editor).map(Rope::len_chars).unwrap_or(0)
	}

	fn offset_to_position(&self, editor: EditorId, offset: CharIdx) -> Position {
		self.rope(editor).map(|rope| offset_to_position(rope.slice(..), offset)).unwrap_or_default()
	}

	fn position_to_offset(&self, editor: EditorId, position: Position) -> CharIdx {
		self.rope(editor).map(|rope| position_to_offset(rope.slice(..), position)).unwrap_or(0)
	}

	fn insert_snippet<'a>(
		&'a mut self,
		editor: EditorId,
		snippet: &'a SnippetString,
		at: Option<Position>,
	) -> BoxFutureLocal<'a, Result<bool, HostError>> {
		let result = self.apply_snippet(editor, snippet, at);
		Box::pin(std::future::ready(result))
	}

	fn take_pending_event(&mut self) -> Option<HostEvent> {
		self.next_event()
	}

	fn pick_variant<'a>(&'a mut self, picker: &'a VariantPicker) -> BoxFutureLocal<'a, Option<SnippetVariant>> {
		let choice = match self.picker_script.pop_front() {
			Some(PickerScript::Choose { filter, label }) => {
				let items = picker.items(&filter);
				self.last_picker_items = items.iter().map(|item| item.label.clone()).collect();
				let found = items.into_iter().find(|item| item.label == label).map(|item| item.variant);
				if found.is_none() {
					warn!(%label, "scripted picker label not offered");
				}
				found
			}
			Some(PickerScript::Cancel) => None,
			None => {
				warn!(title = picker.title(), "picker opened without a scripted answer");
				None
			}
		};
		Box::pin(std::future::ready(choice))
	}

	fn set_decoration(&mut self, editor: EditorId, style: &MarkerStyle, at: Option<Position>) {
		match at {
			Some(at) => {
				self.markers.insert(editor, DrawnMarker { style: *style, at });
			}
			None => {
				self.markers.remove(&editor);
			}
		}
	}

	fn set_context(&mut self, key: &'static str, value: bool) {
		self.context.insert(key, value);
	}

	fn trigger_completions(&mut self, _editor: EditorId) {
		self.completion_requests += 1;
	}

	fn subscribe(&mut self, subscription: Subscription) -> SubscriptionId {
		let id = SubscriptionId(self.next_id());
		self.subscriptions.insert(id, subscription);
		id
	}

	fn unsubscribe(&mut self, id: SubscriptionId) {
		self.subscriptions.remove(&id);
	}
}
