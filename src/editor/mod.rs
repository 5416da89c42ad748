//! The application controller.
//!
//! [`Editor`] owns the live document, its history and everything derived from
//! it. All mutation goes through it: commands via [`Editor::execute`], pointer
//! interactions via the two-phase gesture API, and dialogs via the modal
//! stack. After every change the derived state is rebuilt before the method
//! returns, so a caller never observes stale activation status.

use crate::activity::{ActivityLog, LogLevel};
use crate::commands::{Clipboard, Command, CommandContext};
use crate::config::EditorConfig;
use crate::document::{self, AutosaveSchedule, LoadedDocument, ProjectSink, SaveData};
use crate::error::{CommandError, DocumentError, EditorError};
use crate::export::{self, Export};
use crate::history::Timeline;
use crate::linearize::end_nodes;
use crate::model::{CoreState, DocumentSettings, Mininode, Node, NodeId, Point};
use crate::status::{DerivedState, NodeStatus};
use std::collections::BTreeSet;
use std::time::Instant;

mod gesture;
mod modal;

pub use gesture::{Gesture, GestureKind, ResizeHandle};
pub use modal::Modal;

/// Currently selected nodes and drawing objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub nodes: BTreeSet<NodeId>,
    pub objects: BTreeSet<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.objects.is_empty()
    }
}

pub struct Editor {
    config: EditorConfig,
    context: CommandContext,
    timeline: Timeline,
    derived: DerivedState,
    log: ActivityLog,
    selection: Selection,
    clipboard: Option<Clipboard>,
    gesture: Option<Gesture>,
    modals: Vec<Modal>,
    icon: Option<String>,
    revision: u64,
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(CoreState::default(), config)
    }

    pub fn with_state(state: CoreState, config: EditorConfig) -> Self {
        let derived = DerivedState::compute(&state);
        Self {
            context: CommandContext::from(&config),
            timeline: Timeline::new(state).with_limit(config.history_limit),
            derived,
            log: ActivityLog::new(config.log_capacity),
            selection: Selection::default(),
            clipboard: None,
            gesture: None,
            modals: Vec::new(),
            icon: None,
            revision: 0,
            config,
        }
    }

    pub fn from_document(doc: LoadedDocument, config: EditorConfig) -> Self {
        let mut editor = Self::with_state(doc.data.state, config);
        editor.icon = doc.data.icon;
        editor
    }

    pub fn state(&self) -> &CoreState {
        self.timeline.present()
    }

    pub fn derived(&self) -> &DerivedState {
        &self.derived
    }

    pub fn status(&self, id: NodeId) -> Option<&NodeStatus> {
        self.derived.status_of(id)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Bumped on every change to the live document.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn refresh(&mut self) {
        self.derived = DerivedState::compute(self.timeline.present());
        self.revision += 1;
        let state = self.timeline.present();
        self.selection
            .nodes
            .retain(|id| state.node(*id).is_some());
        self.selection
            .objects
            .retain(|id| state.canvas_object(id).is_some());
    }

    /// Applies a command and commits its result as one history entry.
    ///
    /// Rejections leave state and history untouched; they are logged as
    /// warnings and returned.
    pub fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        let result = if self.gesture.is_some() {
            Err(CommandError::GestureInProgress)
        } else {
            command.apply(self.timeline.present(), &self.context)
        };
        match result {
            Ok(applied) => {
                tracing::debug!(?command, "committing command");
                self.timeline.commit(applied.state);
                self.refresh();
                self.log.push(applied.level, applied.message);
                Ok(())
            }
            Err(e) => {
                if !e.is_silent() {
                    self.log.warning(e.to_string());
                }
                Err(e)
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture.is_some() || !self.timeline.undo() {
            return false;
        }
        tracing::debug!(past = self.timeline.past().len(), "undo");
        self.refresh();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture.is_some() || !self.timeline.redo() {
            return false;
        }
        tracing::debug!(future = self.timeline.future().len(), "redo");
        self.refresh();
        true
    }

    pub fn clear_history(&mut self) {
        self.timeline.clear();
        self.log.info("History cleared.");
    }

    // Selection and clipboard.

    pub fn select_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let state = self.timeline.present();
        self.selection.nodes = ids
            .into_iter()
            .filter(|id| state.node(*id).is_some())
            .collect();
    }

    pub fn select_objects(&mut self, ids: impl IntoIterator<Item = String>) {
        let state = self.timeline.present();
        self.selection.objects = ids
            .into_iter()
            .filter(|id| state.canvas_object(id).is_some())
            .collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
    }

    /// Copies the selected nodes. Returns how many were copied.
    pub fn copy_selection(&mut self) -> Result<usize, CommandError> {
        let clipboard = Clipboard::copy(self.timeline.present(), &self.selection.nodes)
            .ok_or(CommandError::EmptySelection)?;
        let count = clipboard.nodes.len();
        self.clipboard = Some(clipboard);
        self.log.info(format!("{} node(s) copied.", count));
        Ok(count)
    }

    pub fn paste(&mut self, at: Point) -> Result<(), CommandError> {
        let clipboard = self.clipboard.clone().ok_or(CommandError::EmptyClipboard)?;
        self.execute(Command::Paste { clipboard, at })
    }

    // Gestures.

    fn begin(&mut self, kind: GestureKind, origin: Point) {
        tracing::debug!(?kind, "gesture started");
        let baseline = self.timeline.present().clone();
        self.gesture = Some(Gesture::new(kind, origin, baseline));
    }

    /// Starts dragging nodes. Pinned nodes stay put.
    pub fn begin_move(&mut self, ids: &BTreeSet<NodeId>, origin: Point) -> Result<(), CommandError> {
        if self.gesture.is_some() {
            return Err(CommandError::GestureInProgress);
        }
        let state = self.timeline.present();
        let existing: Vec<&Node> = ids.iter().filter_map(|id| state.node(*id)).collect();
        let movable: Vec<NodeId> = existing
            .iter()
            .filter(|n| !n.is_pinned)
            .map(|n| n.id)
            .collect();
        if movable.is_empty() {
            return Err(match existing.first() {
                Some(pinned) => CommandError::NodePinned(pinned.id),
                None => CommandError::EmptySelection,
            });
        }
        self.begin(GestureKind::MoveNodes(movable), origin);
        Ok(())
    }

    pub fn begin_resize(
        &mut self,
        node: NodeId,
        handle: ResizeHandle,
        origin: Point,
    ) -> Result<(), CommandError> {
        if self.gesture.is_some() {
            return Err(CommandError::GestureInProgress);
        }
        let target = self
            .timeline
            .present()
            .node(node)
            .ok_or(CommandError::NodeNotFound(node))?;
        if target.is_pinned {
            return Err(CommandError::NodePinned(node));
        }
        self.begin(GestureKind::ResizeNode { node, handle }, origin);
        Ok(())
    }

    pub fn begin_move_objects(
        &mut self,
        ids: &BTreeSet<String>,
        origin: Point,
    ) -> Result<(), CommandError> {
        if self.gesture.is_some() {
            return Err(CommandError::GestureInProgress);
        }
        let state = self.timeline.present();
        let existing: Vec<String> = ids
            .iter()
            .filter(|id| state.canvas_object(id).is_some())
            .cloned()
            .collect();
        if existing.is_empty() {
            return Err(CommandError::EmptySelection);
        }
        self.begin(GestureKind::MoveObjects(existing), origin);
        Ok(())
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Moves the live geometry to follow the pointer. Records nothing.
    pub fn update_gesture(&mut self, pointer: Point) -> Result<(), CommandError> {
        let gesture = self.gesture.as_ref().ok_or(CommandError::NoGesture)?;
        let live = gesture.project(pointer, &self.config);
        // Gestures only touch geometry, which activation status never reads.
        *self.timeline.present_mut() = live;
        Ok(())
    }

    /// Ends the gesture. Pushes one undo step if anything moved.
    pub fn commit_gesture(&mut self) -> Result<bool, CommandError> {
        let gesture = self.gesture.take().ok_or(CommandError::NoGesture)?;
        if *self.timeline.present() == gesture.baseline {
            return Ok(false);
        }
        self.timeline.record(gesture.baseline);
        self.refresh();
        tracing::debug!(kind = ?gesture.kind, "gesture committed");
        Ok(true)
    }

    /// Abandons the gesture, restoring the state from before it began.
    pub fn cancel_gesture(&mut self) -> Result<(), CommandError> {
        let gesture = self.gesture.take().ok_or(CommandError::NoGesture)?;
        *self.timeline.present_mut() = gesture.baseline;
        tracing::debug!(kind = ?gesture.kind, "gesture cancelled");
        Ok(())
    }

    // Modal stack.

    pub fn open_modal(&mut self, modal: Modal) {
        self.modals.push(modal);
    }

    pub fn top_modal(&self) -> Option<&Modal> {
        self.modals.last()
    }

    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    pub fn dismiss_modal(&mut self) -> Option<Modal> {
        self.modals.pop()
    }

    /// Asks before deleting the selected nodes.
    pub fn request_delete_selection(&mut self) -> Result<(), CommandError> {
        if self.selection.nodes.is_empty() {
            return Err(CommandError::EmptySelection);
        }
        self.open_modal(Modal::ConfirmDeleteSelection(self.selection.nodes.clone()));
        Ok(())
    }

    pub fn request_import(&mut self, content: impl Into<String>) {
        self.open_modal(Modal::ConfirmImport {
            content: content.into(),
        });
    }

    /// Runs the action of a yes/no dialog on top of the stack and closes it.
    pub fn confirm(&mut self) -> Result<(), EditorError> {
        let modal = self.modals.last().ok_or(EditorError::NoModal)?;
        if modal.needs_input() {
            return Err(EditorError::ModalNeedsInput);
        }
        let Some(modal) = self.modals.pop() else {
            return Err(EditorError::NoModal);
        };
        match modal {
            Modal::ConfirmImport { content } => self.load_json(&content)?,
            Modal::ConfirmNewCanvas => self.new_canvas(),
            other => {
                if let Some(command) = other.command() {
                    self.execute(command)?;
                }
            }
        }
        Ok(())
    }

    fn take_modal(&mut self, matches: impl Fn(&Modal) -> bool) -> Result<Modal, EditorError> {
        match self.modals.last() {
            Some(top) if matches(top) => self.modals.pop().ok_or(EditorError::NoModal),
            _ => Err(EditorError::NoModal),
        }
    }

    pub fn submit_node(&mut self, node: Node) -> Result<(), EditorError> {
        let id = node.id;
        self.take_modal(|m| *m == Modal::EditNode(id))?;
        self.execute(Command::UpdateNode(node))?;
        Ok(())
    }

    pub fn submit_mininode(&mut self, mininode: Mininode) -> Result<(), EditorError> {
        let id = mininode.id;
        self.take_modal(|m| *m == Modal::EditMininode(id))?;
        self.execute(Command::UpdateMininode(mininode))?;
        Ok(())
    }

    pub fn submit_settings(&mut self, settings: DocumentSettings) -> Result<(), EditorError> {
        self.take_modal(|m| *m == Modal::Settings)?;
        self.execute(Command::UpdateSettings(settings))?;
        Ok(())
    }

    /// Answers [`Modal::SelectEndNode`]; `None` exports every flow.
    pub fn choose_end_node(&mut self, choice: Option<NodeId>) -> Result<Export, EditorError> {
        self.take_modal(|m| matches!(m, Modal::SelectEndNode { .. }))?;
        self.export(choice)
    }

    // Export.

    /// Starts an ordered export. With several end nodes the user has to pick
    /// one first: a [`Modal::SelectEndNode`] is opened and `None` returned.
    pub fn request_export(&mut self) -> Result<Option<Export>, EditorError> {
        let state = self.timeline.present();
        let candidates = end_nodes(&state.nodes, &state.connections);
        if candidates.len() > 1 {
            self.open_modal(Modal::SelectEndNode { candidates });
            return Ok(None);
        }
        self.export(None).map(Some)
    }

    pub fn export(&mut self, terminal: Option<NodeId>) -> Result<Export, EditorError> {
        let export = match export::ordered_export(self.timeline.present(), terminal) {
            Ok(export) => export,
            Err(e) => {
                self.log.error(e.to_string());
                return Err(e.into());
            }
        };
        if let Some(cycle) = &export.degraded {
            self.log.error(format!(
                "Export: {}. Falling back to order index sorting.",
                cycle
            ));
        }
        self.log.success(format!(
            "Exported '{}' ({} node(s)).",
            export.title,
            export.entries.len()
        ));
        Ok(export)
    }

    pub fn export_selection(&mut self) -> Result<Export, EditorError> {
        match export::selection_export(self.timeline.present(), &self.selection.nodes) {
            Ok(export) => {
                self.log.success(format!(
                    "Exported selection ({} node(s)).",
                    export.entries.len()
                ));
                Ok(export)
            }
            Err(e) => {
                self.log.warning(e.to_string());
                Err(e.into())
            }
        }
    }

    // Persistence.

    pub fn save_data(&self) -> SaveData {
        SaveData {
            icon: self.icon.clone(),
            ..SaveData::new(self.timeline.present().clone())
        }
    }

    pub fn export_json(&self) -> Result<String, DocumentError> {
        self.save_data().to_json()
    }

    fn replace_document(&mut self, state: CoreState) {
        self.gesture = None;
        self.modals.clear();
        self.selection = Selection::default();
        self.timeline.reset(state);
        self.refresh();
    }

    /// Replaces the document with the parsed `json`. History is cleared.
    pub fn load_json(&mut self, json: &str) -> Result<(), DocumentError> {
        let doc = match document::load_document(json) {
            Ok(doc) => doc,
            Err(e) => {
                self.log.error(e.to_string());
                return Err(e);
            }
        };
        tracing::info!(
            migrated = doc.migrated,
            pruned = doc.pruned,
            nodes = doc.data.state.nodes.len(),
            "document loaded"
        );
        self.icon = doc.data.icon;
        self.replace_document(doc.data.state);
        if doc.pruned > 0 {
            self.log.warning(format!(
                "{} duplicate or dangling record(s) removed while loading.",
                doc.pruned
            ));
        }
        self.log.push(
            LogLevel::Success,
            format!("Project '{}' loaded.", self.state().settings.canvas_title),
        );
        Ok(())
    }

    pub fn new_canvas(&mut self) {
        self.icon = None;
        self.replace_document(CoreState::default());
        self.log.info("New canvas created.");
    }

    pub fn autosave_schedule(&self, now: Instant) -> AutosaveSchedule {
        AutosaveSchedule::new(
            self.config.autosave_interval(),
            self.config.save_debounce(),
            now,
        )
    }

    /// Writes a snapshot to `sink` when `schedule` says one is due. The
    /// periodic trigger only fires while the document has autosave enabled.
    ///
    /// Never touches history.
    pub fn autosave(
        &mut self,
        schedule: &mut AutosaveSchedule,
        sink: &mut impl ProjectSink,
        now: Instant,
    ) -> Result<bool, DocumentError> {
        schedule.observe(self.revision, now);
        let periodic = self.state().settings.autosave_enabled && schedule.interval_due(now);
        if !schedule.debounce_due(now) && !periodic {
            return Ok(false);
        }
        if let Err(e) = sink.save(&self.save_data()) {
            self.log.error(e.to_string());
            return Err(e);
        }
        schedule.mark_saved(now);
        tracing::info!(revision = self.revision, "project saved");
        Ok(true)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
