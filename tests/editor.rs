//! Editor integration tests
//!
//! End-to-end behavior of the controller: commits, history, gestures, the
//! modal stack, exports and autosave.
mod common;
use common::*;
use mindflow::activity::LogLevel;
use mindflow::document::{ProjectSink, SaveData};
use mindflow::editor::GestureKind;
use mindflow::prelude::*;
use std::collections::BTreeSet;
use std::result::Result;
use std::time::{Duration, Instant};

#[derive(Default)]
struct MemorySink {
    saved: Vec<SaveData>,
}

impl ProjectSink for MemorySink {
    fn save(&mut self, data: &SaveData) -> Result<(), DocumentError> {
        self.saved.push(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod history_tests {
    use super::*;

    #[test]
    fn test_each_command_is_one_history_entry() {
        let mut editor = editor_with(create_chain(2));
        editor.execute(Command::ToggleComplete(1)).unwrap();
        editor.execute(Command::AddMininode { parent: 2 }).unwrap();
        assert_eq!(editor.timeline().past().len(), 2);
        assert_eq!(editor.log().last().unwrap().level, LogLevel::Success);
    }

    #[test]
    fn test_rejection_leaves_state_and_history_alone() {
        let mut editor = editor_with(create_chain(2));
        let before = editor.state().clone();
        let err = editor
            .execute(Command::Connect {
                from: PortRef::new(1, "out_1"),
                to: PortRef::new(1, "in_1"),
            })
            .unwrap_err();
        assert_eq!(err, CommandError::SelfConnection(1));
        assert_eq!(editor.state(), &before);
        assert!(!editor.timeline().can_undo());

        let entry = editor.log().last().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert!(entry.message.contains("itself"));
    }

    #[test]
    fn test_adding_past_the_largest_id_is_a_warning() {
        let mut state = create_chain(1);
        state.nodes[0].id = NodeId::MAX;
        let mut editor = Editor::default();
        editor
            .load_json(&SaveData::new(state).to_json().unwrap())
            .unwrap();
        let before = editor.state().clone();

        let err = editor
            .execute(Command::AddNode {
                template: NodeTemplate::Normal,
                pos: Point::default(),
            })
            .unwrap_err();
        assert_eq!(err, CommandError::IdSpaceExhausted("node id"));
        assert_eq!(editor.state(), &before);
        assert!(!editor.timeline().can_undo());
        assert_eq!(editor.log().last().unwrap().level, LogLevel::Warning);
    }

    #[test]
    fn test_unchanged_commands_are_silent() {
        let mut editor = editor_with(create_chain(2));
        let err = editor.execute(Command::MarkAllIncomplete).unwrap_err();
        assert_eq!(err, CommandError::Unchanged);
        assert!(editor.log().is_empty());
        assert!(!editor.timeline().can_undo());
    }

    #[test]
    fn test_delete_is_a_single_undo_step() {
        let mut state = create_scenario();
        state.mininodes.push(Mininode::new(1001, 1));
        state.mininodes.push(Mininode::new(1002, 1));
        let mut editor = editor_with(state.clone());

        editor.execute(Command::delete_node(1)).unwrap();
        assert_eq!(editor.timeline().past().len(), 1);
        assert!(editor.state().mininodes.is_empty());
        assert!(editor.state().connections.iter().all(|c| !c.touches(1)));

        assert!(editor.undo());
        assert_eq!(editor.state(), &state);
    }

    #[test]
    fn test_status_is_recomputed_after_undo_and_redo() {
        let mut editor = editor_with(create_chain(2));
        assert!(!editor.status(2).unwrap().is_condition_met);

        editor.execute(Command::ToggleComplete(1)).unwrap();
        assert!(editor.status(2).unwrap().is_condition_met);

        editor.undo();
        assert!(!editor.status(2).unwrap().is_condition_met);

        editor.redo();
        assert!(editor.status(2).unwrap().is_condition_met);
    }

    #[test]
    fn test_selection_drops_deleted_nodes() {
        let mut editor = editor_with(create_chain(3));
        editor.select_nodes([1, 2, 99]);
        assert_eq!(editor.selection().nodes, BTreeSet::from([1, 2]));
        editor.execute(Command::delete_node(2)).unwrap();
        assert_eq!(editor.selection().nodes, BTreeSet::from([1]));
    }

    #[test]
    fn test_history_limit_from_config() {
        let config = EditorConfig::default().with_history_limit(1);
        let mut editor = Editor::with_state(create_chain(2), config);
        editor.execute(Command::ToggleComplete(1)).unwrap();
        editor.execute(Command::ToggleComplete(2)).unwrap();
        assert_eq!(editor.timeline().past().len(), 1);
        assert!(editor.undo());
        assert!(!editor.undo());
        assert!(editor.state().node(1).unwrap().is_complete);
    }

    #[test]
    fn test_copy_and_paste() {
        let mut editor = editor_with(create_chain(2));
        assert_eq!(editor.paste(Point::default()), Err(CommandError::EmptyClipboard));

        editor.select_nodes([1, 2]);
        assert_eq!(editor.copy_selection(), Ok(2));
        editor.paste(Point::new(400.0, 0.0)).unwrap();
        assert_eq!(editor.state().nodes.len(), 4);
        assert_eq!(editor.state().connections.len(), 2);
    }
}

#[cfg(test)]
mod gesture_tests {
    use super::*;

    #[test]
    fn test_move_commits_one_snapshot() {
        let mut editor = editor_with(create_chain(2));
        let before = editor.state().clone();

        editor
            .begin_move(&BTreeSet::from([1]), Point::new(0.0, 0.0))
            .unwrap();
        for step in 1..=50 {
            editor
                .update_gesture(Point::new(step as f64, step as f64 * 2.0))
                .unwrap();
        }
        assert!(!editor.timeline().can_undo());
        assert_eq!(editor.state().node(1).unwrap().pos, Point::new(50.0, 200.0));

        assert_eq!(editor.commit_gesture(), Ok(true));
        assert_eq!(editor.timeline().past().len(), 1);
        assert_eq!(editor.timeline().past()[0], before);

        editor.undo();
        assert_eq!(editor.state(), &before);
    }

    #[test]
    fn test_cancel_restores_without_history() {
        let mut editor = editor_with(create_chain(2));
        let before = editor.state().clone();
        editor
            .begin_move(&BTreeSet::from([1, 2]), Point::default())
            .unwrap();
        editor.update_gesture(Point::new(300.0, 300.0)).unwrap();
        editor.cancel_gesture().unwrap();

        assert_eq!(editor.state(), &before);
        assert!(!editor.timeline().can_undo());
        assert!(editor.gesture().is_none());
    }

    #[test]
    fn test_gesture_without_movement_records_nothing() {
        let mut editor = editor_with(create_chain(1));
        editor
            .begin_move(&BTreeSet::from([1]), Point::new(5.0, 5.0))
            .unwrap();
        editor.update_gesture(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(editor.commit_gesture(), Ok(false));
        assert!(!editor.timeline().can_undo());
    }

    #[test]
    fn test_pinned_nodes_stay_put() {
        let mut state = create_chain(2);
        state.nodes[0].is_pinned = true;
        let mut editor = editor_with(state);

        assert_eq!(
            editor.begin_move(&BTreeSet::from([1]), Point::default()),
            Err(CommandError::NodePinned(1))
        );
        assert_eq!(
            editor.begin_resize(1, ResizeHandle::Right, Point::default()),
            Err(CommandError::NodePinned(1))
        );

        editor
            .begin_move(&BTreeSet::from([1, 2]), Point::default())
            .unwrap();
        assert_eq!(
            editor.gesture().map(|g| g.kind.clone()),
            Some(GestureKind::MoveNodes(vec![2]))
        );
        editor.update_gesture(Point::new(10.0, 0.0)).unwrap();
        assert_eq!(editor.state().node(1).unwrap().pos, Point::new(0.0, 100.0));
        assert_eq!(editor.state().node(2).unwrap().pos, Point::new(10.0, 200.0));
    }

    #[test]
    fn test_resize_snaps_to_grid_and_clamps() {
        let mut editor = editor_with(create_chain(1));
        editor
            .begin_resize(1, ResizeHandle::BottomRight, Point::new(180.0, 80.0))
            .unwrap();
        editor.update_gesture(Point::new(207.0, 64.0)).unwrap();
        assert_eq!(editor.state().node(1).unwrap().size, Size::new(210.0, 60.0));

        editor.update_gesture(Point::new(-400.0, -400.0)).unwrap();
        assert_eq!(editor.state().node(1).unwrap().size, Size::new(100.0, 50.0));
        assert_eq!(editor.commit_gesture(), Ok(true));
    }

    #[test]
    fn test_move_canvas_objects() {
        let state = CoreState {
            canvas_objects: vec![rect("r1", 0.0, 0.0), rect("r2", 50.0, 50.0)],
            ..CoreState::default()
        };
        let mut editor = editor_with(state);
        editor
            .begin_move_objects(&BTreeSet::from(["r2".to_string()]), Point::default())
            .unwrap();
        editor.update_gesture(Point::new(5.0, -5.0)).unwrap();
        editor.commit_gesture().unwrap();

        match editor.state().canvas_object("r2") {
            Some(CanvasObject::Rect(shape)) => assert_eq!(shape.pos, Point::new(55.0, 45.0)),
            other => panic!("unexpected object {:?}", other),
        }
        assert_eq!(editor.timeline().past().len(), 1);
    }

    #[test]
    fn test_commands_wait_for_gesture() {
        let mut editor = editor_with(create_chain(2));
        editor
            .begin_move(&BTreeSet::from([1]), Point::default())
            .unwrap();
        assert_eq!(
            editor.execute(Command::ToggleComplete(1)),
            Err(CommandError::GestureInProgress)
        );
        assert_eq!(
            editor.begin_move(&BTreeSet::from([2]), Point::default()),
            Err(CommandError::GestureInProgress)
        );
        assert!(!editor.undo());
        editor.cancel_gesture().unwrap();
        assert_eq!(editor.commit_gesture(), Err(CommandError::NoGesture));
    }
}

#[cfg(test)]
mod modal_tests {
    use super::*;

    #[test]
    fn test_confirm_delete_selection() {
        let mut editor = editor_with(create_chain(3));
        assert_eq!(
            editor.request_delete_selection(),
            Err(CommandError::EmptySelection)
        );

        editor.select_nodes([2, 3]);
        editor.request_delete_selection().unwrap();
        assert_eq!(
            editor.top_modal(),
            Some(&Modal::ConfirmDeleteSelection(BTreeSet::from([2, 3])))
        );
        editor.confirm().unwrap();
        assert!(editor.modals().is_empty());
        assert_eq!(editor.state().nodes.len(), 1);
    }

    #[test]
    fn test_dismiss_runs_nothing() {
        let mut editor = editor_with(create_scenario());
        editor.open_modal(Modal::ConfirmMarkAllIncomplete);
        assert_eq!(editor.dismiss_modal(), Some(Modal::ConfirmMarkAllIncomplete));
        assert!(editor.state().node(1).unwrap().is_complete);
        assert!(matches!(editor.confirm(), Err(EditorError::NoModal)));
    }

    #[test]
    fn test_form_dialogs_need_submission() {
        let mut editor = editor_with(create_chain(1));
        editor.open_modal(Modal::EditNode(1));
        assert!(matches!(editor.confirm(), Err(EditorError::ModalNeedsInput)));

        let mut node = editor.state().node(1).unwrap().clone();
        node.title = "Edited".to_string();
        editor.submit_node(node).unwrap();
        assert!(editor.modals().is_empty());
        assert_eq!(editor.state().node(1).unwrap().title, "Edited");
    }

    #[test]
    fn test_submit_settings() {
        let mut editor = Editor::default();
        editor.open_modal(Modal::Settings);
        let settings = DocumentSettings {
            autosave_enabled: true,
            ..DocumentSettings::default()
        };
        editor.submit_settings(settings).unwrap();
        assert!(editor.state().settings.autosave_enabled);
        assert!(matches!(
            editor.submit_settings(DocumentSettings::default()),
            Err(EditorError::NoModal)
        ));
    }

    #[test]
    fn test_confirm_import_replaces_document_and_history() {
        let mut editor = editor_with(create_chain(2));
        editor.execute(Command::ToggleComplete(1)).unwrap();

        editor.request_import(SCENARIO_JSON);
        editor.confirm().unwrap();
        assert_eq!(editor.state().settings.canvas_title, "Scenario");
        assert!(!editor.timeline().can_undo());
        assert!(editor.status(3).unwrap().is_condition_met);
    }

    #[test]
    fn test_failed_import_keeps_document() {
        let mut editor = editor_with(create_chain(2));
        editor.request_import("not json");
        assert!(matches!(editor.confirm(), Err(EditorError::Document(_))));
        assert_eq!(editor.state(), &create_chain(2));
        assert_eq!(editor.log().last().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_new_canvas() {
        let mut editor = editor_with(create_chain(2));
        editor.open_modal(Modal::ConfirmNewCanvas);
        editor.confirm().unwrap();
        assert!(editor.state().nodes.is_empty());
        assert!(!editor.timeline().can_undo());
    }
}

#[cfg(test)]
mod export_tests {
    use super::*;

    fn two_flows() -> CoreState {
        let mut state = create_chain(2);
        state.nodes.push(node_with_inputs(3, InputLogic::And, &["in_1"]));
        state.nodes[0].outputs.push(Port::new("out_2", "Other"));
        state.connections.push(wire(1, "out_2", 3, "in_1"));
        state
    }

    #[test]
    fn test_several_end_nodes_ask_first() {
        let mut editor = editor_with(two_flows());
        assert!(editor.request_export().unwrap().is_none());
        assert_eq!(
            editor.top_modal(),
            Some(&Modal::SelectEndNode {
                candidates: vec![2, 3]
            })
        );

        let export = editor.choose_end_node(Some(3)).unwrap();
        assert_eq!(export.node_ids(), vec![1, 3]);
        assert!(editor.modals().is_empty());
    }

    #[test]
    fn test_choosing_all_flows() {
        let mut editor = editor_with(two_flows());
        editor.request_export().unwrap();
        let export = editor.choose_end_node(None).unwrap();
        assert_eq!(export.entries.len(), 3);
    }

    #[test]
    fn test_single_end_node_exports_directly() {
        let mut editor = editor_with(create_chain(3));
        let export = editor.request_export().unwrap().expect("no choice needed");
        assert_eq!(export.node_ids(), vec![1, 2, 3]);
        assert!(editor.modals().is_empty());
    }

    #[test]
    fn test_degraded_export_is_logged_not_failed() {
        let mut editor = editor_with(create_cycle());
        let export = editor.export(None).unwrap();
        assert!(export.degraded.is_some());
        assert!(
            editor
                .log()
                .entries()
                .any(|e| e.level == LogLevel::Error && e.message.contains("cycle"))
        );
        assert!(!editor.timeline().can_undo());
    }

    #[test]
    fn test_export_selection_needs_selection() {
        let mut editor = editor_with(create_chain(3));
        assert!(matches!(
            editor.export_selection(),
            Err(EditorError::Export(ExportError::EmptySelection))
        ));
        editor.select_nodes([3, 1]);
        let export = editor.export_selection().unwrap();
        assert_eq!(export.node_ids(), vec![1, 3]);
    }
}

#[cfg(test)]
mod autosave_tests {
    use super::*;

    #[test]
    fn test_debounced_save_after_change() {
        let t0 = Instant::now();
        let mut editor = editor_with(create_chain(2));
        let mut schedule = editor.autosave_schedule(t0);
        let mut sink = MemorySink::default();

        assert!(!editor.autosave(&mut schedule, &mut sink, t0).unwrap());

        editor.execute(Command::ToggleComplete(1)).unwrap();
        let t1 = t0 + Duration::from_millis(100);
        assert!(!editor.autosave(&mut schedule, &mut sink, t1).unwrap());
        let t2 = t1 + Duration::from_millis(1000);
        assert!(editor.autosave(&mut schedule, &mut sink, t2).unwrap());

        assert_eq!(sink.saved.len(), 1);
        assert!(sink.saved[0].state.node(1).unwrap().is_complete);
        // Saving is not an undoable change.
        assert_eq!(editor.timeline().past().len(), 1);
    }

    #[test]
    fn test_periodic_save_requires_autosave_setting() {
        let t0 = Instant::now();
        let mut editor = editor_with(create_chain(1));
        let mut schedule = editor.autosave_schedule(t0);
        let mut sink = MemorySink::default();
        let later = t0 + Duration::from_secs(301);

        assert!(!editor.autosave(&mut schedule, &mut sink, later).unwrap());

        let settings = DocumentSettings {
            autosave_enabled: true,
            ..editor.state().settings.clone()
        };
        editor.execute(Command::UpdateSettings(settings)).unwrap();
        // Observed now, so only the interval can fire at this instant.
        assert!(editor.autosave(&mut schedule, &mut sink, later).unwrap());
        assert_eq!(sink.saved.len(), 1);
    }
}
