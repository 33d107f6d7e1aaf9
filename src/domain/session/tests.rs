// Unit tests for the editing session

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn session_with(count: usize) -> EditSession {
    let mut session = EditSession::new();
    for _ in 0..count {
        session.apply(EditCommand::AddNode);
    }
    session
}

fn recorder(session: &mut EditSession) -> Rc<RefCell<Vec<Vec<String>>>> {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&calls);
    session.subscribe(move |names: &[String]| sink.borrow_mut().push(names.to_vec()));
    calls
}

#[test]
fn test_add_node_reports_id() {
    let mut session = EditSession::new();
    assert_eq!(
        session.apply(EditCommand::AddNode),
        CommandOutcome::NodeAdded(NodeId(1))
    );
}

#[test]
fn test_connect_to_missing_node_is_ignored() {
    let mut session = session_with(1);
    let outcome = session.apply(EditCommand::Connect {
        source: NodeId(1),
        target: NodeId(2),
    });
    assert!(outcome.is_ignored());
    assert!(session.graph().edges().is_empty());
}

#[test]
fn test_chain_scenario() {
    let mut session = session_with(3);
    session.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    session.apply(EditCommand::Connect { source: NodeId(2), target: NodeId(3) });
    for (id, file) in [(1, "a.mp4"), (2, "b.mp4"), (3, "c.mp4")] {
        session.apply(EditCommand::BindFile {
            id: NodeId(id),
            path: PathBuf::from(file),
        });
    }

    assert_eq!(session.refresh(), vec!["Sequence 1".to_string()]);
    let sequence = session.sequence("Sequence 1").unwrap().unwrap();
    let files: Vec<_> = sequence
        .playable_files()
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["a.mp4", "b.mp4", "c.mp4"]);
}

#[test]
fn test_delete_selected() {
    let mut session = session_with(2);
    assert!(session.apply(EditCommand::DeleteSelected).is_ignored());

    session.apply(EditCommand::Select(Some(NodeId(2))));
    assert_eq!(session.state().selected, Some(NodeId(2)));
    assert_eq!(session.apply(EditCommand::DeleteSelected), CommandOutcome::Applied);

    assert!(!session.graph().contains(NodeId(2)));
    assert_eq!(session.state().selected, None);
}

#[test]
fn test_select_unknown_node_is_ignored() {
    let mut session = session_with(1);
    assert!(session.apply(EditCommand::Select(Some(NodeId(5)))).is_ignored());
    assert_eq!(session.state().selected, None);
}

#[test]
fn test_disconnect() {
    let mut session = session_with(2);
    session.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    assert_eq!(
        session.apply(EditCommand::Disconnect { source: NodeId(1), target: NodeId(2) }),
        CommandOutcome::Applied
    );
    assert!(session
        .apply(EditCommand::Disconnect { source: NodeId(1), target: NodeId(2) })
        .is_ignored());
}

#[test]
fn test_press_drag_release_moves_node() {
    let mut session = session_with(1);
    // node 1 spans (10, 10) .. (60, 60); grab it 5px inside its corner
    session.apply(EditCommand::Press { at: Position::new(15.0, 15.0) });
    assert_eq!(session.state().selected, Some(NodeId(1)));

    session.apply(EditCommand::DragTo { at: Position::new(105.0, 205.0) });
    session.apply(EditCommand::Release { at: Position::new(105.0, 205.0) });

    assert_eq!(
        session.graph().node(NodeId(1)).unwrap().position,
        Position::new(100.0, 200.0)
    );
    assert_eq!(session.state().drag, None);
}

#[test]
fn test_press_on_empty_canvas_clears_selection() {
    let mut session = session_with(1);
    session.apply(EditCommand::Select(Some(NodeId(1))));
    session.apply(EditCommand::Press { at: Position::new(500.0, 500.0) });
    assert_eq!(session.state().selected, None);
}

#[test]
fn test_link_gesture_between_handles() {
    let mut session = session_with(2);
    // handles sit on the top-right corners: (60, 10) and (120, 10)
    session.apply(EditCommand::Press { at: Position::new(60.0, 10.0) });
    assert!(session.state().pending_link.is_some());
    session.apply(EditCommand::DragTo { at: Position::new(90.0, 40.0) });
    assert_eq!(
        session.state().pending_link.unwrap().cursor,
        Position::new(90.0, 40.0)
    );

    let outcome = session.apply(EditCommand::Release { at: Position::new(121.0, 9.0) });

    assert_eq!(
        outcome,
        CommandOutcome::EdgeAdded(Edge::new(NodeId(1), NodeId(2)))
    );
    assert!(session.state().pending_link.is_none());
}

#[test]
fn test_link_released_on_empty_canvas_is_dropped() {
    let mut session = session_with(2);
    session.apply(EditCommand::Press { at: Position::new(60.0, 10.0) });
    let outcome = session.apply(EditCommand::Release { at: Position::new(300.0, 300.0) });
    assert!(outcome.is_ignored());
    assert!(session.graph().edges().is_empty());
    assert!(session.state().pending_link.is_none());
}

#[test]
fn test_refresh_notifies_only_after_changes() {
    let mut session = session_with(2);
    let calls = recorder(&mut session);

    session.refresh();
    session.refresh();
    assert_eq!(calls.borrow().len(), 1);

    session.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    let names = session.refresh();
    assert_eq!(names, vec!["Sequence 1".to_string()]);
    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(calls.borrow()[1], names);
}

#[test]
fn test_load_resets_state_and_notifies() {
    let mut source = session_with(3);
    source.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    source.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(9) });
    let mut document = source.to_document();
    document.connections.push((2, 42));

    let mut session = session_with(1);
    session.apply(EditCommand::Select(Some(NodeId(1))));
    let calls = recorder(&mut session);

    let report = session.load(&document);

    assert_eq!(report.dropped_edges, 1);
    assert_eq!(session.state(), &EditorState::default());
    assert_eq!(session.graph().len(), 3);
    assert_eq!(
        calls.borrow().as_slice(),
        &[vec!["Sequence 1".to_string(), "Sequence 2".to_string()]]
    );
}

#[test]
fn test_cycle_yields_no_sequences() {
    let mut session = session_with(2);
    session.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    session.apply(EditCommand::Connect { source: NodeId(2), target: NodeId(1) });

    assert!(session.refresh().is_empty());
    assert!(matches!(
        session.sequences(),
        Err(RouteError::CycleDetected { .. })
    ));
}

#[test]
fn test_refresh_after_read_still_notifies() {
    let mut session = session_with(2);
    let calls = recorder(&mut session);
    session.refresh();

    session.apply(EditCommand::Connect { source: NodeId(1), target: NodeId(2) });
    assert_eq!(session.sequences().unwrap().len(), 1);
    let names = session.refresh();

    assert_eq!(names, vec!["Sequence 1".to_string()]);
    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(calls.borrow()[1], names);
}

#[test]
fn test_layout_edits_do_not_notify() {
    let mut session = session_with(2);
    let calls = recorder(&mut session);
    session.refresh();

    session.apply(EditCommand::MoveNode {
        id: NodeId(1),
        position: Position::new(300.0, 300.0),
    });
    session.apply(EditCommand::SetAlias {
        id: NodeId(2),
        alias: "Outro".to_string(),
    });
    session.refresh();

    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_cancel_link() {
    let mut session = session_with(2);
    assert!(session.apply(EditCommand::CancelLink).is_ignored());

    session.apply(EditCommand::Press { at: Position::new(60.0, 10.0) });
    assert!(session.state().pending_link.is_some());
    assert_eq!(session.apply(EditCommand::CancelLink), CommandOutcome::Applied);
    assert!(session.state().pending_link.is_none());

    // releasing over a handle afterwards no longer links
    session.apply(EditCommand::Release { at: Position::new(120.0, 10.0) });
    assert!(session.graph().edges().is_empty());
}
