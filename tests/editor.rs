//! Graph mutation API tests: node lifecycle, switch branches, config edits,
//! selection, drag and drop.
mod common;
use common::*;
use flowcanvas::prelude::*;
use flowcanvas::templates::TemplateRegistry;
use serde_json::json;

#[cfg(test)]
mod nodes {
    use super::*;

    #[test]
    fn new_nodes_get_fresh_ids_labels_and_private_config() {
        let mut editor = editor();
        let a = editor
            .add_node(NodeType::Http, Position::new(0.0, 0.0), None)
            .unwrap();
        let b = editor
            .add_node(NodeType::Http, Position::new(0.0, 200.0), None)
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 32);
        assert_eq!(a.label.as_deref(), Some("HTTP"));
        assert_eq!(a.config["method"], json!("GET"));

        let patch = json!({ "url": "https://a.example" });
        editor
            .update_config(&a.id, patch.as_object().unwrap().clone())
            .unwrap();
        assert_eq!(editor.node(&b.id).unwrap().config["url"], json!(""));
    }

    #[test]
    fn second_root_start_is_rejected_with_a_blocking_notice() {
        let mut editor = editor();
        editor
            .add_node(NodeType::Start, Position::new(0.0, 0.0), None)
            .unwrap();
        let err = editor
            .add_node(NodeType::Start, Position::new(100.0, 0.0), None)
            .unwrap_err();

        assert!(matches!(err, EditorError::DuplicateStart));
        assert_eq!(editor.store().root_count(NodeType::Start), 1);
        assert_eq!(editor.store().nodes().len(), 1);
        let notice = editor.notices().current().unwrap();
        assert_eq!(notice.kind, NoticeKind::Blocking);

        editor.dismiss_notice();
        assert!(editor.notices().current().is_none());
    }

    #[test]
    fn second_root_end_is_rejected() {
        let mut editor = editor();
        editor
            .add_node(NodeType::End, Position::new(0.0, 0.0), None)
            .unwrap();
        let err = editor
            .add_node(NodeType::End, Position::new(0.0, 90.0), None)
            .unwrap_err();
        assert!(matches!(err, EditorError::DuplicateEnd));
    }

    #[test]
    fn adding_into_a_non_loop_fails() {
        let mut editor = editor();
        let http = editor
            .add_node(NodeType::Http, Position::new(0.0, 0.0), None)
            .unwrap();
        let err = editor
            .add_node(NodeType::Sql, Position::new(0.0, 0.0), Some(http.id.as_str()))
            .unwrap_err();
        assert!(matches!(err, EditorError::NotAContainer { .. }));

        let err = editor
            .add_node(NodeType::Sql, Position::new(0.0, 0.0), Some("missing"))
            .unwrap_err();
        assert!(matches!(err, EditorError::NodeNotFound { .. }));
    }

    #[test]
    fn removing_a_loop_cascades_to_descendants_and_edges() {
        let (mut editor, outer) = editor_with_loop();
        editor.resize_container(&outer, Size::new(900.0, 600.0)).unwrap();
        let inner = add_child(&mut editor, &outer, NodeType::Loop, Position::new(40.0, 60.0));
        let leaf = add_child(&mut editor, &inner, NodeType::Http, Position::new(40.0, 60.0));
        let start = editor.store().nodes()[0].id.clone();
        editor.connect(Connection::new(&start, &outer)).unwrap();
        editor
            .connect(Connection::new(&inner, &leaf).from_handle(ENTRY_HANDLE))
            .unwrap();
        editor.set_selected_node(Some(leaf.clone()));

        let removed = editor.remove_node(&outer).unwrap();

        assert_eq!(removed.len(), 3);
        for id in [&outer, &inner, &leaf] {
            assert!(!editor.store().contains(id));
        }
        assert!(editor.store().edges().is_empty());
        assert!(editor.selection().node.is_none());
    }

    #[test]
    fn non_finite_positions_are_refused() {
        let (mut editor, lp) = editor_with_loop();
        let http = editor
            .add_node(NodeType::Http, Position::new(0.0, 300.0), None)
            .unwrap()
            .id;
        let child = add_child(&mut editor, &lp, NodeType::Sql, Position::new(40.0, 60.0));

        assert!(matches!(
            editor.add_node(NodeType::Http, Position::new(f64::NAN, 0.0), None),
            Err(EditorError::NonFinitePosition { .. })
        ));
        assert!(matches!(
            editor.move_node(&http, Position::new(f64::NAN, 1.0)),
            Err(EditorError::NonFinitePosition { .. })
        ));
        assert!(matches!(
            editor.move_node(&child, Position::new(0.0, f64::INFINITY)),
            Err(EditorError::NonFinitePosition { .. })
        ));
        let other = editor
            .add_node(NodeType::Loop, Position::new(0.0, 600.0), None)
            .unwrap()
            .id;
        assert!(matches!(
            editor.reparent(&child, &other, Position::new(f64::NEG_INFINITY, 0.0)),
            Err(EditorError::NonFinitePosition { .. })
        ));

        assert_eq!(editor.node(&http).unwrap().position, Position::new(0.0, 300.0));
        assert_eq!(editor.node(&child).unwrap().parent_id.as_deref(), Some(lp.as_str()));
        let json = editor.export_json().unwrap();
        let mut reloaded = GraphEditor::new();
        reloaded.load_json(&json).unwrap();
        assert_eq!(reloaded.store().nodes().len(), 6);
    }

    #[test]
    fn removing_an_unknown_node_fails() {
        let mut editor = editor();
        assert!(matches!(
            editor.remove_node("nope"),
            Err(EditorError::NodeNotFound { .. })
        ));
    }
}

#[cfg(test)]
mod switch_cases {
    use super::*;

    #[test]
    fn removing_a_case_drops_only_its_edges() {
        let mut editor = editor();
        let switch = editor
            .add_node(NodeType::Switch, Position::new(0.0, 0.0), None)
            .unwrap()
            .id;
        for _ in 0..3 {
            editor.add_case(&switch).unwrap();
        }
        let targets: Vec<String> = (0..4)
            .map(|i| {
                editor
                    .add_node(NodeType::Http, Position::new(400.0, i as f64 * 100.0), None)
                    .unwrap()
                    .id
            })
            .collect();
        editor
            .connect(Connection::new(&switch, &targets[0]).from_handle(case_handle(0)))
            .unwrap();
        editor
            .connect(Connection::new(&switch, &targets[1]).from_handle(case_handle(1)))
            .unwrap();
        editor
            .connect(Connection::new(&switch, &targets[2]).from_handle(case_handle(1)))
            .unwrap();
        editor
            .connect(Connection::new(&switch, &targets[3]).from_handle(DEFAULT_BRANCH_HANDLE))
            .unwrap();

        let dropped = editor.remove_case(&switch, 1).unwrap();

        assert_eq!(dropped, 2);
        assert_eq!(editor.node(&switch).unwrap().case_count(), 2);
        let handles: Vec<Option<&str>> = editor
            .store()
            .edges()
            .iter()
            .map(|e| e.source_handle.as_deref())
            .collect();
        assert_eq!(handles, vec![Some("case-0"), Some("default")]);
    }

    #[test]
    fn case_edits_validate_their_target() {
        let mut editor = editor();
        let http = editor
            .add_node(NodeType::Http, Position::new(0.0, 0.0), None)
            .unwrap()
            .id;
        assert!(matches!(editor.add_case(&http), Err(EditorError::NotASwitch { .. })));

        let switch = editor
            .add_node(NodeType::Switch, Position::new(0.0, 200.0), None)
            .unwrap()
            .id;
        assert!(matches!(
            editor.remove_case(&switch, 0),
            Err(EditorError::CaseOutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn new_cases_are_numbered() {
        let mut editor = editor();
        let switch = editor
            .add_node(NodeType::Switch, Position::new(0.0, 0.0), None)
            .unwrap()
            .id;
        editor.add_case(&switch).unwrap();
        editor.add_case(&switch).unwrap();

        let cases = &editor.node(&switch).unwrap().config["cases"];
        assert_eq!(cases[1], json!({ "name": "case2", "condition": "", "target": "" }));
    }
}

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn patch_strips_identity_keys_and_derived_subflow_fields() {
        let (mut editor, lp) = editor_with_loop();
        let child = add_child(&mut editor, &lp, NodeType::Http, Position::new(40.0, 60.0));
        let patch = json!({
            "nodeType": "HTTP",
            "nodeId": "forged",
            "maxIterations": 5,
            "subflow": { "nodes": [], "edges": [] }
        });

        editor
            .update_config(&lp, patch.as_object().unwrap().clone())
            .unwrap();

        let node = editor.node(&lp).unwrap();
        assert!(node.config.get("nodeType").is_none());
        assert!(node.config.get("nodeId").is_none());
        assert_eq!(node.config["maxIterations"], json!(5));
        assert_eq!(mirrored_node_ids(&editor, &lp), vec![child]);
    }

    #[test]
    fn subflow_size_patch_goes_through_resize() {
        let (mut editor, lp) = editor_with_loop();
        let patch = json!({ "subflow": { "width": 100, "height": 700 } });
        editor
            .update_config(&lp, patch.as_object().unwrap().clone())
            .unwrap();

        assert_eq!(
            editor.node(&lp).unwrap().subflow().size(),
            Size::new(320.0, 700.0)
        );
    }

    #[test]
    fn panel_reports_missing_templates() {
        let registry = TemplateRegistry::builtin().without_template(NodeType::Redis);
        let mut editor = GraphEditor::builder()
            .with_config_provider(Box::new(registry))
            .build();
        let redis = editor
            .add_node(NodeType::Redis, Position::new(0.0, 0.0), None)
            .unwrap();
        let http = editor
            .add_node(NodeType::Http, Position::new(0.0, 100.0), None)
            .unwrap();

        assert!(redis.config.is_empty());
        assert_eq!(
            editor.panel_for(&redis.id).unwrap(),
            PanelState::ConfigurationMissing {
                node_id: redis.id.clone(),
                node_type: NodeType::Redis,
            }
        );
        match editor.panel_for(&http.id).unwrap() {
            PanelState::Ready { doc_path, config, .. } => {
                assert_eq!(doc_path, "docs/http_node.md");
                assert_eq!(config["method"], json!("GET"));
            }
            other => panic!("unexpected panel {other:?}"),
        }
    }
}

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn pane_click_clears_everything() {
        let mut editor = editor();
        let a = editor
            .add_node(NodeType::Http, Position::new(0.0, 0.0), None)
            .unwrap();
        editor.set_selected_node(Some(a.id.clone()));
        editor.set_selected_edges(["e1".to_string(), "e2".to_string()]);
        assert_eq!(editor.selected_node().map(|n| n.id.as_str()), Some(a.id.as_str()));

        editor.pane_click();
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn removed_edges_leave_the_selection() {
        let mut editor = editor();
        let a = editor
            .add_node(NodeType::Http, Position::new(0.0, 0.0), None)
            .unwrap();
        let b = editor
            .add_node(NodeType::Sql, Position::new(0.0, 100.0), None)
            .unwrap();
        let edge = editor.connect(Connection::new(&a.id, &b.id)).unwrap();
        editor.set_selected_edges([edge.id.clone()]);

        let removed = editor.remove_edge(&edge.id).unwrap();
        assert_eq!(removed, Some(edge));
        assert!(editor.selection().edges.is_empty());
        assert_eq!(editor.remove_edge("gone").unwrap(), None);
    }
}

#[cfg(test)]
mod drag_and_drop {
    use super::*;

    #[test]
    fn drop_inside_a_loop_lands_clamped_and_selected() {
        let (mut editor, lp) = editor_with_loop();
        // Loop sits at the origin; its interior spans x 12..308, y 34..188.
        let outcome = editor
            .handle_drop(DropEvent::new(1, NodeType::Http, Position::new(300.0, 180.0)))
            .unwrap();

        let DropOutcome::Added(node) = outcome else {
            panic!("expected a node, got {outcome:?}");
        };
        assert_eq!(node.parent_id.as_deref(), Some(lp.as_str()));
        assert_eq!(node.position, Position::new(46.0, 98.0));
        assert_eq!(editor.selection().node.as_deref(), Some(node.id.as_str()));
        assert_eq!(mirrored_node_ids(&editor, &lp), vec![node.id]);
    }

    #[test]
    fn each_drop_event_is_handled_once() {
        let (mut editor, _) = editor_with_loop();
        let event = DropEvent::new(7, NodeType::Sql, Position::new(100.0, 100.0));
        assert!(matches!(
            editor.handle_drop(event.clone()).unwrap(),
            DropOutcome::Added(_)
        ));
        assert_eq!(
            editor.handle_drop(event).unwrap(),
            DropOutcome::AlreadyClaimed
        );
        assert_eq!(editor.store().nodes().len(), 4);
    }

    #[test]
    fn repeated_drop_on_the_same_spot_is_ignored() {
        let (mut editor, lp) = editor_with_loop();
        editor
            .handle_drop(DropEvent::new(1, NodeType::Http, Position::new(60.0, 100.0)))
            .unwrap();
        let second = editor
            .handle_drop(DropEvent::new(2, NodeType::Http, Position::new(65.0, 104.0)))
            .unwrap();
        let other_type = editor
            .handle_drop(DropEvent::new(3, NodeType::Script, Position::new(65.0, 104.0)))
            .unwrap();

        assert_eq!(second, DropOutcome::Duplicate);
        assert!(matches!(other_type, DropOutcome::Added(_)));
        assert_eq!(editor.store().children_of(&lp).count(), 2);
    }

    #[test]
    fn drops_exactly_the_tolerance_apart_are_distinct() {
        let (mut editor, lp) = editor_with_loop();
        editor.resize_container(&lp, Size::new(900.0, 600.0)).unwrap();
        editor
            .handle_drop(DropEvent::new(1, NodeType::Http, Position::new(100.0, 150.0)))
            .unwrap();

        let apart = editor
            .handle_drop(DropEvent::new(2, NodeType::Http, Position::new(110.0, 150.0)))
            .unwrap();
        let close = editor
            .handle_drop(DropEvent::new(3, NodeType::Http, Position::new(109.5, 150.0)))
            .unwrap();

        assert!(matches!(apart, DropOutcome::Added(_)));
        assert_eq!(close, DropOutcome::Duplicate);
        assert_eq!(editor.store().children_of(&lp).count(), 2);
    }

    #[test]
    fn drop_outside_every_loop_lands_at_root() {
        let (mut editor, _) = editor_with_loop();
        let outcome = editor
            .handle_drop(DropEvent::new(1, NodeType::Redis, Position::new(1000.0, 1000.0)))
            .unwrap();
        let DropOutcome::Added(node) = outcome else {
            panic!("expected a node");
        };
        assert!(node.is_root());
        assert_eq!(node.position, Position::new(1000.0, 1000.0));
    }

    #[test]
    fn drop_targets_the_deepest_loop() {
        let (mut editor, outer) = editor_with_loop();
        editor.resize_container(&outer, Size::new(900.0, 600.0)).unwrap();
        let inner = add_child(&mut editor, &outer, NodeType::Loop, Position::new(40.0, 60.0));

        // Inner loop's absolute origin is (40, 60); its interior starts at y 94.
        let outcome = editor
            .handle_drop(DropEvent::new(1, NodeType::Http, Position::new(100.0, 120.0)))
            .unwrap();
        let DropOutcome::Added(node) = outcome else {
            panic!("expected a node");
        };
        assert_eq!(node.parent_id.as_deref(), Some(inner.as_str()));
    }

    #[test]
    fn drag_is_clamped_and_settles_in_place() {
        let (mut editor, lp) = editor_with_loop();
        let child = add_child(&mut editor, &lp, NodeType::Http, Position::new(40.0, 60.0));

        editor.begin_drag(&child).unwrap();
        let live = editor.drag_to(Position::new(-100.0, 500.0)).unwrap();
        assert_eq!(live, Some(Position::new(30.0, 98.0)));

        let outcome = editor.end_drag(Position::new(5000.0, 5000.0)).unwrap();
        assert_eq!(
            outcome,
            DragOutcome::Settled {
                node_id: child,
                position: Position::new(30.0, 98.0),
            }
        );
        assert_eq!(editor.drag_state(), &flowcanvas::editor::DragState::Idle);
        assert_eq!(editor.drag_to(Position::new(0.0, 0.0)).unwrap(), None);
    }

    #[test]
    fn releasing_over_another_loop_reparents() {
        let (mut editor, first) = editor_with_loop();
        let second = editor
            .add_node(NodeType::Loop, Position::new(0.0, 400.0), None)
            .unwrap()
            .id;
        let child = add_child(&mut editor, &first, NodeType::Http, Position::new(40.0, 60.0));

        editor.begin_drag(&child).unwrap();
        let outcome = editor.end_drag(Position::new(50.0, 480.0)).unwrap();

        match outcome {
            DragOutcome::Reparented { container_id, position, .. } => {
                assert_eq!(container_id, second);
                // Absolute (40, 60) is (40, -340) in the second loop, clamped.
                assert_eq!(position, Position::new(40.0, 44.0));
            }
            other => panic!("expected reparent, got {other:?}"),
        }
        assert!(mirrored_node_ids(&editor, &first).is_empty());
        assert_eq!(mirrored_node_ids(&editor, &second), vec![child]);
    }

    #[test]
    fn reparenting_on_release_keeps_the_grab_offset() {
        let (mut editor, lp) = editor_with_loop();
        editor.resize_container(&lp, Size::new(900.0, 600.0)).unwrap();
        let http = editor
            .add_node(NodeType::Http, Position::new(60.0, 100.0), None)
            .unwrap()
            .id;

        editor.begin_drag(&http).unwrap();
        // The pointer grabbed the node 90 px right of its top-left corner.
        let outcome = editor.end_drag(Position::new(150.0, 120.0)).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Reparented {
                node_id: http.clone(),
                container_id: lp.clone(),
                position: Position::new(60.0, 100.0),
            }
        );
        assert_eq!(editor.node(&http).unwrap().parent_id.as_deref(), Some(lp.as_str()));
    }

    #[test]
    fn a_loop_cannot_be_moved_into_itself_or_its_descendants() {
        let (mut editor, outer) = editor_with_loop();
        editor.resize_container(&outer, Size::new(900.0, 600.0)).unwrap();
        let inner = add_child(&mut editor, &outer, NodeType::Loop, Position::new(40.0, 60.0));

        for target in [&outer, &inner] {
            let err = editor
                .reparent(&outer, target, Position::new(100.0, 100.0))
                .unwrap_err();
            assert!(matches!(err, EditorError::InvalidReparent { .. }));
        }
    }

    #[test]
    fn reparenting_keeps_edges_but_reports_them_stale() {
        let (mut editor, first) = editor_with_loop();
        let second = editor
            .add_node(NodeType::Loop, Position::new(0.0, 400.0), None)
            .unwrap()
            .id;
        let a = add_child(&mut editor, &first, NodeType::Http, Position::new(40.0, 60.0));
        let b = add_child(&mut editor, &first, NodeType::Sql, Position::new(40.0, 60.0));
        let edge = editor.connect(Connection::new(&a, &b)).unwrap();

        editor.reparent(&b, &second, Position::new(50.0, 480.0)).unwrap();

        assert!(editor.store().edge(&edge.id).is_some());
        let stale: Vec<&str> = editor.stale_edges().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(stale, vec![edge.id.as_str()]);
        assert!(mirrored_routes(&editor, &first).is_empty());
    }
}

#[cfg(test)]
mod workspace {
    use super::*;

    #[test]
    fn clear_empties_the_canvas() {
        let (mut editor, lp) = editor_with_loop();
        editor.set_selected_node(Some(lp.clone()));
        editor.begin_drag(&lp).unwrap();

        editor.clear();

        assert!(editor.store().nodes().is_empty());
        assert!(editor.selection().is_empty());
        assert_eq!(editor.drag_state(), &flowcanvas::editor::DragState::Idle);
        editor
            .add_node(NodeType::Start, Position::new(0.0, 0.0), None)
            .unwrap();
    }

    #[test]
    fn builder_sets_the_workflow_name() {
        let editor = GraphEditor::builder().with_name("Billing").build();
        assert_eq!(editor.export().name, "Billing");
        assert_eq!(GraphEditor::new().name(), "New workflow");
        assert_eq!(GraphEditor::new().version(), 1);
    }
}
