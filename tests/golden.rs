//! Golden tests for the mind map kernel.
//!
//! These tests drive whole sessions through the public handle and verify the
//! projection the renderer would receive after each gesture.

use std::time::Duration;

use mindmap_kernel::{
    canonical_hash_hex, LayoutDirection, MindMap, MindMapConfig, MindMapHandle, Mode, NodeId,
    NoticeLevel, SeedNode, SessionError, SimulatedSaveBackend, ToggleOutcome,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn id(s: &str) -> NodeId {
    NodeId::from(s)
}

fn build_chain() -> MindMapHandle {
    // root → A → B
    let seed = SeedNode::branch(
        "root",
        "Root",
        vec![SeedNode::branch("A", "A", vec![SeedNode::leaf("B", "B")])],
    );
    MindMapHandle::new(MindMap::new(&seed, MindMapConfig::default()).unwrap())
}

fn build_nested() -> MindMapHandle {
    //      root
    //       |
    //       A
    //      / \
    //     B   C
    //     |
    //     D
    let seed = SeedNode::branch(
        "root",
        "Root",
        vec![SeedNode::branch(
            "A",
            "A",
            vec![
                SeedNode::branch("B", "B", vec![SeedNode::leaf("D", "D")]),
                SeedNode::leaf("C", "C"),
            ],
        )],
    );
    MindMapHandle::new(MindMap::new(&seed, MindMapConfig::default()).unwrap())
}

fn visible_ids(handle: &MindMapHandle) -> Vec<String> {
    handle
        .view()
        .nodes
        .iter()
        .map(|n| n.id().to_string())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Collapse / Expand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_collapse_then_expand_chain() {
    let handle = build_chain();

    handle.on_toggle_collapse("A");
    let view = handle.view();
    assert_eq!(visible_ids(&handle), vec!["root", "A"]);
    assert!(view.edges.iter().all(|e| e.source != "B" && e.target != "B"));
    assert_eq!(view.edges.len(), 1);
    assert!(view.node(&id("A")).unwrap().is_collapsed);
    assert_eq!(view.node(&id("A")).unwrap().children_count, 1);

    handle.on_toggle_collapse("A");
    let view = handle.view();
    assert_eq!(view.nodes.len(), 3);
    assert_eq!(view.edges.len(), 2);
    assert!(!view.node(&id("A")).unwrap().is_collapsed);
}

#[test]
fn test_expand_reveals_one_level_only() {
    let handle = build_nested();

    // Collapse B first, then its ancestor A.
    handle.on_toggle_collapse("B");
    handle.on_toggle_collapse("A");
    assert_eq!(visible_ids(&handle), vec!["root", "A"]);

    // Expanding A shows B and C; D stays hidden and B reads as collapsed.
    let outcome = handle
        .view()
        .node(&id("A"))
        .and_then(|n| n.actions.clone())
        .unwrap()
        .toggle_collapse();
    assert_eq!(
        outcome,
        ToggleOutcome::Expanded {
            revealed: 2
        }
    );
    assert_eq!(visible_ids(&handle), vec!["root", "A", "B", "C"]);
    assert!(handle.view().node(&id("B")).unwrap().is_collapsed);
}

#[test]
fn test_collapse_after_full_expand_hides_whole_subtree() {
    let handle = build_nested();
    handle.on_toggle_collapse("A");
    assert_eq!(handle.lock().hidden().len(), 3);
    handle.on_toggle_collapse("A");
    assert_eq!(handle.lock().hidden().len(), 1);
    assert!(handle.lock().hidden().contains(&id("D")));
}

#[test]
fn test_toggle_on_leaf_is_noop() {
    let handle = build_chain();
    let before = handle.view();
    handle.on_toggle_collapse("B");
    assert_eq!(handle.view(), before);
    assert!(!before.node(&id("B")).unwrap().is_collapsed);
}

// ─────────────────────────────────────────────────────────────────────────────
// Add / Rename / Delete
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_add_child_placeholder_and_rename() {
    let handle = build_chain();
    handle.enter_edit();

    handle.on_add_node("A");
    let map = handle.lock();
    assert_eq!(map.store().num_nodes(), 4);
    assert_eq!(map.store().num_edges(), 3);

    let new_id = map.rename_target().cloned().unwrap();
    let new_node = map.view().node(&new_id).unwrap();
    assert_eq!(new_node.node.label, "New Topic");
    assert!(new_node.editing);
    assert!(map.store().edges().iter().any(|e| e.source == "A" && e.target == new_id));
    drop(map);

    // An empty rename leaves the placeholder in place.
    handle.on_label_change(new_id.as_str(), "");
    assert_eq!(
        handle.lock().store().get_node(&new_id).unwrap().label,
        "New Topic"
    );

    handle.on_label_change(new_id.as_str(), "  Groceries ");
    assert_eq!(
        handle.lock().store().get_node(&new_id).unwrap().label,
        "Groceries"
    );
}

#[test]
fn test_added_child_sits_beside_parent() {
    let handle = build_chain();
    handle.on_add_node("B");
    let map = handle.lock();
    let parent = map.store().get_node(&id("B")).unwrap().position;
    let new_id = map.rename_target().cloned().unwrap();
    let child = map.store().get_node(&new_id).unwrap().position;
    assert_eq!(child.x, parent.x + 200.0);
    assert_eq!(child.y, parent.y);
}

#[test]
fn test_delete_subtree_leaves_root() {
    let handle = build_chain();
    handle.on_toggle_collapse("A");
    handle.on_delete_node("A");

    let map = handle.lock();
    assert_eq!(map.store().num_nodes(), 1);
    assert_eq!(map.store().num_edges(), 0);
    assert!(map.hidden().is_empty());
    assert_eq!(map.view().node_ids(), vec![&NodeId::root()]);
    assert_eq!(map.view().node(&NodeId::root()).unwrap().children_count, 0);
}

#[test]
fn test_root_deletion_refused_with_notice() {
    let handle = build_nested();
    let before = handle.lock().store().clone();

    handle.on_delete_node("root");

    assert_eq!(*handle.lock().store(), before);
    let notices = handle.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
}

#[test]
fn test_unknown_ids_are_silent() {
    let handle = build_chain();
    let before = handle.view();
    handle.on_add_node("missing");
    handle.on_delete_node("missing");
    handle.on_toggle_collapse("missing");
    handle.on_label_change("missing", "x");
    assert_eq!(handle.view(), before);
    assert!(handle.take_notices().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode and Save
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_save_success_reflows_and_returns_to_view() {
    let handle = build_chain();
    let backend = SimulatedSaveBackend::new(Duration::from_millis(500));

    handle.set_mode("edit").unwrap();
    handle.on_add_node("root");
    let new_id = handle.lock().rename_target().cloned().unwrap();
    let placed = handle.lock().store().get_node(&new_id).unwrap().position;

    let receipt = handle.save(&backend).await.unwrap();

    assert_eq!(handle.mode(), Mode::View);
    assert_eq!(receipt.node_count, 4);
    assert_eq!(receipt.edge_count, 3);
    assert_eq!(backend.save_count(), 1);
    assert_eq!(
        receipt.fingerprint,
        canonical_hash_hex(&backend.saved_payloads()[0])
    );

    // Layout moved the new child off its placement offset.
    let laid_out = handle.lock().store().get_node(&new_id).unwrap().position;
    assert_ne!(laid_out, placed);
    assert!(handle.view().nodes.iter().all(|n| n.mode == Mode::View && !n.editing));
}

#[tokio::test]
async fn test_save_failure_keeps_edits_and_mode() {
    let handle = build_chain();
    let backend = SimulatedSaveBackend::failing(Duration::ZERO, "server unreachable");

    handle.enter_edit();
    handle.on_add_node("A");

    let err = handle.save(&backend).await.unwrap_err();

    assert!(matches!(err, SessionError::Save(_)));
    assert_eq!(handle.mode(), Mode::Edit);
    assert_eq!(handle.lock().store().num_nodes(), 4);
    let notices = handle.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].message.contains("server unreachable"));
}

#[tokio::test]
async fn test_save_requires_edit_mode() {
    let handle = build_chain();
    let backend = SimulatedSaveBackend::new(Duration::ZERO);
    assert!(matches!(
        handle.save(&backend).await,
        Err(SessionError::NotEditing)
    ));
    assert_eq!(backend.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_save_refused() {
    let handle = build_chain();
    handle.enter_edit();
    let backend = SimulatedSaveBackend::new(Duration::from_millis(500));

    let (first, second) = tokio::join!(handle.save(&backend), async {
        tokio::task::yield_now().await;
        handle.save(&backend).await
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(SessionError::SaveInProgress)));
    assert_eq!(backend.save_count(), 1);
}

#[test]
fn test_cancel_edit_skips_layout() {
    let handle = build_chain();
    handle.enter_edit();
    handle.on_add_node("A");
    let before = handle.lock().store().clone();

    handle.cancel_edit().unwrap();

    assert_eq!(handle.mode(), Mode::View);
    assert_eq!(*handle.lock().store(), before);
}

// ─────────────────────────────────────────────────────────────────────────────
// Seed and Layout
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sample_seed_starts_fully_visible() {
    let handle = MindMapHandle::new(MindMap::new(&SeedNode::sample(), MindMapConfig::default()).unwrap());
    let view = handle.view();
    assert_eq!(view.nodes.len(), 17);
    assert_eq!(view.edges.len(), 16);
    assert_eq!(view.node(&NodeId::root()).unwrap().children_count, 16);
}

#[test]
fn test_top_bottom_layout_flows_down() {
    let mut config = MindMapConfig::default();
    config.layout.direction = LayoutDirection::TopBottom;
    let seed = SeedNode::branch("root", "Root", vec![SeedNode::leaf("A", "A")]);
    let map = MindMap::new(&seed, config).unwrap();

    let root = map.store().get_node(&NodeId::root()).unwrap();
    let child = map.store().get_node(&id("A")).unwrap();
    assert_eq!(root.position.x, child.position.x);
    assert!(child.position.y > root.position.y);
    assert_eq!(child.parent_link_side, mindmap_kernel::Side::Top);
    assert_eq!(child.child_link_side, mindmap_kernel::Side::Bottom);
}

#[test]
fn test_edge_ids_unique_with_dashed_node_ids() {
    // root → {a → b-c, a-b → c}
    let seed = SeedNode::branch(
        "root",
        "Root",
        vec![
            SeedNode::branch("a", "A", vec![SeedNode::leaf("b-c", "BC")]),
            SeedNode::branch("a-b", "AB", vec![SeedNode::leaf("c", "C")]),
        ],
    );
    let handle = MindMapHandle::new(MindMap::new(&seed, MindMapConfig::default()).unwrap());
    handle.on_add_node("a-b");
    handle.on_add_node("b-c");

    let map = handle.lock();
    let ids: std::collections::HashSet<&str> =
        map.store().edges().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(map.store().num_edges(), 6);
    assert_eq!(ids.len(), 6);
}

#[test]
fn test_invalid_seed_rejected() {
    let seed = SeedNode::branch("top", "Top", vec![]);
    assert!(matches!(
        MindMap::new(&seed, MindMapConfig::default()),
        Err(SessionError::Seed(_))
    ));
}

#[test]
fn test_projection_is_deterministic_across_sessions() {
    let a = build_nested();
    let b = build_nested();
    a.on_toggle_collapse("B");
    b.on_toggle_collapse("B");
    assert_eq!(
        serde_json::to_value(a.view()).unwrap(),
        serde_json::to_value(b.view()).unwrap()
    );
}
