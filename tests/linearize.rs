//! Topological linearizer tests
mod common;
use common::*;
use mindflow::linearize::{ancestors, end_nodes, order_index_sort};
use mindflow::prelude::*;
use std::collections::BTreeSet;

#[test]
fn test_chain_orders_topologically() {
    let state = create_chain(4);
    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .strict()
        .expect("chain is acyclic");
    assert_eq!(order, vec![1, 2, 3, 4]);
}

#[test]
fn test_three_node_cycle_names_every_member() {
    let state = create_cycle();
    let err = Linearizer::new(&state.nodes, &state.connections, TieBreak::Position)
        .strict()
        .unwrap_err();
    assert_eq!(err.unvisited(), &[1, 2, 3]);
}

#[test]
fn test_cycle_reports_only_unplaced_nodes() {
    // 4 -> 1 -> 2 -> 3 -> 1: node 4 is placed before the cycle stalls.
    let mut state = create_cycle();
    state.nodes.push(node_with_inputs(4, InputLogic::And, &[]));
    state.nodes[0].inputs.push(Port::new("in_2", "extra"));
    state.connections.push(wire(4, "out_1", 1, "in_2"));

    let err = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .strict()
        .unwrap_err();
    assert_eq!(err.unvisited(), &[1, 2, 3]);
}

#[test]
fn test_seeds_are_sorted_by_order_index() {
    let mut state = CoreState {
        nodes: vec![
            node_with_inputs(1, InputLogic::And, &[]),
            node_with_inputs(2, InputLogic::And, &[]),
            node_with_inputs(3, InputLogic::And, &[]),
        ],
        ..CoreState::default()
    };
    state.nodes[0].order_index = 30;
    state.nodes[1].order_index = 10;
    state.nodes[2].order_index = 20;

    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .strict()
        .unwrap();
    assert_eq!(order, vec![2, 3, 1]);
}

#[test]
fn test_position_tie_break_is_top_then_left() {
    let mut state = CoreState {
        nodes: vec![
            node_with_inputs(1, InputLogic::And, &[]),
            node_with_inputs(2, InputLogic::And, &[]),
            node_with_inputs(3, InputLogic::And, &[]),
        ],
        ..CoreState::default()
    };
    state.nodes[0].pos = Point::new(50.0, 100.0);
    state.nodes[1].pos = Point::new(300.0, 0.0);
    state.nodes[2].pos = Point::new(10.0, 100.0);

    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::Position)
        .strict()
        .unwrap();
    assert_eq!(order, vec![2, 3, 1]);
}

#[test]
fn test_out_edges_follow_output_port_order() {
    // Node 1 has two outputs; the second is declared first.
    let mut source = node_with_inputs(1, InputLogic::And, &[]);
    source.outputs = vec![Port::new("out_2", "B"), Port::new("out_1", "A")];
    let state = CoreState {
        nodes: vec![
            source,
            node_with_inputs(2, InputLogic::And, &["in_1"]),
            node_with_inputs(3, InputLogic::And, &["in_1"]),
        ],
        connections: vec![wire(1, "out_1", 2, "in_1"), wire(1, "out_2", 3, "in_1")],
        ..CoreState::default()
    };
    // Equal order index keys, so port order decides.
    let mut nodes = state.nodes.clone();
    for n in &mut nodes {
        n.order_index = 0;
    }
    let order = Linearizer::new(&nodes, &state.connections, TieBreak::OrderIndex)
        .strict()
        .unwrap();
    assert_eq!(order, vec![1, 3, 2]);

    // Distinct keys re-sort the released nodes regardless of port order.
    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .strict()
        .unwrap();
    assert_eq!(order, vec![1, 2, 3]);
}

#[test]
fn test_fallback_sorts_every_node_by_order_index() {
    let mut state = create_cycle();
    let mut extra = node_with_inputs(4, InputLogic::And, &[]);
    extra.order_index = 0;
    state.nodes.push(extra);

    // Restricted to the cycle, yet the fallback covers the whole document.
    let result = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .ending_at(3)
        .with_fallback();
    assert!(result.is_degraded());
    assert_eq!(result.order, vec![4, 1, 2, 3]);
}

#[test]
fn test_fallback_is_transparent_without_cycles() {
    let state = create_chain(3);
    let result = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex)
        .with_fallback();
    assert!(!result.is_degraded());
    assert_eq!(result.order, vec![1, 2, 3]);
}

#[test]
fn test_restriction_ignores_outside_edges() {
    let state = create_chain(4);
    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::Position)
        .restrict_to([3, 4])
        .strict()
        .unwrap();
    assert_eq!(order, vec![3, 4]);
}

#[test]
fn test_ancestors_walk_inbound_edges() {
    let state = create_scenario();
    assert_eq!(
        ancestors(3, &state.connections),
        BTreeSet::from([1, 2, 3])
    );
    assert_eq!(ancestors(2, &state.connections), BTreeSet::from([1, 2]));
    assert_eq!(ancestors(1, &state.connections), BTreeSet::from([1]));
}

#[test]
fn test_ancestors_terminate_on_cycles() {
    let state = create_cycle();
    assert_eq!(ancestors(2, &state.connections), BTreeSet::from([1, 2, 3]));
}

#[test]
fn test_end_nodes_have_no_outgoing_edges() {
    let state = create_scenario();
    assert_eq!(end_nodes(&state.nodes, &state.connections), vec![3]);

    let mut branched = create_chain(3);
    branched.nodes.push(node_with_inputs(4, InputLogic::And, &["in_1"]));
    branched.connections.push(wire(2, "out_1", 4, "in_1"));
    assert_eq!(end_nodes(&branched.nodes, &branched.connections), vec![3, 4]);
}

#[test]
fn test_order_index_sort_is_stable() {
    let mut state = create_chain(3);
    for n in &mut state.nodes {
        n.order_index = 5;
    }
    assert_eq!(order_index_sort(&state.nodes), vec![1, 2, 3]);
}
