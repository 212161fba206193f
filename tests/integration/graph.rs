//! Graph integration tests
//!
//! Graph editing through the engine and graph descriptions exchanged with
//! the editor UI.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_abs_diff_eq;
use montage::core::GraphError;
use montage::prelude::*;

const TRIM_FLOW: &str = r#"{
    "nodes": [
        {"id": "1", "kind": "input", "parameters": {"label": "voice.wav"}},
        {"id": "2", "kind": "trim", "parameters": {"start": "00:00:00", "duration": "0.5"}},
        {"id": "3", "kind": "effect", "parameters": {"effect": "fadeOut", "fadeDuration": 0.25}},
        {"id": "4", "kind": "output"}
    ],
    "edges": [
        {"source": "1", "target": "2"},
        {"source": "2", "target": "3"},
        {"source": "3", "target": "4"}
    ]
}"#;

/// A loaded description runs like a hand-built graph.
#[tokio::test]
async fn test_description_runs() {
    let engine = test_engine();
    engine.load_description_json(TRIM_FLOW).unwrap();
    engine
        .update_node_parameter(&"1".into(), FILE_KEY, dc_wav(1.0, 2.0, 8000))
        .unwrap();

    let output = engine.run_pipeline().await.unwrap();
    assert_eq!(output.output, NodeId::from("4"));

    let samples = output.buffer.channel(0).unwrap();
    assert_eq!(samples.len(), 4000);
    assert_eq!(samples[0], 1.0);
    assert_eq!(samples[3999], 0.0);
    assert_abs_diff_eq!(samples[3999 - 1000], 0.5, epsilon = DSP_EPSILON);
}

/// Descriptions report attached audio but never carry it.
#[test]
fn test_description_reports_audio() {
    let engine = test_engine();
    engine.load_description_json(TRIM_FLOW).unwrap();
    engine
        .update_node_parameter(&"1".into(), FILE_KEY, dc_wav(1.0, 0.1, 8000))
        .unwrap();

    let description = engine.graph_description();
    assert!(description.nodes[0].has_audio);
    assert!(!description.nodes[1].has_audio);

    let json = description.to_json().unwrap();
    assert!(json.contains("\"hasAudio\":true"));
    assert!(!json.contains("RIFF"));
}

#[test]
fn test_malformed_json_is_description_error() {
    let engine = test_engine();
    assert!(matches!(
        engine.load_description_json("{\"nodes\": ["),
        Err(Error::Description(_))
    ));
}

/// Deleting a node removes every edge touching it.
#[test]
fn test_delete_node_drops_edges() {
    let engine = test_engine();
    let ids = build_chain(&engine, &[NodeKind::Input, NodeKind::Trim, NodeKind::Output]);

    let removed = engine.delete_node(&ids[1]).unwrap();
    assert_eq!(removed.kind(), NodeKind::Trim);
    assert!(engine.graph_description().edges.is_empty());
    assert!(matches!(
        engine.delete_node(&ids[1]),
        Err(Error::Graph(GraphError::UnknownNode(_)))
    ));
}

/// Single-input ports accept one edge; Merge accepts one per named port.
#[test]
fn test_port_rules() {
    let engine = test_engine();
    let a = engine.add_node(NodeKind::Input).unwrap();
    let b = engine.add_node(NodeKind::Input).unwrap();
    let trim = engine.add_node(NodeKind::Trim).unwrap();
    let merge = engine.add_node(NodeKind::Merge).unwrap();

    engine.connect(&a, OUTPUT_PORT, &trim, INPUT_PORT).unwrap();
    assert!(matches!(
        engine.connect(&b, OUTPUT_PORT, &trim, INPUT_PORT),
        Err(Error::Graph(GraphError::PortOccupied { .. }))
    ));
    assert!(matches!(
        engine.connect(&trim, OUTPUT_PORT, &a, INPUT_PORT),
        Err(Error::Graph(GraphError::InvalidPort { .. }))
    ));

    engine.connect(&a, OUTPUT_PORT, &merge, "a").unwrap();
    engine.connect(&b, OUTPUT_PORT, &merge, "b").unwrap();

    let edge = Edge::new(a.clone(), OUTPUT_PORT, trim.clone(), INPUT_PORT);
    assert!(engine.disconnect(&edge));
    assert!(!engine.disconnect(&edge));
    engine.connect(&b, OUTPUT_PORT, &trim, INPUT_PORT).unwrap();
}

#[test]
fn test_unknown_parameter_rejected() {
    let engine = test_engine();
    let trim = engine.add_node(NodeKind::Trim).unwrap();
    assert!(matches!(
        engine.update_node_parameter(&trim, "effect", "echo"),
        Err(Error::Graph(GraphError::UnknownParameter { .. }))
    ));
    assert!(matches!(
        engine.update_node_parameter(&trim, FILE_KEY, dc_wav(0.0, 0.1, 8000)),
        Err(Error::Graph(GraphError::UnknownParameter { .. }))
    ));
}
