use content_graph::document::Document;
use content_graph::graph::codec::{compress, decompress, from_wire_json, to_wire_json, IndexedGraph};
use content_graph::graph::layout::Viewport;
use content_graph::graph::{ContentGraph, GraphSession, SessionConfig};

fn graph() -> ContentGraph {
    ContentGraph::build(&[
        Document::new("a/a", "2024-01-01").with_links(["b/c"]),
        Document::new("a/x", "2024-01-01"),
        Document::new("b/c", "2024-01-01").with_links(["a/a", "missing"]),
        Document::new("b/d/e", "2024-01-01").with_links(["/posts/a/x"]),
        Document::new("top", "2024-01-01"),
    ])
    .unwrap()
}

#[test]
fn wire_json_round_trips() {
    let indexed = IndexedGraph::from_content_graph(&graph(), "/", "Root");
    let json = to_wire_json(&indexed).unwrap();
    assert_eq!(from_wire_json(&json).unwrap(), indexed);
    assert_eq!(decompress(compress(&indexed)).unwrap(), indexed);
}

#[test]
fn every_non_root_node_has_a_parent_edge() {
    let indexed = IndexedGraph::from_content_graph(&graph(), "/", "Root");
    assert_eq!(indexed.nodes.len(), graph().len() + 1);
    for node in &indexed.nodes {
        match node.parent_index {
            None => assert_eq!(node.index, indexed.root_index),
            Some(p) => {
                assert!(indexed.hierarchical_links.contains(&(p, node.index)));
                assert_eq!(node.initial_depth, indexed.nodes[p].initial_depth + 1);
            }
        }
    }
    for &(a, b) in &indexed.backlinks {
        assert!(!indexed.hierarchical_links.contains(&(a, b)));
        assert!(!indexed.hierarchical_links.contains(&(b, a)));
    }
}

#[test]
fn existing_root_is_not_duplicated() {
    let indexed = IndexedGraph::from_content_graph(&graph(), "b", "ignored");
    assert_eq!(indexed.nodes.len(), graph().len());
    assert_eq!(indexed.nodes[0].name, "b");
    assert_eq!(indexed.nodes[0].parent_index, None);
    let json = to_wire_json(&indexed).unwrap();
    assert_eq!(from_wire_json(&json).unwrap(), indexed);
}

#[test]
fn nested_root_export_matches_session_depths() {
    let graph = graph();
    let indexed = IndexedGraph::from_content_graph(&graph, "b/d", "ignored");
    let config = SessionConfig {
        root_id: "b/d".to_string(),
        ..SessionConfig::default()
    };
    let session = GraphSession::new(&graph, config, Viewport::new(800.0, 600.0));

    let ids: Vec<&str> = std::iter::once("b/d")
        .chain(graph.ids().filter(|id| *id != "b/d"))
        .collect();
    let b = ids.iter().position(|id| *id == "b").unwrap();
    assert!(indexed.hierarchical_links.contains(&(b, 0)));

    for (i, id) in ids.iter().enumerate() {
        let depth = session.depth(id);
        if depth.is_finite() {
            assert_eq!(indexed.nodes[i].initial_depth as f32, depth, "depth of {id}");
        }
    }
    assert_eq!(session.depth("b"), 1.0);
    assert_eq!(session.depth("b/c"), 2.0);
}
