use content_graph::document::Document;
use content_graph::graph::layout::Viewport;
use content_graph::graph::{ContentGraph, GraphEvent, GraphSession, InteractionState};
use content_graph::settings::Settings;
use std::time::Duration;
use tempfile::tempdir;

fn graph() -> ContentGraph {
    ContentGraph::build(&[
        Document::new("blog/first", "2024-01-01").with_links(["/posts/blog/second"]),
        Document::new("blog/second", "2024-01-02"),
        Document::new("island/island", "2024-01-03"),
        Document::new("island/rock", "2024-01-03"),
    ])
    .unwrap()
}

fn session(settings: &Settings) -> GraphSession {
    GraphSession::new(&graph(), settings.session_config(), Viewport::new(640.0, 480.0))
}

#[test]
fn settings_file_configures_the_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let path = path.to_str().unwrap();

    let mut settings = Settings::load(path).unwrap();
    assert_eq!(settings, Settings::default());
    settings.graph.root_id = "island".into();
    settings.layout.iterations_per_frame = 3;
    settings.save(path).unwrap();

    let loaded = Settings::load(path).unwrap();
    assert_eq!(loaded, settings);

    let s = session(&loaded);
    assert_eq!(s.focus(), "island");
    assert_eq!(s.depth("island/rock"), 1.0);
    assert!(s.depth("blog").is_infinite());
}

#[test]
fn drag_pin_survives_only_on_the_focus() {
    let mut s = session(&Settings::default());

    s.handle(GraphEvent::DragStart {
        node: "blog/first".into(),
        pointer: [100.0, 100.0],
    });
    s.handle(GraphEvent::DragMove {
        pointer: [120.0, 90.0],
    });
    s.frame(Duration::from_millis(16));
    s.handle(GraphEvent::DragEnd);
    assert!(!s.simulation().node("blog/first").unwrap().is_pinned());

    s.handle(GraphEvent::ClickNode {
        node: "blog/first".into(),
    });
    s.handle(GraphEvent::DragStart {
        node: "blog/first".into(),
        pointer: [0.0, 0.0],
    });
    s.handle(GraphEvent::DragMove {
        pointer: [200.0, 150.0],
    });
    s.handle(GraphEvent::DragEnd);
    let node = s.simulation().node("blog/first").unwrap();
    assert_eq!((node.fx, node.fy), (Some(200.0), Some(150.0)));
}

#[test]
fn session_settles_and_keeps_nodes_on_canvas() {
    let mut s = session(&Settings::default());
    let mut frames = 0;
    while s.is_animating() {
        s.frame(Duration::from_millis(16));
        frames += 1;
        assert!(frames < 5_000, "layout never settled");
    }
    assert_eq!(s.state(), &InteractionState::Idle);
    for node in s.simulation().nodes() {
        assert!(node.position[0].is_finite() && node.position[1].is_finite());
        assert!(node.position[0] >= 0.0 && node.position[0] <= 640.0);
        assert!(node.position[1] >= 0.0 && node.position[1] <= 480.0);
    }
}

#[test]
fn focusing_a_folder_recomputes_depths_through_the_root() {
    let mut s = session(&Settings::default());
    s.handle(GraphEvent::ClickNode {
        node: "island".into(),
    });
    assert_eq!(s.depth("island"), 0.0);
    assert_eq!(s.depth("island/rock"), 1.0);
    assert_eq!(s.depth("/"), 1.0);
    assert_eq!(s.depth("blog/first"), 3.0);

    let r = s.simulation().config().visual_radius(s.depth("blog/first"));
    assert!(r < s.simulation().config().base_radius);
}
