use crate::graph::adjacency::Adjacency;
use crate::graph::depth::{relative_depth, RelativeDepths};
use crate::graph::index::ContentGraph;
use crate::graph::layout::{LayoutConfig, SimLink, SimNode, Simulation, Viewport};
use crate::graph::view::{TransitionKind, ViewTransform, ViewTransition};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, warn};

pub const ROOT_NODE_ID: &str = "/";

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub root_id: String,
    pub root_label: String,
    pub layout: LayoutConfig,
    pub focus_transition: Duration,
    pub reset_transition: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root_id: ROOT_NODE_ID.to_string(),
            root_label: "Root".to_string(),
            layout: LayoutConfig::default(),
            focus_transition: Duration::from_millis(750),
            reset_transition: Duration::from_millis(750),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging { node: String },
    FocusTransitioning { target: String },
}

/// Pointer positions are in simulation (world) space, except `Zoom`'s
/// anchor which is in screen space.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
    HoverStart { node: String, pointer: [f32; 2] },
    HoverEnd,
    DragStart { node: String, pointer: [f32; 2] },
    DragMove { pointer: [f32; 2] },
    DragEnd,
    ClickNode { node: String },
    ClickBackground,
    Zoom { anchor: [f32; 2], factor: f32 },
    Pan { delta: [f32; 2] },
    ResetView,
    Resize { width: f32, height: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hover {
    pub node: String,
    pub pointer: [f32; 2],
}

/// `anchor` is the hovering pointer in world space. Any pixel offset for
/// the label is applied by the viewer after mapping it to the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub id: String,
    pub anchor: [f32; 2],
}

/// One interactive exploration of a content graph.
///
/// Owns its simulation nodes exclusively. All mutation goes through
/// `handle` (gestures) and `frame` (animation tick); both take `&mut self`,
/// so a tick can never start another tick.
pub struct GraphSession {
    config: SessionConfig,
    adjacency: Adjacency,
    simulation: Simulation,
    depths: RelativeDepths,
    focus: String,
    state: InteractionState,
    hover: Option<Hover>,
    drag_pointer: Option<[f32; 2]>,
    transform: ViewTransform,
    transition: Option<ViewTransition>,
    torn_down: bool,
}

impl GraphSession {
    pub fn new(graph: &ContentGraph, config: SessionConfig, viewport: Viewport) -> Self {
        let adjacency = Adjacency::derive(graph).with_virtual_root(&config.root_id, graph);
        let (nodes, links) = seed_simulation(graph, &adjacency, &config);
        let simulation = Simulation::new(nodes, links, viewport, config.layout);
        let focus = config.root_id.clone();
        let mut session = Self {
            config,
            adjacency,
            simulation,
            depths: RelativeDepths::default(),
            focus,
            state: InteractionState::Idle,
            hover: None,
            drag_pointer: None,
            transform: ViewTransform::IDENTITY,
            transition: None,
            torn_down: false,
        };
        let center = viewport.center();
        let root = session.config.root_id.clone();
        if let Some(n) = session.simulation.node_mut(&root) {
            n.position = center;
            n.pin(center);
        }
        session.recompute_depths();
        session
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn focus(&self) -> &str {
        &self.focus
    }

    pub fn root_id(&self) -> &str {
        &self.config.root_id
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    pub fn depth(&self, id: &str) -> f32 {
        self.depths.get(id)
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn transition(&self) -> Option<&ViewTransition> {
        self.transition.as_ref()
    }

    pub fn hover(&self) -> Option<&Hover> {
        self.hover.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// An edge is dimmed while some other node is hovered.
    pub fn is_link_dimmed(&self, link: &SimLink) -> bool {
        let Some(hover) = &self.hover else {
            return false;
        };
        let nodes = self.simulation.nodes();
        nodes[link.source].id != hover.node && nodes[link.target].id != hover.node
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.hover.as_ref().is_some_and(|h| h.node == id)
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let hover = self.hover.as_ref()?;
        let node = self.simulation.node(&hover.node)?;
        Some(Tooltip {
            title: node.label.clone(),
            id: node.id.clone(),
            anchor: hover.pointer,
        })
    }

    /// Apply one gesture. Returns whether it changed anything.
    pub fn handle(&mut self, event: GraphEvent) -> bool {
        if self.torn_down {
            return false;
        }
        match event {
            GraphEvent::HoverStart { node, pointer } => {
                if self.simulation.index_of(&node).is_none() {
                    return false;
                }
                self.hover = Some(Hover { node, pointer });
                true
            }
            GraphEvent::HoverEnd => self.hover.take().is_some(),
            GraphEvent::DragStart { node, pointer } => self.start_drag(node, pointer),
            GraphEvent::DragMove { pointer } => {
                let InteractionState::Dragging { node } = &self.state else {
                    return false;
                };
                let node = node.clone();
                self.drag_pointer = Some(pointer);
                if let Some(n) = self.simulation.node_mut(&node) {
                    n.pin(pointer);
                }
                true
            }
            GraphEvent::DragEnd => self.end_drag(),
            GraphEvent::ClickNode { node } => {
                if self.simulation.index_of(&node).is_none() {
                    return false;
                }
                let next = if node == self.focus {
                    self.config.root_id.clone()
                } else {
                    node
                };
                self.set_focus(next);
                true
            }
            GraphEvent::ClickBackground => {
                let root = self.config.root_id.clone();
                self.set_focus(root);
                true
            }
            GraphEvent::Zoom { anchor, factor } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return false;
                }
                self.interrupt_transition();
                self.transform.zoom_about(anchor, factor);
                true
            }
            GraphEvent::Pan { delta } => {
                self.interrupt_transition();
                self.transform.pan(delta);
                true
            }
            GraphEvent::ResetView => {
                self.transition = Some(ViewTransition::new(
                    TransitionKind::ResetView,
                    self.transform,
                    ViewTransform::IDENTITY,
                    self.config.reset_transition,
                ));
                true
            }
            GraphEvent::Resize { width, height } => self.resize(Viewport::new(width, height)),
        }
    }

    /// Focus `id` directly, without the click toggle. Used by node search.
    pub fn focus_node(&mut self, id: &str) -> bool {
        if self.torn_down || self.simulation.index_of(id).is_none() {
            return false;
        }
        self.set_focus(id.to_string());
        true
    }

    /// Advance the view transition and the simulation by one animation frame.
    pub fn frame(&mut self, dt: Duration) {
        if self.torn_down {
            return;
        }

        if let Some(transition) = self.transition.as_mut() {
            self.transform = transition.advance(dt);
            if transition.is_finished() {
                self.transition = None;
                if matches!(self.state, InteractionState::FocusTransitioning { .. }) {
                    self.state = InteractionState::Idle;
                }
            }
        }

        if let (InteractionState::Dragging { node }, Some(pointer)) = (&self.state, self.drag_pointer) {
            let node = node.clone();
            if let Some(n) = self.simulation.node_mut(&node) {
                n.pin(pointer);
            }
        }

        self.simulation.advance_frame();
    }

    /// Stop the tick loop and drop every pending gesture and transition.
    /// Nothing the session owns changes after this.
    pub fn teardown(&mut self) {
        self.simulation.stop();
        self.transition = None;
        self.hover = None;
        self.drag_pointer = None;
        self.state = InteractionState::Idle;
        self.torn_down = true;
        debug!("graph session torn down");
    }

    pub fn is_animating(&self) -> bool {
        !self.torn_down && (self.simulation.is_running() || self.transition.is_some())
    }

    fn start_drag(&mut self, node: String, pointer: [f32; 2]) -> bool {
        let layout = self.config.layout;
        let Some(n) = self.simulation.node_mut(&node) else {
            return false;
        };
        let at = n.position;
        n.pin(at);
        self.simulation.set_alpha_target(layout.drag_alpha_target);
        self.simulation.resume();
        self.drag_pointer = Some(pointer);
        debug!(node = %node, "drag started");
        self.state = InteractionState::Dragging { node };
        true
    }

    fn end_drag(&mut self) -> bool {
        let InteractionState::Dragging { node } = &self.state else {
            return false;
        };
        let node = node.clone();
        self.state = InteractionState::Idle;
        self.simulation.set_alpha_target(0.0);
        if node != self.focus {
            if let Some(n) = self.simulation.node_mut(&node) {
                n.unpin();
            }
        }
        self.drag_pointer = None;
        if let Some(tr) = &self.transition {
            if tr.kind == TransitionKind::Focus {
                self.state = InteractionState::FocusTransitioning {
                    target: self.focus.clone(),
                };
            }
        }
        debug!(node = %node, "drag ended");
        true
    }

    fn set_focus(&mut self, next: String) {
        let viewport = self.simulation.viewport();
        let previous = std::mem::replace(&mut self.focus, next.clone());

        let target = match self.simulation.node(&next) {
            Some(node) if node.has_valid_position() => node.position,
            Some(_) => {
                warn!(node = %next, "focus target has invalid position; centering view");
                viewport.center()
            }
            None => viewport.center(),
        };

        if let Some(n) = self.simulation.node_mut(&next) {
            n.position = target;
            n.pin(target);
        }
        if previous != next {
            if let Some(n) = self.simulation.node_mut(&previous) {
                n.unpin();
            }
        }

        self.recompute_depths();
        self.simulation.restart();

        let to = self.transform.centered_on(target, viewport);
        self.transition = Some(ViewTransition::new(
            TransitionKind::Focus,
            self.transform,
            to,
            self.config.focus_transition,
        ));
        if !matches!(self.state, InteractionState::Dragging { .. }) {
            self.state = InteractionState::FocusTransitioning { target: next.clone() };
        }
        debug!(from = %previous, to = %next, "focus changed");
    }

    fn recompute_depths(&mut self) {
        let ids: Vec<String> = self.simulation.nodes().iter().map(|n| n.id.clone()).collect();
        self.depths = relative_depth(ids.iter().map(String::as_str), &self.adjacency.hierarchy, &self.focus);
        self.simulation.apply_depths(&self.depths);
    }

    fn interrupt_transition(&mut self) {
        if self.transition.take().is_some()
            && matches!(self.state, InteractionState::FocusTransitioning { .. })
        {
            self.state = InteractionState::Idle;
        }
    }

    fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() || viewport == self.simulation.viewport() {
            return false;
        }
        self.simulation.set_viewport(viewport);
        self.simulation.restart();
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        true
    }
}

impl Drop for GraphSession {
    fn drop(&mut self) {
        if !self.torn_down {
            self.teardown();
        }
    }
}

/// Simulation nodes and links for a graph: the designated root first (when
/// the graph has no node with that id), then every node in id order.
/// Cross-links that duplicate a hierarchy edge are not added again.
fn seed_simulation(graph: &ContentGraph, adjacency: &Adjacency, config: &SessionConfig) -> (Vec<SimNode>, Vec<SimLink>) {
    let mut nodes = Vec::with_capacity(graph.len() + 1);
    let virtual_root = !graph.contains(&config.root_id);
    if virtual_root {
        let is_leaf = adjacency.hierarchy_neighbors(&config.root_id).next().is_none();
        nodes.push(SimNode::new(config.root_id.clone(), config.root_label.clone(), true, is_leaf));
    }
    for node in graph.iter() {
        nodes.push(SimNode::new(node.id.clone(), node.title.clone(), node.is_folder(), node.is_leaf()));
    }

    let lookup: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let index_of = |id: &str| lookup.get(id).copied();
    let mut links = Vec::new();
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for node in graph.iter() {
        let Some(child) = index_of(&node.id) else {
            continue;
        };
        let parent = match node.parent.as_deref() {
            Some(p) => index_of(p),
            None if virtual_root => Some(0),
            None => None,
        };
        if let Some(parent) = parent {
            if seen.insert(ordered(parent, child)) {
                links.push(SimLink {
                    source: parent,
                    target: child,
                    is_backlink: false,
                });
            }
        }
    }
    for node in graph.iter() {
        let Some(source) = index_of(&node.id) else {
            continue;
        };
        for target in &node.outgoing_links {
            let Some(target) = index_of(target) else {
                continue;
            };
            if source != target && seen.insert(ordered(source, target)) {
                links.push(SimLink {
                    source,
                    target,
                    is_backlink: true,
                });
            }
        }
    }
    (nodes, links)
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn graph() -> ContentGraph {
        let docs = vec![
            Document::new("notes/rust", "2024-01-01").with_links(["notes/go", "about"]),
            Document::new("notes/go", "2024-01-01"),
            Document::new("about", "2024-01-01").with_links(["notes/rust"]),
        ];
        ContentGraph::build(&docs).expect("build")
    }

    fn session() -> GraphSession {
        GraphSession::new(&graph(), SessionConfig::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn starts_focused_on_root_with_tree_depths() {
        let s = session();
        assert_eq!(s.focus(), ROOT_NODE_ID);
        assert_eq!(s.depth(ROOT_NODE_ID), 0.0);
        assert_eq!(s.depth("notes"), 1.0);
        assert_eq!(s.depth("notes/rust"), 2.0);
        assert_eq!(s.state(), &InteractionState::Idle);
        let root = s.simulation().node(ROOT_NODE_ID).expect("root");
        assert_eq!((root.fx, root.fy), (Some(400.0), Some(300.0)));
    }

    #[test]
    fn cross_links_do_not_duplicate_hierarchy_edges() {
        let s = session();
        let links = s.simulation().links();
        assert_eq!(links.iter().filter(|l| !l.is_backlink).count(), 4);
        // rust<->go and rust<->about; about -> rust is the same pair
        assert_eq!(links.iter().filter(|l| l.is_backlink).count(), 2);
    }

    #[test]
    fn clicking_a_node_refocuses_and_pins_it() {
        let mut s = session();
        assert!(s.handle(GraphEvent::ClickNode {
            node: "notes".into()
        }));
        assert_eq!(s.focus(), "notes");
        assert_eq!(
            s.state(),
            &InteractionState::FocusTransitioning {
                target: "notes".into()
            }
        );
        assert!(s.simulation().node("notes").expect("notes").is_pinned());
        assert_eq!(s.depth("notes"), 0.0);
        assert_eq!(s.depth("about"), 2.0);
    }

    #[test]
    fn clicking_the_focus_toggles_back_to_root() {
        let mut s = session();
        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        assert_eq!(s.focus(), ROOT_NODE_ID);
        assert!(!s.simulation().node("notes").expect("notes").is_pinned());
        assert!(s.simulation().node(ROOT_NODE_ID).expect("root").is_pinned());
    }

    #[test]
    fn focus_node_does_not_toggle() {
        let mut s = session();
        assert!(s.focus_node("about"));
        assert!(s.focus_node("about"));
        assert_eq!(s.focus(), "about");
        assert!(!s.focus_node("ghost"));
        assert_eq!(s.focus(), "about");
    }

    #[test]
    fn background_click_resets_to_root_and_unpins_previous_focus() {
        let mut s = session();
        s.handle(GraphEvent::ClickNode {
            node: "about".into(),
        });
        s.handle(GraphEvent::ClickBackground);
        assert_eq!(s.focus(), ROOT_NODE_ID);
        assert!(!s.simulation().node("about").expect("about").is_pinned());
    }

    #[test]
    fn transition_completes_back_to_idle_and_centers_focus() {
        let mut s = session();
        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        let pinned = s.simulation().node("notes").expect("notes").position;
        for _ in 0..60 {
            s.frame(Duration::from_millis(16));
        }
        assert_eq!(s.state(), &InteractionState::Idle);
        assert!(s.transition().is_none());
        let on_screen = s.transform().world_to_screen(pinned);
        assert!((on_screen[0] - 400.0).abs() < 1e-2);
        assert!((on_screen[1] - 300.0).abs() < 1e-2);
    }

    #[test]
    fn new_click_during_transition_replaces_it() {
        let mut s = session();
        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        s.frame(Duration::from_millis(100));
        s.handle(GraphEvent::ClickNode {
            node: "about".into(),
        });
        assert_eq!(
            s.state(),
            &InteractionState::FocusTransitioning {
                target: "about".into()
            }
        );
        let tr = s.transition().expect("transition");
        assert_eq!(tr.progress(), 0.0);
    }

    #[test]
    fn releasing_a_dragged_node_clears_its_pin_unless_focused() {
        let mut s = session();
        s.handle(GraphEvent::DragStart {
            node: "about".into(),
            pointer: [10.0, 10.0],
        });
        assert!(matches!(s.state(), InteractionState::Dragging { .. }));
        s.handle(GraphEvent::DragMove {
            pointer: [50.0, 60.0],
        });
        s.frame(Duration::from_millis(16));
        assert_eq!(s.simulation().node("about").expect("about").position, [50.0, 60.0]);
        s.handle(GraphEvent::DragEnd);
        assert_eq!(s.state(), &InteractionState::Idle);
        assert!(!s.simulation().node("about").expect("about").is_pinned());
        assert_eq!(s.simulation().alpha_target(), 0.0);

        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        s.handle(GraphEvent::DragStart {
            node: "notes".into(),
            pointer: [0.0, 0.0],
        });
        s.handle(GraphEvent::DragMove {
            pointer: [70.0, 80.0],
        });
        s.handle(GraphEvent::DragEnd);
        let notes = s.simulation().node("notes").expect("notes");
        assert!(notes.is_pinned());
        assert_eq!((notes.fx, notes.fy), (Some(70.0), Some(80.0)));
    }

    #[test]
    fn drag_raises_temperature() {
        let mut s = session();
        s.handle(GraphEvent::DragStart {
            node: "about".into(),
            pointer: [0.0, 0.0],
        });
        assert_eq!(
            s.simulation().alpha_target(),
            LayoutConfig::default().drag_alpha_target
        );
        assert!(s.simulation().is_running());
    }

    #[test]
    fn hover_dims_unrelated_edges_and_reverts() {
        let mut s = session();
        s.handle(GraphEvent::HoverStart {
            node: "notes/go".into(),
            pointer: [100.0, 100.0],
        });
        let links = s.simulation().links().to_vec();
        let nodes = s.simulation().nodes();
        for link in &links {
            let touches = nodes[link.source].id == "notes/go" || nodes[link.target].id == "notes/go";
            assert_eq!(s.is_link_dimmed(link), !touches);
        }
        let tip = s.tooltip().expect("tooltip");
        assert_eq!(tip.id, "notes/go");
        assert_eq!(tip.anchor, [100.0, 100.0]);
        assert_eq!(s.state(), &InteractionState::Idle);

        s.handle(GraphEvent::HoverEnd);
        assert!(links.iter().all(|l| !s.is_link_dimmed(l)));
        assert!(s.tooltip().is_none());
    }

    #[test]
    fn repeated_hover_on_one_node_moves_the_tooltip() {
        let mut s = session();
        s.handle(GraphEvent::HoverStart {
            node: "about".into(),
            pointer: [100.0, 100.0],
        });
        assert!(s.handle(GraphEvent::HoverStart {
            node: "about".into(),
            pointer: [104.0, 97.0],
        }));
        let tip = s.tooltip().expect("tooltip");
        assert_eq!(tip.id, "about");
        assert_eq!(tip.anchor, [104.0, 97.0]);
    }

    #[test]
    fn focus_with_invalid_position_centers_on_viewport() {
        let mut s = session();
        s.handle(GraphEvent::Zoom {
            anchor: [0.0, 0.0],
            factor: 2.0,
        });
        s.simulation
            .node_mut("about")
            .expect("about")
            .position = [f32::NAN, f32::NAN];

        assert!(s.handle(GraphEvent::ClickNode {
            node: "about".into()
        }));
        let about = s.simulation().node("about").expect("about");
        assert_eq!(about.position, [400.0, 300.0]);
        assert_eq!((about.fx, about.fy), (Some(400.0), Some(300.0)));

        let target = s.transition().expect("transition").target();
        assert_eq!(target.scale, 2.0);
        let on_screen = target.world_to_screen([400.0, 300.0]);
        assert!((on_screen[0] - 400.0).abs() < 1e-3);
        assert!((on_screen[1] - 300.0).abs() < 1e-3);
    }

    #[test]
    fn wide_graph_seeds_one_link_per_parent_and_cross_pair() {
        let mut docs = Vec::new();
        for f in 0..20 {
            for d in 0..10 {
                let next = format!("f{}/d{d}", (f + 1) % 20);
                docs.push(Document::new(format!("f{f}/d{d}"), "2024-01-01").with_links([next]));
            }
        }
        let graph = ContentGraph::build(&docs).expect("build");
        let s = GraphSession::new(&graph, SessionConfig::default(), Viewport::new(800.0, 600.0));

        let nodes = s.simulation().nodes();
        let links = s.simulation().links();
        assert_eq!(nodes.len(), 221);
        assert_eq!(links.iter().filter(|l| !l.is_backlink).count(), 220);
        assert_eq!(links.iter().filter(|l| l.is_backlink).count(), 200);
        for link in links.iter().filter(|l| !l.is_backlink) {
            let child = graph.get(&nodes[link.target].id).expect("child");
            let parent = child.parent.as_deref().unwrap_or(ROOT_NODE_ID);
            assert_eq!(nodes[link.source].id, parent);
        }
    }

    #[test]
    fn resize_to_same_size_is_ignored() {
        let mut s = session();
        assert!(!s.handle(GraphEvent::Resize {
            width: 800.0,
            height: 600.0
        }));
        assert!(s.handle(GraphEvent::Resize {
            width: 1024.0,
            height: 768.0
        }));
        assert_eq!(s.simulation().viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn reset_view_returns_to_identity() {
        let mut s = session();
        s.handle(GraphEvent::Zoom {
            anchor: [10.0, 10.0],
            factor: 2.0,
        });
        s.handle(GraphEvent::Pan { delta: [30.0, 0.0] });
        assert_ne!(s.transform(), ViewTransform::IDENTITY);
        s.handle(GraphEvent::ResetView);
        s.frame(Duration::from_millis(800));
        assert_eq!(s.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn nothing_fires_after_teardown() {
        let mut s = session();
        s.handle(GraphEvent::ClickNode {
            node: "notes".into(),
        });
        s.teardown();
        let before: Vec<_> = s.simulation().nodes().iter().map(|n| n.position).collect();
        assert!(!s.handle(GraphEvent::ClickBackground));
        s.frame(Duration::from_millis(16));
        let after: Vec<_> = s.simulation().nodes().iter().map(|n| n.position).collect();
        assert_eq!(before, after);
        assert_eq!(s.focus(), "notes");
        assert!(s.transition().is_none());
        assert!(!s.is_animating());
    }

    #[test]
    fn graph_node_as_root_skips_virtual_root() {
        let config = SessionConfig {
            root_id: "notes/go".into(),
            ..SessionConfig::default()
        };
        let s = GraphSession::new(&graph(), config, Viewport::new(800.0, 600.0));
        assert_eq!(s.depth("notes/go"), 0.0);
        assert_eq!(s.depth("notes"), 1.0);
        assert!(s.depth("about").is_infinite());
    }
}
