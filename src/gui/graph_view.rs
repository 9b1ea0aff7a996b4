use crate::graph::index::ContentGraph;
use crate::graph::interaction::{GraphEvent, GraphSession, SessionConfig};
use crate::graph::layout::{SimNode, Viewport};
use crate::graph::view::ViewTransform;
use crate::settings::ViewSettings;
use eframe::egui::{self, Color32, Pos2, Rect, Sense, Stroke, Vec2};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::time::Duration;
use tracing::info;

const MIN_CANVAS_WIDTH: f32 = 300.0;
const MIN_CANVAS_HEIGHT: f32 = 300.0;
const SCROLL_ZOOM_IN: f32 = 1.1;
const SCROLL_ZOOM_OUT: f32 = 0.9;
const MAX_SEARCH_RESULTS: usize = 8;
/// Screen-pixel offset of the tooltip from the hovering pointer.
const TOOLTIP_OFFSET: Vec2 = Vec2::new(10.0, -28.0);

const FOLDER_COLOR: Color32 = Color32::from_rgb(110, 150, 220);
const DOCUMENT_COLOR: Color32 = Color32::from_rgb(110, 185, 130);
const FOCUS_OUTLINE: Color32 = Color32::from_rgb(250, 200, 70);
const BACKLINK_COLOR: Color32 = Color32::from_rgb(200, 90, 90);

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<SearchResult>,
    selected_idx: usize,
}

#[derive(Clone, Debug, PartialEq)]
struct SearchResult {
    id: String,
    title: String,
    score: i64,
}

/// eframe front end for one [`GraphSession`].
///
/// Translates egui pointer input into session events, drives `frame` once
/// per repaint and paints the simulation state.
pub struct GraphViewApp {
    session: GraphSession,
    graph: ContentGraph,
    settings: ViewSettings,
    search: SearchState,
    dragging_node: bool,
    /// Last node and screen pointer reported to the session.
    hovered: Option<(String, Pos2)>,
}

impl GraphViewApp {
    pub fn new(graph: ContentGraph, config: SessionConfig, settings: ViewSettings) -> Self {
        let (w, h) = settings.window_size;
        let session = GraphSession::new(&graph, config, Viewport::new(w, h));
        info!(nodes = graph.len(), "graph viewer opened");
        Self {
            session,
            graph,
            settings,
            search: SearchState::default(),
            dragging_node: false,
            hovered: None,
        }
    }

    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Search");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search.query)
                    .desired_width(240.0)
                    .hint_text("title or path"),
            );
            if response.changed() {
                self.search.selected_idx = 0;
                self.search.results = rank_search_results(&self.search.query, &self.graph);
            }
            if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                if let Some(result) = self.search.results.get(self.search.selected_idx) {
                    let id = result.id.clone();
                    self.session.focus_node(&id);
                }
            }

            ui.separator();
            if ui.button("Reset view").clicked() {
                self.session.handle(GraphEvent::ResetView);
            }
            ui.checkbox(&mut self.settings.show_labels, "Labels");
            ui.label(format!("Focus: {}", self.session.focus()));
            ui.label(format!("Nodes: {}", self.session.simulation().nodes().len()));
        });

        if self.search.query.trim().is_empty() {
            return;
        }
        let mut picked = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_max_height(110.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (idx, result) in self.search.results.iter().take(MAX_SEARCH_RESULTS).enumerate() {
                    let label = format!("{} [{}]", result.title, result.id);
                    if ui
                        .selectable_label(idx == self.search.selected_idx, label)
                        .clicked()
                    {
                        picked = Some(result.id.clone());
                    }
                }
            });
        });
        if let Some(id) = picked {
            self.session.focus_node(&id);
        }
    }

    fn canvas(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let available = ui.available_size();
        let desired = egui::vec2(
            available.x.max(MIN_CANVAS_WIDTH),
            available.y.max(MIN_CANVAS_HEIGHT),
        );
        let (rect, response) = ui.allocate_exact_size(desired, Sense::click_and_drag());
        self.session.handle(GraphEvent::Resize {
            width: rect.width(),
            height: rect.height(),
        });

        let to_local = |p: Pos2| [p.x - rect.min.x, p.y - rect.min.y];
        let screen_positions = self.screen_positions(rect);

        let hit = response
            .hover_pos()
            .and_then(|p| hit_test_node(p, &screen_positions));
        match (&hit, response.hover_pos()) {
            (Some((id, _)), Some(pointer)) => {
                if hover_needs_update(self.hovered.as_ref(), id, pointer) {
                    let world = self.session.transform().screen_to_world(to_local(pointer));
                    self.session.handle(GraphEvent::HoverStart {
                        node: id.clone(),
                        pointer: world,
                    });
                    self.hovered = Some((id.clone(), pointer));
                }
            }
            _ => {
                if self.hovered.take().is_some() {
                    self.session.handle(GraphEvent::HoverEnd);
                }
            }
        }

        if response.hovered() {
            let scroll = ctx.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let factor = if scroll > 0.0 { SCROLL_ZOOM_IN } else { SCROLL_ZOOM_OUT };
                let pointer = ctx.input(|i| i.pointer.hover_pos()).unwrap_or(rect.center());
                self.session.handle(GraphEvent::Zoom {
                    anchor: to_local(pointer),
                    factor,
                });
            }
        }

        if response.drag_started() {
            let press = ctx.input(|i| i.pointer.press_origin());
            if let Some((id, pointer)) =
                press.and_then(|p| hit_test_node(p, &screen_positions).map(|(id, _)| (id, p)))
            {
                let world = self.session.transform().screen_to_world(to_local(pointer));
                self.dragging_node = self.session.handle(GraphEvent::DragStart { node: id, pointer: world });
            }
        }
        if response.dragged() {
            if self.dragging_node {
                if let Some(pointer) = response.interact_pointer_pos() {
                    let world = self.session.transform().screen_to_world(to_local(pointer));
                    self.session.handle(GraphEvent::DragMove { pointer: world });
                }
            } else {
                let delta = response.drag_delta();
                self.session.handle(GraphEvent::Pan {
                    delta: [delta.x, delta.y],
                });
            }
        }
        if response.drag_stopped() && self.dragging_node {
            self.dragging_node = false;
            self.session.handle(GraphEvent::DragEnd);
        }

        if response.double_clicked() {
            self.session.handle(GraphEvent::ResetView);
        } else if response.clicked() {
            let event = match response
                .interact_pointer_pos()
                .and_then(|p| hit_test_node(p, &screen_positions))
            {
                Some((id, _)) => GraphEvent::ClickNode { node: id },
                None => GraphEvent::ClickBackground,
            };
            self.session.handle(event);
        }

        let dt = ctx.input(|i| i.stable_dt).clamp(0.0, 0.1);
        self.session.frame(Duration::from_secs_f32(dt));

        self.paint(ui, rect);

        if self.session.is_animating() {
            ctx.request_repaint();
        }
    }

    fn screen_positions(&self, rect: Rect) -> Vec<(String, Pos2, f32)> {
        let transform = self.session.transform();
        let sim = self.session.simulation();
        sim.nodes()
            .iter()
            .map(|n| {
                let p = transform.world_to_screen(n.position);
                (
                    n.id.clone(),
                    rect.min + egui::vec2(p[0], p[1]),
                    sim.visual_radius(n) * transform.scale,
                )
            })
            .collect()
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

        let transform = self.session.transform();
        let sim = self.session.simulation();
        let to_screen = |node: &SimNode| {
            let p = transform.world_to_screen(node.position);
            rect.min + egui::vec2(p[0], p[1])
        };

        for link in sim.links() {
            let a = to_screen(&sim.nodes()[link.source]);
            let b = to_screen(&sim.nodes()[link.target]);
            if !edge_is_visible(a, b, rect) {
                continue;
            }
            let color = edge_color(link.is_backlink, self.session.is_link_dimmed(link));
            painter.line_segment([a, b], Stroke::new(1.0, color));
        }

        let show_labels =
            self.settings.show_labels && transform.scale >= self.settings.label_zoom_threshold;
        for node in sim.nodes() {
            let p = to_screen(node);
            let radius = sim.visual_radius(node) * transform.scale;
            let fill = if node.is_folder { FOLDER_COLOR } else { DOCUMENT_COLOR };
            painter.circle_filled(p, radius, fill);
            if self.session.is_highlighted(&node.id) {
                painter.circle_stroke(p, radius, Stroke::new(1.5, Color32::WHITE));
            }
            if node.id == self.session.focus() {
                painter.circle_stroke(p, radius + 2.0, Stroke::new(2.0, FOCUS_OUTLINE));
            }
            if show_labels {
                painter.text(
                    p + egui::vec2(radius + 4.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    &node.label,
                    egui::TextStyle::Small.resolve(ui.style()),
                    ui.visuals().text_color(),
                );
            }
        }

        if let Some(tip) = self.session.tooltip() {
            let pos = tooltip_screen_pos(rect.min, transform, tip.anchor);
            let text = format!("{}\n{}", tip.title, tip.id);
            let galley = painter.layout_no_wrap(
                text,
                egui::TextStyle::Small.resolve(ui.style()),
                ui.visuals().text_color(),
            );
            let bg = Rect::from_min_size(pos, galley.size()).expand(4.0);
            painter.rect_filled(bg, 3.0, ui.visuals().window_fill());
            painter.galley(pos, galley, ui.visuals().text_color());
        }
    }
}

impl eframe::App for GraphViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.top_bar(ui);
            ui.separator();
            self.canvas(ui, ctx);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.teardown();
    }
}

fn edge_color(is_backlink: bool, dimmed: bool) -> Color32 {
    let base = if is_backlink {
        BACKLINK_COLOR
    } else {
        Color32::from_gray(120)
    };
    if dimmed {
        base.gamma_multiply(0.2)
    } else {
        base
    }
}

/// Closest node whose drawn circle contains `pointer`.
fn hit_test_node(pointer: Pos2, nodes: &[(String, Pos2, f32)]) -> Option<(String, f32)> {
    let mut best: Option<(String, f32)> = None;
    for (id, p, radius) in nodes {
        let dist = pointer.distance(*p);
        if dist <= radius.max(4.0) {
            match &best {
                Some((_, best_dist)) if dist >= *best_dist => {}
                _ => best = Some((id.clone(), dist)),
            }
        }
    }
    best
}

fn hover_needs_update(last: Option<&(String, Pos2)>, id: &str, pointer: Pos2) -> bool {
    last.map_or(true, |(node, at)| node != id || *at != pointer)
}

fn tooltip_screen_pos(origin: Pos2, transform: ViewTransform, anchor: [f32; 2]) -> Pos2 {
    let [x, y] = transform.world_to_screen(anchor);
    origin + Vec2::new(x, y) + TOOLTIP_OFFSET
}

fn edge_is_visible(a: Pos2, b: Pos2, rect: Rect) -> bool {
    let min_x = a.x.min(b.x);
    let max_x = a.x.max(b.x);
    let min_y = a.y.min(b.y);
    let max_y = a.y.max(b.y);
    max_x >= rect.left() && min_x <= rect.right() && max_y >= rect.top() && min_y <= rect.bottom()
}

fn rank_search_results(query: &str, graph: &ContentGraph) -> Vec<SearchResult> {
    let q = query.trim();
    if q.is_empty() {
        return Vec::new();
    }
    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<SearchResult> = graph
        .iter()
        .filter_map(|node| {
            let best = matcher
                .fuzzy_match(&node.title, q)
                .max(matcher.fuzzy_match(&node.id, q))?;
            Some(SearchResult {
                id: node.id.clone(),
                title: node.title.clone(),
                score: best,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn hit_test_returns_closest_node_within_radius() {
        let nodes = vec![
            ("a".to_string(), Pos2::new(10.0, 10.0), 5.0),
            ("b".to_string(), Pos2::new(14.0, 10.0), 5.0),
        ];
        let hit = hit_test_node(Pos2::new(13.5, 10.0), &nodes);
        assert_eq!(hit.map(|(id, _)| id).as_deref(), Some("b"));
        assert!(hit_test_node(Pos2::new(30.0, 30.0), &nodes).is_none());
    }

    #[test]
    fn search_matches_titles_and_paths() {
        let graph = ContentGraph::build(&[
            Document::new("notes/roadmap", "2024-01-01").with_title("Roadmap"),
            Document::new("journal/daily", "2024-01-01").with_title("Daily Journal"),
        ])
        .expect("build");
        let results = rank_search_results("daily", &graph);
        assert_eq!(results.first().map(|r| r.id.as_str()), Some("journal/daily"));
        let by_path = rank_search_results("notes/road", &graph);
        assert_eq!(by_path.first().map(|r| r.id.as_str()), Some("notes/roadmap"));
        assert!(rank_search_results("   ", &graph).is_empty());
    }

    #[test]
    fn dimmed_edges_fade() {
        assert_eq!(edge_color(true, false), BACKLINK_COLOR);
        assert_ne!(edge_color(false, true), edge_color(false, false));
    }

    #[test]
    fn hover_is_resent_when_the_pointer_moves_over_a_node() {
        let last = ("a".to_string(), Pos2::new(10.0, 10.0));
        assert!(hover_needs_update(None, "a", Pos2::new(10.0, 10.0)));
        assert!(!hover_needs_update(Some(&last), "a", Pos2::new(10.0, 10.0)));
        assert!(hover_needs_update(Some(&last), "a", Pos2::new(12.0, 9.0)));
        assert!(hover_needs_update(Some(&last), "b", Pos2::new(10.0, 10.0)));
    }

    #[test]
    fn tooltip_offset_is_in_screen_pixels_at_any_zoom() {
        let origin = Pos2::new(5.0, 5.0);
        for scale in [0.1, 1.0, 8.0] {
            let transform = ViewTransform {
                translate: [20.0, -4.0],
                scale,
            };
            let anchor = [30.0, 40.0];
            let [x, y] = transform.world_to_screen(anchor);
            let pos = tooltip_screen_pos(origin, transform, anchor);
            let offset = pos - (origin + Vec2::new(x, y));
            assert!((offset - TOOLTIP_OFFSET).length() < 1e-3);
        }
    }

    #[test]
    fn edges_outside_the_canvas_are_culled() {
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0));
        assert!(edge_is_visible(Pos2::new(-10.0, 50.0), Pos2::new(10.0, 50.0), rect));
        assert!(!edge_is_visible(Pos2::new(-10.0, -10.0), Pos2::new(-1.0, -5.0), rect));
    }
}
