use crate::graph::depth::RelativeDepths;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub iterations_per_frame: usize,
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    pub hierarchy_link_distance: f32,
    pub leaf_link_distance: f32,
    pub backlink_distance: f32,
    pub hierarchy_link_strength: f32,
    pub backlink_strength: f32,
    pub radial_increment: f32,
    pub radial_strength: f32,
    pub unreachable_radial_strength: f32,
    /// Unreachable nodes settle at this multiple of the larger viewport side.
    pub unreachable_radius_factor: f32,
    pub center_strength: f32,
    pub base_radius: f32,
    pub collide_padding: f32,
    pub collide_iterations: usize,
    pub radius_scale_factor: f32,
    pub min_visual_radius: f32,
    pub fallback_depth: f32,
    pub clamp_padding: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub velocity_decay: f32,
    pub drag_alpha_target: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations_per_frame: 1,
            charge_strength: -150.0,
            hierarchy_link_distance: 65.0,
            leaf_link_distance: 45.0,
            backlink_distance: 70.0,
            hierarchy_link_strength: 0.6,
            backlink_strength: 0.2,
            radial_increment: 80.0,
            radial_strength: 0.6,
            unreachable_radial_strength: 0.05,
            unreachable_radius_factor: 1.5,
            center_strength: 0.1,
            base_radius: 10.0,
            collide_padding: 3.0,
            collide_iterations: 2,
            radius_scale_factor: 0.85,
            min_visual_radius: 3.0,
            fallback_depth: 5.0,
            clamp_padding: 5.0,
            alpha_decay: 0.018,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            drag_alpha_target: 0.1,
        }
    }
}

impl LayoutConfig {
    /// Drawn radius shrinks geometrically with distance from the focus.
    pub fn visual_radius(&self, relative_depth: f32) -> f32 {
        let depth = if relative_depth.is_finite() {
            relative_depth
        } else {
            self.fallback_depth
        };
        (self.base_radius * self.radius_scale_factor.powf(depth)).max(self.min_visual_radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> [f32; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Per-session physics record for one graph node.
///
/// `id` is the lookup key of the source node; nothing here is written back
/// into the content graph.
#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
    pub id: String,
    pub label: String,
    pub is_folder: bool,
    pub is_leaf: bool,
    pub relative_depth: f32,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub fx: Option<f32>,
    pub fy: Option<f32>,
}

impl SimNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, is_folder: bool, is_leaf: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            is_folder,
            is_leaf,
            relative_depth: f32::INFINITY,
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            fx: None,
            fy: None,
        }
    }

    pub fn pin(&mut self, at: [f32; 2]) {
        self.fx = Some(at[0]);
        self.fy = Some(at[1]);
    }

    pub fn unpin(&mut self) {
        self.fx = None;
        self.fy = None;
    }

    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    pub fn has_valid_position(&self) -> bool {
        self.position[0].is_finite() && self.position[1].is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimLink {
    pub source: usize,
    pub target: usize,
    pub is_backlink: bool,
}

/// Force-directed layout with a decaying temperature (`alpha`).
///
/// Each tick reheats toward `alpha_target`, accumulates velocity from the
/// link, charge, collision and radial forces, integrates, recenters and
/// clamps to the viewport. Ticking stops once alpha drops below
/// `alpha_min`; `restart` resumes it.
#[derive(Clone, Debug)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    lookup: HashMap<String, usize>,
    link_counts: Vec<usize>,
    viewport: Viewport,
    config: LayoutConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
}

impl Simulation {
    pub fn new(mut nodes: Vec<SimNode>, links: Vec<SimLink>, viewport: Viewport, config: LayoutConfig) -> Self {
        let center = viewport.center();
        for node in &mut nodes {
            if node.position == [0.0, 0.0] {
                let offset = seeded_position(&node.id);
                node.position = [center[0] + offset[0], center[1] + offset[1]];
            }
        }
        let lookup = nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id.clone(), idx))
            .collect();
        let links: Vec<SimLink> = links
            .into_iter()
            .filter(|l| l.source < nodes.len() && l.target < nodes.len() && l.source != l.target)
            .collect();
        let mut link_counts = vec![0; nodes.len()];
        for link in &links {
            link_counts[link.source] += 1;
            link_counts[link.target] += 1;
        }
        Self {
            nodes,
            links,
            lookup,
            link_counts,
            viewport,
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.lookup.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        let idx = self.index_of(id)?;
        self.nodes.get(idx)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut SimNode> {
        let idx = self.index_of(id)?;
        self.nodes.get_mut(idx)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.max(0.0);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reheat to full temperature and resume ticking.
    pub fn restart(&mut self) {
        self.alpha = 1.0;
        self.running = true;
    }

    /// Resume ticking without reheating.
    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn apply_depths(&mut self, depths: &RelativeDepths) {
        for node in &mut self.nodes {
            node.relative_depth = depths.get(&node.id);
        }
    }

    pub fn visual_radius(&self, node: &SimNode) -> f32 {
        self.config.visual_radius(node.relative_depth)
    }

    /// Run up to `iterations_per_frame` ticks. Returns the number run.
    pub fn advance_frame(&mut self) -> usize {
        let mut ran = 0;
        for _ in 0..self.config.iterations_per_frame.max(1) {
            if !self.tick() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// One simulation step. Returns `false` without touching positions when
    /// the simulation has cooled down or been stopped.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.running = false;
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        self.apply_links();
        self.apply_charge();
        self.apply_collision();
        self.apply_radial();
        self.integrate();
        self.apply_center();
        self.clamp_to_viewport();

        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.running = false;
        }
        true
    }

    fn link_geometry(&self, link: &SimLink) -> (f32, f32) {
        if link.is_backlink {
            (self.config.backlink_distance, self.config.backlink_strength)
        } else if self.nodes[link.target].is_leaf {
            (self.config.leaf_link_distance, self.config.hierarchy_link_strength)
        } else {
            (self.config.hierarchy_link_distance, self.config.hierarchy_link_strength)
        }
    }

    fn apply_links(&mut self) {
        for i in 0..self.links.len() {
            let link = self.links[i];
            let (distance, strength) = self.link_geometry(&link);
            let s = &self.nodes[link.source];
            let t = &self.nodes[link.target];
            let mut dx = t.position[0] + t.velocity[0] - s.position[0] - s.velocity[0];
            let mut dy = t.position[1] + t.velocity[1] - s.position[1] - s.velocity[1];
            if dx == 0.0 && dy == 0.0 {
                let j = jiggle(i);
                dx = j[0];
                dy = j[1];
            }
            let len = (dx * dx + dy * dy).sqrt();
            let k = (len - distance) / len * self.alpha * strength;
            let fx = dx * k;
            let fy = dy * k;

            let cs = self.link_counts[link.source] as f32;
            let ct = self.link_counts[link.target] as f32;
            let bias = cs / (cs + ct);

            let t = &mut self.nodes[link.target];
            t.velocity[0] -= fx * bias;
            t.velocity[1] -= fy * bias;
            let s = &mut self.nodes[link.source];
            s.velocity[0] += fx * (1.0 - bias);
            s.velocity[1] += fy * (1.0 - bias);
        }
    }

    fn apply_charge(&mut self) {
        let strength = self.config.charge_strength * self.alpha;
        let n = self.nodes.len();
        let mut forces = vec![[0.0_f32, 0.0_f32]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let pa = self.nodes[i].position;
                let pb = self.nodes[j].position;
                let mut dx = pb[0] - pa[0];
                let mut dy = pb[1] - pa[1];
                if dx == 0.0 && dy == 0.0 {
                    let jg = jiggle(i * n + j);
                    dx = jg[0];
                    dy = jg[1];
                }
                let dist_sq = (dx * dx + dy * dy).max(1.0);
                let w = strength / dist_sq;
                forces[i][0] += dx * w;
                forces[i][1] += dy * w;
                forces[j][0] -= dx * w;
                forces[j][1] -= dy * w;
            }
        }
        for (node, force) in self.nodes.iter_mut().zip(forces) {
            node.velocity[0] += force[0];
            node.velocity[1] += force[1];
        }
    }

    fn apply_collision(&mut self) {
        let radius = self.config.base_radius + self.config.collide_padding;
        let min_dist = radius * 2.0;
        let n = self.nodes.len();
        for _ in 0..self.config.collide_iterations {
            for i in 0..n {
                for j in (i + 1)..n {
                    let a = &self.nodes[i];
                    let b = &self.nodes[j];
                    let mut dx = a.position[0] + a.velocity[0] - b.position[0] - b.velocity[0];
                    let mut dy = a.position[1] + a.velocity[1] - b.position[1] - b.velocity[1];
                    let mut dist_sq = dx * dx + dy * dy;
                    if dist_sq >= min_dist * min_dist {
                        continue;
                    }
                    if dist_sq == 0.0 {
                        let jg = jiggle(i * n + j);
                        dx = jg[0];
                        dy = jg[1];
                        dist_sq = dx * dx + dy * dy;
                    }
                    let dist = dist_sq.sqrt();
                    let push = (min_dist - dist) / dist * 0.5;
                    let (px, py) = (dx * push, dy * push);
                    self.nodes[i].velocity[0] += px;
                    self.nodes[i].velocity[1] += py;
                    self.nodes[j].velocity[0] -= px;
                    self.nodes[j].velocity[1] -= py;
                }
            }
        }
    }

    fn apply_radial(&mut self) {
        let [cx, cy] = self.viewport.center();
        let far = self.viewport.width.max(self.viewport.height) * self.config.unreachable_radius_factor;
        for node in &mut self.nodes {
            let (target, strength) = if node.relative_depth.is_finite() {
                (node.relative_depth * self.config.radial_increment, self.config.radial_strength)
            } else {
                (far, self.config.unreachable_radial_strength)
            };
            let dx = node.position[0] - cx;
            let dy = node.position[1] - cy;
            let r = (dx * dx + dy * dy).sqrt().max(1e-6);
            let k = (target - r) * strength * self.alpha / r;
            node.velocity[0] += dx * k;
            node.velocity[1] += dy * k;
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        let center = self.viewport.center();
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.position[0] = fx;
                    node.velocity[0] = 0.0;
                }
                None => {
                    node.velocity[0] *= keep;
                    node.position[0] += node.velocity[0];
                }
            }
            match node.fy {
                Some(fy) => {
                    node.position[1] = fy;
                    node.velocity[1] = 0.0;
                }
                None => {
                    node.velocity[1] *= keep;
                    node.position[1] += node.velocity[1];
                }
            }
            if !node.has_valid_position() {
                node.position = center;
                node.velocity = [0.0, 0.0];
            }
        }
    }

    /// Weak pull of the free nodes' centroid toward the viewport center.
    fn apply_center(&mut self) {
        let free: Vec<usize> = (0..self.nodes.len())
            .filter(|&i| !self.nodes[i].is_pinned())
            .collect();
        if free.is_empty() {
            return;
        }
        let [cx, cy] = self.viewport.center();
        let count = free.len() as f32;
        let (sx, sy) = free.iter().fold((0.0, 0.0), |(sx, sy), &i| {
            (sx + self.nodes[i].position[0], sy + self.nodes[i].position[1])
        });
        let shift_x = (sx / count - cx) * self.config.center_strength;
        let shift_y = (sy / count - cy) * self.config.center_strength;
        for i in free {
            self.nodes[i].position[0] -= shift_x;
            self.nodes[i].position[1] -= shift_y;
        }
    }

    fn clamp_to_viewport(&mut self) {
        if self.viewport.is_empty() {
            return;
        }
        let margin = self.config.base_radius + self.config.clamp_padding;
        let (w, h) = (self.viewport.width, self.viewport.height);
        for node in &mut self.nodes {
            if node.is_pinned() {
                continue;
            }
            node.position[0] = margin.max((w - margin).min(node.position[0]));
            node.position[1] = margin.max((h - margin).min(node.position[1]));
        }
    }
}

fn seeded_position(seed: &str) -> [f32; 2] {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    seed.hash(&mut hasher);
    let hash = hasher.finish();
    let angle = ((hash & 0xffff) as f32 / 65535.0) * std::f32::consts::TAU;
    let radius = 40.0 + (((hash >> 16) & 0xffff) as f32 / 65535.0) * 30.0;
    [angle.cos() * radius, angle.sin() * radius]
}

/// Small deterministic offset for coincident nodes.
fn jiggle(salt: usize) -> [f32; 2] {
    let a = (salt as f32 * 2.399_963).sin();
    let b = (salt as f32 * 2.399_963).cos();
    [a * 1e-3 + 1e-6, b * 1e-3 + 1e-6]
}
