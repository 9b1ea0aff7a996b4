use crate::graph::adjacency::AdjacencyMap;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepthWarning {
    FocusNotFound(String),
}

/// BFS distance of every node from the focus. Unreachable nodes hold
/// `f32::INFINITY`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RelativeDepths {
    depths: HashMap<String, f32>,
    pub warning: Option<DepthWarning>,
}

impl RelativeDepths {
    pub fn get(&self, id: &str) -> f32 {
        self.depths.get(id).copied().unwrap_or(f32::INFINITY)
    }

    pub fn reachable(&self) -> impl Iterator<Item = (&str, f32)> {
        self.depths
            .iter()
            .filter(|(_, d)| d.is_finite())
            .map(|(id, d)| (id.as_str(), *d))
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Breadth-first depth from `focus_id` over hierarchy edges.
///
/// A focus that is not one of `node_ids` leaves every depth infinite and
/// records a warning instead of failing.
pub fn relative_depth<'a, I>(node_ids: I, hierarchy: &AdjacencyMap, focus_id: &str) -> RelativeDepths
where
    I: IntoIterator<Item = &'a str>,
{
    let mut depths: HashMap<String, f32> = node_ids
        .into_iter()
        .map(|id| (id.to_string(), f32::INFINITY))
        .collect();

    let Some(focus_depth) = depths.get_mut(focus_id) else {
        warn!(focus = focus_id, "focus node not found; all depths unreachable");
        return RelativeDepths {
            depths,
            warning: Some(DepthWarning::FocusNotFound(focus_id.to_string())),
        };
    };
    *focus_depth = 0.0;

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(focus_id);
    queue.push_back((focus_id, 0.0_f32));

    while let Some((current, d)) = queue.pop_front() {
        for neighbor in hierarchy.get(current).into_iter().flatten() {
            if !visited.insert(neighbor.as_str()) {
                continue;
            }
            if let Some(slot) = depths.get_mut(neighbor.as_str()) {
                *slot = d + 1.0;
                queue.push_back((neighbor.as_str(), d + 1.0));
            }
        }
    }

    RelativeDepths {
        depths,
        warning: None,
    }
}
