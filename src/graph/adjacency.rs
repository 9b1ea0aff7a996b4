use crate::graph::index::ContentGraph;
use std::collections::{BTreeSet, HashMap};

pub type AdjacencyMap = HashMap<String, BTreeSet<String>>;

/// Undirected neighbor views over a content graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
    /// Parent/child edges only.
    pub hierarchy: AdjacencyMap,
    /// Hierarchy edges plus resolved outgoing links.
    pub full: AdjacencyMap,
}

impl Adjacency {
    pub fn derive(graph: &ContentGraph) -> Self {
        let mut adjacency = Adjacency::default();
        for node in graph.iter() {
            adjacency.hierarchy.entry(node.id.clone()).or_default();
            adjacency.full.entry(node.id.clone()).or_default();
        }
        for node in graph.iter() {
            if let Some(parent) = node.parent.as_deref() {
                if graph.contains(parent) {
                    adjacency.add_hierarchy_edge(parent, &node.id);
                }
            }
            for target in &node.outgoing_links {
                if graph.contains(target) {
                    link(&mut adjacency.full, &node.id, target);
                }
            }
        }
        adjacency
    }

    /// Attach a designated root above every top-level node so the whole
    /// tree is reachable from it.
    pub fn with_virtual_root(mut self, root_id: &str, graph: &ContentGraph) -> Self {
        if graph.contains(root_id) {
            return self;
        }
        self.hierarchy.entry(root_id.to_string()).or_default();
        self.full.entry(root_id.to_string()).or_default();
        for top in graph.roots() {
            self.add_hierarchy_edge(root_id, top);
        }
        self
    }

    pub fn hierarchy_neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.hierarchy
            .get(id)
            .into_iter()
            .flat_map(|n| n.iter().map(String::as_str))
    }

    pub fn neighbors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.full
            .get(id)
            .into_iter()
            .flat_map(|n| n.iter().map(String::as_str))
    }

    pub fn is_hierarchy_edge(&self, a: &str, b: &str) -> bool {
        self.hierarchy.get(a).is_some_and(|n| n.contains(b))
    }

    fn add_hierarchy_edge(&mut self, a: &str, b: &str) {
        link(&mut self.hierarchy, a, b);
        link(&mut self.full, a, b);
    }
}

fn link(map: &mut AdjacencyMap, a: &str, b: &str) {
    if a == b {
        return;
    }
    map.entry(a.to_string()).or_default().insert(b.to_string());
    map.entry(b.to_string()).or_default().insert(a.to_string());
}
