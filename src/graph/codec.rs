//! Index-based transport shape of the content graph.
//!
//! `IndexedGraph` is the in-memory form handed to a renderer; `CompactGraph`
//! is the same data with single-letter keys and is the only shape that is
//! ever serialized.

use crate::graph::index::ContentGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedGraphNode {
    pub index: usize,
    pub name: String,
    pub is_folder: bool,
    pub initial_depth: u32,
    pub parent_index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedGraph {
    pub nodes: Vec<IndexedGraphNode>,
    pub hierarchical_links: Vec<(usize, usize)>,
    pub backlinks: Vec<(usize, usize)>,
    pub root_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactNode {
    #[serde(rename = "i")]
    pub index: usize,
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "f")]
    pub is_folder: bool,
    #[serde(rename = "d")]
    pub depth: u32,
    #[serde(rename = "p", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactGraph {
    #[serde(rename = "n")]
    pub nodes: Vec<CompactNode>,
    #[serde(rename = "h")]
    pub hierarchy: Vec<(usize, usize)>,
    #[serde(rename = "b")]
    pub backlinks: Vec<(usize, usize)>,
    #[serde(rename = "r")]
    pub root: usize,
}

#[derive(Debug)]
pub enum CodecError {
    MissingRoot,
    IndexOutOfRange {
        field: &'static str,
        index: usize,
        len: usize,
    },
    Json(serde_json::Error),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::MissingRoot => write!(f, "graph has no nodes; root index is unresolvable"),
            CodecError::IndexOutOfRange { field, index, len } => {
                write!(f, "{field} index {index} out of range for {len} nodes")
            }
            CodecError::Json(e) => write!(f, "malformed graph json: {e}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

impl IndexedGraph {
    /// Index a content graph for export.
    ///
    /// The root takes index 0 and every graph node follows in id order.
    /// When `root_id` is not a graph node a synthetic folder labelled
    /// `root_label` is added and parents every top-level node. A nested
    /// graph node used as root keeps the edge to its real parent, and
    /// `initial_depth` is the hierarchy distance from the root.
    pub fn from_content_graph(graph: &ContentGraph, root_id: &str, root_label: &str) -> Self {
        let virtual_root = !graph.contains(root_id);
        let mut ids: Vec<&str> = Vec::with_capacity(graph.len() + 1);
        ids.push(root_id);
        ids.extend(graph.ids().filter(|id| *id != root_id));
        let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        let parent_of = |id: &str| -> Option<usize> {
            if id == root_id {
                return None;
            }
            match graph.get(id).and_then(|n| n.parent.as_deref()) {
                Some(parent) => index.get(parent).copied(),
                None if virtual_root => Some(0),
                None => None,
            }
        };

        let mut nodes = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            let (name, is_folder) = match graph.get(id) {
                Some(node) => (node.title.clone(), node.is_folder()),
                None => (root_label.to_string(), true),
            };
            let mut depth = 0;
            let mut cursor = parent_of(id);
            while let Some(p) = cursor {
                depth += 1;
                cursor = parent_of(ids[p]);
            }
            nodes.push(IndexedGraphNode {
                index: i,
                name,
                is_folder,
                initial_depth: depth,
                parent_index: parent_of(id),
            });
        }

        let mut hierarchical_links: Vec<(usize, usize)> = nodes
            .iter()
            .filter_map(|n| n.parent_index.map(|p| (p, n.index)))
            .collect();
        if !virtual_root {
            let root_parent = graph
                .get(root_id)
                .and_then(|n| n.parent.as_deref())
                .and_then(|p| index.get(p).copied());
            if let Some(parent) = root_parent {
                hierarchical_links.push((parent, 0));
            }
        }
        // Nodes the root cannot reach keep their ancestor-chain depth.
        let reachable = hierarchy_depths(nodes.len(), &hierarchical_links, 0);
        for (node, depth) in nodes.iter_mut().zip(reachable) {
            if let Some(depth) = depth {
                node.initial_depth = depth;
            }
        }
        let mut seen: HashSet<(usize, usize)> = hierarchical_links
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();

        let mut backlinks = Vec::new();
        for node in graph.iter() {
            let Some(&source) = index.get(node.id.as_str()) else {
                continue;
            };
            for target in &node.outgoing_links {
                let Some(&target) = index.get(target.as_str()) else {
                    continue;
                };
                if source != target && seen.insert((source.min(target), source.max(target))) {
                    backlinks.push((source, target));
                }
            }
        }

        IndexedGraph {
            nodes,
            hierarchical_links,
            backlinks,
            root_index: 0,
        }
    }
}

fn hierarchy_depths(len: usize, links: &[(usize, usize)], root: usize) -> Vec<Option<u32>> {
    let mut neighbors = vec![Vec::new(); len];
    for &(a, b) in links {
        neighbors[a].push(b);
        neighbors[b].push(a);
    }
    let mut depths = vec![None; len];
    if root >= len {
        return depths;
    }
    depths[root] = Some(0);
    let mut queue = VecDeque::from([(root, 0u32)]);
    while let Some((i, depth)) = queue.pop_front() {
        for &n in &neighbors[i] {
            if depths[n].is_none() {
                depths[n] = Some(depth + 1);
                queue.push_back((n, depth + 1));
            }
        }
    }
    depths
}

pub fn compress(graph: &IndexedGraph) -> CompactGraph {
    CompactGraph {
        nodes: graph
            .nodes
            .iter()
            .map(|n| CompactNode {
                index: n.index,
                name: n.name.clone(),
                is_folder: n.is_folder,
                depth: n.initial_depth,
                parent: n.parent_index,
            })
            .collect(),
        hierarchy: graph.hierarchical_links.clone(),
        backlinks: graph.backlinks.clone(),
        root: graph.root_index,
    }
}

/// Inverse of [`compress`]. Rejects any index that does not address a node.
pub fn decompress(compact: CompactGraph) -> Result<IndexedGraph, CodecError> {
    let len = compact.nodes.len();
    if len == 0 {
        return Err(CodecError::MissingRoot);
    }
    let check = |field: &'static str, index: usize| {
        if index < len {
            Ok(index)
        } else {
            Err(CodecError::IndexOutOfRange { field, index, len })
        }
    };

    check("root", compact.root)?;
    for node in &compact.nodes {
        check("node", node.index)?;
        if let Some(p) = node.parent {
            check("parent", p)?;
        }
    }
    for &(a, b) in &compact.hierarchy {
        check("hierarchy", a)?;
        check("hierarchy", b)?;
    }
    for &(a, b) in &compact.backlinks {
        check("backlink", a)?;
        check("backlink", b)?;
    }

    Ok(IndexedGraph {
        nodes: compact
            .nodes
            .into_iter()
            .map(|n| IndexedGraphNode {
                index: n.index,
                name: n.name,
                is_folder: n.is_folder,
                initial_depth: n.depth,
                parent_index: n.parent,
            })
            .collect(),
        hierarchical_links: compact.hierarchy,
        backlinks: compact.backlinks,
        root_index: compact.root,
    })
}

pub fn to_wire_json(graph: &IndexedGraph) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&compress(graph))?)
}

pub fn from_wire_json(json: &str) -> Result<IndexedGraph, CodecError> {
    let compact: CompactGraph = serde_json::from_str(json)?;
    decompress(compact)
}
