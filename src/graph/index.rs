use crate::document::{Document, DocumentMetadata, Provenance, ProvenanceError};
use crate::graph::link::{normalize_link, DEFAULT_ROUTING_PREFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Document,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContentNode {
    /// Hierarchical path, unique across the graph.
    pub id: String,
    pub title: String,
    pub kind: NodeKind,
    pub is_folder_note: bool,
    /// Set on a folder whose content is supplied by a folder-note document.
    pub content_path: Option<String>,
    /// `None` for synthesized folders.
    pub metadata: Option<DocumentMetadata>,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub outgoing_links: BTreeSet<String>,
    pub backlinks: BTreeSet<String>,
    pub created_time: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl ContentNode {
    fn folder(id: String, title: &str, parent: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.to_string(),
            kind: NodeKind::Folder,
            is_folder_note: false,
            content_path: None,
            metadata: None,
            parent,
            children: Vec::new(),
            outgoing_links: BTreeSet::new(),
            backlinks: BTreeSet::new(),
            created_time: now,
            last_modified: now,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A folder that never received content from a document.
    pub fn is_synthetic(&self) -> bool {
        self.metadata.is_none()
    }

    pub fn published(&self) -> Option<chrono::NaiveDate> {
        self.metadata.as_ref().and_then(|m| m.published)
    }

    /// Equality over edges and flags. Timestamps of synthetic folders are
    /// taken from the build clock and excluded.
    pub fn same_structure(&self, other: &ContentNode) -> bool {
        let times_match = (self.is_synthetic() && other.is_synthetic())
            || (self.created_time == other.created_time
                && self.last_modified == other.last_modified);
        self.id == other.id
            && self.title == other.title
            && self.kind == other.kind
            && self.is_folder_note == other.is_folder_note
            && self.content_path == other.content_path
            && self.metadata == other.metadata
            && self.parent == other.parent
            && self.children == other.children
            && self.outgoing_links == other.outgoing_links
            && self.backlinks == other.backlinks
            && times_match
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub routing_prefixes: Vec<String>,
    /// Sort folder children lexically once the graph is complete.
    pub sort_children: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            routing_prefixes: vec![DEFAULT_ROUTING_PREFIX.to_string()],
            sort_children: true,
        }
    }
}

/// Per-document result of the independent derivation phase.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedDocument {
    pub id: String,
    pub title: String,
    pub metadata: DocumentMetadata,
    pub outgoing_links: BTreeSet<String>,
    pub provenance: Provenance,
}

pub fn prepare_document(
    doc: &Document,
    options: &BuildOptions,
) -> Result<PreparedDocument, ProvenanceError> {
    let provenance = doc.provenance()?;
    let id = doc.id.trim_matches('/').to_string();
    let title = doc
        .metadata
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| last_segment(&id).to_string());
    let outgoing_links = doc
        .raw_links()
        .filter_map(|raw| normalize_link(raw, &options.routing_prefixes))
        .filter(|target| *target != id)
        .collect();
    Ok(PreparedDocument {
        id,
        title,
        metadata: doc.metadata.clone(),
        outgoing_links,
        provenance,
    })
}

/// The derived folder/document graph keyed by node id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentGraph {
    nodes: BTreeMap<String, ContentNode>,
}

impl ContentGraph {
    pub fn build(documents: &[Document]) -> Result<Self, ProvenanceError> {
        build_content_graph(documents, &BuildOptions::default())
    }

    pub fn get(&self, id: &str) -> Option<&ContentNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentNode> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub fn children_of(&self, id: &str) -> impl Iterator<Item = &ContentNode> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|child| self.nodes.get(child))
    }

    pub fn folder_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_folder()).count()
    }

    pub fn document_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.is_folder()).count()
    }

    pub fn structurally_eq(&self, other: &ContentGraph) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .all(|(id, node)| other.nodes.get(id).is_some_and(|o| node.same_structure(o)))
    }

    /// Apply one prepared document. Prefix folders are created on first
    /// sight only; repeated application of the same document is a no-op.
    fn apply(&mut self, doc: PreparedDocument, now: DateTime<Utc>) {
        let segments: Vec<&str> = doc.id.split('/').collect();
        let mut parent: Option<String> = None;
        let mut current = String::new();

        for segment in &segments[..segments.len().saturating_sub(1)] {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(segment);

            match self.nodes.get_mut(&current) {
                Some(existing) => existing.kind = NodeKind::Folder,
                None => {
                    let folder = ContentNode::folder(current.clone(), segment, parent.clone(), now);
                    self.nodes.insert(current.clone(), folder);
                }
            }
            if let Some(p) = parent.as_deref() {
                self.attach_child(p, &current);
            }
            parent = Some(current.clone());
        }

        let id = doc.id.clone();
        match self.nodes.get_mut(&id) {
            // The path is also a folder prefix of another document: the
            // folder keeps its kind and children and takes this content.
            Some(existing) => {
                existing.title = doc.title;
                existing.metadata = Some(doc.metadata);
                existing.outgoing_links = doc.outgoing_links;
                existing.created_time = doc.provenance.created;
                existing.last_modified = doc.provenance.modified;
                existing.parent = parent.clone();
            }
            None => {
                let node = ContentNode {
                    id: id.clone(),
                    title: doc.title,
                    kind: NodeKind::Document,
                    is_folder_note: false,
                    content_path: None,
                    metadata: Some(doc.metadata),
                    parent: parent.clone(),
                    children: Vec::new(),
                    outgoing_links: doc.outgoing_links,
                    backlinks: BTreeSet::new(),
                    created_time: doc.provenance.created,
                    last_modified: doc.provenance.modified,
                };
                self.nodes.insert(id.clone(), node);
            }
        }

        let Some(parent_id) = parent else {
            return;
        };
        self.attach_child(&parent_id, &id);

        // The folder keeps its own title; the note only supplies content.
        if last_segment(&id) == last_segment(&parent_id) {
            if let Some(folder) = self.nodes.get_mut(&parent_id) {
                folder.is_folder_note = true;
                folder.content_path = Some(id.clone());
                folder.children.retain(|c| *c != id);
            }
            if let Some(note) = self.nodes.get_mut(&id) {
                note.is_folder_note = true;
            }
        }
    }

    fn attach_child(&mut self, parent: &str, child: &str) {
        if parent == child {
            return;
        }
        let is_folder_note = self
            .nodes
            .get(parent)
            .is_some_and(|p| p.content_path.as_deref() == Some(child));
        if is_folder_note {
            return;
        }
        if let Some(p) = self.nodes.get_mut(parent) {
            if !p.children.iter().any(|c| c == child) {
                p.children.push(child.to_string());
            }
        }
    }

    /// Rebuild every backlink set from the outgoing links. Targets that are
    /// not in the graph are dropped. Returns the number of dropped links.
    fn resolve_backlinks(&mut self) -> usize {
        let mut edges: Vec<(String, String)> = Vec::new();
        let mut dangling = 0;
        for node in self.nodes.values() {
            for target in &node.outgoing_links {
                if target != &node.id && self.nodes.contains_key(target) {
                    edges.push((target.clone(), node.id.clone()));
                } else {
                    dangling += 1;
                }
            }
        }
        for node in self.nodes.values_mut() {
            node.backlinks.clear();
        }
        for (target, source) in edges {
            if let Some(node) = self.nodes.get_mut(&target) {
                node.backlinks.insert(source);
            }
        }
        dangling
    }

    fn sort_children(&mut self) {
        for node in self.nodes.values_mut() {
            node.children.sort();
        }
    }
}

/// Build the content graph from an unordered document list.
///
/// Per-document work (provenance, link normalization) runs first and fails
/// the whole build on the first document without valid provenance. The
/// results are then folded into the graph one at a time.
pub fn build_content_graph(
    documents: &[Document],
    options: &BuildOptions,
) -> Result<ContentGraph, ProvenanceError> {
    let prepared = documents
        .iter()
        .map(|doc| prepare_document(doc, options))
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    let mut graph = ContentGraph::default();
    for doc in prepared {
        if doc.id.is_empty() {
            continue;
        }
        graph.apply(doc, now);
    }

    let dangling = graph.resolve_backlinks();
    if options.sort_children {
        graph.sort_children();
    }

    let folder_notes = graph
        .iter()
        .filter(|n| n.is_folder() && n.content_path.is_some())
        .count();
    info!(
        nodes = graph.len(),
        folders = graph.folder_count(),
        documents = graph.document_count(),
        folder_notes,
        "content graph built"
    );
    debug!(dangling, "unresolved outgoing links dropped");
    Ok(graph)
}

fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
