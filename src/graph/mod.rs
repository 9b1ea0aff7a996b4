pub mod adjacency;
pub mod codec;
pub mod depth;
pub mod feed;
pub mod index;
pub mod interaction;
pub mod layout;
pub mod link;
pub mod view;

pub use index::{build_content_graph, BuildOptions, ContentGraph, ContentNode, NodeKind};
pub use interaction::{GraphEvent, GraphSession, InteractionState, SessionConfig, ROOT_NODE_ID};
