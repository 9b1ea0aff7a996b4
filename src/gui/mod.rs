mod graph_view;

pub use graph_view::GraphViewApp;
