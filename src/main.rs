use content_graph::document::load_documents;
use content_graph::graph::codec::{to_wire_json, IndexedGraph};
use content_graph::graph::feed::{feed_urls, published_documents};
use content_graph::graph::{build_content_graph, ContentGraph};
use content_graph::gui::GraphViewApp;
use content_graph::logging;
use content_graph::settings::Settings;

use anyhow::{bail, Context};
use eframe::egui;
use std::path::Path;

const SETTINGS_PATH: &str = "settings.json";

const USAGE: &str = "usage:
  content_graph export <documents.json> [out.json]
  content_graph feed <documents.json> [folder]
  content_graph view <documents.json>";

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_PATH)?;
    let _log_guard = logging::init(
        settings.debug_logging,
        settings.log_file.as_deref().map(Path::new),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => bail!("{USAGE}"),
    };
    let Some(docs_path) = rest.first() else {
        bail!("{USAGE}");
    };
    let graph = load_graph(docs_path, &settings)?;

    match command {
        "export" => export(&graph, &settings, rest.get(1).map(String::as_str)),
        "feed" => feed(&graph, &settings, rest.get(1).map(String::as_str)),
        "view" => view(graph, &settings),
        other => bail!("unknown command '{other}'\n{USAGE}"),
    }
}

fn load_graph(path: &str, settings: &Settings) -> anyhow::Result<ContentGraph> {
    let documents =
        load_documents(path).with_context(|| format!("failed to load documents from {path}"))?;
    Ok(build_content_graph(&documents, &settings.build_options())?)
}

fn export(graph: &ContentGraph, settings: &Settings, out: Option<&str>) -> anyhow::Result<()> {
    let indexed =
        IndexedGraph::from_content_graph(graph, &settings.graph.root_id, &settings.graph.root_label);
    let json = to_wire_json(&indexed)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("failed to write {path}"))?;
            tracing::info!(path, nodes = indexed.nodes.len(), "graph exported");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn feed(graph: &ContentGraph, settings: &Settings, folder: Option<&str>) -> anyhow::Result<()> {
    if let Some(folder) = folder {
        if !graph.get(folder).is_some_and(|n| n.is_folder()) {
            bail!("'{folder}' is not a folder");
        }
    }
    for node in published_documents(graph, folder, None) {
        let date = node
            .published()
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!("{date}  {}  {}", node.id, node.title);
    }
    if let Some(site) = settings.graph.site_url.as_deref() {
        let urls = feed_urls(site, folder);
        println!("rss:  {}\natom: {}\njson: {}", urls.rss, urls.atom, urls.json);
    }
    Ok(())
}

fn view(graph: ContentGraph, settings: &Settings) -> anyhow::Result<()> {
    let (w, h) = settings.view.window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w, h])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };
    let app = GraphViewApp::new(graph, settings.session_config(), settings.view.clone());
    eframe::run_native(
        "Content Graph",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
