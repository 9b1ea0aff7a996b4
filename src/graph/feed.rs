use crate::graph::index::{ContentGraph, ContentNode};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedUrls {
    pub rss: String,
    pub atom: String,
    pub json: String,
}

/// Feed locations for the whole site or for one folder.
pub fn feed_urls(site_url: &str, folder: Option<&str>) -> FeedUrls {
    let base = if site_url.ends_with('/') {
        site_url.to_string()
    } else {
        format!("{site_url}/")
    };
    match folder {
        Some(path) => FeedUrls {
            rss: format!("{base}posts/{path}.rss"),
            atom: format!("{base}posts/{path}.atom"),
            json: format!("{base}posts/{path}.json"),
        },
        None => FeedUrls {
            rss: format!("{base}feed.rss"),
            atom: format!("{base}feed.atom"),
            json: format!("{base}feed.json"),
        },
    }
}

/// Published documents, newest first.
///
/// Without a folder every published document except folder notes is listed.
/// With a folder its children are walked recursively; folder notes are not
/// children and so are skipped there too.
pub fn published_documents<'g>(
    graph: &'g ContentGraph,
    folder: Option<&str>,
    limit: Option<usize>,
) -> Vec<&'g ContentNode> {
    let mut posts: Vec<&ContentNode> = match folder {
        None => graph
            .iter()
            .filter(|n| !n.is_folder() && !n.is_folder_note && n.published().is_some())
            .collect(),
        Some(folder_id) => {
            let mut out = Vec::new();
            let mut stack: Vec<&str> = graph
                .get(folder_id)
                .map(|n| n.children.iter().rev().map(String::as_str).collect())
                .unwrap_or_default();
            while let Some(id) = stack.pop() {
                let Some(node) = graph.get(id) else {
                    continue;
                };
                if node.is_folder() {
                    stack.extend(node.children.iter().rev().map(String::as_str));
                } else if node.published().is_some() {
                    out.push(node);
                }
            }
            out
        }
    };

    posts.sort_by(|a, b| b.published().cmp(&a.published()).then_with(|| a.id.cmp(&b.id)));
    if let Some(limit) = limit {
        posts.truncate(limit);
    }
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use chrono::NaiveDate;

    fn post(id: &str, published: Option<(i32, u32, u32)>) -> Document {
        let doc = Document::new(id, "2024-01-01");
        match published.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)) {
            Some(date) => doc.with_published(date),
            None => doc,
        }
    }

    fn graph() -> ContentGraph {
        ContentGraph::build(&[
            post("blog/blog", Some((2024, 5, 1))),
            post("blog/old", Some((2023, 1, 1))),
            post("blog/rust/ownership", Some((2024, 3, 1))),
            post("blog/draft", None),
            post("about", Some((2022, 6, 1))),
        ])
        .expect("build")
    }

    #[test]
    fn site_feed_lists_published_newest_first() {
        let g = graph();
        let ids: Vec<_> = published_documents(&g, None, None)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["blog/rust/ownership", "blog/old", "about"]);
    }

    #[test]
    fn folder_feed_walks_subfolders_and_respects_limit() {
        let g = graph();
        let ids: Vec<_> = published_documents(&g, Some("blog"), Some(1))
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["blog/rust/ownership"]);
        assert!(published_documents(&g, Some("nope"), None).is_empty());
    }

    #[test]
    fn feed_urls_for_folder_and_site() {
        let urls = feed_urls("https://example.org", Some("blog/rust"));
        assert_eq!(urls.rss, "https://example.org/posts/blog/rust.rss");
        assert_eq!(feed_urls("https://example.org/", None).json, "https://example.org/feed.json");
    }
}
