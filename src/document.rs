use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content kinds recognised from the first tag of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Observations,
    Notes,
    Thoughts,
}

impl ContentKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "observations" => Some(ContentKind::Observations),
            "notes" => Some(ContentKind::Notes),
            "thoughts" => Some(ContentKind::Thoughts),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Publish date. Documents without one are drafts and never reach feeds.
    #[serde(default, alias = "publishedDate")]
    pub published: Option<NaiveDate>,
}

impl DocumentMetadata {
    pub fn kind(&self) -> Option<ContentKind> {
        self.tags.first().and_then(|tag| ContentKind::from_tag(tag))
    }
}

/// A link reference as handed over by the document loader.
///
/// The loader sees several link shapes in the markup; each one is captured
/// here once so the graph builder only has to ask for a raw target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LinkSource {
    WikiLink {
        #[serde(default)]
        permalink: Option<String>,
    },
    Markdown {
        href: String,
    },
    Raw {
        target: String,
    },
}

pub trait LinkTarget {
    /// Unnormalized target of the link, if it has one.
    fn raw_target(&self) -> Option<&str>;
}

impl LinkTarget for LinkSource {
    fn raw_target(&self) -> Option<&str> {
        match self {
            LinkSource::WikiLink { permalink } => permalink.as_deref(),
            LinkSource::Markdown { href } => Some(href.as_str()),
            LinkSource::Raw { target } => Some(target.as_str()),
        }
    }
}

impl From<&str> for LinkSource {
    fn from(target: &str) -> Self {
        LinkSource::Raw {
            target: target.to_string(),
        }
    }
}

/// Loaders may hand links over as bare strings or as shaped objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum LinkEntry {
    Bare(String),
    Shaped(LinkSource),
}

fn deserialize_links<'de, D>(deserializer: D) -> Result<Vec<LinkSource>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<LinkEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            LinkEntry::Bare(target) => LinkSource::Raw { target },
            LinkEntry::Shaped(link) => link,
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Hierarchical path such as `notes/rust/ownership`.
    pub id: String,
    #[serde(default)]
    pub metadata: DocumentMetadata,
    #[serde(default, deserialize_with = "deserialize_links")]
    pub extracted_links: Vec<LinkSource>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, created_time: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: DocumentMetadata::default(),
            extracted_links: Vec::new(),
            created_time: Some(created_time.into()),
            last_modified: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extracted_links = links
            .into_iter()
            .map(|l| LinkSource::from(l.as_ref()))
            .collect();
        self
    }

    pub fn with_published(mut self, date: NaiveDate) -> Self {
        self.metadata.published = Some(date);
        self
    }

    pub fn raw_links(&self) -> impl Iterator<Item = &str> {
        self.extracted_links.iter().filter_map(|l| l.raw_target())
    }
}

/// Parsed provenance timestamps for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provenance {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvenanceError {
    Missing {
        document: String,
    },
    Invalid {
        document: String,
        created: Option<String>,
        modified: Option<String>,
    },
}

impl std::fmt::Display for ProvenanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvenanceError::Missing { document } => {
                write!(f, "document '{document}' has no creation time")
            }
            ProvenanceError::Invalid {
                document,
                created,
                modified,
            } => write!(
                f,
                "document '{document}' has invalid provenance (created: {}, modified: {})",
                created.as_deref().unwrap_or("<none>"),
                modified.as_deref().unwrap_or("<none>")
            ),
        }
    }
}

impl std::error::Error for ProvenanceError {}

impl Document {
    /// Resolve the creation and modification timestamps.
    ///
    /// A document that only carries a modification time uses it as its
    /// creation time; a document with neither is rejected.
    pub fn provenance(&self) -> Result<Provenance, ProvenanceError> {
        let created_raw = non_empty(self.created_time.as_deref());
        let modified_raw = non_empty(self.last_modified.as_deref());

        let invalid = || ProvenanceError::Invalid {
            document: self.id.clone(),
            created: self.created_time.clone(),
            modified: self.last_modified.clone(),
        };

        let created_src = match (created_raw, modified_raw) {
            (Some(c), _) => c,
            (None, Some(m)) => m,
            (None, None) => {
                return Err(ProvenanceError::Missing {
                    document: self.id.clone(),
                })
            }
        };
        let created = parse_timestamp(created_src).ok_or_else(invalid)?;
        let modified = match modified_raw {
            Some(m) => parse_timestamp(m).ok_or_else(invalid)?,
            None => created,
        };
        Ok(Provenance { created, modified })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Accepts RFC 3339 timestamps (as printed by `git log --format=%cI`) and
/// bare `YYYY-MM-DD` dates, which are taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Load the JSON document manifest produced by the content loader.
pub fn load_documents(path: impl AsRef<Path>) -> anyhow::Result<Vec<Document>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let docs: Vec<Document> = serde_json::from_str(&content)?;
    tracing::debug!(count = docs.len(), path = %path.display(), "loaded documents");
    Ok(docs)
}
