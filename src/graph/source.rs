use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Url;
use thiserror::Error;

use super::payload::{RawGraph, parse_graph_payload};

/// The one failure the graph widget observes. Recovered locally by keeping the
/// previously displayed graph.
#[derive(Clone, Debug, Error)]
#[error("failed to fetch graph for collection {collection_id}: {reason}")]
pub struct FetchFailure {
    pub collection_id: String,
    pub reason: String,
}

impl FetchFailure {
    pub fn new(collection_id: &str, error: &anyhow::Error) -> Self {
        Self {
            collection_id: collection_id.to_owned(),
            reason: format!("{error:#}"),
        }
    }
}

pub trait GraphSource: Send + Sync {
    fn fetch(&self, collection_id: &str) -> Result<RawGraph>;

    fn describe(&self) -> String;
}

/// Overview-mode parameters forwarded to the graph endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphQuery {
    pub label: String,
    pub max_nodes: u32,
    pub max_depth: u32,
}

impl Default for GraphQuery {
    fn default() -> Self {
        Self {
            label: "*".to_owned(),
            max_nodes: 1000,
            max_depth: 3,
        }
    }
}

pub struct HttpGraphSource {
    client: reqwest::blocking::Client,
    base_url: Url,
    query: GraphQuery,
    api_key: Option<String>,
}

impl HttpGraphSource {
    pub fn new(base_url: &str, query: GraphQuery, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow!("failed to build http client: {e}"))?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid graph server url {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("graph server url {base_url} cannot carry a path"));
        }

        Ok(Self {
            client,
            base_url,
            query,
            api_key,
        })
    }

    /// The collection id is pushed as a single percent-encoded path segment.
    pub fn graph_url(&self, collection_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("collections")
                .push(collection_id)
                .push("graphs");
        }
        url
    }
}

impl GraphSource for HttpGraphSource {
    fn fetch(&self, collection_id: &str) -> Result<RawGraph> {
        let url = self.graph_url(collection_id);
        let mut request = self.client.get(url.clone()).query(&[
            ("label", self.query.label.clone()),
            ("max_nodes", self.query.max_nodes.to_string()),
            ("max_depth", self.query.max_depth.to_string()),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .with_context(|| format!("failed to reach graph endpoint at {url}"))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!("graph endpoint returned {status}: {body}"));
        }

        let body = response
            .text()
            .context("graph endpoint response was not valid text")?;
        parse_graph_payload(&body)
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Reads the endpoint's payload shape from a JSON file on disk.
pub struct FileGraphSource {
    path: PathBuf,
}

impl FileGraphSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphSource for FileGraphSource {
    fn fetch(&self, _collection_id: &str) -> Result<RawGraph> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read graph file {}", self.path.display()))?;
        parse_graph_payload(&raw)
            .with_context(|| format!("failed to parse graph file {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn graph_url_joins_collection_segment() {
        let source = HttpGraphSource::new("http://localhost:8000/api/v1/", GraphQuery::default(), None)
            .expect("client builds");
        assert_eq!(
            source.graph_url("col42").as_str(),
            "http://localhost:8000/api/v1/collections/col42/graphs"
        );
    }

    #[test]
    fn graph_url_encodes_reserved_characters_in_collection_id() {
        let source = HttpGraphSource::new("http://localhost:8000/api/v1", GraphQuery::default(), None)
            .expect("client builds");
        let url = source.graph_url("a/b?c#d e");

        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/collections/a%2Fb%3Fc%23d%20e/graphs"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn rejects_unparseable_server_url() {
        assert!(HttpGraphSource::new("not a url", GraphQuery::default(), None).is_err());
    }

    #[test]
    fn file_source_reads_payload() {
        let path = std::env::temp_dir().join(format!("entity-graph-{}.json", std::process::id()));
        let mut file = fs::File::create(&path).expect("temp file");
        file.write_all(br#"{"nodes": [{"id": "A"}], "edges": []}"#)
            .expect("write payload");

        let graph = FileGraphSource::new(&path).fetch("local").expect("reads");
        assert_eq!(graph.nodes.len(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_becomes_fetch_failure() {
        let source = FileGraphSource::new("/definitely/not/here.json");
        let error = source.fetch("local").expect_err("missing file fails");
        let failure = FetchFailure::new("local", &error);

        assert_eq!(failure.collection_id, "local");
        assert!(failure.reason.contains("failed to read graph file"));
        assert!(failure.to_string().starts_with("failed to fetch graph for collection local"));
    }
}
