use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::{debug, info, warn};

use crate::graph::{FetchFailure, GraphSource, RawGraph};

type FetchResult = Result<RawGraph, FetchFailure>;

/// Runs graph fetches on worker threads and hands back only the response to
/// the most recently issued request.
pub struct GraphLoader {
    source: Arc<dyn GraphSource>,
    tx: Sender<(u64, FetchResult)>,
    rx: Receiver<(u64, FetchResult)>,
    latest_token: u64,
    loading: bool,
}

impl GraphLoader {
    pub fn new(source: Arc<dyn GraphSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            latest_token: 0,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts a fetch unless the collection id is missing or empty.
    pub fn request(&mut self, collection_id: Option<&str>) -> Option<u64> {
        let collection_id = collection_id
            .map(str::trim)
            .filter(|id| !id.is_empty())?
            .to_owned();

        self.latest_token += 1;
        let token = self.latest_token;
        self.loading = true;

        info!(
            collection = %collection_id,
            source = %self.source.describe(),
            token,
            "fetching graph"
        );

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = source
                .fetch(&collection_id)
                .map_err(|error| FetchFailure::new(&collection_id, &error));
            let _ = tx.send((token, result));
        });

        Some(token)
    }

    pub fn poll(&mut self) -> Option<FetchResult> {
        let mut accepted = None;
        loop {
            match self.rx.try_recv() {
                Ok((token, result)) => {
                    if token != self.latest_token {
                        debug!(token, latest = self.latest_token, "discarding stale graph response");
                        continue;
                    }

                    self.loading = false;
                    match &result {
                        Ok(graph) => info!(
                            nodes = graph.nodes.len(),
                            edges = graph.edges.len(),
                            "graph fetched"
                        ),
                        Err(failure) => warn!(%failure, "graph fetch failed; keeping previous graph"),
                    }
                    accepted = Some(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::{Result, anyhow};

    use super::*;
    use crate::graph::RawNode;

    struct ScriptedSource;

    impl GraphSource for ScriptedSource {
        fn fetch(&self, collection_id: &str) -> Result<RawGraph> {
            if collection_id == "slow" {
                thread::sleep(Duration::from_millis(150));
            }
            if collection_id == "broken" {
                return Err(anyhow!("connection refused"));
            }

            Ok(RawGraph {
                nodes: vec![RawNode {
                    id: collection_id.to_owned(),
                    properties: None,
                }],
                edges: Vec::new(),
            })
        }

        fn describe(&self) -> String {
            "scripted".to_owned()
        }
    }

    fn wait_for(loader: &mut GraphLoader) -> FetchResult {
        for _ in 0..400 {
            if let Some(result) = loader.poll() {
                return result;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("loader produced no result");
    }

    #[test]
    fn missing_collection_performs_no_fetch() {
        let mut loader = GraphLoader::new(Arc::new(ScriptedSource));
        assert_eq!(loader.request(None), None);
        assert_eq!(loader.request(Some("  ")), None);
        assert!(!loader.is_loading());
    }

    #[test]
    fn delivers_result_and_clears_loading() {
        let mut loader = GraphLoader::new(Arc::new(ScriptedSource));
        assert_eq!(loader.request(Some("col")), Some(1));
        assert!(loader.is_loading());

        let graph = wait_for(&mut loader).expect("fetch succeeds");
        assert_eq!(graph.nodes[0].id, "col");
        assert!(!loader.is_loading());
    }

    #[test]
    fn failure_clears_loading() {
        let mut loader = GraphLoader::new(Arc::new(ScriptedSource));
        loader.request(Some("broken"));

        let failure = wait_for(&mut loader).expect_err("fetch fails");
        assert_eq!(failure.collection_id, "broken");
        assert!(failure.reason.contains("connection refused"));
        assert!(!loader.is_loading());
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut loader = GraphLoader::new(Arc::new(ScriptedSource));
        loader.request(Some("slow"));
        loader.request(Some("fast"));

        let graph = wait_for(&mut loader).expect("latest succeeds");
        assert_eq!(graph.nodes[0].id, "fast");

        thread::sleep(Duration::from_millis(300));
        assert!(loader.poll().is_none());
        assert!(!loader.is_loading());
    }
}
