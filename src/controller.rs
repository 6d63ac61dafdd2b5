//! Async drivers for sessions outside the TUI store
//!
//! Fetches run concurrently; applying a result and publishing the new state
//! happen together under the session lock, so observers never go backwards.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};
use tui_dispatch::DataResource;

use crate::query::QueryClient;
use crate::session::{DetailSession, SearchRequest, SearchSession};
use crate::state::{DetailRecord, SearchItem};

pub type SearchUpdates = watch::Receiver<DataResource<Vec<SearchItem>>>;
pub type DetailUpdates = watch::Receiver<DataResource<DetailRecord>>;

#[derive(Clone)]
pub struct SearchController {
    client: QueryClient,
    session: Arc<Mutex<SearchSession>>,
    updates: Arc<watch::Sender<DataResource<Vec<SearchItem>>>>,
}

impl SearchController {
    pub fn new(client: QueryClient, page_size: u32) -> Self {
        let (updates, _) = watch::channel(DataResource::Empty);
        Self {
            client,
            session: Arc::new(Mutex::new(SearchSession::new(page_size))),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> SearchUpdates {
        self.updates.subscribe()
    }

    /// Run a new search. Returns whether this call's result was applied.
    pub async fn new_search(&self, keyword: &str) -> bool {
        let request = {
            let mut session = self.session.lock().await;
            let Some(request) = session.new_search(keyword) else {
                return false;
            };
            self.publish(&session);
            request
        };
        self.run(request).await
    }

    /// Load and append the next page. Returns whether the result was applied.
    pub async fn next_page(&self, keyword: &str) -> bool {
        let request = {
            let mut session = self.session.lock().await;
            let request = session.next_page(keyword);
            self.publish(&session);
            request
        };
        self.run(request).await
    }

    pub async fn items(&self) -> Vec<SearchItem> {
        self.session.lock().await.items().to_vec()
    }

    pub async fn snapshot(&self) -> DataResource<Vec<SearchItem>> {
        self.session.lock().await.state().clone()
    }

    async fn run(&self, request: SearchRequest) -> bool {
        debug!(
            request_id = request.id,
            keyword = %request.keyword,
            offset = request.offset,
            "search issued"
        );
        let result = self
            .client
            .search_species(&request.keyword, request.offset, request.limit)
            .await;

        let mut session = self.session.lock().await;
        let applied = match result {
            Ok(records) => session.complete(request.id, &records),
            Err(err) => {
                warn!(request_id = request.id, error = %err, "search failed");
                session.fail(request.id, err.to_string())
            }
        };
        if applied {
            self.publish(&session);
        }
        applied
    }

    fn publish(&self, session: &SearchSession) {
        self.updates.send_replace(session.state().clone());
    }
}

#[derive(Clone)]
pub struct DetailController {
    client: QueryClient,
    session: Arc<Mutex<DetailSession>>,
    updates: Arc<watch::Sender<DataResource<DetailRecord>>>,
}

impl DetailController {
    pub fn new(client: QueryClient) -> Self {
        let (updates, _) = watch::channel(DataResource::Empty);
        Self {
            client,
            session: Arc::new(Mutex::new(DetailSession::new())),
            updates: Arc::new(updates),
        }
    }

    pub fn subscribe(&self) -> DetailUpdates {
        self.updates.subscribe()
    }

    pub async fn load(&self, name: &str) -> bool {
        let request = {
            let mut session = self.session.lock().await;
            let request = session.load(name);
            self.updates.send_replace(session.state().clone());
            request
        };

        let result = self.client.fetch_abilities(&request.name).await;

        let mut session = self.session.lock().await;
        let applied = match result {
            Ok(response) => session.complete(request.id, &response),
            Err(err) => {
                warn!(request_id = request.id, name = %request.name, error = %err, "abilities fetch failed");
                session.fail(request.id, err.to_string())
            }
        };
        if applied {
            self.updates.send_replace(session.state().clone());
        }
        applied
    }

    pub async fn snapshot(&self) -> DataResource<DetailRecord> {
        self.session.lock().await.state().clone()
    }
}
