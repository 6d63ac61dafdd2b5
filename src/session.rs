//! Search and detail sessions
//!
//! A session owns its accumulated results and hands out tagged requests.
//! Fetching happens elsewhere; results come back through `complete`/`fail`
//! and are applied only if their id is the latest one issued.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tui_dispatch::DataResource;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::mapper::{to_ability_names, to_search_item};
use crate::query::{RawDetailResponse, RawSpecies};
use crate::state::{DetailRecord, SearchItem};

/// Offset/limit pair for paged searches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageCursor {
    pub offset: u32,
    pub page_size: u32,
}

impl PageCursor {
    pub fn new(page_size: u32) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.page_size);
    }
}

/// How a completed page is merged into the accumulated list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PageMode {
    Replace,
    Append,
}

/// A search fetch to perform on behalf of a [`SearchSession`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    pub id: u64,
    pub keyword: String,
    pub offset: u32,
    pub limit: u32,
    pub mode: PageMode,
}

/// An abilities fetch to perform on behalf of a [`DetailSession`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailRequest {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
struct PendingPage {
    id: u64,
    mode: PageMode,
}

// ============================================================================
// SearchSession
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchSession {
    keyword: String,
    cursor: PageCursor,
    items: Vec<SearchItem>,
    state: DataResource<Vec<SearchItem>>,
    last_issued: u64,
    pending: Option<PendingPage>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SearchSession {
    pub fn new(page_size: u32) -> Self {
        Self {
            keyword: String::new(),
            cursor: PageCursor::new(page_size),
            items: Vec::new(),
            state: DataResource::Empty,
            last_issued: 0,
            pending: None,
        }
    }

    /// Start over with `keyword`. Empty keywords are ignored.
    pub fn new_search(&mut self, keyword: &str) -> Option<SearchRequest> {
        if keyword.is_empty() {
            return None;
        }
        self.cursor.reset();
        Some(self.issue(keyword, PageMode::Replace))
    }

    /// Request the page after the current one. Works with no prior search,
    /// in which case results append to an empty list.
    pub fn next_page(&mut self, keyword: &str) -> SearchRequest {
        self.cursor.advance();
        self.issue(keyword, PageMode::Append)
    }

    fn issue(&mut self, keyword: &str, mode: PageMode) -> SearchRequest {
        self.last_issued += 1;
        let id = self.last_issued;
        self.keyword = keyword.to_string();
        self.pending = Some(PendingPage { id, mode });
        self.state = DataResource::Loading;
        SearchRequest {
            id,
            keyword: self.keyword.clone(),
            offset: self.cursor.offset,
            limit: self.cursor.page_size,
            mode,
        }
    }

    fn take_pending(&mut self, request_id: u64) -> Option<PendingPage> {
        match self.pending {
            Some(pending) if pending.id == request_id => self.pending.take(),
            _ => {
                debug!(
                    request_id,
                    latest = self.last_issued,
                    "discarding stale search result"
                );
                None
            }
        }
    }

    /// Apply a fetched page. Returns `false` if the result was stale.
    pub fn complete(&mut self, request_id: u64, records: &[RawSpecies]) -> bool {
        let Some(pending) = self.take_pending(request_id) else {
            return false;
        };

        let page: Vec<SearchItem> = records.iter().filter_map(to_search_item).collect();
        let dropped = records.len() - page.len();
        if dropped > 0 {
            debug!(dropped, "dropped species without capture rate or color");
        }

        match pending.mode {
            PageMode::Replace => self.items = page,
            PageMode::Append => self.items.extend(page),
        }
        self.state = DataResource::Loaded(self.items.clone());
        true
    }

    /// Record a failed fetch. A failed first page clears the list; a failed
    /// next page keeps what was already loaded. The cursor stays where it is.
    pub fn fail(&mut self, request_id: u64, cause: impl Into<String>) -> bool {
        let Some(pending) = self.take_pending(request_id) else {
            return false;
        };
        if pending.mode == PageMode::Replace {
            self.items.clear();
        }
        self.state = DataResource::Failed(cause.into());
        true
    }

    pub fn items(&self) -> &[SearchItem] {
        &self.items
    }

    pub fn state(&self) -> &DataResource<Vec<SearchItem>> {
        &self.state
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

// ============================================================================
// DetailSession
// ============================================================================

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct DetailSession {
    name: String,
    state: DataResource<DetailRecord>,
    last_issued: u64,
    pending: Option<u64>,
}

impl Default for DetailSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailSession {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            state: DataResource::Empty,
            last_issued: 0,
            pending: None,
        }
    }

    pub fn load(&mut self, name: &str) -> DetailRequest {
        self.last_issued += 1;
        self.name = name.to_string();
        self.pending = Some(self.last_issued);
        self.state = DataResource::Loading;
        DetailRequest {
            id: self.last_issued,
            name: self.name.clone(),
        }
    }

    fn take_pending(&mut self, request_id: u64) -> bool {
        if self.pending == Some(request_id) {
            self.pending = None;
            true
        } else {
            debug!(
                request_id,
                latest = self.last_issued,
                "discarding stale detail result"
            );
            false
        }
    }

    pub fn complete(&mut self, request_id: u64, response: &RawDetailResponse) -> bool {
        if !self.take_pending(request_id) {
            return false;
        }
        self.state = DataResource::Loaded(DetailRecord {
            name: self.name.clone(),
            abilities: to_ability_names(response),
        });
        true
    }

    pub fn fail(&mut self, request_id: u64, cause: impl Into<String>) -> bool {
        if !self.take_pending(request_id) {
            return false;
        }
        self.state = DataResource::Failed(cause.into());
        true
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &DataResource<DetailRecord> {
        &self.state
    }
}
