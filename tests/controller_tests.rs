//! Controllers with an in-memory transport

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use pokesearch::controller::{DetailController, SearchController};
use pokesearch::error::QueryError;
use pokesearch::query::QueryClient;
use pokesearch::transport::{GraphqlRequest, GraphqlResponse, Transport};

/// Answers search requests by keyword after a per-keyword delay.
#[derive(Default)]
struct ScriptedTransport {
    delays: HashMap<String, Duration>,
    failing_offsets: Vec<u64>,
}

impl ScriptedTransport {
    fn delay(mut self, keyword: &str, delay: Duration) -> Self {
        self.delays.insert(keyword.to_string(), delay);
        self
    }

    fn fail_at_offset(mut self, offset: u64) -> Self {
        self.failing_offsets.push(offset);
        self
    }

    fn species_page(keyword: &str, offset: u64, count: u64) -> serde_json::Value {
        let stem = keyword.trim_matches('%');
        let species: Vec<_> = (offset..offset + count)
            .map(|n| {
                json!({
                    "name": format!("{stem}{n}"),
                    "capture_rate": 45,
                    "pokemon_color_id": 10,
                    "pokemon_v2_pokemons": [{ "name": format!("{stem}{n}") }]
                })
            })
            .collect();
        json!({ "pokemon_v2_pokemonspecies": species })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, QueryError> {
        let name = request.variables["name"].as_str().unwrap_or_default().to_string();
        if let Some(delay) = self.delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }

        let data = match request.variables.get("offset") {
            Some(offset) => {
                let offset = offset.as_u64().unwrap_or_default();
                if self.failing_offsets.contains(&offset) {
                    return Err(QueryError::Timeout);
                }
                let count = request.variables["count"].as_u64().unwrap_or_default();
                Self::species_page(&name, offset, count.min(3))
            }
            None => json!({
                "pokemon_v2_pokemonspecies": [{
                    "pokemon_v2_pokemons": [
                        { "pokemon_v2_pokemonabilities": [{ "pokemon_v2_ability": { "name": "static" } }] },
                        { "pokemon_v2_pokemonabilities": [{ "pokemon_v2_ability": { "name": "lightning-rod" } }] }
                    ]
                }]
            }),
        };

        Ok(GraphqlResponse {
            data: Some(data),
            errors: Vec::new(),
        })
    }
}

/// Always answers with the same search page.
struct FixedPage(serde_json::Value);

#[async_trait]
impl Transport for FixedPage {
    async fn execute(&self, _request: &GraphqlRequest) -> Result<GraphqlResponse, QueryError> {
        Ok(GraphqlResponse {
            data: Some(self.0.clone()),
            errors: Vec::new(),
        })
    }
}

fn client(transport: ScriptedTransport) -> QueryClient {
    QueryClient::new(Arc::new(transport))
}

fn names(items: &[pokesearch::state::SearchItem]) -> Vec<&str> {
    items.iter().map(|item| item.name.as_str()).collect()
}

#[tokio::test]
async fn slower_earlier_search_is_discarded() {
    let transport = ScriptedTransport::default()
        .delay("%x%", Duration::from_millis(150))
        .delay("%y%", Duration::from_millis(10));
    let controller = SearchController::new(client(transport), 10);

    let (x_applied, y_applied) =
        tokio::join!(controller.new_search("%x%"), controller.new_search("%y%"));

    assert!(!x_applied);
    assert!(y_applied);
    let items = controller.items().await;
    assert_eq!(names(&items), vec!["y0", "y1", "y2"]);
}

#[tokio::test]
async fn faster_earlier_search_is_replaced() {
    let transport = ScriptedTransport::default()
        .delay("%x%", Duration::from_millis(10))
        .delay("%y%", Duration::from_millis(100));
    let controller = SearchController::new(client(transport), 10);

    let (x_applied, y_applied) =
        tokio::join!(controller.new_search("%x%"), controller.new_search("%y%"));

    // x was already superseded when it arrived
    assert!(!x_applied);
    assert!(y_applied);
    assert_eq!(names(&controller.items().await), vec!["y0", "y1", "y2"]);
}

#[tokio::test]
async fn next_page_appends_to_first_page() {
    let controller = SearchController::new(client(ScriptedTransport::default()), 10);

    assert!(controller.new_search("%a%").await);
    assert!(controller.next_page("%a%").await);

    let items = controller.items().await;
    assert_eq!(names(&items), vec!["a0", "a1", "a2", "a10", "a11", "a12"]);
    assert!(controller.snapshot().await.is_loaded());
}

#[tokio::test]
async fn failed_next_page_keeps_items() {
    let transport = ScriptedTransport::default().fail_at_offset(10);
    let controller = SearchController::new(client(transport), 10);

    controller.new_search("%a%").await;
    let before = controller.items().await;
    controller.next_page("%a%").await;

    assert_eq!(controller.items().await, before);
    assert_eq!(
        controller.snapshot().await.error(),
        Some("request timed out")
    );
}

#[tokio::test]
async fn null_member_list_keeps_the_page() {
    let page = json!({
        "pokemon_v2_pokemonspecies": [
            {
                "name": "pikachu",
                "capture_rate": 190,
                "pokemon_color_id": 10,
                "pokemon_v2_pokemons": [{ "name": "pikachu" }]
            },
            {
                "name": "ghost",
                "capture_rate": 45,
                "pokemon_color_id": 1,
                "pokemon_v2_pokemons": null
            }
        ]
    });
    let controller = SearchController::new(QueryClient::new(Arc::new(FixedPage(page))), 10);

    assert!(controller.new_search("%p%").await);

    assert!(controller.snapshot().await.is_loaded());
    let items = controller.items().await;
    assert_eq!(names(&items), vec!["pikachu", "ghost"]);
    assert_eq!(items[1].species_summary, "");
}

#[tokio::test]
async fn observers_see_terminal_state() {
    let controller = SearchController::new(client(ScriptedTransport::default()), 10);
    let mut updates = controller.subscribe();
    assert!(updates.borrow().is_empty());

    controller.new_search("%a%").await;

    assert!(updates.has_changed().unwrap());
    let latest = updates.borrow_and_update().clone();
    assert_eq!(latest.data().map(Vec::len), Some(3));
}

#[tokio::test]
async fn empty_keyword_does_nothing() {
    let controller = SearchController::new(client(ScriptedTransport::default()), 10);
    let updates = controller.subscribe();

    assert!(!controller.new_search("").await);
    assert!(!updates.has_changed().unwrap());
    assert!(controller.snapshot().await.is_empty());
}

#[tokio::test]
async fn detail_load_flattens_abilities() {
    let controller = DetailController::new(client(ScriptedTransport::default()));
    let mut updates = controller.subscribe();

    assert!(controller.load("pikachu").await);

    let record = updates.borrow_and_update().clone();
    let record = record.data().unwrap();
    assert_eq!(record.name, "pikachu");
    assert_eq!(record.abilities, vec!["static", "lightning-rod"]);
}
