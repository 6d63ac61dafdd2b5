//! Typed PokeAPI queries on top of a [`Transport`]

use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::QueryError;
use crate::transport::{GraphqlRequest, HttpTransport, Transport};

pub const SEARCH_OPERATION: &str = "PokemonSpecies";
pub const ABILITIES_OPERATION: &str = "PokemonAbilities";

pub const SEARCH_QUERY: &str = r#"query PokemonSpecies($name: String, $offset: Int, $count: Int) {
  pokemon_v2_pokemonspecies(where: {name: {_like: $name}}, offset: $offset, limit: $count, order_by: {id: asc}) {
    name
    capture_rate
    pokemon_color_id
    pokemon_v2_pokemons {
      name
    }
  }
}"#;

pub const ABILITIES_QUERY: &str = r#"query PokemonAbilities($name: String) {
  pokemon_v2_pokemonspecies(where: {name: {_eq: $name}}) {
    pokemon_v2_pokemons {
      pokemon_v2_pokemonabilities {
        pokemon_v2_ability {
          name
        }
      }
    }
  }
}"#;

/// Wrap user input as a `LIKE` pattern matching any name containing it.
pub fn name_pattern(text: &str) -> String {
    format!("%{text}%")
}

// ---------------------------------------------------------------------------
// Raw response records
// ---------------------------------------------------------------------------

/// Decode a nullable list, reading `null` as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawSpeciesPage {
    #[serde(rename = "pokemon_v2_pokemonspecies", default, deserialize_with = "null_as_empty")]
    pub species: Vec<RawSpecies>,
}

/// One species row from the search query.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawSpecies {
    pub name: String,
    #[serde(default)]
    pub capture_rate: Option<i64>,
    #[serde(rename = "pokemon_color_id", default)]
    pub color_id: Option<i64>,
    #[serde(rename = "pokemon_v2_pokemons", default, deserialize_with = "null_as_empty")]
    pub members: Vec<RawMember>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawMember {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetailResponse {
    #[serde(rename = "pokemon_v2_pokemonspecies", default, deserialize_with = "null_as_empty")]
    pub species: Vec<RawDetailSpecies>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawDetailSpecies {
    #[serde(rename = "pokemon_v2_pokemons", default, deserialize_with = "null_as_empty")]
    pub variants: Vec<RawVariant>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawVariant {
    #[serde(rename = "pokemon_v2_pokemonabilities", default, deserialize_with = "null_as_empty")]
    pub ability_slots: Vec<RawAbilitySlot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawAbilitySlot {
    #[serde(rename = "pokemon_v2_ability", default)]
    pub ability: Option<RawAbility>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawAbility {
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// The two queries the app needs. Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn Transport>,
}

impl QueryClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over HTTP with the configured endpoint and timeouts.
    pub fn http(config: &ClientConfig) -> Result<Self, QueryError> {
        Ok(Self::new(Arc::new(HttpTransport::new(config)?)))
    }

    /// Fetch one page of species whose name matches `keyword` (a `LIKE` pattern).
    pub async fn search_species(
        &self,
        keyword: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<RawSpecies>, QueryError> {
        let request = GraphqlRequest::new(
            SEARCH_QUERY,
            json!({ "name": keyword, "offset": offset, "count": limit }),
        )
        .with_operation_name(SEARCH_OPERATION);
        let page: RawSpeciesPage = self.run(request).await?;
        Ok(page.species)
    }

    /// Fetch the ability tree for the species named exactly `name`.
    pub async fn fetch_abilities(&self, name: &str) -> Result<RawDetailResponse, QueryError> {
        let request = GraphqlRequest::new(ABILITIES_QUERY, json!({ "name": name }))
            .with_operation_name(ABILITIES_OPERATION);
        self.run(request).await
    }

    async fn run<T: DeserializeOwned>(&self, request: GraphqlRequest) -> Result<T, QueryError> {
        let response = self.transport.execute(&request).await.inspect_err(|err| {
            warn!(operation = request.operation(), error = %err, "query failed");
        })?;

        if let Some(first) = response.errors.first() {
            warn!(
                operation = request.operation(),
                count = response.errors.len(),
                message = %first.message,
                "query returned errors"
            );
            return Err(QueryError::Graphql(first.message.clone()));
        }

        let data = response.data.ok_or(QueryError::MissingData)?;
        Ok(serde_json::from_value(data)?)
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::transport::{GraphqlErrorEntry, GraphqlResponse};

    /// Replies with a canned result and records every request.
    struct CannedTransport {
        reply: Result<GraphqlResponse, QueryError>,
        seen: Mutex<Vec<GraphqlRequest>>,
    }

    impl CannedTransport {
        fn new(reply: Result<GraphqlResponse, QueryError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn data(data: serde_json::Value) -> Arc<Self> {
            Self::new(Ok(GraphqlResponse {
                data: Some(data),
                errors: Vec::new(),
            }))
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, QueryError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    #[test]
    fn test_name_pattern() {
        assert_eq!(name_pattern("pika"), "%pika%");
        assert_eq!(name_pattern(""), "%%");
    }

    #[tokio::test]
    async fn test_search_species_sends_variables() {
        let transport = CannedTransport::data(json!({
            "pokemon_v2_pokemonspecies": [
                {
                    "name": "pikachu",
                    "capture_rate": 190,
                    "pokemon_color_id": 10,
                    "pokemon_v2_pokemons": [{ "name": "pikachu" }, { "name": "pikachu-rock-star" }]
                }
            ]
        }));
        let client = QueryClient::new(transport.clone());

        let species = client.search_species("%pika%", 20, 10).await.unwrap();

        assert_eq!(species.len(), 1);
        assert_eq!(species[0].capture_rate, Some(190));
        assert_eq!(species[0].color_id, Some(10));
        assert_eq!(species[0].members.len(), 2);

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].operation_name.as_deref(), Some(SEARCH_OPERATION));
        assert_eq!(
            seen[0].variables,
            json!({ "name": "%pika%", "offset": 20, "count": 10 })
        );
    }

    #[tokio::test]
    async fn test_search_species_tolerates_nulls() {
        let transport = CannedTransport::data(json!({
            "pokemon_v2_pokemonspecies": [
                { "name": "missingno", "capture_rate": null, "pokemon_color_id": null }
            ]
        }));
        let client = QueryClient::new(transport);

        let species = client.search_species("%m%", 0, 10).await.unwrap();

        assert_eq!(species[0].capture_rate, None);
        assert_eq!(species[0].color_id, None);
        assert!(species[0].members.is_empty());
    }

    #[tokio::test]
    async fn test_search_species_null_members_keep_sibling_rows() {
        let transport = CannedTransport::data(json!({
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
        }));
        let client = QueryClient::new(transport);

        let species = client.search_species("%p%", 0, 10).await.unwrap();

        assert_eq!(species.len(), 2);
        assert_eq!(species[0].members.len(), 1);
        assert!(species[1].members.is_empty());
        let names: Vec<_> = species
            .iter()
            .filter_map(crate::mapper::to_search_item)
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["pikachu", "ghost"]);
    }

    #[tokio::test]
    async fn test_fetch_abilities_null_lists_are_empty() {
        let transport = CannedTransport::data(json!({
            "pokemon_v2_pokemonspecies": [{
                "pokemon_v2_pokemons": [
                    { "pokemon_v2_pokemonabilities": null },
                    { "pokemon_v2_pokemonabilities": [{ "pokemon_v2_ability": { "name": "static" } }] }
                ]
            }]
        }));
        let client = QueryClient::new(transport);

        let response = client.fetch_abilities("pikachu").await.unwrap();

        assert_eq!(crate::mapper::to_ability_names(&response), vec!["static"]);
    }

    #[tokio::test]
    async fn test_fetch_abilities_decodes_tree() {
        let transport = CannedTransport::data(json!({
            "pokemon_v2_pokemonspecies": [{
                "pokemon_v2_pokemons": [{
                    "pokemon_v2_pokemonabilities": [
                        { "pokemon_v2_ability": { "name": "static" } },
                        { "pokemon_v2_ability": null }
                    ]
                }]
            }]
        }));
        let client = QueryClient::new(transport.clone());

        let response = client.fetch_abilities("pikachu").await.unwrap();

        let slots = &response.species[0].variants[0].ability_slots;
        assert_eq!(slots.len(), 2);
        assert_eq!(
            slots[0].ability.as_ref().and_then(|a| a.name.as_deref()),
            Some("static")
        );
        assert!(slots[1].ability.is_none());
        assert_eq!(
            transport.seen.lock().unwrap()[0].variables,
            json!({ "name": "pikachu" })
        );
    }

    #[tokio::test]
    async fn test_graphql_errors_fail_the_query() {
        let transport = CannedTransport::new(Ok(GraphqlResponse {
            data: None,
            errors: vec![GraphqlErrorEntry {
                message: "field not found".into(),
            }],
        }));
        let client = QueryClient::new(transport);

        let err = client.search_species("%a%", 0, 10).await.unwrap_err();
        assert_eq!(err, QueryError::Graphql("field not found".into()));
    }

    #[tokio::test]
    async fn test_missing_data_fails_the_query() {
        let transport = CannedTransport::new(Ok(GraphqlResponse::default()));
        let client = QueryClient::new(transport);

        let err = client.fetch_abilities("pikachu").await.unwrap_err();
        assert_eq!(err, QueryError::MissingData);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_a_decode_error() {
        let transport = CannedTransport::data(json!({ "pokemon_v2_pokemonspecies": 42 }));
        let client = QueryClient::new(transport);

        let err = client.search_species("%a%", 0, 10).await.unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = CannedTransport::new(Err(QueryError::Timeout));
        let client = QueryClient::new(transport);

        let err = client.search_species("%a%", 0, 10).await.unwrap_err();
        assert_eq!(err, QueryError::Timeout);
    }
}
