//! Actions with category inference

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::query::{RawDetailResponse, RawSpecies};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Splash =====
    /// One second of the splash countdown elapsed
    SplashTick,
    /// Any key on the splash screen
    SplashSkip,

    // ===== Search =====
    SearchQueryChange(String),

    /// Start a new search for the typed text
    SearchQuerySubmit(String),

    /// Re-run the current search from the first page
    SearchRefresh,

    /// Fetch the page after the last loaded one
    SearchNextPage,

    SearchFocusToggle,

    /// Result: a search page arrived
    SearchDidLoad {
        request_id: u64,
        species: Vec<RawSpecies>,
    },

    /// Result: a search page failed
    SearchDidError { request_id: u64, error: String },

    // ===== Results =====
    ResultSelect(usize),

    /// Open the detail screen for the selected row
    ResultOpen,

    // ===== Detail =====
    DetailReload,
    DetailClose,
    DetailDidLoad {
        request_id: u64,
        response: RawDetailResponse,
    },
    DetailDidError { request_id: u64, error: String },

    // ===== Uncategorized =====
    /// Force a re-render (cursor movement)
    Render,
    Quit,
}
