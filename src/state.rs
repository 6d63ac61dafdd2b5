//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::SwatchColor;
use crate::config::DEFAULT_PAGE_SIZE;
use crate::session::{DetailSession, SearchSession};

/// A display-ready search result row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchItem {
    pub name: String,
    pub capture_rate: i64,
    /// Member names, each followed by `\n`
    pub species_summary: String,
    pub color: SwatchColor,
}

impl SearchItem {
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.species_summary.lines()
    }
}

/// Abilities for one species, in response order. Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DetailRecord {
    pub name: String,
    pub abilities: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Screen {
    #[default]
    Splash,
    Search,
    Detail,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SearchFocus {
    #[default]
    Input,
    Results,
}

impl SearchFocus {
    pub fn toggle(self) -> Self {
        match self {
            SearchFocus::Input => SearchFocus::Results,
            SearchFocus::Results => SearchFocus::Input,
        }
    }
}

pub const SPLASH_SECONDS: u8 = 3;

#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Navigation", label = "Screen", debug_fmt)]
    pub screen: Screen,

    #[debug(section = "Navigation", label = "Splash")]
    pub splash_remaining: u8,

    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    #[debug(section = "Search", label = "Focus", debug_fmt)]
    pub search_focus: SearchFocus,

    #[debug(section = "Search", label = "Selected")]
    pub selected: usize,

    #[debug(section = "Search", label = "Session", debug_fmt)]
    pub search: SearchSession,

    #[debug(section = "Detail", label = "Session", debug_fmt)]
    pub detail: DetailSession,

    /// Validation hint shown under the input
    #[debug(skip)]
    pub message: Option<String>,
}

impl AppState {
    pub fn new(page_size: u32) -> Self {
        Self {
            screen: Screen::Splash,
            splash_remaining: SPLASH_SECONDS,
            search_query: String::new(),
            search_focus: SearchFocus::Input,
            selected: 0,
            search: SearchSession::new(page_size),
            detail: DetailSession::new(),
            message: None,
        }
    }

    pub fn selected_item(&self) -> Option<&SearchItem> {
        self.search.items().get(self.selected)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
