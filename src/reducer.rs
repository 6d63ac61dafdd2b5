//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::query::name_pattern;
use crate::state::{AppState, Screen, SearchFocus};

pub const BLANK_QUERY_MESSAGE: &str = "Enter a Pokemon name to search";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Splash =====
        Action::SplashTick => {
            if state.screen != Screen::Splash {
                return DispatchResult::unchanged();
            }
            state.splash_remaining = state.splash_remaining.saturating_sub(1);
            if state.splash_remaining == 0 {
                state.screen = Screen::Search;
            }
            DispatchResult::changed()
        }

        Action::SplashSkip => {
            if state.screen != Screen::Splash {
                return DispatchResult::unchanged();
            }
            state.splash_remaining = 0;
            state.screen = Screen::Search;
            DispatchResult::changed()
        }

        // ===== Search =====
        Action::SearchQueryChange(query) => {
            state.search_query = query;
            state.message = None;
            DispatchResult::changed()
        }

        Action::SearchQuerySubmit(query) => {
            let query = query.trim().to_string();
            state.search_query = query.clone();
            if query.is_empty() {
                state.message = Some(BLANK_QUERY_MESSAGE.to_string());
                return DispatchResult::changed();
            }
            state.message = None;
            state.selected = 0;
            match state.search.new_search(&name_pattern(&query)) {
                Some(request) => {
                    state.search_focus = SearchFocus::Results;
                    DispatchResult::changed_with(Effect::SearchSpecies(request))
                }
                None => DispatchResult::changed(),
            }
        }

        Action::SearchRefresh => {
            let keyword = state.search.keyword().to_string();
            match state.search.new_search(&keyword) {
                Some(request) => {
                    state.selected = 0;
                    DispatchResult::changed_with(Effect::SearchSpecies(request))
                }
                None => DispatchResult::unchanged(),
            }
        }

        Action::SearchNextPage => {
            if state.search.is_loading()
                || state.search.keyword().is_empty()
                || state.search.items().is_empty()
            {
                return DispatchResult::unchanged();
            }
            let keyword = state.search.keyword().to_string();
            let request = state.search.next_page(&keyword);
            DispatchResult::changed_with(Effect::SearchSpecies(request))
        }

        Action::SearchFocusToggle => {
            state.search_focus = state.search_focus.toggle();
            DispatchResult::changed()
        }

        Action::SearchDidLoad {
            request_id,
            species,
        } => {
            if !state.search.complete(request_id, &species) {
                return DispatchResult::unchanged();
            }
            clamp_selection(state);
            DispatchResult::changed()
        }

        Action::SearchDidError { request_id, error } => {
            if !state.search.fail(request_id, error) {
                return DispatchResult::unchanged();
            }
            clamp_selection(state);
            DispatchResult::changed()
        }

        // ===== Results =====
        Action::ResultSelect(index) => {
            if index < state.search.items().len() && index != state.selected {
                state.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::ResultOpen => {
            let Some(name) = state.selected_item().map(|item| item.name.clone()) else {
                return DispatchResult::unchanged();
            };
            let request = state.detail.load(&name);
            state.screen = Screen::Detail;
            DispatchResult::changed_with(Effect::LoadAbilities(request))
        }

        // ===== Detail =====
        Action::DetailReload => {
            if state.detail.name().is_empty() {
                return DispatchResult::unchanged();
            }
            let name = state.detail.name().to_string();
            let request = state.detail.load(&name);
            DispatchResult::changed_with(Effect::LoadAbilities(request))
        }

        Action::DetailClose => {
            if state.screen != Screen::Detail {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::Search;
            DispatchResult::changed()
        }

        Action::DetailDidLoad {
            request_id,
            response,
        } => {
            if state.detail.complete(request_id, &response) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::DetailDidError { request_id, error } => {
            if state.detail.fail(request_id, error) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn clamp_selection(state: &mut AppState) {
    let len = state.search.items().len();
    if state.selected >= len {
        state.selected = len.saturating_sub(1);
    }
}
