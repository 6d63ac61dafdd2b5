//! PokeSearch - Pokemon species search TUI

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pokesearch::action::Action;
use pokesearch::components::{
    Component, DetailScreen, DetailScreenProps, SearchScreen, SearchScreenProps, Splash,
    SplashProps,
};
use pokesearch::config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE};
use pokesearch::controller::{DetailController, SearchController};
use pokesearch::effect::Effect;
use pokesearch::logging::{LogTarget, init_logging};
use pokesearch::query::{QueryClient, name_pattern};
use pokesearch::reducer::reducer;
use pokesearch::state::{AppState, Screen};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::info;
use tui_dispatch::{
    DataResource, EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus,
    EventContext, EventKind, EventRoutingState, HandlerResponse, Keybindings, RenderContext,
    TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Search Pokemon species through the PokeAPI GraphQL endpoint
#[derive(Parser, Debug)]
#[command(name = "pokesearch")]
#[command(about = "Paged Pokemon species search over PokeAPI GraphQL")]
struct Args {
    /// GraphQL endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Results per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Run one search without the TUI and print the results
    #[arg(long, short)]
    query: Option<String>,

    /// Number of pages to fetch with --query
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pages: u32,

    /// Print the abilities of one species without the TUI
    #[arg(long, short)]
    abilities: Option<String>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum SearchComponentId {
    Splash,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum SearchContext {
    Splash,
    Search,
    Detail,
}

impl EventRoutingState<SearchComponentId, SearchContext> for AppState {
    fn focused(&self) -> Option<SearchComponentId> {
        match self.screen {
            Screen::Splash => Some(SearchComponentId::Splash),
            Screen::Search => Some(SearchComponentId::Search),
            Screen::Detail => Some(SearchComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<SearchComponentId> {
        None
    }

    fn binding_context(&self, id: SearchComponentId) -> SearchContext {
        match id {
            SearchComponentId::Splash => SearchContext::Splash,
            SearchComponentId::Search => SearchContext::Search,
            SearchComponentId::Detail => SearchContext::Detail,
        }
    }

    fn default_context(&self) -> SearchContext {
        SearchContext::Search
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        endpoint,
        page_size,
        log_file,
        log_level,
        query,
        pages,
        abilities,
        debug: debug_args,
    } = Args::parse();

    let config = ClientConfig::default().with_endpoint(endpoint);
    let client = QueryClient::http(&config).map_err(io::Error::other)?;

    // ===== Headless mode =====
    if query.is_some() || abilities.is_some() {
        let target = log_file
            .as_deref()
            .map(LogTarget::File)
            .unwrap_or(LogTarget::Stderr);
        let guard = init_logging(target, &log_level)?;
        let ok = run_headless(client, page_size, query, pages, abilities).await;
        // exit() skips destructors; flush the log writer first
        drop(guard);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let target = log_file
        .as_deref()
        .map(LogTarget::File)
        .unwrap_or(LogTarget::Off);
    let _guard = init_logging(target, &log_level)?;
    info!(endpoint = %config.endpoint, page_size, "starting");

    let debug = DebugSession::new(debug_args);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(page_size))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Drive the controllers directly and print to stdout. Returns `false` on failure.
async fn run_headless(
    client: QueryClient,
    page_size: u32,
    query: Option<String>,
    pages: u32,
    abilities: Option<String>,
) -> bool {
    let mut ok = true;

    if let Some(query) = query {
        let query = query.trim();
        if query.is_empty() {
            eprintln!("Error: --query must not be blank");
            return false;
        }
        let keyword = name_pattern(query);
        let search = SearchController::new(client.clone(), page_size);
        search.new_search(&keyword).await;
        for _ in 1..pages {
            if !search.snapshot().await.is_loaded() {
                break;
            }
            search.next_page(&keyword).await;
        }

        for item in search.items().await {
            let members = item.members().collect::<Vec<_>>().join(", ");
            println!(
                "{:<20} capture_rate={:<3} color=#{:02X}{:02X}{:02X}  {}",
                item.name, item.capture_rate, item.color.r, item.color.g, item.color.b, members
            );
        }
        if let DataResource::Failed(err) = search.snapshot().await {
            eprintln!("Error: {err}");
            ok = false;
        }
    }

    if let Some(name) = abilities {
        let detail = DetailController::new(client);
        detail.load(name.trim()).await;
        match detail.snapshot().await {
            DataResource::Loaded(record) => {
                println!("{}:", record.name);
                for ability in record.abilities {
                    println!("  {ability}");
                }
            }
            DataResource::Failed(err) => {
                eprintln!("Error: {err}");
                ok = false;
            }
            DataResource::Empty | DataResource::Loading => ok = false,
        }
    }

    ok
}

struct SearchUi {
    splash: Splash,
    search: SearchScreen,
    detail: DetailScreen,
}

impl SearchUi {
    fn new() -> Self {
        Self {
            splash: Splash,
            search: SearchScreen::new(),
            detail: DetailScreen::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<SearchComponentId>,
    ) {
        let is_focused = render_ctx.is_focused();
        match state.screen {
            Screen::Splash => {
                event_ctx.set_component_area(SearchComponentId::Splash, area);
                let props = SplashProps {
                    remaining: state.splash_remaining,
                    is_focused,
                };
                self.splash.render(frame, area, props);
            }
            Screen::Search => {
                event_ctx.set_component_area(SearchComponentId::Search, area);
                let props = SearchScreenProps { state, is_focused };
                self.search.render(frame, area, props);
            }
            Screen::Detail => {
                event_ctx.set_component_area(SearchComponentId::Detail, area);
                let props = DetailScreenProps { state, is_focused };
                self.detail.render(frame, area, props);
            }
        }
    }

    fn handle_splash_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SplashProps {
            remaining: state.splash_remaining,
            is_focused: state.screen == Screen::Splash,
        };
        respond(self.splash.handle_event(event, props).into_iter().collect())
    }

    fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SearchScreenProps {
            state,
            is_focused: state.screen == Screen::Search,
        };
        respond(self.search.handle_event(event, props).into_iter().collect())
    }

    fn handle_detail_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = DetailScreenProps {
            state,
            is_focused: state.screen == Screen::Detail,
        };
        respond(self.detail.handle_event(event, props).into_iter().collect())
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: QueryClient,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(SearchUi::new()));
    let mut bus: EventBus<AppState, Action, SearchComponentId, SearchContext> = EventBus::new();
    let keybindings: Keybindings<SearchContext> = Keybindings::new();

    let ui_splash = Rc::clone(&ui);
    bus.register(SearchComponentId::Splash, move |event, state| {
        ui_splash.borrow_mut().handle_splash_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(SearchComponentId::Search, move |event, state| {
        ui_search.borrow_mut().handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(SearchComponentId::Detail, move |event, state| {
        ui_detail.borrow_mut().handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match &event.kind {
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            respond(vec![Action::Quit])
        }
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            None,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("splash", Duration::from_secs(1), || Action::SplashTick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, client.clone()),
        )
        .await
}

/// One task per request id; superseded requests run to completion and are
/// discarded by the reducer.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: QueryClient) {
    match effect {
        Effect::SearchSpecies(request) => {
            let key = format!("search_{}", request.id);
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client
                    .search_species(&request.keyword, request.offset, request.limit)
                    .await
                {
                    Ok(species) => Action::SearchDidLoad {
                        request_id: request.id,
                        species,
                    },
                    Err(err) => Action::SearchDidError {
                        request_id: request.id,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadAbilities(request) => {
            let key = format!("detail_{}", request.id);
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client.fetch_abilities(&request.name).await {
                    Ok(response) => Action::DetailDidLoad {
                        request_id: request.id,
                        response,
                    },
                    Err(err) => Action::DetailDidError {
                        request_id: request.id,
                        error: err.to_string(),
                    },
                }
            });
        }
    }
}
