use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{
    BaseStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior, SelectListProps,
    SelectListStyle, SelectionStyle, StatusBar, StatusBarHint, TextInput, TextInputProps,
    TextInputStyle,
};

use super::{ACCENT, BG_BASE, BG_PANEL, Component, ERROR, TEXT_DIM, TEXT_MAIN, render_footer};
use crate::action::Action;
use crate::state::{AppState, SearchFocus, SearchItem};

const PLACEHOLDER: &str = "Search Pokemon by name...";

pub struct SearchScreen {
    input: TextInput,
    list: SelectList,
    status_bar: StatusBar,
}

pub struct SearchScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for SearchScreen {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }
}

impl SearchScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// One line per result, painted in the species color.
    pub fn result_line(item: &SearchItem) -> Line<'static> {
        let style = Style::default()
            .bg(item.color.into())
            .fg(item.color.contrast_text().into());
        let members = item.members().collect::<Vec<_>>().join(", ");
        Line::from(vec![
            Span::styled(
                format!(" {:<16}", item.name),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" catch {:>3}  ", item.capture_rate)),
            Span::raw(members),
        ])
        .style(style)
    }

    fn input_style() -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::all(1),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            placeholder_style: Some(Style::default().fg(TEXT_DIM)),
            cursor_style: None,
        }
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }

    fn handle_results_key(
        &mut self,
        event: &EventKind,
        code: KeyCode,
        state: &AppState,
    ) -> Vec<Action> {
        let len = state.search.items().len();
        match code {
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Char('r') => vec![Action::SearchRefresh],
            KeyCode::Char('/') | KeyCode::Tab | KeyCode::Esc => vec![Action::SearchFocusToggle],
            KeyCode::Enter => vec![Action::ResultOpen],
            // Scrolling past the last row loads more
            KeyCode::Down | KeyCode::Char('j') if len > 0 && state.selected + 1 >= len => {
                vec![Action::SearchNextPage]
            }
            _ => {
                let items: Vec<Line> = state.search.items().iter().map(Self::result_line).collect();
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected,
                    is_focused: true,
                    style: Self::list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::ResultSelect,
                    render_item: &|item| item.clone(),
                };
                self.list.handle_event(event, props).into_iter().collect()
            }
        }
    }

    fn status_span(state: &AppState) -> Span<'static> {
        match state.search.state() {
            DataResource::Empty => Span::styled("idle", Style::default().fg(TEXT_DIM)),
            DataResource::Loading => Span::styled("Loading...", Style::default().fg(ACCENT)),
            DataResource::Loaded(_) => Span::styled(
                format!("{} results", state.search.items().len()),
                Style::default().fg(TEXT_MAIN),
            ),
            DataResource::Failed(err) => {
                Span::styled(format!("Error: {err}"), Style::default().fg(ERROR))
            }
        }
    }

    fn hints(focus: SearchFocus) -> Vec<StatusBarHint<'static>> {
        match focus {
            SearchFocus::Input => vec![
                StatusBarHint::new("Enter", "Search"),
                StatusBarHint::new("Tab", "Results"),
            ],
            SearchFocus::Results => vec![
                StatusBarHint::new("j/k", "Move"),
                StatusBarHint::new("Enter", "Abilities"),
                StatusBarHint::new("r", "Refresh"),
                StatusBarHint::new("/", "Edit"),
                StatusBarHint::new("q", "Quit"),
            ],
        }
    }

    fn empty_message(state: &AppState) -> Line<'static> {
        match state.search.state() {
            DataResource::Loading => {
                Line::styled("Searching...", Style::default().fg(ACCENT))
            }
            DataResource::Failed(err) => {
                Line::styled(format!("Search failed: {err}"), Style::default().fg(ERROR))
            }
            DataResource::Loaded(_) => {
                Line::styled("No Pokemon found", Style::default().fg(TEXT_DIM))
            }
            DataResource::Empty => Line::styled(
                "Type a name and press Enter",
                Style::default().fg(TEXT_DIM),
            ),
        }
    }
}

impl Component<Action> for SearchScreen {
    type Props<'a> = SearchScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let state = props.state;

        match state.search_focus {
            SearchFocus::Input => match key.code {
                KeyCode::Tab => vec![Action::SearchFocusToggle],
                KeyCode::Down if !state.search.items().is_empty() => {
                    vec![Action::SearchFocusToggle]
                }
                _ => {
                    let input_props = TextInputProps {
                        value: &state.search_query,
                        placeholder: PLACEHOLDER,
                        is_focused: true,
                        style: Self::input_style(),
                        on_change: Action::SearchQueryChange,
                        on_submit: Action::SearchQuerySubmit,
                        on_cursor_move: Some(|_| Action::Render),
                    };
                    self.input
                        .handle_event(event, input_props)
                        .into_iter()
                        .collect()
                }
            },
            SearchFocus::Results => self.handle_results_key(event, key.code, state),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Message
            Constraint::Min(1),    // Results
            Constraint::Length(1), // Footer
        ])
        .split(area);

        let input_props = TextInputProps {
            value: &state.search_query,
            placeholder: PLACEHOLDER,
            is_focused: props.is_focused && state.search_focus == SearchFocus::Input,
            style: Self::input_style(),
            on_change: Action::SearchQueryChange,
            on_submit: Action::SearchQuerySubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, chunks[0], input_props);

        if let Some(message) = &state.message {
            frame.render_widget(
                Paragraph::new(Line::styled(message.clone(), Style::default().fg(ERROR))),
                chunks[1],
            );
        }

        if state.search.items().is_empty() {
            frame.render_widget(
                Paragraph::new(Self::empty_message(state)).alignment(Alignment::Center),
                chunks[2],
            );
        } else {
            let items: Vec<Line> = state.search.items().iter().map(Self::result_line).collect();
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: state.selected,
                is_focused: props.is_focused && state.search_focus == SearchFocus::Results,
                style: Self::list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: Action::ResultSelect,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, chunks[2], list_props);
        }

        let hints = Self::hints(state.search_focus);
        render_footer(
            frame,
            chunks[3],
            &mut self.status_bar,
            &hints,
            Self::status_span(state),
        );
    }
}
