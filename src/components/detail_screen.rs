use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{StatusBar, StatusBarHint};

use super::{ACCENT, BG_BASE, Component, ERROR, TEXT_DIM, TEXT_MAIN, render_footer};
use crate::action::Action;
use crate::state::AppState;

pub struct DetailScreen {
    status_bar: StatusBar,
}

pub struct DetailScreenProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for DetailScreen {
    fn default() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl DetailScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(state: &AppState) -> Vec<Line<'static>> {
        match state.detail.state() {
            DataResource::Empty => Vec::new(),
            DataResource::Loading => vec![Line::styled(
                "Loading abilities...",
                Style::default().fg(ACCENT),
            )],
            DataResource::Failed(err) => vec![
                Line::styled(format!("Failed: {err}"), Style::default().fg(ERROR)),
                Line::styled("press r to retry", Style::default().fg(TEXT_DIM)),
            ],
            DataResource::Loaded(record) if record.abilities.is_empty() => {
                vec![Line::styled("No abilities", Style::default().fg(TEXT_DIM))]
            }
            DataResource::Loaded(record) => record
                .abilities
                .iter()
                .enumerate()
                .map(|(index, ability)| {
                    Line::from(vec![
                        Span::styled(format!("{:>2}. ", index + 1), Style::default().fg(TEXT_DIM)),
                        Span::styled(ability.clone(), Style::default().fg(TEXT_MAIN)),
                    ])
                })
                .collect(),
        }
    }
}

impl Component<Action> for DetailScreen {
    type Props<'a> = DetailScreenProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        match key.code {
            KeyCode::Char('r') => Some(Action::DetailReload),
            KeyCode::Esc | KeyCode::Backspace => Some(Action::DetailClose),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if props.is_focused { ACCENT } else { TEXT_DIM }))
            .title(Span::styled(
                format!(" {} ", state.detail.name()),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ));
        frame.render_widget(Paragraph::new(Self::body(state)).block(block), chunks[0]);

        let hints = [
            StatusBarHint::new("r", "Reload"),
            StatusBarHint::new("Esc", "Back"),
            StatusBarHint::new("q", "Quit"),
        ];
        let status = match state.detail.state() {
            DataResource::Loaded(record) => Span::styled(
                format!("{} abilities", record.abilities.len()),
                Style::default().fg(TEXT_MAIN),
            ),
            DataResource::Loading => Span::styled("Loading...", Style::default().fg(ACCENT)),
            DataResource::Failed(_) => Span::styled("Error", Style::default().fg(ERROR)),
            DataResource::Empty => Span::raw(""),
        };
        render_footer(frame, chunks[1], &mut self.status_bar, &hints, status);
    }
}
