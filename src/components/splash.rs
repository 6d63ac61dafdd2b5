use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::centered_rect;

use super::{ACCENT, BG_BASE, Component, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;

pub struct Splash;

pub struct SplashProps {
    pub remaining: u8,
    pub is_focused: bool,
}

impl Component<Action> for Splash {
    type Props<'a> = SplashProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(key) if key.code == KeyCode::Char('q') => Some(Action::Quit),
            EventKind::Key(_) => Some(Action::SplashSkip),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let lines = vec![
            Line::from(Span::styled(
                "PokeSearch",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Species search over PokeAPI GraphQL",
                Style::default().fg(TEXT_MAIN),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Starting in {}...", props.remaining),
                Style::default().fg(TEXT_DIM),
            )),
            Line::from(Span::styled(
                "press any key to skip",
                Style::default().fg(TEXT_DIM),
            )),
        ];

        let height = lines.len() as u16;
        let inner = centered_rect(40, height, area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}
