pub mod detail_screen;
pub mod search_screen;
pub mod splash;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use detail_screen::{DetailScreen, DetailScreenProps};
pub use search_screen::{SearchScreen, SearchScreenProps};
pub use splash::{Splash, SplashProps};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
};
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use crate::action::Action;

pub const BG_BASE: Color = Color::Rgb(18, 22, 34);
pub const BG_PANEL: Color = Color::Rgb(30, 36, 52);
pub const TEXT_MAIN: Color = Color::Rgb(230, 234, 242);
pub const TEXT_DIM: Color = Color::Rgb(150, 160, 180);
pub const ACCENT: Color = Color::Rgb(255, 203, 5);
pub const ERROR: Color = Color::Rgb(240, 96, 96);

/// Footer shared by the search and detail screens.
pub(crate) fn render_footer(
    frame: &mut Frame,
    area: Rect,
    status_bar: &mut StatusBar,
    hints: &[StatusBarHint<'_>],
    status: Span<'_>,
) {
    let items = [StatusBarItem::span(status)];
    let style = StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };
    let props = StatusBarProps {
        left: StatusBarSection::hints(hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}
