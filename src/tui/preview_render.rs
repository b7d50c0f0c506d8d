//! Device Preview Rendering
//!
//! Draws a [`PreviewModel`] as a phone mock-up.

use super::render::{to_color, BRAND_BLUE, BRAND_GOLD};
use crate::wizard::preview::{BottomChrome, PreviewModel};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const PHONE_WIDTH: u16 = 32;
const PHONE_HEIGHT: u16 = 30;
const SIGNAL_ICONS: &str = "▂▄▆ ▮";

/// Render the phone frame centered in `area`, with compliance badges below
pub fn render_preview(f: &mut Frame, area: Rect, model: &PreviewModel) {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(PHONE_HEIGHT.min(area.height.saturating_sub(2))),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(PHONE_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .split(v_chunks[1]);
    let phone_area = h_chunks[1];

    let frame = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Gray));
    let screen = frame.inner(phone_area);
    f.render_widget(frame, phone_area);

    let background = Style::default().bg(to_color(model.background)).fg(Color::Black);
    f.render_widget(Block::default().style(background), screen);

    if let Some(ref splash) = model.splash {
        render_splash(f, screen, &splash.text, to_color(splash.color));
    } else {
        render_screen(f, screen, model, background);
    }

    let badges = Paragraph::new(Line::from(vec![
        Span::styled(
            model.badges[0],
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            model.badges[1],
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(badges, v_chunks[2]);
}

fn render_screen(f: &mut Frame, screen: Rect, model: &PreviewModel, background: Style) {
    let theme = to_color(model.theme);

    let top_height = 1 + u16::from(model.top_bar.is_some());
    let bottom_height = u16::from(model.ad_banner)
        + match model.bottom_chrome {
            BottomChrome::None => 0,
            BottomChrome::Floating | BottomChrome::Tabs => 1,
        };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(top_height),
            Constraint::Min(0),
            Constraint::Length(bottom_height),
        ])
        .split(screen);

    // Status bar and optional title bar
    let clock = format!(" {}", model.status_time);
    let gap = (screen.width as usize).saturating_sub(clock.width() + SIGNAL_ICONS.width() + 1);
    let mut top = vec![Line::from(vec![
        Span::styled(clock, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" ".repeat(gap)),
        Span::raw(SIGNAL_ICONS),
    ])];
    if let Some(ref title) = model.top_bar {
        top.push(Line::from(Span::styled(
            format!(" {}", title),
            Style::default().bg(theme).fg(Color::White).add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(top).style(background), chunks[0]);

    // Body
    let mut body = Vec::new();
    if model.refresh_indicator {
        body.push(Line::from(Span::styled("↻", Style::default().fg(theme))));
    }
    body.push(Line::from(""));
    body.push(Line::from(Span::styled(
        model.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    body.push(Line::from(Span::styled(
        model.subtitle,
        Style::default().fg(Color::DarkGray),
    )));
    body.push(Line::from(""));
    for width in [20usize, 14, 18] {
        body.push(Line::from(Span::styled(
            "▒".repeat(width),
            Style::default().fg(Color::Gray),
        )));
    }
    f.render_widget(
        Paragraph::new(body)
            .style(background)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    // Ad banner and bottom navigation
    let mut bottom = Vec::new();
    if model.ad_banner {
        bottom.push(Line::from(Span::styled(
            " AdMob Placement ",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        )));
    }
    match model.bottom_chrome {
        BottomChrome::Floating => bottom.push(Line::from(Span::styled(
            " ⌂   ⌕   ☰ ",
            Style::default().bg(theme).fg(Color::White),
        ))),
        BottomChrome::Tabs => bottom.push(Line::from(vec![
            Span::styled(" Home ", Style::default().bg(theme).fg(Color::White)),
            Span::raw(" Search "),
            Span::raw(" Menu "),
        ])),
        BottomChrome::None => {}
    }
    f.render_widget(
        Paragraph::new(bottom)
            .style(background)
            .alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_splash(f: &mut Frame, screen: Rect, text: &str, color: Color) {
    f.render_widget(Clear, screen);
    let middle = screen.height / 2;
    let mut lines: Vec<Line> = (0..middle).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(color))
            .alignment(Alignment::Center),
        screen,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{AppDraft, ExportPhase, FieldUpdate, NavigationStyle};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(model: &PreviewModel) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 34)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render_preview(f, area, model);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_preview_shows_draft() {
        let mut draft = AppDraft::default();
        draft.apply(FieldUpdate::AppName("Crab Shop".to_string()));
        draft.apply(FieldUpdate::AdMobEnabled(true));
        let screen = draw(&PreviewModel::project(&draft, ExportPhase::Idle));

        assert!(screen.contains("9:41"));
        assert!(screen.contains("Crab Shop"));
        assert!(screen.contains("AdMob Placement"));
        assert!(screen.contains("API 36 COMPLIANT"));
    }

    #[test]
    fn test_tabs_navigation_drawn() {
        let mut draft = AppDraft::default();
        draft.apply(FieldUpdate::NavigationStyle(NavigationStyle::Tabs));
        let screen = draw(&PreviewModel::project(&draft, ExportPhase::Idle));
        assert!(screen.contains("Home"));
        assert!(!screen.contains("App Name"));
    }

    #[test]
    fn test_splash_replaces_screen_while_generating() {
        let mut draft = AppDraft::default();
        draft.apply(FieldUpdate::SplashText("Warming up".to_string()));
        let screen = draw(&PreviewModel::project(&draft, ExportPhase::InProgress));
        assert!(screen.contains("Warming up"));
        assert!(!screen.contains("9:41"));
    }
}
