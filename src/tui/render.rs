//! Wizard Rendering
//!
//! Draws the step form on the left and the device preview on the right.

use super::app::App;
use super::form::{ExportAction, Field, FieldKind, WizardForm};
use super::preview_render;
use crate::wizard::guides::export_summary;
use crate::wizard::preview::Rgb;
use crate::wizard::validate::all_issues;
use crate::wizard::WizardStep;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Main color palette
pub(super) const BRAND_BLUE: Color = Color::Rgb(59, 130, 246);
pub(super) const BRAND_GOLD: Color = Color::Rgb(218, 165, 32);
pub(super) const ACCENT_GOLD: Color = Color::Rgb(184, 134, 11);

/// Below this width the preview is dropped
const MIN_WIDTH_FOR_PREVIEW: u16 = 96;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the whole screen
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width >= MIN_WIDTH_FOR_PREVIEW {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(56), Constraint::Length(38)])
            .split(area);
        render_form(f, chunks[0], app);
        preview_render::render_preview(f, chunks[1], &app.preview());
    } else {
        render_form(f, area, app);
    }
}

pub(super) fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let session = &form.session;
    let step = session.step();

    let mut lines: Vec<Line<'static>> = Vec::new();

    // Header
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        render_progress_dots(step),
        Style::default().fg(BRAND_BLUE),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        step.title().to_string(),
        Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        step.subtitle().to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if step == WizardStep::Export {
        render_export(&mut lines, app);
    } else {
        render_fields(&mut lines, form);
    }

    if let Some(ref status) = form.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Green),
        )));
    }

    if let Some(ref err) = form.error_message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  ! {}", err),
            Style::default().fg(Color::Red),
        )));
    }

    // Navigation footer, hidden once a build has started
    lines.push(Line::from(""));
    if session.is_export_complete() {
        lines.push(footer(&[("[↑↓] ", "Select  "), ("[Enter] ", "Run")]));
    } else if !session.navigation_locked() {
        let confirm = if step == WizardStep::Export {
            "Build App"
        } else {
            "Next"
        };
        lines.push(footer(&[
            ("[Esc] ", "Back  "),
            ("[Tab] ", "Next Field  "),
            ("[Enter] ", confirm),
        ]));
        lines.push(Line::from(Span::styled(
            "  [Ctrl+S] Save preset  [Ctrl+C] Quit",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!(
        " AppForge ({}/{}) {} ",
        step.number(),
        WizardStep::total(),
        step.label()
    );

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE))
                .title(Span::styled(
                    title,
                    Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
                )),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Progress dots (filled for reached steps, hollow for the rest)
fn render_progress_dots(step: WizardStep) -> String {
    let dots = WizardStep::ALL
        .iter()
        .map(|s| if s.index() <= step.index() { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ");
    format!("  {}", dots)
}

fn footer(entries: &[(&'static str, &'static str)]) -> Line<'static> {
    let key_colors = [Color::Red, BRAND_BLUE, ACCENT_GOLD];
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, label)) in entries.iter().enumerate() {
        let color = if entries.len() == 2 {
            key_colors[i + 1]
        } else {
            key_colors[i % key_colors.len()]
        };
        spans.push(Span::styled(
            *key,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(*label, Style::default().fg(Color::White)));
    }
    Line::from(spans)
}

fn render_fields(lines: &mut Vec<Line<'static>>, form: &WizardForm) {
    let session = &form.session;

    for (i, field) in form.fields().into_iter().enumerate() {
        let focused = i == form.focused_field;
        let prefix = if focused { " > " } else { "   " };
        let label_style = Style::default().fg(if focused { BRAND_BLUE } else { Color::DarkGray });
        let value_style = Style::default()
            .fg(if focused { Color::White } else { Color::Gray })
            .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() });

        match field.kind() {
            FieldKind::Toggle => {
                let on = form.is_toggled(field);
                lines.push(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(ACCENT_GOLD)),
                    Span::styled(
                        if on { "[x]" } else { "[ ]" },
                        Style::default().fg(if on { BRAND_GOLD } else { Color::DarkGray }),
                    ),
                    Span::styled(format!(" {}", field.label()), value_style),
                ]));
            }
            FieldKind::Choice => {
                lines.push(Line::from(vec![
                    Span::styled(prefix, Style::default().fg(ACCENT_GOLD)),
                    Span::styled(format!("{}: ", field.label()), label_style),
                    Span::styled(
                        format!("< {} >", form.display_value(field)),
                        value_style,
                    ),
                ]));
            }
            FieldKind::Text | FieldKind::Secret => {
                let value = form.display_value(field);
                let cursor = if focused { "_" } else { "" };
                let mut spans = vec![
                    Span::styled(prefix, Style::default().fg(ACCENT_GOLD)),
                    Span::styled(format!("{}: ", field.label()), label_style),
                ];
                if value.is_empty() && !focused {
                    spans.push(Span::styled(
                        field.placeholder().to_string(),
                        Style::default().fg(Color::DarkGray),
                    ));
                } else {
                    spans.push(Span::styled(format!("{}{}", value, cursor), value_style));
                }
                if let Some(rgb) = swatch(form, field) {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled("  ", Style::default().bg(to_color(rgb))));
                }
                lines.push(Line::from(spans));
            }
        }

        if field == Field::WebsiteUrl
            && let Some(err) = session.url_error()
        {
            lines.push(Line::from(Span::styled(
                format!("     {}", err),
                Style::default().fg(Color::Red),
            )));
        }
    }

    let issues: Vec<_> = session
        .current_issues()
        .into_iter()
        .filter(|issue| issue.field != "website_url")
        .collect();
    if !issues.is_empty() {
        lines.push(Line::from(""));
        for issue in issues {
            lines.push(Line::from(Span::styled(
                format!("   ~ {}", issue.message),
                Style::default().fg(Color::Yellow),
            )));
        }
    }
}

fn swatch(form: &WizardForm, field: Field) -> Option<Rgb> {
    let draft = form.session.draft();
    match field {
        Field::ThemeColor => Rgb::from_hex(&draft.theme_color),
        Field::BackgroundColor => Rgb::from_hex(&draft.background_color),
        _ => None,
    }
}

fn render_export(lines: &mut Vec<Line<'static>>, app: &App) {
    let form = &app.form;
    let session = &form.session;

    if session.is_generating() {
        let spinner = SPINNER[app.animation_frame % SPINNER.len()];
        lines.push(Line::from(Span::styled(
            format!("  {} Building your app...", spinner),
            Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "    Compiling resources, signing, optimizing",
            Style::default().fg(Color::DarkGray),
        )));
        return;
    }

    if session.is_export_complete() {
        lines.push(Line::from(Span::styled(
            "  Build successful. Choose what to do next:",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        for action in ExportAction::ALL {
            let focused = action == form.focused_action();
            lines.push(Line::from(vec![
                Span::styled(
                    if focused { " > " } else { "   " },
                    Style::default().fg(ACCENT_GOLD),
                ),
                Span::styled(
                    action.label().to_string(),
                    Style::default()
                        .fg(if focused { Color::White } else { Color::DarkGray })
                        .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
                ),
            ]));
        }
        return;
    }

    for (label, value) in export_summary(session.draft()) {
        lines.push(Line::from(vec![
            Span::styled(format!("   {:<14}", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ]));
    }

    let issues = all_issues(session.draft());
    if !issues.is_empty() {
        lines.push(Line::from(""));
        for (step, issue) in issues {
            lines.push(Line::from(Span::styled(
                format!("   ~ {}: {}", step.label(), issue.message),
                Style::default().fg(Color::Yellow),
            )));
        }
    }
}
