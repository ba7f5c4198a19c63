//! Drawing
//!
//! Pure functions of [`App`]; nothing here mutates state.

use super::input::InputField;
use super::{App, Focus};
use crate::conversation::{NoticeKind, Role};
use crate::session::View;
use crate::summary::{render, Section, SummaryView};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

const URL_PLACEHOLDER: &str = "Enter Wikipedia URL...";
const QUESTION_PLACEHOLDER: &str = "Ask about this article...";
const ANALYZING: &str = "Analyzing content...";
const ASSISTANT_READY: &str = "Assistant Ready";
const PROCESSING: &str = "Processing...";
const ACCENT: Color = Color::Cyan;

pub fn draw(frame: &mut Frame, app: &App) {
    match app.session.view() {
        View::Landing => draw_landing(frame, app),
        View::Dashboard => draw_dashboard(frame, app),
    }
    if let Some(message) = &app.alert {
        draw_alert(frame, message);
    }
}

fn draw_landing(frame: &mut Frame, app: &App) {
    let [_, title, subtitle, _, input, hint, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Wiki Explorer".bold().fg(ACCENT)).alignment(Alignment::Center),
        title,
    );
    frame.render_widget(
        Paragraph::new("Summarize a Wikipedia article and ask it questions".dim())
            .alignment(Alignment::Center),
        subtitle,
    );

    let [input] = Layout::horizontal([Constraint::Max(72)])
        .flex(Flex::Center)
        .areas(input);
    draw_input(frame, input, &app.url_input, URL_PLACEHOLDER, true, " URL ");

    frame.render_widget(
        Paragraph::new(status_line(app, "Enter analyze · Ctrl-C quit")).alignment(Alignment::Center),
        hint,
    );
}

fn draw_dashboard(frame: &mut Frame, app: &App) {
    let [header, url_bar, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Paragraph::new(header_line(app)), header);

    let url_focused = app.focus == Focus::Url && !app.session.is_analyzing();
    if url_focused {
        draw_input(frame, url_bar, &app.url_input, URL_PLACEHOLDER, app.can_load(), " Load another ");
    } else {
        let current = Paragraph::new(app.session.url.as_str().dim())
            .block(Block::bordered().title(" Article "));
        frame.render_widget(current, url_bar);
    }

    if app.session.is_analyzing() {
        let [middle] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(body);
        frame.render_widget(
            Paragraph::new(ANALYZING.fg(ACCENT)).alignment(Alignment::Center),
            middle,
        );
    } else {
        let [summary, chat] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);
        draw_summary(frame, summary, app);
        draw_chat(frame, chat, app);
    }

    frame.render_widget(
        Paragraph::new(status_line(
            app,
            "Enter send · Tab switch input · PgUp/PgDn scroll · Ctrl-Y copy · Ctrl-R reset · Ctrl-C quit",
        )),
        footer,
    );
}

fn header_line(app: &App) -> Line<'static> {
    let title = match app.session.summary.as_ref().map(render) {
        Some(SummaryView::Sections(sections)) => sections.iter().find_map(|s| match s {
            Section::Title { headline, .. } => Some(headline.clone()),
            _ => None,
        }),
        Some(SummaryView::Invalid { .. }) => None,
        None => Some("Analyzing".to_string()),
    }
    .filter(|t| !t.is_empty())
    .unwrap_or_else(|| "Untitled".to_string());

    let mut spans = vec![" Wiki Explorer ".bold().fg(ACCENT), Span::raw(" "), title.bold()];
    if app.session.is_loading {
        spans.push("  loading…".dim());
    }
    Line::from(spans)
}

/// Transient status if any, otherwise the key hints.
fn status_line(app: &App, hints: &'static str) -> Line<'static> {
    match &app.status {
        Some(status) => Line::from(status.clone().fg(Color::Yellow)),
        None => Line::from(hints.dim()),
    }
}

fn draw_input(
    frame: &mut Frame,
    area: Rect,
    field: &InputField,
    placeholder: &str,
    enabled: bool,
    title: &str,
) {
    let border = if enabled {
        Style::new().fg(ACCENT)
    } else {
        Style::new().add_modifier(Modifier::DIM)
    };
    let block = Block::bordered().title(title.to_string()).border_style(border);
    let inner = block.inner(area);

    let content = if field.value().is_empty() {
        Line::from(placeholder.to_string().dim())
    } else {
        Line::from(field.value().to_string())
    };

    // Keep the cursor in view on long input
    let cursor = u16::try_from(field.cursor_column()).unwrap_or(u16::MAX);
    let offset = cursor.saturating_sub(inner.width.saturating_sub(1));
    frame.render_widget(Paragraph::new(content).block(block).scroll((0, offset)), area);

    if enabled {
        frame.set_cursor_position(Position::new(inner.x + cursor - offset, inner.y));
    }
}

fn draw_summary(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered().title(" Summary ");
    let Some(payload) = &app.session.summary else {
        frame.render_widget(block, area);
        return;
    };

    let paragraph = match render(payload) {
        SummaryView::Invalid { reason } => Paragraph::new(vec![
            Line::from("Invalid data format".bold().fg(Color::Red)),
            Line::default(),
            Line::from(reason.fg(Color::Red)),
        ])
        .block(block.border_style(Style::new().fg(Color::Red))),
        SummaryView::Sections(sections) => Paragraph::new(summary_text(&sections))
            .block(block)
            .scroll((app.summary_scroll, 0)),
    };
    frame.render_widget(paragraph.wrap(Wrap { trim: false }), area);
}

fn summary_text(sections: &[Section]) -> Text<'static> {
    let mut lines = Vec::new();
    for section in sections {
        match section {
            Section::Title { full, .. } => {
                lines.push(Line::from(full.clone().bold().fg(ACCENT)));
            }
            Section::ExecutiveSummary(text) | Section::Tldr(text) => {
                lines.push(heading(section));
                lines.push(Line::from(text.clone()));
            }
            Section::TechnicalStack(stack) => {
                lines.push(heading(section));
                lines.extend(stack.iter().map(|item| {
                    Line::from(vec![
                        "• ".into(),
                        item.component.clone().bold(),
                        Span::raw(format!(": {}", item.role)),
                    ])
                }));
            }
            Section::DetailedBreakdown(parts) => {
                lines.push(heading(section));
                for part in parts {
                    lines.push(Line::from(part.section_title.clone().underlined()));
                    lines.push(Line::from(part.content.clone()));
                    lines.extend(part.bullets.iter().map(|b| Line::from(format!("  • {b}"))));
                }
            }
            Section::UseCases(cases) => {
                lines.push(heading(section));
                lines.extend(cases.iter().map(|c| Line::from(format!("• {c}"))));
            }
        }
        lines.push(Line::default());
    }
    Text::from(lines)
}

fn heading(section: &Section) -> Line<'static> {
    Line::from(section.heading().to_uppercase().bold().fg(Color::Yellow))
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &App) {
    let [messages, input] = Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

    let block = Block::bordered().title(" Assistant ");
    let inner = block.inner(messages);
    let text = chat_text(app);
    let height = wrapped_height(&text, inner.width);
    let scroll = height.saturating_sub(inner.height);
    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        messages,
    );

    let focused = app.focus == Focus::Question;
    draw_input(
        frame,
        input,
        &app.question_input,
        QUESTION_PLACEHOLDER,
        focused && app.can_ask(),
        " Question ",
    );
}

fn chat_text(app: &App) -> Text<'static> {
    let turns = app.session.log.turns();
    if turns.is_empty() && !app.session.is_composing() {
        return Text::from(Line::from(ASSISTANT_READY.dim()).alignment(Alignment::Center));
    }

    let mut lines = Vec::new();
    for (index, turn) in turns.iter().enumerate() {
        match turn.role {
            Role::User => {
                lines.push(Line::from("You".bold()).alignment(Alignment::Right));
                lines.push(Line::from(turn.content.clone()).alignment(Alignment::Right));
            }
            Role::Assistant => match turn.notice_kind() {
                Some(kind) => {
                    let label = match kind {
                        NoticeKind::Operational => "SYSTEM ALERT",
                        NoticeKind::TechnicalError => "SYSTEM ALERT · TECHNICAL ERROR",
                    };
                    lines.push(Line::from(label.bold().fg(Color::Red)));
                    lines.push(Line::from(turn.content.clone().fg(Color::Red)));
                }
                None => {
                    lines.push(Line::from("Assistant".bold().fg(ACCENT)));
                    lines.push(Line::from(app.visible_text(index).to_string()));
                }
            },
        }
        lines.push(Line::default());
    }
    if app.session.is_composing() {
        lines.push(Line::from(PROCESSING.italic().dim()));
    }
    Text::from(lines)
}

/// Rows `text` takes once wrapped to `width`.
fn wrapped_height(text: &Text, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn draw_alert(frame: &mut Frame, message: &str) {
    let [area] = Layout::horizontal([Constraint::Max(60)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::vertical([Constraint::Length(6)])
        .flex(Flex::Center)
        .areas(area);

    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::default(),
        Line::from("Enter/Esc to dismiss".dim()),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .title(" Error ")
            .border_style(Style::new().fg(Color::Red)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Notice;
    use crate::session::Session;
    use crate::summary::SummaryPayload;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn dashboard(summary: &str) -> Session {
        let mut session = Session::new();
        session.url = "https://en.wikipedia.org/wiki/Rust".to_string();
        session.summary = Some(SummaryPayload::from(summary));
        session
    }

    #[test]
    fn test_landing_shows_url_prompt() {
        let app = App::new(1);
        let out = screen(&app);
        assert!(out.contains("Wiki Explorer"));
        assert!(out.contains(URL_PLACEHOLDER));
    }

    #[test]
    fn test_analyzing_placeholder() {
        let mut app = App::new(1);
        let mut session = Session::new();
        session.is_loading = true;
        app.apply_snapshot(session);

        let out = screen(&app);
        assert!(out.contains(ANALYZING));
        assert!(!out.contains(ASSISTANT_READY));
    }

    #[test]
    fn test_dashboard_sections_and_empty_chat() {
        let mut app = App::new(1);
        app.apply_snapshot(dashboard(
            r#"{"title":"Rust (programming language) overview","executive_summary":"A systems language.","tldr":"Fast and safe."}"#,
        ));

        let out = screen(&app);
        // Header carries the first four words only
        assert!(out.contains("Rust (programming language) overview"));
        assert!(out.contains("EXECUTIVE SUMMARY"));
        assert!(out.contains("A systems language."));
        assert!(out.contains("TL;DR"));
        assert!(out.contains(ASSISTANT_READY));
    }

    #[test]
    fn test_invalid_summary_panel() {
        let mut app = App::new(1);
        app.apply_snapshot(dashboard("not json at all"));

        let out = screen(&app);
        assert!(out.contains("Invalid data format"));
        assert!(!out.contains("EXECUTIVE SUMMARY"));
        // Chat stays available
        assert!(out.contains(ASSISTANT_READY));
    }

    #[test]
    fn test_chat_turns_and_processing() {
        let mut app = App::new(1);
        let mut session = dashboard(r#"{"title":"Rust"}"#);
        session.log.push_user("What is Rust?");
        session.log.push_assistant("SYSTEM NOTICE: index rebuilding");
        session.log.push_user("Again?");
        session.log.set_composing(true);
        app.apply_snapshot(session);

        let out = screen(&app);
        assert!(out.contains("What is Rust?"));
        assert!(out.contains("SYSTEM ALERT"));
        assert!(out.contains(PROCESSING));
    }

    #[test]
    fn test_revealed_answer_grows_with_ticks() {
        let mut app = App::new(1);
        let mut session = dashboard(r#"{"title":"Rust"}"#);
        session.log.push_user("Q");
        session.log.push_assistant("Borrow checker");
        app.apply_snapshot(session);

        assert!(!screen(&app).contains("Borrow checker"));
        while app.on_reveal_tick() {}
        assert!(screen(&app).contains("Borrow checker"));
    }

    #[test]
    fn test_alert_popup() {
        let mut app = App::new(1);
        app.apply_notice(Notice::Alert("Failed to load article.".to_string()));
        let out = screen(&app);
        assert!(out.contains("Failed to load article."));
        assert!(out.contains("Enter/Esc to dismiss"));
    }

    #[test]
    fn test_wrapped_height() {
        let text = Text::from(vec![Line::from("abcdef"), Line::default(), Line::from("ab")]);
        assert_eq!(wrapped_height(&text, 4), 4);
        assert_eq!(wrapped_height(&text, 10), 3);
    }
}
