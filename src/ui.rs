//! Flipdeck - UI rendering
//!
//! Renders the loading screen, the card, and the status bar using Ratatui widgets.

use crate::app::{App, CardText, Phase};
use crate::error::{LoadError, SessionError};
use crate::session::{Direction as SlideDirection, Face, Session};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Theme colors for the UI
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub answer: Color,
    pub error: Color,
    pub warning: Color,
    pub border: Color,
    pub muted: Color,
    pub marked: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Dracula-inspired dark theme
        Self {
            bg: Color::Rgb(40, 42, 54),
            fg: Color::Rgb(248, 248, 242),
            accent: Color::Rgb(139, 233, 253),
            answer: Color::Rgb(80, 250, 123),
            error: Color::Rgb(255, 85, 85),
            warning: Color::Rgb(255, 184, 108),
            border: Color::Rgb(98, 114, 164),
            muted: Color::Rgb(98, 114, 164),
            marked: Color::Rgb(241, 250, 140),
        }
    }
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::default();

    let (content, status) = split_screen(frame.area());

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.bg)),
        content,
    );

    match &app.phase {
        Phase::Loading => render_loading(frame, app, content, &theme),
        Phase::Ready(session) => {
            if let Some(text) = &app.shown {
                render_card(frame, app, session, text, content, &theme);
            }
        }
        Phase::Failed(err) => render_failure(frame, err, content, &theme),
    }

    render_status_bar(frame, app, status, &theme);

    if app.show_help {
        render_help_popup(frame, &theme);
    }
}

/// Main layout: content area + status bar
fn split_screen(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Resting position of the card for a frame of this size
pub fn card_rect(frame_area: Rect) -> Rect {
    centered_rect(70, 60, split_screen(frame_area).0)
}

/// Spinner shown while the deck is being fetched
fn render_loading(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let spinner = SPINNER[(app.ticks as usize / 4) % SPINNER.len()];
    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(spinner, Style::default().fg(theme.accent)),
            Span::styled(
                format!(" Loading cards from {}...", app.source_name),
                Style::default().fg(theme.fg),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bg));
    frame.render_widget(paragraph, centered_rect(80, 30, area));
}

/// Error panel shown when no session could start
fn render_failure(frame: &mut Frame, err: &LoadError, area: Rect, theme: &Theme) {
    let hint = match err {
        LoadError::Fetch(_) => "Check the URL or path and try again.",
        LoadError::Session(SessionError::EmptyDataset) => {
            "The source has a header row but no cards."
        }
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(theme.fg))),
        Line::from(""),
        Line::from(Span::styled("Press q to quit", Style::default().fg(theme.muted))),
    ];

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    " Could not load deck ",
                    Style::default().fg(theme.error),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .style(Style::default().bg(theme.bg)),
        );

    frame.render_widget(panel, centered_rect(70, 50, area));
}

/// Render the current card, shifted while a slide is running
fn render_card(
    frame: &mut Frame,
    app: &App,
    session: &Session,
    text: &CardText,
    area: Rect,
    theme: &Theme,
) {
    let mut card_area = centered_rect(70, 60, area);

    if let Some((direction, progress)) = app.slide_progress() {
        let offset = ((1.0 - progress) * f32::from(area.width) / 4.0) as u16;
        card_area = shift_rect(card_area, area, direction, offset);
    }

    let face = session.face();

    let (body, face_color) = match face {
        Face::Front => (text.question.as_str(), theme.accent),
        Face::Back => (text.answer.as_str(), theme.answer),
    };

    let star = if text.marked {
        Span::styled(" ★ marked ", Style::default().fg(theme.marked).add_modifier(Modifier::BOLD))
    } else {
        Span::styled(" ☆ ", Style::default().fg(theme.muted))
    };

    let padding = (card_area.height as usize).saturating_sub(3) / 2;
    let mut lines: Vec<Line> = std::iter::repeat_with(|| Line::from(""))
        .take(padding.saturating_sub(1))
        .collect();
    lines.push(Line::from(Span::styled(
        body.to_string(),
        Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(face_color))
                .title(Span::styled(
                    format!(" {} ", face.label()),
                    Style::default().fg(face_color).add_modifier(Modifier::BOLD),
                ))
                .title(Line::from(star).right_aligned())
                .title_bottom(
                    Line::from(Span::styled(
                        format!(" {} ", text.position.label()),
                        Style::default().fg(theme.muted),
                    ))
                    .centered(),
                )
                .style(Style::default().bg(theme.bg)),
        );

    frame.render_widget(Clear, card_area);
    frame.render_widget(card, card_area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            " Flipdeck ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled("|", Style::default().fg(theme.border)),
        Span::styled(format!(" {} ", app.source_name), Style::default().fg(theme.fg)),
    ];

    if let (Some(session), Some(text)) = (app.session(), &app.shown) {
        spans.push(Span::styled("|", Style::default().fg(theme.border)));
        spans.push(Span::styled(
            format!(" {} ", text.position.label()),
            Style::default().fg(theme.fg),
        ));
        spans.push(Span::styled("|", Style::default().fg(theme.border)));
        spans.push(Span::styled(
            format!(" {} marked ", session.marked_count()),
            Style::default().fg(theme.marked),
        ));
    }

    spans.push(Span::styled("|", Style::default().fg(theme.border)));
    spans.push(Span::styled(
        " ←/→:Move Space:Flip m:Mark ?:Help q:Quit ",
        Style::default().fg(theme.muted),
    ));

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg)),
    );

    frame.render_widget(status_bar, area);
}

/// Render help popup
fn render_help_popup(frame: &mut Frame, theme: &Theme) {
    let area = centered_rect(50, 60, frame.area());

    frame.render_widget(Clear, area);

    let key = |k: &'static str, what: &'static str, color: Color| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", k), Style::default().fg(color)),
            Span::raw(what),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("Right / l / n", "Next card", theme.warning),
        key("Left / h / p", "Previous card", theme.warning),
        key("Space / Enter", "Flip card (or click)", theme.accent),
        key("m / s", "Mark or unmark card", theme.marked),
        Line::from(""),
        key("?", "Toggle this help", theme.muted),
        key("q / Esc", "Quit", theme.error),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", Style::default().fg(theme.accent)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.bg)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, area);
}

/// Move `rect` sideways by `offset`, keeping it inside `bounds`.
///
/// Cards moving to the next position slide in from the right, cards moving
/// back slide in from the left.
fn shift_rect(rect: Rect, bounds: Rect, direction: SlideDirection, offset: u16) -> Rect {
    match direction {
        SlideDirection::Next => {
            let x = rect.x.saturating_add(offset).min(bounds.right());
            Rect {
                x,
                width: rect.width.min(bounds.right().saturating_sub(x)),
                ..rect
            }
        }
        SlideDirection::Prev => {
            let x = rect.x.saturating_sub(offset).max(bounds.x);
            Rect { x, ..rect }
        }
    }
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{Action, Settings};
    use crate::error::FetchError;
    use crate::events::AppEvent;
    use crate::tabular;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn ready_app() -> App {
        let settings = Settings {
            animate: false,
            ..Settings::default()
        };
        let mut app = App::new("capitals.csv", settings);
        let records = tabular::parse("question,answer\nCapital of Japan?,Tokyo\nRed planet?,Mars");
        app.handle_event(AppEvent::Loaded(Ok(Session::new(records).unwrap())));
        app
    }

    #[test]
    fn test_render_loading() {
        let app = App::new("docs.example.com", Settings::default());
        let screen = draw(&app);
        assert!(screen.contains("Loading cards from docs.example.com"));
    }

    #[test]
    fn test_render_card_faces() {
        let mut app = ready_app();
        let screen = draw(&app);
        assert!(screen.contains("QUESTION"));
        assert!(screen.contains("Capital of Japan?"));
        assert!(screen.contains("Card 1 of 2"));
        assert!(!screen.contains("Tokyo"));

        app.apply(Action::Flip, Instant::now());
        let screen = draw(&app);
        assert!(screen.contains("ANSWER"));
        assert!(screen.contains("Tokyo"));
    }

    #[test]
    fn test_render_mark_and_progress() {
        let mut app = ready_app();
        app.apply(Action::Next, Instant::now());
        app.apply(Action::ToggleMark, Instant::now());

        let screen = draw(&app);
        assert!(screen.contains("Red planet?"));
        assert!(screen.contains("Card 2 of 2"));
        assert!(screen.contains("★ marked"));
        assert!(screen.contains("1 marked"));

        app.apply(Action::ToggleMark, Instant::now());
        let screen = draw(&app);
        assert!(!screen.contains("★ marked"));
        assert!(screen.contains("0 marked"));
    }

    #[test]
    fn test_star_follows_visible_card() {
        let mut app = App::new("capitals.csv", Settings::default());
        let records = tabular::parse("question,answer\nCapital of Japan?,Tokyo\nRed planet?,Mars");
        app.handle_event(AppEvent::Loaded(Ok(Session::new(records).unwrap())));
        let t0 = Instant::now();

        app.apply(Action::ToggleMark, t0);
        app.apply(Action::Next, t0);
        app.tick(t0 + Duration::from_millis(50));
        let screen = draw(&app);
        assert!(screen.contains("Capital of Japan?"));
        assert!(screen.contains("★ marked"));

        app.tick(t0 + Duration::from_millis(200));
        let screen = draw(&app);
        assert!(screen.contains("Red planet?"));
        assert!(!screen.contains("★ marked"));
    }

    #[test]
    fn test_card_rect_excludes_status_bar() {
        let frame = Rect::new(0, 0, 100, 30);
        let card = card_rect(frame);
        assert!(card.width > 0 && card.height > 0);
        assert!(card.bottom() <= 27);
        assert!(card.x > 0 && card.right() < 100);
    }

    #[test]
    fn test_render_failures() {
        let mut app = App::new("deck.csv", Settings::default());
        app.handle_event(AppEvent::Loaded(Err(SessionError::EmptyDataset.into())));
        let screen = draw(&app);
        assert!(screen.contains("Could not load deck"));
        assert!(screen.contains("deck has no cards"));

        let mut app = App::new("deck.csv", Settings::default());
        let err = FetchError::Io {
            origin: "deck.csv".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        app.handle_event(AppEvent::Loaded(Err(err.into())));
        let screen = draw(&app);
        assert!(screen.contains("failed to read deck.csv"));
    }

    #[test]
    fn test_render_help() {
        let mut app = ready_app();
        app.apply(Action::ToggleHelp, Instant::now());
        let screen = draw(&app);
        assert!(screen.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_shift_rect_stays_in_bounds() {
        let bounds = Rect::new(0, 0, 100, 30);
        let card = Rect::new(15, 6, 70, 18);

        let right = shift_rect(card, bounds, SlideDirection::Next, 25);
        assert_eq!(right.x, 40);
        assert!(right.right() <= bounds.right());

        let left = shift_rect(card, bounds, SlideDirection::Prev, 25);
        assert_eq!(left.x, 0);
        assert_eq!(left.width, 70);
    }
}
