use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use sortscope_core::session::{MAX_LEN, MIN_LEN};

use crate::app::{Advisory, App};
use crate::input::Action;
use crate::keymap::Keymap;
use crate::theme::Theme;

/// Rows of the help popup: action and description
const HELP_ROWS: [(Action, &str); 14] = [
    (Action::Generate, "Generate a new random array"),
    (Action::CustomArray, "Enter a custom array"),
    (Action::Start, "Start sorting"),
    (Action::TogglePause, "Pause / resume"),
    (Action::NextAlgorithm, "Next algorithm"),
    (Action::PrevAlgorithm, "Previous algorithm"),
    (Action::SizeUp, "Grow array"),
    (Action::SizeDown, "Shrink array"),
    (Action::SpeedUp, "Faster"),
    (Action::SpeedDown, "Slower"),
    (Action::Explain, "Explain the algorithm"),
    (Action::Quiz, "Quiz about the algorithm"),
    (Action::Help, "Toggle this help"),
    (Action::Quit, "Quit"),
];

pub struct PopupWidget;

impl PopupWidget {
    /// Render the custom array input box
    pub fn render_custom_input(frame: &mut Frame, input: &str, theme: &Theme) {
        let area = frame.area();
        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 6u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Custom Array ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Prompt
                Constraint::Length(1), // Input
                Constraint::Length(1), // Spacer
                Constraint::Length(1), // Hint
            ])
            .split(inner_area);

        let prompt = format!("{} to {} comma-separated numbers", MIN_LEN, MAX_LEN);
        frame.render_widget(
            Paragraph::new(Span::styled(prompt, Style::default().fg(theme.grey1))),
            chunks[0],
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("> ", Style::default().fg(theme.accent)),
                Span::styled(input, Style::default().fg(theme.fg0)),
                Span::styled("_", Style::default().fg(theme.accent).add_modifier(Modifier::SLOW_BLINK)),
            ])),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(Span::styled(
                "[Enter] load  [Esc] cancel",
                Style::default().fg(theme.grey1),
            ))
            .alignment(Alignment::Center),
            chunks[3],
        );
    }

    /// Render the explanation of the selected algorithm
    pub fn render_explanation(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let (title, body, color) = match &app.explanation {
            Some(Advisory::Loading(algorithm)) => (
                algorithm.display_name(),
                "Generating explanation...".to_string(),
                theme.grey1,
            ),
            Some(Advisory::Ready(algorithm, text)) => (algorithm.display_name(), text.clone(), theme.fg0),
            Some(Advisory::Failed(algorithm, error)) => (algorithm.display_name(), error.clone(), theme.error),
            None => (app.algorithm().display_name(), String::new(), theme.fg0),
        };

        let lines: Vec<Line> = body
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(color))))
            .collect();
        Self::render_text(frame, &format!("About {}", title), lines, theme);
    }

    /// Render the quiz for the selected algorithm
    pub fn render_quiz(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let mut lines = Vec::new();

        let title = match &app.quiz {
            Some(Advisory::Loading(algorithm)) => {
                lines.push(Line::from(Span::styled(
                    "Generating quiz questions...",
                    Style::default().fg(theme.grey1),
                )));
                algorithm.display_name()
            }
            Some(Advisory::Failed(algorithm, error)) => {
                lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(theme.error))));
                algorithm.display_name()
            }
            Some(Advisory::Ready(algorithm, quiz)) => {
                let current = quiz.current();
                for (qi, question) in quiz.questions().iter().enumerate() {
                    let marker = if current == Some(qi) { "▶ " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(marker, Style::default().fg(theme.accent)),
                        Span::styled(
                            format!("Q{}: {}", qi + 1, question.question),
                            Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
                        ),
                    ]));

                    let chosen = quiz.answer(qi);
                    for (oi, option) in question.options.iter().enumerate() {
                        let style = match chosen {
                            Some(_) if question.is_correct(option) => Style::default().fg(theme.success),
                            Some(c) if c == oi => Style::default().fg(theme.error),
                            Some(_) => Style::default().fg(theme.grey0),
                            None => Style::default().fg(theme.fg0),
                        };
                        lines.push(Line::from(Span::styled(
                            format!("    {}. {}", oi + 1, option),
                            style,
                        )));
                    }
                    lines.push(Line::default());
                }

                let (correct, answered) = quiz.score();
                let footer = if quiz.is_complete() {
                    format!("Score: {}/{}", correct, answered)
                } else {
                    "Press 1-4 to answer".to_string()
                };
                lines.push(Line::from(Span::styled(footer, Style::default().fg(theme.accent))));
                algorithm.display_name()
            }
            None => app.algorithm().display_name(),
        };

        Self::render_text(frame, &format!("{} Quiz", title), lines, theme);
    }

    /// Render the key binding reference
    pub fn render_help(frame: &mut Frame, keymap: &Keymap, theme: &Theme) {
        let lines: Vec<Line> = HELP_ROWS
            .iter()
            .filter_map(|(action, text)| {
                let key = keymap.describe(*action)?;
                Some(Line::from(vec![
                    Span::styled(
                        format!("{:>8}  ", key),
                        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*text, Style::default().fg(theme.fg0)),
                ]))
            })
            .collect();
        Self::render_text(frame, "Help", lines, theme);
    }

    /// Large centered popup with wrapped text
    fn render_text(frame: &mut Frame, title: &str, lines: Vec<Line>, theme: &Theme) {
        let area = frame.area();
        let popup_width = (area.width * 3 / 4).max(20).min(area.width);
        let popup_height = (area.height * 3 / 4).max(8).min(area.height);
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(" [Esc] close ").alignment(Alignment::Right))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
