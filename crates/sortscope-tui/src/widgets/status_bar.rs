use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sortscope_core::PlaybackState;

use crate::app::{App, Mode, StatusKind};
use crate::input::Action;
use crate::keymap::Keymap;

/// Actions advertised in the hint line
const HINTS: [(Action, &str); 8] = [
    (Action::Generate, "generate"),
    (Action::Start, "start"),
    (Action::TogglePause, "pause"),
    (Action::NextAlgorithm, "algorithm"),
    (Action::SizeUp, "size"),
    (Action::SpeedUp, "speed"),
    (Action::Help, "help"),
    (Action::Quit, "quit"),
];

pub struct StatusBarWidget;

impl StatusBarWidget {
    /// Two lines: run statistics, then the status message or key hints
    pub fn render(frame: &mut Frame, area: Rect, app: &App, keymap: &Keymap) {
        let theme = &app.theme;
        let session = &app.session;

        let state_str = match &app.mode {
            Mode::CustomInput(_) => "INPUT",
            Mode::Help => "HELP",
            Mode::Explanation | Mode::Quiz | Mode::Normal => match session.state() {
                PlaybackState::Idle => "READY",
                PlaybackState::Running => "SORTING",
                PlaybackState::Paused => "PAUSED",
                PlaybackState::Completed => "DONE",
            },
        };

        let counters = session.counters();
        let (cursor, total) = session
            .playback()
            .map(|p| (p.cursor(), p.steps().len()))
            .unwrap_or((0, 0));
        let speed = session.speed();

        let label = Style::default().fg(theme.grey1).bg(theme.bg2);
        let value = Style::default()
            .fg(theme.fg0)
            .bg(theme.bg2)
            .add_modifier(Modifier::BOLD);

        let stats = Line::from(vec![
            Span::styled(
                format!(" {} ", state_str),
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Comparisons: ", label),
            Span::styled(counters.comparisons.to_string(), value),
            Span::styled("  Swaps: ", label),
            Span::styled(counters.swaps.to_string(), value),
            Span::styled("  Step: ", label),
            Span::styled(format!("{}/{}", cursor, total), value),
            Span::styled("  Size: ", label),
            Span::styled(app.array_size.to_string(), value),
            Span::styled("  Speed: ", label),
            Span::styled(
                format!("{} ({}ms)", speed.slider(), speed.delay().as_millis()),
                value,
            ),
            Span::styled(" ".repeat(area.width as usize), Style::default().bg(theme.bg2)),
        ]);

        let message = match &app.status_message {
            Some(msg) => {
                let color = match msg.kind {
                    StatusKind::Info => theme.fg0,
                    StatusKind::Success => theme.success,
                    StatusKind::Error => theme.error,
                };
                Line::from(Span::styled(format!(" {}", msg.text), Style::default().fg(color)))
            }
            None => {
                let hint: String = HINTS
                    .iter()
                    .filter_map(|(action, name)| {
                        keymap.describe(*action).map(|key| format!(" {}:{}", key, name))
                    })
                    .collect();
                Line::from(Span::styled(hint, Style::default().fg(theme.grey1)))
            }
        };

        let paragraph = Paragraph::new(vec![stats, message]).style(Style::default().bg(theme.bg0));
        frame.render_widget(paragraph, area);
    }
}
