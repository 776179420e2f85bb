use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use sortscope_core::Algorithm;

use crate::app::App;

pub struct AlgorithmsWidget;

impl AlgorithmsWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let selectable = app.session.controls().algorithm;
        let selected = app.algorithm();

        let border_style = if selectable {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.grey0)
        };

        let block = Block::default()
            .title(" Algorithms ")
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let items: Vec<ListItem> = Algorithm::ALL
            .iter()
            .map(|algorithm| {
                let style = if *algorithm == selected {
                    Style::default()
                        .fg(theme.fg0)
                        .bg(theme.bg2)
                        .add_modifier(Modifier::BOLD)
                } else if selectable {
                    Style::default().fg(theme.fg0)
                } else {
                    Style::default().fg(theme.grey1)
                };
                ListItem::new(Line::from(Span::styled(
                    format!(" {}", algorithm.display_name()),
                    style,
                )))
            })
            .collect();

        let mut state = ListState::default();
        state.select(Algorithm::ALL.iter().position(|a| *a == selected));

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut state);
    }
}
