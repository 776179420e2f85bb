use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use crate::app::App;

/// Widest a single bar gets, in cells
const MAX_BAR_WIDTH: u16 = 9;

pub struct BarsWidget;

impl BarsWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar_set = app.session.bars();

        let block = Block::default()
            .title(format!(" {} ", app.algorithm().display_name()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.grey0))
            .style(Style::default().bg(theme.bg0));

        let inner_width = block.inner(area).width;
        let (bar_width, bar_gap) = bar_geometry(inner_width, bar_set.bars().len());

        let values = bar_set.values();
        let heights = bar_heights(&values);
        let max_height = heights.iter().copied().max().unwrap_or(0).max(1);

        let bars: Vec<Bar> = bar_set
            .bars()
            .iter()
            .zip(&heights)
            .map(|(bar, height)| {
                let color = theme.bar_color(bar.tags);
                let text = if app.config.ui.show_values {
                    bar.value.to_string()
                } else {
                    String::new()
                };
                Bar::default()
                    .value(*height)
                    .text_value(text)
                    .style(Style::default().fg(color))
                    .value_style(
                        Style::default()
                            .fg(theme.bg0)
                            .bg(color)
                            .add_modifier(Modifier::BOLD),
                    )
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(bar_gap)
            .max(max_height);

        frame.render_widget(chart, area);
    }
}

/// Bar width and gap that fit `count` bars into `width` cells
fn bar_geometry(width: u16, count: usize) -> (u16, u16) {
    if count == 0 {
        return (1, 1);
    }
    let gap = if width as usize >= count * 2 { 1 } else { 0 };
    let slot = (width as usize / count) as u16;
    let bar_width = slot.saturating_sub(gap).clamp(1, MAX_BAR_WIDTH);
    (bar_width, gap)
}

/// Chart heights for the displayed values. Negative values are lifted so
/// the smallest value still draws as a one-cell bar.
fn bar_heights(values: &[i64]) -> Vec<u64> {
    let floor = values.iter().copied().min().unwrap_or(0).min(0);
    values
        .iter()
        .map(|v| {
            let lifted = v.saturating_sub(floor);
            let lifted = if floor < 0 { lifted.saturating_add(1) } else { lifted };
            lifted.max(0) as u64
        })
        .collect()
}
