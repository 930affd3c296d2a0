use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Rush countdown. Switches to the urgent color inside the warning window.
pub struct TimerBar<'a> {
    pub remaining: u32,
    pub ratio: f64,
    pub urgent: bool,
    pub theme: &'a Theme,
}

impl<'a> TimerBar<'a> {
    pub fn new(remaining: u32, ratio: f64, urgent: bool, theme: &'a Theme) -> Self {
        Self {
            remaining,
            ratio: ratio.clamp(0.0, 1.0),
            urgent,
            theme,
        }
    }
}

impl Widget for TimerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let fill = if self.urgent {
            colors.urgent()
        } else {
            colors.bar_filled()
        };

        let block = Block::bordered()
            .title(" Time ")
            .border_style(Style::default().fg(if self.urgent {
                colors.urgent()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        let label = format!("{}s", self.remaining);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
