use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use synapse::session::GameMode;

use crate::ui::theme::Theme;

/// What picking a menu entry does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Play(GameMode),
    Learn,
}

impl MenuAction {
    pub fn title(self) -> &'static str {
        match self {
            MenuAction::Play(mode) => mode.title(),
            MenuAction::Learn => "Synapse Learn",
        }
    }
}

pub struct MenuItem {
    pub key: String,
    pub action: MenuAction,
    pub description: String,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "1".to_string(),
                    action: MenuAction::Play(GameMode::Rush),
                    description: "Match each concept to its definition before time runs out".to_string(),
                },
                MenuItem {
                    key: "2".to_string(),
                    action: MenuAction::Play(GameMode::Apply),
                    description: "Name the concept a real-world scenario describes".to_string(),
                },
                MenuItem {
                    key: "3".to_string(),
                    action: MenuAction::Learn,
                    description: "Page through a short lesson on each concept".to_string(),
                },
            ],
            selected: 0,
            theme,
        }
    }

    pub fn select(&mut self, action: MenuAction) {
        if let Some(i) = self.items.iter().position(|item| item.action == action) {
            self.selected = i;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items
            .get(self.selected)
            .map_or(MenuAction::Play(GameMode::Rush), |item| item.action)
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "synapse",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Learn AI concepts, one round at a time",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];

        let title = Paragraph::new(title_lines).alignment(Alignment::Center);
        title.render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_text = format!(
                " {indicator} [{key}] {label}",
                key = item.key,
                label = item.action.title()
            );
            let desc_text = format!("     {}", item.description);

            let lines = vec![
                Line::from(Span::styled(
                    label_text,
                    Style::default()
                        .fg(if is_selected {
                            colors.accent()
                        } else {
                            colors.fg()
                        })
                        .add_modifier(if is_selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                )),
                Line::from(Span::styled(desc_text, Style::default().fg(colors.dim()))),
            ];

            let p = Paragraph::new(lines);
            if i < menu_layout.len() {
                p.render(menu_layout[i], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_both_ways() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        assert_eq!(menu.selected_action(), MenuAction::Play(GameMode::Rush));
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::Play(GameMode::Apply));
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::Learn);
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::Play(GameMode::Rush));
        menu.prev();
        assert_eq!(menu.selected_action(), MenuAction::Learn);
        menu.select(MenuAction::Play(GameMode::Rush));
        assert_eq!(menu.selected, 0);
    }
}
