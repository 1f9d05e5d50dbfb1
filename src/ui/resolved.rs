use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use crate::api::types::Rustlink;
use crate::app::{Candidate, Resolution};

pub struct ResolvedPanel<'a> {
    pub resolution: &'a Resolution,
    pub redirect_base: &'a str,
}

impl<'a> Widget for ResolvedPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = match self.resolution {
            Resolution::Resolved(_) => Color::Green,
            Resolution::Failed(_) => Color::Red,
            _ => Color::Gray,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(" Short link ");
        let inner = block.inner(area);
        block.render(area, buf);

        let lines = match self.resolution {
            Resolution::Idle => vec![Line::styled(
                "Pick a result to open it, or the last entry to shorten",
                Style::default().fg(Color::DarkGray),
            )],
            Resolution::Loading { candidate, .. } => {
                let text = match candidate {
                    Candidate::Existing { alias, .. } => format!("Looking up {}...", alias),
                    Candidate::Create { target } => format!("Shortening {}...", target),
                };
                vec![Line::styled(text, Style::default().fg(Color::Yellow))]
            }
            Resolution::Resolved(link) => link_lines(link, self.redirect_base),
            Resolution::Failed(_) => vec![Line::styled(
                "Nothing resolved",
                Style::default().fg(Color::DarkGray),
            )],
        };

        for (i, line) in lines.into_iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            line.render(Rect::new(inner.x, inner.y + i as u16, inner.width, 1), buf);
        }
    }
}

fn link_lines(link: &Rustlink, redirect_base: &str) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Link    ", label),
            Span::styled(
                link.short_url(redirect_base),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Target  ", label),
            Span::styled(link.target.clone(), Style::default().fg(Color::White)),
        ]),
    ];
    if let Some(views) = link.views {
        lines.push(Line::from(vec![
            Span::styled("Views   ", label),
            Span::styled(
                format!(
                    "{} today, {} this week, {} total",
                    views.today, views.week, views.all
                ),
                Style::default().fg(Color::Gray),
            ),
        ]));
    }
    lines
}
