use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::ServerHealth;

pub struct Header<'a> {
    pub server_url: &'a str,
    pub health: ServerHealth,
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = Style::default().bg(Color::DarkGray);

        let title = Span::styled(
            " rustlinks ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let server = Span::styled(
            format!(" [{}] ", self.server_url),
            Style::default().fg(Color::Cyan).bg(Color::DarkGray),
        );

        let (label, color) = match self.health {
            ServerHealth::Unknown => ("checking", Color::Gray),
            ServerHealth::Up => ("online", Color::Green),
            ServerHealth::Down => ("offline", Color::Red),
        };
        let health = Span::styled(format!("● {} ", label), bg.fg(color));

        let spacer_len = area
            .width
            .saturating_sub(title.width() as u16 + server.width() as u16 + health.width() as u16);
        let spacer = Span::styled(" ".repeat(spacer_len as usize), bg);

        let line = Line::from(vec![title, server, spacer, health]);
        line.render(area, buf);
    }
}
