use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Widget};
use unicode_width::UnicodeWidthChar;

use crate::app::InputLine;

const PLACEHOLDER: &str = "your.link/here";
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_symbol(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

pub struct SearchBox<'a> {
    pub input: &'a InputLine,
    /// Spinner frame to draw, when something is in flight.
    pub spinner: Option<usize>,
}

/// Horizontal window onto the input: chars hidden on the left, and the
/// caret column relative to the first visible one.
struct Viewport {
    skip: usize,
    caret: u16,
}

impl<'a> SearchBox<'a> {
    fn block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Find or shorten ")
    }

    /// Columns available to text; the spinner keeps a gap and its own cell.
    fn text_width(&self, inner: Rect) -> u16 {
        match self.spinner {
            Some(_) => inner.width.saturating_sub(2),
            None => inner.width,
        }
    }

    fn viewport(&self, text_width: u16) -> Viewport {
        let chars = self.input.chars();
        let widths: Vec<usize> = chars.iter().map(|c| c.width().unwrap_or(0)).collect();
        let caret: usize = widths[..self.input.cursor()].iter().sum();

        // Keep the caret on screen, leaving it the last column when scrolled.
        let avail = usize::from(text_width.max(1));
        let mut skip = 0;
        let mut hidden = 0;
        while caret - hidden >= avail {
            hidden += widths[skip];
            skip += 1;
        }
        Viewport {
            skip,
            caret: u16::try_from(caret - hidden).unwrap_or(u16::MAX),
        }
    }

    /// Terminal cursor position for the input caret inside `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = Self::block().inner(area);
        let view = self.viewport(self.text_width(inner));
        let max_x = inner.right().saturating_sub(1);
        let x = inner.x.saturating_add(view.caret).min(max_x);
        Position::new(x, inner.y)
    }
}

impl<'a> Widget for SearchBox<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block();
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let text_width = self.text_width(inner);
        let text = if self.input.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            let view = self.viewport(text_width);
            let visible: String = self.input.chars()[view.skip..].iter().collect();
            Span::styled(visible, Style::default().fg(Color::White))
        };
        Line::from(text).render(Rect::new(inner.x, inner.y, text_width, 1), buf);

        if let Some(frame) = self.spinner {
            if inner.width > 2 {
                let spinner = Span::styled(spinner_symbol(frame), Style::default().fg(Color::Yellow));
                let spot = Rect::new(inner.right() - 1, inner.y, 1, 1);
                Line::from(spinner).render(spot, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_box(search_box: SearchBox, width: u16) -> Buffer {
        let area = Rect::new(0, 0, width, 3);
        let mut buf = Buffer::empty(area);
        search_box.render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    const LONG_URL: &str = "https://example.com/a/very/long/path/that/keeps/going/END";

    #[test]
    fn empty_input_shows_placeholder() {
        let input = InputLine::default();
        let buf = render_box(
            SearchBox {
                input: &input,
                spinner: None,
            },
            40,
        );
        assert!(row(&buf, 1).contains("your.link/here"));
        assert!(row(&buf, 0).contains("Find or shorten"));
    }

    #[test]
    fn typed_text_replaces_placeholder() {
        let input = InputLine::new("example.com");
        let buf = render_box(
            SearchBox {
                input: &input,
                spinner: None,
            },
            40,
        );
        let line = row(&buf, 1);
        assert!(line.contains("example.com"));
        assert!(!line.contains("your.link"));
    }

    #[test]
    fn spinner_drawn_at_right_edge_while_busy() {
        let input = InputLine::new("gh");
        let buf = render_box(
            SearchBox {
                input: &input,
                spinner: Some(3),
            },
            20,
        );
        assert_eq!(buf.cell((18, 1)).unwrap().symbol(), spinner_symbol(3));
    }

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner_symbol(0), spinner_symbol(SPINNER.len()));
        assert_ne!(spinner_symbol(0), spinner_symbol(1));
    }

    #[test]
    fn cursor_follows_input_caret() {
        let mut input = InputLine::new("abcd");
        input.move_left();
        let search_box = SearchBox {
            input: &input,
            spinner: None,
        };
        let pos = search_box.cursor_position(Rect::new(0, 5, 30, 3));
        assert_eq!(pos, Position::new(4, 6));
    }

    #[test]
    fn long_input_scrolls_to_keep_tail_visible() {
        let input = InputLine::new(LONG_URL);
        let search_box = SearchBox {
            input: &input,
            spinner: None,
        };
        let pos = search_box.cursor_position(Rect::new(0, 0, 30, 3));
        let buf = render_box(search_box, 30);

        let line = row(&buf, 1);
        assert!(line.contains("going/END"), "tail hidden: {:?}", line);
        assert!(!line.contains("https://"));
        // Caret sits just after the last visible char
        assert_eq!(pos, Position::new(28, 1));
        assert_eq!(buf.cell((27, 1)).unwrap().symbol(), "D");
    }

    #[test]
    fn moving_home_scrolls_back_to_start() {
        let mut input = InputLine::new(LONG_URL);
        input.move_home();
        let search_box = SearchBox {
            input: &input,
            spinner: None,
        };
        let pos = search_box.cursor_position(Rect::new(0, 0, 30, 3));
        let buf = render_box(search_box, 30);

        assert!(row(&buf, 1).contains("https://example.com"));
        assert_eq!(pos, Position::new(1, 1));
    }

    #[test]
    fn spinner_never_covers_scrolled_text() {
        let input = InputLine::new(LONG_URL);
        let buf = render_box(
            SearchBox {
                input: &input,
                spinner: Some(0),
            },
            30,
        );
        let line = row(&buf, 1);
        assert!(line.contains("/END"));
        assert_eq!(buf.cell((28, 1)).unwrap().symbol(), spinner_symbol(0));
    }

    #[test]
    fn caret_measures_wide_characters_by_display_width() {
        let input = InputLine::new("日本");
        let search_box = SearchBox {
            input: &input,
            spinner: None,
        };
        let pos = search_box.cursor_position(Rect::new(0, 0, 30, 3));
        assert_eq!(pos, Position::new(5, 1));
    }

    #[test]
    fn very_long_input_does_not_overflow() {
        let input = InputLine::new(&"x".repeat(100_000));
        let search_box = SearchBox {
            input: &input,
            spinner: None,
        };
        let pos = search_box.cursor_position(Rect::new(0, 0, 10, 3));
        assert_eq!(pos, Position::new(8, 1));
    }
}
