use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Widget};

use crate::app::Candidate;

pub struct CandidateList<'a> {
    pub candidates: &'a [Candidate],
    pub selected: usize,
    pub searching: bool,
}

impl<'a> Widget for CandidateList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.searching {
            " Links (searching) "
        } else {
            " Links "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Gray))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if self.candidates.is_empty() {
            let line = Line::styled(
                "Type a URL to shorten or an alias to find",
                Style::default().fg(Color::DarkGray),
            );
            line.render(Rect::new(inner.x, inner.y, inner.width, 1), buf);
            return;
        }

        // Scroll window: keep selected item visible
        let max_visible = inner.height as usize;
        let scroll_offset = if self.selected >= max_visible {
            self.selected - max_visible + 1
        } else {
            0
        };

        for (i, candidate) in self
            .candidates
            .iter()
            .skip(scroll_offset)
            .take(max_visible)
            .enumerate()
        {
            let is_selected = (i + scroll_offset) == self.selected;
            let line = candidate_line(candidate, is_selected, inner.width as usize);
            let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
            line.render(line_area, buf);
        }
    }
}

fn candidate_line(candidate: &Candidate, is_selected: bool, width: usize) -> Line<'static> {
    let base = if is_selected {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };
    let marker = Span::styled(if is_selected { "› " } else { "  " }, base.fg(Color::White));

    let mut spans = vec![marker];
    match candidate {
        Candidate::Existing { alias, target } => {
            spans.push(Span::styled(
                alias.clone(),
                base.fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(" → ", base.fg(Color::DarkGray)));
            spans.push(Span::styled(target.clone(), base.fg(Color::Gray)));
        }
        Candidate::Create { .. } => {
            spans.push(Span::styled(candidate.label(), base.fg(Color::Green)));
        }
    }

    let used: usize = spans.iter().map(Span::width).sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), base));
    }
    Line::from(spans)
}
