pub mod candidates;
pub mod header;
pub mod resolved;
pub mod search_box;
pub mod status_bar;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Clear};
use ratatui::Frame;

use crate::app::AppState;

use candidates::CandidateList;
use header::Header;
use resolved::ResolvedPanel;
use search_box::SearchBox;
use status_bar::StatusBar;

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(5),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let header = Header {
        server_url: &state.server_url,
        health: state.health,
    };
    frame.render_widget(header, chunks[0]);

    let session = &state.session;
    let search_box = SearchBox {
        input: session.input(),
        spinner: state.busy().then_some(state.spinner_frame),
    };
    if !state.show_help {
        frame.set_cursor_position(search_box.cursor_position(chunks[1]));
    }
    frame.render_widget(search_box, chunks[1]);

    let list = CandidateList {
        candidates: session.candidates(),
        selected: session.selected(),
        searching: session.searching(),
    };
    frame.render_widget(list, chunks[2]);

    let panel = ResolvedPanel {
        resolution: session.resolution(),
        redirect_base: &state.redirect_base,
    };
    frame.render_widget(panel, chunks[3]);

    let notice = state.error_notice();
    let status = StatusBar {
        hints: &state.hints,
        notice: notice.as_ref(),
    };
    frame.render_widget(status, chunks[4]);

    if state.show_help {
        render_help_popup(frame, &state.hints, frame.area());
    }
}

fn render_help_popup(frame: &mut Frame, hints: &[(String, &str)], area: Rect) {
    let line_count = hints.len();
    let popup_height = (line_count + 3).min(area.height as usize) as u16; // +2 borders +1 footer
    let popup_width = (area.width * 60 / 100).max(30).min(area.width);
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);
    frame.render_widget(Clear, popup_area);

    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Keys ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    for (i, (key_str, action_name)) in hints.iter().enumerate() {
        if i as u16 >= inner.height.saturating_sub(1) {
            break;
        }
        let line = Line::from(vec![
            Span::styled(format!("{:>10}", key_str), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(*action_name, Style::default().fg(Color::White)),
        ]);
        let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        frame.render_widget(line, line_area);
    }

    if inner.height > 0 {
        let footer_y = inner.y + inner.height - 1;
        let footer = Line::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        );
        let footer_area = Rect::new(inner.x, footer_y, inner.width, 1);
        frame.render_widget(footer, footer_area);
    }
}
