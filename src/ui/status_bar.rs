use ratatui::{
    prelude::*,
    widgets::Paragraph,
};

use gallery_panel::gallery::{NoticeKind, SyncStatus};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // A live notice takes the whole bar
    if let Some(notice) = app.notices.front() {
        let style = match notice.kind {
            NoticeKind::Success => Style::default().fg(Color::Black).bg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::White).bg(Color::Red),
        };
        let line = Line::from(vec![Span::styled(format!(" {} ", notice.message), style)]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();

    let (sync_text, sync_style) = match app.controller.status() {
        SyncStatus::Idle => ("idle".to_string(), Style::default().fg(Color::Gray)),
        SyncStatus::Pending(op) => (format!("{}...", op.display_name()), Style::default().fg(Color::Cyan)),
        SyncStatus::Refreshed => ("synced".to_string(), Style::default().fg(Color::Green)),
        SyncStatus::Failed(kind) => (format!("failed ({:?})", kind), Style::default().fg(Color::Red)),
    };
    spans.push(Span::styled(
        format!(" {} ", sync_text),
        sync_style.bg(Color::DarkGray),
    ));

    if let Some(at) = app.controller.state().last_synced() {
        spans.push(Span::styled(
            format!(" {} ", at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }

    if app.config.status.enabled {
        let server = &app.server_status;
        let color = if server.online { Color::Green } else { Color::DarkGray };
        spans.push(Span::styled(
            format!(" {}: {} ", app.config.status.host, server.summary()),
            Style::default().fg(color),
        ));
    }

    let total = app.controller.state().filtered_len();
    let position = if total > 0 {
        format!("{}/{}", app.selected_index + 1, total)
    } else {
        "0/0".to_string()
    };
    let help_text = format!(" {} | a:add ?:help q:quit ", position);

    let content_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let help_len = help_text.chars().count();
    let available = area.width as usize;
    if available > content_len + help_len {
        spans.push(Span::raw(" ".repeat(available - content_len - help_len)));
    }

    spans.push(Span::styled(
        help_text,
        Style::default().fg(Color::White).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
