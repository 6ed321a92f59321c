//! Picture list with a detail pane for the selected picture.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use gallery_panel::gallery::{join_tags, GalleryState, Picture, SyncStatus};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let state = app.controller.state();
    let pictures = state.filtered_view();

    render_list(frame, app, state, &pictures, chunks[0]);
    render_detail(frame, pictures.get(app.selected_index).copied(), chunks[1]);
}

fn list_title(state: &GalleryState) -> String {
    let total = state.catalogue().len();
    if state.filter().is_empty() {
        format!(" Pictures ({}) ", total)
    } else {
        let tags: Vec<&str> = state.filter().iter().map(String::as_str).collect();
        format!(
            " Pictures ({}/{}) [{}] ",
            state.filtered_len(),
            total,
            tags.join(" + ")
        )
    }
}

fn render_list(frame: &mut Frame, app: &App, state: &GalleryState, pictures: &[&Picture], area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(list_title(state));

    if !state.is_loaded() {
        let text = match app.controller.status() {
            SyncStatus::Failed(_) => "Gallery could not be loaded (r to retry)",
            _ => "Loading gallery...",
        };
        let placeholder = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    if pictures.is_empty() {
        let text = if state.filter().is_empty() {
            "No pictures yet (a to add)"
        } else {
            "No picture carries all filter tags"
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = pictures
        .iter()
        .map(|picture| {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:>3} ", picture.id),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(picture.name.as_str()),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_detail(frame: &mut Frame, picture: Option<&Picture>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Details ");

    let Some(picture) = picture else {
        frame.render_widget(block, area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let tags = if picture.tags.is_empty() {
        Span::styled("none", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(join_tags(&picture.tags))
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Name  ", label),
            Span::styled(picture.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::styled("Tags  ", label), tags]),
        Line::from(vec![Span::styled("File  ", label), Span::raw(picture.file.as_str())]),
        Line::from(""),
        Line::from(Span::styled(
            "e:edit  d:delete  f:filters",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let detail = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}
