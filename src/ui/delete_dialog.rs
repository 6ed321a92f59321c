//! Confirmation dialog for deleting a picture.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use gallery_panel::gallery::{join_tags, Picture};

/// Read-only view of the picture pending deletion
pub struct DeleteDialog {
    pub picture: Picture,
}

impl DeleteDialog {
    pub fn new(picture: Picture) -> Self {
        Self { picture }
    }

    /// Identity to delete on confirm.
    pub fn confirm(&self) -> usize {
        self.picture.id
    }
}

pub fn render(frame: &mut Frame, dialog: &DeleteDialog, area: Rect) {
    let dialog_width = 60.min(area.width.saturating_sub(4));
    let dialog_height = 11.min(area.height.saturating_sub(2));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Picture details
            Constraint::Length(3), // Buttons
        ])
        .margin(1)
        .split(dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Delete picture ");
    frame.render_widget(block, dialog_area);

    let picture = &dialog.picture;
    let label = Style::default().fg(Color::DarkGray);
    let details = vec![
        Line::from(vec![
            Span::styled("Name: ", label),
            Span::styled(picture.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![Span::styled("Tags: ", label), Span::raw(join_tags(&picture.tags))]),
        Line::from(vec![Span::styled("File: ", label), Span::raw(picture.file.as_str())]),
        Line::from(""),
        Line::from("Delete this picture from the gallery?"),
    ];
    let message = Paragraph::new(details).wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(message, chunks[0]);

    let buttons = Line::from(vec![
        Span::styled("  [Enter/y] ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("Delete"),
        Span::raw("    "),
        Span::styled("[Esc/n] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw("Cancel"),
    ]);
    let button_widget = Paragraph::new(buttons).alignment(Alignment::Center);
    frame.render_widget(button_widget, chunks[1]);
}
