//! Dialog for adding or editing a picture.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use gallery_panel::gallery::{
    join_tags, matching_tags, parse_tags, validate, DialogConfig, PictureForm, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureField {
    Name,
    Tags,
    File,
}

impl PictureField {
    fn next(self) -> Self {
        match self {
            PictureField::Name => PictureField::Tags,
            PictureField::Tags => PictureField::File,
            PictureField::File => PictureField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            PictureField::Name => PictureField::File,
            PictureField::Tags => PictureField::Name,
            PictureField::File => PictureField::Tags,
        }
    }
}

/// Dialog state for the add/edit form
pub struct PictureDialog {
    pub config: DialogConfig,
    /// Identity of the picture being edited, `None` when adding
    pub picture_id: Option<usize>,
    pub name: String,
    /// Comma-separated tag text as typed
    pub tags: String,
    pub file: String,
    pub focus: PictureField,
    /// Known tags matching the tag being typed
    pub suggestions: Vec<String>,
    pub selected_suggestion: Option<usize>,
    /// Problems found by the last submit attempt
    pub errors: Vec<ValidationError>,
}

impl PictureDialog {
    pub fn new(config: DialogConfig, initial: PictureForm) -> Self {
        Self {
            config,
            picture_id: initial.id,
            name: initial.name,
            tags: join_tags(&initial.tags),
            file: initial.file,
            focus: PictureField::Name,
            suggestions: Vec::new(),
            selected_suggestion: None,
            errors: Vec::new(),
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            PictureField::Name => &mut self.name,
            PictureField::Tags => &mut self.tags,
            PictureField::File => &mut self.file,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.field_mut().push(c);
        self.update_suggestions();
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
        self.update_suggestions();
    }

    pub fn clear_field(&mut self) {
        self.field_mut().clear();
        self.update_suggestions();
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
        self.update_suggestions();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
        self.update_suggestions();
    }

    /// The tag currently being typed: text after the last comma.
    fn current_tag(&self) -> &str {
        self.tags.rsplit(',').next().unwrap_or("").trim()
    }

    pub fn update_suggestions(&mut self) {
        self.selected_suggestion = None;
        if self.focus != PictureField::Tags || self.current_tag().is_empty() {
            self.suggestions.clear();
            return;
        }
        let entered = parse_tags(&self.tags);
        let current = self.current_tag().to_string();
        self.suggestions = matching_tags(&self.config.known_tags, &current)
            .into_iter()
            .filter(|t| *t == current || !entered.contains(t))
            .collect();
    }

    pub fn move_down(&mut self) {
        if self.suggestions.is_empty() {
            return;
        }
        self.selected_suggestion = Some(match self.selected_suggestion {
            Some(i) if i + 1 < self.suggestions.len() => i + 1,
            Some(i) => i,
            None => 0,
        });
    }

    pub fn move_up(&mut self) {
        self.selected_suggestion = match self.selected_suggestion {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
    }

    /// Replace the tag being typed with the selected suggestion.
    /// Returns false when nothing is selected.
    pub fn accept_suggestion(&mut self) -> bool {
        let Some(tag) = self
            .selected_suggestion
            .and_then(|i| self.suggestions.get(i))
            .cloned()
        else {
            return false;
        };
        // Only the fragment after the last comma is replaced
        let typed = self.tags.rsplit_once(',').map_or("", |(head, _)| head);
        let mut tags = parse_tags(typed);
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        self.tags = format!("{}, ", join_tags(&tags));
        self.update_suggestions();
        true
    }

    pub fn form(&self) -> PictureForm {
        PictureForm {
            id: self.picture_id,
            name: self.name.trim().to_string(),
            tags: parse_tags(&self.tags),
            file: self.file.trim().to_string(),
        }
    }

    /// Validate and hand out the form. On failure the errors are kept for
    /// display and `None` is returned.
    pub fn submit(&mut self) -> Option<PictureForm> {
        let form = self.form();
        match validate(&form, &self.config) {
            Ok(()) => {
                self.errors.clear();
                Some(form)
            }
            Err(errors) => {
                tracing::debug!(?errors, "picture form rejected");
                self.errors = errors;
                None
            }
        }
    }
}

pub fn render(frame: &mut Frame, dialog: &PictureDialog, area: Rect) {
    let dialog_width = 64.min(area.width.saturating_sub(4));
    let dialog_height = 22.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let title = match dialog.picture_id {
        Some(id) => format!(" {} picture #{} ", dialog.config.action.label(), id),
        None => format!(" {} picture ", dialog.config.action.label()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Tags
            Constraint::Length(3), // File
            Constraint::Min(3),    // Suggestions / errors
            Constraint::Length(2), // Help
        ])
        .margin(1)
        .split(dialog_area);

    let name_title = format!(
        " Name ({}-{}) ",
        dialog.config.min_name_length, dialog.config.max_name_length
    );
    render_field(frame, &name_title, &dialog.name, dialog.focus == PictureField::Name, chunks[0]);
    render_field(
        frame,
        " Tags (comma separated) ",
        &dialog.tags,
        dialog.focus == PictureField::Tags,
        chunks[1],
    );
    render_field(frame, " File ", &dialog.file, dialog.focus == PictureField::File, chunks[2]);

    if !dialog.errors.is_empty() {
        let lines: Vec<Line> = dialog
            .errors
            .iter()
            .map(|e| Line::from(format!("  {}", e)))
            .collect();
        let errors = Paragraph::new(lines)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title(" Errors "));
        frame.render_widget(errors, chunks[3]);
    } else if !dialog.suggestions.is_empty() {
        let items: Vec<ListItem> = dialog
            .suggestions
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                let style = if Some(i) == dialog.selected_suggestion {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("  {} ", tag)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Known tags "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(dialog.selected_suggestion);
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let help = Paragraph::new(vec![
        Line::from("Tab/Shift+Tab:field | ↑/↓:suggestion | Enter:save | Esc:cancel"),
        Line::from("Ctrl+U:clear field"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn render_field(frame: &mut Frame, title: &str, value: &str, focused: bool, area: Rect) {
    let (style, border) = if focused {
        (
            Style::default().fg(Color::White),
            Style::default().fg(Color::Green),
        )
    } else {
        (
            Style::default().fg(Color::Gray),
            Style::default().fg(Color::DarkGray),
        )
    };
    let text = if focused {
        format!("{}_", value)
    } else {
        value.to_string()
    };
    let widget = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title.to_string()),
    );
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_panel::config::GalleryConfig;
    use gallery_panel::gallery::DialogAction;

    fn dialog(initial: PictureForm) -> PictureDialog {
        let config = DialogConfig::new(
            DialogAction::Add,
            &GalleryConfig::default(),
            vec!["sea".to_string(), "sky".to_string(), "sunset".to_string()],
        );
        PictureDialog::new(config, initial)
    }

    fn type_text(dialog: &mut PictureDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_char(c);
        }
    }

    #[test]
    fn test_fill_and_submit() {
        let mut d = dialog(PictureForm::blank());
        type_text(&mut d, "Harbour");
        d.next_field();
        type_text(&mut d, "sea, boat");
        d.next_field();
        type_text(&mut d, "harbour.jpg");

        let form = d.submit().unwrap();
        assert_eq!(form.id, None);
        assert_eq!(form.name, "Harbour");
        assert_eq!(form.tags, vec!["sea", "boat"]);
        assert_eq!(form.file, "harbour.jpg");
    }

    #[test]
    fn test_invalid_submit_keeps_errors() {
        let mut d = dialog(PictureForm::blank());
        type_text(&mut d, "ab");
        assert!(d.submit().is_none());
        assert_eq!(d.errors.len(), 2);
    }

    #[test]
    fn test_edit_prefills_values() {
        let initial = PictureForm {
            id: Some(4),
            name: "Dunes".to_string(),
            tags: vec!["sand".to_string(), "sky".to_string()],
            file: "dunes.png".to_string(),
        };
        let mut d = dialog(initial.clone());
        assert_eq!(d.tags, "sand, sky");
        assert_eq!(d.submit(), Some(initial));
    }

    #[test]
    fn test_tag_suggestions() {
        let mut d = dialog(PictureForm::blank());
        d.next_field();
        type_text(&mut d, "S");
        assert_eq!(d.suggestions, vec!["sea", "sky", "sunset"]);

        type_text(&mut d, "u");
        assert_eq!(d.suggestions, vec!["sunset"]);

        d.move_down();
        assert!(d.accept_suggestion());
        assert_eq!(d.tags, "sunset, ");
        assert!(d.suggestions.is_empty());
    }

    #[test]
    fn test_accepting_repeated_tag_keeps_earlier_tags() {
        let mut d = dialog(PictureForm::blank());
        d.next_field();
        type_text(&mut d, "sea, sky, sea");
        assert_eq!(d.suggestions, vec!["sea"]);

        d.move_down();
        assert!(d.accept_suggestion());
        assert_eq!(d.tags, "sea, sky, ");
        assert_eq!(d.form().tags, vec!["sea", "sky"]);
    }

    #[test]
    fn test_accept_replaces_only_last_fragment() {
        let mut d = dialog(PictureForm::blank());
        d.next_field();
        type_text(&mut d, "boat,sun");
        d.move_down();
        assert!(d.accept_suggestion());
        assert_eq!(d.tags, "boat, sunset, ");
    }

    #[test]
    fn test_suggestions_skip_entered_tags() {
        let mut d = dialog(PictureForm::blank());
        d.next_field();
        type_text(&mut d, "sea, s");
        assert_eq!(d.suggestions, vec!["sky", "sunset"]);
    }

    #[test]
    fn test_no_suggestions_outside_tags_field() {
        let mut d = dialog(PictureForm::blank());
        type_text(&mut d, "s");
        assert!(d.suggestions.is_empty());
        assert!(!d.accept_suggestion());
    }

    #[test]
    fn test_field_cycle() {
        let mut d = dialog(PictureForm::blank());
        d.prev_field();
        assert_eq!(d.focus, PictureField::File);
        d.next_field();
        assert_eq!(d.focus, PictureField::Name);
    }
}
