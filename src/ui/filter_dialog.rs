//! Dialog for managing the active tag filters.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use gallery_panel::gallery::matching_tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDialogMode {
    /// Viewing active filters, can remove
    ViewFilters,
    /// Adding a filter tag with input
    AddFilter,
}

/// Dialog state for the tag filters
pub struct FilterDialog {
    /// Filters active when the dialog was last refreshed
    pub active: Vec<String>,
    /// All known tags
    pub known_tags: Vec<String>,
    pub suggestions: Vec<String>,
    pub input: String,
    pub selected_index: usize,
    /// Set once the user moves through the suggestions
    pub browsing: bool,
    pub mode: FilterDialogMode,
}

impl FilterDialog {
    pub fn new(active: Vec<String>, known_tags: Vec<String>) -> Self {
        Self {
            active,
            known_tags,
            suggestions: Vec::new(),
            input: String::new(),
            selected_index: 0,
            browsing: false,
            mode: FilterDialogMode::ViewFilters,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        self.input.push(c);
        self.update_suggestions();
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.update_suggestions();
    }

    /// Known tags matching the input that are not filtered by already.
    pub fn update_suggestions(&mut self) {
        self.suggestions = matching_tags(&self.known_tags, &self.input)
            .into_iter()
            .filter(|t| !self.active.contains(t))
            .collect();
        self.selected_index = 0;
        self.browsing = false;
    }

    pub fn selected_suggestion(&self) -> Option<&String> {
        self.suggestions.get(self.selected_index)
    }

    pub fn selected_filter(&self) -> Option<&String> {
        self.active.get(self.selected_index)
    }

    /// Whether a suggestion counts as chosen: the user moved to it, or
    /// typed nothing yet.
    pub fn suggestion_chosen(&self) -> bool {
        self.browsing || self.input.trim().is_empty()
    }

    /// Tag to add on Enter. A chosen suggestion wins; otherwise the typed
    /// text, spelled like a known tag when one matches it ignoring case.
    pub fn tag_to_add(&self) -> Option<String> {
        if self.suggestion_chosen() {
            return self.selected_suggestion().cloned();
        }
        let typed = self.input.trim();
        let exact = self
            .suggestions
            .iter()
            .find(|t| t.eq_ignore_ascii_case(typed))
            .cloned();
        Some(exact.unwrap_or_else(|| typed.to_string()))
    }

    /// Replace the active list after the controller changed it.
    pub fn set_active(&mut self, active: Vec<String>) {
        self.active = active;
        if self.selected_index >= self.active.len() {
            self.selected_index = self.active.len().saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        let max_idx = match self.mode {
            FilterDialogMode::ViewFilters => self.active.len(),
            FilterDialogMode::AddFilter => self.suggestions.len(),
        };
        if self.mode == FilterDialogMode::AddFilter && !self.suggestion_chosen() {
            // First move highlights the top suggestion
            self.browsing = max_idx > 0;
            return;
        }
        if self.mode == FilterDialogMode::AddFilter {
            self.browsing = true;
        }
        if self.selected_index < max_idx.saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
        if self.mode == FilterDialogMode::AddFilter && !self.suggestions.is_empty() {
            self.browsing = true;
        }
    }

    pub fn enter_add_mode(&mut self) {
        self.mode = FilterDialogMode::AddFilter;
        self.input.clear();
        self.update_suggestions();
    }

    pub fn enter_view_mode(&mut self) {
        self.mode = FilterDialogMode::ViewFilters;
        self.selected_index = 0;
    }
}

pub fn render(frame: &mut Frame, dialog: &FilterDialog, area: Rect) {
    let dialog_width = 50.min(area.width.saturating_sub(4));
    let dialog_height = 20.min(area.height.saturating_sub(4));

    let x = (area.width - dialog_width) / 2;
    let y = (area.height - dialog_height) / 2;

    let dialog_area = Rect::new(x, y, dialog_width, dialog_height);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Tag filters ");
    frame.render_widget(block, dialog_area);

    let inner = Rect::new(
        dialog_area.x + 1,
        dialog_area.y + 1,
        dialog_area.width.saturating_sub(2),
        dialog_area.height.saturating_sub(2),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input / mode indicator
            Constraint::Min(8),    // Tag list
            Constraint::Length(2), // Help
        ])
        .split(inner);

    match dialog.mode {
        FilterDialogMode::ViewFilters => render_view_mode(frame, dialog, chunks),
        FilterDialogMode::AddFilter => render_add_mode(frame, dialog, chunks),
    }
}

fn tag_items(tags: &[String], selected: usize) -> Vec<ListItem<'_>> {
    tags.iter()
        .enumerate()
        .map(|(i, tag)| {
            let style = if i == selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("  {} ", tag)).style(style)
        })
        .collect()
}

fn render_view_mode(frame: &mut Frame, dialog: &FilterDialog, chunks: std::rc::Rc<[Rect]>) {
    let mode_text = Paragraph::new("Pictures must carry every tag below")
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(mode_text, chunks[0]);

    if dialog.active.is_empty() {
        let empty = Paragraph::new("No filters, showing all pictures")
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
            .block(Block::default().borders(Borders::ALL).title(" Filters "));
        frame.render_widget(empty, chunks[1]);
    } else {
        let list = List::new(tag_items(&dialog.active, dialog.selected_index))
            .block(Block::default().borders(Borders::ALL).title(" Filters "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(Some(dialog.selected_index));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    let help = Paragraph::new("j/k:navigate | a:add | d:remove | c:clear all | Esc:close")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn render_add_mode(frame: &mut Frame, dialog: &FilterDialog, chunks: std::rc::Rc<[Rect]>) {
    let input_style = if dialog.input.is_empty() {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
    } else {
        Style::default().fg(Color::White)
    };
    let input = Paragraph::new(format!("> {}_", dialog.input))
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Filter by tag "));
    frame.render_widget(input, chunks[0]);

    if dialog.suggestions.is_empty() && !dialog.input.is_empty() {
        let msg = Paragraph::new(format!("No known tag matches \"{}\"", dialog.input))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(" Known tags "));
        frame.render_widget(msg, chunks[1]);
    } else {
        let selected = dialog.suggestion_chosen().then_some(dialog.selected_index);
        let list = List::new(tag_items(&dialog.suggestions, selected.unwrap_or(usize::MAX)))
            .block(Block::default().borders(Borders::ALL).title(" Known tags "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        state.select(selected);
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    let help = Paragraph::new("↑/↓:select | Enter:add | Esc:back")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}
