pub mod delete_dialog;
mod dialogs;
pub mod filter_dialog;
mod gallery;
pub mod picture_dialog;
mod status_bar;

use ratatui::prelude::*;

use crate::app::{App, AppMode};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main layout: content area + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    gallery::render(frame, app, main_chunks[0]);
    status_bar::render(frame, app, main_chunks[1]);

    match app.mode {
        AppMode::Help => dialogs::render_help(frame, area),
        AppMode::AddingPicture | AppMode::EditingPicture => {
            if let Some(ref dialog) = app.picture_dialog {
                picture_dialog::render(frame, dialog, area);
            }
        }
        AppMode::DeletingPicture => {
            if let Some(ref dialog) = app.delete_dialog {
                delete_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Filtering => {
            if let Some(ref dialog) = app.filter_dialog {
                filter_dialog::render(frame, dialog, area);
            }
        }
        AppMode::Normal => {}
    }
}
