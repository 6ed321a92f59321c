use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use std::collections::VecDeque;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use gallery_panel::config::Config;
use gallery_panel::gallery::{
    DialogAction, DialogOutcome, GalleryController, Notice, NoticeKind, Picture, PictureForm,
};
use gallery_panel::server_status::ServerStatus;

use crate::ui;
use crate::ui::delete_dialog::DeleteDialog;
use crate::ui::filter_dialog::{FilterDialog, FilterDialogMode};
use crate::ui::picture_dialog::{PictureDialog, PictureField};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    AddingPicture,
    EditingPicture,
    DeletingPicture,
    Filtering,
}

pub struct App {
    pub config: Config,
    pub controller: GalleryController,
    pub mode: AppMode,
    pub should_quit: bool,
    /// Position in the filtered view
    pub selected_index: usize,
    /// Notices waiting to be shown; the front one is on screen
    pub notices: VecDeque<Notice>,
    pub picture_dialog: Option<PictureDialog>,
    pub delete_dialog: Option<DeleteDialog>,
    pub filter_dialog: Option<FilterDialog>,
    pub server_status: ServerStatus,
    status_rx: Option<mpsc::Receiver<Result<ServerStatus>>>,
}

impl App {
    pub fn new(config: Config, controller: GalleryController) -> Self {
        Self {
            config,
            controller,
            mode: AppMode::Normal,
            should_quit: false,
            selected_index: 0,
            notices: VecDeque::new(),
            picture_dialog: None,
            delete_dialog: None,
            filter_dialog: None,
            server_status: ServerStatus::default(),
            status_rx: None,
        }
    }

    /// Show the server status once it arrives on `rx`.
    pub fn watch_server_status(&mut self, rx: mpsc::Receiver<Result<ServerStatus>>) {
        self.status_rx = Some(rx);
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
        self.controller.refresh();

        while !self.should_quit {
            self.tick(Instant::now());

            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key)?;
                }
            }
        }

        Ok(())
    }

    /// Apply finished calls, pick up new notices and drop expired ones.
    fn tick(&mut self, now: Instant) {
        if self.controller.poll_updates() {
            self.clamp_selection();
        }
        self.notices.extend(self.controller.drain_notices());

        if self.notices.front().is_some_and(|n| n.is_expired(now)) {
            self.notices.pop_front();
            // The next notice gets its full time on screen
            if let Some(next) = self.notices.front_mut() {
                next.created_at = now;
            }
        }

        let received = self.status_rx.as_ref().map(|rx| rx.try_recv());
        match received {
            Some(Ok(Ok(status))) => {
                self.server_status = status;
                self.status_rx = None;
            }
            Some(Ok(Err(_))) | Some(Err(mpsc::TryRecvError::Disconnected)) => self.status_rx = None,
            Some(Err(mpsc::TryRecvError::Empty)) | None => {}
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: &str) {
        let duration = Duration::from_millis(self.config.gallery.notice_duration_ms);
        self.notices.push_back(Notice::new(kind, message, duration));
    }

    fn selected_picture(&self) -> Option<Picture> {
        self.controller
            .state()
            .filtered_view()
            .get(self.selected_index)
            .map(|p| (*p).clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.state().filtered_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.mode {
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(())
            }
            AppMode::AddingPicture | AppMode::EditingPicture => self.handle_picture_dialog_key(key),
            AppMode::DeletingPicture => self.handle_delete_dialog_key(key),
            AppMode::Filtering => self.handle_filter_dialog_key(key),
            AppMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected_index + 1 < self.controller.state().filtered_len() {
                    self.selected_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected_index = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected_index = self.controller.state().filtered_len().saturating_sub(1);
            }
            KeyCode::Char('r') => {
                if !self.controller.refresh() {
                    self.notify(NoticeKind::Error, "A gallery call is still running");
                }
            }
            KeyCode::Char('a') => self.open_picture_dialog(DialogAction::Add),
            KeyCode::Char('e') => self.open_picture_dialog(DialogAction::Edit),
            KeyCode::Char('d') => match self.selected_picture() {
                Some(picture) => {
                    self.delete_dialog = Some(DeleteDialog::new(picture));
                    self.mode = AppMode::DeletingPicture;
                }
                None => self.notify(NoticeKind::Error, "No picture selected"),
            },
            KeyCode::Char('f') => {
                let state = self.controller.state();
                let active = state.filter().iter().cloned().collect();
                self.filter_dialog = Some(FilterDialog::new(active, state.tag_index().to_vec()));
                self.mode = AppMode::Filtering;
            }
            KeyCode::Char('c') => {
                self.controller.clear_filters();
                self.clamp_selection();
            }
            _ => {}
        }
        Ok(())
    }

    fn open_picture_dialog(&mut self, action: DialogAction) {
        let initial = match action {
            DialogAction::Add => PictureForm::blank(),
            DialogAction::Edit => match self.selected_picture() {
                Some(picture) => PictureForm::from_picture(&picture),
                None => {
                    self.notify(NoticeKind::Error, "No picture selected");
                    return;
                }
            },
        };
        let config = self.controller.dialog_config(action);
        self.picture_dialog = Some(PictureDialog::new(config, initial));
        self.mode = match action {
            DialogAction::Add => AppMode::AddingPicture,
            DialogAction::Edit => AppMode::EditingPicture,
        };
    }

    fn handle_picture_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let dialog = match self.picture_dialog.as_mut() {
            Some(d) => d,
            None => {
                self.mode = AppMode::Normal;
                return Ok(());
            }
        };

        let outcome = match key.code {
            KeyCode::Esc => DialogOutcome::Cancelled,
            KeyCode::Enter => {
                if dialog.focus == PictureField::Tags && dialog.accept_suggestion() {
                    return Ok(());
                }
                match dialog.submit() {
                    Some(form) => DialogOutcome::Confirmed(form),
                    None => return Ok(()),
                }
            }
            KeyCode::Tab => {
                dialog.next_field();
                return Ok(());
            }
            KeyCode::BackTab => {
                dialog.prev_field();
                return Ok(());
            }
            KeyCode::Down => {
                dialog.move_down();
                return Ok(());
            }
            KeyCode::Up => {
                dialog.move_up();
                return Ok(());
            }
            KeyCode::Backspace => {
                dialog.backspace();
                return Ok(());
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                dialog.clear_field();
                return Ok(());
            }
            KeyCode::Char(c) => {
                dialog.handle_char(c);
                return Ok(());
            }
            _ => return Ok(()),
        };

        let mode = self.mode;
        self.picture_dialog = None;
        self.mode = AppMode::Normal;
        if mode == AppMode::AddingPicture {
            self.controller.add_picture(outcome);
        } else {
            self.controller.edit_picture(outcome);
        }
        self.take_controller_notices();
        Ok(())
    }

    fn handle_delete_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let outcome: DialogOutcome<usize> = match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => self
                .delete_dialog
                .as_ref()
                .map(|d| d.confirm())
                .into(),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') => {
                DialogOutcome::Cancelled
            }
            _ => return Ok(()),
        };

        self.delete_dialog = None;
        self.mode = AppMode::Normal;
        self.controller.delete_picture(outcome);
        self.take_controller_notices();
        Ok(())
    }

    fn handle_filter_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        let dialog = match self.filter_dialog.as_mut() {
            Some(d) => d,
            None => {
                self.mode = AppMode::Normal;
                return Ok(());
            }
        };

        match dialog.mode {
            FilterDialogMode::ViewFilters => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.filter_dialog = None;
                    self.mode = AppMode::Normal;
                }
                KeyCode::Char('j') | KeyCode::Down => dialog.move_down(),
                KeyCode::Char('k') | KeyCode::Up => dialog.move_up(),
                KeyCode::Char('a') => dialog.enter_add_mode(),
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(tag) = dialog.selected_filter().cloned() {
                        self.controller.remove_filter_tag(&tag);
                        self.sync_filter_dialog();
                    }
                }
                KeyCode::Char('c') => {
                    self.controller.clear_filters();
                    self.sync_filter_dialog();
                }
                _ => {}
            },
            FilterDialogMode::AddFilter => match key.code {
                KeyCode::Esc => dialog.enter_view_mode(),
                KeyCode::Down => dialog.move_down(),
                KeyCode::Up => dialog.move_up(),
                KeyCode::Backspace => dialog.backspace(),
                KeyCode::Enter => {
                    if let Some(tag) = dialog.tag_to_add() {
                        dialog.enter_view_mode();
                        self.controller.add_filter_tag(&tag);
                        self.sync_filter_dialog();
                    }
                }
                KeyCode::Char(c) => dialog.handle_char(c),
                _ => {}
            },
        }
        Ok(())
    }

    fn sync_filter_dialog(&mut self) {
        let active: Vec<String> = self.controller.state().filter().iter().cloned().collect();
        if let Some(dialog) = self.filter_dialog.as_mut() {
            dialog.set_active(active);
        }
        self.clamp_selection();
    }

    fn take_controller_notices(&mut self) {
        self.notices.extend(self.controller.drain_notices());
    }
}
