//! Request/response model of the add, edit and delete dialogs.
//!
//! A dialog is presented with a config and initial values and answers with
//! either a validated payload or nothing. How it is shown is up to the
//! frontend; the controller only sees the [`DialogOutcome`].

use std::collections::HashSet;
use std::fmt;

use crate::config::GalleryConfig;

use super::model::{Picture, PictureData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Add,
    Edit,
}

impl DialogAction {
    pub fn label(&self) -> &'static str {
        match self {
            DialogAction::Add => "New",
            DialogAction::Edit => "Edit",
        }
    }
}

/// Everything a picture form needs besides its values.
#[derive(Debug, Clone)]
pub struct DialogConfig {
    pub action: DialogAction,
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub max_tags_length: usize,
    pub file_extensions: Vec<String>,
    /// Known tags for autocompletion
    pub known_tags: Vec<String>,
}

impl DialogConfig {
    pub fn new(action: DialogAction, gallery: &GalleryConfig, known_tags: Vec<String>) -> Self {
        Self {
            action,
            min_name_length: gallery.min_name_length,
            max_name_length: gallery.max_name_length,
            max_tags_length: gallery.max_tags_length,
            file_extensions: gallery.file_extensions.clone(),
            known_tags,
        }
    }
}

/// Values of the add/edit form. `id` is `None` for a new picture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PictureForm {
    pub id: Option<usize>,
    pub name: String,
    pub tags: Vec<String>,
    pub file: String,
}

impl PictureForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_picture(picture: &Picture) -> Self {
        Self {
            id: Some(picture.id),
            name: picture.name.clone(),
            tags: picture.tags.clone(),
            file: picture.file.clone(),
        }
    }

    /// Create payload. The id, if any, is dropped.
    pub fn into_data(self) -> PictureData {
        PictureData {
            name: self.name,
            tags: self.tags,
            file: self.file,
        }
    }

    /// Update payload; `None` when the form has no identity.
    pub fn into_picture(self) -> Option<Picture> {
        let id = self.id?;
        Some(Picture {
            id,
            name: self.name,
            tags: self.tags,
            file: self.file,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    NameTooShort { min: usize },
    NameTooLong { max: usize },
    TagsTooLong { max: usize },
    FileRequired,
    FileNotAnImage { extensions: Vec<String> },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NameRequired => write!(f, "Name is required"),
            ValidationError::NameTooShort { min } => {
                write!(f, "Name needs at least {} characters", min)
            }
            ValidationError::NameTooLong { max } => {
                write!(f, "Name can have at most {} characters", max)
            }
            ValidationError::TagsTooLong { max } => {
                write!(f, "Tags can have at most {} characters", max)
            }
            ValidationError::FileRequired => write!(f, "File is required"),
            ValidationError::FileNotAnImage { extensions } => {
                write!(f, "File must end with .{}", extensions.join(", ."))
            }
        }
    }
}

/// Check a form against the dialog limits. Returns every problem found.
pub fn validate(form: &PictureForm, config: &DialogConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name_len = form.name.trim().chars().count();
    if name_len == 0 {
        errors.push(ValidationError::NameRequired);
    } else if name_len < config.min_name_length {
        errors.push(ValidationError::NameTooShort {
            min: config.min_name_length,
        });
    } else if name_len > config.max_name_length {
        errors.push(ValidationError::NameTooLong {
            max: config.max_name_length,
        });
    }

    if join_tags(&form.tags).chars().count() > config.max_tags_length {
        errors.push(ValidationError::TagsTooLong {
            max: config.max_tags_length,
        });
    }

    let file = form.file.trim();
    if file.is_empty() {
        errors.push(ValidationError::FileRequired);
    } else if !config.file_extensions.is_empty() && !has_extension(file, &config.file_extensions) {
        errors.push(ValidationError::FileNotAnImage {
            extensions: config.file_extensions.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn has_extension(file: &str, extensions: &[String]) -> bool {
    let Some((stem, ext)) = file.rsplit_once('.') else {
        return false;
    };
    !stem.is_empty() && extensions.iter().any(|e| e == ext)
}

/// Split comma-separated tag input: trimmed, empties dropped, first
/// occurrence of a duplicate kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut seen = HashSet::new();
    for tag in input.split(',') {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if seen.insert(tag.to_string()) {
            tags.push(tag.to_string());
        }
    }
    tags
}

pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Answer of a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome<T> {
    Confirmed(T),
    Cancelled,
}

impl<T> DialogOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            DialogOutcome::Confirmed(value) => Some(value),
            DialogOutcome::Cancelled => None,
        }
    }
}

impl<T> From<Option<T>> for DialogOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => DialogOutcome::Confirmed(value),
            None => DialogOutcome::Cancelled,
        }
    }
}

/// A frontend that can show the picture dialogs and wait for the answer.
pub trait DialogPresenter {
    /// Add or edit form. A confirmed form must already pass [`validate`].
    fn present_picture(
        &mut self,
        config: &DialogConfig,
        initial: PictureForm,
    ) -> DialogOutcome<PictureForm>;

    /// Read-only confirmation; answers with the id to delete.
    fn present_delete(&mut self, picture: &Picture) -> DialogOutcome<usize>;
}
