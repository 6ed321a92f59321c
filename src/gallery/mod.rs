//! Client-side state of the remote picture gallery.
//!
//! [`GalleryController`] owns the catalogue and drives everything else:
//! remote calls go through a [`GalleryApi`], dialogs through a
//! [`DialogPresenter`] or plain [`DialogOutcome`] values.

pub mod client;
pub mod controller;
pub mod dialog;
pub mod filter;
pub mod model;
pub mod notice;
pub mod tags;

pub use client::{GalleryApi, HttpGalleryClient};
pub use controller::{GalleryController, GalleryState, SyncStatus};
pub use dialog::{
    join_tags, parse_tags, validate, DialogAction, DialogConfig, DialogOutcome, DialogPresenter,
    PictureForm, ValidationError,
};
pub use filter::{recompute, FilterSet};
pub use model::{Picture, PictureData, Snapshot};
pub use notice::{Notice, NoticeKind};
pub use tags::{matching_tags, TagIndex};
