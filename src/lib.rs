//! Client-side core of the gallery management panel: catalogue, tag index,
//! filters, dialog workflow and the sync state machine against the remote API.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod server_status;
pub mod tasks;
