//! # API crate: typed client for the file management service
//!
//! Everything the UI needs to talk to the REST backend lives here, with no
//! dependency on the UI framework so it can be tested on its own.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`], the single HTTP gateway; attaches the bearer token and classifies failures |
//! | [`error`] | [`ApiError`] taxonomy and the user-facing message rules |
//! | [`models`] | Request/response payloads (files, stats, profile, addresses) |
//! | [`progress`] | Upload progress subscription ([`ProgressTracker`] / [`ProgressStream`]) |
//! | [`service`] | [`AuthService`], [`FileService`], [`ProfileService`] traits |
//! | [`session`] | Explicit [`Session`] handle over a persistent token store |
//! | [`upload`] | Duplicate-aware upload state machine and its driver |
//! | [`validation`] | Keystroke and submit-time form checks |

#[cfg(target_arch = "wasm32")]
mod browser_upload;
pub mod client;
pub mod error;
pub mod models;
pub mod progress;
pub mod service;
pub mod session;
pub mod upload;
pub mod validation;

pub use client::ApiClient;
pub use error::{ApiError, CONNECTIVITY_MESSAGE};
pub use models::{
    Address, AddressDraft, DashboardStats, FileRecord, FileType, Profile, ProfileUpdate,
    Registration,
};
pub use progress::{ProgressStream, ProgressTracker};
pub use service::{AuthService, FileService, ProfileService};
pub use session::Session;
pub use upload::{
    perform as perform_upload, Selection, UploadIntent, UploadOutcome, UploadReport,
    UploadWorkflow,
};
pub use validation::{AddressField, AddressForm, ProfileForm, RegistrationForm};

pub use store::ClientConfig;
