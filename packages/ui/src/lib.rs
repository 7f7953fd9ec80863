//! This crate contains all shared UI for the workspace.

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

mod download;
mod timer;

mod navbar;
pub use navbar::{AccountMenu, Navbar};

mod session;
pub use session::{
    sign_out_if_unauthorized, use_auth, use_client, use_config, AuthState, LogoutButton,
    SessionProvider,
};

mod toast;
pub use toast::{use_toast, ToastProvider, Toasts};
