//! Session context and hooks for the UI.

use api::{ApiClient, ApiError, AuthService, ClientConfig, Session};
use dioxus::prelude::*;
use store::TokenStore;

/// Authentication state for the application.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AuthState {
    pub authenticated: bool,
}

/// Get the current authentication state.
/// Returns a signal that updates on login, logout, or when the server
/// rejects the stored token.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// The shared API client.
pub fn use_client() -> ApiClient {
    use_context::<ApiClient>()
}

/// Client configuration loaded at startup.
pub fn use_config() -> ClientConfig {
    use_context::<ClientConfig>()
}

/// Mark the user signed out if `err` says the token was refused. The client
/// has already cleared the stored token; this brings the UI in line.
pub fn sign_out_if_unauthorized(mut auth: Signal<AuthState>, err: &ApiError) {
    if err.is_unauthorized() && auth().authenticated {
        auth.set(AuthState {
            authenticated: false,
        });
    }
}

fn token_store() -> impl TokenStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageStore::new()
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        store::FileStore::default_location()
    }
}

/// Provider component that owns the session.
/// Wrap your app with this component to enable the API client and auth state.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let config = use_context_provider(|| {
        let config = ClientConfig::load();
        tracing::info!("Using API at {}", config.api.base_url);
        config
    });

    let client = use_context_provider(|| ApiClient::new(&config, Session::new(token_store())));

    let authenticated = client.session().is_authenticated();
    use_context_provider(|| Signal::new(AuthState { authenticated }));

    rsx! {
        {children}
    }
}

/// Log out and flip the auth state, then hand control back to the caller.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_logout: EventHandler<()>,
) -> Element {
    let client = use_client();
    let mut auth_state = use_auth();

    let onclick = move |_| {
        let client = client.clone();
        async move {
            client.logout().await;
            auth_state.set(AuthState {
                authenticated: false,
            });
            on_logout.call(());
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
