//! Login page with username/password form.

use api::validation::validate_login;
use api::{ApiError, AuthService};
use dioxus::prelude::*;

use crate::components::{Alert, Button, ButtonVariant, Input, Label};
use crate::session::{use_auth, use_client, AuthState};

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

fn login_error(err: &ApiError) -> String {
    match err {
        ApiError::Rejected { .. } => "Invalid login credentials".to_string(),
        other => other.user_message("Login failed. Please try again."),
    }
}

/// Login form. `children` is rendered below the form (the link to
/// registration).
#[component]
pub fn LoginView(on_success: EventHandler<()>, children: Element) -> Element {
    let client = use_client();
    let mut auth = use_auth();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);

            let u = username().trim().to_string();
            let p = password();
            if let Err(e) = validate_login(&u, &p) {
                error.set(Some(e.to_string()));
                return;
            }

            loading.set(true);
            match client.login(&u, &p).await {
                Ok(()) => {
                    auth.set(AuthState {
                        authenticated: true,
                    });
                    on_success.call(());
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    error.set(Some(login_error(&e)));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-page",

            h1 { class: "auth-title", "Sign in" }
            p { class: "auth-subtitle", "File Management System" }

            form {
                class: "auth-form",
                onsubmit: handle_login,

                if let Some(err) = error() {
                    Alert { "{err}" }
                }

                div {
                    class: "form-field",
                    Label { html_for: "login-username", "Username" }
                    Input {
                        id: "login-username",
                        placeholder: "Username",
                        value: username(),
                        oninput: move |evt: FormEvent| username.set(evt.value()),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "login-password", "Password" }
                    Input {
                        id: "login-password",
                        r#type: "password",
                        placeholder: "Password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }

                Button {
                    variant: ButtonVariant::Primary,
                    class: "w-full",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Login" }
                }
            }

            div { class: "auth-footer", {children} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(
            login_error(&ApiError::Rejected { status: 401 }),
            "Invalid login credentials"
        );
        assert_eq!(
            login_error(&ApiError::Server {
                status: 401,
                message: "Incorrect username or password".into()
            }),
            "Incorrect username or password"
        );
        assert_eq!(
            login_error(&ApiError::Unexpected("eof".into())),
            "Login failed. Please try again."
        );
    }
}
