//! Registration page.

use api::{ApiError, AuthService, RegistrationForm};
use dioxus::prelude::*;

use crate::components::{Alert, Button, ButtonVariant, FieldError, Input, KeyFilter, Label};
use crate::session::use_client;
use crate::toast::use_toast;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

fn registration_error(err: &ApiError) -> String {
    match err {
        ApiError::Rejected { .. } => "Invalid registration data".to_string(),
        other => other.user_message("Registration failed. Please try again."),
    }
}

/// Sign-up form. On success `on_registered` is called so the platform can
/// send the user to the login page.
#[component]
pub fn RegisterView(on_registered: EventHandler<()>, children: Element) -> Element {
    let client = use_client();
    let toast = use_toast();
    let mut form = use_signal(RegistrationForm::default);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let client = client.clone();
        spawn(async move {
            error.set(None);

            let registration = match form.read().validate() {
                Ok(registration) => registration,
                Err(e) => {
                    error.set(Some(e.to_string()));
                    return;
                }
            };

            loading.set(true);
            match client.register(&registration).await {
                Ok(_) => {
                    toast.success("Registration successful. Please log in.");
                    on_registered.call(());
                }
                Err(e) => {
                    tracing::warn!("Registration failed: {}", e);
                    error.set(Some(registration_error(&e)));
                }
            }
            loading.set(false);
        });
    };

    let current = form();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "auth-page",

            h1 { class: "auth-title", "Create Account" }
            p { class: "auth-subtitle", "File Management System" }

            form {
                class: "auth-form",
                onsubmit: handle_register,

                if let Some(err) = error() {
                    Alert { "{err}" }
                }

                div {
                    class: "form-field",
                    Label { html_for: "register-username", "Username" }
                    Input {
                        id: "register-username",
                        value: current.username.clone(),
                        oninput: move |evt: FormEvent| form.write().username = evt.value(),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "register-email", "Email" }
                    Input {
                        id: "register-email",
                        r#type: "email",
                        value: current.email.clone(),
                        oninput: move |evt: FormEvent| form.write().email = evt.value(),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "register-password", "Password" }
                    Input {
                        id: "register-password",
                        r#type: "password",
                        value: current.password.clone(),
                        oninput: move |evt: FormEvent| form.write().password = evt.value(),
                    }
                }

                div {
                    class: "form-field",
                    Label { html_for: "register-phone", "Phone number (optional)" }
                    Input {
                        id: "register-phone",
                        r#type: "tel",
                        value: current.phone_number.clone(),
                        filter: KeyFilter::Digits,
                        invalid: current.phone_error.is_some(),
                        oninput: move |evt: FormEvent| {
                            form.write().set_phone_number(&evt.value());
                        },
                    }
                    FieldError { message: current.phone_error.clone() }
                }

                Button {
                    variant: ButtonVariant::Primary,
                    class: "w-full",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Register" }
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
    fn test_registration_error_messages() {
        assert_eq!(
            registration_error(&ApiError::Rejected { status: 422 }),
            "Invalid registration data"
        );
        assert_eq!(
            registration_error(&ApiError::Server {
                status: 400,
                message: "Username already registered".into()
            }),
            "Username already registered"
        );
        assert_eq!(
            registration_error(&ApiError::Unexpected("eof".into())),
            "Registration failed. Please try again."
        );
    }
}
