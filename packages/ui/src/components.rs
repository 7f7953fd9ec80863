//! Small form and feedback primitives shared by every view.

use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Destructive,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Secondary => "btn btn-secondary",
            Self::Outline => "btn btn-outline",
            Self::Destructive => "btn btn-destructive",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] class: String,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] disabled: bool,
    #[props(default)] title: String,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "{variant.class()} {class}",
            r#type: r#type.clone(),
            disabled: disabled,
            title: "{title}",
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

/// Which characters an [`Input`] lets through from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyFilter {
    Digits,
    LettersAndSpaces,
}

impl KeyFilter {
    fn allows(self, text: &str) -> bool {
        match self {
            Self::Digits => text.chars().all(|c| c.is_ascii_digit()),
            Self::LettersAndSpaces => text.chars().all(|c| c.is_ascii_alphabetic() || c == ' '),
        }
    }
}

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] disabled: bool,
    #[props(default)] invalid: bool,
    filter: Option<KeyFilter>,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    let invalid_class = if invalid { "input-invalid" } else { "" };

    rsx! {
        input {
            id: "{id}",
            class: "input {invalid_class} {class}",
            r#type: r#type.clone(),
            placeholder: "{placeholder}",
            value: "{value}",
            disabled: disabled,
            onkeydown: move |evt: KeyboardEvent| {
                let Some(filter) = filter else { return };
                let modifiers = evt.modifiers();
                if modifiers.contains(Modifiers::CONTROL) || modifiers.contains(Modifiers::META) {
                    return;
                }
                if let Key::Character(text) = evt.key() {
                    if !filter.allows(&text) {
                        evt.prevent_default();
                    }
                }
            },
            oninput: move |evt| {
                if let Some(handler) = &oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn Label(#[props(default)] html_for: String, children: Element) -> Element {
    rsx! {
        label { class: "label", r#for: "{html_for}", {children} }
    }
}

/// Inline error shown under a single field.
#[component]
pub fn FieldError(message: Option<String>) -> Element {
    rsx! {
        if let Some(message) = message {
            p { class: "field-error", "{message}" }
        }
    }
}

/// Error banner above or below a form.
#[component]
pub fn Alert(#[props(default)] emphasized: bool, children: Element) -> Element {
    let emphasis = if emphasized { "alert-emphasized" } else { "" };

    rsx! {
        div { class: "alert alert-error {emphasis}", role: "alert", {children} }
    }
}
