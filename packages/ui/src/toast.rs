//! Transient notifications stacked in a corner of the screen.
//!
//! [`ToastProvider`] owns the list; [`use_toast`] hands out a `Copy` handle
//! that any component can use to push a message. Each toast removes itself
//! after `ui.notification_dismiss_ms`.

use std::time::Duration;

use dioxus::prelude::*;

use crate::session::use_config;
use crate::timer;

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    id: u64,
    message: String,
}

/// Handle for pushing toasts.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: Signal<Vec<Toast>>,
    next_id: Signal<u64>,
    default_duration: Duration,
}

impl Toasts {
    /// Show a success message until the dismiss delay elapses.
    pub fn success(&self, message: impl Into<String>) {
        let mut items = self.items;
        let mut next_id = self.next_id;
        let id = next_id();
        next_id.set(id + 1);
        items.write().push(Toast {
            id,
            message: message.into(),
        });

        let duration = self.default_duration;
        spawn(async move {
            timer::sleep(duration).await;
            items.write().retain(|t| t.id != id);
        });
    }
}

pub fn use_toast() -> Toasts {
    use_context::<Toasts>()
}

#[component]
pub fn ToastProvider(children: Element) -> Element {
    let config = use_config();
    let items = use_signal(Vec::<Toast>::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| Toasts {
        items,
        next_id,
        default_duration: Duration::from_millis(config.ui.notification_dismiss_ms),
    });

    rsx! {
        {children}
        div {
            class: "toast-stack",
            for toast in items() {
                div {
                    key: "{toast.id}",
                    class: "toast toast-success",
                    role: "status",
                    "{toast.message}"
                }
            }
        }
    }
}
