use dioxus::prelude::*;

use crate::icons::{FaCircleUser, FaFolderOpen};
use crate::session::LogoutButton;
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// Top bar with the application title. Navigation links are passed as
/// children since the routes belong to the platform crate.
#[component]
pub fn Navbar(children: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        nav {
            class: "navbar",
            div {
                class: "navbar-brand",
                Icon { width: 18, height: 18, icon: FaFolderOpen }
                span { "File Management System" }
            }
            div {
                class: "navbar-links",
                {children}
            }
        }
    }
}

/// Account dropdown with Profile and Logout entries.
#[component]
pub fn AccountMenu(on_profile: EventHandler<()>, on_logout: EventHandler<()>) -> Element {
    let mut open = use_signal(|| false);

    rsx! {
        div {
            class: "account-menu",
            button {
                class: "account-menu-trigger",
                title: "Account",
                onclick: move |_| open.toggle(),
                Icon { width: 20, height: 20, icon: FaCircleUser }
            }
            if open() {
                div {
                    class: "account-menu-items",
                    button {
                        class: "account-menu-item",
                        onclick: move |_| {
                            open.set(false);
                            on_profile.call(());
                        },
                        "Profile"
                    }
                    LogoutButton {
                        class: "account-menu-item",
                        on_logout: move |_| {
                            open.set(false);
                            on_logout.call(());
                        },
                    }
                }
            }
        }
    }
}
