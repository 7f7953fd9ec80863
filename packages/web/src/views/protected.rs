use dioxus::prelude::*;
use ui::{use_auth, AccountMenu, Navbar};

use crate::Route;

/// Layout for pages that need a session. Without one the user is sent back
/// to the login page, including when the server rejects the token mid-visit.
#[component]
pub fn Protected() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    if !auth().authenticated {
        tracing::debug!("No session, redirecting to login");
        nav.replace(Route::Login {});
        return rsx! {};
    }

    rsx! {
        Navbar {
            Link { class: "navbar-link", to: Route::Dashboard {}, "Dashboard" }
            AccountMenu {
                on_profile: move |_| {
                    nav.push(Route::Profile {});
                },
                on_logout: move |_| {
                    nav.replace(Route::Login {});
                },
            }
        }
        main {
            Outlet::<Route> {}
        }
    }
}
