//! Login page view.

use dioxus::prelude::*;
use ui::use_auth;
use ui::views::LoginView;

use crate::Route;

#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // Already signed in
    if auth().authenticated {
        nav.replace(Route::Dashboard {});
    }

    rsx! {
        LoginView {
            on_success: move |_| {
                nav.push(Route::Dashboard {});
            },
            "Don't have an account? "
            Link { to: Route::Register {}, "Register" }
        }
    }
}
