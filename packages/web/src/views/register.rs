//! Registration page view.

use dioxus::prelude::*;
use ui::views::RegisterView;

use crate::Route;

#[component]
pub fn Register() -> Element {
    let nav = use_navigator();

    rsx! {
        RegisterView {
            on_registered: move |_| {
                nav.push(Route::Login {});
            },
            "Already have an account? "
            Link { to: Route::Login {}, "Login" }
        }
    }
}
