//! Profile page: personal information and the address book.

use api::{Address, AddressField, AddressForm, ApiError, ProfileForm, ProfileService};
use dioxus::prelude::*;

use super::ModalOverlay;
use crate::components::{Alert, Button, ButtonVariant, FieldError, Input, KeyFilter, Label};
use crate::icons::{FaPen, FaPlus, FaTrash};
use crate::session::{sign_out_if_unauthorized, use_auth, use_client};
use crate::toast::use_toast;
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// State of the add/edit address dialog.
#[derive(Debug, Clone, PartialEq)]
struct AddressDialog {
    /// `None` when adding a new address.
    editing: Option<i64>,
    form: AddressForm,
}

impl AddressDialog {
    fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Address"
        } else {
            "Add Address"
        }
    }
}

#[component]
pub fn ProfileView() -> Element {
    let client = use_client();
    let auth = use_auth();
    let toast = use_toast();

    let mut form = use_signal(ProfileForm::default);
    let mut addresses = use_signal(Vec::<Address>::new);
    let mut dialog = use_signal(|| Option::<AddressDialog>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut dialog_error = use_signal(|| Option::<String>::None);
    let mut saving = use_signal(|| false);

    let profile_client = client.clone();
    let _profile = use_resource(move || {
        let client = profile_client.clone();
        async move {
            match client.profile().await {
                Ok(profile) => form.set(ProfileForm::from_profile(&profile)),
                Err(e) => {
                    tracing::warn!("Failed to fetch profile: {}", e);
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Failed to fetch profile")));
                }
            }
        }
    });

    let address_client = client.clone();
    let mut address_loader = use_resource(move || {
        let client = address_client.clone();
        async move {
            match client.addresses().await {
                Ok(list) => addresses.set(list),
                Err(e) => {
                    tracing::warn!("Failed to fetch addresses: {}", e);
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Failed to fetch addresses")));
                }
            }
        }
    });

    let update_client = client.clone();
    let handle_profile_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = update_client.clone();
        spawn(async move {
            error.set(None);
            let update = match form.read().validate() {
                Ok(update) => update,
                Err(e) => {
                    error.set(Some(e.to_string()));
                    return;
                }
            };

            saving.set(true);
            match client.update_profile(&update).await {
                Ok(profile) => {
                    form.set(ProfileForm::from_profile(&profile));
                    toast.success("Profile updated successfully");
                }
                Err(e) => {
                    tracing::warn!("Profile update failed: {}", e);
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Invalid profile data")));
                }
            }
            saving.set(false);
        });
    };

    let save_client = client.clone();
    let handle_address_save = move |_| {
        let client = save_client.clone();
        spawn(async move {
            dialog_error.set(None);
            let (editing, draft) = {
                let mut guard = dialog.write();
                let Some(state) = guard.as_mut() else {
                    return;
                };
                match state.form.validate() {
                    Ok(draft) => (state.editing, draft),
                    Err(e) => {
                        dialog_error.set(Some(e.to_string()));
                        return;
                    }
                }
            };

            saving.set(true);
            let result = match editing {
                Some(id) => client.update_address(id, &draft).await,
                None => client.create_address(&draft).await,
            };
            match result {
                Ok(_) => {
                    dialog.set(None);
                    let message = if editing.is_some() {
                        "Address updated successfully"
                    } else {
                        "Address added successfully"
                    };
                    toast.success(message);
                    address_loader.restart();
                }
                Err(e) => {
                    tracing::warn!("Saving address failed: {}", e);
                    sign_out_if_unauthorized(auth, &e);
                    dialog_error.set(Some(address_error(&e, "Failed to save address")));
                }
            }
            saving.set(false);
        });
    };

    let delete_client = client.clone();
    let handle_address_delete = move |address_id: i64| {
        let client = delete_client.clone();
        spawn(async move {
            error.set(None);
            match client.delete_address(address_id).await {
                Ok(()) => {
                    toast.success("Address deleted successfully");
                    address_loader.restart();
                }
                Err(e) => {
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(address_error(&e, "Failed to delete address")));
                }
            }
        });
    };

    let current = form();

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",

            h1 { class: "view-title", "Profile" }

            if let Some(err) = error() {
                Alert { "{err}" }
            }

            section {
                class: "view-section",
                h2 { class: "view-section-title", "Personal Information" }

                form {
                    class: "profile-form",
                    onsubmit: handle_profile_submit,

                    div {
                        class: "form-field",
                        Label { html_for: "profile-username", "Username" }
                        Input {
                            id: "profile-username",
                            value: current.username.clone(),
                            oninput: move |evt: FormEvent| form.write().set_username(&evt.value()),
                        }
                    }

                    div {
                        class: "form-field",
                        Label { html_for: "profile-email", "Email" }
                        Input {
                            id: "profile-email",
                            r#type: "email",
                            value: current.email.clone(),
                            invalid: current.email_error.is_some(),
                            oninput: move |evt: FormEvent| form.write().set_email(&evt.value()),
                        }
                        FieldError { message: current.email_error.clone() }
                    }

                    div {
                        class: "form-field",
                        Label { html_for: "profile-phone", "Phone number" }
                        Input {
                            id: "profile-phone",
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
                        r#type: "submit",
                        disabled: saving() || !current.can_submit(),
                        "Update Profile"
                    }
                }
            }

            section {
                class: "view-section",
                div {
                    class: "section-header",
                    h2 { class: "view-section-title", "Addresses" }
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| {
                            dialog_error.set(None);
                            dialog.set(Some(AddressDialog {
                                editing: None,
                                form: AddressForm::default(),
                            }));
                        },
                        Icon { width: 12, height: 12, icon: FaPlus }
                        "Add Address"
                    }
                }

                if addresses.read().is_empty() {
                    p { class: "view-muted", "No addresses added yet." }
                }

                div {
                    class: "address-grid",
                    for address in addresses() {
                        AddressCard {
                            key: "{address.id}",
                            address: address.clone(),
                            on_edit: move |address: Address| {
                                dialog_error.set(None);
                                dialog.set(Some(AddressDialog {
                                    editing: Some(address.id),
                                    form: AddressForm::from_address(&address),
                                }));
                            },
                            on_delete: handle_address_delete.clone(),
                        }
                    }
                }
            }
        }

        if let Some(state) = dialog() {
            ModalOverlay {
                on_close: move |_| dialog.set(None),
                AddressDialogBody {
                    state: state,
                    error: dialog_error(),
                    saving: saving(),
                    on_change: move |state: AddressDialog| dialog.set(Some(state)),
                    on_save: handle_address_save,
                    on_cancel: move |_| dialog.set(None),
                }
            }
        }
    }
}

fn address_error(err: &ApiError, category: &str) -> String {
    match err {
        ApiError::Rejected { status: 404 } => "Address not found".to_string(),
        other => other.user_message(category),
    }
}

#[component]
fn AddressCard(
    address: Address,
    on_edit: EventHandler<Address>,
    on_delete: EventHandler<i64>,
) -> Element {
    let id = address.id;
    let editable = address.clone();

    rsx! {
        div {
            class: "address-card",
            if address.is_default {
                span { class: "badge", "Default" }
            }
            p { "{address.street}" }
            p { "{address.city}, {address.state} {address.postal_code}" }
            p { "{address.country}" }
            div {
                class: "address-actions",
                Button {
                    variant: ButtonVariant::Outline,
                    title: "Edit",
                    onclick: move |_| on_edit.call(editable.clone()),
                    Icon { width: 12, height: 12, icon: FaPen }
                }
                Button {
                    variant: ButtonVariant::Destructive,
                    title: "Delete",
                    onclick: move |_| on_delete.call(id),
                    Icon { width: 12, height: 12, icon: FaTrash }
                }
            }
        }
    }
}

#[component]
fn AddressDialogBody(
    state: AddressDialog,
    error: Option<String>,
    saving: bool,
    on_change: EventHandler<AddressDialog>,
    on_save: EventHandler<MouseEvent>,
    on_cancel: EventHandler<MouseEvent>,
) -> Element {
    let form = state.form.clone();
    let can_save = form.can_save() && !saving;

    let letters_field = |field: AddressField, id: &'static str, value: String| {
        let state = state.clone();
        rsx! {
            div {
                class: "form-field",
                Label { html_for: id, "{field.label()}" }
                Input {
                    id: id,
                    value: value,
                    filter: KeyFilter::LettersAndSpaces,
                    invalid: form.error(field).is_some(),
                    oninput: move |evt: FormEvent| {
                        let mut next = state.clone();
                        if next.form.set_letters(field, &evt.value()) {
                            on_change.call(next);
                        }
                    },
                }
                FieldError { message: form.error(field).map(str::to_string) }
            }
        }
    };

    let street_state = state.clone();
    let postal_state = state.clone();
    let default_state = state.clone();

    rsx! {
        div {
            class: "modal-body",
            h2 { class: "modal-title", "{state.title()}" }

            if let Some(err) = error {
                Alert { "{err}" }
            }

            div {
                class: "form-field",
                Label { html_for: "address-street", "Street" }
                Input {
                    id: "address-street",
                    value: form.street.clone(),
                    invalid: form.error(AddressField::Street).is_some(),
                    oninput: move |evt: FormEvent| {
                        let mut next = street_state.clone();
                        next.form.set_street(&evt.value());
                        on_change.call(next);
                    },
                }
                FieldError { message: form.error(AddressField::Street).map(str::to_string) }
            }

            {letters_field(AddressField::City, "address-city", form.city.clone())}
            {letters_field(AddressField::State, "address-state", form.state.clone())}

            div {
                class: "form-field",
                Label { html_for: "address-postal", "Postal code" }
                Input {
                    id: "address-postal",
                    value: form.postal_code.clone(),
                    filter: KeyFilter::Digits,
                    invalid: form.error(AddressField::PostalCode).is_some(),
                    oninput: move |evt: FormEvent| {
                        let mut next = postal_state.clone();
                        if next.form.set_postal_code(&evt.value()) {
                            on_change.call(next);
                        }
                    },
                }
                FieldError { message: form.error(AddressField::PostalCode).map(str::to_string) }
            }

            {letters_field(AddressField::Country, "address-country", form.country.clone())}

            label {
                class: "checkbox",
                input {
                    r#type: "checkbox",
                    checked: form.is_default,
                    onchange: move |evt: FormEvent| {
                        let mut next = default_state.clone();
                        next.form.set_default(evt.checked());
                        on_change.call(next);
                    },
                }
                "Set as default address"
            }

            div {
                class: "modal-actions",
                Button {
                    variant: ButtonVariant::Primary,
                    disabled: !can_save,
                    onclick: move |evt| on_save.call(evt),
                    if saving { "Saving..." } else { "Save" }
                }
                Button {
                    variant: ButtonVariant::Outline,
                    onclick: move |evt| on_cancel.call(evt),
                    "Cancel"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_title() {
        let adding = AddressDialog {
            editing: None,
            form: AddressForm::default(),
        };
        assert_eq!(adding.title(), "Add Address");
        let editing = AddressDialog {
            editing: Some(3),
            ..adding
        };
        assert_eq!(editing.title(), "Edit Address");
    }

    #[test]
    fn test_address_error_messages() {
        assert_eq!(
            address_error(&ApiError::Rejected { status: 500 }, "Failed to save address"),
            "Failed to save address"
        );
        assert_eq!(
            address_error(&ApiError::Rejected { status: 404 }, "Failed to delete address"),
            "Address not found"
        );
    }
}
