//! Dashboard: statistics, upload with duplicate confirmation, and the file
//! list.

use api::upload::{UploadFailure, UploadRequest};
use api::{
    perform_upload, DashboardStats, FileRecord, FileService, FileType, ProgressTracker,
    Selection, UploadIntent, UploadOutcome, UploadWorkflow,
};
use dioxus::prelude::*;
use futures::StreamExt;

use super::ModalOverlay;
use crate::components::{Alert, Button, ButtonVariant};
use crate::download::save_file;
use crate::icons::{FaDownload, FaFileArrowUp, FaTrash};
use crate::session::{sign_out_if_unauthorized, use_auth, use_client, use_config};
use crate::timer;
use crate::toast::use_toast;
use crate::Icon;

const VIEWS_CSS: Asset = asset!("/src/views/views.css");

/// The basename of a picked file. Native pickers report full paths.
fn picked_name(name: &str) -> String {
    std::path::Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string())
}

/// Drop the file waiting on the duplicate dialog. Nothing is sent.
fn cancel_pending(mut workflow: Signal<UploadWorkflow>) {
    if let Some(intent) = workflow.write().cancel() {
        tracing::debug!("Upload of {} cancelled", intent.filename);
    }
}

#[component]
pub fn DashboardView() -> Element {
    let client = use_client();
    let config = use_config();
    let auth = use_auth();
    let toast = use_toast();

    let mut files = use_signal(Vec::<FileRecord>::new);
    let mut stats = use_signal(|| Option::<DashboardStats>::None);
    let mut workflow = use_signal(UploadWorkflow::new);
    let mut progress = use_signal(|| 0u8);
    let mut upload_error = use_signal(|| Option::<UploadFailure>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);
    let mut input_key = use_signal(|| 0u32);

    let loader_client = client.clone();
    let mut refresh = use_resource(move || {
        let client = loader_client.clone();
        async move {
            match client.list_files().await {
                Ok(list) => files.set(list),
                Err(e) => {
                    tracing::warn!("Failed to fetch files: {}", e);
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Failed to fetch files")));
                }
            }
            match client.dashboard_stats().await {
                Ok(s) => stats.set(Some(s)),
                Err(e) => tracing::warn!("Failed to fetch stats: {}", e),
            }
        }
    });

    let progress_reset_ms = config.ui.progress_reset_ms;
    let upload_client = client.clone();
    let run_upload = use_callback(move |request: UploadRequest| {
        let client = upload_client.clone();
        spawn(async move {
            upload_error.set(None);
            progress.set(0);

            let (tracker, mut stream) = ProgressTracker::channel();
            let drain = async move {
                while let Some(p) = stream.next().await {
                    progress.set(p);
                }
            };
            let (report, ()) = futures::join!(perform_upload(&client, &request, tracker), drain);

            workflow.write().complete();
            report.apply_to(&mut files.write());
            if let Some(s) = report.stats.clone() {
                stats.set(Some(s));
            }
            if let Err(e) = &report.files {
                sign_out_if_unauthorized(auth, e);
            }

            match &report.outcome {
                UploadOutcome::Uploaded { .. } => {
                    if let Some(message) = report.outcome.success_message() {
                        toast.success(message);
                    }
                    timer::sleep_ms(progress_reset_ms).await;
                    if !workflow.read().is_uploading() {
                        progress.set(0);
                    }
                }
                UploadOutcome::Failed(failure) => {
                    upload_error.set(Some(failure.clone()));
                    progress.set(0);
                }
            }
        });
    });

    let on_file_selected = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        // Remount the input so picking the same file again fires a change
        input_key.with_mut(|k| *k += 1);

        let Some(bytes) = engine.read_file(&name).await else {
            tracing::warn!("Could not read selected file {}", name);
            upload_error.set(Some(UploadFailure {
                message: "Could not read the selected file.".to_string(),
                emphasized: false,
            }));
            return;
        };

        let intent = UploadIntent::new(picked_name(&name), bytes);
        let selection = workflow.write().select(intent, &files.read());
        match selection {
            Selection::Upload(request) => run_upload.call(request),
            Selection::ConfirmReplace { filename } => {
                tracing::debug!("{} already exists, asking before replacing", filename);
            }
            Selection::Busy => {}
        }
    };

    let on_replace = move |_| {
        let request = workflow.write().replace();
        if let Some(request) = request {
            run_upload.call(request);
        }
    };

    let delete_client = client.clone();
    let on_delete = move |file_id: i64| {
        let client = delete_client.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            match client.delete_file(file_id).await {
                Ok(()) => {
                    toast.success("File deleted successfully");
                    refresh.restart();
                }
                Err(e) => {
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Failed to delete file")));
                }
            }
            busy.set(false);
        });
    };

    let download_client = client.clone();
    let on_download = move |file: FileRecord| {
        let client = download_client.clone();
        spawn(async move {
            busy.set(true);
            error.set(None);
            match client.download_file(file.id).await {
                Ok(bytes) => match save_file(&file.filename, &bytes) {
                    Ok(()) => {
                        toast.success("File downloaded successfully")
                    }
                    Err(e) => {
                        tracing::warn!("Saving {} failed: {}", file.filename, e);
                        error.set(Some("Failed to download file".to_string()));
                    }
                },
                Err(e) => {
                    sign_out_if_unauthorized(auth, &e);
                    error.set(Some(e.user_message("Failed to download file")));
                }
            }
            busy.set(false);
        });
    };

    let uploading = workflow.read().is_uploading();
    let pending = workflow.read().pending_duplicate().map(str::to_string);
    let disabled = busy() || uploading;

    rsx! {
        document::Link { rel: "stylesheet", href: VIEWS_CSS }
        div {
            class: "view-page",

            h1 { class: "view-title", "Dashboard" }

            if let Some(s) = stats() {
                StatsCards { stats: s }
            }

            if let Some(err) = error() {
                Alert { "{err}" }
            }

            section {
                class: "view-section",
                h2 { class: "view-section-title", "Upload File" }

                label {
                    class: if disabled { "btn btn-primary upload-trigger disabled" } else { "btn btn-primary upload-trigger" },
                    Icon { width: 14, height: 14, icon: FaFileArrowUp }
                    if uploading { "Uploading..." } else { "Upload File" }
                    for key in [input_key()] {
                        input {
                            key: "{key}",
                            class: "hidden",
                            r#type: "file",
                            accept: FileType::accept_attribute(),
                            disabled: disabled || pending.is_some(),
                            onchange: on_file_selected,
                        }
                    }
                }

                if uploading || progress() > 0 {
                    div {
                        class: "progress",
                        div {
                            class: "progress-bar",
                            style: "width: {progress()}%",
                        }
                    }
                    p { class: "view-muted", "{progress()}% uploaded" }
                }

                if let Some(failure) = upload_error() {
                    Alert { emphasized: failure.emphasized, "{failure.message}" }
                }
            }

            section {
                class: "view-section",
                h2 { class: "view-section-title", "Your Files" }
                FileList {
                    files: files(),
                    disabled: disabled,
                    on_download: on_download,
                    on_delete: on_delete,
                }
            }
        }

        if uploading && progress() == 0 {
            div {
                class: "busy-overlay",
                div { class: "spinner" }
            }
        }

        if let Some(filename) = pending {
            ModalOverlay {
                on_close: move |_| cancel_pending(workflow),
                div {
                    class: "modal-body",
                    h2 { class: "modal-title", "File already exists" }
                    p {
                        "A file named "
                        strong { "{filename}" }
                        " already exists. Do you want to replace it?"
                    }
                    div {
                        class: "modal-actions",
                        Button {
                            variant: ButtonVariant::Destructive,
                            onclick: on_replace,
                            "Replace"
                        }
                        Button {
                            variant: ButtonVariant::Outline,
                            onclick: move |_| cancel_pending(workflow),
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatsCards(stats: DashboardStats) -> Element {
    rsx! {
        div {
            class: "stats-grid",
            div {
                class: "stat-card",
                h3 { "Total Files" }
                p { class: "stat-value", "{stats.total_files}" }
            }
            div {
                class: "stat-card",
                h3 { "File Types" }
                ul {
                    for (kind, count) in stats.file_type_breakdown.iter() {
                        li { key: "{kind}", "{kind}: {count}" }
                    }
                }
            }
            div {
                class: "stat-card",
                h3 { "Files per User" }
                ul {
                    for (user, count) in stats.files_per_user.iter() {
                        li { key: "{user}", "{user}: {count}" }
                    }
                }
            }
        }
    }
}

#[component]
fn FileList(
    files: Vec<FileRecord>,
    disabled: bool,
    on_download: EventHandler<FileRecord>,
    on_delete: EventHandler<i64>,
) -> Element {
    if files.is_empty() {
        return rsx! {
            p { class: "view-muted", "No files uploaded yet." }
        };
    }

    rsx! {
        ul {
            class: "file-list",
            for file in files {
                li {
                    key: "{file.id}",
                    class: "file-row",
                    div {
                        class: "file-info",
                        span { class: "file-name", "{file.filename}" }
                        span { class: "file-meta", "Type: {file.file_type.label()}" }
                        span { class: "file-meta", "Uploaded: {file.formatted_upload_date()}" }
                    }
                    div {
                        class: "file-actions",
                        Button {
                            variant: ButtonVariant::Outline,
                            title: "Download",
                            disabled: disabled,
                            onclick: {
                                let file = file.clone();
                                move |_| on_download.call(file.clone())
                            },
                            Icon { width: 14, height: 14, icon: FaDownload }
                        }
                        Button {
                            variant: ButtonVariant::Destructive,
                            title: "Delete",
                            disabled: disabled,
                            onclick: move |_| on_delete.call(file.id),
                            Icon { width: 14, height: 14, icon: FaTrash }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_name_strips_directories() {
        assert_eq!(picked_name("/home/ada/report.pdf"), "report.pdf");
        assert_eq!(picked_name("report.pdf"), "report.pdf");
    }
}
