//! # Upload with duplicate detection
//!
//! The dashboard's upload button drives a small state machine:
//!
//! ```text
//!            select (name not listed)
//!   Idle ───────────────────────────────► Uploading ──complete──► Idle
//!    │                                       ▲
//!    │ select (name already listed)          │ replace
//!    ▼                                       │
//!   DuplicateConfirm ────────────────────────┘
//!    │
//!    └──cancel──► Idle   (no request is ever sent)
//! ```
//!
//! The duplicate check ([`UploadWorkflow::select`]) is a purely local,
//! case-sensitive comparison of the selected file's name against the last
//! fetched file list, so it always finishes before any network call. It is
//! advisory: the server applies its own uniqueness rule and a rejection from
//! it is an ordinary upload failure.
//!
//! [`perform`] runs the `Uploading` state against any [`FileService`]: one
//! upload request, then a stats refresh on success, then exactly one file-list
//! refresh whatever the outcome. The resulting [`UploadReport`] tells the view
//! what to show and how to reconcile its list.

use crate::error::{ApiError, CONNECTIVITY_MESSAGE};
use crate::models::{DashboardStats, FileRecord};
use crate::progress::ProgressTracker;
use crate::service::FileService;

/// A file the user picked, held until it is uploaded or discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadIntent {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadIntent {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Where the workflow currently is.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadState {
    #[default]
    Idle,
    /// Waiting for the user to replace or cancel. Holds the only pending intent.
    DuplicateConfirm(UploadIntent),
    Uploading,
}

/// An upload the workflow has committed to sending.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub intent: UploadIntent,
    pub replace_existing: bool,
}

/// What a file selection led to.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Send this request now.
    Upload(UploadRequest),
    /// A file of this name is already listed; ask the user.
    ConfirmReplace { filename: String },
    /// Another upload or confirmation is in progress; the selection is dropped.
    Busy,
}

/// The upload state machine for one dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadWorkflow {
    state: UploadState,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading)
    }

    /// Name of the file awaiting a replace/cancel decision.
    pub fn pending_duplicate(&self) -> Option<&str> {
        match &self.state {
            UploadState::DuplicateConfirm(intent) => Some(&intent.filename),
            _ => None,
        }
    }

    /// Handle a newly selected file, checking it against `existing`.
    pub fn select(&mut self, intent: UploadIntent, existing: &[FileRecord]) -> Selection {
        if !matches!(self.state, UploadState::Idle) {
            tracing::debug!("Ignoring selection of {} while busy", intent.filename);
            return Selection::Busy;
        }

        if existing.iter().any(|f| f.filename == intent.filename) {
            let filename = intent.filename.clone();
            self.state = UploadState::DuplicateConfirm(intent);
            return Selection::ConfirmReplace { filename };
        }

        self.state = UploadState::Uploading;
        Selection::Upload(UploadRequest {
            intent,
            replace_existing: false,
        })
    }

    /// The user chose to overwrite the existing file.
    pub fn replace(&mut self) -> Option<UploadRequest> {
        match std::mem::take(&mut self.state) {
            UploadState::DuplicateConfirm(intent) => {
                self.state = UploadState::Uploading;
                Some(UploadRequest {
                    intent,
                    replace_existing: true,
                })
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The user dismissed the duplicate dialog. Returns the discarded intent.
    pub fn cancel(&mut self) -> Option<UploadIntent> {
        match std::mem::take(&mut self.state) {
            UploadState::DuplicateConfirm(intent) => Some(intent),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// The in-flight upload finished, successfully or not.
    pub fn complete(&mut self) {
        if self.is_uploading() {
            self.state = UploadState::Idle;
        }
    }
}

const UPLOAD_FAILED: &str = "Failed to upload file. Please check your connection and try again.";

/// Why an upload failed, worded for display.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFailure {
    pub message: String,
    /// The server refused a duplicate name; render with extra emphasis.
    pub emphasized: bool,
}

impl From<&ApiError> for UploadFailure {
    fn from(err: &ApiError) -> Self {
        let message = match err {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Rejected { .. } => err.to_string(),
            ApiError::Validation(_) => err.user_message(UPLOAD_FAILED),
            ApiError::Transport(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Unexpected(_) => UPLOAD_FAILED.to_string(),
        };
        Self {
            message,
            emphasized: err.is_duplicate_name(),
        }
    }
}

/// Result of the upload request itself.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Uploaded { record: FileRecord, replaced: bool },
    Failed(UploadFailure),
}

impl UploadOutcome {
    /// Toast text for a successful upload.
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            Self::Uploaded { replaced: true, .. } => Some("File replaced successfully!"),
            Self::Uploaded { replaced: false, .. } => Some("File uploaded successfully!"),
            Self::Failed(_) => None,
        }
    }
}

/// Everything a view needs after an upload attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReport {
    pub outcome: UploadOutcome,
    /// Authoritative file list, re-fetched after the attempt.
    pub files: Result<Vec<FileRecord>, ApiError>,
    /// Fresh statistics; only fetched after a successful upload.
    pub stats: Option<DashboardStats>,
}

impl UploadReport {
    /// Bring a view's file list up to date. The re-fetched list wins; if the
    /// refresh failed, a successful upload is merged in provisionally.
    pub fn apply_to(&self, files: &mut Vec<FileRecord>) {
        match (&self.files, &self.outcome) {
            (Ok(fresh), _) => *files = fresh.clone(),
            (Err(_), UploadOutcome::Uploaded { record, .. }) => merge_record(files, record.clone()),
            (Err(_), UploadOutcome::Failed(_)) => {}
        }
    }
}

/// Insert `record`, replacing any entry with the same filename.
pub fn merge_record(files: &mut Vec<FileRecord>, record: FileRecord) {
    match files.iter_mut().find(|f| f.filename == record.filename) {
        Some(slot) => *slot = record,
        None => files.push(record),
    }
}

/// Send one upload and reconcile with the server afterwards.
pub async fn perform<S: FileService>(
    service: &S,
    request: &UploadRequest,
    progress: ProgressTracker,
) -> UploadReport {
    let result = service
        .upload_file(&request.intent, request.replace_existing, progress)
        .await;

    let (outcome, stats) = match result {
        Ok(record) => {
            let stats = match service.dashboard_stats().await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    tracing::warn!("Failed to refresh stats after upload: {}", e);
                    None
                }
            };
            let outcome = UploadOutcome::Uploaded {
                record,
                replaced: request.replace_existing,
            };
            (outcome, stats)
        }
        Err(e) => {
            tracing::warn!("Upload of {} failed: {}", request.intent.filename, e);
            (UploadOutcome::Failed(UploadFailure::from(&e)), None)
        }
    };

    let files = service.list_files().await;
    if let Err(e) = &files {
        tracing::warn!("Failed to refresh files after upload: {}", e);
    }

    UploadReport {
        outcome,
        files,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileType;
    use futures::StreamExt;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Upload { filename: String, replace: bool },
        Stats,
    }

    /// Records every call; uploads succeed or fail as configured and report
    /// progress in quarters.
    struct FakeFiles {
        listed: Vec<FileRecord>,
        upload_error: Option<ApiError>,
        list_error: Option<ApiError>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeFiles {
        fn with_files(names: &[&str]) -> Self {
            Self {
                listed: names.iter().enumerate().map(|(i, n)| record(i as i64 + 1, n)).collect(),
                upload_error: None,
                list_error: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.borrow().iter().filter(|c| pred(c)).count()
        }
    }

    impl FileService for FakeFiles {
        async fn list_files(&self) -> Result<Vec<FileRecord>, ApiError> {
            self.calls.borrow_mut().push(Call::List);
            match &self.list_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.listed.clone()),
            }
        }

        async fn upload_file(
            &self,
            intent: &UploadIntent,
            replace_existing: bool,
            progress: ProgressTracker,
        ) -> Result<FileRecord, ApiError> {
            self.calls.borrow_mut().push(Call::Upload {
                filename: intent.filename.clone(),
                replace: replace_existing,
            });
            let total = intent.bytes.len() as u64;
            for quarter in 1..=4u64 {
                progress.report_bytes(total * quarter / 4, total);
            }
            match &self.upload_error {
                Some(e) => Err(e.clone()),
                None => Ok(record(99, &intent.filename)),
            }
        }

        async fn download_file(&self, _file_id: i64) -> Result<Vec<u8>, ApiError> {
            unreachable!("not used by the upload workflow")
        }

        async fn delete_file(&self, _file_id: i64) -> Result<(), ApiError> {
            unreachable!("not used by the upload workflow")
        }

        async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
            self.calls.borrow_mut().push(Call::Stats);
            Ok(DashboardStats {
                total_files: self.listed.len() as u64 + 1,
                ..Default::default()
            })
        }
    }

    fn record(id: i64, name: &str) -> FileRecord {
        FileRecord {
            id,
            filename: name.to_string(),
            file_type: FileType::Txt,
            upload_date: None,
            user_id: Some(1),
        }
    }

    fn intent(name: &str) -> UploadIntent {
        UploadIntent::new(name, vec![1u8; 1000])
    }

    #[tokio::test]
    async fn test_duplicate_name_waits_for_decision_without_network() {
        let service = FakeFiles::with_files(&["report.txt", "notes.txt"]);
        let existing = service.list_files().await.unwrap();
        service.calls.borrow_mut().clear();

        let mut workflow = UploadWorkflow::new();
        let selection = workflow.select(intent("report.txt"), &existing);

        assert_eq!(
            selection,
            Selection::ConfirmReplace {
                filename: "report.txt".to_string()
            }
        );
        assert_eq!(workflow.pending_duplicate(), Some("report.txt"));
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let existing = vec![record(1, "Report.txt")];
        let mut workflow = UploadWorkflow::new();

        let selection = workflow.select(intent("report.txt"), &existing);
        assert!(matches!(selection, Selection::Upload(_)));
    }

    #[tokio::test]
    async fn test_new_name_uploads_once_without_replace() {
        let service = FakeFiles::with_files(&["notes.txt"]);
        let existing = service.listed.clone();
        let mut workflow = UploadWorkflow::new();

        let Selection::Upload(request) = workflow.select(intent("fresh.txt"), &existing) else {
            panic!("expected an immediate upload");
        };
        assert!(workflow.is_uploading());

        let report = perform(&service, &request, ProgressTracker::detached()).await;
        workflow.complete();

        assert_eq!(
            service.calls(),
            vec![
                Call::Upload {
                    filename: "fresh.txt".to_string(),
                    replace: false
                },
                Call::Stats,
                Call::List,
            ]
        );
        assert_eq!(report.outcome.success_message(), Some("File uploaded successfully!"));
        assert!(report.stats.is_some());
        assert_eq!(workflow.state(), &UploadState::Idle);
    }

    #[tokio::test]
    async fn test_replace_uploads_exactly_once_with_flag() {
        let service = FakeFiles::with_files(&["report.txt"]);
        let existing = service.listed.clone();
        let mut workflow = UploadWorkflow::new();

        workflow.select(intent("report.txt"), &existing);
        let request = workflow.replace().unwrap();
        assert!(request.replace_existing);

        // A second confirmation has nothing left to confirm
        assert!(workflow.replace().is_none());
        assert!(workflow.is_uploading());

        let report = perform(&service, &request, ProgressTracker::detached()).await;
        workflow.complete();

        let uploads = service.count(|c| matches!(c, Call::Upload { .. }));
        assert_eq!(uploads, 1);
        assert!(service.calls().contains(&Call::Upload {
            filename: "report.txt".to_string(),
            replace: true
        }));
        assert_eq!(report.outcome.success_message(), Some("File replaced successfully!"));
    }

    #[test]
    fn test_cancel_discards_intent_without_network() {
        let existing = vec![record(1, "report.txt")];
        let mut workflow = UploadWorkflow::new();

        workflow.select(intent("report.txt"), &existing);
        let discarded = workflow.cancel().unwrap();

        assert_eq!(discarded.filename, "report.txt");
        assert_eq!(workflow.state(), &UploadState::Idle);
        assert!(workflow.replace().is_none());
    }

    #[test]
    fn test_selection_refused_while_busy() {
        let existing = vec![record(1, "report.txt")];
        let mut workflow = UploadWorkflow::new();

        // Pending confirmation: a second file cannot replace the pending intent
        workflow.select(intent("report.txt"), &existing);
        assert_eq!(workflow.select(intent("other.txt"), &existing), Selection::Busy);
        assert_eq!(workflow.pending_duplicate(), Some("report.txt"));

        // Uploading: the trigger is disabled
        workflow.replace();
        assert_eq!(workflow.select(intent("other.txt"), &existing), Selection::Busy);
        assert!(workflow.cancel().is_none());
        assert!(workflow.is_uploading());
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_bounded() {
        let service = FakeFiles::with_files(&[]);
        let request = UploadRequest {
            intent: intent("big.txt"),
            replace_existing: false,
        };
        let (tracker, stream) = ProgressTracker::channel();

        perform(&service, &request, tracker).await;

        let values: Vec<u8> = stream.collect().await;
        assert_eq!(values, vec![25, 50, 75, 100]);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values.iter().all(|v| *v <= 100));
    }

    #[tokio::test]
    async fn test_list_refetched_exactly_once_after_failure() {
        let mut service = FakeFiles::with_files(&["report.txt"]);
        service.upload_error = Some(ApiError::Server {
            status: 400,
            message: "A file with the name 'report.txt' already exists. Please rename your file and try again.".to_string(),
        });
        let request = UploadRequest {
            intent: intent("report.txt"),
            replace_existing: false,
        };

        let report = perform(&service, &request, ProgressTracker::detached()).await;

        assert_eq!(service.count(|c| *c == Call::List), 1);
        assert_eq!(service.count(|c| *c == Call::Stats), 0);
        let UploadOutcome::Failed(failure) = &report.outcome else {
            panic!("expected failure");
        };
        assert!(failure.emphasized);
        assert!(failure.message.starts_with("A file with the name 'report.txt' already exists"));
    }

    #[test]
    fn test_failure_messages_by_error_shape() {
        let transport = UploadFailure::from(&ApiError::Transport("timed out".into()));
        assert_eq!(transport.message, CONNECTIVITY_MESSAGE);
        assert!(!transport.emphasized);

        let rejected = UploadFailure::from(&ApiError::Rejected { status: 413 });
        assert_eq!(rejected.message, "Server error: 413");

        let detail = UploadFailure::from(&ApiError::Server {
            status: 400,
            message: "Unsupported file type".into(),
        });
        assert_eq!(detail.message, "Unsupported file type");
        assert!(!detail.emphasized);

        let object_detail =
            UploadFailure::from(&ApiError::from_response(422, r#"{"detail": {"field": "bad"}}"#));
        assert_eq!(object_detail.message, "Validation error: Please check your information");

        let listed = UploadFailure::from(&ApiError::Validation(vec!["file too large".into()]));
        assert_eq!(listed.message, "Validation error: file too large");

        let unexpected = UploadFailure::from(&ApiError::Unexpected("eof".into()));
        assert_eq!(
            unexpected.message,
            "Failed to upload file. Please check your connection and try again."
        );
    }

    #[tokio::test]
    async fn test_report_keeps_provisional_record_when_refresh_fails() {
        let mut service = FakeFiles::with_files(&["a.txt"]);
        service.list_error = Some(ApiError::Transport("down".into()));
        let request = UploadRequest {
            intent: intent("b.txt"),
            replace_existing: false,
        };

        let report = perform(&service, &request, ProgressTracker::detached()).await;
        let mut files = vec![record(1, "a.txt")];
        report.apply_to(&mut files);

        let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_report_prefers_refetched_list() {
        let service = FakeFiles::with_files(&["server-truth.txt"]);
        let request = UploadRequest {
            intent: intent("b.txt"),
            replace_existing: false,
        };

        let report = perform(&service, &request, ProgressTracker::detached()).await;
        let mut files = vec![record(5, "stale.txt")];
        report.apply_to(&mut files);

        assert_eq!(files, service.listed);
    }

    #[test]
    fn test_merge_record_replaces_same_name() {
        let mut files = vec![record(1, "a.txt"), record(2, "b.txt")];
        merge_record(&mut files, record(9, "b.txt"));
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].id, 9);
    }
}
