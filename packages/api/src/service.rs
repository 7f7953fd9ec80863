//! Async service traits grouping the remote operations.
//!
//! [`crate::ApiClient`] implements all three against the real service. The
//! upload workflow and the tests depend only on these traits.

use std::future::Future;

use crate::error::ApiError;
use crate::models::{
    Address, AddressDraft, DashboardStats, FileRecord, Profile, ProfileUpdate, Registration,
};
use crate::progress::ProgressTracker;
use crate::upload::UploadIntent;

/// Login, registration and logout.
pub trait AuthService {
    /// Exchange credentials for a token and start the session.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), ApiError>>;

    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<Profile, ApiError>>;

    /// End the session. The local token is cleared whether or not the
    /// remote call succeeds.
    fn logout(&self) -> impl Future<Output = ()>;
}

/// File listing, transfer and statistics.
pub trait FileService {
    fn list_files(&self) -> impl Future<Output = Result<Vec<FileRecord>, ApiError>>;

    fn upload_file(
        &self,
        intent: &UploadIntent,
        replace_existing: bool,
        progress: ProgressTracker,
    ) -> impl Future<Output = Result<FileRecord, ApiError>>;

    fn download_file(&self, file_id: i64) -> impl Future<Output = Result<Vec<u8>, ApiError>>;

    fn delete_file(&self, file_id: i64) -> impl Future<Output = Result<(), ApiError>>;

    fn dashboard_stats(&self) -> impl Future<Output = Result<DashboardStats, ApiError>>;
}

/// Current-user profile and addresses.
pub trait ProfileService {
    fn profile(&self) -> impl Future<Output = Result<Profile, ApiError>>;

    fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<Profile, ApiError>>;

    fn addresses(&self) -> impl Future<Output = Result<Vec<Address>, ApiError>>;

    fn create_address(
        &self,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>>;

    fn update_address(
        &self,
        address_id: i64,
        draft: &AddressDraft,
    ) -> impl Future<Output = Result<Address, ApiError>>;

    fn delete_address(&self, address_id: i64) -> impl Future<Output = Result<(), ApiError>>;
}
