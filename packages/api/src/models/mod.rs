//! Data models exchanged with the file service.

mod file;
mod stats;
mod user;

pub use file::{FileRecord, FileType};
pub use stats::DashboardStats;
pub(crate) use user::non_empty;
pub use user::{Address, AddressDraft, Profile, ProfileUpdate, Registration, TokenResponse};
