mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod protected;
pub use protected::Protected;

mod dashboard;
pub use dashboard::Dashboard;

mod profile;
pub use profile::Profile;

mod not_found;
pub use not_found::NotFound;
