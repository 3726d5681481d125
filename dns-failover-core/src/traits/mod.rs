//! Storage layer abstraction trait definition

mod account_repository;
mod activity_log;
mod credential_store;
mod site_repository;

pub use account_repository::AccountRepository;
pub use activity_log::ActivityLog;
pub use credential_store::CredentialStore;
pub use site_repository::SiteRepository;
