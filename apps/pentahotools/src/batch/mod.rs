//! Batch reconciliation of directory users and roles
//!
//! Imports converge the directory onto a user file, exports write the
//! directory back out, and bulk deletion removes users with their home
//! directories.

pub mod client;
pub mod error;
pub mod importer;
pub mod progress;
pub mod resolver;
pub mod result;
pub mod runner;

#[cfg(test)]
mod fake;

pub use client::{DirectoryClient, ValidationClient};
pub use error::{DirectoryOperation, IdentityKind, ImportError};
pub use importer::{ImportSettings, Importer};
pub use progress::BatchProgress;
pub use resolver::{IdentityResolver, NameCache};
pub use result::{BatchItemResult, BatchItemStatus, BatchResult};
pub use runner::{
    delete_users, export_users, import_users, user_names, ExportUsersOptions, ImportReport,
    ImportUsersOptions,
};
