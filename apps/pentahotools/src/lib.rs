//! pentahotools library
//!
//! Exposes the modules behind the `pentahotools` binary so integration tests
//! can drive the HTTP client and the batch engine directly.

pub mod api;
pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod table;
