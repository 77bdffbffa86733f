//! Batch drivers for import, export and bulk deletion
//!
//! `import_users` traverses the user file twice. The first pass runs the
//! importer through a [`ValidationClient`] and stops at the first bad row,
//! so nothing is written unless every row would succeed. The second pass
//! performs the writes, collecting row failures instead of stopping.

use super::client::{DirectoryClient, ValidationClient};
use super::error::ImportError;
use super::importer::{home_directory, ImportSettings, Importer, AUTHENTICATED_ROLE};
use super::progress::BatchProgress;
use super::result::BatchResult;
use crate::error::{CliError, CliResult};
use crate::logging::Logger;
use crate::table::{UserRow, UserTable, UserTableWriter};
use std::sync::Arc;
use std::time::Instant;

/// Options for [`import_users`]
#[derive(Debug, Clone, Default)]
pub struct ImportUsersOptions {
    /// Create roles that are missing from the directory
    pub create_roles: bool,
    /// Set the row password on existing users too
    pub update_password: bool,
    /// Password used for rows with an empty password cell
    pub default_password: String,
    /// Delete directory users that no row mentions
    pub delete_users: bool,
    /// Also delete the home directory of every swept user
    pub delete_home_directory: bool,
    /// Accept names that differ from the directory only by case
    pub case_insensitive: bool,
}

impl ImportUsersOptions {
    fn settings(&self) -> ImportSettings {
        ImportSettings {
            strict_case_sensitive: !self.case_insensitive,
            create_roles: self.create_roles,
            update_password: self.update_password,
        }
    }

    fn password_for<'r>(&'r self, row: &'r UserRow) -> &'r str {
        if row.password.is_empty() {
            &self.default_password
        } else {
            &row.password
        }
    }
}

/// Outcome of the writing pass of an import
#[derive(Debug)]
pub struct ImportReport {
    pub result: BatchResult,
    /// Users removed by the sweep
    pub deleted_users: Vec<String>,
    /// The sweep was requested but not run because rows failed
    pub sweep_skipped: bool,
    /// Swept users whose home directory could not be deleted
    pub home_directory_failures: usize,
}

impl ImportReport {
    /// Fail when any row could not be imported or a home directory was left behind
    pub fn ensure_success(&self) -> CliResult<()> {
        if self.result.has_failures() {
            return Err(CliError::ImportFailed {
                failed: self.result.failure_count,
            });
        }
        if self.home_directory_failures > 0 {
            return Err(ImportError::HomeDirectoryCleanup {
                failed: self.home_directory_failures,
                total: self.deleted_users.len(),
                deleted: self.deleted_users.clone(),
            }
            .into());
        }
        Ok(())
    }
}

/// Reconcile the directory with a user file
pub async fn import_users(
    table: &UserTable,
    options: &ImportUsersOptions,
    client: &dyn DirectoryClient,
    logger: Arc<Logger>,
) -> CliResult<ImportReport> {
    let hidden = logger.config().quiet;

    let validation = ValidationClient::new(client);
    validate_pass(table, options, &validation, logger.clone(), hidden).await?;
    logger.verbose_with_context(
        "import",
        "Validation passed",
        &[("rows", table.count().to_string().as_str())],
    );

    let start = Instant::now();
    let mut importer = Importer::new(client, logger.clone(), options.settings());
    let mut result = BatchResult::new("import_users", table.count());
    let progress = BatchProgress::new(table.count() as u64, false, hidden);

    for (index, row) in table.rows()?.enumerate() {
        let row = row?;
        progress.set_message(&format!("User: {}", row.name));

        match importer
            .import(&row.name, options.password_for(&row), &row.roles)
            .await
        {
            Ok(()) => result.add_success(index, row.name),
            Err(e) if e.is_batch_fatal() => {
                progress.finish_and_clear();
                return Err(e.into());
            }
            Err(e) => {
                let reason = e.to_string();
                logger.error(
                    "Failed to import the user",
                    &[
                        ("user", row.name.as_str()),
                        ("roles", row.roles.join(":").as_str()),
                        ("error", reason.as_str()),
                    ],
                );
                result.add_failure(index, row.name, reason);
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    let mut report = ImportReport {
        result,
        deleted_users: Vec::new(),
        sweep_skipped: false,
        home_directory_failures: 0,
    };

    if options.delete_users {
        if report.result.has_failures() {
            logger.warn(
                "Skipping deletion of unlisted users because some rows failed",
                &[("failed", report.result.failure_count.to_string().as_str())],
            );
            report.sweep_skipped = true;
        } else {
            match importer
                .delete_remaining_users(options.delete_home_directory)
                .await
            {
                Ok(deleted) => report.deleted_users = deleted,
                Err(ImportError::HomeDirectoryCleanup {
                    failed, deleted, ..
                }) => {
                    report.deleted_users = deleted;
                    report.home_directory_failures = failed;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    report
        .result
        .set_duration(start.elapsed().as_millis() as u64);
    Ok(report)
}

async fn validate_pass(
    table: &UserTable,
    options: &ImportUsersOptions,
    client: &dyn DirectoryClient,
    logger: Arc<Logger>,
    hidden: bool,
) -> CliResult<()> {
    let mut importer = Importer::new(client, logger, options.settings());
    let progress = BatchProgress::new(table.count() as u64, true, hidden);

    for row in table.rows()? {
        let row = row?;
        progress.set_message(&format!("User: {}", row.name));

        if let Err(e) = importer
            .import(&row.name, options.password_for(&row), &row.roles)
            .await
        {
            progress.finish_and_clear();
            return Err(validation_error(&row.name, e));
        }
        progress.inc();
    }
    progress.finish_and_clear();

    if options.delete_users {
        importer
            .delete_remaining_users(options.delete_home_directory)
            .await?;
    }
    Ok(())
}

fn validation_error(user: &str, error: ImportError) -> CliError {
    if error.is_batch_fatal() {
        return CliError::Import(error);
    }
    CliError::ValidationFailed {
        user: user.to_string(),
        reason: error.to_string(),
    }
}

/// Options for [`export_users`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportUsersOptions {
    pub with_header: bool,
}

/// Write every directory user with its roles; returns the number of rows written
///
/// `Authenticated` is left out of the role list. A user whose roles cannot
/// be listed is skipped with a warning.
pub async fn export_users(
    mut writer: UserTableWriter,
    options: ExportUsersOptions,
    client: &dyn DirectoryClient,
    logger: Arc<Logger>,
) -> CliResult<usize> {
    let users = client.list_users().await?;
    let progress = BatchProgress::new(users.len() as u64, false, logger.config().quiet);

    if options.with_header {
        writer.write_header()?;
    }

    let mut written = 0;
    for user in &users {
        progress.set_message(&format!("Roles for {}", user));
        match client.list_roles_for_user(user).await {
            Ok(roles) => {
                let roles: Vec<String> = roles
                    .into_iter()
                    .filter(|r| r != AUTHENTICATED_ROLE)
                    .collect();
                writer.write_row(user, &roles)?;
                written += 1;
            }
            Err(e) => {
                logger.warn(
                    "Failed to list roles for user",
                    &[("user", user.as_str()), ("error", e.to_string().as_str())],
                );
            }
        }
        progress.inc();
    }
    progress.finish_and_clear();

    writer.finish()?;
    Ok(written)
}

/// Delete users with one call, then optionally their home directories
///
/// A home directory that cannot be deleted only produces a warning.
pub async fn delete_users(
    users: &[String],
    delete_home_directory: bool,
    client: &dyn DirectoryClient,
    logger: Arc<Logger>,
) -> CliResult<()> {
    let total = if delete_home_directory {
        1 + users.len()
    } else {
        1
    };
    let progress = BatchProgress::new(total as u64, false, logger.config().quiet);

    progress.set_message("Delete users");
    client.delete_users(users).await?;
    progress.inc();

    if delete_home_directory {
        for user in users {
            let folder = home_directory(user);
            progress.set_message(&format!("Delete home directory: {}", folder));
            if let Err(e) = client.delete_files(&[folder.clone()]).await {
                logger.warn(
                    "Failed to delete home directory",
                    &[("path", folder.as_str()), ("error", e.to_string().as_str())],
                );
            }
            progress.inc();
        }
    }
    progress.finish_and_clear();
    Ok(())
}

/// User names of every row of a user file, in file order
pub fn user_names(table: &UserTable) -> CliResult<Vec<String>> {
    table
        .rows()?
        .map(|row| row.map(|r| r.name))
        .collect()
}
