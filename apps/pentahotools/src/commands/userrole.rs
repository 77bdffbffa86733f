//! User and role management commands

use crate::api::{Permission, PermissionChange, PentahoClient, RoleAssignment, RoleCategory};
use crate::batch::{self, ExportUsersOptions, ImportReport, ImportUsersOptions};
use crate::error::{CliError, CliResult};
use crate::output::{print_names, print_success, print_warning};
use crate::table::{parse_separator, TableOptions, UserTable, UserTableWriter};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// User and role management commands
#[derive(Args, Debug)]
pub struct UserroleArgs {
    #[command(subcommand)]
    pub command: UserroleCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserroleCommands {
    /// Print the list of users
    Users(UsersArgs),
    /// Print the list of roles
    Roles(RolesArgs),
    /// Create a user
    CreateUser(CreateUserArgs),
    /// Delete users
    DeleteUser(DeleteUserArgs),
    /// Create roles
    CreateRole(NamesArgs),
    /// Delete roles
    DeleteRole(NamesArgs),
    /// Set the password of a user (administrator)
    UpdatePassword(UpdatePasswordArgs),
    /// Change the password of a user, given the current one
    ChangeUserPassword(ChangeUserPasswordArgs),
    /// Assign roles to a user
    AssignRole(UserRolesArgs),
    /// Remove roles from a user
    RemoveRole(UserRolesArgs),
    /// Print the permissions of every role, or of one role
    ListPermissions(ListPermissionsArgs),
    /// Replace the permissions of a role
    SetPermissions(SetPermissionsArgs),
    /// Grant permissions to a role
    AddPermissions(RolePermissionsArgs),
    /// Revoke permissions from a role
    RemovePermissions(RolePermissionsArgs),
    /// Make the directory match a users file
    ImportUsers(ImportUsersArgs),
    /// Export every user with their roles
    ExportUsers(ExportUsersArgs),
}

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Only list the members of this role
    #[arg(long, short = 'r')]
    pub role: Option<String>,
}

/// Role listing to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleTarget {
    All,
    Standard,
    System,
    Extra,
}

impl From<RoleTarget> for RoleCategory {
    fn from(target: RoleTarget) -> Self {
        match target {
            RoleTarget::All => RoleCategory::All,
            RoleTarget::Standard => RoleCategory::Standard,
            RoleTarget::System => RoleCategory::System,
            RoleTarget::Extra => RoleCategory::Extra,
        }
    }
}

#[derive(Args, Debug)]
pub struct RolesArgs {
    /// Which roles to list
    #[arg(long, short = 't', value_enum, default_value = "all", conflicts_with = "for_user")]
    pub target: RoleTarget,

    /// Only list the roles of this user
    #[arg(value_name = "USER")]
    pub for_user: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    pub name: String,
    #[arg(value_name = "PASSWORD")]
    pub new_password: String,
}

#[derive(Args, Debug)]
pub struct DeleteUserArgs {
    /// Users to delete
    #[arg(required_unless_present = "file")]
    pub names: Vec<String>,

    /// Delete the users listed in the first column of a users file
    #[arg(long, short = 'f', conflicts_with = "names")]
    pub file: Option<PathBuf>,

    /// Also delete the home directories
    #[arg(long, short = 'H')]
    pub home_dir: bool,
}

#[derive(Args, Debug)]
pub struct NamesArgs {
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UpdatePasswordArgs {
    pub name: String,
    #[arg(value_name = "PASSWORD")]
    pub new_password: String,
}

#[derive(Args, Debug)]
pub struct ChangeUserPasswordArgs {
    pub name: String,
    #[arg(value_name = "OLD_PASSWORD")]
    pub old_password: String,
    #[arg(value_name = "NEW_PASSWORD")]
    pub new_password: String,
}

#[derive(Args, Debug)]
pub struct ListPermissionsArgs {
    /// Only print this role
    pub role: Option<String>,
}

#[derive(Args, Debug)]
pub struct SetPermissionsArgs {
    pub role: String,
    /// Permissions to grant; none clears them all. One of: execute, datasource,
    /// content-read, content-create, schedule, security, publish
    pub permissions: Vec<Permission>,
}

#[derive(Args, Debug)]
pub struct RolePermissionsArgs {
    pub role: String,
    /// One of: execute, datasource, content-read, content-create, schedule,
    /// security, publish
    #[arg(required = true)]
    pub permissions: Vec<Permission>,
}

#[derive(Args, Debug)]
pub struct UserRolesArgs {
    #[arg(value_name = "USER")]
    pub target_user: String,
    #[arg(required = true)]
    pub roles: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ImportUsersArgs {
    /// Users file (.csv, .tsv, .txt or .xlsx): user, roles, password
    pub file: PathBuf,

    /// Create roles that do not exist yet
    #[arg(long, short = 'c')]
    pub create_roles: bool,

    /// Also set the password of existing users
    #[arg(long, short = 'P')]
    pub update_password: bool,

    /// Password for rows without one
    #[arg(long, short = 'd', default_value = "")]
    pub default_password: String,

    /// Delete users that are not in the file (off unless given)
    ///
    /// Without this flag an import never deletes users, it only creates and
    /// updates the users listed in the file.
    #[arg(long, short = 'D')]
    pub delete_users: bool,

    /// Delete the home directory of deleted users
    #[arg(long, short = 'H', requires = "delete_users")]
    pub delete_homedir: bool,

    /// Number of header rows to skip
    #[arg(long, short = 'e', default_value = "0")]
    pub header_size: usize,

    /// Column separator, e.g. ',' or '\t'
    #[arg(long, short = 's', value_parser = parse_separator)]
    pub separator: Option<u8>,

    /// Match existing users and roles regardless of case
    #[arg(long, short = 'i')]
    pub case_insensitive: bool,
}

#[derive(Args, Debug)]
pub struct ExportUsersArgs {
    /// Output file; stdout when omitted
    pub file: Option<PathBuf>,

    /// Write a header row
    #[arg(long, short = 'e')]
    pub headers: bool,

    /// Column separator, e.g. ',' or '\t'
    #[arg(long, short = 's', value_parser = parse_separator)]
    pub separator: Option<u8>,
}

/// Execute user and role commands
pub async fn execute(args: UserroleArgs, client: &PentahoClient) -> CliResult<()> {
    match args.command {
        UserroleCommands::Users(a) => execute_users(a, client).await,
        UserroleCommands::Roles(a) => execute_roles(a, client).await,
        UserroleCommands::CreateUser(a) => {
            client.create_user(&a.name, &a.new_password).await?;
            print_success(&format!("Created user '{}'", a.name));
            Ok(())
        }
        UserroleCommands::DeleteUser(a) => execute_delete_user(a, client).await,
        UserroleCommands::CreateRole(a) => execute_create_role(a, client).await,
        UserroleCommands::DeleteRole(a) => {
            client.delete_roles(&a.names).await?;
            print_success(&format!("Deleted {} role(s)", a.names.len()));
            Ok(())
        }
        UserroleCommands::UpdatePassword(a) => {
            client.update_password(&a.name, &a.new_password).await?;
            print_success(&format!("Updated the password of '{}'", a.name));
            Ok(())
        }
        UserroleCommands::ChangeUserPassword(a) => {
            client
                .change_user_password(&a.name, &a.old_password, &a.new_password)
                .await?;
            print_success(&format!("Changed the password of '{}'", a.name));
            Ok(())
        }
        UserroleCommands::ListPermissions(a) => execute_list_permissions(a, client).await,
        UserroleCommands::SetPermissions(a) => {
            client.set_permissions(&a.role, &a.permissions).await?;
            print_success(&format!(
                "Set the permissions of '{}' to [{}]",
                a.role,
                permission_names(&a.permissions)
            ));
            Ok(())
        }
        UserroleCommands::AddPermissions(a) => {
            client
                .change_permissions(&a.role, PermissionChange::Add, &a.permissions)
                .await?;
            print_success(&format!(
                "Added [{}] to '{}'",
                permission_names(&a.permissions),
                a.role
            ));
            Ok(())
        }
        UserroleCommands::RemovePermissions(a) => {
            client
                .change_permissions(&a.role, PermissionChange::Remove, &a.permissions)
                .await?;
            print_success(&format!(
                "Removed [{}] from '{}'",
                permission_names(&a.permissions),
                a.role
            ));
            Ok(())
        }
        UserroleCommands::AssignRole(a) => {
            client.assign_roles_to_user(&a.target_user, &a.roles).await?;
            print_success(&format!("Assigned {} to '{}'", a.roles.join(", "), a.target_user));
            Ok(())
        }
        UserroleCommands::RemoveRole(a) => {
            client.remove_roles_from_user(&a.target_user, &a.roles).await?;
            print_success(&format!("Removed {} from '{}'", a.roles.join(", "), a.target_user));
            Ok(())
        }
        UserroleCommands::ImportUsers(a) => execute_import_users(a, client).await,
        UserroleCommands::ExportUsers(a) => execute_export_users(a, client).await,
    }
}

async fn execute_users(args: UsersArgs, client: &PentahoClient) -> CliResult<()> {
    let users = match args.role {
        Some(role) => client.list_users_in_role(&role).await?,
        None => client.list_users().await?,
    };
    print_names(&users);
    Ok(())
}

async fn execute_roles(args: RolesArgs, client: &PentahoClient) -> CliResult<()> {
    let roles = match args.for_user {
        Some(user) => client.list_roles_for_user(&user).await?,
        None => client.list_roles(args.target.into()).await?,
    };
    print_names(&roles);
    Ok(())
}

async fn execute_list_permissions(
    args: ListPermissionsArgs,
    client: &PentahoClient,
) -> CliResult<()> {
    let assignments = match args.role {
        Some(role) => vec![client.role_permissions(&role).await?],
        None => client.list_role_permissions().await?,
    };
    for assignment in &assignments {
        print_role_permissions(assignment);
        println!();
    }
    Ok(())
}

fn print_role_permissions(assignment: &RoleAssignment) {
    if assignment.immutable {
        println!("{} (Immutable)", assignment.role_name);
    } else {
        println!("{}", assignment.role_name);
    }
    for logical_name in &assignment.logical_roles {
        match Permission::from_logical_name(logical_name) {
            Some(permission) => println!("- {}", permission),
            None => println!("- <{}>", logical_name),
        }
    }
}

fn permission_names(permissions: &[Permission]) -> String {
    permissions
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn execute_delete_user(args: DeleteUserArgs, client: &PentahoClient) -> CliResult<()> {
    let users = match args.file {
        Some(path) => {
            let table = UserTable::open(
                &path,
                TableOptions {
                    separator: None,
                    header_size: 0,
                },
            )?;
            batch::user_names(&table)?
        }
        None => args.names,
    };
    if users.is_empty() {
        return Err(CliError::Validation("No users to delete".to_string()));
    }

    batch::delete_users(&users, args.home_dir, client, client.logger().clone()).await?;
    print_success(&format!("Deleted {} user(s)", users.len()));
    Ok(())
}

async fn execute_create_role(args: NamesArgs, client: &PentahoClient) -> CliResult<()> {
    for name in &args.names {
        client.create_role(name).await?;
    }
    print_success(&format!("Created {} role(s)", args.names.len()));
    Ok(())
}

async fn execute_import_users(args: ImportUsersArgs, client: &PentahoClient) -> CliResult<()> {
    let table = UserTable::open(
        &args.file,
        TableOptions {
            separator: args.separator,
            header_size: args.header_size,
        },
    )?;
    let options = ImportUsersOptions {
        create_roles: args.create_roles,
        update_password: args.update_password,
        default_password: args.default_password,
        delete_users: args.delete_users,
        delete_home_directory: args.delete_homedir,
        case_insensitive: args.case_insensitive,
    };

    let report = batch::import_users(&table, &options, client, client.logger().clone()).await?;
    print_import_report(&report);
    report.ensure_success()
}

fn print_import_report(report: &ImportReport) {
    let result = &report.result;
    if result.has_failures() {
        eprintln!("Failed rows:");
        for item in result.failed_items() {
            eprintln!(
                "  {}. {}: {}",
                item.index + 1,
                item.name,
                item.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if report.sweep_skipped {
        print_warning("Unlisted users were not deleted because some rows failed.");
    }

    print_success(&format!(
        "Imported {} of {} user(s) in {}ms",
        result.success_count, result.total, result.duration_ms
    ));
    if !report.deleted_users.is_empty() {
        print_success(&format!(
            "Deleted {} user(s): {}",
            report.deleted_users.len(),
            report.deleted_users.join(", ")
        ));
    }
}

async fn execute_export_users(args: ExportUsersArgs, client: &PentahoClient) -> CliResult<()> {
    let writer = match &args.file {
        Some(path) => UserTableWriter::create(path, args.separator)?,
        None => UserTableWriter::stdout(args.separator),
    };
    let options = ExportUsersOptions {
        with_header: args.headers,
    };

    let written = batch::export_users(writer, options, client, client.logger().clone()).await?;
    if let Some(path) = &args.file {
        print_success(&format!(
            "Exported {} user(s) to {}",
            written,
            path.display()
        ));
    }
    Ok(())
}
