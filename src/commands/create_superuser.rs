//! Create-superuser command - Bootstraps the first control panel account.

use validator::ValidationErrors;

use crate::cli::args::CreateSuperuserArgs;
use crate::config::Config;
use crate::domain::validation::{validate_email_address, validate_username};
use crate::domain::{AccountDraft, RoleFlags};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};
use crate::types::FieldErrors;

fn check_fields(args: &CreateSuperuserArgs) -> AppResult<()> {
    let mut errors = ValidationErrors::new();
    if let Err(e) = validate_username(&args.username) {
        errors.add("username", e);
    }
    if let Err(e) = validate_email_address(&args.email) {
        errors.add("email", e);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(FieldErrors::from(errors)))
    }
}

/// Execute the create-superuser command
pub async fn execute(args: CreateSuperuserArgs, config: Config) -> AppResult<()> {
    check_fields(&args)?;

    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection());

    let draft = AccountDraft {
        username: args.username.trim().to_string(),
        first_name: args.first_name.trim().to_string(),
        last_name: args.last_name.trim().to_string(),
        email: args.email.trim().to_string(),
        password: args.password,
        roles: RoleFlags::superuser(),
    };

    let account = services.directory().create_account(draft).await?;
    tracing::info!(account_id = account.id, username = %account.username, "Superuser created");
    println!("Superuser \"{}\" created.", account.username);

    Ok(())
}
