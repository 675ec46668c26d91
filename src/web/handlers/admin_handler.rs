//! Control panel handlers.
//!
//! Everything except login is behind the superuser gate, so handlers can
//! take [`CurrentAccount`] directly.

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::types::{DirectoryQuery, FieldErrors};
use crate::web::extractors::{AccountId, ValidatedForm};
use crate::web::forms::{AdminCreateForm, AdminEditForm, CsrfForm, LoginForm};
use crate::web::middleware::CurrentAccount;
use crate::web::templates::{self, PageContext};
use crate::web::{paths, AppState, Session};

const INVALID_LOGIN: &str = "Invalid username or password";
const NOT_AUTHORIZED: &str = "You are not authorized to access the admin dashboard.";
const CREATE_FAILED: &str =
    "There was an error creating the user. Please correct the fields below.";
const UPDATE_FAILED: &str =
    "There was an error updating the user. Please correct the fields below.";

/// Listing query string.
#[derive(Debug, Default, Deserialize)]
pub struct UsersParams {
    pub q: Option<String>,
    pub order_by: Option<String>,
    pub page: Option<String>,
}

fn is_superuser(account: &Option<CurrentAccount>) -> bool {
    account.as_ref().is_some_and(|a| a.is_superuser)
}

async fn admin_login_response(
    session: &Session,
    account: Option<CurrentAccount>,
    form: &LoginForm,
) -> Response {
    let ctx = PageContext::load(session, account).await;
    templates::admin_login_page(&ctx, form, &FieldErrors::new()).into_response()
}

pub async fn login_form(session: Session, account: Option<CurrentAccount>) -> Response {
    if is_superuser(&account) {
        return Redirect::to(paths::ADMIN_DASHBOARD).into_response();
    }
    admin_login_response(&session, account, &LoginForm::default()).await
}

/// Superuser-only login. Failures flash a message and re-render the form.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    account: Option<CurrentAccount>,
    ValidatedForm { data, errors }: ValidatedForm<LoginForm>,
) -> AppResult<Response> {
    if is_superuser(&account) {
        return Ok(Redirect::to(paths::ADMIN_DASHBOARD).into_response());
    }

    if !errors.is_empty() {
        session.error(INVALID_LOGIN).await;
        return Ok(admin_login_response(&session, account, &data).await);
    }

    let authenticated = match state
        .auth_service
        .authenticate(&data.username, &data.password)
        .await
    {
        Ok(authenticated) => authenticated,
        Err(AppError::InvalidCredentials) => {
            session.error(INVALID_LOGIN).await;
            return Ok(admin_login_response(&session, account, &data).await);
        }
        Err(e) => return Err(e),
    };

    if !authenticated.is_superuser {
        tracing::warn!(account_id = authenticated.id, "Non-superuser refused at control panel login");
        session.error(NOT_AUTHORIZED).await;
        return Ok(admin_login_response(&session, account, &data).await);
    }

    session.login(authenticated.id).await;
    state.auth_service.record_login(authenticated.id).await?;
    tracing::info!(account_id = authenticated.id, "Superuser logged in to control panel");
    Ok(Redirect::to(paths::ADMIN_DASHBOARD).into_response())
}

pub async fn logout(session: Session) -> Redirect {
    session.logout().await;
    Redirect::to(paths::ADMIN_LOGIN)
}

pub async fn logout_submit(session: Session, _form: ValidatedForm<CsrfForm>) -> Redirect {
    logout(session).await
}

pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
) -> AppResult<Html<String>> {
    let stats = state.directory_service.dashboard().await?;
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::dashboard_page(&ctx, &stats))
}

/// Searchable, sortable, paginated account listing.
pub async fn users(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    Query(params): Query<UsersParams>,
) -> AppResult<Html<String>> {
    let query = DirectoryQuery::new(
        params.q.as_deref(),
        params.order_by.as_deref(),
        params.page.as_deref(),
    );
    let page = state.directory_service.list_accounts(&query).await?;

    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::users_page(
        &ctx,
        &page,
        query.search.as_deref(),
        query.sort,
    ))
}

pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    AccountId(id): AccountId,
) -> AppResult<Html<String>> {
    let target = state.directory_service.get_account(id).await?;
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::profile_page(&ctx, &target))
}

pub async fn add_user_form(session: Session, account: CurrentAccount) -> AppResult<Html<String>> {
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::add_user_page(
        &ctx,
        &AdminCreateForm::initial(),
        &FieldErrors::new(),
    ))
}

/// Create an account; success returns to an empty add form.
pub async fn add_user(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    ValidatedForm { data, errors }: ValidatedForm<AdminCreateForm>,
) -> AppResult<Response> {
    let errors = if errors.is_empty() {
        match state
            .directory_service
            .create_account(data.clone().into_draft())
            .await
        {
            Ok(created) => {
                session
                    .success(format!(
                        "New user \"{}\" created successfully!",
                        created.username
                    ))
                    .await;
                return Ok(Redirect::to(paths::ADMIN_ADD_USER).into_response());
            }
            Err(AppError::Validation(errors)) => errors,
            Err(e) => return Err(e),
        }
    } else {
        errors
    };

    session.error(CREATE_FAILED).await;
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::add_user_page(&ctx, &data, &errors).into_response())
}

pub async fn edit_user_form(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    AccountId(id): AccountId,
) -> AppResult<Html<String>> {
    let target = state.directory_service.get_account(id).await?;
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::edit_user_page(
        &ctx,
        &target,
        &AdminEditForm::from_account(&target),
        &FieldErrors::new(),
    ))
}

/// Apply profile and role changes; success goes to the profile page.
pub async fn edit_user(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    AccountId(id): AccountId,
    ValidatedForm { data, errors }: ValidatedForm<AdminEditForm>,
) -> AppResult<Response> {
    let target = state.directory_service.get_account(id).await?;

    let errors = if errors.is_empty() {
        match state
            .directory_service
            .update_account(id, data.clone().into_changes())
            .await
        {
            Ok(updated) => {
                session
                    .success(format!(
                        "User \"{}\" credentials updated successfully! Changes applied.",
                        updated.username
                    ))
                    .await;
                return Ok(Redirect::to(&paths::profile(id)).into_response());
            }
            Err(AppError::Validation(errors)) => errors,
            Err(e) => return Err(e),
        }
    } else {
        errors
    };

    session.error(UPDATE_FAILED).await;
    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::edit_user_page(&ctx, &target, &data, &errors).into_response())
}

/// Turn a deletion guard refusal into a flash and a redirect to the listing.
async fn refuse_delete(session: &Session, err: AppError) -> AppResult<Response> {
    match err {
        AppError::Policy(message) => {
            session.error(message).await;
            Ok(Redirect::to(paths::ADMIN_USERS).into_response())
        }
        other => Err(other),
    }
}

/// Confirmation page, unless a deletion guard refuses first.
pub async fn delete_user_confirm(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    AccountId(id): AccountId,
) -> AppResult<Response> {
    let target = match state.directory_service.check_deletable(account.id, id).await {
        Ok(target) => target,
        Err(e) => return refuse_delete(&session, e).await,
    };

    let ctx = PageContext::load(&session, Some(account)).await;
    Ok(templates::delete_confirm_page(&ctx, &target).into_response())
}

pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    account: CurrentAccount,
    AccountId(id): AccountId,
    _form: ValidatedForm<CsrfForm>,
) -> AppResult<Response> {
    match state.directory_service.delete_account(account.id, id).await {
        Ok(removed) => {
            session
                .success(format!(
                    "User \"{}\" was deleted successfully.",
                    removed.username
                ))
                .await;
            Ok(Redirect::to(paths::ADMIN_USERS).into_response())
        }
        Err(e) => refuse_delete(&session, e).await,
    }
}
