//! Signup, login and logout.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::errors::{AppError, AppResult};
use crate::types::FieldErrors;
use crate::web::extractors::ValidatedForm;
use crate::web::forms::{CsrfForm, LoginForm, SignupForm};
use crate::web::templates::{self, PageContext};
use crate::web::{paths, AppState, Session};

pub async fn login_form(session: Session) -> AppResult<Response> {
    let ctx = PageContext::load(&session, None).await;
    Ok(templates::login_page(&ctx, &LoginForm::default(), &FieldErrors::new()).into_response())
}

/// Authenticate and bind the session to the account.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidatedForm { data, errors }: ValidatedForm<LoginForm>,
) -> AppResult<Response> {
    if !errors.is_empty() {
        let ctx = PageContext::load(&session, None).await;
        return Ok(templates::login_page(&ctx, &data, &errors).into_response());
    }

    match state
        .auth_service
        .authenticate(&data.username, &data.password)
        .await
    {
        Ok(account) => {
            session.login(account.id).await;
            state.auth_service.record_login(account.id).await?;
            tracing::info!(account_id = account.id, "Account logged in");
            Ok(Redirect::to(paths::HOME).into_response())
        }
        Err(e @ AppError::InvalidCredentials) => {
            let mut errors = FieldErrors::new();
            errors.add_non_field(e.to_string());
            let ctx = PageContext::load(&session, None).await;
            Ok(templates::login_page(&ctx, &data, &errors).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET logout: end the session.
pub async fn logout(session: Session) -> Redirect {
    session.logout().await;
    Redirect::to(paths::WELCOME)
}

/// POST logout, CSRF-checked.
pub async fn logout_submit(session: Session, _form: ValidatedForm<CsrfForm>) -> Redirect {
    logout(session).await
}

pub async fn signup_form(session: Session) -> AppResult<Response> {
    let ctx = PageContext::load(&session, None).await;
    Ok(templates::signup_page(&ctx, &SignupForm::default(), &FieldErrors::new()).into_response())
}

/// Register a standard account, then send the visitor to login.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    ValidatedForm { data, errors }: ValidatedForm<SignupForm>,
) -> AppResult<Response> {
    if !errors.is_empty() {
        let ctx = PageContext::load(&session, None).await;
        return Ok(templates::signup_page(&ctx, &data, &errors).into_response());
    }

    match state.auth_service.register(data.clone().into_draft()).await {
        Ok(account) => {
            tracing::info!(account_id = account.id, username = %account.username, "Account registered");
            Ok(Redirect::to(paths::LOGIN).into_response())
        }
        Err(AppError::Validation(errors)) => {
            let ctx = PageContext::load(&session, None).await;
            Ok(templates::signup_page(&ctx, &data, &errors).into_response())
        }
        Err(e) => Err(e),
    }
}
