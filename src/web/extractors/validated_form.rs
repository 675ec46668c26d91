//! Validated form extractor - Combines CSRF check, deserialization and validation.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Form,
};

use crate::errors::AppError;
use crate::types::FieldErrors;
use crate::web::forms::HtmlForm;
use crate::web::Session;

/// Urlencoded form that passed the CSRF check, with its validation outcome.
///
/// Unlike a JSON body, an invalid HTML form is not a rejection: the handler
/// re-renders it with `errors` and the submitted values.
///
/// ```rust,ignore
/// async fn signup(ValidatedForm { data, errors }: ValidatedForm<SignupForm>) {
///     if !errors.is_empty() {
///         // re-render with errors
///     }
/// }
/// ```
pub struct ValidatedForm<T> {
    pub data: T,
    pub errors: FieldErrors,
}

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: HtmlForm,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let session = req
            .extensions()
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal("session middleware is not installed"))?;
        let path = req.uri().path().to_string();

        let Form(data) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if !session.verify_csrf(data.csrf_token()).await {
            tracing::warn!(path = %path, "CSRF token mismatch");
            return Err(AppError::Forbidden);
        }

        let mut errors = match data.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        data.clean(&mut errors);

        Ok(ValidatedForm { data, errors })
    }
}
