//! Application route configuration.

use axum::{
    http::header::CACHE_CONTROL,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use super::handlers::{account_handler, admin_handler, health_handler, pages_handler};
use super::middleware::{current_account_middleware, enforce_gate, session_middleware, Gate};
use super::{paths, AppState};
use crate::config::NEVER_CACHE_HEADER;
use crate::errors::AppError;

fn gated(routes: Router<AppState>, gate: Gate) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(gate, enforce_gate))
}

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Public pages for visitors who are not logged in
    let anonymous = Router::new()
        .route(paths::WELCOME, get(pages_handler::welcome))
        .route(
            paths::LOGIN,
            get(account_handler::login_form).post(account_handler::login),
        )
        .route(
            paths::SIGNUP,
            get(account_handler::signup_form).post(account_handler::signup),
        );

    let members = Router::new()
        .route(paths::HOME, get(pages_handler::home))
        .route(
            paths::LOGOUT,
            get(account_handler::logout).post(account_handler::logout_submit),
        );

    let admin_session = Router::new().route(
        paths::ADMIN_LOGOUT,
        get(admin_handler::logout).post(admin_handler::logout_submit),
    );

    let control_panel = Router::new()
        .route(paths::ADMIN_DASHBOARD, get(admin_handler::dashboard))
        .route(paths::ADMIN_USERS, get(admin_handler::users))
        .route(paths::PROFILE_ROUTE, get(admin_handler::profile))
        .route(
            paths::ADMIN_ADD_USER,
            get(admin_handler::add_user_form).post(admin_handler::add_user),
        )
        .route(
            paths::USER_EDIT_ROUTE,
            get(admin_handler::edit_user_form).post(admin_handler::edit_user),
        )
        .route(
            paths::USER_DELETE_ROUTE,
            get(admin_handler::delete_user_confirm).post(admin_handler::delete_user),
        );

    Router::new()
        .route(
            paths::ADMIN_LOGIN,
            get(admin_handler::login_form).post(admin_handler::login),
        )
        .route(paths::HEALTH, get(health_handler::health))
        .merge(gated(
            anonymous,
            Gate::AnonymousOnly {
                redirect_to: paths::HOME,
            },
        ))
        .merge(gated(
            members,
            Gate::LoginRequired {
                login_url: paths::LOGIN,
            },
        ))
        .merge(gated(
            admin_session,
            Gate::LoginRequired {
                login_url: paths::ADMIN_LOGIN,
            },
        ))
        .merge(gated(
            control_panel,
            Gate::SuperuserOnly {
                login_url: paths::ADMIN_LOGIN,
            },
        ))
        .fallback(|| async { AppError::NotFound })
        // Global middleware; the last layer added runs first
        .layer(middleware::from_fn_with_state(
            state.clone(),
            current_account_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(NEVER_CACHE_HEADER),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
