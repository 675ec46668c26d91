//! Public account pages.

use axum::response::Html;

use super::escape;
use super::forms::render_form;
use super::layout::{render, Area, PageContext};
use crate::types::FieldErrors;
use crate::web::forms::{FormTheme, LoginForm, SignupForm};
use crate::web::middleware::CurrentAccount;
use crate::web::paths;

pub fn welcome_page(ctx: &PageContext) -> Html<String> {
    let body = format!(
        "<p>Welcome! Create an account or log in to continue.</p>\n\
         <p><a class=\"btn\" href=\"{login}\">Log in</a> <a class=\"btn\" href=\"{signup}\">Sign up</a></p>\n",
        login = paths::LOGIN,
        signup = paths::SIGNUP,
    );
    render(ctx, Area::Public, "Welcome", &body)
}

pub fn home_page(ctx: &PageContext, account: &CurrentAccount) -> Html<String> {
    let body = format!(
        "<p class=\"greeting\">Hello, {}!</p>\n<p>You are logged in.</p>\n",
        escape(account.display_name())
    );
    render(ctx, Area::Public, "Home", &body)
}

pub fn login_page(ctx: &PageContext, form: &LoginForm, errors: &FieldErrors) -> Html<String> {
    let mut body = render_form(ctx, form, errors, FormTheme::Account, paths::LOGIN, "Log in");
    body.push_str(&format!(
        "<p>No account yet? <a href=\"{}\">Sign up</a></p>\n",
        paths::SIGNUP
    ));
    render(ctx, Area::Public, "Log in", &body)
}

pub fn signup_page(ctx: &PageContext, form: &SignupForm, errors: &FieldErrors) -> Html<String> {
    let mut body = render_form(ctx, form, errors, FormTheme::Account, paths::SIGNUP, "Sign up");
    body.push_str(&format!(
        "<p>Already registered? <a href=\"{}\">Log in</a></p>\n",
        paths::LOGIN
    ));
    render(ctx, Area::Public, "Sign up", &body)
}
