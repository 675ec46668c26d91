//! Server-rendered HTML views.
//!
//! Pages are plain `String` builders; every interpolated value goes through
//! [`escape`].

mod admin;
mod forms;
mod layout;
mod pages;

use axum::{http::StatusCode, response::Html};

pub use admin::{
    add_user_page, admin_login_page, dashboard_page, delete_confirm_page, edit_user_page,
    profile_page, users_page,
};
pub use layout::PageContext;
pub use pages::{home_page, login_page, signup_page, welcome_page};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Minimal standalone error page; it needs no session.
pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n<main class=\"error\">\n<h1>{title}</h1>\n<p>{message}</p>\n\
         <p><a href=\"/\">Back to start</a></p>\n</main>\n</body>\n</html>\n",
        title = escape(&title),
        message = escape(message),
    ))
}
