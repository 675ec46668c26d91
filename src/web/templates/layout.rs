//! Page shell shared by every view.

use axum::response::Html;

use super::escape;
use crate::infra::Flash;
use crate::web::middleware::CurrentAccount;
use crate::web::paths;
use crate::web::Session;

/// Per-request data every page needs.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub account: Option<CurrentAccount>,
    pub flashes: Vec<Flash>,
    pub csrf_token: String,
}

impl PageContext {
    /// Drains the session's flash queue.
    pub async fn load(session: &Session, account: Option<CurrentAccount>) -> Self {
        Self {
            account,
            flashes: session.take_flashes().await,
            csrf_token: session.csrf_token().await,
        }
    }

    /// Hidden CSRF input for POST forms.
    pub fn csrf_input(&self) -> String {
        format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            crate::config::CSRF_FIELD_NAME,
            escape(&self.csrf_token)
        )
    }
}

/// Which navigation bar a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Area {
    Public,
    ControlPanel,
}

fn public_nav(ctx: &PageContext) -> String {
    match &ctx.account {
        Some(account) => format!(
            "<a href=\"{home}\">Home</a>\n\
             <span class=\"user\">{name}</span>\n\
             <form method=\"post\" action=\"{logout}\" class=\"inline\">{csrf}\
             <button type=\"submit\">Log out</button></form>",
            home = paths::HOME,
            name = escape(account.display_name()),
            logout = paths::LOGOUT,
            csrf = ctx.csrf_input(),
        ),
        None => format!(
            "<a href=\"{login}\">Log in</a>\n<a href=\"{signup}\">Sign up</a>",
            login = paths::LOGIN,
            signup = paths::SIGNUP,
        ),
    }
}

fn control_panel_nav(ctx: &PageContext) -> String {
    match &ctx.account {
        Some(account) if account.is_superuser => format!(
            "<a href=\"{dashboard}\">Dashboard</a>\n\
             <a href=\"{users}\">Users</a>\n\
             <a href=\"{add}\">Add User</a>\n\
             <span class=\"user\">{name}</span>\n\
             <form method=\"post\" action=\"{logout}\" class=\"inline\">{csrf}\
             <button type=\"submit\">Log out</button></form>",
            dashboard = paths::ADMIN_DASHBOARD,
            users = paths::ADMIN_USERS,
            add = paths::ADMIN_ADD_USER,
            name = escape(&account.username),
            logout = paths::ADMIN_LOGOUT,
            csrf = ctx.csrf_input(),
        ),
        _ => String::new(),
    }
}

fn flash_list(ctx: &PageContext) -> String {
    if ctx.flashes.is_empty() {
        return String::new();
    }
    let items: String = ctx
        .flashes
        .iter()
        .map(|flash| {
            format!(
                "<li class=\"alert alert-{}\">{}</li>\n",
                flash.level.as_str(),
                escape(&flash.message)
            )
        })
        .collect();
    format!("<ul class=\"messages\">\n{items}</ul>\n")
}

/// Wrap `body` in the document shell.
pub(crate) fn render(ctx: &PageContext, area: Area, title: &str, body: &str) -> Html<String> {
    let nav = match area {
        Area::Public => public_nav(ctx),
        Area::ControlPanel => control_panel_nav(ctx),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n</head>\n<body>\n<nav>\n{nav}\n</nav>\n{flashes}\
         <main>\n<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
        flashes = flash_list(ctx),
    ))
}
