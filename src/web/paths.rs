//! Named paths of the routing table.
//!
//! Handlers and templates build URLs from here instead of repeating literals.

pub const WELCOME: &str = "/";
pub const HOME: &str = "/home";
pub const LOGIN: &str = "/accounts/login";
pub const LOGOUT: &str = "/accounts/logout";
pub const SIGNUP: &str = "/accounts/signup";

pub const ADMIN_LOGIN: &str = "/controlpanel/login/";
pub const ADMIN_LOGOUT: &str = "/controlpanel/logout/";
pub const ADMIN_DASHBOARD: &str = "/controlpanel/";
pub const ADMIN_USERS: &str = "/controlpanel/users";
pub const ADMIN_ADD_USER: &str = "/controlpanel/user/add";

pub const HEALTH: &str = "/health";

// Route patterns with an `id` parameter
pub(crate) const PROFILE_ROUTE: &str = "/controlpanel/users/:id/";
pub(crate) const USER_EDIT_ROUTE: &str = "/controlpanel/users/edit/:id/";
pub(crate) const USER_DELETE_ROUTE: &str = "/controlpanel/users/:id/delete/";

pub fn profile(id: i32) -> String {
    format!("/controlpanel/users/{id}/")
}

pub fn user_edit(id: i32) -> String {
    format!("/controlpanel/users/edit/{id}/")
}

pub fn user_delete(id: i32) -> String {
    format!("/controlpanel/users/{id}/delete/")
}

/// Listing URL carrying the search text, sort key and page.
pub fn users_listing(search: Option<&str>, order_by: &str, page: u64) -> String {
    let mut url = format!("{ADMIN_USERS}?");
    if let Some(q) = search {
        url.push_str("q=");
        url.push_str(&urlencoding::encode(q));
        url.push('&');
    }
    url.push_str("order_by=");
    url.push_str(&urlencoding::encode(order_by));
    url.push_str(&format!("&page={page}"));
    url
}
