//! Control panel pages.

use axum::response::Html;
use chrono::{DateTime, Utc};

use super::escape;
use super::forms::render_form;
use super::layout::{render, Area, PageContext};
use crate::domain::{Account, DashboardStats};
use crate::types::{FieldErrors, Page, SortColumn, SortKey};
use crate::web::forms::{AdminCreateForm, AdminEditForm, FormTheme, LoginForm};
use crate::web::paths;

fn timestamp(value: &DateTime<Utc>) -> String {
    value.format("%b %d, %Y %H:%M").to_string()
}

fn last_login(account: &Account) -> String {
    account
        .last_login
        .as_ref()
        .map(timestamp)
        .unwrap_or_else(|| "Never".to_string())
}

pub fn admin_login_page(ctx: &PageContext, form: &LoginForm, errors: &FieldErrors) -> Html<String> {
    let body = render_form(
        ctx,
        form,
        errors,
        FormTheme::AdminLogin,
        paths::ADMIN_LOGIN,
        "Log in",
    );
    render(ctx, Area::ControlPanel, "Control Panel Login", &body)
}

pub fn dashboard_page(ctx: &PageContext, stats: &DashboardStats) -> Html<String> {
    let recent: String = stats
        .recent
        .iter()
        .map(|account| {
            format!(
                "<li><a href=\"{href}\">{username}</a> <span class=\"muted\">joined {joined}</span></li>\n",
                href = paths::profile(account.id),
                username = escape(&account.username),
                joined = timestamp(&account.date_joined),
            )
        })
        .collect();

    let body = format!(
        "<section class=\"stats\">\n\
         <div class=\"stat\"><span class=\"label\">Total users</span> <strong id=\"user-count\">{total}</strong></div>\n\
         <div class=\"stat\"><span class=\"label\">New signups (30 days)</span> <strong id=\"new-signups\">{recent_count}</strong></div>\n\
         </section>\n<h2>Recently joined</h2>\n<ul class=\"recent-users\">\n{recent}</ul>\n",
        total = stats.total_accounts,
        recent_count = stats.joined_last_30_days,
    );
    render(ctx, Area::ControlPanel, "Dashboard Overview", &body)
}

/// Header link toggling between ascending and descending on `column`.
fn sort_header(label: &str, column: SortColumn, search: Option<&str>, current: SortKey) -> String {
    let ascending = SortKey::ALL
        .into_iter()
        .find(|key| key.column() == column && !key.is_descending())
        .unwrap_or_default();
    let descending = SortKey::ALL
        .into_iter()
        .find(|key| key.column() == column && key.is_descending())
        .unwrap_or_default();

    let (target, marker) = if current == ascending {
        (descending, " &#9650;")
    } else if current == descending {
        (ascending, " &#9660;")
    } else {
        (ascending, "")
    };

    format!(
        "<a href=\"{}\">{}</a>{marker}",
        escape(&paths::users_listing(search, target.as_param(), 1)),
        escape(label)
    )
}

pub fn users_page(
    ctx: &PageContext,
    page: &Page<Account>,
    search: Option<&str>,
    sort: SortKey,
) -> Html<String> {
    let rows: String = page
        .items
        .iter()
        .map(|account| {
            format!(
                "<tr>\n<td><a href=\"{profile}\">{username}</a></td>\n<td>{name}</td>\n<td>{email}</td>\n\
                 <td>{role}</td>\n<td>{joined}</td>\n<td>{login}</td>\n\
                 <td><a href=\"{edit}\">Edit</a> <a href=\"{delete}\">Delete</a></td>\n</tr>\n",
                profile = paths::profile(account.id),
                username = escape(&account.username),
                name = escape(&account.full_name()),
                email = escape(&account.email),
                role = account.role().label(),
                joined = timestamp(&account.date_joined),
                login = last_login(account),
                edit = paths::user_edit(account.id),
                delete = paths::user_delete(account.id),
            )
        })
        .collect();

    let rows = if rows.is_empty() {
        "<tr><td colspan=\"7\">No users found.</td></tr>\n".to_string()
    } else {
        rows
    };

    let order = sort.as_param();
    let previous = page
        .previous_page_number()
        .map(|n| {
            format!(
                "<a rel=\"prev\" href=\"{}\">Previous</a>",
                escape(&paths::users_listing(search, order, n))
            )
        })
        .unwrap_or_default();
    let next = page
        .next_page_number()
        .map(|n| {
            format!(
                "<a rel=\"next\" href=\"{}\">Next</a>",
                escape(&paths::users_listing(search, order, n))
            )
        })
        .unwrap_or_default();

    let body = format!(
        "<form method=\"get\" action=\"{action}\" class=\"search\">\n\
         <input type=\"search\" name=\"q\" value=\"{q}\" class=\"form-control\" placeholder=\"Search users\">\n\
         <input type=\"hidden\" name=\"order_by\" value=\"{order}\">\n\
         <button type=\"submit\">Search</button>\n</form>\n\
         <p class=\"summary\">Total users: <strong id=\"total-users\">{total}</strong> \
         &middot; Sorted by <code id=\"current-order\">{order}</code></p>\n\
         <table class=\"users\">\n<thead><tr>\n<th>{h_username}</th>\n<th>Name</th>\n<th>{h_email}</th>\n\
         <th>Role</th>\n<th>{h_joined}</th>\n<th>{h_login}</th>\n<th></th>\n</tr></thead>\n\
         <tbody>\n{rows}</tbody>\n</table>\n\
         <nav class=\"pagination\">{previous} <span class=\"current\">Page {number} of {num_pages}</span> {next}</nav>\n",
        action = paths::ADMIN_USERS,
        q = escape(search.unwrap_or_default()),
        total = page.total,
        h_username = sort_header("Username", SortColumn::Username, search, sort),
        h_email = sort_header("Email", SortColumn::Email, search, sort),
        h_joined = sort_header("Date joined", SortColumn::DateJoined, search, sort),
        h_login = sort_header("Last login", SortColumn::LastLogin, search, sort),
        number = page.number,
        num_pages = page.num_pages,
    );
    render(ctx, Area::ControlPanel, "Manage Users", &body)
}

pub fn profile_page(ctx: &PageContext, account: &Account) -> Html<String> {
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let body = format!(
        "<dl class=\"profile\">\n\
         <dt>Username</dt><dd>{username}</dd>\n\
         <dt>Name</dt><dd>{name}</dd>\n\
         <dt>Email</dt><dd>{email}</dd>\n\
         <dt>Role</dt><dd id=\"user-role\">{role}</dd>\n\
         <dt>Active</dt><dd>{active}</dd>\n\
         <dt>Date joined</dt><dd>{joined}</dd>\n\
         <dt>Last login</dt><dd>{login}</dd>\n\
         </dl>\n<p><a href=\"{edit}\">Edit</a> <a href=\"{delete}\">Delete</a> <a href=\"{users}\">Back to users</a></p>\n",
        username = escape(&account.username),
        name = escape(&account.full_name()),
        email = escape(&account.email),
        role = account.role().label(),
        active = yes_no(account.is_active),
        joined = timestamp(&account.date_joined),
        login = last_login(account),
        edit = paths::user_edit(account.id),
        delete = paths::user_delete(account.id),
        users = paths::ADMIN_USERS,
    );
    render(
        ctx,
        Area::ControlPanel,
        &format!("User Profile: {}", account.username),
        &body,
    )
}

pub fn add_user_page(
    ctx: &PageContext,
    form: &AdminCreateForm,
    errors: &FieldErrors,
) -> Html<String> {
    let body = render_form(
        ctx,
        form,
        errors,
        FormTheme::Admin,
        paths::ADMIN_ADD_USER,
        "Create User",
    );
    render(ctx, Area::ControlPanel, "Add New User", &body)
}

pub fn edit_user_page(
    ctx: &PageContext,
    account: &Account,
    form: &AdminEditForm,
    errors: &FieldErrors,
) -> Html<String> {
    let mut body = render_form(
        ctx,
        form,
        errors,
        FormTheme::Admin,
        &paths::user_edit(account.id),
        "Save Changes",
    );
    body.push_str(&format!(
        "<p><a href=\"{}\">Cancel</a></p>\n",
        paths::profile(account.id)
    ));
    render(
        ctx,
        Area::ControlPanel,
        &format!("Edit User: {}", account.username),
        &body,
    )
}

pub fn delete_confirm_page(ctx: &PageContext, account: &Account) -> Html<String> {
    let body = format!(
        "<p>Are you sure you want to delete the user <strong>{username}</strong> ({email})? \
         This cannot be undone.</p>\n\
         <form method=\"post\" action=\"{action}\">\n{csrf}\n\
         <button type=\"submit\" class=\"btn btn-danger\">Yes, delete</button>\n\
         <a href=\"{cancel}\">Cancel</a>\n</form>\n",
        username = escape(&account.username),
        email = escape(&account.email),
        action = paths::user_delete(account.id),
        csrf = ctx.csrf_input(),
        cancel = paths::profile(account.id),
    );
    render(
        ctx,
        Area::ControlPanel,
        &format!("Confirm Delete: {}", account.username),
        &body,
    )
}
