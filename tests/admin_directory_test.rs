//! Control panel driven through the real router.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use accounts_portal::domain::RoleFlags;
use accounts_portal::web::paths;

use common::{TestApp, FIXTURE_PASSWORD};

fn row_for(username: &str) -> String {
    format!("\">{username}</a></td>")
}

// =============================================================================
// Gate and login
// =============================================================================

#[tokio::test]
async fn test_control_panel_redirects_anonymous_visitors() {
    let app = TestApp::spawn().await;
    let mut browser = app.browser();

    for path in [
        paths::ADMIN_DASHBOARD,
        paths::ADMIN_USERS,
        paths::ADMIN_ADD_USER,
        "/controlpanel/users/1/",
        paths::ADMIN_LOGOUT,
    ] {
        browser.get(path).await.assert_redirect(paths::ADMIN_LOGIN);
    }
}

#[tokio::test]
async fn test_control_panel_redirects_members() {
    let app = TestApp::spawn().await;
    let (mut browser, member) = app.logged_in_member("alice").await;
    let target = app.member("bob").await;

    browser
        .get(paths::ADMIN_USERS)
        .await
        .assert_redirect(paths::ADMIN_LOGIN);
    let token = browser.csrf_from(paths::HOME).await;
    browser
        .post(
            &paths::user_delete(target.id),
            &[("csrf_token", token.as_str())],
        )
        .await
        .assert_redirect(paths::ADMIN_LOGIN);

    assert!(app.find("bob").await.is_some());
    assert_eq!(app.find("alice").await.unwrap().is_superuser, member.is_superuser);
    assert_eq!(app.count().await, 2);
}

#[tokio::test]
async fn test_admin_login_refuses_non_superuser() {
    let app = TestApp::spawn().await;
    app.member("alice").await;
    let mut browser = app.browser();

    let response = browser.admin_login("alice", FIXTURE_PASSWORD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("You are not authorized to access the admin dashboard."));
    browser
        .get(paths::ADMIN_DASHBOARD)
        .await
        .assert_redirect(paths::ADMIN_LOGIN);
}

#[tokio::test]
async fn test_admin_login_invalid_credentials() {
    let app = TestApp::spawn().await;
    app.superuser("root").await;
    let mut browser = app.browser();

    let response = browser.admin_login("root", "wrong-password").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid username or password"));
    assert!(response.body.contains("placeholder=\"Admin Username\""));
}

#[tokio::test]
async fn test_admin_login_page_redirects_superuser_session() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    browser
        .get(paths::ADMIN_LOGIN)
        .await
        .assert_redirect(paths::ADMIN_DASHBOARD);
}

#[tokio::test]
async fn test_admin_logout() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    browser
        .submit(paths::ADMIN_DASHBOARD, paths::ADMIN_LOGOUT, &[])
        .await
        .assert_redirect(paths::ADMIN_LOGIN);
    browser
        .get(paths::ADMIN_DASHBOARD)
        .await
        .assert_redirect(paths::ADMIN_LOGIN);
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.insert("old", RoleFlags::member(), 45).await;
    app.insert("fresh", RoleFlags::member(), 2).await;

    let response = browser.get(paths::ADMIN_DASHBOARD).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<strong id=\"user-count\">3</strong>"));
    assert!(response.body.contains("<strong id=\"new-signups\">1</strong>"));
    let fresh = response.body.find(">fresh</a>").expect("fresh listed");
    let old = response.body.find(">old</a>").expect("old listed");
    assert!(fresh < old, "newest first");
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_search_is_case_insensitive_across_fields() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.member("alice").await;
    app.member("ALICE_B").await;
    app.member("bob").await;
    app.member("carol").await;

    let response = browser.get("/controlpanel/users?q=Alice").await;

    assert_eq!(response.status, StatusCode::OK);
    let rows = response.tbody();
    assert!(rows.contains(&row_for("alice")));
    assert!(rows.contains(&row_for("ALICE_B")));
    assert!(!rows.contains(&row_for("bob")));
    assert!(!rows.contains(&row_for("carol")));
    assert!(response.body.contains("<strong id=\"total-users\">2</strong>"));
}

#[tokio::test]
async fn test_listing_search_matches_wildcards_literally() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.member("a_b").await;
    app.member("axb").await;

    let response = browser.get("/controlpanel/users?q=a_b").await;

    let rows = response.tbody();
    assert!(rows.contains(&row_for("a_b")));
    assert!(!rows.contains(&row_for("axb")));
}

#[tokio::test]
async fn test_listing_search_matches_accented_names() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.member_named("emile", "Émile").await;
    app.member_named("zoe", "Zoë").await;

    for term in ["Émile", "ÉMILE", "Émi"] {
        let url = format!("/controlpanel/users?q={}", urlencoding::encode(term));
        let response = browser.get(&url).await;
        let rows = response.tbody();
        assert!(rows.contains(&row_for("emile")), "q={term}");
        assert!(!rows.contains(&row_for("zoe")), "q={term}");
    }
}

#[tokio::test]
async fn test_listing_unknown_order_falls_back_to_newest_first() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let now = Utc::now();
    for (i, name) in ["delta", "alpha", "charlie", "bravo"].iter().enumerate() {
        app.insert_at(name, RoleFlags::member(), now - Duration::hours(i as i64 + 1))
            .await;
    }

    let fallback = browser.get("/controlpanel/users?order_by=password").await;
    let default = browser.get("/controlpanel/users?order_by=-date_joined").await;

    assert_eq!(fallback.tbody(), default.tbody());
    assert!(fallback
        .body
        .contains("<code id=\"current-order\">-date_joined</code>"));
    let delta = fallback.body.find(&row_for("delta")).unwrap();
    let bravo = fallback.body.find(&row_for("bravo")).unwrap();
    assert!(delta < bravo);
}

#[tokio::test]
async fn test_listing_sorts_by_username() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.member("zed").await;
    app.member("amy").await;

    let response = browser.get("/controlpanel/users?order_by=username").await;

    let amy = response.body.find(&row_for("amy")).unwrap();
    let root = response.body.find(&row_for("root")).unwrap();
    let zed = response.body.find(&row_for("zed")).unwrap();
    assert!(amy < root && root < zed);
}

#[tokio::test]
async fn test_listing_pagination_clamps() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    for i in 0..64 {
        app.insert(&format!("user{i:02}"), RoleFlags::member(), 1).await;
    }

    let first = browser.get("/controlpanel/users").await;
    assert!(first.body.contains("Page 1 of 3"));
    assert_eq!(first.tbody().matches("<tr>").count(), 30);
    assert!(first
        .body
        .contains("/controlpanel/users?order_by=-date_joined&amp;page=2"));

    let beyond = browser.get("/controlpanel/users?page=99").await;
    assert!(beyond.body.contains("Page 3 of 3"));
    assert_eq!(beyond.tbody().matches("<tr>").count(), 5);

    let overflow = browser
        .get("/controlpanel/users?page=99999999999999999999")
        .await;
    assert!(overflow.body.contains("Page 3 of 3"));

    for page in ["0", "-4", "abc"] {
        let response = browser.get(&format!("/controlpanel/users?page={page}")).await;
        assert!(response.body.contains("Page 1 of 3"), "page={page}");
    }
}

#[tokio::test]
async fn test_listing_empty_result_has_one_page() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    let response = browser.get("/controlpanel/users?q=nobody&page=4").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Page 1 of 1"));
    assert!(response.body.contains("No users found."));
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_shows_role() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let staff = app
        .insert(
            "staffer",
            RoleFlags {
                is_staff: true,
                ..RoleFlags::member()
            },
            5,
        )
        .await;

    let response = browser.get(&paths::profile(staff.id)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<dd id=\"user-role\">Staff</dd>"));
}

#[tokio::test]
async fn test_profile_unknown_or_malformed_id_is_404() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    for path in [
        "/controlpanel/users/9999/",
        "/controlpanel/users/abc/",
        "/controlpanel/users/edit/abc/",
        "/controlpanel/users/-1/delete/",
    ] {
        let response = browser.get(path).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{path}");
    }
}

// =============================================================================
// Create
// =============================================================================

fn create_fields<'a>(username: &'a str, first_name: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("username", username),
        ("first_name", first_name),
        ("last_name", "O'Brien"),
        ("email", "hire@example.com"),
        ("is_active", "on"),
        ("is_staff", "on"),
        ("password1", "onboarding-2024"),
        ("password2", "onboarding-2024"),
    ]
}

#[tokio::test]
async fn test_admin_create_returns_to_add_page() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    let response = browser
        .submit(
            paths::ADMIN_ADD_USER,
            paths::ADMIN_ADD_USER,
            &create_fields("newhire", "Mary-Jane"),
        )
        .await;

    response.assert_redirect(paths::ADMIN_ADD_USER);
    let created = app.find("newhire").await.expect("account created");
    assert!(created.is_active);
    assert!(created.is_staff);
    assert!(!created.is_superuser);

    let page = browser.get(paths::ADMIN_ADD_USER).await;
    assert!(page
        .body
        .contains("New user &quot;newhire&quot; created successfully!"));
    assert!(!page.body.contains("value=\"newhire\""));
}

#[tokio::test]
async fn test_admin_create_rejects_digit_in_first_name() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;

    let response = browser
        .submit(
            paths::ADMIN_ADD_USER,
            paths::ADMIN_ADD_USER,
            &create_fields("newhire", "John2"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(
        "There was an error creating the user. Please correct the fields below."
    ));
    assert!(response
        .body
        .contains("First name should contain only letters, spaces, hyphens, or apostrophes."));
    assert!(response.body.contains("value=\"newhire\""));
    assert!(app.find("newhire").await.is_none());
}

#[tokio::test]
async fn test_admin_create_duplicate_username() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    app.member("taken").await;

    let response = browser
        .submit(
            paths::ADMIN_ADD_USER,
            paths::ADMIN_ADD_USER,
            &create_fields("Taken", "Ann"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("A user with that username already exists."));
    assert_eq!(app.count().await, 2);
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_admin_edit_redirects_to_profile() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let target = app.member("bob").await;
    let edit = paths::user_edit(target.id);

    let response = browser
        .submit(
            &edit,
            &edit,
            &[
                ("username", "bob"),
                ("first_name", "Bob"),
                ("last_name", "Stone"),
                ("email", "new@x.com"),
                ("is_active", "on"),
            ],
        )
        .await;

    response.assert_redirect(&paths::profile(target.id));
    let updated = app.find("bob").await.unwrap();
    assert_eq!(updated.email, "new@x.com");
    assert!(!updated.is_staff);

    let profile = browser.get(&paths::profile(target.id)).await;
    assert!(profile.body.contains("new@x.com"));
    assert!(profile
        .body
        .contains("User &quot;bob&quot; credentials updated successfully! Changes applied."));
}

#[tokio::test]
async fn test_admin_edit_invalid_rerenders() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let target = app.member("bob").await;
    let edit = paths::user_edit(target.id);

    let response = browser
        .submit(
            &edit,
            &edit,
            &[
                ("username", "bob"),
                ("first_name", "Bob"),
                ("last_name", "Stone3"),
                ("email", "bob@example.com"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(
        "There was an error updating the user. Please correct the fields below."
    ));
    assert!(response
        .body
        .contains("Last name should contain only letters, spaces, hyphens, or apostrophes."));
    assert_eq!(app.find("bob").await.unwrap().last_name, "User");
}

#[tokio::test]
async fn test_admin_edit_unknown_id_is_404() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let token = browser.csrf_from(paths::ADMIN_DASHBOARD).await;

    let response = browser
        .post(
            &paths::user_edit(4242),
            &[
                ("csrf_token", token.as_str()),
                ("username", "ghost"),
                ("first_name", "Ghost"),
                ("last_name", "Writer"),
                ("email", "ghost@example.com"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_own_account_is_refused() {
    let app = TestApp::spawn().await;
    let (mut browser, root) = app.logged_in_admin("root").await;
    let delete = paths::user_delete(root.id);

    browser.get(&delete).await.assert_redirect(paths::ADMIN_USERS);
    let listing = browser.get(paths::ADMIN_USERS).await;
    assert!(listing
        .body
        .contains("You cannot delete your own active admin account."));

    browser
        .submit(paths::ADMIN_USERS, &delete, &[])
        .await
        .assert_redirect(paths::ADMIN_USERS);
    assert!(app.find("root").await.is_some());
}

#[tokio::test]
async fn test_delete_superuser_is_refused() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let other = app.superuser("boss2").await;
    let delete = paths::user_delete(other.id);

    browser
        .submit(paths::ADMIN_USERS, &delete, &[])
        .await
        .assert_redirect(paths::ADMIN_USERS);

    let listing = browser.get(paths::ADMIN_USERS).await;
    assert!(listing
        .body
        .contains("Cannot delete the primary Superuser: boss2."));
    assert!(app.find("boss2").await.is_some());
}

#[tokio::test]
async fn test_delete_confirms_then_removes() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let target = app.member("bob").await;
    let delete = paths::user_delete(target.id);

    let confirm = browser.get(&delete).await;
    assert_eq!(confirm.status, StatusCode::OK);
    assert!(confirm.body.contains("Confirm Delete: bob"));
    assert!(app.find("bob").await.is_some());

    browser
        .submit(&delete, &delete, &[])
        .await
        .assert_redirect(paths::ADMIN_USERS);
    assert!(app.find("bob").await.is_none());

    let listing = browser.get(paths::ADMIN_USERS).await;
    assert!(listing
        .body
        .contains("User &quot;bob&quot; was deleted successfully."));
}

#[tokio::test]
async fn test_delete_without_csrf_is_forbidden() {
    let app = TestApp::spawn().await;
    let (mut browser, _) = app.logged_in_admin("root").await;
    let target = app.member("bob").await;

    let response = browser
        .post(&paths::user_delete(target.id), &[("csrf_token", "forged")])
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.find("bob").await.is_some());
}
