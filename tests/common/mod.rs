//! Shared integration test harness.
//!
//! Builds the real router on an in-memory SQLite database and the in-memory
//! session store, and drives it like a browser: cookies are kept between
//! requests and CSRF tokens are read from rendered pages.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use sea_orm::ConnectOptions;
use tower::ServiceExt;

use accounts_portal::config::{Config, SessionBackend};
use accounts_portal::domain::{Account, NewAccount, Password, RoleFlags};
use accounts_portal::infra::{AccountRepository, AccountStore, Database, MemorySessionStore};
use accounts_portal::web::paths;
use accounts_portal::{create_router, AppState};

/// Password of every fixture account.
pub const FIXTURE_PASSWORD: &str = "fixture-pass-42";

// One hash shared by all fixtures in a test binary
static FIXTURE_HASH: Lazy<String> = Lazy::new(|| {
    Password::new(FIXTURE_PASSWORD)
        .expect("fixture password is valid")
        .into_string()
});

// =============================================================================
// Application
// =============================================================================

pub struct TestApp {
    pub router: Router,
    pub accounts: Arc<AccountStore>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let database = Arc::new(
            Database::connect_with(options)
                .await
                .expect("in-memory database"),
        );

        let config = Config {
            session_backend: SessionBackend::Memory,
            ..Config::default()
        };
        let sessions = Arc::new(MemorySessionStore::new());
        let accounts = Arc::new(AccountStore::new(database.get_connection()));
        let state = AppState::from_config(database, sessions.clone(), &config);

        Self {
            router: create_router(state),
            accounts,
            sessions,
        }
    }

    pub fn browser(&self) -> Browser {
        Browser {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// Insert an account directly, joined `days_ago` days before now.
    pub async fn insert(&self, username: &str, roles: RoleFlags, days_ago: i64) -> Account {
        self.insert_at(username, roles, Utc::now() - Duration::days(days_ago))
            .await
    }

    pub async fn insert_at(
        &self,
        username: &str,
        roles: RoleFlags,
        date_joined: DateTime<Utc>,
    ) -> Account {
        self.insert_full(username, "Test", roles, date_joined).await
    }

    /// Member with a specific first name.
    pub async fn member_named(&self, username: &str, first_name: &str) -> Account {
        self.insert_full(
            username,
            first_name,
            RoleFlags::member(),
            Utc::now() - Duration::days(1),
        )
        .await
    }

    async fn insert_full(
        &self,
        username: &str,
        first_name: &str,
        roles: RoleFlags,
        date_joined: DateTime<Utc>,
    ) -> Account {
        self.accounts
            .create(NewAccount {
                username: username.to_string(),
                first_name: first_name.to_string(),
                last_name: "User".to_string(),
                email: format!("{username}@example.com"),
                password_hash: FIXTURE_HASH.clone(),
                roles,
                date_joined,
            })
            .await
            .expect("fixture insert")
    }

    pub async fn member(&self, username: &str) -> Account {
        self.insert(username, RoleFlags::member(), 1).await
    }

    pub async fn superuser(&self, username: &str) -> Account {
        self.insert(username, RoleFlags::superuser(), 100).await
    }

    pub async fn find(&self, username: &str) -> Option<Account> {
        self.accounts
            .find_by_username(username)
            .await
            .expect("account lookup")
    }

    pub async fn count(&self) -> u64 {
        self.accounts.count().await.expect("account count")
    }

    /// Browser already logged in through the public login page.
    pub async fn logged_in_member(&self, username: &str) -> (Browser, Account) {
        let account = self.member(username).await;
        let mut browser = self.browser();
        let response = browser.login(username, FIXTURE_PASSWORD).await;
        assert_eq!(response.location(), Some(paths::HOME));
        (browser, account)
    }

    /// Browser already logged in through the control panel login page.
    pub async fn logged_in_admin(&self, username: &str) -> (Browser, Account) {
        let account = self.superuser(username).await;
        let mut browser = self.browser();
        let response = browser.admin_login(username, FIXTURE_PASSWORD).await;
        assert_eq!(response.location(), Some(paths::ADMIN_DASHBOARD));
        (browser, account)
    }
}

// =============================================================================
// Browser
// =============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn assert_redirect(&self, to: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "body: {}", self.body);
        assert_eq!(self.location(), Some(to));
    }

    /// Table rows of the listing page.
    pub fn tbody(&self) -> &str {
        let start = self.body.find("<tbody>").expect("listing table");
        let end = self.body.find("</tbody>").expect("listing table end");
        &self.body[start..end]
    }
}

pub struct Browser {
    router: Router,
    cookie: Option<String>,
}

/// Value of the first `csrf_token` hidden input in a page.
pub fn extract_csrf(html: &str) -> Option<String> {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker)? + marker.len();
    let end = html[start..].find('"')? + start;
    Some(html[start..end].to_string())
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

impl Browser {
    pub fn has_session_cookie(&self) -> bool {
        self.cookie.is_some()
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("cookie header value"),
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().expect("ascii cookie");
            if !value.starts_with("sessionid=") {
                continue;
            }
            if value.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                let pair = value.split(';').next().unwrap_or_default();
                self.cookie = Some(pair.to_string());
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    /// POST an urlencoded body exactly as given.
    pub async fn post(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(encode_form(fields)))
            .expect("request");
        self.send(request).await
    }

    /// CSRF token rendered on `page`.
    pub async fn csrf_from(&mut self, page: &str) -> String {
        let response = self.get(page).await;
        extract_csrf(&response.body)
            .unwrap_or_else(|| panic!("no CSRF token on {page}: {}", response.status))
    }

    /// Load `page` for its CSRF token, then POST `fields` to `action`.
    pub async fn submit(
        &mut self,
        page: &str,
        action: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
        let token = self.csrf_from(page).await;
        let mut with_token = vec![("csrf_token", token.as_str())];
        with_token.extend_from_slice(fields);
        self.post(action, &with_token).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> TestResponse {
        self.submit(
            paths::LOGIN,
            paths::LOGIN,
            &[("username", username), ("password", password)],
        )
        .await
    }

    pub async fn admin_login(&mut self, username: &str, password: &str) -> TestResponse {
        self.submit(
            paths::ADMIN_LOGIN,
            paths::ADMIN_LOGIN,
            &[("username", username), ("password", password)],
        )
        .await
    }
}
