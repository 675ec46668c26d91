//! Listing query types for the admin user directory.

use super::PageRequest;

/// Allowed listing orders. Each variant sorts on one column; ties are broken
/// by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    UsernameAsc,
    UsernameDesc,
    DateJoinedAsc,
    #[default]
    DateJoinedDesc,
    EmailAsc,
    EmailDesc,
    LastLoginAsc,
    LastLoginDesc,
}

/// Column a [`SortKey`] orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Username,
    DateJoined,
    Email,
    LastLogin,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::UsernameAsc,
        SortKey::UsernameDesc,
        SortKey::DateJoinedAsc,
        SortKey::DateJoinedDesc,
        SortKey::EmailAsc,
        SortKey::EmailDesc,
        SortKey::LastLoginAsc,
        SortKey::LastLoginDesc,
    ];

    /// Parse an `order_by` value; unknown or absent values use the default.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|value| {
            Self::ALL
                .into_iter()
                .find(|key| key.as_param() == value.trim())
        })
        .unwrap_or_default()
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::UsernameAsc => "username",
            SortKey::UsernameDesc => "-username",
            SortKey::DateJoinedAsc => "date_joined",
            SortKey::DateJoinedDesc => "-date_joined",
            SortKey::EmailAsc => "email",
            SortKey::EmailDesc => "-email",
            SortKey::LastLoginAsc => "last_login",
            SortKey::LastLoginDesc => "-last_login",
        }
    }

    pub fn column(&self) -> SortColumn {
        match self {
            SortKey::UsernameAsc | SortKey::UsernameDesc => SortColumn::Username,
            SortKey::DateJoinedAsc | SortKey::DateJoinedDesc => SortColumn::DateJoined,
            SortKey::EmailAsc | SortKey::EmailDesc => SortColumn::Email,
            SortKey::LastLoginAsc | SortKey::LastLoginDesc => SortColumn::LastLogin,
        }
    }

    pub fn is_descending(&self) -> bool {
        self.as_param().starts_with('-')
    }
}

/// Normalized listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryQuery {
    /// Trimmed search text; `None` when blank
    pub search: Option<String>,
    pub sort: SortKey,
    pub page: PageRequest,
}

impl DirectoryQuery {
    pub fn new(search: Option<&str>, order_by: Option<&str>, page: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            search,
            sort: SortKey::parse(order_by),
            page: PageRequest::parse(page),
        }
    }

    /// `LIKE` pattern matching the search text literally as a substring,
    /// lowercased, with `\` as the escape character.
    pub fn like_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|term| escape_like(&term.to_lowercase()))
    }

    /// Same as [`like_pattern`](Self::like_pattern) but keeping the search
    /// text's own case.
    pub fn exact_like_pattern(&self) -> Option<String> {
        self.search.as_deref().map(escape_like)
    }
}

fn escape_like(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_round_trips_allow_list() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(Some(key.as_param())), key);
        }
    }

    #[test]
    fn test_unknown_sort_falls_back() {
        assert_eq!(SortKey::parse(None), SortKey::DateJoinedDesc);
        assert_eq!(SortKey::parse(Some("password")), SortKey::DateJoinedDesc);
        assert_eq!(SortKey::parse(Some("-id")), SortKey::DateJoinedDesc);
    }

    #[test]
    fn test_direction_and_column() {
        assert!(SortKey::LastLoginDesc.is_descending());
        assert!(!SortKey::EmailAsc.is_descending());
        assert_eq!(SortKey::UsernameDesc.column(), SortColumn::Username);
    }

    #[test]
    fn test_blank_search_is_none() {
        let query = DirectoryQuery::new(Some("   "), None, None);
        assert_eq!(query.search, None);
        assert_eq!(query.like_pattern(), None);
        assert_eq!(query.exact_like_pattern(), None);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let query = DirectoryQuery::new(Some("Al%_\\x"), None, None);
        assert_eq!(query.like_pattern().as_deref(), Some("%al\\%\\_\\\\x%"));
        assert_eq!(
            query.exact_like_pattern().as_deref(),
            Some("%Al\\%\\_\\\\x%")
        );
    }

    #[test]
    fn test_like_pattern_lowercases_unicode() {
        let query = DirectoryQuery::new(Some("ÉMILE"), None, None);
        assert_eq!(query.like_pattern().as_deref(), Some("%émile%"));
        assert_eq!(query.exact_like_pattern().as_deref(), Some("%ÉMILE%"));
    }
}
