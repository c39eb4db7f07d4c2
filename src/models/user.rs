//! Defines the `User` record and the types built around it.
//!
//! Includes:
//! - `User`: a row of the `users` table (derives `sqlx::FromRow`).
//! - `NewUser`: the payload for an insert, before the store assigns an id.
//! - `SearchField`: which column a search query is matched against.

use serde::Serialize;
use std::fmt;

/// Represents a single row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Surrogate key assigned by the store on insert.
    pub id: i64,
    /// Unique login name. Never changed after creation.
    pub username: String,
    pub email: String,
    /// Stored verbatim, no hashing.
    pub password: String,
}

impl User {
    /// Returns the value of the column selected by `field`.
    pub fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Email => &self.email,
            SearchField::Username => &self.username,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} username='{}' email='{}' password='{}'",
            self.id, self.username, self.email, self.password
        )
    }
}

/// A user that has not been inserted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// The default user created by `initialize`.
    pub fn seed() -> Self {
        Self::new("bob", "bob@mail.com", "bobpass")
    }
}

/// The column a `search-user` query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Email,
    Username,
}

impl SearchField {
    /// Queries containing `@` search emails; everything else searches usernames.
    pub fn for_query(query: &str) -> Self {
        if query.contains('@') {
            SearchField::Email
        } else {
            SearchField::Username
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Email => "email",
            SearchField::Username => "username",
        }
    }
}

/// Finds the first user (in slice order) whose `field` contains `query`.
///
/// Matching is a case-sensitive substring test. Scanning stops at the first hit.
pub fn first_match<'a>(users: &'a [User], field: SearchField, query: &str) -> Option<&'a User> {
    users.iter().find(|user| user.field(field).contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user(id: i64, username: &str, email: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            password: "pw".to_string(),
        }
    }

    #[test]
    fn test_display_shows_all_fields() {
        let bob = user(1, "bob", "bob@mail.com");
        assert_eq!(
            bob.to_string(),
            "id=1 username='bob' email='bob@mail.com' password='pw'"
        );
    }

    #[test]
    fn test_seed_user_values() {
        let seed = NewUser::seed();
        assert_eq!(seed.username, "bob");
        assert_eq!(seed.email, "bob@mail.com");
        assert_eq!(seed.password, "bobpass");
    }

    #[rstest]
    #[case("bob@mail.com", SearchField::Email)]
    #[case("@", SearchField::Email)]
    #[case("mail.com", SearchField::Username)]
    #[case("bob", SearchField::Username)]
    #[case("", SearchField::Username)]
    fn test_search_field_for_query(#[case] query: &str, #[case] expected: SearchField) {
        assert_eq!(SearchField::for_query(query), expected);
    }

    #[test]
    fn test_first_match_stops_at_first_hit() {
        let users = vec![
            user(1, "alice", "alice@x.com"),
            user(2, "alicia", "alicia@x.com"),
            user(3, "bob", "bob@y.com"),
        ];

        let hit = first_match(&users, SearchField::Username, "ali").unwrap();
        assert_eq!(hit.id, 1, "First user in order should win");

        let hit = first_match(&users, SearchField::Email, "@y.").unwrap();
        assert_eq!(hit.username, "bob");
    }

    #[test]
    fn test_first_match_is_case_sensitive() {
        let users = vec![user(1, "Alice", "alice@x.com")];
        assert!(first_match(&users, SearchField::Username, "alice").is_none());
        assert!(first_match(&users, SearchField::Username, "Ali").is_some());
    }

    #[test]
    fn test_first_match_on_empty_slice() {
        assert!(first_match(&[], SearchField::Email, "@").is_none());
    }
}
