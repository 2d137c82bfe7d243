//! Caller identity for the HTTP boundary.
//!
//! Authentication itself happens upstream; a trusted gateway injects the
//! caller's user reference and role as headers. Absent or malformed headers
//! resolve to an anonymous, unprivileged identity rather than an error.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// Header carrying the authenticated user reference
pub const USER_HEADER: &str = "x-user";
/// Header carrying the authenticated user's role
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    Staff,
    #[default]
    Member,
}

impl Role {
    /// Parse a role header value; unknown values degrade to `Member`.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            "member" => Role::Member,
            other => {
                tracing::debug!(role = other, "unknown role header value, treating as member");
                Role::Member
            }
        }
    }

    /// Destructive operations require admin or staff.
    pub const fn is_privileged(self) -> bool {
        matches!(self, Role::Admin | Role::Staff)
    }
}

/// Identity of the caller for the current request
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(Role::parse)
            .unwrap_or_default();

        Ok(Identity { user, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_for(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn admin_and_staff_are_privileged() {
        assert!(Role::parse("admin").is_privileged());
        assert!(Role::parse("Staff").is_privileged());
        assert!(!Role::parse("member").is_privileged());
        assert!(!Role::parse("superuser").is_privileged());
    }

    #[tokio::test]
    async fn extractor_reads_gateway_headers() {
        let mut parts = parts_for(&[(USER_HEADER, "u-42"), (ROLE_HEADER, "staff")]);
        let identity = Identity::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(identity.user.as_deref(), Some("u-42"));
        assert_eq!(identity.role, Role::Staff);
        assert!(identity.is_privileged());
    }

    #[tokio::test]
    async fn missing_headers_yield_anonymous_member() {
        let mut parts = parts_for(&[]);
        let identity = Identity::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert!(identity.user.is_none());
        assert_eq!(identity.role, Role::Member);
        assert!(!identity.is_privileged());
    }
}
