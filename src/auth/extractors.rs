use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{claims::Claims, jwt::AuthError, jwt::JwtKeys};
use crate::error::AppError;

/// Verified identity bound to a request once its token checks out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(c: Claims) -> Self {
        Self {
            id: c.sub,
            email: c.email,
            username: c.username,
        }
    }
}

/// Extracts and validates the bearer token, yielding the caller's identity.
///
/// Put it before any other extractor that might touch the store: a request
/// without a valid token is rejected here and the handler never runs.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::Missing)?;

        let token = bearer_token(header).ok_or(AuthError::Missing)?;
        let claims = keys.verify(token)?;
        Ok(AuthUser(claims.into()))
    }
}

/// Accepts `Bearer <token>` in any case, or a bare token.
fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim();
    let token = match header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => header,
    };
    (!token.is_empty()).then_some(token)
}

/// Allows the operation only when `owner_id` is the caller.
pub fn ensure_owner(identity: &Identity, owner_id: i64, denied: &str) -> Result<(), AppError> {
    if identity.id == owner_id {
        Ok(())
    } else {
        tracing::warn!(caller = identity.id, owner_id, "ownership check failed");
        Err(AppError::NotAllowed(denied.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::Request;

    use super::*;

    #[derive(Clone)]
    struct TestState(JwtKeys);

    impl FromRef<TestState> for JwtKeys {
        fn from_ref(state: &TestState) -> Self {
            state.0.clone()
        }
    }

    fn state() -> TestState {
        TestState(JwtKeys::new("gate-secret", Duration::from_secs(300)))
    }

    async fn extract(state: &TestState, header: Option<&str>) -> Result<Identity, AppError> {
        let mut builder = Request::builder().uri("/api/users/1");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state)
            .await
            .map(|AuthUser(identity)| identity)
    }

    #[tokio::test]
    async fn binds_identity_from_bearer_token() {
        let state = state();
        let token = state.0.issue(4, "dave@x.com", "dave").unwrap();
        let identity = extract(&state, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(
            identity,
            Identity {
                id: 4,
                email: "dave@x.com".into(),
                username: "dave".into()
            }
        );
    }

    #[tokio::test]
    async fn accepts_bare_token() {
        let state = state();
        let token = state.0.issue(4, "dave@x.com", "dave").unwrap();
        assert_eq!(extract(&state, Some(&token)).await.unwrap().id, 4);
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let err = extract(&state(), None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(AuthError::Missing)));
    }

    #[tokio::test]
    async fn empty_bearer_is_rejected() {
        let err = extract(&state(), Some("Bearer ")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(AuthError::Missing)));
    }

    #[tokio::test]
    async fn unparsable_token_is_rejected() {
        let err = extract(&state(), Some("Bearer abc.def")).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(AuthError::Malformed)));
    }

    #[test]
    fn ownership_mismatch_is_not_allowed() {
        let me = Identity {
            id: 1,
            email: "alice@x.com".into(),
            username: "alice".into(),
        };
        assert!(ensure_owner(&me, 1, "Not allowed").is_ok());
        let err = ensure_owner(&me, 2, "Not allowed").unwrap_err();
        assert!(matches!(err, AppError::NotAllowed(ref m) if m == "Not allowed"));
    }
}
