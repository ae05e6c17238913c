use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::demo_auth::user_from_jar;
use crate::auth::models::AuthenticatedUser;
use crate::error::AppError;

/// Extractor for the signed-in user; rejects with 401 when the session
/// cookie is missing or unreadable.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        user_from_jar(&jar).map(CurrentUser)
    }
}

/// The signed-in user inside a Leptos server function.
pub async fn session_user() -> Result<AuthenticatedUser, leptos::prelude::ServerFnError> {
    let jar = leptos_axum::extract::<CookieJar>().await?;
    user_from_jar(&jar).map_err(crate::api::errors::to_server_fn_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::demo_auth::{authenticate_demo_user, session_cookie};
    use axum::http::{header, Request};

    async fn extract(req: Request<()>) -> Result<CurrentUser, AppError> {
        let (mut parts, _) = req.into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_rejects_without_cookie() {
        let req = Request::builder().uri("/api/v1/documents").body(()).unwrap();
        assert!(matches!(extract(req).await, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_reads_session_cookie() {
        let user = authenticate_demo_user("demo", "demo").unwrap();
        let cookie = session_cookie(&user).unwrap();
        let req = Request::builder()
            .uri("/api/v1/documents")
            .header(header::COOKIE, cookie.stripped().to_string())
            .body(())
            .unwrap();

        let CurrentUser(found) = extract(req).await.unwrap();
        assert_eq!(found.user_id, "demo-demo");
    }
}
