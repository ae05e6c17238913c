use serde::{Deserialize, Serialize};

use crate::auth::models::AuthenticatedUser;
use crate::error::AppError;

/// Name of the cookie carrying the signed-in user.
pub const SESSION_COOKIE: &str = "grasp_session";

/// Built-in demo user definition.
#[derive(Debug, Clone)]
struct DemoUser {
    username: &'static str,
    password: &'static str,
    display_name: &'static str,
    email: &'static str,
}

/// The hard-coded users that can sign in.
const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        username: "demo",
        password: "demo",
        display_name: "Demo Reader",
        email: "demo@demo.grasp.now",
    },
    DemoUser {
        username: "admin",
        password: "admin",
        display_name: "Grasp Admin",
        email: "admin@demo.grasp.now",
    },
];

/// Every demo account, used to seed their libraries.
pub fn demo_accounts() -> Vec<AuthenticatedUser> {
    DEMO_USERS.iter().map(to_user).collect()
}

fn to_user(u: &DemoUser) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: format!("demo-{}", u.username),
        email: u.email.to_string(),
        display_name: u.display_name.to_string(),
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: AuthenticatedUser,
}

/// Validate demo credentials and return the corresponding user.
pub fn authenticate_demo_user(username: &str, password: &str) -> Result<AuthenticatedUser, AppError> {
    DEMO_USERS
        .iter()
        .find(|u| u.username == username.trim() && u.password == password)
        .map(to_user)
        .ok_or_else(|| AppError::Auth("Invalid username or password".into()))
}

/// Build the http-only session cookie for `user`.
#[cfg(feature = "ssr")]
pub fn session_cookie(
    user: &AuthenticatedUser,
) -> Result<axum_extra::extract::cookie::Cookie<'static>, AppError> {
    let user_json = serde_json::to_string(user)
        .map_err(|e| AppError::Internal(format!("Failed to serialize user: {}", e)))?;

    Ok(axum_extra::extract::cookie::Cookie::build((SESSION_COOKIE, user_json))
        .path("/")
        .http_only(true)
        .same_site(axum_extra::extract::cookie::SameSite::Lax)
        .build())
}

/// A cookie that clears the session when sent back to the browser.
#[cfg(feature = "ssr")]
pub fn removal_cookie() -> axum_extra::extract::cookie::Cookie<'static> {
    axum_extra::extract::cookie::Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .removal()
        .build()
}

/// Read the signed-in user from the request cookies.
#[cfg(feature = "ssr")]
pub fn user_from_jar(jar: &axum_extra::extract::CookieJar) -> Result<AuthenticatedUser, AppError> {
    let cookie = jar
        .get(SESSION_COOKIE)
        .ok_or_else(|| AppError::Auth("Not logged in".into()))?;

    serde_json::from_str(cookie.value())
        .map_err(|e| AppError::Auth(format!("Invalid session: {}", e)))
}

/// `POST /api/auth/login`
///
/// On success, sets the session cookie and returns the user info.
#[cfg(feature = "ssr")]
pub async fn login_handler(
    jar: axum_extra::extract::CookieJar,
    axum::Json(req): axum::Json<LoginRequest>,
) -> Result<(axum_extra::extract::CookieJar, axum::Json<LoginResponse>), AppError> {
    let user = authenticate_demo_user(&req.username, &req.password)?;
    let jar = jar.add(session_cookie(&user)?);

    tracing::info!(user_id = %user.user_id, "signed in");

    Ok((
        jar,
        axum::Json(LoginResponse {
            message: "Login successful".to_string(),
            user,
        }),
    ))
}

/// `GET /api/auth/me`: returns the current user from the session cookie.
#[cfg(feature = "ssr")]
pub async fn me_handler(
    jar: axum_extra::extract::CookieJar,
) -> Result<axum::Json<AuthenticatedUser>, AppError> {
    user_from_jar(&jar).map(axum::Json)
}

/// `POST /api/auth/logout`: clears the session cookie.
#[cfg(feature = "ssr")]
pub async fn logout_handler(
    jar: axum_extra::extract::CookieJar,
) -> axum_extra::extract::CookieJar {
    jar.remove(removal_cookie())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_demo_user_success() {
        let user = authenticate_demo_user("demo", "demo").unwrap();
        assert_eq!(user.user_id, "demo-demo");
        assert_eq!(user.display_name, "Demo Reader");
    }

    #[test]
    fn test_username_is_trimmed() {
        let user = authenticate_demo_user("  admin ", "admin").unwrap();
        assert_eq!(user.user_id, "demo-admin");
    }

    #[test]
    fn test_wrong_password() {
        let result = authenticate_demo_user("demo", "wrong");
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_unknown_user() {
        assert!(authenticate_demo_user("nobody", "nothing").is_err());
    }

    #[test]
    fn test_demo_accounts() {
        let ids: Vec<String> = demo_accounts().into_iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec!["demo-demo", "demo-admin"]);
    }

    #[test]
    fn test_cookie_roundtrip_through_jar() {
        let user = authenticate_demo_user("demo", "demo").unwrap();
        let cookie = session_cookie(&user).unwrap();
        assert!(cookie.http_only().unwrap_or(false));

        let jar = axum_extra::extract::CookieJar::new().add(cookie);
        assert_eq!(user_from_jar(&jar).unwrap(), user);
    }

    #[test]
    fn test_missing_or_garbled_session() {
        let jar = axum_extra::extract::CookieJar::new();
        assert!(matches!(user_from_jar(&jar), Err(AppError::Auth(m)) if m == "Not logged in"));

        let jar = jar.add(axum_extra::extract::cookie::Cookie::new(SESSION_COOKIE, "{oops"));
        assert!(user_from_jar(&jar).is_err());
    }
}
