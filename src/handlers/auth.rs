//! Authentication HTTP handlers
//!
//! Signup, login, and current-user endpoints. The access token travels in
//! the response body; the refresh token is delivered as an HttpOnly cookie.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::auth::{CurrentUser, TokenPair};
use crate::error::ApiError;
use crate::models::{AuthResponse, AuthUser, LoginRequest, SignupRequest};
use crate::state::AppState;

const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// POST /auth/signup - Register a new account and issue tokens
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    req.validate()?;

    let (tokens, user) = state
        .auth_service
        .signup(&req.name, &req.email, &req.password)
        .await?;

    let jar = jar.add(refresh_cookie(&tokens, state.refresh_cookie_secure));
    Ok((
        jar,
        Json(auth_response(tokens, user, "Signup completed.")),
    ))
}

/// POST /auth/login - Authenticate and issue tokens
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    req.validate()?;

    let (tokens, user) = state
        .auth_service
        .login(&req.email, &req.password, req.remember)
        .await?;

    let jar = jar.add(refresh_cookie(&tokens, state.refresh_cookie_secure));
    Ok((jar, Json(auth_response(tokens, user, "Login successful."))))
}

/// GET /auth/me - Current authenticated user
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AuthUser>, ApiError> {
    let user = state.auth_service.current_user(user.user_id).await?;
    Ok(Json(user))
}

fn auth_response(tokens: TokenPair, user: AuthUser, message: &str) -> AuthResponse {
    AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expires_in,
        user,
        message: message.to_string(),
    }
}

/// The refresh cookie lives exactly as long as the refresh token it carries.
fn refresh_cookie(tokens: &TokenPair, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE_NAME, tokens.refresh_token.clone()))
        .http_only(true)
        .secure(secure)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(tokens.refresh_expires_in))
        .build()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        middleware::from_fn_with_state,
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::auth::jwt::TokenCodec;
    use crate::auth::password::BcryptHasher;
    use crate::auth::{authenticate, AuthService, TokenIssuer};
    use crate::routes::auth_routes;
    use crate::store::testing::InMemoryUserStore;

    fn test_app() -> Router {
        let codec = TokenCodec::new("test-secret-key-with-enough-bytes!!");
        let service = AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(BcryptHasher::with_cost(4)),
            TokenIssuer::new(codec, 900, 2_592_000),
        );
        let state = AppState::new(Arc::new(service), false);

        auth_routes()
            .layer(from_fn_with_state(state.clone(), authenticate))
            .with_state(state)
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_signup_sets_refresh_cookie() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("refreshToken="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Path=/"));
        // Signup grants the full refresh lifetime
        assert!(cookie.contains("Max-Age=2592000"));

        let body = json_body(response).await;
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 900);
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert_eq!(body["message"], "Signup completed.");
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_signup_duplicate_conflicts() {
        let app = test_app();
        let body = r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#;

        let first = app
            .clone()
            .oneshot(json_request("/auth/signup", body))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(json_request("/auth/signup", body))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let body = json_body(second).await;
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_signup_validation_rejected() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"Ada","email":"not-an-email","password":"password123"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_signup_blank_name_rejected() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"   ","email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_without_remember_caps_cookie() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "/auth/login",
                r#"{"email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[tokio::test]
    async fn test_login_failure_is_unauthorized() {
        let app = test_app();
        app.clone()
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();

        // Unknown email and wrong password produce identical bodies
        let unknown = app
            .clone()
            .oneshot(json_request(
                "/auth/login",
                r#"{"email":"nobody@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let unknown_body = json_body(unknown).await;

        let wrong = app
            .oneshot(json_request(
                "/auth/login",
                r#"{"email":"ada@example.com","password":"wrong-password"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(wrong).await, unknown_body);
    }

    #[tokio::test]
    async fn test_me_round_trip() {
        let app = test_app();
        let signup = app
            .clone()
            .oneshot(json_request(
                "/auth/signup",
                r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#,
            ))
            .await
            .unwrap();
        let body = json_body(signup).await;
        let access_token = body["access_token"].as_str().unwrap().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["name"], "Ada");
        assert_eq!(body["email"], "ada@example.com");
    }

    #[tokio::test]
    async fn test_me_anonymous_is_unauthorized() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
