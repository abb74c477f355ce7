//! Account handlers: signup, login and the login page.

use actix_web::{HttpResponse, cookie::Cookie, web};
use serde::Deserialize;

use yatube_core::domain::User;
use yatube_core::ports::AuthError;
use yatube_core::error::{ValidationError, ValidationErrorKind};
use yatube_core::validation::{validate_max_length, validate_not_empty};
use yatube_core::ValidationErrors;
use yatube_shared::ViewResponse;
use yatube_shared::dto::{AuthResponse, LoginRequest, SignupRequest};
use yatube_shared::view::LoginContext;

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, STAFF_ROLE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub const LOGIN_TEMPLATE: &str = "users/login.html";

const USERNAME_MAX_LENGTH: usize = 150;
const PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn validate_signup(req: &SignupRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_not_empty("username", &req.username));
    errors.check(validate_max_length("username", &req.username, USERNAME_MAX_LENGTH));
    if !req
        .username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.push(ValidationError::new("username", ValidationErrorKind::InvalidFormat));
    }

    let email_ok = req
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !email_ok {
        errors.push(ValidationError::new("email", ValidationErrorKind::InvalidFormat));
    }

    if req.password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(ValidationError::new("password", ValidationErrorKind::InvalidFormat));
    }

    errors.into_result()
}

fn roles_of(user: &User) -> Vec<String> {
    let mut roles = vec!["user".to_string()];
    if user.is_staff {
        roles.push(STAFF_ROLE.to_string());
    }
    roles
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, roles_of(user))?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        username: user.username.clone(),
    })
}

/// POST /auth/signup/
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_signup(&req)?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    let user = state
        .users
        .insert(User::new(req.username, req.email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User signed up");
    Ok(HttpResponse::Created().json(issue_token(&state, &user)?))
}

/// POST /auth/login/
///
/// Besides the JSON body, the token is set as the `access_token` cookie so
/// that the HTML pages recognise the visitor.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }

    let response = issue_token(&state, &user)?;
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, response.access_token.clone())
        .path("/")
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(response))
}

/// GET /auth/login/
pub async fn login_page(query: web::Query<LoginQuery>) -> HttpResponse {
    HttpResponse::Ok().json(ViewResponse::new(
        LOGIN_TEMPLATE,
        LoginContext {
            next: query.into_inner().next,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_valid_signup() {
        assert!(validate_signup(&request("leo.tolstoy", "leo@example.com", "war-and-peace")).is_ok());
    }

    #[test]
    fn test_signup_reports_each_field() {
        let errors = validate_signup(&request("bad name!", "nope", "short")).unwrap_err();

        assert!(errors.has_kind("username", &ValidationErrorKind::InvalidFormat));
        assert!(errors.has_kind("email", &ValidationErrorKind::InvalidFormat));
        assert!(errors.has_kind("password", &ValidationErrorKind::InvalidFormat));
    }

    #[test]
    fn test_long_username_rejected() {
        let errors = validate_signup(&request(&"a".repeat(151), "a@b.io", "password1")).unwrap_err();
        assert!(errors.has_kind("username", &ValidationErrorKind::TooLong { max: 150 }));
    }
}
