use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{check_policy, hash_password, verify_password},
    repo_types::{NewUser, User},
};
use crate::{error::AppError, state::AppState};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<User, AppError> {
    let email = normalize_email(&req.email);
    let username = req.username.trim().to_string();

    if username.is_empty() {
        return Err(AppError::validation("username is required"));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("invalid email"));
    }
    check_policy(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let user = st
        .users
        .save(NewUser {
            email,
            username,
            password_hash,
        })
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Conflict(_)) {
                warn!(email = %req.email.trim(), "email already registered");
            }
        })?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Returns a signed bearer token. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn login(st: &AppState, req: LoginRequest) -> Result<String, AppError> {
    let email = normalize_email(&req.email);

    let Some(user) = st.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized);
    }

    let token = JwtKeys::from_ref(st).sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}

pub async fn info(st: &AppState, user_id: i64) -> Result<User, AppError> {
    st.users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound("user"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(email: &str) -> RegisterRequest {
        RegisterRequest {
            username: "alice".into(),
            email: email.into(),
            password: "long-enough-pw".into(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn register_normalizes_email_and_hides_hash() {
        let st = AppState::fake();
        let user = register(&st, register_req("  A@X.com ")).await.unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_ne!(user.password_hash, "long-enough-pw");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let st = AppState::fake();
        register(&st, register_req("a@x.com")).await.unwrap();
        let err = register(&st, register_req("A@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_rejects_bad_input() {
        let st = AppState::fake();
        let mut short = register_req("a@x.com");
        short.password = "short".into();
        assert!(matches!(
            register(&st, short).await,
            Err(AppError::Validation(_))
        ));

        let mut nameless = register_req("a@x.com");
        nameless.username = "   ".into();
        assert!(matches!(
            register(&st, nameless).await,
            Err(AppError::Validation(_))
        ));

        assert!(matches!(
            register(&st, register_req("nope")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn login_issues_token_for_registered_user() {
        let st = AppState::fake();
        let user = register(&st, register_req("a@x.com")).await.unwrap();
        let token = login(
            &st,
            LoginRequest {
                email: "a@x.com".into(),
                password: "long-enough-pw".into(),
            },
        )
        .await
        .unwrap();
        let claims = JwtKeys::from_ref(&st).verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let st = AppState::fake();
        register(&st, register_req("a@x.com")).await.unwrap();
        for (email, password) in [("a@x.com", "wrong-password"), ("b@x.com", "long-enough-pw")] {
            let err = login(
                &st,
                LoginRequest {
                    email: email.into(),
                    password: password.into(),
                },
            )
            .await
            .unwrap_err();
            assert!(matches!(err, AppError::Unauthorized));
        }
    }

    #[tokio::test]
    async fn info_for_missing_user_is_not_found() {
        let st = AppState::fake();
        assert!(matches!(info(&st, 999).await, Err(AppError::NotFound(_))));
    }
}
