use argon2::{Argon2, PasswordHash, PasswordVerifier};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::UseCaseResult;
use crate::{
    auth::{ADMIN_ROLE, issue_token},
    axum_http::error_responses::AppError,
    config::config_model::{AdminCredentials, AdminSecret},
};

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginModel {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminAuthDto {
    pub token: String,
    pub username: String,
}

/// Single back-office account configured through the environment.
pub struct AdminAuthUseCase {
    credentials: AdminCredentials,
}

impl AdminAuthUseCase {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { credentials }
    }

    pub fn login(
        &self,
        model: AdminLoginModel,
        admin_secret: &AdminSecret,
    ) -> UseCaseResult<AdminAuthDto> {
        let username = model.username.trim();
        if username != self.credentials.username
            || !verify_password(&model.password, &self.credentials.password_hash)
        {
            warn!("admin_auth: invalid credentials");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = issue_token(
            username,
            ADMIN_ROLE,
            &admin_secret.secret,
            admin_secret.ttl_hours,
        )?;

        info!(username, "admin_auth: logged in");
        Ok(AdminAuthDto {
            token,
            username: username.to_string(),
        })
    }
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        warn!("admin_auth: configured password hash is not a valid PHC string");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::validate_token;
    use argon2::{
        PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    const SECRET: &str = "admin-usecase-secret";

    fn usecase(password: &str) -> AdminAuthUseCase {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        AdminAuthUseCase::new(AdminCredentials {
            username: "owner".to_string(),
            password_hash,
        })
    }

    fn admin_secret() -> AdminSecret {
        AdminSecret {
            secret: SECRET.to_string(),
            ttl_hours: 12,
        }
    }

    #[test]
    fn correct_credentials_issue_admin_token() {
        let auth = usecase("gold-and-silver")
            .login(
                AdminLoginModel {
                    username: "owner".to_string(),
                    password: "gold-and-silver".to_string(),
                },
                &admin_secret(),
            )
            .unwrap();

        let claims = validate_token(&auth.token, SECRET, ADMIN_ROLE).unwrap();
        assert_eq!(claims.sub, "owner");
    }

    #[test]
    fn wrong_password_or_username_is_unauthorized() {
        let usecase = usecase("gold-and-silver");

        let wrong_password = usecase.login(
            AdminLoginModel {
                username: "owner".to_string(),
                password: "bronze".to_string(),
            },
            &admin_secret(),
        );
        assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));

        let wrong_username = usecase.login(
            AdminLoginModel {
                username: "intruder".to_string(),
                password: "gold-and-silver".to_string(),
            },
            &admin_secret(),
        );
        assert!(matches!(wrong_username, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
