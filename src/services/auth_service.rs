use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::collections::HashMap;

use crate::server::config::UserAccount;
use crate::web::error::AppError;
use crate::web::models::{AuthenticatedUser, Claims, LoginRequest, LoginResponse};

/// Fixed, in-memory set of accounts allowed to sign in.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    accounts: HashMap<String, UserAccount>,
}

impl UserDirectory {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();
        Self { accounts }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<&UserAccount> {
        self.accounts
            .get(username)
            .filter(|account| account.password == password)
    }

    pub fn principal(&self, username: &str) -> Option<AuthenticatedUser> {
        self.accounts.get(username).map(|account| AuthenticatedUser {
            username: account.username.clone(),
            company_id: account.company_id,
            role: account.role.clone(),
        })
    }
}

pub fn login_user(
    directory: &UserDirectory,
    req: LoginRequest,
    jwt_secret: &str,
    ttl_minutes: i64,
) -> Result<LoginResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Username and password must not be empty.".to_string(),
        ));
    }

    let account = directory
        .authenticate(&req.username, &req.password)
        .ok_or(AppError::InvalidCredentials)?;

    let access_token = create_jwt_for_user(account, jwt_secret, ttl_minutes)?;
    Ok(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

pub fn create_jwt_for_user(
    account: &UserAccount,
    jwt_secret: &str,
    ttl_minutes: i64,
) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp() as usize;

    let claims = Claims {
        sub: account.username.clone(),
        company_id: account.company_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(e.to_string()))
}

pub fn decode_jwt(token: &str, jwt_secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::ServerConfig;

    const SECRET: &str = "test-secret";

    fn directory() -> UserDirectory {
        UserDirectory::new(ServerConfig::default().users)
    }

    #[test]
    fn test_login_issues_decodable_token() {
        let response = login_user(
            &directory(),
            LoginRequest {
                username: "manager1".to_string(),
                password: "securepass".to_string(),
            },
            SECRET,
            30,
        )
        .unwrap();

        assert_eq!(response.token_type, "bearer");
        let claims = decode_jwt(&response.access_token, SECRET).unwrap();
        assert_eq!(claims.sub, "manager1");
        assert_eq!(claims.company_id, 101);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let result = login_user(
            &directory(),
            LoginRequest {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            },
            SECRET,
            30,
        );
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let account = &ServerConfig::default().users[0];
        let token = create_jwt_for_user(account, "other-secret", 30).unwrap();
        assert!(decode_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn test_principal_lookup() {
        let principal = directory().principal("admin").unwrap();
        assert_eq!(principal.company_id, 1);
        assert_eq!(principal.role, "manager");
        assert!(directory().principal("ghost").is_none());
    }
}
