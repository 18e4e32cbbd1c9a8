use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::config::CONFIG;

// ユーザー登録・ログインはこのサーバーの管轄外。ここではトークンから
// 行動者のニックネームを取り出すことだけを扱う
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("トークンの作成に失敗しました")]
    TokenCreation,
    #[error("トークンの検証に失敗しました")]
    TokenValidation,
}

pub fn create_token(nickname: &str) -> Result<String, AuthError> {
    let now = Utc::now();
    let iat = now.timestamp() as usize;
    let exp = (now + Duration::hours(24)).timestamp() as usize;
    let claims = Claims {
        sub: nickname.to_string(),
        exp,
        iat,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
    )
    .map_err(|_| AuthError::TokenCreation)
}

pub fn verify_token(token: &str) -> Result<Claims, AuthError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AuthError::TokenValidation)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_setup::setup_test_env;

    #[test]
    fn test_token_round_trip() {
        setup_test_env();
        let token = create_token("alice").unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_invalid_token_rejected() {
        setup_test_env();
        assert!(verify_token("not-a-token").is_err());
    }
}
