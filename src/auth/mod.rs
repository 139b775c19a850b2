use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config;

/// Coarse authorization tier, distinct from the free-form specialty `role` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivilegeLevel {
    Standard,
    Leader,
    Admin,
}

impl PrivilegeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivilegeLevel::Standard => "standard",
            PrivilegeLevel::Leader => "leader",
            PrivilegeLevel::Admin => "admin",
        }
    }
}

impl FromStr for PrivilegeLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(PrivilegeLevel::Standard),
            "leader" => Ok(PrivilegeLevel::Leader),
            "admin" => Ok(PrivilegeLevel::Admin),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PrivilegeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub member_id: i32,
    pub email: String,
    pub privilege_level: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(member_id: i32, email: String, privilege_level: String) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            member_id,
            email,
            privilege_level,
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
    Hash(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::InvalidSecret => write!(f, "Invalid JWT secret"),
            AuthError::Hash(msg) => write!(f, "Password hash error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn generate_jwt(claims: Claims) -> Result<String, AuthError> {
    encode_with_secret(claims, &config::config().security.jwt_secret)
}

pub fn verify_jwt(token: &str) -> Result<Claims, AuthError> {
    decode_with_secret(token, &config::config().security.jwt_secret)
}

fn encode_with_secret(claims: Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, &claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

fn decode_with_secret(token: &str, secret: &str) -> Result<Claims, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Hash a plaintext password with a salted one-way hash at the configured cost.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, config::config().security.bcrypt_cost)
        .map_err(|e| AuthError::Hash(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_levels_are_ordered() {
        assert!(PrivilegeLevel::Standard < PrivilegeLevel::Leader);
        assert!(PrivilegeLevel::Leader < PrivilegeLevel::Admin);
        assert_eq!("admin".parse::<PrivilegeLevel>(), Ok(PrivilegeLevel::Admin));
        assert!("root".parse::<PrivilegeLevel>().is_err());
    }

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let claims = Claims {
            member_id: 42,
            email: "ada@club.example".to_string(),
            privilege_level: "leader".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };

        let token = encode_with_secret(claims, "test-secret").unwrap();
        let decoded = decode_with_secret(&token, "test-secret").unwrap();

        assert_eq!(decoded.member_id, 42);
        assert_eq!(decoded.email, "ada@club.example");
        assert_eq!(decoded.privilege_level, "leader");
    }

    #[test]
    fn jwt_rejects_wrong_secret() {
        let claims = Claims {
            member_id: 1,
            email: "a@b.c".to_string(),
            privilege_level: "standard".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        };

        let token = encode_with_secret(claims, "secret-a").unwrap();
        assert!(matches!(
            decode_with_secret(&token, "secret-b"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn jwt_rejects_expired_token() {
        let claims = Claims {
            member_id: 1,
            email: "a@b.c".to_string(),
            privilege_level: "standard".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
        };

        let token = encode_with_secret(claims, "test-secret").unwrap();
        assert!(matches!(
            decode_with_secret(&token, "test-secret"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn empty_secret_refuses_to_sign() {
        let claims = Claims {
            member_id: 1,
            email: "a@b.c".to_string(),
            privilege_level: "standard".to_string(),
            exp: 0,
            iat: 0,
        };
        assert!(matches!(
            encode_with_secret(claims, ""),
            Err(AuthError::InvalidSecret)
        ));
    }

    #[test]
    fn password_hash_and_verify() {
        // Fixed low cost keeps the test fast; runtime cost comes from config
        let hash = bcrypt::hash("drivetrain", 4).unwrap();
        assert!(verify_password("drivetrain", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
