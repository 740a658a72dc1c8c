use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{TokenClaims, UserDto};
use crate::error::AppError;

#[derive(Clone)]
pub struct JwtKeys {
    pub enc: EncodingKey,
    pub dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
        }
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_claims(user: &UserDto, ttl_secs: usize) -> TokenClaims {
    let iat = now_unix();
    TokenClaims {
        sub: user.id,
        email: user.email.clone(),
        is_activated: user.is_activated,
        iat,
        exp: iat + ttl_secs,
        jti: Uuid::new_v4(),
    }
}

pub fn encode_token(keys: &JwtKeys, claims: &TokenClaims) -> Result<String, AppError> {
    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".into());

    encode(&header, claims, &keys.enc)
        .map_err(|err| AppError::internal_with_source("token encoding failed", err))
}

/// Verifies signature and expiry.
pub fn decode_token(
    keys: &JwtKeys,
    token: &str,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<TokenClaims>(token, &keys.dec, &validation).map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserDto {
        UserDto {
            id: Uuid::new_v4(),
            email: "ada@example.com".to_string(),
            is_activated: false,
        }
    }

    #[test]
    fn makes_claims_with_user_payload_and_ttl() {
        let user = user();
        let claims = make_claims(&user, 60);

        assert_eq!(claims.user(), user);
        assert_eq!(claims.exp.saturating_sub(claims.iat), 60);
    }

    #[test]
    fn claims_minted_together_have_distinct_ids() {
        let user = user();
        assert_ne!(make_claims(&user, 60).jti, make_claims(&user, 60).jti);
    }

    #[test]
    fn token_decodes_with_same_secret_only() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let claims = make_claims(&user(), 600);
        let token = encode_token(&keys, &claims).expect("token should encode");

        let decoded = decode_token(&keys, &token).expect("token should decode");
        assert_eq!(decoded, claims);

        let other = JwtKeys::from_secret(b"another-secret");
        assert!(decode_token(&other, &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = JwtKeys::from_secret(b"unit-test-secret");
        let mut claims = make_claims(&user(), 60);
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = encode_token(&keys, &claims).expect("token should encode");

        assert!(decode_token(&keys, &token).is_err());
    }
}
