use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

/// Claims carried by the identity token the external auth service hands to
/// the login redirect.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub exp: Option<usize>,
}

pub fn create_token(
    user_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &[u8],
) -> Result<String, jsonwebtoken::errors::Error> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(decoded.claims.sub)
}

/// Verify the identity token's signature before trusting its claims. The
/// external service signs with the shared secret; tokens without an `exp`
/// are accepted since the provider omits it on redirect tokens.
pub fn verify_identity_token(
    token: &str,
    secret: &[u8],
) -> Result<IdentityClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    let decoded = decode::<IdentityClaims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(decoded.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn session_token_round_trip() {
        let token = create_token("12345", SECRET, 60).unwrap();
        let sub = decode_token(token, SECRET).unwrap();
        assert_eq!(sub, "12345");
    }

    #[test]
    fn session_token_rejects_empty_subject() {
        assert!(create_token("", SECRET, 60).is_err());
    }

    #[test]
    fn session_token_rejects_wrong_secret() {
        let token = create_token("12345", SECRET, 60).unwrap();
        assert!(decode_token(token, b"other-secret").is_err());
    }

    #[test]
    fn identity_token_verifies_signature() {
        let claims = IdentityClaims {
            id: "42".to_string(),
            display_name: "Test User".to_string(),
            exp: None,
        };
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let verified = verify_identity_token(&token, SECRET).unwrap();
        assert_eq!(verified.id, "42");
        assert_eq!(verified.display_name, "Test User");

        assert!(verify_identity_token(&token, b"forged").is_err());
    }
}
