use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};

use crate::models::jwt::{AccessClaims, TOKEN_ISSUER};

/// Sign claims as an HS256 JWT.
pub fn encode_claims(claims: &AccessClaims, key: &EncodingKey) -> Result<String, JwtError> {
    encode(&Header::new(Algorithm::HS256), claims, key)
}

/// Check signature, algorithm and issuer, and return the claims.
///
/// Expiry is not checked here; the caller owns the clock.
pub fn decode_claims(token: &str, key: &DecodingKey) -> Result<AccessClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    decode::<AccessClaims>(token, key, &validation).map(|data| data.claims)
}
