pub mod error;
pub mod service;

pub use error::AuthError;
pub use service::{StaticTokenVerifier, SupabaseVerifier, TokenVerifier};

/// Extract the token from an `Authorization` header value. The scheme
/// prefix ("Bearer ") is optional; the last whitespace-separated piece
/// is the token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    match header.split(' ').next_back() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidToken),
    }
}
