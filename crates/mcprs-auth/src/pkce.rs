use crate::error::AuthError;
use crate::types::PkceParams;
use mcprs_core::utils::generate_secure_random;
use sha2::Digest;
use base64::Engine;

/// Generate PKCE (Proof Key for Code Exchange) parameters
pub fn generate_pkce_params() -> Result<PkceParams, AuthError> {
    // Generate code verifier (43-128 characters)
    let code_verifier = generate_secure_random(128);
    
    // Generate code challenge using SHA256
    let digest = sha2::Sha256::digest(code_verifier.as_bytes());
    let code_challenge = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(digest);

    Ok(PkceParams {
        code_verifier,
        code_challenge,
        code_challenge_method: "S256".to_string(),
    })
}
