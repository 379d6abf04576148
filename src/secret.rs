use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;

pub const SECRET_BYTES: usize = 32;

/// Fresh random key for encrypting values at rest, base64 encoded.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}
