mod argon2_hasher;
mod jwt_issuer;
mod otp;

pub use argon2_hasher::Argon2PasswordHasher;
pub use jwt_issuer::JwtTokenIssuer;
pub use otp::{FixedOtpPolicy, StoredOtpPolicy};
