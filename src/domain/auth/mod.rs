pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{NewUser, User, UserChanges};
pub use errors::{AuthError, HashError};
pub use ports::{IssuedToken, OtpPolicy, PasswordHasher, TokenIssuer, TokenSubject, UserRepository};
pub use services::{AuthService, Profile};
pub use value_objects::{Email, OtpCode, Password, PasswordHash, Username, ValueObjectError};
