//! # sharelink-auth
//!
//! Credential handling for ShareLink.
//!
//! ## Modules
//!
//! - `jwt`: verification of bearer tokens minted by the account service
//! - `password`: Argon2id hashing for share passwords
//! - `token`: unguessable share link tokens

pub mod jwt;
pub mod password;
pub mod token;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use token::generate_share_token;
