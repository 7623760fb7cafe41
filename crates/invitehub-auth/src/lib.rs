//! # invitehub-auth
//!
//! Authentication and authorization for InviteHub.
//!
//! ## Modules
//!
//! - `token`: invite token generation and one-way digests
//! - `jwt`: access token encoding and validation
//! - `acl`: the membership registry and the access evaluator built on it
//! - `identity`: the seam to the external identity provider

pub mod acl;
pub mod identity;
pub mod jwt;
pub mod token;

pub use acl::{AccessEvaluator, MembershipRegistry};
pub use identity::{IdentityVerifier, StaticIdentityVerifier, VerifiedIdentity};
pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder};
pub use token::{IssuedToken, TokenCodec, TokenDigest};
