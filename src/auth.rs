//! Auth-domain models: authorizer claims, user identity, scopes, secrets, and token responses.

pub mod claims;
pub mod identity;
pub mod scope;
pub mod secret;
pub mod token;

pub use claims::*;
pub use identity::*;
pub use scope::*;
pub use secret::*;
pub use token::*;
