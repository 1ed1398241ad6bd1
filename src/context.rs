//! Request-context normalization run once per inbound request, before route handlers.
//!
//! The [`Normalizer`] rewrites stage-prefixed paths (`/prod/hello` → `/hello`) and turns
//! upstream authorizer claims into a [`UserIdentity`](crate::auth::UserIdentity). It never
//! fails: malformed claims only produce a partially populated identity and a diagnostic event.

pub mod normalizer;
pub mod stage;

pub use normalizer::*;
pub use stage::*;
