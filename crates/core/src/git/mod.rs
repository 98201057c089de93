//! Git configuration access for git-passport.

pub mod client;
pub mod gateway;
pub mod remote_url;

pub use client::GitConfigGateway;
pub use gateway::{IdentityGateway, Property, Scope};
