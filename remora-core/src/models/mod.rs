//! Domain models for the Remora SDK.

pub mod auth;
pub mod credential;
pub mod deal;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};
pub use credential::Credential;
pub use deal::{Deal, DealPage};
