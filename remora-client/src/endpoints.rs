//! Endpoint catalog for the backend API.
//!
//! Paths are relative to the configured base URL and keep the backend's
//! trailing-slash convention.

/// Default production base URL.
pub const DEFAULT_BASE_URL: &str = "https://dealshark-be.onrender.com";

/// Authentication endpoints.
pub mod auth {
    /// Log in with email and password.
    pub const LOGIN: &str = "/auth/login/";
    /// Register a new user account.
    pub const REGISTER_USER: &str = "/auth/register/user/";
    /// Exchange a refresh token for a new access token.
    pub const REFRESH: &str = "/auth/refresh/";
    /// Fetch the current account profile.
    pub const PROFILE: &str = "/auth/profile/";
}

/// Deal endpoints.
pub mod deals {
    /// List all deals.
    pub const ALL: &str = "/deals/all/";
    /// List the current account's deals.
    pub const MY: &str = "/deals/my/";

    /// Fetch a single deal by id.
    pub fn by_id(deal_id: &str) -> String {
        format!("/deals/{deal_id}/")
    }
}
