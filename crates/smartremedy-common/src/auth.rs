use serde::{Deserialize, Serialize};

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}
