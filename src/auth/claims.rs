use serde::{Deserialize, Serialize};

/// JWT payload. `sub` and `username` carry the identity; `iat`/`exp` are
/// unix timestamps bounding the fixed validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}
