use contracts::system::auth::{LoginData, LoginRequest};

use crate::shared::api_utils::{post_data, ApiError};

/// Login with email and password
pub async fn login(email: String, password: String) -> Result<LoginData, ApiError> {
    let request = LoginRequest { email, password };
    post_data("/admin/login", &request).await
}
