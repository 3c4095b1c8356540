use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::UploadedImage;

// Assembled from the multipart form by the route handler.
#[derive(Debug)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub role: String,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub bank_name: Option<String>,
    pub upi_id: Option<String>,
    pub paypal_email: Option<String>,
    pub profile_image: UploadedImage,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
