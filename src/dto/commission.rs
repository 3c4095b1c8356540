use serde::Serialize;
use utoipa::ToSchema;

use crate::models::PaymentProof;
use crate::storage::UploadedImage;

// Assembled from the multipart form by the route handler.
#[derive(Debug)]
pub struct SubmitProofRequest {
    pub amount: i64,
    pub comment: String,
    pub proof: UploadedImage,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProofList {
    pub items: Vec<PaymentProof>,
}
