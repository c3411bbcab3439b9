use serde::Serialize;

/// `{"message": ...}`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"message": ..., "data": ...}`, returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct CreatedResponse<T> {
    pub message: &'static str,
    pub data: T,
}

pub fn message(message: &'static str) -> MessageResponse {
    MessageResponse { message }
}
