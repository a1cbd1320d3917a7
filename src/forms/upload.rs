use actix_multipart::form::{MultipartForm, tempfile::TempFile};

/// Multipart payload of `POST /customers/import`.
#[derive(MultipartForm)]
pub struct UploadCustomersForm {
    #[multipart(limit = "10MB")]
    pub file: TempFile,
}
