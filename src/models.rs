pub const MAX_UPLOAD_SLOTS: usize = 3;
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const UPLOAD_FIELD_PREFIX: &str = "pdf_file_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPdf {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
