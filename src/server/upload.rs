//! Multipart form extraction for contact writes.
//!
//! The image part is spooled to a temporary file that lives as long as the
//! [`ContactForm`]; text parts become a [`ContactPayload`].

use crate::domain::ValidationError;
use crate::error::{ContactError, ContactResult};
use crate::models::ContactPayload;
use axum::body::Bytes;
use axum::extract::multipart::{Field, Multipart, MultipartError};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Name of the multipart part carrying the image.
pub const FILE_FIELD: &str = "file";

/// An uploaded image spooled to disk. Deleted on drop.
#[derive(Debug)]
pub struct UploadedFile {
    file: NamedTempFile,
}

impl UploadedFile {
    /// Write `bytes` to a new temporary file, keeping the original extension.
    async fn spool(bytes: Bytes, file_name: Option<&str>) -> ContactResult<Self> {
        let suffix = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            let mut file = tempfile::Builder::new()
                .prefix("contact-upload-")
                .suffix(&suffix)
                .tempfile()?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| ContactError::Unhandled(format!("Task join error: {}", e)))?
        .map_err(|e| ContactError::Unhandled(format!("Failed to spool upload: {}", e)))?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// A decoded contact form.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub payload: ContactPayload,
    pub file: Option<UploadedFile>,
}

impl ContactForm {
    /// Read every part of `multipart`. Unknown parts are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> ContactResult<Self> {
        let mut form = ContactForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            let payload = &mut form.payload;

            match name.as_str() {
                FILE_FIELD => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.map_err(malformed)?;
                    // Browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        form.file =
                            Some(UploadedFile::spool(bytes, file_name.as_deref()).await?);
                    }
                }
                "firstName" => payload.first_name = Some(text(field).await?),
                "lastName" => payload.last_name = Some(text(field).await?),
                "email" => payload.email = Some(text(field).await?),
                "birthDate" => payload.birth_date = Some(text(field).await?),
                "company" => payload.company = Some(text(field).await?),
                "phoneNumbers" => {
                    let raw = text(field).await?;
                    payload.phone_numbers = Some(parse_phone_numbers(raw));
                }
                other => tracing::debug!("Ignoring form field {:?}", other),
            }
        }

        Ok(form)
    }
}

/// Phone numbers arrive as JSON text. Anything that is not JSON is kept as a
/// plain string so the validator reports it as a malformed list.
fn parse_phone_numbers(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

async fn text(field: Field<'_>) -> ContactResult<String> {
    field.text().await.map_err(malformed)
}

fn malformed(err: MultipartError) -> ContactError {
    ValidationError::MalformedBody(err.body_text()).into()
}
