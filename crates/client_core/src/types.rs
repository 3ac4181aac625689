use std::{fmt, path::Path, str::FromStr};

use anyhow::{Context, Result};

use crate::error::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Position,
    Photo,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Position,
        FormField::Photo,
    ];

    /// The HTML input name the field is bound to.
    pub fn input_name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Position => "position",
            FormField::Photo => "photo",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.input_name())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.input_name() == raw)
            .ok_or_else(|| FormError::UnknownField(raw.to_string()))
    }
}

/// An image picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(filename: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read photo '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo.jpg".to_string());
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            filename,
            mime_type,
            bytes,
        })
    }

    /// The picker only offers `image/jpeg, image/jpg`.
    pub fn is_jpeg(&self) -> bool {
        matches!(
            self.mime_type.as_deref(),
            Some("image/jpeg") | Some("image/jpg")
        )
    }
}

impl fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoFile")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Photo(Option<PhotoFile>),
}

impl FieldValue {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Photo(_) => "file",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<PhotoFile> for FieldValue {
    fn from(value: PhotoFile) -> Self {
        FieldValue::Photo(Some(value))
    }
}

impl From<Option<PhotoFile>> for FieldValue {
    fn from(value: Option<PhotoFile>) -> Self {
        FieldValue::Photo(value)
    }
}

/// Raw, untrimmed input as typed by the user. `position` holds the radio value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub photo: Option<PhotoFile>,
}
