//! Multipart form collection.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

use crate::backend::Upload;

/// Text fields and file uploads of a multipart form, keyed by field name.
///
/// A repeated field keeps its last value.
#[derive(Debug, Default)]
pub struct FormFields {
    text: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormFields {
    /// Read every field of a multipart body.
    ///
    /// Parts with a file name are collected as uploads; everything else is
    /// read as text. Empty file parts (a file input left blank) are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid multipart.
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await?;
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        Upload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.text.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// A trimmed, non-empty text field.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Remove and return an uploaded file.
    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}
