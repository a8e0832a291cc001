//! # File Image Picker
//!
//! Host [`ImagePicker`] backed by the local filesystem. The host selects a
//! path first (file dialog, CLI flag); the next pick returns it. With
//! nothing selected a pick counts as cancelled.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use cryptrack_core::{ImagePickOptions, LocalImage, PickerResult};
use cryptrack_profile::{ImagePicker, ServiceError, ServiceResult};

const FILE_SCHEME: &str = "file://";

#[derive(Debug, Default)]
pub struct FileImagePicker {
    selection: Mutex<Option<PathBuf>>,
}

impl FileImagePicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file returned by the next pick.
    pub fn select(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        debug!(path = %path.display(), "Image selected");
        *self
            .selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(path);
    }

    fn take_selection(&self) -> Option<PathBuf> {
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }
}

fn local_path(uri: &str) -> &Path {
    Path::new(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri))
}

#[async_trait]
impl ImagePicker for FileImagePicker {
    async fn pick_image(&self, options: &ImagePickOptions) -> ServiceResult<PickerResult> {
        let Some(path) = self.take_selection() else {
            return Ok(PickerResult::cancelled());
        };

        // Cropping and quality are left to the frontend; a file pick only
        // confirms the file is there.
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(ServiceError::Io(format!("{} is not a file", path.display())));
        }

        debug!(path = %path.display(), aspect = ?options.aspect, "Image picked");
        Ok(PickerResult::picked(format!("{}{}", FILE_SCHEME, path.display())))
    }

    async fn read_bytes(&self, image: &LocalImage) -> ServiceResult<Vec<u8>> {
        let path = local_path(&image.uri);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::Io(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), size = bytes.len(), "Image read");
        Ok(bytes)
    }
}
