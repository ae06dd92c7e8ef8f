// ABOUTME: Downloads product thumbnails into a scratch directory as <itemId>.png for launcher icons.
// ABOUTME: Any failure is logged and reported as no image so the default icon is used.

use std::fs;
use std::path::PathBuf;

use reqwest::blocking::Client;
use shopscout_core::{ImageStore, ScoutError};
use tracing::{debug, warn};

pub struct HttpImageStore {
    client: Client,
    dir: PathBuf,
}

impl HttpImageStore {
    pub fn new(client: Client, dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            dir: dir.into(),
        }
    }

    fn download(&self, image_url: &str, item_id: &str) -> Result<PathBuf, ScoutError> {
        let response = self
            .client
            .get(image_url)
            .send()
            .map_err(|e| ScoutError::fetch(image_url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::status(image_url, status.as_u16()));
        }
        let bytes = response.bytes().map_err(|e| ScoutError::fetch(image_url, e))?;

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.png", safe_name(item_id)));
        fs::write(&path, &bytes)?;
        debug!(item_id, path = %path.display(), bytes = bytes.len(), "saved product image");
        Ok(path)
    }
}

fn safe_name(item_id: &str) -> String {
    item_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl ImageStore for HttpImageStore {
    fn fetch_image(&self, image_url: &str, item_id: &str) -> Option<PathBuf> {
        match self.download(image_url, item_id) {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(item_id, image_url, %err, "image download failed");
                None
            }
        }
    }
}
