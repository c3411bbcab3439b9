use serde::Deserialize;

use crate::{
    error::AppError,
    validation::{is_url_with_extension, Validate, Violations},
};

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Request body for creating or replacing a photo.
#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    #[serde(default)]
    pub title: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub photo_url: String,
}

impl Validate for PhotoRequest {
    fn normalize(&mut self) {
        self.title = self.title.trim().to_string();
        self.photo_url = self.photo_url.trim().to_string();
        self.caption = self
            .caption
            .take()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut v = Violations::new();
        v.require("title", &self.title);
        if v.require("photo_url", &self.photo_url)
            && !is_url_with_extension(&self.photo_url, IMAGE_EXTENSIONS)
        {
            v.add("Invalid photo URL or does not end with the desired extension");
        }
        v.finish()
    }
}
