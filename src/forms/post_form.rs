use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use validator::Validate;

use super::FormErrors;
use crate::entities::{Entity, Group, Post};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::Database;

pub const TEXT_LABEL: &str = "Post text";
pub const GROUP_LABEL: &str = "Group";
pub const GROUP_HELP: &str = "The group this post belongs to";
pub const IMAGE_LABEL: &str = "Image";
pub const IMAGE_HELP: &str = "A picture for your post";

pub const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const IMAGE_TOO_LARGE: &str = "The uploaded file is too large.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Directory under the media root that post images are stored in.
pub const IMAGE_UPLOAD_TO: &str = "posts";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// An upload that decoded successfully.
#[derive(Debug, Clone)]
pub struct ValidImage {
    pub extension: &'static str,
    pub data: Vec<u8>,
}

/// Post create/edit form. Only `text`, `group` and `image` are accepted.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
    /// Raw group choice; empty means "no group".
    pub group: String,
    pub image: Option<UploadedFile>,
    /// "Clear" checkbox for an existing image.
    pub clear_image: bool,
    /// The body hit the upload limit; fields after the cut-off are missing.
    pub too_large: bool,
    pub errors: FormErrors,
}

#[derive(Debug, Clone)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: Option<ValidImage>,
    pub clear_image: bool,
}

/// One `<option>` of the group select.
#[derive(Debug, Clone)]
pub struct GroupChoice {
    pub id: i64,
    pub title: String,
    pub selected: bool,
}

impl PostForm {
    /// Prefilled form for editing an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            text: post.text.clone(),
            group: post.group_id.map(|id| id.to_string()).unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Read the accepted fields out of a `multipart/form-data` body; anything
    /// else in the body is ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = PostForm::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) if is_too_large(&e) => {
                    form.too_large = true;
                    break;
                }
                Err(e) => return Err(AppError::BadRequest(format!("Malformed multipart body: {}", e))),
            };

            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "text" => form.text = read_text(field).await?,
                "group" => form.group = read_text(field).await?,
                "image-clear" => form.clear_image = !read_text(field).await?.is_empty(),
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let data = match field.bytes().await {
                        Ok(data) => data,
                        Err(e) if is_too_large(&e) => {
                            form.too_large = true;
                            break;
                        }
                        Err(e) => return Err(AppError::BadRequest(format!("Failed to read upload: {}", e))),
                    };
                    // Browsers send an empty, nameless part when no file was picked.
                    if !(file_name.is_empty() && data.is_empty()) {
                        form.image = Some(UploadedFile {
                            file_name,
                            content_type,
                            data: data.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate every field. On failure the errors are also kept on the form
    /// so it can be re-rendered as-is.
    pub async fn clean(&mut self, db: &Database) -> AppResult<Option<CleanedPost>> {
        self.text = self.text.trim().to_string();

        let mut errors = match self.validate() {
            Ok(()) => FormErrors::default(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = match self.group.trim() {
            "" => None,
            raw => {
                let group = match raw.parse::<i64>() {
                    Ok(id) => Group::gen_nullable(db, id).await?,
                    Err(_) => None,
                };
                if group.is_none() {
                    errors.add("group", INVALID_CHOICE);
                }
                group.map(|g| g.id)
            }
        };

        if self.too_large {
            errors.add("image", IMAGE_TOO_LARGE);
        }

        let image = match &self.image {
            None => None,
            Some(upload) => match validate_image(&upload.data) {
                Some(extension) => Some(ValidImage {
                    extension,
                    data: upload.data.clone(),
                }),
                None => {
                    errors.add("image", INVALID_IMAGE);
                    None
                }
            },
        };

        if !errors.is_empty() {
            self.errors = errors;
            return Ok(None);
        }

        Ok(Some(CleanedPost {
            text: self.text.clone(),
            group_id,
            image,
            clear_image: self.clear_image,
        }))
    }

    /// Group options with the current choice marked.
    pub fn group_choices(&self, groups: &[Group]) -> Vec<GroupChoice> {
        groups
            .iter()
            .map(|g| GroupChoice {
                id: g.id,
                title: g.title.clone(),
                selected: self.group.trim() == g.id.to_string(),
            })
            .collect()
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))
}

fn is_too_large(err: &MultipartError) -> bool {
    err.status() == StatusCode::PAYLOAD_TOO_LARGE
}

/// File extension for data that fully decodes as a supported image format.
pub fn validate_image(data: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(data).ok()?;
    image::load_from_memory_with_format(data, format).ok()?;
    format.extensions_str().first().copied()
}
