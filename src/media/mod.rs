//! Uploaded image storage and gallery listing

pub mod gallery;
pub mod upload;

pub use gallery::{list_images, GalleryEntry, IMAGE_EXTENSIONS};
pub use upload::{generate_filename, PendingUpload, StoredImage, UploadDir, UploadError};

/// URL prefix under which the images directory is served
pub const IMAGES_URL_PREFIX: &str = "/images";

/// Public URL for a file in the images directory
pub fn public_url(file_name: &str) -> String {
    format!("{}/{}", IMAGES_URL_PREFIX, file_name)
}
