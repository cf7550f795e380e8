//! Gallery listing of the images directory

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use super::public_url;

/// Extensions (lowercase, without the dot) shown in the gallery
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// One image in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub name: String,
    pub url: String,
}

/// Whether `file_name` ends in an allow-listed image extension (any case)
pub fn is_image_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// List image files in `dir`, sorted by name
pub fn list_images(dir: &Path) -> io::Result<Vec<GalleryEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if is_image_name(&name) {
            entries.push(GalleryEntry {
                url: public_url(&name),
                name,
            });
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = TempDir::new().unwrap();
        for name in ["b.PNG", "a.jpg", "c.jpeg", "d.Gif", "e.webp", "notes.txt", "png"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let names: Vec<String> = list_images(dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg", "d.Gif", "e.webp"]);
    }

    #[test]
    fn entries_carry_public_urls() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("1700000000000-42.png"), b"x").unwrap();

        let entries = list_images(dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![GalleryEntry {
                name: "1700000000000-42.png".to_string(),
                url: "/images/1700000000000-42.png".to_string(),
            }]
        );
    }

    #[test]
    fn skips_directories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("album.png")).unwrap();
        assert!(list_images(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_images(&dir.path().join("removed")).is_err());
    }
}
