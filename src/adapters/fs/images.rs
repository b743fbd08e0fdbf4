use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::media::{decode_rgb, has_supported_extension};

pub fn open_rgb(path: &Path) -> DomainResult<RgbImage> {
    let bytes = fs::read(path)?;
    decode_rgb(&bytes)
}

/// Regular files in `dir` with a supported image extension, sorted by name.
pub fn list_images(dir: &Path) -> DomainResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DomainError::NotFound(format!("not a directory: {}", dir.display())));
    }
    let mut out: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && has_supported_extension(p))
        .collect();
    out.sort();
    Ok(out)
}

/// Copies `src` into `dest_dir` under the same file name, returning the new path.
pub fn copy_into(src: &Path, dest_dir: &Path) -> DomainResult<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| DomainError::InvalidInput(format!("no file name: {}", src.display())))?;
    let dest = dest_dir.join(name);
    fs::copy(src, &dest)?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    #[test]
    fn opens_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        RgbImage::from_pixel(5, 2, Rgb([1, 2, 3])).save_with_format(&path, ImageFormat::Png).unwrap();
        assert_eq!(open_rgb(&path).unwrap().dimensions(), (5, 2));
    }

    #[test]
    fn copies_under_same_name() {
        let src_dir = tempfile::tempdir().unwrap();
        let dst_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("logo.jpg");
        fs::write(&src, b"abc").unwrap();
        let dest = copy_into(&src, dst_dir.path()).unwrap();
        assert_eq!(dest, dst_dir.path().join("logo.jpg"));
        assert_eq!(fs::read(dest).unwrap(), b"abc");
    }

    #[test]
    fn lists_only_supported_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.webp"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("d.jpg")).unwrap();
        let names: Vec<String> = list_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.webp"]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        assert!(matches!(list_images(Path::new("/no/such/dir")), Err(DomainError::NotFound(_))));
    }
}
