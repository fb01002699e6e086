//! Load, clean and overwrite a single icon file

use std::ffi::OsString;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::io::Reader as ImageReader;
use image::{ImageError, ImageFormat};

use crate::error::ProcessError;
use crate::transform::{clear_near_black, Threshold};

/// Outcome of a successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Pixels that were turned transparent by this pass
    pub cleared: usize,
}

/// Decode `path` as RGBA, clear near-black pixels and write it back as PNG.
///
/// The decoder is picked from the file contents, not the extension. The
/// file is always rewritten, even when nothing changed, so sources stored
/// without an alpha channel come out as RGBA.
pub fn process_file(
    path: impl AsRef<Path>,
    threshold: Threshold,
) -> Result<FileReport, ProcessError> {
    let path = path.as_ref();

    let mut img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(ImageError::IoError)
        .and_then(|reader| reader.decode())
        .map_err(|source| ProcessError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let (width, height) = img.dimensions();

    let cleared = clear_near_black(&mut img, threshold);
    log::debug!(
        "{}: {}x{}, cleared {} pixels (threshold {})",
        path.display(),
        width,
        height,
        cleared,
        threshold
    );

    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|source| ProcessError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    replace_file(path, &buf.into_inner())?;

    Ok(FileReport {
        path: path.to_path_buf(),
        width,
        height,
        cleared,
    })
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
/// The original stays intact if anything fails before the rename.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), ProcessError> {
    let tmp = temp_path(path);

    let result = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if let Err(source) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(ProcessError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// `dir/.name.tmp` next to `path`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TRANSPARENT;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = std::env::temp_dir()
            .join(format!("iconset-pixel-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_process_overwrites_in_place() {
        let dir = scratch_dir("overwrite");
        let path = dir.join("icon_16x16.png");

        let img = RgbaImage::from_fn(3, 2, |x, _| match x {
            0 => Rgba([10, 5, 20, 255]),
            1 => Rgba([40, 40, 40, 255]),
            _ => Rgba([255, 128, 0, 200]),
        });
        img.save(&path).unwrap();

        let report = process_file(&path, Threshold::default()).unwrap();
        assert_eq!(report.path, path);
        assert_eq!((report.width, report.height), (3, 2));
        assert_eq!(report.cleared, 2);

        let out = image::open(&path).unwrap().into_rgba8();
        assert_eq!(out.dimensions(), (3, 2));
        for y in 0..2 {
            assert_eq!(*out.get_pixel(0, y), TRANSPARENT);
            assert_eq!(*out.get_pixel(1, y), Rgba([40, 40, 40, 255]));
            assert_eq!(*out.get_pixel(2, y), Rgba([255, 128, 0, 200]));
        }
        // no temp file left behind
        assert_eq!(dir_entries(&dir), vec!["icon_16x16.png"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_second_pass_changes_nothing() {
        let dir = scratch_dir("idempotent");
        let path = dir.join("icon.png");
        RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])).save(&path).unwrap();

        assert_eq!(process_file(&path, Threshold::default()).unwrap().cleared, 16);
        let first = image::open(&path).unwrap().into_rgba8();

        assert_eq!(process_file(&path, Threshold::default()).unwrap().cleared, 0);
        let second = image::open(&path).unwrap().into_rgba8();
        assert_eq!(first, second);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rgb_source_gains_alpha() {
        let dir = scratch_dir("rgb");
        let path = dir.join("icon.png");
        RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([0, 0, 0]) } else { Rgb([90, 90, 90]) })
            .save(&path)
            .unwrap();

        process_file(&path, Threshold::default()).unwrap();

        let out = image::open(&path).unwrap();
        assert!(out.color().has_alpha());
        let out = out.into_rgba8();
        assert_eq!(*out.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*out.get_pixel(1, 0), Rgba([90, 90, 90, 255]));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_jpeg_contents_behind_png_name() {
        let dir = scratch_dir("jpeg");
        let path = dir.join("icon.png");
        RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]))
            .save_with_format(&path, ImageFormat::Jpeg)
            .unwrap();

        let report = process_file(&path, Threshold::default()).unwrap();
        assert_eq!(report.cleared, 64);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        let out = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert!(out.pixels().all(|p| *p == TRANSPARENT));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = scratch_dir("corrupt");
        let path = dir.join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = process_file(&path, Threshold::default()).unwrap_err();
        assert!(matches!(err, ProcessError::Decode { .. }));
        assert_eq!(err.path(), path.as_path());
        // untouched on failure
        assert_eq!(std::fs::read(&path).unwrap(), b"definitely not a png");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = scratch_dir("missing");
        let err = process_file(dir.join("nope.png"), Threshold::default()).unwrap_err();
        assert!(matches!(err, ProcessError::Decode { .. }));
        assert!(err.to_string().starts_with("decode error"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_failure_keeps_original() {
        let dir = scratch_dir("write-fail");
        let path = dir.join("icon.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255])).save(&path).unwrap();
        let original = std::fs::read(&path).unwrap();

        // a directory squatting on the temp name makes the write fail
        std::fs::create_dir(temp_path(&path)).unwrap();

        let err = process_file(&path, Threshold::default()).unwrap_err();
        assert!(matches!(err, ProcessError::Write { .. }));
        assert_eq!(err.path(), path.as_path());
        assert_eq!(std::fs::read(&path).unwrap(), original);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let path = Path::new("/icons/App.iconset/icon_16x16.png");
        assert_eq!(temp_path(path), PathBuf::from("/icons/App.iconset/.icon_16x16.png.tmp"));
    }
}
