//! Page-image provider.
//!
//! Turns command line inputs (image files and directories of images) into the
//! ordered page list the flipbook consumes. Every failure is reported here,
//! before any page reaches the flip controller.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::pagination::{Page, PageImage};

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

const SAMPLE_PAGE_COUNT: usize = 6;

#[derive(Debug, Error)]
pub enum PageSourceError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error(
        "{} is not a supported page image (expected one of: png, jpg, jpeg, gif, webp, bmp)",
        .0.display()
    )]
    NotAnImage(PathBuf),
    #[error("could not read image {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
    #[error("could not list directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("no page images found in {}", .0.display())]
    NoImages(PathBuf),
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Load pages from image files and directories, in argument order.
///
/// Directory contents are read one level deep and ordered by file name with
/// digit runs compared numerically, so `page10.png` follows `page9.png`.
pub fn load_pages(inputs: &[PathBuf]) -> Result<Vec<Page>, PageSourceError> {
    let mut files = Vec::new();
    for input in inputs {
        if !input.exists() {
            return Err(PageSourceError::NotFound(input.clone()));
        }
        if input.is_dir() {
            let found = list_images(input)?;
            if found.is_empty() {
                return Err(PageSourceError::NoImages(input.clone()));
            }
            files.extend(found);
        } else if has_image_extension(input) {
            files.push(input.clone());
        } else {
            return Err(PageSourceError::NotAnImage(input.clone()));
        }
    }

    let total = files.len();
    let mut pages = Vec::with_capacity(total);
    for (i, path) in files.iter().enumerate() {
        info!("Reading page {} of {}...", i + 1, total);
        pages.push(Page::Image(read_page(path)?));
    }
    info!("Loaded {total} pages");
    Ok(pages)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, PageSourceError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            // A single bad entry, such as a dangling symlink, costs one page
            Err(err) if err.depth() > 0 => {
                warn!("Skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
            Err(source) => {
                return Err(PageSourceError::Directory {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && has_image_extension(path) {
            images.push(path.to_path_buf());
        } else {
            debug!("Skipping non-image entry {path:?}");
        }
    }
    images.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    Ok(images)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read_page(path: &Path) -> Result<PageImage, PageSourceError> {
    let size = imagesize::size(path).map_err(|e| PageSourceError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(PageImage::new(path.to_string_lossy()).with_dimensions(size.width, size.height))
}

/// Compare names so that runs of digits order by numeric value
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_number(&mut left);
                let rhs = take_number(&mut right);
                let by_value = lhs
                    .trim_start_matches('0')
                    .len()
                    .cmp(&rhs.trim_start_matches('0').len())
                    .then_with(|| lhs.trim_start_matches('0').cmp(rhs.trim_start_matches('0')));
                if by_value != Ordering::Equal {
                    return by_value;
                }
            }
            (Some(x), Some(y)) => {
                let by_char = x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase());
                if by_char != Ordering::Equal {
                    return by_char;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Built-in book for trying the viewer without any files
pub fn sample_pages() -> Vec<Page> {
    (1..=SAMPLE_PAGE_COUNT)
        .map(|n| {
            let image = PageImage::new(format!("sample://page-{n}")).with_dimensions(800, 1120);
            Page::Image(image)
        })
        .collect()
}
