//! Resolution of user supplied input strings to image files on disk.

use crate::error::{Result, SplitError};
use crate::path::ImagePath;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffixes tried, in order, when a candidate does not name a file.
const SEARCH_SUFFIXES: [&str; 6] = [".nii", ".nii.gz", ".hdr", ".hdr.gz", ".img", ".img.gz"];

/// Look up the image file named by `candidate`, inferring a missing
/// extension. Returns the canonical path of the first existing file: the
/// candidate itself if it carries an image extension, then the candidate
/// with each of the NIfTI suffixes appended.
pub fn find_image_file<P: AsRef<Path>>(candidate: P) -> Option<PathBuf> {
    let candidate = candidate.as_ref();
    if candidate.is_file() && ImagePath::parse(candidate).is_some() {
        return fs::canonicalize(candidate).ok();
    }
    SEARCH_SUFFIXES
        .iter()
        .map(|suffix| {
            let mut name = OsString::from(candidate.as_os_str());
            name.push(suffix);
            PathBuf::from(name)
        })
        .find(|p| p.is_file())
        .and_then(|p| fs::canonicalize(p).ok())
}

/// Resolve `input_file` on its own first (absolute, relative to the
/// working directory, or missing its extension), then relative to
/// `base_directory`.
///
/// # Example
///
/// ```no_run
/// use nifti_split::resolve_input_file;
/// # use nifti_split::error::{Result, SplitError};
///
/// # fn run() -> Result<(), SplitError> {
/// // finds "dwi.nii.gz" in the working directory
/// let cwd = std::env::current_dir().map_err(SplitError::WorkingDirectory)?;
/// let path = resolve_input_file("dwi", cwd)?;
/// # Ok(())
/// # }
/// ```
pub fn resolve_input_file<P: AsRef<Path>>(input_file: &str, base_directory: P) -> Result<PathBuf, SplitError> {
    find_image_file(input_file)
        .or_else(|| find_image_file(base_directory.as_ref().join(input_file)))
        .ok_or_else(|| SplitError::FileNotFound(input_file.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn exact_file_wins() {
        let dir = tempdir().unwrap();
        let _ = File::create(dir.path().join("scan.nii")).unwrap();
        let _ = File::create(dir.path().join("scan.nii.gz")).unwrap();
        let found = find_image_file(dir.path().join("scan.nii")).unwrap();
        assert_eq!(found.file_name().unwrap(), "scan.nii");
    }

    #[test]
    fn files_without_image_extension_are_skipped() {
        let dir = tempdir().unwrap();
        let _ = File::create(dir.path().join("scan")).unwrap();
        let _ = File::create(dir.path().join("scan.nii")).unwrap();
        let found = resolve_input_file("scan", dir.path()).unwrap();
        assert_eq!(found, fs::canonicalize(dir.path().join("scan.nii")).unwrap());

        let _ = File::create(dir.path().join("notes")).unwrap();
        assert!(matches!(
            resolve_input_file("notes", dir.path()),
            Err(SplitError::FileNotFound(_))
        ));
    }

    #[test]
    fn extension_is_inferred_in_order() {
        let dir = tempdir().unwrap();
        let _ = File::create(dir.path().join("scan.hdr")).unwrap();
        let _ = File::create(dir.path().join("scan.nii.gz")).unwrap();
        let found = find_image_file(dir.path().join("scan")).unwrap();
        assert_eq!(found.file_name().unwrap(), "scan.nii.gz");
    }

    #[test]
    fn directories_are_not_images() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("scan")).unwrap();
        assert_eq!(find_image_file(dir.path().join("scan")), None);
    }

    #[test]
    fn falls_back_to_base_directory() {
        let dir = tempdir().unwrap();
        let _ = File::create(dir.path().join("t1.nii")).unwrap();
        let found = resolve_input_file("t1", dir.path()).unwrap();
        assert_eq!(found, fs::canonicalize(dir.path().join("t1.nii")).unwrap());
    }

    #[test]
    fn reports_original_input() {
        let dir = tempdir().unwrap();
        match resolve_input_file("does/not/exist", dir.path()) {
            Err(SplitError::FileNotFound(input)) => assert_eq!(input, "does/not/exist"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
