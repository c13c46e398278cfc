//! File name handling for NIfTI-1 images: recognized extensions,
//! gzip detection and the header/image file pairing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Recognized image extensions, compound suffixes first so that
/// `scan.nii.gz` is split as `scan` + `nii.gz` rather than `scan.nii` + `gz`.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["nii.gz", "hdr.gz", "img.gz", "nii", "hdr", "img"];

/// Check whether the given path ends with the `.gz` extension.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// An image file path separated into its directory, base name and
/// (possibly compound) extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath {
    directory: PathBuf,
    basename: String,
    extension: &'static str,
}

impl ImagePath {
    /// Split `path` into its components. Returns `None` if the file name
    /// does not end in one of [`IMAGE_EXTENSIONS`] or has nothing before it.
    ///
    /// [`IMAGE_EXTENSIONS`]: ./constant.IMAGE_EXTENSIONS.html
    pub fn parse<P: AsRef<Path>>(path: P) -> Option<ImagePath> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        IMAGE_EXTENSIONS.iter().find_map(|&extension| {
            let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
            if stem.is_empty() {
                return None;
            }
            Some(ImagePath {
                directory: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                basename: stem.to_owned(),
                extension,
            })
        })
    }

    /// The directory holding the file.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file name without its extension.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// The extension without a leading dot, e.g. `nii.gz`.
    pub fn extension(&self) -> &'static str {
        self.extension
    }

    /// Whether the file is one half of a `.hdr`/`.img` pair.
    pub fn is_pair(&self) -> bool {
        !self.extension.starts_with("nii")
    }

    /// Path of a file in `directory` sharing this extension, named
    /// `{basename}_{index}.{extension}`.
    pub fn indexed_sibling<P: AsRef<Path>>(&self, directory: P, index: usize) -> PathBuf {
        directory
            .as_ref()
            .join(format!("{}_{}.{}", self.basename, index, self.extension))
    }
}

/// Header and image files of an analyze-style pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// The `.hdr` or `.hdr.gz` file.
    pub header: PathBuf,
    /// The `.img` or `.img.gz` file.
    pub image: PathBuf,
}

impl FilePair {
    /// Derive both files of a pair from either one of them, keeping the
    /// gzip suffix as given. Returns `None` for single-file images.
    pub fn of<P: AsRef<Path>>(path: P) -> Option<FilePair> {
        let parsed = ImagePath::parse(&path)?;
        let gz = if is_gz_file(&path) { ".gz" } else { "" };
        let with = |ext: &str| {
            parsed
                .directory
                .join(format!("{}.{}{}", parsed.basename, ext, gz))
        };
        if !parsed.is_pair() {
            return None;
        }
        Some(FilePair {
            header: with("hdr"),
            image: with("img"),
        })
    }

    /// The header file with its gzip suffix toggled, tried when the header
    /// was not compressed the same way as the given file.
    pub fn alternative_header(&self) -> PathBuf {
        toggle_gz(&self.header)
    }

    /// The image file with its gzip suffix toggled, tried when the image
    /// was not compressed the same way as the given file.
    pub fn alternative_image(&self) -> PathBuf {
        toggle_gz(&self.image)
    }
}

fn toggle_gz(path: &Path) -> PathBuf {
    if is_gz_file(path) {
        path.with_extension("")
    } else {
        let mut name = OsString::from(path.as_os_str());
        name.push(".gz");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gz_detection() {
        assert!(is_gz_file("/data/dwi.nii.gz"));
        assert!(is_gz_file("t1.hdr.gz"));
        assert!(!is_gz_file("t1.nii"));
        assert!(!is_gz_file("gz"));
    }

    #[test]
    fn parse_compound_extension() {
        let p = ImagePath::parse("/data/subj01/dwi.nii.gz").unwrap();
        assert_eq!(p.directory(), Path::new("/data/subj01"));
        assert_eq!(p.basename(), "dwi");
        assert_eq!(p.extension(), "nii.gz");
        assert!(!p.is_pair());

        let p = ImagePath::parse("scan.v2.hdr").unwrap();
        assert_eq!(p.directory(), Path::new(""));
        assert_eq!(p.basename(), "scan.v2");
        assert_eq!(p.extension(), "hdr");
        assert!(p.is_pair());
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(ImagePath::parse("notes.txt"), None);
        assert_eq!(ImagePath::parse(".nii"), None);
        assert_eq!(ImagePath::parse("scan"), None);
    }

    #[test]
    fn indexed_sibling_names() {
        let p = ImagePath::parse("/in/scan.nii").unwrap();
        assert_eq!(
            p.indexed_sibling("/in/split", 0),
            PathBuf::from("/in/split/scan_0.nii")
        );
        assert_eq!(
            p.indexed_sibling("/out", 12),
            PathBuf::from("/out/scan_12.nii")
        );
    }

    #[test]
    fn pair_files() {
        let pair = FilePair::of("/in/t1.hdr.gz").unwrap();
        assert_eq!(pair.header, PathBuf::from("/in/t1.hdr.gz"));
        assert_eq!(pair.image, PathBuf::from("/in/t1.img.gz"));
        assert_eq!(pair.alternative_header(), PathBuf::from("/in/t1.hdr"));
        assert_eq!(pair.alternative_image(), PathBuf::from("/in/t1.img"));

        let pair = FilePair::of("t1.img").unwrap();
        assert_eq!(pair.header, PathBuf::from("t1.hdr"));
        assert_eq!(pair.alternative_header(), PathBuf::from("t1.hdr.gz"));
        assert_eq!(pair.alternative_image(), PathBuf::from("t1.img.gz"));

        assert_eq!(FilePair::of("t1.nii.gz"), None);
    }
}
