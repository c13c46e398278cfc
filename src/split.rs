//! Splitting of a volume into one file per index along an axis.
//!
//! The split is sequential: positions are extracted and written one at a
//! time in ascending order. A failed write aborts the split and leaves the
//! files written so far in place.

use crate::error::{Result, SplitError};
use crate::path::ImagePath;
use crate::volume::Volume;
use log::{debug, info};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the output directory created next to the input by default.
pub const DEFAULT_OUTPUT_FOLDER: &str = "split";

/// Convert a possibly negative axis index into a dimension of a volume
/// of the given rank. `-1` addresses the last dimension.
///
/// # Example
///
/// ```
/// # use nifti_split::normalize_axis;
/// assert_eq!(normalize_axis(-1, 4).unwrap(), 3);
/// assert_eq!(normalize_axis(0, 4).unwrap(), 0);
/// assert!(normalize_axis(4, 4).is_err());
/// ```
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize, SplitError> {
    let normalized = if axis < 0 { axis + rank as isize } else { axis };
    if normalized < 0 || normalized as usize >= rank {
        return Err(SplitError::AxisOutOfRange { axis, rank });
    }
    Ok(normalized as usize)
}

/// Options and flags which can be used to configure how a volume is split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Path of the volume to split
    path: PathBuf,
    /// Axis to split along, negative values count from the last
    axis: isize,
    /// Output directory, `split` next to the input if unset
    output_folder: Option<PathBuf>,
}

impl SplitOptions {
    /// Split the volume at `path` along its last axis into the default
    /// output folder.
    pub fn new<P: AsRef<Path>>(path: P) -> SplitOptions {
        SplitOptions {
            path: path.as_ref().to_owned(),
            axis: -1,
            output_folder: None,
        }
    }

    /// Set the axis to split along.
    pub fn axis(mut self, axis: isize) -> Self {
        self.axis = axis;
        self
    }

    /// Set the directory receiving the split files.
    pub fn output_folder<P: AsRef<Path>>(mut self, output_folder: P) -> Self {
        self.output_folder = Some(output_folder.as_ref().to_owned());
        self
    }

    /// Directory the split files will be written to: the configured output
    /// folder made absolute, or `split` next to the input.
    pub fn output_directory(&self) -> Result<PathBuf, SplitError> {
        let image = self.image_path()?;
        match &self.output_folder {
            Some(folder) if folder.is_absolute() => Ok(folder.clone()),
            Some(folder) => env::current_dir()
                .map(|cwd| cwd.join(folder))
                .map_err(|err| SplitError::CreateDir {
                    path: folder.clone(),
                    err,
                }),
            None => Ok(image.directory().join(DEFAULT_OUTPUT_FOLDER)),
        }
    }

    /// Paths of the files a split into `count` parts produces, in order.
    pub fn output_files(&self, count: usize) -> Result<Vec<PathBuf>, SplitError> {
        let image = self.image_path()?;
        let directory = self.output_directory()?;
        Ok((0..count)
            .map(|i| image.indexed_sibling(&directory, i))
            .collect())
    }

    /// Load the volume and write every sub-volume along the axis.
    ///
    /// The volume is loaded and the axis validated before the output
    /// directory is created, so an invalid axis leaves the file system as
    /// it was. Returns once every position has been written.
    pub fn split(&self) -> Result<(), SplitError> {
        let directory = self.output_directory()?;

        let volume = Volume::from_file(&self.path).map_err(|err| SplitError::Load {
            path: self.path.clone(),
            err,
        })?;
        let axis = normalize_axis(self.axis, volume.rank())?;
        let count = volume.shape()[axis];
        info!(
            "Splitting {} of shape {:?} along axis {} into {} volumes",
            self.path.display(),
            volume.shape(),
            axis,
            count
        );
        if volume.extensions().len() > 4 {
            debug!("Carrying {} bytes of header extensions", volume.extensions().len() - 4);
        }

        fs::create_dir_all(&directory).map_err(|err| SplitError::CreateDir {
            path: directory.clone(),
            err,
        })?;

        for (i, out) in self.output_files(count)?.into_iter().enumerate() {
            volume
                .sub_volume(axis, i)
                .and_then(|sub| sub.to_file(&out))
                .map_err(|err| SplitError::Write {
                    path: out.clone(),
                    err,
                })?;
            debug!("Wrote {}", out.display());
        }
        Ok(())
    }

    fn image_path(&self) -> Result<ImagePath, SplitError> {
        ImagePath::parse(&self.path).ok_or_else(|| SplitError::UnrecognizedExtension(self.path.clone()))
    }
}

/// Split the volume at `resolved_path` along `axis`, writing
/// `{basename}_{i}.{extension}` files into `output_folder` (or `split` next
/// to the input).
pub fn split_volumes<P, Q>(resolved_path: P, axis: isize, output_folder: Option<Q>) -> Result<(), SplitError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let options = SplitOptions::new(resolved_path).axis(axis);
    match output_folder {
        Some(folder) => options.output_folder(folder).split(),
        None => options.split(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_axes() {
        assert_eq!(normalize_axis(-1, 4).unwrap(), 3);
        assert_eq!(normalize_axis(-4, 4).unwrap(), 0);
        assert_eq!(normalize_axis(3, 4).unwrap(), 3);
        assert_eq!(normalize_axis(-1, 1).unwrap(), 0);
    }

    #[test]
    fn axes_out_of_range() {
        for &axis in &[4, 5, -5, -100] {
            match normalize_axis(axis, 4) {
                Err(SplitError::AxisOutOfRange { axis: a, rank: 4 }) => assert_eq!(a, axis),
                other => panic!("unexpected result for axis {}: {:?}", axis, other),
            }
        }
    }

    #[test]
    fn default_output_directory() {
        let options = SplitOptions::new("/data/subj/scan.nii");
        assert_eq!(
            options.output_directory().unwrap(),
            PathBuf::from("/data/subj/split")
        );
        assert_eq!(
            options.output_files(2).unwrap(),
            vec![
                PathBuf::from("/data/subj/split/scan_0.nii"),
                PathBuf::from("/data/subj/split/scan_1.nii"),
            ]
        );
    }

    #[test]
    fn explicit_output_directory() {
        let options = SplitOptions::new("/data/dwi.nii.gz").output_folder("/tmp/out");
        assert_eq!(
            options.output_files(1).unwrap(),
            vec![PathBuf::from("/tmp/out/dwi_0.nii.gz")]
        );

        let relative = SplitOptions::new("/data/dwi.nii.gz").output_folder("channels");
        let dir = relative.output_directory().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.ends_with("channels"));
    }

    #[test]
    fn unrecognized_extension() {
        let options = SplitOptions::new("/data/scan.txt");
        assert!(matches!(
            options.split(),
            Err(SplitError::UnrecognizedExtension(_))
        ));
    }
}
