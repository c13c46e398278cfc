//! Split multi-dimensional NIfTI-1 volumes into one file per index along
//! an axis.
//!
//! Reconstruction methods that expect one volume per channel cannot read a
//! 4D file holding all channels at once. This crate loads such a volume,
//! slices it along the chosen axis and writes every slice as a file of its
//! own, with the header (apart from `dim`) and header extensions of the
//! input. Voxels are moved as raw bytes, so no value is ever rescaled.
//!
//! # Example
//!
//! ```no_run
//! use nifti_split::{resolve_input_file, SplitOptions};
//! # use nifti_split::error::{Result, SplitError};
//!
//! # fn run() -> Result<(), SplitError> {
//! let input = resolve_input_file("dwi", "/data/subj01")?;
//! // writes /data/subj01/split/dwi_0.nii.gz, dwi_1.nii.gz, ...
//! SplitOptions::new(&input).axis(-1).split()?;
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;
#[macro_use]
extern crate num_derive;

pub mod error;
pub mod extension;
pub mod header;
pub mod path;
pub mod resolve;
pub mod split;
pub mod typedef;
pub mod volume;

pub use byteordered::Endianness;
pub use error::{NiftiError, Result, SplitError};
pub use extension::{Extender, Extension, ExtensionBlock};
pub use header::NiftiHeader;
pub use path::ImagePath;
pub use resolve::{find_image_file, resolve_input_file};
pub use split::{normalize_axis, split_volumes, SplitOptions};
pub use typedef::NiftiType;
pub use volume::Volume;
