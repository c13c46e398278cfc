//! Types for error handling go here.
use crate::typedef::NiftiType;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originating from reading or
    /// writing NIfTI-1 files.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum NiftiError {
        /// An invalid NIfTI-1 header or file was read.
        InvalidFormat {
            display("Invalid NIfTI-1 file")
        }
        /// A header field holds a code the format does not define.
        InvalidCode(typename: &'static str, code: i16) {
            display("invalid code `{}` for header field {}", code, typename)
        }
        /// The volume data type cannot be sliced byte-wise.
        UnsupportedDataType(t: NiftiType) {
            display("unsupported data type {:?}", t)
        }
        /// The `bitpix` field disagrees with the declared data type.
        InconsistentBitpix(t: NiftiType, bitpix: i16) {
            display("bitpix {} does not match data type {:?}", bitpix, t)
        }
        /// The `dim` field cannot describe the requested shape.
        InconsistentDim(rank: usize) {
            display("cannot describe a volume of rank {} in a NIfTI-1 header", rank)
        }
        /// The `vox_offset` field does not point at a usable position.
        InvalidOffset(offset: f32) {
            display("invalid voxel offset {}", offset)
        }
        /// The header describes more voxel bytes than can be addressed.
        VolumeTooLarge(shape: Vec<usize>) {
            display("volume of shape {:?} is too large to be held in memory", shape)
        }
        /// The volume buffer does not hold as many bytes as the header implies.
        IncompatibleLength(got: usize, expected: usize) {
            display("volume has {} bytes, but the header describes {}", got, expected)
        }
        /// Attempted to index the volume outside of its boundaries.
        OutOfBounds(axis: usize, index: usize) {
            display("index {} is out of bounds along axis {}", index, axis)
        }
        /// The volume counterpart of a header file could not be found.
        MissingVolumeFile(err: IOError) {
            display("volume file not found: {}", err)
            source(err)
        }
        /// The raw volume buffer could not be viewed as an array.
        Shape(err: ndarray::ShapeError) {
            from()
            display("{}", err)
            source(err)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            display("{}", err)
            source(err)
        }
    }
}

quick_error! {
    /// Error type of a split operation, from path resolution to the last
    /// written sub-volume.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum SplitError {
        /// The input could not be resolved to an image file.
        FileNotFound(input: String) {
            display("No NIfTI file could be found using the path {}", input)
        }
        /// The working directory could not be determined.
        WorkingDirectory(err: IOError) {
            display("cannot access the working directory: {}", err)
            source(err)
        }
        /// The input file name has no recognized image extension.
        UnrecognizedExtension(path: PathBuf) {
            display("{} does not have a NIfTI file extension", path.display())
        }
        /// The input file exists but could not be read as a volume.
        Load { path: PathBuf, err: NiftiError } {
            display("failed to load {}: {}", path.display(), err)
            source(err)
        }
        /// The requested axis does not address a dimension of the volume.
        AxisOutOfRange { axis: isize, rank: usize } {
            display("axis {} is out of range for a volume of rank {}", axis, rank)
        }
        /// The output directory could not be created.
        CreateDir { path: PathBuf, err: IOError } {
            display("failed to create output directory {}: {}", path.display(), err)
            source(err)
        }
        /// A sub-volume could not be extracted or written.
        Write { path: PathBuf, err: NiftiError } {
            display("failed to write {}: {}", path.display(), err)
            source(err)
        }
    }
}

/// Alias type for results originating from this crate.
pub type Result<T, E = NiftiError> = ::std::result::Result<T, E>;
