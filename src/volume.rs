//! Module holding an in-memory NIfTI-1 volume and its file I/O.
//!
//! Voxels are kept as the raw bytes found on disk (column-major order, in
//! the byte order of the header), so that slicing and writing never
//! reinterpret or rescale values.

use crate::error::{NiftiError, Result};
use crate::extension::ExtensionBlock;
use crate::header::{NiftiHeader, HEADER_SIZE};
use crate::path::{is_gz_file, FilePair};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use ndarray::{ArrayViewD, Axis, IxDyn, ShapeBuilder};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A NIfTI-1 volume fully contained in memory: header, extension region
/// and raw voxel data.
#[derive(Debug, PartialEq, Clone)]
pub struct Volume {
    header: NiftiHeader,
    extensions: ExtensionBlock,
    shape: Vec<usize>,
    bytes_per_voxel: usize,
    raw_data: Vec<u8>,
}

impl Volume {
    /// Assemble a volume, checking that `raw_data` holds exactly the number
    /// of bytes described by the header.
    pub fn new(header: NiftiHeader, extensions: ExtensionBlock, raw_data: Vec<u8>) -> Result<Self> {
        let shape = header.shape()?;
        let bytes_per_voxel = header.bytes_per_voxel()?;
        let expected = expected_len(&shape, bytes_per_voxel)?;
        if raw_data.len() != expected {
            return Err(NiftiError::IncompatibleLength(raw_data.len(), expected));
        }
        Ok(Volume {
            header,
            extensions,
            shape,
            bytes_per_voxel,
            raw_data,
        })
    }

    /// Read a volume from the file system. `.nii` files hold everything;
    /// for `.hdr` and `.img` files the counterpart file is looked up next
    /// to the given one. Files ending in `.gz` are decoded as GZip streams.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nifti_split::Volume;
    /// # use nifti_split::error::Result;
    ///
    /// # fn run() -> Result<()> {
    /// let volume = Volume::from_file("dwi.nii.gz")?;
    /// println!("{:?}", volume.shape());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(pair) = FilePair::of(&path) {
            return Self::from_file_pair(&pair);
        }
        let file = BufReader::new(File::open(&path)?);
        if is_gz_file(&path) {
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }

    /// Read a single-file (`.nii`) volume from a stream, starting at the
    /// first byte of the header. The voxels must not start inside the header.
    pub fn from_reader<R: Read>(mut source: R) -> Result<Self> {
        let header = NiftiHeader::from_reader(&mut source)?;
        let offset = header.voxel_offset()?;
        if offset < HEADER_SIZE as u64 {
            return Err(NiftiError::InvalidOffset(header.vox_offset));
        }
        let extensions = ExtensionBlock::from_reader(&mut source, offset - HEADER_SIZE as u64)?;
        let raw_data = read_voxels(source, &header)?;
        Self::new(header, extensions, raw_data)
    }

    fn from_file_pair(pair: &FilePair) -> Result<Self> {
        let (header, extensions) = read_header_file(open_either(&pair.header, &pair.alternative_header())?)?;

        let mut image = open_either(&pair.image, &pair.alternative_image()).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => NiftiError::MissingVolumeFile(e),
            _ => NiftiError::Io(e),
        })?;

        let offset = header.voxel_offset()?;
        let _ = io::copy(&mut (&mut image).take(offset), &mut io::sink())?;
        let raw_data = read_voxels(image, &header)?;
        Self::new(header, extensions, raw_data)
    }

    /// Write the volume to the file system, in the layout implied by the
    /// file name (see [`from_file`]). Files ending in `.gz` are compressed.
    ///
    /// [`from_file`]: #method.from_file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        match FilePair::of(&path) {
            Some(pair) => {
                create_file(&pair.header, |w| {
                    self.header.write_to(&mut *w)?;
                    w.write_all(self.extensions.as_bytes())?;
                    Ok(())
                })?;
                create_file(&pair.image, |w| {
                    let offset = self.header.vox_offset.max(0.) as usize;
                    w.write_all(&vec![0; offset])?;
                    w.write_all(&self.raw_data)?;
                    Ok(())
                })
            }
            None => create_file(&path, |w| self.to_writer(w)),
        }
    }

    /// Write the volume as a single-file stream: header, extension region,
    /// then voxels.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        self.header.write_to(&mut writer)?;
        writer.write_all(self.extensions.as_bytes())?;
        writer.write_all(&self.raw_data)?;
        Ok(())
    }

    /// Extract the sub-volume at `index` along `axis`. The result has one
    /// dimension less (a rank-1 volume yields single voxels of shape `[1]`),
    /// and keeps this volume's header, apart from `dim`, and extensions.
    pub fn sub_volume(&self, axis: usize, index: usize) -> Result<Volume> {
        if axis >= self.rank() || index >= self.shape[axis] {
            return Err(NiftiError::OutOfBounds(axis, index));
        }
        let bytes = self.byte_view()?;
        let plane = bytes.index_axis(Axis(axis + 1), index);
        // the reversed view iterates in column-major order of the original
        let raw_data: Vec<u8> = plane.t().iter().copied().collect();

        let mut shape = self.shape.clone();
        let _ = shape.remove(axis);
        if shape.is_empty() {
            shape.push(1);
        }
        let header = self.header.reshaped(&shape)?;
        Ok(Volume {
            header,
            extensions: self.extensions.clone(),
            shape,
            bytes_per_voxel: self.bytes_per_voxel,
            raw_data,
        })
    }

    /// View the raw data as an array of bytes with shape
    /// `[bytes_per_voxel, d1, .., dN]`, where axis `k + 1` is volume axis `k`.
    pub fn byte_view(&self) -> Result<ArrayViewD<u8>> {
        let mut shape = Vec::with_capacity(self.rank() + 1);
        shape.push(self.bytes_per_voxel);
        shape.extend_from_slice(&self.shape);
        Ok(ArrayViewD::from_shape(IxDyn(&shape).f(), &self.raw_data[..])?)
    }

    /// The volume's header.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// The extension region stored between header and voxels.
    pub fn extensions(&self) -> &ExtensionBlock {
        &self.extensions
    }

    /// Extent of each dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Width of one voxel in bytes.
    pub fn bytes_per_voxel(&self) -> usize {
        self.bytes_per_voxel
    }

    /// The voxels as stored on disk.
    pub fn raw_data(&self) -> &[u8] {
        &self.raw_data
    }
}

fn expected_len(shape: &[usize], bytes_per_voxel: usize) -> Result<usize> {
    shape
        .iter()
        .try_fold(bytes_per_voxel, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NiftiError::VolumeTooLarge(shape.to_vec()))
}

/// Read the voxels described by `header`. The buffer grows with the data
/// actually read, so a header claiming more than the stream holds fails
/// with `IncompatibleLength`.
fn read_voxels<R: Read>(source: R, header: &NiftiHeader) -> Result<Vec<u8>> {
    let nbytes = expected_len(&header.shape()?, header.bytes_per_voxel()?)?;
    debug!("Reading volume of {} bytes", nbytes);
    let mut raw_data = Vec::new();
    let _ = source.take(nbytes as u64).read_to_end(&mut raw_data)?;
    if raw_data.len() != nbytes {
        return Err(NiftiError::IncompatibleLength(raw_data.len(), nbytes));
    }
    Ok(raw_data)
}

fn read_header_file<R: Read>(mut source: R) -> Result<(NiftiHeader, ExtensionBlock)> {
    let header = NiftiHeader::from_reader(&mut source)?;
    let extensions = ExtensionBlock::read_to_end(source)?;
    Ok((header, extensions))
}

/// Open `path`, or `alternative` if `path` does not exist.
fn open_either(path: &Path, alternative: &Path) -> io::Result<Box<dyn Read>> {
    open_file(path).or_else(|e| match e.kind() {
        io::ErrorKind::NotFound => open_file(alternative),
        _ => Err(e),
    })
}

fn open_file<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(&path)?);
    if is_gz_file(&path) {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

fn create_file<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let gz = is_gz_file(&path);
    let mut writer = BufWriter::new(File::create(path)?);
    if gz {
        let mut e = GzEncoder::new(writer, Compression::default());
        write(&mut e)?;
        e.finish()?.flush()?;
    } else {
        write(&mut writer)?;
        writer.flush()?;
    }
    Ok(())
}
