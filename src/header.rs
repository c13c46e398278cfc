//! This module defines the `NiftiHeader` struct, which is used
//! to provide important information about NIFTI-1 volumes.
//!
//! A header is read once per input file and written back, unchanged apart
//! from its `dim` field, for every sub-volume derived from that file.

use crate::error::{NiftiError, Result};
use crate::path::is_gz_file;
use crate::typedef::NiftiType;
use byteordered::{ByteOrdered, Endianness};
use flate2::bufread::GzDecoder;
use num_traits::FromPrimitive;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Size of a NIfTI-1 header in bytes, excluding the extender.
pub const HEADER_SIZE: usize = 348;
/// Magic code for NIFTI-1 header files (extension ".hdr[.gz]").
pub const MAGIC_CODE_NI1: &[u8; 4] = b"ni1\0";
/// Magic code for full NIFTI-1 files (extension ".nii[.gz]").
pub const MAGIC_CODE_NIP1: &[u8; 4] = b"n+1\0";

/// The NIFTI-1 header data type.
/// All fields are public and named after the specification's header file.
///
/// # Example
///
/// ```no_run
/// use nifti_split::NiftiHeader;
/// # use nifti_split::error::Result;
///
/// # fn run() -> Result<()> {
/// let hdr = NiftiHeader::from_file("dwi.nii.gz")?;
/// assert_eq!(hdr.rank()?, 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Header size, must be 348
    pub sizeof_hdr: i32,
    /// Unused in NIFTI-1
    pub data_type: [u8; 10],
    /// Unused in NIFTI-1
    pub db_name: [u8; 18],
    /// Unused in NIFTI-1
    pub extents: i32,
    /// Unused in NIFTI-1
    pub session_error: i16,
    /// Unused in NIFTI-1
    pub regular: u8,
    /// MRI slice ordering
    pub dim_info: u8,
    /// Data array dimensions
    pub dim: [u16; 8],
    /// 1st intent parameter
    pub intent_p1: f32,
    /// 2nd intent parameter
    pub intent_p2: f32,
    /// 3rd intent parameter
    pub intent_p3: f32,
    /// NIFTI_INTENT_* code
    pub intent_code: i16,
    /// Defines the data type!
    pub datatype: i16,
    /// Number of bits per voxel
    pub bitpix: i16,
    /// First slice index
    pub slice_start: i16,
    /// Grid spacings
    pub pixdim: [f32; 8],
    /// Offset into .nii file to reach the volume
    pub vox_offset: f32,
    /// Data scaling: slope
    pub scl_slope: f32,
    /// Data scaling: offset
    pub scl_inter: f32,
    /// Last slice index
    pub slice_end: i16,
    /// Slice timing order
    pub slice_code: u8,
    /// Units of pixdim[1..4]
    pub xyzt_units: u8,
    /// Max display intensity
    pub cal_max: f32,
    /// Min display intensity
    pub cal_min: f32,
    /// Time for 1 slice
    pub slice_duration: f32,
    /// Time axis shift
    pub toffset: f32,
    /// Unused in NIFTI-1
    pub glmax: i32,
    /// Unused in NIFTI-1
    pub glmin: i32,

    /// Any text you like
    pub descrip: [u8; 80],
    /// Auxiliary filename
    pub aux_file: [u8; 24],
    /// NIFTI_XFORM_* code
    pub qform_code: i16,
    /// NIFTI_XFORM_* code
    pub sform_code: i16,
    /// Quaternion b param
    pub quatern_b: f32,
    /// Quaternion c param
    pub quatern_c: f32,
    /// Quaternion d param
    pub quatern_d: f32,
    /// Quaternion x shift
    pub quatern_x: f32,
    /// Quaternion y shift
    pub quatern_y: f32,
    /// Quaternion z shift
    pub quatern_z: f32,

    /// 1st row affine transform
    pub srow_x: [f32; 4],
    /// 2nd row affine transform
    pub srow_y: [f32; 4],
    /// 3rd row affine transform
    pub srow_z: [f32; 4],

    /// 'name' or meaning of data
    pub intent_name: [u8; 16],

    /// Magic code. Must be `b"ni1\0"` or `b"n+1\0"`
    pub magic: [u8; 4],

    /// Byte order the header (and its volume) was stored with
    pub endianness: Endianness,
}

impl Default for NiftiHeader {
    fn default() -> NiftiHeader {
        NiftiHeader {
            sizeof_hdr: HEADER_SIZE as i32,
            data_type: [0; 10],
            db_name: [0; 18],
            extents: 0,
            session_error: 0,
            regular: 0,
            dim_info: 0,
            dim: [1, 1, 1, 1, 1, 1, 1, 1],
            intent_p1: 0.,
            intent_p2: 0.,
            intent_p3: 0.,
            intent_code: 0,
            datatype: NiftiType::Uint8 as i16,
            bitpix: 8,
            slice_start: 0,
            pixdim: [1.; 8],
            vox_offset: 352.,
            scl_slope: 0.,
            scl_inter: 0.,
            slice_end: 0,
            slice_code: 0,
            xyzt_units: 0,
            cal_max: 0.,
            cal_min: 0.,
            slice_duration: 0.,
            toffset: 0.,
            glmax: 0,
            glmin: 0,

            descrip: [0; 80],
            aux_file: [0; 24],
            qform_code: 0,
            sform_code: 0,
            quatern_b: 0.,
            quatern_c: 0.,
            quatern_d: 0.,
            quatern_x: 0.,
            quatern_y: 0.,
            quatern_z: 0.,

            srow_x: [0.; 4],
            srow_y: [0.; 4],
            srow_z: [0.; 4],

            intent_name: [0; 16],

            magic: *MAGIC_CODE_NIP1,

            endianness: Endianness::Little,
        }
    }
}

impl NiftiHeader {
    /// Retrieve a NIFTI header from a file in the file system.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<NiftiHeader> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);
        if gz {
            NiftiHeader::from_reader(GzDecoder::new(file))
        } else {
            NiftiHeader::from_reader(file)
        }
    }

    /// Read a NIfTI-1 header, along with its byte order, from the given
    /// reader. The reader is expected to be at the start of the header, and
    /// is left right after its 348th byte.
    pub fn from_reader<S: Read>(mut input: S) -> Result<NiftiHeader> {
        let mut raw = [0u8; HEADER_SIZE];
        input.read_exact(&mut raw)?;
        parse_header(&raw, detect_endianness(&raw))
    }

    /// Write this header in its own byte order. Exactly 348 bytes are
    /// written: the extender and any extensions are not part of the header.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = ByteOrdered::runtime(writer, self.endianness);

        writer.write_i32(self.sizeof_hdr)?;
        writer.write_all(&self.data_type)?;
        writer.write_all(&self.db_name)?;
        writer.write_i32(self.extents)?;
        writer.write_i16(self.session_error)?;
        writer.write_u8(self.regular)?;
        writer.write_u8(self.dim_info)?;
        for s in &self.dim {
            writer.write_u16(*s)?;
        }
        writer.write_f32(self.intent_p1)?;
        writer.write_f32(self.intent_p2)?;
        writer.write_f32(self.intent_p3)?;
        writer.write_i16(self.intent_code)?;
        writer.write_i16(self.datatype)?;
        writer.write_i16(self.bitpix)?;
        writer.write_i16(self.slice_start)?;
        for f in &self.pixdim {
            writer.write_f32(*f)?;
        }
        writer.write_f32(self.vox_offset)?;
        writer.write_f32(self.scl_slope)?;
        writer.write_f32(self.scl_inter)?;
        writer.write_i16(self.slice_end)?;
        writer.write_u8(self.slice_code)?;
        writer.write_u8(self.xyzt_units)?;
        writer.write_f32(self.cal_max)?;
        writer.write_f32(self.cal_min)?;
        writer.write_f32(self.slice_duration)?;
        writer.write_f32(self.toffset)?;
        writer.write_i32(self.glmax)?;
        writer.write_i32(self.glmin)?;

        writer.write_all(&self.descrip)?;
        writer.write_all(&self.aux_file)?;
        writer.write_i16(self.qform_code)?;
        writer.write_i16(self.sform_code)?;
        for f in &[
            self.quatern_b,
            self.quatern_c,
            self.quatern_d,
            self.quatern_x,
            self.quatern_y,
            self.quatern_z,
        ] {
            writer.write_f32(*f)?;
        }
        for f in self.srow_x.iter().chain(&self.srow_y).chain(&self.srow_z) {
            writer.write_f32(*f)?;
        }
        writer.write_all(&self.intent_name)?;
        writer.write_all(&self.magic)?;
        Ok(())
    }

    /// Get the data type as a validated enum.
    pub fn data_type(&self) -> Result<NiftiType> {
        FromPrimitive::from_i16(self.datatype)
            .ok_or(NiftiError::InvalidCode("datatype", self.datatype))
    }

    /// Width of one voxel in bytes, checked against `bitpix`.
    pub fn bytes_per_voxel(&self) -> Result<usize> {
        let datatype = self.data_type()?;
        let size = datatype
            .size_of()
            .ok_or(NiftiError::UnsupportedDataType(datatype))?;
        if self.bitpix as usize != size * 8 {
            return Err(NiftiError::InconsistentBitpix(datatype, self.bitpix));
        }
        Ok(size)
    }

    /// Number of dimensions of the volume, as declared in `dim[0]`.
    pub fn rank(&self) -> Result<usize> {
        match self.dim[0] {
            r @ 1..=7 => Ok(usize::from(r)),
            r => Err(NiftiError::InconsistentDim(usize::from(r))),
        }
    }

    /// Extent of each volume dimension, in order.
    pub fn shape(&self) -> Result<Vec<usize>> {
        let rank = self.rank()?;
        Ok(self.dim[1..=rank].iter().map(|&d| usize::from(d)).collect())
    }

    /// Position of the first voxel byte in the data stream, from
    /// `vox_offset`. Negative and non-finite offsets are rejected.
    pub fn voxel_offset(&self) -> Result<u64> {
        if !self.vox_offset.is_finite() || self.vox_offset < 0. {
            return Err(NiftiError::InvalidOffset(self.vox_offset));
        }
        Ok(self.vox_offset as u64)
    }

    /// Create a copy of this header describing an array of the given shape.
    /// Only `dim` changes; unused trailing dimensions are set to 1.
    pub fn reshaped(&self, shape: &[usize]) -> Result<NiftiHeader> {
        if shape.is_empty() || shape.len() > 7 {
            return Err(NiftiError::InconsistentDim(shape.len()));
        }
        let mut dim = [1u16; 8];
        dim[0] = shape.len() as u16;
        for (d, &s) in dim[1..].iter_mut().zip(shape) {
            *d = u16::try_from(s).map_err(|_| NiftiError::InconsistentDim(shape.len()))?;
        }
        Ok(NiftiHeader {
            dim,
            ..self.clone()
        })
    }
}

/// `dim[0]` must lie in 0..=7, which only holds for one of the two byte orders.
fn detect_endianness(raw: &[u8; HEADER_SIZE]) -> Endianness {
    let dim0 = u16::from_le_bytes([raw[40], raw[41]]);
    if dim0 > 7 {
        Endianness::Big
    } else {
        Endianness::Little
    }
}

fn parse_header(raw: &[u8], endianness: Endianness) -> Result<NiftiHeader> {
    let mut h = NiftiHeader {
        endianness,
        ..NiftiHeader::default()
    };
    let mut input = ByteOrdered::runtime(raw, endianness);

    h.sizeof_hdr = input.read_i32()?;
    input.read_exact(&mut h.data_type)?;
    input.read_exact(&mut h.db_name)?;
    h.extents = input.read_i32()?;
    h.session_error = input.read_i16()?;
    h.regular = input.read_u8()?;
    h.dim_info = input.read_u8()?;
    for v in &mut h.dim {
        *v = input.read_u16()?;
    }
    h.intent_p1 = input.read_f32()?;
    h.intent_p2 = input.read_f32()?;
    h.intent_p3 = input.read_f32()?;
    h.intent_code = input.read_i16()?;
    h.datatype = input.read_i16()?;
    h.bitpix = input.read_i16()?;
    h.slice_start = input.read_i16()?;
    for v in &mut h.pixdim {
        *v = input.read_f32()?;
    }
    h.vox_offset = input.read_f32()?;
    h.scl_slope = input.read_f32()?;
    h.scl_inter = input.read_f32()?;
    h.slice_end = input.read_i16()?;
    h.slice_code = input.read_u8()?;
    h.xyzt_units = input.read_u8()?;
    h.cal_max = input.read_f32()?;
    h.cal_min = input.read_f32()?;
    h.slice_duration = input.read_f32()?;
    h.toffset = input.read_f32()?;
    h.glmax = input.read_i32()?;
    h.glmin = input.read_i32()?;

    input.read_exact(&mut h.descrip)?;
    input.read_exact(&mut h.aux_file)?;
    h.qform_code = input.read_i16()?;
    h.sform_code = input.read_i16()?;
    h.quatern_b = input.read_f32()?;
    h.quatern_c = input.read_f32()?;
    h.quatern_d = input.read_f32()?;
    h.quatern_x = input.read_f32()?;
    h.quatern_y = input.read_f32()?;
    h.quatern_z = input.read_f32()?;
    for v in &mut h.srow_x {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_y {
        *v = input.read_f32()?;
    }
    for v in &mut h.srow_z {
        *v = input.read_f32()?;
    }
    input.read_exact(&mut h.intent_name)?;
    input.read_exact(&mut h.magic)?;

    if h.sizeof_hdr != HEADER_SIZE as i32
        || (&h.magic != MAGIC_CODE_NI1 && &h.magic != MAGIC_CODE_NIP1)
    {
        Err(NiftiError::InvalidFormat)
    } else {
        Ok(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dwi_header(endianness: Endianness) -> NiftiHeader {
        let mut descrip = [0u8; 80];
        descrip[..9].copy_from_slice(b"dwi split");
        NiftiHeader {
            dim: [4, 64, 64, 40, 5, 1, 1, 1],
            datatype: NiftiType::Int16 as i16,
            bitpix: 16,
            pixdim: [1., 2., 2., 2.5, 1., 1., 1., 1.],
            scl_slope: 2.,
            scl_inter: -10.,
            sform_code: 1,
            srow_x: [-2., 0., 0., 64.],
            srow_y: [0., 2., 0., -64.],
            srow_z: [0., 0., 2.5, -50.],
            descrip,
            endianness,
            ..NiftiHeader::default()
        }
    }

    #[test]
    fn write_then_parse_both_byte_orders() {
        for &e in &[Endianness::Little, Endianness::Big] {
            let header = dwi_header(e);
            let mut buf = Vec::new();
            header.write_to(&mut buf).unwrap();
            assert_eq!(buf.len(), HEADER_SIZE);

            let parsed = NiftiHeader::from_reader(&buf[..]).unwrap();
            assert_eq!(parsed, header);
        }
    }

    #[test]
    fn rejects_bad_magic() {
        let header = NiftiHeader {
            magic: *b"abc\0",
            ..NiftiHeader::default()
        };
        let mut buf = Vec::new();
        header.write_to(&mut buf).unwrap();
        assert!(matches!(
            NiftiHeader::from_reader(&buf[..]),
            Err(NiftiError::InvalidFormat)
        ));
    }

    #[test]
    fn rejects_truncated_header() {
        let buf = vec![0u8; 100];
        assert!(matches!(
            NiftiHeader::from_reader(&buf[..]),
            Err(NiftiError::Io(_))
        ));
    }

    #[test]
    fn shape_and_voxel_size() {
        let header = dwi_header(Endianness::Little);
        assert_eq!(header.rank().unwrap(), 4);
        assert_eq!(header.shape().unwrap(), vec![64, 64, 40, 5]);
        assert_eq!(header.bytes_per_voxel().unwrap(), 2);

        let bad = NiftiHeader {
            bitpix: 32,
            ..header
        };
        assert!(matches!(
            bad.bytes_per_voxel(),
            Err(NiftiError::InconsistentBitpix(NiftiType::Int16, 32))
        ));
    }

    #[test]
    fn voxel_offset_must_be_finite() {
        assert_eq!(NiftiHeader::default().voxel_offset().unwrap(), 352);
        for &offset in &[-1., std::f32::NAN, std::f32::INFINITY] {
            let header = NiftiHeader {
                vox_offset: offset,
                ..NiftiHeader::default()
            };
            assert!(matches!(
                header.voxel_offset(),
                Err(NiftiError::InvalidOffset(_))
            ));
        }
    }

    #[test]
    fn reshaped_only_touches_dim() {
        let header = dwi_header(Endianness::Big);
        let sub = header.reshaped(&[64, 64, 40]).unwrap();
        assert_eq!(sub.dim, [3, 64, 64, 40, 1, 1, 1, 1]);
        assert_eq!(
            NiftiHeader {
                dim: header.dim,
                ..sub
            },
            header
        );

        assert!(header.reshaped(&[]).is_err());
        assert!(header.reshaped(&[70_000]).is_err());
    }
}
