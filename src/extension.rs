//! This module contains definitions for the extension and related types.
//! Extensions are optional data frames sitting before the voxel data.
//! When present, an extender frame of 4 bytes is also present at the
//! end of the NIFTI-1 header, with the first byte set to something
//! other than 0.
//!
//! Sub-volumes carry the extensions of their source verbatim, so the
//! whole region is kept as raw bytes and only decoded on request.

use crate::error::{NiftiError, Result};
use byteordered::{ByteOrdered, Endianness};
use std::io::{self, Read, Write};

/// Data type for the extender code.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Extender([u8; 4]);

impl Extender {
    /// Whether extensions should exist upon this extender code.
    pub fn has_extensions(&self) -> bool {
        self.0[0] != 0
    }

    /// Get the extender's bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for Extender {
    fn from(extender: [u8; 4]) -> Self {
        Extender(extender)
    }
}

/// One decoded extension frame.
#[derive(Debug, PartialEq, Clone)]
pub struct Extension {
    /// The `ecode` field.
    pub code: i32,
    /// The `edata` field, `esize - 8` bytes.
    pub data: Vec<u8>,
}

/// The bytes between the end of the header and the voxel data: the
/// extender, any extensions and padding, exactly as stored.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ExtensionBlock {
    raw: Vec<u8>,
}

impl ExtensionBlock {
    /// Wrap raw bytes read after a header.
    pub fn from_raw(raw: Vec<u8>) -> Self {
        ExtensionBlock { raw }
    }

    /// Build a block from an extender code and encoded extension frames.
    pub fn new(extender: Extender, extensions: &[Extension], endianness: Endianness) -> Result<Self> {
        let mut raw = ByteOrdered::runtime(Vec::new(), endianness);
        raw.write_all(extender.as_bytes())?;
        for ext in extensions {
            // frames are padded to a multiple of 16 bytes
            let esize = (8 + ext.data.len() + 15) / 16 * 16;
            raw.write_i32(esize as i32)?;
            raw.write_i32(ext.code)?;
            raw.write_all(&ext.data)?;
            raw.write_all(&vec![0; esize - 8 - ext.data.len()])?;
        }
        Ok(ExtensionBlock {
            raw: raw.into_inner(),
        })
    }

    /// Read exactly `len` bytes of extension region from `source`. The
    /// buffer only grows as bytes arrive, so a bogus `len` fails at the end
    /// of the stream.
    pub fn from_reader<R: Read>(source: R, len: u64) -> Result<Self> {
        let mut raw = Vec::new();
        let _ = source.take(len).read_to_end(&mut raw)?;
        if (raw.len() as u64) < len {
            return Err(NiftiError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "extension region ends before the voxel offset",
            )));
        }
        Ok(ExtensionBlock { raw })
    }

    /// Read everything left in `source`, as found after the header of a
    /// `.hdr` file. An absent extender yields an empty block.
    pub fn read_to_end<R: Read>(mut source: R) -> Result<Self> {
        let mut raw = Vec::new();
        let _ = source.read_to_end(&mut raw)?;
        Ok(ExtensionBlock { raw })
    }

    /// The stored bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Length of the stored region in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the region is empty (no extender stored at all).
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The extender code, if the region holds one.
    pub fn extender(&self) -> Option<Extender> {
        if self.raw.len() < 4 {
            return None;
        }
        let mut code = [0u8; 4];
        code.copy_from_slice(&self.raw[..4]);
        Some(code.into())
    }

    /// Decode the extension frames following the extender. Trailing padding
    /// too short to hold a frame is ignored.
    pub fn extensions(&self, endianness: Endianness) -> Result<Vec<Extension>> {
        match self.extender() {
            Some(e) if e.has_extensions() => {}
            _ => return Ok(Vec::new()),
        }
        let mut out = Vec::new();
        let mut rest = &self.raw[4..];
        while rest.len() >= 8 {
            let mut frame = ByteOrdered::runtime(rest, endianness);
            let esize = frame.read_i32()?;
            let ecode = frame.read_i32()?;
            if esize < 8 || esize as usize > rest.len() {
                return Err(NiftiError::InvalidFormat);
            }
            let esize = esize as usize;
            out.push(Extension {
                code: ecode,
                data: rest[8..esize].to_vec(),
            });
            rest = &rest[esize..];
        }
        Ok(out)
    }
}
