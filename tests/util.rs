#![allow(dead_code)]

use std::path::Path;

use nifti_split::{
    header::{MAGIC_CODE_NI1, MAGIC_CODE_NIP1},
    Endianness, Extender, Extension, ExtensionBlock, NiftiHeader, NiftiType, Volume,
};

/// Header of a diffusion-like scan: oblique affine, scaling, description
/// and a single-file magic code.
pub fn scan_header(shape: &[usize], datatype: NiftiType, endianness: Endianness) -> NiftiHeader {
    let mut descrip = [0u8; 80];
    descrip[..12].copy_from_slice(b"split source");
    NiftiHeader {
        datatype: datatype as i16,
        bitpix: (datatype.size_of().unwrap() * 8) as i16,
        pixdim: [-1., 2., 2., 2.5, 1.2, 1., 1., 1.],
        scl_slope: 0.5,
        scl_inter: 3.,
        xyzt_units: 10,
        qform_code: 1,
        sform_code: 1,
        quatern_b: 0.1,
        quatern_d: -0.2,
        srow_x: [-2., 0., 0., 63.],
        srow_y: [0., 2., 0.1, -63.],
        srow_z: [0., 0., 2.5, -49.],
        descrip,
        magic: *MAGIC_CODE_NIP1,
        endianness,
        ..NiftiHeader::default()
    }
    .reshaped(shape)
    .unwrap()
}

/// Volume whose voxel bytes are a deterministic, non-repeating-ish pattern,
/// with one comment extension.
pub fn scan_volume(shape: &[usize], datatype: NiftiType, endianness: Endianness) -> Volume {
    let mut header = scan_header(shape, datatype, endianness);
    let extensions = ExtensionBlock::new(
        Extender::from([1, 0, 0, 0]),
        &[Extension {
            code: 6,
            data: b"acquired with 5 channels".to_vec(),
        }],
        endianness,
    )
    .unwrap();
    header.vox_offset = (348 + extensions.len()) as f32;
    let len = shape.iter().product::<usize>() * datatype.size_of().unwrap();
    let data = (0..len).map(|i| (i * 7 % 251) as u8).collect();
    Volume::new(header, extensions, data).unwrap()
}

/// Same volume laid out as a `.hdr`/`.img` pair.
pub fn pair_volume(shape: &[usize], datatype: NiftiType) -> Volume {
    let mut header = scan_header(shape, datatype, Endianness::Big);
    header.magic = *MAGIC_CODE_NI1;
    header.vox_offset = 0.;
    let len = shape.iter().product::<usize>() * datatype.size_of().unwrap();
    let data = (0..len).map(|i| (i % 13) as u8).collect();
    Volume::new(header, ExtensionBlock::default(), data).unwrap()
}

/// Write `volume` to `path` and hand it back for comparisons.
pub fn write_volume<P: AsRef<Path>>(path: P, volume: Volume) -> Volume {
    volume.to_file(path).unwrap();
    volume
}
