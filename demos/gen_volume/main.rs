//! An application for writing a 4D NIfTI file to try the splitter on.

use std::env;

use nifti_split::{Endianness, Extender, Extension, ExtensionBlock, NiftiHeader, NiftiType, Volume};

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to NIFTI file is required");
    let channels: usize = args
        .next()
        .map(|s| s.parse().expect("Number of channels must be an integer"))
        .unwrap_or(5);

    // 64x64x40 float32 per channel, each channel filled with its index
    let shape = [64, 64, 40, channels];
    let voxels_per_channel: usize = shape[..3].iter().product();
    let mut data = Vec::with_capacity(voxels_per_channel * channels * 4);
    for c in 0..channels {
        for _ in 0..voxels_per_channel {
            data.extend_from_slice(&(c as f32).to_le_bytes());
        }
    }

    let extensions = ExtensionBlock::new(
        Extender::from([1u8, 0u8, 0u8, 0u8]),
        &[Extension {
            code: 6,
            data: b"Hello World!".to_vec(),
        }],
        Endianness::Little,
    )
    .unwrap();

    let header = NiftiHeader {
        datatype: NiftiType::Float32 as i16,
        bitpix: 32,
        pixdim: [1., 2., 2., 2., 1., 1., 1., 1.],
        vox_offset: (348 + extensions.len()) as f32,
        endianness: Endianness::Little,
        ..NiftiHeader::default()
    }
    .reshaped(&shape)
    .unwrap();

    Volume::new(header, extensions, data)
        .and_then(|v| v.to_file(&filename))
        .unwrap();
}
