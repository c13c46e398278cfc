#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_split::NiftiHeader;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_reader(data) {
        let _ = header.rank();
        let _ = header.shape();
        let _ = header.data_type();
        let _ = header.bytes_per_voxel();
        let mut out = Vec::new();
        let _ = header.write_to(&mut out);
    }
});
