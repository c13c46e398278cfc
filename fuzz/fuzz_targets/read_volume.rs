#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_split::Volume;

fuzz_target!(|data: &[u8]| {
    if let Ok(volume) = Volume::from_reader(data) {
        let _ = volume.extensions().extensions(volume.header().endianness);
        for axis in 0..volume.rank() {
            let _ = volume.sub_volume(axis, 0);
        }
    }
});
