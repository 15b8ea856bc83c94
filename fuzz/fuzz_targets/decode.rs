#![no_main]
use libfuzzer_sys::fuzz_target;
use dictpack::UnpackSettings;

fuzz_target!(|data: &[u8]| {
    // we deliberately ignore errors here because random bytes from fuzzer
    // are mostly not valid containers and so are expected to trigger non-fatal errors
    let _ = UnpackSettings::default().password(b"fuzz").unpack(data);
    let _ = UnpackSettings::default().verify_checksum(false).password(b"fuzz").unpack(data);
});
