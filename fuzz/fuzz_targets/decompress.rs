#![no_main]
use libfuzzer_sys::fuzz_target;
use dictpack::raw::{self, Dictionary};

fuzz_target!(|data: &[u8]| {
    if data.len() < 17 {
        return;
    }
    let (head, input) = data.split_at(17);
    let mut entries = [0u8; 16];
    entries.copy_from_slice(&head[1..]);
    let dictionary = Dictionary::new(entries);

    // the first byte picks a (possibly too small) output size
    let mut output = vec![0u8; usize::from(head[0]) * 4];
    let len = raw::decompress_into(input, &mut output, &dictionary);
    assert!(len <= output.len());

    let mut full = vec![0u8; raw::max_decompressed_len(input.len())];
    let full_len = raw::decompress_into(input, &mut full, &dictionary);
    assert_eq!(&output[..len], &full[..len]);
    assert!(full_len >= len);
});
