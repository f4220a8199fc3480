//! Fuzz target for container decoding.
//!
//! Tests that arbitrary bytes never panic the header parser or the decrypt
//! path, with either a fixed or an input-derived passphrase.

#![no_main]

use ette::crypto::{ContainerHeader, HEADER_LEN, decrypt};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = ContainerHeader::decode(data);
    let _ = decrypt(data, "test");

    // Force a valid magic so the fuzzer reaches the cipher quickly
    if data.len() >= HEADER_LEN {
        let mut patched = data.to_vec();
        patched[..4].copy_from_slice(b"ETTE");
        patched[4] = 1;
        if let Ok(text) = std::str::from_utf8(&data[..8]) {
            let _ = decrypt(&patched, text);
        }
        let _ = decrypt(&patched, "test");
    }
});
