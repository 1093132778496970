//! Fuzz target for link decoding
//!
//! Tests that arbitrary text never panics the decoder, and that anything it
//! accepts re-encodes into a link that decodes to the same identity.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rapidlink_core::{DECODE_ORDER, LinkFormat, decode_with_format, encode};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Fuzz decode - should never panic
    let Ok((format, identity)) = decode_with_format(text) else {
        return;
    };

    assert!(format.is_decodable(), "Write-only format reported as decoded");

    // Whatever decoded must survive a trip through every decodable format
    for target in DECODE_ORDER {
        let link = encode(&identity, target);
        let (detected, again) = decode_with_format(&link).expect("Re-encoded link must decode");
        assert_eq!(detected, target);
        assert_eq!(again, identity);
    }

    // Short links never decode
    assert!(decode_with_format(&encode(&identity, LinkFormat::StandardShort)).is_err());
});
