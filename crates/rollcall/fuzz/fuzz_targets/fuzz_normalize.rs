//! Fuzz target for key normalization.
//!
//! Checks that normalization never panics and that a normalized key
//! normalizes to itself.

#![no_main]

use libfuzzer_sys::fuzz_target;
use rollcall::normalize;

fuzz_target!(|text: &str| {
    let once = normalize(Some(text));
    if let Some(key) = &once {
        assert!(!key.as_str().is_empty());
        assert_eq!(normalize(Some(key.as_str())).as_ref(), Some(key));
    }
});
