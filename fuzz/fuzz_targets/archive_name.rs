//! Fuzz target for archive name validation.
//!
//! Run with: cargo +nightly fuzz run archive_name
//!
//! An accepted name must stay inside the working directory once the
//! extension is appended.

#![no_main]

use arcpick::{ArchiveFormat, validate_archive_name};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(valid) = validate_archive_name(name) {
        assert!(!valid.is_empty());
        assert!(!valid.contains('/'), "separator accepted: {:?}", valid);
        assert!(!valid.contains('\0'), "NUL accepted: {:?}", valid);
        assert!(valid != "." && valid != "..");

        let file_name = ArchiveFormat::Zip.file_name(valid);
        let path = std::path::Path::new(&file_name);
        assert_eq!(path.components().count(), 1, "{:?}", file_name);
    }
});
