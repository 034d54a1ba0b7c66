//! Month directories follow the local timezone
//!
//! Kept in its own test binary: it sets `TZ` for the whole process.
#![cfg(unix)]

use std::path::PathBuf;

use folio_core::*;

// 2023-04-01T01:00:00Z
const APRIL_FOOLS_UTC: i64 = 1_680_310_800;

#[test]
fn test_evening_in_new_york_files_under_previous_month() {
    // SAFETY: the only test in this binary, and TZ is set before any thread reads it.
    unsafe { std::env::set_var("TZ", "EST5EDT,M3.2.0,M11.1.0") };

    assert_eq!(year_month(APRIL_FOOLS_UTC).unwrap(), (2023, 3));

    let layout = OutputLayout::new("/pdf", "/notes");
    let bookmark = Bookmark::new(1, "Late Read", "https://example.com", APRIL_FOOLS_UTC);
    assert_eq!(layout.pdf_path(&bookmark).unwrap(), PathBuf::from("/pdf/2023/3/Late Read.pdf"));
}
