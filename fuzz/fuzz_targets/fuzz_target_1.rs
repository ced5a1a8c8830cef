#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate gpsinfo;

use std::io::Cursor;
use gpsinfo::{CgpsParser, GeoPoint};

fuzz_target!(|data: &[u8]| {
    if let Ok(parser) = CgpsParser::new(Cursor::new(data)) {
        for _ in parser {
            ();
        }
    }

    if let Ok(line) = std::str::from_utf8(data) {
        let pt = GeoPoint::from_response_line(line);
        assert!(!pt.is_valid() || pt.latitude().abs() <= 90.0);
    }
});
