#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use xmlplist::Parser;

fuzz_target!(|data: &[u8]| {
    let cursor = Cursor::new(data);
    let mut parser = Parser::new(|_| {});
    let _ = parser.parse_reader(cursor);
});
