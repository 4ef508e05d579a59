//! # xmlplist
//!
//! A strict decoder for Apple-style XML property lists.
//!
//! This crate owns two things: the [`Object`] model -- a closed variant over
//! the nine plist types -- and the [`Parser`] that turns a stream of XML
//! events into a fully validated `Object` tree. Writing/encoding plists,
//! binary-plist decoding, and streaming partial trees are explicitly out of
//! scope; a [`Parser`] always yields one complete root or fails.
//!
//! ## Example
//!
//! ```no_run
//! use xmlplist::Parser;
//!
//! let mut parser = Parser::new(|msg| eprintln!("plist error: {}", msg));
//! match parser.parse_file("example.plist") {
//!     Some(root) => println!("{:?}", root),
//!     None => eprintln!("failed to parse plist"),
//! }
//! ```

mod date;
mod dictionary;
mod error;
mod object;
mod xml;

pub use crate::date::{Date, InvalidXmlDate};
pub use crate::dictionary::Dictionary;
pub use crate::error::Error;
pub use crate::object::Object;
pub use crate::xml::Parser;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(xml: &str) -> Option<Object> {
        let mut parser = Parser::new(|_| {});
        parser.parse_reader(xml.as_bytes())
    }

    #[test]
    fn parses_a_simple_dictionary() {
        let root =
            parse_str("<plist><dict><key>n</key><integer>42</integer></dict></plist>").unwrap();
        let dict = root.as_dictionary().unwrap();
        assert_eq!(dict.get("n"), Some(&Object::Integer(42)));
    }

    #[test]
    fn parses_an_array_of_scalars() {
        let root = parse_str("<plist><array><true/><false/><null/></array></plist>").unwrap();
        let array = root.as_array().unwrap();
        assert_eq!(
            array,
            &vec![Object::Boolean(true), Object::Boolean(false), Object::Null]
        );
    }

    #[test]
    fn rejects_a_second_top_level_element() {
        let mut parser = Parser::new(|_| {});
        let root = parser.parse_reader("<plist><string>a</string><string>b</string></plist>".as_bytes());
        assert!(root.is_none());
    }
}
