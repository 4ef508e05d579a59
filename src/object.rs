//! The plist object model: a closed set of value variants with container semantics.

use crate::{Date, Dictionary};

/// A single node in a parsed property list tree.
///
/// `Object` is a closed variant over the nine plist types. Containers
/// (`Array`, `Dictionary`) own their children outright; dropping a container
/// recursively drops everything beneath it. There is no shared ownership
/// anywhere in the tree -- a node always has exactly one parent slot holding
/// it, or is the root.
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    Array(Vec<Object>),
    Dictionary(Dictionary),
    Boolean(bool),
    Data(Vec<u8>),
    Date(Date),
    Real(f64),
    Integer(i64),
    String(String),
    Null,
}

impl Object {
    /// If the `Object` is an Array, returns the associated Vec.
    /// Returns None otherwise.
    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the `Object` is an Array, returns the associated mutable Vec.
    /// Returns None otherwise.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Object>> {
        match self {
            Object::Array(array) => Some(array),
            _ => None,
        }
    }

    /// If the `Object` is a Dictionary, returns the associated `Dictionary`.
    /// Returns None otherwise.
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// If the `Object` is a Dictionary, returns the associated mutable `Dictionary`.
    /// Returns None otherwise.
    pub fn as_dictionary_mut(&mut self) -> Option<&mut Dictionary> {
        match self {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// If the `Object` is a Boolean, returns the associated bool.
    /// Returns None otherwise.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Object::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// If the `Object` is Data, returns the underlying byte slice.
    /// Returns None otherwise.
    pub fn as_data(&self) -> Option<&[u8]> {
        match self {
            Object::Data(data) => Some(data),
            _ => None,
        }
    }

    /// If the `Object` is Data, consumes it and returns the underlying Vec.
    /// Returns None otherwise.
    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Object::Data(data) => Some(data),
            _ => None,
        }
    }

    /// If the `Object` is a Date, returns the associated `Date`.
    /// Returns None otherwise.
    pub fn as_date(&self) -> Option<&Date> {
        match self {
            Object::Date(date) => Some(date),
            _ => None,
        }
    }

    /// If the `Object` is a Real, returns the associated f64.
    /// Returns None otherwise.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Object::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// If the `Object` is an Integer, returns the associated i64.
    /// Returns None otherwise.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// If the `Object` is a String, returns the associated str.
    /// Returns None otherwise.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Object::String(v) => Some(v),
            _ => None,
        }
    }

    /// If the `Object` is a String, consumes it and returns the underlying String.
    /// Returns None otherwise.
    pub fn into_string(self) -> Option<String> {
        match self {
            Object::String(v) => Some(v),
            _ => None,
        }
    }

    /// True for the `Null` variant.
    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

impl From<Vec<Object>> for Object {
    fn from(from: Vec<Object>) -> Object {
        Object::Array(from)
    }
}

impl From<Dictionary> for Object {
    fn from(from: Dictionary) -> Object {
        Object::Dictionary(from)
    }
}

impl From<bool> for Object {
    fn from(from: bool) -> Object {
        Object::Boolean(from)
    }
}

impl From<Date> for Object {
    fn from(from: Date) -> Object {
        Object::Date(from)
    }
}

impl From<f64> for Object {
    fn from(from: f64) -> Object {
        Object::Real(from)
    }
}

impl From<i64> for Object {
    fn from(from: i64) -> Object {
        Object::Integer(from)
    }
}

impl From<String> for Object {
    fn from(from: String) -> Object {
        Object::String(from)
    }
}

impl<'a> From<&'a str> for Object {
    fn from(from: &'a str) -> Object {
        Object::String(from.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let array = Object::Array(vec![Object::Integer(1)]);
        assert_eq!(array.as_array().unwrap().len(), 1);
        assert!(array.as_dictionary().is_none());

        let mut dict = Dictionary::new();
        dict.insert("key".to_owned(), Object::String("value".to_owned()));
        let obj = Object::Dictionary(dict);
        assert_eq!(
            obj.as_dictionary().unwrap().get("key").unwrap().as_string(),
            Some("value")
        );

        assert_eq!(Object::Boolean(true).as_boolean(), Some(true));
        assert_eq!(Object::Null.as_boolean(), None);
        assert!(Object::Null.is_null());

        let data = Object::Data(vec![1, 2, 3]);
        assert_eq!(data.as_data(), Some(&[1, 2, 3][..]));
        assert_eq!(data.into_data(), Some(vec![1, 2, 3]));

        assert_eq!(Object::Real(1.5).as_real(), Some(1.5));
        assert_eq!(Object::Integer(-7).as_integer(), Some(-7));
        assert_eq!(Object::String("s".to_owned()).as_string(), Some("s"));
    }
}
