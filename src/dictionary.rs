//! An ordered map of String to `Object`.
//!
//! The map is backed by an [`IndexMap`], so iteration order always matches
//! insertion order of the (unique) keys -- re-inserting an existing key
//! replaces its value in place without moving it to the end.
//!
//! [`IndexMap`]: https://docs.rs/indexmap/latest/indexmap/map/struct.IndexMap.html

use indexmap::{map, IndexMap};
use std::{
    fmt::{self, Debug},
    iter::FromIterator,
    ops,
};

use crate::Object;

/// Represents a plist dictionary type.
#[derive(Default)]
pub struct Dictionary {
    map: IndexMap<String, Object>,
}

impl Dictionary {
    /// Makes a new empty `Dictionary`.
    #[inline]
    pub fn new() -> Self {
        Dictionary {
            map: IndexMap::new(),
        }
    }

    /// Clears the dictionary, removing all values.
    #[inline]
    pub fn clear(&mut self) {
        self.map.clear()
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Object> {
        self.map.get(key)
    }

    /// Returns true if the dictionary contains a value for the specified key.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.map.get_mut(key)
    }

    /// Inserts a key-value pair into the dictionary.
    ///
    /// If the dictionary did not have this key present, `None` is returned.
    ///
    /// If the dictionary did have this key present, the value is replaced and
    /// the old value is returned. The key's position (the first time it was
    /// inserted) is preserved -- this is the last-writer-wins-on-value,
    /// first-occurrence-position-on-key semantics the XML parser relies on
    /// for repeated `<key>` bindings.
    #[inline]
    pub fn insert(&mut self, k: String, v: Object) -> Option<Object> {
        self.map.insert(k, v)
    }

    /// Removes a key from the dictionary, returning the value at the key if the key was
    /// previously in the dictionary.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.map.remove(key)
    }

    /// Returns the number of elements in the dictionary.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the dictionary contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Gets an iterator over the entries of the dictionary.
    #[inline]
    pub fn iter(&self) -> Iter {
        Iter {
            iter: self.map.iter(),
        }
    }

    /// Gets a mutable iterator over the entries of the dictionary.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut {
        IterMut {
            iter: self.map.iter_mut(),
        }
    }

    /// Gets an iterator over the keys of the dictionary, in insertion order.
    #[inline]
    pub fn keys(&self) -> Keys {
        Keys {
            iter: self.map.keys(),
        }
    }

    /// Gets an iterator over the values of the dictionary, in insertion order.
    #[inline]
    pub fn values(&self) -> Values {
        Values {
            iter: self.map.values(),
        }
    }

    /// Gets an iterator over mutable values of the dictionary.
    #[inline]
    pub fn values_mut(&mut self) -> ValuesMut {
        ValuesMut {
            iter: self.map.values_mut(),
        }
    }
}

impl Clone for Dictionary {
    #[inline]
    fn clone(&self) -> Self {
        Dictionary {
            map: self.map.clone(),
        }
    }
}

impl PartialEq for Dictionary {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.map.eq(&other.map)
    }
}

/// Access an element of this dictionary. Panics if the given key is not present.
impl<'a> ops::Index<&'a str> for Dictionary {
    type Output = Object;

    fn index(&self, index: &str) -> &Object {
        self.map.index(index)
    }
}

/// Mutably access an element of this dictionary. Panics if the given key is not present.
impl<'a> ops::IndexMut<&'a str> for Dictionary {
    fn index_mut(&mut self, index: &str) -> &mut Object {
        self.map.get_mut(index).expect("no entry found for key")
    }
}

impl Debug for Dictionary {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        self.map.fmt(formatter)
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Object)>,
    {
        Dictionary {
            map: FromIterator::from_iter(iter),
        }
    }
}

impl Extend<(String, Object)> for Dictionary {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (String, Object)>,
    {
        self.map.extend(iter);
    }
}

macro_rules! delegate_iterator {
    (($name:ident $($generics:tt)*) => $item:ty) => {
        impl $($generics)* Iterator for $name $($generics)* {
            type Item = $item;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.iter.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.iter.size_hint()
            }
        }

        impl $($generics)* ExactSizeIterator for $name $($generics)* {
            #[inline]
            fn len(&self) -> usize {
                self.iter.len()
            }
        }
    }
}

//////////////////////////////////////////////////////////////////////////////

impl<'a> IntoIterator for &'a Dictionary {
    type Item = (&'a String, &'a Object);
    type IntoIter = Iter<'a>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Iter {
            iter: self.map.iter(),
        }
    }
}

/// An iterator over a `Dictionary`'s entries.
pub struct Iter<'a> {
    iter: map::Iter<'a, String, Object>,
}

delegate_iterator!((Iter<'a>) => (&'a String, &'a Object));

//////////////////////////////////////////////////////////////////////////////

impl<'a> IntoIterator for &'a mut Dictionary {
    type Item = (&'a String, &'a mut Object);
    type IntoIter = IterMut<'a>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IterMut {
            iter: self.map.iter_mut(),
        }
    }
}

/// A mutable iterator over a `Dictionary`'s entries.
pub struct IterMut<'a> {
    iter: map::IterMut<'a, String, Object>,
}

delegate_iterator!((IterMut<'a>) => (&'a String, &'a mut Object));

//////////////////////////////////////////////////////////////////////////////

impl IntoIterator for Dictionary {
    type Item = (String, Object);
    type IntoIter = IntoIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

/// An owning iterator over a `Dictionary`'s entries.
pub struct IntoIter {
    iter: map::IntoIter<String, Object>,
}

delegate_iterator!((IntoIter) => (String, Object));

//////////////////////////////////////////////////////////////////////////////

/// An iterator over a `Dictionary`'s keys.
pub struct Keys<'a> {
    iter: map::Keys<'a, String, Object>,
}

delegate_iterator!((Keys<'a>) => &'a String);

//////////////////////////////////////////////////////////////////////////////

/// An iterator over a `Dictionary`'s values.
pub struct Values<'a> {
    iter: map::Values<'a, String, Object>,
}

delegate_iterator!((Values<'a>) => &'a Object);

//////////////////////////////////////////////////////////////////////////////

/// A mutable iterator over a `Dictionary`'s values.
pub struct ValuesMut<'a> {
    iter: map::ValuesMut<'a, String, Object>,
}

delegate_iterator!((ValuesMut<'a>) => &'a mut Object);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place_and_returns_old_value() {
        let mut dict = Dictionary::new();
        dict.insert("a".to_owned(), Object::Integer(1));
        dict.insert("b".to_owned(), Object::Integer(2));
        let old = dict.insert("a".to_owned(), Object::Integer(3));

        assert_eq!(old, Some(Object::Integer(1)));
        assert_eq!(dict.get("a"), Some(&Object::Integer(3)));

        // Insertion order of the *keys* is preserved even though "a"'s value changed.
        let keys: Vec<&String> = dict.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn index_panics_on_missing_key() {
        let dict = Dictionary::new();
        let result = std::panic::catch_unwind(|| &dict["missing"]);
        assert!(result.is_err());
    }
}
