//! Normalised key sets for menu options.
//!
//! A menu option may be declared with a single value, a list, or a
//! contiguous integer range. All of these collapse into an ordered,
//! de-duplicated list of strings.

use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeInclusive};

/// The literal inputs one menu option accepts, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys(Vec<String>);

impl Keys {
    /// Builds a key set, dropping later duplicates.
    pub fn new<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let mut out: Vec<String> = Vec::new();
        for key in keys {
            let key = key.to_string();
            if !out.contains(&key) {
                out.push(key);
            }
        }
        Self(out)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Keys {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<&str> for Keys {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for Keys {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<char> for Keys {
    fn from(key: char) -> Self {
        Self(vec![key.to_string()])
    }
}

macro_rules! keys_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Keys {
                fn from(key: $t) -> Self {
                    Self(vec![key.to_string()])
                }
            }

            impl From<RangeInclusive<$t>> for Keys {
                fn from(range: RangeInclusive<$t>) -> Self {
                    Self::new(range)
                }
            }

            impl From<Range<$t>> for Keys {
                fn from(range: Range<$t>) -> Self {
                    Self::new(range)
                }
            }
        )*
    };
}

keys_from_integer!(u8, u16, u32, u64, i32, i64, usize);

impl<T: ToString> From<Vec<T>> for Keys {
    fn from(keys: Vec<T>) -> Self {
        Self::new(keys)
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for Keys {
    fn from(keys: [T; N]) -> Self {
        Self::new(keys)
    }
}

impl<T: ToString> From<&[T]> for Keys {
    fn from(keys: &[T]) -> Self {
        Self::new(keys.iter().map(ToString::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forms_normalise_to_the_same_set() {
        let expected = vec!["2".to_string(), "3".to_string()];
        assert_eq!(Keys::from(2..=3).as_slice(), expected.as_slice());
        assert_eq!(Keys::from(2..4).as_slice(), expected.as_slice());
        assert_eq!(Keys::from([2, 3]).as_slice(), expected.as_slice());
        assert_eq!(Keys::from(vec!["2", "3"]).as_slice(), expected.as_slice());
    }

    #[test]
    fn single_values() {
        assert_eq!(Keys::from(1).as_slice(), ["1".to_string()]);
        assert_eq!(Keys::from('#').as_slice(), ["#".to_string()]);
        assert_eq!(Keys::from("Hello world").as_slice(), ["Hello world".to_string()]);
    }

    #[test]
    fn duplicates_keep_first_position() {
        let keys = Keys::from(vec![3, 1, 3, 2, 1]);
        assert_eq!(keys.as_slice(), ["3", "1", "2"].map(String::from));
        assert!(keys.contains("2"));
        assert!(!keys.contains("4"));
    }

    #[test]
    fn empty_range_is_empty() {
        assert!(Keys::from(5..5).is_empty());
    }
}
