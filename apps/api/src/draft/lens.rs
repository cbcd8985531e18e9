//! Copy-on-write path updates over the typed draft.
//!
//! Every container in `ResumeDraft` sits behind an `Arc`. Setting a value
//! walks the path with `Arc::make_mut`, so only the nodes on the path are
//! cloned; every sibling subtree stays shared with the previous snapshot.

use std::sync::Arc;

use serde_json::Value;

use crate::draft::image::ImageData;
use crate::draft::ordered_set::OrderedSet;
use crate::draft::path::PathSegment;

pub trait Lens {
    /// Replaces the value found at `path` (relative to `self`).
    ///
    /// Returns `false` when the path does not resolve or `value` has the
    /// wrong shape for the leaf. Callers must then discard `self`: nodes
    /// on the partial path may already have been detached.
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool;
}

impl Lens for String {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        match (path.is_empty(), value.as_str()) {
            (true, Some(s)) => {
                *self = s.to_string();
                true
            }
            _ => false,
        }
    }
}

impl Lens for bool {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        match (path.is_empty(), value.as_bool()) {
            (true, Some(b)) => {
                *self = b;
                true
            }
            _ => false,
        }
    }
}

impl Lens for Option<ImageData> {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        if !path.is_empty() {
            return false;
        }
        match value {
            Value::Null => {
                *self = None;
                true
            }
            Value::String(url) => match ImageData::parse(url) {
                Some(img) => {
                    *self = Some(img);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

impl Lens for OrderedSet<String> {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        match (path.is_empty(), string_set(value)) {
            (true, Some(set)) => {
                *self = set;
                true
            }
            _ => false,
        }
    }
}

impl<T: Lens + Clone> Lens for Arc<T> {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        Arc::make_mut(self).set_at(path, value)
    }
}

impl<T: Lens> Lens for Vec<T> {
    fn set_at(&mut self, path: &[PathSegment], value: &Value) -> bool {
        match path.split_first() {
            Some((PathSegment::Index(i), rest)) => match self.get_mut(*i) {
                Some(row) => row.set_at(rest, value),
                None => false,
            },
            _ => false,
        }
    }
}

/// Parses a JSON array of strings into a de-duplicated set.
pub fn string_set(value: &Value) -> Option<OrderedSet<String>> {
    let items = value.as_array()?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .map(|v| v.into_iter().collect())
}

/// Implements [`Lens`] for a record by mapping wire keys to fields.
macro_rules! lens_record {
    ($ty:ty { $($key:literal => $field:ident),* $(,)? }) => {
        impl $crate::draft::lens::Lens for $ty {
            fn set_at(
                &mut self,
                path: &[$crate::draft::path::PathSegment],
                value: &serde_json::Value,
            ) -> bool {
                match path.split_first() {
                    $(
                        Some(($crate::draft::path::PathSegment::Key(k), rest)) if k == $key => {
                            self.$field.set_at(rest, value)
                        }
                    )*
                    _ => false,
                }
            }
        }
    };
}

pub(crate) use lens_record;
