//! Descriptors of how the fields of an object are checkpointed.
//!
//! Objects in this library do not write anything to disk. Instead, they describe their
//! fields with a static table of [`SaveAttr`] tags, which an external checkpoint writer
//! can use to pick a serialization strategy per field.
use serde::{Deserialize, Serialize};

/// Serialization strategy of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SaveAttr {
    /// The field knows how to save itself, e.g., an approximator.
    Custom,

    /// Generic structured data, e.g., a map of options.
    Structured,

    /// A primitive value such as a number or a flag.
    Primitive,

    /// A numeric array.
    Tensor,
}

/// An object whose fields can be checkpointed by an external writer.
pub trait Persistent {
    /// Field names paired with their serialization strategies.
    fn save_attrs() -> &'static [(&'static str, SaveAttr)];

    /// Returns the strategy of the given field, if it is saved.
    fn save_attr(field: &str) -> Option<SaveAttr> {
        Self::save_attrs()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, attr)| *attr)
    }
}
