// Validation engine: pure derivation of the error map and field hints from a draft.
// Nothing here holds state; callers validate on demand.

pub mod handlers;
pub mod hints;
pub mod rules;
pub mod word_count;

pub use hints::{compute_field_hints, FieldHints};
pub use rules::{validate, ErrorKey, ErrorMap};
