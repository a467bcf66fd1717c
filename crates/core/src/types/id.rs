//! Newtype IDs for type-safe entity references.
//!
//! Records created by this backend carry a numeric id derived from their
//! creation time in Unix milliseconds. Older data files may hold string,
//! fractional or missing ids, so an id keeps whatever JSON value it was read
//! with and is compared as text. Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing ids from different entity types.

use chrono::Utc;
use serde_json::Value;

#[doc(hidden)]
pub type RawId = Value;

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around the raw JSON id with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`; any JSON value
///   is accepted, and `Default` is the missing id (`null`)
/// - `new()` from an `i64`, `as_i64()`, `is_missing()`, `generate()`
/// - `matches()` for the loose, string-based comparison used by lookups
/// - `Display` with the id's text form (empty when it has none)
///
/// # Example
///
/// ```rust
/// # use nb_collection_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new(1);
/// let gadget = GadgetId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// assert!(widget.matches("1"));
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Default,
            PartialEq,
            Eq,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::types::id::RawId);

        impl $name {
            /// Create an id from a numeric value.
            #[must_use]
            pub fn new(id: i64) -> Self {
                Self($crate::types::id::RawId::from(id))
            }

            /// The id as an integer, when it is one (or integer text).
            #[must_use]
            pub fn as_i64(&self) -> Option<i64> {
                $crate::types::id::raw_i64(&self.0)
            }

            /// The JSON value the id was stored with.
            #[must_use]
            pub const fn as_value(&self) -> &$crate::types::id::RawId {
                &self.0
            }

            /// Whether the record had no id at all.
            #[must_use]
            pub fn is_missing(&self) -> bool {
                self.0.is_null()
            }

            /// Generate a fresh id strictly greater than every numeric id in
            /// `existing`.
            ///
            /// Uses the current Unix time in milliseconds, bumped past the
            /// largest existing id when two records are created within the
            /// same millisecond.
            #[must_use]
            pub fn generate<'a>(existing: impl IntoIterator<Item = &'a Self>) -> Self {
                Self::new($crate::types::id::next_id(
                    existing.into_iter().filter_map(Self::as_i64),
                ))
            }

            /// Compare against an id received as text (path segment or JSON
            /// value rendered as a string).
            #[must_use]
            pub fn matches(&self, raw: &str) -> bool {
                $crate::types::id::raw_text(&self.0).is_some_and(|text| text == raw.trim())
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::types::id::raw_text(&self.0).unwrap_or_default())
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::new(id)
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(OrderId);

/// Text form of a raw id: strings as-is, numbers and booleans in JSON form.
#[doc(hidden)]
#[must_use]
pub fn raw_text(id: &RawId) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer value of a raw id, accepting integer text.
#[doc(hidden)]
#[must_use]
pub fn raw_i64(id: &RawId) -> Option<i64> {
    match id {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Next timestamp-derived id given the numeric ids already in use.
#[doc(hidden)]
pub fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    let now = Utc::now().timestamp_millis();
    match existing.max() {
        Some(max) if max >= now => max.saturating_add(1),
        _ => now,
    }
}
