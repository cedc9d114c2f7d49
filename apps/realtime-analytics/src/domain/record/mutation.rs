//! Mutation Builder
//!
//! Turns an attribute map into a partial-update statement against one
//! instrument record:
//!
//! ```text
//! SET seq = :seq, price_bid = :price_bid
//! {":seq": {"N": "3"}, ":price_bid": {"N": "100.50"}}
//! ```
//!
//! Attributes absent from the map are left untouched by the store.

use indexmap::IndexMap;

use super::StoredRecord;
use crate::domain::message::{AttributeMap, TypedValue, WireValue};

/// Attribute carrying the per-instrument message sequence number.
pub const SEQUENCE_ATTRIBUTE: &str = "seq";

/// Prefix of value placeholders in the update expression.
const PLACEHOLDER_PREFIX: char = ':';

/// Mutation building errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    /// The message carried no attributes besides its key.
    #[error("no attributes to update")]
    Empty,
}

// =============================================================================
// Sequence Guard
// =============================================================================

/// Write condition admitting only strictly newer sequence numbers.
///
/// Equivalent to `attribute_not_exists(seq) OR seq < :seq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceGuard {
    sequence: i64,
}

impl SequenceGuard {
    /// Condition expression sent alongside the update.
    pub const CONDITION: &'static str = "attribute_not_exists(seq) OR seq < :seq";

    /// Guard for an incoming sequence number.
    #[must_use]
    pub const fn new(sequence: i64) -> Self {
        Self { sequence }
    }

    /// The incoming sequence number.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }

    /// Evaluate the condition against the record's current state.
    ///
    /// A stored `seq` that is not a number fails the comparison, as it would
    /// in a typed store.
    #[must_use]
    pub fn admits(&self, current: Option<&StoredRecord>) -> bool {
        match current.and_then(|record| record.get(SEQUENCE_ATTRIBUTE)) {
            None => true,
            Some(stored) => stored
                .as_number()
                .and_then(|n| n.parse::<i64>().ok())
                .is_some_and(|stored| stored < self.sequence),
        }
    }
}

// =============================================================================
// Update Mutation
// =============================================================================

/// A partial update of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMutation {
    expression: String,
    values: IndexMap<String, WireValue>,
    condition: Option<SequenceGuard>,
}

impl UpdateMutation {
    /// Build a `SET` expression naming every attribute once, in map order.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Empty` for an empty map; an empty `SET` clause
    /// is never produced.
    pub fn build(attributes: &AttributeMap) -> Result<Self, MutationError> {
        if attributes.is_empty() {
            return Err(MutationError::Empty);
        }

        let mut assignments = Vec::with_capacity(attributes.len());
        let mut values = IndexMap::with_capacity(attributes.len());

        for (name, value) in attributes {
            let placeholder = format!("{PLACEHOLDER_PREFIX}{name}");
            assignments.push(format!("{name} = {placeholder}"));
            values.insert(placeholder, value.to_wire());
        }

        Ok(Self {
            expression: format!("SET {}", assignments.join(", ")),
            values,
            condition: None,
        })
    }

    /// Attach a sequence guard when the attributes carry an integer `seq`.
    #[must_use]
    pub fn guarded_by_sequence(mut self, attributes: &AttributeMap) -> Self {
        self.condition = attributes
            .get(SEQUENCE_ATTRIBUTE)
            .and_then(TypedValue::as_integer)
            .map(SequenceGuard::new);
        self
    }

    /// The `SET ...` update expression.
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Placeholder (`:name`) to wire value.
    #[must_use]
    pub const fn values(&self) -> &IndexMap<String, WireValue> {
        &self.values
    }

    /// The write condition, if any.
    #[must_use]
    pub const fn condition(&self) -> Option<&SequenceGuard> {
        self.condition.as_ref()
    }

    /// Attribute name and value pairs this mutation sets.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.values.iter().map(|(placeholder, value)| {
            let name = placeholder
                .strip_prefix(PLACEHOLDER_PREFIX)
                .unwrap_or(placeholder);
            (name, value)
        })
    }

    /// Number of attributes set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty mutations cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
