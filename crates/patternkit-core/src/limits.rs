//! # Limits
//!
//! Named numeric ceilings that bound what container and scalar matchers
//! accept, so untrusted specimens cannot force unbounded work.
//!
//! - `AllLimits` is the resolved form, with every ceiling present
//! - `Limits` is the call-site form: only the ceilings being overridden
//!
//! A matcher payload stores call-site limits as a trailing record whose
//! property names are the camelCase field names below.

use crate::passable::{CopyRecord, Passable};
use serde::{Deserialize, Serialize};

/// Every limit, resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllLimits {
    pub decimal_digits_limit: u64,
    pub string_length_limit: u64,
    pub symbol_name_length_limit: u64,
    pub num_properties_limit: u64,
    pub property_name_length_limit: u64,
    pub array_length_limit: u64,
    pub num_set_elements_limit: u64,
    pub num_unique_bag_elements_limit: u64,
    pub num_map_entries_limit: u64,
}

impl Default for AllLimits {
    fn default() -> Self {
        Self {
            decimal_digits_limit: 100,
            string_length_limit: 100_000,
            symbol_name_length_limit: 100,
            num_properties_limit: 80,
            property_name_length_limit: 100,
            array_length_limit: 10_000,
            num_set_elements_limit: 10_000,
            num_unique_bag_elements_limit: 10_000,
            num_map_entries_limit: 5000,
        }
    }
}

/// Call-site overrides. Unset fields fall through to the kit's limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_digits_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_length_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_name_length_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_properties_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_name_length_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_length_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_set_elements_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_unique_bag_elements_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_map_entries_limit: Option<u64>,
}

/// Payload property names, paired with accessors on both limit forms.
const FIELDS: [(
    &str,
    fn(&Limits) -> Option<u64>,
    fn(&mut AllLimits) -> &mut u64,
); 9] = [
    ("decimalDigitsLimit", |l| l.decimal_digits_limit, |a| &mut a.decimal_digits_limit),
    ("stringLengthLimit", |l| l.string_length_limit, |a| &mut a.string_length_limit),
    (
        "symbolNameLengthLimit",
        |l| l.symbol_name_length_limit,
        |a| &mut a.symbol_name_length_limit,
    ),
    ("numPropertiesLimit", |l| l.num_properties_limit, |a| &mut a.num_properties_limit),
    (
        "propertyNameLengthLimit",
        |l| l.property_name_length_limit,
        |a| &mut a.property_name_length_limit,
    ),
    ("arrayLengthLimit", |l| l.array_length_limit, |a| &mut a.array_length_limit),
    ("numSetElementsLimit", |l| l.num_set_elements_limit, |a| &mut a.num_set_elements_limit),
    (
        "numUniqueBagElementsLimit",
        |l| l.num_unique_bag_elements_limit,
        |a| &mut a.num_unique_bag_elements_limit,
    ),
    ("numMapEntriesLimit", |l| l.num_map_entries_limit, |a| &mut a.num_map_entries_limit),
];

impl AllLimits {
    /// Apply call-site overrides.
    #[must_use]
    pub fn merge(&self, overrides: &Limits) -> Self {
        let mut merged = *self;
        for (_, get, slot) in FIELDS {
            if let Some(value) = get(overrides) {
                *slot(&mut merged) = value;
            }
        }
        merged
    }

    /// Apply the trailing limits record of a matcher payload.
    ///
    /// Unknown property names are ignored. Numeric values saturate into
    /// range: NaN and negatives become 0, fractions truncate.
    #[must_use]
    pub fn with_payload(&self, record: Option<&CopyRecord>) -> Self {
        let Some(record) = record else {
            return *self;
        };
        let mut merged = *self;
        for (name, _, slot) in FIELDS {
            if let Some(Passable::Number(n)) = record.get(name) {
                *slot(&mut merged) = *n as u64;
            }
        }
        merged
    }
}

impl Limits {
    /// Overrides with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        FIELDS.iter().all(|(_, get, _)| get(self).is_none())
    }

    #[must_use]
    pub fn decimal_digits(mut self, limit: u64) -> Self {
        self.decimal_digits_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn string_length(mut self, limit: u64) -> Self {
        self.string_length_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn symbol_name_length(mut self, limit: u64) -> Self {
        self.symbol_name_length_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn num_properties(mut self, limit: u64) -> Self {
        self.num_properties_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn property_name_length(mut self, limit: u64) -> Self {
        self.property_name_length_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn array_length(mut self, limit: u64) -> Self {
        self.array_length_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn num_set_elements(mut self, limit: u64) -> Self {
        self.num_set_elements_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn num_unique_bag_elements(mut self, limit: u64) -> Self {
        self.num_unique_bag_elements_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn num_map_entries(mut self, limit: u64) -> Self {
        self.num_map_entries_limit = Some(limit);
        self
    }

    /// The payload record form: one numeric property per set field.
    #[must_use]
    pub fn to_record(&self) -> Passable {
        Passable::record(
            FIELDS
                .iter()
                .filter_map(|(name, get, _)| get(self).map(|v| (*name, Passable::Number(v as f64)))),
        )
    }
}
