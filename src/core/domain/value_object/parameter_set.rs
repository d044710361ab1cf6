//! Encoding of named call arguments into wire-format parameters.
//!
//! Operations accept optional, typed arguments under logical names; the
//! wire expects flat `name=value` pairs with some names spelled differently
//! (`icmp_type` becomes `icmp-type`) and device families flattened into
//! numbered keys (`net0`, `net1`, ...). This module performs exactly that
//! translation and nothing else; transport encoding (query string vs. form
//! body) belongs to the dispatcher.

use std::collections::BTreeMap;

/// A scalar argument value.
///
/// Booleans serialize as `1`/`0`, the convention the PVE wire format uses
/// for flags (`purge=1`, `force=0`).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    pub(crate) fn to_wire(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Bool(true) => "1".to_string(),
            ParamValue::Bool(false) => "0".to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(value.into())
    }
}

impl From<u16> for ParamValue {
    fn from(value: u16) -> Self {
        ParamValue::Integer(value.into())
    }
}

/// A per-operation table mapping logical argument names to wire names.
/// Names absent from the table pass through unchanged.
pub type RenameTable = &'static [(&'static str, &'static str)];

/// The wire-format parameter collection for one call.
///
/// Entries keep insertion order. Absent (`None`) arguments are omitted
/// entirely; the wire format must never see a key with an empty stand-in
/// value.
///
/// # Examples
///
/// ```
/// use pverest::ParameterSet;
///
/// const RENAMES: &[(&str, &str)] = &[("icmp_type", "icmp-type")];
///
/// let params = ParameterSet::with_renames(RENAMES)
///     .arg("icmp_type", Some(8))
///     .arg("comment", None::<&str>)
///     .arg("enable", Some(true));
/// assert_eq!(
///     params.pairs(),
///     &[
///         ("icmp-type".to_string(), "8".to_string()),
///         ("enable".to_string(), "1".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    renames: RenameTable,
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Creates an empty set with no rename table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set whose argument names are mapped through `renames`.
    #[must_use]
    pub fn with_renames(renames: RenameTable) -> Self {
        Self {
            renames,
            entries: Vec::new(),
        }
    }

    fn wire_name<'a>(&self, logical: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(from, _)| *from == logical)
            .map(|(_, to)| *to)
            .unwrap_or(logical)
    }

    /// Adds one named argument. `None` values are skipped.
    #[must_use]
    pub fn arg<V: Into<ParamValue>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            let wire = self.wire_name(name).to_string();
            self.entries.push((wire, value.into().to_wire()));
        }
        self
    }

    /// Adds an indexed parameter family: one `{base}{index}` entry per
    /// present index, in ascending index order. Missing indices produce no
    /// key.
    #[must_use]
    pub fn indexed<V>(mut self, base: &str, values: &BTreeMap<u32, V>) -> Self
    where
        V: Clone + Into<ParamValue>,
    {
        let wire = self.wire_name(base).to_string();
        for (index, value) in values {
            self.entries
                .push((format!("{wire}{index}"), value.clone().into().to_wire()));
        }
        self
    }

    /// The encoded `(wire name, wire value)` pairs in insertion order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
