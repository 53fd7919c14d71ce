use crate::Error;
use dynssz_spec::{MainnetPreset, MinimalPreset, Preset};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static MAINNET: Lazy<SpecValues> = Lazy::new(SpecValues::from_preset::<MainnetPreset>);
static MINIMAL: Lazy<SpecValues> = Lazy::new(SpecValues::from_preset::<MinimalPreset>);

/// A single chain configuration entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecValue {
    Uint(u64),
    /// Anything that is not an unsigned integer, e.g. a fork version or a preset name.
    Other(String),
}

/// The chain configuration sizes are resolved against.
///
/// Immutable once handed to a [`DynSsz`](crate::DynSsz).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecValues {
    values: BTreeMap<String, SpecValue>,
}

impl SpecValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// The constants of a compiled-in preset, plus its name as `PRESET_BASE`.
    pub fn from_preset<P: Preset>() -> Self {
        let mut values: Self = P::values().into_iter().collect();
        values.insert("PRESET_BASE", SpecValue::Other(P::NAME.to_string()));
        values
    }

    pub fn mainnet() -> Self {
        MAINNET.clone()
    }

    pub fn minimal() -> Self {
        MINIMAL.clone()
    }

    /// Parses a consensus chain config or preset file: a flat YAML mapping of upper-case
    /// names to values. Integers (bare or quoted) become [`SpecValue::Uint`], everything
    /// else is kept verbatim as [`SpecValue::Other`].
    pub fn from_yaml_str(document: &str) -> Result<Self, Error> {
        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(document)?;
        let mut values = Self::new();
        for (name, value) in raw {
            let value = match value {
                serde_yaml::Value::Number(n) => match n.as_u64() {
                    Some(v) => SpecValue::Uint(v),
                    None => SpecValue::Other(n.to_string()),
                },
                serde_yaml::Value::String(s) => match s.parse::<u64>() {
                    Ok(v) => SpecValue::Uint(v),
                    Err(_) => SpecValue::Other(s),
                },
                serde_yaml::Value::Bool(b) => SpecValue::Other(b.to_string()),
                serde_yaml::Value::Null => SpecValue::Other(String::new()),
                other => SpecValue::Other(serde_yaml::to_string(&other)?.trim_end().to_string()),
            };
            values.insert(name, value);
        }
        log::debug!("Loaded {} spec values from chain config", values.len());
        Ok(values)
    }

    pub fn with_value(mut self, name: impl Into<String>, value: u64) -> Self {
        self.insert(name, SpecValue::Uint(value));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: SpecValue) -> Option<SpecValue> {
        self.values.insert(name.into(), value)
    }

    /// Overlays `other` on top of `self`, e.g. chain config overrides on top of a preset.
    pub fn merge(mut self, other: SpecValues) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SpecValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves a spec value name or a small arithmetic expression over names and decimal
    /// literals (`SYNC_COMMITTEE_SIZE/8`, `A/B`, `A+1`).
    ///
    /// `Ok(None)` means some referenced name is not configured, which callers treat as
    /// "not spec dependent". A configured name that is not an unsigned integer is an error.
    pub fn resolve(&self, name: &str) -> Result<Option<u64>, Error> {
        let name = name.trim();
        if self.values.contains_key(name) {
            return self.lookup(name);
        }
        self.evaluate(name, name)
    }

    fn lookup(&self, name: &str) -> Result<Option<u64>, Error> {
        match self.values.get(name) {
            Some(SpecValue::Uint(v)) => Ok(Some(*v)),
            Some(SpecValue::Other(raw)) => Err(Error::SpecValueType {
                name: name.to_string(),
                value: raw.clone(),
            }),
            None => Ok(None),
        }
    }

    fn evaluate(&self, expression: &str, full: &str) -> Result<Option<u64>, Error> {
        // split on the rightmost operator of the loosest binding class, which makes
        // `A-B-C` evaluate as `(A-B)-C`
        for operators in [&['+', '-'][..], &['*', '/'][..]] {
            if let Some(pos) = expression.rfind(operators) {
                let lhs = match self.evaluate(expression[..pos].trim(), full)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                let rhs = match self.evaluate(expression[pos + 1..].trim(), full)? {
                    Some(v) => v,
                    None => return Ok(None),
                };
                let result = match &expression[pos..pos + 1] {
                    "+" => lhs.checked_add(rhs),
                    "-" => lhs.checked_sub(rhs),
                    "*" => lhs.checked_mul(rhs),
                    _ => lhs.checked_div(rhs),
                };
                return result.map(Some).ok_or_else(|| Error::InvalidSpecExpression {
                    expression: full.to_string(),
                    reason: "arithmetic overflow or division by zero",
                });
            }
        }
        self.operand(expression, full)
    }

    fn operand(&self, token: &str, full: &str) -> Result<Option<u64>, Error> {
        if token.is_empty() {
            return Err(Error::InvalidSpecExpression {
                expression: full.to_string(),
                reason: "missing operand",
            });
        }
        if token.bytes().all(|b| b.is_ascii_digit()) {
            return token
                .parse::<u64>()
                .map(Some)
                .map_err(|_| Error::InvalidSpecExpression {
                    expression: full.to_string(),
                    reason: "literal does not fit into 64 bits",
                });
        }
        self.lookup(token)
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for SpecValues {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), SpecValue::Uint(v)))
                .collect(),
        }
    }
}
