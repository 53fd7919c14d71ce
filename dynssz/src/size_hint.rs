use crate::{Error, SpecValues};

/// How the length of one array/sequence dimension of a field is determined.
///
/// Hints are ordered outermost dimension first; each nesting level of a field type consumes
/// one hint and hands the rest to its elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    /// A literal length written on the field.
    Fixed(u64),
    /// A literal length resolved from the active chain configuration.
    Spec(u64),
    /// The length is only known from the data.
    Dynamic,
}

impl SizeHint {
    pub fn literal_size(&self) -> Option<u64> {
        match self {
            SizeHint::Fixed(size) | SizeHint::Spec(size) => Some(*size),
            SizeHint::Dynamic => None,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, SizeHint::Dynamic)
    }

    pub fn from_spec(&self) -> bool {
        matches!(self, SizeHint::Spec(_))
    }
}

/// The size annotations of a container field as written in
/// `#[dynssz(ssz_size = "..", dynssz_size = "..")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTags {
    pub name: &'static str,
    /// Nominal per-dimension sizes: decimals or `?`.
    pub ssz_size: Option<&'static str>,
    /// Per-dimension overrides: decimals, `?` or spec expressions.
    pub dynssz_size: Option<&'static str>,
}

impl FieldTags {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            ssz_size: None,
            dynssz_size: None,
        }
    }
}

fn tokens(list: Option<&str>) -> Vec<&str> {
    match list.map(str::trim) {
        Some(list) if !list.is_empty() => list.split(',').map(str::trim).collect(),
        _ => Vec::new(),
    }
}

fn tag_error(type_name: &str, tags: &FieldTags, token: &str, reason: &'static str) -> Error {
    Error::TagParse {
        field: format!("{}.{}", type_name, tags.name),
        token: token.to_string(),
        reason,
    }
}

/// Turns the annotations of one field into per-dimension size hints.
///
/// An override replaces the nominal hint of its dimension only if it resolves to a different
/// size. If any override names a spec value the configuration does not know, all overrides
/// are ignored and the nominal hints are returned unchanged.
pub fn parse_size_hints(
    spec: &SpecValues,
    type_name: &str,
    tags: &FieldTags,
) -> Result<Vec<SizeHint>, Error> {
    let mut hints = tokens(tags.ssz_size)
        .into_iter()
        .map(|token| match token {
            "?" => Ok(SizeHint::Dynamic),
            "" => Err(tag_error(type_name, tags, token, "empty size token")),
            _ => token
                .parse::<u64>()
                .map(SizeHint::Fixed)
                .map_err(|_| tag_error(type_name, tags, token, "expected a decimal size or '?'")),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let override_tokens = tokens(tags.dynssz_size);
    if override_tokens.is_empty() {
        return Ok(hints);
    }
    if !hints.is_empty() && hints.len() != override_tokens.len() {
        return Err(tag_error(
            type_name,
            tags,
            tags.dynssz_size.unwrap_or_default(),
            "dynssz_size and ssz_size list a different number of dimensions",
        ));
    }

    let mut overrides = Vec::with_capacity(override_tokens.len());
    for token in override_tokens {
        let hint = match token {
            "?" => SizeHint::Dynamic,
            "" => return Err(tag_error(type_name, tags, token, "empty size token")),
            _ => match token.parse::<u64>() {
                Ok(size) => SizeHint::Fixed(size),
                Err(_) => match spec.resolve(token)? {
                    Some(size) => SizeHint::Spec(size),
                    None => {
                        log::debug!(
                            "{}.{}: spec value {:?} unknown, using nominal sizes",
                            type_name,
                            tags.name,
                            token
                        );
                        return Ok(hints);
                    }
                },
            },
        };
        overrides.push(hint);
    }

    if hints.is_empty() {
        return Ok(overrides);
    }
    for (hint, over) in hints.iter_mut().zip(overrides) {
        if hint.literal_size() != over.literal_size() {
            *hint = over;
        }
    }
    Ok(hints)
}
