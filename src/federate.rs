//! Cross-store references.
//!
//! One store cites another store's words by suffixing the foreign
//! identifier with a tag naming the foreign store. The namespace travels
//! inside the number itself, so no registry or transport has to exist for
//! the reference to be meaningful, and the tagged encoding occupies its own
//! position in the byte order, distinct from every untagged identifier.

use crate::error::{LexError, Result};
use crate::number::{MAX_SUFFIX_PAYLOAD, Number, Suffix};

/// Tag `idn` as belonging to the foreign store named `namespace`.
///
/// The base must be a finite, unsuffixed identifier; the namespace must be
/// nonempty and fit a suffix payload.
pub fn tag(namespace: &str, idn: &Number) -> Result<Number> {
    if namespace.is_empty() {
        return Err(LexError::Unsupported(
            "a foreign store needs a nonempty name".into(),
        ));
    }
    if namespace.len() > MAX_SUFFIX_PAYLOAD {
        return Err(LexError::Unsupported(format!(
            "store name '{namespace}' exceeds {MAX_SUFFIX_PAYLOAD} bytes"
        )));
    }
    if idn.is_suffixed() {
        return Err(LexError::Unsupported(format!(
            "identifier {idn:?} is already tagged"
        )));
    }
    if !idn.is_finite() {
        return Err(LexError::Unsupported(
            "only finite identifiers can be tagged".into(),
        ));
    }
    let suffix = Suffix::new(Suffix::LEX, namespace.as_bytes())?;
    Ok(idn.with_suffix(&suffix))
}

/// Recover the foreign store name and the untagged identifier.
pub fn untag(number: &Number) -> Result<(String, Number)> {
    let suffixes = number.suffixes();
    let lex = suffixes
        .iter()
        .find(|suffix| suffix.tag() == Suffix::LEX)
        .ok_or_else(|| {
            LexError::MalformedNumber(format!("{number:?} carries no foreign-store tag"))
        })?;
    let namespace = std::str::from_utf8(lex.payload())
        .map_err(|_| {
            LexError::MalformedNumber(format!("{number:?} has a non-UTF-8 store name"))
        })?
        .to_owned();
    if namespace.is_empty() {
        return Err(LexError::MalformedNumber(format!(
            "{number:?} names an empty foreign store"
        )));
    }
    Ok((namespace, number.unsuffixed()))
}

/// Whether the number is a well-formed reference into a foreign store.
pub fn is_foreign(number: &Number) -> bool {
    number.is_suffixed() && untag(number).is_ok()
}
