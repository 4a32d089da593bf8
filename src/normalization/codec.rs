//! The shared encode/decode contract.

use super::CodeError;

/// An enumeration persisted as a numeric code and exchanged as a label.
///
/// Implementors provide exhaustive `match`es for [`code`](Self::code),
/// [`label`](Self::label) and [`from_code`](Self::from_code). Label decoding
/// is derived from [`ALL`](Self::ALL) plus optional one-way aliases.
pub trait CodedEnum: Sized + Copy + Eq + 'static {
    /// Human-readable enumeration name used in error messages.
    const KIND: &'static str;

    /// Every variant, in code order.
    const ALL: &'static [Self];

    /// Returns the numeric storage code.
    fn code(self) -> i16;

    /// Returns the canonical semantic label.
    fn label(self) -> &'static str;

    /// Decodes a numeric storage code.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::UnknownCode`] when `code` has no mapping.
    fn from_code(code: i16) -> Result<Self, CodeError>;

    /// Resolves a normalized label that is accepted on input but never
    /// produced on output.
    #[must_use]
    fn alias(_normalized: &str) -> Option<Self> {
        None
    }

    /// Decodes a semantic label.
    ///
    /// Matching ignores case, surrounding whitespace, and treats spaces and
    /// hyphens as underscores.
    ///
    /// # Errors
    ///
    /// Returns [`CodeError::UnknownLabel`] when the label has no mapping.
    fn from_label(value: &str) -> Result<Self, CodeError> {
        let normalized = normalize_label(value);
        Self::ALL
            .iter()
            .copied()
            .find(|variant| variant.label() == normalized)
            .or_else(|| Self::alias(&normalized))
            .ok_or_else(|| CodeError::UnknownLabel {
                kind: Self::KIND,
                value: value.to_owned(),
            })
    }
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
