//! Tagged result and patch shapes shared by service and store contracts.

/// Per-field update instruction for partial updates.
///
/// Distinguishes "field not supplied" from "field explicitly cleared", which a
/// plain `Option<T>` cannot express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch<T> {
    /// Leave the stored value untouched.
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Reset the stored value to absent.
    Clear,
}

impl<T> FieldPatch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Applies this patch on top of the current value.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    pub fn as_ref(&self) -> FieldPatch<&T> {
        match self {
            Self::Keep => FieldPatch::Keep,
            Self::Set(value) => FieldPatch::Set(value),
            Self::Clear => FieldPatch::Clear,
        }
    }
}

impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> From<Option<Option<T>>> for FieldPatch<T> {
    /// Maps the `absent / null / value` wire shape onto a patch.
    fn from(value: Option<Option<T>>) -> Self {
        match value {
            None => Self::Keep,
            Some(None) => Self::Clear,
            Some(Some(inner)) => Self::Set(inner),
        }
    }
}

/// Outcome of a point lookup.
///
/// Absence is a normal result, kept apart from store faults which travel in
/// the surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}
