use std::fmt;

/// Identifier of one cell inside a store.
///
/// Assigned from the store's allocation counter, so ids within a single
/// store are strictly increasing in allocation order. An id carries no
/// scope information of its own; the scope tag lives in the handle type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct RefId(u64);

impl RefId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-unique number assigned to each opened scope.
///
/// Used for log correlation and as the epoch stamp of an epoch-checked
/// store. It is never the static scope tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ScopeSerial(u64);

impl ScopeSerial {
    #[must_use]
    pub const fn new(serial: u64) -> Self {
        Self(serial)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ScopeSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
