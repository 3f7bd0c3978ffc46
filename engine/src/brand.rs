//! Lifetime brand used as the static scope tag.

use std::marker::PhantomData;

/// Zero-sized marker tying a value to one scope.
///
/// `'id` is invariant: `fn(&'id ()) -> &'id ()` is contravariant in its
/// argument and covariant in its return, so the compiler can neither
/// shrink nor grow `'id` to make two different brands agree. Every call
/// to `run_scoped` introduces a fresh higher-ranked `'id`, so brands from
/// different calls never unify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Brand<'id>(PhantomData<fn(&'id ()) -> &'id ()>);

impl Brand<'_> {
    /// Only the scope boundary mints brands.
    pub(crate) const fn new() -> Self {
        Self(PhantomData)
    }
}
