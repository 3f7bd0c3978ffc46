use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use corral_types::RefId;

use crate::brand::Brand;

/// Handle to a mutable cell of type `T` in the scope branded `'id`.
///
/// Carries no value, only the cell's id and, in its type, the brand of the
/// store that allocated it. There is no public constructor: the only way to
/// obtain one is [`Scope::alloc`](crate::Scope::alloc).
///
/// Equality compares ids. Comparing handles of different scopes does not
/// type-check, since their brands differ.
///
/// `T` is invariant, so a handle cannot be coerced to a supertype of the
/// type its cell was allocated at:
///
/// ```compile_fail
/// corral_engine::run_scoped(|scope| {
///     let cell = scope.alloc::<for<'a> fn(&'a u8)>(|_| {});
///     let widened: corral_engine::Ref<'_, fn(&'static u8)> = cell;
/// });
/// ```
pub struct Ref<'id, T> {
    id: RefId,
    _brand: Brand<'id>,
    _cell: PhantomData<fn(T) -> T>,
}

impl<T> Ref<'_, T> {
    pub(crate) const fn new(id: RefId) -> Self {
        Self {
            id,
            _brand: Brand::new(),
            _cell: PhantomData,
        }
    }

    #[must_use]
    pub fn id(self) -> RefId {
        self.id
    }
}

impl<T> Clone for Ref<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<'_, T> {}

impl<T> PartialEq for Ref<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Ref<'_, T> {}

impl<T> Hash for Ref<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Ref<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ref").field(&self.id.value()).finish()
    }
}
