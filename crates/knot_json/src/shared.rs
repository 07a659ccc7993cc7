use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use core::fmt;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, SharedInfo, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef, SharedRef};

/// A shared, mutable reference: the only kind of value with identity.
///
/// Cloning a `Shared` clones the handle, not the value. Two handles to the
/// same allocation are written once and then referenced by `$ref` when
/// references are preserved, and the walk detects loops through them.
///
/// ```
/// use knot_json::Shared;
///
/// let a = Shared::new(1);
/// let b = a.clone();
/// *b.borrow_mut() += 1;
/// assert_eq!(*a.borrow(), 2);
/// assert!(Shared::ptr_eq(&a, &b));
/// ```
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// # Panics
    ///
    /// Panics if the value is mutably borrowed.
    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// # Panics
    ///
    /// Panics if the value is borrowed.
    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    #[inline]
    pub fn try_borrow(&self) -> Result<Ref<'_, T>, BorrowError> {
        self.0.try_borrow()
    }

    #[inline]
    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, T>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    #[inline]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// Number of handles to the allocation.
    #[inline]
    pub fn handle_count(this: &Self) -> usize {
        Rc::strong_count(&this.0)
    }

    #[inline]
    fn address(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    #[inline]
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.address())
    }
}

crate::impls::impl_generic_type_path!(impl<T> Shared<T> => "knot_json::Shared", "Shared");

impl<T: Reflect + Typed> Typed for Shared<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Shared(SharedInfo::new::<Self, T>(|value| {
                let value = value.take::<T>()?;
                Ok(Box::new(Shared::new(value)))
            }))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Shared<T> {
    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect {
        self
    }

    #[inline]
    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        self
    }

    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = value.take::<Self>()?;
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Shared(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Shared(&*self)
    }
}

impl<T: Reflect + Typed> SharedRef for Shared<T> {
    #[inline]
    fn address(&self) -> usize {
        Shared::address(self)
    }

    fn try_borrow_inner(&self) -> Result<Ref<'_, dyn Reflect>, BorrowError> {
        self.0
            .try_borrow()
            .map(|inner| Ref::map(inner, |value| value as &dyn Reflect))
    }

    fn try_borrow_inner_mut(&self) -> Result<RefMut<'_, dyn Reflect>, BorrowMutError> {
        self.0
            .try_borrow_mut()
            .map(|inner| RefMut::map(inner, |value| value as &mut dyn Reflect))
    }

    #[inline]
    fn clone_handle(&self) -> Box<dyn Reflect> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::Shared;
    use crate::Reflect;
    use crate::info::Typed;
    use crate::ops::{ReflectRef, SharedRef};

    #[test]
    fn handles_share_identity() {
        let a = Shared::new(5_i32);
        let b = a.clone();
        let c = Shared::new(5_i32);
        assert_eq!(SharedRef::address(&a), SharedRef::address(&b));
        assert_ne!(SharedRef::address(&a), SharedRef::address(&c));
        assert_eq!(Shared::handle_count(&a), 2);
    }

    #[test]
    fn inner_access_through_reflection() {
        let a = Shared::new(5_i32);
        let ReflectRef::Shared(shared) = a.reflect_ref() else {
            panic!("expected a shared value");
        };
        shared
            .try_borrow_inner_mut()
            .unwrap()
            .set(Box::new(9_i32))
            .unwrap();
        assert_eq!(*a.borrow(), 9);

        let _guard = a.borrow_mut();
        assert!(shared.try_borrow_inner().is_err());
    }

    #[test]
    fn wrap_moves_into_new_allocation() {
        let info = <Shared<u8>>::type_info().as_shared().unwrap();
        let wrapped = info.wrap(Box::new(3_u8)).unwrap();
        let wrapped = wrapped.take::<Shared<u8>>().unwrap();
        assert_eq!(*wrapped.borrow(), 3);
        assert_eq!(<Shared<u8>>::type_info().type_path(), "knot_json::Shared<u8>");
    }
}
