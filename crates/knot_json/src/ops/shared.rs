use alloc::boxed::Box;
use core::cell::{BorrowError, BorrowMutError, Ref, RefMut};

use crate::Reflect;

/// An identity-bearing handle, implemented by [`Shared`](crate::Shared).
///
/// Identity is the address of the shared allocation: two handles are the
/// same reference exactly when their addresses are equal.
pub trait SharedRef: Reflect {
    fn address(&self) -> usize;

    fn try_borrow_inner(&self) -> Result<Ref<'_, dyn Reflect>, BorrowError>;

    fn try_borrow_inner_mut(&self) -> Result<RefMut<'_, dyn Reflect>, BorrowMutError>;

    /// A new handle to the same allocation.
    fn clone_handle(&self) -> Box<dyn Reflect>;
}
