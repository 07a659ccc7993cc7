use alloc::boxed::Box;
use alloc::collections::BTreeSet;
use core::hash::Hash;
use std::collections::HashSet;

use crate::Reflect;
use crate::info::{ArrayInfo, GenericTypeInfoCell, TypeInfo, Typed};
use crate::ops::{Array, ArrayIter};

macro_rules! impl_set {
    ($ty:ident, $path:literal, $($bound:tt)+) => {
        crate::impls::impl_generic_type_path!(impl<T> $ty<T> => $path, stringify!($ty));

        impl<T: Reflect + Typed + $($bound)+> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Array(
                        ArrayInfo::new::<Self, T>()
                            .with_create(|| Box::new($ty::<T>::new()))
                            .with_set(true),
                    )
                })
            }
        }

        impl<T: Reflect + Typed + $($bound)+> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Array);
        }

        impl<T: Reflect + Typed + $($bound)+> Array for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                $ty::iter(self).nth(index).map(Reflect::as_reflect)
            }

            /// Set elements are their own keys and cannot be changed in place.
            #[inline]
            fn get_mut(&mut self, _index: usize) -> Option<&mut dyn Reflect> {
                None
            }

            fn iter(&self) -> ArrayIter<'_> {
                Box::new($ty::iter(self).map(Reflect::as_reflect))
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                $ty::insert(self, value.take::<T>()?);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                $ty::clear(self);
            }
        }
    };
}

impl_set!(HashSet, "std::collections::HashSet", Eq + Hash);
impl_set!(BTreeSet, "alloc::collections::BTreeSet", Ord);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;

    use crate::info::Typed;
    use crate::ops::Array;

    #[test]
    fn sets_deduplicate() {
        let mut set = BTreeSet::<u8>::new();
        Array::push(&mut set, Box::new(2_u8)).unwrap();
        Array::push(&mut set, Box::new(2_u8)).unwrap();
        Array::push(&mut set, Box::new(1_u8)).unwrap();
        assert_eq!(Array::len(&set), 2);
        assert_eq!(Array::get(&set, 0).unwrap().downcast_ref::<u8>(), Some(&1));
        assert!(Array::get_mut(&mut set, 0).is_none());
        assert!(<BTreeSet<u8>>::type_info().as_array().unwrap().is_set());
    }
}
