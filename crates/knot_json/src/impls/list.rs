use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::Reflect;
use crate::impls::concat;
use crate::info::{ArgumentError, ArrayInfo, GenericTypeInfoCell, GenericTypePathCell};
use crate::info::{TypeInfo, TypePath, Typed, take_argument};
use crate::ops::{Array, ArrayIter};

/// `$items` names the type whose `get`, `get_mut` and `iter` are used, since
/// `Vec` only has them through its slice.
macro_rules! impl_growable {
    ($ty:ident, $path:literal, $items:ty, $push:ident) => {
        crate::impls::impl_generic_type_path!(impl<T> $ty<T> => $path, stringify!($ty));

        impl<T: Reflect + Typed> Typed for $ty<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Array(ArrayInfo::new::<Self, T>().with_create(|| Box::new($ty::<T>::new())))
                })
            }
        }

        impl<T: Reflect + Typed> Reflect for $ty<T> {
            crate::reflection::impl_reflect_cast_fn!(Array);
        }

        impl<T: Reflect + Typed> Array for $ty<T> {
            #[inline]
            fn len(&self) -> usize {
                $ty::len(self)
            }

            #[inline]
            fn get(&self, index: usize) -> Option<&dyn Reflect> {
                <$items>::get(self, index).map(Reflect::as_reflect)
            }

            #[inline]
            fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
                <$items>::get_mut(self, index).map(Reflect::as_reflect_mut)
            }

            fn iter(&self) -> ArrayIter<'_> {
                Box::new(<$items>::iter(self).map(Reflect::as_reflect))
            }

            fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
                $ty::$push(self, value.take::<T>()?);
                Ok(())
            }

            #[inline]
            fn clear(&mut self) {
                $ty::clear(self);
            }
        }
    };
}

impl_growable!(Vec, "alloc::vec::Vec", [T], push);
impl_growable!(VecDeque, "alloc::collections::VecDeque", VecDeque<T>, push_back);

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: TypePath> TypePath for Box<[T]> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert_str::<Self>(|| concat(&["alloc::boxed::Box<[", T::type_path(), "]>"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert_str::<Self>(|| concat(&["Box<[", T::type_name(), "]>"]))
    }
}

fn collect_items<T: Reflect + Typed>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, ArgumentError> {
    let len = items.len();
    let mut items = items.into_iter();
    let values = (0..len)
        .map(|index| take_argument::<T>(&mut items, index))
        .collect::<Result<Box<[T]>, _>>()?;
    Ok(Box::new(values))
}

/// A fixed length array: it is built from the complete element list and
/// cannot grow.
impl<T: Reflect + Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(ArrayInfo::new::<Self, T>().with_from_items(collect_items::<T>))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Box<[T]> {
    crate::reflection::impl_reflect_cast_fn!(Array);
}

impl<T: Reflect + Typed> Array for Box<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(Reflect::as_reflect_mut)
    }

    fn iter(&self) -> ArrayIter<'_> {
        Box::new(<[T]>::iter(self).map(Reflect::as_reflect))
    }

    #[inline]
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Err(value)
    }

    #[inline]
    fn clear(&mut self) {
        *self = Box::new([]);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{TypePath, Typed};
    use crate::ops::Array;

    #[test]
    fn growable_arrays_push() {
        let mut list: Vec<i32> = vec![1];
        Array::push(&mut list, Box::new(2_i32)).unwrap();
        assert!(Array::push(&mut list, Box::new(1_i64)).is_err());
        assert_eq!(list, [1, 2]);

        let mut deque = VecDeque::<u8>::new();
        Array::push(&mut deque, Box::new(4_u8)).unwrap();
        assert_eq!(Array::len(&deque), 1);
    }

    #[test]
    fn boxed_slices_are_built_whole() {
        let info = <Box<[u8]>>::type_info().as_array().unwrap();
        assert!(info.create_fn().is_none());
        let from_items = info.from_items_fn().unwrap();
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8), Box::new(2_u8)];
        let built = from_items(items).unwrap().take::<Box<[u8]>>().unwrap();
        assert_eq!(&*built, &[1, 2]);

        let bad: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8), Box::new(2_i64)];
        assert_eq!(from_items(bad).unwrap_err().index, 1);
        assert_eq!(<Box<[u8]>>::type_path(), "alloc::boxed::Box<[u8]>");
    }
}
