use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{DynamicTyped, TypeInfo};
use crate::ops::{ReflectMut, ReflectRef};

/// The base trait of all reflected types.
///
/// A value exposes its shape through [`reflect_ref`](Reflect::reflect_ref)
/// and [`reflect_mut`](Reflect::reflect_mut), and its static description
/// through [`reflect_type_info`](DynamicTyped::reflect_type_info). The
/// serializer and deserializer never see concrete types, only these views.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect); manual
/// implementations are needed only for new container or dynamic kinds.
pub trait Reflect: DynamicTyped + Any {
    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn into_reflect(self: Box<Self>) -> Box<dyn Reflect>;

    /// Replaces `self` with `value`, handing `value` back if its type differs.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// The [`TypeId`] of the underlying concrete type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        <dyn Any>::type_id(self)
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the box, handing it back unchanged on mismatch.
    pub fn downcast<T: Any>(self: Box<dyn Reflect>) -> Result<Box<T>, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type checked above"),
        }
    }

    /// Downcasts and unboxes.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        self.downcast::<T>().map(|value| *value)
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.reflect_type_info()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Reflect<{}>", self.type_path())
    }
}

/// Implements the kind independent methods of [`Reflect`] for `$kind`.
macro_rules! impl_reflect_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        #[inline]
        fn into_reflect(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn $crate::Reflect> {
            self
        }

        fn set(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Reflect>,
        ) -> Result<(), ::alloc::boxed::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            Ok(())
        }

        #[inline]
        fn reflect_ref(&self) -> $crate::ops::ReflectRef<'_> {
            $crate::ops::ReflectRef::$kind(self)
        }

        #[inline]
        fn reflect_mut(&mut self) -> $crate::ops::ReflectMut<'_> {
            $crate::ops::ReflectMut::$kind(self)
        }
    };
}

pub(crate) use impl_reflect_cast_fn;

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use core::any::TypeId;

    use crate::Reflect;

    #[test]
    fn downcasting() {
        let mut value: Box<dyn Reflect> = Box::new(7_i32);
        assert_eq!(value.ty_id(), TypeId::of::<i32>());
        assert!(value.is::<i32>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&7));
        *value.downcast_mut::<i32>().unwrap() = 8;

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.take::<i32>().unwrap(), 8);
    }

    #[test]
    fn set_rejects_other_types() {
        let mut value = 1_u8;
        let rejected = value.set(Box::new(2_i64)).unwrap_err();
        assert!(rejected.is::<i64>());
        value.set(Box::new(3_u8)).unwrap();
        assert_eq!(value, 3);
    }
}
