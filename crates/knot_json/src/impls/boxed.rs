use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{AnyInfo, NonGenericTypeInfoCell, TypeInfo, Typed};
use crate::ops::{ReflectMut, ReflectRef};

crate::impls::impl_type_path!(
    Box<dyn Reflect>,
    "alloc::boxed::Box<dyn knot_json::Reflect>",
    "Box<dyn Reflect>"
);

impl Typed for Box<dyn Reflect> {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Any(AnyInfo::new::<Self>()))
    }
}

/// A slot holding a value of any reflected type.
///
/// `set` accepts every type; the walkers look through the box and use the
/// runtime type of its content.
impl Reflect for Box<dyn Reflect> {
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
        *self = match value.take::<Box<dyn Reflect>>() {
            Ok(inner) => inner,
            Err(value) => value,
        };
        Ok(())
    }

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Boxed(&**self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Boxed(self)
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::Reflect;
    use crate::info::ReflectKind;
    use crate::ops::ReflectRef;

    #[test]
    fn set_accepts_anything() {
        let mut slot: Box<dyn Reflect> = Box::new(1_i32);
        Reflect::set(&mut slot, Box::new(true)).unwrap();
        assert_eq!((*slot).downcast_ref::<bool>(), Some(&true));

        let nested: Box<dyn Reflect> = Box::new(7_u8);
        Reflect::set(&mut slot, Box::new(nested)).unwrap();
        assert_eq!((*slot).downcast_ref::<u8>(), Some(&7));
    }

    #[test]
    fn boxed_view_exposes_the_content() {
        let slot: Box<dyn Reflect> = Box::new(1_i32);
        assert_eq!(Reflect::reflect_ref(&slot).kind(), ReflectKind::Any);
        let ReflectRef::Boxed(inner) = Reflect::reflect_ref(&slot) else {
            panic!("expected a boxed view");
        };
        assert_eq!(inner.reflect_type_info().type_path(), "i32");
    }
}
