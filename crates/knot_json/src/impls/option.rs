use alloc::boxed::Box;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, OptionalInfo, TypeInfo, Typed};
use crate::ops::Optional;

crate::impls::impl_generic_type_path!(impl<T> Option<T> => "core::option::Option", "Option");

impl<T: Reflect + Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(OptionalInfo::new::<Self, T>(
                || Box::new(None::<T>),
                |value| {
                    let value = value.take::<T>()?;
                    Ok(Box::new(Some(value)))
                },
            ))
        })
    }
}

impl<T: Reflect + Typed> Reflect for Option<T> {
    crate::reflection::impl_reflect_cast_fn!(Optional);
}

impl<T: Reflect + Typed> Optional for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(Reflect::as_reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(Reflect::as_reflect_mut)
    }

    #[inline]
    fn set_none(&mut self) {
        *self = None;
    }

    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        *self = Some(value.take::<T>()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::info::Typed;
    use crate::ops::Optional;

    #[test]
    fn wrap_and_clear() {
        let info = <Option<String>>::type_info().as_optional().unwrap();
        assert_eq!(info.inner().type_path(), "alloc::string::String");

        let wrapped = info.some(Box::new(String::from("x"))).unwrap();
        assert_eq!(
            wrapped.downcast_ref::<Option<String>>(),
            Some(&Some(String::from("x")))
        );
        assert!(info.some(Box::new(1_u8)).is_err());

        let mut value = Some(1_u8);
        value.set_none();
        assert!(value.value().is_none());
        value.set_some(Box::new(2_u8)).unwrap();
        assert_eq!(value, Some(2));
    }
}
