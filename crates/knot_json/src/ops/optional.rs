use alloc::boxed::Box;

use crate::Reflect;

/// `Option<T>` seen without `T`.
pub trait Optional: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;

    fn set_none(&mut self);

    /// Stores `Some(value)`, handing `value` back if it is not a `T`.
    fn set_some(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}
