use alloc::boxed::Box;

use crate::Reflect;
use crate::info::ReflectKind;
use crate::ops::{Array, Dictionary, Dynamic, Object, Optional, Primitive, SharedRef};

/// Immutable view of a value by kind.
pub enum ReflectRef<'a> {
    Object(&'a dyn Object),
    Array(&'a dyn Array),
    Dictionary(&'a dyn Dictionary),
    Primitive(&'a dyn Primitive),
    Dynamic(&'a dyn Dynamic),
    Optional(&'a dyn Optional),
    Shared(&'a dyn SharedRef),
    /// The content of a `Box<dyn Reflect>`.
    Boxed(&'a dyn Reflect),
}

/// Mutable view of a value by kind.
///
/// Shared values mutate through their cell, so they are viewed immutably.
pub enum ReflectMut<'a> {
    Object(&'a mut dyn Object),
    Array(&'a mut dyn Array),
    Dictionary(&'a mut dyn Dictionary),
    Primitive(&'a mut dyn Primitive),
    Dynamic(&'a mut dyn Dynamic),
    Optional(&'a mut dyn Optional),
    Shared(&'a dyn SharedRef),
    Boxed(&'a mut Box<dyn Reflect>),
}

impl ReflectRef<'_> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Object(_) => ReflectKind::Object,
            Self::Array(_) => ReflectKind::Array,
            Self::Dictionary(_) => ReflectKind::Dictionary,
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Boxed(_) => ReflectKind::Any,
        }
    }
}

impl ReflectMut<'_> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Object(_) => ReflectKind::Object,
            Self::Array(_) => ReflectKind::Array,
            Self::Dictionary(_) => ReflectKind::Dictionary,
            Self::Primitive(_) => ReflectKind::Primitive,
            Self::Dynamic(_) => ReflectKind::Dynamic,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Shared(_) => ReflectKind::Shared,
            Self::Boxed(_) => ReflectKind::Any,
        }
    }
}
