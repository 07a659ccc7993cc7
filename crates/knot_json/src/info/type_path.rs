use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

/// A static, stable name for a type.
///
/// The full path is what `$type` carries on the wire, the short name is the
/// fallback the [`TypeRegistry`](crate::registry::TypeRegistry) accepts when
/// it is unambiguous.
///
/// Implemented by [`#[derive(Reflect)]`](crate::derive::Reflect) as
/// `module_path!() + "::" + ident`, or by `#[knot(type_path = "...")]`.
pub trait TypePath: 'static {
    /// Fully qualified path, e.g. `alloc::vec::Vec<i32>`.
    fn type_path() -> &'static str;

    /// Short name, e.g. `Vec<i32>`.
    fn type_name() -> &'static str;
}

/// The identity and names of a type.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
