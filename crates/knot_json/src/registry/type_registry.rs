use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::hash::{HashMap, HashSet};
use crate::info::{TypeInfo, Typed, collect_types};
use crate::Expando;

/// Types a `$type` name may resolve to.
///
/// Names are looked up by full type path first, then by short type name.
/// A short name shared by several registered types resolves to nothing.
///
/// # Example
///
/// ```
/// use knot_json::registry::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Vec<Option<u8>>>();
///
/// assert!(registry.get_with_type_path("alloc::vec::Vec<core::option::Option<u8>>").is_some());
/// assert!(registry.get_with_type_name("Option<u8>").is_some());
/// assert!(registry.get_with_type_name("u8").is_some());
/// ```
pub struct TypeRegistry {
    infos: HashMap<TypeId, &'static TypeInfo>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            infos: HashMap::default(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
        }
    }

    /// A registry holding the scalars, the node types and [`Expando`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<char>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<serde_json::Value>();
        registry.register::<serde_json::Map<String, serde_json::Value>>();
        registry.register::<Expando>();
        registry
    }

    /// Registers `T` and, recursively, the types it refers to.
    #[inline]
    pub fn register<T: Typed>(&mut self) {
        self.register_info(T::type_info());
    }

    /// Registers `info` and the types it refers to.
    ///
    /// Returns `false` if the type was already registered.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if self.infos.contains_key(&info.type_id()) {
            return false;
        }
        self.insert(info);

        for dependency in dependencies(info) {
            self.register_info(dependency);
        }
        true
    }

    fn insert(&mut self, info: &'static TypeInfo) {
        let ty = info.ty();
        self.infos.insert(ty.id(), info);
        self.type_path_to_id.insert(ty.path(), ty.id());

        let name = ty.name();
        if self.ambiguous_names.contains(name) {
            return;
        }
        if self.type_name_to_id.remove(name).is_some() {
            self.ambiguous_names.insert(name);
        } else {
            self.type_name_to_id.insert(name, ty.id());
        }
    }

    /// Registers every type marked `#[knot(auto_register)]`.
    ///
    /// Returns `true` if link time collection is available on this platform.
    /// Repeated calls are cheap.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;
            if self.contains(TypeId::of::<auto_register::AvailFlag>()) {
                return true;
            }
            auto_register::register_types(self);
            self.contains(TypeId::of::<auto_register::AvailFlag>())
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.infos.contains_key(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.infos.get(&type_id).copied()
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&'static TypeInfo> {
        self.get(*self.type_path_to_id.get(type_path)?)
    }

    /// `None` for unknown and for ambiguous names.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&'static TypeInfo> {
        self.get(*self.type_name_to_id.get(type_name)?)
    }

    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Resolves a `$type` name: full path first, then unambiguous short name.
    pub fn resolve_name(&self, name: &str) -> Option<&'static TypeInfo> {
        self.get_with_type_path(name)
            .or_else(|| self.get_with_type_name(name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static TypeInfo> + '_ {
        self.infos.values().copied()
    }
}

/// Types `info` refers to directly.
fn dependencies(info: &'static TypeInfo) -> Vec<&'static TypeInfo> {
    let mut out = Vec::new();
    match info {
        TypeInfo::Object(object) => {
            collect_types(object.members(), &mut out);
            for constructor in object.constructors() {
                out.extend(constructor.params().iter().map(|param| param.type_info()));
            }
        }
        TypeInfo::Dynamic(dynamic) => collect_types(dynamic.members(), &mut out),
        TypeInfo::Array(array) => out.push(array.item_info()),
        TypeInfo::Dictionary(dictionary) => out.push(dictionary.value_info()),
        TypeInfo::Optional(optional) => out.push(optional.inner()),
        TypeInfo::Shared(shared) => out.push(shared.inner()),
        TypeInfo::Primitive(_) | TypeInfo::Any(_) => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::TypeId;

    use super::TypeRegistry;
    use crate::Shared;

    #[test]
    fn registers_dependencies() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Vec<Shared<Option<String>>>>();
        assert!(registry.contains(TypeId::of::<Shared<Option<String>>>()));
        assert!(registry.contains(TypeId::of::<Option<String>>()));
        assert!(registry.contains(TypeId::of::<String>()));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn ambiguous_short_names() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Vec<u8>>();
        registry.register::<alloc::collections::VecDeque<u8>>();
        assert!(registry.resolve_name("Vec<u8>").is_some());
        assert!(registry.resolve_name("alloc::vec::Vec<u8>").is_some());
        assert!(registry.resolve_name("Nope").is_none());
        assert!(!registry.is_ambiguous("u8"));
    }
}
