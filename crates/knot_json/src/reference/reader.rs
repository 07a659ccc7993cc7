use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use log::trace;

use crate::Reflect;
use crate::error::{ErrorKind, JsonPath, Result};
use crate::hash::HashMap;
use crate::info::ReflectKind;
use crate::ops::{ReflectMut, ReflectRef};

/// One hop from a value to a slot inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// Object member by index, or declared member of a dynamic object.
    Member(usize),
    Item(usize),
    Key(String),
    /// Runtime member of a dynamic object.
    Dynamic(String),
    Some,
    Boxed,
    Shared,
}

/// A `$ref` read before its `$id`, to be written once the call completes.
struct PendingPatch {
    id: String,
    steps: Vec<Step>,
    path: JsonPath,
}

/// Ids registered during one deserialize call.
#[derive(Default)]
pub(crate) struct ReferenceReader {
    handles: HashMap<String, Box<dyn Reflect>>,
    pending: Vec<PendingPatch>,
}

impl ReferenceReader {
    /// Registers the shared handle read with `$id`.
    pub fn register(&mut self, id: &str, handle: Box<dyn Reflect>) -> Result<()> {
        if self.handles.contains_key(id) {
            return Err(ErrorKind::DuplicateReference { id: id.into() }.into());
        }
        self.handles.insert(id.into(), handle);
        Ok(())
    }

    /// A new handle to the value registered as `id`.
    pub fn resolve(&self, id: &str) -> Option<Box<dyn Reflect>> {
        match (**self.handles.get(id)?).reflect_ref() {
            ReflectRef::Shared(shared) => Some(shared.clone_handle()),
            _ => None,
        }
    }

    pub fn defer(&mut self, id: &str, steps: Vec<Step>, path: &JsonPath) {
        trace!("deferring reference `{id}` at '{path}'");
        self.pending.push(PendingPatch {
            id: id.into(),
            steps,
            path: path.clone(),
        });
    }

    /// Writes every deferred reference into `root`.
    pub fn finish(self, root: &mut dyn Reflect) -> Result<()> {
        for patch in &self.pending {
            let handle = self.resolve(&patch.id).ok_or_else(|| {
                crate::Error::from(ErrorKind::DanglingReference {
                    id: patch.id.clone(),
                })
                .with_path(&patch.path)
            })?;
            trace!("patching reference `{}` at '{}'", patch.id, patch.path);
            apply(root, &patch.steps, handle).map_err(|reason| {
                crate::Error::from(ErrorKind::UnsupportedReference { reason }).with_path(&patch.path)
            })?;
        }
        Ok(())
    }
}

fn apply(value: &mut dyn Reflect, steps: &[Step], handle: Box<dyn Reflect>) -> Result<(), String> {
    let Some((step, rest)) = steps.split_first() else {
        return store(value, handle);
    };
    let missing = || alloc::format!("the slot `{step:?}` no longer exists");

    match (step, value.reflect_mut()) {
        (Step::Member(index), ReflectMut::Object(object)) => {
            apply(object.member_mut(*index).ok_or_else(missing)?, rest, handle)
        }
        (Step::Member(index), ReflectMut::Dynamic(dynamic)) => {
            let declared = dynamic.declared_mut().ok_or_else(missing)?;
            apply(declared.member_mut(*index).ok_or_else(missing)?, rest, handle)
        }
        (Step::Item(index), ReflectMut::Array(array)) => {
            let item = array
                .get_mut(*index)
                .ok_or_else(|| String::from("set elements cannot be patched"))?;
            apply(item, rest, handle)
        }
        (Step::Key(key), ReflectMut::Dictionary(dictionary)) => {
            apply(dictionary.get_mut(key).ok_or_else(missing)?, rest, handle)
        }
        (Step::Dynamic(name), ReflectMut::Dynamic(dynamic)) => {
            if rest.is_empty() {
                return if dynamic.try_set(name, handle) {
                    Ok(())
                } else {
                    Err(alloc::format!("member `{name}` refused the reference"))
                };
            }
            apply(dynamic.try_get_mut(name).ok_or_else(missing)?, rest, handle)
        }
        (Step::Some, ReflectMut::Optional(optional)) => {
            apply(optional.value_mut().ok_or_else(missing)?, rest, handle)
        }
        (Step::Boxed, ReflectMut::Boxed(boxed)) => apply(&mut **boxed, rest, handle),
        (Step::Shared, ReflectMut::Shared(shared)) => {
            let mut inner = shared
                .try_borrow_inner_mut()
                .map_err(|_| String::from("the shared value is borrowed"))?;
            apply(&mut *inner, rest, handle)
        }
        _ => Err(missing()),
    }
}

fn store(slot: &mut dyn Reflect, handle: Box<dyn Reflect>) -> Result<(), String> {
    let slot_type = slot.type_path();
    let handle_type = handle.type_path();
    let stored = match slot.reflect_ref().kind() {
        ReflectKind::Optional => match slot.reflect_mut() {
            ReflectMut::Optional(optional) => optional.set_some(handle),
            _ => Err(handle),
        },
        _ => slot.set(handle),
    };
    stored.map_err(|_| alloc::format!("a `{handle_type}` cannot be stored in a `{slot_type}`"))
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{ReferenceReader, Step};
    use crate::error::{ErrorKind, JsonPath};
    use crate::{Reflect, Shared};

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut reader = ReferenceReader::default();
        reader.register("1", Box::new(Shared::new(1_i32))).unwrap();
        let error = reader.register("1", Box::new(Shared::new(2_i32))).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::DuplicateReference { .. }));
    }

    #[test]
    fn forward_references_are_patched() {
        let target = Shared::new(7_i32);
        let mut root: Vec<Option<Shared<i32>>> = vec![None, None];

        let mut reader = ReferenceReader::default();
        reader.defer("1", vec![Step::Item(1)], &JsonPath::new());
        reader.register("1", Box::new(target.clone())).unwrap();
        reader.finish(root.as_reflect_mut()).unwrap();

        assert!(root[0].is_none());
        assert!(Shared::ptr_eq(root[1].as_ref().unwrap(), &target));
    }

    #[test]
    fn unresolved_references_dangle() {
        let mut root: Vec<Option<Shared<i32>>> = vec![None];
        let mut reader = ReferenceReader::default();
        reader.defer("9", vec![Step::Item(0)], &JsonPath::new());
        let error = reader.finish(root.as_reflect_mut()).unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::DanglingReference { id } if id == "9"));
    }
}
