use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;

use log::trace;
use serde_json::{Map, Number, Value};

use crate::Reflect;
use crate::contract::{Contract, ContractResolver, MemberContract};
use crate::error::{Error, ErrorKind, JsonPath, Result};
use crate::hash::HashMap;
use crate::info::{MemberAttributes, ReflectKind, TypeInfo};
use crate::metadata;
use crate::ops::{Dictionary, Dynamic, Object, ReflectRef, SharedRef, member_at};
use crate::reference::{ReferenceKey, ReferenceWriter};
use crate::settings::{DefaultValueHandling, NullValueHandling, ReferenceLoopHandling};
use crate::settings::{Settings, TypeNameHandling};

/// Policies inherited from the member or container that holds a value.
#[derive(Clone, Copy, Default)]
struct Scope {
    is_reference: Option<bool>,
    reference_loop_handling: Option<ReferenceLoopHandling>,
    type_name_handling: Option<TypeNameHandling>,
    item_is_reference: Option<bool>,
    item_reference_loop_handling: Option<ReferenceLoopHandling>,
    item_type_name_handling: Option<TypeNameHandling>,
    /// Runtime type of the value when it sits in a `Box<dyn Reflect>` slot.
    boxed: Option<&'static TypeInfo>,
}

impl Scope {
    fn member(attributes: &MemberAttributes) -> Self {
        Self {
            is_reference: attributes.is_reference,
            reference_loop_handling: attributes.reference_loop_handling,
            type_name_handling: attributes.type_name_handling,
            item_is_reference: attributes.item_is_reference,
            item_reference_loop_handling: attributes.item_reference_loop_handling,
            item_type_name_handling: attributes.item_type_name_handling,
            boxed: None,
        }
    }

    /// Scope of the elements or entries of a container written in `self`.
    fn items(&self) -> Self {
        Self {
            is_reference: self.item_is_reference,
            reference_loop_handling: self.item_reference_loop_handling,
            type_name_handling: self.item_type_name_handling,
            ..Self::default()
        }
    }
}

/// State of one serialize call.
pub(super) struct Serializer<'s> {
    settings: &'s Settings,
    resolver: Arc<dyn ContractResolver>,
    contracts: HashMap<TypeId, Arc<Contract>>,
    references: ReferenceWriter,
    /// Shared values currently being written, outermost first.
    ancestors: Vec<ReferenceKey>,
    path: JsonPath,
    depth: usize,
}

impl<'s> Serializer<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            resolver: settings.contract_resolver(),
            contracts: HashMap::default(),
            references: ReferenceWriter::default(),
            ancestors: Vec::new(),
            path: JsonPath::new(),
            depth: 0,
        }
    }

    pub fn serialize(mut self, value: &dyn Reflect) -> Result<Value> {
        self.write_value(value, &Scope::default())
    }

    fn contract(&mut self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        if let Some(contract) = self.contracts.get(&info.type_id()) {
            return Ok(Arc::clone(contract));
        }
        let contract = self.resolver.resolve(info)?;
        self.contracts.insert(info.type_id(), Arc::clone(&contract));
        Ok(contract)
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::from(kind).with_path(&self.path)
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.settings.max_depth {
            return Err(self.error(ErrorKind::NestingDepthExceeded {
                max: self.settings.max_depth,
            }));
        }
        self.depth += 1;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Values

    fn write_value(&mut self, value: &dyn Reflect, scope: &Scope) -> Result<Value> {
        for processor in &self.settings.serialize_processors {
            if let Some(result) = processor.serialize(value, self.settings) {
                return result.map_err(|error| error.with_path(&self.path));
            }
        }

        match value.reflect_ref() {
            ReflectRef::Optional(optional) => match optional.value() {
                Some(inner) => self.write_value(inner, scope),
                None => Ok(Value::Null),
            },
            ReflectRef::Boxed(inner) => {
                let scope = Scope {
                    boxed: Some(inner.reflect_type_info()),
                    ..*scope
                };
                self.write_value(inner, &scope)
            }
            ReflectRef::Shared(shared) => self.write_shared(shared, scope),
            _ => self.write_content(value, scope, None),
        }
    }

    fn write_shared(&mut self, shared: &dyn SharedRef, scope: &Scope) -> Result<Value> {
        let inner = shared.try_borrow_inner().map_err(|_| {
            self.error(ErrorKind::InvalidValue {
                type_path: shared.as_reflect().type_path(),
                reason: String::from("the shared value is mutably borrowed"),
            })
        })?;
        let key = self.settings.equality_comparer.reference_key(shared);

        let id = if self.preserves(&*inner, scope)? {
            if let Some(id) = self.references.get(&key) {
                let mut node = Map::new();
                node.insert(String::from(metadata::REF), Value::String(String::from(id)));
                return Ok(Value::Object(node));
            }
            Some(self.references.assign(key.clone()))
        } else {
            None
        };

        self.ancestors.push(key);
        let result = match id {
            Some(id) => self.write_content(&*inner, scope, Some(id)),
            None => self.write_value(&*inner, scope),
        };
        self.ancestors.pop();
        result
    }

    /// Whether the content of a shared value gets `$id`/`$ref` treatment.
    fn preserves(&mut self, inner: &dyn Reflect, scope: &Scope) -> Result<bool> {
        let kind = inner.reflect_ref().kind();
        if !matches!(
            kind,
            ReflectKind::Object | ReflectKind::Array | ReflectKind::Dictionary | ReflectKind::Dynamic
        ) {
            return Ok(false);
        }
        if let Some(flag) = scope.is_reference {
            return Ok(flag);
        }
        if let Some(flag) = self.contract(inner.reflect_type_info())?.is_reference() {
            return Ok(flag);
        }
        let handling = self.settings.preserve_references_handling;
        Ok(if kind == ReflectKind::Array {
            handling.arrays()
        } else {
            handling.objects()
        })
    }

    /// The `$type` to write for a value of `kind`, if any.
    fn type_name(&self, info: &'static TypeInfo, scope: &Scope) -> Option<&'static str> {
        if info.as_primitive().is_some_and(|primitive| primitive.is_node()) {
            return None;
        }
        let handling = scope
            .type_name_handling
            .unwrap_or(self.settings.type_name_handling);
        let write = match (handling, info.kind()) {
            (TypeNameHandling::None, _) => false,
            (_, ReflectKind::Primitive) => scope.boxed.is_some(),
            (TypeNameHandling::Auto, _) => scope.boxed.is_some(),
            (TypeNameHandling::All, _) => true,
            (TypeNameHandling::Objects, kind) => kind != ReflectKind::Array,
            (TypeNameHandling::Arrays, kind) => kind == ReflectKind::Array,
        };
        write.then(|| scope.boxed.unwrap_or(info).type_path())
    }

    /// Writes an object, array, dictionary, dynamic object or primitive.
    fn write_content(
        &mut self,
        value: &dyn Reflect,
        scope: &Scope,
        id: Option<String>,
    ) -> Result<Value> {
        let info = value.reflect_type_info();
        let type_name = self.type_name(info, scope);

        let mut header = Map::new();
        if let Some(id) = id {
            header.insert(String::from(metadata::ID), Value::String(id));
        }
        if let Some(name) = type_name {
            header.insert(String::from(metadata::TYPE), Value::String(String::from(name)));
        }

        match value.reflect_ref() {
            ReflectRef::Primitive(primitive) => {
                let node = primitive.to_node().map_err(|error| {
                    self.error(ErrorKind::InvalidValue {
                        type_path: info.type_path(),
                        reason: error.to_string(),
                    })
                })?;
                if header.is_empty() {
                    return Ok(node);
                }
                header.insert(String::from(metadata::VALUE), node);
                Ok(Value::Object(header))
            }
            ReflectRef::Array(array) => {
                self.enter()?;
                let items = scope.items();
                let mut nodes = Vec::with_capacity(array.len());
                for (index, item) in array.iter().enumerate() {
                    self.path.push_index(index);
                    let node = self.write_item(item, &items);
                    self.path.pop();
                    if let Some(node) = node? {
                        nodes.push(node);
                    }
                }
                self.depth -= 1;
                if header.is_empty() {
                    return Ok(Value::Array(nodes));
                }
                header.insert(String::from(metadata::VALUES), Value::Array(nodes));
                Ok(Value::Object(header))
            }
            ReflectRef::Dictionary(dictionary) => {
                self.enter()?;
                let contract = self.contract(info)?;
                self.write_entries(dictionary, &contract, &scope.items(), &mut header)?;
                self.depth -= 1;
                Ok(Value::Object(header))
            }
            ReflectRef::Object(object) => {
                self.enter()?;
                let contract = self.contract(info)?;
                self.write_members(object, &contract, &mut header)?;
                self.write_extension_data(object, &contract, &mut header)?;
                self.depth -= 1;
                Ok(Value::Object(header))
            }
            ReflectRef::Dynamic(dynamic) => {
                self.enter()?;
                let contract = self.contract(info)?;
                if let Some(declared) = dynamic.declared() {
                    self.write_members(declared, &contract, &mut header)?;
                }
                self.write_dynamic_members(dynamic, &contract, &mut header)?;
                self.depth -= 1;
                Ok(Value::Object(header))
            }
            ReflectRef::Optional(_) | ReflectRef::Shared(_) | ReflectRef::Boxed(_) => {
                self.write_value(value, scope)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Members

    fn write_members(
        &mut self,
        object: &dyn Object,
        contract: &Contract,
        out: &mut Map<String, Value>,
    ) -> Result<()> {
        for member in contract.members() {
            if !member.access().can_read() {
                continue;
            }
            let Some(value) = member_at(object, member.path()) else {
                return Err(self.error(ErrorKind::MemberAccess {
                    type_path: contract.type_path(),
                    member: String::from(member.name()),
                    reason: String::from("the member is not reachable"),
                }));
            };

            self.path.push_property(member.wire_name());
            let node = self.write_member(value, member);
            self.path.pop();
            if let Some(node) = node? {
                out.insert(String::from(member.wire_name()), node);
            }
        }
        Ok(())
    }

    /// Writes one member, or `None` when a policy skips it.
    fn write_member(&mut self, value: &dyn Reflect, member: &MemberContract) -> Result<Option<Value>> {
        let attributes = member.attributes();
        let scope = Scope::member(attributes);

        if !self.check_loop(value, &scope)? {
            return Ok(None);
        }

        let null_handling = attributes
            .null_value_handling
            .unwrap_or(self.settings.null_value_handling);
        if null_handling == NullValueHandling::Ignore && is_null(value) {
            return Ok(None);
        }

        let default_handling = attributes
            .default_value_handling
            .unwrap_or(self.settings.default_value_handling);
        if default_handling.contains(DefaultValueHandling::IGNORE) && is_default(value, member) {
            trace!("skipping `{}` holding its default value", member.name());
            return Ok(None);
        }

        self.write_value(value, &scope)
            .map(Some)
            .map_err(|error| error.with_path(&self.path))
    }

    /// Writes an element or entry, or `None` when a loop is ignored.
    fn write_item(&mut self, value: &dyn Reflect, scope: &Scope) -> Result<Option<Value>> {
        if !self.check_loop(value, scope)? {
            return Ok(None);
        }
        self.write_value(value, scope).map(Some)
    }

    fn write_entries(
        &mut self,
        dictionary: &dyn Dictionary,
        contract: &Contract,
        scope: &Scope,
        out: &mut Map<String, Value>,
    ) -> Result<()> {
        for (key, value) in dictionary.iter() {
            let key = contract.naming().dictionary_key(&key);
            self.path.push_property(key.as_str());
            let node = self.write_item(value, scope);
            self.path.pop();
            if let Some(node) = node? {
                out.insert(key, node);
            }
        }
        Ok(())
    }

    /// Extension data entries follow the declared members; a key already
    /// written by a declared member is not overwritten.
    fn write_extension_data(
        &mut self,
        object: &dyn Object,
        contract: &Contract,
        out: &mut Map<String, Value>,
    ) -> Result<()> {
        let Some(extension) = contract.extension_data().filter(|e| e.writes()) else {
            return Ok(());
        };
        let Some(dictionary) = member_at(object, extension.path()).and_then(as_dictionary) else {
            return Ok(());
        };

        let naming = contract.naming();
        for (key, value) in dictionary.iter() {
            let key = naming.extension_data_name(&key);
            if out.contains_key(&key) {
                trace!("extension data key `{key}` is shadowed by a declared member");
                continue;
            }
            self.path.push_property(key.as_str());
            let node = self.write_item(value, &Scope::default());
            self.path.pop();
            if let Some(node) = node? {
                out.insert(key, node);
            }
        }
        Ok(())
    }

    fn write_dynamic_members(
        &mut self,
        dynamic: &dyn Dynamic,
        contract: &Contract,
        out: &mut Map<String, Value>,
    ) -> Result<()> {
        for name in dynamic.member_names() {
            let Some(value) = dynamic.try_get(&name) else {
                continue;
            };
            let wire_name = contract.naming().member_name(&name, false);
            if out.contains_key(&wire_name) {
                continue;
            }
            if self.settings.null_value_handling == NullValueHandling::Ignore && is_null(value) {
                continue;
            }
            self.path.push_property(wire_name.as_str());
            let node = self.write_item(value, &Scope::default());
            self.path.pop();
            if let Some(node) = node? {
                out.insert(wire_name, node);
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Loops

    /// Returns `false` if `value` closes a reference loop that is ignored.
    fn check_loop(&mut self, value: &dyn Reflect, scope: &Scope) -> Result<bool> {
        let Some(shared) = shared_of(value) else {
            return Ok(true);
        };
        let key = self.settings.equality_comparer.reference_key(shared);
        if !self.ancestors.contains(&key) || self.references.get(&key).is_some() {
            return Ok(true);
        }

        let handling = scope
            .reference_loop_handling
            .unwrap_or(self.settings.reference_loop_handling);
        match handling {
            ReferenceLoopHandling::Error => {
                let type_path = shared
                    .try_borrow_inner()
                    .map_or(shared.as_reflect().type_path(), |inner| inner.type_path());
                Err(self.error(ErrorKind::ReferenceLoop { type_path }))
            }
            ReferenceLoopHandling::Ignore => {
                trace!("skipping reference loop at '{}'", self.path);
                Ok(false)
            }
            ReferenceLoopHandling::Serialize => Ok(true),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// The shared handle a value holds, looking through `Option` and boxes.
fn shared_of(value: &dyn Reflect) -> Option<&dyn SharedRef> {
    match value.reflect_ref() {
        ReflectRef::Shared(shared) => Some(shared),
        ReflectRef::Optional(optional) => optional.value().and_then(shared_of),
        ReflectRef::Boxed(inner) => shared_of(inner),
        _ => None,
    }
}

fn as_dictionary(value: &dyn Reflect) -> Option<&dyn Dictionary> {
    match value.reflect_ref() {
        ReflectRef::Dictionary(dictionary) => Some(dictionary),
        ReflectRef::Optional(optional) => optional.value().and_then(as_dictionary),
        _ => None,
    }
}

fn is_null(value: &dyn Reflect) -> bool {
    match value.reflect_ref() {
        ReflectRef::Optional(optional) => optional.value().is_none(),
        ReflectRef::Boxed(inner) => is_null(inner),
        ReflectRef::Primitive(primitive) => {
            inner_is_node(value) && primitive.to_node().is_ok_and(|node| node.is_null())
        }
        _ => false,
    }
}

fn inner_is_node(value: &dyn Reflect) -> bool {
    value
        .reflect_type_info()
        .as_primitive()
        .is_some_and(|primitive| primitive.is_node())
}

/// Whether a member holds its configured default, or the default of its type.
fn is_default(value: &dyn Reflect, member: &MemberContract) -> bool {
    let default = match member.default_value() {
        Some(default) => default.clone(),
        None => match member.type_info() {
            TypeInfo::Optional(_) => Value::Null,
            TypeInfo::Primitive(primitive) => primitive.default_node(),
            _ => return false,
        },
    };
    scalar_node(value).is_some_and(|node| nodes_equal(&node, &default))
}

/// The node of a primitive, possibly behind `Option` or a box.
fn scalar_node(value: &dyn Reflect) -> Option<Value> {
    match value.reflect_ref() {
        ReflectRef::Primitive(primitive) => primitive.to_node().ok(),
        ReflectRef::Optional(optional) => match optional.value() {
            Some(inner) => scalar_node(inner),
            None => Some(Value::Null),
        },
        ReflectRef::Boxed(inner) => scalar_node(inner),
        _ => None,
    }
}

/// Node equality with a relative tolerance for floating point numbers.
pub(crate) fn nodes_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => numbers_equal(left, right),
        (Value::Array(left), Value::Array(right)) => {
            left.len() == right.len() && left.iter().zip(right).all(|(l, r)| nodes_equal(l, r))
        }
        (Value::Object(left), Value::Object(right)) => {
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(key, l)| right.get(key).is_some_and(|r| nodes_equal(l, r)))
        }
        _ => left == right,
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if !left.is_f64() && !right.is_f64() {
        return left == right;
    }
    match (left.as_f64(), right.as_f64()) {
        (Some(left), Some(right)) => approximately_equal(left, right),
        _ => false,
    }
}

/// Equal within ten units of the magnitude-scaled machine epsilon.
fn approximately_equal(left: f64, right: f64) -> bool {
    if left == right {
        return true;
    }
    let tolerance = (left.abs() + right.abs() + 10.0) * f64::EPSILON;
    let difference = left - right;
    -tolerance < difference && tolerance > difference
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{approximately_equal, nodes_equal};

    #[test]
    fn float_tolerance() {
        assert!(approximately_equal(1000.0, 1000.0000000000001));
        assert!(!approximately_equal(1000.0, 1000.000000000001));
        assert!(approximately_equal(0.0, -0.0));
    }

    #[test]
    fn node_equality() {
        assert!(nodes_equal(&json!(1), &json!(1.0)));
        assert!(nodes_equal(&json!({"a": [1.5]}), &json!({"a": [1.5]})));
        assert!(!nodes_equal(&json!("1"), &json!(1)));
        assert!(!nodes_equal(&json!(2), &json!(3)));
    }
}
