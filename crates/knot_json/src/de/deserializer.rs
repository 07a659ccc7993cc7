use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::TypeId;

use log::{debug, trace};
use serde_json::{Map, Value};

use crate::Reflect;
use crate::contract::{ConstructorContract, Contract, ContractResolver, Creator, MemberContract};
use crate::error::{Error, ErrorKind, JsonPath, Result};
use crate::hash::HashMap;
use crate::info::{ArrayInfo, DictionaryInfo, MemberAttributes, ReflectKind, SharedInfo, TypeInfo};
use crate::metadata;
use crate::ops::{Array, Dictionary, Dynamic, InsertError, Object, ReflectMut, ReflectRef};
use crate::ops::member_at_mut;
use crate::reference::{ReferenceReader, Step};
use crate::settings::{DefaultValueHandling, MetadataPropertyHandling, MissingMemberHandling};
use crate::settings::{ObjectCreationHandling, Settings, TypeNameHandling};

// -----------------------------------------------------------------------------
// Metadata

/// The metadata properties of one object node.
#[derive(Default)]
struct Metadata<'n> {
    id: Option<String>,
    reference: Option<String>,
    type_name: Option<&'n str>,
    value: Option<&'n Value>,
    values: Option<&'n Value>,
    /// Number of leading entries consumed as metadata.
    leading: usize,
    /// Metadata may appear at any position.
    read_ahead: bool,
}

impl Metadata<'_> {
    /// Whether entry `index` named `key` is ordinary data.
    fn is_data(&self, index: usize, key: &str) -> bool {
        if self.read_ahead {
            !metadata::is_metadata(key)
        } else {
            index >= self.leading
        }
    }

    /// The node asks for a new value rather than an update of the old one.
    fn has_identity(&self, binds_type_names: bool) -> bool {
        self.id.is_some() || self.reference.is_some() || (binds_type_names && self.type_name.is_some())
    }
}

/// Type name policies inherited from the member or container being read.
#[derive(Clone, Copy, Default)]
struct Scope {
    type_name_handling: Option<TypeNameHandling>,
    item_type_name_handling: Option<TypeNameHandling>,
}

impl Scope {
    fn member(attributes: &MemberAttributes) -> Self {
        Self {
            type_name_handling: attributes.type_name_handling,
            item_type_name_handling: attributes.item_type_name_handling,
        }
    }

    /// Scope of the elements or entries of a container read in `self`.
    fn items(self) -> Self {
        Self {
            type_name_handling: self.item_type_name_handling,
            item_type_name_handling: None,
        }
    }
}

/// The result of creating an object, before its remaining members are read.
struct Created {
    value: Box<dyn Reflect>,
    /// Input entries consumed as constructor arguments.
    consumed: Vec<bool>,
    /// Members whose constructor argument was present in the input.
    supplied: Vec<bool>,
}

// -----------------------------------------------------------------------------
// Deserializer

/// State of one deserialize call.
pub(super) struct Deserializer<'s> {
    settings: &'s Settings,
    resolver: Arc<dyn ContractResolver>,
    contracts: HashMap<TypeId, Arc<Contract>>,
    references: ReferenceReader,
    path: JsonPath,
    /// Slots from the root to the value being read.
    steps: Vec<Step>,
    /// Non-zero while reading values not yet attached to the root.
    detached: usize,
    /// Scope of the node being read.
    scope: Scope,
    depth: usize,
}

impl<'s> Deserializer<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            resolver: settings.contract_resolver(),
            contracts: HashMap::default(),
            references: ReferenceReader::default(),
            path: JsonPath::new(),
            steps: Vec::new(),
            detached: 0,
            scope: Scope::default(),
            depth: 0,
        }
    }

    pub fn deserialize(mut self, node: &Value, info: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        let mut value = self.read_node(node, info, false)?;
        self.references.finish(&mut *value)?;
        Ok(value)
    }

    pub fn populate(mut self, node: &Value, target: &mut dyn Reflect) -> Result<()> {
        self.populate_existing(target, node)?;
        self.references.finish(target)
    }

    fn contract(&mut self, info: &'static TypeInfo) -> Result<Arc<Contract>> {
        if let Some(contract) = self.contracts.get(&info.type_id()) {
            return Ok(Arc::clone(contract));
        }
        let contract = self
            .resolver
            .resolve(info)
            .map_err(|error| error.with_path(&self.path))?;
        self.contracts.insert(info.type_id(), Arc::clone(&contract));
        Ok(contract)
    }

    fn error(&self, kind: ErrorKind) -> Error {
        Error::from(kind).with_path(&self.path)
    }

    fn invalid(&self, info: &'static TypeInfo, reason: impl Into<String>) -> Error {
        self.error(ErrorKind::InvalidValue {
            type_path: info.type_path(),
            reason: reason.into(),
        })
    }

    fn mismatch(&self, info: &'static TypeInfo, value: &dyn Reflect) -> Error {
        self.invalid(info, format!("a `{}` cannot be stored here", value.type_path()))
    }

    /// Runs `read` with `scope` as the scope of the node it reads.
    fn scoped<T>(&mut self, scope: Scope, read: impl FnOnce(&mut Self) -> T) -> T {
        let outer = core::mem::replace(&mut self.scope, scope);
        let result = read(self);
        self.scope = outer;
        result
    }

    /// Whether `$type` selects the type of the current node. Otherwise the
    /// name is consumed and the declared type is used.
    fn binds_type_names(&self) -> bool {
        self.scope
            .type_name_handling
            .unwrap_or(self.settings.type_name_handling)
            != TypeNameHandling::None
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

    fn metadata<'n>(&self, node: &'n Value) -> Result<Metadata<'n>> {
        let mut meta = Metadata::default();
        let Value::Object(map) = node else {
            return Ok(meta);
        };
        match self.settings.metadata_property_handling {
            MetadataPropertyHandling::Ignore => return Ok(meta),
            MetadataPropertyHandling::ReadAhead => meta.read_ahead = true,
            MetadataPropertyHandling::Default => {}
        }

        for (key, value) in map {
            if !metadata::is_metadata(key) {
                if meta.read_ahead {
                    continue;
                }
                break;
            }
            if !meta.read_ahead {
                meta.leading += 1;
            }
            match key.as_str() {
                metadata::ID => meta.id = Some(self.identifier(metadata::ID, value)?),
                metadata::REF => meta.reference = Some(self.identifier(metadata::REF, value)?),
                metadata::TYPE => {
                    let name = value.as_str().ok_or_else(|| {
                        self.error(ErrorKind::InvalidValue {
                            type_path: metadata::TYPE,
                            reason: String::from("expected a string"),
                        })
                    })?;
                    meta.type_name = Some(name);
                }
                metadata::VALUE => meta.value = Some(value),
                _ => meta.values = Some(value),
            }
        }
        Ok(meta)
    }

    fn identifier(&self, key: &'static str, value: &Value) -> Result<String> {
        match value {
            Value::String(id) => Ok(id.clone()),
            Value::Number(id) => Ok(id.to_string()),
            _ => Err(self.error(ErrorKind::InvalidValue {
                type_path: key,
                reason: String::from("expected a string"),
            })),
        }
    }

    // -------------------------------------------------------------------------
    // Values

    /// Reads `node` as a new value of exactly the type of `info`.
    ///
    /// `typed` is set once a `$type` has been resolved for this node.
    fn read_node(
        &mut self,
        node: &Value,
        info: &'static TypeInfo,
        typed: bool,
    ) -> Result<Box<dyn Reflect>> {
        for processor in &self.settings.deserialize_processors {
            if let Some(result) = processor.deserialize(node, info, self.settings) {
                return result.map_err(|error| error.with_path(&self.path));
            }
        }

        if let TypeInfo::Primitive(primitive) = info
            && primitive.is_node()
        {
            return self.convert(info, node);
        }

        let meta = self.metadata(node)?;
        if let Some(id) = meta.reference.as_deref() {
            return self.read_reference(id, info);
        }

        match info {
            TypeInfo::Any(_) => self.read_any(node, &meta, typed),
            TypeInfo::Optional(optional) => {
                if node.is_null() {
                    return Ok(optional.none());
                }
                self.steps.push(Step::Some);
                let inner = self.read_node(node, optional.inner(), typed);
                self.steps.pop();
                optional
                    .some(inner?)
                    .map_err(|value| self.mismatch(info, &*value))
            }
            TypeInfo::Shared(shared) => {
                self.steps.push(Step::Shared);
                let result = self.read_shared(node, &meta, info, shared, typed);
                self.steps.pop();
                result
            }
            _ => {
                if !typed && self.binds_type_names() {
                    self.check_type(&meta, info)?;
                }
                if meta.id.is_some() {
                    trace!("ignoring `$id` of a `{}` at '{}'", info.type_path(), self.path);
                }
                self.read_content(node, &meta, info)
            }
        }
    }

    fn convert(&self, info: &'static TypeInfo, node: &Value) -> Result<Box<dyn Reflect>> {
        let Some(primitive) = info.as_primitive() else {
            return Err(self.invalid(info, "not a primitive"));
        };
        primitive
            .from_node(node)
            .map_err(|error| self.invalid(info, error.to_string()))
    }

    /// A `Box<dyn Reflect>` slot: the `$type` named value, or the raw node.
    fn read_any(&mut self, node: &Value, meta: &Metadata<'_>, typed: bool) -> Result<Box<dyn Reflect>> {
        let value = match meta.type_name {
            Some(name) if !typed && self.binds_type_names() => {
                let resolved = self.bind(name)?;
                self.steps.push(Step::Boxed);
                let value = self.read_node(node, resolved, true);
                self.steps.pop();
                value?
            }
            _ => Box::new(node.clone()) as Box<dyn Reflect>,
        };
        Ok(Box::new(value))
    }

    fn read_shared(
        &mut self,
        node: &Value,
        meta: &Metadata<'_>,
        info: &'static TypeInfo,
        shared: &SharedInfo,
        typed: bool,
    ) -> Result<Box<dyn Reflect>> {
        let inner = shared.inner();
        if let Some(id) = meta.id.as_deref()
            && is_container(inner)
        {
            if !typed && self.binds_type_names() {
                self.check_type(meta, inner)?;
            }
            return self.read_identified(node, meta, id, shared);
        }

        let value = self.read_node(node, inner, typed)?;
        shared
            .wrap(value)
            .map_err(|value| self.mismatch(info, &*value))
    }

    /// Reads a shared container carrying `$id`.
    ///
    /// The handle is registered before the content is read, so references
    /// from inside resolve to the value under construction.
    fn read_identified(
        &mut self,
        node: &Value,
        meta: &Metadata<'_>,
        id: &str,
        shared: &SharedInfo,
    ) -> Result<Box<dyn Reflect>> {
        let inner = shared.inner();
        self.enter()?;
        let handle = match inner {
            TypeInfo::Object(_) => {
                let contract = self.contract(inner)?;
                let map = self.expect_object(node, inner)?;
                let created = self.create_object(map, meta, &contract)?;
                let handle = self.register(id, shared, created.value)?;
                self.populate_shared(&*handle, |this, value| {
                    let object = object_mut(value).ok_or_else(|| this.invalid(inner, "not an object"))?;
                    this.populate_object(object, map, meta, &contract, &created.consumed, &created.supplied)
                })?;
                handle
            }
            TypeInfo::Array(array) => {
                let Some(create) = array.create_fn() else {
                    return Err(self.error(ErrorKind::UnsupportedReference {
                        reason: format!(
                            "`{}` is built from its complete element list and cannot be referenced while it is read",
                            inner.type_path()
                        ),
                    }));
                };
                let items = self.expect_items(node, meta, inner)?;
                let handle = self.register(id, shared, create())?;
                self.populate_shared(&*handle, |this, value| {
                    let ReflectMut::Array(view) = value.reflect_mut() else {
                        return Err(this.invalid(inner, "not an array"));
                    };
                    this.populate_array(view, items, array)
                })?;
                handle
            }
            TypeInfo::Dictionary(dictionary) => {
                let map = self.expect_object(node, inner)?;
                let handle = self.register(id, shared, (dictionary.create_fn())())?;
                self.populate_shared(&*handle, |this, value| {
                    let ReflectMut::Dictionary(view) = value.reflect_mut() else {
                        return Err(this.invalid(inner, "not a dictionary"));
                    };
                    this.populate_dictionary(view, map, meta, dictionary)
                })?;
                handle
            }
            TypeInfo::Dynamic(_) => {
                let contract = self.contract(inner)?;
                let map = self.expect_object(node, inner)?;
                let value = self.create_dynamic(&contract)?;
                let handle = self.register(id, shared, value)?;
                self.populate_shared(&*handle, |this, value| {
                    let ReflectMut::Dynamic(view) = value.reflect_mut() else {
                        return Err(this.invalid(inner, "not a dynamic object"));
                    };
                    this.populate_dynamic(view, map, meta, &contract)
                })?;
                handle
            }
            _ => return Err(self.invalid(inner, "only containers carry an identity")),
        };
        self.depth -= 1;
        Ok(handle)
    }

    /// Wraps `value` into a new shared handle registered as `id`.
    fn register(
        &mut self,
        id: &str,
        shared: &SharedInfo,
        value: Box<dyn Reflect>,
    ) -> Result<Box<dyn Reflect>> {
        let handle = shared.wrap(value).map_err(|value| {
            self.invalid(shared.inner(), format!("cannot wrap a `{}`", value.type_path()))
        })?;
        let ReflectRef::Shared(view) = (*handle).reflect_ref() else {
            return Err(self.invalid(shared.inner(), "not a shared value"));
        };
        self.references
            .register(id, view.clone_handle())
            .map_err(|error| error.with_path(&self.path))?;
        Ok(handle)
    }

    fn populate_shared(
        &mut self,
        handle: &dyn Reflect,
        fill: impl FnOnce(&mut Self, &mut dyn Reflect) -> Result<()>,
    ) -> Result<()> {
        let ReflectRef::Shared(shared) = handle.reflect_ref() else {
            return Err(self.invalid(handle.type_info(), "not a shared value"));
        };
        let mut inner = shared
            .try_borrow_inner_mut()
            .map_err(|_| self.invalid(handle.type_info(), "the shared value is borrowed"))?;
        fill(self, &mut *inner)
    }

    /// Reads a `$ref` into a slot of type `info`.
    fn read_reference(&mut self, id: &str, info: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        if !accepts_reference(info) {
            return Err(self.error(ErrorKind::UnsupportedReference {
                reason: format!("a `{}` cannot hold the reference `{id}`", info.type_path()),
            }));
        }

        if let Some(handle) = self.references.resolve(id) {
            return self.store_handle(info, handle);
        }
        if self.detached > 0 {
            return Err(self.error(ErrorKind::UnsupportedReference {
                reason: format!("reference `{id}` is read before its target and cannot be patched here"),
            }));
        }
        self.references.defer(id, self.steps.clone(), &self.path);
        self.placeholder(id, info)
    }

    fn store_handle(&self, info: &'static TypeInfo, handle: Box<dyn Reflect>) -> Result<Box<dyn Reflect>> {
        match info {
            TypeInfo::Any(_) => Ok(Box::new(handle)),
            TypeInfo::Optional(optional) => {
                let handle = if optional.inner().kind() == ReflectKind::Any {
                    Box::new(handle) as Box<dyn Reflect>
                } else {
                    handle
                };
                optional
                    .some(handle)
                    .map_err(|value| self.mismatch(info, &*value))
            }
            _ if handle.ty_id() == info.type_id() => Ok(handle),
            _ => Err(self.mismatch(info, &*handle)),
        }
    }

    /// The value standing in for a forward reference until it is patched.
    fn placeholder(&mut self, id: &str, info: &'static TypeInfo) -> Result<Box<dyn Reflect>> {
        match info {
            TypeInfo::Any(_) => Ok(Box::new(Box::new(Value::Null) as Box<dyn Reflect>)),
            TypeInfo::Optional(optional) => Ok(optional.none()),
            TypeInfo::Shared(shared) => {
                let contract = self.contract(shared.inner())?;
                let value = match contract.select_creator(self.settings.constructor_handling) {
                    Ok(Creator::Default(create) | Creator::Factory(create)) => create(),
                    _ => {
                        return Err(self.error(ErrorKind::UnsupportedReference {
                            reason: format!(
                                "forward reference `{id}` needs a `{}` that can be created empty",
                                shared.inner().type_path()
                            ),
                        }));
                    }
                };
                shared
                    .wrap(value)
                    .map_err(|value| self.mismatch(info, &*value))
            }
            _ => Err(self.invalid(info, "cannot hold a reference")),
        }
    }

    // -------------------------------------------------------------------------
    // Type names

    fn bind(&self, name: &str) -> Result<&'static TypeInfo> {
        let Some(registry) = &self.settings.registry else {
            return Err(self.error(ErrorKind::TypeResolution {
                name: String::from(name),
                reason: String::from("no type registry is configured"),
            }));
        };
        registry.resolve_name(name).ok_or_else(|| {
            let reason = if registry.is_ambiguous(name) {
                "the short name matches several registered types"
            } else {
                "the type is not registered"
            };
            self.error(ErrorKind::TypeResolution {
                name: String::from(name),
                reason: String::from(reason),
            })
        })
    }

    /// A `$type` on a statically typed slot must name that type.
    fn check_type(&self, meta: &Metadata<'_>, info: &'static TypeInfo) -> Result<()> {
        let Some(name) = meta.type_name else {
            return Ok(());
        };
        let resolved = self
            .settings
            .registry
            .as_ref()
            .and_then(|registry| registry.resolve_name(name));
        let matches = match resolved {
            Some(resolved) => resolved.type_id() == info.type_id(),
            None => name == info.type_path() || name == info.type_name(),
        };
        if matches {
            return Ok(());
        }
        Err(self.error(ErrorKind::TypeResolution {
            name: String::from(name),
            reason: format!("it does not name `{}`", info.type_path()),
        }))
    }

    // -------------------------------------------------------------------------
    // Content

    fn read_content(
        &mut self,
        node: &Value,
        meta: &Metadata<'_>,
        info: &'static TypeInfo,
    ) -> Result<Box<dyn Reflect>> {
        match info {
            TypeInfo::Primitive(_) => self.convert(info, meta.value.unwrap_or(node)),
            TypeInfo::Object(_) => {
                let contract = self.contract(info)?;
                let map = self.expect_object(node, info)?;
                self.enter()?;
                let created = self.create_object(map, meta, &contract)?;
                let mut value = created.value;
                let Some(object) = object_mut(&mut *value) else {
                    return Err(self.invalid(info, "not an object"));
                };
                self.populate_object(object, map, meta, &contract, &created.consumed, &created.supplied)?;
                self.depth -= 1;
                Ok(value)
            }
            TypeInfo::Array(array) => {
                let items = self.expect_items(node, meta, info)?;
                self.enter()?;
                let value = match array.create_fn() {
                    Some(create) => {
                        let mut value = create();
                        let ReflectMut::Array(view) = (*value).reflect_mut() else {
                            return Err(self.invalid(info, "not an array"));
                        };
                        self.populate_array(view, items, array)?;
                        value
                    }
                    None => self.collect_array(items, info, array)?,
                };
                self.depth -= 1;
                Ok(value)
            }
            TypeInfo::Dictionary(dictionary) => {
                let map = self.expect_object(node, info)?;
                self.enter()?;
                let mut value = (dictionary.create_fn())();
                let ReflectMut::Dictionary(view) = (*value).reflect_mut() else {
                    return Err(self.invalid(info, "not a dictionary"));
                };
                self.populate_dictionary(view, map, meta, dictionary)?;
                self.depth -= 1;
                Ok(value)
            }
            TypeInfo::Dynamic(_) => {
                let contract = self.contract(info)?;
                let map = self.expect_object(node, info)?;
                self.enter()?;
                let mut value = self.create_dynamic(&contract)?;
                let ReflectMut::Dynamic(view) = (*value).reflect_mut() else {
                    return Err(self.invalid(info, "not a dynamic object"));
                };
                self.populate_dynamic(view, map, meta, &contract)?;
                self.depth -= 1;
                Ok(value)
            }
            TypeInfo::Optional(_) | TypeInfo::Shared(_) | TypeInfo::Any(_) => {
                self.read_node(node, info, true)
            }
        }
    }

    fn expect_object<'n>(&self, node: &'n Value, info: &'static TypeInfo) -> Result<&'n Map<String, Value>> {
        match node {
            Value::Object(map) => Ok(map),
            other => Err(self.invalid(info, format!("expected an object, found {}", describe(other)))),
        }
    }

    fn expect_items<'n>(
        &self,
        node: &'n Value,
        meta: &Metadata<'n>,
        info: &'static TypeInfo,
    ) -> Result<&'n [Value]> {
        match (node, meta.values) {
            (Value::Array(items), _) | (Value::Object(_), Some(Value::Array(items))) => Ok(items),
            (other, _) => Err(self.invalid(info, format!("expected an array, found {}", describe(other)))),
        }
    }

    /// Reads every element first, for arrays built from their element list.
    fn collect_array(
        &mut self,
        items: &[Value],
        info: &'static TypeInfo,
        array: &ArrayInfo,
    ) -> Result<Box<dyn Reflect>> {
        let Some(from_items) = array.from_items_fn() else {
            return Err(self.error(ErrorKind::ConstructorResolution {
                type_path: info.type_path(),
                reason: String::from("the array can neither be created empty nor from its elements"),
            }));
        };
        let item_info = array.item_info();
        let scope = self.scope.items();
        let mut values = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            self.path.push_index(index);
            self.steps.push(Step::Item(index));
            let value = self.scoped(scope, |this| this.read_node(item, item_info, false));
            self.steps.pop();
            self.path.pop();
            values.push(value?);
        }
        from_items(values).map_err(|error| self.invalid(info, error.to_string()))
    }

    fn populate_array(&mut self, array: &mut dyn Array, items: &[Value], info: &ArrayInfo) -> Result<()> {
        let item_info = info.item_info();
        let scope = self.scope.items();
        let start = array.len();
        for (index, item) in items.iter().enumerate() {
            self.path.push_index(index);
            self.steps.push(Step::Item(start + index));
            let value = self.scoped(scope, |this| this.read_node(item, item_info, false));
            self.steps.pop();
            let pushed = match value {
                Ok(value) => array
                    .push(value)
                    .map_err(|value| self.mismatch(item_info, &*value)),
                Err(error) => Err(error),
            };
            self.path.pop();
            pushed?;
        }
        Ok(())
    }

    fn populate_dictionary(
        &mut self,
        dictionary: &mut dyn Dictionary,
        map: &Map<String, Value>,
        meta: &Metadata<'_>,
        info: &DictionaryInfo,
    ) -> Result<()> {
        let value_info = info.value_info();
        let scope = self.scope.items();
        for (index, (key, child)) in map.iter().enumerate() {
            if !meta.is_data(index, key) {
                continue;
            }
            self.path.push_property(key.as_str());
            self.steps.push(Step::Key(key.clone()));
            let value = self.scoped(scope, |this| this.read_node(child, value_info, false));
            self.steps.pop();
            let inserted = match value {
                Ok(value) => self.insert_entry(dictionary, key, value, info),
                Err(error) => Err(error),
            };
            self.path.pop();
            inserted?;
        }
        Ok(())
    }

    fn insert_entry(
        &self,
        dictionary: &mut dyn Dictionary,
        key: &str,
        value: Box<dyn Reflect>,
        info: &DictionaryInfo,
    ) -> Result<()> {
        match dictionary.insert(key, value) {
            Ok(()) => Ok(()),
            Err(InsertError::Key) => Err(self.error(ErrorKind::InvalidValue {
                type_path: info.ty().path(),
                reason: format!("`{key}` is not a valid `{}` key", info.key_ty().path()),
            })),
            Err(InsertError::Value(value)) => Err(self.mismatch(info.value_info(), &*value)),
        }
    }

    // -------------------------------------------------------------------------
    // Objects

    fn create_object(
        &mut self,
        map: &Map<String, Value>,
        meta: &Metadata<'_>,
        contract: &Contract,
    ) -> Result<Created> {
        let creator = contract
            .select_creator(self.settings.constructor_handling)
            .map_err(|error| error.with_path(&self.path))?;
        match creator {
            Creator::Default(create) | Creator::Factory(create) => Ok(Created {
                value: create(),
                consumed: Vec::new(),
                supplied: Vec::new(),
            }),
            Creator::Parameterized(constructor) => {
                debug!(
                    "creating `{}` with constructor `{}`",
                    contract.type_path(),
                    constructor.name()
                );
                self.construct(map, meta, contract, constructor)
            }
        }
    }

    fn create_dynamic(&mut self, contract: &Contract) -> Result<Box<dyn Reflect>> {
        match contract
            .select_creator(self.settings.constructor_handling)
            .map_err(|error| error.with_path(&self.path))?
        {
            Creator::Default(create) | Creator::Factory(create) => Ok(create()),
            Creator::Parameterized(_) => Err(self.error(ErrorKind::ConstructorResolution {
                type_path: contract.type_path(),
                reason: String::from("dynamic objects are created without arguments"),
            })),
        }
    }

    /// Reads the constructor arguments and calls the constructor.
    fn construct(
        &mut self,
        map: &Map<String, Value>,
        meta: &Metadata<'_>,
        contract: &Contract,
        constructor: &ConstructorContract,
    ) -> Result<Created> {
        let mut consumed = vec![false; map.len()];
        let mut supplied = vec![false; contract.members().len()];
        let mut args = Vec::with_capacity(constructor.params().len());

        for param in constructor.params() {
            let member = param.member().map(|index| &contract.members()[index]);
            let value = match find_entry(map, meta, param.wire_name()) {
                Some((index, key, child)) => {
                    consumed[index] = true;
                    if let Some(member_index) = param.member() {
                        supplied[member_index] = true;
                    }
                    self.path.push_property(key);
                    let value = self.read_argument(child, param.type_info(), member, contract);
                    self.path.pop();
                    value?
                }
                None => {
                    if let Some(member) = member
                        && member.required().must_be_present()
                        && param.default_value().is_none()
                        && !self.has_usable_default(member)
                    {
                        return Err(self.error(ErrorKind::RequiredMemberMissing {
                            type_path: contract.type_path(),
                            member: String::from(member.wire_name()),
                        }));
                    }
                    self.default_argument(param.default_value(), param.type_info(), member)?
                }
            };
            args.push(value);
        }

        let value = (constructor.construct_fn())(args)
            .map_err(|error| self.invalid(contract.info(), error.to_string()))?;
        Ok(Created {
            value,
            consumed,
            supplied,
        })
    }

    /// Reads an argument in the slot of the member it initializes.
    fn read_argument(
        &mut self,
        node: &Value,
        info: &'static TypeInfo,
        member: Option<&MemberContract>,
        contract: &Contract,
    ) -> Result<Box<dyn Reflect>> {
        let Some(member) = member else {
            self.detached += 1;
            let value = self.scoped(Scope::default(), |this| this.read_node(node, info, false));
            self.detached -= 1;
            return value;
        };
        if node.is_null() && member.required().rejects_null() {
            return Err(self.error(ErrorKind::RequiredMemberNull {
                type_path: contract.type_path(),
                member: String::from(member.wire_name()),
            }));
        }
        let depth = self.steps.len();
        self.steps.extend(member.path().iter().map(|&index| Step::Member(index)));
        let value = self.scoped(Scope::member(member.attributes()), |this| {
            this.read_node(node, info, false)
        });
        self.steps.truncate(depth);
        value
    }

    fn default_argument(
        &mut self,
        param_default: Option<&Value>,
        info: &'static TypeInfo,
        member: Option<&MemberContract>,
    ) -> Result<Box<dyn Reflect>> {
        let default = param_default.cloned().or_else(|| {
            member
                .filter(|member| self.populates(member))
                .and_then(|member| member.default_value().cloned())
        });
        let node = match default {
            Some(default) => default,
            None => match info {
                TypeInfo::Optional(optional) => return Ok(optional.none()),
                TypeInfo::Any(_) => return Ok(Box::new(Box::new(Value::Null) as Box<dyn Reflect>)),
                TypeInfo::Primitive(primitive) => primitive.default_node(),
                TypeInfo::Array(_) => Value::Array(Vec::new()),
                _ => Value::Object(Map::new()),
            },
        };
        let scope = member.map_or_else(Scope::default, |member| Scope::member(member.attributes()));
        self.detached += 1;
        let value = self.scoped(scope, |this| this.read_node(&node, info, false));
        self.detached -= 1;
        value
    }

    fn populates(&self, member: &MemberContract) -> bool {
        member
            .attributes()
            .default_value_handling
            .unwrap_or(self.settings.default_value_handling)
            .contains(DefaultValueHandling::POPULATE)
    }

    fn has_usable_default(&self, member: &MemberContract) -> bool {
        self.populates(member) && member.default_value().is_some()
    }

    fn missing_member_handling(&self, contract: &Contract) -> MissingMemberHandling {
        contract
            .missing_member_handling()
            .unwrap_or(self.settings.missing_member_handling)
    }

    /// Reads the members present in `map` into `object`, routes the rest to
    /// extension data and applies required checks and defaults.
    fn populate_object(
        &mut self,
        object: &mut dyn Object,
        map: &Map<String, Value>,
        meta: &Metadata<'_>,
        contract: &Contract,
        consumed: &[bool],
        supplied: &[bool],
    ) -> Result<()> {
        let mut seen = vec![false; contract.members().len()];
        for (index, flag) in supplied.iter().enumerate() {
            seen[index] = *flag;
        }

        let mut unmatched = Vec::new();
        for (index, (key, child)) in map.iter().enumerate() {
            if consumed.get(index).copied().unwrap_or(false) || !meta.is_data(index, key) {
                continue;
            }
            let Some(member_index) = contract.find_member(key) else {
                unmatched.push((key.as_str(), child));
                continue;
            };
            seen[member_index] = true;
            let member = &contract.members()[member_index];
            if !member.access().can_write() {
                trace!("`{}` of `{}` is not populated", member.name(), contract.type_path());
                continue;
            }
            self.path.push_property(key.as_str());
            let result = self.read_member(object, member, contract, child);
            self.path.pop();
            result?;
        }

        self.route_unmatched(object, contract, unmatched)?;
        self.finish_members(object, contract, &seen)
    }

    fn read_member(
        &mut self,
        object: &mut dyn Object,
        member: &MemberContract,
        contract: &Contract,
        node: &Value,
    ) -> Result<()> {
        if node.is_null() && member.required().rejects_null() {
            return Err(self.error(ErrorKind::RequiredMemberNull {
                type_path: contract.type_path(),
                member: String::from(member.wire_name()),
            }));
        }
        let handling = member
            .attributes()
            .object_creation_handling
            .or(contract.object_creation_handling())
            .unwrap_or(self.settings.object_creation_handling);

        let Some(slot) = member_at_mut(object, member.path()) else {
            return Err(self.error(ErrorKind::MemberAccess {
                type_path: contract.type_path(),
                member: String::from(member.name()),
                reason: String::from("the member is not reachable"),
            }));
        };

        let depth = self.steps.len();
        self.steps.extend(member.path().iter().map(|&index| Step::Member(index)));
        let result = self.scoped(Scope::member(member.attributes()), |this| {
            this.read_into(slot, node, member.type_info(), handling)
        });
        self.steps.truncate(depth);
        result.map_err(|error| error.with_path(&self.path))
    }

    /// Updates the value in `slot` in place, or replaces it.
    fn read_into(
        &mut self,
        slot: &mut dyn Reflect,
        node: &Value,
        info: &'static TypeInfo,
        handling: ObjectCreationHandling,
    ) -> Result<()> {
        if handling != ObjectCreationHandling::Replace
            && matches!(node, Value::Object(_) | Value::Array(_))
            && !self.metadata(node)?.has_identity(self.binds_type_names())
            && self.reusable(slot.as_reflect(), handling)?
        {
            return self.populate_existing(slot, node);
        }
        let value = self.read_node(node, info, false)?;
        slot.set(value).map_err(|value| self.mismatch(info, &*value))
    }

    /// Whether the current value can be filled in place.
    fn reusable(&mut self, value: &dyn Reflect, handling: ObjectCreationHandling) -> Result<bool> {
        Ok(match value.reflect_ref() {
            ReflectRef::Object(_) => {
                handling == ObjectCreationHandling::Reuse
                    || self.contract(value.reflect_type_info())?.constructors().is_empty()
            }
            ReflectRef::Array(_) => value
                .reflect_type_info()
                .as_array()
                .is_some_and(|array| array.create_fn().is_some()),
            ReflectRef::Dictionary(_) | ReflectRef::Dynamic(_) => true,
            ReflectRef::Optional(optional) => match optional.value() {
                Some(inner) => self.reusable(inner, handling)?,
                None => false,
            },
            ReflectRef::Shared(shared) => {
                if handling != ObjectCreationHandling::Reuse {
                    return Ok(false);
                }
                match shared.try_borrow_inner() {
                    Ok(inner) => self.reusable(&*inner, handling)?,
                    Err(_) => false,
                }
            }
            ReflectRef::Primitive(_) | ReflectRef::Boxed(_) => false,
        })
    }

    /// Fills an existing value from `node`.
    fn populate_existing(&mut self, target: &mut dyn Reflect, node: &Value) -> Result<()> {
        let info = target.reflect_type_info();
        if matches!(target.reflect_ref().kind(), ReflectKind::Primitive | ReflectKind::Any) {
            let value = self.read_node(node, info, false)?;
            return target.set(value).map_err(|value| self.mismatch(info, &*value));
        }

        let meta = self.metadata(node)?;
        match target.reflect_mut() {
            ReflectMut::Object(object) => {
                let contract = self.contract(info)?;
                let map = self.expect_object(node, info)?;
                self.enter()?;
                self.populate_object(object, map, &meta, &contract, &[], &[])?;
            }
            ReflectMut::Array(array) => {
                let items = self.expect_items(node, &meta, info)?;
                let Some(array_info) = info.as_array() else {
                    return Err(self.invalid(info, "not an array"));
                };
                self.enter()?;
                self.populate_array(array, items, array_info)?;
            }
            ReflectMut::Dictionary(dictionary) => {
                let map = self.expect_object(node, info)?;
                let Some(dictionary_info) = info.as_dictionary() else {
                    return Err(self.invalid(info, "not a dictionary"));
                };
                self.enter()?;
                self.populate_dictionary(dictionary, map, &meta, dictionary_info)?;
            }
            ReflectMut::Dynamic(dynamic) => {
                let contract = self.contract(info)?;
                let map = self.expect_object(node, info)?;
                self.enter()?;
                self.populate_dynamic(dynamic, map, &meta, &contract)?;
            }
            ReflectMut::Optional(optional) => {
                let Some(inner) = optional.value_mut() else {
                    return Err(self.invalid(info, "there is no value to populate"));
                };
                self.steps.push(Step::Some);
                let result = self.populate_existing(inner, node);
                self.steps.pop();
                return result;
            }
            ReflectMut::Shared(shared) => {
                let mut inner = shared
                    .try_borrow_inner_mut()
                    .map_err(|_| self.invalid(info, "the shared value is borrowed"))?;
                self.steps.push(Step::Shared);
                let result = self.populate_existing(&mut *inner, node);
                self.steps.pop();
                return result;
            }
            ReflectMut::Primitive(_) | ReflectMut::Boxed(_) => {
                return Err(self.invalid(info, "cannot be populated in place"));
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Routes keys no member matched into extension data, or applies the
    /// missing member handling.
    fn route_unmatched(
        &mut self,
        object: &mut dyn Object,
        contract: &Contract,
        unmatched: Vec<(&str, &Value)>,
    ) -> Result<()> {
        if unmatched.is_empty() {
            return Ok(());
        }
        let Some(extension) = contract.extension_data().filter(|extension| extension.reads()) else {
            let handling = self.missing_member_handling(contract);
            for (key, _) in unmatched {
                if handling == MissingMemberHandling::Error {
                    self.path.push_property(key);
                    return Err(self.error(ErrorKind::UnknownMember {
                        type_path: contract.type_path(),
                        member: String::from(key),
                    }));
                }
                trace!("discarding `{key}` while reading `{}`", contract.type_path());
            }
            return Ok(());
        };

        let Some(slot) = member_at_mut(object, extension.path()) else {
            return Err(self.error(ErrorKind::MemberAccess {
                type_path: contract.type_path(),
                member: String::from(extension.name()),
                reason: String::from("the member is not reachable"),
            }));
        };

        let depth = self.steps.len();
        self.steps.extend(extension.path().iter().map(|&index| Step::Member(index)));

        if let ReflectMut::Optional(optional) = slot.reflect_mut() {
            if optional.value().is_none() {
                let create = extension
                    .type_info()
                    .as_optional()
                    .and_then(|optional| optional.inner().as_dictionary())
                    .map(DictionaryInfo::create_fn);
                match create {
                    Some(create) if extension.can_set() => {
                        optional
                            .set_some(create())
                            .map_err(|value| self.mismatch(extension.type_info(), &*value))?;
                    }
                    _ => {
                        return Err(self.error(ErrorKind::MemberAccess {
                            type_path: contract.type_path(),
                            member: String::from(extension.name()),
                            reason: String::from("extension data is null and cannot be set"),
                        }));
                    }
                }
            }
            self.steps.push(Step::Some);
        }

        let Some(dictionary) = dictionary_mut(slot) else {
            return Err(self.error(ErrorKind::MemberAccess {
                type_path: contract.type_path(),
                member: String::from(extension.name()),
                reason: String::from("extension data is not a dictionary"),
            }));
        };
        let Some(info) = dictionary.reflect_type_info().as_dictionary() else {
            return Err(self.invalid(extension.type_info(), "not a dictionary"));
        };

        for (key, child) in unmatched {
            self.path.push_property(key);
            self.steps.push(Step::Key(String::from(key)));
            let value = self.scoped(Scope::default(), |this| {
                this.read_node(child, info.value_info(), false)
            });
            self.steps.pop();
            let inserted = match value {
                Ok(value) => self.insert_entry(dictionary, key, value, info),
                Err(error) => Err(error),
            };
            self.path.pop();
            inserted?;
        }
        self.steps.truncate(depth);
        Ok(())
    }

    /// Required checks and populated defaults for members absent from the input.
    fn finish_members(&mut self, object: &mut dyn Object, contract: &Contract, seen: &[bool]) -> Result<()> {
        for (index, member) in contract.members().iter().enumerate() {
            if seen[index] {
                continue;
            }
            if member.required().must_be_present() && !self.has_usable_default(member) {
                return Err(self.error(ErrorKind::RequiredMemberMissing {
                    type_path: contract.type_path(),
                    member: String::from(member.wire_name()),
                }));
            }
            if !self.populates(member) || !member.access().can_write() {
                continue;
            }
            let Some(default) = default_node(member) else {
                continue;
            };

            self.path.push_property(member.wire_name());
            self.detached += 1;
            let value = self.scoped(Scope::member(member.attributes()), |this| {
                this.read_node(&default, member.type_info(), false)
            });
            self.detached -= 1;
            let stored = match (value, member_at_mut(object, member.path())) {
                (Ok(value), Some(slot)) => slot
                    .set(value)
                    .map_err(|value| self.mismatch(member.type_info(), &*value)),
                (Ok(_), None) => Err(self.error(ErrorKind::MemberAccess {
                    type_path: contract.type_path(),
                    member: String::from(member.name()),
                    reason: String::from("the member is not reachable"),
                })),
                (Err(error), _) => Err(error),
            };
            self.path.pop();
            stored?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Dynamic objects

    fn populate_dynamic(
        &mut self,
        dynamic: &mut dyn Dynamic,
        map: &Map<String, Value>,
        meta: &Metadata<'_>,
        contract: &Contract,
    ) -> Result<()> {
        let mut seen = vec![false; contract.members().len()];
        for (index, (key, child)) in map.iter().enumerate() {
            if !meta.is_data(index, key) {
                continue;
            }
            self.path.push_property(key.as_str());
            let result = self.read_dynamic_member(dynamic, contract, key, child, &mut seen);
            self.path.pop();
            result?;
        }

        match dynamic.declared_mut() {
            Some(declared) => self.finish_members(declared, contract, &seen),
            None => Ok(()),
        }
    }

    fn read_dynamic_member(
        &mut self,
        dynamic: &mut dyn Dynamic,
        contract: &Contract,
        key: &str,
        node: &Value,
        seen: &mut [bool],
    ) -> Result<()> {
        if let Some(member_index) = contract.find_member(key) {
            seen[member_index] = true;
            let member = &contract.members()[member_index];
            if !member.access().can_write() {
                return Ok(());
            }
            let Some(declared) = dynamic.declared_mut() else {
                return Err(self.error(ErrorKind::MemberAccess {
                    type_path: contract.type_path(),
                    member: String::from(member.name()),
                    reason: String::from("declared members are not exposed"),
                }));
            };
            return self.read_member(declared, member, contract, node);
        }

        let value = match dynamic.member_type(key) {
            Some(info) => {
                self.steps.push(Step::Dynamic(String::from(key)));
                let value = self.scoped(Scope::default(), |this| this.read_node(node, info, false));
                self.steps.pop();
                value?
            }
            None => Box::new(node.clone()),
        };
        if dynamic.try_set(key, value) {
            return Ok(());
        }
        if self.missing_member_handling(contract) == MissingMemberHandling::Error {
            return Err(self.error(ErrorKind::UnknownMember {
                type_path: contract.type_path(),
                member: String::from(key),
            }));
        }
        trace!("`{}` refused member `{key}`", contract.type_path());
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Helpers

fn is_container(info: &TypeInfo) -> bool {
    matches!(
        info.kind(),
        ReflectKind::Object | ReflectKind::Array | ReflectKind::Dictionary | ReflectKind::Dynamic
    )
}

/// Slots a `$ref` can be stored in.
fn accepts_reference(info: &TypeInfo) -> bool {
    match info {
        TypeInfo::Shared(_) | TypeInfo::Any(_) => true,
        TypeInfo::Optional(optional) => {
            matches!(optional.inner().kind(), ReflectKind::Shared | ReflectKind::Any)
        }
        _ => false,
    }
}

fn object_mut(value: &mut dyn Reflect) -> Option<&mut dyn Object> {
    match value.reflect_mut() {
        ReflectMut::Object(object) => Some(object),
        _ => None,
    }
}

fn dictionary_mut(value: &mut dyn Reflect) -> Option<&mut dyn Dictionary> {
    match value.reflect_mut() {
        ReflectMut::Dictionary(dictionary) => Some(dictionary),
        ReflectMut::Optional(optional) => optional.value_mut().and_then(dictionary_mut),
        _ => None,
    }
}

/// The default assigned to an absent member when populating defaults.
fn default_node(member: &MemberContract) -> Option<Value> {
    if let Some(default) = member.default_value() {
        return Some(default.clone());
    }
    match member.type_info() {
        TypeInfo::Optional(_) => Some(Value::Null),
        TypeInfo::Primitive(primitive) => Some(primitive.default_node()),
        _ => None,
    }
}

/// The data entry bound to `name`: exact match first, then ASCII case-insensitive.
fn find_entry<'n>(
    map: &'n Map<String, Value>,
    meta: &Metadata<'_>,
    name: &str,
) -> Option<(usize, &'n str, &'n Value)> {
    let data = || {
        map.iter()
            .enumerate()
            .filter(|(index, (key, _))| meta.is_data(*index, key))
    };
    data()
        .find(|(_, (key, _))| key.as_str() == name)
        .or_else(|| data().find(|(_, (key, _))| key.eq_ignore_ascii_case(name)))
        .map(|(index, (key, value))| (index, key.as_str(), value))
}

fn describe(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
