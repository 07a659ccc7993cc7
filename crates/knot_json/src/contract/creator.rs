use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;

use crate::contract::Contract;
use crate::error::{ErrorKind, Result};
use crate::info::{ConstructFn, CreateFn, TypeInfo};
use crate::settings::ConstructorHandling;

/// A constructor parameter bound to its wire name.
#[derive(Debug, Clone)]
pub struct ParamContract {
    name: &'static str,
    wire_name: String,
    type_info: fn() -> &'static TypeInfo,
    default_value: Option<Value>,
    member: Option<usize>,
}

impl ParamContract {
    pub(crate) fn new(
        name: &'static str,
        wire_name: String,
        type_info: fn() -> &'static TypeInfo,
        default_value: Option<Value>,
        member: Option<usize>,
    ) -> Self {
        Self {
            name,
            wire_name,
            type_info,
            default_value,
            member,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The wire name of the matched member, or the resolved parameter name.
    #[inline]
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Index of the member with the same name, ignoring ASCII case.
    #[inline]
    pub fn member(&self) -> Option<usize> {
        self.member
    }
}

/// A parameterized constructor of a contract.
#[derive(Debug, Clone)]
pub struct ConstructorContract {
    name: &'static str,
    params: Vec<ParamContract>,
    construct: ConstructFn,
    is_public: bool,
    designated: bool,
}

impl ConstructorContract {
    pub(crate) fn new(
        name: &'static str,
        params: Vec<ParamContract>,
        construct: ConstructFn,
        is_public: bool,
        designated: bool,
    ) -> Self {
        Self {
            name,
            params,
            construct,
            is_public,
            designated,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn params(&self) -> &[ParamContract] {
        &self.params
    }

    #[inline]
    pub fn construct_fn(&self) -> ConstructFn {
        self.construct
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    #[inline]
    pub fn is_designated(&self) -> bool {
        self.designated
    }
}

/// How an instance is obtained when deserializing.
#[derive(Debug, Clone, Copy)]
pub enum Creator<'a> {
    Default(CreateFn),
    Parameterized(&'a ConstructorContract),
    Factory(CreateFn),
}

impl Contract {
    /// Picks the way to create an instance under `handling`.
    ///
    /// An installed factory wins. Then, in order: the designated constructor
    /// whatever its visibility, the only public parameterized constructor when
    /// there is no public default constructor, a non-public default
    /// constructor when allowed, and the public default constructor.
    pub fn select_creator(&self, handling: ConstructorHandling) -> Result<Creator<'_>> {
        if let Some(factory) = self.factory {
            return Ok(Creator::Factory(factory));
        }

        if let Some(designated) = self.constructors.iter().find(|c| c.designated) {
            return Ok(Creator::Parameterized(designated));
        }

        let public_default = self.default_constructor.filter(|c| c.is_public());
        let mut public = self.constructors.iter().filter(|c| c.is_public);
        if public_default.is_none()
            && let (Some(only), None) = (public.next(), public.next())
        {
            return Ok(Creator::Parameterized(only));
        }

        if let Some(default) = self.default_constructor
            && (default.is_public()
                || handling == ConstructorHandling::AllowNonPublicDefaultConstructor)
        {
            return Ok(Creator::Default(default.create_fn()));
        }

        let reason = if self.constructors.is_empty() && self.default_constructor.is_some() {
            String::from("the default constructor is not public")
        } else if self.constructors.iter().filter(|c| c.is_public).count() > 1 {
            format!(
                "no parameterless constructor defined and {} public constructors are ambiguous",
                self.constructors.iter().filter(|c| c.is_public).count()
            )
        } else {
            String::from("no parameterless constructor defined")
        };
        Err(ErrorKind::ConstructorResolution {
            type_path: self.type_path(),
            reason,
        }
        .into())
    }
}
