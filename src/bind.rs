//! Explicit registration of bindable properties.
//!
//! Every bindable type lists its properties in [`Bindable::bind`]. Each
//! registered setter is a closure over the concrete type, so matching a
//! setter with a target is a `TypeId` comparison.
use std::{
    any::{type_name, Any, TypeId},
    fmt,
    marker::PhantomData,
    sync::Arc,
};

use crate::{BoxError, CommandDesc, Error, OptionDesc, RawValue, Result};

/// A type whose properties can be set from the command line.
pub trait Bindable: Any + Sized {
    fn bind(b: &mut Binder<Self>);
}

/// A command selected on the command line.
///
/// Running it is the business of the tool. The binder only builds
/// instances and hands them to setters.
pub trait Command: fmt::Debug {}

/// Builds a fresh command instance.
pub type Factory = fn() -> Result<Box<dyn Command>, BoxError>;

/// Type-erased view of a live object values get injected into.
pub trait Target {
    fn class(&self) -> Class;
    fn target_type(&self) -> TypeId;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Bindable> Target for T {
    fn class(&self) -> Class {
        Class::of::<T>()
    }
    fn target_type(&self) -> TypeId {
        TypeId::of::<T>()
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

type SetterFn<A> = dyn Fn(&mut dyn Any, A) -> Option<Result<(), BoxError>> + Send + Sync;

/// A setter closure together with the type that declared it.
pub(crate) struct Setter<A> {
    owner: TypeId,
    owner_name: &'static str,
    property: String,
    f: Arc<SetterFn<A>>,
}

impl<A> Clone for Setter<A> {
    fn clone(&self) -> Self {
        Setter {
            owner: self.owner,
            owner_name: self.owner_name,
            property: self.property.clone(),
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> Setter<A> {
    pub(crate) fn accepts(&self, target: &dyn Target) -> bool {
        target.target_type() == self.owner
    }

    pub(crate) fn invoke(&self, target: &mut dyn Target, arg: A) -> Result<()> {
        match (self.f)(target.as_any_mut(), arg) {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(Error::Dispatch {
                property: self.property.clone(),
                target: self.owner_name,
                source,
            }),
            None => Err(Error::internal(format_args!(
                "setter for `{}` called on a foreign target",
                self.property
            ))),
        }
    }
}

impl<A> fmt::Debug for Setter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner_name, self.property)
    }
}

/// Receives all positional arguments no option or command claimed.
#[derive(Debug, Clone)]
pub struct UnknownSink {
    setter: Setter<Vec<String>>,
}

impl UnknownSink {
    pub fn property(&self) -> &str {
        &self.setter.property
    }

    pub(crate) fn invoke(&self, target: &mut dyn Target, args: Vec<String>) -> Result<()> {
        self.setter.invoke(target, args)
    }
}

#[derive(Debug)]
pub(crate) enum Property {
    Option { desc: OptionDesc, setter: Setter<RawValue> },
    Commands { descs: Vec<(CommandDesc, Factory)>, setter: Setter<Box<dyn Command>> },
}

impl Property {
    fn name(&self) -> &str {
        match self {
            Property::Option { setter, .. } => &setter.property,
            Property::Commands { setter, .. } => &setter.property,
        }
    }
}

/// Collects the properties of `T`.
pub struct Binder<T> {
    properties: Vec<Property>,
    unknown: Vec<UnknownSink>,
    errors: Vec<String>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Bindable> Binder<T> {
    fn new() -> Self {
        Binder {
            properties: Vec::new(),
            unknown: Vec::new(),
            errors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Binds an option. A flag without a value arrives as `RawValue::Bool(true)`.
    pub fn option<F>(&mut self, property: &str, desc: OptionDesc, setter: F) -> &mut Self
    where
        F: Fn(&mut T, RawValue) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        if desc.long_name.is_empty() {
            self.error(format_args!("option `{}` has an empty long name", property));
        } else if desc.long_name.starts_with('-') {
            self.error(format_args!(
                "long name of `{}` must not begin with `-`: `{}`",
                property, desc.long_name
            ));
        }
        if let Some(short) = &desc.short_name {
            let mut chars = short.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c != '-' => (),
                _ => self.error(format_args!(
                    "short name of `{}` must be a single character: `{}`",
                    property, short
                )),
            }
        }
        let setter = self.setter(property, setter);
        self.push(Property::Option { desc, setter });
        self
    }

    pub fn command<F>(
        &mut self,
        property: &str,
        desc: CommandDesc,
        factory: Factory,
        setter: F,
    ) -> &mut Self
    where
        F: Fn(&mut T, Box<dyn Command>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.commands(property, [(desc, factory)], setter)
    }

    /// Binds several commands to one setter.
    pub fn commands<I, F>(&mut self, property: &str, descs: I, setter: F) -> &mut Self
    where
        I: IntoIterator<Item = (CommandDesc, Factory)>,
        F: Fn(&mut T, Box<dyn Command>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let descs = descs.into_iter().collect::<Vec<_>>();
        if descs.is_empty() {
            self.error(format_args!("command property `{}` names no commands", property));
        }
        for (desc, _) in &descs {
            if desc.name.is_empty() {
                self.error(format_args!("command of `{}` has an empty name", property));
            }
        }
        let setter = self.setter(property, setter);
        self.push(Property::Commands { descs, setter });
        self
    }

    /// Binds the property receiving unclaimed positional arguments. Only
    /// the first one registered is used.
    pub fn unknown_arguments<F>(&mut self, property: &str, setter: F) -> &mut Self
    where
        F: Fn(&mut T, Vec<String>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let setter = self.setter(property, setter);
        self.unknown.push(UnknownSink { setter });
        self
    }

    fn setter<A, F>(&mut self, property: &str, f: F) -> Setter<A>
    where
        A: 'static,
        F: Fn(&mut T, A) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        if property.is_empty() {
            self.error("property name is empty");
        }
        Setter {
            owner: TypeId::of::<T>(),
            owner_name: type_name::<T>(),
            property: property.to_string(),
            f: Arc::new(move |target: &mut dyn Any, arg: A| {
                target.downcast_mut::<T>().map(|it| f(it, arg))
            }),
        }
    }

    fn push(&mut self, property: Property) {
        if self.properties.iter().any(|it| it.name() == property.name()) {
            self.error(format_args!("property `{}` is registered twice", property.name()));
        }
        self.properties.push(property);
    }

    fn error(&mut self, msg: impl fmt::Display) {
        self.errors.push(msg.to_string());
    }
}

/// The registered properties of one bindable type.
#[derive(Debug)]
pub struct Class {
    name: &'static str,
    type_id: TypeId,
    pub(crate) properties: Vec<Property>,
    unknown: Vec<UnknownSink>,
    errors: Vec<String>,
}

impl Class {
    pub fn of<T: Bindable>() -> Class {
        let mut b = Binder::<T>::new();
        T::bind(&mut b);
        Class {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            properties: b.properties,
            unknown: b.unknown,
            errors: b.errors,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fails on the first registration problem of this type.
    pub fn check(&self) -> Result<()> {
        match self.errors.first() {
            Some(msg) => Err(Error::Introspection { class: self.name, msg: msg.clone() }),
            None => Ok(()),
        }
    }

    pub fn unknown_argument_setter(&self) -> Option<&UnknownSink> {
        self.unknown.first()
    }
}

/// Checks if one of the given classes accepts unknown arguments.
pub fn has_unknown_arguments(classes: &[Class]) -> bool {
    classes.iter().any(|it| it.unknown_argument_setter().is_some())
}
