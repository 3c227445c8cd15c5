use crate::{catalog::IdKind, Catalog, Error, Id, RawValue, Result, Target};

/// A value the command line parser matched against a catalog entry.
///
/// `value` is `None` for flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub id: Id,
    pub value: Option<RawValue>,
}

impl Value {
    pub fn new(id: Id, value: impl Into<RawValue>) -> Value {
        Value { id, value: Some(value.into()) }
    }

    pub fn flag(id: Id) -> Value {
        Value { id, value: None }
    }

    /// A positional argument no option or command claimed.
    pub fn unknown(value: impl Into<RawValue>) -> Value {
        Value::new(Id::DEFAULT, value)
    }
}

impl Catalog {
    /// Injects `values` into `targets`.
    ///
    /// Values are applied in order and each one goes to every target whose
    /// type registered the setter. Positional values collected under
    /// [`Id::DEFAULT`] are handed, all at once, to the unknown-arguments sink
    /// of the first target that has one. Later targets with a sink get
    /// nothing, so a tool that splits positional arguments across several
    /// objects has to forward them itself.
    ///
    /// Evaluation stops at the first error. Values applied before it are
    /// not rolled back.
    pub fn evaluate(
        &self,
        values: impl IntoIterator<Item = Value>,
        targets: &mut [&mut dyn Target],
    ) -> Result<()> {
        let mut unknown = Vec::new();
        for Value { id, value } in values {
            if !self.contains(&id) {
                return Err(Error::UnknownIdentifier(id));
            }
            let value = value.unwrap_or(RawValue::Bool(true));
            match &id.kind {
                IdKind::Command { name, setter, factory } => {
                    for target in targets.iter_mut() {
                        if !setter.accepts(&**target) {
                            continue;
                        }
                        let command = factory().map_err(|source| Error::Instantiation {
                            command: name.clone(),
                            source,
                        })?;
                        tracing::trace!(command = %name, "dispatching command");
                        setter.invoke(&mut **target, command)?;
                    }
                }
                IdKind::Option { name, setter } => {
                    for target in targets.iter_mut() {
                        if !setter.accepts(&**target) {
                            continue;
                        }
                        tracing::trace!(option = %name, value = %value, "dispatching option");
                        setter.invoke(&mut **target, value.clone())?;
                    }
                }
                IdKind::Default => unknown.push(value.to_string()),
            }
        }

        if unknown.is_empty() {
            return Ok(());
        }
        for target in targets.iter_mut() {
            let class = target.class();
            class.check()?;
            if let Some(sink) = class.unknown_argument_setter() {
                tracing::debug!(
                    class = class.name(),
                    property = sink.property(),
                    count = unknown.len(),
                    "passing unknown arguments"
                );
                return sink.invoke(&mut **target, unknown);
            }
        }
        Err(Error::MissingUnknownSink)
    }
}
