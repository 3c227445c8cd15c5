use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    bind::{Property, Setter},
    ArgumentType, Class, Command, Factory, RawValue, Result,
};

/// Describes an option for help output and argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDesc {
    pub long_name: String,
    pub short_name: Option<String>,
    pub description: String,
    pub argument: Option<(String, ArgumentType)>,
    pub priority: i32,
}

impl OptionDesc {
    pub fn new(long_name: &str) -> OptionDesc {
        OptionDesc {
            long_name: long_name.to_string(),
            short_name: None,
            description: String::new(),
            argument: None,
            priority: 0,
        }
    }

    /// An empty name means "no short name".
    pub fn short(mut self, short_name: &str) -> OptionDesc {
        self.short_name = if short_name.is_empty() { None } else { Some(short_name.to_string()) };
        self
    }

    pub fn description(mut self, description: &str) -> OptionDesc {
        self.description = description.to_string();
        self
    }

    /// An empty name means the option is a flag.
    pub fn argument(mut self, name: &str, ty: ArgumentType) -> OptionDesc {
        self.argument = if name.is_empty() { None } else { Some((name.to_string(), ty)) };
        self
    }

    pub fn priority(mut self, priority: i32) -> OptionDesc {
        self.priority = priority;
        self
    }

    pub fn takes_argument(&self) -> bool {
        self.argument.is_some()
    }
}

/// Describes a command for help output and argument parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDesc {
    pub name: String,
    pub description: String,
    pub priority: i32,
}

impl CommandDesc {
    pub fn new(name: &str) -> CommandDesc {
        CommandDesc { name: name.to_string(), description: String::new(), priority: 0 }
    }

    pub fn description(mut self, description: &str) -> CommandDesc {
        self.description = description.to_string();
        self
    }

    pub fn priority(mut self, priority: i32) -> CommandDesc {
        self.priority = priority;
        self
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static DEFAULT_ID: Id = Id::DEFAULT;

/// Correlates a catalog entry with the setter it drives.
///
/// Identifiers are compared by identity. Every call to [`introspect`] mints
/// new ones, so an identifier only means something to the catalog that
/// produced it.
#[derive(Clone)]
pub struct Id {
    serial: u64,
    pub(crate) kind: IdKind,
}

#[derive(Clone)]
pub(crate) enum IdKind {
    Default,
    Option { name: String, setter: Setter<RawValue> },
    Command { name: String, setter: Setter<Box<dyn Command>>, factory: Factory },
}

impl Id {
    /// Identifier of positional arguments that are neither options nor commands.
    pub const DEFAULT: Id = Id { serial: 0, kind: IdKind::Default };

    fn mint(kind: IdKind) -> Id {
        Id { serial: NEXT_ID.fetch_add(1, Ordering::Relaxed), kind }
    }

    pub fn is_default(&self) -> bool {
        self.serial == 0
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Id) -> bool {
        self.serial == other.serial
    }
}

impl Eq for Id {}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IdKind::Default => write!(f, "#{} (default)", self.serial),
            IdKind::Option { name, .. } => write!(f, "#{} (--{})", self.serial, name),
            IdKind::Command { name, .. } => write!(f, "#{} ({})", self.serial, name),
        }
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

#[derive(Debug, Clone)]
pub struct Entry<D> {
    id: Id,
    desc: D,
}

impl<D> Entry<D> {
    pub fn id(&self) -> &Id {
        &self.id
    }
    pub fn desc(&self) -> &D {
        &self.desc
    }
}

/// Options and commands of a tool, each ordered by priority.
#[derive(Debug, Clone)]
pub struct Catalog {
    options: Vec<Entry<OptionDesc>>,
    commands: Vec<Entry<CommandDesc>>,
}

impl Catalog {
    pub fn options(&self) -> &[Entry<OptionDesc>] {
        &self.options
    }

    pub fn commands(&self) -> &[Entry<CommandDesc>] {
        &self.commands
    }

    pub fn default_id(&self) -> &Id {
        &DEFAULT_ID
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.commands.is_empty()
    }

    /// Looks an option up by long or short name, without leading dashes.
    pub fn find_option(&self, name: &str) -> Option<&Entry<OptionDesc>> {
        self.options
            .iter()
            .find(|it| it.desc.long_name == name || it.desc.short_name.as_deref() == Some(name))
    }

    pub fn find_command(&self, name: &str) -> Option<&Entry<CommandDesc>> {
        self.commands.iter().find(|it| it.desc.name == name)
    }

    /// Checks whether `id` was minted by this catalog or is [`Id::DEFAULT`].
    pub fn contains(&self, id: &Id) -> bool {
        id.is_default()
            || self.options.iter().any(|it| &it.id == id)
            || self.commands.iter().any(|it| &it.id == id)
    }
}

/// Builds a catalog from the registered properties of `classes`.
///
/// Options and commands are sorted by ascending priority. Entries with
/// equal priority keep the order in which they were registered.
pub fn introspect(classes: &[Class]) -> Result<Catalog> {
    let mut options = Vec::new();
    let mut commands = Vec::new();

    for class in classes {
        class.check()?;
        for property in &class.properties {
            match property {
                Property::Option { desc, setter } => {
                    let kind = IdKind::Option {
                        name: desc.long_name.clone(),
                        setter: setter.clone(),
                    };
                    options.push(Entry { id: Id::mint(kind), desc: desc.clone() });
                }
                Property::Commands { descs, setter } => {
                    for (desc, factory) in descs {
                        let kind = IdKind::Command {
                            name: desc.name.clone(),
                            setter: setter.clone(),
                            factory: *factory,
                        };
                        commands.push(Entry { id: Id::mint(kind), desc: desc.clone() });
                    }
                }
            }
        }
    }

    // `sort_by_key` is stable.
    options.sort_by_key(|it| it.desc.priority);
    commands.sort_by_key(|it| it.desc.priority);

    tracing::debug!(
        classes = classes.len(),
        options = options.len(),
        commands = commands.len(),
        "built option catalog"
    );
    Ok(Catalog { options, commands })
}
