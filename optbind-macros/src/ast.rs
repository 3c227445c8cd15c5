#[derive(Debug)]
pub(crate) struct Target {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) name: String,
    pub(crate) doc: Option<String>,
    pub(crate) option: Option<OptionAttr>,
    pub(crate) commands: Vec<CommandAttr>,
    pub(crate) unknown: Option<UnknownAttr>,
}

impl Field {
    /// Property name with any `r#` prefix removed.
    pub(crate) fn property(&self) -> &str {
        self.name.strip_prefix("r#").unwrap_or(&self.name)
    }
}

#[derive(Debug, Default)]
pub(crate) struct OptionAttr {
    pub(crate) long: Option<String>,
    pub(crate) short: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) argument: Option<String>,
    pub(crate) argument_type: Option<ArgumentType>,
    pub(crate) priority: i32,
    pub(crate) setter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgumentType {
    String,
    StringArray,
}

#[derive(Debug, Default)]
pub(crate) struct CommandAttr {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) priority: i32,
    pub(crate) ty: Option<String>,
    pub(crate) factory: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct UnknownAttr {
    pub(crate) setter: Option<String>,
}
