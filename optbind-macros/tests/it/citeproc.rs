use std::path::PathBuf;

use optbind::{Bindable, BoxError, Command};

#[derive(Debug, Default, Bindable)]
pub struct Citeproc {
    /// Read bibliography from FILE
    #[option(short = "i", argument = "FILE")]
    pub input: Option<PathBuf>,
    /// Output version information and exit
    #[option(short = 'V', priority = 10)]
    pub version: bool,
    /// Display this help and exit
    #[option(short = "h", priority = 9)]
    pub help: bool,
    #[command(
        name = "bibliography",
        ty = BibliographyCommand,
        description = "Generate a bibliography"
    )]
    #[command(name = "list", ty = ListCommand, priority = 1)]
    #[command(name = "shell", factory = shell, priority = 2)]
    pub command: Option<Box<dyn Command>>,
    #[unknown_arguments]
    pub inputs: Vec<String>,
}

#[derive(Debug, Default, Bindable)]
pub struct Bibliography {
    /// Citation style
    #[option(short = "s", argument = "NAME")]
    pub style: String,
    /// Locale for dates and terms
    #[option(short = "l", argument = "LOCALE")]
    pub locale: Option<String>,
    /// Citation keys to render
    #[option(
        long = "citation",
        short = "c",
        argument = "ID",
        argument_type = StringArray,
        priority = 1
    )]
    pub citations: Vec<String>,
}

#[derive(Debug, Default, Bindable)]
pub struct List {
    /// Output format
    #[option(setter = List::set_format, argument = "FORMAT", priority = 1)]
    pub format: String,
}

impl List {
    fn set_format(&mut self, format: String) {
        self.format = format.to_uppercase();
    }
}

#[derive(Debug, Default, Bindable)]
pub struct Strict {
    /// Maximum number of entries
    #[option(setter = Strict::set_limit, argument = "N")]
    pub limit: u32,
    #[unknown_arguments(setter = Strict::set_rest)]
    pub rest: Vec<String>,
}

impl Strict {
    fn set_limit(&mut self, limit: u32) -> Result<(), String> {
        if limit > 10 {
            return Err(format!("{} is more than 10", limit));
        }
        self.limit = limit;
        Ok(())
    }

    fn set_rest(&mut self, rest: Vec<String>) -> Result<(), BoxError> {
        Err(format!("unexpected arguments: {}", rest.join(" ")).into())
    }
}

#[derive(Debug, Bindable)]
pub struct Nothing {}

#[derive(Debug, Default)]
pub struct BibliographyCommand;

impl Command for BibliographyCommand {}

#[derive(Debug, Default)]
pub struct ListCommand {
    entries: usize,
}

impl Command for ListCommand {}

#[derive(Debug)]
pub struct ShellCommand;

impl Command for ShellCommand {}

fn shell() -> Result<Box<dyn Command>, BoxError> {
    Ok(Box::new(ShellCommand))
}
