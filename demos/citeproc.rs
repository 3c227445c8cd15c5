//! A toy front end: a deliberately naive lexer turns `argv` into values for
//! the catalog, then the binder injects them.
use std::path::PathBuf;

use optbind::{introspect, Bindable, Catalog, Class, Command, Value};

#[derive(Debug, Default, Bindable)]
struct Tool {
    /// Citation style
    #[option(short = "s", argument = "NAME")]
    style: Option<String>,
    /// Write output to FILE
    #[option(short = "o", argument = "FILE")]
    output: Option<PathBuf>,
    /// Display this help and exit
    #[option(short = "h", priority = 9)]
    help: bool,
    #[command(name = "list", ty = List, description = "List citation keys")]
    command: Option<Box<dyn Command>>,
    #[unknown_arguments]
    inputs: Vec<String>,
}

#[derive(Debug, Default)]
struct List;

impl Command for List {}

fn lex(catalog: &Catalog, args: Vec<String>) -> Result<Vec<Value>, String> {
    let mut res = Vec::new();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let name = arg.trim_start_matches('-');
        if name.len() == arg.len() {
            match catalog.find_command(&arg) {
                Some(cmd) => res.push(Value::flag(cmd.id().clone())),
                None => res.push(Value::unknown(arg)),
            }
            continue;
        }
        let option = catalog.find_option(name).ok_or_else(|| format!("unknown flag: `{}`", arg))?;
        if option.desc().takes_argument() {
            let value = args.next().ok_or_else(|| format!("expected a value for `{}`", arg))?;
            res.push(Value::new(option.id().clone(), value));
        } else {
            res.push(Value::flag(option.id().clone()));
        }
    }
    Ok(res)
}

fn main() {
    let res = (|| -> Result<Tool, String> {
        let catalog = introspect(&[Class::of::<Tool>()]).map_err(|err| err.to_string())?;
        let values = lex(&catalog, std::env::args().skip(1).collect())?;
        let mut tool = Tool::default();
        catalog.evaluate(values, &mut [&mut tool]).map_err(|err| err.to_string())?;
        if tool.help {
            for option in catalog.options() {
                let desc = option.desc();
                println!("  --{:<10} {}", desc.long_name, desc.description);
            }
            for command in catalog.commands() {
                println!("  {:<12} {}", command.desc().name, command.desc().description);
            }
        }
        Ok(tool)
    })();
    match res {
        Ok(tool) => println!("{:#?}", tool),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1)
        }
    }
}
