mod citeproc;

use expect_test::expect;
use optbind::{introspect, Catalog, Class, Error, Id, Target, Value};

use crate::citeproc::{Bibliography, Citeproc, List, Strict};

fn catalog() -> Catalog {
    let classes = [Class::of::<Citeproc>(), Class::of::<Bibliography>(), Class::of::<List>()];
    introspect(&classes).unwrap()
}

fn id(catalog: &Catalog, name: &str) -> Id {
    match catalog.find_option(name) {
        Some(it) => it.id().clone(),
        None => catalog.find_command(name).unwrap().id().clone(),
    }
}

fn eval(catalog: &Catalog, values: Vec<Value>, targets: &mut [&mut dyn Target]) -> String {
    match catalog.evaluate(values, targets) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

#[test]
fn catalog_order() {
    let catalog = catalog();
    let options = catalog
        .options()
        .iter()
        .map(|it| {
            let desc = it.desc();
            let short =
                desc.short_name.as_deref().map(|it| format!("-{}, ", it)).unwrap_or_default();
            let arg =
                desc.argument.as_ref().map(|(name, _)| format!(" <{}>", name)).unwrap_or_default();
            format!("{}--{}{}  {}\n", short, desc.long_name, arg, desc.description)
        })
        .collect::<String>();
    expect![[r#"
        -i, --input <FILE>  Read bibliography from FILE
        -s, --style <NAME>  Citation style
        -l, --locale <LOCALE>  Locale for dates and terms
        -c, --citation <ID>  Citation keys to render
        --format <FORMAT>  Output format
        -h, --help  Display this help and exit
        -V, --version  Output version information and exit
    "#]]
    .assert_eq(&options);

    let commands =
        catalog.commands().iter().map(|it| it.desc().name.as_str()).collect::<Vec<_>>();
    assert_eq!(commands, ["bibliography", "list", "shell"]);
}

#[test]
fn empty_types_give_empty_catalog() {
    let catalog = introspect(&[Class::of::<citeproc::Nothing>()]).unwrap();
    assert!(catalog.options().is_empty());
    assert!(catalog.commands().is_empty());
    assert!(!optbind::has_unknown_arguments(&[Class::of::<citeproc::Nothing>()]));
    assert!(optbind::has_unknown_arguments(&[Class::of::<Citeproc>()]));
}

#[test]
fn options_and_commands() {
    let catalog = catalog();
    let mut tool = Citeproc::default();
    let mut bibliography = Bibliography::default();
    let values = vec![
        Value::flag(id(&catalog, "V")),
        Value::new(id(&catalog, "style"), "ieee"),
        Value::new(id(&catalog, "citation"), vec!["knuth".to_string(), "lamport".to_string()]),
        Value::flag(id(&catalog, "bibliography")),
        Value::new(id(&catalog, "l"), "de-DE"),
    ];
    let res = eval(&catalog, values, &mut [&mut tool, &mut bibliography]);
    assert_eq!(res, "");
    expect![[r#"
        Citeproc {
            input: None,
            version: true,
            help: false,
            command: Some(
                BibliographyCommand,
            ),
            inputs: [],
        }
    "#]]
    .assert_debug_eq(&tool);
    expect![[r#"
        Bibliography {
            style: "ieee",
            locale: Some(
                "de-DE",
            ),
            citations: [
                "knuth",
                "lamport",
            ],
        }
    "#]]
    .assert_debug_eq(&bibliography);
}

#[test]
fn unknown_arguments() {
    let catalog = catalog();
    let mut tool = Citeproc::default();
    let values = vec![
        Value::unknown("a.bib"),
        Value::new(id(&catalog, "input"), "main.bib"),
        Value::unknown("b.bib"),
    ];
    assert_eq!(eval(&catalog, values, &mut [&mut tool]), "");
    expect![[r#"
        Citeproc {
            input: Some(
                "main.bib",
            ),
            version: false,
            help: false,
            command: None,
            inputs: [
                "a.bib",
                "b.bib",
            ],
        }
    "#]]
    .assert_debug_eq(&tool);
}

#[test]
fn unknown_arguments_need_a_sink() {
    let catalog = catalog();
    let mut bibliography = Bibliography::default();
    let values = vec![Value::new(id(&catalog, "style"), "apa"), Value::unknown("stray")];
    let res = eval(&catalog, values, &mut [&mut bibliography]);
    expect![[r#"no property for unknown arguments found"#]].assert_eq(&res);
    assert_eq!(bibliography.style, "apa");
}

#[test]
fn custom_setter_and_factory() {
    let catalog = catalog();
    let mut list = List::default();
    let mut tool = Citeproc::default();
    let values = vec![
        Value::new(id(&catalog, "format"), "json"),
        Value::flag(id(&catalog, "shell")),
        Value::flag(id(&catalog, "list")),
    ];
    let res = eval(&catalog, values, &mut [&mut list, &mut tool]);
    assert_eq!(res, "");
    expect![[r#"
        List {
            format: "JSON",
        }
    "#]]
    .assert_debug_eq(&list);
    expect![[r#"
        Some(
            ListCommand {
                entries: 0,
            },
        )
    "#]]
    .assert_debug_eq(&tool.command);
}

#[test]
fn dispatch_error() {
    let catalog = catalog();
    let mut tool = Citeproc::default();
    let res = eval(&catalog, vec![Value::new(id(&catalog, "help"), "please")], &mut [&mut tool]);
    expect![[r#"can't set `help` on `it::citeproc::Citeproc`: can't parse `please`, provided string was not `true` or `false`"#]]
        .assert_eq(&res);
}

#[test]
fn custom_setter_errors() {
    let catalog = introspect(&[Class::of::<Strict>()]).unwrap();
    let limit = id(&catalog, "limit");
    let mut strict = Strict::default();

    let res = catalog.evaluate(vec![Value::new(limit.clone(), "7")], &mut [&mut strict]);
    assert!(res.is_ok());
    assert_eq!(strict.limit, 7);

    let err = catalog.evaluate(vec![Value::new(limit, "42")], &mut [&mut strict]).unwrap_err();
    assert!(matches!(err, Error::Dispatch { .. }));
    expect![[r#"can't set `limit` on `it::citeproc::Strict`: 42 is more than 10"#]]
        .assert_eq(&err.to_string());
    assert_eq!(strict.limit, 7);

    let err = catalog.evaluate(vec![Value::unknown("x")], &mut [&mut strict]).unwrap_err();
    assert!(matches!(err, Error::Dispatch { .. }));
    expect![[r#"can't set `rest` on `it::citeproc::Strict`: unexpected arguments: x"#]]
        .assert_eq(&err.to_string());
}

#[test]
fn identifiers_from_another_catalog() {
    let catalog = catalog();
    let other = crate::catalog();
    let mut tool = Citeproc::default();
    let err = catalog
        .evaluate(vec![Value::flag(id(&other, "version"))], &mut [&mut tool])
        .unwrap_err();
    assert!(matches!(err, Error::UnknownIdentifier(_)));
    assert!(!tool.version);
}
