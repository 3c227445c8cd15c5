use crate::ast;

use std::fmt::Write;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(target: &ast::Target) -> String {
    let mut buf = String::new();

    w!(buf, "impl ::optbind::Bindable for {} {{\n", target.name);
    w!(buf, "    #[allow(unused_variables)]\n");
    w!(buf, "    fn bind(b_: &mut ::optbind::Binder<Self>) {{\n");
    for field in &target.fields {
        if let Some(option) = &field.option {
            emit_option(&mut buf, field, option);
        } else if !field.commands.is_empty() {
            emit_commands(&mut buf, field);
        }
        if let Some(unknown) = &field.unknown {
            emit_unknown(&mut buf, field, unknown);
        }
    }
    w!(buf, "    }}\n");
    w!(buf, "}}\n");

    buf
}

fn emit_option(buf: &mut String, field: &ast::Field, option: &ast::OptionAttr) {
    let long = option.long.clone().unwrap_or_else(|| kebab(field.property()));

    w!(buf, "        b_.option(\n");
    w!(buf, "            {:?},\n", field.property());
    w!(buf, "            ::optbind::OptionDesc::new({:?})", long);
    if let Some(short) = &option.short {
        w!(buf, ".short({:?})", short);
    }
    if let Some(description) = option.description.as_ref().or(field.doc.as_ref()) {
        w!(buf, ".description({:?})", description);
    }
    if option.argument.is_some() || option.argument_type.is_some() {
        let name = option.argument.clone().unwrap_or_else(|| field.property().to_uppercase());
        let ty = option.argument_type.unwrap_or(ast::ArgumentType::String);
        w!(buf, ".argument({:?}, ::optbind::ArgumentType::{:?})", name, ty);
    }
    w!(buf, ".priority({}),\n", option.priority);

    w!(buf, "            |this_, value_| {{\n");
    match &option.setter {
        Some(setter) => {
            w!(
                buf,
                "                ::optbind::rt::IntoSetterResult::into_setter_result({}(\n",
                setter
            );
            w!(buf, "                    this_,\n");
            w!(buf, "                    ::optbind::FromValue::from_value(value_)?,\n");
            w!(buf, "                ))?;\n")
        }
        None => {
            w!(
                buf,
                "                this_.{} = ::optbind::FromValue::from_value(value_)?;\n",
                field.name
            )
        }
    }
    w!(buf, "                Ok(())\n");
    w!(buf, "            }},\n");
    w!(buf, "        );\n");
}

fn emit_commands(buf: &mut String, field: &ast::Field) {
    w!(buf, "        b_.commands(\n");
    w!(buf, "            {:?},\n", field.property());
    w!(buf, "            [\n");
    for command in &field.commands {
        let name = command.name.clone().unwrap_or_else(|| kebab(field.property()));
        w!(buf, "                (::optbind::CommandDesc::new({:?})", name);
        if let Some(description) = &command.description {
            w!(buf, ".description({:?})", description);
        }
        w!(buf, ".priority({}), ", command.priority);
        match (&command.ty, &command.factory) {
            (Some(ty), _) => w!(buf, "::optbind::rt::default_factory::<{}>", ty),
            (None, Some(factory)) => w!(buf, "{}", factory),
            (None, None) => w!(buf, "compile_error!(\"command without a factory\")"),
        }
        w!(buf, " as ::optbind::Factory),\n");
    }
    w!(buf, "            ],\n");
    w!(buf, "            |this_, command_| {{\n");
    w!(buf, "                this_.{} = ::core::convert::Into::into(command_);\n", field.name);
    w!(buf, "                Ok(())\n");
    w!(buf, "            }},\n");
    w!(buf, "        );\n");
}

fn emit_unknown(buf: &mut String, field: &ast::Field, unknown: &ast::UnknownAttr) {
    w!(buf, "        b_.unknown_arguments({:?}, |this_, args_| {{\n", field.property());
    match &unknown.setter {
        Some(setter) => w!(
            buf,
            "            ::optbind::rt::IntoSetterResult::into_setter_result({}(this_, args_))?;\n",
            setter
        ),
        None => w!(buf, "            this_.{} = ::core::convert::Into::into(args_);\n", field.name),
    }
    w!(buf, "            Ok(())\n");
    w!(buf, "        }});\n");
}

fn kebab(s: &str) -> String {
    s.replace('_', "-")
}
