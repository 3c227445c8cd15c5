mod ast;
mod parse;
mod emit;

#[proc_macro_derive(Bindable, attributes(option, command, unknown_arguments))]
pub fn bindable(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::bindable(_ts) {
            Ok(target) => emit::emit(&target),
            Err(err) => format!("compile_error!({:?});", format!("can't derive `Bindable`, {err}")),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> Result<String, String> {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    let target = parse::bindable(ts).map_err(|err| err.to_string())?;
    Ok(emit::emit(&target))
}
