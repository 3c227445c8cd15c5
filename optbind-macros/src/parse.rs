use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn bindable(ts: TokenStream) -> Result<ast::Target> {
    let p = &mut Parser::new(ts);
    while p.eat_punct('#') {
        p.skip_group(Delimiter::Bracket)?;
    }
    vis(p);
    if !p.eat_keyword("struct") {
        bail!("only structs with named fields are supported")
    }
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("generic structs are not supported: `{}`", name)
    }
    if !p.at_delim(Delimiter::Brace) {
        bail!("only structs with named fields are supported")
    }

    p.enter_delim(Delimiter::Brace)?;
    let mut fields = Vec::new();
    while !p.end() {
        fields.push(field(p)?);
    }
    p.exit_delim()?;
    Ok(ast::Target { name, fields })
}

fn field(p: &mut Parser) -> Result<ast::Field> {
    let mut doc = Vec::new();
    let mut option = None;
    let mut commands = Vec::new();
    let mut unknown = None;

    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        if p.eat_keyword("doc") {
            p.expect_punct('=')?;
            let line = p.expect_string()?;
            doc.push(line.strip_prefix(' ').map(str::to_string).unwrap_or(line));
        } else if p.eat_keyword("option") {
            if option.is_some() {
                bail!("`option` specified more than once")
            }
            option = Some(option_attr(p)?);
        } else if p.eat_keyword("command") {
            commands.push(command_attr(p)?);
        } else if p.eat_keyword("unknown_arguments") {
            if unknown.is_some() {
                bail!("`unknown_arguments` specified more than once")
            }
            unknown = Some(unknown_attr(p)?);
        } else {
            p.skip_rest();
        }
        p.exit_delim()?;
    }

    vis(p);
    let name = p.expect_ident()?;
    p.expect_punct(':')?;
    skip_ty(p);

    Ok(ast::Field { name, doc: summary(&doc), option, commands, unknown })
}

/// First paragraph of a doc comment, on one line.
fn summary(doc: &[String]) -> Option<String> {
    let lines = doc
        .iter()
        .map(|it| it.trim())
        .skip_while(|it| it.is_empty())
        .take_while(|it| !it.is_empty())
        .collect::<Vec<_>>();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

fn option_attr(p: &mut Parser) -> Result<ast::OptionAttr> {
    let mut res = ast::OptionAttr::default();
    if !p.at_delim(Delimiter::Parenthesis) {
        return Ok(res);
    }
    p.enter_delim(Delimiter::Parenthesis)?;
    while !p.end() {
        let key = p.expect_ident()?;
        p.expect_punct('=')?;
        match key.as_str() {
            "long" => res.long = Some(p.expect_string()?),
            "short" => res.short = Some(p.expect_string()?),
            "description" => res.description = Some(p.expect_string()?),
            "argument" => res.argument = Some(p.expect_string()?),
            "argument_type" => res.argument_type = Some(argument_type(p)?),
            "priority" => res.priority = p.expect_int()?,
            "setter" => res.setter = Some(p.expect_path()?),
            _ => bail!("unknown `option` key: `{}`", key),
        }
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    Ok(res)
}

fn argument_type(p: &mut Parser) -> Result<ast::ArgumentType> {
    let path = p.expect_path()?;
    let res = match path.rsplit("::").next().unwrap_or_default() {
        "String" => ast::ArgumentType::String,
        "StringArray" => ast::ArgumentType::StringArray,
        _ => bail!("expected `String` or `StringArray`, got `{}`", path),
    };
    Ok(res)
}

fn command_attr(p: &mut Parser) -> Result<ast::CommandAttr> {
    let mut res = ast::CommandAttr::default();
    if !p.at_delim(Delimiter::Parenthesis) {
        bail!("`command` needs a `ty` or a `factory`")
    }
    p.enter_delim(Delimiter::Parenthesis)?;
    while !p.end() {
        let key = p.expect_ident()?;
        p.expect_punct('=')?;
        match key.as_str() {
            "name" => res.name = Some(p.expect_string()?),
            "description" => res.description = Some(p.expect_string()?),
            "priority" => res.priority = p.expect_int()?,
            "ty" => res.ty = Some(p.expect_path()?),
            "factory" => res.factory = Some(p.expect_path()?),
            _ => bail!("unknown `command` key: `{}`", key),
        }
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    match (&res.ty, &res.factory) {
        (None, None) => bail!("`command` needs a `ty` or a `factory`"),
        (Some(_), Some(_)) => bail!("`ty` and `factory` can't be used together"),
        _ => Ok(res),
    }
}

fn unknown_attr(p: &mut Parser) -> Result<ast::UnknownAttr> {
    let mut res = ast::UnknownAttr::default();
    if !p.at_delim(Delimiter::Parenthesis) {
        return Ok(res);
    }
    p.enter_delim(Delimiter::Parenthesis)?;
    while !p.end() {
        let key = p.expect_ident()?;
        p.expect_punct('=')?;
        match key.as_str() {
            "setter" => res.setter = Some(p.expect_path()?),
            _ => bail!("unknown `unknown_arguments` key: `{}`", key),
        }
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    Ok(res)
}

fn vis(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut arrow = false;
    while let Some(tt) = p.ts.pop() {
        if let TokenTree::Punct(punct) = &tt {
            match punct.as_char() {
                ',' if depth == 0 => return,
                '<' => depth += 1,
                '>' if !arrow => depth = depth.saturating_sub(1),
                _ => (),
            }
        }
        arrow = matches!(
            &tt,
            TokenTree::Punct(punct) if punct.as_char() == '-' && punct.spacing() == Spacing::Joint
        );
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if let Some(next) = self.ts.last() {
            bail!("unexpected `{}`", next)
        }
        self.ts = self.stack.pop().unwrap_or_default();
        Ok(())
    }
    fn skip_group(&mut self, delimiter: Delimiter) -> Result<()> {
        self.enter_delim(delimiter)?;
        self.skip_rest();
        self.exit_delim()
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected ident, got `{}`", tt),
            None => bail!("expected ident"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    /// A string literal, or a char literal for short names.
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                unquote(&text).ok_or_else(|| format_err!("expected a string, got `{}`", text))
            }
            _ => bail!("expected a string"),
        }
    }

    fn expect_int(&mut self) -> Result<i32> {
        let neg = self.eat_punct('-');
        let text = match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => lit.to_string(),
            _ => bail!("expected an integer"),
        };
        let digits = text.trim_end_matches("i32").replace('_', "");
        let digits = if neg { format!("-{}", digits) } else { digits };
        digits.parse::<i32>().map_err(|_| format_err!("expected an integer, got `{}`", text))
    }

    fn expect_path(&mut self) -> Result<String> {
        let mut buf = String::new();
        let mut depth = 0usize;
        let mut prev_ident = false;
        while let Some(tt) = self.ts.last() {
            match tt {
                TokenTree::Punct(p) if p.as_char() == ',' && depth == 0 => break,
                TokenTree::Punct(p) => {
                    match p.as_char() {
                        '<' => depth += 1,
                        '>' => depth = depth.saturating_sub(1),
                        _ => (),
                    }
                    buf.push(p.as_char());
                    prev_ident = false;
                }
                TokenTree::Ident(ident) => {
                    if prev_ident {
                        buf.push(' ');
                    }
                    buf.push_str(&ident.to_string());
                    prev_ident = true;
                }
                _ => bail!("expected a path, got `{}`", tt),
            }
            self.ts.pop();
        }
        if buf.is_empty() {
            bail!("expected a path")
        }
        Ok(buf)
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "(",
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::None => "group",
    }
}

fn unquote(text: &str) -> Option<String> {
    if let Some(raw) = text.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let inner = raw.get(hashes..raw.len().checked_sub(hashes)?)?;
        return inner.strip_prefix('"')?.strip_suffix('"').map(str::to_string);
    }
    let inner = match text.strip_prefix('\'') {
        Some(it) => it.strip_suffix('\'')?,
        None => text.strip_prefix('"')?.strip_suffix('"')?,
    };

    let mut res = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next()? {
            'n' => res.push('\n'),
            'r' => res.push('\r'),
            't' => res.push('\t'),
            '0' => res.push('\0'),
            '\\' => res.push('\\'),
            '"' => res.push('"'),
            '\'' => res.push('\''),
            'u' => {
                let rest = chars.as_str().strip_prefix('{')?;
                let (hex, tail) = rest.split_once('}')?;
                res.push(char::from_u32(u32::from_str_radix(hex, 16).ok()?)?);
                chars = tail.chars();
            }
            '\n' => {
                let tail = chars.as_str().trim_start();
                chars = tail.chars();
            }
            _ => return None,
        }
    }
    Some(res)
}
