//! PHP literal rendering.

use crate::typemap::Arg;

/// Render a single-quoted PHP string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Render a short-syntax PHP array of strings.
pub fn list_literal<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<String> = items.iter().map(|s| string_literal(s.as_ref())).collect();
    format!("[{}]", parts.join(", "))
}

/// Render a string for one name, or a list for several.
pub fn names_literal<S: AsRef<str>>(names: &[S]) -> String {
    match names {
        [single] => string_literal(single.as_ref()),
        _ => list_literal(names),
    }
}

/// Render one method argument.
pub fn arg(arg: &Arg) -> String {
    match arg {
        Arg::Str(s) => string_literal(s),
        Arg::Int(n) => n.to_string(),
        Arg::List(items) => list_literal(items),
    }
}

/// Render a comma-separated argument list.
pub fn args(args: &[Arg]) -> String {
    args.iter().map(arg).collect::<Vec<_>>().join(", ")
}
