//! Escaping for Elasticsearch `query_string` values.
//!
//! Reserved characters are backslash-escaped so user text is matched
//! literally: `+ - = & | ! ( ) { } [ ] ^ " ~ * ? : \ /`.
//! `<` and `>` cannot be escaped and are dropped.

pub(crate) fn escape_query_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        match c {
            '<' | '>' => {}
            '+' | '-' | '=' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"'
            | '~' | '*' | '?' | ':' | '\\' | '/' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Wildcard pattern matching `text` anywhere in a term, with whitespace escaped.
pub(crate) fn contains_pattern(text: &str) -> String {
    let escaped = escape_query_string(text);
    format!("*{}*", escaped.replace(' ', "\\ "))
}
