// src/exec/cmdline.rs

//! Helpers for turning configured command lines into argv vectors.

use crate::errors::{Result, SitepipeError};

/// Split a command line into arguments.
///
/// Whitespace separates arguments; single and double quotes group, and a
/// backslash escapes the next character inside double quotes or outside
/// quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') => quote = None,
            (Some('"'), '"') => quote = None,
            (Some('\''), c) => current.push(c),
            (Some(_), '\\') | (None, '\\') => {
                in_arg = true;
                match chars.next() {
                    Some(next) => current.push(next),
                    None => current.push('\\'),
                }
            }
            (Some(_), c) => current.push(c),
            (None, '\'') | (None, '"') => {
                in_arg = true;
                quote = Some(c);
            }
            (None, c) if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            (None, c) => {
                in_arg = true;
                current.push(c);
            }
        }
    }

    if let Some(q) = quote {
        return Err(SitepipeError::config(format!(
            "unterminated {q} quote in command line: {line}"
        )));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

/// Replace `{name}` tokens in `input` with their values.
pub fn substitute_tokens(input: &str, tokens: &[(&str, &str)]) -> String {
    tokens
        .iter()
        .fold(input.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{name}}}"), value)
        })
}

/// Quote an argument for display in logs and messages.
pub fn display_arg(arg: &str) -> String {
    if arg.is_empty() || arg.chars().any(char::is_whitespace) {
        format!("\"{arg}\"")
    } else {
        arg.to_string()
    }
}

/// Quote one argument so a shell passes it through as a single word.
///
/// POSIX `sh` gets single quotes (an embedded `'` becomes `'\''`); `cmd`
/// gets double quotes with embedded `"` doubled.
pub fn shell_quote(arg: &str, windows: bool) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@+,".contains(c));
    if plain {
        arg.to_string()
    } else if windows {
        format!("\"{}\"", arg.replace('"', "\"\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
