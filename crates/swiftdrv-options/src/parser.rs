//! Turns an expanded argument vector into a [`ParsedOptions`] bag plus the
//! positional inputs and any tokens that looked like options but matched
//! nothing in the table.

use crate::error::OptionsError;
use crate::option_table::{Arity, OptionId, OPTION_TABLE};
use crate::parsed_options::{Argument, ParsedOption, ParsedOptions};

#[derive(Debug)]
pub struct ParseResult {
    pub options: ParsedOptions,
    /// Positional, non-option arguments in encounter order (includes `-`).
    pub inputs: Vec<String>,
    /// `-`/`--`-prefixed tokens that matched no table entry.
    pub unknown: Vec<String>,
}

/// Parse `args` (already response-file-expanded) against [`OPTION_TABLE`].
///
/// Returns the first hard error encountered (a `Separate` option missing
/// its argument); everything else — unknown options included — is
/// recorded for the caller to warn on rather than aborting the parse.
pub fn parse(args: &[String]) -> Result<ParseResult, OptionsError> {
    let mut parsed = Vec::new();
    let mut inputs = Vec::new();
    let mut unknown = Vec::new();

    let mut i = 0;
    let mut index = 0usize;
    while i < args.len() {
        let tok = &args[i];
        if tok == "-" || !tok.starts_with('-') {
            inputs.push(tok.clone());
            i += 1;
            continue;
        }

        if let Some(matched) = match_token(tok, &args.get(i + 1).cloned()) {
            let (spec_id, argument, consumed_next) = matched;
            parsed.push(ParsedOption { id: spec_id, argument, index });
            index += 1;
            i += if consumed_next { 2 } else { 1 };
            continue;
        }

        // Looked like an option (`-`-prefixed) but matched nothing, or a
        // `Separate` option ran off the end of argv.
        if let Some(spec) = OPTION_TABLE.iter().find(|s| s.spelling == tok.as_str()) {
            if spec.arity == Arity::Separate {
                return Err(OptionsError::MissingArgument(spec.spelling.to_string()));
            }
        }
        unknown.push(tok.clone());
        i += 1;
    }

    tracing::debug!(options = parsed.len(), inputs = inputs.len(), unknown = unknown.len(), "parsed argument vector");
    Ok(ParseResult {
        options: ParsedOptions::new(parsed),
        inputs,
        unknown,
    })
}

/// Try every table entry against `tok`. Returns `(id, argument,
/// consumed_next_token)` on a match.
fn match_token(tok: &str, next: &Option<String>) -> Option<(OptionId, Argument, bool)> {
    // Exact flag match first: `-g` must not be shadowed by `-gnone`'s
    // joined-no-separator rules (it has none; this is just the
    // conceptually-first check per the table's exact-match priority).
    for s in OPTION_TABLE {
        if s.arity == Arity::Flag && s.spelling == tok {
            return Some((s.id, Argument::None, false));
        }
    }

    for s in OPTION_TABLE {
        match s.arity {
            Arity::JoinedEquals => {
                let prefix = format!("{}=", s.spelling);
                if let Some(value) = tok.strip_prefix(&prefix) {
                    return Some((s.id, Argument::Single(value.to_string()), false));
                }
            }
            Arity::FlagOrJoinedEquals => {
                if tok == s.spelling {
                    return Some((s.id, Argument::None, false));
                }
                let prefix = format!("{}=", s.spelling);
                if let Some(value) = tok.strip_prefix(&prefix) {
                    return Some((s.id, Argument::Single(value.to_string()), false));
                }
            }
            Arity::JoinedNoSeparator => {
                if let Some(value) = tok.strip_prefix(s.spelling) {
                    if !value.is_empty() {
                        return Some((s.id, Argument::Single(value.to_string()), false));
                    }
                }
            }
            Arity::Separate => {
                if tok == s.spelling {
                    return next
                        .as_ref()
                        .map(|v| (s.id, Argument::Single(v.clone()), true));
                }
            }
            Arity::Flag => {}
        }
    }
    None
}
