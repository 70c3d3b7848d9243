//! Recursive `@file` response-file expansion.

use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use swiftdrv_common::{Diagnostic, DiagnosticSink};

/// Abstraction over reading a response file's contents, so tests can supply
/// an in-memory filesystem instead of touching disk.
pub trait ResponseFileReader {
    fn read(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads response files from the real filesystem.
pub struct RealFileSystem;

impl ResponseFileReader for RealFileSystem {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Expand every `@<absolute-path>` argument in `argv`, transitively, into
/// the tokenized contents of that file. Non-absolute `@`-arguments are left
/// untouched, matching the driver's refusal to resolve them against an
/// unknown base directory this early in the pipeline.
pub fn expand_response_files(
    argv: &[String],
    sink: &dyn DiagnosticSink,
    fs: &dyn ResponseFileReader,
) -> Vec<String> {
    let mut visiting = FxHashSet::default();
    expand_tokens(argv.to_vec(), &mut visiting, sink, fs)
}

fn expand_tokens(
    args: Vec<String>,
    visiting: &mut FxHashSet<PathBuf>,
    sink: &dyn DiagnosticSink,
    fs: &dyn ResponseFileReader,
) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        let Some(rest) = arg.strip_prefix('@') else {
            out.push(arg);
            continue;
        };
        let path = PathBuf::from(rest);
        if !path.is_absolute() {
            out.push(arg);
            continue;
        }
        if visiting.contains(&path) {
            sink.emit(Diagnostic::warning(format!(
                "recursive response file '{}' ignored",
                path.display()
            )));
            continue;
        }
        match fs.read(&path) {
            Ok(content) => {
                visiting.insert(path.clone());
                let file_tokens = tokenize(&content);
                let expanded = expand_tokens(file_tokens, visiting, sink, fs);
                visiting.remove(&path);
                out.extend(expanded);
            }
            Err(err) => {
                sink.emit(Diagnostic::warning(format!(
                    "unable to read response file '{}': {}",
                    path.display(),
                    err
                )));
                out.push(arg);
            }
        }
    }
    out
}

/// Tokenize a response file's contents per the driver's quoting rules:
/// `//`-prefixed lines are comments, `\` escapes the next character,
/// matched `'`/`"` pairs make interior whitespace literal, and unescaped
/// whitespace outside quotes separates tokens. Lines never merge tokens
/// across a CR/LF boundary.
fn tokenize(content: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for line in content.lines() {
        if line.trim_start().starts_with("//") {
            continue;
        }
        tokenize_line(line, &mut tokens);
    }
    tokens
}

fn tokenize_line(line: &str, tokens: &mut Vec<String>) {
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut escape = false;
    let mut has_token = false;

    for c in line.chars() {
        if escape {
            current.push(c);
            has_token = true;
            escape = false;
            continue;
        }
        if c == '\\' {
            escape = true;
            has_token = true;
            continue;
        }
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else {
                current.push(c);
            }
            has_token = true;
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                has_token = true;
            }
            c if c.is_whitespace() => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        tokens.push(current);
    }
}
