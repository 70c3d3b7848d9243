//! Pre-parse classification of `argv[0]`/`argv[1]` into either a normal
//! driver invocation or a subcommand dispatch that this driver cannot
//! itself run.

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    Normal { is_repl: bool },
    Subcommand { name: String },
}

/// Classify `argv` and return the mode alongside the argument vector the
/// rest of the pipeline should see (with any `argv[0]`/`argv[1]` collapse
/// already applied).
pub fn classify_invocation(argv: &[String]) -> (InvocationMode, Vec<String>) {
    let basename = argv
        .first()
        .map(|a| Path::new(a).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default())
        .unwrap_or_default();

    if basename != "swift" && basename != "swiftc" {
        return (InvocationMode::Normal { is_repl: false }, argv.to_vec());
    }

    let Some(arg1) = argv.get(1) else {
        return (InvocationMode::Normal { is_repl: false }, argv.to_vec());
    };

    if arg1 == "-frontend" {
        let mut rewritten = vec!["swift-frontend".to_string()];
        rewritten.extend_from_slice(&argv[2..]);
        return (InvocationMode::Subcommand { name: "swift-frontend".to_string() }, rewritten);
    }
    if arg1 == "-modulewrap" {
        let mut rewritten = vec!["swift-modulewrap".to_string()];
        rewritten.extend_from_slice(&argv[2..]);
        return (InvocationMode::Subcommand { name: "swift-modulewrap".to_string() }, rewritten);
    }

    if arg1.starts_with('-') || arg1.starts_with('/') || arg1.contains('.') {
        return (InvocationMode::Normal { is_repl: false }, argv.to_vec());
    }

    if basename != "swift" {
        return (InvocationMode::Normal { is_repl: false }, argv.to_vec());
    }

    if arg1 == "repl" {
        let mut rewritten = vec![argv[0].clone()];
        rewritten.extend_from_slice(&argv[2..]);
        return (InvocationMode::Normal { is_repl: true }, rewritten);
    }

    let name = format!("swift-{}", arg1);
    let mut rewritten = vec![name.clone()];
    rewritten.extend_from_slice(&argv[2..]);
    (InvocationMode::Subcommand { name }, rewritten)
}
