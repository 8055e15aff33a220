//! parsley: parse JavaScript, JSX and TypeScript files and report diagnostics.
//!
//! Usage:
//!   parsley [options] <file>...
//!
//! Files are parsed in parallel. Diagnostics are printed to stderr in input
//! order; `--tokens` writes the token stream of every file to stdout as JSON
//! lines and `--ast` dumps the tree.

mod logging;
mod report;

use clap::{Parser as ClapParser, ValueEnum};
use logging::LogFormat;
use miette::Report;
use parsley_ast::{SourceType, Syntax, SyntaxSet};
use parsley_core::AstArena;
use parsley_diagnostics::Diagnostic;
use parsley_parser::{parse, tokenize, ParseOptions};
use parsley_scanner::Token;
use rayon::prelude::*;
use report::{InputError, SourceReport};
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

#[derive(ClapParser, Debug)]
#[command(name = "parsley", version, about = "A recovering JavaScript / JSX / TypeScript parser")]
struct Cli {
    /// Files to parse.
    #[arg(value_name = "FILE", required = true)]
    files: Vec<String>,

    /// JSON file with default parse options.
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<String>,

    /// Enable JSX syntax regardless of the file extension.
    #[arg(long)]
    jsx: bool,

    /// Enable TypeScript syntax regardless of the file extension.
    #[arg(long)]
    ts: bool,

    /// How the top level of each file is interpreted.
    #[arg(long, value_enum)]
    source_type: Option<SourceTypeArg>,

    /// Allow `return` outside of functions.
    #[arg(long)]
    allow_return: bool,

    /// Print the token stream of each file as JSON lines.
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree of each file.
    #[arg(long)]
    ast: bool,

    /// Render diagnostics with source excerpts.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pretty: bool,

    /// Format of log output on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceTypeArg {
    Script,
    Module,
    Template,
}

impl From<SourceTypeArg> for SourceType {
    fn from(arg: SourceTypeArg) -> Self {
        match arg {
            SourceTypeArg::Script => SourceType::Script,
            SourceTypeArg::Module => SourceType::Module,
            SourceTypeArg::Template => SourceType::Template,
        }
    }
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// What parsing one file produced.
struct FileOutcome {
    path: String,
    text: Arc<str>,
    diagnostics: Vec<Diagnostic>,
    corrupt: bool,
    tokens: Vec<Token>,
    ast: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.log_format);
    process::exit(run_parse(&cli));
}

/// Parse every input and print what was found. Returns the exit code: 0 when
/// every tree is sound, 1 when a file could not be read or parsed into a
/// sound tree.
fn run_parse(cli: &Cli) -> i32 {
    let start = Instant::now();
    let base = match load_base_options(cli) {
        Ok(base) => base,
        Err(error) => {
            eprintln!("{:?}", Report::new(error));
            return 1;
        }
    };

    let outcomes: Vec<Result<FileOutcome, InputError>> = cli
        .files
        .par_iter()
        .map(|path| parse_file(path, &base, cli))
        .collect();

    let use_color = cli.pretty && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut failed = 0usize;
    let mut diagnostic_count = 0usize;
    for outcome in outcomes {
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                failed += 1;
                eprintln!("{:?}", Report::new(error));
                continue;
            }
        };
        if cli.tokens {
            print_tokens(&outcome.path, &outcome.tokens);
        }
        if let Some(ast) = &outcome.ast {
            println!("// {}\n{}", outcome.path, ast);
        }
        diagnostic_count += outcome.diagnostics.len();
        if outcome.corrupt {
            failed += 1;
        }
        for diagnostic in outcome.diagnostics {
            print_diagnostic(diagnostic, &outcome.text, cli.pretty);
        }
    }

    let elapsed = start.elapsed();
    info!(files = cli.files.len(), diagnostics = diagnostic_count, ?elapsed, "done");
    if diagnostic_count > 0 || failed > 0 {
        let summary = format!(
            "Found {} diagnostic{}; {} of {} file{} failed.",
            diagnostic_count,
            if diagnostic_count == 1 { "" } else { "s" },
            failed,
            cli.files.len(),
            if cli.files.len() == 1 { "" } else { "s" },
        );
        if use_color {
            eprintln!("\n{}{}{}{}", BOLD, RED, summary, RESET);
        } else {
            eprintln!("\n{}", summary);
        }
    } else if use_color {
        eprintln!("{}Parsed {} file(s) in {:.2}s.{}", GRAY, cli.files.len(), elapsed.as_secs_f64(), RESET);
    }

    if failed > 0 {
        1
    } else {
        0
    }
}

/// Options shared by every file.
struct BaseOptions {
    options: ParseOptions,
    /// The config file named no syntax, so each file's extension decides.
    infer_syntax: bool,
}

/// The config file, then command-line flags.
fn load_base_options(cli: &Cli) -> Result<BaseOptions, InputError> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| InputError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| InputError::Config {
                path: path.clone(),
                source,
            })?
        }
        None => ParseOptions::default(),
    };

    let infer_syntax = options.syntax.is_empty();
    if let Some(source_type) = cli.source_type {
        options.source_type = source_type.into();
    }
    if cli.allow_return {
        options.allow_return_outside_function = true;
    }
    let mut forced = Vec::new();
    if cli.jsx {
        forced.push(Syntax::Jsx);
    }
    if cli.ts {
        forced.push(Syntax::Ts);
    }
    options.syntax |= forced.into_iter().collect::<SyntaxSet>();
    Ok(BaseOptions {
        options,
        infer_syntax,
    })
}

/// Syntax implied by a file extension.
fn syntax_for_path(path: &str) -> &'static [Syntax] {
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("ts" | "mts" | "cts") => &[Syntax::Ts],
        Some("tsx") => &[Syntax::Jsx, Syntax::Ts],
        Some("jsx") => &[Syntax::Jsx],
        _ => &[],
    }
}

fn read_source(path: &str) -> Result<String, InputError> {
    let bytes = std::fs::read(path).map_err(|source| InputError::Read {
        path: path.to_string(),
        source,
    })?;
    match simdutf8::basic::from_utf8(&bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Err(InputError::Encoding {
            path: path.to_string(),
        }),
    }
}

fn parse_file(path: &str, base: &BaseOptions, cli: &Cli) -> Result<FileOutcome, InputError> {
    let text = read_source(path)?;
    let mut options = base.options.clone().with_input(text).with_path(path);
    if base.infer_syntax {
        options.syntax |= syntax_for_path(path).iter().copied().collect::<SyntaxSet>();
    }
    debug!(path, syntax = ?options.syntax, "parsing");

    let internal = |source| InputError::Internal {
        path: path.to_string(),
        source,
    };
    let arena = AstArena::with_capacity(options.input.len() * 4);
    let root = parse(&arena, &options).map_err(internal)?;
    // The tree borrows the arena, so it is rendered before leaving this thread.
    let ast = cli.ast.then(|| {
        format!(
            "{:#?}\n{:#?}\n{:#?}",
            root.interpreter, root.directives, root.statements
        )
    });
    let tokens = if cli.tokens {
        tokenize(&options).map_err(internal)?
    } else {
        Vec::new()
    };

    Ok(FileOutcome {
        path: path.to_string(),
        text: Arc::from(options.input.as_str()),
        diagnostics: root.diagnostics,
        corrupt: root.corrupt,
        tokens,
        ast,
    })
}

fn print_tokens(path: &str, tokens: &[Token]) {
    for token in tokens {
        let line = serde_json::json!({
            "file": path,
            "kind": format!("{:?}", token.kind),
            "start": token.span.start.index,
            "end": token.span.end.index,
            "line": token.span.start.line,
            "column": token.span.start.column,
        });
        println!("{}", line);
    }
}

fn print_diagnostic(diagnostic: Diagnostic, text: &Arc<str>, pretty: bool) {
    if pretty {
        let report = SourceReport::new(diagnostic, Arc::clone(text));
        eprintln!("{:?}", Report::new(report));
    } else {
        eprintln!("{}", diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_from_extension() {
        assert_eq!(syntax_for_path("a/b.tsx"), &[Syntax::Jsx, Syntax::Ts]);
        assert_eq!(syntax_for_path("lib.d.ts"), &[Syntax::Ts]);
        assert_eq!(syntax_for_path("view.jsx"), &[Syntax::Jsx]);
        assert!(syntax_for_path("main.mjs").is_empty());
        assert!(syntax_for_path("Makefile").is_empty());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["parsley", "--ts", "--source-type", "script", "x.js"]);
        let base = load_base_options(&cli).unwrap();
        assert!(base.infer_syntax);
        let options = base.options;
        assert!(options.has_syntax(Syntax::Ts));
        assert!(!options.has_syntax(Syntax::Jsx));
        assert_eq!(options.source_type, SourceType::Script);
    }

    #[test]
    fn test_pretty_can_be_disabled() {
        let cli = Cli::parse_from(["parsley", "--pretty", "false", "--log-format", "json", "x.js"]);
        assert!(!cli.pretty);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
