//! `lensc` - inspect and check lens paths from the command line

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use lens_ast::PathSegment;
use lens_check::{highlight, LensChecker, LensDeclaration, LensDiagnostic};
use lens_lexer::{Lexer, Token};
use lens_resolve::{resolve, ResolutionOutcome, TypeModel, TypeTable};

mod manifest;
mod render;

use manifest::{load_manifest, load_model, DriverError};

/// Check lens paths against a type model
#[derive(Debug, Parser)]
#[command(name = "lensc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show lexer output (tokens)
    Lex {
        /// Lens path, e.g. `address.city`
        path: String,
    },

    /// Show the parsed path
    Parse {
        path: String,
    },

    /// Show highlight spans
    Highlight {
        path: String,
        /// Shift spans by this many bytes
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Resolve one path against a type model
    Check {
        /// JSON type model
        #[arg(long)]
        model: PathBuf,
        /// Type the path starts from
        #[arg(long)]
        root: String,
        /// The path is an assignment target
        #[arg(long)]
        write: bool,
        path: String,
    },

    /// Check every lens in a manifest
    Inspect {
        /// JSON manifest with `types` and `lenses`
        manifest: PathBuf,
    },

    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Returns `Ok(false)` when diagnostics were reported
fn run(command: Command) -> Result<bool, DriverError> {
    match command {
        Command::Lex { path } => {
            run_lexer(&path);
            Ok(true)
        }
        Command::Parse { path } => run_parser(&path),
        Command::Highlight { path, offset } => {
            run_highlight(&path, offset);
            Ok(true)
        }
        Command::Check { model, root, write, path } => {
            let model = load_model(&model)?;
            let lens = if write { LensDeclaration::write(path) } else { LensDeclaration::read(path) };
            run_check(&model, &root, &lens)
        }
        Command::Inspect { manifest } => {
            let manifest = load_manifest(&manifest)?;
            run_inspect(&manifest)
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "lensc", &mut std::io::stdout());
            Ok(true)
        }
    }
}

fn run_lexer(source: &str) {
    let lexed = Lexer::tokenize(source);

    println!("{:<8} {:<8} {:<12} {}", "SPAN", "LENGTH", "TOKEN TYPE", "VALUE");
    println!("{}", "-".repeat(40));
    for spanned in &lexed.tokens {
        let span_str = format!("{}..{}", spanned.span.start, spanned.span.end);
        println!(
            "{:<8} {:<8} {:<12} {}",
            span_str,
            spanned.span.len(),
            token_type_name(&spanned.token),
            spanned.token
        );
    }

    if let Some(e) = &lexed.error {
        println!("\nstopped early: {}", e);
    }
}

fn token_type_name(token: &Token) -> &'static str {
    match token {
        Token::Ident(_) => "IDENT",
        Token::Dot => "DOT",
        Token::LParen | Token::RParen => "DELIMITER",
        Token::Eof => "EOF",
    }
}

fn run_parser(source: &str) -> Result<bool, DriverError> {
    let parsed = lens_parser::Parser::parse(source);
    print!("{}", parsed.path.pretty_print());

    let methods = parsed.path.iter().filter(|s| s.is_method()).count();
    println!("Segments: {} ({} method calls)", parsed.path.len(), methods);

    if let Some(e) = &parsed.error {
        render::report_recovery("path", source, &parsed.path.to_string(), e)?;
    }
    Ok(parsed.is_complete())
}

fn run_highlight(source: &str, offset: usize) {
    for h in highlight(source, offset) {
        let text = &source[h.span.start - offset..h.span.end - offset];
        println!("{:<8} {:<8} {}", format!("{}..{}", h.span.start, h.span.end), format!("{:?}", h.kind), text);
    }
}

fn run_check(model: &TypeTable, root: &str, lens: &LensDeclaration) -> Result<bool, DriverError> {
    if !model.contains(root) {
        return Err(DriverError::UnknownType(root.to_string()));
    }

    let root = root.to_string();
    let diagnostics = LensChecker::new(model).check(&root, lens);
    if !diagnostics.is_empty() {
        report_all(&root, lens, &diagnostics)?;
        return Ok(false);
    }

    let path = lens_parser::parse(&lens.path);
    println!("{}", describe_resolution(model, &root, &path));
    Ok(true)
}

/// Lenses of one root type and what inspecting them produced
struct RootInspection<'a> {
    root: &'a str,
    lenses: Vec<LensDeclaration>,
    /// `None` when the root cannot host lenses
    diagnostics: Option<Vec<Vec<LensDiagnostic>>>,
}

fn inspect_manifest(manifest: &manifest::Manifest) -> Vec<RootInspection<'_>> {
    let checker = LensChecker::new(&manifest.model);
    manifest
        .lenses_by_root()
        .into_iter()
        .map(|(root, lenses)| {
            let diagnostics = checker.inspect(&root.to_string(), &lenses);
            if diagnostics.is_none() {
                tracing::warn!(root, lenses = lenses.len(), "not a lens host, skipping");
            }
            RootInspection { root, lenses, diagnostics }
        })
        .collect()
}

fn run_inspect(manifest: &manifest::Manifest) -> Result<bool, DriverError> {
    let mut clean = true;

    for inspection in inspect_manifest(manifest) {
        let Some(per_lens) = &inspection.diagnostics else {
            continue;
        };
        for (lens, diagnostics) in inspection.lenses.iter().zip(per_lens) {
            if diagnostics.is_empty() {
                println!("ok    {} \"{}\" ({})", inspection.root, lens.path, lens.mode);
            } else {
                clean = false;
                report_all(inspection.root, lens, diagnostics)?;
            }
        }
    }

    Ok(clean)
}

fn report_all(root: &str, lens: &LensDeclaration, diagnostics: &[LensDiagnostic]) -> Result<(), DriverError> {
    let name = format!("{} \"{}\"", root, lens.path);
    for d in diagnostics {
        render::report_diagnostic(&name, &lens.path, lens.offset, d)?;
    }
    Ok(())
}

/// `Person -> address: Address -> city: City`
fn describe_resolution(model: &TypeTable, root: &String, path: &lens_ast::Path) -> String {
    let mut out = model.presentable_name(root);
    let ResolutionOutcome::Resolved(resolved) = resolve(path, root.clone(), model) else {
        return out;
    };

    for step in &resolved.steps {
        let segment = &path.segments()[step.segment_index];
        let call = if matches!(segment, PathSegment::Method(_)) { "()" } else { "" };
        out.push_str(&format!(
            " -> {}{}: {}",
            segment.name(),
            call,
            model.presentable_name(&step.member_type)
        ));
    }
    if let Some(i) = resolved.opaque_at {
        if i + 1 < path.len() {
            out.push_str(&format!(
                "\n(segments after '{}' not checked: type is opaque)",
                path.segments()[i]
            ));
        }
    }
    out
}
