use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use semdoc_core::normalizer::{serialize_canonical, sort_keys};
use semdoc_core::{
    CompareOptions, Comparator, Difference, DifferenceKind, Format, InputRole, RuleTable,
};
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

mod logging;

/// semdoc: semantic comparison of JSON/YAML documents
///
/// Canonicalize, project, compare, and diff documents while ignoring
/// cosmetic differences (key order, duration spelling, implicit defaults).
#[derive(Parser)]
#[command(name = "semdoc", version, about, long_about = None)]
struct Cli {
    /// Suppress stdout; only the exit code reports the outcome
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log verbosity (-v debug, -vv trace); SEMDOC_LOG overrides
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a document in canonical form
    Canonicalize {
        /// Path to a JSON or YAML file
        file: PathBuf,
        /// Output format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: Format,
        /// Rewrite the file in place
        #[arg(long)]
        write: bool,
    },

    /// Rewrite duration literals to their minimal spelling
    Durations {
        /// Path to any text file
        file: PathBuf,
    },

    /// Keep only the fields present in a template
    Project {
        /// Document to prune
        source: PathBuf,
        /// Template document supplying the key shape
        #[arg(long)]
        template: PathBuf,
        /// Output format (yaml or json)
        #[arg(long, default_value = "yaml")]
        format: Format,
    },

    /// Decide whether two documents are semantically equal
    Compare {
        file_a: PathBuf,
        file_b: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        options: CompareArgs,
    },

    /// Show how two documents differ after normalization
    Diff {
        file_a: PathBuf,
        file_b: PathBuf,
        #[command(flatten)]
        options: CompareArgs,
    },

    /// Compute the semantic hash (SHA-256 of the canonical form)
    Hash {
        /// Path to a JSON or YAML file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct CompareArgs {
    /// Extra default rules (YAML or JSON list), added to the built-in table
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Do not apply the built-in default rules
    #[arg(long)]
    no_defaults: bool,

    /// Compare duration literals verbatim
    #[arg(long)]
    no_durations: bool,

    /// Only compare the fields present in this template
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        source: semdoc_core::Error,
    },

    #[error(transparent)]
    Engine(#[from] semdoc_core::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult = Result<i32, CliError>;

fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let out = Output { quiet: cli.quiet };
    let result = match cli.command {
        Commands::Canonicalize {
            file,
            format,
            write,
        } => cmd_canonicalize(&out, &file, format, write),
        Commands::Durations { file } => cmd_durations(&out, &file),
        Commands::Project {
            source,
            template,
            format,
        } => cmd_project(&out, &source, &template, format),
        Commands::Compare {
            file_a,
            file_b,
            json,
            options,
        } => cmd_compare(&out, &file_a, &file_b, json, &options),
        Commands::Diff {
            file_a,
            file_b,
            options,
        } => cmd_diff(&out, &file_a, &file_b, &options),
        Commands::Hash { file } => cmd_hash(&out, &file),
        Commands::Version => {
            out.line(&format!("semdoc {}", env!("CARGO_PKG_VERSION")));
            Ok(0)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    };

    process::exit(exit_code);
}

// ── Output ────────────────────────────────────────────────

struct Output {
    quiet: bool,
}

impl Output {
    fn line(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    fn raw(&self, text: &str) {
        if !self.quiet {
            print!("{}", text);
        }
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_canonicalize(out: &Output, file: &Path, format: Format, write: bool) -> CliResult {
    let text = read_file(file)?;
    let canonical = semdoc_core::canonicalize_as(&text, format).map_err(|e| in_file(file, e))?;

    if write {
        fs::write(file, &canonical).map_err(|source| CliError::Write {
            path: file.to_path_buf(),
            source,
        })?;
        if text != canonical {
            out.line(&format!("{} {}", "canonicalized".green(), file.display()));
        }
    } else {
        out.raw(&canonical);
    }
    Ok(0)
}

fn cmd_durations(out: &Output, file: &Path) -> CliResult {
    let text = read_file(file)?;
    out.raw(&semdoc_core::normalize_durations(&text));
    Ok(0)
}

fn cmd_project(out: &Output, source: &Path, template: &Path, format: Format) -> CliResult {
    let source_text = read_file(source)?;
    let template_text = read_file(template)?;
    let projected = semdoc_core::project_by_template_as(&source_text, &template_text, format)
        .map_err(|e| match e.input() {
            Some(InputRole::Template) => in_file(template, e),
            _ => in_file(source, e),
        })?;
    out.raw(&projected);
    Ok(0)
}

fn cmd_compare(
    out: &Output,
    file_a: &Path,
    file_b: &Path,
    json: bool,
    args: &CompareArgs,
) -> CliResult {
    let comparator = build_comparator(args)?;
    let (a, b) = load_pair(file_a, file_b, args)?;
    let differences = comparator.differences(&a, &b)?;
    let equal = differences.is_empty();

    if json {
        let report = serde_json::json!({
            "equal": equal,
            "differences": differences,
        });
        out.line(&serde_json::to_string_pretty(&report)?);
    } else if equal {
        out.line(&format!("{}", "equal".green()));
    } else {
        out.line(&format!(
            "{} ({} difference{})",
            "different".red(),
            differences.len(),
            if differences.len() == 1 { "" } else { "s" }
        ));
    }

    Ok(if equal { 0 } else { 1 })
}

fn cmd_diff(out: &Output, file_a: &Path, file_b: &Path, args: &CompareArgs) -> CliResult {
    let comparator = build_comparator(args)?;
    let (a, b) = load_pair(file_a, file_b, args)?;
    let differences = comparator.differences(&a, &b)?;

    if differences.is_empty() {
        out.line("no semantic differences");
        return Ok(0);
    }

    let left = normalized_text(&comparator, &a, InputRole::First)?;
    let right = normalized_text(&comparator, &b, InputRole::Second)?;
    let a_name = file_a.display().to_string();
    let b_name = file_b.display().to_string();
    let diff = TextDiff::from_lines(&left, &right);
    let unified = diff.unified_diff().header(&a_name, &b_name).to_string();

    for line in unified.lines() {
        let styled = if line.starts_with("+++") || line.starts_with("---") {
            line.bold().to_string()
        } else if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else if line.starts_with("@@") {
            line.cyan().to_string()
        } else {
            line.to_string()
        };
        out.line(&styled);
    }

    out.line("");
    for difference in &differences {
        out.line(&describe(difference));
    }
    Ok(1)
}

fn cmd_hash(out: &Output, file: &Path) -> CliResult {
    let text = read_file(file)?;
    let hash = semdoc_core::semantic_hash(&text).map_err(|e| in_file(file, e))?;
    out.line(&hash);
    Ok(0)
}

// ── Helpers ───────────────────────────────────────────────

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn in_file(path: &Path, source: semdoc_core::Error) -> CliError {
    CliError::Document {
        path: path.to_path_buf(),
        source,
    }
}

fn build_comparator(args: &CompareArgs) -> Result<Comparator, CliError> {
    let mut rules = if args.no_defaults {
        RuleTable::empty()
    } else {
        RuleTable::builtin()
    };
    if let Some(path) = &args.rules {
        let text = read_file(path)?;
        rules.extend(RuleTable::from_text(&text).map_err(|e| in_file(path, e))?);
    }
    tracing::debug!(rules = rules.rules().len(), "comparator configured");
    Ok(Comparator::new(CompareOptions {
        normalize_durations: !args.no_durations,
        rules,
    }))
}

/// Read both documents, pruned to the template when one is given
fn load_pair(file_a: &Path, file_b: &Path, args: &CompareArgs) -> Result<(String, String), CliError> {
    let a = read_file(file_a)?;
    let b = read_file(file_b)?;
    match &args.template {
        None => Ok((a, b)),
        Some(path) => {
            let template = read_file(path)?;
            let a = semdoc_core::project_by_template(&a, &template)
                .map_err(|e| in_file(file_a, e))?;
            let b = semdoc_core::project_by_template(&b, &template)
                .map_err(|e| in_file(file_b, e))?;
            Ok((a, b))
        }
    }
}

/// Canonical YAML of one side after the comparator's normalization passes
fn normalized_text(
    comparator: &Comparator,
    text: &str,
    input: InputRole,
) -> Result<String, CliError> {
    let mut doc = comparator.normalize(text, input)?;
    sort_keys(&mut doc);
    Ok(serialize_canonical(&doc, Format::Yaml)?)
}

fn describe(difference: &Difference) -> String {
    let path = if difference.path.is_empty() {
        "(root)"
    } else {
        difference.path.as_str()
    };
    let render = |value: &Option<semdoc_core::Document>| {
        value
            .as_ref()
            .and_then(|v| serde_json::to_string(v).ok())
            .unwrap_or_default()
    };
    match difference.kind {
        DifferenceKind::Added => format!(
            "  {} {}: {}",
            "added".green(),
            path,
            render(&difference.second)
        ),
        DifferenceKind::Removed => format!(
            "  {} {}: {}",
            "removed".red(),
            path,
            render(&difference.first)
        ),
        DifferenceKind::Changed => format!(
            "  {} {}: {} -> {}",
            "changed".yellow(),
            path,
            render(&difference.first),
            render(&difference.second)
        ),
        DifferenceKind::TypeMismatch => format!(
            "  {} {}: {} -> {}",
            "type changed".yellow(),
            path,
            difference.first.as_ref().map(|d| d.kind()).unwrap_or("?"),
            difference.second.as_ref().map(|d| d.kind()).unwrap_or("?")
        ),
        DifferenceKind::LengthMismatch => format!(
            "  {} {}: {} -> {} items",
            "length changed".yellow(),
            path,
            render(&difference.first),
            render(&difference.second)
        ),
    }
}
