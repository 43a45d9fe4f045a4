mod config;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use checker::{CheckOptions, Corpus, DocumentOutcome};

const SUBCOMMANDS: &[&str] = &["check", "toc", "help"];

#[derive(Parser)]
#[command(name = "mdcheck", version, about = "Markdown documentation-set validator")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a directory of Markdown documents
    Check(CheckArgs),

    /// Print the headings of one file with their computed anchor slugs
    Toc(TocArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    root: String,

    /// Restrict checks to SQL code blocks only
    #[arg(long)]
    sql_only: bool,

    /// Whether findings affect the exit code (default true)
    #[arg(long, value_name = "BOOL")]
    fail_on_warning: Option<bool>,

    /// Render findings as rich diagnostics instead of plain report lines
    #[arg(long)]
    diagnostics: bool,
}

#[derive(clap::Args)]
struct TocArgs {
    /// Markdown file to inspect
    file: String,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "check" so `mdcheck docs/` works like
    // `mdcheck check docs/`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "check".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Check(check_args) => do_check(check_args, cli.no_color),
        Command::Toc(toc_args) => do_toc(toc_args),
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let root = Path::new(&args.root);

    // Config file first, flags override.
    let file_config = match config::load(root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };
    let fail_on_warning = args
        .fail_on_warning
        .or(file_config.fail_on_warning)
        .unwrap_or(true);
    let sql_only = args.sql_only || file_config.sql_only.unwrap_or(false);

    let corpus = match Corpus::load(root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let options = CheckOptions { sql_only };
    let report = checker::check_corpus(&corpus, &options);

    let writer = StandardStream::stderr(color_choice);
    let term_config = term::Config::default();

    // Parse failures always render as rich diagnostics on stderr.
    for doc in &report.documents {
        if let DocumentOutcome::Failed(errors) = &doc.outcome {
            for error in errors {
                let diagnostic = error.to_diagnostic();
                let _ = term::emit_to_write_style(
                    &mut writer.lock(),
                    &term_config,
                    &corpus.files,
                    &diagnostic,
                );
            }
        }
    }

    if args.diagnostics {
        for finding in report.findings() {
            let diagnostic = finding.to_diagnostic();
            let _ = term::emit_to_write_style(
                &mut writer.lock(),
                &term_config,
                &corpus.files,
                &diagnostic,
            );
        }
        println!(
            "{} findings in {} documents",
            report.finding_count(),
            report.document_count()
        );
    } else {
        print!("{}", report.render());
    }

    process::exit(report.exit_code(fail_on_warning));
}

fn do_toc(args: TocArgs) {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(2);
        }
    };

    let parser = mddoc::parser::Parser::new(args.file.clone(), source, 0);
    match parser.parse() {
        Ok(doc) => {
            for section in &doc.sections {
                let prefix = "#".repeat(section.level as usize);
                println!("{} {}  #{}", prefix, section.heading, section.slug());
            }
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {}", error.message);
            }
            process::exit(2);
        }
    }
}
