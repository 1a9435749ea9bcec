// Command-line interface for docmark
//
// This binary converts Markdown files to the document model and back, runs batch conversions and
// exposes the LaTeX math transpiler.
//
// The core capabilities live in the docmark-engine crate; configuration comes from docmark-config.
// This crate only parses arguments, loads configuration and reports errors.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension, while
// being overwrittable by an explicit --from flag.
// Usage:
//  docmark <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  docmark convert <input> --to <format> [--from <format>] [-o <file>] - Same as above (explicit)
//  docmark batch <inputs...> --to <format> --out-dir <dir> [--jobs N] [--strict]
//  docmark math <latex> [--xml]         - Transpile a formula to Unicode or Office Math
//  docmark --list-formats               - List available formats
//
// Extra Parameters:
//
// Configuration keys can be overridden with --extra-<section>.<key> <value>.
// Dashes in the key are read as underscores.
// Example:
//  docmark notes.md --to json --extra-render.toc.enabled --extra-export.wrap-width 80

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use docmark_config::{ConfigError, DocmarkConfig, Loader, LOCAL_CONFIG_FILE};
use docmark_engine::batch::output_path;
use docmark_engine::{
    convert_file, convert_files, latex_to_omml, latex_to_unicode, read_document, BatchOptions,
    ConvertError, ConvertOptions, ConvertResult, ErrorPolicy, ExportOptions, FormatRegistry,
    RenderOptions,
};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SUBCOMMANDS: &[&str] = &["convert", "batch", "math", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));
            if has_value {
                extra_params.insert(config_key(key), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(config_key(key), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

/// `export.wrap-width` → `export.wrap_width`
fn config_key(raw: &str) -> String {
    raw.replace('-', "_").to_lowercase()
}

fn build_cli() -> Command {
    Command::new("docmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert between Markdown and word-processing documents")
        .long_about(
            "docmark converts Markdown into a structured document model and back.\n\n\
            Commands:\n  \
            - convert: Convert a single file (default command)\n  \
            - batch:   Convert many files into an output directory\n  \
            - math:    Transpile a LaTeX formula\n\n\
            Extra Parameters:\n  \
            Use --extra-<section>.<key> [value] to override configuration keys.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            docmark notes.md --to json -o notes.json     # Markdown to document model\n  \
            docmark notes.json --to markdown             # Back to Markdown (stdout)\n  \
            docmark batch docs/*.md --to json --out-dir out\n  \
            docmark math '\\frac{1}{2}'                  # (1)/(2)",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a docmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a file between formats (default command)")
                .long_about(
                    "Convert a document between formats.\n\n\
                    Supported formats:\n  \
                    - markdown: Markdown (.md, .markdown)\n  \
                    - json:     Document model as JSON (.json)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (detected from --output when omitted)")
                        .required_unless_present("output")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Convert many files into one output directory")
                .arg(
                    Arg::new("inputs")
                        .help("Input file paths")
                        .required(true)
                        .num_args(1..)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("out-dir")
                        .long("out-dir")
                        .help("Directory for the converted files")
                        .required(true)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("jobs")
                        .long("jobs")
                        .short('j')
                        .help("Number of parallel workers (overrides batch.jobs)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Stop at the first failing file and treat unsupported syntax as an error")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("math")
                .about("Transpile a LaTeX formula")
                .arg(
                    Arg::new("latex")
                        .help("Formula without surrounding dollars")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("xml")
                        .long("xml")
                        .help("Print Office Math markup instead of Unicode text")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    // If no subcommand is given but a path is, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    );

    match matches.subcommand() {
        Some(("convert", sub_matches)) => handle_convert_command(sub_matches, &config),
        Some(("batch", sub_matches)) => handle_batch_command(sub_matches, &config),
        Some(("math", sub_matches)) => {
            let latex = sub_matches
                .get_one::<String>("latex")
                .expect("latex is required");
            if sub_matches.get_flag("xml") {
                println!("{}", latex_to_omml(latex));
            } else {
                println!("{}", latex_to_unicode(latex));
            }
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug output and the default is warnings only.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {name:<10} {} (.{})",
                format.description(),
                format.file_extensions().join(", .")
            );
        }
    }
}

fn load_cli_config(explicit_path: Option<&str>, extra_params: &HashMap<String, String>) -> DocmarkConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    let loader = match explicit_path {
        Some(path) => loader.with_file(path),
        None => loader,
    };
    let loader = apply_config_overrides(loader, extra_params).unwrap_or_else(|err| {
        eprintln!("Invalid configuration override: {err}");
        std::process::exit(1);
    });

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(
    mut loader: Loader,
    extra_params: &HashMap<String, String>,
) -> Result<Loader, ConfigError> {
    let mut keys: Vec<_> = extra_params.keys().collect();
    keys.sort();
    for key in keys {
        debug!("config override {key} = {}", extra_params[key]);
        loader = loader.set_override(key, extra_params[key].as_str())?;
    }
    Ok(loader)
}

/// Engine options for a run, with diagnostics printed to stderr.
fn convert_options(config: &DocmarkConfig) -> ConvertOptions {
    let mut render = RenderOptions::from(&config.render);
    render.errors = with_stderr_reporting(render.errors);
    let mut export = ExportOptions::from(&config.export);
    export.errors = with_stderr_reporting(export.errors);
    ConvertOptions {
        render,
        export,
        ..Default::default()
    }
}

fn with_stderr_reporting(policy: ErrorPolicy) -> ErrorPolicy {
    policy.with_callback(|err: &ConvertError| eprintln!("warning: {err}"))
}

fn handle_convert_command(matches: &ArgMatches, config: &DocmarkConfig) {
    let input = PathBuf::from(
        matches
            .get_one::<String>("input")
            .expect("input is required"),
    );
    let mut options = convert_options(config);
    options.from = matches.get_one::<String>("from").cloned();
    options.to = matches.get_one::<String>("to").cloned();

    let result = match matches.get_one::<String>("output") {
        Some(output) => convert_file(&input, Path::new(output), &options),
        None => convert_to_stdout(&input, &options),
    };
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn convert_to_stdout(input: &Path, options: &ConvertOptions) -> ConvertResult<()> {
    let registry = FormatRegistry::default();
    let to = options.to.as_deref().unwrap_or("markdown");
    registry.get(to)?;
    let document = read_document(input, options.from.as_deref(), &options.render)?;
    let text = registry.serialize(&document, to, &options.export)?;
    print!("{text}");
    Ok(())
}

fn handle_batch_command(matches: &ArgMatches, config: &DocmarkConfig) {
    let to = matches.get_one::<String>("to").expect("to is required");
    let out_dir = PathBuf::from(
        matches
            .get_one::<String>("out-dir")
            .expect("out-dir is required"),
    );
    let strict = matches.get_flag("strict");

    let registry = FormatRegistry::default();
    let extension = match registry.get(to) {
        Ok(format) => format.file_extensions().first().copied().unwrap_or(to.as_str()).to_string(),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let pairs: Vec<(PathBuf, PathBuf)> = matches
        .get_many::<String>("inputs")
        .into_iter()
        .flatten()
        .map(|input| {
            let input = PathBuf::from(input);
            let output = output_path(&input, &out_dir, &extension);
            (input, output)
        })
        .collect();

    let mut options = convert_options(config);
    options.to = Some(to.clone());
    if strict {
        options.render.errors = with_stderr_reporting(ErrorPolicy::strict());
    }

    let mut batch = BatchOptions::from(&config.batch);
    if let Some(jobs) = matches.get_one::<usize>("jobs") {
        batch.parallelism = (*jobs).max(1);
    }
    if strict {
        batch.ignore_errors = false;
    }
    let total = pairs.len();
    batch.progress = Some(Arc::new(move |done: usize, _: usize| {
        debug!("converted {done}/{total}");
    }));

    match convert_files(&pairs, &options, &batch) {
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("{}: {}", pairs[failure.index].0.display(), failure.error);
            }
            eprintln!(
                "Converted {} of {} file(s) into {}",
                report.succeeded,
                report.total,
                out_dir.display()
            );
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
