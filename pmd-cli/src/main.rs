// Command-line interface for pmd
//
// This binary converts documents between the editor's JSON snapshots, portable markdown and
// read-only HTML, and reports which uploaded assets a stored document references.
//
// The conversion engine lives in pmd-babel; this crate only reads files, layers configuration
// and prints results.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  pmd <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  pmd convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  pmd assets <input> [--from <format>] [--previous 1,2,3]  - Referenced (or orphaned) asset ids
//  pmd --list-formats                                        - List available formats
//
// Extra Parameters:
//
// Converter settings can be overridden per run using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and maps the parameter onto the loaded configuration.
// Example:
//  pmd post.md --to html --extra-hard-breaks false

use clap::{Arg, ArgAction, Command, ValueHint};
use pmd_babel::{orphaned_assets, Converter, ConverterOptions, FormatRegistry, Node};
use pmd_config::{Loader, PmdConfig};
use std::collections::HashMap;
use std::fs;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "assets", "help"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // The next arg is the value unless it is another flag or missing
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn from_arg() -> Arg {
    Arg::new("from")
        .long("from")
        .help("Source format (auto-detected from file extension if not specified)")
        .value_hint(ValueHint::Other)
}

fn build_cli() -> Command {
    Command::new("pmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting editor documents and portable markdown")
        .long_about(
            "pmd converts documents between the editor's JSON snapshots, portable markdown\n\
            (markdown plus :::image / :::video / :::file directives) and read-only HTML.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (default command)\n  \
            - assets:  List the uploaded assets a document references\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override converter settings for one run.\n  \
            Boolean flags can omit the value (defaults to 'true').\n  \
            Known names: hard-breaks, tables, strikethrough, autolink, fence-aware,\n  \
            default-language.\n\n\
            Examples:\n  \
            pmd post.md --to html                     # Render for read-only views (stdout)\n  \
            pmd editor.json --to portable -o post.md  # Store an editor snapshot\n  \
            pmd assets post.md --previous 3,4,9       # Ids no longer referenced",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a pmd.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - portable: Portable markdown (.md, .markdown, .pmd)\n  \
                    - json:     Editor JSON snapshot (.json)\n  \
                    - html:     Read-only HTML fragment (.html), output only\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    pmd convert post.md --to json            # Editor snapshot (stdout)\n  \
                    pmd convert editor.json --to portable    # Portable markdown\n  \
                    pmd post.md --to html -o post.html       # 'convert' is optional",
                )
                .arg(input_arg())
                .arg(from_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .long_help(
                            "Target format to convert to.\n\n\
                            Available formats: portable, json, html\n\
                            Use the format name, not the file extension.",
                        )
                        .required(true)
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
            Command::new("assets")
                .about("List the asset ids a document references")
                .long_about(
                    "Print the ids of the uploaded assets a document references, one per line,\n\
                    in document order without repeats.\n\n\
                    With --previous, print instead the ids from that list the document no longer\n\
                    references, so storage can release them.\n\n\
                    Examples:\n  \
                    pmd assets post.md                    # Referenced ids\n  \
                    pmd assets post.md --previous 3,4,9   # Orphaned ids",
                )
                .arg(input_arg())
                .arg(from_arg())
                .arg(
                    Arg::new("previous")
                        .long("previous")
                        .value_name("IDS")
                        .help("Comma separated ids referenced by the previous version")
                        .value_delimiter(',')
                        .value_parser(clap::value_parser!(u64))
                        .num_args(1..),
                ),
        )
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A first argument that is neither a flag nor a subcommand is an input file
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

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    for key in extra_params.keys() {
        warn!(parameter = %key, "ignoring unknown --extra parameter");
    }

    let converter = Converter::with_options(ConverterOptions::from(&config));
    let registry = FormatRegistry::with_converter(converter.clone());

    if matches.get_flag("list-formats") {
        handle_list_formats_command(&registry);
        return;
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            let Some(to) = sub_matches.get_one::<String>("to") else {
                fail("--to is required");
            };
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(&registry, input, &from, to, output);
        }
        Some(("assets", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            let from = resolve_from(&registry, input, sub_matches.get_one::<String>("from"));
            let previous: Option<Vec<u64>> = sub_matches
                .get_many::<u64>("previous")
                .map(|ids| ids.copied().collect());
            handle_assets_command(&registry, &converter, input, &from, previous.as_deref());
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Explicit --from, else the format registered for the input's extension.
fn resolve_from(registry: &FormatRegistry, input: &str, from: Option<&String>) -> String {
    if let Some(from) = from {
        return from.to_string();
    }
    match registry.detect_format_from_filename(input) {
        Some(detected) => {
            debug!(format = %detected, "detected source format");
            detected
        }
        None => {
            eprintln!("Error: Could not detect format from filename '{input}'");
            eprintln!("Please specify --from explicitly");
            std::process::exit(1);
        }
    }
}

fn read_document(registry: &FormatRegistry, input: &str, from: &str) -> Node {
    if let Err(e) = registry.get(from) {
        fail(&e.to_string());
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });

    registry.parse(&source, from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
) {
    // Validate the target before doing any work
    if let Err(e) = registry.get(to) {
        fail(&e.to_string());
    }

    let doc = read_document(registry, input, from);

    let result = registry.serialize(&doc, to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the assets command
fn handle_assets_command(
    registry: &FormatRegistry,
    converter: &Converter,
    input: &str,
    from: &str,
    previous: Option<&[u64]>,
) {
    let doc = read_document(registry, input, from);

    let ids = match previous {
        Some(previous) => orphaned_assets(previous, &doc),
        None => converter.extract_asset_ids(&doc),
    };
    for id in ids {
        println!("{id}");
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available formats:\n");
    for format_name in registry.list_formats() {
        let Ok(format) = registry.get(&format_name) else {
            continue;
        };
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "read/write",
            (true, false) => "read",
            (false, true) => "write",
            (false, false) => "-",
        };
        println!(
            "  {format_name:<10} {direction:<10} {} (.{})",
            format.description(),
            format.file_extensions().join(", .")
        );
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> PmdConfig {
    let loader = Loader::new().with_optional_file("pmd.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Apply the known --extra-* parameters to `config`, removing them from `extra_params`.
fn apply_config_overrides(config: &mut PmdConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["hard-breaks", "hardbreaks"]) {
        config.markdown.hard_breaks = parse_bool_arg("hard-breaks", &raw);
    }
    if let Some(raw) = extra_params.remove("tables") {
        config.markdown.tables = parse_bool_arg("tables", &raw);
    }
    if let Some(raw) = extra_params.remove("strikethrough") {
        config.markdown.strikethrough = parse_bool_arg("strikethrough", &raw);
    }
    if let Some(raw) = extra_params.remove("autolink") {
        config.markdown.autolink = parse_bool_arg("autolink", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["fence-aware", "fence-aware-directives"]) {
        config.directives.fence_aware = parse_bool_arg("fence-aware", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["default-language", "code-language"]) {
        config.code_block.default_language = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
