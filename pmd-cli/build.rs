use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by pmd-babel's FormatRegistry::with_defaults
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_FORMATS: &[&str] = &["portable", "json", "html"];

fn format_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_FORMATS))
        .value_hint(ValueHint::Other)
}

fn input_arg() -> Arg {
    Arg::new("input")
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("pmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting editor documents and portable markdown")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a pmd.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("convert")
                .arg(input_arg())
                .arg(format_arg("from", "Source format"))
                .arg(format_arg("to", "Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("assets")
                .arg(input_arg())
                .arg(format_arg("from", "Source format"))
                .arg(Arg::new("previous").long("previous").value_hint(ValueHint::Other)),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "pmd", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "pmd", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "pmd", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
