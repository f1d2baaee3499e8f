//! Template CPU CLI
//!
//! Usage:
//!   template-cpu [OPTIONS] --rules <FILE> [MANIFEST]
//!
//! Options:
//!   -r, --rules <FILE>    Rule set to apply (TOML format)
//!   -t, --template-only   Print only the rewritten root template
//!   -v, --verbose         Log progress to stderr, twice for trace output
//!   -h, --help            Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use template_cpu::manifest::Manifest;
use template_cpu::{Cpu, CpuConfig, CpuError, RuleSet};

#[derive(Parser)]
#[command(name = "template-cpu")]
#[command(about = "Rewrite component templates with declarative rules")]
struct Cli {
    /// Component manifest (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Rule set to apply (TOML format)
    #[arg(short, long)]
    rules: PathBuf,

    /// Print only the rewritten root template
    #[arg(short, long)]
    template_only: bool,

    /// Log progress to stderr, twice for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let rules = match RuleSet::from_file(&cli.rules) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error loading rules '{}': {}", cli.rules.display(), e);
            process::exit(1);
        }
    };

    let (filename, source) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (path.display().to_string(), content),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => ("<stdin>".to_string(), buffer),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(1);
                }
            }
        }
    };

    let manifest = match Manifest::from_str(&source) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("Error in manifest '{}': {}", filename, e);
            process::exit(1);
        }
    };

    let (graph, registry) = match manifest.to_graph() {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error in manifest '{}': {}", filename, e);
            process::exit(1);
        }
    };

    let config = CpuConfig::new().with_log_templates(cli.verbose > 0);
    let mut cpu = Cpu::new(rules).with_config(config);
    let transformed = match cpu.process(&graph, &registry) {
        Ok(transformed) => transformed,
        Err(CpuError::Scan { component, source: err }) => {
            let (name, template) = graph
                .get(component)
                .map(|c| (c.base().name.as_str(), c.template()))
                .unwrap_or(("<unknown>", ""));
            eprint!("{}", err.format(template, name));
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let rules = cpu.into_instruction();
    for index in rules.unused_rules() {
        warn!(rule = index, "rule never matched");
    }

    if cli.template_only {
        if let Some(root) = transformed.root_component() {
            println!("{}", root.template());
        }
        return;
    }

    let output = Manifest::from_graph(&transformed).with_globals(&graph, &registry);
    match output.to_toml_string() {
        Ok(text) => print!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "template_cpu=debug",
        _ => "template_cpu=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
