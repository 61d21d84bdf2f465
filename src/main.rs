//! dasc: parse das command lines and print their structure.
//!
//! Parses the command given on the command line, or each line of stdin,
//! and writes one result per parse to stdout (JSON by default).
//!
//! Exit status is 1 if any parse failed, 2 on bad usage.

use std::io::BufRead;

use clap::{ArgAction, Parser};
use dasc::config::{Config, OutputFormat};
use dasc::parse::{ParseError, Redir, Tree};

/// Parse das command lines and print their structure
#[derive(Parser, Debug)]
#[command(name = "dasc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Interactive parse: keep partial results and report the completion context
    #[arg(long)]
    tab: bool,

    /// Script name used in error messages
    #[arg(long)]
    name: Option<String>,

    /// Config overlay to use instead of ~/.config/dasc/config.toml
    #[arg(long)]
    config: Option<String>,

    /// Print the merged config as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Raise the log level (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Command line to parse; read lines from stdin when absent
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

/// Render one parse result in the configured format.
fn render(tree: &Tree, result: &Result<(), ParseError>, config: &Config) -> String {
    let error = result.as_ref().err().map(ToString::to_string);
    match config.output.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": tree.name,
                "tab": tree.is_tab(),
                "root": tree.root,
                "context": tree.ctx,
                "error": error,
            });
            let rendered = if config.output.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            };
            rendered.unwrap_or_default()
        }
        OutputFormat::Text => {
            let mut lines = Vec::new();
            if let Some(root) = &tree.root {
                lines.push(format!("root: {root}"));
                for arg in &root.args {
                    let (loc, text) = tree.error_context(arg);
                    lines.push(format!("  arg {text} at {loc}"));
                }
                for redir in &root.redirs {
                    match redir {
                        Redir::Filename { target, .. } => {
                            let (loc, _) = tree.error_context(target);
                            lines.push(format!("  redir {redir} at {loc}"));
                        }
                        _ => lines.push(format!("  redir {redir}")),
                    }
                }
            }
            if let Some(dasc::Context::Argument { prefix }) = &tree.ctx {
                lines.push(format!("context: argument {prefix:?}"));
            }
            if let Some(e) = error {
                lines.push(format!("error: {e}"));
            }
            lines.join("\n")
        }
    }
}

/// Parse one line and print it. Returns whether the parse succeeded.
fn run(name: &str, line: &str, tab: bool, config: &Config) -> bool {
    let mut tree = Tree::new(name).with_label(&config.settings.label);
    let result = tree.parse(line, tab);
    println!("{}", render(&tree, &result, config));
    result.is_ok()
}

fn main() {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref());

    if args.dump_config {
        match config.to_toml() {
            Ok(toml) => print!("{toml}"),
            Err(e) => {
                eprintln!("dasc: cannot render config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    dasc::logging::init(&config.settings, args.verbose);

    let mut ok = true;
    if !args.command.is_empty() {
        let name = args.name.as_deref().unwrap_or("argv");
        ok = run(name, &args.command.join(" "), args.tab, &config);
    } else {
        let name = args.name.as_deref().unwrap_or("stdin");
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    eprintln!("dasc: failed to read stdin: {e}");
                    std::process::exit(1);
                }
            };
            ok &= run(name, &line, args.tab, &config);
        }
    }

    if !ok {
        std::process::exit(1);
    }
}
