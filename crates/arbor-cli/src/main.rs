use arbor::builder::classify;
use arbor::{Definition, ExecutionMode, LayoutEngine, LayoutOptions};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Arbor(arbor::Error),
    Json(serde_json::Error),
    BuildFailed,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Arbor(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::BuildFailed => write!(f, "Layout build failed (see log output)"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<arbor::Error> for CliError {
    fn from(value: arbor::Error) -> Self {
        Self::Arbor(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Dump,
    Check,
}

struct Mode(ExecutionMode);

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(Self(ExecutionMode::Background)),
            "incremental" => Ok(Self(ExecutionMode::Incremental)),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    mode: Option<ExecutionMode>,
    config: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
struct CheckOut<'a> {
    records: usize,
    hidden: &'a [String],
    locked: &'a [String],
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli [layout] [--pretty] [--mode background|incremental] [--config <path>] [--out <path>] [<path>|-]\n\
  arbor-cli dump [--mode background|incremental] [--config <path>] [--out <path>] [<path>|-]\n\
  arbor-cli check [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', records are read from stdin as a JSON array.\n\
  - layout prints placements, edge waypoints and tech-level bands as JSON.\n\
  - dump prints the layers as text.\n\
  - check lists the records left out of the layout (cyclic or depending on a cycle).\n\
  - --config reads layout options from a JSON file; --mode overrides its mode.\n\
  - Set RUST_LOG (e.g. RUST_LOG=arbor=debug) for log output on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "dump" => args.command = Command::Dump,
            "check" => args.command = Command::Check,
            "--pretty" => args.pretty = true,
            "--mode" => {
                let Some(mode) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let Mode(mode) = mode.parse::<Mode>().map_err(|_| CliError::Usage(usage()))?;
                args.mode = Some(mode);
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arbor=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => LayoutOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    Ok(options)
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn build(definitions: Vec<Definition>, options: LayoutOptions) -> Result<LayoutEngine, CliError> {
    let engine = LayoutEngine::new(definitions, options);
    if !engine.wait_for_initialization() {
        return Err(CliError::BuildFailed);
    }
    Ok(engine)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let definitions = Definition::list_from_json(&text)?;
    tracing::debug!(records = definitions.len(), "read records");

    match args.command {
        Command::Check => {
            let exclusions = classify(&definitions);
            let out = CheckOut {
                records: definitions.len(),
                hidden: &exclusions.hidden,
                locked: &exclusions.locked,
            };
            write_text(&to_json(&out, args.pretty)?, args.out.as_deref())
        }
        Command::Layout => {
            let engine = build(definitions, load_options(&args)?)?;
            let layout = engine.layout().ok_or(CliError::BuildFailed)?;
            write_text(&to_json(&*layout, args.pretty)?, args.out.as_deref())
        }
        Command::Dump => {
            let engine = build(definitions, load_options(&args)?)?;
            let tree = engine.tree().ok_or(CliError::BuildFailed)?;
            write_text(&tree.to_string(), args.out.as_deref())
        }
    }
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::BuildFailed) => {
            eprintln!("{}", CliError::BuildFailed);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
