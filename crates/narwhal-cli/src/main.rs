use narwhal::svg::{SvgOptions, render_svg};
use narwhal::{Canvas, Graph, LayoutOptions, RepulsionMode};
use serde::Serialize;
use std::io::{Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Layout(value)
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
    Render,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    width: f64,
    height: f64,
    steps: Option<usize>,
    energy_threshold: Option<f64>,
    grid_range: Option<f64>,
    config: Option<String>,
    fit_content: bool,
    diagram_id: Option<String>,
    out: Option<String>,
    verbose: u8,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [layout] [--pretty] [<layout-flags>] [--out <path>] [-v|-vv] [<path>|-]\n\
  narwhal-cli render [--fit-content] [--id <svg-id>] [<layout-flags>] [--out <path>] [-v|-vv] [<path>|-]\n\
\n\
LAYOUT FLAGS:\n\
  --width <w> --height <h>   canvas size (default 600x400)\n\
  --steps <n>                relaxation steps (default 80)\n\
  --energy-threshold <e>     stop early once kinetic energy drops below <e>\n\
  --grid-range <r>           bucketed repulsion, ignoring pairs farther apart than <r>\n\
  --config <path>            JSON layout options (camelCase keys); flags override it\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph JSON is read from stdin.\n\
  - layout prints positioned nodes as JSON; render prints an SVG preview.\n\
  - Logs go to stderr; RUST_LOG is honored when no -v flag is given.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_num<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Layout,
        width: 600.0,
        height: 400.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--fit-content" => args.fit_content = true,
            "-v" => args.verbose = args.verbose.max(1),
            "-vv" => args.verbose = 2,
            "--width" => args.width = parse_num(next_value(&mut it)?)?,
            "--height" => args.height = parse_num(next_value(&mut it)?)?,
            "--steps" => args.steps = Some(parse_num(next_value(&mut it)?)?),
            "--energy-threshold" => {
                args.energy_threshold = Some(parse_num(next_value(&mut it)?)?);
            }
            "--grid-range" => args.grid_range = Some(parse_num(next_value(&mut it)?)?),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
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

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
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

fn build_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut opts = match args.config.as_deref() {
        Some(path) => LayoutOptions::from_json_str(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    if let Some(steps) = args.steps {
        opts.steps = steps;
    }
    if let Some(threshold) = args.energy_threshold {
        opts.energy_threshold = Some(threshold);
    }
    if let Some(range) = args.grid_range {
        opts.repulsion_mode = RepulsionMode::Grid { range };
    }
    opts.validate()?;
    Ok(opts)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    bytes.push(b'\n');
    write_bytes(&bytes, out)
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, bytes)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph = Graph::from_json_str(&text)?;
    let canvas = Canvas::new(args.width, args.height)?;
    let opts = build_options(&args)?;

    tracing::info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        width = canvas.width,
        height = canvas.height,
        steps = opts.steps,
        "laying out graph"
    );
    let result = narwhal::layout_with(&graph, canvas, &opts)?;
    if result.stats.skipped_edges > 0 {
        tracing::debug!(
            skipped = result.stats.skipped_edges,
            "ignored dangling or self-referencing edges"
        );
    }

    match args.command {
        Command::Layout => write_json(&result, args.pretty, args.out.as_deref()),
        Command::Render => {
            let svg_opts = SvgOptions {
                fit_content: args.fit_content,
                diagram_id: args.diagram_id.clone(),
            };
            let svg = render_svg(&graph, &result, &svg_opts);
            write_bytes(svg.as_bytes(), args.out.as_deref())
        }
    }
}

fn main() {
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

    init_logging(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
