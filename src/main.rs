// bftty: tape-language interpreter with a time-travel tape viewer

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use bftty::channel::{ByteChannel, Channel, CodepointChannel};
use bftty::interpreter::constants::{DEFAULT_CELLSIZE, DEFAULT_HISTORY_LIMIT, DEFAULT_MEMSIZE};
use bftty::interpreter::engine::{EofPolicy, Interpreter};
use bftty::memory::{ContiguousMemory, Dump, Memory, MemoryConfig, Overflow, SparseMemory};
use bftty::snapshot::{record, OutputEncoding, Termination};
use bftty::ui::App;

type DynInterpreter = Interpreter<Box<dyn Memory>, Box<dyn Channel>, Box<dyn Channel>>;

/// Run a tape-language script
#[derive(Parser, Debug)]
#[command(name = "bftty", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["command", "script"])))]
struct Args {
    /// Script given on the command line
    #[arg(short = 'c', long = "command", value_name = "SCRIPT")]
    command: Option<String>,

    /// File containing the script
    #[arg(short = 'f', long = "script", value_name = "FILE")]
    script: Option<PathBuf>,

    /// Read `,` input from this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    infile: Option<PathBuf>,

    /// Write `.` output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of tape cells (0 = unbounded)
    #[arg(long, default_value_t = DEFAULT_MEMSIZE)]
    memsize: usize,

    /// Number of values a cell can hold (0 = unbounded)
    #[arg(long, default_value_t = DEFAULT_CELLSIZE)]
    cellsize: u64,

    /// Saturate cells at 0 and cellsize - 1 instead of wrapping
    #[arg(long)]
    clamp: bool,

    /// Use the hash-map tape instead of the byte buffer
    #[arg(long)]
    sparse: bool,

    /// Treat input and output as Unicode codepoints instead of bytes
    #[arg(long)]
    unicode: bool,

    /// What `,` does at end of input: fail, unchanged, or a value to store
    #[arg(long, default_value = "fail", value_parser = parse_eof_policy)]
    eof: EofPolicy,

    /// Print the engine state to stderr at every `#`
    #[arg(long)]
    debug: bool,

    /// Print progress to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the final tape to stderr
    #[arg(long)]
    dump: bool,

    /// Record the run and browse it in the terminal viewer
    #[arg(long)]
    tui: bool,
}

fn parse_eof_policy(s: &str) -> Result<EofPolicy, String> {
    match s {
        "fail" => Ok(EofPolicy::Fail),
        "unchanged" => Ok(EofPolicy::Unchanged),
        value => value
            .parse::<i64>()
            .map(EofPolicy::Substitute)
            .map_err(|_| format!("expected 'fail', 'unchanged' or an integer, got '{}'", value)),
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let (script, origin) = match (&args.command, &args.script) {
        (Some(command), _) => (command.clone(), "command line".to_string()),
        (None, Some(path)) => (
            fs::read_to_string(path)
                .with_context(|| format!("Cannot read script '{}'", path.display()))?,
            path.display().to_string(),
        ),
        (None, None) => bail!("No script given: use -c SCRIPT or -f FILE"),
    };
    if args.verbose {
        eprintln!("Loaded {} characters from {}", script.chars().count(), origin);
    }

    let memory = build_memory(args)?;
    let input = build_input(args)?;
    let output = build_output(args)?;

    let mut interpreter = Interpreter::with_parts(&script, memory, input, output)
        .with_eof_policy(args.eof);
    if args.debug {
        interpreter = interpreter.with_debug_hook(|snapshot| eprintln!("{}", snapshot));
    }

    if args.tui {
        return run_tui(args, interpreter);
    }

    if args.verbose {
        eprintln!("Executing...");
    }
    let result = interpreter.run();

    if args.dump || (args.verbose && result.is_err()) {
        eprintln!("{}", Dump(interpreter.memory()));
    }
    match result {
        Ok(()) => {
            if args.verbose {
                eprintln!("Execution completed successfully.");
            }
            Ok(())
        }
        Err(e) => Err(anyhow!("Runtime error: {}", e)),
    }
}

fn run_tui(args: &Args, mut interpreter: DynInterpreter) -> Result<()> {
    let encoding = if args.unicode {
        OutputEncoding::Codepoints
    } else {
        OutputEncoding::Bytes
    };

    if args.verbose {
        eprintln!("Recording execution history...");
    }
    let history = record(&mut interpreter, DEFAULT_HISTORY_LIMIT, encoding);
    match history.termination() {
        Termination::Completed => {
            if args.verbose {
                eprintln!("Execution completed successfully.");
                eprintln!("Total steps: {}", history.len());
            }
        }
        other => {
            eprintln!("{}", other);
            eprintln!("Entering TUI with partial execution history...");
        }
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&history);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Terminal viewer failed")
}

fn build_memory(args: &Args) -> Result<Box<dyn Memory>> {
    let config = MemoryConfig::default()
        .with_memsize((args.memsize != 0).then_some(args.memsize))
        .with_cellsize((args.cellsize != 0).then_some(args.cellsize))
        .with_overflow(if args.clamp {
            Overflow::Clamp
        } else {
            Overflow::Wrap
        });

    let fits_in_bytes = config.cellsize.is_some_and(|size| size <= DEFAULT_CELLSIZE);
    if !args.sparse && !fits_in_bytes && args.verbose {
        eprintln!("Cells wider than a byte: using the sparse tape");
    }

    let memory: Box<dyn Memory> = if args.sparse || !fits_in_bytes {
        Box::new(SparseMemory::new(config).context("Invalid tape configuration")?)
    } else {
        Box::new(ContiguousMemory::new(config).context("Invalid tape configuration")?)
    };
    Ok(memory)
}

/// Input channel; the viewer owns the terminal, so `--tui` without a file reads nothing
fn build_input(args: &Args) -> Result<Box<dyn Channel>> {
    let reader: Box<dyn Read> = match &args.infile {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("Cannot open input file '{}'", path.display())
        })?)),
        None if args.tui => Box::new(io::empty()),
        None => Box::new(io::stdin()),
    };

    let channel: Box<dyn Channel> = if args.unicode {
        Box::new(CodepointChannel::reader(reader))
    } else {
        Box::new(ByteChannel::reader(reader))
    };
    Ok(channel)
}

/// Output channel; under `--tui` without a file the output is only shown in the viewer
fn build_output(args: &Args) -> Result<Box<dyn Channel>> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Cannot create output file '{}'", path.display())
        })?)),
        None if args.tui => Box::new(io::sink()),
        None => Box::new(io::stdout()),
    };

    let channel: Box<dyn Channel> = if args.unicode {
        Box::new(CodepointChannel::writer(writer))
    } else {
        Box::new(ByteChannel::writer(writer))
    };
    Ok(channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_eof_policy() {
        assert_eq!(parse_eof_policy("fail"), Ok(EofPolicy::Fail));
        assert_eq!(parse_eof_policy("unchanged"), Ok(EofPolicy::Unchanged));
        assert_eq!(parse_eof_policy("-1"), Ok(EofPolicy::Substitute(-1)));
        assert!(parse_eof_policy("later").is_err());
    }

    #[test]
    fn test_script_source_is_required_and_exclusive() {
        assert!(Args::try_parse_from(["bftty"]).is_err());
        assert!(Args::try_parse_from(["bftty", "-c", "+", "-f", "x.b"]).is_err());
        let args = Args::try_parse_from(["bftty", "-c", "+.", "--memsize", "0"]).unwrap();
        assert_eq!(args.memsize, 0);
        assert_eq!(args.eof, EofPolicy::Fail);
    }
}
