use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fs::read_to_string, process::ExitCode};
use tracing_subscriber::EnvFilter;

const EXIT_FAILED_RUN: u8 = 1;
const EXIT_DATA_ERROR: u8 = 65;
const EXIT_CANCELLED: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "blockmaze", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: BlockmazeCommand,
    /// Log every executed block.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum BlockmazeCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "sexpr")]
        format: ProgramFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "pretty")]
        format: OutcomeFormat,
        /// Milliseconds to wait between blocks.
        #[clap(long = "delay-ms", default_value_t = 0)]
        delay_ms: u64,
        /// Cancel the run after this many steps.
        #[clap(long = "step-limit")]
        step_limit: Option<u64>,
        /// Print every event of the run.
        #[clap(long)]
        trace: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ProgramFormat {
    Debug,
    #[clap(name = "sexpr")]
    SExpr,
    Script,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutcomeFormat {
    Debug,
    Basic,
    Pretty,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = CLArgs::parse();
    install_tracing(args.verbose);

    let code = match args.routine {
        BlockmazeCommand::Tokenize { path, format } => {
            eprintln!("Tokenizing {:?}...", path);
            let src = read_to_string(&path)?;
            tokenize(&src, &format)
        }
        BlockmazeCommand::Parse { path, format } => {
            eprintln!("Parsing {:?}...", path);
            let src = read_to_string(&path)?;
            parse(&src, &path, &format)
        }
        BlockmazeCommand::Run {
            path,
            format,
            delay_ms,
            step_limit,
            trace,
        } => {
            eprintln!("Running {:?}...", path);
            let src = read_to_string(&path)?;
            let mut config =
                blockmaze::interpreter::RunConfig::default().with_step_delay(Duration::from_millis(delay_ms));
            if let Some(limit) = step_limit {
                config = config.with_step_limit(limit);
            }
            run(&src, &path, &format, &config, trace)?
        }
    };
    Ok(code)
}

fn install_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn tokenize(src: &str, format: &TokenFormat) -> ExitCode {
    use blockmaze::lexer::formatter::{BasicFormatter, DebugFormatter, ToFormatter, TokenFormatter};
    use blockmaze::lexer::{Lexer, TokenKind};

    let mut scanner = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter + '_> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&scanner)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&scanner)),
    };
    let mut succeeded = true;
    loop {
        match scanner.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        };
    }
    match succeeded {
        true => ExitCode::SUCCESS,
        false => ExitCode::from(EXIT_DATA_ERROR),
    }
}

fn parse(src: &str, path: &Path, format: &ProgramFormat) -> ExitCode {
    use blockmaze::block::formatter::{
        BlockFormatter, DebugFormatter, SExpressionFormatter, ScriptFormatter,
    };
    use blockmaze::parser::formatter::{ParserFormatter, PrettyFormatter};
    use blockmaze::parser::Parser;

    let level = match Parser::new(src).parse_level() {
        Ok(level) => level,
        Err(error) => {
            eprintln!("{}", PrettyFormatter::new(src, path).format_error(&error));
            return ExitCode::from(EXIT_DATA_ERROR);
        }
    };
    let formatter: Box<dyn BlockFormatter> = match format {
        ProgramFormat::Debug => Box::new(DebugFormatter),
        ProgramFormat::SExpr => Box::new(SExpressionFormatter),
        ProgramFormat::Script => Box::new(ScriptFormatter),
    };
    println!("{}", formatter.format(&level.program));
    ExitCode::SUCCESS
}

fn run(
    src: &str,
    path: &Path,
    format: &OutcomeFormat,
    config: &blockmaze::interpreter::RunConfig,
    trace: bool,
) -> Result<ExitCode> {
    use blockmaze::interpreter::context::StdioContext;
    use blockmaze::interpreter::formatter::{
        BasicFormatter, DebugFormatter, OutcomeFormatter, PrettyFormatter,
    };
    use blockmaze::interpreter::{BlockInterpreter, RunOutcome};
    use blockmaze::parser::formatter::{ParserFormatter, PrettyFormatter as PrettyParserFormatter};
    use blockmaze::parser::Parser;

    let level = match Parser::new(src).parse_level() {
        Ok(level) => level,
        Err(error) => {
            eprintln!("{}", PrettyParserFormatter::new(src, path).format_error(&error));
            return Ok(ExitCode::from(EXIT_DATA_ERROR));
        }
    };

    let mut context = StdioContext::new(trace);
    let mut interpreter = BlockInterpreter::new(&level.program, &level.world);
    let outcome = interpreter.run(&mut context, config)?;

    let formatter: Box<dyn OutcomeFormatter + '_> = match format {
        OutcomeFormat::Debug => Box::new(DebugFormatter),
        OutcomeFormat::Basic => Box::new(BasicFormatter::new(src, &level.source_map)),
        OutcomeFormat::Pretty => Box::new(PrettyFormatter::new(src, path, &level.source_map)),
    };
    let code = match outcome {
        RunOutcome::Success { .. } => {
            println!("{}", formatter.format(&outcome));
            ExitCode::SUCCESS
        }
        RunOutcome::Failure(_) => {
            eprintln!("{}", formatter.format(&outcome));
            ExitCode::from(EXIT_FAILED_RUN)
        }
        RunOutcome::Cancelled(_) => {
            eprintln!("{}", formatter.format(&outcome));
            ExitCode::from(EXIT_CANCELLED)
        }
    };
    Ok(code)
}
