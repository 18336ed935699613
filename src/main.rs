use std::fs;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use javamm::{Config, Javamm, RunResult, SourceModule};

const TERMINATED_EXIT_CODE: u8 = 130;

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,javamm=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

struct Invocation {
    config: Config,
    files: Vec<String>,
    arguments: Vec<String>,
}

fn parse_args() -> Result<Invocation> {
    let mut args = std::env::args().skip(1);
    let mut config = Config::default();
    let mut files = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-depth" | "-d" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("Missing call depth after {arg}"))?;
                let depth = value
                    .parse()
                    .with_context(|| format!("Invalid call depth '{value}'"))?;
                config = config.with_max_call_depth(depth);
            }
            "--" => break,
            _ => files.push(arg),
        }
    }

    if files.is_empty() {
        bail!("Usage: javamm [--max-depth N] <file>... [-- args...]");
    }
    Ok(Invocation {
        config,
        files,
        arguments: args.collect(),
    })
}

fn load_module(path: &str) -> Result<SourceModule> {
    let source = fs::read_to_string(path).with_context(|| format!("Reading {path}"))?;
    let name = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Invalid module file name {path}"))?;
    Ok(SourceModule::from_text(name, &source))
}

fn main() -> Result<ExitCode> {
    init_logging();

    let invocation = parse_args()?;
    let modules = invocation
        .files
        .iter()
        .map(|path| load_module(path))
        .collect::<Result<Vec<_>>>()?;

    let javamm = Javamm::new(invocation.config);
    let program = match javamm.compile(&modules) {
        Ok(program) => program,
        Err(syntax_error) => {
            eprintln!("{syntax_error}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let result = javamm
        .interpreter()
        .run(&program, invocation.arguments, &mut stdout, &mut stderr)
        .context("Running program")?;

    Ok(match result {
        RunResult::Success(_) => ExitCode::SUCCESS,
        RunResult::RuntimeFailure(_) => ExitCode::FAILURE,
        RunResult::Terminated => ExitCode::from(TERMINATED_EXIT_CODE),
    })
}
