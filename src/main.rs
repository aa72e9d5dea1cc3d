use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as ClapParser;
use monkey::{display_error, lexer::tokens::TokenKind, Lexer, Parser, ParserConfig, DEFAULT_MAX_DEPTH};
use tracing::{error, info};

/// Parses a source file (or stdin) and prints the re-serialized program.
#[derive(ClapParser, Debug)]
#[command(name = "monkey", version)]
struct Cli {
    /// Source file to parse; reads stdin when omitted
    file: Option<PathBuf>,

    /// Print the token stream instead of parsing
    #[arg(long)]
    tokens: bool,

    /// Maximum expression nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let cli = Cli::parse();

    let (source, file_name) = match read_source(&cli) {
        Ok(read) => read,
        Err(err) => {
            error!("failed to read source: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let lexer = Lexer::new(source.clone(), Some(file_name));

    if cli.tokens {
        print_tokens(lexer);
        return ExitCode::SUCCESS;
    }

    let mut parser = Parser::with_config(
        lexer,
        ParserConfig {
            max_depth: cli.max_depth,
        },
    );
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        for error in parser.errors() {
            display_error(error, &source);
        }
        info!(errors = parser.errors().len(), "parse failed");
        return ExitCode::FAILURE;
    }

    for stmt in program.iter() {
        println!("{}", stmt);
    }

    ExitCode::SUCCESS
}

fn read_source(cli: &Cli) -> io::Result<(String, String)> {
    match &cli.file {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            Ok((source, file_name))
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((source, String::from("stdin")))
        }
    }
}

fn print_tokens(mut lexer: Lexer) {
    loop {
        let token = lexer.next_token();
        println!("{}", token);
        if token.is(TokenKind::EOF) {
            break;
        }
    }
}
