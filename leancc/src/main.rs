use clap::Parser;
use leancc::{report, CompileError};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "leancc",
    version,
    about = "A compiler for a minimal C-like language",
    long_about = None
)]
struct Args {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    input: PathBuf,
    /// Output file
    #[arg(short, long, value_name = "OUT", default_value = "a.out")]
    output: PathBuf,
    /// Print the validated AST to stdout
    #[arg(long)]
    dump_ast: bool,
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG overrides the command line
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Prints `error` and exits. Compilation never continues past the first error.
fn fail(error: &CompileError, path: &Path, content: Option<&str>) -> ! {
    eprint!("{}", report::render(error, path, content));
    process::exit(1);
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);
    log::debug!("leancc {}", leancc::version_string());

    let content = match leancc::read_source(&args.input) {
        Ok(content) => content,
        Err(error) => fail(&error, &args.input, None),
    };

    let program = match leancc::compile_source(&content) {
        Ok(program) => program,
        Err(error) => fail(&error, &args.input, Some(&content)),
    };

    if args.dump_ast {
        println!("{}", program);
    }

    leancc::generate(&program, &args.output);
}
