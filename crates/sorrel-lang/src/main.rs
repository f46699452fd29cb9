use std::env;
use std::fs;
use std::process::ExitCode;

use sorrel_core::ast::Value;
use sorrel_core::env::Env;
use sorrel_core::error::SorrelError;
use sorrel_core::eval::Evaluator;
use sorrel_core::pretty_print::{pretty_print, PrettyPrintOptions};
use sorrel_core::reader;
use sorrel_core::value_format::{format_value, FormatMode};

const DEFAULT_SCRIPT: &str = "main.srl";

fn help() -> ! {
    println!("Usage: sorrel [--pretty] [-e CODE] [file]");
    println!();
    println!("Options:");
    println!("  --pretty    Render the result through the pretty-printer");
    println!("  -e CODE     Evaluate CODE instead of reading a file");
    println!("  -h, --help  Show this help");
    println!();
    println!("Without a file argument, {} is read.", DEFAULT_SCRIPT);
    std::process::exit(0);
}

fn unknown_option(opt: &str) -> ! {
    eprintln!("unknown option: {}", opt);
    help();
}

struct Options {
    pretty: bool,
    code: Option<String>,
    file: Option<String>,
}

fn parse_args(args: Vec<String>) -> Options {
    let mut options = Options {
        pretty: false,
        code: None,
        file: None,
    };
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => help(),
            "--pretty" => options.pretty = true,
            "-e" => match iter.next() {
                Some(code) => options.code = Some(code),
                None => {
                    eprintln!("-e expects an expression");
                    std::process::exit(2);
                }
            },
            other if other.starts_with('-') => unknown_option(other),
            _ => {
                if options.file.is_some() {
                    eprintln!("only one script file can be given");
                    std::process::exit(2);
                }
                options.file = Some(arg);
            }
        }
    }
    options
}

fn evaluate(source: &str) -> Result<Value, SorrelError> {
    let form = reader::parse(source)?;
    let evaluator = Evaluator::new(Env::default());
    evaluator.eval_in_global(&form)
}

fn main() -> ExitCode {
    let options = parse_args(env::args().skip(1).collect());

    let source = match &options.code {
        Some(code) => code.clone(),
        None => {
            let path = options.file.as_deref().unwrap_or(DEFAULT_SCRIPT);
            match fs::read_to_string(path) {
                Ok(text) => text,
                Err(io_err) => {
                    eprintln!("Error:\ncould not read {}: {}", path, io_err);
                    return ExitCode::from(1);
                }
            }
        }
    };

    match evaluate(&source) {
        Ok(value) => {
            if options.pretty {
                println!("{}", pretty_print(&value, &PrettyPrintOptions::default()));
            } else {
                println!("{}", format_value(&value, FormatMode::Readable));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error:\n{}", err);
            ExitCode::from(1)
        }
    }
}
