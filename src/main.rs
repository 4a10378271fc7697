use nyanlang::{parse, repl, reporter, tokenize, Interpreter, NyanError};
use std::env;
use std::fs;
use std::io;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl::start(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("使い方: nyanlang [ファイル名.nyan]");
            process::exit(64);
        }
    }
}

fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(_) => {
            eprintln!("ファイルが見つからないにゃーん: {}", path);
            process::exit(1);
        }
    };

    let mut output = io::stdout();
    let mut interpreter = Interpreter::new(&mut output);

    if let Err(error) = run_source(&mut interpreter, &source) {
        reporter::report(&error);
        process::exit(1);
    }
}

fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<(), NyanError> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    interpreter.interpret(&program)?;
    Ok(())
}
