use crate::evaluator::Interpreter;
use crate::object::Object;
use crate::reporter::NyanError;
use crate::{parse, tokenize};
use std::io::{self, Write};

static PROMPT: &str = "にゃん> ";
static EXIT_WORD: &str = "おしまい";

/// Interactive loop. One interpreter lives for the whole session, so
/// variables and functions declared on earlier lines stay visible.
pub fn start() {
    println!("ねこ語インタプリタにゃーん");
    println!("終了するには '{}' と入力してにゃ", EXIT_WORD);
    println!();

    let mut output = io::stdout();
    let mut interpreter = Interpreter::new(&mut output);

    loop {
        print!("{}", PROMPT);
        let _ = io::stdout().flush();

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let input = line.trim();
        if input == EXIT_WORD {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match run_line(&mut interpreter, input) {
            Ok(Object::Nil) => {}
            Ok(value) => println!("=> {}", value),
            Err(error) => println!("にゃーん？: {}", error),
        }
    }

    println!("またにゃーん！");
}

fn run_line(interpreter: &mut Interpreter, input: &str) -> Result<Object, NyanError> {
    let tokens = tokenize(input)?;
    let program = parse(tokens)?;
    Ok(interpreter.interpret(&program)?)
}
