use crate::lexer::LexError;
use crate::object::EvalError;
use crate::parser::SyntaxError;
use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Any error the pipeline can surface, wrapped for cat-voiced reporting.
/// The inner errors stay undecorated; the decoration happens in the
/// `Display` impl here.
#[derive(Debug, Clone, PartialEq)]
pub enum NyanError {
    Lex(LexError),
    Syntax(SyntaxError),
    Eval(EvalError),
}

impl From<LexError> for NyanError {
    fn from(error: LexError) -> Self {
        Self::Lex(error)
    }
}

impl From<SyntaxError> for NyanError {
    fn from(error: SyntaxError) -> Self {
        Self::Syntax(error)
    }
}

impl From<EvalError> for NyanError {
    fn from(error: EvalError) -> Self {
        Self::Eval(error)
    }
}

impl NyanError {
    fn cat_prefix(&self) -> &'static str {
        match self {
            Self::Lex(_) => "文字が読めないにゃ",
            Self::Syntax(_) => "にゃーん？構文が変だにゃ",
            Self::Eval(error) => match error {
                EvalError::UndefinedVariable { .. } => "そんな変数知らないにゃー",
                EvalError::UndefinedFunction { .. } => "関数が見つからないにゃーん",
                EvalError::DivisionByZero => "0で割るなんてとんでもないにゃ！",
                EvalError::WrongArity { .. } => "引数が変だにゃ",
                _ => "計算できないにゃ！",
            },
        }
    }
}

impl Display for NyanError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let raw = match self {
            Self::Lex(error) => error.to_string(),
            Self::Syntax(error) => error.to_string(),
            Self::Eval(error) => error.to_string(),
        };
        write!(f, "{}: {}", self.cat_prefix(), raw)
    }
}

impl Error for NyanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lex(error) => Some(error),
            Self::Syntax(error) => Some(error),
            Self::Eval(error) => Some(error),
        }
    }
}

/// Prints a decorated error to stderr, the way the file runner reports.
pub fn report(error: &NyanError) {
    eprintln!("{}", error);
    eprintln!("ヒント: コードを見直してみるにゃ！");
}
