pub mod ast;
mod environment;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
pub mod reporter;
pub mod token;

pub use environment::Environment;
pub use evaluator::Interpreter;
pub use lexer::{LexError, Lexer};
pub use object::{EvalError, Object};
pub use parser::{Parser, SyntaxError};
pub use reporter::NyanError;
pub use token::{Token, TokenKind, TokenType};

use ast::Program;

/// Scans source text into an Eof-terminated token sequence.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Parses a token sequence into a program.
pub fn parse(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
    Parser::new(tokens).parse_program()
}
