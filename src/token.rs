use strum_macros::{Display, EnumDiscriminants};

#[derive(Debug, Display, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash, Display))]
#[strum_discriminants(name(TokenType))]
pub enum TokenKind {
    // Identifiers and literals
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),

    // Keywords
    VarDeclare,      // にゃー
    Assign,          // みゃーみゃー
    FunctionDeclare, // にゃにゃ
    Return,          // かえるにゃー
    If,              // シャー
    While,           // もしゃもしゃ
    BlockStart,      // ふみふみ
    BlockEnd,        // おわり
    Print,           // ゴロゴロ
    True,            // にゃーん
    False,           // ぶーにゃー

    // Operators
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Eq,
    NotEq,
    GT,
    LT,
    GTEq,
    LTEq,

    // Delimiters
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        TokenType::from(&self.kind) == token_type
    }
}
