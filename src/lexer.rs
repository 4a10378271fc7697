use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use lazy_static::lazy_static;
use std::collections::HashMap;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexError

    UnexpectedCharacter{line: usize, column: usize, ch: char} = "{line}:{column} - unexpected character '{ch}'",
    UnknownOperator{line: usize, column: usize, text: String} = "{line}:{column} - unknown operator '{text}'",
    UnterminatedString{line: usize, column: usize} = "{line}:{column} - unterminated string literal",
    InvalidNumber{line: usize, column: usize, text: String} = "{line}:{column} - invalid number literal '{text}'",
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenKind> = vec![
        ("にゃー", TokenKind::VarDeclare),
        ("みゃーみゃー", TokenKind::Assign),
        ("にゃにゃ", TokenKind::FunctionDeclare),
        ("かえるにゃー", TokenKind::Return),
        ("シャー", TokenKind::If),
        ("もしゃもしゃ", TokenKind::While),
        ("ふみふみ", TokenKind::BlockStart),
        ("おわり", TokenKind::BlockEnd),
        ("ゴロゴロ", TokenKind::Print),
        ("にゃーん", TokenKind::True),
        ("ぶーにゃー", TokenKind::False),
    ]
    .into_iter()
    .collect();
}

// Identifiers may use the scripts the keywords are written in: ASCII
// letters, hiragana, katakana, the long-vowel mark and CJK ideographs.
fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic()
        || c == '_'
        || ('あ'..='ん').contains(&c)
        || ('ア'..='ン').contains(&c)
        || c == 'ー'
        || ('一'..='龯').contains(&c)
}

fn is_identifier_char(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

fn single_char_operator(c: char) -> Option<TokenKind> {
    match c {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Asterisk),
        '/' => Some(TokenKind::Slash),
        '%' => Some(TokenKind::Percent),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        ',' => Some(TokenKind::Comma),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        _ => None,
    }
}

pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = vec![];

        while let Some(c) = self.current_char() {
            if c.is_whitespace() {
                self.skip_whitespace();
            } else if c == '#' {
                self.skip_comment();
            } else if is_identifier_start(c) {
                tokens.push(self.read_identifier_or_keyword());
            } else if c.is_ascii_digit() {
                tokens.push(self.read_number()?);
            } else if c == '"' {
                tokens.push(self.read_string()?);
            } else if let Some(kind) = single_char_operator(c) {
                tokens.push(Token::new(kind, self.line, self.column));
                self.advance();
            } else if matches!(c, '=' | '!' | '>' | '<') {
                tokens.push(self.read_comparison_operator()?);
            } else {
                return Err(LexError::UnexpectedCharacter {
                    line: self.line,
                    column: self.column,
                    ch: c,
                });
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.line, self.column));
        Ok(tokens)
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().map_or(false, char::is_whitespace) {
            self.advance();
        }
    }

    fn skip_comment(&mut self) {
        while self.current_char().map_or(false, |c| c != '\n') {
            self.advance();
        }
    }

    fn read_identifier_or_keyword(&mut self) -> Token {
        let start_column = self.column;
        let mut text = String::new();

        while let Some(c) = self.current_char() {
            if !is_identifier_char(c) {
                break;
            }
            text.push(c);
            self.advance();
        }

        let kind = match KEYWORDS.get(text.as_str()) {
            Some(keyword) => keyword.clone(),
            None => TokenKind::Ident(text),
        };
        Token::new(kind, self.line, start_column)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start_column = self.column;
        let mut text = String::new();
        let mut has_dot = false;

        while let Some(c) = self.current_char() {
            if c == '.' {
                // a second dot ends the literal and is left unconsumed
                if has_dot {
                    break;
                }
                has_dot = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            text.push(c);
            self.advance();
        }

        let kind = if has_dot {
            TokenKind::Float(text.parse().map_err(|_| LexError::InvalidNumber {
                line: self.line,
                column: start_column,
                text: text.clone(),
            })?)
        } else {
            TokenKind::Int(text.parse().map_err(|_| LexError::InvalidNumber {
                line: self.line,
                column: start_column,
                text: text.clone(),
            })?)
        };
        Ok(Token::new(kind, self.line, start_column))
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let start_column = self.column;
        self.advance(); // opening quote
        let mut text = String::new();

        loop {
            match self.current_char() {
                None => {
                    return Err(LexError::UnterminatedString {
                        line: self.line,
                        column: self.column,
                    })
                }
                Some('"') => break,
                Some('\\') => {
                    self.advance();
                    match self.current_char() {
                        None => {
                            return Err(LexError::UnterminatedString {
                                line: self.line,
                                column: self.column,
                            })
                        }
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some('\\') => text.push('\\'),
                        Some('"') => text.push('"'),
                        Some('0') if self.peek_char(1) == Some('3') && self.peek_char(2) == Some('3') => {
                            // \033 is the ASCII escape control character
                            self.advance();
                            self.advance();
                            text.push('\x1b');
                        }
                        Some(other) => text.push(other),
                    }
                    self.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        self.advance(); // closing quote
        Ok(Token::new(TokenKind::Str(text), self.line, start_column))
    }

    fn read_comparison_operator(&mut self) -> Result<Token, LexError> {
        let start_column = self.column;
        let mut text = String::new();
        let first = match self.current_char() {
            Some(c) => c,
            None => {
                return Err(LexError::UnknownOperator {
                    line: self.line,
                    column: start_column,
                    text,
                })
            }
        };
        text.push(first);
        self.advance();

        if self.current_char() == Some('=') {
            text.push('=');
            self.advance();
        }

        let kind = match text.as_str() {
            "==" => TokenKind::Eq,
            "!=" => TokenKind::NotEq,
            ">=" => TokenKind::GTEq,
            "<=" => TokenKind::LTEq,
            ">" => TokenKind::GT,
            "<" => TokenKind::LT,
            _ => {
                return Err(LexError::UnknownOperator {
                    line: self.line,
                    column: start_column,
                    text,
                })
            }
        };
        Ok(Token::new(kind, self.line, start_column))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("lex errors found")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let input = "にゃー x みゃーみゃー 5
にゃにゃ たす(a, b) ふみふみ
  かえるにゃー a + b
おわり
シャー にゃーん ふみふみ ゴロゴロ \"yes\" おわり
もしゃもしゃ ぶーにゃー ふみふみ おわり
";

        let expected = vec![
            TokenKind::VarDeclare,
            TokenKind::Ident("x".to_owned()),
            TokenKind::Assign,
            TokenKind::Int(5),
            TokenKind::FunctionDeclare,
            TokenKind::Ident("たす".to_owned()),
            TokenKind::LParen,
            TokenKind::Ident("a".to_owned()),
            TokenKind::Comma,
            TokenKind::Ident("b".to_owned()),
            TokenKind::RParen,
            TokenKind::BlockStart,
            TokenKind::Return,
            TokenKind::Ident("a".to_owned()),
            TokenKind::Plus,
            TokenKind::Ident("b".to_owned()),
            TokenKind::BlockEnd,
            TokenKind::If,
            TokenKind::True,
            TokenKind::BlockStart,
            TokenKind::Print,
            TokenKind::Str("yes".to_owned()),
            TokenKind::BlockEnd,
            TokenKind::While,
            TokenKind::False,
            TokenKind::BlockStart,
            TokenKind::BlockEnd,
            TokenKind::Eof,
        ];

        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn test_operators() {
        let cases = vec![
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Asterisk),
            ("/", TokenKind::Slash),
            ("%", TokenKind::Percent),
            ("==", TokenKind::Eq),
            ("!=", TokenKind::NotEq),
            (">", TokenKind::GT),
            ("<", TokenKind::LT),
            (">=", TokenKind::GTEq),
            ("<=", TokenKind::LTEq),
            ("(", TokenKind::LParen),
            (")", TokenKind::RParen),
            (",", TokenKind::Comma),
            ("[", TokenKind::LBracket),
            ("]", TokenKind::RBracket),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(kinds(input), vec![expected, TokenKind::Eof]);
        }
    }

    #[test]
    fn test_numbers() {
        let cases = vec![
            ("0", vec![TokenKind::Int(0), TokenKind::Eof]),
            ("42", vec![TokenKind::Int(42), TokenKind::Eof]),
            ("3.25", vec![TokenKind::Float(3.25), TokenKind::Eof]),
            ("5.", vec![TokenKind::Float(5.0), TokenKind::Eof]),
            (
                "1 2.5",
                vec![TokenKind::Int(1), TokenKind::Float(2.5), TokenKind::Eof],
            ),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(kinds(input), expected);
        }
    }

    #[test]
    fn test_second_dot_ends_number() {
        // "1.2.3" lexes "1.2" and then stops at the stray dot
        let result = Lexer::new("1.2.3").tokenize();
        assert_eq!(
            result,
            Err(LexError::UnexpectedCharacter {
                line: 1,
                column: 4,
                ch: '.'
            })
        );
    }

    #[test]
    fn test_string_escapes() {
        let cases = vec![
            (r#""plain""#, "plain"),
            (r#""a\nb""#, "a\nb"),
            (r#""a\tb""#, "a\tb"),
            (r#""a\\b""#, "a\\b"),
            (r#""a\"b""#, "a\"b"),
            (r#""\033[2J""#, "\x1b[2J"),
            (r#""\0x""#, "0x"),
            (r#""\q""#, "q"),
            (r#""ねこ""#, "ねこ"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(
                kinds(input),
                vec![TokenKind::Str(expected.to_owned()), TokenKind::Eof]
            );
        }
    }

    #[test]
    fn test_unterminated_string() {
        let result = Lexer::new("\"never closed").tokenize();
        assert!(matches!(result, Err(LexError::UnterminatedString { .. })));
    }

    #[test]
    fn test_comments_are_skipped() {
        let input = "# first line\n5 # trailing\n# last";
        assert_eq!(kinds(input), vec![TokenKind::Int(5), TokenKind::Eof]);
    }

    #[test]
    fn test_bare_assign_and_bang_are_errors() {
        for input in ["=", "!", "5 = 3", "!x"].iter() {
            let result = Lexer::new(input).tokenize();
            assert!(
                matches!(result, Err(LexError::UnknownOperator { .. })),
                "expected lex error for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_unexpected_character() {
        let result = Lexer::new("5 @").tokenize();
        assert_eq!(
            result,
            Err(LexError::UnexpectedCharacter {
                line: 1,
                column: 3,
                ch: '@'
            })
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("にゃー x\nゴロゴロ 5").tokenize().expect("lex errors found");

        let positions: Vec<(usize, usize)> = tokens
            .iter()
            .map(|token| (token.line, token.column))
            .collect();

        // columns count characters, not bytes
        assert_eq!(positions, vec![(1, 1), (1, 5), (2, 1), (2, 6), (2, 7)]);
    }
}
