use crate::ast::{
    ArrayAssignmentStatement, ArrayLiteral, AssignmentStatement, BlockStatement, CallExpression,
    Expression, FunctionDeclareStatement, IfStatement, IndexExpression, InfixExpression, Operator,
    PrintStatement, Program, ReturnStatement, Statement, VarDeclareStatement, WhileStatement,
    ExpressionStatement,
};
use crate::token::{Token, TokenKind, TokenType};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub SyntaxError

    Expected{wanted: &'static str, got: String, line: usize, column: usize} = "{line}:{column} - expected {wanted}, found {got}",
    UnexpectedToken{got: String, line: usize, column: usize} = "{line}:{column} - unexpected token {got}",
}

type ParseResult<T> = Result<T, SyntaxError>;

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the whole token stream; the first unexpected token aborts.
    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut program = Program::default();

        while !self.at_end() {
            program.statements.push(self.parse_statement()?);
        }

        Ok(program)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position + 1)
    }

    fn at_end(&self) -> bool {
        self.current().map_or(true, |token| token.is(TokenType::Eof))
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.position += 1;
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current().map_or(false, |token| token.is(token_type))
    }

    fn consume(&mut self, token_type: TokenType, wanted: &'static str) -> ParseResult<()> {
        if self.check(token_type) {
            self.advance();
            Ok(())
        } else {
            Err(self.error_expected(wanted))
        }
    }

    fn consume_identifier(&mut self, wanted: &'static str) -> ParseResult<String> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error_expected(wanted)),
        }
    }

    fn error_expected(&self, wanted: &'static str) -> SyntaxError {
        let (got, line, column) = self.describe_current();
        SyntaxError::Expected {
            wanted,
            got,
            line,
            column,
        }
    }

    fn error_unexpected(&self) -> SyntaxError {
        let (got, line, column) = self.describe_current();
        SyntaxError::UnexpectedToken { got, line, column }
    }

    fn describe_current(&self) -> (String, usize, usize) {
        match self.current().or_else(|| self.tokens.last()) {
            Some(token) => (
                TokenType::from(&token.kind).to_string(),
                token.line,
                token.column,
            ),
            None => ("Eof".to_owned(), 0, 0),
        }
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().map(|token| TokenType::from(&token.kind)) {
            Some(TokenType::VarDeclare) => self.parse_variable_declaration(),
            Some(TokenType::Ident) => match self.peek().map(|token| TokenType::from(&token.kind)) {
                Some(TokenType::Assign) => self.parse_assignment(),
                Some(TokenType::LBracket) => self.parse_array_statement(),
                _ => self.parse_expression_statement(),
            },
            Some(TokenType::FunctionDeclare) => self.parse_function_declaration(),
            Some(TokenType::If) => self.parse_if_statement(),
            Some(TokenType::While) => self.parse_while_statement(),
            Some(TokenType::Print) => self.parse_print_statement(),
            Some(TokenType::Return) => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<Statement> {
        self.advance(); // にゃー
        let name = self.consume_identifier("a variable name")?;
        self.consume(TokenType::Assign, "'みゃーみゃー'")?;
        let value = self.parse_expression()?;
        Ok(Statement::VarDeclare(VarDeclareStatement { name, value }))
    }

    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let name = self.consume_identifier("a variable name")?;
        self.consume(TokenType::Assign, "'みゃーみゃー'")?;
        let value = self.parse_expression()?;
        Ok(Statement::Assignment(AssignmentStatement { name, value }))
    }

    // `name[index]` at statement level is an element assignment when
    // followed by the assign keyword, otherwise a bare access whose value
    // is discarded.
    fn parse_array_statement(&mut self) -> ParseResult<Statement> {
        let name = self.consume_identifier("a variable name")?;
        self.consume(TokenType::LBracket, "'['")?;
        let index = self.parse_expression()?;
        self.consume(TokenType::RBracket, "']'")?;

        if self.check(TokenType::Assign) {
            self.advance();
            let value = self.parse_expression()?;
            Ok(Statement::ArrayAssignment(ArrayAssignmentStatement {
                name,
                index,
                value,
            }))
        } else {
            Ok(Statement::Expr(ExpressionStatement {
                expression: Expression::Index(IndexExpression {
                    name,
                    index: Box::new(index),
                }),
            }))
        }
    }

    fn parse_function_declaration(&mut self) -> ParseResult<Statement> {
        self.advance(); // にゃにゃ
        let name = self.consume_identifier("a function name")?;
        self.consume(TokenType::LParen, "'('")?;

        let mut parameters = vec![];
        if !self.check(TokenType::RParen) {
            loop {
                parameters.push(self.consume_identifier("a parameter name")?);
                if !self.check(TokenType::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenType::RParen, "')'")?;

        let body = self.parse_block()?;
        Ok(Statement::FunctionDeclare(FunctionDeclareStatement {
            name,
            parameters,
            body,
        }))
    }

    fn parse_if_statement(&mut self) -> ParseResult<Statement> {
        self.advance(); // シャー
        let condition = self.parse_expression()?;
        let consequence = self.parse_block()?;
        Ok(Statement::If(IfStatement {
            condition,
            consequence,
        }))
    }

    fn parse_while_statement(&mut self) -> ParseResult<Statement> {
        self.advance(); // もしゃもしゃ
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(Statement::While(WhileStatement { condition, body }))
    }

    fn parse_print_statement(&mut self) -> ParseResult<Statement> {
        self.advance(); // ゴロゴロ
        let value = self.parse_expression()?;
        Ok(Statement::Print(PrintStatement { value }))
    }

    fn parse_return_statement(&mut self) -> ParseResult<Statement> {
        self.advance(); // かえるにゃー
        let return_value = if self.check(TokenType::BlockEnd) || self.at_end() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        Ok(Statement::Return(ReturnStatement { return_value }))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<Statement> {
        let expression = self.parse_expression()?;
        Ok(Statement::Expr(ExpressionStatement { expression }))
    }

    fn parse_block(&mut self) -> ParseResult<BlockStatement> {
        self.consume(TokenType::BlockStart, "'ふみふみ'")?;

        let mut statements = vec![];
        while !self.check(TokenType::BlockEnd) && !self.at_end() {
            statements.push(self.parse_statement()?);
        }

        self.consume(TokenType::BlockEnd, "'おわり'")?;
        Ok(BlockStatement { statements })
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_addition()?;

        while let Some(operator) = self.current_operator(&[
            TokenType::Eq,
            TokenType::NotEq,
            TokenType::GT,
            TokenType::LT,
            TokenType::GTEq,
            TokenType::LTEq,
        ]) {
            self.advance();
            let right = self.parse_addition()?;
            expr = Expression::Infix(InfixExpression {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn parse_addition(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_multiplication()?;

        while let Some(operator) = self.current_operator(&[TokenType::Plus, TokenType::Minus]) {
            self.advance();
            let right = self.parse_multiplication()?;
            expr = Expression::Infix(InfixExpression {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn parse_multiplication(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;

        while let Some(operator) = self.current_operator(&[
            TokenType::Asterisk,
            TokenType::Slash,
            TokenType::Percent,
        ]) {
            self.advance();
            let right = self.parse_primary()?;
            expr = Expression::Infix(InfixExpression {
                left: Box::new(expr),
                operator,
                right: Box::new(right),
            });
        }

        Ok(expr)
    }

    fn current_operator(&self, token_types: &[TokenType]) -> Option<Operator> {
        let token = self.current()?;
        if token_types.iter().any(|tt| token.is(*tt)) {
            Some(Operator::from(&token.kind))
        } else {
            None
        }
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let kind = match self.current() {
            Some(token) => token.kind.clone(),
            None => return Err(self.error_unexpected()),
        };

        match kind {
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expression::IntegerLiteral(value))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Expression::FloatLiteral(value))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expression::StringLiteral(value))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::Boolean(true))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Boolean(false))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check(TokenType::LParen) {
                    self.parse_function_call(name)
                } else if self.check(TokenType::LBracket) {
                    self.parse_array_access(name)
                } else {
                    Ok(Expression::Identifier(name))
                }
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.consume(TokenType::RParen, "')'")?;
                Ok(expr)
            }
            _ => Err(self.error_unexpected()),
        }
    }

    fn parse_function_call(&mut self, name: String) -> ParseResult<Expression> {
        self.consume(TokenType::LParen, "'('")?;

        let mut arguments = vec![];
        if !self.check(TokenType::RParen) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.check(TokenType::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenType::RParen, "')'")?;

        Ok(Expression::Call(CallExpression { name, arguments }))
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        self.consume(TokenType::LBracket, "'['")?;

        let mut elements = vec![];
        if !self.check(TokenType::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.check(TokenType::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.consume(TokenType::RBracket, "']'")?;

        Ok(Expression::Array(ArrayLiteral { elements }))
    }

    fn parse_array_access(&mut self, name: String) -> ParseResult<Expression> {
        self.consume(TokenType::LBracket, "'['")?;
        let index = self.parse_expression()?;
        self.consume(TokenType::RBracket, "']'")?;

        Ok(Expression::Index(IndexExpression {
            name,
            index: Box::new(index),
        }))
    }
}
