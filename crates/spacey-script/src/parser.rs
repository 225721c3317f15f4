//! Recursive descent parser.

use crate::Error;
use crate::ast::*;
use crate::lexer::{Scanner, Token, TokenKind};
use crate::value::format_number;

/// A recursive descent parser for scripts.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given source code.
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token();
        Self { scanner, current }
    }

    /// Parses the source code into a Program AST node.
    pub fn parse_program(&mut self) -> Result<Program, Error> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program { body })
    }

    /// Parses a single statement.
    pub fn parse_statement(&mut self) -> Result<Statement, Error> {
        match &self.current.kind {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                self.parse_variable_declaration()
            }
            TokenKind::Throw => {
                self.advance();
                if self.current.newline_before {
                    return Err(self.error_at_current("Illegal newline after throw"));
                }
                let argument = self.parse_expression()?;
                self.consume_statement_end()?;
                Ok(Statement::Throw(argument))
            }
            TokenKind::Semicolon => {
                self.advance();
                Ok(Statement::Empty)
            }
            _ => {
                let expression = self.parse_expression()?;
                self.consume_statement_end()?;
                Ok(Statement::Expression(expression))
            }
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, Error> {
        let kind = match self.current.kind {
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            _ => VariableKind::Var,
        };
        self.advance();

        let name = self.expect_identifier()?;

        let init = if self.match_token(&TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        if kind == VariableKind::Const && init.is_none() {
            return Err(self.error_at_current("Missing initializer in const declaration"));
        }

        self.consume_statement_end()?;
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            kind,
            name,
            init,
        }))
    }

    /// Parses an expression.
    pub fn parse_expression(&mut self) -> Result<Expression, Error> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, Error> {
        let start = self.current.span.start;
        let target = self.parse_equality()?;

        let operator = match self.current.kind {
            TokenKind::Assign => AssignmentOperator::Assign,
            TokenKind::PlusAssign => AssignmentOperator::AddAssign,
            _ => return Ok(target),
        };

        if !matches!(target, Expression::Identifier(_) | Expression::Member(_)) {
            return Err(Error::syntax("Invalid left-hand side in assignment", start));
        }

        self.advance();
        // Right associative: a = b = c
        let value = self.parse_assignment()?;

        Ok(Expression::Assignment(AssignmentExpression {
            operator,
            target: Box::new(target),
            value: Box::new(value),
        }))
    }

    fn parse_equality(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_additive()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Equal => BinaryOperator::Equal,
                TokenKind::NotEqual => BinaryOperator::NotEqual,
                TokenKind::StrictEqual => BinaryOperator::StrictEqual,
                TokenKind::StrictNotEqual => BinaryOperator::StrictNotEqual,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_additive()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, Error> {
        let mut left = self.parse_unary()?;

        loop {
            let operator = match self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                TokenKind::Percent => BinaryOperator::Modulo,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(operator, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expression, Error> {
        let operator = match self.current.kind {
            TokenKind::Minus => UnaryOperator::Minus,
            TokenKind::Bang => UnaryOperator::Not,
            TokenKind::Typeof => UnaryOperator::Typeof,
            _ => return self.parse_call_member(),
        };
        self.advance();
        let argument = self.parse_unary()?;
        Ok(Expression::Unary(operator, Box::new(argument)))
    }

    fn parse_call_member(&mut self) -> Result<Expression, Error> {
        let mut expression = self.parse_primary()?;

        loop {
            if self.match_token(&TokenKind::Dot) {
                let name = self.expect_property_name()?;
                expression = Expression::Member(MemberExpression {
                    object: Box::new(expression),
                    property: MemberProperty::Static(name),
                });
            } else if self.match_token(&TokenKind::LeftBracket) {
                let property = self.parse_expression()?;
                self.expect(&TokenKind::RightBracket)?;
                expression = Expression::Member(MemberExpression {
                    object: Box::new(expression),
                    property: MemberProperty::Computed(Box::new(property)),
                });
            } else if self.match_token(&TokenKind::LeftParen) {
                let arguments = self.parse_arguments()?;
                expression = Expression::Call(CallExpression {
                    callee: Box::new(expression),
                    arguments,
                });
            } else {
                return Ok(expression);
            }
        }
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expression>, Error> {
        let mut arguments = Vec::new();
        if self.match_token(&TokenKind::RightParen) {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);
            if self.match_token(&TokenKind::Comma) {
                // Trailing comma
                if self.match_token(&TokenKind::RightParen) {
                    return Ok(arguments);
                }
                continue;
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(arguments);
        }
    }

    fn parse_primary(&mut self) -> Result<Expression, Error> {
        let token = self.current.clone();
        let expression = match token.kind {
            TokenKind::Number(n) => Expression::Literal(Literal::Number(n)),
            TokenKind::String(s) => Expression::Literal(Literal::String(s)),
            TokenKind::True => Expression::Literal(Literal::Boolean(true)),
            TokenKind::False => Expression::Literal(Literal::Boolean(false)),
            TokenKind::Null => Expression::Literal(Literal::Null),
            TokenKind::Undefined => Expression::Literal(Literal::Undefined),
            TokenKind::Identifier(name) => Expression::Identifier(name),
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(inner);
            }
            TokenKind::LeftBrace => {
                self.advance();
                return self.parse_object_literal();
            }
            TokenKind::Invalid(message) => return Err(Error::syntax(message, token.span.start)),
            TokenKind::Eof => return Err(self.error_at_current("Unexpected end of input")),
            other => {
                return Err(self.error_at_current(format!("Unexpected token {:?}", other)));
            }
        };
        self.advance();
        Ok(expression)
    }

    fn parse_object_literal(&mut self) -> Result<Expression, Error> {
        let mut properties = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            let key = match &self.current.kind {
                TokenKind::String(s) => {
                    let key = s.clone();
                    self.advance();
                    key
                }
                TokenKind::Number(n) => {
                    let key = format_number(*n);
                    self.advance();
                    key
                }
                _ => self.expect_property_name()?,
            };
            self.expect(&TokenKind::Colon)?;
            properties.push((key, self.parse_expression()?));
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(Expression::Object(properties))
    }

    /// A statement ends at `;`, end of input, `}` or a line break.
    fn consume_statement_end(&mut self) -> Result<(), Error> {
        if self.match_token(&TokenKind::Semicolon)
            || self.is_at_end()
            || self.check(&TokenKind::RightBrace)
            || self.current.newline_before
        {
            return Ok(());
        }
        Err(self.error_at_current(format!("Unexpected token {:?}", self.current.kind)))
    }

    fn expect_identifier(&mut self) -> Result<String, Error> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.error_at_current(format!(
                "Expected identifier, found {:?}",
                self.current.kind
            )))
        }
    }

    /// Property names may be reserved words (`exports.default`, `a.null`).
    fn expect_property_name(&mut self) -> Result<String, Error> {
        let name = match &self.current.kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Var => "var".to_string(),
            TokenKind::Let => "let".to_string(),
            TokenKind::Const => "const".to_string(),
            TokenKind::Throw => "throw".to_string(),
            TokenKind::Typeof => "typeof".to_string(),
            TokenKind::True => "true".to_string(),
            TokenKind::False => "false".to_string(),
            TokenKind::Null => "null".to_string(),
            TokenKind::Undefined => "undefined".to_string(),
            other => {
                return Err(self.error_at_current(format!(
                    "Expected property name, found {:?}",
                    other
                )));
            }
        };
        self.advance();
        Ok(name)
    }

    fn advance(&mut self) {
        self.current = self.scanner.next_token();
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current.kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), Error> {
        if self.match_token(kind) {
            Ok(())
        } else {
            Err(self.error_at_current(format!(
                "Expected {:?}, found {:?}",
                kind, self.current.kind
            )))
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn error_at_current(&self, message: impl Into<String>) -> Error {
        if let TokenKind::Invalid(reason) = &self.current.kind {
            return Error::syntax(reason.clone(), self.current.span.start);
        }
        Error::syntax(message, self.current.span.start)
    }
}

fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryExpression {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        Parser::new(source).parse_program().unwrap()
    }

    #[test]
    fn test_parse_require_declaration() {
        let program = parse("var b = require('./b');");
        assert_eq!(program.body.len(), 1);
        let Statement::VariableDeclaration(decl) = &program.body[0] else {
            panic!("expected declaration");
        };
        assert_eq!(decl.kind, VariableKind::Var);
        assert_eq!(decl.name, "b");
        assert!(matches!(decl.init, Some(Expression::Call(_))));
    }

    #[test]
    fn test_parse_member_assignment() {
        let program = parse("exports.count = exports.count + 1");
        let Statement::Expression(Expression::Assignment(assign)) = &program.body[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assign.operator, AssignmentOperator::Assign);
        assert!(matches!(*assign.target, Expression::Member(_)));
        assert!(matches!(*assign.value, Expression::Binary(_)));
    }

    #[test]
    fn test_precedence() {
        let program = parse("1 + 2 * 3");
        let Statement::Expression(Expression::Binary(add)) = &program.body[0] else {
            panic!("expected binary");
        };
        assert_eq!(add.operator, BinaryOperator::Add);
        assert!(matches!(
            &*add.right,
            Expression::Binary(BinaryExpression {
                operator: BinaryOperator::Multiply,
                ..
            })
        ));
    }

    #[test]
    fn test_statements_split_by_newlines() {
        let program = parse("var a = 1\nvar b = { x: a, 'y': 2, }\nb.x");
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_reserved_words_as_property_names() {
        let program = parse("module.exports.default = null;");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            Parser::new("var = 1").parse_program(),
            Err(Error::SyntaxError { .. })
        ));
        assert!(matches!(
            Parser::new("1 = 2").parse_program(),
            Err(Error::SyntaxError { .. })
        ));
        assert!(matches!(
            Parser::new("a b").parse_program(),
            Err(Error::SyntaxError { .. })
        ));
        assert!(matches!(
            Parser::new("const x;").parse_program(),
            Err(Error::SyntaxError { .. })
        ));
        assert!(matches!(
            Parser::new("f(1, 2").parse_program(),
            Err(Error::SyntaxError { .. })
        ));
    }
}
