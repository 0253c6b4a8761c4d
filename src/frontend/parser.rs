use crate::frontend::{
    SourceFile, SyntaxError,
    ast::{BinaryOperatorKind, Expression},
    lexer::{Lexer, Span, Token, TokenKind},
};

#[derive(Debug)]
pub struct Parser<'source> {
    source: &'source SourceFile,
    tokens: Vec<Token>,
    position: usize,
}

impl<'source> Parser<'source> {
    /// Parses one complete expression. Every token must be consumed;
    /// trailing input is an error.
    pub fn parse_expression(source: &'source SourceFile) -> Result<Expression, SyntaxError> {
        let mut parser = Self {
            source,
            tokens: Lexer::tokenize(source)?,
            position: 0,
        };

        let expression = parser.parse_term_expression()?;

        if let Some(token) = parser.peek() {
            return Err(SyntaxError::new(
                token.span,
                format!(
                    "expected end of expression but found `{}`",
                    source.value_of_span(token.span)
                ),
            ));
        }

        Ok(expression)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn expect_next(&mut self, expecting: &str) -> Result<Token, SyntaxError> {
        self.next().ok_or_else(|| {
            SyntaxError::new(
                self.end_span(),
                format!("expected {expecting} but reached the end of the expression"),
            )
        })
    }

    fn expect_next_to_be(
        &mut self,
        kind: TokenKind,
        expecting: &str,
    ) -> Result<Token, SyntaxError> {
        let token = self.expect_next(expecting)?;

        if token.kind != kind {
            return Err(SyntaxError::new(
                token.span,
                format!(
                    "expected {expecting} but found `{}`",
                    self.source.value_of_span(token.span)
                ),
            ));
        }

        Ok(token)
    }

    fn end_span(&self) -> Span {
        let end = self.source.contents.len();
        Span::new(end, end)
    }

    /// expression -> term (("+" | "-") term)*
    fn parse_term_expression(&mut self) -> Result<Expression, SyntaxError> {
        let mut expression = self.parse_factor_expression()?;

        while self
            .peek()
            .is_some_and(|token| token.kind.is_term_operator())
        {
            let operator = self.parse_term_operator()?;
            let rhs = self.parse_factor_expression()?;

            expression = Expression::binary(operator, expression, rhs);
        }

        Ok(expression)
    }

    fn parse_term_operator(&mut self) -> Result<BinaryOperatorKind, SyntaxError> {
        let operator = self.expect_next("term operator")?;

        Ok(match operator.kind {
            TokenKind::Plus => BinaryOperatorKind::Add,
            TokenKind::Minus => BinaryOperatorKind::Subtract,
            _ => unreachable!(),
        })
    }

    /// term -> factor (("*" | "/") factor)*
    fn parse_factor_expression(&mut self) -> Result<Expression, SyntaxError> {
        let mut expression = self.parse_atom_expression()?;

        while self
            .peek()
            .is_some_and(|token| token.kind.is_factor_operator())
        {
            let operator = self.parse_factor_operator()?;
            let rhs = self.parse_atom_expression()?;

            expression = Expression::binary(operator, expression, rhs);
        }

        Ok(expression)
    }

    fn parse_factor_operator(&mut self) -> Result<BinaryOperatorKind, SyntaxError> {
        let operator = self.expect_next("factor operator")?;

        Ok(match operator.kind {
            TokenKind::Asterisk => BinaryOperatorKind::Multiply,
            TokenKind::Divide => BinaryOperatorKind::Divide,
            _ => unreachable!(),
        })
    }

    /// factor -> INTEGER | IDENTIFIER | "(" expression ")"
    fn parse_atom_expression(&mut self) -> Result<Expression, SyntaxError> {
        let token = self.expect_next("number, variable, or opening paren")?;

        match token.kind {
            TokenKind::IntegerLiteral => {
                Ok(Expression::number(self.source.value_of_span(token.span)))
            }
            TokenKind::Identifier => {
                Ok(Expression::variable(self.source.value_of_span(token.span)))
            }
            TokenKind::OpenParen => {
                let expression = self.parse_term_expression()?;
                self.expect_next_to_be(TokenKind::CloseParen, "closing paren")?;

                Ok(expression)
            }
            _ => Err(SyntaxError::new(
                token.span,
                format!(
                    "expected number, variable, or opening paren but found `{}`",
                    self.source.value_of_span(token.span)
                ),
            )),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
