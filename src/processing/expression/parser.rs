//! Recursive-descent parser for overlay equations.
//!
//! Grammar:
//!   expr    = term (('+' | '-') term)*
//!   term    = unary (('*' | '/') unary)*
//!   unary   = ('-' | '+') unary | power
//!   power   = primary ('^' unary)?        right-associative
//!   primary = NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
//!
//! Constants are folded to numbers while parsing, so the tree only ever
//! holds numbers, variables, operators and allow-listed function calls.

use crate::error::ExpressionError;
use crate::processing::expression::ast::{constant, BinaryOp, Expr, Function, UnaryOp};
use crate::processing::expression::token::{tokenize, Spanned, Token};

pub fn parse(source: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expr = parser.parse_expr()?;
    if parser.peek() != &Token::Eof {
        return Err(parser.unexpected());
    }
    Ok(expr)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Spanned>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn parse_expr(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ExpressionError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExpressionError> {
        let op = match self.peek() {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr, ExpressionError> {
        let base = self.parse_primary()?;
        if self.peek() == &Token::Caret {
            self.advance();
            // `2^-1` and `2^3^2` (= 2^9) both go through unary.
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ExpressionError> {
        match self.peek().clone() {
            Token::Number(v) => {
                self.advance();
                Ok(Expr::Number(v))
            }
            Token::Ident(name) => {
                let name_pos = self.current_pos();
                self.advance();
                if self.peek() == &Token::LParen {
                    self.advance();
                    return self.parse_call(&name);
                }
                if Function::from_name(&name).is_some() {
                    return Err(self.syntax(
                        name_pos,
                        format!("function {} must be called with parentheses", name),
                    ));
                }
                Ok(match constant(&name) {
                    Some(v) => Expr::Number(v),
                    None => Expr::Variable(name),
                })
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_call(&mut self, name: &str) -> Result<Expr, ExpressionError> {
        let mut args = Vec::new();
        if self.peek() != &Token::RParen {
            args.push(self.parse_expr()?);
            while self.peek() == &Token::Comma {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        self.expect_rparen()?;

        let Some(function) = Function::from_name(name) else {
            return Err(ExpressionError::UnknownFunction {
                expr: self.source.to_string(),
                name: name.to_string(),
            });
        };
        if args.len() != 1 {
            return Err(ExpressionError::Arity {
                expr: self.source.to_string(),
                name: function.name().to_string(),
                found: args.len(),
            });
        }
        let arg = args.remove(0);
        Ok(Expr::Call {
            function,
            arg: Box::new(arg),
        })
    }

    fn expect_rparen(&mut self) -> Result<(), ExpressionError> {
        if self.peek() == &Token::RParen {
            self.advance();
            Ok(())
        } else if self.peek() == &Token::Eof {
            Err(self.syntax(self.current_pos(), "missing ')'".to_string()))
        } else {
            Err(self.unexpected())
        }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map(|s| &s.token)
            .unwrap_or(&Token::Eof)
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|s| s.pos)
            .unwrap_or_else(|| self.source.chars().count())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self) -> ExpressionError {
        self.syntax(self.current_pos(), format!("unexpected {}", self.peek().describe()))
    }

    fn syntax(&self, position: usize, message: String) -> ExpressionError {
        ExpressionError::Syntax {
            expr: self.source.to_string(),
            position,
            message,
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}
