//! Expression evaluation for generated problems and submitted answers.
//!
//! Grammar, whitespace ignored:
//!
//! ```text
//! expr    := term (('+'|'-') term)*
//! term    := unary (('*'|'/') unary)*
//! unary   := ('-'|'+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | '(' expr ')' | ident '(' expr ')'
//! ```
//!
//! `×` and `·` are accepted for `*`, `÷` for `/` and `−` for `-`. Literals
//! are exact; `sqrt` falls back to a decimal under the evaluator's context
//! when its argument is not a perfect square.

use crate::decimal::{Decimal, MathContext};
use crate::error::{ArithmeticError, EvalError};
use crate::fraction::BigFraction;
use crate::number::Number;

/// Largest exponent magnitude accepted by `^`.
pub const MAX_EXPONENT: i64 = 4096;

/// Largest numerator or denominator, in bits, that `^` may produce.
pub const MAX_POWER_BITS: u64 = 1 << 17;

/// Deepest nesting of parentheses, signs and exponents.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

impl Token {
    fn text(&self) -> String {
        match &self.kind {
            TokenKind::Number(s) | TokenKind::Ident(s) => s.clone(),
            TokenKind::Plus => "+".into(),
            TokenKind::Minus => "-".into(),
            TokenKind::Star => "*".into(),
            TokenKind::Slash => "/".into(),
            TokenKind::Caret => "^".into(),
            TokenKind::LParen => "(".into(),
            TokenKind::RParen => ")".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while let Some(c) = input[i..].chars().next() {
        let position = i;
        let single = |kind| Token { kind, position };
        match c {
            c if c.is_whitespace() => {
                i += c.len_utf8();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = i;
                while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
                    end += 1;
                }
                // Optional exponent, only when digits actually follow.
                if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
                    let mut cursor = end + 1;
                    if cursor < bytes.len() && matches!(bytes[cursor], b'+' | b'-') {
                        cursor += 1;
                    }
                    if cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
                        end = cursor;
                        while end < bytes.len() && bytes[end].is_ascii_digit() {
                            end += 1;
                        }
                    }
                }
                tokens.push(single(TokenKind::Number(input[i..end].to_string())));
                i = end;
                continue;
            }
            c if c.is_ascii_alphabetic() => {
                let mut end = i;
                while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
                    end += 1;
                }
                tokens.push(single(TokenKind::Ident(input[i..end].to_string())));
                i = end;
                continue;
            }
            '+' => tokens.push(single(TokenKind::Plus)),
            '-' | '−' => tokens.push(single(TokenKind::Minus)),
            '*' | '×' | '·' => tokens.push(single(TokenKind::Star)),
            '/' | '÷' => tokens.push(single(TokenKind::Slash)),
            '^' => tokens.push(single(TokenKind::Caret)),
            '(' => tokens.push(single(TokenKind::LParen)),
            ')' => tokens.push(single(TokenKind::RParen)),
            other => {
                return Err(EvalError::UnexpectedToken {
                    position,
                    found: other.to_string(),
                })
            }
        }
        i += c.len_utf8();
    }
    Ok(tokens)
}

fn arithmetic_at(position: usize) -> impl FnOnce(ArithmeticError) -> EvalError {
    move |source| match source {
        ArithmeticError::DivisionByZero => EvalError::DivisionByZero { position },
        source => EvalError::Arithmetic { position, source },
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    ctx: &'a MathContext,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn expr(&mut self) -> Result<Number, EvalError> {
        let mut value = self.term()?;
        while let Some(token) = self.peek() {
            let (kind, position) = (token.kind.clone(), token.position);
            if !matches!(kind, TokenKind::Plus | TokenKind::Minus) {
                break;
            }
            self.pos += 1;
            let rhs = self.term()?;
            value = match kind {
                TokenKind::Plus => value.add(&rhs, self.ctx),
                _ => value.sub(&rhs, self.ctx),
            }
            .map_err(arithmetic_at(position))?;
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Number, EvalError> {
        let mut value = self.unary()?;
        while let Some(token) = self.peek() {
            let (kind, position) = (token.kind.clone(), token.position);
            if !matches!(kind, TokenKind::Star | TokenKind::Slash) {
                break;
            }
            self.pos += 1;
            let rhs = self.unary()?;
            value = match kind {
                TokenKind::Star => value.mul(&rhs, self.ctx),
                _ => value.div(&rhs, self.ctx),
            }
            .map_err(arithmetic_at(position))?;
        }
        Ok(value)
    }

    /// Every recursive path through the grammar passes here, so the depth
    /// is counted once per level.
    fn unary(&mut self) -> Result<Number, EvalError> {
        if self.depth >= MAX_DEPTH {
            let position = self.peek().map_or(0, |t| t.position);
            return Err(EvalError::TooDeep {
                position,
                limit: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<Number, EvalError> {
        let kind = self.peek().map(|t| t.kind.clone());
        match kind {
            Some(TokenKind::Minus) => {
                self.pos += 1;
                Ok(self.unary()?.neg())
            }
            Some(TokenKind::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, EvalError> {
        let base = self.primary()?;
        let position = match self.peek() {
            Some(Token {
                kind: TokenKind::Caret,
                position,
            }) => *position,
            _ => return Ok(base),
        };
        self.pos += 1;
        let exponent = self.unary()?.to_fraction();
        if !exponent.is_integer() {
            return Err(EvalError::NonIntegerExponent { position });
        }
        let too_large = EvalError::ExponentTooLarge {
            position,
            limit: MAX_EXPONENT,
        };
        let exponent = exponent
            .to_i64()
            .filter(|e| e.abs() <= MAX_EXPONENT)
            .ok_or(too_large)?;
        let fraction = base.to_fraction();
        let bits = fraction.numerator().bits().max(fraction.denominator().bits());
        if bits.saturating_mul(exponent.unsigned_abs()) > MAX_POWER_BITS {
            return Err(EvalError::PowerTooLarge {
                position,
                limit: MAX_POWER_BITS,
            });
        }
        base.pow(exponent as i32, self.ctx)
            .map_err(arithmetic_at(position))
    }

    fn primary(&mut self) -> Result<Number, EvalError> {
        let token = self.next().cloned().ok_or(EvalError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Number(text) => text
                .parse::<Decimal>()
                .map(|d| Number::Exact(d.to_fraction()))
                .map_err(|_| EvalError::InvalidNumber {
                    position: token.position,
                    text,
                }),
            TokenKind::LParen => {
                let value = self.expr()?;
                self.close(token.position)?;
                Ok(value)
            }
            TokenKind::Ident(name) => {
                if !name.eq_ignore_ascii_case("sqrt") {
                    return Err(EvalError::UnknownFunction {
                        position: token.position,
                        name,
                    });
                }
                match self.next().cloned() {
                    Some(Token {
                        kind: TokenKind::LParen,
                        position,
                    }) => {
                        let argument = self.expr()?;
                        self.close(position)?;
                        argument
                            .sqrt(self.ctx)
                            .map_err(arithmetic_at(token.position))
                    }
                    Some(other) => Err(EvalError::UnexpectedToken {
                        position: other.position,
                        found: other.text(),
                    }),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            TokenKind::RParen => Err(EvalError::UnbalancedParenthesis {
                position: token.position,
            }),
            _ => Err(EvalError::UnexpectedToken {
                position: token.position,
                found: token.text(),
            }),
        }
    }

    /// Consume the `)` matching the `(` at `open`.
    fn close(&mut self, open: usize) -> Result<(), EvalError> {
        match self.next().cloned() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => Ok(()),
            Some(other) => Err(EvalError::UnexpectedToken {
                position: other.position,
                found: other.text(),
            }),
            None => Err(EvalError::UnbalancedParenthesis { position: open }),
        }
    }
}

/// Evaluates expressions under a fixed [`MathContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    context: MathContext,
}

impl Evaluator {
    pub fn new(context: MathContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &MathContext {
        &self.context
    }

    pub fn evaluate(&self, expression: &str) -> Result<Number, EvalError> {
        let tokens = tokenize(expression)?;
        if tokens.is_empty() {
            return Err(EvalError::Empty);
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
            ctx: &self.context,
        };
        let value = parser.expr()?;
        match parser.peek() {
            None => Ok(value),
            Some(Token {
                kind: TokenKind::RParen,
                position,
            }) => Err(EvalError::UnbalancedParenthesis {
                position: *position,
            }),
            Some(token) => Err(EvalError::UnexpectedToken {
                position: token.position,
                found: token.text(),
            }),
        }
    }

    /// Evaluate and require an exact rational result.
    pub fn evaluate_exact(&self, expression: &str) -> Result<BigFraction, EvalError> {
        match self.evaluate(expression)? {
            Number::Exact(value) => Ok(value),
            Number::Approx(value) => Err(EvalError::Arithmetic {
                position: 0,
                source: ArithmeticError::NotExact(value.to_string()),
            }),
        }
    }
}

/// Evaluate with the default context.
pub fn evaluate(expression: &str) -> Result<Number, EvalError> {
    Evaluator::default().evaluate(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(expr: &str) -> BigFraction {
        Evaluator::default().evaluate_exact(expr).unwrap()
    }

    fn frac(n: i64, d: i64) -> BigFraction {
        BigFraction::of(n, d).unwrap()
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(exact("2+3*4"), frac(14, 1));
        assert_eq!(exact("(2+3)*4"), frac(20, 1));
        assert_eq!(exact("2^3^2"), frac(512, 1));
        assert_eq!(exact("-2^2"), frac(-4, 1));
        assert_eq!(exact("10-4-3"), frac(3, 1));
        assert_eq!(exact("12/4/3"), frac(1, 1));
        assert_eq!(exact("2^-2"), frac(1, 4));
        assert_eq!(exact("--3"), frac(3, 1));
    }

    #[test]
    fn literals_and_aliases() {
        assert_eq!(exact("  1.5 × 4 "), frac(6, 1));
        assert_eq!(exact("3/4 ÷ 5/6"), frac(1, 40));
        assert_eq!(exact("(3/4) ÷ (5/6)"), frac(9, 10));
        assert_eq!(exact("2·3 − 1"), frac(5, 1));
        assert_eq!(exact("1e3"), frac(1000, 1));
        assert_eq!(exact("2.5e-1"), frac(1, 4));
    }

    #[test]
    fn sqrt_exact_and_approximate() {
        assert_eq!(exact("sqrt(49/4)"), frac(7, 2));
        let approx = Evaluator::new(MathContext::new(8, Default::default()))
            .evaluate("sqrt(2)")
            .unwrap();
        assert!(!approx.is_exact());
        assert_eq!(approx.to_string(), "1.4142136");
    }

    #[test]
    fn division_by_zero_reports_position() {
        assert_eq!(
            evaluate("1/0"),
            Err(EvalError::DivisionByZero { position: 1 })
        );
        assert_eq!(
            evaluate("0^-1"),
            Err(EvalError::DivisionByZero { position: 1 })
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(evaluate(""), Err(EvalError::Empty));
        assert_eq!(evaluate("   "), Err(EvalError::Empty));
        assert_eq!(evaluate("1+"), Err(EvalError::UnexpectedEnd));
        assert_eq!(
            evaluate("(1+2"),
            Err(EvalError::UnbalancedParenthesis { position: 0 })
        );
        assert_eq!(
            evaluate("1+2)"),
            Err(EvalError::UnbalancedParenthesis { position: 3 })
        );
        assert!(matches!(evaluate("1.2.3"), Err(EvalError::InvalidNumber { .. })));
        assert!(matches!(evaluate("foo(2)"), Err(EvalError::UnknownFunction { .. })));
        assert!(matches!(evaluate("2 $ 3"), Err(EvalError::UnexpectedToken { position: 2, .. })));
        assert!(matches!(evaluate("2 3"), Err(EvalError::UnexpectedToken { .. })));
        assert!(matches!(evaluate("sqrt 4"), Err(EvalError::UnexpectedToken { .. })));
    }

    #[test]
    fn exponent_limits() {
        assert_eq!(
            evaluate("2^0.5"),
            Err(EvalError::NonIntegerExponent { position: 1 })
        );
        assert_eq!(
            evaluate("2^5000"),
            Err(EvalError::ExponentTooLarge {
                position: 1,
                limit: MAX_EXPONENT
            })
        );
        assert!(evaluate("2^4096").is_ok());
    }

    #[test]
    fn power_results_are_bounded() {
        assert!(evaluate("1000^4096").is_ok());
        assert!(evaluate("(1/3)^-4096").is_ok());
        assert_eq!(
            evaluate("(2^4096)^4096"),
            Err(EvalError::PowerTooLarge {
                position: 8,
                limit: MAX_POWER_BITS
            })
        );
        assert!(matches!(
            evaluate("((9^4096)^4096)^4096"),
            Err(EvalError::PowerTooLarge { .. })
        ));
        assert!(matches!(
            evaluate("(3^4000)^40"),
            Err(EvalError::PowerTooLarge { .. })
        ));
        assert_eq!(exact("(1^4096)^4096"), frac(1, 1));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let shallow = format!("{}1{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(exact(&shallow), frac(1, 1));

        let nested = format!("{}1{}", "(".repeat(200_000), ")".repeat(200_000));
        assert_eq!(
            evaluate(&nested),
            Err(EvalError::TooDeep {
                position: MAX_DEPTH,
                limit: MAX_DEPTH
            })
        );

        let signs = format!("{}1", "-".repeat(200_000));
        assert!(matches!(evaluate(&signs), Err(EvalError::TooDeep { .. })));

        let tower = vec!["1"; 100_000].join("^");
        assert!(matches!(evaluate(&tower), Err(EvalError::TooDeep { .. })));
    }

    #[test]
    fn negative_sqrt_is_domain_error() {
        assert!(matches!(
            evaluate("sqrt(-4)"),
            Err(EvalError::Arithmetic {
                source: ArithmeticError::Domain(_),
                ..
            })
        ));
    }
}
