//! Constrained arithmetic expression evaluator.
//!
//! Powers duration expressions such as `(sqrt(100)+1e1)^2`. The language is
//! deliberately tiny: decimal numbers, `+ - * / ^`, parentheses, `sqrt()`,
//! `x` as an alias for `*`, and `<digits>e<digits>` scientific notation.
//!
//! The evaluator is a hand-written tokenizer plus recursive-descent parser
//! over a small AST. Operator handling is pinned to the reduction order the
//! legacy string-rewriting interpreter used: parentheses first, then `^`
//! left-to-right pairwise, then `*`/`/` left-to-right, then `+`/`-`
//! left-to-right, with a leading `-` binding to its operand. `2-3+1` is `0`
//! and `2^3^2` is `64`, not `512`.
//!
//! Every intermediate value must be a finite f64; division by zero and
//! `sqrt` of a negative number are rejected rather than propagated.

use thiserror::Error;

/// Maximum syntactic nesting of `sqrt` calls.
///
/// Deeper nesting is treated as malicious input, not a feature.
pub const MAX_SQRT_DEPTH: usize = 3;

/// Upper bound on the token count of a single expression.
const MAX_TOKENS: usize = 999;

/// Errors from expression evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    /// Input contains a character outside the allowed set
    #[error("invalid character '{0}' in expression")]
    InvalidCharacter(char),

    /// Parentheses do not balance
    #[error("unbalanced parentheses")]
    UnbalancedParens,

    /// Input does not form a valid expression
    #[error("malformed expression: {0}")]
    Malformed(String),

    /// `sqrt` calls nested beyond [`MAX_SQRT_DEPTH`]
    #[error("sqrt calls nested too deeply")]
    SqrtTooDeep,

    /// An intermediate or final value was not a finite number
    #[error("expression does not evaluate to a finite number")]
    NonFinite,

    /// Token bound exceeded
    #[error("expression too complex")]
    TooComplex,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Sqrt,
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Debug)]
enum Node {
    Num(f64),
    Neg(Box<Node>),
    Bin(BinOp, Box<Node>, Box<Node>),
    Sqrt(Box<Node>),
}

/// Evaluate a constrained arithmetic expression.
///
/// Whitespace is stripped before anything else; all remaining characters must
/// come from `[0-9 + - * / ^ ( ) . e s q r t x]`.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let prepared = preprocess(input)?;
    let tokens = tokenize(&prepared)?;
    let ast = Parser::new(tokens).parse()?;
    eval(&ast)
}

/// Strip whitespace, enforce the character whitelist, rewrite `x` to `*` and
/// expand scientific notation.
fn preprocess(input: &str) -> Result<String, ExprError> {
    let stripped: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    for c in stripped.chars() {
        if !matches!(
            c,
            '0'..='9'
                | '+'
                | '-'
                | '*'
                | '/'
                | '^'
                | '('
                | ')'
                | '.'
                | 'e'
                | 's'
                | 'q'
                | 'r'
                | 't'
                | 'x'
        ) {
            return Err(ExprError::InvalidCharacter(c));
        }
    }
    expand_scientific(&stripped.replace('x', "*"))
}

/// Expand every `<digits>e<digits>` run into its decimal value.
///
/// This is a textual substitution, not full scientific notation: no signs and
/// no decimals in the exponent, and a fractional mantissa only contributes its
/// post-dot digit run (`1.5e3` becomes `1.5000`), matching the legacy
/// substitution the configs were written against.
fn expand_scientific(src: &str) -> Result<String, ExprError> {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'e' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit()
            {
                let exp_start = i + 1;
                let mut j = exp_start;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                let base: f64 = src[start..i]
                    .parse()
                    .map_err(|_| ExprError::Malformed(format!("bad number '{}'", &src[start..i])))?;
                let exp: f64 = src[exp_start..j]
                    .parse()
                    .map_err(|_| ExprError::NonFinite)?;
                let value = base * 10f64.powf(exp);
                if !value.is_finite() {
                    return Err(ExprError::NonFinite);
                }
                out.push_str(&value.to_string());
                i = j;
            } else {
                out.push_str(&src[start..i]);
            }
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    Ok(out)
}

fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if i < bytes.len() && bytes[i] == b'.' {
                    i += 1;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text = &src[start..i];
                let value: f64 = text
                    .parse()
                    .map_err(|_| ExprError::Malformed(format!("bad number '{text}'")))?;
                tokens.push(Token::Num(value));
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'e' | b's' | b'q' | b'r' | b't' => {
                let start = i;
                while i < bytes.len() && matches!(bytes[i], b'e' | b's' | b'q' | b'r' | b't') {
                    i += 1;
                }
                let word = &src[start..i];
                if word == "sqrt" {
                    tokens.push(Token::Sqrt);
                } else {
                    return Err(ExprError::Malformed(format!("unexpected '{word}'")));
                }
            }
            other => return Err(ExprError::InvalidCharacter(other as char)),
        }
        if tokens.len() > MAX_TOKENS {
            return Err(ExprError::TooComplex);
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    sqrt_depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            sqrt_depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn parse(mut self) -> Result<Node, ExprError> {
        if self.tokens.is_empty() {
            return Err(ExprError::Malformed("empty expression".into()));
        }
        let node = self.parse_sum()?;
        match self.peek() {
            None => Ok(node),
            Some(Token::RParen) => Err(ExprError::UnbalancedParens),
            Some(_) => Err(ExprError::Malformed("trailing input".into())),
        }
    }

    fn parse_sum(&mut self) -> Result<Node, ExprError> {
        let mut node = self.parse_product()?;
        while let Some(tok) = self.peek() {
            let op = match tok {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_product()?;
            node = Node::Bin(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_product(&mut self) -> Result<Node, ExprError> {
        let mut node = self.parse_power()?;
        while let Some(tok) = self.peek() {
            let op = match tok {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.bump();
            let rhs = self.parse_power()?;
            node = Node::Bin(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    // `^` reduces pairwise left-to-right, so it is left-associative here.
    fn parse_power(&mut self) -> Result<Node, ExprError> {
        let mut node = self.parse_unary()?;
        while let Some(Token::Caret) = self.peek() {
            self.bump();
            let rhs = self.parse_unary()?;
            node = Node::Bin(BinOp::Pow, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<Node, ExprError> {
        if let Some(Token::Minus) = self.peek() {
            self.bump();
            let inner = self.parse_unary()?;
            return Ok(Node::Neg(Box::new(inner)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Node, ExprError> {
        match self.bump() {
            Some(Token::Num(value)) => Ok(Node::Num(value)),
            Some(Token::LParen) => {
                let inner = self.parse_sum()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ExprError::UnbalancedParens),
                }
            }
            Some(Token::Sqrt) => {
                self.sqrt_depth += 1;
                if self.sqrt_depth > MAX_SQRT_DEPTH {
                    return Err(ExprError::SqrtTooDeep);
                }
                match self.bump() {
                    Some(Token::LParen) => {}
                    _ => return Err(ExprError::Malformed("sqrt requires parentheses".into())),
                }
                let inner = self.parse_sum()?;
                match self.bump() {
                    Some(Token::RParen) => {}
                    _ => return Err(ExprError::UnbalancedParens),
                }
                self.sqrt_depth -= 1;
                Ok(Node::Sqrt(Box::new(inner)))
            }
            Some(Token::RParen) => Err(ExprError::UnbalancedParens),
            Some(tok) => Err(ExprError::Malformed(format!("unexpected token {tok:?}"))),
            None => Err(ExprError::Malformed("unexpected end of expression".into())),
        }
    }
}

fn eval(node: &Node) -> Result<f64, ExprError> {
    let value = match node {
        Node::Num(value) => *value,
        Node::Neg(inner) => -eval(inner)?,
        Node::Sqrt(inner) => eval(inner)?.sqrt(),
        Node::Bin(op, lhs, rhs) => {
            let l = eval(lhs)?;
            let r = eval(rhs)?;
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                BinOp::Pow => l.powf(r),
            }
        }
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NonFinite)
    }
}
