use crate::dim::error::{DimError, DimResult};
use crate::dim::quantity::Quantity;
use crate::dim::types::{checked_exponent, Unit, UnitParseResult};
use crate::dim::units::lookup_atom;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    /// Superscript exponent such as `²` or `⁻¹`
    Superscript(i32),
    Arrow,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

const CONVERSION_KEYWORDS: [&str; 3] = ["as", "to", "in"];

fn superscript_digit(c: char) -> Option<i32> {
    match c {
        '⁰' => Some(0),
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        _ => None,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == '_'
}

fn lex_number(chars: &[char], start: usize) -> DimResult<(f64, usize)> {
    let mut i = start;
    let mut text = String::new();

    while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
        if chars[i] != '_' {
            text.push(chars[i]);
        }
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        text.push('.');
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            text.push(chars[i]);
            i += 1;
        }
    }
    // Exponent only when digits follow, so "2 eV" and "2eV" stay a number and a unit
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            text.extend(&chars[i..j]);
            i = j;
            while i < chars.len() && chars[i].is_ascii_digit() {
                text.push(chars[i]);
                i += 1;
            }
        }
    }

    let value = text
        .parse::<f64>()
        .map_err(|_| DimError::parse(start, format!("invalid number '{}'", text)))?;
    Ok((value, i))
}

fn tokenize(input: &str) -> DimResult<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pos = i;

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let (value, next) = lex_number(&chars, i)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                pos,
            });
            i = next;
            continue;
        }

        if c == '⁻' || superscript_digit(c).is_some() {
            let negative = c == '⁻';
            let mut j = if negative { i + 1 } else { i };
            let mut value: i32 = 0;
            let digits_start = j;
            while j < chars.len() {
                match superscript_digit(chars[j]) {
                    Some(d) => {
                        value = value
                            .checked_mul(10)
                            .and_then(|v| v.checked_add(d))
                            .ok_or_else(|| {
                                let text: String = chars[pos..=j].iter().collect();
                                DimError::InvalidExponent(text)
                            })?;
                    }
                    None => break,
                }
                j += 1;
            }
            if j == digits_start {
                return Err(DimError::parse(pos, "dangling superscript minus"));
            }
            tokens.push(Token {
                kind: TokenKind::Superscript(if negative { -value } else { value }),
                pos,
            });
            i = j;
            continue;
        }

        if is_ident_start(c) {
            let mut j = i;
            while j < chars.len() && is_ident_continue(chars[j]) {
                j += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(chars[i..j].iter().collect()),
                pos,
            });
            i = j;
            continue;
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' if chars.get(i + 1) == Some(&'>') => {
                i += 1;
                TokenKind::Arrow
            }
            '-' | '−' => TokenKind::Minus,
            '*' | '·' | '⋅' | '×' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '%' => TokenKind::Ident("%".to_string()),
            other => {
                return Err(DimError::parse(
                    pos,
                    format!("unexpected character '{}'", other),
                ))
            }
        };
        tokens.push(Token { kind, pos });
        i += 1;
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed expression tree
#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    /// A named quantity or a unit symbol, resolved at evaluation time
    Name(String),
    Negate(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Power(Box<Expr>, i32),
    Convert(Box<Expr>, Unit),
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn new(input: &str) -> DimResult<Self> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
            end: input.chars().count(),
        })
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.pos).unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| t.kind.clone());
        self.pos += 1;
        token
    }

    fn at_conversion(&self) -> bool {
        match self.peek() {
            Some(TokenKind::Arrow) => true,
            Some(TokenKind::Ident(word)) => CONVERSION_KEYWORDS.contains(&word.as_str()),
            _ => false,
        }
    }

    fn expect_end(&self) -> DimResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(kind) => Err(DimError::parse(
                self.position(),
                format!("unexpected {:?}", kind),
            )),
        }
    }

    fn parse_conversion(&mut self) -> DimResult<Expr> {
        let expr = self.parse_expr()?;
        if self.at_conversion() {
            self.advance();
            let unit = self.parse_unit()?;
            self.expect_end()?;
            return Ok(Expr::Convert(Box::new(expr), unit));
        }
        self.expect_end()?;
        Ok(expr)
    }

    fn parse_expr(&mut self) -> DimResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Plus) => BinaryOp::Add,
                Some(TokenKind::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_term(&mut self) -> DimResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(TokenKind::Star) => BinaryOp::Mul,
                Some(TokenKind::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
    }

    fn parse_factor(&mut self) -> DimResult<Expr> {
        if self.peek() == Some(&TokenKind::Minus) {
            self.advance();
            let inner = self.parse_factor()?;
            return Ok(Expr::Negate(Box::new(inner)));
        }

        let starts_with_number = matches!(self.peek(), Some(TokenKind::Number(_)));
        let mut left = self.parse_power()?;

        // "2 mg" and "2 (A/cm^2)" bind tighter than '*' and '/'
        if starts_with_number {
            while !self.at_conversion()
                && matches!(
                    self.peek(),
                    Some(TokenKind::Ident(_)) | Some(TokenKind::LParen)
                )
            {
                let right = self.parse_power()?;
                left = Expr::Binary(BinaryOp::Mul, Box::new(left), Box::new(right));
            }
        }
        Ok(left)
    }

    fn parse_exponent(&mut self) -> DimResult<Option<i32>> {
        match self.peek() {
            Some(TokenKind::Superscript(n)) => {
                let n = *n;
                self.advance();
                Ok(Some(n))
            }
            Some(TokenKind::Caret) => {
                self.advance();
                let pos = self.position();
                let negative = if self.peek() == Some(&TokenKind::Minus) {
                    self.advance();
                    true
                } else {
                    false
                };
                match self.advance() {
                    Some(TokenKind::Number(n)) if n.fract() == 0.0 => {
                        let n = checked_exponent(&format!("{}", n))?;
                        Ok(Some(if negative { -n } else { n }))
                    }
                    Some(TokenKind::Number(n)) => Err(DimError::InvalidExponent(n.to_string())),
                    _ => Err(DimError::parse(pos, "expected integer exponent after '^'")),
                }
            }
            _ => Ok(None),
        }
    }

    fn parse_power(&mut self) -> DimResult<Expr> {
        let base = self.parse_primary()?;
        match self.parse_exponent()? {
            Some(n) => Ok(Expr::Power(Box::new(base), n)),
            None => Ok(base),
        }
    }

    fn parse_primary(&mut self) -> DimResult<Expr> {
        let pos = self.position();
        match self.advance() {
            Some(TokenKind::Number(n)) => Ok(Expr::Number(n)),
            Some(TokenKind::Ident(name)) => Ok(Expr::Name(name)),
            Some(TokenKind::LParen) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(TokenKind::RParen) => Ok(inner),
                    _ => Err(DimError::parse(pos, "unclosed '('")),
                }
            }
            Some(kind) => Err(DimError::parse(pos, format!("unexpected {:?}", kind))),
            None => Err(DimError::parse(pos, "unexpected end of input")),
        }
    }

    // Restricted grammar for target units: atoms, '*', '/', juxtaposition,
    // integer exponents, parentheses and a leading "1" as in "1/yr".
    fn parse_unit(&mut self) -> DimResult<Unit> {
        let mut unit = self.parse_unit_factor()?;
        loop {
            match self.peek() {
                Some(TokenKind::Star) => {
                    self.advance();
                    unit = unit.multiply(&self.parse_unit_factor()?)?;
                }
                Some(TokenKind::Slash) => {
                    self.advance();
                    unit = unit.divide(&self.parse_unit_factor()?)?;
                }
                Some(TokenKind::Ident(_)) | Some(TokenKind::LParen) => {
                    unit = unit.multiply(&self.parse_unit_factor()?)?;
                }
                _ => return Ok(unit),
            }
        }
    }

    fn parse_unit_factor(&mut self) -> DimResult<Unit> {
        let pos = self.position();
        let base = match self.advance() {
            Some(TokenKind::Ident(symbol)) => {
                let atom =
                    lookup_atom(&symbol).ok_or_else(|| DimError::UnknownUnit(symbol.clone()))?;
                Unit::from_atom(atom)
            }
            Some(TokenKind::Number(n)) if n == 1.0 => Unit::dimensionless(),
            Some(TokenKind::Number(n)) => {
                return Err(DimError::parse(
                    pos,
                    format!("unit expression may not contain the number {}", n),
                ))
            }
            Some(TokenKind::LParen) => {
                let inner = self.parse_unit()?;
                match self.advance() {
                    Some(TokenKind::RParen) => inner,
                    _ => return Err(DimError::parse(pos, "unclosed '('")),
                }
            }
            Some(kind) => {
                return Err(DimError::parse(
                    pos,
                    format!("expected a unit, found {:?}", kind),
                ))
            }
            None => return Err(DimError::parse(pos, "expected a unit")),
        };
        match self.parse_exponent()? {
            Some(n) => base.powi(n),
            None => Ok(base),
        }
    }
}

/// Lookup of named quantities during evaluation
pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<Quantity>;
}

impl NameResolver for HashMap<String, Quantity> {
    fn resolve(&self, name: &str) -> Option<Quantity> {
        self.get(name).cloned()
    }
}

/// Resolver with no names, only unit symbols
pub struct NoNames;

impl NameResolver for NoNames {
    fn resolve(&self, _name: &str) -> Option<Quantity> {
        None
    }
}

/// A parsed expression that can be evaluated against named quantities
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    ast: Expr,
}

impl Expression {
    pub fn parse(input: &str) -> DimResult<Self> {
        let mut parser = Parser::new(input)?;
        if parser.peek().is_none() {
            return Err(DimError::parse(0, "empty expression"));
        }
        let ast = parser.parse_conversion()?;
        Ok(Self {
            source: input.to_string(),
            ast,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every identifier in order of appearance, unit symbols included.
    /// Whether a name is a notebook entry or a unit is decided by the caller.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_names(&self.ast, &mut names);
        names
    }

    pub fn evaluate<R: NameResolver + ?Sized>(&self, env: &R) -> DimResult<Quantity> {
        evaluate(&self.ast, env)
    }
}

fn collect_names(expr: &Expr, out: &mut Vec<String>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Name(name) => {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        Expr::Negate(inner) | Expr::Power(inner, _) | Expr::Convert(inner, _) => {
            collect_names(inner, out)
        }
        Expr::Binary(_, left, right) => {
            collect_names(left, out);
            collect_names(right, out);
        }
    }
}

fn evaluate<R: NameResolver + ?Sized>(expr: &Expr, env: &R) -> DimResult<Quantity> {
    match expr {
        Expr::Number(n) => Ok(Quantity::scalar(*n)),
        Expr::Name(name) => env
            .resolve(name)
            .or_else(|| lookup_atom(name).map(|atom| Quantity::new(1.0, Unit::from_atom(atom))))
            .ok_or_else(|| DimError::UnknownName(name.clone())),
        Expr::Negate(inner) => Ok(-evaluate(inner, env)?),
        Expr::Power(base, n) => evaluate(base, env)?.try_powi(*n),
        Expr::Convert(inner, unit) => evaluate(inner, env)?.convert_to(unit),
        Expr::Binary(op, left, right) => {
            let l = evaluate(left, env)?;
            let r = evaluate(right, env)?;
            match op {
                BinaryOp::Add => l.try_add(&r),
                BinaryOp::Sub => l.try_sub(&r),
                BinaryOp::Mul => l.try_mul(&r),
                BinaryOp::Div => l.try_div(&r),
            }
        }
    }
}

/// Parse a unit string such as `GW/yr`, `mg/cm²` or `W/(m^2*K)`
pub fn parse_unit(input: &str) -> DimResult<Unit> {
    let mut parser = Parser::new(input)?;
    if parser.peek().is_none() {
        return Err(DimError::parse(0, "empty unit"));
    }
    let unit = parser.parse_unit()?;
    parser.expect_end()?;
    Ok(unit)
}

/// Parse and evaluate a literal quantity such as `2e5 kg/yr` or `1 kWh as MJ`
pub fn parse_quantity(input: &str) -> DimResult<Quantity> {
    Expression::parse(input)?.evaluate(&NoNames)
}

/// Parser for unit strings, evaluated natively
#[derive(Debug, Default, Clone, Copy)]
pub struct DimParser;

impl DimParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a unit string (e.g., "100 bar", "10 m", "5 kg/s")
    pub fn parse_unit_string(&self, input: &str) -> DimResult<UnitParseResult> {
        let quantity = parse_quantity(input)?;
        Ok(UnitParseResult {
            quantity,
            original: input.to_string(),
        })
    }
}
