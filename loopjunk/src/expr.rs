//! Integer arithmetic expressions.
//!
//! The obfuscation passes only ever produce text. This module parses such
//! text back into a small expression tree and evaluates it, so tests and
//! demos can check that an emitted fragment means what it should. The
//! passes themselves never evaluate anything.

use std::collections::BTreeSet;

use crate::{Symbol, valuation::Valuation};

/// An integer arithmetic expression.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Const(i128),
    Var(Symbol),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    /// Parse an expression from a string.
    pub fn from_string(s: &str) -> Result<Expr, String> {
        let mut it = s.chars().filter(|c| !c.is_whitespace()).peekable();
        let e = Self::parse(&mut it, 0)?;
        match it.next() {
            None => Ok(e),
            Some(c) => Err(format!("Unexpected character '{c}'")),
        }
    }

    // pre 0: parse as much as possible
    // pre 15: parse as little as possible
    fn parse<I>(
        it: &mut std::iter::Peekable<I>,
        pre: usize,
    ) -> Result<Expr, String>
    where
        I: Iterator<Item = char>,
    {
        use Expr::*;

        let c = *it.peek().ok_or("Unexpected end of input")?;

        let mut e = if c == '(' {
            it.next();
            let e = Self::parse(it, 0)?;
            match it.next() {
                Some(')') => e,
                _ => return Err("Expected closing parenthesis".to_string()),
            }
        } else if c == '-' {
            it.next();
            Neg(Box::new(Self::parse(it, 15)?))
        } else if c.is_alphabetic() || c == '_' {
            it.next();
            let mut var = String::from(c);
            while let Some(c) = it.peek() {
                if !c.is_alphanumeric() && *c != '_' {
                    break;
                }

                var.push(*c);
                it.next();
            }

            Var(var.as_str().into())
        } else if c.is_ascii_digit() {
            let mut n = 0i128;
            while let Some(d) = it.peek().and_then(|c| c.to_digit(10)) {
                n = n * 10 + d as i128;
                it.next();
            }

            Const(n)
        } else {
            return Err(format!("Unexpected character '{c}'"));
        };

        loop {
            let c = match it.peek() {
                None => return Ok(e),
                Some(c) => *c,
            };

            let op_pre = match c {
                '+' | '-' => 5,
                '*' => 6,
                ')' => return Ok(e),
                _ => return Err(format!("Unexpected character '{c}'")),
            };

            if op_pre <= pre {
                return Ok(e);
            }

            // The current operator binds tighter than the one whose
            // subexpression we are parsing, so finish it first.
            it.next();
            let lhs = Box::new(e);
            let rhs = Box::new(Self::parse(it, op_pre)?);
            e = match c {
                '+' => Add(lhs, rhs),
                '-' => Sub(lhs, rhs),
                '*' => Mul(lhs, rhs),
                _ => unreachable!(),
            };
        }
    }

    /// Evaluate the expression with wrapping `i128` arithmetic.
    pub fn eval(&self, v: &mut Valuation) -> i128 {
        match self {
            Expr::Const(n) => *n,
            Expr::Var(name) => v.value(*name),
            Expr::Add(l, r) => l.eval(v).wrapping_add(r.eval(v)),
            Expr::Sub(l, r) => l.eval(v).wrapping_sub(r.eval(v)),
            Expr::Mul(l, r) => l.eval(v).wrapping_mul(r.eval(v)),
            Expr::Neg(i) => i.eval(v).wrapping_neg(),
        }
    }

    /// Returns all variables in the expression, without duplicates.
    pub fn vars(&self) -> Vec<Symbol> {
        let mut v = BTreeSet::new();
        self.vars_impl(&mut v);
        v.into_iter().collect()
    }

    fn vars_impl(&self, v: &mut BTreeSet<Symbol>) {
        match self {
            Expr::Const(_) => {},
            Expr::Var(name) => drop(v.insert(*name)),
            Expr::Neg(i) => i.vars_impl(v),
            Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) => {
                l.vars_impl(v);
                r.vars_impl(v);
            },
        }
    }
}
