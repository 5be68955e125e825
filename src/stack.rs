use tracing::debug;

use crate::errors::*;
use crate::parse::Token;
use crate::symbols::{self, BRACKET_LEVEL, FUNCTION_LEVEL, NEGATE};

/// An item waiting on the operator stack
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Entry {
    Op(char, u8),
    OpenB,
    Func(String),
}

impl Entry {
    fn level(&self) -> u8 {
        match self {
            Entry::Op(_, lvl) => *lvl,
            Entry::OpenB => BRACKET_LEVEL,
            Entry::Func(..) => FUNCTION_LEVEL,
        }
    }

    fn into_token(self) -> Token {
        match self {
            Entry::Op(op, _) => Token::Operator(op),
            Entry::Func(name) => Token::Function(name),
            Entry::OpenB => Token::LeftParen,
        }
    }
}

/// Infix to postfix converter (shunting-yard). Every conversion must use its
/// own `Stack`
#[derive(Default)]
pub struct Stack {
    pub(crate) queue: Vec<Entry>,
    pub(crate) output: Vec<Token>,
}

impl Stack {
    pub fn new() -> Self {
        Default::default()
    }

    // move operators from the queue to output while the top of the queue has
    // equal or greater level. Brackets have the lowest level and stay
    fn pop_while_priority(&mut self, level: u8) {
        while let Some(e) = self.queue.pop() {
            if e == Entry::OpenB || e.level() < level {
                self.queue.push(e);
                return;
            }
            self.output.push(e.into_token());
        }
    }

    // move everything from the queue to output until the first bracket.
    // A function right below the bracket owns it and goes to output too
    fn pop_until_bracket(&mut self) -> ParseResult<()> {
        loop {
            match self.queue.pop() {
                None => return Err(ParseError::MissingOpenParen),
                Some(Entry::OpenB) => break,
                Some(e) => self.output.push(e.into_token()),
            }
        }
        if let Some(Entry::Func(..)) = self.queue.last() {
            if let Some(f) = self.queue.pop() {
                self.output.push(f.into_token());
            }
        }
        Ok(())
    }

    // move all operators from queue to output.
    // Must be called only after the expression ends
    fn pop_all(&mut self) -> ParseResult<()> {
        while let Some(e) = self.queue.pop() {
            match e {
                Entry::OpenB => return Err(ParseError::MissingCloseParen),
                _ => self.output.push(e.into_token()),
            }
        }
        Ok(())
    }

    // ------------ PUBLIC -----------------

    /// Feeds the next infix token to the converter
    pub fn push(&mut self, token: Token) -> ParseResult<()> {
        match token {
            Token::Number(..) | Token::Variable(..) | Token::Constant(..) => self.output.push(token),
            Token::LeftParen => self.queue.push(Entry::OpenB),
            Token::RightParen => self.pop_until_bracket()?,
            Token::Function(name) => self.queue.push(Entry::Func(name)),
            Token::Operator(op) => {
                let level = match symbols::precedence(op) {
                    Some(lvl) if symbols::is_operator(op) => lvl,
                    _ => return Err(ParseError::UnknownOperator(op)),
                };
                // prefix negation has no left operand to complete
                if op != NEGATE {
                    self.pop_while_priority(level);
                }
                self.queue.push(Entry::Op(op, level));
            }
        }
        Ok(())
    }

    /// Flushes the operator stack and returns the postfix sequence
    pub fn finish(mut self) -> ParseResult<Vec<Token>> {
        self.pop_all()?;
        Ok(self.output)
    }
}

/// Converts a token sequence in infix order to postfix order.
///
/// All operators are left-associative: an incoming operator first moves every
/// stacked operator of the same or higher level to the output, so `2^3^2` is
/// `(2^3)^2`.
pub fn to_postfix(tokens: Vec<Token>) -> ParseResult<Vec<Token>> {
    let mut stk = Stack::new();
    for token in tokens {
        stk.push(token)?;
    }
    let postfix = stk.finish()?;
    debug!("postfix: {}", format_postfix(&postfix));
    Ok(postfix)
}

/// Formats a postfix sequence as `[3.0, 4.0, +]`
pub fn format_postfix(postfix: &[Token]) -> String {
    let items: Vec<String> = postfix.iter().map(|t| t.to_string()).collect();
    format!("[{}]", items.join(", "))
}
