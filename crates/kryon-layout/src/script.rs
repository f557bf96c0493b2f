// crates/kryon-layout/src/script.rs

//! Textual anchor scripts.
//!
//! One statement per line, `#` starts a comment and a trailing `;` is
//! allowed:
//!
//! ```text
//! header.left   = root.left + 16
//! header.width  = root.width * 0.5 - 8 @750
//! logo.height   = 50
//! clear header.left
//! drop logo
//! ```
//!
//! Operators on the right-hand side have no precedence; they apply left to
//! right, each one transforming the expression built so far.

use std::collections::HashMap;

use kryon_core::{Attribute, AttributeReference, ConstraintError, ConstraintWarning, ElementId, Priority};
use thiserror::Error;
use tracing::debug;

use crate::{AssignableValue, ConstraintExpression, ConstraintRegistry};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: {source}")]
    Constraint {
        line: usize,
        #[source]
        source: ConstraintError,
    },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::Syntax { line, .. } | ScriptError::Constraint { line, .. } => *line,
        }
    }

    fn syntax(line: usize, message: impl Into<String>) -> Self {
        ScriptError::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Interns element names into sequential ids, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct ElementNames {
    ids: HashMap<String, ElementId>,
    names: Vec<String>,
}

impl ElementNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of(&mut self, name: &str) -> ElementId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        self.names.push(name.to_string());
        let id = self.names.len() as ElementId;
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<ElementId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: ElementId) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.names.get(index).map(String::as_str)
    }

    /// Renders `#3.left` as `header.left` when the id is known.
    pub fn describe(&self, reference: AttributeReference) -> String {
        match self.name_of(reference.participant) {
            Some(name) => format!("{}.{}", name, reference.attribute),
            None => reference.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedReference {
    pub element: String,
    pub attribute: Attribute,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Reference(NamedReference),
    Number(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    Scale(f32),
    Offset(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueExpr {
    pub base: Operand,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign {
        target: NamedReference,
        value: ValueExpr,
        priority: Option<Priority>,
    },
    Clear(NamedReference),
    Drop(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub line: usize,
    pub statement: Statement,
}

/// Outcome of [`AnchorScript::apply`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptReport {
    pub assigned: usize,
    pub cleared: usize,
    pub dropped: usize,
    pub warnings: Vec<(usize, ConstraintWarning)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorScript {
    pub lines: Vec<ScriptLine>,
}

impl AnchorScript {
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut lines = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }

            let tokens = tokenize(text, line)?;
            let statement = Parser::new(tokens, line).statement()?;
            lines.push(ScriptLine { line, statement });
        }

        Ok(Self { lines })
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Runs every statement against `registry`, stopping at the first error.
    pub fn apply(
        &self,
        registry: &mut ConstraintRegistry,
        names: &mut ElementNames,
    ) -> Result<ScriptReport, ScriptError> {
        let mut report = ScriptReport::default();

        for ScriptLine { line, statement } in &self.lines {
            let line = *line;
            match statement {
                Statement::Assign {
                    target,
                    value,
                    priority,
                } => {
                    let target_ref = AttributeReference::new(names.id_of(&target.element), target.attribute);
                    let value = resolve_value(value, names)
                        .map_err(|source| ScriptError::Constraint { line, source })?;

                    let mut builder = registry.builder();
                    if let Some(priority) = priority {
                        builder = builder.priority(*priority);
                    }

                    let descriptor = builder
                        .assign(registry, target_ref, value)
                        .map_err(|source| ScriptError::Constraint { line, source })?;
                    if let Some(warning) = descriptor.warning {
                        report.warnings.push((line, warning));
                    }
                    report.assigned += 1;
                }
                Statement::Clear(reference) => {
                    if let Some(id) = names.get(&reference.element) {
                        if registry.unregister(id, reference.attribute).is_some() {
                            report.cleared += 1;
                        }
                    }
                }
                Statement::Drop(element) => {
                    if let Some(id) = names.get(element) {
                        report.dropped += registry.teardown(id).len();
                    }
                }
            }
        }

        debug!(
            "Applied anchor script: {} assigned, {} cleared, {} dropped",
            report.assigned, report.cleared, report.dropped
        );
        Ok(report)
    }
}

fn resolve_value(value: &ValueExpr, names: &mut ElementNames) -> kryon_core::Result<AssignableValue> {
    let mut expression = match &value.base {
        Operand::Number(n) if value.operations.is_empty() => return Ok(AssignableValue::Constant(*n)),
        Operand::Number(n) => ConstraintExpression::from_constant(*n),
        Operand::Reference(r) => {
            let reference = AttributeReference::new(names.id_of(&r.element), r.attribute);
            if value.operations.is_empty() {
                return Ok(AssignableValue::Reference(reference));
            }
            ConstraintExpression::from_reference(reference)
        }
    };

    for operation in &value.operations {
        expression = match *operation {
            Operation::Scale(k) => expression.scale(k)?,
            Operation::Offset(c) => expression.offset_by(c),
        };
    }

    Ok(AssignableValue::Expression(expression))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Number(f32),
    Dot,
    Equals,
    Star,
    Plus,
    Minus,
    At,
    Semicolon,
}

fn tokenize(text: &str, line: usize) -> Result<Vec<Token>, ScriptError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_whitespace() => pos += 1,
            '.' if !chars.get(pos + 1).is_some_and(char::is_ascii_digit) => {
                tokens.push(Token::Dot);
                pos += 1;
            }
            '=' => {
                tokens.push(Token::Equals);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            '@' => {
                tokens.push(Token::At);
                pos += 1;
            }
            ';' => {
                tokens.push(Token::Semicolon);
                pos += 1;
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                let literal: String = chars[start..pos].iter().collect();
                let value = literal
                    .parse::<f32>()
                    .map_err(|_| ScriptError::syntax(line, format!("invalid number '{}'", literal)))?;
                if !value.is_finite() {
                    return Err(ScriptError::syntax(line, format!("number out of range '{}'", literal)));
                }
                tokens.push(Token::Number(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                tokens.push(Token::Ident(chars[start..pos].iter().collect()));
            }
            other => {
                return Err(ScriptError::syntax(line, format!("unexpected character '{}'", other)));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, line: usize) -> Self {
        Self { tokens, pos: 0, line }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::syntax(self.line, message)
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), ScriptError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(self.error(format!("expected {}, found {:?}", what, token))),
            None => Err(self.error(format!("expected {}, found end of line", what))),
        }
    }

    fn ident(&mut self) -> Result<String, ScriptError> {
        match self.advance() {
            Some(Token::Ident(name)) => Ok(name),
            Some(token) => Err(self.error(format!("expected a name, found {:?}", token))),
            None => Err(self.error("expected a name, found end of line")),
        }
    }

    fn number(&mut self) -> Result<f32, ScriptError> {
        let negative = matches!(self.peek(), Some(Token::Minus));
        if negative {
            self.pos += 1;
        }
        match self.advance() {
            Some(Token::Number(n)) => Ok(if negative { -n } else { n }),
            Some(token) => Err(self.error(format!("expected a number, found {:?}", token))),
            None => Err(self.error("expected a number, found end of line")),
        }
    }

    fn statement(mut self) -> Result<Statement, ScriptError> {
        let statement = match self.peek() {
            Some(Token::Ident(word)) if word == "clear" && self.is_keyword_position() => {
                self.pos += 1;
                Statement::Clear(self.reference()?)
            }
            Some(Token::Ident(word)) if word == "drop" && self.is_keyword_position() => {
                self.pos += 1;
                Statement::Drop(self.ident()?)
            }
            _ => self.assignment()?,
        };

        if matches!(self.peek(), Some(Token::Semicolon)) {
            self.pos += 1;
        }
        match self.peek() {
            None => Ok(statement),
            Some(token) => Err(self.error(format!("unexpected {:?} after statement", token))),
        }
    }

    /// `clear` and `drop` are keywords only when not used as `clear.left`.
    fn is_keyword_position(&self) -> bool {
        !matches!(self.tokens.get(self.pos + 1), Some(Token::Dot))
    }

    fn reference(&mut self) -> Result<NamedReference, ScriptError> {
        let element = self.ident()?;
        self.expect(Token::Dot, "'.'")?;
        let name = self.ident()?;
        let attribute = name
            .parse::<Attribute>()
            .map_err(|source| ScriptError::Constraint { line: self.line, source })?;
        Ok(NamedReference { element, attribute })
    }

    fn assignment(&mut self) -> Result<Statement, ScriptError> {
        let target = self.reference()?;
        self.expect(Token::Equals, "'='")?;
        let value = self.value()?;

        let priority = if matches!(self.peek(), Some(Token::At)) {
            self.pos += 1;
            Some(self.priority()?)
        } else {
            None
        };

        Ok(Statement::Assign {
            target,
            value,
            priority,
        })
    }

    fn value(&mut self) -> Result<ValueExpr, ScriptError> {
        let base = match self.peek() {
            Some(Token::Ident(_)) => Operand::Reference(self.reference()?),
            _ => Operand::Number(self.number()?),
        };

        let mut operations = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    operations.push(Operation::Scale(self.number()?));
                }
                Some(Token::Plus) => {
                    self.pos += 1;
                    operations.push(Operation::Offset(self.number()?));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    operations.push(Operation::Offset(-self.number()?));
                }
                _ => break,
            }
        }

        Ok(ValueExpr { base, operations })
    }

    fn priority(&mut self) -> Result<Priority, ScriptError> {
        match self.advance() {
            Some(Token::Ident(name)) => match name.to_ascii_lowercase().as_str() {
                "required" => Ok(Priority::REQUIRED),
                "high" => Ok(Priority::HIGH),
                "low" => Ok(Priority::LOW),
                _ => Err(self.error(format!("unknown priority '{}'", name))),
            },
            Some(Token::Number(n)) if n.fract() == 0.0 && (0.0..=u16::MAX as f32).contains(&n) => {
                Priority::new(n as u16).map_err(|source| ScriptError::Constraint { line: self.line, source })
            }
            Some(token) => Err(self.error(format!("expected a priority, found {:?}", token))),
            None => Err(self.error("expected a priority, found end of line")),
        }
    }
}
