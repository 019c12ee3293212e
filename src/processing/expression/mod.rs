//! Small arithmetic expression language used by overlay equations.
//!
//! Expressions are parsed into a tree and interpreted; nothing outside the
//! allow-listed constants (`pi`, `e`) and functions (`sin cos tan sqrt abs
//! log exp`) is reachable. Failures never escape as errors: the evaluator
//! returns NaN and remembers a diagnostic for the next validation check.

pub mod ast;
pub mod parser;
pub mod token;

use std::collections::HashMap;

use crate::error::ExpressionError;
use ast::Expr;

/// A parsed expression ready for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    source: String,
    root: Expr,
}

impl CompiledExpr {
    pub fn compile(source: &str) -> Result<Self, ExpressionError> {
        Ok(Self {
            source: source.to_string(),
            root: parser::parse(source)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate, treating a non-finite result as an error.
    pub fn eval(&self, bindings: &[(&str, f64)]) -> Result<f64, ExpressionError> {
        let value = self.root.eval(&self.source, bindings)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExpressionError::NonFinite {
                expr: self.source.clone(),
            })
        }
    }
}

/// Evaluates expressions with NaN as the failure sentinel.
///
/// Parsed trees are cached by source text, so sampling the same equation
/// over a grid parses it once.
#[derive(Debug, Default)]
pub struct Evaluator {
    cache: HashMap<String, Result<CompiledExpr, ExpressionError>>,
    last_error: Option<ExpressionError>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `expr` against `bindings`. Returns NaN on any failure and
    /// records the failure for [`Evaluator::take_diagnostic`].
    pub fn evaluate(&mut self, expr: &str, bindings: &[(&str, f64)]) -> f64 {
        if !self.cache.contains_key(expr) {
            self.cache
                .insert(expr.to_string(), CompiledExpr::compile(expr));
        }
        let result = match self.cache.get(expr) {
            Some(Ok(compiled)) => compiled.eval(bindings),
            Some(Err(err)) => Err(err.clone()),
            None => return f64::NAN,
        };

        match result {
            Ok(v) => v,
            Err(err) => {
                self.last_error = Some(err);
                f64::NAN
            }
        }
    }

    /// Message for the most recent failure, clearing it.
    pub fn take_diagnostic(&mut self) -> Option<String> {
        self.last_error.take().map(|e| e.diagnostic())
    }

    /// Classify a batch of samples: fails only when every sample is NaN and
    /// a diagnostic is pending. The pending diagnostic is consumed either way.
    pub fn validate_samples<'v, I>(&mut self, samples: I) -> Result<(), String>
    where
        I: IntoIterator<Item = &'v f64>,
    {
        let all_failed = samples.into_iter().all(|v| v.is_nan());
        let diagnostic = self.take_diagnostic();
        match diagnostic {
            Some(msg) if all_failed => Err(msg),
            _ => Ok(()),
        }
    }
}

/// One-shot evaluation; NaN on failure.
pub fn evaluate(expr: &str, bindings: &[(&str, f64)]) -> f64 {
    Evaluator::new().evaluate(expr, bindings)
}
