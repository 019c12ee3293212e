use thiserror::Error;

/// Hint appended to every expression diagnostic. Implicit multiplication
/// is the most common mistake in hand-typed equations.
const MULTIPLICATION_HINT: &str = "Use * for multiplication (e.g., \"x*y\" not \"xy\").";

/// Failure while parsing or evaluating a user expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("syntax error at position {position}: {message}")]
    Syntax {
        expr: String,
        position: usize,
        message: String,
    },

    #[error("{name} is not defined")]
    UnknownVariable { expr: String, name: String },

    #[error("unknown function {name}()")]
    UnknownFunction { expr: String, name: String },

    #[error("{name}() takes exactly one argument, got {found}")]
    Arity {
        expr: String,
        name: String,
        found: usize,
    },

    #[error("result is not a finite number")]
    NonFinite { expr: String },
}

impl ExpressionError {
    /// The expression text that failed.
    pub fn expr(&self) -> &str {
        match self {
            ExpressionError::Syntax { expr, .. }
            | ExpressionError::UnknownVariable { expr, .. }
            | ExpressionError::UnknownFunction { expr, .. }
            | ExpressionError::Arity { expr, .. }
            | ExpressionError::NonFinite { expr } => expr,
        }
    }

    /// Human-readable message shown to the user.
    pub fn diagnostic(&self) -> String {
        format!("Invalid expression \"{}\": {self}. {MULTIPLICATION_HINT}", self.expr())
    }
}

/// A single overlay could not be turned into geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    #[error("{what} is empty. Please enter an equation like \"{example}\".")]
    EmptyExpression {
        what: &'static str,
        example: &'static str,
    },

    #[error("At least {required} points are required for {what}, found {found}.")]
    NotEnoughPoints {
        what: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{0}")]
    Expression(String),

    #[error("no finite data in column \"{column}\" to sample over")]
    EmptyDomain { column: String },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Cannot open spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("No data found in {0}")]
    Empty(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_mentions_expression_and_hint() {
        let err = ExpressionError::UnknownVariable {
            expr: "2xy".to_string(),
            name: "xy".to_string(),
        };
        let msg = err.diagnostic();
        assert!(msg.contains("\"2xy\""));
        assert!(msg.contains("xy is not defined"));
        assert!(msg.contains("Use * for multiplication"));
    }

    #[test]
    fn overlay_error_messages_read_naturally() {
        let err = OverlayError::NotEnoughPoints {
            what: "a line",
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "At least 2 points are required for a line, found 1."
        );
    }
}
