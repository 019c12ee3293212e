use crate::error::ExpressionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// The allow-listed single-argument functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
    Log,
    Exp,
}

impl Function {
    /// Case-insensitive lookup.
    pub fn from_name(name: &str) -> Option<Function> {
        match name.to_ascii_lowercase().as_str() {
            "sin" => Some(Function::Sin),
            "cos" => Some(Function::Cos),
            "tan" => Some(Function::Tan),
            "sqrt" => Some(Function::Sqrt),
            "abs" => Some(Function::Abs),
            "log" => Some(Function::Log),
            "exp" => Some(Function::Exp),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Log => "log",
            Function::Exp => "exp",
        }
    }

    fn apply(&self, v: f64) -> f64 {
        match self {
            Function::Sin => v.sin(),
            Function::Cos => v.cos(),
            Function::Tan => v.tan(),
            Function::Sqrt => v.sqrt(),
            Function::Abs => v.abs(),
            // Natural logarithm.
            Function::Log => v.ln(),
            Function::Exp => v.exp(),
        }
    }
}

/// Case-insensitive named constants.
pub fn constant(name: &str) -> Option<f64> {
    match name.to_ascii_lowercase().as_str() {
        "pi" => Some(std::f64::consts::PI),
        "e" => Some(std::f64::consts::E),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        function: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Evaluate with variables looked up in `bindings`.
    ///
    /// Intermediate infinities are allowed; the caller decides whether the
    /// final value is acceptable.
    pub fn eval(&self, source: &str, bindings: &[(&str, f64)]) -> Result<f64, ExpressionError> {
        Ok(match self {
            Expr::Number(v) => *v,
            Expr::Variable(name) => bindings
                .iter()
                .find(|(n, _)| *n == name.as_str())
                .map(|(_, v)| *v)
                .ok_or_else(|| ExpressionError::UnknownVariable {
                    expr: source.to_string(),
                    name: name.clone(),
                })?,
            Expr::Unary { op, operand } => {
                let v = operand.eval(source, bindings)?;
                match op {
                    UnaryOp::Neg => -v,
                    UnaryOp::Plus => v,
                }
            }
            Expr::Binary { op, left, right } => {
                let l = left.eval(source, bindings)?;
                let r = right.eval(source, bindings)?;
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    BinaryOp::Pow => l.powf(r),
                }
            }
            Expr::Call { function, arg } => function.apply(arg.eval(source, bindings)?),
        })
    }
}
