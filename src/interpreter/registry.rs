use std::collections::HashMap;
use std::sync::LazyLock;

use super::context::Context;
use super::error::RuntimeErrorKind;
use crate::render::RenderCommand;

/// How a built-in turns its arguments into a value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Unary(fn(f64) -> f64),
    Binary(fn(f64, f64) -> f64),
    /// `render(r, theta)`: draws a vertex.
    Vertex,
    /// `render_arc(r, theta, sweep)`: draws an arc.
    Arc,
}

#[derive(Debug, Clone, Copy)]
pub struct Function {
    pub name: &'static str,
    pub arity: usize,
    pub rule: Rule,
}

impl Function {
    const fn unary(name: &'static str, f: fn(f64) -> f64) -> Self {
        Self {
            name,
            arity: 1,
            rule: Rule::Unary(f),
        }
    }

    const fn binary(name: &'static str, f: fn(f64, f64) -> f64) -> Self {
        Self {
            name,
            arity: 2,
            rule: Rule::Binary(f),
        }
    }

    pub fn call<C: Context + ?Sized>(
        &self,
        context: &mut C,
        arguments: &[f64],
    ) -> Result<f64, RuntimeErrorKind> {
        let wrong_arity = || RuntimeErrorKind::WrongArity {
            name: self.name.into(),
            expected: self.arity,
            actual: arguments.len(),
        };
        if arguments.len() != self.arity {
            return Err(wrong_arity());
        }

        match (self.rule, arguments) {
            (Rule::Unary(f), &[x]) => Ok(f(x)),
            (Rule::Binary(f), &[x, y]) => Ok(f(x, y)),
            (Rule::Vertex, &[r, theta]) => {
                context.emit(RenderCommand::Vertex { r, theta })?;
                Ok(0.0)
            }
            (Rule::Arc, &[r, theta, sweep]) => {
                context.emit(RenderCommand::Arc { r, theta, sweep })?;
                Ok(0.0)
            }
            _ => Err(wrong_arity()),
        }
    }
}

const BUILTINS: &[Function] = &[
    Function::unary("sin", f64::sin),
    Function::unary("cos", f64::cos),
    Function::unary("tan", f64::tan),
    Function::unary("asin", f64::asin),
    Function::unary("acos", f64::acos),
    Function::unary("atan", f64::atan),
    Function::unary("sinh", f64::sinh),
    Function::unary("cosh", f64::cosh),
    Function::unary("tanh", f64::tanh),
    Function::unary("asinh", f64::asinh),
    Function::unary("acosh", f64::acosh),
    Function::unary("atanh", f64::atanh),
    Function::unary("abs", f64::abs),
    Function::unary("ceil", f64::ceil),
    Function::unary("floor", f64::floor),
    Function::unary("sqrt", f64::sqrt),
    Function::unary("log", f64::ln),
    Function::unary("log10", f64::log10),
    Function::binary("pow", f64::powf),
    Function::binary("min", f64::min),
    Function::binary("max", f64::max),
    Function {
        name: "render",
        arity: 2,
        rule: Rule::Vertex,
    },
    Function {
        name: "render_arc",
        arity: 3,
        rule: Rule::Arc,
    },
];

/// The built-in functions by name.
pub static FUNCTIONS: LazyLock<HashMap<&'static str, Function>> = LazyLock::new(|| {
    BUILTINS
        .iter()
        .map(|function| (function.name, *function))
        .collect()
});

pub fn lookup(name: &str) -> Option<&'static Function> {
    FUNCTIONS.get(name)
}

/// Every registered name with the number of arguments it takes.
pub fn signatures() -> impl Iterator<Item = (&'static str, usize)> {
    BUILTINS.iter().map(|function| (function.name, function.arity))
}

pub fn dispatch<C: Context + ?Sized>(
    context: &mut C,
    name: &str,
    arguments: &[f64],
) -> Result<f64, RuntimeErrorKind> {
    let function = lookup(name).ok_or_else(|| RuntimeErrorKind::NoSuchFunction(name.into()))?;
    function.call(context, arguments)
}
