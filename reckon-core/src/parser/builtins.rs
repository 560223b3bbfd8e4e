//! Native functions and constants preloaded into every symbol table

use crate::parser::symbols::{NativeFn, SymbolEntry, SymbolTable};
use rand::Rng;

pub struct BuiltinFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub handler: NativeFn,
}

pub const FUNCTIONS: &[BuiltinFunction] = &[
    BuiltinFunction {
        name: "sin",
        description: "Sine (radians)",
        handler: f64::sin,
    },
    BuiltinFunction {
        name: "cos",
        description: "Cosine (radians)",
        handler: f64::cos,
    },
    BuiltinFunction {
        name: "tan",
        description: "Tangent (radians)",
        handler: f64::tan,
    },
    BuiltinFunction {
        name: "abs",
        description: "Absolute value",
        handler: f64::abs,
    },
    BuiltinFunction {
        name: "ceil",
        description: "Smallest integer not below n",
        handler: f64::ceil,
    },
    BuiltinFunction {
        name: "floor",
        description: "Largest integer not above n",
        handler: f64::floor,
    },
    BuiltinFunction {
        name: "round",
        description: "Nearest integer, halves toward +infinity",
        handler: round_half_up,
    },
    BuiltinFunction {
        name: "exp",
        description: "e raised to n",
        handler: f64::exp,
    },
    BuiltinFunction {
        name: "log",
        description: "Natural logarithm",
        handler: f64::ln,
    },
    BuiltinFunction {
        name: "random",
        description: "Random integer in [1, n]",
        handler: random_up_to,
    },
];

pub const CONSTANTS: &[(&str, f64)] = &[("pi", std::f64::consts::PI), ("e", std::f64::consts::E)];

/// Register every builtin in `table`
pub fn install(table: &mut SymbolTable) {
    for builtin in FUNCTIONS {
        table.set(builtin.name, SymbolEntry::NativeFunction(builtin.handler));
    }
    for (name, value) in CONSTANTS {
        table.set(*name, SymbolEntry::Variable(*value));
    }
}

fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn random_up_to(n: f64) -> f64 {
    let unit: f64 = rand::thread_rng().gen();
    (unit * n).floor() + 1.0
}
