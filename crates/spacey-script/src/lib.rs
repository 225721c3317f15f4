// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-script
//!
//! A small, restricted script evaluator used by the Spacey module loader to
//! run module units.
//!
//! ## Overview
//!
//! The evaluator understands a deliberately narrow JavaScript-like subset:
//! - `var` / `let` / `const` declarations and assignments
//! - Object literals, member access and calls into host functions
//! - Arithmetic, string concatenation and equality
//! - `throw`
//!
//! There are no user-defined functions or control flow. Everything a module
//! needs beyond that (including `require`) is injected by the host as a
//! [`NativeFunction`].
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_script::{Interpreter, Parser, Value};
//!
//! let program = Parser::new("var x = 40; x + 2").parse_program().unwrap();
//! let mut interpreter = Interpreter::new();
//! let result = interpreter.run(&program).unwrap();
//! assert_eq!(result, Value::Number(42.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
mod error;
mod interpreter;
pub mod lexer;
mod parser;
mod value;

pub use error::Error;
pub use interpreter::Interpreter;
pub use parser::Parser;
pub use value::{HostFn, NativeFunction, ObjectRef, Properties, Value};

/// Parses and runs `source` in a fresh interpreter, returning the value of
/// the last expression statement.
pub fn eval(source: &str) -> Result<Value, Error> {
    let program = Parser::new(source).parse_program()?;
    Interpreter::new().run(&program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_returns_completion_value() {
        assert_eq!(eval("1 + 2").unwrap(), Value::Number(3.0));
        assert_eq!(eval("var a = 'x'; a + 'y';").unwrap().to_string(), "xy");
    }

    #[test]
    fn test_eval_empty_program_is_undefined() {
        assert!(eval("").unwrap().is_undefined());
        assert!(eval("// nothing here").unwrap().is_undefined());
    }
}
