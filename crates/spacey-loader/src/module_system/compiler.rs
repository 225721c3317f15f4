// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Turning module source text into executable units

use crate::error::{LoaderError, Result};
use spacey_script::{Interpreter, Parser, Value, ast::Program};

/// Names of the bindings every unit is parameterised by, in call order
pub const BINDING_NAMES: [&str; 3] = ["require", "module", "exports"];

/// A compiled module body
pub trait CompiledUnit {
    /// Run the unit with one value per binding name it was compiled with
    fn call(&self, args: Vec<Value>) -> Result<()>;
}

/// Compile-and-run capability used by the loader
pub trait SourceCompiler: Send + Sync {
    /// Compile `source` (the text of module `key`) into a unit taking
    /// `params` as its bindings
    fn compile(&self, key: &str, source: &str, params: &[&str]) -> Result<Box<dyn CompiledUnit>>;
}

/// [`SourceCompiler`] backed by the `spacey-script` evaluator
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptCompiler;

impl SourceCompiler for ScriptCompiler {
    fn compile(&self, key: &str, source: &str, params: &[&str]) -> Result<Box<dyn CompiledUnit>> {
        let program = Parser::new(source)
            .parse_program()
            .map_err(|e| LoaderError::compile(key, e.to_string()))?;

        Ok(Box::new(ScriptUnit {
            program,
            params: params.iter().map(|p| p.to_string()).collect(),
        }))
    }
}

/// A parsed script waiting for its bindings
struct ScriptUnit {
    program: Program,
    params: Vec<String>,
}

impl CompiledUnit for ScriptUnit {
    fn call(&self, args: Vec<Value>) -> Result<()> {
        let mut interpreter = Interpreter::new();
        let mut args = args.into_iter();
        for name in &self.params {
            interpreter.define(name.as_str(), args.next().unwrap_or_default());
        }

        interpreter.run(&self.program).map(|_| ()).map_err(unwrap_host_error)
    }
}

/// Loader errors raised inside nested `require` calls travel through the
/// script as host errors; hand them back unchanged.
fn unwrap_host_error(err: spacey_script::Error) -> LoaderError {
    match err {
        spacey_script::Error::Host(inner) => match inner.downcast::<LoaderError>() {
            Ok(loader_error) => *loader_error,
            Err(other) => LoaderError::Execution(spacey_script::Error::Host(other)),
        },
        other => LoaderError::Execution(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spacey_script::ObjectRef;

    #[test]
    fn test_compile_and_call() {
        let unit = ScriptCompiler
            .compile("m", "exports.value = 'ok';", &BINDING_NAMES)
            .unwrap();
        let exports = ObjectRef::new();

        unit.call(vec![
            Value::Undefined,
            Value::object(),
            Value::Object(exports.clone()),
        ])
        .unwrap();

        assert_eq!(exports.get("value"), Some(Value::from("ok")));
    }

    #[test]
    fn test_syntax_error_names_module() {
        let err = ScriptCompiler
            .compile("lib/broken", "var = ;", &BINDING_NAMES)
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::Compile { ref module, .. } if module == "lib/broken"));
    }

    #[test]
    fn test_loader_errors_are_unwrapped() {
        let unit = ScriptCompiler
            .compile("m", "require('gone');", &BINDING_NAMES)
            .unwrap();
        let require = Value::function("require", |_| {
            Err(spacey_script::Error::host(LoaderError::NativeModuleNotFound(
                "smart/gone".to_string(),
            )))
        });

        let err = unit
            .call(vec![require, Value::object(), Value::object()])
            .unwrap_err();
        assert!(matches!(err, LoaderError::NativeModuleNotFound(ref name) if name == "smart/gone"));
    }

    #[test]
    fn test_thrown_values_become_execution_errors() {
        let unit = ScriptCompiler
            .compile("m", "throw 'nope';", &BINDING_NAMES)
            .unwrap();
        let err = unit
            .call(vec![Value::Undefined, Value::object(), Value::object()])
            .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::Execution(spacey_script::Error::Thrown(_))
        ));
        assert_eq!(err.to_string(), "Uncaught nope");
    }
}
