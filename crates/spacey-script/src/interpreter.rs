//! Tree-walking interpreter.

use crate::Error;
use crate::ast::*;
use crate::value::{ObjectRef, Properties, Value};
use rustc_hash::FxHashMap;

/// A variable slot in the program scope.
#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    kind: VariableKind,
}

/// Executes a [`Program`] against a single flat scope.
///
/// Host values (such as a module's `require`, `module` and `exports`) are
/// injected with [`Interpreter::define`] before running.
#[derive(Debug, Default)]
pub struct Interpreter {
    scope: FxHashMap<String, Binding>,
}

impl Interpreter {
    /// Create an interpreter with an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a host binding, like a function parameter.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.scope.insert(
            name.into(),
            Binding {
                value,
                kind: VariableKind::Var,
            },
        );
    }

    /// Look up a binding by name.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.scope.get(name).map(|binding| binding.value.clone())
    }

    /// Run a program to completion.
    ///
    /// Returns the value of the last expression statement, or `undefined`.
    pub fn run(&mut self, program: &Program) -> Result<Value, Error> {
        let mut completion = Value::Undefined;
        for statement in &program.body {
            if let Some(value) = self.execute(statement)? {
                completion = value;
            }
        }
        Ok(completion)
    }

    fn execute(&mut self, statement: &Statement) -> Result<Option<Value>, Error> {
        match statement {
            Statement::VariableDeclaration(decl) => {
                self.declare(decl)?;
                Ok(None)
            }
            Statement::Expression(expression) => self.evaluate(expression).map(Some),
            Statement::Throw(argument) => Err(Error::Thrown(self.evaluate(argument)?)),
            Statement::Empty => Ok(None),
        }
    }

    fn declare(&mut self, decl: &VariableDeclaration) -> Result<(), Error> {
        if let Some(existing) = self.scope.get(&decl.name) {
            if decl.kind != VariableKind::Var || existing.kind != VariableKind::Var {
                return Err(Error::syntax(
                    format!("Identifier '{}' has already been declared", decl.name),
                    0,
                ));
            }
        }

        let value = match &decl.init {
            Some(init) => self.evaluate(init)?,
            // `var x;` keeps an existing value
            None => self.get(&decl.name).unwrap_or_default(),
        };

        self.scope.insert(
            decl.name.clone(),
            Binding {
                value,
                kind: decl.kind,
            },
        );
        Ok(())
    }

    fn evaluate(&mut self, expression: &Expression) -> Result<Value, Error> {
        match expression {
            Expression::Literal(literal) => Ok(match literal {
                Literal::Undefined => Value::Undefined,
                Literal::Null => Value::Null,
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
            }),
            Expression::Identifier(name) => self
                .get(name)
                .ok_or_else(|| Error::ReferenceError(format!("{} is not defined", name))),
            Expression::Object(properties) => {
                let mut props = Properties::default();
                for (key, value) in properties {
                    let value = self.evaluate(value)?;
                    props.insert(key.clone(), value);
                }
                Ok(Value::Object(ObjectRef::from_properties(props)))
            }
            Expression::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let key = self.property_key(&member.property)?;
                get_property(&object, &key)
            }
            Expression::Call(call) => {
                let callee = self.evaluate(&call.callee)?;
                let mut args = Vec::with_capacity(call.arguments.len());
                for argument in &call.arguments {
                    args.push(self.evaluate(argument)?);
                }
                match callee {
                    Value::Function(func) => func.call(&args),
                    other => Err(Error::type_error(format!(
                        "{} is not a function",
                        describe_callee(&call.callee, &other)
                    ))),
                }
            }
            Expression::Unary(operator, argument) => {
                let value = self.evaluate(argument)?;
                Ok(match operator {
                    UnaryOperator::Minus => Value::Number(-value.to_number()),
                    UnaryOperator::Not => Value::Boolean(!value.is_truthy()),
                    UnaryOperator::Typeof => Value::from(value.type_of()),
                })
            }
            Expression::Binary(binary) => {
                let left = self.evaluate(&binary.left)?;
                let right = self.evaluate(&binary.right)?;
                Ok(apply_binary(binary.operator, &left, &right))
            }
            Expression::Assignment(assignment) => self.assign(assignment),
        }
    }

    fn assign(&mut self, assignment: &AssignmentExpression) -> Result<Value, Error> {
        match &*assignment.target {
            Expression::Identifier(name) => {
                let Some(binding) = self.scope.get(name) else {
                    return Err(Error::ReferenceError(format!("{} is not defined", name)));
                };
                if binding.kind == VariableKind::Const {
                    return Err(Error::type_error("Assignment to constant variable."));
                }
                let current = binding.value.clone();
                let value = self.assigned_value(assignment, current)?;
                if let Some(binding) = self.scope.get_mut(name) {
                    binding.value = value.clone();
                }
                Ok(value)
            }
            Expression::Member(member) => {
                let object = self.evaluate(&member.object)?;
                let key = self.property_key(&member.property)?;
                let Value::Object(target) = &object else {
                    return Err(Error::type_error(format!(
                        "Cannot set properties of {} (setting '{}')",
                        object, key
                    )));
                };
                let current = target.get(&key).unwrap_or_default();
                let value = self.assigned_value(assignment, current)?;
                target.set(key, value.clone());
                Ok(value)
            }
            _ => Err(Error::syntax("Invalid left-hand side in assignment", 0)),
        }
    }

    fn assigned_value(
        &mut self,
        assignment: &AssignmentExpression,
        current: Value,
    ) -> Result<Value, Error> {
        let value = self.evaluate(&assignment.value)?;
        Ok(match assignment.operator {
            AssignmentOperator::Assign => value,
            AssignmentOperator::AddAssign => apply_binary(BinaryOperator::Add, &current, &value),
        })
    }

    fn property_key(&mut self, property: &MemberProperty) -> Result<String, Error> {
        match property {
            MemberProperty::Static(name) => Ok(name.clone()),
            MemberProperty::Computed(expression) => Ok(self.evaluate(expression)?.to_string()),
        }
    }
}

fn get_property(object: &Value, key: &str) -> Result<Value, Error> {
    match object {
        Value::Object(obj) => Ok(obj.get(key).unwrap_or_default()),
        Value::String(s) if key == "length" => Ok(Value::Number(s.chars().count() as f64)),
        Value::Function(func) if key == "name" => Ok(Value::from(func.name())),
        Value::Undefined | Value::Null => Err(Error::type_error(format!(
            "Cannot read properties of {} (reading '{}')",
            object, key
        ))),
        _ => Ok(Value::Undefined),
    }
}

fn apply_binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    match operator {
        BinaryOperator::Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Value::String(format!("{}{}", left, right))
            }
            _ => Value::Number(left.to_number() + right.to_number()),
        },
        BinaryOperator::Subtract => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Multiply => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Divide => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Modulo => Value::Number(left.to_number() % right.to_number()),
        BinaryOperator::StrictEqual => Value::Boolean(left == right),
        BinaryOperator::StrictNotEqual => Value::Boolean(left != right),
        BinaryOperator::Equal => Value::Boolean(loose_equals(left, right)),
        BinaryOperator::NotEqual => Value::Boolean(!loose_equals(left, right)),
    }
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (a, b) if a.is_nullish() && b.is_nullish() => true,
        (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_))
        | (Value::Boolean(_), _)
        | (_, Value::Boolean(_)) => {
            if left.is_nullish() || right.is_nullish() {
                false
            } else {
                left.to_number() == right.to_number()
            }
        }
        _ => left == right,
    }
}

fn describe_callee(callee: &Expression, value: &Value) -> String {
    match callee {
        Expression::Identifier(name) => name.clone(),
        Expression::Member(MemberExpression {
            property: MemberProperty::Static(name),
            ..
        }) => name.clone(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;

    fn run(source: &str) -> Result<Value, Error> {
        let program = Parser::new(source).parse_program()?;
        Interpreter::new().run(&program)
    }

    #[test]
    fn test_arithmetic_and_concatenation() {
        assert_eq!(run("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(run("(1 + 2) * 3").unwrap(), Value::Number(9.0));
        assert_eq!(run("7 % 4").unwrap(), Value::Number(3.0));
        assert_eq!(run("'a' + 1").unwrap(), Value::from("a1"));
        assert_eq!(run("-'3'").unwrap(), Value::Number(-3.0));
    }

    #[test]
    fn test_equality() {
        assert_eq!(run("1 === 1").unwrap(), Value::Boolean(true));
        assert_eq!(run("'1' == 1").unwrap(), Value::Boolean(true));
        assert_eq!(run("'1' === 1").unwrap(), Value::Boolean(false));
        assert_eq!(run("null == undefined").unwrap(), Value::Boolean(true));
        assert_eq!(run("null === undefined").unwrap(), Value::Boolean(false));
        assert_eq!(run("var o = {}; o === o").unwrap(), Value::Boolean(true));
        assert_eq!(run("({}) === ({})").unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_objects_are_shared() {
        let result = run("var a = { n: 1 }; var b = a; b.n += 1; a.n").unwrap();
        assert_eq!(result, Value::Number(2.0));

        let result = run("var o = {}; o['x' + 1] = 'y'; o.x1").unwrap();
        assert_eq!(result, Value::from("y"));
    }

    #[test]
    fn test_missing_property_is_undefined() {
        assert!(run("var o = {}; o.missing").unwrap().is_undefined());
        assert_eq!(run("'abc'.length").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_reference_and_type_errors() {
        assert!(matches!(run("nope"), Err(Error::ReferenceError(_))));
        assert!(matches!(run("nope = 1"), Err(Error::ReferenceError(_))));
        assert!(matches!(run("undefined.x"), Err(Error::TypeError(_))));
        assert!(matches!(run("var f = 1; f()"), Err(Error::TypeError(_))));
        assert!(matches!(run("const c = 1; c = 2"), Err(Error::TypeError(_))));
        assert!(matches!(
            run("let a = 1; let a = 2"),
            Err(Error::SyntaxError { .. })
        ));
        assert_eq!(run("var v = 1; var v; v").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_throw_carries_value() {
        match run("throw 'boom'") {
            Err(Error::Thrown(value)) => assert_eq!(value, Value::from("boom")),
            other => panic!("expected thrown value, got {:?}", other),
        }
    }

    #[test]
    fn test_host_bindings() {
        let program = Parser::new("exports.answer = twice(21); typeof twice")
            .parse_program()
            .unwrap();
        let exports = ObjectRef::new();

        let mut interpreter = Interpreter::new();
        interpreter.define("exports", Value::Object(exports.clone()));
        interpreter.define(
            "twice",
            Value::function("twice", |args| {
                Ok(Value::Number(
                    args.first().map(Value::to_number).unwrap_or(f64::NAN) * 2.0,
                ))
            }),
        );

        let result = interpreter.run(&program).unwrap();
        assert_eq!(result, Value::from("function"));
        assert_eq!(exports.get("answer"), Some(Value::Number(42.0)));
    }

    #[test]
    fn test_host_errors_pass_through() {
        let program = Parser::new("fail()").parse_program().unwrap();
        let mut interpreter = Interpreter::new();
        interpreter.define(
            "fail",
            Value::function("fail", |_| {
                Err(Error::host(std::io::Error::other("disk on fire")))
            }),
        );

        match interpreter.run(&program) {
            Err(Error::Host(err)) => assert_eq!(err.to_string(), "disk on fire"),
            other => panic!("expected host error, got {:?}", other),
        }
    }
}
