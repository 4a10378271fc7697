use crate::ast::{BlockStatement, CallExpression, Expression, Operator, Program, Statement};
use crate::environment::Environment;
use crate::object::{EvalError, Function, Object, Result};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::io::Write;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

// Reserved text values that make print perform a terminal action
// instead of literal output.
const CLEAR_SCREEN_COMMAND: &str = "CLEAR_SCREEN";
const NEWLINE_COMMAND: &str = "NEWLINE";
const SLEEP_PREFIX: &str = "SLEEP:";

/// How a statement finished: `Return` unwinds to the nearest function
/// call boundary (or ends the program at the top level).
#[derive(Debug)]
enum Flow {
    Normal(Object),
    Return(Object),
}

/// Tree-walking evaluator. Holds the global frame, so declarations
/// persist across `interpret` calls on the same instance.
pub struct Interpreter<'a> {
    globals: Environment,
    output: &'a mut dyn Write,
}

impl<'a> Interpreter<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Self {
            globals: Environment::new(),
            output,
        }
    }

    /// Evaluates a program against the global frame and yields the value
    /// of its last statement (Nil if the program is empty).
    pub fn interpret(&mut self, program: &Program) -> Result<Object> {
        let globals = self.globals.clone();
        let mut result = Object::Nil;

        for statement in program.statements.iter() {
            match self.execute_statement(statement, &globals)? {
                Flow::Normal(value) => result = value,
                Flow::Return(value) => return Ok(value),
            }
        }

        Ok(result)
    }

    fn execute_statement(&mut self, statement: &Statement, env: &Environment) -> Result<Flow> {
        match statement {
            Statement::VarDeclare(stmt) => {
                let value = self.evaluate_expression(&stmt.value, env)?;
                env.define_variable(&stmt.name, value.clone());
                Ok(Flow::Normal(value))
            }
            Statement::Assignment(stmt) => {
                let value = self.evaluate_expression(&stmt.value, env)?;
                env.set_variable(&stmt.name, value.clone())?;
                Ok(Flow::Normal(value))
            }
            Statement::ArrayAssignment(stmt) => {
                let target = env.get_variable(&stmt.name)?;
                let index = self.evaluate_expression(&stmt.index, env)?;
                let value = self.evaluate_expression(&stmt.value, env)?;
                let (elements, slot) = array_slot(&stmt.name, target, index)?;
                elements.borrow_mut()[slot] = value.clone();
                Ok(Flow::Normal(value))
            }
            Statement::FunctionDeclare(stmt) => {
                env.define_function(
                    &stmt.name,
                    Function {
                        parameters: stmt.parameters.clone(),
                        body: stmt.body.clone(),
                    },
                );
                Ok(Flow::Normal(Object::Nil))
            }
            Statement::If(stmt) => {
                let condition = self.evaluate_expression(&stmt.condition, env)?;
                if condition.truth_value() {
                    self.execute_block(&stmt.consequence, env)
                } else {
                    Ok(Flow::Normal(Object::Nil))
                }
            }
            Statement::While(stmt) => {
                let mut result = Object::Nil;
                while self.evaluate_expression(&stmt.condition, env)?.truth_value() {
                    match self.execute_block(&stmt.body, env)? {
                        Flow::Normal(value) => result = value,
                        returning => return Ok(returning),
                    }
                }
                Ok(Flow::Normal(result))
            }
            Statement::Print(stmt) => {
                let value = self.evaluate_expression(&stmt.value, env)?;
                self.print_value(&value);
                Ok(Flow::Normal(value))
            }
            Statement::Return(stmt) => {
                let value = match &stmt.return_value {
                    Some(expression) => self.evaluate_expression(expression, env)?,
                    None => Object::Nil,
                };
                Ok(Flow::Return(value))
            }
            Statement::Expr(stmt) => {
                Ok(Flow::Normal(self.evaluate_expression(&stmt.expression, env)?))
            }
        }
    }

    // Blocks run in the frame they appear in; only function calls open a
    // new frame.
    fn execute_block(&mut self, block: &BlockStatement, env: &Environment) -> Result<Flow> {
        let mut result = Object::Nil;

        for statement in block.statements.iter() {
            match self.execute_statement(statement, env)? {
                Flow::Normal(value) => result = value,
                returning => return Ok(returning),
            }
        }

        Ok(Flow::Normal(result))
    }

    fn evaluate_expression(&mut self, expression: &Expression, env: &Environment) -> Result<Object> {
        match expression {
            Expression::Identifier(name) => env.get_variable(name),
            Expression::IntegerLiteral(n) => Ok((*n).into()),
            Expression::FloatLiteral(x) => Ok((*x).into()),
            Expression::StringLiteral(s) => Ok(Object::String(s.clone())),
            Expression::Boolean(b) => Ok((*b).into()),
            Expression::Infix(infix) => {
                let left = self.evaluate_expression(&infix.left, env)?;
                let right = self.evaluate_expression(&infix.right, env)?;
                apply_infix(infix.operator, left, right)
            }
            Expression::Call(call) => self.execute_function_call(call, env),
            Expression::Array(array) => {
                let mut elements = Vec::with_capacity(array.elements.len());
                for element in array.elements.iter() {
                    elements.push(self.evaluate_expression(element, env)?);
                }
                Ok(elements.into())
            }
            Expression::Index(access) => {
                let target = env.get_variable(&access.name)?;
                let index = self.evaluate_expression(&access.index, env)?;
                let (elements, slot) = array_slot(&access.name, target, index)?;
                let value = elements.borrow()[slot].clone();
                Ok(value)
            }
        }
    }

    fn execute_function_call(&mut self, call: &CallExpression, env: &Environment) -> Result<Object> {
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in call.arguments.iter() {
            arguments.push(self.evaluate_expression(argument, env)?);
        }

        let function = env.get_function(&call.name)?;
        if arguments.len() != function.parameters.len() {
            return Err(EvalError::WrongArity {
                name: call.name.clone(),
                got: arguments.len(),
                want: function.parameters.len(),
            });
        }

        // The call frame is parented to the caller's active frame, not
        // the declaration site.
        let call_env = Environment::with_enclosing(env);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            call_env.define_variable(parameter, argument);
        }

        match self.execute_block(&function.body, &call_env)? {
            Flow::Normal(value) | Flow::Return(value) => Ok(value),
        }
    }

    fn print_value(&mut self, value: &Object) {
        match value {
            Object::String(text) => match text.as_str() {
                CLEAR_SCREEN_COMMAND => {
                    write!(self.output, "\x1b[2J\x1b[H").expect("couldn't write program output");
                    self.output.flush().expect("couldn't write program output");
                }
                NEWLINE_COMMAND => {
                    writeln!(self.output).expect("couldn't write program output");
                }
                text if text.starts_with(SLEEP_PREFIX) => {
                    let seconds: f64 = text[SLEEP_PREFIX.len()..].parse().unwrap_or(0.0);
                    if seconds.is_finite() && seconds > 0.0 {
                        thread::sleep(Duration::from_secs_f64(seconds));
                    }
                }
                text => {
                    write!(self.output, "{}", text).expect("couldn't write program output");
                    self.output.flush().expect("couldn't write program output");
                }
            },
            value => {
                write!(self.output, "{}", value).expect("couldn't write program output");
                self.output.flush().expect("couldn't write program output");
            }
        }
    }
}

fn array_slot(
    name: &str,
    target: Object,
    index: Object,
) -> Result<(Rc<RefCell<Vec<Object>>>, usize)> {
    let elements = match target {
        Object::Array(elements) => elements,
        other => {
            return Err(EvalError::NotIndexable {
                name: name.to_owned(),
                type_name: other.type_name(),
            })
        }
    };
    let index = match index {
        Object::Integer(index) => index,
        other => {
            return Err(EvalError::IndexNotInteger {
                name: name.to_owned(),
                type_name: other.type_name(),
            })
        }
    };
    let length = elements.borrow().len();
    if index < 0 || index as usize >= length {
        return Err(EvalError::IndexOutOfBounds {
            name: name.to_owned(),
            index,
            length,
        });
    }
    Ok((elements, index as usize))
}

enum NumericPair {
    Integers(i64, i64),
    Floats(f64, f64),
}

// Mixed integer/float operands promote to floats.
fn numeric_pair(left: &Object, right: &Object) -> Option<NumericPair> {
    match (left, right) {
        (Object::Integer(a), Object::Integer(b)) => Some(NumericPair::Integers(*a, *b)),
        (Object::Float(a), Object::Float(b)) => Some(NumericPair::Floats(*a, *b)),
        (Object::Integer(a), Object::Float(b)) => Some(NumericPair::Floats(*a as f64, *b)),
        (Object::Float(a), Object::Integer(b)) => Some(NumericPair::Floats(*a, *b as f64)),
        _ => None,
    }
}

fn apply_infix(operator: Operator, left: Object, right: Object) -> Result<Object> {
    match operator {
        Operator::Plus => eval_plus(left, right),
        Operator::Minus => match numeric_pair(&left, &right) {
            Some(NumericPair::Integers(a, b)) => Ok((a - b).into()),
            Some(NumericPair::Floats(a, b)) => Ok((a - b).into()),
            None => Err(type_mismatch(operator, &left, &right)),
        },
        Operator::Asterisk => match numeric_pair(&left, &right) {
            Some(NumericPair::Integers(a, b)) => Ok((a * b).into()),
            Some(NumericPair::Floats(a, b)) => Ok((a * b).into()),
            None => Err(type_mismatch(operator, &left, &right)),
        },
        Operator::Slash | Operator::Percent => eval_division(operator, left, right),
        Operator::Eq => Ok(objects_equal(&left, &right).into()),
        Operator::NotEq => Ok((!objects_equal(&left, &right)).into()),
        Operator::GT | Operator::LT | Operator::GTEq | Operator::LTEq => {
            eval_ordering(operator, left, right)
        }
    }
}

fn eval_plus(left: Object, right: Object) -> Result<Object> {
    match (&left, &right) {
        // text concatenation wins over every other interpretation
        (Object::String(_), _) | (_, Object::String(_)) => {
            Ok(Object::String(format!("{}{}", left, right)))
        }
        (Object::Array(a), Object::Array(b)) => {
            let mut elements = a.borrow().clone();
            elements.extend(b.borrow().iter().cloned());
            Ok(elements.into())
        }
        _ => match numeric_pair(&left, &right) {
            Some(NumericPair::Integers(a, b)) => Ok((a + b).into()),
            Some(NumericPair::Floats(a, b)) => Ok((a + b).into()),
            None => Err(type_mismatch(Operator::Plus, &left, &right)),
        },
    }
}

// The zero check covers both integer and float right operands and runs
// before any computation.
fn eval_division(operator: Operator, left: Object, right: Object) -> Result<Object> {
    if is_numeric_zero(&right) {
        return Err(EvalError::DivisionByZero);
    }
    match numeric_pair(&left, &right) {
        Some(NumericPair::Integers(a, b)) => Ok(match operator {
            Operator::Percent => floored_rem(a, b),
            _ => floored_div(a, b),
        }
        .into()),
        Some(NumericPair::Floats(a, b)) => Ok(match operator {
            Operator::Percent => a - b * (a / b).floor(),
            _ => a / b,
        }
        .into()),
        None => Err(type_mismatch(operator, &left, &right)),
    }
}

fn eval_ordering(operator: Operator, left: Object, right: Object) -> Result<Object> {
    let ordering = match (&left, &right) {
        (Object::String(a), Object::String(b)) => a.cmp(b),
        _ => match numeric_pair(&left, &right) {
            Some(NumericPair::Integers(a, b)) => a.cmp(&b),
            Some(NumericPair::Floats(a, b)) => match a.partial_cmp(&b) {
                Some(ordering) => ordering,
                // comparisons against NaN are never true
                None => return Ok(false.into()),
            },
            None => return Err(type_mismatch(operator, &left, &right)),
        },
    };

    Ok(match operator {
        Operator::LT => ordering == Ordering::Less,
        Operator::GT => ordering == Ordering::Greater,
        Operator::LTEq => ordering != Ordering::Greater,
        _ => ordering != Ordering::Less, // GTEq
    }
    .into())
}

// Structural equality; integers and floats compare numerically and
// arrays compare element-wise.
fn objects_equal(left: &Object, right: &Object) -> bool {
    match (left, right) {
        (Object::Integer(a), Object::Integer(b)) => a == b,
        (Object::Float(a), Object::Float(b)) => a == b,
        (Object::Integer(a), Object::Float(b)) | (Object::Float(b), Object::Integer(a)) => {
            *a as f64 == *b
        }
        (Object::String(a), Object::String(b)) => a == b,
        (Object::Boolean(a), Object::Boolean(b)) => a == b,
        (Object::Nil, Object::Nil) => true,
        (Object::Array(a), Object::Array(b)) => {
            Rc::ptr_eq(a, b) || {
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| objects_equal(x, y))
            }
        }
        _ => false,
    }
}

fn type_mismatch(operator: Operator, left: &Object, right: &Object) -> EvalError {
    EvalError::TypeMismatch {
        left: left.type_name(),
        operator,
        right: right.type_name(),
    }
}

fn is_numeric_zero(value: &Object) -> bool {
    match value {
        Object::Integer(n) => *n == 0,
        Object::Float(x) => *x == 0.0,
        _ => false,
    }
}

// Integer division and modulo round toward negative infinity, so the
// remainder takes the divisor's sign.
fn floored_div(a: i64, b: i64) -> i64 {
    let quotient = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient - 1
    } else {
        quotient
    }
}

fn floored_rem(a: i64, b: i64) -> i64 {
    let remainder = a % b;
    if remainder != 0 && (remainder < 0) != (b < 0) {
        remainder + b
    } else {
        remainder
    }
}
