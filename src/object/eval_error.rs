use crate::ast;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    UndefinedVariable{name: String} = "undefined variable: {name}",
    UndefinedFunction{name: String} = "undefined function: {name}",
    TypeMismatch{left: &'static str, operator: ast::Operator, right: &'static str} = "cannot apply {operator} to {left} and {right}",
    DivisionByZero = "division by zero",
    WrongArity{name: String, got: usize, want: usize} = "wrong number of arguments to {name}: got {got}, want {want}",
    NotIndexable{name: String, type_name: &'static str} = "cannot index into {name}, which holds {type_name}",
    IndexNotInteger{name: String, type_name: &'static str} = "index into {name} must be an integer, got {type_name}",
    IndexOutOfBounds{name: String, index: i64, length: usize} = "index {index} out of bounds for {name} (length {length})",
}
