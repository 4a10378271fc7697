use crate::object::{EvalError, Function, Object, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One level of the scope chain. Cloning an `Environment` clones the
/// handle, not the frame, so call frames can share their parent chain.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    frame: Rc<RefCell<Frame>>,
}

#[derive(Debug, Default)]
struct Frame {
    variables: HashMap<String, Object>,
    functions: HashMap<String, Rc<Function>>,
    parent: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_enclosing(outer: &Environment) -> Self {
        Self {
            frame: Rc::new(RefCell::new(Frame {
                variables: HashMap::new(),
                functions: HashMap::new(),
                parent: Some(outer.clone()),
            })),
        }
    }

    /// Creates the binding in this frame, shadowing any outer one.
    pub fn define_variable(&self, name: &str, value: Object) {
        self.frame
            .borrow_mut()
            .variables
            .insert(name.to_owned(), value);
    }

    pub fn get_variable(&self, name: &str) -> Result<Object> {
        let frame = self.frame.borrow();
        if let Some(value) = frame.variables.get(name) {
            return Ok(value.clone());
        }
        match &frame.parent {
            Some(parent) => parent.get_variable(name),
            None => Err(EvalError::UndefinedVariable {
                name: name.to_owned(),
            }),
        }
    }

    /// Updates the nearest existing binding; never creates one.
    pub fn set_variable(&self, name: &str, value: Object) -> Result<()> {
        let mut frame = self.frame.borrow_mut();
        if let Some(slot) = frame.variables.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &frame.parent {
            Some(parent) => parent.set_variable(name, value),
            None => Err(EvalError::UndefinedVariable {
                name: name.to_owned(),
            }),
        }
    }

    pub fn define_function(&self, name: &str, function: Function) {
        self.frame
            .borrow_mut()
            .functions
            .insert(name.to_owned(), Rc::new(function));
    }

    pub fn get_function(&self, name: &str) -> Result<Rc<Function>> {
        let frame = self.frame.borrow();
        if let Some(function) = frame.functions.get(name) {
            return Ok(Rc::clone(function));
        }
        match &frame.parent {
            Some(parent) => parent.get_function(name),
            None => Err(EvalError::UndefinedFunction {
                name: name.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::BlockStatement;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define_variable("x", Object::Integer(5));

        assert_eq!(env.get_variable("x"), Ok(Object::Integer(5)));
        assert_eq!(
            env.get_variable("y"),
            Err(EvalError::UndefinedVariable {
                name: "y".to_owned()
            })
        );
    }

    #[test]
    fn test_lookup_walks_the_chain() {
        let outer = Environment::new();
        outer.define_variable("x", Object::Integer(1));
        let inner = Environment::with_enclosing(&outer);

        assert_eq!(inner.get_variable("x"), Ok(Object::Integer(1)));
    }

    #[test]
    fn test_shadowing_leaves_outer_binding() {
        let outer = Environment::new();
        outer.define_variable("x", Object::Integer(1));

        let inner = Environment::with_enclosing(&outer);
        inner.define_variable("x", Object::Integer(2));

        assert_eq!(inner.get_variable("x"), Ok(Object::Integer(2)));
        assert_eq!(outer.get_variable("x"), Ok(Object::Integer(1)));
    }

    #[test]
    fn test_set_mutates_nearest_binding() {
        let outer = Environment::new();
        outer.define_variable("x", Object::Integer(1));
        let inner = Environment::with_enclosing(&outer);

        inner.set_variable("x", Object::Integer(7)).expect("set failed");

        assert_eq!(outer.get_variable("x"), Ok(Object::Integer(7)));
    }

    #[test]
    fn test_set_never_creates() {
        let env = Environment::new();
        assert_eq!(
            env.set_variable("missing", Object::Nil),
            Err(EvalError::UndefinedVariable {
                name: "missing".to_owned()
            })
        );
    }

    #[test]
    fn test_functions_have_their_own_table() {
        let env = Environment::new();
        env.define_variable("f", Object::Integer(1));

        assert_eq!(
            env.get_function("f").unwrap_err(),
            EvalError::UndefinedFunction {
                name: "f".to_owned()
            }
        );

        env.define_function(
            "f",
            Function {
                parameters: vec![],
                body: BlockStatement { statements: vec![] },
            },
        );
        assert!(env.get_function("f").is_ok());
        assert_eq!(env.get_variable("f"), Ok(Object::Integer(1)));
    }
}
