mod expression;
mod statement;
pub use expression::*;
pub use statement::*;

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                write!(f, "\n")?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let program = Program {
            statements: vec![Statement::VarDeclare(VarDeclareStatement {
                name: "ねこ".to_owned(),
                value: Expression::Identifier("x".to_owned()),
            })],
        };

        assert_eq!(format!("{}", program), "にゃー ねこ みゃーみゃー x");
    }
}
