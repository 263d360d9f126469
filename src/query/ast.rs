use std::fmt;
use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    Lt,
    Gt,
}

impl Operator {
    /// Order in which a condition is searched for an operator.
    pub const PRIORITY: [Operator; 3] = [Operator::Eq, Operator::Lt, Operator::Gt];

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Lt => "<",
            Operator::Gt => ">",
        }
    }

    pub fn compare<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Operator::Eq => left == right,
            Operator::Lt => left < right,
            Operator::Gt => left > right,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `field op value`, with the literal kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: String,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Condition {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Combinator {
    And,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub conditions: Vec<Condition>,
    pub combinator: Option<Combinator>,
}

impl Query {
    pub fn single(condition: Condition) -> Self {
        Query {
            conditions: vec![condition],
            combinator: None,
        }
    }

    pub fn and(left: Condition, right: Condition) -> Self {
        Query {
            conditions: vec![left, right],
            combinator: Some(Combinator::And),
        }
    }
}
