use crate::core::config::{IndexConfig, IndexedField};
use crate::core::types::IndexKind;
use crate::query::ast::{Combinator, Condition, Operator, Query};

/// Key looked up in an index, typed by the index kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Text(String),
    Integer(i64),
}

/// Logical execution plan
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// Exact key lookup in the field's index.
    IndexSeek { field: IndexedField, key: IndexKey },
    /// Walk an Integer index's keys, keeping those that compare true against `bound`.
    IndexRange { field: IndexedField, op: Operator, bound: i64 },
    /// Parallel evaluation of the condition over every record.
    Scan { condition: Condition },
    /// Nothing can match.
    Empty,
    Intersection { inputs: Vec<LogicalPlan> },
}

/// Chooses between index access and a linear scan for each condition.
pub struct QueryPlanner<'a> {
    pub config: &'a IndexConfig,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(config: &'a IndexConfig) -> Self {
        QueryPlanner { config }
    }

    /// `None` when the query shape is not supported (3+ conditions).
    pub fn plan(&self, query: &Query) -> Option<LogicalPlan> {
        match (query.conditions.as_slice(), query.combinator) {
            ([condition], _) => Some(self.plan_condition(condition)),
            ([left, right], Some(Combinator::And)) => Some(LogicalPlan::Intersection {
                inputs: vec![self.plan_condition(left), self.plan_condition(right)],
            }),
            _ => None,
        }
    }

    pub fn plan_condition(&self, condition: &Condition) -> LogicalPlan {
        let Some(field) = self.config.resolve(&condition.field) else {
            return scan(condition);
        };

        match (field.kind, condition.op) {
            (IndexKind::String | IndexKind::Date, Operator::Eq) => LogicalPlan::IndexSeek {
                field: field.clone(),
                key: IndexKey::Text(condition.value.clone()),
            },
            (IndexKind::String | IndexKind::Date, _) => scan(condition),
            (IndexKind::Integer, op) => match condition.value.trim().parse::<i64>() {
                Err(_) => LogicalPlan::Empty,
                Ok(bound) if op == Operator::Eq => LogicalPlan::IndexSeek {
                    field: field.clone(),
                    key: IndexKey::Integer(bound),
                },
                Ok(bound) => LogicalPlan::IndexRange {
                    field: field.clone(),
                    op,
                    bound,
                },
            },
        }
    }
}

fn scan(condition: &Condition) -> LogicalPlan {
    LogicalPlan::Scan {
        condition: condition.clone(),
    }
}
