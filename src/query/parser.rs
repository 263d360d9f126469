use tracing::debug;
use crate::query::ast::{Combinator, Condition, Operator, Query};

/// Parser for `[WHERE ]<field><op><value>[ AND <field><op><value>]`.
#[derive(Debug)]
pub struct QueryParser {
    pub keyword: String,
    pub conjunction: String,
}

impl Default for QueryParser {
    fn default() -> Self {
        QueryParser {
            keyword: "WHERE ".to_string(),
            conjunction: " AND ".to_string(),
        }
    }
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. `None` means no condition could be extracted.
    ///
    /// Keywords are case-sensitive. Conditions without an operator are dropped,
    /// so the returned query may hold fewer conditions than the input had terms.
    /// Three or more conditions are returned as-is; rejecting them is the
    /// planner's job.
    pub fn parse(&self, input: &str) -> Option<Query> {
        let trimmed = input.trim();
        let body = trimmed.strip_prefix(self.keyword.as_str()).unwrap_or(trimmed).trim();

        let query = if body.contains(self.conjunction.as_str()) {
            Query {
                conditions: body
                    .split(self.conjunction.as_str())
                    .filter_map(|part| parse_condition(part.trim()))
                    .collect(),
                combinator: Some(Combinator::And),
            }
        } else {
            Query {
                conditions: parse_condition(body).into_iter().collect(),
                combinator: None,
            }
        };

        if query.conditions.is_empty() {
            debug!(input, "no condition found");
            return None;
        }
        Some(query)
    }
}

/// Split at the first occurrence of the highest-priority operator present.
fn parse_condition(text: &str) -> Option<Condition> {
    Operator::PRIORITY.into_iter().find_map(|op| {
        let (field, value) = text.split_once(op.symbol())?;
        Some(Condition {
            field: field.trim().to_string(),
            op,
            value: strip_quotes(value.trim()).to_string(),
        })
    })
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == '\'' || c == '"')
}
