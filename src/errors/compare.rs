use std::fmt::{self, Display};

/// 比较运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    GreaterOrEqual,
    LessOrEqual,
    GreaterThan,
    LessThan,
}

impl ComparisonOperator {
    /// `lhs <op> rhs`是否成立（NaN 一律不成立）
    pub fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            ComparisonOperator::GreaterOrEqual => lhs >= rhs,
            ComparisonOperator::LessOrEqual => lhs <= rhs,
            ComparisonOperator::GreaterThan => lhs > rhs,
            ComparisonOperator::LessThan => lhs < rhs,
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ComparisonOperator::GreaterOrEqual => "≥",
            ComparisonOperator::LessOrEqual => "≤",
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::LessThan => "<",
        };
        f.write_str(symbol)
    }
}
