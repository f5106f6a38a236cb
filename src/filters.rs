//! Closed operator and sort-key types for sock queries.
//!
//! Both are resolved once at the request boundary; the query layer never
//! sees raw strings.

use crate::entities::sock;
use crate::errors::ServiceError;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::ColumnTrait;
use std::str::FromStr;

/// Operator names accepted by the aggregate-amount endpoint.
pub const MORE_THAN_OPERATION: &str = "moreThan";
pub const LESS_THAN_OPERATION: &str = "lessThan";
pub const EQUAL_OPERATION: &str = "equal";

/// Comparison applied to the cotton percentage in aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    MoreThan,
    LessThan,
    Equal,
}

impl FromStr for ComparisonOperator {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MORE_THAN_OPERATION => Ok(Self::MoreThan),
            LESS_THAN_OPERATION => Ok(Self::LessThan),
            EQUAL_OPERATION => Ok(Self::Equal),
            other => Err(ServiceError::InvalidOperator(other.to_string())),
        }
    }
}

impl ComparisonOperator {
    /// Builds the cotton-percentage predicate for this operator.
    pub fn cotton_condition(self, threshold: i32) -> SimpleExpr {
        match self {
            Self::MoreThan => sock::Column::CottonPercentage.gt(threshold),
            Self::LessThan => sock::Column::CottonPercentage.lt(threshold),
            Self::Equal => sock::Column::CottonPercentage.eq(threshold),
        }
    }
}

/// Sort key for the filtered listing endpoint. Parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Color,
    Cotton,
}

impl FromStr for SortKey {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("color") {
            Ok(Self::Color)
        } else if s.eq_ignore_ascii_case("cotton") {
            Ok(Self::Cotton)
        } else {
            Err(ServiceError::InvalidSort(s.to_string()))
        }
    }
}

impl SortKey {
    pub fn column(self) -> sock::Column {
        match self {
            Self::Color => sock::Column::Color,
            Self::Cotton => sock::Column::CottonPercentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_operators() {
        assert_eq!(
            "moreThan".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::MoreThan
        );
        assert_eq!(
            "lessThan".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::LessThan
        );
        assert_eq!(
            "equal".parse::<ComparisonOperator>().unwrap(),
            ComparisonOperator::Equal
        );
    }

    #[test]
    fn operator_names_are_case_sensitive() {
        assert!(matches!(
            "MoreThan".parse::<ComparisonOperator>(),
            Err(ServiceError::InvalidOperator(_))
        ));
        assert!(matches!(
            ">".parse::<ComparisonOperator>(),
            Err(ServiceError::InvalidOperator(_))
        ));
    }

    #[test]
    fn sort_key_is_case_insensitive() {
        assert_eq!("COLOR".parse::<SortKey>().unwrap(), SortKey::Color);
        assert_eq!("Cotton".parse::<SortKey>().unwrap(), SortKey::Cotton);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        assert!(matches!(
            "amount".parse::<SortKey>(),
            Err(ServiceError::InvalidSort(_))
        ));
    }
}
