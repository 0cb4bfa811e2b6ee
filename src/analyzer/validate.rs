//! Top level query shape check

use crate::ast::SyntaxTree;
use crate::error::{AnalyzerError, AnalyzerResult};

/// Returns the node that is actually compiled.
///
/// SELECT and SELECT ... UNION pass through untouched, a subquery is
/// replaced by its child, anything else is rejected. The unwrapped child is
/// not validated again here; the query tree builder rejects a bad one.
pub fn normalize_and_validate(query: &SyntaxTree) -> AnalyzerResult<&SyntaxTree> {
    match query {
        SyntaxTree::SelectWithUnionQuery { .. } | SyntaxTree::SelectQuery(_) => Ok(query),
        SyntaxTree::Subquery { child } => Ok(child.as_ref()),
        other => Err(AnalyzerError::unsupported_shape(
            other.format_for_error_message(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{SelectQuery, UnionMode};
    use crate::types::Value;

    fn select_one() -> SyntaxTree {
        SelectQuery::new()
            .column(SyntaxTree::literal(Value::UInt(1)))
            .into_tree()
    }

    #[test]
    fn test_select_passes_through() {
        let query = select_one();
        let validated = normalize_and_validate(&query).unwrap();
        assert!(std::ptr::eq(validated, &query));
    }

    #[test]
    fn test_union_passes_through() {
        let query = SyntaxTree::union(UnionMode::All, vec![select_one(), select_one()]);
        let validated = normalize_and_validate(&query).unwrap();
        assert!(std::ptr::eq(validated, &query));
    }

    #[test]
    fn test_subquery_is_unwrapped() {
        let query = SyntaxTree::subquery(select_one());
        let validated = normalize_and_validate(&query).unwrap();

        let SyntaxTree::Subquery { child } = &query else {
            unreachable!()
        };
        assert!(std::ptr::eq(validated, child.as_ref()));
    }

    #[test]
    fn test_other_kinds_rejected() {
        let rejected = [
            SyntaxTree::ShowTables { database: None },
            SyntaxTree::identifier("x"),
            SyntaxTree::InsertQuery {
                table: "t".into(),
                select: Some(Box::new(select_one())),
            },
        ];

        for query in rejected {
            let err = normalize_and_validate(&query).unwrap_err();
            assert_eq!(err.code(), "AERO_QUERY_UNSUPPORTED_SHAPE");
            assert!(err.to_string().contains(&query.to_string()));
        }
    }
}
