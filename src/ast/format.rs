//! SQL-like rendering of syntax trees for diagnostics

use std::fmt;

use super::node::{SelectQuery, SyntaxTree};

fn write_list(f: &mut fmt::Formatter<'_>, items: &[SyntaxTree]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT ")?;
        write_list(f, &self.projection)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {}", from)?;
        }
        if let Some(predicate) = &self.where_clause {
            write!(f, " WHERE {}", predicate)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        Ok(())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxTree::SelectWithUnionQuery { union_mode, selects } => {
                for (i, select) in selects.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", union_mode.as_str())?;
                    }
                    write!(f, "{}", select)?;
                }
                Ok(())
            }
            SyntaxTree::SelectQuery(select) => write!(f, "{}", select),
            SyntaxTree::Subquery { child } => write!(f, "({})", child),
            SyntaxTree::ExpressionList { items } => write_list(f, items),
            SyntaxTree::Identifier { name } => write!(f, "{}", name),
            SyntaxTree::Asterisk => write!(f, "*"),
            SyntaxTree::Literal { value } => write!(f, "{}", value),
            SyntaxTree::Function { name, arguments } => {
                write!(f, "{}(", name)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            SyntaxTree::Alias { expr, alias } => write!(f, "{} AS {}", expr, alias),
            SyntaxTree::TableIdentifier { database, table } => match database {
                Some(db) => write!(f, "{}.{}", db, table),
                None => write!(f, "{}", table),
            },
            SyntaxTree::InsertQuery { table, select } => {
                write!(f, "INSERT INTO {}", table)?;
                if let Some(select) = select {
                    write!(f, " {}", select)?;
                }
                Ok(())
            }
            SyntaxTree::ShowTables { database } => match database {
                Some(db) => write!(f, "SHOW TABLES FROM {}", db),
                None => write!(f, "SHOW TABLES"),
            },
        }
    }
}
