//! Tag filter predicate tree
//!
//! Defines the closed set of predicate nodes a parsed WHERE clause
//! reduces to. The evaluator matches on these exhaustively, so adding a
//! variant forces every consumer to handle it at compile time.

use std::fmt;

/// Logical operator joining two predicate subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Both sides must match
    And,
    /// Either side may match
    Or,
}

/// A node in a tag filter expression
///
/// Leaf kinds (`Equals`, `Like`, `Regex`, `In`) each carry a tag key and
/// are resolved directly by the index gateway. `Not` and `Binary` are
/// decomposed by the evaluator; `Not` only supports a single-key leaf
/// inner predicate (composite negation is rejected, not expanded).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Exact tag value match: key = value
    Equals {
        /// Tag key
        key: String,
        /// Tag value
        value: String,
    },

    /// Wildcard match: key like pattern, with `*` matching any run of characters
    Like {
        /// Tag key
        key: String,
        /// Wildcard pattern
        pattern: String,
    },

    /// Regular expression match: key =~ pattern
    Regex {
        /// Tag key
        key: String,
        /// Regex pattern
        pattern: String,
    },

    /// Membership match: key in (values...)
    In {
        /// Tag key
        key: String,
        /// Candidate values
        values: Vec<String>,
    },

    /// Negation of a single-key leaf predicate
    Not(Box<Predicate>),

    /// AND/OR of two subtrees
    Binary {
        /// Joining operator
        op: BinaryOp,
        /// Left subtree, always evaluated first
        left: Box<Predicate>,
        /// Right subtree, skipped entirely if the left fails
        right: Box<Predicate>,
    },
}

impl Predicate {
    /// Create an exact match predicate
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::Equals {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a wildcard match predicate
    pub fn like(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::Like {
            key: key.into(),
            pattern: pattern.into(),
        }
    }

    /// Create a regex match predicate
    pub fn regex(key: impl Into<String>, pattern: impl Into<String>) -> Self {
        Predicate::Regex {
            key: key.into(),
            pattern: pattern.into(),
        }
    }

    /// Create a membership predicate
    pub fn in_values<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::In {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Negate a predicate
    pub fn negate(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// AND two predicates
    pub fn and(left: Predicate, right: Predicate) -> Self {
        Predicate::Binary {
            op: BinaryOp::And,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// OR two predicates
    pub fn or(left: Predicate, right: Predicate) -> Self {
        Predicate::Binary {
            op: BinaryOp::Or,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True for the four leaf kinds the gateway resolves directly
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Predicate::Equals { .. }
                | Predicate::Like { .. }
                | Predicate::Regex { .. }
                | Predicate::In { .. }
        )
    }

    /// The tag key of a leaf predicate, `None` for `Not`/`Binary` nodes
    pub fn tag_key(&self) -> Option<&str> {
        match self {
            Predicate::Equals { key, .. }
            | Predicate::Like { key, .. }
            | Predicate::Regex { key, .. }
            | Predicate::In { key, .. } => Some(key),
            Predicate::Not(_) | Predicate::Binary { .. } => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::And => write!(f, "AND"),
            BinaryOp::Or => write!(f, "OR"),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals { key, value } => write!(f, "{}='{}'", key, value),
            Predicate::Like { key, pattern } => write!(f, "{} like '{}'", key, pattern),
            Predicate::Regex { key, pattern } => write!(f, "{}=~'{}'", key, pattern),
            Predicate::In { key, values } => {
                let quoted: Vec<_> = values.iter().map(|v| format!("'{}'", v)).collect();
                write!(f, "{} in ({})", key, quoted.join(","))
            }
            Predicate::Not(inner) => write!(f, "NOT {}", inner),
            Predicate::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
