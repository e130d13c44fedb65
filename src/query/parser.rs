use crate::utils::normalize_text;
use std::fmt;

/// Parsed query representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub root: QueryNode,
}

/// Query AST node. A well-formed binary tree; `Empty` only appears as the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// Normalized literal term
    Term(String),
    /// Both sides must match
    And(Box<QueryNode>, Box<QueryNode>),
    /// Either side may match
    Or(Box<QueryNode>, Box<QueryNode>),
    /// Matches no image
    Empty,
}

/// Boolean joins recognised between terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    And,
    Or,
}

impl Operator {
    fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Operator::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Operator::Or)
        } else {
            None
        }
    }

    fn combine(self, left: QueryNode, right: QueryNode) -> QueryNode {
        match self {
            Operator::And => QueryNode::And(Box::new(left), Box::new(right)),
            Operator::Or => QueryNode::Or(Box::new(left), Box::new(right)),
        }
    }
}

/// Parse a query string into a Query structure.
///
/// Never fails. Terms fold strictly left to right: `a AND b OR c` is
/// `(a AND b) OR c`, and adjacent terms without a keyword are OR'd. A
/// keyword with nothing to join (leading, trailing or doubled) is searched
/// for as an ordinary word and OR'd in. A query made only of keywords or
/// punctuation matches nothing.
pub fn parse_query(input: &str) -> Query {
    let parser = QueryParser::new(input);
    parser.parse()
}

/// Query parser
struct QueryParser<'a> {
    input: &'a str,
    root: Option<QueryNode>,
    /// Keyword waiting for its right-hand term, with the word as typed
    pending: Option<(Operator, &'a str)>,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            root: None,
            pending: None,
        }
    }

    fn parse(mut self) -> Query {
        let input = self.input;
        let words: Vec<&'a str> = input
            .split_whitespace()
            .filter(|w| !normalize_text(w).is_empty())
            .collect();

        if words.iter().all(|w| Operator::from_word(w).is_some()) {
            return Query {
                root: QueryNode::Empty,
            };
        }

        for word in words {
            match Operator::from_word(word) {
                Some(op) if self.root.is_some() && self.pending.is_none() => {
                    self.pending = Some((op, word));
                }
                Some(_) => self.push_term(word, Operator::Or),
                None => {
                    let op = self.pending.take().map_or(Operator::Or, |(op, _)| op);
                    self.push_term(word, op);
                }
            }
        }

        if let Some((_, word)) = self.pending.take() {
            self.push_term(word, Operator::Or);
        }

        Query {
            root: self.root.unwrap_or(QueryNode::Empty),
        }
    }

    fn push_term(&mut self, word: &str, op: Operator) {
        let term = QueryNode::Term(normalize_text(word));
        self.root = Some(match self.root.take() {
            Some(left) => op.combine(left, term),
            None => term,
        });
    }
}

impl QueryNode {
    /// Distinct terms in first-appearance order
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'n>(&'n self, out: &mut Vec<&'n str>) {
        match self {
            QueryNode::Term(t) => {
                if !out.contains(&t.as_str()) {
                    out.push(t);
                }
            }
            QueryNode::And(l, r) | QueryNode::Or(l, r) => {
                l.collect_terms(out);
                r.collect_terms(out);
            }
            QueryNode::Empty => {}
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(t) => write!(f, "{}", t),
            QueryNode::And(l, r) => write!(f, "({} AND {})", l, r),
            QueryNode::Or(l, r) => write!(f, "({} OR {})", l, r),
            QueryNode::Empty => write!(f, "<empty>"),
        }
    }
}

impl Query {
    /// Check if query can match nothing by construction
    pub fn is_empty(&self) -> bool {
        matches!(self.root, QueryNode::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(t: &str) -> QueryNode {
        QueryNode::Term(t.to_string())
    }

    fn and(l: QueryNode, r: QueryNode) -> QueryNode {
        QueryNode::And(Box::new(l), Box::new(r))
    }

    fn or(l: QueryNode, r: QueryNode) -> QueryNode {
        QueryNode::Or(Box::new(l), Box::new(r))
    }

    #[test]
    fn test_simple_query() {
        let q = parse_query("Invoice");
        assert_eq!(q.root, term("invoice"));
    }

    #[test]
    fn test_implicit_or() {
        let q = parse_query("meeting task");
        assert_eq!(q.root, or(term("meeting"), term("task")));
    }

    #[test]
    fn test_explicit_and() {
        let q = parse_query("budget AND 2025");
        assert_eq!(q.root, and(term("budget"), term("2025")));
    }

    #[test]
    fn test_explicit_or() {
        let q = parse_query("meeting OR task");
        assert_eq!(q.root, or(term("meeting"), term("task")));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(parse_query("a and b").root, and(term("a"), term("b")));
        assert_eq!(parse_query("a Or b").root, or(term("a"), term("b")));
    }

    #[test]
    fn test_left_to_right_folding() {
        let q = parse_query("a AND b OR c");
        assert_eq!(q.root, or(and(term("a"), term("b")), term("c")));

        let q = parse_query("a OR b AND c");
        assert_eq!(q.root, and(or(term("a"), term("b")), term("c")));

        let q = parse_query("a b AND c");
        assert_eq!(q.root, and(or(term("a"), term("b")), term("c")));
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("   \t ").is_empty());
    }

    #[test]
    fn test_keywords_only_is_empty() {
        assert!(parse_query("AND").is_empty());
        assert!(parse_query("or").is_empty());
        assert!(parse_query("AND OR and").is_empty());
    }

    #[test]
    fn test_punctuation_only_is_empty() {
        assert!(parse_query("... -- !!").is_empty());
        assert!(parse_query("& AND").is_empty());
    }

    #[test]
    fn test_leading_keyword_is_term() {
        let q = parse_query("AND invoice");
        assert_eq!(q.root, or(term("and"), term("invoice")));
    }

    #[test]
    fn test_trailing_keyword_is_term() {
        let q = parse_query("invoice AND");
        assert_eq!(q.root, or(term("invoice"), term("and")));
    }

    #[test]
    fn test_doubled_keyword_keeps_first_operator() {
        let q = parse_query("a AND OR b");
        assert_eq!(q.root, and(or(term("a"), term("or")), term("b")));
    }

    #[test]
    fn test_terms_are_normalized() {
        let q = parse_query("Invoice, AND (Total)");
        assert_eq!(q.root, and(term("invoice"), term("total")));
    }

    #[test]
    fn test_punctuation_word_does_not_consume_operator() {
        let q = parse_query("a AND -- b");
        assert_eq!(q.root, and(term("a"), term("b")));
    }

    #[test]
    fn test_distinct_terms() {
        let q = parse_query("task OR meeting AND task");
        assert_eq!(q.root.terms(), vec!["task", "meeting"]);
        assert!(QueryNode::Empty.terms().is_empty());
    }

    #[test]
    fn test_display() {
        let q = parse_query("a AND b OR c");
        assert_eq!(q.root.to_string(), "((a AND b) OR c)");
    }
}
