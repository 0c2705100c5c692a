use super::parser_methods::HogQLError;
use crate::protocol::value::Value;
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct HogQLParser;

/// Depth at which conversion bails with `ExpressionTooComplex` instead of
/// risking a stack overflow on pathologically nested input.
pub const MAX_EXPR_DEPTH: usize = 128;

// AST Structures

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mult,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoolOp {
    And,
    Or,
}

/// Closed expression hierarchy. Nodes are built once by the converter and
/// never mutated; structural equality is what the test suite asserts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Constant(Value),
    Name(String),
    Parens(Box<Expr>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Boolean {
        op: BoolOp,
        exprs: Vec<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Attribute {
        target: Box<Expr>,
        attr: String,
    },
}

/// An expression in column position, optionally aliased (`expr AS alias`).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl HogQLParser {
    /// Lexes `input` as one HogQL expression and lowers the resulting parse
    /// tree into an [`Expr`]. Fails fast on any production the converter
    /// does not implement.
    pub fn parse_expression(input: &str) -> Result<Expr, HogQLError> {
        Self::check_nesting_depth(input)?;
        let mut pairs = HogQLParser::parse(Rule::expression, input)?;
        let pair = pairs
            .next()
            .ok_or_else(|| HogQLError::from("Empty input"))?;
        let inner = pair
            .into_inner()
            .find(|p| p.as_rule() == Rule::or_expr)
            .ok_or_else(|| HogQLError::from("Empty expression"))?;
        Self::parse_or(inner, 0)
    }

    /// Like [`parse_expression`](Self::parse_expression) but accepts the
    /// aliased column form `expr AS alias`.
    pub fn parse_column(input: &str) -> Result<Column, HogQLError> {
        Self::check_nesting_depth(input)?;
        let mut pairs = HogQLParser::parse(Rule::column, input)?;
        let pair = pairs
            .next()
            .ok_or_else(|| HogQLError::from("Empty input"))?;

        let mut expr = None;
        let mut alias = None;
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::or_expr => expr = Some(Self::parse_or(p, 0)?),
                Rule::kw_as => {}
                Rule::identifier => alias = Some(p.as_str().to_string()),
                Rule::EOI => {}
                r => return Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
            }
        }

        Ok(Column {
            expr: expr.ok_or_else(|| HogQLError::from("Empty column expression"))?,
            alias,
        })
    }

    /// The grammar itself recurses once per nesting level, so the depth cap
    /// must hold before the input reaches pest. Counts bracket nesting with
    /// a single scan, ignoring parentheses inside string literals.
    fn check_nesting_depth(input: &str) -> Result<(), HogQLError> {
        let mut depth: usize = 0;
        let mut max_depth: usize = 0;
        let mut in_string = false;
        for c in input.chars() {
            match c {
                '\'' => in_string = !in_string,
                '(' if !in_string => {
                    depth += 1;
                    max_depth = max_depth.max(depth);
                }
                ')' if !in_string => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        if max_depth > MAX_EXPR_DEPTH {
            return Err(HogQLError::ExpressionTooComplex(MAX_EXPR_DEPTH));
        }
        Ok(())
    }

    fn descend(depth: usize) -> Result<usize, HogQLError> {
        if depth >= MAX_EXPR_DEPTH {
            return Err(HogQLError::ExpressionTooComplex(MAX_EXPR_DEPTH));
        }
        Ok(depth + 1)
    }

    fn parse_or(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let depth = Self::descend(depth)?;
        let mut expr: Option<Expr> = None;
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::kw_or => {}
                Rule::and_expr => {
                    let rhs = Self::parse_and(p, depth)?;
                    expr = Some(match expr.take() {
                        None => rhs,
                        Some(lhs) => Expr::Boolean {
                            op: BoolOp::Or,
                            exprs: vec![lhs, rhs],
                        },
                    });
                }
                r => return Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
            }
        }
        expr.ok_or_else(|| HogQLError::from("Empty expression"))
    }

    fn parse_and(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let mut expr: Option<Expr> = None;
        for p in pair.into_inner() {
            match p.as_rule() {
                Rule::kw_and => {}
                Rule::not_expr => {
                    let rhs = Self::parse_not(p, depth)?;
                    expr = Some(match expr.take() {
                        None => rhs,
                        Some(lhs) => Expr::Boolean {
                            op: BoolOp::And,
                            exprs: vec![lhs, rhs],
                        },
                    });
                }
                r => return Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
            }
        }
        expr.ok_or_else(|| HogQLError::from("Empty expression"))
    }

    fn parse_not(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let p = pair
            .into_inner()
            .next()
            .ok_or_else(|| HogQLError::from("Empty expression"))?;
        match p.as_rule() {
            Rule::negation => {
                let depth = Self::descend(depth)?;
                let operand = p
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::not_expr)
                    .ok_or_else(|| HogQLError::from("Missing NOT operand"))?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(Self::parse_not(operand, depth)?),
                })
            }
            Rule::comparison => Self::parse_comparison(p, depth),
            r => Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
        }
    }

    fn parse_comparison(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let mut pairs = pair.into_inner();
        let left = Self::parse_additive(
            pairs
                .next()
                .ok_or_else(|| HogQLError::from("Empty comparison"))?,
            depth,
        )?;

        let op_pair = match pairs.next() {
            Some(p) => p,
            None => return Ok(left),
        };
        let op = Self::parse_compare_op(op_pair)?;
        let right = Self::parse_additive(
            pairs
                .next()
                .ok_or_else(|| HogQLError::from("Missing comparison operand"))?,
            depth,
        )?;

        Ok(Expr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_compare_op(pair: Pair<Rule>) -> Result<CompareOp, HogQLError> {
        // The LIKE/IN family lexes but is a recognized conversion gap; the
        // symbol operators carry no sub-pair and are matched on raw text.
        if let Some(p) = pair.clone().into_inner().next() {
            let name = match p.as_rule() {
                Rule::like_op => "compareOperator LIKE/ILIKE",
                Rule::not_like_op => "compareOperator NOT LIKE/ILIKE",
                Rule::in_op => "compareOperator IN",
                Rule::not_in_op => "compareOperator NOT IN",
                Rule::global_in_op => "compareOperator GLOBAL IN",
                r => return Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
            };
            return Err(HogQLError::UnsupportedConstruct(name.to_string()));
        }
        match pair.as_str() {
            "=" | "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::NotEq),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::LtEq),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::GtEq),
            op => Err(HogQLError::UnsupportedConstruct(format!(
                "compareOperator {}",
                op
            ))),
        }
    }

    fn parse_additive(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let mut pairs = pair.into_inner();
        let mut expr = Self::parse_multiplicative(
            pairs
                .next()
                .ok_or_else(|| HogQLError::from("Empty expression"))?,
            depth,
        )?;

        while let Some(op_pair) = pairs.next() {
            let op = match op_pair.as_str() {
                "+" => BinaryOp::Add,
                "-" => BinaryOp::Sub,
                "||" => {
                    return Err(HogQLError::NotYetSupported(
                        "string concatenation (||)".to_string(),
                    ))
                }
                op => {
                    return Err(HogQLError::UnsupportedConstruct(format!(
                        "additiveOperator {}",
                        op
                    )))
                }
            };
            let rhs = Self::parse_multiplicative(
                pairs
                    .next()
                    .ok_or_else(|| HogQLError::from("Missing operand"))?,
                depth,
            )?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let mut pairs = pair.into_inner();
        let mut expr = Self::parse_unary(
            pairs
                .next()
                .ok_or_else(|| HogQLError::from("Empty expression"))?,
            depth,
        )?;

        while let Some(op_pair) = pairs.next() {
            let op = match op_pair.as_str() {
                "*" => BinaryOp::Mult,
                "/" => BinaryOp::Div,
                "%" => BinaryOp::Mod,
                op => {
                    return Err(HogQLError::UnsupportedConstruct(format!(
                        "multiplicativeOperator {}",
                        op
                    )))
                }
            };
            let rhs = Self::parse_unary(
                pairs
                    .next()
                    .ok_or_else(|| HogQLError::from("Missing operand"))?,
                depth,
            )?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(rhs),
            };
        }
        Ok(expr)
    }

    fn parse_unary(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let p = pair
            .into_inner()
            .next()
            .ok_or_else(|| HogQLError::from("Empty expression"))?;
        match p.as_rule() {
            Rule::postfix => Self::parse_postfix(p, depth),
            Rule::unary_minus => {
                let depth = Self::descend(depth)?;
                let operand = p
                    .into_inner()
                    .next()
                    .ok_or_else(|| HogQLError::from("Missing negation operand"))?;
                Ok(Expr::Unary {
                    op: UnaryOp::Negate,
                    expr: Box::new(Self::parse_unary(operand, depth)?),
                })
            }
            r => Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
        }
    }

    fn parse_postfix(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let mut pairs = pair.into_inner();
        let mut expr = Self::parse_primary(
            pairs
                .next()
                .ok_or_else(|| HogQLError::from("Empty expression"))?,
            depth,
        )?;

        for op_pair in pairs {
            let p = op_pair
                .into_inner()
                .next()
                .ok_or_else(|| HogQLError::from("Empty postfix operation"))?;
            expr = match p.as_rule() {
                Rule::attr_access => {
                    let attr = p
                        .into_inner()
                        .next()
                        .ok_or_else(|| HogQLError::from("Missing attribute name"))?
                        .as_str()
                        .to_string();
                    Expr::Attribute {
                        target: Box::new(expr),
                        attr,
                    }
                }
                Rule::call_args => {
                    let depth = Self::descend(depth)?;
                    let args = match p.into_inner().next() {
                        Some(list) => list
                            .into_inner()
                            .map(|arg| Self::parse_or(arg, depth))
                            .collect::<Result<Vec<_>, _>>()?,
                        None => Vec::new(),
                    };
                    Expr::Call {
                        callee: Box::new(expr),
                        args,
                    }
                }
                r => return Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
            };
        }
        Ok(expr)
    }

    fn parse_primary(pair: Pair<Rule>, depth: usize) -> Result<Expr, HogQLError> {
        let p = pair
            .into_inner()
            .next()
            .ok_or_else(|| HogQLError::from("Empty expression"))?;
        match p.as_rule() {
            Rule::number_literal => Self::parse_number_literal(p.as_str()),
            Rule::string_literal => Ok(Expr::Constant(Value::String(
                Self::parse_string_literal(p)?,
            ))),
            Rule::null_literal => Ok(Expr::Constant(Value::Null)),
            Rule::bool_literal => Self::parse_bool_literal(p.as_str()),
            Rule::identifier => Ok(Expr::Name(p.as_str().to_string())),
            Rule::parens => {
                let inner = p
                    .into_inner()
                    .next()
                    .ok_or_else(|| HogQLError::from("Empty parenthesized expression"))?;
                Ok(Expr::Parens(Box::new(Self::parse_or(inner, depth)?)))
            }
            r => Err(HogQLError::UnsupportedConstruct(format!("{:?}", r))),
        }
    }

    fn parse_number_literal(text: &str) -> Result<Expr, HogQLError> {
        if text.contains('.') {
            text.parse::<f64>()
                .map(|f| Expr::Constant(Value::Float(f)))
                .map_err(|_| {
                    HogQLError::UnsupportedConstruct(format!("numberLiteral ({})", text))
                })
        } else {
            // Exponent-only forms like `1e3` land here and fail the integer
            // parse, which is the mandated refusal path for them.
            text.parse::<i64>()
                .map(|i| Expr::Constant(Value::Int(i)))
                .map_err(|_| {
                    HogQLError::UnsupportedConstruct(format!("numberLiteral ({})", text))
                })
        }
    }

    fn parse_bool_literal(text: &str) -> Result<Expr, HogQLError> {
        if text.eq_ignore_ascii_case("true") {
            Ok(Expr::Constant(Value::Boolean(true)))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Expr::Constant(Value::Boolean(false)))
        } else {
            Err(HogQLError::UnsupportedConstruct(format!(
                "boolLiteral ({})",
                text
            )))
        }
    }

    fn parse_string_literal(pair: Pair<Rule>) -> Result<String, HogQLError> {
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| HogQLError::from("Empty string literal"))?;
        // Doubled single-quotes are the only escape handled at this layer;
        // backslash pairs pass through untouched.
        Ok(inner.as_str().replace("''", "'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(v: impl Into<Value>) -> Expr {
        Expr::Constant(v.into())
    }

    #[test]
    fn test_integer_literal() {
        assert_eq!(
            HogQLParser::parse_expression("1").unwrap(),
            constant(1i64)
        );
        assert_eq!(
            HogQLParser::parse_expression("-1").unwrap(),
            constant(-1i64)
        );
    }

    #[test]
    fn test_float_literal() {
        assert_eq!(
            HogQLParser::parse_expression("1.2").unwrap(),
            constant(1.2f64)
        );
        assert_eq!(
            HogQLParser::parse_expression("-0.5").unwrap(),
            constant(-0.5f64)
        );
    }

    #[test]
    fn test_exponent_only_float_is_refused() {
        let err = HogQLParser::parse_expression("1e3").unwrap_err();
        assert!(matches!(err, HogQLError::UnsupportedConstruct(_)));
        // With a dot the exponent form is an ordinary float.
        assert_eq!(
            HogQLParser::parse_expression("1.5e3").unwrap(),
            constant(1500.0f64)
        );
    }

    #[test]
    fn test_integer_overflow_is_refused() {
        let err = HogQLParser::parse_expression("99999999999999999999999").unwrap_err();
        assert!(matches!(err, HogQLError::UnsupportedConstruct(_)));
    }

    #[test]
    fn test_bool_and_null_literals() {
        assert_eq!(
            HogQLParser::parse_expression("true").unwrap(),
            constant(true)
        );
        assert_eq!(
            HogQLParser::parse_expression("FALSE").unwrap(),
            constant(false)
        );
        assert_eq!(
            HogQLParser::parse_expression("null").unwrap(),
            Expr::Constant(Value::Null)
        );
    }

    #[test]
    fn test_string_literal_unescaping() {
        assert_eq!(
            HogQLParser::parse_expression("'n''ull'").unwrap(),
            constant("n'ull")
        );
        assert_eq!(
            HogQLParser::parse_expression("'n''''ull'").unwrap(),
            constant("n''ull")
        );
        // Backslash pairs are not an escape at this layer.
        assert_eq!(
            HogQLParser::parse_expression(r"'a\nb'").unwrap(),
            constant(r"a\nb")
        );
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(
            HogQLParser::parse_expression("1 + 1 * 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(constant(1i64)),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::Mult,
                    left: Box::new(constant(1i64)),
                    right: Box::new(constant(2i64)),
                }),
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("1 * 1 + 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Add,
                left: Box::new(Expr::Binary {
                    op: BinaryOp::Mult,
                    left: Box::new(constant(1i64)),
                    right: Box::new(constant(1i64)),
                }),
                right: Box::new(constant(2i64)),
            }
        );
    }

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(
            HogQLParser::parse_expression("6 / 2").unwrap(),
            Expr::Binary {
                op: BinaryOp::Div,
                left: Box::new(constant(6i64)),
                right: Box::new(constant(2i64)),
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("5 % 3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Mod,
                left: Box::new(constant(5i64)),
                right: Box::new(constant(3i64)),
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("5 - 3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Sub,
                left: Box::new(constant(5i64)),
                right: Box::new(constant(3i64)),
            }
        );
    }

    #[test]
    fn test_comparison_operators() {
        for (input, op) in [
            ("a = 1", CompareOp::Eq),
            ("a == 1", CompareOp::Eq),
            ("a != 1", CompareOp::NotEq),
            ("a < 1", CompareOp::Lt),
            ("a <= 1", CompareOp::LtEq),
            ("a > 1", CompareOp::Gt),
            ("a >= 1", CompareOp::GtEq),
        ] {
            assert_eq!(
                HogQLParser::parse_expression(input).unwrap(),
                Expr::Compare {
                    op,
                    left: Box::new(Expr::Name("a".to_string())),
                    right: Box::new(constant(1i64)),
                },
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_like_family_is_fenced() {
        for input in [
            "a LIKE 'b%'",
            "a ILIKE 'b%'",
            "a NOT LIKE 'b%'",
            "a IN 'b'",
            "a NOT IN 'b'",
            "a GLOBAL IN 'b'",
        ] {
            let err = HogQLParser::parse_expression(input).unwrap_err();
            assert!(
                matches!(err, HogQLError::UnsupportedConstruct(_)),
                "input: {} => {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_concat_is_a_named_gap() {
        let err = HogQLParser::parse_expression("'a' || 'b'").unwrap_err();
        assert_eq!(
            err,
            HogQLError::NotYetSupported("string concatenation (||)".to_string())
        );
    }

    #[test]
    fn test_boolean_operations() {
        assert_eq!(
            HogQLParser::parse_expression("true and false").unwrap(),
            Expr::Boolean {
                op: BoolOp::And,
                exprs: vec![constant(true), constant(false)],
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("true or false").unwrap(),
            Expr::Boolean {
                op: BoolOp::Or,
                exprs: vec![constant(true), constant(false)],
            }
        );
        // Chains fold left into nested two-operand nodes.
        assert_eq!(
            HogQLParser::parse_expression("true and false and true").unwrap(),
            Expr::Boolean {
                op: BoolOp::And,
                exprs: vec![
                    Expr::Boolean {
                        op: BoolOp::And,
                        exprs: vec![constant(true), constant(false)],
                    },
                    constant(true),
                ],
            }
        );
        // AND binds tighter than OR.
        assert_eq!(
            HogQLParser::parse_expression("true or false and true").unwrap(),
            Expr::Boolean {
                op: BoolOp::Or,
                exprs: vec![
                    constant(true),
                    Expr::Boolean {
                        op: BoolOp::And,
                        exprs: vec![constant(false), constant(true)],
                    },
                ],
            }
        );
    }

    #[test]
    fn test_not_and_negate() {
        assert_eq!(
            HogQLParser::parse_expression("not true").unwrap(),
            Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(constant(true)),
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("-a").unwrap(),
            Expr::Unary {
                op: UnaryOp::Negate,
                expr: Box::new(Expr::Name("a".to_string())),
            }
        );
    }

    #[test]
    fn test_parens_are_preserved() {
        assert_eq!(
            HogQLParser::parse_expression("(1)").unwrap(),
            Expr::Parens(Box::new(constant(1i64)))
        );
        assert_eq!(
            HogQLParser::parse_expression("(1 + 2) * 3").unwrap(),
            Expr::Binary {
                op: BinaryOp::Mult,
                left: Box::new(Expr::Parens(Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    left: Box::new(constant(1i64)),
                    right: Box::new(constant(2i64)),
                }))),
                right: Box::new(constant(3i64)),
            }
        );
    }

    #[test]
    fn test_call_and_attribute() {
        assert_eq!(
            HogQLParser::parse_expression("toString(1)").unwrap(),
            Expr::Call {
                callee: Box::new(Expr::Name("toString".to_string())),
                args: vec![constant(1i64)],
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("now()").unwrap(),
            Expr::Call {
                callee: Box::new(Expr::Name("now".to_string())),
                args: vec![],
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("person.name").unwrap(),
            Expr::Attribute {
                target: Box::new(Expr::Name("person".to_string())),
                attr: "name".to_string(),
            }
        );
        assert_eq!(
            HogQLParser::parse_expression("a.b.c").unwrap(),
            Expr::Attribute {
                target: Box::new(Expr::Attribute {
                    target: Box::new(Expr::Name("a".to_string())),
                    attr: "b".to_string(),
                }),
                attr: "c".to_string(),
            }
        );
    }

    #[test]
    fn test_column_alias() {
        assert_eq!(
            HogQLParser::parse_column("1 AS one").unwrap(),
            Column {
                expr: constant(1i64),
                alias: Some("one".to_string()),
            }
        );
        assert_eq!(
            HogQLParser::parse_column("properties.$current_url").unwrap(),
            Column {
                expr: Expr::Attribute {
                    target: Box::new(Expr::Name("properties".to_string())),
                    attr: "$current_url".to_string(),
                },
                alias: None,
            }
        );
    }

    #[test]
    fn test_deep_nesting_is_refused_before_overflow() {
        for depth in [MAX_EXPR_DEPTH + 8, 100_000] {
            let input = format!("{}{}{}", "(".repeat(depth), "1", ")".repeat(depth));
            let err = HogQLParser::parse_expression(&input).unwrap_err();
            assert_eq!(err, HogQLError::ExpressionTooComplex(MAX_EXPR_DEPTH));
        }
        // Parentheses inside string literals are content, not nesting.
        let input = format!("'{}'", "(".repeat(MAX_EXPR_DEPTH + 8));
        assert!(HogQLParser::parse_expression(&input).is_ok());
    }

    #[test]
    fn test_deep_not_chain_is_refused() {
        let input = format!("{}true", "not ".repeat(MAX_EXPR_DEPTH + 8));
        let err = HogQLParser::parse_expression(&input).unwrap_err();
        assert_eq!(err, HogQLError::ExpressionTooComplex(MAX_EXPR_DEPTH));
    }

    #[test]
    fn test_syntax_errors_are_parse_errors() {
        for input in ["", "1 +", "'unterminated", "= 3"] {
            let err = HogQLParser::parse_expression(input).unwrap_err();
            assert!(
                matches!(err, HogQLError::ParseError(_)),
                "input: {:?} => {:?}",
                input,
                err
            );
        }
    }
}
