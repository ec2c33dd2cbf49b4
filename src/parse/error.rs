use std::{error, fmt};

use super::{token::Token, Span};
use crate::{cli::format_error, Source};

/// Grammar rule names the way they appear in diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rule {
    Program,
    Function,
    Expr,
    BranchExpr,
    LoopExpr,
    Block,
    AndExpr,
    OrExpr,
    NotExpr,
    Condition,
    SumExpr,
    MulExpr,
    Rvalue,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Rule::Program => "<program>",
            Rule::Function => "<function>",
            Rule::Expr => "<expr>",
            Rule::BranchExpr => "<branch_expr>",
            Rule::LoopExpr => "<loop_expr>",
            Rule::Block => "<block>",
            Rule::AndExpr => "<and_expr>",
            Rule::OrExpr => "<or_expr>",
            Rule::NotExpr => "<not_expr>",
            Rule::Condition => "<condition>",
            Rule::SumExpr => "<sum_expr>",
            Rule::MulExpr => "<mul_expr>",
            Rule::Rvalue => "<rvalue>",
        };

        write!(f, "{}", s)
    }
}

/// The input did not match the grammar.
///
/// `rule` is the rule whose check failed and `trace` the whole stack of
/// rules that were active at that point, outermost first. Rendering
/// points at the offending token in the source and then prints the
/// trace with one level of indent per rule.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ParseError<'src> {
    pub source: &'src Source,
    pub rule: Rule,
    pub expected: String,
    pub got: Token<'src>,
    pub span: Span,
    pub trace: Vec<Rule>,
}

impl<'src> fmt::Display for ParseError<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = format!(
            "expected {}, but got {} in {}",
            self.expected, self.got, self.rule
        );

        write!(f, "{}", format_error(self.source, self.span, &msg))?;
        write!(f, "\nparse stack:")?;
        for (depth, rule) in self.trace.iter().enumerate() {
            write!(f, "\n{}{}", " ".repeat(depth), rule)?;
        }

        Ok(())
    }
}

impl<'src> error::Error for ParseError<'src> {}
