pub(crate) mod symbol;

use self::symbol::SymbolTable;

/// A whole compilation unit in the order its functions were declared.
#[derive(Debug, Eq, PartialEq)]
pub struct Program<'src>(pub Vec<Function<'src>>);

#[derive(Debug, Eq, PartialEq)]
pub struct Function<'src> {
    pub name: &'src str,
    pub params: Vec<&'src str>,
    pub locals: Vec<&'src str>,
    pub table: SymbolTable<'src>,
    pub body: Vec<Expr<'src>>,
}

#[derive(Debug, Eq, PartialEq)]
pub struct Clause<'src> {
    pub cond: Expr<'src>,
    pub body: Vec<Expr<'src>>,
}

/// Everything in a function body is an expression. Operators don't get
/// nodes of their own, they become `Call`s named after the operator
/// symbol, so `1 + 2` and `+(1, 2)` look the same from here on.
#[derive(Debug, Eq, PartialEq)]
pub enum Expr<'src> {
    Return(Box<Expr<'src>>),
    Assign {
        name: &'src str,
        value: Box<Expr<'src>>,
    },
    Branch(Vec<Clause<'src>>),
    Loop {
        cond: Box<Expr<'src>>,
        body: Vec<Expr<'src>>,
    },
    And(Box<Expr<'src>>, Box<Expr<'src>>),
    Or(Box<Expr<'src>>, Box<Expr<'src>>),
    Not(Box<Expr<'src>>),
    Call(&'src str, Vec<Expr<'src>>),
    Value(&'src str),
    Literal(&'src str),
}
