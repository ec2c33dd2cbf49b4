use std::fmt;

use crate::tree::{
    symbol::{SymbolError, SymbolTable},
    Expr, Function, Program,
};

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Label(usize);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum Instr<'src> {
    /// (MakeVal 42)
    MakeVal(&'src str),
    /// (Fetch 0)
    Fetch(usize),
    /// (Store 1)
    Store(usize),
    /// (Push)
    Push,
    /// (Call #"+[f2]" 2)
    Call(&'src str, usize),
    /// (CallR #"f[f1]" 1)
    CallR(&'src str, usize),
    /// (Return)
    Return,
    /// (Go _0)
    Go(Label),
    /// (GoFalse _1)
    GoFalse(Label),
    /// (GoTrue _2)
    GoTrue(Label),
    /// (Not)
    Not,
    /// _0:
    Label(Label),
}

impl<'src> fmt::Display for Instr<'src> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instr::*;

        let s = match self {
            MakeVal(value) => format!("(MakeVal {})", value),
            Fetch(pos) => format!("(Fetch {})", pos),
            Store(pos) => format!("(Store {})", pos),
            Push => "(Push)".to_string(),
            Call(name, arity) => format!("(Call #\"{}[f{}]\" {})", name, arity, arity),
            CallR(name, arity) => format!("(CallR #\"{}[f{}]\" {})", name, arity, arity),
            Return => "(Return)".to_string(),
            Go(label) => format!("(Go {})", label),
            GoFalse(label) => format!("(GoFalse {})", label),
            GoTrue(label) => format!("(GoTrue {})", label),
            Not => "(Not)".to_string(),
            Label(label) => format!("{}:", label),
        };

        write!(f, "{}", s)
    }
}

/// Turns a parsed program into the lines of a Morpho assembly file.
///
/// The output names the executable after `unit` and links it against
/// the `BASIS` library, which is where operator functions like `+[f2]`
/// come from at assembly time.
pub fn generate<'src>(prg: &Program<'src>, unit: &str) -> Result<Vec<String>, SymbolError<'src>> {
    let mut gen = Generator::new();

    gen.push_line(format!("\"{}.mexe\" = main in", unit));
    gen.push_line("!".to_owned());
    gen.push_line("{{".to_owned());
    for fun in &prg.0 {
        gen.function(fun)?;
    }
    gen.push_line("}}".to_owned());
    gen.push_line("*".to_owned());
    gen.push_line("BASIS".to_owned());
    gen.push_line(";".to_owned());

    Ok(gen.lines)
}

/// Walks the tree and accumulates one output line per instruction.
/// Labels are numbered by a single counter, so they stay unique across
/// all functions of the unit.
struct Generator {
    lines: Vec<String>,
    labels: usize,
}

impl Generator {
    fn new() -> Self {
        Generator {
            lines: vec![],
            labels: 0,
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push(line);
    }

    fn emit(&mut self, instr: Instr) {
        self.lines.push(instr.to_string());
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.labels);
        self.labels += 1;

        label
    }

    fn function<'src>(&mut self, fun: &Function<'src>) -> Result<(), SymbolError<'src>> {
        self.push_line(format!("#\"{}[f{}]\" =", fun.name, fun.params.len()));
        self.push_line("[".to_owned());

        // activation record setup: params were pushed by the caller,
        // locals start out as 0
        self.emit(Instr::MakeVal("0"));
        for _ in &fun.locals {
            self.emit(Instr::Push);
        }

        let last = fun.body.len() - 1;
        for (i, expr) in fun.body.iter().enumerate() {
            self.expr(expr, &fun.table, i == last)?;
        }

        // reached when the last expression was not already a return
        self.emit(Instr::Return);
        self.push_line("];".to_owned());

        Ok(())
    }

    /// Emits the instructions for one expression. With `tail` set the
    /// value of the expression becomes the return value, which lets
    /// calls reuse the current activation record and assignments skip
    /// their store.
    fn expr<'src>(
        &mut self,
        expr: &Expr<'src>,
        table: &SymbolTable<'src>,
        tail: bool,
    ) -> Result<(), SymbolError<'src>> {
        match expr {
            Expr::Literal(lit) => self.emit(Instr::MakeVal(*lit)),
            Expr::Value(name) => {
                let pos = table.resolve(*name)?;
                self.emit(Instr::Fetch(pos));
            }
            Expr::Assign { name, value } => {
                let pos = table.resolve(*name)?;
                self.expr(value, table, false)?;
                if !tail {
                    self.emit(Instr::Store(pos));
                }
            }
            Expr::Return(value) => {
                self.expr(value, table, true)?;
                self.emit(Instr::Return);
            }
            Expr::Call(name, args) => {
                if let Some((first, rest)) = args.split_first() {
                    self.expr(first, table, false)?;
                    for arg in rest {
                        self.emit(Instr::Push);
                        self.expr(arg, table, false)?;
                    }
                }

                if tail {
                    self.emit(Instr::CallR(*name, args.len()));
                } else {
                    self.emit(Instr::Call(*name, args.len()));
                }
            }
            Expr::And(left, right) => {
                let skip = self.new_label();
                self.expr(left, table, false)?;
                self.emit(Instr::GoFalse(skip));
                self.expr(right, table, false)?;
                self.emit(Instr::Label(skip));
            }
            Expr::Or(left, right) => {
                let skip = self.new_label();
                self.expr(left, table, false)?;
                self.emit(Instr::GoTrue(skip));
                self.expr(right, table, false)?;
                self.emit(Instr::Label(skip));
            }
            Expr::Not(inner) => {
                self.expr(inner, table, false)?;
                self.emit(Instr::Not);
            }
            Expr::Branch(clauses) => {
                let exit = self.new_label();
                let mut checks = Vec::with_capacity(clauses.len());
                for _ in clauses {
                    checks.push(self.new_label());
                }

                for (i, clause) in clauses.iter().enumerate() {
                    self.emit(Instr::Label(checks[i]));
                    self.expr(&clause.cond, table, false)?;
                    let next = checks.get(i + 1).cloned().unwrap_or(exit);
                    self.emit(Instr::GoFalse(next));
                    for expr in &clause.body {
                        self.expr(expr, table, false)?;
                    }
                    self.emit(Instr::Go(exit));
                }

                self.emit(Instr::Label(exit));
            }
            Expr::Loop { cond, body } => {
                let check = self.new_label();
                let exit = self.new_label();

                self.emit(Instr::Label(check));
                self.expr(cond, table, false)?;
                self.emit(Instr::GoFalse(exit));
                for expr in body {
                    self.expr(expr, table, false)?;
                }
                self.emit(Instr::Go(check));
                self.emit(Instr::Label(exit));
            }
        }

        Ok(())
    }
}
