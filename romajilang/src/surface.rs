use std::rc::Rc;

use crate::parse;

pub struct Prog {
    pub stmts: Vec<Stmt>,
}

/// One lowered source line. The level is the line's leading whitespace count
/// integer-divided by 4; it decides block nesting, nothing else.
pub struct Stmt {
    pub level: usize,
    pub data: StmtData,
}

pub enum StmtData {
    /// `hanasu`. The segments were separated by top-level `tasu` tokens;
    /// each one is coerced to text before concatenation.
    Print {
        segments: Vec<Tm>,
    },

    /// A standalone `wa` binding.
    Assign {
        name: String,
        tm: Tm,
    },

    /// `kansuu`, opens a block
    FuncDef {
        name: String,
    },
    /// `yobidasi`
    FuncCall {
        name: String,
    },

    /// `moshi <lhs> wa <rhs> nara`, an equality test, opens a block
    If {
        lhs: Tm,
        rhs: Tm,
    },
    /// `soreigai`, opens a block. Whether a `moshi` block actually precedes
    /// it is only checked when the program is assembled.
    Else,

    /// A line matching no known form, kept as an expression statement
    Raw {
        tm: Tm,
    },

    /// A line that does not even lex; becomes a fault before anything runs
    Bad {
        message: String,
    },
}

#[derive(Clone)]
pub enum Tm {
    NumLit { n: f64 },
    StrLit { s: String },
    Name { name: String },
    Infix { op: Op, tm1: Rc<Tm>, tm2: Rc<Tm> },
}

#[derive(Clone, Copy)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

/// Turns source text into a flat statement sequence, one statement per
/// non-blank line. This never fails: `yameyo` and malformed `moshi` lines
/// are dropped, and a line that does not lex is deferred as a `Bad`
/// statement so the fault surfaces at evaluation time, not here.
pub fn translate(code: &str) -> Prog {
    let mut stmts = vec![];

    for (index, line) in code.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let leading = line.chars().take_while(|c| c.is_whitespace()).count();
        let level = leading / 4;

        match parse::parse_line(trimmed) {
            Ok(Some(data)) => stmts.push(Stmt { level, data }),

            // yameyo, or a moshi line that doesn't match the if pattern
            Ok(None) => {}

            Err(e) => stmts.push(Stmt {
                level,
                data: StmtData::Bad {
                    message: format!(
                        "line {}: invalid syntax at column {}",
                        index + 1,
                        e.column
                    ),
                },
            }),
        }
    }

    Prog { stmts }
}
