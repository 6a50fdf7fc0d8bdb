use std::{collections::HashMap, fmt::Display, rc::Rc};

use itertools::Itertools;

use crate::surface::{self, Op, StmtData, Tm};

/// Calls nest through the interpreter's own stack, so runaway recursion has
/// to be cut off as a catchable fault rather than blowing the process stack.
const MAX_CALL_DEPTH: usize = 1000;

pub type Block = Vec<Stmt>;

pub enum Stmt {
    Print {
        segments: Vec<Tm>,
    },
    Assign {
        name: String,
        tm: Tm,
    },
    FuncDef {
        name: String,
        body: Rc<Block>,
    },
    FuncCall {
        name: String,
    },
    If {
        lhs: Tm,
        rhs: Tm,
        then_block: Block,
        else_block: Option<Block>,
    },
    Expr {
        tm: Tm,
    },
}

#[derive(Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // integral numbers print without a trailing ".0"
            Value::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Num(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Add => "tasu",
            Op::Sub => "hiku",
            Op::Mul => "kakeru",
            Op::Div => "waru",
        }
        .fmt(f)
    }
}

// An error raised while assembling or running the program. These are never
// propagated out of `run`; they are rendered into the captured output with
// the error marker.
#[derive(Debug)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> EvalError {
        EvalError {
            message: message.into(),
        }
    }
}

/// One global binding scope, fresh per run. Function bodies execute directly
/// in it; there are no locals.
#[derive(Default)]
pub struct Env {
    vars: HashMap<String, Value>,
    funcs: HashMap<String, Rc<Block>>,
    depth: usize,
}

enum Opener {
    Func { name: String },
    If { lhs: Tm, rhs: Tm },
    Else,
}

struct Open {
    level: usize,
    opener: Opener,
    body: Block,
}

/// Assembles the flat statement sequence into a nested block tree: a stack
/// of open blocks, pushed on `kansuu`/`moshi`/`soreigai`, where every open
/// block at a level >= the next statement's level is closed before that
/// statement is placed. Unclosed blocks at the end of input close implicitly.
pub fn lower(prog: &surface::Prog) -> Result<Block, EvalError> {
    let mut stack: Vec<Open> = vec![];
    let mut top: Block = vec![];

    for stmt in &prog.stmts {
        close_down(&mut stack, &mut top, stmt.level)?;

        match &stmt.data {
            StmtData::FuncDef { name } => stack.push(Open {
                level: stmt.level,
                opener: Opener::Func { name: name.clone() },
                body: vec![],
            }),
            StmtData::If { lhs, rhs } => stack.push(Open {
                level: stmt.level,
                opener: Opener::If {
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                },
                body: vec![],
            }),
            StmtData::Else => stack.push(Open {
                level: stmt.level,
                opener: Opener::Else,
                body: vec![],
            }),

            // a line that didn't lex fails the whole program here, before
            // anything has run
            StmtData::Bad { message } => return Err(EvalError::new(message.clone())),

            StmtData::Print { segments } => place(
                &mut stack,
                &mut top,
                Stmt::Print {
                    segments: segments.clone(),
                },
            ),
            StmtData::Assign { name, tm } => place(
                &mut stack,
                &mut top,
                Stmt::Assign {
                    name: name.clone(),
                    tm: tm.clone(),
                },
            ),
            StmtData::FuncCall { name } => {
                place(&mut stack, &mut top, Stmt::FuncCall { name: name.clone() })
            }
            StmtData::Raw { tm } => place(&mut stack, &mut top, Stmt::Expr { tm: tm.clone() }),
        }
    }

    close_down(&mut stack, &mut top, 0)?;

    Ok(top)
}

fn place(stack: &mut [Open], top: &mut Block, stmt: Stmt) {
    match stack.last_mut() {
        Some(open) => open.body.push(stmt),
        None => top.push(stmt),
    }
}

fn close_down(stack: &mut Vec<Open>, top: &mut Block, level: usize) -> Result<(), EvalError> {
    while stack.last().is_some_and(|open| open.level >= level) {
        let open = stack.pop().unwrap();
        let parent = match stack.last_mut() {
            Some(p) => &mut p.body,
            None => top,
        };
        close(open, parent)?;
    }

    Ok(())
}

fn close(open: Open, parent: &mut Block) -> Result<(), EvalError> {
    if open.body.is_empty() {
        return Err(EvalError::new("expected an indented block"));
    }

    match open.opener {
        Opener::Func { name } => parent.push(Stmt::FuncDef {
            name,
            body: Rc::new(open.body),
        }),
        Opener::If { lhs, rhs } => parent.push(Stmt::If {
            lhs,
            rhs,
            then_block: open.body,
            else_block: None,
        }),
        // an else block attaches to the moshi block that closed just before
        // it opened; anything else is a dangling soreigai
        Opener::Else => match parent.last_mut() {
            Some(Stmt::If {
                else_block: else_block @ None,
                ..
            }) => *else_block = Some(open.body),
            _ => return Err(EvalError::new("soreigai without a matching moshi")),
        },
    }

    Ok(())
}

pub fn eval(env: &Env, tm: &Tm) -> Result<Value, EvalError> {
    match tm {
        Tm::NumLit { n } => Ok(Value::Num(*n)),
        Tm::StrLit { s } => Ok(Value::Str(s.clone())),

        Tm::Name { name } => match env.vars.get(name) {
            Some(v) => Ok(v.clone()),
            None => Err(EvalError::new(format!("unbound name: {}", name))),
        },

        Tm::Infix { op, tm1, tm2 } => {
            let (v1, v2) = (eval(env, tm1)?, eval(env, tm2)?);

            match (op, v1, v2) {
                (Op::Add, Value::Num(n1), Value::Num(n2)) => Ok(Value::Num(n1 + n2)),
                (Op::Add, Value::Str(s1), Value::Str(s2)) => Ok(Value::Str(s1 + &s2)),
                (Op::Sub, Value::Num(n1), Value::Num(n2)) => Ok(Value::Num(n1 - n2)),
                (Op::Mul, Value::Num(n1), Value::Num(n2)) => Ok(Value::Num(n1 * n2)),
                (Op::Div, Value::Num(_), Value::Num(n2)) if n2 == 0.0 => {
                    Err(EvalError::new("division by zero"))
                }
                (Op::Div, Value::Num(n1), Value::Num(n2)) => Ok(Value::Num(n1 / n2)),

                (op, _, _) => Err(EvalError::new(format!("unsupported operands for {}", op))),
            }
        }
    }
}

/// Runs a block, appending everything printed to `out`. A fault stops
/// execution immediately; whatever was already printed stays in `out`.
pub fn exec(block: &Block, env: &mut Env, out: &mut String) -> Result<(), EvalError> {
    for stmt in block {
        exec_stmt(stmt, env, out)?;
    }

    Ok(())
}

fn exec_stmt(stmt: &Stmt, env: &mut Env, out: &mut String) -> Result<(), EvalError> {
    match stmt {
        Stmt::Print { segments } => {
            // safe-concat: every segment is coerced to text, so mixing
            // strings and numbers never faults
            let parts = segments
                .iter()
                .map(|tm| eval(env, tm).map(|v| v.to_string()))
                .collect::<Result<Vec<_>, _>>()?;

            out.push_str(&parts.iter().join(""));
            out.push('\n');
        }

        Stmt::Assign { name, tm } => {
            let v = eval(env, tm)?;
            env.vars.insert(name.clone(), v);
        }

        // a function binding happens when its definition line runs; calling
        // earlier is an unbound name
        Stmt::FuncDef { name, body } => {
            env.funcs.insert(name.clone(), body.clone());
        }

        Stmt::FuncCall { name } => {
            let body = match env.funcs.get(name) {
                Some(body) => body.clone(),
                None => return Err(EvalError::new(format!("unbound name: {}", name))),
            };

            if env.depth >= MAX_CALL_DEPTH {
                return Err(EvalError::new("maximum call depth exceeded"));
            }

            env.depth += 1;
            let result = exec(&body, env, out);
            env.depth -= 1;

            result?;
        }

        Stmt::If {
            lhs,
            rhs,
            then_block,
            else_block,
        } => {
            if eval(env, lhs)? == eval(env, rhs)? {
                exec(then_block, env, out)?;
            } else if let Some(else_block) = else_block {
                exec(else_block, env, out)?;
            }
        }

        Stmt::Expr { tm } => {
            eval(env, tm)?;
        }
    }

    Ok(())
}
