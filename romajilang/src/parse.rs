use std::rc::Rc;

use crate::surface::{Op, StmtData, Tm};

/// Reserved words; never usable as variable or function names.
const KEYWORDS: [&str; 12] = [
    "hanasu", "kansuu", "yobidasi", "wa", "moshi", "nara", "soreigai", "yameyo", "tasu", "hiku",
    "kakeru", "waru",
];

#[derive(Debug, Clone)]
pub struct ParseError {
    pub column: usize,
}

/// Recognizes one trimmed, non-blank source line. `Ok(None)` means the line
/// lowers to nothing (`yameyo`, or a `moshi` line that doesn't match the
/// `moshi … wa … nara` pattern).
pub fn parse_line(text: &str) -> Result<Option<StmtData>, ParseError> {
    parser::line(text).map_err(|e| ParseError {
        column: e.location.column,
    })
}

peg::parser! {
    grammar parser() for str {

        // The alternatives reproduce the recognition priority of the
        // language: print, function definition, call, assignment, if,
        // (dropped) malformed if, else, (dropped) block end, and finally
        // any remaining expression kept as a statement.
        pub rule line() -> Option<StmtData> =
            print() / func_def() / func_call() / assign() / if_stmt() / moshi_dropped() /
            else_stmt() / block_end() / raw()

        rule print() -> Option<StmtData> =
            kw("hanasu") _ segments:(seg() ++ tasu_sep()) eol() {
                Some(StmtData::Print { segments })
            } /
            kw("hanasu") eol() { Some(StmtData::Print { segments: vec![] }) }

        rule func_def() -> Option<StmtData> =
            kw("kansuu") _ name:ident() eol() { Some(StmtData::FuncDef { name }) }

        rule func_call() -> Option<StmtData> =
            kw("yobidasi") _ name:ident() eol() { Some(StmtData::FuncCall { name }) }

        rule assign() -> Option<StmtData> =
            name:ident() _ kw("wa") _ tm:tm() eol() { Some(StmtData::Assign { name, tm }) }

        rule if_stmt() -> Option<StmtData> =
            kw("moshi") _ lhs:tm() _ kw("wa") _ rhs:tm() _ kw("nara") eol() {
                Some(StmtData::If { lhs, rhs })
            }

        // a moshi line that doesn't fit the pattern lowers to nothing
        rule moshi_dropped() -> Option<StmtData> =
            kw("moshi") [_]* { None }

        rule else_stmt() -> Option<StmtData> =
            kw("soreigai") [_]* { Some(StmtData::Else) }

        rule block_end() -> Option<StmtData> =
            kw("yameyo") [_]* { None }

        rule raw() -> Option<StmtData> =
            tm:tm() eol() { Some(StmtData::Raw { tm }) }

        rule tasu_sep() = _ kw("tasu") _

        //

        #[cache_left_rec]
        rule tm() -> Tm = precedence!{
            tm1:(@) _ kw("tasu") _ tm2:@ { Tm::Infix { op: Op::Add, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            tm1:(@) _ kw("hiku") _ tm2:@ { Tm::Infix { op: Op::Sub, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            --
            tm1:(@) _ kw("kakeru") _ tm2:@ { Tm::Infix { op: Op::Mul, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            tm1:(@) _ kw("waru") _ tm2:@ { Tm::Infix { op: Op::Div, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            --
            n:num() { Tm::NumLit { n } }
            s:string() { Tm::StrLit { s } }
            name:ident() { Tm::Name { name } }
        }

        // A print segment: the same grammar as tm(), minus top-level `tasu`,
        // which inside `hanasu` always separates segments instead of adding.
        #[cache_left_rec]
        rule seg() -> Tm = precedence!{
            tm1:(@) _ kw("hiku") _ tm2:@ { Tm::Infix { op: Op::Sub, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            --
            tm1:(@) _ kw("kakeru") _ tm2:@ { Tm::Infix { op: Op::Mul, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            tm1:(@) _ kw("waru") _ tm2:@ { Tm::Infix { op: Op::Div, tm1: Rc::new(tm1), tm2: Rc::new(tm2) } }
            --
            n:num() { Tm::NumLit { n } }
            s:string() { Tm::StrLit { s } }
            name:ident() { Tm::Name { name } }
        }

        //

        rule num() -> f64
            = n:$("-"? ['0'..='9']+ ("." ['0'..='9']+)?) { n.parse::<f64>().unwrap() }

        rule string() -> String
            = "\"" s:$([^'"']*) "\"" { s.to_string() }
            / "'" s:$([^'\'']*) "'" { s.to_string() }

        rule word() -> &'input str
            = s:$(['a'..='z' | 'A'..='Z' | '_']['a'..='z' | 'A'..='Z' | '_' | '0'..='9']*) { s }

        rule kw(k: &'static str)
            = w:word() {? if w == k { Ok(()) } else { Err(k) } }

        rule ident() -> String
            = w:word() {?
                if KEYWORDS.contains(&w) {
                    Err("identifier")
                } else {
                    Ok(w.to_string())
                }
            }

        //

        rule eol() = _ ![_]

        rule _ = quiet!{[' ' | '\t']*}
    }
}
