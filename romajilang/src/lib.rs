// RomajiLang: a tiny educational language written in romanized Japanese
// keywords. Source text is translated line-by-line into a small imperative
// program and interpreted directly; everything printed (or the fault that
// stopped the run) comes back as one string.

pub mod core;
pub mod parse;
pub mod surface;

#[cfg(test)]
mod test;

/// The literal marker prefixed to a rendered fault line. Callers grep the
/// returned string for this to decide on error styling, so it must stay
/// textually stable.
pub const ERROR_MARKER: &str = "[エラー]";

/// Translates and runs a program, returning everything it printed. A fault
/// never escapes as an error: execution stops, whatever was already printed
/// is kept, and one red marked line describing the fault is appended.
pub fn run(code: &str) -> String {
    let prog = surface::translate(code);

    let mut out = String::new();
    let result = core::lower(&prog).and_then(|block| {
        let mut env = core::Env::default();
        core::exec(&block, &mut env, &mut out)
    });

    if let Err(e) = result {
        out.push_str(&format!("\x1b[91m{} {}\x1b[0m\n", ERROR_MARKER, e.message));
    }

    out
}
