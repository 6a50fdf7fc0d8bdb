use crate::{run, ERROR_MARKER};

#[test]
fn blank_source() {
    assert_eq!(run(""), "");
    assert_eq!(run("   \n\t\n\n  "), "");
}

#[test]
fn print_coerces_numbers() {
    insta::assert_snapshot!(format!("{:?}", run(r#"hanasu "a" tasu 1"#)), @r#""a1\n""#)
}

#[test]
fn print_concat_is_never_addition() {
    // inside hanasu, tasu joins text; 1 tasu 2 prints "12", not "3"
    insta::assert_snapshot!(format!("{:?}", run("hanasu 1 tasu 2")), @r#""12\n""#)
}

#[test]
fn print_segments_still_compute() {
    insta::assert_snapshot!(format!("{:?}", run(r#"hanasu "x=" tasu 2 kakeru 3"#)), @r#""x=6\n""#)
}

#[test]
fn bare_print() {
    assert_eq!(run("hanasu"), "\n");
}

#[test]
fn assignment_and_precedence() {
    let code = "
x wa 2 tasu 3 kakeru 4
hanasu x
";

    insta::assert_snapshot!(format!("{:?}", run(code)), @r#""14\n""#)
}

#[test]
fn division() {
    insta::assert_snapshot!(format!("{:?}", run("hanasu 10 waru 4")), @r#""2.5\n""#)
}

#[test]
fn string_concat_outside_print() {
    let code = r#"
x wa "a" tasu "b"
hanasu x
"#;

    assert_eq!(run(code), "ab\n");
}

#[test]
fn function_define_and_call() {
    let code = r#"
kansuu greet
    hanasu "hi"
yameyo
yobidasi greet
"#;

    assert_eq!(run(code), "hi\n");
}

#[test]
fn function_called_twice() {
    let code = r#"
kansuu greet
    hanasu "hi"
yameyo
yobidasi greet
yobidasi greet
"#;

    assert_eq!(run(code), "hi\nhi\n");
}

#[test]
fn function_body_reads_global_scope() {
    let code = r#"
kansuu f
    hanasu x
yameyo
x wa 1
yobidasi f
"#;

    assert_eq!(run(code), "1\n");
}

#[test]
fn function_redefinition_rebinds() {
    let code = r#"
kansuu f
    hanasu "one"
yameyo
kansuu f
    hanasu "two"
yameyo
yobidasi f
"#;

    assert_eq!(run(code), "two\n");
}

#[test]
fn if_taken() {
    let code = r#"
x wa 10
moshi x wa 10 nara
    hanasu "yes"
soreigai
    hanasu "no"
yameyo
"#;

    assert_eq!(run(code), "yes\n");
}

#[test]
fn if_not_taken() {
    let code = r#"
x wa 10
moshi x wa 11 nara
    hanasu "yes"
soreigai
    hanasu "no"
yameyo
"#;

    assert_eq!(run(code), "no\n");
}

#[test]
fn if_compares_strings() {
    let code = r#"
x wa "hai"
moshi x wa "hai" nara
    hanasu "match"
yameyo
"#;

    assert_eq!(run(code), "match\n");
}

#[test]
fn if_mixed_types_are_unequal() {
    let code = r#"
x wa 10
moshi x wa "10" nara
    hanasu "yes"
soreigai
    hanasu "no"
yameyo
"#;

    assert_eq!(run(code), "no\n");
}

#[test]
fn nested_if_inside_function() {
    let code = r#"
kansuu check
    moshi x wa 1 nara
        hanasu "one"
    soreigai
        hanasu "other"
    yameyo
yameyo
x wa 1
yobidasi check
x wa 2
yobidasi check
"#;

    assert_eq!(run(code), "one\nother\n");
}

#[test]
fn division_by_zero_is_marked() {
    let out = run("1 waru 0");

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("division by zero"));
    assert!(out.ends_with("\x1b[0m\n"));
}

#[test]
fn partial_output_survives_a_fault() {
    let code = r#"
hanasu "a"
1 waru 0
hanasu "b"
"#;
    let out = run(code);

    assert!(out.starts_with("a\n"));
    assert!(out.contains(ERROR_MARKER));
    assert!(!out.contains("b\n"));
}

#[test]
fn unbound_name_is_marked() {
    let out = run("hanasu x");

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("unbound name: x"));
}

#[test]
fn type_mismatch_is_marked() {
    let out = run(r#"x wa "a" hiku 1"#);

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("unsupported operands for hiku"));
}

#[test]
fn dangling_soreigai_is_marked() {
    let code = r#"
soreigai
    hanasu "a"
"#;
    let out = run(code);

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("soreigai without a matching moshi"));
}

#[test]
fn empty_block_is_marked() {
    let out = run("kansuu f");

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("expected an indented block"));
}

#[test]
fn unlexable_line_fails_before_any_output() {
    let code = r#"
hanasu "a"
???
"#;
    let out = run(code);

    // the whole program is rejected, so not even the first line printed
    assert!(!out.contains("a\n"));
    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("invalid syntax"));
    assert!(out.contains("line 3"));
}

#[test]
fn malformed_moshi_is_dropped_silently() {
    assert_eq!(run("moshi nandaka hen"), "");
}

#[test]
fn stray_yameyo_is_dropped_silently() {
    assert_eq!(run("yameyo"), "");
}

#[test]
fn keyword_inside_string_is_text() {
    assert_eq!(run(r#"hanasu "tasu to iu kotoba""#), "tasu to iu kotoba\n");
}

#[test]
fn irregular_indent_rounds_down() {
    // six leading spaces still map to level 1
    let code = "kansuu f\n      hanasu \"a\"\nyameyo\nyobidasi f\n";

    assert_eq!(run(code), "a\n");
}

#[test]
fn calling_before_definition_is_marked() {
    let code = r#"
yobidasi f
kansuu f
    hanasu "a"
yameyo
"#;
    let out = run(code);

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("unbound name: f"));
}

#[test]
fn runaway_recursion_is_a_fault() {
    let code = "
kansuu f
    yobidasi f
yameyo
yobidasi f
";
    let out = run(code);

    assert!(out.contains(ERROR_MARKER));
    assert!(out.contains("maximum call depth exceeded"));
}

#[test]
fn repeated_runs_are_identical() {
    let code = r#"
x wa 1
hanasu x tasu "!"
"#;

    assert_eq!(run(code), run(code));
    assert_eq!(run(code), "1!\n");
}

#[test]
fn aisatu_demo() {
    insta::assert_snapshot!(
        format!("{:?}", run(include_str!("../demos/aisatu.rmj"))),
        @r#""Konnichiwa!\nRomajiLang he youkoso!\n""#
    )
}
