mod common;

use common::{body, run, run_continue, run_plain, run_with, single_diag, sketch};
use ducky_toolchain_core::{
    Engine, EngineConfig, ErrorPolicy, RenderConfig, Severity, codes, translate_str,
};

// ─── Dispatch ───────────────────────────────────────────────────────────────

#[test]
fn undefined_command_halts_at_its_line() {
    let t = run("REM start\nENTER\nFOO\nTAB\n");
    assert!(!t.ok);
    assert!(t.sketch.is_none());
    let d = single_diag(&t.diagnostics, codes::UNDEFINED_COMMAND);
    assert_eq!(d.line, Some(3));
    assert_eq!(
        d.to_string(),
        "error[DKY1003]: Undefined command: `FOO` (line 3)"
    );
    assert_eq!(d.context.as_ref().unwrap()["command"], "FOO");
}

#[test]
fn command_names_are_case_sensitive() {
    let t = run_continue("string hello\nEnter\nENTER\n");
    assert_eq!(t.diagnostics.len(), 2);
    assert!(
        t.diagnostics
            .iter()
            .all(|d| d.id == codes::UNDEFINED_COMMAND)
    );
    assert_eq!(body(&t), ["pressSingleKey(KEY_RETURN);"]);
}

#[test]
fn blank_and_indented_lines() {
    let t = run_plain("\n   \n  ENTER  \r\n\nTAB");
    assert!(t.ok);
    assert_eq!(t.lines, 5);
    assert_eq!(
        body(&t),
        ["pressSingleKey(KEY_RETURN);", "pressSingleKey(KEY_TAB);"]
    );
}

#[test]
fn line_numbers_count_blank_lines() {
    let t = run("\n\nDELAY 0\n");
    let d = single_diag(&t.diagnostics, codes::ARGUMENT);
    assert_eq!(d.line, Some(3));
    assert_eq!(
        d.message,
        "Invalid command argument(s): expected integer in range from 1 to 10^5"
    );
}

#[test]
fn continue_policy_collects_every_error() {
    let t = run_continue("DELAY 0\nENTER x\nTAB\nDEFAULTDELAY 5\nFOO\n");
    assert!(!t.ok);
    let lines: Vec<_> = t.diagnostics.iter().map(|d| (d.id.as_ref(), d.line)).collect();
    assert_eq!(
        lines,
        [
            (codes::ARGUMENT, Some(1)),
            (codes::ARGUMENT, Some(2)),
            (codes::USAGE, Some(4)),
            (codes::UNDEFINED_COMMAND, Some(5)),
        ]
    );
    assert_eq!(body(&t), ["pressSingleKey(KEY_TAB);"]);
}

#[test]
fn every_diagnostic_carries_a_line_and_span() {
    let input = "DELAY x\nSTRING\nFOO\n";
    let t = run_continue(input);
    assert_eq!(t.diagnostics.len(), 3);
    for d in &t.diagnostics {
        let span = d.span.expect("span");
        let line = d.line.expect("line");
        assert_eq!(&input[span.start..span.end], input.lines().nth(line - 1).unwrap());
    }
}

// ─── Delays ─────────────────────────────────────────────────────────────────

#[test]
fn delay_accepts_full_range() {
    for ms in [1, 42, 10_000, 100_000] {
        let t = run(&format!("DELAY {ms}"));
        assert_eq!(body(&t), [format!("delay({ms});")]);
    }
    for bad in ["0", "100001", "-1", "ten", ""] {
        let t = run(&format!("DELAY {bad}"));
        assert!(t.sketch.is_none(), "DELAY {bad:?} should fail");
        single_diag(&t.diagnostics, codes::ARGUMENT);
    }
}

#[test]
fn default_delay_must_be_first() {
    let t = run("ENTER\nDEFAULTDELAY 100\n");
    let d = single_diag(&t.diagnostics, codes::USAGE);
    assert_eq!(d.line, Some(2));
    assert_eq!(
        d.message,
        "Invalid command usage: command can be used once at the top of script"
    );
    assert!(t.sketch.is_none());

    let t = run("REM first\nDEFAULT_DELAY 100\n");
    single_diag(&t.diagnostics, codes::USAGE);
}

// ─── Strings ────────────────────────────────────────────────────────────────

#[test]
fn alt_mode_rejects_characters_outside_the_alphabet() {
    let t = run("STRING héllo");
    let d = single_diag(&t.diagnostics, codes::ARGUMENT);
    assert_eq!(
        d.message,
        "Invalid command argument(s): undefined character of string `é` in 2 position"
    );
}

#[test]
fn string_delay_reports_position_of_unknown_character() {
    let t = run("ENTER\nSTRINGDELAY 50 ok 😀");
    assert!(t.sketch.is_none());
    let d = single_diag(&t.diagnostics, codes::ARGUMENT);
    assert_eq!(d.line, Some(2));
    assert_eq!(
        d.message,
        "Invalid command argument(s): undefined character of string `😀` in 4 position"
    );
}

#[test]
fn plain_mode_accepts_anything() {
    let t = run_plain("STRING héllo 🦆");
    assert_eq!(body(&t), [r#"printDefaultString(F("héllo 🦆"));"#]);
}

#[test]
fn alt_mode_types_cyrillic_codes() {
    let t = run("STRING Жж");
    assert_eq!(body(&t), ["printAltString({134_S, 166_S});"]);
}

#[test]
fn string_keeps_inner_spacing() {
    let t = run_plain("STRING  two  spaces");
    assert_eq!(body(&t), [r#"printDefaultString(F(" two  spaces"));"#]);
}

#[test]
fn string_requires_text() {
    let t = run("STRING");
    let d = single_diag(&t.diagnostics, codes::ARGUMENT);
    assert!(d.message.ends_with("expected string, but got nothing"));
}

// ─── Keys ───────────────────────────────────────────────────────────────────

#[test]
fn control_alt_delete() {
    let t = run("CONTROL ALT DELETE");
    assert_eq!(
        body(&t),
        ["pressComboKey({(uint8_t)KEY_LEFT_CTRL, (uint8_t)KEY_LEFT_ALT, (uint8_t)KEY_DELETE});"]
    );
}

#[test]
fn self_combination_is_rejected() {
    for line in ["CONTROL CONTROL a", "CTRL CONTROL a", "WIN GUI r"] {
        let t = run(line);
        let d = single_diag(&t.diagnostics, codes::ARGUMENT);
        assert!(
            d.message.ends_with("first argument must not match the command name"),
            "{line}: {}",
            d.message
        );
    }
}

#[test]
fn combo_terminal_key() {
    assert_eq!(
        body(&run("GUI r")),
        ["pressComboKey({(uint8_t)KEY_LEFT_GUI, (uint8_t)'r'});"]
    );
    assert_eq!(
        body(&run("SHIFT TAB")),
        ["pressComboKey({(uint8_t)KEY_LEFT_SHIFT, (uint8_t)KEY_TAB});"]
    );
    let t = run("ALT F");
    let d = single_diag(&t.diagnostics, codes::ARGUMENT);
    assert!(d.message.contains("but got `F`"));
}

// ─── Payloads ───────────────────────────────────────────────────────────────

#[test]
fn shared_payload_appears_once_before_dependents() {
    let t = run("STRING hi\nENTER\nSTRING there\n");
    let text = sketch(&t);
    assert_eq!(text.matches("void pressSingleKey(uint8_t key);").count(), 1);
    assert_eq!(text.matches("void pressSingleKey(uint8_t key) {").count(), 1);
    assert_eq!(text.matches("printAltString(const uint16_t (&codes)[N], int delayTec) {").count(), 1);

    let decl = text.find("void pressSingleKey(uint8_t key);").unwrap();
    let alt_decl = text.find("printAltString(const uint16_t (&codes)[N], int delayTec = 0);").unwrap();
    let prologue = text.find("#include <Keyboard.h>").unwrap();
    let def = text.find("void pressSingleKey(uint8_t key) {").unwrap();
    let alt_def = text.find("printAltString(const uint16_t (&codes)[N], int delayTec) {").unwrap();
    let setup = text.find("void setup() {").unwrap();
    assert!(decl < alt_decl && alt_decl < prologue);
    assert!(prologue < def && def < alt_def && alt_def < setup);
}

#[test]
fn unused_payloads_are_omitted() {
    let t = run("DELAY 10");
    let text = sketch(&t);
    assert!(!text.contains("pressSingleKey"));
    assert!(!text.contains("printAltString"));
}

#[test]
fn plain_and_alt_payloads_differ() {
    let plain = run_plain("STRING a");
    assert!(sketch(&plain).contains("void printDefaultString(String string, int delayTec) {"));
    assert!(!sketch(&plain).contains("printAltString"));
    let alt = run("STRING a");
    assert!(!sketch(&alt).contains("printDefaultString"));
}

// ─── Output ─────────────────────────────────────────────────────────────────

#[test]
fn output_is_deterministic() {
    let input = "DEFAULTDELAY 20\nSTRING Hello\nCTRL ALT DELETE\nREPEAT 3 2\nREM done\n";
    let a = run(input);
    let b = run(input);
    assert_eq!(a.sketch, b.sketch);
    assert!(a.sketch.is_some());
}

#[test]
fn indent_width_applies_to_nested_blocks() {
    let t = translate_str(
        "ENTER\nREPEAT 2\n",
        EngineConfig::default(),
        common::ALPHABET.clone(),
        &RenderConfig { indent: 4 },
    );
    let text = t.sketch.unwrap();
    assert!(text.contains("\n    for (short i = 0; i < 2; ++i) {\n        pressSingleKey(KEY_RETURN);\n    }\n"));
}

#[test]
fn engine_can_be_fed_line_by_line() {
    let mut engine = Engine::new(
        EngineConfig::default().with_error_policy(ErrorPolicy::Continue),
        common::ALPHABET.clone(),
    );
    engine.feed("STRING a").unwrap();
    engine.feed("NOPE").unwrap();
    assert_eq!(engine.history().len(), 2);
    assert_eq!(engine.diagnostics().len(), 1);
    let t = engine.finish(&RenderConfig::default());
    assert!(!t.ok);
    assert_eq!(t.lines, 2);
    assert!(t.sketch.unwrap().contains("printAltString({97_S});"));
}

#[test]
fn translation_serializes_to_json() {
    let t = run_with("FOO", EngineConfig::default());
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["ok"], false);
    assert!(v["sketch"].is_null());
    assert_eq!(v["diagnostics"][0]["id"], "DKY1003");
    assert_eq!(v["diagnostics"][0]["severity"], "error");
    assert_eq!(v["diagnostics"][0]["line"], 1);
    assert_eq!(t.diagnostics[0].severity, Severity::Error);
}
