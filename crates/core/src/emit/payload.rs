//! Support-code fragments shared by generated statements.
//!
//! A [`Payload`] is a helper function the sketch needs once, no matter how
//! many lines call it. Commands report the payloads their output relies on;
//! [`resolve`] closes that set over [`Payload::depends`], drops duplicates,
//! and orders it so every payload follows the payloads it calls.

use std::collections::HashSet;
use std::fmt;

use super::{CodeNode, Snippet};

/// A named helper with a forward declaration and a definition.
///
/// Payloads are compared by name.
pub struct Payload {
    /// Unique name (the helper function name).
    pub name: &'static str,
    /// Forward declaration lines, emitted above the program prologue.
    pub header: &'static [&'static str],
    /// Definition, emitted after the prologue.
    pub body: &'static [Snippet],
    /// Payloads this one calls.
    pub depends: &'static [&'static Payload],
}

impl Payload {
    /// Definition as an owned code tree.
    pub fn body_nodes(&self) -> Vec<CodeNode> {
        self.body.iter().map(CodeNode::from).collect()
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Payload {}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("name", &self.name)
            .field(
                "depends",
                &self.depends.iter().map(|d| d.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// ── Registry ────────────────────────────────────────────────────────────

/// Press and release one key.
pub static PRESS_SINGLE_KEY: Payload = Payload {
    name: "pressSingleKey",
    header: &["void pressSingleKey(uint8_t key);"],
    body: &[
        Snippet::Line("void pressSingleKey(uint8_t key) {"),
        Snippet::Block(&[
            Snippet::Line("Keyboard.press(key);"),
            Snippet::Line("delay(20);"),
            Snippet::Line("Keyboard.release(key);"),
        ]),
        Snippet::Line("}"),
    ],
    depends: &[],
};

/// Hold several keys at once, then release them all.
pub static PRESS_COMBO_KEY: Payload = Payload {
    name: "pressComboKey",
    header: &["template <size_t N> void pressComboKey(const uint8_t (&keys)[N]);"],
    body: &[
        Snippet::Line("template <size_t N> void pressComboKey(const uint8_t (&keys)[N]) {"),
        Snippet::Block(&[
            Snippet::Line("for (uint8_t key : keys) Keyboard.press(key);"),
            Snippet::Line("delay(20);"),
            Snippet::Line("Keyboard.releaseAll();"),
        ]),
        Snippet::Line("}"),
    ],
    depends: &[],
};

/// Type text as Alt codes on the numeric keypad.
pub static PRINT_ALT_STRING: Payload = Payload {
    name: "printAltString",
    header: &[
        "uint16_t operator \"\"_S(unsigned long long x);",
        "template <size_t N> void printAltString(const uint16_t (&codes)[N], int delayTec = 0);",
    ],
    body: &[
        Snippet::Line("uint16_t operator \"\"_S(unsigned long long x) {"),
        Snippet::Block(&[Snippet::Line("return (uint16_t)x;")]),
        Snippet::Line("}"),
        Snippet::Line(""),
        Snippet::Line(
            "template <size_t N> void printAltString(const uint16_t (&codes)[N], int delayTec) {",
        ),
        Snippet::Block(&[
            Snippet::Line("for (uint16_t code : codes) {"),
            Snippet::Block(&[
                Snippet::Line("int d = 1;"),
                Snippet::Line("while (d <= code / 10) d *= 10;"),
                Snippet::Line("Keyboard.press(KEY_LEFT_ALT);"),
                Snippet::Line("for (int i = d; i > 0; i /= 10) {"),
                Snippet::Block(&[
                    Snippet::Line("byte k = (code / i % 10 == 0 ? 234 : code / i % 10 + 224);"),
                    Snippet::Line("pressSingleKey(k);"),
                    Snippet::Line("delay(delayTec);"),
                ]),
                Snippet::Line("}"),
                Snippet::Line("Keyboard.release(KEY_LEFT_ALT);"),
            ]),
            Snippet::Line("}"),
        ]),
        Snippet::Line("}"),
    ],
    depends: &[&PRESS_SINGLE_KEY],
};

/// Type text with regular keystrokes of the active keyboard layout.
pub static PRINT_DEFAULT_STRING: Payload = Payload {
    name: "printDefaultString",
    header: &["void printDefaultString(String string, int delayTec = 0);"],
    body: &[
        Snippet::Line("void printDefaultString(String string, int delayTec) {"),
        Snippet::Block(&[
            Snippet::Line("for (char c : string) {"),
            Snippet::Block(&[
                Snippet::Line("pressSingleKey(c);"),
                Snippet::Line("delay(delayTec);"),
            ]),
            Snippet::Line("}"),
        ]),
        Snippet::Line("}"),
    ],
    depends: &[&PRESS_SINGLE_KEY],
};

// ── Resolver ────────────────────────────────────────────────────────────

/// Close `used` over dependencies, deduplicate by name, and order the result
/// so that each payload appears after everything it depends on.
///
/// Ties follow first use: a payload requested earlier (or required by one
/// requested earlier) comes first.
pub fn resolve<'a>(used: impl IntoIterator<Item = &'a &'static Payload>) -> Vec<&'static Payload> {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for payload in used {
        visit(*payload, &mut seen, &mut ordered);
    }
    ordered
}

fn visit(
    payload: &'static Payload,
    seen: &mut HashSet<&'static str>,
    ordered: &mut Vec<&'static Payload>,
) {
    // Marking before recursing also terminates on a cycle; no payload has one.
    if !seen.insert(payload.name) {
        return;
    }
    for dep in payload.depends {
        visit(*dep, seen, ordered);
    }
    ordered.push(payload);
}
