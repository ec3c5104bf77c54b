//! Key tables for single-key and combo-key commands.
//!
//! Each [`KeyDef`] is one key family: every name in `names` invokes the same
//! key, and `constant` is the firmware expression passed to the keyboard
//! library.

/// One key family.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyDef {
    /// Command names, canonical name first.
    pub names: &'static [&'static str],
    /// Firmware key expression (e.g. `KEY_LEFT_CTRL`, `' '`).
    pub constant: &'static str,
    /// One-line description for listings.
    pub description: &'static str,
}

impl KeyDef {
    /// Canonical (first) name.
    pub fn canonical(&self) -> &'static str {
        self.names[0]
    }
}

macro_rules! keys {
    ($([$($name:literal),+] => $constant:literal, $description:literal;)+) => {
        &[$(KeyDef {
            names: &[$($name),+],
            constant: $constant,
            description: $description,
        }),+]
    };
}

/// Keys pressed and released on their own.
pub static SINGLE_KEYS: &[KeyDef] = keys! {
    ["MENU", "APP"] => "KEY_MENU", "Context menu key, similar to SHIFT F10 on Windows";
    ["DOWNARROW", "DOWN"] => "KEY_DOWN_ARROW", "Down arrow";
    ["UPARROW", "UP"] => "KEY_UP_ARROW", "Up arrow";
    ["LEFTARROW", "LEFT"] => "KEY_LEFT_ARROW", "Left arrow";
    ["RIGHTARROW", "RIGHT"] => "KEY_RIGHT_ARROW", "Right arrow";
    ["DELETE"] => "KEY_DELETE", "Delete";
    ["END"] => "KEY_END", "End";
    ["HOME"] => "KEY_HOME", "Home";
    ["INSERT"] => "KEY_INSERT", "Insert";
    ["PAGEUP"] => "KEY_PAGE_UP", "Page up";
    ["PAGEDOWN"] => "KEY_PAGE_DOWN", "Page down";
    ["PRINTSCREEN", "PRINTSCRN", "PRNTSCRN", "PRTSCN", "PRSC", "PRTSCR"] => "KEY_PRINT_SCREEN", "Print Screen, usually takes a screenshot";
    ["BREAK", "PAUSE"] => "KEY_PAUSE", "Pause/Break";
    ["NUMLOCK"] => "KEY_NUM_LOCK", "Toggle num lock";
    ["CAPSLOCK"] => "KEY_CAPS_LOCK", "Toggle caps lock";
    ["SCROLLLOCK"] => "KEY_SCROLL_LOCK", "Toggle scroll lock";
    ["ESC", "ESCAPE"] => "KEY_ESC", "Escape";
    ["SPACE"] => "' '", "Spacebar";
    ["TAB"] => "KEY_TAB", "Tab";
    ["BACKSPACE", "BKSP"] => "KEY_BACKSPACE", "Backspace (delete on macOS)";
    ["ENTER"] => "KEY_RETURN", "Enter";
    ["F1"] => "KEY_F1", "F1";
    ["F2"] => "KEY_F2", "F2";
    ["F3"] => "KEY_F3", "F3";
    ["F4"] => "KEY_F4", "F4";
    ["F5"] => "KEY_F5", "F5";
    ["F6"] => "KEY_F6", "F6";
    ["F7"] => "KEY_F7", "F7";
    ["F8"] => "KEY_F8", "F8";
    ["F9"] => "KEY_F9", "F9";
    ["F10"] => "KEY_F10", "F10";
    ["F11"] => "KEY_F11", "F11";
    ["F12"] => "KEY_F12", "F12";
    ["F13"] => "KEY_F13", "F13";
    ["F14"] => "KEY_F14", "F14";
    ["F15"] => "KEY_F15", "F15";
    ["F16"] => "KEY_F16", "F16";
    ["F17"] => "KEY_F17", "F17";
    ["F18"] => "KEY_F18", "F18";
    ["F19"] => "KEY_F19", "F19";
    ["F20"] => "KEY_F20", "F20";
    ["F21"] => "KEY_F21", "F21";
    ["F22"] => "KEY_F22", "F22";
    ["F23"] => "KEY_F23", "F23";
    ["F24"] => "KEY_F24", "F24";
};

/// Modifier keys held down while another key is pressed.
pub static COMBO_KEYS: &[KeyDef] = keys! {
    ["WINDOWS", "WIN", "GUI", "COMMAND", "CMD", "META"] => "KEY_LEFT_GUI", "Windows/Super/Command key";
    ["SHIFT"] => "KEY_LEFT_SHIFT", "Shift, e.g. for selecting text while navigating";
    ["ALT"] => "KEY_LEFT_ALT", "Alt, e.g. for switching between windows";
    ["CONTROL", "CTRL"] => "KEY_LEFT_CTRL", "Control, e.g. for saving or undoing";
};

fn find(table: &'static [KeyDef], name: &str) -> Option<&'static KeyDef> {
    table.iter().find(|k| k.names.iter().any(|n| *n == name))
}

/// Single key family invoked by `name`.
pub fn single_key(name: &str) -> Option<&'static KeyDef> {
    find(SINGLE_KEYS, name)
}

/// Combo key family invoked by `name`.
pub fn combo_key(name: &str) -> Option<&'static KeyDef> {
    find(COMBO_KEYS, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn aliases_resolve_to_one_family() {
        assert_eq!(single_key("ESC"), single_key("ESCAPE"));
        assert_eq!(single_key("PRTSCR").unwrap().constant, "KEY_PRINT_SCREEN");
        assert_eq!(combo_key("CTRL").unwrap().canonical(), "CONTROL");
        assert_eq!(combo_key("META").unwrap().constant, "KEY_LEFT_GUI");
    }

    #[test]
    fn tables_do_not_overlap() {
        for key in SINGLE_KEYS {
            for name in key.names {
                assert!(combo_key(name).is_none(), "{name} is in both tables");
            }
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for key in SINGLE_KEYS.iter().chain(COMBO_KEYS) {
            for name in key.names {
                assert!(seen.insert(*name), "duplicate key name {name}");
            }
        }
    }

    #[test]
    fn lowercase_names_are_not_keys() {
        assert!(single_key("enter").is_none());
        assert!(combo_key("ctrl").is_none());
    }
}
