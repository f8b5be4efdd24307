//! Keyboard shortcuts.
//!
//! Bindings are written as `+`-joined modifiers followed by a key, for
//! example `Ctrl+S`, `Shift+Delete` or `R`. Matching is case-insensitive and
//! requires the exact modifier set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Diagram commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    Export,
    DeleteSelected,
    RotateSelected,
    Deselect,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 4] = [
        ShortcutAction::Export,
        ShortcutAction::DeleteSelected,
        ShortcutAction::RotateSelected,
        ShortcutAction::Deselect,
    ];

    /// Name used in the `[shortcuts]` config table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Export => "export",
            Self::DeleteSelected => "delete_selected",
            Self::RotateSelected => "rotate_selected",
            Self::Deselect => "deselect",
        }
    }
}

impl FromStr for ShortcutAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown shortcut action: {}", s))
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key press delivered to the diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }
}

/// A key plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    key: String,
    modifiers: Modifiers,
}

impl KeyBinding {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.modifiers == event.modifiers && self.key == normalize_key(&event.key)
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim().to_ascii_lowercase();
    match key.as_str() {
        "del" => "delete".to_string(),
        "esc" => "escape".to_string(),
        "space" | "spacebar" => " ".to_string(),
        _ => key,
    }
}

impl FromStr for KeyBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let Some((key, mods)) = parts.split_last() else {
            return Err(format!("Empty key binding: {:?}", s));
        };
        if key.is_empty() {
            return Err(format!("Key binding has no key: {:?}", s));
        }

        let mut modifiers = Modifiers::default();
        for m in mods {
            match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                other => return Err(format!("Unknown modifier {:?} in {:?}", other, s)),
            }
        }
        Ok(Self {
            key: normalize_key(key),
            modifiers,
        })
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.ctrl, "Ctrl"),
            (m.shift, "Shift"),
            (m.alt, "Alt"),
            (m.meta, "Meta"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

/// Key bindings for diagram actions. An action may have several bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutMap {
    bindings: Vec<(KeyBinding, ShortcutAction)>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let defaults = [
            ("Ctrl+S", ShortcutAction::Export),
            ("Delete", ShortcutAction::DeleteSelected),
            ("Backspace", ShortcutAction::DeleteSelected),
            ("Escape", ShortcutAction::Deselect),
            ("R", ShortcutAction::RotateSelected),
        ];
        let bindings = defaults
            .into_iter()
            .filter_map(|(b, a)| b.parse::<KeyBinding>().ok().map(|b| (b, a)))
            .collect();
        Self { bindings }
    }
}

impl ShortcutMap {
    /// Default bindings with `overrides` (action name -> binding) applied.
    ///
    /// An override replaces every default binding of its action. Invalid
    /// entries are logged and skipped.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        for (action, binding) in overrides {
            let action = match action.parse::<ShortcutAction>() {
                Ok(a) => a,
                Err(e) => {
                    tracing::warn!("Ignoring shortcut override: {}", e);
                    continue;
                }
            };
            match binding.parse::<KeyBinding>() {
                Ok(binding) => map.bind(binding, action),
                Err(e) => tracing::warn!("Ignoring shortcut for {}: {}", action.as_str(), e),
            }
        }
        map
    }

    /// Binds `binding` as the only binding of `action`.
    pub fn bind(&mut self, binding: KeyBinding, action: ShortcutAction) {
        self.bindings
            .retain(|(b, a)| *a != action && *b != binding);
        self.bindings.push((binding, action));
    }

    pub fn action_for(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        self.bindings
            .iter()
            .find(|(b, _)| b.matches(event))
            .map(|(_, a)| *a)
    }

    pub fn bindings_for(&self, action: ShortcutAction) -> Vec<&KeyBinding> {
        self.bindings
            .iter()
            .filter(|(_, a)| *a == action)
            .map(|(b, _)| b)
            .collect()
    }
}
