#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shortcut {
    Print,
    ToggleTheme,
}

// keydown state, as reported by the browser
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyPress<'a> {
    pub key: &'a str,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress<'_> {
    // Ctrl/Cmd+P prints, Ctrl/Cmd+Shift+D toggles the theme.  the key string is
    // case-sensitive: with shift held the browser reports "D", and a shifted "P" is not a
    // print request
    pub fn shortcut(&self) -> Option<Shortcut> {
        if !(self.ctrl || self.meta) {
            return None;
        }

        match self.key {
            "p" => Some(Shortcut::Print),
            "D" if self.shift => Some(Shortcut::ToggleTheme),
            _ => None,
        }
    }
}
