//! Key input decoded from terminal key codes.

/// Raw code of Ctrl-C.
pub const CTRL_C: i32 = 3;
/// Raw code of Ctrl-D.
pub const CTRL_D: i32 = 4;
/// Raw code of Ctrl-F.
pub const CTRL_F: i32 = 6;
/// Raw code of Ctrl-H.
pub const CTRL_H: i32 = 8;
/// Raw code of Tab.
pub const TAB: i32 = 9;
/// Raw code of Ctrl-L.
pub const CTRL_L: i32 = 12;
/// Raw code of Enter.
pub const ENTER: i32 = 13;
/// Raw code of Ctrl-Q.
pub const CTRL_Q: i32 = 17;
/// Raw code of Ctrl-S.
pub const CTRL_S: i32 = 19;
/// Raw code of Ctrl-U.
pub const CTRL_U: i32 = 21;
/// Raw code of Escape.
pub const ESC: i32 = 27;
/// Raw code of Backspace.
pub const BACKSPACE: i32 = 127;
/// First code of the escape-sequence keys; codes above 255 never collide
/// with bytes.
pub const ARROW_LEFT: i32 = 1000;
pub const ARROW_RIGHT: i32 = 1001;
pub const ARROW_UP: i32 = 1002;
pub const ARROW_DOWN: i32 = 1003;
pub const DEL_KEY: i32 = 1004;
pub const HOME_KEY: i32 = 1005;
pub const END_KEY: i32 = 1006;
pub const PAGE_UP: i32 = 1007;
pub const PAGE_DOWN: i32 = 1008;

/// A key press the editor understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A byte to insert. Tab arrives here as `b'\t'`.
    Char(u8),
    /// Enter/Return.
    Enter,
    /// Backspace.
    Backspace,
    /// Forward delete. Edits the same way as backspace.
    Delete,
    /// Escape.
    Esc,
    /// Ctrl-C.
    CtrlC,
    /// Ctrl-D.
    CtrlD,
    /// Ctrl-F: start a search.
    CtrlF,
    /// Ctrl-H: backspace on some terminals.
    CtrlH,
    /// Ctrl-L: refresh.
    CtrlL,
    /// Ctrl-Q: quit.
    CtrlQ,
    /// Ctrl-S: save.
    CtrlS,
    /// Ctrl-U.
    CtrlU,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl Key {
    /// Decode a raw key code. Zero, negative codes, and unknown codes above
    /// the byte range decode to `None`.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        let key = match code {
            CTRL_C => Self::CtrlC,
            CTRL_D => Self::CtrlD,
            CTRL_F => Self::CtrlF,
            CTRL_H => Self::CtrlH,
            CTRL_L => Self::CtrlL,
            ENTER => Self::Enter,
            CTRL_Q => Self::CtrlQ,
            CTRL_S => Self::CtrlS,
            CTRL_U => Self::CtrlU,
            ESC => Self::Esc,
            BACKSPACE => Self::Backspace,
            ARROW_LEFT => Self::Left,
            ARROW_RIGHT => Self::Right,
            ARROW_UP => Self::Up,
            ARROW_DOWN => Self::Down,
            DEL_KEY => Self::Delete,
            HOME_KEY => Self::Home,
            END_KEY => Self::End,
            PAGE_UP => Self::PageUp,
            PAGE_DOWN => Self::PageDown,
            1..=255 => Self::Char(u8::try_from(code).ok()?),
            _ => return None,
        };
        Some(key)
    }

    /// Raw code this key decodes from.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Char(c) => i32::from(c),
            Self::Enter => ENTER,
            Self::Backspace => BACKSPACE,
            Self::Delete => DEL_KEY,
            Self::Esc => ESC,
            Self::CtrlC => CTRL_C,
            Self::CtrlD => CTRL_D,
            Self::CtrlF => CTRL_F,
            Self::CtrlH => CTRL_H,
            Self::CtrlL => CTRL_L,
            Self::CtrlQ => CTRL_Q,
            Self::CtrlS => CTRL_S,
            Self::CtrlU => CTRL_U,
            Self::Left => ARROW_LEFT,
            Self::Right => ARROW_RIGHT,
            Self::Up => ARROW_UP,
            Self::Down => ARROW_DOWN,
            Self::Home => HOME_KEY,
            Self::End => END_KEY,
            Self::PageUp => PAGE_UP,
            Self::PageDown => PAGE_DOWN,
        }
    }

    /// Keys that erase the byte before the cursor.
    #[must_use]
    pub fn is_erase(self) -> bool {
        matches!(self, Self::Backspace | Self::CtrlH | Self::Delete)
    }

    /// Keys that move the cursor without editing.
    #[must_use]
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::Left
                | Self::Right
                | Self::Up
                | Self::Down
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }

    /// Printable ASCII byte, if this key carries one.
    #[must_use]
    pub fn printable(self) -> Option<u8> {
        match self {
            Self::Char(c) if c == b' ' || c.is_ascii_graphic() => Some(c),
            _ => None,
        }
    }

    /// Keys for every byte of `text`, in order.
    pub fn from_text(text: &str) -> impl Iterator<Item = Self> + '_ {
        text.bytes().map(|b| match Self::from_code(i32::from(b)) {
            Some(key) => key,
            None => Self::Char(b),
        })
    }
}
