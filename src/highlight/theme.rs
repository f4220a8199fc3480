use super::Highlight;

const SGR_RESET_FG: &[u8] = b"\x1b[39m";
const SGR_INVERSE: &[u8] = b"\x1b[7m";
const SGR_RESET: &[u8] = b"\x1b[0m";

/// Maps highlight classes to ANSI foreground color codes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    name: String,
    colors: [u8; Highlight::ALL.len()],
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}

impl Theme {
    /// Create a theme where every class uses `default_color`.
    #[must_use]
    pub fn new(name: impl Into<String>, default_color: u8) -> Self {
        Self {
            name: name.into(),
            colors: [default_color; Highlight::ALL.len()],
        }
    }

    /// Classic eight-color terminal theme.
    #[must_use]
    pub fn ansi() -> Self {
        Self::new("ansi", 37)
            .with_color(Highlight::Comment, 36)
            .with_color(Highlight::MlComment, 36)
            .with_color(Highlight::Keyword1, 33)
            .with_color(Highlight::Keyword2, 32)
            .with_color(Highlight::String, 35)
            .with_color(Highlight::Number, 31)
            .with_color(Highlight::Match, 34)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// SGR foreground code for `class`.
    #[must_use]
    pub fn color_for(&self, class: Highlight) -> u8 {
        self.colors[usize::from(class.as_u8())]
    }

    pub fn set_color(&mut self, class: Highlight, color: u8) -> &mut Self {
        self.colors[usize::from(class.as_u8())] = color;
        self
    }

    #[must_use]
    pub fn with_color(mut self, class: Highlight, color: u8) -> Self {
        self.set_color(class, color);
        self
    }

    /// Append `render` to `out` with color escapes from `hl`.
    ///
    /// Normal bytes use the terminal's default foreground. Control bytes are
    /// shown in inverse video as `@`-based caret letters, or `?` past Ctrl-Z.
    /// The foreground is reset at the end of the row.
    pub fn paint_row(&self, render: &[u8], hl: &[Highlight], out: &mut Vec<u8>) {
        let mut current: Option<u8> = None;
        for (&c, &class) in render.iter().zip(hl) {
            match class {
                Highlight::NonPrint => {
                    out.extend_from_slice(SGR_INVERSE);
                    out.push(if c <= 26 { b'@' + c } else { b'?' });
                    out.extend_from_slice(SGR_RESET);
                    current = None;
                }
                Highlight::Normal => {
                    if current.take().is_some() {
                        out.extend_from_slice(SGR_RESET_FG);
                    }
                    out.push(c);
                }
                _ => {
                    let color = self.color_for(class);
                    if current != Some(color) {
                        out.extend_from_slice(format!("\x1b[{color}m").as_bytes());
                        current = Some(color);
                    }
                    out.push(c);
                }
            }
        }
        out.extend_from_slice(SGR_RESET_FG);
    }
}
