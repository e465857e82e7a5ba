//! Select Graphic Rendition

use crate::core::{CellAttributes, Color};

/// One decoded SGR instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SgrAttribute {
    Reset,
    Bold,
    Underline,
    Blink,
    Inverse,
    Hidden,
    NormalIntensity,
    NotUnderlined,
    NotBlinking,
    NotInverse,
    NotHidden,
    Foreground(Color),
    Background(Color),
    DefaultForeground,
    DefaultBackground,
}

impl SgrAttribute {
    fn is_color(self) -> bool {
        matches!(
            self,
            SgrAttribute::Foreground(_)
                | SgrAttribute::Background(_)
                | SgrAttribute::DefaultForeground
                | SgrAttribute::DefaultBackground
        )
    }
}

/// Decode SGR parameters. An empty list means reset; unknown values and
/// malformed extended colors are skipped.
pub fn parse_sgr(params: &[u16]) -> Vec<SgrAttribute> {
    if params.is_empty() {
        return vec![SgrAttribute::Reset];
    }

    let mut attrs = Vec::with_capacity(params.len());
    let mut i = 0;
    while i < params.len() {
        let attr = match params[i] {
            0 => Some(SgrAttribute::Reset),
            1 => Some(SgrAttribute::Bold),
            4 => Some(SgrAttribute::Underline),
            5 | 6 => Some(SgrAttribute::Blink),
            7 => Some(SgrAttribute::Inverse),
            8 => Some(SgrAttribute::Hidden),
            22 => Some(SgrAttribute::NormalIntensity),
            24 => Some(SgrAttribute::NotUnderlined),
            25 => Some(SgrAttribute::NotBlinking),
            27 => Some(SgrAttribute::NotInverse),
            28 => Some(SgrAttribute::NotHidden),
            p @ 30..=37 => Some(SgrAttribute::Foreground(Color::Indexed((p - 30) as u8))),
            38 => parse_extended_color(params, &mut i).map(SgrAttribute::Foreground),
            39 => Some(SgrAttribute::DefaultForeground),
            p @ 40..=47 => Some(SgrAttribute::Background(Color::Indexed((p - 40) as u8))),
            48 => parse_extended_color(params, &mut i).map(SgrAttribute::Background),
            49 => Some(SgrAttribute::DefaultBackground),
            p @ 90..=97 => Some(SgrAttribute::Foreground(Color::Indexed((p - 90 + 8) as u8))),
            p @ 100..=107 => Some(SgrAttribute::Background(Color::Indexed((p - 100 + 8) as u8))),
            p => {
                tracing::debug!(param = p, "unhandled SGR");
                None
            }
        };
        attrs.extend(attr);
        i += 1;
    }
    attrs
}

/// `38;5;n` or `38;2;r;g;b`, with `i` at the 38/48. Leaves `i` on the last
/// consumed parameter.
fn parse_extended_color(params: &[u16], i: &mut usize) -> Option<Color> {
    let channel = |value: u16| u8::try_from(value).ok();
    match params.get(*i + 1).copied() {
        Some(5) => {
            let index = params.get(*i + 2).copied();
            *i = (*i + 2).min(params.len() - 1);
            index.and_then(channel).map(Color::Indexed)
        }
        Some(2) => {
            let rgb = params.get(*i + 2..*i + 5);
            *i = (*i + 4).min(params.len() - 1);
            match rgb {
                Some(&[r, g, b]) => Some(Color::Rgb(channel(r)?, channel(g)?, channel(b)?)),
                _ => None,
            }
        }
        _ => {
            *i = params.len() - 1;
            None
        }
    }
}

/// Apply SGR parameters to the pen. Color changes are dropped when
/// `colors` is false.
pub fn apply_sgr(pen: &mut CellAttributes, params: &[u16], colors: bool) {
    for attr in parse_sgr(params) {
        if attr.is_color() && !colors {
            continue;
        }
        match attr {
            SgrAttribute::Reset => *pen = CellAttributes::default(),
            SgrAttribute::Bold => pen.bold = true,
            SgrAttribute::Underline => pen.underline = true,
            SgrAttribute::Blink => pen.blink = true,
            SgrAttribute::Inverse => pen.inverse = true,
            SgrAttribute::Hidden => pen.hidden = true,
            SgrAttribute::NormalIntensity => pen.bold = false,
            SgrAttribute::NotUnderlined => pen.underline = false,
            SgrAttribute::NotBlinking => pen.blink = false,
            SgrAttribute::NotInverse => pen.inverse = false,
            SgrAttribute::NotHidden => pen.hidden = false,
            SgrAttribute::Foreground(color) => pen.fg = color,
            SgrAttribute::Background(color) => pen.bg = color,
            SgrAttribute::DefaultForeground => pen.fg = Color::Default,
            SgrAttribute::DefaultBackground => pen.bg = Color::Default,
        }
    }
}

/// The SGR parameter string that recreates `pen` from a reset, e.g.
/// `0;1;31`
pub fn sgr_report(pen: &CellAttributes) -> String {
    let mut parts = vec![String::from("0")];
    for (set, code) in [
        (pen.bold, "1"),
        (pen.underline, "4"),
        (pen.blink, "5"),
        (pen.inverse, "7"),
        (pen.hidden, "8"),
    ] {
        if set {
            parts.push(code.to_string());
        }
    }
    parts.extend(color_report(pen.fg, 30));
    parts.extend(color_report(pen.bg, 40));
    parts.join(";")
}

fn color_report(color: Color, base: u16) -> Option<String> {
    match color {
        Color::Default => None,
        Color::Indexed(i) if i < 8 => Some((base + u16::from(i)).to_string()),
        Color::Indexed(i) if i < 16 => Some((base + 60 + u16::from(i - 8)).to_string()),
        Color::Indexed(i) => Some(format!("{};5;{}", base + 8, i)),
        Color::Rgb(r, g, b) => Some(format!("{};2;{};{};{}", base + 8, r, g, b)),
    }
}
