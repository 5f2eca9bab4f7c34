/// Shared geometric and color primitives used by the compositor and the app shell.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Largest size with the same ratio that fits inside `bounds`; never enlarges.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.is_empty() || bounds.is_empty() {
            return Size::new(0.0, 0.0);
        }
        let factor = (bounds.width / self.width)
            .min(bounds.height / self.height)
            .min(1.0);
        Size::new(self.width * factor, self.height * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks every edge by `amount`, collapsing to zero instead of going negative.
    pub fn inset(self, amount: f64) -> Rect {
        let horizontal = (amount * 2.0).min(self.width);
        let vertical = (amount * 2.0).min(self.height);
        Rect::new(
            self.x + horizontal / 2.0,
            self.y + vertical / 2.0,
            self.width - horizontal,
            self.height - vertical,
        )
    }

    /// Rect of `size` centered inside `self`.
    pub fn centered(self, size: Size) -> Rect {
        let (cx, cy) = self.center();
        Rect::new(
            cx - size.width / 2.0,
            cy - size.height / 2.0,
            size.width,
            size.height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f64) -> Self {
        Self {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }

    /// Parses `#rgb`, `#rrggbb` and `#rrggbbaa`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |index: usize| u8::from_str_radix(&hex[index..index + 2], 16).ok();
        match hex.len() {
            3 => {
                let mut channels = hex
                    .chars()
                    .filter_map(|ch| ch.to_digit(16))
                    .map(|digit| (digit * 17) as u8);
                Some(Self::rgb(channels.next()?, channels.next()?, channels.next()?))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => {
                let alpha = f64::from(channel(6)?) / 255.0;
                Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?).with_alpha(alpha))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_cairo_rgba(self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            self.a.clamp(0.0, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_within_only_shrinks() {
        let image = Size::new(2560.0, 1600.0);
        assert_eq!(
            image.fit_within(Size::new(1280.0, 800.0)),
            Size::new(1280.0, 800.0)
        );
        let small = Size::new(300.0, 200.0);
        assert_eq!(small.fit_within(Size::new(1280.0, 800.0)), small);
    }

    #[test]
    fn inset_never_produces_negative_extent() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0).inset(30.0);
        assert_eq!(rect.width, 40.0);
        assert_eq!(rect.height, 0.0);
        assert_eq!(rect.y, 20.0);
    }

    #[test]
    fn parse_hex_accepts_short_long_and_alpha_forms() {
        assert_eq!(Rgba::parse_hex("#fff"), Some(Rgba::WHITE));
        assert_eq!(Rgba::parse_hex("#ef4444"), Some(Rgba::rgb(0xef, 0x44, 0x44)));
        let translucent = Rgba::parse_hex("#00000080").expect("alpha hex should parse");
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(Rgba::parse_hex("ef4444"), None);
        assert_eq!(Rgba::parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn to_hex_is_lowercase_six_digits() {
        assert_eq!(Rgba::rgb(0x18, 0x18, 0x1b).to_hex(), "#18181b");
    }
}
