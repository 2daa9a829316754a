use image::Rgb;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "[u8; 3]")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.red, self.green, self.blue)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> [u8; 3] {
        c.to_array()
    }
}

impl From<Color> for Rgb<u8> {
    fn from(c: Color) -> Rgb<u8> {
        Rgb(c.to_array())
    }
}

/// Color painted for any name that is not in the palette. Deliberately loud
/// so that a palette miss is obvious in the output.
pub const SENTINEL: Color = Color::rgb(255, 0, 255);

/// The sixteen dye colors, in display order.
pub const DYES: [(&str, Color); 16] = [
    ("white", Color::rgb(249, 255, 254)),
    ("light_gray", Color::rgb(157, 157, 151)),
    ("gray", Color::rgb(71, 79, 82)),
    ("black", Color::rgb(29, 29, 33)),
    ("brown", Color::rgb(131, 84, 50)),
    ("red", Color::rgb(176, 46, 38)),
    ("orange", Color::rgb(249, 128, 29)),
    ("yellow", Color::rgb(254, 216, 61)),
    ("lime", Color::rgb(128, 199, 31)),
    ("green", Color::rgb(94, 124, 22)),
    ("cyan", Color::rgb(22, 156, 156)),
    ("light_blue", Color::rgb(58, 179, 218)),
    ("blue", Color::rgb(60, 68, 170)),
    ("purple", Color::rgb(137, 50, 184)),
    ("magenta", Color::rgb(199, 78, 189)),
    ("pink", Color::rgb(243, 139, 170)),
];

/// Read-only view over [`DYES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette;

impl Palette {
    pub fn get(&self, name: &str) -> Option<Color> {
        DYES.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Like [`Palette::get`], but unknown names map to [`SENTINEL`].
    pub fn sample(&self, name: &str) -> Color {
        self.get(name).unwrap_or(SENTINEL)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        DYES.iter().map(|(n, _)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Color)> {
        DYES.iter().copied()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub rgb: Color,
}

impl Palette {
    pub fn entries(&self) -> Vec<PaletteEntry> {
        self.iter().map(|(name, rgb)| PaletteEntry { name, rgb }).collect()
    }
}
