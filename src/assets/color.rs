use serde::Deserialize;

use crate::foundation::core::Rgba8;

impl<'de> Deserialize<'de> for Rgba8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            RgbaObj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => parse_color_text(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Rgba8::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Rgba8::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Rgba8::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA`, `#RGB` or a basic color name.
pub(crate) fn parse_color_text(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if let Some(named) = named_color(s) {
        return Ok(named);
    }
    let hex = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !hex.is_ascii() {
        return Err(format!("invalid color \"{s}\""));
    }
    match hex.len() {
        3 => {
            let r = hex_byte(&hex[0..1].repeat(2))?;
            let g = hex_byte(&hex[1..2].repeat(2))?;
            let b = hex_byte(&hex[2..3].repeat(2))?;
            Ok(Rgba8::rgb(r, g, b))
        }
        6 => Ok(Rgba8::rgb(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            hex_byte(&hex[6..8])?,
        )),
        _ => Err(format!(
            "color \"{s}\" must be a name, #RGB, #RRGGBB or #RRGGBBAA"
        )),
    }
}

fn named_color(name: &str) -> Option<Rgba8> {
    let c = match name.to_ascii_lowercase().as_str() {
        "black" => Rgba8::rgb(0, 0, 0),
        "white" => Rgba8::rgb(255, 255, 255),
        "red" => Rgba8::rgb(255, 0, 0),
        "green" => Rgba8::rgb(0, 128, 0),
        "blue" => Rgba8::rgb(0, 0, 255),
        "yellow" => Rgba8::rgb(255, 255, 0),
        "gray" | "grey" => Rgba8::rgb(128, 128, 128),
        "transparent" => Rgba8::rgba(0, 0, 0, 0),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
