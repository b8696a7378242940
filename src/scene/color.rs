use serde::Deserialize;

use crate::foundation::core::Rgba;

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: f32,
                g: f32,
                b: f32,
                #[serde(default = "one")]
                a: f32,
            },
            Arr(Vec<f32>),
        }

        fn one() -> f32 {
            1.0
        }

        let color = match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom)?,
            Repr::RgbaObj { r, g, b, a } => Rgba::new(r, g, b, a),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Rgba::new(*r, *g, *b, 1.0),
                [r, g, b, a] => Rgba::new(*r, *g, *b, *a),
                _ => {
                    return Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ));
                }
            },
        };
        if ![color.r, color.g, color.b, color.a]
            .iter()
            .all(|c| c.is_finite())
        {
            return Err(serde::de::Error::custom("color channels must be finite"));
        }
        Ok(color)
    }
}

pub(crate) fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err("hex color must be ascii".to_owned());
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Rgba::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        f32::from(a) / 255.0,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/color.rs"]
mod tests;
