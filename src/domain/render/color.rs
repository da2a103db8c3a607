//! CSS colour parsing and blending for gradient fills.

use crate::domain::error::PlotlineError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)`.
    pub fn parse(color: &str) -> Result<Self, PlotlineError> {
        let color = color.trim();
        let invalid = || PlotlineError::configuration(format!("invalid colour '{color}'"));

        if let Some(hex) = color.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
            return match hex.len() {
                3 => {
                    let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                    Ok(Rgba {
                        r: expand(0)?,
                        g: expand(1)?,
                        b: expand(2)?,
                        a: 1.0,
                    })
                }
                6 | 8 => Ok(Rgba {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                    a: if hex.len() == 8 {
                        f64::from(channel(&hex[6..8])?) / 255.0
                    } else {
                        1.0
                    },
                }),
                _ => Err(invalid()),
            };
        }

        let body = color
            .strip_prefix("rgba(")
            .or_else(|| color.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<u8>().map_err(|_| invalid());
        match parts.as_slice() {
            [r, g, b] => Ok(Rgba {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
                a: 1.0,
            }),
            [r, g, b, a] => Ok(Rgba {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
                a: a.parse::<f64>().map_err(|_| invalid())?.clamp(0.0, 1.0),
            }),
            _ => Err(invalid()),
        }
    }

    /// Linear blend; `t` is clamped to [0, 1].
    pub fn mix(&self, other: &Rgba, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}
