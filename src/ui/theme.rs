use anyhow::{Result, bail};
use crossterm::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_correct")]
    pub correct: String,
    #[serde(default = "default_incorrect")]
    pub incorrect: String,
    #[serde(default = "default_pending")]
    pub pending: String,
}

fn default_correct() -> String {
    "green".to_string()
}
fn default_incorrect() -> String {
    "red".to_string()
}
fn default_pending() -> String {
    "dark_grey".to_string()
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            correct: default_correct(),
            incorrect: default_incorrect(),
            pending: default_pending(),
        }
    }
}

/// Resolved colors for the typing line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub correct: Color,
    pub incorrect: Color,
    pub pending: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            correct: Color::Green,
            incorrect: Color::Red,
            pending: Color::DarkGrey,
        }
    }
}

impl Palette {
    pub fn from_config(colors: &ColorConfig) -> Result<Self> {
        Ok(Self {
            correct: parse_color(&colors.correct)?,
            incorrect: parse_color(&colors.incorrect)?,
            pending: parse_color(&colors.pending)?,
        })
    }
}

/// Accepts `#rrggbb` or a basic ANSI color name.
pub fn parse_color(spec: &str) -> Result<Color> {
    let spec = spec.trim();
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Ok(Color::Rgb { r, g, b });
            }
        }
        bail!("invalid hex color: {spec}");
    }

    let color = match spec.to_ascii_lowercase().replace('-', "_").as_str() {
        "reset" | "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => bail!("unknown color: {spec}"),
    };
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("green").unwrap(), Color::Green);
        assert_eq!(parse_color("Dark-Grey").unwrap(), Color::DarkGrey);
        assert_eq!(parse_color("gray").unwrap(), Color::Grey);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(
            parse_color("#a6e3a1").unwrap(),
            Color::Rgb {
                r: 0xa6,
                g: 0xe3,
                b: 0xa1
            }
        );
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn test_unknown_color_rejected() {
        assert!(parse_color("chartreuse").is_err());
    }

    #[test]
    fn test_default_config_resolves_to_default_palette() {
        let palette = Palette::from_config(&ColorConfig::default()).unwrap();
        assert_eq!(palette, Palette::default());
    }
}
