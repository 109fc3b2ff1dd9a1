//! Deterministic avatar colour and initials for a username.

const SATURATION: u8 = 75;
const LIGHTNESS: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = f64::from(self.hue) / 360.0;
        let s = f64::from(self.saturation) / 100.0;
        let l = f64::from(self.lightness) / 100.0;

        if s == 0.0 {
            let gray = channel(l);
            return (gray, gray, gray);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        (
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub color: Hsl,
    pub initials: String,
}

pub fn avatar_for(username: &str) -> Avatar {
    Avatar {
        color: string_to_color(username),
        initials: initials(username),
    }
}

/// Hashes UTF-16 code units with 32-bit wrapping shifts and maps the result
/// onto the hue wheel.
pub fn string_to_color(input: &str) -> Hsl {
    let mut hash: i64 = 0;
    for unit in input.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + (shifted - hash);
    }

    Hsl {
        hue: (hash % 360).unsigned_abs() as u16,
        saturation: SATURATION,
        lightness: LIGHTNESS,
    }
}

/// First letter of up to two space-separated words, upper-cased.
pub fn initials(name: &str) -> String {
    if name.is_empty() {
        return "?".to_owned();
    }

    name.split(' ')
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
        .chars()
        .take(2)
        .collect()
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_matches_reference_hash() {
        // "a": 97 -> 97 % 360
        assert_eq!(string_to_color("a").hue, 97);
        // "ab": 98 + (97 << 5) - 97 = 3105 -> 225
        assert_eq!(string_to_color("ab").hue, 225);
    }

    #[test]
    fn hue_is_stable_and_in_range_for_long_names() {
        let name = "a-very-long-username-that-overflows-the-shift";

        let first = string_to_color(name);
        let second = string_to_color(name);

        assert_eq!(first, second);
        assert!(first.hue < 360);
        assert_eq!(first.saturation, 75);
        assert_eq!(first.lightness, 60);
    }

    #[test]
    fn initials_take_first_letters_of_two_words() {
        assert_eq!(initials("john ronald tolkien"), "JR");
        assert_eq!(initials("alice"), "A");
        assert_eq!(initials(""), "?");
    }

    #[test]
    fn initials_skip_empty_words() {
        assert_eq!(initials("ada  lovelace"), "AL");
    }

    #[test]
    fn converts_primary_hues_to_rgb() {
        let red = Hsl {
            hue: 0,
            saturation: 100,
            lightness: 50,
        };
        let blue = Hsl {
            hue: 240,
            saturation: 100,
            lightness: 50,
        };

        assert_eq!(red.to_rgb(), (255, 0, 0));
        assert_eq!(blue.to_rgb(), (0, 0, 255));
    }
}
