use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{CodecError, decode_coordinate};
use crate::math::haversine_km;

/// A 2-D coordinate: `x` is longitude (or easting), `y` latitude (or northing).
///
/// `Coordinate` is `Copy`; a copy never shares storage with its source.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Coordinate {
    x: f64,
    y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn lon(&self) -> f64 {
        self.x
    }

    pub fn lat(&self) -> f64 {
        self.y
    }

    pub fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    /// Both components are finite.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Great-circle distance in kilometres, treating `x`/`y` as lon/lat degrees.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_km(self.y, self.x, other.y, other.x)
    }

    /// Parses `"x/y"`, `"x:y"` or `"x,y"` using the delimiter rules of `format`.
    pub fn parse(s: &str, format: &NumberFormat) -> Result<Self, CodecError> {
        let parts: Vec<&str> = s
            .split(|c: char| format.is_delimiter(c))
            .map(str::trim)
            .collect();
        if parts.len() != 2 {
            return Err(CodecError::Parse(format!(
                "expected 2 coordinate parts in {s:?}, found {}",
                parts.len()
            )));
        }
        let x = format.parse_number(parts[0])?;
        let y = format.parse_number(parts[1])?;
        Ok(Self::new(x, y))
    }

    /// Formats as `x/y` with the decimal separator of `format`.
    pub fn format(&self, format: &NumberFormat) -> String {
        format!(
            "{}/{}",
            format.format_number(self.x),
            format.format_number(self.y)
        )
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(v: (f64, f64)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, &NumberFormat::invariant())
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        decode_coordinate(&value, &NumberFormat::invariant()).map_err(serde::de::Error::custom)
    }
}

/// Numeric formatting rules injected into coordinate parsing.
///
/// When the decimal separator is `,`, only `/` and `:` split coordinate parts;
/// otherwise `,`, `/` and `:` all do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub decimal_separator: char,
}

impl NumberFormat {
    pub const fn new(decimal_separator: char) -> Self {
        Self { decimal_separator }
    }

    pub const fn invariant() -> Self {
        Self::new('.')
    }

    pub const fn decimal_comma() -> Self {
        Self::new(',')
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        match c {
            '/' | ':' => true,
            ',' => self.decimal_separator != ',',
            _ => false,
        }
    }

    fn parse_number(&self, token: &str) -> Result<f64, CodecError> {
        let normalized = if self.decimal_separator == '.' {
            token.to_string()
        } else {
            token.replace(self.decimal_separator, ".")
        };
        let v: f64 = normalized
            .parse()
            .map_err(|e| CodecError::Parse(format!("{token:?}: {e}")))?;
        if !v.is_finite() {
            return Err(CodecError::Parse(format!("{token:?} is not finite")));
        }
        Ok(v)
    }

    fn format_number(&self, v: f64) -> String {
        let s = v.to_string();
        if self.decimal_separator == '.' {
            s
        } else {
            s.replace('.', &self.decimal_separator.to_string())
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::invariant()
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, NumberFormat};

    #[test]
    fn parses_slash_delimited() {
        let c: Coordinate = "1.1/2.2".parse().unwrap();
        assert_eq!(c, Coordinate::new(1.1, 2.2));
    }

    #[test]
    fn parses_colon_and_comma_in_dot_locale() {
        let f = NumberFormat::invariant();
        assert_eq!(
            Coordinate::parse("3.5:-4", &f).unwrap(),
            Coordinate::new(3.5, -4.0)
        );
        assert_eq!(
            Coordinate::parse(" 3.5 , 4 ", &f).unwrap(),
            Coordinate::new(3.5, 4.0)
        );
    }

    #[test]
    fn decimal_comma_locale_keeps_commas_in_numbers() {
        let c = Coordinate::parse("1,1/2,2", &NumberFormat::decimal_comma()).unwrap();
        assert_eq!(c, Coordinate::new(1.1, 2.2));
    }

    #[test]
    fn decimal_comma_string_fails_in_dot_locale() {
        assert!(Coordinate::parse("1,1/2,2", &NumberFormat::invariant()).is_err());
    }

    #[test]
    fn comma_is_not_a_delimiter_in_comma_locale() {
        assert!(Coordinate::parse("1,2", &NumberFormat::decimal_comma()).is_err());
    }

    #[test]
    fn rejects_non_finite_parts() {
        assert!("NaN/1".parse::<Coordinate>().is_err());
        assert!("1/inf".parse::<Coordinate>().is_err());
    }

    #[test]
    fn formats_with_locale_separator() {
        let c = Coordinate::new(1.5, -2.25);
        assert_eq!(c.to_string(), "1.5/-2.25");
        let comma = NumberFormat::decimal_comma();
        assert_eq!(c.format(&comma), "1,5/-2,25");
        assert_eq!(Coordinate::parse(&c.format(&comma), &comma).unwrap(), c);
    }

    #[test]
    fn distance_one_degree_of_latitude() {
        let d = Coordinate::new(0.0, 0.0).distance_to(&Coordinate::new(0.0, 1.0));
        assert!((d - 111.2).abs() < 111.2 * 0.01, "got {d}");
    }

    #[test]
    fn copies_do_not_alias() {
        let original = Coordinate::new(1.0, 2.0);
        let mut copy = original;
        copy.set_x(10.0);
        copy.set_y(20.0);
        assert_eq!(original, Coordinate::new(1.0, 2.0));
        assert_eq!(copy, Coordinate::new(10.0, 20.0));
    }

    #[test]
    fn serde_uses_array_form() {
        let json = serde_json::to_string(&Coordinate::new(1.5, 2.0)).unwrap();
        assert_eq!(json, "[1.5,2.0]");
        let back: Coordinate = serde_json::from_str("\"7/8\"").unwrap();
        assert_eq!(back, Coordinate::new(7.0, 8.0));
    }
}
