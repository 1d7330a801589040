//! Unit string parsing.
//!
//! Accepts the CSS-style lengths of the configuration surface (`12`, `12px`,
//! `1.5rem`, `50%`, ...) and normalizes them into [`Length`] values.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::char,
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    sequence::{pair, tuple},
    IResult,
};

use crate::errors::ConfigError;
use crate::types::{Length, LengthUnit};

/// Parse a number (integer or float, optionally negative).
pub fn number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize(tuple((
            opt(char('-')),
            alt((
                recognize(pair(
                    take_while1(|c: char| c.is_ascii_digit()),
                    opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
                )),
                recognize(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
            )),
        ))),
        |s: &str| s.parse::<f64>(),
    )(input)
}

/// Parse a unit suffix.
pub fn unit(input: &str) -> IResult<&str, LengthUnit> {
    alt((
        value(LengthUnit::Px, tag("px")),
        value(LengthUnit::Pt, tag("pt")),
        value(LengthUnit::Mm, tag("mm")),
        value(LengthUnit::Cm, tag("cm")),
        value(LengthUnit::In, tag("in")),
        value(LengthUnit::Rem, tag("rem")),
        value(LengthUnit::Percent, tag("%")),
    ))(input)
}

/// Parse a number followed by an optional unit; a bare number is pixels.
pub fn length(input: &str) -> IResult<&str, Length> {
    map(pair(number, opt(unit)), |(value, unit)| Length {
        value,
        unit: unit.unwrap_or(LengthUnit::Px),
    })(input)
}

/// Parse a complete length string, surrounding whitespace allowed.
pub fn parse_length(input: &str) -> Result<Length, ConfigError> {
    match all_consuming(length)(input.trim()) {
        Ok((_, length)) => Ok(length),
        Err(_) => Err(ConfigError::InvalidLength {
            input: input.to_string(),
            reason: "expected a number with an optional px, pt, mm, cm, in, rem or % unit"
                .to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_length("42").unwrap(), Length::px(42.0));
        assert_eq!(parse_length(" 3.5 ").unwrap(), Length::px(3.5));
        assert_eq!(parse_length(".5").unwrap(), Length::px(0.5));
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_length("12px").unwrap(), Length::px(12.0));
        assert_eq!(parse_length("1.5rem").unwrap(), Length::rem(1.5));
        assert_eq!(parse_length("50%").unwrap(), Length::percent(50.0));
        assert_eq!(parse_length("2in").unwrap().to_px(None), Some(192.0));
    }

    #[test]
    fn test_parse_negative() {
        assert_eq!(parse_length("-4px").unwrap(), Length::px(-4.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_length("px").is_err());
        assert!(parse_length("12 px").is_err());
        assert!(parse_length("12em").is_err());
        assert!(parse_length("").is_err());
        assert!(parse_length("auto").is_err());
    }
}
