use nom::character::complete::digit1;
use nom::combinator::all_consuming;
use nom::combinator::map_res;
use nom::error::Error as NomError;
use nom::number::complete::double;
use nom::IResult;

use thiserror::Error;

/// Longest token `parse_float` will look at, including room for a terminator.
pub const FLOAT_SCRATCH: usize = 16;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum FieldError {
    #[error("field is missing")]
    Missing,
    #[error("field is too short")]
    TooShort,
    #[error("field is malformed")]
    Malformed,
}

type E<'a> = NomError<&'a [u8]>;

fn digits(input: &[u8]) -> IResult<&[u8], u32, E<'_>> {
    map_res(
        map_res(all_consuming(digit1), std::str::from_utf8),
        |s: &str| s.parse::<u32>(),
    )(input)
}

/// Parse a strictly decimal token.
///
/// Anything other than ASCII digits, including an empty token, is `None`.
pub fn parse_int(token: &[u8]) -> Option<u32> {
    digits(token).ok().map(|(_, value)| value)
}

/// Parse the leading decimal number of a token.
///
/// Tokens too long for the scratch buffer and tokens without a leading number both yield 0.0.
pub fn parse_float(token: &[u8]) -> f64 {
    if token.len() >= FLOAT_SCRATCH {
        return 0.0;
    }

    match double::<&[u8], E>(token) {
        Ok((_, value)) => value,
        Err(_) => 0.0,
    }
}
