//! Chilean RUT handling: cleaning, formatting and modulo-11 check digit validation.
//!
//! A RUT is written as `body-check`, where `body` is 7 or 8 digits and `check`
//! is a digit or `K`. The check character is derived from the body by weighting
//! its digits right-to-left with the cycle 2..=7 and taking `11 - (sum mod 11)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_BODY_LEN: usize = 7;
pub const MAX_BODY_LEN: usize = 8;
/// Longest cleaned value: 8 body digits plus the check character.
pub const MAX_CLEAN_LEN: usize = MAX_BODY_LEN + 1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    #[error("Ingrese su RUT")]
    Empty,

    #[error("El RUT solo puede contener números antes del dígito verificador")]
    NonNumericBody,

    #[error("El RUT debe tener entre 7 y 8 dígitos antes del dígito verificador")]
    BodyLength { len: usize },

    #[error("El RUT no puede tener todos sus dígitos iguales")]
    RepeatedDigits,

    #[error("El dígito verificador no corresponde al RUT ingresado")]
    CheckDigitMismatch { expected: char, found: char },
}

/// How much is demanded of a RUT beyond its check digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Numeric 7-8 digit body and matching check character.
    Standard,
    /// Standard, and the body may not repeat a single digit (`11111111-1`).
    #[default]
    Strict,
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Strictness::Standard),
            "strict" => Ok(Strictness::Strict),
            other => Err(format!(
                "unknown strictness '{}', expected 'standard' or 'strict'",
                other
            )),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Standard => f.write_str("standard"),
            Strictness::Strict => f.write_str("strict"),
        }
    }
}

/// Keeps digits and `K`, uppercased. Dots, dashes and spaces disappear.
pub fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Formats as `body-check`. Already formatted input comes back unchanged.
pub fn format(input: &str) -> String {
    let cleaned = clean(input);
    if cleaned.len() <= 1 {
        return cleaned;
    }
    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    format!("{}-{}", body, check)
}

/// Modulo-11 check character for a numeric body.
pub fn check_digit(body: &str) -> Result<char, RutError> {
    if body.is_empty() {
        return Err(RutError::Empty);
    }

    let mut sum = 0u32;
    for (i, c) in body.chars().rev().enumerate() {
        let digit = c.to_digit(10).ok_or(RutError::NonNumericBody)?;
        sum += digit * (2 + (i as u32 % 6));
    }

    Ok(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from(b'0' + d as u8),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RutValidation {
    pub valid: bool,
    pub error: Option<RutError>,
}

impl RutValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn fail(error: RutError) -> Self {
        Self {
            valid: false,
            error: Some(error),
        }
    }
}

/// Validates a RUT. Accepts raw or cleaned input.
pub fn validate(input: &str, strictness: Strictness) -> RutValidation {
    match check(&clean(input), strictness) {
        Ok(()) => RutValidation::ok(),
        Err(e) => RutValidation::fail(e),
    }
}

fn check(cleaned: &str, strictness: Strictness) -> Result<(), RutError> {
    if cleaned.is_empty() {
        return Err(RutError::Empty);
    }

    let (body, found) = cleaned.split_at(cleaned.len() - 1);
    if !body.chars().all(|c| c.is_ascii_digit()) {
        return Err(RutError::NonNumericBody);
    }
    if !(MIN_BODY_LEN..=MAX_BODY_LEN).contains(&body.len()) {
        return Err(RutError::BodyLength { len: body.len() });
    }
    if strictness == Strictness::Strict && is_repeated(body) {
        return Err(RutError::RepeatedDigits);
    }

    let expected = check_digit(body)?;
    let found = found.chars().next().unwrap_or_default();
    if expected != found {
        return Err(RutError::CheckDigitMismatch { expected, found });
    }

    Ok(())
}

fn is_repeated(body: &str) -> bool {
    let mut chars = body.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// A RUT that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rut {
    body: String,
    check: char,
}

impl Rut {
    pub fn parse(input: &str, strictness: Strictness) -> Result<Self, RutError> {
        let cleaned = clean(input);
        check(&cleaned, strictness)?;
        let (body, check) = cleaned.split_at(cleaned.len() - 1);
        Ok(Self {
            body: body.to_string(),
            check: check.chars().next().unwrap_or_default(),
        })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn check(&self) -> char {
        self.check
    }

    /// `12.345.678-5`
    pub fn to_dotted(&self) -> String {
        let digits: Vec<char> = self.body.chars().collect();
        let mut out = String::with_capacity(digits.len() + 4);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(*c);
        }
        out.push('-');
        out.push(self.check);
        out
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.body, self.check)
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rut::parse(s, Strictness::Strict)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.to_string()
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Where a value typed into [`RutInput`] currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RutInputState {
    Empty,
    /// Too short to judge yet.
    Incomplete,
    Invalid(RutError),
    Valid(Rut),
}

impl RutInputState {
    /// Judges the whole value, however long. Bodies shorter than
    /// [`MIN_BODY_LEN`] digits are `Incomplete` rather than invalid.
    pub fn of(input: &str, strictness: Strictness) -> Self {
        let cleaned = clean(input);
        if cleaned.is_empty() {
            return RutInputState::Empty;
        }
        match Rut::parse(&cleaned, strictness) {
            Ok(rut) => RutInputState::Valid(rut),
            Err(RutError::BodyLength { len }) if len < MIN_BODY_LEN => RutInputState::Incomplete,
            Err(e) => RutInputState::Invalid(e),
        }
    }
}

/// Live-formatting RUT input box.
///
/// Holds the cleaned characters typed so far and re-renders `body-check` on
/// every change. Input past [`MAX_CLEAN_LEN`] characters is ignored, and once
/// a `K` has been typed it must stay the last character.
#[derive(Debug, Clone, Default)]
pub struct RutInput {
    cleaned: String,
    strictness: Strictness,
}

impl RutInput {
    pub fn new(strictness: Strictness) -> Self {
        Self {
            cleaned: String::new(),
            strictness,
        }
    }

    /// Returns whether the character was accepted.
    pub fn push(&mut self, c: char) -> bool {
        if !(c.is_ascii_digit() || c == 'k' || c == 'K') {
            return false;
        }
        if self.cleaned.len() >= MAX_CLEAN_LEN || self.cleaned.ends_with('K') {
            return false;
        }
        self.cleaned.push(c.to_ascii_uppercase());
        true
    }

    pub fn backspace(&mut self) -> Option<char> {
        self.cleaned.pop()
    }

    /// Replaces the whole value, as a paste would.
    pub fn set(&mut self, raw: &str) {
        self.cleaned.clear();
        for c in raw.chars() {
            self.push(c);
        }
    }

    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }

    pub fn display(&self) -> String {
        format(&self.cleaned)
    }

    pub fn state(&self) -> RutInputState {
        RutInputState::of(&self.cleaned, self.strictness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert!(validate("12345678-5", Strictness::Strict).valid);
        assert!(validate("12.345.678-5", Strictness::Strict).valid);
        assert_eq!(format("7654321"), "765432-1");
        assert_eq!(format("76543216"), "7654321-6");
        assert!(validate("7654321-6", Strictness::Strict).valid);
    }

    #[test]
    fn test_repeated_digits_rejected_only_when_strict() {
        let strict = validate("11111111-1", Strictness::Strict);
        assert!(!strict.valid);
        assert_eq!(strict.error, Some(RutError::RepeatedDigits));

        assert!(validate("11111111-1", Strictness::Standard).valid);
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean(" 12.345.678-k "), "12345678K");
        assert_eq!(clean("abc"), "");
        assert_eq!(clean("9.876.543-K"), "9876543K");
    }

    #[test]
    fn test_format_is_idempotent() {
        for input in ["12345678-5", "123456785", "12.345.678-5", "7", "", "1k"] {
            let once = format(input);
            assert_eq!(format(&once), once, "input {:?}", input);
        }
        assert_eq!(format("1k"), "1-K");
    }

    #[test]
    fn test_check_digit_special_values() {
        assert_eq!(check_digit("10000004"), Ok('0'));
        assert_eq!(check_digit("1000005"), Ok('K'));
        assert_eq!(check_digit("12345678"), Ok('5'));
        assert_eq!(check_digit("7654321"), Ok('6'));
        assert_eq!(check_digit("12a"), Err(RutError::NonNumericBody));
        assert_eq!(check_digit(""), Err(RutError::Empty));
    }

    #[test]
    fn test_k_check_digit_accepted_in_either_case() {
        let body = (1_000_000u32..2_000_000)
            .map(|n| n.to_string())
            .find(|b| check_digit(b) == Ok('K'))
            .unwrap();
        assert!(validate(&format!("{}-k", body), Strictness::Strict).valid);
        assert!(validate(&format!("{}-K", body), Strictness::Strict).valid);
        assert!(!validate(&format!("{}-0", body), Strictness::Strict).valid);
    }

    #[test]
    fn test_check_digit_matches_formula_across_bodies() {
        let checks = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'K'];
        for n in (1_000_000u32..=99_999_999).step_by(104_729) {
            let body = n.to_string();
            let expected = check_digit(&body).unwrap();
            for c in checks {
                let result = validate(&format!("{}{}", body, c), Strictness::Standard);
                assert_eq!(result.valid, c == expected, "body {} check {}", body, c);
            }
        }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(validate("", Strictness::Strict).error, Some(RutError::Empty));
        assert_eq!(
            validate("12345-5", Strictness::Strict).error,
            Some(RutError::BodyLength { len: 5 })
        );
        assert_eq!(
            validate("123456789-0", Strictness::Strict).error,
            Some(RutError::BodyLength { len: 9 })
        );
        assert_eq!(
            validate("1234K678-5", Strictness::Strict).error,
            Some(RutError::NonNumericBody)
        );
        assert_eq!(
            validate("12345678-4", Strictness::Strict).error,
            Some(RutError::CheckDigitMismatch {
                expected: '5',
                found: '4'
            })
        );
    }

    #[test]
    fn test_rut_parse_and_display() {
        let rut: Rut = "12.345.678-5".parse().unwrap();
        assert_eq!(rut.body(), "12345678");
        assert_eq!(rut.check(), '5');
        assert_eq!(rut.to_string(), "12345678-5");
        assert_eq!(rut.to_dotted(), "12.345.678-5");

        let short = Rut::parse("7654321-6", Strictness::Strict).unwrap();
        assert_eq!(short.to_dotted(), "7.654.321-6");
    }

    #[test]
    fn test_rut_serde_as_formatted_string() {
        let rut: Rut = "123456785".parse().unwrap();
        assert_eq!(serde_json::to_string(&rut).unwrap(), "\"12345678-5\"");
        let back: Rut = serde_json::from_str("\"12.345.678-5\"").unwrap();
        assert_eq!(back, rut);
        assert!(serde_json::from_str::<Rut>("\"12345678-4\"").is_err());
    }

    #[test]
    fn test_input_formats_while_typing() {
        let mut input = RutInput::new(Strictness::Strict);
        assert_eq!(input.state(), RutInputState::Empty);

        for c in "12.345".chars() {
            input.push(c);
        }
        assert_eq!(input.display(), "1234-5");
        assert_eq!(input.state(), RutInputState::Incomplete);

        for c in "678-5".chars() {
            input.push(c);
        }
        assert_eq!(input.display(), "12345678-5");
        assert!(matches!(input.state(), RutInputState::Valid(_)));

        assert!(!input.push('9'), "input is capped at nine characters");
        assert_eq!(input.backspace(), Some('5'));
        input.push('4');
        assert!(matches!(
            input.state(),
            RutInputState::Invalid(RutError::CheckDigitMismatch { .. })
        ));
    }

    #[test]
    fn test_state_of_judges_untruncated_value() {
        assert_eq!(
            RutInputState::of("12345678-5999", Strictness::Strict),
            RutInputState::Invalid(RutError::BodyLength { len: 11 })
        );
        assert_eq!(
            RutInputState::of("1234K5678", Strictness::Strict),
            RutInputState::Invalid(RutError::NonNumericBody)
        );
        assert_eq!(
            RutInputState::of("12.34", Strictness::Strict),
            RutInputState::Incomplete
        );
        assert_eq!(RutInputState::of(" .- ", Strictness::Strict), RutInputState::Empty);

        let mut input = RutInput::new(Strictness::Strict);
        input.set("12345678-5999");
        assert!(matches!(input.state(), RutInputState::Valid(_)));
    }

    #[test]
    fn test_input_k_must_be_last() {
        let mut input = RutInput::new(Strictness::Standard);
        input.set("123k456");
        assert_eq!(input.cleaned(), "123K");
        assert_eq!(input.display(), "123-K");

        input.set("11.111.111-1");
        assert!(matches!(input.state(), RutInputState::Valid(_)));

        let mut strict = RutInput::new(Strictness::Strict);
        strict.set("11.111.111-1");
        assert_eq!(
            strict.state(),
            RutInputState::Invalid(RutError::RepeatedDigits)
        );
    }
}
