//! The order-preserving arbitrary-precision number codec.
//!
//! A [`Number`] owns its canonical byte encoding. The same type serves as
//! value, identifier and timestamp throughout the store, and unsigned
//! byte-wise comparison of two encodings orders them exactly as the values
//! they represent. The encoding consists of a zone marker selecting a broad
//! magnitude category, a magnitude body of big-endian base-256 digits, and
//! optional trailing suffix sub-records carrying tagged metadata (such as a
//! foreign-store reference, see the `federate` module).
//!
//! Layout of a finite nonzero encoding ("qex" exponent byte(s) followed by
//! "qan" significand digits):
//!
//! ```text
//!   +1    = 82 01         (qex 0x81+e, e = 1; qan = significand in [1/256,1))
//!   +2.5  = 82 02 80
//!   +0.5  = 81 FF 80      (fractions get a second qex byte 0xFF+e, e <= 0)
//!   0     = 80
//!   -0.5  = 7E 00 80      (negative digits are 256-complemented)
//!   -1    = 7D FF         (qex 0x7E-e)
//!   -2.5  = 7D FD 80
//!   -256  = 7C FF
//! ```
//!
//! Exactly one byte string encodes each value. Decoding rejects every
//! non-canonical form instead of normalizing it, so equality and ordering
//! never need to look past the raw bytes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use lazy_static::lazy_static;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{LexError, Result};

// ------------- Zone -------------

/// The broad magnitude categories, in descending order of their codes.
///
/// Every valid encoding falls in exactly one zone. Zones without a listed
/// code range in the table below are reserved extensions; the codec never
/// produces them and rejects them on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Transfinite,
    LudicrousLarge,
    Positive,
    Fractional,
    LudicrousSmall,
    Infinitesimal,
    Zero,
    InfinitesimalNeg,
    LudicrousSmallNeg,
    FractionalNeg,
    Negative,
    LudicrousLargeNeg,
    TransfiniteNeg,
}

// Each zone code is less than or equal to every encoding in its zone and
// greater than every encoding in the zones below it.
static ZONE_CODES: [(&[u8], Zone); 13] = [
    (&[0xFF, 0x80], Zone::Transfinite),
    (&[0xFF], Zone::LudicrousLarge),
    (&[0x82], Zone::Positive),
    (&[0x81], Zone::Fractional),
    (&[0x80, 0x80], Zone::LudicrousSmall),
    (&[0x80, 0x00], Zone::Infinitesimal),
    (&[0x80], Zone::Zero),
    (&[0x7F, 0x80], Zone::InfinitesimalNeg),
    (&[0x7F, 0x00], Zone::LudicrousSmallNeg),
    (&[0x7E, 0x00], Zone::FractionalNeg),
    (&[0x01], Zone::Negative),
    (&[0x00, 0x80], Zone::LudicrousLargeNeg),
    (&[0x00], Zone::TransfiniteNeg),
];

fn classify(root: &[u8]) -> Option<Zone> {
    ZONE_CODES
        .iter()
        .find(|(code, _)| root >= *code)
        .map(|(_, zone)| *zone)
}

// ------------- Suffix -------------

/// A trailing sub-record on a [`Number`].
///
/// Encoded as `payload .. tag length 00`, where `length` counts the tag and
/// the payload and the terminating zero byte marks suffix presence (a
/// canonical unsuffixed encoding never ends in `00`). Appending a suffix
/// changes the canonical byte string, so a suffixed number occupies its own
/// position in the total order, never colliding with its unsuffixed base.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Suffix {
    tag: u8,
    payload: Vec<u8>,
}

pub const MAX_SUFFIX_PAYLOAD: usize = 250;

const SUFFIX_TERMINATOR: u8 = 0x00;

impl Suffix {
    /// Tag denoting "identifier in a named foreign store".
    pub const LEX: u8 = 0x1D;
    /// Tag with no assigned meaning, available to tests and experiments.
    pub const TEST: u8 = 0x7E;

    pub fn new(tag: u8, payload: impl Into<Vec<u8>>) -> Result<Self> {
        let payload = payload.into();
        if tag != Self::LEX && tag != Self::TEST {
            return Err(LexError::Unsupported(format!(
                "unknown suffix tag 0x{tag:02X}"
            )));
        }
        if payload.len() > MAX_SUFFIX_PAYLOAD {
            return Err(LexError::Unsupported(format!(
                "suffix payload of {} bytes exceeds the maximum of {}",
                payload.len(),
                MAX_SUFFIX_PAYLOAD
            )));
        }
        Ok(Self { tag, payload })
    }
    pub fn tag(&self) -> u8 {
        self.tag
    }
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.payload);
        out.push(self.tag);
        out.push((self.payload.len() + 1) as u8);
        out.push(SUFFIX_TERMINATOR);
    }
}

/// Split a raw encoding into its root length and its parsed suffixes,
/// scanning terminator and length bytes from the right end.
fn split_suffixes(raw: &[u8]) -> Result<(usize, Vec<Suffix>)> {
    let mut end = raw.len();
    let mut suffixes = Vec::new();
    while end > 0 && raw[end - 1] == SUFFIX_TERMINATOR {
        if end < 2 {
            return Err(LexError::MalformedNumber(
                "suffix length byte missing".into(),
            ));
        }
        let length = raw[end - 2] as usize;
        if length == 0 {
            return Err(LexError::MalformedNumber(
                "suffix with zero length carries no tag".into(),
            ));
        }
        if length > MAX_SUFFIX_PAYLOAD + 1 {
            return Err(LexError::MalformedNumber(format!(
                "suffix length {length} exceeds the maximum"
            )));
        }
        if length + 2 > end {
            return Err(LexError::MalformedNumber(
                "suffix payload overruns the encoding".into(),
            ));
        }
        let start = end - (length + 2);
        let tag = raw[end - 3];
        if tag != Suffix::LEX && tag != Suffix::TEST {
            return Err(LexError::MalformedNumber(format!(
                "unknown mandatory suffix tag 0x{tag:02X}"
            )));
        }
        suffixes.push(Suffix {
            tag,
            payload: raw[start..end - 3].to_vec(),
        });
        end = start;
    }
    if end == 0 {
        return Err(LexError::MalformedNumber(
            "suffix without a number to suffix".into(),
        ));
    }
    suffixes.reverse();
    Ok((end, suffixes))
}

// ------------- Number -------------

/// Default significand precision, in base-256 digits, when rounding a
/// floating point value. Eight digits hold the 53-bit significand of an
/// IEEE double losslessly.
pub const QIGITS_DEFAULT: usize = 8;

// The qex byte holds base-256 exponents in these bounds; beyond them lie
// the reserved ludicrous zones.
const MAX_EXPONENT: i64 = 125;
const MIN_EXPONENT: i64 = -254;

/// A canonically encoded, signed, arbitrary-precision number.
///
/// Equality, hashing and ordering operate on the raw bytes; because the
/// encoding is canonical and order-preserving, they coincide with value
/// equality and numeric ordering.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number {
    raw: Vec<u8>,
}

lazy_static! {
    static ref RAW_ZERO: Number = Number { raw: vec![0x80] };
    static ref RAW_ONE: Number = Number { raw: vec![0x82, 0x01] };
    static ref RAW_INFINITY: Number = Number { raw: vec![0xFF, 0x81] };
    static ref RAW_INFINITY_NEG: Number = Number { raw: vec![0x00, 0x7F] };
}

/// The decoded view of a root encoding. Finite values are a nonzero
/// mantissa free of base-256 trailing zeros, scaled by 256^scale.
#[derive(Debug, Clone, PartialEq)]
enum Parsed {
    Zero,
    PositiveInfinity,
    NegativeInfinity,
    Finite { mantissa: BigInt, scale: i64 },
}

impl Number {
    // constructors

    pub fn zero() -> Self {
        RAW_ZERO.clone()
    }
    pub fn one() -> Self {
        RAW_ONE.clone()
    }
    pub fn positive_infinity() -> Self {
        RAW_INFINITY.clone()
    }
    pub fn negative_infinity() -> Self {
        RAW_INFINITY_NEG.clone()
    }

    pub fn from_i64(i: i64) -> Self {
        Self::from_bigint(&BigInt::from(i)).expect("an i64 is eight digits at most")
    }
    pub fn from_u64(u: u64) -> Self {
        Self::from_bigint(&BigInt::from(u)).expect("a u64 is eight digits at most")
    }

    /// Exact conversion from an arbitrary-precision integer. Fails only
    /// outside the representable range of roughly ±256^125.
    pub fn from_bigint(i: &BigInt) -> Result<Self> {
        if i.is_zero() {
            return Ok(Self::zero());
        }
        let (mantissa, scale) = normalize(i.clone(), 0);
        Ok(Self {
            raw: raw_from_parts(&mantissa, scale)?,
        })
    }

    /// Round a floating point value to the default significand precision.
    pub fn from_f64(x: f64) -> Result<Self> {
        Self::from_f64_qigits(x, QIGITS_DEFAULT)
    }

    /// Round a floating point value to `qigits` base-256 significand
    /// digits, clamped to 1..=15 (a double carries 53 significant bits, so
    /// digits beyond the eighth only ever pad).
    pub fn from_f64_qigits(x: f64, qigits: usize) -> Result<Self> {
        if x.is_nan() {
            return Err(LexError::Unsupported(
                "NaN is outside the numeric domain".into(),
            ));
        }
        if x.is_infinite() {
            return Ok(if x > 0.0 {
                Self::positive_infinity()
            } else {
                Self::negative_infinity()
            });
        }
        if x == 0.0 {
            return Ok(Self::zero());
        }
        let qigits = qigits.clamp(1, 15);
        let (significand_2, exponent_2) = frexp(x.abs());
        // Regroup the base-2 exponent into a base-256 exponent and a shift,
        // so the significand lands in [1/256, 1).
        let exponent_256 = (exponent_2 + 7).div_euclid(8);
        let shift = (exponent_2 + 7).rem_euclid(8);
        let significand_256 = significand_2 * (2f64).powi(shift - 7);
        let scaled = significand_256 * (256f64).powi(qigits as i32) + 0.5;
        let mut qan_int = BigInt::from(scaled.trunc() as i128);
        let mut exponent = exponent_256 as i64;
        // Rounding may carry all the way up to the next exponent.
        if qan_int == num_traits::pow(BigInt::from(256), qigits) {
            qan_int = BigInt::one();
            exponent += 1;
        }
        if x < 0.0 {
            qan_int = -qan_int;
        }
        let (mantissa, scale) = normalize(qan_int, exponent - qigits as i64);
        Ok(Self {
            raw: raw_from_parts(&mantissa, scale)?,
        })
    }

    /// Exact conversion from a decimal. Fails when the value is not a
    /// finite binary fraction (e.g. 0.1), which no canonical encoding can
    /// represent; round through [`Number::from_f64`] in that case.
    pub fn from_decimal(d: &BigDecimal) -> Result<Self> {
        let (digits, exp10) = d.normalized().as_bigint_and_exponent();
        if digits.is_zero() {
            return Ok(Self::zero());
        }
        if exp10 <= 0 {
            let unscaled = digits * num_traits::pow(BigInt::from(10), (-exp10) as usize);
            return Self::from_bigint(&unscaled);
        }
        // value = digits / (2^s * 5^s); exact only when 5^s divides digits
        let s = exp10 as usize;
        let five = num_traits::pow(BigInt::from(5), s);
        if !(&digits % &five).is_zero() {
            return Err(LexError::Unsupported(format!(
                "{d} is not a finite binary fraction"
            )));
        }
        let halved = digits / five;
        // lift 2^-s to a whole number of base-256 digits
        let whole_digits = s.div_ceil(8);
        let mantissa = halved << (8 * whole_digits - s);
        let (mantissa, scale) = normalize(mantissa, -(whole_digits as i64));
        Ok(Self {
            raw: raw_from_parts(&mantissa, scale)?,
        })
    }

    /// Decode a raw byte string, rejecting every non-canonical form.
    pub fn from_raw(bytes: &[u8]) -> Result<Self> {
        let (root_len, _suffixes) = split_suffixes(bytes)?;
        parse_root(&bytes[..root_len])?;
        Ok(Self {
            raw: bytes.to_vec(),
        })
    }

    // views

    /// The canonical encoding. Byte-wise comparison of two encodings
    /// matches the numeric comparison of their values.
    pub fn as_raw(&self) -> &[u8] {
        &self.raw
    }
    pub fn to_bytes(&self) -> Vec<u8> {
        self.raw.clone()
    }

    pub fn zone(&self) -> Zone {
        classify(self.root()).expect("canonical by construction")
    }

    pub fn is_zero(&self) -> bool {
        self.root() == RAW_ZERO.raw
    }
    pub fn is_negative(&self) -> bool {
        self.root() < RAW_ZERO.raw.as_slice()
    }
    pub fn is_positive(&self) -> bool {
        self.root() > RAW_ZERO.raw.as_slice()
    }
    pub fn is_finite(&self) -> bool {
        !matches!(
            self.parsed(),
            Parsed::PositiveInfinity | Parsed::NegativeInfinity
        )
    }

    /// Whether the value is a whole number.
    pub fn is_whole(&self) -> bool {
        match self.parsed() {
            Parsed::Zero => true,
            Parsed::Finite { scale, .. } => scale >= 0,
            _ => false,
        }
    }

    pub fn is_suffixed(&self) -> bool {
        self.raw.last() == Some(&SUFFIX_TERMINATOR)
    }

    /// The suffixes, left to right. Empty for an unsuffixed number.
    pub fn suffixes(&self) -> Vec<Suffix> {
        let (_, suffixes) = split_suffixes(&self.raw).expect("canonical by construction");
        suffixes
    }

    /// The number with all suffixes removed.
    pub fn unsuffixed(&self) -> Number {
        Number {
            raw: self.root().to_vec(),
        }
    }

    /// A copy of this number with `suffix` appended after any existing
    /// suffixes.
    pub fn with_suffix(&self, suffix: &Suffix) -> Number {
        let mut raw = self.raw.clone();
        suffix.write_to(&mut raw);
        Number { raw }
    }

    /// Whole values as a big integer; `None` for fractions, infinities,
    /// and anything in between. Suffixes are ignored.
    pub fn to_bigint(&self) -> Option<BigInt> {
        match self.parsed() {
            Parsed::Zero => Some(BigInt::zero()),
            Parsed::Finite { mantissa, scale } if scale >= 0 => {
                Some(mantissa << (8 * scale as usize))
            }
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_bigint().and_then(|i| i.to_i64())
    }

    /// Nearest floating point value; large magnitudes saturate to ±∞.
    pub fn to_f64(&self) -> f64 {
        match self.parsed() {
            Parsed::Zero => 0.0,
            Parsed::PositiveInfinity => f64::INFINITY,
            Parsed::NegativeInfinity => f64::NEG_INFINITY,
            Parsed::Finite { mantissa, scale } => {
                let digits = mantissa.magnitude().to_bytes_be();
                let exponent = scale + digits.len() as i64;
                let take = digits.len().min(QIGITS_DEFAULT + 2);
                let lead = BigInt::from_bytes_be(Sign::Plus, &digits[..take]);
                let magnitude = lead.to_f64().unwrap_or(f64::INFINITY)
                    * (256f64).powi((exponent - take as i64) as i32);
                if mantissa.is_negative() { -magnitude } else { magnitude }
            }
        }
    }

    /// Exact decimal view of a finite value (every finite value is a
    /// finite binary fraction, hence a finite decimal). `None` for ±∞.
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self.parsed() {
            Parsed::Zero => Some(BigDecimal::zero()),
            Parsed::PositiveInfinity | Parsed::NegativeInfinity => None,
            Parsed::Finite { mantissa, scale } => {
                if scale >= 0 {
                    Some(BigDecimal::from(mantissa << (8 * scale as usize)))
                } else {
                    // 256^-s = 5^8s / 10^8s
                    let s = (-scale) as usize;
                    let widened = mantissa * num_traits::pow(BigInt::from(5), 8 * s);
                    Some(BigDecimal::new(widened, 8 * s as i64).normalized())
                }
            }
        }
    }

    /// Hexadecimal rendering of the raw encoding, for diagnostics.
    pub fn hex(&self) -> String {
        self.raw.iter().map(|b| format!("{b:02X}")).collect()
    }

    /// Numeric comparison; identical to the byte-wise [`Ord`] on purpose.
    pub fn cmp_value(&self, other: &Number) -> Ordering {
        self.raw.cmp(&other.raw)
    }

    /// JSON view: whole values as integers, fractions as floats, the rest
    /// (infinite or suffixed) as hex strings.
    pub fn to_json(&self) -> serde_json::Value {
        if self.is_suffixed() || !self.is_finite() {
            return serde_json::Value::String(self.hex());
        }
        match self.to_i64() {
            Some(i) => serde_json::Value::from(i),
            None => serde_json::Value::from(self.to_f64()),
        }
    }

    fn root(&self) -> &[u8] {
        let (root_len, _) = split_suffixes(&self.raw).expect("canonical by construction");
        &self.raw[..root_len]
    }

    fn parsed(&self) -> Parsed {
        parse_root(self.root()).expect("canonical by construction")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_suffixed() {
            return write!(f, "0x{}", self.hex());
        }
        match self.parsed() {
            Parsed::Zero => write!(f, "0"),
            Parsed::PositiveInfinity => write!(f, "inf"),
            Parsed::NegativeInfinity => write!(f, "-inf"),
            Parsed::Finite { .. } => {
                if let Some(i) = self.to_bigint() {
                    write!(f, "{i}")
                } else if let Some(d) = self.to_decimal() {
                    write!(f, "{d}")
                } else {
                    write!(f, "0x{}", self.hex())
                }
            }
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Number(0x{})", self.hex())
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::from_i64(i)
    }
}
impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Number::from_u64(u)
    }
}

impl FromStr for Number {
    type Err = LexError;

    /// Parse integer and decimal literals, plus `inf`/`-inf`. Decimals
    /// that are not finite binary fractions round through `from_f64`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "inf" | "+inf" => return Ok(Number::positive_infinity()),
            "-inf" => return Ok(Number::negative_infinity()),
            _ => {}
        }
        if let Ok(i) = BigInt::from_str(s) {
            return Number::from_bigint(&i);
        }
        let d = BigDecimal::from_str(s)
            .map_err(|e| LexError::MalformedNumber(format!("cannot parse '{s}': {e}")))?;
        match Number::from_decimal(&d) {
            Ok(n) => Ok(n),
            Err(LexError::Unsupported(_)) => {
                let x = d.to_f64().ok_or_else(|| {
                    LexError::Unsupported(format!("'{s}' does not fit a float"))
                })?;
                Number::from_f64(x)
            }
            Err(e) => Err(e),
        }
    }
}

// ------------- Codec internals -------------

/// Strip base-256 trailing zero digits from the mantissa into the scale.
fn normalize(mut mantissa: BigInt, mut scale: i64) -> (BigInt, i64) {
    let radix = BigInt::from(256);
    while !mantissa.is_zero() && (&mantissa % &radix).is_zero() {
        mantissa /= &radix;
        scale += 1;
    }
    (mantissa, scale)
}

/// Encode a normalized nonzero (mantissa, scale) pair as a root byte
/// string. The base-256 exponent is the digit count plus the scale.
fn raw_from_parts(mantissa: &BigInt, scale: i64) -> Result<Vec<u8>> {
    let digits = mantissa.magnitude().to_bytes_be();
    let exponent = digits.len() as i64 + scale;
    let mut raw = Vec::with_capacity(digits.len() + 2);
    match mantissa.sign() {
        Sign::Plus => {
            if exponent >= 1 {
                if exponent > MAX_EXPONENT {
                    return Err(LexError::Unsupported(format!(
                        "magnitude of 256^{exponent} is beyond the representable range"
                    )));
                }
                raw.push(0x81 + exponent as u8);
            } else {
                if exponent < MIN_EXPONENT {
                    return Err(LexError::Unsupported(format!(
                        "magnitude of 256^{exponent} is beyond the representable range"
                    )));
                }
                raw.push(0x81);
                raw.push((0xFF + exponent) as u8);
            }
            raw.extend_from_slice(&digits);
        }
        Sign::Minus => {
            if exponent >= 1 {
                if exponent > MAX_EXPONENT {
                    return Err(LexError::Unsupported(format!(
                        "magnitude of 256^{exponent} is beyond the representable range"
                    )));
                }
                raw.push((0x7E - exponent) as u8);
            } else {
                if exponent < MIN_EXPONENT {
                    return Err(LexError::Unsupported(format!(
                        "magnitude of 256^{exponent} is beyond the representable range"
                    )));
                }
                raw.push(0x7E);
                raw.push((-exponent) as u8);
            }
            raw.extend_from_slice(&complement(&digits));
        }
        Sign::NoSign => unreachable!("zero mantissa has no qex/qan form"),
    }
    Ok(raw)
}

/// 256-complement of a digit string, preserving its length. More negative
/// magnitudes thereby sort earlier under byte comparison.
fn complement(digits: &[u8]) -> Vec<u8> {
    let n = digits.len();
    let value = BigInt::from_bytes_be(Sign::Plus, digits);
    let complemented = (BigInt::one() << (8 * n)) - value;
    let body = complemented.magnitude().to_bytes_be();
    let mut out = vec![0u8; n - body.len()];
    out.extend_from_slice(&body);
    out
}

/// Decode and validate a root (unsuffixed) byte string.
fn parse_root(root: &[u8]) -> Result<Parsed> {
    let zone = classify(root).ok_or_else(|| {
        LexError::MalformedNumber("the empty byte string encodes nothing".into())
    })?;
    match zone {
        Zone::Zero => {
            if root == RAW_ZERO.raw.as_slice() {
                Ok(Parsed::Zero)
            } else {
                Err(reserved(zone))
            }
        }
        Zone::Transfinite => {
            if root == RAW_INFINITY.raw.as_slice() {
                Ok(Parsed::PositiveInfinity)
            } else {
                Err(reserved(zone))
            }
        }
        Zone::TransfiniteNeg => {
            if root == RAW_INFINITY_NEG.raw.as_slice() {
                Ok(Parsed::NegativeInfinity)
            } else {
                Err(reserved(zone))
            }
        }
        Zone::Positive => {
            let exponent = (root[0] - 0x81) as i64;
            parse_qan(&root[1..], exponent, Sign::Plus)
        }
        Zone::Fractional => {
            if root.len() < 2 {
                return Err(LexError::MalformedNumber(
                    "fraction marker without an exponent byte".into(),
                ));
            }
            let exponent = root[1] as i64 - 0xFF;
            if exponent < MIN_EXPONENT {
                return Err(LexError::MalformedNumber(
                    "fraction exponent byte out of range".into(),
                ));
            }
            parse_qan(&root[2..], exponent, Sign::Plus)
        }
        Zone::Negative => {
            let exponent = 0x7E - root[0] as i64;
            if exponent < 1 {
                return Err(LexError::MalformedNumber(
                    "negative marker without an exponent".into(),
                ));
            }
            parse_qan(&root[1..], exponent, Sign::Minus)
        }
        Zone::FractionalNeg => {
            if root.len() < 2 {
                return Err(LexError::MalformedNumber(
                    "fraction marker without an exponent byte".into(),
                ));
            }
            let exponent = -(root[1] as i64);
            if exponent < MIN_EXPONENT {
                return Err(LexError::MalformedNumber(
                    "fraction exponent byte out of range".into(),
                ));
            }
            parse_qan(&root[2..], exponent, Sign::Minus)
        }
        Zone::LudicrousLarge
        | Zone::LudicrousSmall
        | Zone::Infinitesimal
        | Zone::InfinitesimalNeg
        | Zone::LudicrousSmallNeg
        | Zone::LudicrousLargeNeg => Err(reserved(zone)),
    }
}

fn reserved(zone: Zone) -> LexError {
    LexError::MalformedNumber(format!("reserved zone {zone:?}"))
}

/// Validate significand digits and produce the decoded mantissa and scale.
///
/// Canonical digits never start below 1/256 (no wasted leading digit), and
/// never end in a zero digit (that position belongs to suffix markers).
/// Negative digits arrive 256-complemented.
fn parse_qan(qan: &[u8], exponent: i64, sign: Sign) -> Result<Parsed> {
    if qan.is_empty() {
        return Err(LexError::MalformedNumber("empty significand".into()));
    }
    if qan[qan.len() - 1] == 0x00 {
        return Err(LexError::MalformedNumber(
            "trailing zero digit in significand".into(),
        ));
    }
    match sign {
        Sign::Plus => {
            if qan[0] == 0x00 {
                return Err(LexError::MalformedNumber(
                    "non-canonical leading zero digit".into(),
                ));
            }
            let mantissa = BigInt::from_bytes_be(Sign::Plus, qan);
            Ok(Parsed::Finite {
                mantissa,
                scale: exponent - qan.len() as i64,
            })
        }
        Sign::Minus => {
            // A complemented significand below 1/256 would begin 0xFF with
            // digits to spare.
            if qan[0] == 0xFF && qan.len() > 1 {
                return Err(LexError::MalformedNumber(
                    "non-canonical complement padding".into(),
                ));
            }
            let n = qan.len();
            let complemented = BigInt::from_bytes_be(Sign::Plus, qan);
            let mantissa = complemented - (BigInt::one() << (8 * n));
            Ok(Parsed::Finite {
                mantissa,
                scale: exponent - n as i64,
            })
        }
        Sign::NoSign => unreachable!("qan parsing is signed"),
    }
}

/// Decompose a finite nonzero float into significand in [0.5, 1) and
/// base-2 exponent.
fn frexp(x: f64) -> (f64, i32) {
    let bits = x.to_bits();
    let exponent_field = ((bits >> 52) & 0x7FF) as i32;
    if exponent_field == 0 {
        // subnormal: rescale into the normal range first
        let (significand, exponent) = frexp(x * (2f64).powi(64));
        (significand, exponent - 64)
    } else {
        let significand = f64::from_bits((bits & !(0x7FFu64 << 52)) | (1022u64 << 52));
        (significand, exponent_field - 1022)
    }
}
