//! Identifier issue for a single store.
//!
//! Identifiers are ordinary [`Number`]s: zero, one, two and so on, with no
//! gaps and no reuse, so that identifier order is creation order under the
//! same byte comparison that orders every other number.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::error::{LexError, Result};
use crate::number::Number;

/// A draw that has not been committed yet. Committing it advances the
/// sequencer; dropping it leaves the sequence untouched, so a failed store
/// append never burns an identifier.
#[derive(Debug)]
pub struct Draw {
    value: BigInt,
    idn: Number,
}

impl Draw {
    pub fn idn(&self) -> &Number {
        &self.idn
    }
}

#[derive(Debug)]
pub struct Sequencer {
    last: Option<BigInt>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// The identifier that would be issued next.
    pub fn draw(&self) -> Result<Draw> {
        let value = match &self.last {
            Some(last) => last + BigInt::one(),
            None => BigInt::zero(),
        };
        let idn = Number::from_bigint(&value).map_err(|_| {
            LexError::SequenceExhaustion(format!(
                "identifier {value} left the representable range"
            ))
        })?;
        Ok(Draw { value, idn })
    }

    /// Make a draw permanent. Call only after the word carrying it has
    /// durably committed.
    pub fn commit(&mut self, draw: Draw) {
        self.last = Some(draw.value);
    }

    /// Convenience for callers without a commit step of their own.
    pub fn next(&mut self) -> Result<Number> {
        let draw = self.draw()?;
        let idn = draw.idn.clone();
        self.commit(draw);
        Ok(idn)
    }

    /// Advance past an identifier restored from durable storage.
    pub fn retain(&mut self, idn: &Number) -> Result<()> {
        let value = idn.to_bigint().ok_or_else(|| LexError::DataCorruption {
            message: format!("restored identifier {idn:?} is not a whole number"),
        })?;
        if self.last.as_ref().is_none_or(|last| value > *last) {
            self.last = Some(value);
        }
        Ok(())
    }

    /// The most recently issued identifier, if any.
    pub fn last_issued(&self) -> Option<Number> {
        self.last.as_ref().map(|last| {
            Number::from_bigint(last).expect("issued identifiers were representable")
        })
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
