//! Positional placeholder numbering.

use crate::error::{RestError, RestResult};
use crate::value::Value;
use std::fmt::Write;

/// Highest placeholder index the Postgres wire protocol can carry.
pub(crate) const MAX_PLACEHOLDER: usize = u16::MAX as usize;

/// Hands out `$N` placeholders and collects the values bound to them.
///
/// One instance per statement-building call; numbering starts at the offset
/// given to [`Placeholders::starting_at`] so a fragment can continue the
/// sequence of the statement it is embedded in.
#[derive(Debug)]
pub(crate) struct Placeholders {
    next: usize,
    values: Vec<Value>,
}

impl Placeholders {
    pub(crate) fn starting_at(offset: usize) -> Self {
        Self {
            next: offset.max(1),
            values: Vec::new(),
        }
    }

    /// Append `$N` to `out`, bind `value` to it and advance the counter.
    ///
    /// Fails once `N` would pass [`MAX_PLACEHOLDER`].
    pub(crate) fn push(&mut self, out: &mut String, value: Value) -> RestResult<()> {
        if self.next > MAX_PLACEHOLDER {
            return Err(RestError::TooManyParameters(self.next));
        }
        let _ = write!(out, "${}", self.next);
        self.values.push(value);
        self.next += 1;
        Ok(())
    }

    pub(crate) fn next_index(&self) -> usize {
        self.next
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }
}
