//! Policy traits injected into a configuration store.
//!
//! A store delegates two decisions to its host module:
//!
//! - an [`Initializer`] supplies the initial contents, and thereby the size
//! - a [`Validator`] approves or rejects every write before it is committed
//!
//! Closures implement both traits, so simple policies need no named type.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Produces the initial contents of a configuration.
pub trait Initializer {
    /// Returns the initial configuration bytes.
    ///
    /// The length of the returned vector becomes the configuration size.
    /// `available` is the number of storage bytes between the store's base
    /// address and the end of the medium.
    fn initialize(&mut self, available: usize) -> Vec<u8>;
}

impl<F> Initializer for F
where
    F: FnMut(usize) -> Vec<u8>,
{
    fn initialize(&mut self, available: usize) -> Vec<u8> {
        self(available)
    }
}

/// Approves or rejects a candidate value for a configuration index.
pub trait Validator {
    /// Returns `true` if `value` may be stored at `index`.
    fn validate(&self, index: usize, value: u8) -> bool;
}

impl<F> Validator for F
where
    F: Fn(usize, u8) -> bool,
{
    fn validate(&self, index: usize, value: u8) -> bool {
        self(index, value)
    }
}

/// Initializer that always yields the same default bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults(pub Vec<u8>);

impl Defaults {
    /// Creates defaults of `size` bytes, all set to `fill`.
    #[must_use]
    pub fn filled(size: usize, fill: u8) -> Self {
        Self(vec![fill; size])
    }
}

impl Initializer for Defaults {
    fn initialize(&mut self, _available: usize) -> Vec<u8> {
        self.0.clone()
    }
}

/// Validator that accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _index: usize, _value: u8) -> bool {
        true
    }
}

/// Validator enforcing inclusive value ranges.
///
/// A per-index rule takes precedence over the fallback rule. Indices with
/// neither accept every value.
#[derive(Debug, Clone, Default)]
pub struct RangeValidator {
    rules: BTreeMap<usize, RangeInclusive<u8>>,
    fallback: Option<RangeInclusive<u8>>,
}

impl RangeValidator {
    /// Creates a validator with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `index` to `range`.
    #[must_use]
    pub fn with_rule(mut self, index: usize, range: RangeInclusive<u8>) -> Self {
        self.rules.insert(index, range);
        self
    }

    /// Restricts every index without its own rule to `range`.
    #[must_use]
    pub fn with_fallback(mut self, range: RangeInclusive<u8>) -> Self {
        self.fallback = Some(range);
        self
    }
}

impl Validator for RangeValidator {
    fn validate(&self, index: usize, value: u8) -> bool {
        self.rules
            .get(&index)
            .or(self.fallback.as_ref())
            .map_or(true, |range| range.contains(&value))
    }
}
