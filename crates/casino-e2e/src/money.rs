// Money amounts as shown by the casino UI
//
// Balances are compared exactly, so amounts are whole cents; floating point
// never touches them.

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

/// An amount in euro cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

/// Error parsing a displayed amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse '{input}' as an amount: {reason}")]
pub struct ParseMoneyError {
    pub input: String,
    pub reason: &'static str,
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    pub const fn euros(euros: i64) -> Self {
        Money(euros * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn checked_add(self, rhs: Money) -> Option<Money> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    pub const fn checked_sub(self, rhs: Money) -> Option<Money> {
        match self.0.checked_sub(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Plain decimal form typed into amount fields: `"1234.50"`
    pub fn to_input(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts `"€1,234.50"`, `"1234.5"`, `"- € 5"`, `"EUR 10.00"`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParseMoneyError {
            input: input.to_string(),
            reason,
        };

        let mut rest = input.trim();
        let negative = rest.starts_with('-');
        if negative {
            rest = rest[1..].trim_start();
        }
        let rest = rest
            .trim_start_matches('€')
            .trim_start_matches("EUR")
            .trim()
            .trim_end_matches('€')
            .trim();
        let digits: String = rest.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() {
            return Err(err("no digits"));
        }

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits.as_str(), ""),
        };
        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(err("invalid whole part"));
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(err("invalid cents"));
        }

        let whole: i64 = whole.parse().map_err(|_| err("amount too large"))?;
        let cents: i64 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| err("invalid cents"))?;
        let total = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .ok_or_else(|| err("amount too large"))?;
        Ok(Money(if negative { -total } else { total }))
    }
}

impl fmt::Display for Money {
    /// `€1,234.50`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = (abs / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{sign}€{grouped}.{:02}", abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    /// # Panics
    ///
    /// On overflow, in every build profile. Use [`Money::checked_add`] for
    /// amounts that are not known to be small.
    fn add(self, rhs: Money) -> Money {
        match self.checked_add(rhs) {
            Some(sum) => sum,
            None => panic!("amount overflow: {self} + {rhs}"),
        }
    }
}

impl Sub for Money {
    type Output = Money;

    /// # Panics
    ///
    /// On overflow, in every build profile. Use [`Money::checked_sub`] for
    /// amounts that are not known to be small.
    fn sub(self, rhs: Money) -> Money {
        match self.checked_sub(rhs) {
            Some(difference) => difference,
            None => panic!("amount overflow: {self} - {rhs}"),
        }
    }
}
