//! Parsing and arithmetic for the orchestrator's quantity grammar.
//!
//! CPU is stored as integer milli-cores, memory as integer bytes, pods as a
//! plain integer count. All three share the same internal representation
//! (`u64`) so that `ResourceVector` can treat them uniformly, but a `Quantity`
//! always remembers which `Dimension` it belongs to and arithmetic across
//! dimensions is rejected at the type level by simply never being exposed.

use std::fmt;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Cpu,
    Memory,
    Pods,
}

/// A non-negative scalar tagged by `Dimension`.
///
/// Internal unit is milli-cores for CPU, bytes for memory, whole pods for
/// pods. Zero is the additive identity; subtraction saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity {
    dimension: Dimension,
    units: u64,
}

impl Quantity {
    pub fn zero(dimension: Dimension) -> Self {
        Self { dimension, units: 0 }
    }

    pub fn from_units(dimension: Dimension, units: u64) -> Self {
        Self { dimension, units }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Parses a CPU quantity. Accepts a bare integer (whole cores, e.g. `"2"`)
    /// or a milli-suffixed integer (e.g. `"500m"`). Fractional cores such as
    /// `"0.5"` are rejected — the orchestrator always serializes CPU as either
    /// whole cores or milli-cores, never decimal cores.
    pub fn parse_cpu(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if let Some(milli) = raw.strip_suffix('m') {
            let units: u64 = milli
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid cpu quantity {raw:?}")))?;
            Ok(Self::from_units(Dimension::Cpu, units))
        } else {
            let cores: u64 = raw
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid cpu quantity {raw:?}")))?;
            Ok(Self::from_units(Dimension::Cpu, cores.saturating_mul(1000)))
        }
    }

    /// Parses a memory quantity with the standard binary (`Ki`, `Mi`, `Gi`,
    /// `Ti`) and decimal (`k`, `M`, `G`, `T`) SI suffixes, or a bare integer
    /// number of bytes. Fractional values are rounded *up* to the nearest
    /// byte so the autoscaler never under-provisions.
    pub fn parse_memory(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        const BINARY: &[(&str, u64)] = &[
            ("Ki", 1u64 << 10),
            ("Mi", 1u64 << 20),
            ("Gi", 1u64 << 30),
            ("Ti", 1u64 << 40),
            ("Pi", 1u64 << 50),
        ];
        const DECIMAL: &[(&str, u64)] = &[
            ("k", 1_000),
            ("M", 1_000_000),
            ("G", 1_000_000_000),
            ("T", 1_000_000_000_000),
            ("P", 1_000_000_000_000_000),
        ];

        for (suffix, multiplier) in BINARY.iter().chain(DECIMAL.iter()) {
            if let Some(num) = raw.strip_suffix(suffix) {
                let value: f64 = num
                    .parse()
                    .map_err(|_| CoreError::Config(format!("invalid memory quantity {raw:?}")))?;
                if value < 0.0 {
                    return Err(CoreError::Config(format!("negative memory quantity {raw:?}")));
                }
                let bytes = (value * *multiplier as f64).ceil() as u64;
                return Ok(Self::from_units(Dimension::Memory, bytes));
            }
        }

        let bytes: u64 = raw
            .parse()
            .map_err(|_| CoreError::Config(format!("invalid memory quantity {raw:?}")))?;
        Ok(Self::from_units(Dimension::Memory, bytes))
    }

    /// Parses a pod count. Always a bare non-negative integer.
    pub fn parse_pods(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let count: u64 = raw
            .parse()
            .map_err(|_| CoreError::Config(format!("invalid pod count {raw:?}")))?;
        Ok(Self::from_units(Dimension::Pods, count))
    }

    pub fn add(&self, other: &Quantity) -> Quantity {
        debug_assert_eq!(self.dimension, other.dimension);
        Quantity {
            dimension: self.dimension,
            units: self.units.saturating_add(other.units),
        }
    }

    pub fn max(&self, other: &Quantity) -> Quantity {
        debug_assert_eq!(self.dimension, other.dimension);
        Quantity {
            dimension: self.dimension,
            units: self.units.max(other.units),
        }
    }

    /// Scales by a rational factor `numer/denom` (used for percentage
    /// buffers), rounding the result *up* to the next whole unit.
    pub fn scale_ceil(&self, numer: u64, denom: u64) -> Quantity {
        debug_assert!(denom > 0);
        let scaled = (self.units as u128 * numer as u128 + denom as u128 - 1) / denom as u128;
        Quantity {
            dimension: self.dimension,
            units: scaled as u64,
        }
    }

    /// `ceil(self / other)`, i.e. the number of `other`-sized units needed to
    /// cover `self`. `other` must be non-zero for the dimension to be
    /// meaningful; callers are responsible for rejecting zero weakest-node
    /// dimensions before calling this (spec: `InvariantError`).
    pub fn div_ceil(&self, other: &Quantity) -> Option<u64> {
        debug_assert_eq!(self.dimension, other.dimension);
        if other.units == 0 {
            return None;
        }
        Some((self.units + other.units - 1) / other.units)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dimension {
            Dimension::Cpu => write!(f, "{}m", self.units),
            Dimension::Memory => write!(f, "{}", self.units),
            Dimension::Pods => write!(f, "{}", self.units),
        }
    }
}
