//! Wheatstone bridge balance.
//!
//! The bridge is balanced when `R1 / R2 = R3 / Rx`, giving
//! `Rx = R2 · R3 / R1`. The galvanometer reading is a teaching
//! approximation scaled by [`GALVANOMETER_SCALE`], not a circuit solution.

use std::fmt;

use serde::Serialize;

use crate::error::{ResistoError, Result};

/// Maximum `|Rx - balanced_rx|` (Ω) still reported as balanced.
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// Illustrative scale applied to the imbalance factor.
pub const GALVANOMETER_SCALE: f64 = 0.01;

/// Four bridge arms in ohms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheatstoneBridge {
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub rx: f64,
}

impl Default for WheatstoneBridge {
    fn default() -> Self {
        Self {
            r1: 100.0,
            r2: 200.0,
            r3: 150.0,
            rx: 300.0,
        }
    }
}

/// Balance report for a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeBalance {
    pub balanced_rx: f64,
    pub is_balanced: bool,
    pub galvanometer_current: f64,
    /// `|Rx - balanced_rx|`
    pub difference: f64,
    pub percent_error: f64,
}

impl WheatstoneBridge {
    /// Create a bridge, rejecting non-positive or non-finite arms.
    pub fn new(r1: f64, r2: f64, r3: f64, rx: f64) -> Result<Self> {
        for (arm, value) in [("R1", r1), ("R2", r2), ("R3", r3), ("Rx", rx)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ResistoError::InvalidBridgeArm { arm, value });
            }
        }
        Ok(Self { r1, r2, r3, rx })
    }

    /// The unknown arm value that balances the bridge.
    pub fn balanced_rx(&self) -> f64 {
        self.r2 * self.r3 / self.r1
    }

    pub fn solve(&self) -> BridgeBalance {
        self.solve_with_tolerance(BALANCE_TOLERANCE)
    }

    pub fn solve_with_tolerance(&self, tolerance: f64) -> BridgeBalance {
        let balanced_rx = self.balanced_rx();
        let difference = (self.rx - balanced_rx).abs();
        let ratio = self.rx / balanced_rx;
        let current_factor = (ratio - 1.0).abs() / (ratio + 1.0);

        BridgeBalance {
            balanced_rx,
            is_balanced: difference < tolerance,
            galvanometer_current: GALVANOMETER_SCALE * current_factor,
            difference,
            percent_error: difference / balanced_rx * 100.0,
        }
    }

    /// The same bridge with `Rx` set to its balancing value.
    pub fn balance(&self) -> Self {
        Self {
            rx: self.balanced_rx(),
            ..*self
        }
    }
}

impl fmt::Display for BridgeBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Balanced Rx:  {:.2} Ω", self.balanced_rx)?;
        writeln!(
            f,
            "State:        {}",
            if self.is_balanced { "balanced" } else { "unbalanced" }
        )?;
        writeln!(f, "Galvanometer: {:.6} A", self.galvanometer_current)?;
        write!(
            f,
            "Difference:   {:.2} Ω ({:.2}%)",
            self.difference, self.percent_error
        )
    }
}
