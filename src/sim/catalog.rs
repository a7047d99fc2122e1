//! Ability catalog and seeded toolbar selection

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::tuning::{AbilityTuning, LifetimeSpec};

/// Every law the player can drop into the chamber
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbilityKind {
    Heat,
    Cold,
    Mass,
    DarkEnergy,
    HighPressure,
    Vacuum,
    Tunneling,
    Viscosity,
    Elasticity,
    Entropy,
    LowPressure,
    WindJet,
    Gravity,
}

impl AbilityKind {
    pub const COUNT: usize = 13;

    /// Catalog order; seeded selection shuffles this list
    pub const ALL: [AbilityKind; Self::COUNT] = [
        AbilityKind::Heat,
        AbilityKind::Cold,
        AbilityKind::Mass,
        AbilityKind::DarkEnergy,
        AbilityKind::HighPressure,
        AbilityKind::Vacuum,
        AbilityKind::Tunneling,
        AbilityKind::Viscosity,
        AbilityKind::Elasticity,
        AbilityKind::Entropy,
        AbilityKind::LowPressure,
        AbilityKind::WindJet,
        AbilityKind::Gravity,
    ];

    /// Position in [`AbilityKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            AbilityKind::Heat => "heat",
            AbilityKind::Cold => "cold",
            AbilityKind::Mass => "mass",
            AbilityKind::DarkEnergy => "dark-energy",
            AbilityKind::HighPressure => "high-pressure",
            AbilityKind::Vacuum => "vacuum",
            AbilityKind::Tunneling => "tunneling",
            AbilityKind::Viscosity => "viscosity",
            AbilityKind::Elasticity => "elasticity",
            AbilityKind::Entropy => "entropy",
            AbilityKind::LowPressure => "low-pressure",
            AbilityKind::WindJet => "wind-jet",
            AbilityKind::Gravity => "gravity",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Heat => "Heat",
            AbilityKind::Cold => "Cold",
            AbilityKind::Mass => "Mass",
            AbilityKind::DarkEnergy => "Dark Energy",
            AbilityKind::HighPressure => "High Pressure",
            AbilityKind::Vacuum => "Vacuum",
            AbilityKind::Tunneling => "Quantum Tunneling",
            AbilityKind::Viscosity => "Viscosity",
            AbilityKind::Elasticity => "Elasticity",
            AbilityKind::Entropy => "Entropy",
            AbilityKind::LowPressure => "Low Pressure",
            AbilityKind::WindJet => "Wind Jet",
            AbilityKind::Gravity => "Gravity",
        }
    }

    /// Acts on the balloon wherever it is
    pub fn is_global(self) -> bool {
        matches!(
            self,
            AbilityKind::Heat | AbilityKind::Cold | AbilityKind::Elasticity
        )
    }

    /// Global laws have no position, so they may be dropped off-board
    pub fn allows_outside_board(self) -> bool {
        self.is_global()
    }

    /// Built-in balance, overridable through [`crate::Tuning`]
    pub fn default_tuning(self) -> AbilityTuning {
        let (radius, strength, lifetime) = match self {
            AbilityKind::LowPressure => (200.0, 1500.0, timed(8.0)),
            AbilityKind::Mass => (260.0, 2600.0, timed(8.0)),
            AbilityKind::Vacuum => (240.0, 520.0, charges(1)),
            AbilityKind::HighPressure => (220.0, 560.0, charges(1)),
            AbilityKind::DarkEnergy => (260.0, 2400.0, timed(8.0)),
            AbilityKind::WindJet => (180.0, 1400.0, timed(8.0)),
            AbilityKind::Gravity => (200.0, 1400.0, timed(8.0)),
            AbilityKind::Viscosity => (170.0, 12.0, timed(8.0)),
            AbilityKind::Entropy => (180.0, 1800.0, timed(8.0)),
            // global kinds: radius is only the gizmo / pick radius
            AbilityKind::Heat => (48.0, 1.45, timed(6.0)),
            AbilityKind::Cold => (48.0, 0.65, timed(6.0)),
            AbilityKind::Elasticity => (48.0, 1.0, timed(6.0)),
            AbilityKind::Tunneling => (110.0, 8.0, timed(5.0)),
        };
        AbilityTuning {
            radius,
            strength,
            lifetime,
            max_uses: None,
        }
    }
}

fn timed(seconds: f32) -> LifetimeSpec {
    LifetimeSpec::Timed { seconds }
}

fn charges(count: u32) -> LifetimeSpec {
    LifetimeSpec::Charges { count }
}

/// mulberry32: 32-bit state, bit-compatible with the browser build so a seed
/// yields the same toolbar everywhere
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        rand::rand_core::impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        rand::rand_core::impls::fill_bytes_via_next(self, dst)
    }
}

/// Pick exactly `count` kinds: seeded Fisher-Yates over the catalog, then
/// repeat the shuffled order cyclically if `count` exceeds the catalog.
pub fn select_abilities(count: usize, seed: u32) -> Vec<AbilityKind> {
    let mut shuffled = AbilityKind::ALL;
    let mut rng = Mulberry32::new(seed);
    for i in (1..shuffled.len()).rev() {
        let j = (rng.next_unit() * (i + 1) as f64) as usize;
        shuffled.swap(i, j.min(i));
    }
    shuffled.iter().copied().cycle().take(count).collect()
}
