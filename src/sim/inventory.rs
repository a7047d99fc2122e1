//! Per-kind placement budgets (the toolbar)

use serde::{Deserialize, Serialize};

use super::catalog::AbilityKind;

/// Remaining placements of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uses {
    Finite(u32),
    Unlimited,
}

impl Uses {
    /// Cap a budget by a tuning `max_uses`
    fn capped(self, max_uses: Option<u32>) -> Self {
        match (self, max_uses) {
            (Uses::Finite(n), Some(cap)) => Uses::Finite(n.min(cap)),
            (Uses::Unlimited, Some(cap)) => Uses::Finite(cap),
            (uses, None) => uses,
        }
    }
}

/// A toolbar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSlot {
    pub kind: AbilityKind,
    pub remaining: Uses,
    pub initial: Uses,
}

/// Explicit budget for one kind, as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolBudget {
    pub kind: AbilityKind,
    /// `None` = unlimited
    #[serde(default)]
    pub uses: Option<u32>,
}

/// Slots indexed by [`AbilityKind::index`], plus toolbar order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    slots: [Option<ToolSlot>; AbilityKind::COUNT],
    order: Vec<AbilityKind>,
}

impl Inventory {
    /// From explicit budgets; a repeated kind adds to its earlier entry
    pub fn from_budgets(budgets: &[ToolBudget], cap: impl Fn(AbilityKind) -> Option<u32>) -> Self {
        let mut inv = Self::default();
        for budget in budgets {
            let uses = budget.uses.map_or(Uses::Unlimited, Uses::Finite);
            inv.add(budget.kind, uses);
        }
        inv.apply_caps(cap);
        inv
    }

    /// From a catalog selection: each kind gets one use per appearance
    pub fn from_selection(selection: &[AbilityKind], cap: impl Fn(AbilityKind) -> Option<u32>) -> Self {
        let mut inv = Self::default();
        for &kind in selection {
            inv.add(kind, Uses::Finite(1));
        }
        inv.apply_caps(cap);
        inv
    }

    fn add(&mut self, kind: AbilityKind, uses: Uses) {
        let slot = &mut self.slots[kind.index()];
        match slot {
            Some(existing) => {
                let merged = match (existing.initial, uses) {
                    (Uses::Finite(a), Uses::Finite(b)) => Uses::Finite(a.saturating_add(b)),
                    _ => Uses::Unlimited,
                };
                existing.initial = merged;
                existing.remaining = merged;
            }
            None => {
                *slot = Some(ToolSlot {
                    kind,
                    remaining: uses,
                    initial: uses,
                });
                self.order.push(kind);
            }
        }
    }

    fn apply_caps(&mut self, cap: impl Fn(AbilityKind) -> Option<u32>) {
        for slot in self.slots.iter_mut().flatten() {
            slot.initial = slot.initial.capped(cap(slot.kind));
            slot.remaining = slot.initial;
        }
    }

    pub fn contains(&self, kind: AbilityKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn remaining(&self, kind: AbilityKind) -> Option<Uses> {
        self.slots[kind.index()].map(|s| s.remaining)
    }

    pub fn can_use(&self, kind: AbilityKind) -> bool {
        match self.remaining(kind) {
            Some(Uses::Unlimited) => true,
            Some(Uses::Finite(n)) => n > 0,
            None => false,
        }
    }

    /// Spend one use. Returns false (and changes nothing) if none are left.
    pub fn try_consume(&mut self, kind: AbilityKind) -> bool {
        match &mut self.slots[kind.index()] {
            Some(ToolSlot {
                remaining: Uses::Unlimited,
                ..
            }) => true,
            Some(ToolSlot {
                remaining: Uses::Finite(n),
                ..
            }) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    /// Give one use back, never above the initial budget
    pub fn refund(&mut self, kind: AbilityKind) {
        if let Some(slot) = &mut self.slots[kind.index()] {
            if let (Uses::Finite(n), Uses::Finite(initial)) = (slot.remaining, slot.initial) {
                slot.remaining = Uses::Finite((n + 1).min(initial));
            }
        }
    }

    /// Refill every slot
    pub fn reset(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.remaining = slot.initial;
        }
    }

    /// Slots in toolbar order
    pub fn slots(&self) -> impl Iterator<Item = &ToolSlot> + '_ {
        self.order
            .iter()
            .filter_map(|kind| self.slots[kind.index()].as_ref())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
