//! The abstract environment: a total map from registers to domain elements.

use std::fmt;

use imbl::OrdMap;

use crate::{
    analysis::{dataflow::JoinSemiLattice, reflection::domain::AbstractObjectDomain},
    assembly::{Register, RESULT_REGISTER},
};

/// A total mapping from every register to an [`AbstractObjectDomain`] element.
///
/// Registers without an explicit binding implicitly hold ⊤, so the empty map is the top
/// environment. A distinguished whole-environment ⊥ represents unreachable program
/// points; it is the initial state of blocks the fixpoint has not reached, and writes to
/// it are no-ops.
///
/// The environment is *reduced*: binding any register to the domain ⊥ collapses the
/// whole environment to ⊥ (a register that can hold no value means the point is
/// unreachable), and ⊤ bindings are never stored. Keeping the representation canonical
/// makes structural equality coincide with lattice equality, which is what the solver's
/// change detection relies on.
///
/// Backed by a persistent ordered map, so cloning is cheap and the per-instruction
/// snapshots taken by the replay pass share structure between successive program points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractObjectEnvironment {
    /// The unreachable environment.
    Bottom,
    /// A reachable environment; registers absent from the map hold ⊤.
    Value(OrdMap<Register, AbstractObjectDomain>),
}

impl AbstractObjectEnvironment {
    /// Returns the top environment (every register ⊤).
    #[must_use]
    pub fn top() -> Self {
        AbstractObjectEnvironment::Value(OrdMap::new())
    }

    /// Returns the bottom (unreachable) environment.
    #[must_use]
    pub fn bottom() -> Self {
        AbstractObjectEnvironment::Bottom
    }

    /// Returns `true` if this is the unreachable environment.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        matches!(self, AbstractObjectEnvironment::Bottom)
    }

    /// Returns the value of a register.
    ///
    /// In the bottom environment every register is ⊥; otherwise an unbound register
    /// is ⊤.
    #[must_use]
    pub fn get(&self, reg: Register) -> AbstractObjectDomain {
        match self {
            AbstractObjectEnvironment::Bottom => AbstractObjectDomain::Bottom,
            AbstractObjectEnvironment::Value(map) => {
                map.get(&reg).cloned().unwrap_or(AbstractObjectDomain::Top)
            }
        }
    }

    /// Binds a register to a domain element.
    ///
    /// Writes to the bottom environment are ignored; binding ⊤ removes the entry and
    /// binding ⊥ collapses the environment to bottom, keeping the representation
    /// canonical.
    pub fn set(&mut self, reg: Register, value: AbstractObjectDomain) {
        let AbstractObjectEnvironment::Value(map) = self else {
            return;
        };
        match value {
            AbstractObjectDomain::Top => {
                map.remove(&reg);
            }
            AbstractObjectDomain::Bottom => {
                *self = AbstractObjectEnvironment::Bottom;
            }
            constant => {
                map.insert(reg, constant);
            }
        }
    }

    /// Returns `true` if `self` is below or equal to `other` pointwise.
    #[must_use]
    pub fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (AbstractObjectEnvironment::Bottom, _) => true,
            (_, AbstractObjectEnvironment::Bottom) => false,
            (AbstractObjectEnvironment::Value(_), AbstractObjectEnvironment::Value(b)) => {
                // Registers unbound in `other` are ⊤ there and cover anything; only the
                // explicit bindings of `other` can fail the comparison.
                b.iter().all(|(reg, bound)| self.get(*reg).leq(bound))
            }
        }
    }

    /// Returns an iterator over the explicit (non-⊤) bindings in register order.
    pub fn bindings(&self) -> impl Iterator<Item = (Register, &AbstractObjectDomain)> + '_ {
        let map = match self {
            AbstractObjectEnvironment::Bottom => None,
            AbstractObjectEnvironment::Value(map) => Some(map),
        };
        map.into_iter().flat_map(|m| m.iter().map(|(r, v)| (*r, v)))
    }
}

impl JoinSemiLattice for AbstractObjectEnvironment {
    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (AbstractObjectEnvironment::Bottom, x) | (x, AbstractObjectEnvironment::Bottom) => {
                x.clone()
            }
            (AbstractObjectEnvironment::Value(a), AbstractObjectEnvironment::Value(b)) => {
                // Pointwise join. A register bound on only one side joins with ⊤ and
                // drops out, so only the intersection of the key sets can survive.
                let mut result = OrdMap::new();
                for (reg, value) in a.iter() {
                    if let Some(other_value) = b.get(reg) {
                        let joined = value.join(other_value);
                        if !joined.is_top() {
                            result.insert(*reg, joined);
                        }
                    }
                }
                AbstractObjectEnvironment::Value(result)
            }
        }
    }

    fn is_top(&self) -> bool {
        matches!(self, AbstractObjectEnvironment::Value(map) if map.is_empty())
    }
}

impl fmt::Display for AbstractObjectEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractObjectEnvironment::Bottom => f.write_str("_|_"),
            AbstractObjectEnvironment::Value(map) => {
                f.write_str("{")?;
                let mut first = true;
                for (reg, value) in map.iter() {
                    if !first {
                        f.write_str(", ")?;
                    }
                    first = false;
                    if *reg == RESULT_REGISTER {
                        f.write_str("RESULT -> ")?;
                    } else {
                        write!(f, "v{reg} -> ")?;
                    }
                    match value {
                        AbstractObjectDomain::Constant(obj) => write!(f, "{obj}")?,
                        other => write!(f, "{other:?}")?,
                    }
                }
                f.write_str("}")
            }
        }
    }
}
