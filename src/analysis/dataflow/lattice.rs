//! Lattice traits for data flow analysis.
//!
//! A lattice is a mathematical structure that defines how abstract values combine at
//! control flow join points. This module provides the fundamental traits that analysis
//! domains must implement.
//!
//! # Lattice Theory Background
//!
//! For data flow analysis, we use lattices with the following properties:
//!
//! - **Partial Order**: Elements can be compared (≤)
//! - **Join (∨)**: Least upper bound of two elements
//! - **Meet (∧)**: Greatest lower bound of two elements
//! - **Top (⊤)**: Greatest element (any value / no information)
//! - **Bottom (⊥)**: Least element (unreachable / not yet computed)
//!
//! # Orientation
//!
//! The forward solver merges states from multiple predecessors with *join* and iterates
//! until states stop growing. Domains therefore ascend ⊥ → ... → ⊤ during the fixpoint,
//! and finite height guarantees termination.

use std::fmt::Debug;

/// A join semi-lattice with a join (least upper bound) operation.
///
/// The join operation combines information from multiple control flow paths that merge.
/// It must satisfy:
///
/// - **Idempotent**: `x.join(x) = x`
/// - **Commutative**: `x.join(y) = y.join(x)`
/// - **Associative**: `x.join(y.join(z)) = (x.join(y)).join(z)`
pub trait JoinSemiLattice: Clone + Debug + PartialEq {
    /// Computes the join (least upper bound) of two lattice elements.
    ///
    /// The join represents the least specific value that covers both inputs.
    #[must_use]
    fn join(&self, other: &Self) -> Self;

    /// Returns `true` if this is the top element.
    ///
    /// The top element represents "no information"; once reached, further joins cannot
    /// change the value.
    fn is_top(&self) -> bool;
}

/// A meet semi-lattice with a meet (greatest lower bound) operation.
///
/// It must satisfy the dual laws of [`JoinSemiLattice`]: idempotence, commutativity,
/// and associativity.
pub trait MeetSemiLattice: Clone + Debug + PartialEq {
    /// Computes the meet (greatest lower bound) of two lattice elements.
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// Returns `true` if this is the bottom element.
    ///
    /// The bottom element represents an unreachable state; it is the identity for join.
    fn is_bottom(&self) -> bool;
}

/// A complete lattice with both join and meet operations.
///
/// # Required Properties
///
/// - All properties of [`JoinSemiLattice`] and [`MeetSemiLattice`]
/// - **Absorption**: `x.meet(x.join(y)) = x` and `x.join(x.meet(y)) = x`
pub trait Lattice: JoinSemiLattice + MeetSemiLattice {
    /// Returns the top (⊤) element of the lattice.
    fn top() -> Self;

    /// Returns the bottom (⊥) element of the lattice.
    fn bottom() -> Self;
}
