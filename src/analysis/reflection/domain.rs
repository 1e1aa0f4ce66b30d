//! Constant-propagation lattice over abstract objects.

use crate::analysis::{
    dataflow::{JoinSemiLattice, Lattice, MeetSemiLattice},
    reflection::object::AbstractObject,
};

/// The three-level constant lattice `⊥ < Constant(v) < ⊤` over [`AbstractObject`].
///
/// - `Top`: the register may hold anything (no information)
/// - `Constant`: the register holds exactly this abstract object on all paths
/// - `Bottom`: the program point is unreachable
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AbstractObjectDomain {
    /// No information (top of the lattice).
    #[default]
    Top,
    /// A single known abstract object.
    Constant(AbstractObject),
    /// Unreachable (bottom of the lattice).
    Bottom,
}

impl AbstractObjectDomain {
    /// Wraps a value as a constant element.
    #[must_use]
    pub fn of(value: AbstractObject) -> Self {
        AbstractObjectDomain::Constant(value)
    }

    /// Returns the constant value, if this element is neither ⊤ nor ⊥.
    #[must_use]
    pub fn constant(&self) -> Option<&AbstractObject> {
        match self {
            AbstractObjectDomain::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Widening operator; equal to [`join`](JoinSemiLattice::join) since the lattice
    /// has finite height.
    #[must_use]
    pub fn widen(&self, other: &Self) -> Self {
        self.join(other)
    }

    /// Returns `true` if `self` is below or equal to `other` in the lattice order.
    #[must_use]
    pub fn leq(&self, other: &Self) -> bool {
        match (self, other) {
            (AbstractObjectDomain::Bottom, _) | (_, AbstractObjectDomain::Top) => true,
            (AbstractObjectDomain::Constant(a), AbstractObjectDomain::Constant(b)) => a == b,
            _ => false,
        }
    }
}

impl JoinSemiLattice for AbstractObjectDomain {
    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (AbstractObjectDomain::Bottom, x) | (x, AbstractObjectDomain::Bottom) => x.clone(),
            (AbstractObjectDomain::Constant(a), AbstractObjectDomain::Constant(b)) if a == b => {
                AbstractObjectDomain::Constant(a.clone())
            }
            _ => AbstractObjectDomain::Top,
        }
    }

    fn is_top(&self) -> bool {
        matches!(self, AbstractObjectDomain::Top)
    }
}

impl MeetSemiLattice for AbstractObjectDomain {
    fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (AbstractObjectDomain::Top, x) | (x, AbstractObjectDomain::Top) => x.clone(),
            (AbstractObjectDomain::Constant(a), AbstractObjectDomain::Constant(b)) if a == b => {
                AbstractObjectDomain::Constant(a.clone())
            }
            _ => AbstractObjectDomain::Bottom,
        }
    }

    fn is_bottom(&self) -> bool {
        matches!(self, AbstractObjectDomain::Bottom)
    }
}

impl Lattice for AbstractObjectDomain {
    fn top() -> Self {
        AbstractObjectDomain::Top
    }

    fn bottom() -> Self {
        AbstractObjectDomain::Bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DexContext;

    fn sample(ctx: &DexContext, descriptor: &str) -> AbstractObjectDomain {
        AbstractObjectDomain::of(AbstractObject::Object {
            ty: ctx.type_ref(descriptor),
        })
    }

    #[test]
    fn test_join_laws() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        let b = sample(&ctx, "Lcom/foo/B;");
        let top = AbstractObjectDomain::top();
        let bottom = AbstractObjectDomain::bottom();

        // Idempotent.
        assert_eq!(a.join(&a), a);
        // Commutative.
        assert_eq!(a.join(&b), b.join(&a));
        // Associative.
        assert_eq!(a.join(&b).join(&top), a.join(&b.join(&top)));
        // Bottom is identity.
        assert_eq!(a.join(&bottom), a);
        assert_eq!(bottom.join(&a), a);
        // Top absorbs.
        assert_eq!(a.join(&top), top);
        // Unequal constants collapse.
        assert_eq!(a.join(&b), top);
    }

    #[test]
    fn test_meet_is_dual() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        let b = sample(&ctx, "Lcom/foo/B;");
        let top = AbstractObjectDomain::top();
        let bottom = AbstractObjectDomain::bottom();

        assert_eq!(a.meet(&a), a);
        assert_eq!(a.meet(&top), a);
        assert_eq!(a.meet(&bottom), bottom);
        assert_eq!(a.meet(&b), bottom);

        // Absorption ties the two operations together.
        assert_eq!(a.meet(&a.join(&b)), a);
        assert_eq!(a.join(&a.meet(&b)), a);
    }

    #[test]
    fn test_widen_equals_join() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        let b = sample(&ctx, "Lcom/foo/B;");
        assert_eq!(a.widen(&b), a.join(&b));
        assert_eq!(a.widen(&a), a.join(&a));
    }

    #[test]
    fn test_leq() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        let b = sample(&ctx, "Lcom/foo/B;");
        let top = AbstractObjectDomain::top();
        let bottom = AbstractObjectDomain::bottom();

        assert!(bottom.leq(&a));
        assert!(a.leq(&top));
        assert!(a.leq(&a));
        assert!(!a.leq(&b));
        assert!(!top.leq(&a));
        assert!(!a.leq(&bottom));
    }

    #[test]
    fn test_constant_accessor() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        assert!(a.constant().is_some());
        assert!(AbstractObjectDomain::top().constant().is_none());
        assert!(AbstractObjectDomain::bottom().constant().is_none());
    }

    #[test]
    fn test_equal_objects_make_equal_constants() {
        let ctx = DexContext::new();
        let a = sample(&ctx, "Lcom/foo/A;");
        let b = sample(&ctx, "Lcom/foo/A;");
        assert_eq!(a, b);
        assert_eq!(a.join(&b), a);
    }
}
