//! Oriented rewrite rules.

use crate::term::Term;
use core::fmt::{self, Display};

/// Oriented rewrite rule.
///
/// The left-hand side is strictly greater than the right-hand side under the
/// shortlex term order; both sides are non-empty.
/// Rules are never removed from a rewrite system:
/// a rule subsumed by a stronger one is only marked deleted,
/// so that rule indices stay stable.
#[derive(Clone, Debug)]
pub struct Rule<'s> {
    lhs: Term<'s>,
    rhs: Term<'s>,
    deleted: bool,
    /// Number of overlap steps separating this rule from the initial set:
    /// 0 for initial and merge-synthesised rules,
    /// 1 + the maximum of the parents' depths for completion-derived rules.
    depth: u32,
}

impl<'s> Rule<'s> {
    pub(crate) fn new(lhs: Term<'s>, rhs: Term<'s>, depth: u32) -> Self {
        Self {
            lhs,
            rhs,
            deleted: false,
            depth,
        }
    }

    pub fn lhs(&self) -> &Term<'s> {
        &self.lhs
    }

    pub fn rhs(&self) -> &Term<'s> {
        &self.rhs
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Mark the rule as deleted. Deletion is irrevocable.
    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true
    }

    /// Simplification of the right-hand side keeps the rule oriented,
    /// since rewriting only decreases terms.
    pub(crate) fn set_rhs(&mut self, rhs: Term<'s>) {
        self.rhs = rhs
    }

    /// Rewrite the leftmost occurrence of the rule's left-hand side in `term`.
    ///
    /// Callers must not apply deleted rules.
    pub fn apply(&self, term: &mut Term<'s>) -> bool {
        term.rewrite_subterm(&self.lhs, &self.rhs)
    }

    /// Return true if `other` rewrites this rule's left-hand side,
    /// i.e. this rule is subsumed by the (distinct) rule `other`.
    pub fn can_reduce_left_hand_side(&self, other: &Self) -> bool {
        (self.lhs != other.lhs || self.rhs != other.rhs)
            && self.lhs.find_subterm(&other.lhs).is_some()
    }
}

impl<'s> Display for Rule<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} => {}", self.lhs, self.rhs)?;
        if self.deleted {
            write!(f, " [deleted]")?;
        }
        Ok(())
    }
}
