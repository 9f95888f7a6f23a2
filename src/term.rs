//! Terms: finite strings of atoms.

use crate::atom::Atom;
use crate::protocol::ProtocolGraph;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Display};

/// Finite ordered sequence of atoms.
///
/// A term may be empty only as an intermediate result;
/// both sides of a rewrite rule are non-empty.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Term<'s>(Vec<Atom<'s>>);

impl<'s> Term<'s> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn atoms(&self) -> &[Atom<'s>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append an atom at the end of the term.
    pub fn add(&mut self, atom: Atom<'s>) {
        self.0.push(atom)
    }

    /// The last atom of the term.
    pub fn back(&self) -> Option<&Atom<'s>> {
        self.0.last()
    }

    /// Replace the last atom of the term.
    pub(crate) fn set_back(&mut self, atom: Atom<'s>) {
        match self.0.last_mut() {
            Some(last) => *last = atom,
            None => unreachable!("replaced the last atom of an empty term"),
        }
    }

    /// Shortlex order: shorter terms are smaller,
    /// terms of equal length compare atom-wise from the left.
    pub fn compare(&self, other: &Self, graph: &ProtocolGraph) -> Ordering {
        let lens = self.len().cmp(&other.len());
        if lens != Ordering::Equal {
            return lens;
        }
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let atoms = a.compare(b, graph);
            if atoms != Ordering::Equal {
                return atoms;
            }
        }
        Ordering::Equal
    }

    /// Leftmost position where `other` occurs contiguously inside `self`.
    ///
    /// Terms longer than `self` and empty terms occur nowhere.
    pub fn find_subterm(&self, other: &Self) -> Option<usize> {
        if other.is_empty() || other.len() > self.len() {
            return None;
        }
        self.0.windows(other.len()).position(|w| w == other.atoms())
    }

    /// Replace the leftmost occurrence of `lhs` with `rhs` in place.
    ///
    /// Returns false if `lhs` does not occur.
    /// Requires `|rhs| ≤ |lhs|`; afterwards,
    /// the length has shrunk by `|lhs| − |rhs|`:
    ///
    /// ~~~
    /// # use reverki::{Atom, Term};
    /// fn term(names: &[&'static str]) -> Term<'static> {
    ///     names.iter().copied().map(Atom::Name).collect()
    /// }
    ///
    /// let mut t = term(&["a", "b", "c", "b", "c"]);
    /// assert!(t.rewrite_subterm(&term(&["b", "c"]), &term(&["d"])));
    /// assert_eq!(t, term(&["a", "d", "b", "c"]));
    /// assert!(!t.rewrite_subterm(&term(&["b", "b"]), &term(&["d"])));
    /// ~~~
    pub fn rewrite_subterm(&mut self, lhs: &Self, rhs: &Self) -> bool {
        assert!(!lhs.is_empty());
        assert!(rhs.len() <= lhs.len());

        let start = match self.find_subterm(lhs) {
            None => return false,
            Some(start) => start,
        };
        self.0
            .splice(start..start + lhs.len(), rhs.0.iter().cloned());
        true
    }

    /// Detect an overlap between `self` and `other`
    /// that would yield a critical pair.
    ///
    /// Returns true and fills `result` (which must be empty on entry) when
    /// either `other` occurs as a contiguous subterm of `self`
    /// (`result` becomes a copy of `self`), or
    /// a non-empty proper suffix of `self` equals a prefix of `other`
    /// (`result` becomes `self` followed by the non-overlapping tail of
    /// `other`).
    /// Containment is sought first, left to right;
    /// then the longest suffix/prefix overlap wins.
    pub fn check_for_overlap(&self, other: &Self, result: &mut Self) -> bool {
        assert!(result.is_empty());

        let n = self.len();
        let m = other.len();
        if m > n {
            return false;
        }

        if self.find_subterm(other).is_some() {
            *result = self.clone();
            return true;
        }

        for k in (1..m).rev() {
            if self.0[n - k..] == other.0[..k] {
                result.0.extend_from_slice(&self.0);
                result.0.extend_from_slice(&other.0[k..]);
                return true;
            }
        }

        false
    }
}

impl<'s> From<Vec<Atom<'s>>> for Term<'s> {
    fn from(atoms: Vec<Atom<'s>>) -> Self {
        Self(atoms)
    }
}

impl<'s> FromIterator<Atom<'s>> for Term<'s> {
    fn from_iter<I: IntoIterator<Item = Atom<'s>>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl<'s> Display for Term<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for atom in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            first = false;
            atom.fmt(f)?;
        }
        Ok(())
    }
}
