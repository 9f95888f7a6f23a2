//! Alphabet elements of rewrite terms.

use crate::protocol::{Protocol, ProtocolGraph};
use core::cmp::Ordering;
use core::fmt::{self, Display};
use smallvec::SmallVec;

/// Protocol list of an associated-type atom.
///
/// Most associated types are qualified by a single protocol,
/// so the list is kept inline in the common case.
pub type Protocols<'s> = SmallVec<[Protocol<'s>; 2]>;

/// Positional binder for a generic parameter.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GenericParam {
    pub depth: u16,
    pub index: u16,
}

impl GenericParam {
    pub fn new(depth: u16, index: u16) -> Self {
        Self { depth, index }
    }
}

impl Display for GenericParam {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "τ_{}_{}", self.depth, self.index)
    }
}

/// Alphabet element of a rewrite term.
///
/// Atoms are immutable values; equality and hashing are structural.
/// The protocol list of an [`AssociatedType`](Self::AssociatedType) atom is
/// non-empty, sorted by the graph's protocol order, and free of duplicates;
/// [`associated_type`](Self::associated_type) establishes this.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Atom<'s> {
    Name(&'s str),
    Protocol(Protocol<'s>),
    AssociatedType(Protocols<'s>, &'s str),
    GenericParam(GenericParam),
    Layout(&'s str),
}

impl<'s> Atom<'s> {
    /// Construct an associated-type atom,
    /// sorting its protocol list by the graph order and removing duplicates.
    pub fn associated_type<I>(protos: I, name: &'s str, graph: &ProtocolGraph) -> Self
    where
        I: IntoIterator<Item = Protocol<'s>>,
    {
        let mut protos: Protocols<'s> = protos.into_iter().collect();
        protos.sort_by(|p, q| graph.compare_protocols(*p, *q));
        protos.dedup();
        assert!(!protos.is_empty());
        Self::AssociatedType(protos, name)
    }

    /// Position of the atom's kind in the fixed cross-kind order
    /// Name < Protocol < AssociatedType < GenericParam < Layout.
    ///
    /// Stable across runs.
    fn kind(&self) -> u8 {
        match self {
            Self::Name(..) => 0,
            Self::Protocol(..) => 1,
            Self::AssociatedType(..) => 2,
            Self::GenericParam(..) => 3,
            Self::Layout(..) => 4,
        }
    }

    /// Total order over atoms.
    ///
    /// Atoms of different kinds compare by [`kind`](Self::kind);
    /// atoms of the same kind compare by payload.
    /// Associated types with *more* protocols order before those with fewer:
    ///
    /// ~~~
    /// # use core::cmp::Ordering;
    /// # use reverki::{Atom, ProtocolGraph};
    /// let mut graph = ProtocolGraph::new();
    /// graph.insert("Sequence", &[]).unwrap();
    /// graph.insert("Collection", &[]).unwrap();
    /// let s = graph.get("Sequence").unwrap();
    /// let c = graph.get("Collection").unwrap();
    ///
    /// let one = Atom::associated_type([s], "Element", &graph);
    /// let two = Atom::associated_type([s, c], "Element", &graph);
    /// assert_eq!(two.compare(&one, &graph), Ordering::Less);
    /// ~~~
    pub fn compare(&self, other: &Self, graph: &ProtocolGraph) -> Ordering {
        let kinds = self.kind().cmp(&other.kind());
        if kinds != Ordering::Equal {
            return kinds;
        }

        match (self, other) {
            (Self::Name(n1), Self::Name(n2)) => n1.cmp(n2),
            (Self::Protocol(p1), Self::Protocol(p2)) => graph.compare_protocols(*p1, *p2),
            (Self::AssociatedType(ps1, n1), Self::AssociatedType(ps2, n2)) => {
                // more protocols = smaller
                let lens = ps2.len().cmp(&ps1.len());
                if lens != Ordering::Equal {
                    return lens;
                }
                for (p1, p2) in ps1.iter().zip(ps2.iter()) {
                    let protos = graph.compare_protocols(*p1, *p2);
                    if protos != Ordering::Equal {
                        return protos;
                    }
                }
                n1.cmp(n2)
            }
            (Self::GenericParam(g1), Self::GenericParam(g2)) => g1.cmp(g2),
            (Self::Layout(l1), Self::Layout(l2)) => l1.cmp(l2),
            _ => unreachable!("compared atoms of distinct kinds"),
        }
    }
}

impl<'s> Display for Atom<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Name(name) => name.fmt(f),
            Self::Protocol(proto) => write!(f, "[{}]", proto),
            Self::AssociatedType(protos, name) => {
                write!(f, "[")?;
                let mut first = true;
                for proto in protos {
                    if !first {
                        write!(f, "&")?;
                    }
                    first = false;
                    write!(f, "{}", proto)?;
                }
                write!(f, ":{}]", name)
            }
            Self::GenericParam(param) => param.fmt(f),
            Self::Layout(layout) => write!(f, "[layout: {}]", layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn graph() -> ProtocolGraph {
        let mut graph = ProtocolGraph::new();
        graph.insert("Sequence", &[]).unwrap();
        graph.insert("Collection", &["Sequence"]).unwrap();
        graph
    }

    #[test]
    fn kind_order_is_stable() {
        let graph = graph();
        let sequence = graph.get("Sequence").unwrap();
        let atoms = [
            Atom::Name("a"),
            Atom::Protocol(sequence),
            Atom::associated_type([sequence], "Element", &graph),
            Atom::GenericParam(GenericParam::new(0, 0)),
            Atom::Layout("class"),
        ];
        for (i, a) in atoms.iter().enumerate() {
            for (j, b) in atoms.iter().enumerate() {
                assert_eq!(a.compare(b, &graph), i.cmp(&j));
            }
        }
    }

    #[test]
    fn generic_params_order_by_depth_then_index() {
        let graph = graph();
        let p = |d, i| Atom::GenericParam(GenericParam::new(d, i));
        assert_eq!(p(0, 1).compare(&p(1, 0), &graph), Ordering::Less);
        assert_eq!(p(1, 0).compare(&p(1, 1), &graph), Ordering::Less);
        assert_eq!(p(1, 1).compare(&p(1, 1), &graph), Ordering::Equal);
    }

    #[test]
    fn associated_type_lists_are_sorted_and_deduped() {
        let graph = graph();
        let sequence = graph.get("Sequence").unwrap();
        let collection = graph.get("Collection").unwrap();
        let atom = Atom::associated_type([collection, sequence, collection], "Element", &graph);
        match &atom {
            Atom::AssociatedType(protos, _) => {
                assert_eq!(protos.as_slice(), &[sequence, collection])
            }
            _ => panic!("expected an associated type"),
        }
        assert_eq!(atom.to_string(), "[Sequence&Collection:Element]");
    }

    #[test]
    fn dump_forms() {
        let graph = graph();
        let sequence = graph.get("Sequence").unwrap();
        assert_eq!(Atom::Name("a").to_string(), "a");
        assert_eq!(Atom::Protocol(sequence).to_string(), "[Sequence]");
        assert_eq!(
            Atom::GenericParam(GenericParam::new(1, 2)).to_string(),
            "τ_1_2"
        );
        assert_eq!(Atom::Layout("trivial").to_string(), "[layout: trivial]");
    }
}
