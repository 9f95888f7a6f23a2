//! Protocols and the inheritance graph they live in.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Display};
use core::hash::{Hash, Hasher};
use fnv::FnvHashMap;

#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// A protocol with the same name was registered before.
    Reinsertion,
    /// A parent protocol was not registered before its child.
    UndeclaredProtocol(String),
}

#[derive(Debug)]
struct Info {
    index: usize,
    name: String,
    /// Indices of all protocols this one transitively inherits from,
    /// sorted, excluding the protocol itself.
    ancestors: Vec<usize>,
}

/// Handle to a protocol registered in a [`ProtocolGraph`].
///
/// Handles are cheap to copy and carry their name, so
/// rendering them does not require access to the graph.
/// Two handles are equal iff they denote the same registration;
/// handles from different graphs must not be mixed.
#[derive(Copy, Clone)]
pub struct Protocol<'s>(&'s Info);

impl<'s> Protocol<'s> {
    pub fn name(&self) -> &'s str {
        &self.0.name
    }

    pub(crate) fn index(&self) -> usize {
        self.0.index
    }
}

impl<'s> Hash for Protocol<'s> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.index.hash(state)
    }
}

impl<'s> PartialEq for Protocol<'s> {
    fn eq(&self, other: &Self) -> bool {
        self.0.index == other.0.index
    }
}

impl<'s> Eq for Protocol<'s> {}

impl<'s> fmt::Debug for Protocol<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Protocol({})", self.0.name)
    }
}

impl<'s> Display for Protocol<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.name.fmt(f)
    }
}

/// Total order and inheritance relation over a finite set of protocols.
///
/// Protocols are registered bottom-up; every parent named in `inherits`
/// must have been registered before its child.
/// The graph is frozen once the first handle has been obtained via
/// [`get`](Self::get): handles borrow the graph, so
/// further registration is rejected by the borrow checker.
///
/// ~~~
/// # use reverki::protocol::{Error, ProtocolGraph};
/// let mut graph = ProtocolGraph::new();
/// graph.insert("Sequence", &[])?;
/// graph.insert("Collection", &["Sequence"])?;
///
/// let sequence = graph.get("Sequence").unwrap();
/// let collection = graph.get("Collection").unwrap();
/// assert!(graph.inherits_from(collection, sequence));
/// assert!(!graph.inherits_from(sequence, collection));
/// // the relation is strict
/// assert!(!graph.inherits_from(sequence, sequence));
/// # Ok::<_, Error>(())
/// ~~~
#[derive(Debug, Default)]
pub struct ProtocolGraph {
    infos: Vec<Info>,
    names: FnvHashMap<String, usize>,
}

impl ProtocolGraph {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register a protocol under a fresh name,
    /// inheriting from the given previously registered protocols.
    pub fn insert(&mut self, name: &str, inherits: &[&str]) -> Result<(), Error> {
        if self.names.contains_key(name) {
            return Err(Error::Reinsertion);
        }

        let mut ancestors = Vec::new();
        for parent in inherits {
            match self.names.get(*parent) {
                None => return Err(Error::UndeclaredProtocol(parent.to_string())),
                Some(&pi) => {
                    ancestors.push(pi);
                    ancestors.extend_from_slice(&self.infos[pi].ancestors);
                }
            }
        }
        ancestors.sort_unstable();
        ancestors.dedup();

        let index = self.infos.len();
        self.names.insert(name.to_string(), index);
        self.infos.push(Info {
            index,
            name: name.to_string(),
            ancestors,
        });
        Ok(())
    }

    /// Return the handle for a previously registered protocol.
    pub fn get(&self, name: &str) -> Option<Protocol> {
        self.names.get(name).map(|&i| Protocol(&self.infos[i]))
    }

    /// Total order over protocols: registration order.
    ///
    /// Deterministic per graph instance.
    pub fn compare_protocols(&self, p: Protocol, q: Protocol) -> Ordering {
        p.0.index.cmp(&q.0.index)
    }

    /// Return true if `p` transitively inherits from `q`.
    ///
    /// The relation is strict: no protocol inherits from itself.
    pub fn inherits_from(&self, p: Protocol, q: Protocol) -> bool {
        p.0.ancestors.binary_search(&q.0.index).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> ProtocolGraph {
        let mut graph = ProtocolGraph::new();
        graph.insert("Equatable", &[]).unwrap();
        graph.insert("Hashable", &["Equatable"]).unwrap();
        graph.insert("Sequence", &[]).unwrap();
        graph
            .insert("Collection", &["Sequence", "Hashable"])
            .unwrap();
        graph
    }

    #[test]
    fn ancestors_are_transitive() {
        let graph = family();
        let equatable = graph.get("Equatable").unwrap();
        let collection = graph.get("Collection").unwrap();
        assert!(graph.inherits_from(collection, equatable));
        assert!(!graph.inherits_from(equatable, collection));
    }

    #[test]
    fn registration_order() {
        let graph = family();
        let hashable = graph.get("Hashable").unwrap();
        let sequence = graph.get("Sequence").unwrap();
        assert_eq!(
            graph.compare_protocols(hashable, sequence),
            Ordering::Less
        );
        assert_eq!(
            graph.compare_protocols(sequence, sequence),
            Ordering::Equal
        );
    }

    #[test]
    fn registration_errors() {
        let mut graph = family();
        assert_eq!(graph.insert("Sequence", &[]), Err(Error::Reinsertion));
        assert_eq!(
            graph.insert("Numeric", &["AdditiveArithmetic"]),
            Err(Error::UndeclaredProtocol("AdditiveArithmetic".into()))
        );
    }
}
