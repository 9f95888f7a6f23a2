#![no_std]
#![forbid(unsafe_code)]

//! Confluent completion of protocol rewrite systems.
//!
//! This library reasons about generic signatures by term rewriting:
//! type parameters, protocol conformances, and associated types become
//! strings of [`Atom`]s, requirements become oriented rewrite [`Rule`]s, and
//! questions such as "are these two types the same?" reduce to comparing
//! normal forms. A [`RewriteSystem`] turns a finite set of such rules into
//! a confluent one via Knuth–Bendix completion: it detects overlapping
//! left-hand sides, resolves the resulting critical pairs into new rules,
//! retires rules subsumed by stronger ones, and merges associated-type atoms
//! that name the same type under several protocols.
//!
//! # Usage
//!
//! A rewrite system is built against a read-only [`ProtocolGraph`], which
//! fixes the total order on protocols and their inheritance relation.
//! The graph is populated first; the system then borrows it for its whole
//! lifetime:
//!
//! ~~~
//! use reverki::{Atom, CompletionResult, GenericParam, ProtocolGraph, RewriteSystem, Term};
//!
//! let mut graph = ProtocolGraph::new();
//! graph.insert("Sequence", &[]).unwrap();
//! graph.insert("Collection", &["Sequence"]).unwrap();
//! let sequence = graph.get("Sequence").unwrap();
//! let collection = graph.get("Collection").unwrap();
//!
//! // τ_0_0 conforms to Collection and to Sequence
//! let param = Atom::GenericParam(GenericParam::new(0, 0));
//! let mut system = RewriteSystem::new(&graph);
//! system.initialize(vec![
//!     (
//!         Term::from(vec![param.clone(), Atom::Protocol(collection)]),
//!         Term::from(vec![param.clone()]),
//!     ),
//!     (
//!         Term::from(vec![param.clone(), Atom::Protocol(sequence)]),
//!         Term::from(vec![param.clone()]),
//!     ),
//! ]);
//! assert_eq!(system.complete(10, 10), CompletionResult::Success);
//!
//! // both conformance requirements simplify away
//! let mut term = Term::from(vec![
//!     param.clone(),
//!     Atom::Protocol(sequence),
//!     Atom::Protocol(collection),
//! ]);
//! assert!(system.simplify(&mut term));
//! assert_eq!(term, Term::from(vec![param]));
//! ~~~
//!
//! Atom names borrow from the caller for the lifetime of the system.
//! String literals suffice in the examples above; names built at runtime
//! can be kept alive in an arena:
//!
//! ~~~
//! # use colosseum::unsync::Arena;
//! # use reverki::Atom;
//! let arena = Arena::new();
//! let name: &str = arena.alloc(String::from("Element"));
//! assert_eq!(Atom::Name(name).to_string(), "Element");
//! ~~~
//!
//! # Organisation
//!
//! * [`protocol`] holds the protocol graph and its handles,
//! * [`atom`], [`term`], and [`rule`] hold the data model, and
//! * [`system`] owns the rules, the simplifier, and the completion driver
//!   (the associated-type merge step lives in its own module).
//!
//! Rule indices are stable while rules are added and completion runs, but
//! a successful [`complete`](RewriteSystem::complete) finishes with a
//! cosmetic sort of the rule vector, so indices retained from before that
//! call must not be used afterwards.

extern crate alloc;
#[macro_use]
extern crate log;
#[cfg(test)]
extern crate std;

pub mod atom;
mod merge;
pub mod protocol;
pub mod rule;
pub mod system;
pub mod term;

pub use atom::{Atom, GenericParam, Protocols};
pub use protocol::{Protocol, ProtocolGraph};
pub use rule::Rule;
pub use system::{CompletionResult, DebugFlags, RewriteSystem};
pub use term::Term;
