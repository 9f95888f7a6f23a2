//! Merging of associated-type atoms and the rules derived from it.
//!
//! Two oriented rules whose sides differ only in a trailing associated-type
//! atom of the same name, say `X.[P1:T] => X.[P2:T]`, witness that both
//! atoms name the same type. The system then strengthens itself with
//! `X.[P1:T] => X.[P1&P2:T]` and `X.[P2:T] => X.[P1&P2:T]`, where the
//! merged protocol list is the smallest one covering both under
//! protocol inheritance.

use crate::atom::{Atom, Protocols};
use crate::system::RewriteSystem;
use crate::term::Term;
use alloc::vec::Vec;
use core::cmp::Ordering;

impl<'s> RewriteSystem<'s> {
    /// Merge two associated-type atoms with the same name.
    ///
    /// `lhs` must be greater than `rhs` under the atom order
    /// (hence carry at most as many protocols).
    /// The protocol list of the result is the union of the two lists,
    /// with every protocol dropped that another protocol
    /// of the union inherits from.
    pub fn merge_associated_types(&self, lhs: &Atom<'s>, rhs: &Atom<'s>) -> Atom<'s> {
        let graph = self.protocols();
        debug_assert_eq!(lhs.compare(rhs, graph), Ordering::Greater);

        let (lhs_protos, name) = match lhs {
            Atom::AssociatedType(protos, name) => (protos, *name),
            _ => panic!("merged a non-associated-type atom"),
        };
        let rhs_protos = match rhs {
            Atom::AssociatedType(protos, rhs_name) => {
                debug_assert_eq!(name, *rhs_name);
                protos
            }
            _ => panic!("merged a non-associated-type atom"),
        };

        // follows from lhs > rhs
        debug_assert!(lhs_protos.len() <= rhs_protos.len());

        // stable merge of the two sorted lists, duplicates preserved
        let mut merged = Protocols::new();
        let (mut i, mut j) = (0, 0);
        while i < lhs_protos.len() && j < rhs_protos.len() {
            if graph.compare_protocols(rhs_protos[j], lhs_protos[i]) == Ordering::Less {
                merged.push(rhs_protos[j]);
                j += 1;
            } else {
                merged.push(lhs_protos[i]);
                i += 1;
            }
        }
        merged.extend_from_slice(&lhs_protos[i..]);
        merged.extend_from_slice(&rhs_protos[j..]);

        // keep a protocol unless a distinct one of the union inherits from it
        let mut minimal = Protocols::new();
        for p in &merged {
            let redundant = minimal.contains(p)
                || merged
                    .iter()
                    .any(|q| q != p && graph.inherits_from(*q, *p));
            if !redundant {
                minimal.push(*p);
            }
        }

        debug_assert!(!minimal.is_empty());
        Atom::AssociatedType(minimal, name)
    }

    /// Drain the merge-candidate queue in first-in, first-out order.
    ///
    /// For each candidate `(L, R)` with trailing atoms `a` and `b`,
    /// the merged atom `m` yields the rules `L => M` and `R => M`
    /// (`M` being `L` with its last atom replaced by `m`), and every
    /// conformance rule `X.[Q] => X` with `X` equal to `a` or `b`
    /// is lifted to `m.[Q] => m`.
    /// Candidates registered while draining are processed in the same call.
    pub fn process_merged_associated_types(&mut self) {
        while let Some((lhs, rhs)) = self.pop_merge_candidate() {
            if self.debug.merge {
                debug!("merge candidate {} => {}", lhs, rhs);
            }

            let (last_lhs, last_rhs) = match (lhs.back(), rhs.back()) {
                (Some(l), Some(r)) => (l.clone(), r.clone()),
                _ => continue,
            };

            let merged = self.merge_associated_types(&last_lhs, &last_rhs);
            if self.debug.merge {
                debug!("merged atom {}", merged);
            }

            let mut merged_term = lhs.clone();
            merged_term.set_back(merged.clone());

            self.add_rule(lhs, merged_term.clone());
            self.add_rule(rhs, merged_term);

            // conformance lifting over a snapshot of the current rules;
            // the lifted rules are added once the scan is over
            let mut lifted = Vec::new();
            for rule in self.rules() {
                let rule_lhs = rule.lhs();
                if rule_lhs.len() != 2 {
                    continue;
                }
                let q = match &rule_lhs.atoms()[1] {
                    Atom::Protocol(q) => *q,
                    _ => continue,
                };
                let head = &rule_lhs.atoms()[0];
                if *head == last_lhs || *head == last_rhs {
                    if self.debug.merge {
                        debug!("lifting conformance rule {}", rule);
                    }
                    debug_assert_eq!(rule.rhs().len(), 1);
                    debug_assert_eq!(rule.rhs().atoms().first(), Some(head));

                    let new_rhs: Term<'s> = core::iter::once(merged.clone()).collect();
                    let mut new_lhs = new_rhs.clone();
                    new_lhs.add(Atom::Protocol(q));
                    lifted.push((new_lhs, new_rhs));
                }
            }
            for (new_lhs, new_rhs) in lifted {
                self.add_rule(new_lhs, new_rhs);
            }
        }
    }
}
