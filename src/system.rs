//! Rule storage, simplification, and confluent completion.

use crate::atom::Atom;
use crate::protocol::ProtocolGraph;
use crate::rule::Rule;
use crate::term::Term;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt::{self, Display};

/// Outcome of [`RewriteSystem::complete`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompletionResult {
    /// The worklist was drained; the system is confluent.
    Success,
    /// The iteration budget ran out.
    /// The unprocessed pair stays at the front of the worklist,
    /// so calling `complete` again with a larger budget resumes the run.
    MaxIterations,
    /// A derived rule exceeded the depth bound.
    MaxDepth,
}

/// Switches for diagnostic output, emitted through the `log` facade.
#[derive(Copy, Clone, Debug, Default)]
pub struct DebugFlags {
    /// Log every rule addition.
    pub add: bool,
    /// Log every simplification step.
    pub simplify: bool,
    /// Log associated-type merges and conformance lifting.
    pub merge: bool,
}

/// Rewrite system over strings of typed atoms.
///
/// Rules enter via [`add_rule`](Self::add_rule) (oriented automatically),
/// terms are reduced to normal form via [`simplify`](Self::simplify), and
/// [`complete`](Self::complete) runs Knuth–Bendix completion until the
/// system is confluent or a budget is hit.
///
/// The rule vector is append-only and rule indices are stable up to
/// the finalisation pass at the end of a successful `complete`,
/// which reorders storage for presentation.
pub struct RewriteSystem<'s> {
    protocols: &'s ProtocolGraph,
    rules: Vec<Rule<'s>>,
    /// Ordered rule-index pairs still to be checked for overlap.
    worklist: VecDeque<(usize, usize)>,
    /// Oriented rules whose sides differ only in a trailing
    /// associated-type atom of the same name.
    merge_candidates: VecDeque<(Term<'s>, Term<'s>)>,
    pub debug: DebugFlags,
}

impl<'s> RewriteSystem<'s> {
    pub fn new(protocols: &'s ProtocolGraph) -> Self {
        Self {
            protocols,
            rules: Vec::new(),
            worklist: VecDeque::new(),
            merge_candidates: VecDeque::new(),
            debug: DebugFlags::default(),
        }
    }

    pub fn protocols(&self) -> &'s ProtocolGraph {
        self.protocols
    }

    pub fn rules(&self) -> &[Rule<'s>] {
        &self.rules
    }

    pub(crate) fn pop_merge_candidate(&mut self) -> Option<(Term<'s>, Term<'s>)> {
        self.merge_candidates.pop_front()
    }

    /// Feed a batch of initial rules into the system,
    /// sorted by left-hand side for deterministic output.
    pub fn initialize(&mut self, mut rules: Vec<(Term<'s>, Term<'s>)>) {
        let graph = self.protocols;
        rules.sort_by(|r1, r2| r1.0.compare(&r2.0, graph));
        for (lhs, rhs) in rules {
            self.add_rule(lhs, rhs);
        }
    }

    /// Add a rule equating two terms.
    ///
    /// Both sides are simplified against the current rules;
    /// the larger side under the shortlex order becomes the left-hand side.
    /// Returns false if the sides turn out to be equal.
    pub fn add_rule(&mut self, lhs: Term<'s>, rhs: Term<'s>) -> bool {
        self.add_rule_at_depth(lhs, rhs, 0)
    }

    pub(crate) fn add_rule_at_depth(
        &mut self,
        mut lhs: Term<'s>,
        mut rhs: Term<'s>,
        depth: u32,
    ) -> bool {
        self.simplify(&mut lhs);
        self.simplify(&mut rhs);

        match lhs.compare(&rhs, self.protocols) {
            Ordering::Equal => return false,
            Ordering::Less => core::mem::swap(&mut lhs, &mut rhs),
            Ordering::Greater => (),
        }

        if self.debug.add {
            debug!("adding rule {} => {}", lhs, rhs);
        }

        if merge_candidate(&lhs, &rhs) {
            self.merge_candidates.push_back((lhs.clone(), rhs.clone()));
        }

        let i = self.rules.len();
        self.rules.push(Rule::new(lhs, rhs, depth));

        for j in 0..i {
            self.worklist.push_back((i, j));
            self.worklist.push_back((j, i));
        }

        true
    }

    /// Reduce `term` to a normal form against the current rules.
    ///
    /// Scans the rule vector in order, applying each live rule once;
    /// repeats until a full pass changes nothing.
    /// Returns whether the term changed.
    pub fn simplify(&self, term: &mut Term<'s>) -> bool {
        trace!("simplify: {}", term);
        let mut changed = false;

        loop {
            let mut try_again = false;
            for rule in &self.rules {
                if rule.is_deleted() {
                    continue;
                }
                if rule.apply(term) {
                    if self.debug.simplify {
                        debug!("applied {} yielding {}", rule, term);
                    }
                    changed = true;
                    try_again = true;
                }
            }
            if !try_again {
                break;
            }
        }

        changed
    }

    /// Run Knuth–Bendix completion until no critical pair remains.
    ///
    /// `max_iterations` bounds the number of overlapping rule pairs examined;
    /// `max_depth` bounds the derivation depth of synthesised rules.
    /// On success, every critical pair is joinable and
    /// the rule vector has been sorted by left-hand side,
    /// invalidating previously held rule indices.
    pub fn complete(&mut self, mut max_iterations: u32, max_depth: u32) -> CompletionResult {
        // candidates registered before completion started
        self.process_merged_associated_types();

        while let Some((i, j)) = self.worklist.pop_front() {
            let mut first = Term::new();
            {
                let lhs = &self.rules[i];
                let rhs = &self.rules[j];
                if lhs.is_deleted() || rhs.is_deleted() {
                    continue;
                }
                if !lhs.lhs().check_for_overlap(rhs.lhs(), &mut first) {
                    continue;
                }
            }
            debug_assert!(!first.is_empty());

            if max_iterations == 0 {
                self.worklist.push_front((i, j));
                return CompletionResult::MaxIterations;
            }
            max_iterations -= 1;

            let mut second = first.clone();
            self.rules[i].apply(&mut first);
            self.rules[j].apply(&mut second);
            trace!("critical pair: {} / {}", first, second);

            let depth = 1 + self.rules[i].depth().max(self.rules[j].depth());
            let k = self.rules.len();
            if !self.add_rule_at_depth(first, second, depth) {
                continue;
            }

            if self.rules[k].depth() > max_depth {
                return CompletionResult::MaxDepth;
            }

            let (others, new) = self.rules.split_at_mut(k);
            let new_rule = &new[0];
            for rule in others {
                if !rule.is_deleted() && rule.can_reduce_left_hand_side(new_rule) {
                    rule.mark_deleted();
                }
            }

            self.process_merged_associated_types();
        }

        // normalise right-hand sides against the final rule set
        for idx in 0..self.rules.len() {
            if self.rules[idx].is_deleted() {
                continue;
            }
            let mut rhs = self.rules[idx].rhs().clone();
            if self.simplify(&mut rhs) {
                self.rules[idx].set_rhs(rhs);
            }
        }

        // presentation order only; all index references have been consumed
        let graph = self.protocols;
        self.rules.sort_by(|r1, r2| r1.lhs().compare(r2.lhs(), graph));

        CompletionResult::Success
    }
}

/// Do the two sides of an oriented rule differ only in a trailing
/// associated-type atom of the same name?
fn merge_candidate<'a>(lhs: &Term<'a>, rhs: &Term<'a>) -> bool {
    if lhs.len() != rhs.len() || lhs.is_empty() {
        return false;
    }
    let n = lhs.len();
    if lhs.atoms()[..n - 1] != rhs.atoms()[..n - 1] {
        return false;
    }
    match (lhs.back(), rhs.back()) {
        (
            Some(Atom::AssociatedType(_, lhs_name)),
            Some(Atom::AssociatedType(_, rhs_name)),
        ) => lhs_name == rhs_name,
        _ => false,
    }
}

impl<'s> Display for RewriteSystem<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Rewrite system: {{")?;
        for rule in &self.rules {
            writeln!(f, "- {}", rule)?;
        }
        writeln!(f, "}}")
    }
}
