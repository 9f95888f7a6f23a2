//! End-to-end behaviour of rule addition, completion, and merging.

use core::cmp::Ordering;
use reverki::{Atom, CompletionResult, ProtocolGraph, RewriteSystem, Term};

fn term<'a>(names: &[&'a str]) -> Term<'a> {
    names.iter().copied().map(Atom::Name).collect()
}

#[test]
fn trivial_rules_are_dropped() {
    let graph = ProtocolGraph::new();
    let mut system = RewriteSystem::new(&graph);
    assert!(!system.add_rule(term(&["a"]), term(&["a"])));
    assert!(system.rules().is_empty());
}

#[test]
fn rules_are_oriented_on_addition() {
    let graph = ProtocolGraph::new();
    let mut system = RewriteSystem::new(&graph);
    assert!(system.add_rule(term(&["a"]), term(&["b"])));
    assert_eq!(system.rules()[0].to_string(), "b => a");

    // the larger side ends up on the left no matter how rules come in
    assert!(system.add_rule(term(&["c", "d"]), term(&["e"])));
    assert!(system.add_rule(term(&["f"]), term(&["f", "g"])));
    for rule in system.rules() {
        assert_eq!(
            rule.lhs().compare(rule.rhs(), &graph),
            Ordering::Greater
        );
    }
}

#[test]
fn simplification_chains_and_is_idempotent() {
    let graph = ProtocolGraph::new();
    let mut system = RewriteSystem::new(&graph);
    system.initialize(vec![
        (term(&["b"]), term(&["a"])),
        (term(&["c"]), term(&["b"])),
    ]);

    let mut t = term(&["c"]);
    assert!(system.simplify(&mut t));
    assert_eq!(t, term(&["a"]));
    assert!(!system.simplify(&mut t));

    let mut t = term(&["a"]);
    assert!(!system.simplify(&mut t));

    assert_eq!(system.complete(10, 10), CompletionResult::Success);
    assert_eq!(system.rules().len(), 2);

    // a single call takes any term containing c all the way to a
    let mut t = term(&["c", "c"]);
    assert!(system.simplify(&mut t));
    assert_eq!(t, term(&["a", "a"]));
}

#[test]
fn critical_pairs_are_resolved() {
    let graph = ProtocolGraph::new();
    let mut system = RewriteSystem::new(&graph);
    system.initialize(vec![
        (term(&["x", "y"]), term(&["z"])),
        (term(&["y", "w"]), term(&["v"])),
    ]);

    assert_eq!(system.complete(10, 10), CompletionResult::Success);
    assert_eq!(system.rules().len(), 3);
    assert_eq!(system.rules()[2].to_string(), "z.w => x.v");
    assert_eq!(system.rules()[2].depth(), 1);

    // rerunning completion finds nothing left to do
    assert_eq!(system.complete(10, 10), CompletionResult::Success);
    assert_eq!(system.rules().len(), 3);
    assert_eq!(
        system.to_string(),
        "Rewrite system: {\n\
         - x.y => z\n\
         - y.w => v\n\
         - z.w => x.v\n\
         }\n"
    );
}

#[test]
fn subsumed_rules_are_retired() {
    let graph = ProtocolGraph::new();
    let mut system = RewriteSystem::new(&graph);
    system.add_rule(term(&["q", "r", "t"]), term(&["q"]));
    system.add_rule(term(&["r", "t"]), term(&["r"]));

    assert_eq!(system.complete(10, 10), CompletionResult::Success);
    assert_eq!(
        system.to_string(),
        "Rewrite system: {\n\
         - q.r => q\n\
         - q.t => q\n\
         - r.t => r\n\
         - q.r.t => q [deleted]\n\
         }\n"
    );
    let live = system.rules().iter().filter(|r| !r.is_deleted()).count();
    assert_eq!(live, 3);

    // the retired rule no longer participates in simplification,
    // yet its normal form is reachable through the live ones
    let mut t = term(&["q", "r", "t"]);
    assert!(system.simplify(&mut t));
    assert_eq!(t, term(&["q"]));
}

#[test]
fn associated_types_are_merged() {
    let mut graph = ProtocolGraph::new();
    graph.insert("P1", &[]).unwrap();
    graph.insert("P2", &[]).unwrap();
    let p1 = graph.get("P1").unwrap();
    let p2 = graph.get("P2").unwrap();

    let assoc1 = Atom::associated_type([p1], "T", &graph);
    let assoc2 = Atom::associated_type([p2], "T", &graph);
    let merged = Atom::associated_type([p1, p2], "T", &graph);

    let mut system = RewriteSystem::new(&graph);
    system.debug.merge = true;
    assert!(system.add_rule(
        Term::from(vec![Atom::Name("x"), assoc1.clone()]),
        Term::from(vec![Atom::Name("x"), assoc2.clone()]),
    ));
    system.process_merged_associated_types();

    // both qualified spellings reach the merged associated type
    for assoc in [assoc1, assoc2] {
        let mut t = Term::from(vec![Atom::Name("x"), assoc]);
        assert!(system.simplify(&mut t));
        assert_eq!(t, Term::from(vec![Atom::Name("x"), merged.clone()]));
    }
    assert!(system
        .rules()
        .iter()
        .any(|r| r.rhs().back() == Some(&merged)));
}

#[test]
fn merged_protocol_lists_are_minimal() {
    let mut graph = ProtocolGraph::new();
    graph.insert("Base", &[]).unwrap();
    graph.insert("Derived", &["Base"]).unwrap();
    let base = graph.get("Base").unwrap();
    let derived = graph.get("Derived").unwrap();

    let system = RewriteSystem::new(&graph);
    let greater = Atom::associated_type([derived], "T", &graph);
    let smaller = Atom::associated_type([base], "T", &graph);
    assert_eq!(greater.compare(&smaller, &graph), Ordering::Greater);

    // Derived covers Base, so the merged list shrinks to Derived alone
    let merged = system.merge_associated_types(&greater, &smaller);
    assert_eq!(merged, Atom::associated_type([derived], "T", &graph));

    // no protocol of a merged list inherits from another
    match &merged {
        Atom::AssociatedType(protos, _) => {
            for p in protos {
                for q in protos {
                    assert!(!(p != q && graph.inherits_from(*p, *q)));
                }
            }
        }
        _ => panic!("expected an associated type"),
    }
}

#[test]
fn conformance_rules_are_lifted() {
    let mut graph = ProtocolGraph::new();
    graph.insert("P1", &[]).unwrap();
    graph.insert("P2", &[]).unwrap();
    graph.insert("Q", &[]).unwrap();
    let p1 = graph.get("P1").unwrap();
    let p2 = graph.get("P2").unwrap();
    let q = graph.get("Q").unwrap();

    let assoc1 = Atom::associated_type([p1], "T", &graph);
    let assoc2 = Atom::associated_type([p2], "T", &graph);
    let merged = Atom::associated_type([p1, p2], "T", &graph);

    let mut system = RewriteSystem::new(&graph);
    // [P1:T] conforms to Q
    system.add_rule(
        Term::from(vec![assoc1.clone(), Atom::Protocol(q)]),
        Term::from(vec![assoc1.clone()]),
    );
    // context forcing [P1:T] and [P2:T] together
    system.add_rule(
        Term::from(vec![Atom::Name("x"), assoc1.clone()]),
        Term::from(vec![Atom::Name("x"), assoc2.clone()]),
    );
    system.process_merged_associated_types();

    // the conformance is restated for the merged associated type
    let lifted_lhs = Term::from(vec![merged.clone(), Atom::Protocol(q)]);
    let lifted_rhs = Term::from(vec![merged]);
    assert!(system
        .rules()
        .iter()
        .any(|r| *r.lhs() == lifted_lhs && *r.rhs() == lifted_rhs));
}

#[test]
fn iteration_budget_is_a_hard_stop() {
    let graph = ProtocolGraph::new();
    let names = ["a0", "a1", "a2", "a3", "a4", "a5", "a6"];
    let mut rules = Vec::new();
    for i in 0..6 {
        rules.push((term(&[names[i], names[i + 1]]), term(&[names[i + 1]])));
    }

    let mut system = RewriteSystem::new(&graph);
    system.initialize(rules);
    assert_eq!(system.rules().len(), 6);
    let initial: Vec<String> = system.rules().iter().map(|r| r.to_string()).collect();

    assert_eq!(system.complete(5, 10), CompletionResult::MaxIterations);
    // exactly five rules beyond the initial set, which sits untouched
    assert_eq!(system.rules().len(), 11);
    for (i, dump) in initial.iter().enumerate() {
        assert_eq!(system.rules()[i].to_string(), *dump);
    }
    for rule in &system.rules()[6..] {
        assert_eq!(rule.depth(), 1);
    }

    // a larger budget resumes where the last run stopped
    assert_eq!(system.complete(1000, 10), CompletionResult::Success);
    // the closure of the chain: one rule per pair of names
    assert_eq!(system.rules().len(), 21);
    assert!(system.rules().iter().all(|r| !r.is_deleted()));
}

#[test]
fn depth_bound_is_a_hard_stop() {
    let graph = ProtocolGraph::new();
    let names = ["a0", "a1", "a2", "a3", "a4", "a5", "a6"];
    let mut rules = Vec::new();
    for i in 0..6 {
        rules.push((term(&[names[i], names[i + 1]]), term(&[names[i + 1]])));
    }

    let mut system = RewriteSystem::new(&graph);
    system.initialize(rules);
    assert_eq!(system.complete(1000, 0), CompletionResult::MaxDepth);
}
