//! Compares the enumeration with an exhaustive search on random classifiers.

mod common;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use xdd_diagram::io::nnf::parse_nnf;
use xdd_diagram::{Bdd, Lit, Manager, Session};
use xdd_explain::Assignment;

const NUM_VARS: u32 = 6;

fn random_lit(rng: &mut SmallRng) -> Lit {
    Lit::new(rng.random_range(1..=NUM_VARS), rng.random_bool(0.5))
}

/// Disjunction of random terms over the variables.
fn random_dnf(m: &Manager, rng: &mut SmallRng) -> Bdd {
    let mut f = m.constant(false);
    for _ in 0..rng.random_range(1..5) {
        let mut term = m.constant(true);
        for _ in 0..rng.random_range(1..4) {
            term = term.and(&m.literal(random_lit(rng)).unwrap());
        }
        f = f.or(&term);
    }
    f
}

/// The same kind of disjunction, written in the c2d format (not necessarily decomposable).
fn random_nnf(rng: &mut SmallRng) -> String {
    let mut lines = Vec::new();
    let mut terms = Vec::new();
    for _ in 0..rng.random_range(1..5) {
        let first = lines.len();
        for _ in 0..rng.random_range(1..4) {
            lines.push(format!("L {}", random_lit(rng)));
        }
        let children = (first..lines.len()).map(|i| i.to_string()).collect::<Vec<_>>();
        lines.push(format!("A {} {}", children.len(), children.join(" ")));
        terms.push((lines.len() - 1).to_string());
    }
    lines.push(format!("O 0 {} {}", terms.len(), terms.join(" ")));
    format!("nnf {} 0 {NUM_VARS}\n{}\n", lines.len(), lines.join("\n"))
}

/// Random values for all variables, grouped into features of one or two variables.
fn random_instance(rng: &mut SmallRng) -> Assignment {
    let mut features = Vec::new();
    let mut var = 1;
    while var <= NUM_VARS {
        let width = if var < NUM_VARS && rng.random_bool(0.3) { 2 } else { 1 };
        let group = (var..var + width)
            .map(|v| Lit::new(v, rng.random_bool(0.5)))
            .collect::<Vec<_>>();
        features.push(group);
        var += width;
    }
    Assignment::from_literals(features).unwrap()
}

#[test]
fn random_classifiers() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let m = Manager::new(NUM_VARS).unwrap();
    for _ in 0..40 {
        let session = Session::new(&m, random_dnf(&m, &mut rng));
        for _ in 0..3 {
            let inst = random_instance(&mut rng);
            common::check_instance(&session, &inst);
        }
    }
}

#[test]
fn random_classifiers_from_files() {
    let mut rng = SmallRng::seed_from_u64(42);
    for _ in 0..20 {
        let circuit = parse_nnf(&random_nnf(&mut rng)).unwrap();
        assert_eq!(circuit.num_vars(), NUM_VARS);
        // reversed order
        let order = (1..=NUM_VARS).rev().collect::<Vec<_>>();
        let m = Manager::with_order(&order).unwrap();
        let session = Session::new(&m, m.compile(&circuit).unwrap());
        let inst = random_instance(&mut rng);
        common::check_instance(&session, &inst);
    }
}
