use criterion::{black_box, criterion_group, criterion_main, Criterion};
use monolog::{parse_goal, parse_program, Interner, KnowledgeBase, SolveConfig, Solver};

fn peano(n: usize) -> String {
    let mut term = "z".to_string();
    for _ in 0..n {
        term = format!("s({})", term);
    }
    term
}

fn setup_peano() -> (KnowledgeBase, Interner) {
    let mut interner = Interner::new();
    let mut kb = KnowledgeBase::new();
    let program = "
        plus(z, N, N).
        plus(s(N), M, s(R)) :- plus(N, M, R).
    ";
    for clause in parse_program(program, &mut interner).unwrap() {
        kb.assert(clause);
    }
    (kb, interner)
}

fn setup_graph() -> (KnowledgeBase, Interner) {
    let mut interner = Interner::new();
    let mut kb = KnowledgeBase::new();

    // A chain of 50 nodes with right-recursive reachability
    let mut program = String::new();
    for i in 0..50 {
        program.push_str(&format!("edge(n{}, n{}).\n", i, i + 1));
    }
    program.push_str("path(X, Y) :- edge(X, Y).\n");
    program.push_str("path(X, Z) :- edge(X, Y), path(Y, Z).\n");

    for clause in parse_program(&program, &mut interner).unwrap() {
        kb.assert(clause);
    }
    (kb, interner)
}

fn first_answer_deep_addition(c: &mut Criterion) {
    let (kb, mut interner) = setup_peano();
    let query = format!("plus({}, {}, R).", peano(40), peano(40));
    let goal = parse_goal(&query, &mut interner).unwrap();

    c.bench_function("first_answer_deep_addition", |b| {
        b.iter(|| {
            let mut solver = Solver::new(&kb, &goal, SolveConfig::default());
            black_box(solver.next())
        });
    });
}

fn all_answers_backward_addition(c: &mut Criterion) {
    let (kb, mut interner) = setup_peano();
    // All 31 splits of 30 into A + B
    let query = format!("plus(A, B, {}).", peano(30));
    let goal = parse_goal(&query, &mut interner).unwrap();

    c.bench_function("all_answers_backward_addition", |b| {
        b.iter(|| {
            let solver = Solver::new(&kb, &goal, SolveConfig::default());
            black_box(solver.count())
        });
    });
}

fn all_reachable_nodes(c: &mut Criterion) {
    let (kb, mut interner) = setup_graph();
    let goal = parse_goal("path(n0, X).", &mut interner).unwrap();

    c.bench_function("all_reachable_nodes", |b| {
        b.iter(|| {
            let solver = Solver::new(&kb, &goal, SolveConfig::default());
            black_box(solver.count())
        });
    });
}

fn occurs_check_overhead(c: &mut Criterion) {
    let (kb, mut interner) = setup_peano();
    let query = format!("plus({}, {}, R).", peano(40), peano(40));
    let goal = parse_goal(&query, &mut interner).unwrap();
    let config = SolveConfig {
        occurs_check: true,
        step_limit: 0,
    };

    c.bench_function("occurs_check_overhead", |b| {
        b.iter(|| {
            let mut solver = Solver::new(&kb, &goal, config.clone());
            black_box(solver.next())
        });
    });
}

criterion_group!(
    benches,
    first_answer_deep_addition,
    all_answers_backward_addition,
    all_reachable_nodes,
    occurs_check_overhead
);
criterion_main!(benches);
