use crate::{normalize, parse, Term};

#[test]
fn seq_associativity_holds_for_mixed_shapes() {
    let a = Term::variable("a").quote();
    let b = Term::constant('d');
    let c = Term::from_array(vec![Term::variable("x"), Term::variable("y")]);

    let lhs = a.clone().seq(b.clone()).seq(c.clone());
    let rhs = a.seq(b.seq(c));
    assert_eq!(lhs, rhs);
}

#[test]
fn normalize_idempotent_across_axiom_scenarios() {
    for src in [
        "[foo] a",
        "[foo] b",
        "[foo] [bar] c",
        "[foo] d",
        "[foo] e",
        "[foo] [bar] f",
    ] {
        let once = normalize(parse(src).unwrap());
        let twice = normalize(once.clone());
        assert_eq!(once, twice, "normalize not idempotent for {src:?}");
    }
}

#[test]
fn parse_of_print_is_identity_on_canonical_forms() {
    let t = Term::from_array(vec![
        Term::variable("x"),
        Term::variable("y").quote(),
        Term::constant('g'),
    ]);
    let printed = t.to_string();
    assert_eq!(parse(&printed).unwrap(), t);
}

#[test]
fn identity_prints_as_empty_string_at_root() {
    assert_eq!(Term::identity().to_string(), "");
    assert_eq!(Term::identity().quote().to_string(), "[]");
}
