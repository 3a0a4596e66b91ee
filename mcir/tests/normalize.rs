use mcexpr::prelude::*;
use mcir::prelude::*;

struct Atoms {
    a: Action,
    b: Action,
    c: Action,
}

fn atoms() -> Atoms {
    let mut package = Package::new("test");
    let keys: Vec<DeclKey> = ["a", "b", "c"]
        .into_iter()
        .map(|name| package.add_variable(name, Type::Boolean, None))
        .collect();
    let atom = |key: DeclKey| Action::Assume(func::reference(key));
    Atoms {
        a: atom(keys[0]),
        b: atom(keys[1]),
        c: atom(keys[2]),
    }
}

#[test]
fn sequences_are_flattened() {
    let Atoms { a, b, .. } = atoms();

    let nested = Action::Sequential(vec![
        Action::Empty,
        Action::Sequential(vec![a.clone(), Action::Assume(Expr::Bool(true))]),
        b.clone(),
    ]);
    assert_eq!(normalize(nested), Action::Sequential(vec![a.clone(), b]));

    assert_eq!(normalize(Action::Sequential(vec![a.clone()])), a);
    assert_eq!(normalize(Action::Sequential(Vec::new())), Action::Empty);
    assert_eq!(
        normalize(Action::Sequential(vec![
            Action::Empty,
            Action::Assume(Expr::Bool(true))
        ])),
        Action::Empty
    );
}

#[test]
fn parallel_compositions_are_flattened() {
    let Atoms { a, b, c } = atoms();

    let nested = Action::Parallel(vec![
        Action::Empty,
        Action::Parallel(vec![a.clone(), b.clone()]),
        c.clone(),
    ]);
    assert_eq!(
        normalize(nested),
        Action::Parallel(vec![a.clone(), b.clone(), c])
    );

    assert_eq!(normalize(Action::Parallel(vec![Action::Sequential(vec![a.clone()])])), a);

    // `assume true` is only dropped from sequences
    let kept = Action::Parallel(vec![Action::Assume(Expr::Bool(true)), b.clone()]);
    assert_eq!(normalize(kept.clone()), kept);
}

#[test]
fn choices_are_flattened_but_never_emptied() {
    let Atoms { a, b, c } = atoms();

    let nested = Action::NonDeterministic(vec![
        Action::NonDeterministic(vec![a.clone(), b.clone()]),
        c.clone(),
    ]);
    assert_eq!(
        normalize(nested),
        Action::NonDeterministic(vec![a.clone(), b.clone(), c.clone()])
    );

    assert_eq!(
        normalize(Action::NonDeterministic(Vec::new())),
        Action::NonDeterministic(Vec::new())
    );

    let blocking = Action::NonDeterministic(vec![Action::NonDeterministic(Vec::new()), a.clone()]);
    assert_eq!(normalize(blocking.clone()), blocking);

    assert_eq!(
        normalize(Action::NonDeterministic(vec![Action::Sequential(vec![b.clone()])])),
        b
    );
}

#[test]
fn bodies_are_normalized() {
    let Atoms { a, b, .. } = atoms();
    let mut package = Package::new("test");
    let i = package.add_local_parameter("i", Type::Integer);

    let conditional = Action::If {
        condition: Expr::Bool(true),
        then: Box::new(Action::Sequential(vec![a.clone()])),
        otherwise: Some(Box::new(Action::Sequential(vec![Action::Empty]))),
    };
    assert_eq!(
        normalize(conditional),
        Action::If {
            condition: Expr::Bool(true),
            then: Box::new(a.clone()),
            otherwise: Some(Box::new(Action::Empty)),
        }
    );

    let range = IntegerRange::inclusive(0, 3);
    let repeated = Action::Loop {
        parameter: i,
        range: range.clone(),
        body: Box::new(Action::Parallel(vec![Action::Empty, b.clone()])),
    };
    assert_eq!(
        normalize(repeated),
        Action::Loop {
            parameter: i,
            range,
            body: Box::new(b),
        }
    );
}
