use mcexpr::prelude::*;
use mcir::{prelude::*, utils::Error};

struct Fixture {
    package: Package,
    a: DeclKey,
    b: DeclKey,
    x: DeclKey,
}

impl Fixture {
    fn new() -> Self {
        let mut package = Package::new("test");
        let a = package.add_variable("a", Type::Boolean, None);
        let b = package.add_variable("b", Type::Boolean, None);
        let x = package.add_variable("x", Type::Integer, None);
        Self { package, a, b, x }
    }

    fn set(&self, value: i32) -> Action {
        Action::Assignment {
            lhs: func::reference(self.x),
            rhs: Expr::from(value),
        }
    }

    /// Every assignment of the two boolean variables.
    fn valuations(&self) -> Vec<Bindings> {
        [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .map(|(a, b)| Bindings::from([(self.a, Expr::Bool(a)), (self.b, Expr::Bool(b))]))
            .collect()
    }
}

fn branches(action: &Action) -> &[Action] {
    match action {
        Action::NonDeterministic(branches) => branches,
        other => panic!("expected a choice, found {:?}", other.kind()),
    }
}

#[test]
fn switch_guards_are_exclusive() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);
    let rb = || func::reference(fixture.b);

    let switch = create_switch_action(
        vec![ra(), rb()],
        vec![fixture.set(0), fixture.set(1), fixture.set(2)],
    )
    .unwrap();

    let preconditions: Vec<Expr> = branches(&switch).iter().map(Action::precondition).collect();
    assert_eq!(
        preconditions,
        vec![
            ra(),
            func::and([func::not(ra()), rb()]),
            func::and([func::not(ra()), func::not(rb())]),
        ]
    );

    for bindings in fixture.valuations() {
        let evaluator = ExpressionEvaluator::new(&fixture.package).with_bindings(&bindings);
        let enabled = preconditions
            .iter()
            .filter(|precondition| evaluator.evaluate_boolean(precondition).unwrap())
            .count();
        assert_eq!(enabled, 1);
    }
}

#[test]
fn switch_without_default() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);
    let rb = || func::reference(fixture.b);

    let switch = create_switch_action(vec![ra(), rb()], vec![fixture.set(0), fixture.set(1)]).unwrap();
    assert_eq!(
        switch,
        Action::NonDeterministic(vec![
            guarded_branch(ra(), fixture.set(0)),
            guarded_branch(func::and([func::not(ra()), rb()]), fixture.set(1)),
        ])
    );
}

#[test]
fn choice_with_default_branch() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);
    let rb = || func::reference(fixture.b);

    let choice = create_choice_action(
        vec![ra(), rb()],
        vec![fixture.set(0), fixture.set(1), fixture.set(2)],
    )
    .unwrap();
    assert_eq!(
        choice,
        Action::NonDeterministic(vec![
            guarded_branch(ra(), fixture.set(0)),
            guarded_branch(rb(), fixture.set(1)),
            guarded_branch(func::and([func::not(ra()), func::not(rb())]), fixture.set(2)),
        ])
    );

    // the default branch is enabled exactly when no other branch is
    let preconditions: Vec<Expr> = branches(&choice).iter().map(Action::precondition).collect();
    for bindings in fixture.valuations() {
        let evaluator = ExpressionEvaluator::new(&fixture.package).with_bindings(&bindings);
        let guarded = evaluator
            .evaluate_boolean(&func::or(preconditions[..2].iter().cloned()))
            .unwrap();
        let default = evaluator.evaluate_boolean(&preconditions[2]).unwrap();
        assert_ne!(guarded, default);
    }
}

#[test]
fn else_guard_becomes_default_branch() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);

    let choice = create_choice_action(
        vec![Expr::Else, ra()],
        vec![fixture.set(0), fixture.set(1)],
    )
    .unwrap();
    assert_eq!(
        choice,
        Action::NonDeterministic(vec![
            guarded_branch(ra(), fixture.set(1)),
            guarded_branch(func::not(ra()), fixture.set(0)),
        ])
    );

    let plain = create_choice_action(vec![ra()], vec![fixture.set(0)]).unwrap();
    assert_eq!(
        plain,
        Action::NonDeterministic(vec![guarded_branch(ra(), fixture.set(0))])
    );
}

#[test]
fn default_branch_requires_a_choice() {
    let fixture = Fixture::new();

    let mut sequence = Action::Sequential(vec![fixture.set(0)]);
    let err = extend_choice_with_default_branch(&mut sequence, fixture.set(1)).unwrap_err();
    assert_eq!(
        err,
        Error::NotAChoice {
            found: "Sequential".to_string()
        }
    );

    // an empty choice can never start: its default branch always can
    let mut empty = Action::NonDeterministic(Vec::new());
    extend_choice_with_default_branch(&mut empty, fixture.set(1)).unwrap();
    assert_eq!(
        empty,
        Action::NonDeterministic(vec![guarded_branch(Expr::Bool(true), fixture.set(1))])
    );
}

#[test]
fn if_chains() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);
    let rb = || func::reference(fixture.b);

    let chain = create_if_action(
        vec![ra(), rb()],
        vec![fixture.set(0), fixture.set(1), fixture.set(2)],
    )
    .unwrap();
    assert_eq!(
        chain,
        Action::If {
            condition: ra(),
            then: Box::new(fixture.set(0)),
            otherwise: Some(Box::new(Action::If {
                condition: rb(),
                then: Box::new(fixture.set(1)),
                otherwise: Some(Box::new(fixture.set(2))),
            })),
        }
    );

    let no_default = create_if_action(vec![ra()], vec![fixture.set(0)]).unwrap();
    assert_eq!(
        no_default,
        Action::If {
            condition: ra(),
            then: Box::new(fixture.set(0)),
            otherwise: None,
        }
    );

    assert_eq!(create_if_action(Vec::new(), Vec::new()).unwrap(), Action::Empty);
    assert_eq!(
        create_if_action(Vec::new(), vec![fixture.set(3)]).unwrap(),
        fixture.set(3)
    );
}

#[test]
fn builders_check_arity() {
    let fixture = Fixture::new();
    let ra = || func::reference(fixture.a);

    assert_eq!(
        create_switch_action(vec![ra()], Vec::new()).unwrap_err(),
        Error::GuardActionMismatch {
            guards: 1,
            actions: 0
        }
    );
    assert!(
        create_choice_action(
            vec![ra()],
            vec![fixture.set(0), fixture.set(1), fixture.set(2)]
        )
        .unwrap_err()
        .is_guard_action_mismatch()
    );
    assert!(
        create_if_action(vec![ra(), ra()], vec![fixture.set(0)])
            .unwrap_err()
            .is_guard_action_mismatch()
    );
}

#[test]
fn non_boolean_guards_are_rejected() {
    let fixture = Fixture::new();

    let err = create_switch_action(vec![Expr::from(1)], vec![fixture.set(0)]).unwrap_err();
    assert!(err.is_expr());
    assert!(
        err.try_as_expr()
            .is_some_and(|err| err.is_not_negatable())
    );
}
