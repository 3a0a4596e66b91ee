use mcexpr::prelude::*;
use mcir::prelude::*;

#[test]
fn descendants_are_visited_in_pre_order() {
    let mut package = Package::new("test");
    let a = package.add_variable("a", Type::Boolean, None);

    let action = Action::Sequential(vec![
        Action::Assume(func::reference(a)),
        Action::Parallel(vec![Action::Empty, Action::Havoc(func::reference(a))]),
        Action::VariableDeclaration(a),
    ]);

    let kinds: Vec<ActionKind> = action.descendants().map(Action::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::Sequential,
            ActionKind::Assume,
            ActionKind::Parallel,
            ActionKind::Empty,
            ActionKind::Havoc,
            ActionKind::VariableDeclaration,
        ]
    );
    assert_eq!(action.children().count(), 3);
}

#[test]
fn substitution_reaches_every_expression() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let n = package.add_local_parameter("n", Type::Integer);
    let i = package.add_local_parameter("i", Type::Integer);

    let mut action = Action::Loop {
        parameter: i,
        range: IntegerRange::half_open(0, func::reference(n)),
        body: Box::new(Action::If {
            condition: func::less(func::reference(x), func::reference(n)),
            then: Box::new(Action::Assignment {
                lhs: func::reference(x),
                rhs: func::add([func::reference(x), func::reference(n)]),
            }),
            otherwise: None,
        }),
    };

    assert_eq!(action.substitute(n, &Expr::from(4)), 3);
    assert!(
        action
            .descendants()
            .flat_map(Action::expressions)
            .all(|expr| !expr.contains_reference(n))
    );
}

#[test]
fn preconditions() {
    let mut package = Package::new("test");
    let a = package.add_variable("a", Type::Boolean, None);
    let b = package.add_variable("b", Type::Boolean, None);
    let x = package.add_variable("x", Type::Integer, None);
    let ra = || func::reference(a);
    let rb = || func::reference(b);
    let assume = |condition| Action::Assume(condition);
    let write = Action::Assignment {
        lhs: func::reference(x),
        rhs: Expr::from(1),
    };

    assert_eq!(Action::Sequential(Vec::new()).precondition(), Expr::Bool(true));
    assert_eq!(
        Action::Sequential(vec![assume(ra()), assume(rb())]).precondition(),
        ra()
    );
    assert_eq!(
        Action::Parallel(vec![assume(ra()), assume(rb())]).precondition(),
        func::and([ra(), rb()])
    );
    assert_eq!(
        Action::NonDeterministic(vec![assume(ra()), assume(rb())]).precondition(),
        func::or([ra(), rb()])
    );
    assert_eq!(
        Action::If {
            condition: ra(),
            then: Box::new(assume(rb())),
            otherwise: None,
        }
        .precondition(),
        func::ite(ra(), rb(), Expr::Bool(true))
    );
    assert_eq!(write.precondition(), Expr::Bool(true));
    assert_eq!(Action::NonDeterministic(Vec::new()).precondition(), Expr::Bool(false));
}

#[test]
fn display_as_pseudo_code() {
    let mut package = Package::new("test");
    let a = package.add_variable("a", Type::Boolean, None);
    let x = package.add_variable("x", Type::Integer, None);
    let i = package.add_local_parameter("i", Type::Integer);

    let action = Action::Sequential(vec![
        Action::Assume(func::reference(a)),
        Action::If {
            condition: func::reference(a),
            then: Box::new(Action::Empty),
            otherwise: Some(Box::new(Action::Loop {
                parameter: i,
                range: IntegerRange::inclusive(0, 2),
                body: Box::new(Action::Assignment {
                    lhs: func::reference(x),
                    rhs: func::reference(i),
                }),
            })),
        },
    ]);

    let expected = "\
seq {
  assume a
  if a {
    skip
  } else {
    for i in [0..2] {
      x := i
    }
  }
}
";
    assert_eq!(action.fmt(&package).to_string(), expected);
}
