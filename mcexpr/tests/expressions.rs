use std::collections::BTreeSet;

use mcexpr::prelude::*;
use num_bigint::BigInt;

#[test]
fn descendants_are_visited_in_pre_order() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let y = package.add_variable("y", Type::Integer, None);

    // (x + 1) < y
    let expr = func::less(
        func::add([func::reference(x), Expr::from(1)]),
        func::reference(y),
    );

    let kinds: Vec<ExprKind> = expr.descendants().map(Expr::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ExprKind::Binary,
            ExprKind::Nary,
            ExprKind::Ref,
            ExprKind::Int,
            ExprKind::Ref,
        ]
    );
    assert_eq!(expr.children().count(), 2);
    assert_eq!(
        expr.descendants()
            .filter(|node| node.kind() == ExprKind::Ref)
            .count(),
        2
    );
    assert_eq!(expr.referenced_declarations(), BTreeSet::from([x, y]));
}

#[test]
fn walk_mut_reaches_every_node() {
    let mut package = Package::new("test");
    let a = package.add_variable("a", Type::Boolean, None);
    let x = package.add_variable("x", Type::Integer, None);

    let mut expr = func::and([
        func::reference(a),
        func::greater(func::reference(x), Expr::from(1)),
        func::less(func::reference(x), Expr::from(5)),
    ]);
    expr.walk_mut(|node| match node {
        Expr::Int(value) => *value += BigInt::from(1),
        Expr::Nary { op, .. } if *op == NaryOp::And => *op = NaryOp::Or,
        _ => {}
    });

    assert_eq!(
        expr,
        func::or([
            func::reference(a),
            func::greater(func::reference(x), Expr::from(2)),
            func::less(func::reference(x), Expr::from(6)),
        ])
    );
}

#[test]
fn classification() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let buffer = package.add_variable("buffer", Type::array(Type::Integer, 2), None);

    assert!(Expr::from(1).is_literal());
    assert!(func::range(0, 3).is_literal());
    assert!(Expr::Array(vec![Expr::from(1)]).is_literal());
    assert!(!func::reference(x).is_literal());

    assert!(func::reference(x).is_reference_expression());
    assert!(func::array_access(func::reference(buffer), Expr::from(0)).is_reference_expression());
    assert!(!func::add([func::reference(x), Expr::from(1)]).is_reference_expression());

    assert!(func::reference(x).is_reference_to(x));
    assert!(!func::reference(x).is_reference_to(buffer));
}

#[test]
fn singleton_connectives_collapse() {
    let mut package = Package::new("test");
    let a = package.add_variable("a", Type::Boolean, None);

    assert_eq!(func::and([func::reference(a)]), func::reference(a));
    assert_eq!(func::or(Vec::<Expr>::new()), Expr::Bool(false));
    assert_eq!(func::and(Vec::<Expr>::new()), Expr::Bool(true));
    assert_eq!(
        func::reference(a) & Expr::Bool(true),
        func::and([func::reference(a), Expr::Bool(true)])
    );
}

#[test]
fn operators_from_and_to_strings() {
    for op in [
        BinaryOp::Less,
        BinaryOp::Div,
        BinaryOp::Imply,
        BinaryOp::Inequal,
    ] {
        assert_eq!(BinaryOp::from_str(op.to_str()), Some(op));
    }
    assert_eq!(NaryOp::from_str("&&"), Some(NaryOp::And));
    assert_eq!(UnaryOp::from_str("!"), Some(UnaryOp::Not));
    assert_eq!(BinaryOp::from_str("<>"), None);

    assert_eq!(BinaryOp::Less.flipped(), Some(BinaryOp::Greater));
    assert_eq!(BinaryOp::GreaterEqual.negated(), Some(BinaryOp::Less));
    assert_eq!(BinaryOp::Imply.negated(), None);
    assert_eq!(Quantifier::Forall.dual(), Quantifier::Exists);
}

#[test]
fn display_with_package_names() {
    let mut package = Package::new("test");
    let b = package.add_variable("b", Type::Boolean, None);
    let x = package.add_variable("x", Type::Integer, None);
    let buffer = package.add_variable("buffer", Type::array(Type::Integer, 2), None);
    let twice = package.add_function("twice", [("v", Type::Integer)], Type::Integer, |params| {
        func::multiply([func::reference(params[0]), Expr::from(2)])
    });

    let cases = [
        (
            func::ite(func::reference(b), Expr::from(1), func::minus(func::reference(x))),
            "(if b then 1 else -(x))",
        ),
        (
            func::call(twice, [func::reference(x)]),
            "twice(x)",
        ),
        (
            func::array_access(func::reference(buffer), func::rational(1, 2)),
            "buffer[1/2]",
        ),
        (
            Expr::Array(vec![Expr::from(1), Expr::from(2)]),
            "[1, 2]",
        ),
        (
            func::imply(func::reference(b), func::xor([func::reference(b), Expr::Bool(false)])),
            "(b imply (b xor false))",
        ),
        (
            func::select(func::range(0, 3)),
            "select([0..3])",
        ),
    ];
    for (expr, expected) in cases {
        assert_eq!(expr.fmt(&package).to_string(), expected);
    }
}

#[test]
fn declarations_are_found_by_name() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let component = package.add_component("Worker", [("id", Type::Integer)]);
    package
        .add_instance("w0", component, vec![Expr::from(0)])
        .unwrap();

    assert_eq!(package.find_declaration("x"), Some(x));
    assert_eq!(
        package.find_declaration("id"),
        Some(package.component(component).unwrap().parameters[0])
    );
    assert_eq!(package.find_declaration("missing"), None);
    assert_eq!(package.declarations().count(), 2);
    assert_eq!(package.instances().len(), 1);
    assert_eq!(package.instances()[0].name, "w0");
}
