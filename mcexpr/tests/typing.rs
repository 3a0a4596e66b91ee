use mcexpr::prelude::*;

#[test]
fn literal_types() {
    let mut package = Package::new("test");
    let color = package.add_enumeration("Color", ["Red", "Green"]);
    let red = package.enum_literal(color, "Red").unwrap();
    let types = TypeDeterminator::new(&package);

    assert_eq!(types.get_type(&Expr::Bool(true)).unwrap(), Type::Boolean);
    assert_eq!(types.get_type(&Expr::from(3)).unwrap(), Type::Integer);
    assert_eq!(types.get_type(&func::rational(1, 3)).unwrap(), Type::Rational);
    assert_eq!(
        types.get_type(&func::decimal("1.5".parse().unwrap())).unwrap(),
        Type::Decimal
    );
    assert_eq!(types.get_type(&red).unwrap(), Type::Named(color));
    assert_eq!(
        types.get_type(&func::range(0, 4)).unwrap(),
        Type::Range(IntegerRange::inclusive(0, 4))
    );
}

#[test]
fn numeric_promotion() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let types = TypeDeterminator::new(&package);

    let integer = func::multiply([func::reference(x), Expr::from(2)]);
    assert_eq!(types.get_type(&integer).unwrap(), Type::Integer);

    let rational = func::add([func::reference(x), func::rational(1, 2)]);
    assert_eq!(types.get_type(&rational).unwrap(), Type::Rational);

    let decimal = func::subtract(rational, func::decimal("0.1".parse().unwrap()));
    assert_eq!(types.get_type(&decimal).unwrap(), Type::Decimal);

    assert_eq!(
        types.get_type(&func::minus(func::rational(1, 2))).unwrap(),
        Type::Rational
    );
    assert!(
        types
            .get_type(&func::minus(Expr::Bool(true)))
            .unwrap_err()
            .is_type_mismatch()
    );
}

#[test]
fn integer_division_requires_integers() {
    let mut package = Package::new("test");
    let i = package.add_variable("i", Type::Range(IntegerRange::inclusive(0, 9)), None);
    let types = TypeDeterminator::new(&package);

    assert_eq!(
        types
            .get_type(&func::modulo(func::reference(i), Expr::from(3)))
            .unwrap(),
        Type::Integer
    );
    let err = types
        .get_type(&func::modulo(func::decimal("2.5".parse().unwrap()), Expr::from(2)))
        .unwrap_err();
    assert!(err.is_type_mismatch());
    assert_eq!(err.category(), ErrorCategory::Typing);
}

#[test]
fn predicates_and_connectives_are_boolean() {
    let mut package = Package::new("test");
    let x = package.add_variable("x", Type::Integer, None);
    let p = package.add_local_parameter("p", Type::Boolean);
    let types = TypeDeterminator::new(&package);

    for expr in [
        func::less(func::reference(x), Expr::from(1)),
        func::equal(func::reference(x), Expr::from(1)),
        func::imply(Expr::Bool(true), Expr::Bool(false)),
        func::and([Expr::Bool(true), func::reference(p)]),
        func::xor([Expr::Bool(true), func::reference(p)]),
        func::not(func::reference(p)),
        func::exists(p, func::reference(p)),
        Expr::Else,
    ] {
        assert_eq!(types.get_type(&expr).unwrap(), Type::Boolean);
        assert!(types.is_boolean(&expr));
    }
}

#[test]
fn aggregate_types() {
    let mut package = Package::new("test");
    let point = package.add_record("Point", [("x", Type::Integer), ("y", Type::Decimal)]);
    let p = package.add_variable("p", Type::Named(point), None);
    let grid = package.add_variable(
        "grid",
        Type::array(Type::array(Type::Boolean, 2), 3),
        None,
    );
    let types = TypeDeterminator::new(&package);

    let literal = Expr::Array(vec![Expr::from(1), Expr::from(2), Expr::from(3)]);
    assert_eq!(
        types.get_type(&literal).unwrap(),
        Type::array(Type::Integer, 3)
    );
    assert!(
        types
            .get_type(&Expr::Array(Vec::new()))
            .unwrap_err()
            .is_empty_array_literal()
    );

    let cell = func::array_access(
        func::array_access(func::reference(grid), Expr::from(0)),
        Expr::from(1),
    );
    assert_eq!(types.get_type(&cell).unwrap(), Type::Boolean);
    assert!(
        types
            .get_type(&func::array_access(func::reference(p), Expr::from(0)))
            .unwrap_err()
            .is_type_mismatch()
    );

    assert_eq!(
        types
            .get_type(&func::record_access(func::reference(p), "y"))
            .unwrap(),
        Type::Decimal
    );
    assert!(
        types
            .get_type(&func::record_access(func::reference(p), "z"))
            .unwrap_err()
            .is_unknown_field()
    );
    assert!(types.is_fractional(&func::record_access(func::reference(p), "y")));
}

#[test]
fn selection_types() {
    let mut package = Package::new("test");
    let color = package.add_enumeration("Color", ["Red", "Green"]);
    let c = package.add_variable("c", Type::Named(color), None);
    let values = package.add_variable("values", Type::array(Type::Decimal, 4), None);
    let types = TypeDeterminator::new(&package);

    assert_eq!(
        types.get_type(&func::select(func::type_reference(color))).unwrap(),
        Type::Named(color)
    );
    assert_eq!(
        types.get_type(&func::select(func::reference(c))).unwrap(),
        Type::Named(color)
    );
    assert_eq!(
        types.get_type(&func::select(func::range(1, 5))).unwrap(),
        Type::Integer
    );
    assert_eq!(
        types
            .get_type(&func::select(func::reference(values)))
            .unwrap(),
        Type::Decimal
    );
    assert!(types.get_type(&func::select(Expr::Bool(true))).is_err());
    assert!(types.is_enumeration(&func::select(func::reference(c))));
}

#[test]
fn calls_and_conditionals() {
    let mut package = Package::new("test");
    let small = package.add_type_declaration("Small", Type::Integer);
    let s = package.add_variable("s", Type::Named(small), None);
    let half = package.add_function("half", [("a", Type::Integer)], Type::Rational, |params| {
        func::divide(func::reference(params[0]), func::rational(2, 1))
    });
    let types = TypeDeterminator::new(&package);

    assert_eq!(
        types.get_type(&func::call(half, [Expr::from(3)])).unwrap(),
        Type::Rational
    );
    let err = types
        .get_type(&func::call(half, [Expr::from(3), Expr::from(4)]))
        .unwrap_err();
    assert!(err.is_not_typable());
    assert_eq!(err.category(), ErrorCategory::Typing);

    let aliased = func::ite(Expr::Bool(true), func::reference(s), Expr::from(1));
    assert_eq!(types.get_type(&aliased).unwrap(), Type::Named(small));
    assert!(types.is_integer(&aliased));

    let mismatched = func::ite(Expr::Bool(true), Expr::from(1), Expr::Bool(false));
    assert!(
        types
            .get_type(&mismatched)
            .unwrap_err()
            .is_branch_type_mismatch()
    );
}

#[test]
fn type_equality() {
    let mut package = Package::new("test");
    let small = package.add_type_declaration("Small", Type::Integer);
    let smaller = package.add_type_declaration("Smaller", Type::Named(small));
    let first = package.add_record("First", [("v", Type::Integer)]);
    let second = package.add_record("Second", [("v", Type::Integer)]);
    let types = TypeDeterminator::new(&package);

    assert!(types.equals(&Type::Named(smaller), &Type::Integer));
    assert!(types.equals(&Type::Named(first), &Type::Named(first)));
    assert!(!types.equals(&Type::Named(first), &Type::Named(second)));

    let anonymous = |ty: Type| {
        Type::Record(vec![FieldDeclaration {
            name: "v".to_string(),
            ty,
        }])
    };
    assert!(types.equals(&anonymous(Type::Named(small)), &anonymous(Type::Integer)));
    assert!(!types.equals(&anonymous(Type::Boolean), &anonymous(Type::Integer)));

    let computed = Type::Array {
        element: Box::new(Type::Named(small)),
        size: Box::new(func::add([Expr::from(1), Expr::from(1)])),
    };
    assert!(types.equals(&computed, &Type::array(Type::Integer, 2)));
    assert!(!types.equals(&computed, &Type::array(Type::Integer, 3)));
}

#[test]
fn classification_helpers() {
    let mut package = Package::new("test");
    let color = package.add_enumeration("Color", ["Red"]);
    let red = package.enum_literal(color, "Red").unwrap();
    let i = package.add_variable("i", Type::Range(IntegerRange::half_open(0, 8)), None);
    let types = TypeDeterminator::new(&package);

    assert!(types.is_number(&func::reference(i)));
    assert!(types.is_integer(&func::reference(i)));
    assert!(!types.is_fractional(&func::reference(i)));

    let decimal = func::decimal("1.25".parse().unwrap());
    assert!(types.is_number(&decimal));
    assert!(!types.is_integer(&decimal));
    assert!(types.is_fractional(&decimal));

    assert!(types.is_enumeration(&red));
    assert!(!types.is_number(&red));
    assert!(!types.is_boolean(&red));

    // untypable expressions are never classified
    assert!(!types.is_number(&Expr::Array(Vec::new())));
}
