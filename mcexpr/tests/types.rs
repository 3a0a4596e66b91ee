use mcexpr::prelude::*;

#[test]
fn default_values_of_primitive_types() {
    let mut package = Package::new("test");
    let small = package.add_type_declaration("Small", Type::Integer);

    assert_eq!(
        package.default_expression(&Type::Boolean).unwrap(),
        Expr::Bool(false)
    );
    assert_eq!(
        package.default_expression(&Type::Integer).unwrap(),
        Expr::from(0)
    );
    assert_eq!(
        package.default_expression(&Type::Rational).unwrap(),
        func::rational(0, 1)
    );
    assert_eq!(
        package.default_expression(&Type::Named(small)).unwrap(),
        Expr::from(0)
    );

    let left_open = IntegerRange {
        lower_inclusive: false,
        ..IntegerRange::inclusive(0, 5)
    };
    assert_eq!(
        package.default_expression(&Type::Range(left_open)).unwrap(),
        Expr::from(1)
    );
    assert!(package.default_expression(&Type::Void).is_err());
}

#[test]
fn default_values_of_composite_types() {
    let mut package = Package::new("test");
    let color = package.add_enumeration("Color", ["Red", "Green"]);
    let point = package.add_record("Point", [("x", Type::Integer), ("flag", Type::Boolean)]);

    assert_eq!(
        package.default_expression(&Type::array(Type::Integer, 3)).unwrap(),
        Expr::Array(vec![Expr::from(0), Expr::from(0), Expr::from(0)])
    );
    assert_eq!(
        package.default_expression(&Type::Named(color)).unwrap(),
        package.enum_literal(color, "Red").unwrap()
    );

    let origin = package.default_expression(&Type::Named(point)).unwrap();
    assert_eq!(
        origin,
        Expr::Record {
            ty: point,
            fields: vec![
                FieldAssignment {
                    field: "x".to_string(),
                    value: Expr::from(0),
                },
                FieldAssignment {
                    field: "flag".to_string(),
                    value: Expr::Bool(false),
                },
            ],
        }
    );
    let evaluator = ExpressionEvaluator::new(&package);
    assert!(
        !evaluator
            .evaluate_boolean(&func::record_access(origin, "flag"))
            .unwrap()
    );

    let anonymous = Type::Record(vec![FieldDeclaration {
        name: "x".to_string(),
        ty: Type::Integer,
    }]);
    assert!(package.default_expression(&anonymous).is_err());

    let unsized_array = Type::Array {
        element: Box::new(Type::Integer),
        size: Box::new(Expr::from(-2)),
    };
    assert!(package.default_expression(&unsized_array).is_err());
}

#[test]
fn aliases_are_stripped() {
    let mut package = Package::new("test");
    let small = package.add_type_declaration("Small", Type::Integer);
    let smaller = package.add_type_declaration("Smaller", Type::Named(small));
    let point = package.add_record("Point", [("x", Type::Named(smaller))]);

    assert_eq!(
        package.aliasless_type(&Type::Named(smaller)).unwrap(),
        Type::Integer
    );
    assert_eq!(
        package.aliasless_type(&Type::Named(point)).unwrap(),
        Type::Named(point)
    );
    assert_eq!(
        package
            .aliasless_type(&Type::array(Type::Named(smaller), 2))
            .unwrap(),
        Type::array(Type::Integer, 2)
    );
    assert_eq!(
        package.resolve_type(&Type::Named(point)).unwrap(),
        &Type::Record(vec![FieldDeclaration {
            name: "x".to_string(),
            ty: Type::Named(smaller),
        }])
    );
}

#[test]
fn native_leaves_of_nested_records() {
    let mut package = Package::new("test");
    let inner = package.add_record("Inner", [("b", Type::Boolean), ("c", Type::Decimal)]);
    let outer = package.add_record(
        "Outer",
        [
            ("a", Type::Integer),
            ("inner", Type::Named(inner)),
            ("arr", Type::array(Type::Named(inner), 2)),
        ],
    );
    let ty = Type::Named(outer);

    let hierarchies = package.native_field_hierarchies(&ty).unwrap();
    let names: Vec<String> = hierarchies.iter().map(ToString::to_string).collect();
    assert_eq!(names, ["a", "inner.b", "inner.c", "arr.b", "arr.c"]);

    assert_eq!(
        package.native_types(&ty).unwrap(),
        vec![
            Type::Integer,
            Type::Boolean,
            Type::Decimal,
            Type::array(Type::Boolean, 2),
            Type::array(Type::Decimal, 2),
        ]
    );

    let missing = FieldHierarchy::from_fields(["inner", "z"]);
    assert!(
        package
            .native_type(&ty, &missing)
            .unwrap_err()
            .is_unknown_field()
    );

    assert_eq!(
        package.native_field_hierarchies(&Type::Boolean).unwrap(),
        vec![FieldHierarchy::new()]
    );
}

#[test]
fn index_paths_of_nested_arrays() {
    let package = Package::new("test");
    let matrix = Type::array(Type::array(Type::Integer, 3), 2);

    let paths: Vec<String> = package
        .index_hierarchies(&matrix)
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        paths,
        ["[0][0]", "[0][1]", "[0][2]", "[1][0]", "[1][1]", "[1][2]"]
    );

    assert_eq!(
        package.index_hierarchies(&Type::Integer).unwrap(),
        vec![IndexHierarchy::new()]
    );
}

#[test]
fn hierarchies_build_accesses() {
    let mut package = Package::new("test");
    let o = package.add_variable("o", Type::Integer, None);

    let fields = FieldHierarchy::from_fields(["inner", "b"]);
    assert_eq!(
        fields.access(func::reference(o)),
        func::record_access(func::record_access(func::reference(o), "inner"), "b")
    );
    assert_eq!(fields.parent(), Some(FieldHierarchy::from_fields(["inner"])));
    assert_eq!(fields.first(), Some("inner"));
    assert_eq!(fields.last(), Some("b"));

    let mut indexes = IndexHierarchy::from_indexes([1]);
    indexes.push(2);
    indexes.prepend(0);
    assert_eq!(indexes.indexes(), &[0, 1, 2]);
    assert_eq!(
        IndexHierarchy::from_indexes([1, 2]).access(func::reference(o)),
        func::array_access(
            func::array_access(func::reference(o), Expr::from(1usize)),
            Expr::from(2usize)
        )
    );
}

#[test]
fn display_uses_package_names() {
    let mut package = Package::new("test");
    let color = package.add_enumeration("Color", ["Red", "Green"]);
    let x = package.add_variable("x", Type::Integer, None);
    let i = package.add_local_parameter("i", Type::Range(IntegerRange::inclusive(0, 3)));

    let sum = func::add([func::reference(x), Expr::from(1)]);
    assert_eq!(sum.fmt(&package).to_string(), "(x + 1)");
    assert_eq!(
        func::not(func::reference(x)).fmt(&package).to_string(),
        "!(x)"
    );
    assert_eq!(
        package
            .enum_literal(color, "Green")
            .unwrap()
            .fmt(&package)
            .to_string(),
        "Color::Green"
    );
    assert_eq!(
        func::forall(i, func::less(func::reference(i), Expr::from(3)))
            .fmt(&package)
            .to_string(),
        "(forall i: (i < 3))"
    );

    assert_eq!(
        Type::array(Type::Integer, 3).fmt(&package).to_string(),
        "integer[3]"
    );
    assert_eq!(
        Type::Range(IntegerRange::half_open(0, 3))
            .fmt(&package)
            .to_string(),
        "integer[0..3)"
    );
}
