use jade::analyzer::analyze_program;
use jade::ast::Program;
use jade::lexer::scan;
use jade::parser::parse_program;
use jade::types::{check_program, Context, Type, TypeError};

fn check(source: &str) -> Result<(Program<Type>, Context), Vec<TypeError>> {
    let program = parse_program(scan(source).unwrap()).unwrap();
    let (context, _) = analyze_program(&program, Context::new());
    check_program(&program, context)
}

/// The resolved type of the last statement of a well-typed program.
fn last_type(source: &str) -> Type {
    let (typed, _) = check(source).unwrap_or_else(|errors| {
        panic!("expected {source:?} to check, got {errors:?}");
    });
    typed
        .statements
        .last()
        .map(|statement| statement.info().clone())
        .expect("program has at least one statement")
}

fn error_messages(source: &str) -> Vec<String> {
    check(source)
        .expect_err("expected type errors")
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn first_error(source: &str) -> String {
    error_messages(source)
        .into_iter()
        .next()
        .expect("at least one error")
}

#[test]
fn literals_have_their_own_types() {
    assert_eq!(last_type("2"), Type::Int);
    assert_eq!(last_type("False"), Type::Bool);
    assert_eq!(last_type("\"Hello\""), Type::String);
}

#[test]
fn unary_operators_follow_the_rule_table() {
    assert_eq!(last_type("-4"), Type::Int);
    assert_eq!(last_type("!True"), Type::Bool);
    assert_eq!(first_error("-True"), "Unary '-' not valid for Bool");
    assert_eq!(first_error("!\"Hello\""), "Unary '!' not valid for String");
}

#[test]
fn arithmetic_is_int_by_int() {
    assert_eq!(last_type("2 + 3"), Type::Int);
    assert_eq!(last_type("5 - 3"), Type::Int);
    assert_eq!(last_type("2 * 3"), Type::Int);
    assert_eq!(last_type("6 / 2"), Type::Int);
}

#[test]
fn arithmetic_rejects_other_left_operands() {
    assert_eq!(
        first_error("\"Hello\" + 2"),
        "Left operand of '+' must be Int, got String"
    );
    assert_eq!(
        first_error("True * 2"),
        "Left operand of '*' must be Int, got Bool"
    );
}

#[test]
fn comparisons_yield_bool() {
    assert_eq!(last_type("2 < 3"), Type::Bool);
    assert_eq!(last_type("2 <= 2"), Type::Bool);
    assert_eq!(last_type("3 > 2"), Type::Bool);
    assert_eq!(last_type("3 >= 3"), Type::Bool);
    assert_eq!(last_type("2 == 2"), Type::Bool);
    assert_eq!(last_type("2 != 3"), Type::Bool);
}

#[test]
fn comparisons_reject_non_int_operands() {
    assert_eq!(
        first_error("\"Hello\" < 2"),
        "Left operand of '<' must be Int, got String"
    );
}

#[test]
fn equality_requires_matching_operand_types() {
    assert_eq!(
        first_error("True == \"Hello\""),
        "Right operand of '==' must be Bool, got String"
    );
}

#[test]
fn equality_lists_its_admissible_left_operands() {
    let source = "type User = { n: Int } User(n: 1) == 1";
    assert_eq!(
        first_error(source),
        "Left operand of '==' must be one of Bool, Int, String, got User"
    );
}

#[test]
fn concatenation_is_string_by_string() {
    assert_eq!(last_type("\"a\" ++ \"b\""), Type::String);
    assert_eq!(
        first_error("1 ++ \"b\""),
        "Left operand of '++' must be String, got Int"
    );
    assert_eq!(
        first_error("\"a\" ++ 1"),
        "Right operand of '++' must be String, got Int"
    );
}

#[test]
fn declared_variables_carry_their_initializer_type() {
    assert_eq!(last_type("let z = 42 z"), Type::Int);
    assert_eq!(last_type("let z = \"Alo\" z"), Type::String);
}

#[test]
fn the_returned_context_knows_the_variable_type() {
    let (_, context) = check("let z = 42").unwrap();
    let ty = context.resolve_var("z").and_then(|entry| entry.ty.clone());
    assert_eq!(ty, Some(Type::Int));
}

#[test]
fn function_declarations_build_function_types() {
    let ty = last_type("def double(n: Int) -> Int n * 2 end");
    assert_eq!(ty, Type::function(vec![Type::Int], Type::Int));
    assert_eq!(ty.to_string(), "Int -> Int");
}

#[test]
fn function_bodies_must_end_in_the_declared_return_type() {
    assert_eq!(
        first_error("def f(n: Int) -> String n end"),
        "Expected return type String, got Int"
    );
}

#[test]
fn undeclared_parameter_types_are_reported() {
    assert_eq!(
        first_error("def f(n: Widget) -> Int n end"),
        "Undefined type Widget"
    );
}

#[test]
fn calls_type_to_the_declared_return_type() {
    let source = "def double(n: Int) -> Int n * 2 end double(42)";
    assert_eq!(last_type(source), Type::Int);
}

#[test]
fn argument_mismatches_name_the_position() {
    let source = "def double(n: Int) -> Int n * 2 end double(\"hello\")";
    assert_eq!(
        first_error(source),
        "Expected argument 0 of type Int, got String"
    );
}

#[test]
fn only_the_first_positional_mismatch_is_reported() {
    let source = "def pair(a: Int, b: String) -> Int a end pair(42, 43)";
    let errors = error_messages(source);
    assert_eq!(errors, vec!["Expected argument 1 of type String, got Int"]);
}

#[test]
fn record_declarations_register_a_record_type() {
    let ty = last_type("type User = { name: String, age: Int }");
    let Type::Record { name, fields, .. } = &ty else {
        panic!("expected a record type");
    };
    assert_eq!(name.as_deref(), Some("User"));
    assert_eq!(fields["name"], Type::String);
    assert_eq!(fields["age"], Type::Int);
    assert_eq!(ty.to_string(), "User");
}

#[test]
fn instantiation_types_to_the_declared_record() {
    let decl = "type User = { name: String, age: Int } ";
    let in_order = last_type(&format!("{decl}User(name: \"John\", age: 25)"));
    let reordered = last_type(&format!("{decl}User(age: 25, name: \"John\")"));
    assert_eq!(in_order, reordered);
    let Type::Record { fields, .. } = in_order else {
        panic!("expected a record type");
    };
    assert_eq!(fields["name"], Type::String);
    assert_eq!(fields["age"], Type::Int);
}

#[test]
fn field_type_mismatches_accumulate() {
    let source =
        "type User = { name: String, age: Int } User(name: 42, age: \"twenty-five\")";
    let errors = error_messages(source);
    assert_eq!(
        errors,
        vec![
            "Field 'name' expects String, got Int",
            "Field 'age' expects Int, got String",
        ]
    );
}

#[test]
fn record_access_resolves_the_field_type() {
    let source = "type User = { name: String } let u = User(name: \"John\") u.name";
    assert_eq!(last_type(source), Type::String);
}

#[test]
fn accessing_an_undeclared_field_is_an_error() {
    let source = "type User = { name: String } let u = User(name: \"John\") u.email";
    assert_eq!(
        first_error(source),
        "Record User does not have a email field"
    );
}

#[test]
fn accessing_a_non_record_is_an_error() {
    let source = "let x = 5 x.name";
    assert_eq!(
        first_error(source),
        "Int is not a record and cannot be accessed with '.'"
    );
}

#[test]
fn anonymous_records_type_structurally() {
    let ty = last_type("{ x: 42, y: \"hello\" }");
    let Type::Record { name, fields, .. } = &ty else {
        panic!("expected a record type");
    };
    assert!(name.is_none());
    assert_eq!(fields["x"], Type::Int);
    assert_eq!(fields["y"], Type::String);
    assert_eq!(ty.to_string(), "{x: Int, y: String}");
}

#[test]
fn generic_fields_bind_to_the_first_assignment() {
    let source = "type Box a = { content: a, label: String } Box(content: 42, label: \"n\")";
    let Type::Record { fields, params, .. } = last_type(source) else {
        panic!("expected a record type");
    };
    assert_eq!(fields["content"], Type::Int);
    assert!(params.is_empty());
}

#[test]
fn each_instantiation_gets_a_fresh_substitution() {
    let source = "type Box a = { content: a } Box(content: 42) Box(content: \"s\")";
    let Type::Record { fields, .. } = last_type(source) else {
        panic!("expected a record type");
    };
    assert_eq!(fields["content"], Type::String);
}

#[test]
fn nested_instantiations_get_their_own_bindings() {
    // the inner Box binds its own `a`, unrelated to Pair's `a` binding
    let source = "type Box a = { content: a } type Pair a = { x: a, label: String } \
                  Pair(x: 1, label: Box(content: \"s\").content)";
    let Type::Record { fields, .. } = last_type(source) else {
        panic!("expected a record type");
    };
    assert_eq!(fields["x"], Type::Int);
    assert_eq!(fields["label"], Type::String);
}

#[test]
fn conflicting_generic_bindings_are_rejected() {
    let source = "type Pair a = { x: a, y: a } Pair(x: 1, y: \"s\")";
    assert_eq!(
        first_error(source),
        "Generic 'a' was previously bound to Int, but is now expected to be String"
    );
}

#[test]
fn unions_check_their_variants() {
    let ty = last_type("type Color = Red | Green | Blue");
    let Type::Union { name, variants } = &ty else {
        panic!("expected a union type");
    };
    assert_eq!(name, "Color");
    assert_eq!(variants.len(), 3);
    for (variant, expected) in variants.iter().zip(["Red", "Green", "Blue"]) {
        let Type::VariantNullary { name, union_name } = variant else {
            panic!("expected a nullary variant");
        };
        assert_eq!(name, expected);
        assert_eq!(union_name, "Color");
    }
}

#[test]
fn variant_fields_resolve_declared_types() {
    let source = "type Point = { x: Int, y: Int } type Shape = Circle(center: Point, radius: Int)";
    let ty = last_type(source);
    let Type::Union { variants, .. } = &ty else {
        panic!("expected a union type");
    };
    let Type::VariantRecord { fields, .. } = &variants[0] else {
        panic!("expected a record variant");
    };
    assert!(matches!(&fields["center"], Type::Record { .. }));
    assert_eq!(fields["radius"], Type::Int);
}

#[test]
fn variant_field_types_must_exist() {
    assert_eq!(
        first_error("type Shape = Circle(center: Point)"),
        "Undefined type for field center Point"
    );
}

#[test]
fn variant_param_types_must_exist() {
    assert_eq!(
        first_error("type Wrap = Keep(Widget)"),
        "Undefined type for variant Keep 'Widget'"
    );
}

#[test]
fn later_statements_see_earlier_bindings() {
    let source = "let base = 42 { sum: 10 + base, doubled: base * 2 }";
    let Type::Record { fields, .. } = last_type(source) else {
        panic!("expected a record type");
    };
    assert_eq!(fields["sum"], Type::Int);
    assert_eq!(fields["doubled"], Type::Int);
}

#[test]
fn errors_accumulate_across_statements() {
    let errors = error_messages("-True !\"x\"");
    assert_eq!(errors.len(), 2);
}
