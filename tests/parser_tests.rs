use jade::ast::{Expression, LiteralValue, Statement, TypeAnnotation};
use jade::lexer::scan;
use jade::parser::{
    expression, module, statement, union_declaration, parse_program, ParseState, Parser,
};

fn state_of(source: &str) -> ParseState {
    ParseState::new(scan(source).unwrap())
}

fn parse_expression(source: &str) -> Expression<()> {
    expression().parse(&mut state_of(source)).unwrap()
}

fn expression_error(source: &str) -> String {
    expression()
        .parse(&mut state_of(source))
        .unwrap_err()
        .to_string()
}

/// Compact rendering of the parse tree, with explicit association.
fn render(expression: &Expression<()>) -> String {
    match expression {
        Expression::Literal(node) => match &node.value {
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Bool(value) => value.to_string(),
            LiteralValue::Str(value) => format!("{value:?}"),
        },
        Expression::Variable(node) => node.name.clone(),
        Expression::Unary(node) => format!("({}{})", node.operator, render(&node.right)),
        Expression::Binary(node) => format!(
            "({} {} {})",
            render(&node.left),
            node.operator,
            render(&node.right)
        ),
        Expression::Grouping(node) => format!("(group {})", render(&node.expression)),
        Expression::FunctionCall(node) => {
            let arguments: Vec<String> = node.arguments.iter().map(render).collect();
            format!("{}({})", node.name, arguments.join(", "))
        }
        Expression::RecordInstantiation(node) => {
            let fields: Vec<String> = node
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name, render(&f.expression)))
                .collect();
            format!("{}({})", node.name, fields.join(", "))
        }
        Expression::AnonymousRecord(node) => {
            let fields: Vec<String> = node
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name, render(&f.expression)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        Expression::RecordAccess(node) => {
            format!("({}.{})", render(&node.target), node.field)
        }
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(render(&parse_expression("1 + 2 * 3")), "(1 + (2 * 3))");
    assert_eq!(render(&parse_expression("1 * 2 + 3")), "((1 * 2) + 3)");
}

#[test]
fn grouping_overrides_precedence() {
    assert_eq!(
        render(&parse_expression("(1 + 2) * 3")),
        "((group (1 + 2)) * 3)"
    );
}

#[test]
fn addition_is_left_associative() {
    assert_eq!(render(&parse_expression("1 + 2 + 3")), "((1 + 2) + 3)");
}

#[test]
fn comparison_spans_additive_and_unary_operands() {
    assert_eq!(
        render(&parse_expression("2 - 3 <= - 3")),
        "((2 - 3) <= (-3))"
    );
}

#[test]
fn equality_is_looser_than_concatenation() {
    assert_eq!(
        render(&parse_expression(r#""a" ++ "b" == "ab""#)),
        r#"(("a" ++ "b") == "ab")"#
    );
}

#[test]
fn record_access_chains_left() {
    assert_eq!(
        render(&parse_expression("this.is.a.lot")),
        "(((this.is).a).lot)"
    );
}

#[test]
fn function_calls_take_argument_lists() {
    assert_eq!(render(&parse_expression("double()")), "double()");
    assert_eq!(render(&parse_expression("double(42)")), "double(42)");
    assert_eq!(render(&parse_expression("double(42, a)")), "double(42, a)");
}

#[test]
fn record_instantiation_and_anonymous_records() {
    assert_eq!(
        render(&parse_expression(r#"MyRecord(a: 42, b: "Alo")"#)),
        r#"MyRecord(a: 42, b: "Alo")"#
    );
    assert_eq!(
        render(&parse_expression(r#"{a: 42, b: "Alo"}"#)),
        r#"{a: 42, b: "Alo"}"#
    );
}

#[test]
fn missing_left_operand_is_promoted() {
    assert_eq!(expression_error("+ 1"), "Operator '+' lacks left-hand side");
}

#[test]
fn missing_right_operand_is_promoted() {
    assert_eq!(expression_error("1 +"), "Operator '+' lacks right-hand side");
}

#[test]
fn expression_failure_restores_the_entry_state() {
    let mut state = state_of("+ 1");
    let _ = expression().parse(&mut state).unwrap_err();
    assert_eq!(state.position(), 0);
}

#[test]
fn variable_declaration_statement() {
    let parsed = statement().parse(&mut state_of("let a = 5")).unwrap();
    let Statement::VariableDeclaration(decl) = parsed else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.name, "a");
    assert_eq!(render(&decl.expression), "5");
}

#[test]
fn malformed_let_names_the_offending_token() {
    let err = statement().parse(&mut state_of("let = 1")).unwrap_err();
    assert_eq!(err.to_string(), "Expected identifier, got assign (=)");
}

#[test]
fn function_declaration_with_params_and_body() {
    let source = "def double(n: Int) -> Int let multi = 2 n * multi end";
    let parsed = statement().parse(&mut state_of(source)).unwrap();
    let Statement::FunctionDeclaration(decl) = parsed else {
        panic!("expected a function declaration");
    };
    assert_eq!(decl.name, "double");
    assert_eq!(decl.parameters.len(), 1);
    assert_eq!(decl.parameters[0].name, "n");
    assert!(matches!(
        &decl.parameters[0].type_ref,
        TypeAnnotation::TypeRef { name, .. } if name == "Int"
    ));
    assert!(matches!(
        &decl.return_type,
        TypeAnnotation::TypeRef { name, .. } if name == "Int"
    ));
    assert_eq!(decl.body.len(), 2);
}

#[test]
fn record_declaration_with_fields() {
    let source = "type MyRecord = { a: Int, b: String }";
    let parsed = statement().parse(&mut state_of(source)).unwrap();
    let Statement::RecordDeclaration(decl) = parsed else {
        panic!("expected a record declaration");
    };
    assert_eq!(decl.name, "MyRecord");
    assert!(decl.params.is_empty());
    assert_eq!(decl.fields.len(), 2);
    assert_eq!(decl.fields[0].name, "a");
}

#[test]
fn record_declaration_with_generic_params() {
    let source = "type Result ok err = { value: ok, error: err }";
    let parsed = statement().parse(&mut state_of(source)).unwrap();
    let Statement::RecordDeclaration(decl) = parsed else {
        panic!("expected a record declaration");
    };
    assert_eq!(decl.params, vec!["ok".to_string(), "err".to_string()]);
    assert!(matches!(
        &decl.fields[0].type_ref,
        TypeAnnotation::GenericRef { name, .. } if name == "ok"
    ));
    assert!(matches!(
        &decl.fields[1].type_ref,
        TypeAnnotation::GenericRef { name, .. } if name == "err"
    ));
}

#[test]
fn union_declaration_with_nullary_and_field_variants() {
    let source = "type Color = Red | Green | Custom(r: Int, g: Int, b: Int)";
    let parsed = statement().parse(&mut state_of(source)).unwrap();
    let Statement::UnionDeclaration(decl) = parsed else {
        panic!("expected a union declaration");
    };
    assert_eq!(decl.name, "Color");
    assert_eq!(decl.variants.len(), 3);
    assert_eq!(decl.variants[0].name, "Red");
    assert!(decl.variants[0].fields.is_empty());
    assert!(decl.variants[0].params.is_empty());
    assert_eq!(decl.variants[2].fields.len(), 3);
}

#[test]
fn union_declaration_with_positional_variants() {
    let source = "type Outcome = Ok(String) | Fail(Int, String)";
    let parsed = statement().parse(&mut state_of(source)).unwrap();
    let Statement::UnionDeclaration(decl) = parsed else {
        panic!("expected a union declaration");
    };
    assert_eq!(decl.variants[0].params.len(), 1);
    assert_eq!(decl.variants[1].params.len(), 2);
    assert!(decl.variants[1].fields.is_empty());
}

#[test]
fn mixed_variant_payload_is_rejected_while_parsing() {
    let source = "type Mixed = Error(code: Int, String)";
    let mut state = state_of(source);
    let err = union_declaration().parse(&mut state).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Mixed variant: cannot combine fields and params"
    );
    assert_eq!(state.position(), 0);
}

#[test]
fn mixed_variant_fails_even_after_a_wellformed_variant() {
    let source = "type Mixed = Fine(String) | Error(code: Int, String)";
    let err = parse_program(scan(source).unwrap()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Mixed variant: cannot combine fields and params"
    );
}

#[test]
fn semantic_errors_outrank_later_syntactic_failures() {
    // every statement alternative fails here; the missing-operand error is
    // surfaced even though other alternatives died further into the input
    let err = parse_program(scan("+ 1").unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "Operator '+' lacks left-hand side");
}

#[test]
fn trailing_operator_fails_the_whole_program() {
    let err = parse_program(scan("1 +").unwrap()).unwrap_err();
    assert_eq!(err.to_string(), "Operator '+' lacks right-hand side");
}

#[test]
fn program_holds_declarations_and_expressions() {
    let program = parse_program(scan("let a = 5 a * 2").unwrap()).unwrap();
    assert_eq!(program.statements.len(), 2);
    assert!(matches!(
        program.statements[0],
        Statement::VariableDeclaration(_)
    ));
    let Statement::Expression(expr) = &program.statements[1] else {
        panic!("expected an expression statement");
    };
    assert_eq!(render(expr), "(a * 2)");
}

#[test]
fn leftover_tokens_fail_the_parse() {
    let err = parse_program(scan("let a = 5 )").unwrap()).unwrap_err();
    assert!(err.to_string().starts_with("Expected"));
}

#[test]
fn module_with_dotted_path_and_exposing_list() {
    let source = r#"module My.Module exposing (hello) def hello() -> String "Hello" end end"#;
    let parsed = module().parse(&mut state_of(source)).unwrap();
    assert_eq!(parsed.name, "My.Module");
    assert_eq!(parsed.exposing, vec!["hello".to_string()]);
    assert_eq!(parsed.statements.len(), 1);
    assert!(matches!(
        parsed.statements[0],
        Statement::FunctionDeclaration(_)
    ));
}

#[test]
fn binary_ranges_span_their_children() {
    let parsed = parse_expression("1 + 23");
    let range = parsed.range();
    assert_eq!((range.start.line, range.start.column), (1, 1));
    assert_eq!((range.end.line, range.end.column), (1, 7));
}
