use jade::compiler::compile;

fn generated(source: &str) -> String {
    compile(source).unwrap_or_else(|err| panic!("expected {source:?} to compile, got: {err}"))
}

#[test]
fn literals_render_as_ruby_literals() {
    assert_eq!(generated("42"), "42");
    assert_eq!(generated("True"), "true");
    assert_eq!(generated("\"hi\""), "\"hi\"");
}

#[test]
fn variable_declarations_become_assignments() {
    assert_eq!(generated("let a = 5"), "a = 5");
}

#[test]
fn binary_operators_render_infix() {
    assert_eq!(generated("1 + 2 * 3"), "1 + 2 * 3");
    assert_eq!(generated("(1 + 2) * 3"), "(1 + 2) * 3");
    assert_eq!(generated("1 < 2"), "1 < 2");
}

#[test]
fn concatenation_uses_the_concat_helper() {
    assert_eq!(generated("\"a\" ++ \"b\""), "\"a\".__concat__(\"b\")");
}

#[test]
fn unary_operators_render_prefixed() {
    assert_eq!(generated("-4"), "-4");
    assert_eq!(generated("!True"), "!true");
}

#[test]
fn functions_render_as_ruby_defs() {
    assert_eq!(
        generated("def double(n: Int) -> Int n * 2 end"),
        "def double(n)\n  n * 2\nend"
    );
}

#[test]
fn function_calls_render_with_arguments() {
    let source = "def double(n: Int) -> Int n * 2 end double(42)";
    assert_eq!(generated(source), "def double(n)\n  n * 2\nend\ndouble(42)");
}

#[test]
fn record_declarations_become_data_defines() {
    assert_eq!(
        generated("type User = { name: String, age: Int }"),
        "User = Data.define(:name, :age)"
    );
}

#[test]
fn record_instantiations_call_new() {
    let source = "type User = { name: String, age: Int } User(name: \"John\", age: 25)";
    assert_eq!(
        generated(source),
        "User = Data.define(:name, :age)\nUser.new(:name => \"John\", :age => 25)"
    );
}

#[test]
fn record_access_uses_send() {
    let source = "type User = { name: String } let u = User(name: \"John\") u.name";
    assert!(generated(source).ends_with("u.send(:name)"));
}

#[test]
fn anonymous_records_render_as_hashes() {
    assert_eq!(generated("{ x: 1, y: \"z\" }"), "{ x: 1, y: \"z\" }");
}

#[test]
fn union_variants_render_one_define_per_variant() {
    assert_eq!(
        generated("type Color = Red | Custom(r: Int, g: Int)"),
        "Color_Red = Data.define\nColor_Custom = Data.define(:r, :g)"
    );
    assert_eq!(
        generated("type Wrap = Keep(Int)"),
        "Wrap_Keep = Data.define(:tuple)"
    );
}

#[test]
fn modules_render_as_nested_ruby_modules() {
    let source = r#"module My.Module exposing (hello) def hello() -> String "Hello" end end"#;
    let expected = "module My\n  module Module\n    extend self\n    def hello()\n      \"Hello\"\n    end\n  end\nend\n";
    assert_eq!(generated(source), expected);
}
