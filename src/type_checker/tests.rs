use pretty_assertions::assert_eq;

use crate::{
    ast::ast::{ExprKind, ParsedFile},
    context::context::{check_types, parse_file},
    errors::errors::{ErrorImpl, ErrorKind},
};

use super::{
    symbol_table::FileScope, symbols::Symbol, type_checker::TypeChecker, type_info::TypeInfo,
};

fn check_error(source: &str) -> ErrorImpl {
    check_types(source).unwrap_err().get_impl().clone()
}

fn with_file_scope(source: &str, test: impl FnOnce(&ParsedFile, FileScope<'_>)) {
    let parsed = parse_file(source).unwrap();
    let file_scope = TypeChecker::new().check_file(&parsed).unwrap();
    test(&parsed, file_scope);
}

#[test]
fn test_well_typed_program() {
    let source = "
        func fib(n: i32) -> i32 {
            if (n < 2) { return n; } else { return fib(n - 1) + fib(n - 2); };
        }
        func main() {
            let i: i32 = 0;
            while (i < 5 && !false) {
                i = i + 1;
            }
        }";

    assert!(check_types(source).is_ok());
}

#[test]
fn test_let_initializer_must_match() {
    assert_eq!(
        check_error("func main() { let a: i32 = true; }"),
        ErrorImpl::TypeMatchError {
            expected: TypeInfo::I32,
            received: TypeInfo::Bool,
        }
    );
}

#[test]
fn test_unknown_type() {
    assert_eq!(
        check_error("func main() { let a: string = 1; }"),
        ErrorImpl::UnknownType {
            name: String::from("string"),
        }
    );
}

#[test]
fn test_block_scopes_end_with_the_block() {
    let error = check_types("func main() { { let a: i32 = 1; } a = 2; }").unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::UnknownSymbol {
            name: String::from("a"),
        }
    );
    assert_eq!(error.kind(), ErrorKind::Semantic);
    assert_eq!(error.get_span().unwrap().text, "a = 2");
}

#[test]
fn test_let_cannot_see_itself() {
    assert_eq!(
        check_error("func main() { let a: i32 = a; }"),
        ErrorImpl::UnknownSymbol {
            name: String::from("a"),
        }
    );
}

#[test]
fn test_functions_are_visible_before_declaration() {
    let source = "
        func main() { helper(); }
        func helper() {}";

    assert!(check_types(source).is_ok());
}

#[test]
fn test_duplicate_function() {
    assert_eq!(
        check_error("func a() {} func a() {}"),
        ErrorImpl::FunctionAlreadyDeclared {
            function: String::from("a"),
        }
    );
}

#[test]
fn test_return_type_is_checked() {
    assert_eq!(
        check_error("func foo() -> i32 { return true; }"),
        ErrorImpl::TypeMatchError {
            expected: TypeInfo::I32,
            received: TypeInfo::Bool,
        }
    );
    assert!(check_types("func foo() -> i32 { return 1; }").is_ok());
}

#[test]
fn test_return_expression_is_void() {
    assert!(check_types("func foo() -> void { return return; }").is_ok());
    assert!(check_types("func foo() { return; }").is_ok());
}

#[test]
fn test_return_outside_function() {
    assert_eq!(
        check_error("let a: void = return;"),
        ErrorImpl::ReturnOutsideFunction
    );
}

#[test]
fn test_call_arity() {
    let source = "func add(a: i32, b: i32) -> i32 { return a + b; }";

    assert_eq!(
        check_error(&format!("{} func main() {{ add(1, 2, 3); }}", source)),
        ErrorImpl::UnexpectedArguments {
            function: String::from("add"),
            expected: 2,
            received: 3,
        }
    );
    assert_eq!(
        check_error(&format!("{} func main() {{ add(1); }}", source)),
        ErrorImpl::MissingArguments {
            function: String::from("add"),
            expected: 2,
            received: 1,
        }
    );
}

#[test]
fn test_argument_types() {
    let error = check_types("func f(a: i32, b: bool) {} func main() { f(1, 2); }").unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: TypeInfo::Bool,
            received: TypeInfo::I32,
        }
    );
    assert_eq!(error.get_span().unwrap().text, "2");
}

#[test]
fn test_call_type_is_return_type() {
    assert!(check_types("func one() -> i32 { return 1; } func main() { let a: i32 = one(); }").is_ok());
    assert!(check_types("func one() -> i32 { return 1; } func main() { let a: bool = one(); }").is_err());
}

#[test]
fn test_arithmetic_requires_i32() {
    assert_eq!(
        check_error("func f(x: f32) -> f32 { return -x; }"),
        ErrorImpl::ExpectedNumber {
            received: TypeInfo::F32,
        }
    );
    assert_eq!(
        check_error("func f(x: f32, y: f32) -> f32 { return x * y; }"),
        ErrorImpl::ExpectedNumber {
            received: TypeInfo::F32,
        }
    );
    assert!(check_types("func f(x: f32) -> f32 { return x; }").is_ok());
}

#[test]
fn test_operand_types() {
    assert_eq!(
        check_error("func main() { let a: bool = true + false; }"),
        ErrorImpl::ExpectedNumber {
            received: TypeInfo::Bool,
        }
    );
    assert_eq!(
        check_error("func main() { let a: bool = 1 && true; }"),
        ErrorImpl::ExpectedBool {
            received: TypeInfo::I32,
        }
    );
    assert_eq!(
        check_error("func main() { let a: bool = 1 == true; }"),
        ErrorImpl::TypeMatchError {
            expected: TypeInfo::I32,
            received: TypeInfo::Bool,
        }
    );
    assert_eq!(
        check_error("func main() { let a: bool = -true; }"),
        ErrorImpl::ExpectedNumber {
            received: TypeInfo::Bool,
        }
    );
    assert_eq!(
        check_error("func main() { let a: i32 = !1; }"),
        ErrorImpl::ExpectedBool {
            received: TypeInfo::I32,
        }
    );
}

#[test]
fn test_conditions_must_be_bool() {
    assert_eq!(
        check_error("func main() { while (1) {} }"),
        ErrorImpl::ExpectedBool {
            received: TypeInfo::I32,
        }
    );
    assert_eq!(
        check_error("func main() { if (true) {} else if (2) {} }"),
        ErrorImpl::ExpectedBool {
            received: TypeInfo::I32,
        }
    );
}

#[test]
fn test_if_arms_must_agree_with_else() {
    assert!(check_types("func main() { let a: i32 = if (true) { 1; } else { 2; }; }").is_ok());
    assert_eq!(
        check_error("func main() { if (true) { 1; } else { false; }; }"),
        ErrorImpl::TypeMatchError {
            expected: TypeInfo::I32,
            received: TypeInfo::Bool,
        }
    );
    // Without an else the arms may differ, the if is void
    assert!(check_types("func main() { if (true) { 1; } else if (false) { true; }; }").is_ok());
}

#[test]
fn test_number_literal_out_of_range() {
    assert_eq!(
        check_error("func main() { let a: i32 = 99999999999; }"),
        ErrorImpl::NumberParseError {
            token: String::from("99999999999"),
        }
    );
}

#[test]
fn test_functions_are_not_values() {
    assert_eq!(
        check_error("func f() {} func main() { let a: i32 = f; }"),
        ErrorImpl::NotAValue {
            name: String::from("f"),
        }
    );
    assert_eq!(
        check_error("func main() { let a: i32 = 1; a(); }"),
        ErrorImpl::NotAFunction {
            name: String::from("a"),
        }
    );
}

#[test]
fn test_nested_function_cannot_capture() {
    let source = "
        func outer() {
            let a: i32 = 1;
            func inner() -> i32 { return a; }
        }";

    assert_eq!(
        check_error(source),
        ErrorImpl::CapturedVariable {
            variable: String::from("a"),
        }
    );
}

#[test]
fn test_nested_function_can_call_siblings() {
    let source = "
        func outer() -> i32 {
            func inner() -> i32 { return twice(2); }
            func twice(a: i32) -> i32 { return a * 2; }
            return inner();
        }";

    assert!(check_types(source).is_ok());
}

#[test]
fn test_slots_are_dense_per_function() {
    let source = "
        func main(x: i32) {
            let a: i32 = 1;
            if (true) { let b: i32 = 2; };
            { let c: i32 = 3; }
        }";

    with_file_scope(source, |_, file_scope| {
        let main = file_scope.values["main"];
        let definition = file_scope.lookup_definition(main).unwrap();
        assert_eq!(definition.num_locals, 4);
        assert_eq!(definition.params.len(), 1);

        let function_scope = file_scope.symbols.lookup_function_scope(main).unwrap();
        assert!(function_scope.is_finalized());

        let slots = function_scope
            .params
            .iter()
            .chain(function_scope.locals.iter())
            .map(|symbol| {
                let symbol = file_scope.symbols.get_symbol(*symbol);
                (symbol.name().to_string(), symbol.slot().unwrap())
            })
            .collect::<Vec<_>>();

        assert_eq!(
            slots,
            vec![
                (String::from("x"), 0),
                (String::from("a"), 1),
                (String::from("b"), 2),
                (String::from("c"), 3),
            ]
        );
    });
}

#[test]
fn test_top_level_let_is_global() {
    with_file_scope("let answer: i32 = 42; func main() {}", |_, file_scope| {
        let answer = file_scope.values["answer"];

        assert_eq!(
            file_scope.symbols.get_symbol(answer),
            &Symbol::Global {
                name: String::from("answer"),
                ty: TypeInfo::I32,
            }
        );
    });
}

#[test]
fn test_every_expression_gets_a_type() {
    let source = "func main() { let a: bool = 1 + 2 < 4; }";

    with_file_scope(source, |parsed, file_scope| {
        let ExprKind::Function(function) = &parsed.items[0].kind else {
            panic!("expected a function");
        };
        let ExprKind::Let(let_decl) = &function.body.items[0].kind else {
            panic!("expected a let");
        };

        assert_eq!(
            file_scope.symbols.lookup_expr_type(let_decl.value.id).unwrap(),
            TypeInfo::Bool
        );
        assert_eq!(
            file_scope.symbols.lookup_expr_type(function.body.items[0].id).unwrap(),
            TypeInfo::Void
        );
        assert_eq!(
            file_scope.symbols.lookup_type_ref(let_decl.ty.id).unwrap(),
            TypeInfo::Bool
        );
    });
}

#[test]
fn test_call_sites_are_bound() {
    let source = "func f() {} func main() { f(); }";

    with_file_scope(source, |parsed, file_scope| {
        let ExprKind::Function(main) = &parsed.items[1].kind else {
            panic!("expected a function");
        };

        let callee = file_scope.symbols.lookup_call_site(main.body.items[0].id).unwrap();
        assert_eq!(callee, file_scope.values["f"]);
    });
}
