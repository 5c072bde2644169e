//! Semantic errors reported through the public compile entry point.

use snl::ast::{Decl, Program};
use snl::{AstBuilder, Bump, CompileError, CompileOptions, SemanticError, SnlError, Span};

fn semantic_error(program: &Program<'_>) -> SemanticError {
    match snl::compile(program, &CompileOptions::default()) {
        Err(SnlError::Compile(CompileError::Semantic(err))) => err,
        Err(other) => panic!("expected a semantic error, got {other}"),
        Ok(_) => panic!("expected a semantic error, program compiled"),
    }
}

fn globals<'ast>(b: &AstBuilder<'ast>) -> Decl<'ast> {
    b.vars([
        b.var_decl(&["i", "j"], b.integer()),
        b.var_decl(&["c"], b.char()),
        b.var_decl(&["a"], b.array(1, 3, b.integer())),
    ])
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn duplicate_identifier_in_same_scope() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_line(2);
    let first = b.var_decl(&["x"], b.integer());
    b.set_line(3);
    let second = b.var_decl(&["x"], b.char());
    let program = b.program("p", [b.vars([first, second])], []);

    assert_eq!(
        semantic_error(&program),
        SemanticError::DuplicateIdentifier {
            name: "x".to_string(),
            span: Span::line(3)
        }
    );
}

#[test]
fn parameter_and_local_share_a_scope() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [b.procedure(
            "q",
            [b.value_param(&["x"], b.integer())],
            [b.vars([b.var_decl(&["x"], b.integer())])],
            [],
        )],
        [],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::DuplicateIdentifier { ref name, .. } if name == "x"
    ));
}

#[test]
fn shadowing_in_nested_scope_is_allowed() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [
            b.vars([b.var_decl(&["x"], b.integer())]),
            b.procedure("q", [b.value_param(&["x"], b.char())], [], []),
        ],
        [],
    );
    assert!(snl::compile(&program, &CompileOptions::default()).is_ok());
}

#[test]
fn undefined_identifier_reports_line() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_line(7);
    let stmt = b.write(b.var("nowhere"));
    let program = b.program("p", [], [stmt]);

    let err = semantic_error(&program);
    assert!(matches!(err, SemanticError::UndefinedIdentifier { .. }));
    assert_eq!(err.line(), 7);
}

#[test]
fn type_position_must_name_a_type() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [
            b.vars([b.var_decl(&["i"], b.integer())]),
            b.vars([b.var_decl(&["k"], b.named("i"))]),
        ],
        [],
    );
    assert!(matches!(semantic_error(&program), SemanticError::NotAType { .. }));
}

#[test]
fn inverted_array_bounds() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [b.vars([b.var_decl(&["a"], b.array(5, 2, b.integer()))])],
        [],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::InvalidArrayBounds { low: 5, high: 2, .. }
    ));
}

#[test]
fn array_larger_than_the_address_space() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_line(2);
    let program = b.program(
        "p",
        [b.vars([b.var_decl(&["big"], b.array(0, i64::MAX, b.integer()))])],
        [],
    );
    assert_eq!(
        semantic_error(&program),
        SemanticError::StorageOverflow { span: Span::line(2) }
    );

    let half = i64::MAX / 2 + 1;
    let program = b.program(
        "p",
        [b.vars([b.var_decl(&["x", "y"], b.array(1, half, b.integer()))])],
        [],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::StorageOverflow { .. }
    ));
}

#[test]
fn later_sibling_procedure_is_not_visible() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [
            b.procedure("first", [], [], [b.call("second", [])]),
            b.procedure("second", [], [], []),
        ],
        [],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::UndefinedIdentifier { ref name, .. } if name == "second"
    ));
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn variable_position_must_name_a_variable() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [b.procedure("q", [], [], [])],
        [b.write(b.var("q"))],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::NotAVariable { ref name, .. } if name == "q"
    ));
}

#[test]
fn indexing_a_scalar() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.write(b.index("i", b.int(1)))]);
    assert!(matches!(semantic_error(&program), SemanticError::NotAnArray { .. }));
}

#[test]
fn field_of_a_non_record() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.write(b.field("a", "l"))]);
    assert!(matches!(semantic_error(&program), SemanticError::NotARecord { .. }));
}

#[test]
fn missing_record_field() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [
            b.types([b.type_decl(
                "pair",
                b.record([b.field_decl(&["l", "r"], b.integer())]),
            )]),
            b.vars([b.var_decl(&["q"], b.named("pair"))]),
        ],
        [b.write(b.field("q", "m"))],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::InvalidFieldName { ref record, ref field, .. }
            if record == "q" && field == "m"
    ));
}

#[test]
fn mixed_operand_types() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.write(b.add(b.var("i"), b.var("c")))]);
    assert!(matches!(semantic_error(&program), SemanticError::IncompatibleTypes { .. }));
}

#[test]
fn non_integer_index() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.write(b.index("a", b.var("c")))]);
    assert!(matches!(semantic_error(&program), SemanticError::IncompatibleTypes { .. }));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn assignment_type_mismatch() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_line(4);
    let stmt = b.assign(b.var_ref("c"), b.var("i"));
    let program = b.program("p", [globals(&b)], [stmt]);

    assert_eq!(
        semantic_error(&program),
        SemanticError::IncompatibleTypes { span: Span::line(4) }
    );
}

#[test]
fn structurally_equal_arrays_are_distinct_types() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [b.vars([
            b.var_decl(&["x"], b.array(1, 3, b.integer())),
            b.var_decl(&["y"], b.array(1, 3, b.integer())),
        ])],
        [b.assign(b.var_ref("x"), b.var("y"))],
    );
    assert!(matches!(semantic_error(&program), SemanticError::IncompatibleTypes { .. }));
}

#[test]
fn one_declaration_group_shares_its_type() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [b.vars([b.var_decl(&["x", "y"], b.array(1, 3, b.integer()))])],
        [b.assign(b.var_ref("x"), b.var("y"))],
    );
    assert!(snl::compile(&program, &CompileOptions::default()).is_ok());
}

#[test]
fn integer_conditions_are_rejected() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.if_then(b.var("i"), [])]);
    assert!(matches!(
        semantic_error(&program),
        SemanticError::ConditionNotBoolean { statement: "if", .. }
    ));

    let program = b.program("p", [globals(&b)], [b.while_do(b.var("i"), [])]);
    assert!(matches!(
        semantic_error(&program),
        SemanticError::ConditionNotBoolean { statement: "while", .. }
    ));
}

#[test]
fn writing_a_boolean() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [], [b.write(b.eq(b.int(1), b.int(1)))]);
    assert!(matches!(semantic_error(&program), SemanticError::CannotWriteBoolean { .. }));
}

#[test]
fn return_from_main() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [], [b.ret()]);
    assert!(matches!(semantic_error(&program), SemanticError::ReturnFromMain { .. }));
}

// ============================================================================
// Calls
// ============================================================================

fn callee<'ast>(b: &AstBuilder<'ast>) -> Decl<'ast> {
    b.procedure(
        "swap",
        [b.ref_param(&["x", "y"], b.integer())],
        [],
        [],
    )
}

#[test]
fn calling_a_variable() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program("p", [globals(&b)], [b.call("i", [])]);
    assert!(matches!(
        semantic_error(&program),
        SemanticError::NotAProcedure { ref name, .. } if name == "i"
    ));
}

#[test]
fn argument_count_mismatch() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let decls = [globals(&b), callee(&b)];

    let program = b.program("p", decls, [b.call("swap", [b.var("i")])]);
    assert_eq!(
        semantic_error(&program),
        SemanticError::TooFewArguments {
            procedure: "swap".to_string(),
            expected: 2,
            found: 1,
            span: Span::line(1),
        }
    );

    let program = b.program(
        "p",
        decls,
        [b.call("swap", [b.var("i"), b.var("j"), b.var("i")])],
    );
    assert!(matches!(
        semantic_error(&program),
        SemanticError::TooManyArguments { expected: 2, found: 3, .. }
    ));
}

#[test]
fn reference_argument_must_be_a_variable() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [globals(&b), callee(&b)],
        [b.call("swap", [b.var("i"), b.add(b.var("j"), b.int(1))])],
    );
    assert!(matches!(semantic_error(&program), SemanticError::NotAVariable { .. }));
}

#[test]
fn argument_type_mismatch() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [globals(&b), callee(&b)],
        [b.call("swap", [b.var("i"), b.var("c")])],
    );
    assert_eq!(
        semantic_error(&program),
        SemanticError::IncompatibleParameterType {
            procedure: "swap".to_string(),
            parameter: "y".to_string(),
            span: Span::line(1),
        }
    );
}

#[test]
fn first_argument_type_wins_over_missing_arguments() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    let program = b.program(
        "p",
        [
            globals(&b),
            b.procedure("q", [b.value_param(&["x", "y"], b.integer())], [], []),
        ],
        [b.call("q", [b.var("c")])],
    );
    assert_eq!(
        semantic_error(&program),
        SemanticError::IncompatibleParameterType {
            procedure: "q".to_string(),
            parameter: "x".to_string(),
            span: Span::line(1),
        }
    );
}

// ============================================================================
// Messages
// ============================================================================

#[test]
fn message_names_line_and_identifier() {
    let arena = Bump::new();
    let b = AstBuilder::new(&arena);
    b.set_line(12);
    let stmt = b.write(b.var("ghost"));
    let program = b.program("p", [], [stmt]);

    let err = snl::compile(&program, &CompileOptions::default()).unwrap_err();
    assert!(err.is_compile());
    let message = err.to_string();
    assert!(message.contains("12"), "{message}");
    assert!(message.contains("ghost"), "{message}");
}
