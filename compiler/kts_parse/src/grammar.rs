//! The Kotlin annotation grammar.
//!
//! A PEG rendition of the Kotlin grammar, restricted to what can appear in
//! an annotation: user types, value arguments and the expressions inside
//! them, down to lambda bodies. Declarations and control flow are stubs
//! that always fail, so an annotation containing one is rejected.
//!
//! Line breaks matter in two places. Binary operators Kotlin refuses at the
//! start of a line (`+`, `==`, `as`, ...) and call-like suffixes must stay
//! on the line of their left operand; inside a lambda a line break
//! separates statements. `&&`, `||`, `?:` and member access may start a
//! line. Inside parentheses and brackets line breaks are plain whitespace;
//! a lambda body makes them significant again.

use kts_ir::{Span, TokenKind as K, TokenList};
use kts_peg::{
    choice, followed_by, ignore_newlines, line_break, not_ahead, not_implemented, one_or_more,
    optional, respect_newlines, sequence, soft_keyword, symbol, token, traced, wrapped,
    zero_or_more, Definitions, Recursive, Rule,
};

pub(crate) type KtRule = Rule<TokenList, Span>;
type Forward = Recursive<TokenList, Span>;

/// Use-site targets accepted in `@target:Annotation`.
const USE_SITE_TARGETS: &[&str] = &[
    "field", "property", "get", "set", "receiver", "param", "setparam", "delegate",
];

/// The two entry rules and the owner of every recursive definition.
pub(crate) struct Rules {
    pub(crate) annotation: KtRule,
    pub(crate) file_annotation: KtRule,
    pub(crate) definitions: Definitions,
}

/// Names rules for tracing.
#[derive(Copy, Clone)]
struct Tracer {
    enabled: bool,
}

impl Tracer {
    fn rule(self, name: &'static str, rule: KtRule) -> KtRule {
        traced(name, rule, self.enabled)
    }

    fn stub(self, name: &'static str) -> KtRule {
        self.rule(name, not_implemented(name))
    }
}

fn forward(definitions: &mut Definitions, name: &'static str) -> (Forward, KtRule) {
    let handle: Forward = definitions.declare(name);
    let rule = handle.rule();
    (handle, rule)
}

fn t(kind: K) -> KtRule {
    token(kind)
}

fn one_of(kinds: &[K]) -> KtRule {
    let tokens: Vec<KtRule> = kinds.iter().map(|&kind| token(kind)).collect();
    let alternatives: Vec<&KtRule> = tokens.iter().collect();
    choice(&alternatives)
}

fn any_keyword(words: &[&str]) -> KtRule {
    let keywords: Vec<KtRule> = words.iter().map(|word| soft_keyword(word)).collect();
    let alternatives: Vec<&KtRule> = keywords.iter().collect();
    choice(&alternatives)
}

/// `part`, provided no line break precedes it.
fn same_line(part: &KtRule) -> KtRule {
    sequence(&[&not_ahead(&line_break()), part])
}

/// `item (',' item)* ','?`
fn comma_separated(item: &KtRule) -> KtRule {
    sequence(&[
        item,
        &zero_or_more(&sequence(&[&t(K::Comma), item])),
        &optional(&t(K::Comma)),
    ])
}

/// `operand (operator operand)*`
fn left_assoc(operand: &KtRule, operator: &KtRule) -> KtRule {
    sequence(&[operand, &zero_or_more(&sequence(&[operator, operand]))])
}

fn parens(content: &KtRule) -> KtRule {
    wrapped(&t(K::LParen), &ignore_newlines(content), &t(K::RParen))
}

fn brackets(content: &KtRule) -> KtRule {
    wrapped(&t(K::LBracket), &ignore_newlines(content), &t(K::RBracket))
}

fn braces(content: &KtRule) -> KtRule {
    wrapped(&t(K::LBrace), &respect_newlines(content), &t(K::RBrace))
}

/// Build the grammar. With `trace_rules`, named rules are wrapped in
/// [`traced`].
pub(crate) fn build(trace_rules: bool) -> Rules {
    let tracer = Tracer {
        enabled: trace_rules,
    };
    let mut definitions = Definitions::new();

    let (type_def, ty) = forward(&mut definitions, "type");
    let (annotation_def, annotation) = forward(&mut definitions, "annotation");
    let (parenthesized_user_type_def, parenthesized_user_type) =
        forward(&mut definitions, "parenthesizedUserType");
    let (expression_def, expression) = forward(&mut definitions, "expression");
    let (primary_expression_def, primary_expression) =
        forward(&mut definitions, "primaryExpression");
    let (directly_assignable_def, directly_assignable_expression) =
        forward(&mut definitions, "directlyAssignableExpression");
    let (assignable_def, assignable_expression) =
        forward(&mut definitions, "assignableExpression");

    // Deliberately unrecognized.
    let class_declaration = tracer.stub("classDeclaration");
    let object_declaration = tracer.stub("objectDeclaration");
    let function_declaration = tracer.stub("functionDeclaration");
    let property_declaration = tracer.stub("propertyDeclaration");
    let type_alias = tracer.stub("typeAlias");
    let loop_statement = tracer.stub("loopStatement");
    let try_expression = tracer.stub("tryExpression");
    let jump_expression = tracer.stub("jumpExpression");
    let object_literal = tracer.stub("objectLiteral");
    let super_expression = tracer.stub("superExpression");
    let anonymous_function = tracer.stub("anonymousFunction");
    let if_expression = tracer.stub("ifExpression");
    let when_expression = tracer.stub("whenExpression");

    // Tokens, literals and operator sets.
    let simple_identifier: KtRule = symbol();
    let literal_constant = one_of(&[
        K::True,
        K::False,
        K::IntegerLiteral,
        K::FloatLiteral,
        K::CharacterLiteral,
        K::Null,
    ]);
    let string_literal = one_of(&[K::StringLiteral, K::RawStringLiteral]);
    let this_expression = sequence(&[
        &t(K::This),
        &optional(&sequence(&[&t(K::At), &simple_identifier])),
    ]);
    let label = sequence(&[&simple_identifier, &t(K::At)]);

    let additive_operator = one_of(&[K::Plus, K::Minus]);
    let multiplicative_operator = one_of(&[K::Mul, K::Div, K::Perc]);
    let comparison_operator = one_of(&[K::Lt, K::Gt, K::LtEq, K::GtEq]);
    let equality_operator = one_of(&[K::ExclEq, K::ExclEqEq, K::EqEq, K::EqEqEq]);
    let range_operator = one_of(&[K::Range, K::RangeUntil]);
    let in_operator = one_of(&[K::In, K::NotIn]);
    let is_operator = one_of(&[K::Is, K::NotIs]);
    let as_operator = one_of(&[K::As, K::AsSafe]);
    let prefix_unary_operator =
        one_of(&[K::PlusPlus, K::MinusMinus, K::Minus, K::Plus, K::Excl]);
    let postfix_unary_operator = one_of(&[K::PlusPlus, K::MinusMinus, K::ExclExcl]);
    let member_access_operator = one_of(&[K::Dot, K::SafeAccess, K::ColonColon]);
    let assignment_and_operator =
        one_of(&[K::PlusEq, K::MinusEq, K::MulEq, K::DivEq, K::PercEq]);
    let variance_modifier = choice(&[&t(K::In), &soft_keyword("out")]);
    let use_site_target = any_keyword(USE_SITE_TARGETS);
    let semis = choice(&[&one_or_more(&t(K::Semicolon)), &line_break()]);

    // Types.
    let type_modifier = choice(&[&annotation, &soft_keyword("suspend")]);
    let type_modifiers = one_or_more(&type_modifier);
    let type_projection = choice(&[
        &sequence(&[
            &optional(&one_or_more(&choice(&[&variance_modifier, &annotation]))),
            &ty,
        ]),
        &t(K::Mul),
    ]);
    let type_arguments = tracer.rule(
        "typeArguments",
        sequence(&[&t(K::Lt), &comma_separated(&type_projection), &t(K::Gt)]),
    );
    let simple_user_type = tracer.rule(
        "simpleUserType",
        sequence(&[&simple_identifier, &optional(&type_arguments)]),
    );
    let user_type = tracer.rule(
        "userType",
        sequence(&[
            &simple_user_type,
            &zero_or_more(&sequence(&[&t(K::Dot), &simple_user_type])),
        ]),
    );
    let type_reference = choice(&[&user_type, &soft_keyword("dynamic")]);
    let parenthesized_type = parens(&ty);
    let nullable_type = sequence(&[
        &choice(&[&type_reference, &parenthesized_type]),
        &one_or_more(&t(K::Question)),
    ]);
    let receiver_type = tracer.rule(
        "receiverType",
        sequence(&[
            &optional(&type_modifiers),
            &choice(&[&nullable_type, &parenthesized_type, &type_reference]),
        ]),
    );
    let parameter = sequence(&[&simple_identifier, &t(K::Colon), &ty]);
    let function_type_parameter = choice(&[&parameter, &ty]);
    let function_type_parameters = parens(&optional(&comma_separated(&function_type_parameter)));
    let function_type = tracer.rule(
        "functionType",
        sequence(&[
            &optional(&sequence(&[&receiver_type, &t(K::Dot)])),
            &function_type_parameters,
            &t(K::Arrow),
            &ty,
        ]),
    );
    let non_nullable_operand = choice(&[&user_type, &parenthesized_user_type]);
    let definitely_non_nullable_type = sequence(&[
        &optional(&type_modifiers),
        &non_nullable_operand,
        &t(K::Amp),
        &optional(&type_modifiers),
        &non_nullable_operand,
    ]);
    definitions.define(
        type_def,
        tracer.rule(
            "type",
            sequence(&[
                &optional(&type_modifiers),
                &choice(&[
                    &function_type,
                    &definitely_non_nullable_type,
                    &nullable_type,
                    &parenthesized_type,
                    &type_reference,
                ]),
            ]),
        ),
    );
    definitions.define(
        parenthesized_user_type_def,
        parens(&choice(&[&user_type, &parenthesized_user_type])),
    );

    // Annotations.
    let value_argument = tracer.rule(
        "valueArgument",
        sequence(&[
            &optional(&annotation),
            &optional(&sequence(&[&simple_identifier, &t(K::Eq)])),
            &optional(&t(K::Mul)),
            &expression,
        ]),
    );
    let value_arguments = tracer.rule(
        "valueArguments",
        parens(&optional(&comma_separated(&value_argument))),
    );
    let constructor_invocation = tracer.rule(
        "constructorInvocation",
        sequence(&[&user_type, &same_line(&value_arguments)]),
    );
    // A `(` on the annotation's line always belongs to it: when the
    // arguments do not parse, neither does the annotation.
    let unescaped_annotation = tracer.rule(
        "unescapedAnnotation",
        choice(&[
            &constructor_invocation,
            &sequence(&[&user_type, &not_ahead(&same_line(&t(K::LParen)))]),
        ]),
    );
    let list_of_unescaped_annotations = brackets(&one_or_more(&unescaped_annotation));
    let target_prefix = sequence(&[&use_site_target, &t(K::Colon)]);
    // A use-site target needs its colon: `@get something` is the annotation
    // `get`, not a target missing its annotation.
    let single_annotation = tracer.rule(
        "singleAnnotation",
        sequence(&[
            &t(K::At),
            &choice(&[
                &sequence(&[&target_prefix, &unescaped_annotation]),
                &sequence(&[&not_ahead(&target_prefix), &unescaped_annotation]),
            ]),
        ]),
    );
    let multi_annotation = tracer.rule(
        "multiAnnotation",
        sequence(&[
            &t(K::At),
            &optional(&target_prefix),
            &list_of_unescaped_annotations,
        ]),
    );
    definitions.define(
        annotation_def,
        tracer.rule(
            "annotation",
            choice(&[&single_annotation, &multi_annotation]),
        ),
    );

    // Lambdas and statements.
    let variable_declaration = sequence(&[
        &zero_or_more(&annotation),
        &simple_identifier,
        &optional(&sequence(&[&t(K::Colon), &ty])),
    ]);
    let multi_variable_declaration = parens(&comma_separated(&variable_declaration));
    let lambda_parameter = choice(&[
        &variable_declaration,
        &sequence(&[
            &multi_variable_declaration,
            &optional(&sequence(&[&t(K::Colon), &ty])),
        ]),
    ]);
    let lambda_parameters = comma_separated(&lambda_parameter);
    let declaration = choice(&[
        &class_declaration,
        &object_declaration,
        &function_declaration,
        &property_declaration,
        &type_alias,
    ]);
    let assignment = tracer.rule(
        "assignment",
        sequence(&[
            &choice(&[
                &sequence(&[&directly_assignable_expression, &t(K::Eq)]),
                &sequence(&[&assignable_expression, &assignment_and_operator]),
            ]),
            &expression,
        ]),
    );
    let statement = tracer.rule(
        "statement",
        sequence(&[
            &zero_or_more(&choice(&[&label, &annotation])),
            &choice(&[&declaration, &assignment, &loop_statement, &expression]),
        ]),
    );
    let statements = sequence(&[
        &optional(&sequence(&[
            &statement,
            &zero_or_more(&sequence(&[&semis, &statement])),
        ])),
        &optional(&semis),
    ]);
    let lambda_literal = tracer.rule(
        "lambdaLiteral",
        braces(&sequence(&[
            &optional(&sequence(&[&optional(&lambda_parameters), &t(K::Arrow)])),
            &statements,
        ])),
    );
    let annotated_lambda = sequence(&[
        &zero_or_more(&annotation),
        &optional(&label),
        &lambda_literal,
    ]);

    // Postfix suffixes.
    let call_suffix = tracer.rule(
        "callSuffix",
        sequence(&[
            &optional(&type_arguments),
            &choice(&[
                &sequence(&[&optional(&value_arguments), &annotated_lambda]),
                &value_arguments,
            ]),
        ]),
    );
    let indexing_suffix = brackets(&comma_separated(&expression));
    let parenthesized_expression = parens(&expression);
    let navigation_suffix = tracer.rule(
        "navigationSuffix",
        sequence(&[
            &member_access_operator,
            &choice(&[&simple_identifier, &parenthesized_expression, &t(K::Class)]),
        ]),
    );
    let postfix_unary_suffix = choice(&[
        &same_line(&postfix_unary_operator),
        &type_arguments,
        &same_line(&call_suffix),
        &same_line(&indexing_suffix),
        &navigation_suffix,
    ]);
    let assignable_suffix = choice(&[&type_arguments, &indexing_suffix, &navigation_suffix]);

    // Expressions, loosest binding last.
    let postfix_unary_expression = tracer.rule(
        "postfixUnaryExpression",
        sequence(&[&primary_expression, &zero_or_more(&postfix_unary_suffix)]),
    );
    let unary_prefix = choice(&[&annotation, &label, &prefix_unary_operator]);
    let prefix_unary_expression = tracer.rule(
        "prefixUnaryExpression",
        sequence(&[&zero_or_more(&unary_prefix), &postfix_unary_expression]),
    );
    // `as` takes a type on its right, not another operand.
    let as_expression = sequence(&[
        &prefix_unary_expression,
        &zero_or_more(&sequence(&[&same_line(&as_operator), &ty])),
    ]);
    let multiplicative_expression =
        left_assoc(&as_expression, &same_line(&multiplicative_operator));
    let additive_expression =
        left_assoc(&multiplicative_expression, &same_line(&additive_operator));
    let range_expression = left_assoc(&additive_expression, &same_line(&range_operator));
    let infix_function_call = left_assoc(&range_expression, &same_line(&simple_identifier));
    let elvis_expression = left_assoc(&infix_function_call, &t(K::Elvis));
    let infix_operation = sequence(&[
        &elvis_expression,
        &zero_or_more(&choice(&[
            &sequence(&[&same_line(&in_operator), &elvis_expression]),
            &sequence(&[&same_line(&is_operator), &ty]),
        ])),
    ]);
    let generic_call_like_comparison = sequence(&[
        &infix_operation,
        &zero_or_more(&same_line(&call_suffix)),
    ]);
    let comparison =
        left_assoc(&generic_call_like_comparison, &same_line(&comparison_operator));
    let equality = left_assoc(&comparison, &same_line(&equality_operator));
    let conjunction = left_assoc(&equality, &t(K::AndAnd));
    let disjunction = left_assoc(&conjunction, &t(K::OrOr));
    definitions.define(expression_def, tracer.rule("expression", disjunction));

    let callable_reference = tracer.rule(
        "callableReference",
        sequence(&[
            &optional(&receiver_type),
            &t(K::ColonColon),
            &choice(&[&simple_identifier, &t(K::Class)]),
        ]),
    );
    let function_literal = choice(&[&lambda_literal, &anonymous_function]);
    let collection_literal = tracer.rule(
        "collectionLiteral",
        brackets(&optional(&comma_separated(&expression))),
    );
    definitions.define(
        primary_expression_def,
        tracer.rule(
            "primaryExpression",
            choice(&[
                &parenthesized_expression,
                &callable_reference,
                &simple_identifier,
                &literal_constant,
                &string_literal,
                &function_literal,
                &object_literal,
                &collection_literal,
                &this_expression,
                &super_expression,
                &if_expression,
                &when_expression,
                &try_expression,
                &jump_expression,
            ]),
        ),
    );

    // An assignment target ends in an assignable suffix. Suffixes are
    // taken while another one follows, so the last can be checked.
    definitions.define(
        directly_assignable_def,
        tracer.rule(
            "directlyAssignableExpression",
            choice(&[
                &sequence(&[
                    &primary_expression,
                    &zero_or_more(&sequence(&[
                        &postfix_unary_suffix,
                        &followed_by(&postfix_unary_suffix),
                    ])),
                    &assignable_suffix,
                ]),
                &simple_identifier,
                &parens(&directly_assignable_expression),
            ]),
        ),
    );
    definitions.define(
        assignable_def,
        tracer.rule(
            "assignableExpression",
            choice(&[&prefix_unary_expression, &parens(&assignable_expression)]),
        ),
    );

    // Entry points.
    let parse_annotation = tracer.rule(
        "parseAnnotation",
        choice(&[&single_annotation, &multi_annotation]),
    );
    let parse_file_annotation = tracer.rule(
        "parseFileAnnotation",
        sequence(&[
            &t(K::At),
            &soft_keyword("file"),
            &t(K::Colon),
            &choice(&[&unescaped_annotation, &list_of_unescaped_annotations]),
        ]),
    );

    debug_assert!(
        definitions.unresolved().is_empty(),
        "unresolved grammar rules: {:?}",
        definitions.unresolved()
    );

    Rules {
        annotation: parse_annotation,
        file_annotation: parse_file_annotation,
        definitions,
    }
}
