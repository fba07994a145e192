//! Tests for the template parser.

use super::*;
use crate::commands::{
    SamplingMethod, SequenceCommand, VariableAccessCommand, VariableAssignmentCommand,
    VariantCommand, WildcardCommand, WrapCommand,
};
use crate::error::PromptError;

// =========================================================================
// Helper functions
// =========================================================================

fn variant(cmd: &Command) -> &VariantCommand {
    match cmd {
        Command::Variant(v) => v,
        other => panic!("expected variant, got {:?}", other),
    }
}

fn sequence(cmd: &Command) -> &SequenceCommand {
    match cmd {
        Command::Sequence(s) => s,
        other => panic!("expected sequence, got {:?}", other),
    }
}

fn wildcard(cmd: &Command) -> &WildcardCommand {
    match cmd {
        Command::Wildcard(w) => w,
        other => panic!("expected wildcard, got {:?}", other),
    }
}

fn parse_error(template: &str) -> ParseError {
    match parse(template) {
        Err(PromptError::Parse(e)) => e,
        other => panic!("expected parse error for {:?}, got {:?}", template, other),
    }
}

fn option_literals(v: &VariantCommand) -> Vec<&str> {
    v.values().map(|c| c.as_literal().unwrap()).collect()
}

// =========================================================================
// Literals
// =========================================================================

#[test]
fn test_plain_literal() {
    assert_eq!(parse("I love bread").unwrap(), Command::literal("I love bread"));
}

#[test]
fn test_empty_template_is_empty_literal() {
    assert_eq!(parse("").unwrap(), Command::literal(""));
}

#[test]
fn test_natural_language_markup_is_preserved() {
    let template = "a [cat|dog] (masterpiece:1.2) <lora:style:0.8> 100% } | done";
    assert_eq!(parse(template).unwrap(), Command::literal(template));
}

#[test]
fn test_unclosed_wildcard_wrap_is_literal() {
    assert_eq!(parse("snake__case").unwrap(), Command::literal("snake__case"));
    assert_eq!(parse("__ spaced __").unwrap(), Command::literal("__ spaced __"));
}

#[test]
fn test_line_comments_are_dropped() {
    assert_eq!(parse("a # comment\nb").unwrap(), Command::literal("a \nb"));
    assert_eq!(parse("a // comment").unwrap(), Command::literal("a "));
}

#[test]
fn test_block_comments_are_dropped() {
    assert_eq!(parse("a /* skip {me} */b").unwrap(), Command::literal("a b"));
}

// =========================================================================
// Variants
// =========================================================================

#[test]
fn test_simple_variant() {
    let cmd = parse("{A|B|C}").unwrap();
    let v = variant(&cmd);
    assert_eq!(option_literals(v), vec!["A", "B", "C"]);
    assert_eq!((v.min_bound, v.max_bound), (1, 1));
    assert_eq!(v.separator, ",");
    assert_eq!(v.sampling_method, None);
}

#[test]
fn test_variant_exact_bound_with_separator() {
    let cmd = parse("{2$$ and $$A|B|C}").unwrap();
    let v = variant(&cmd);
    assert_eq!((v.min_bound, v.max_bound), (2, 2));
    assert_eq!(v.separator, " and ");
    assert_eq!(option_literals(v), vec!["A", "B", "C"]);
}

#[test]
fn test_variant_range_bound_default_separator() {
    let cmd = parse("{1-2$$red|green|blue}").unwrap();
    let v = variant(&cmd);
    assert_eq!((v.min_bound, v.max_bound), (1, 2));
    assert_eq!(v.separator, ",");
}

#[test]
fn test_variant_open_ranges() {
    let cmd = parse("{-2$$a|b|c}").unwrap();
    assert_eq!((variant(&cmd).min_bound, variant(&cmd).max_bound), (1, 2));

    let cmd = parse("{2-$$a|b|c}").unwrap();
    assert_eq!((variant(&cmd).min_bound, variant(&cmd).max_bound), (2, 3));
}

#[test]
fn test_variant_zero_bound() {
    let cmd = parse("{0$$a|b}").unwrap();
    assert_eq!((variant(&cmd).min_bound, variant(&cmd).max_bound), (0, 0));
}

#[test]
fn test_variant_weights() {
    let cmd = parse("{2::a|0.5::b|c}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.weights(), vec![2.0, 0.5, 1.0]);
    assert_eq!(option_literals(v), vec!["a", "b", "c"]);
}

#[test]
fn test_variant_weight_with_spaces() {
    let cmd = parse("{ 3 :: heavy | light}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.weights(), vec![3.0, 1.0]);
    assert_eq!(option_literals(v), vec![" heavy ", " light"]);
}

#[test]
fn test_numbers_without_weight_marker_are_text() {
    let cmd = parse("{1 girl|2 girls}").unwrap();
    assert_eq!(option_literals(variant(&cmd)), vec!["1 girl", "2 girls"]);
}

#[test]
fn test_variant_sigils() {
    let cmd = parse("{~a|b}").unwrap();
    assert_eq!(variant(&cmd).sampling_method, Some(SamplingMethod::Random));

    let cmd = parse("{@2$$a|b}").unwrap();
    assert_eq!(variant(&cmd).sampling_method, Some(SamplingMethod::Cyclical));
    assert_eq!(variant(&cmd).min_bound, 2);
}

#[test]
fn test_empty_variant_has_one_empty_option() {
    let cmd = parse("{}").unwrap();
    assert_eq!(option_literals(variant(&cmd)), vec![""]);
}

#[test]
fn test_nested_variant() {
    let cmd = parse("{a|{b|c}}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.options[0].value, Command::literal("a"));
    assert_eq!(option_literals(variant(&v.options[1].value)), vec!["b", "c"]);
}

#[test]
fn test_brackets_keep_pipes_inside_variant_option() {
    let cmd = parse("{[cat|dog]|bird}").unwrap();
    assert_eq!(option_literals(variant(&cmd)), vec!["[cat|dog]", "bird"]);
}

#[test]
fn test_brackets_span_constructs_inside_variant_option() {
    let cmd = parse("{[__colors__|b]|c}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.len(), 2);
    let first = sequence(&v.options[0].value);
    assert_eq!(first.tokens[0], Command::literal("["));
    assert_eq!(wildcard(&first.tokens[1]).wildcard, "colors");
    assert_eq!(first.tokens[2], Command::literal("|b]"));
    assert_eq!(v.options[1].value, Command::literal("c"));

    let cmd = parse("{[{x|y}|b]|c}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.len(), 2);
    let first = sequence(&v.options[0].value);
    assert_eq!(option_literals(variant(&first.tokens[1])), vec!["x", "y"]);
    assert_eq!(first.tokens[2], Command::literal("|b]"));
}

#[test]
fn test_sequence_of_mixed_tokens() {
    let cmd = parse("A __colors__ {square|circle}").unwrap();
    let seq = sequence(&cmd);
    assert_eq!(seq.tokens.len(), 4);
    assert_eq!(seq.tokens[0], Command::literal("A "));
    assert_eq!(wildcard(&seq.tokens[1]).wildcard, "colors");
    assert_eq!(seq.tokens[2], Command::literal(" "));
    assert_eq!(option_literals(variant(&seq.tokens[3])), vec!["square", "circle"]);
}

// =========================================================================
// Wildcards
// =========================================================================

#[test]
fn test_wildcard_glob_path() {
    let cmd = parse("__animals/**/cat*__").unwrap();
    assert_eq!(wildcard(&cmd).wildcard, "animals/**/cat*");
}

#[test]
fn test_wildcard_sigil() {
    let cmd = parse("__@colors__").unwrap();
    let w = wildcard(&cmd);
    assert_eq!(w.wildcard, "colors");
    assert_eq!(w.sampling_method, Some(SamplingMethod::Cyclical));
}

#[test]
fn test_wildcard_with_variable_in_path() {
    let cmd = parse("__${season}/clothes__").unwrap();
    assert_eq!(wildcard(&cmd).wildcard, "${season}/clothes");
}

#[test]
fn test_wildcard_arguments() {
    let cmd = parse("__outfit(color=red, size={big|small})__").unwrap();
    let w = wildcard(&cmd);
    assert_eq!(w.wildcard, "outfit");
    assert_eq!(w.variables.len(), 2);
    assert_eq!(w.variables[0], ("color".to_string(), Command::literal("red")));
    assert_eq!(w.variables[1].0, "size");
    assert_eq!(option_literals(variant(&w.variables[1].1)), vec!["big", "small"]);
}

#[test]
fn test_wildcard_arguments_missing_close_is_error() {
    let err = parse_error("__outfit(color=red__");
    assert!(matches!(err.kind, ParseErrorKind::InvalidWildcardArguments(_)));
}

#[test]
fn test_parenthesis_without_assignment_is_not_wildcard() {
    assert_eq!(parse("__init(self)__").unwrap(), Command::literal("__init(self)__"));
}

#[test]
fn test_single_wildcard_variant() {
    let cmd = parse("{2$$__colors__}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.single_wildcard().unwrap().wildcard, "colors");
}

// =========================================================================
// Variables
// =========================================================================

#[test]
fn test_immediate_assignment_and_access() {
    let cmd = parse("${season=!{summer|winter}} ${season}").unwrap();
    let seq = sequence(&cmd);
    match &seq.tokens[0] {
        Command::VariableAssignment(VariableAssignmentCommand {
            name,
            value,
            immediate,
            ..
        }) => {
            assert_eq!(name, "season");
            assert!(*immediate);
            assert_eq!(option_literals(variant(value)), vec!["summer", "winter"]);
        }
        other => panic!("expected assignment, got {:?}", other),
    }
    assert_eq!(seq.tokens[1], Command::literal(" "));
    assert_eq!(seq.tokens[2], Command::variable("season"));
}

#[test]
fn test_deferred_assignment_with_spaces() {
    let cmd = parse("${ animal = cat }").unwrap();
    match cmd {
        Command::VariableAssignment(a) => {
            assert_eq!(a.name, "animal");
            assert!(!a.immediate);
            assert_eq!(*a.value, Command::literal("cat "));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_access_with_default() {
    let cmd = parse("${color:{red|blue}}").unwrap();
    match cmd {
        Command::VariableAccess(VariableAccessCommand { name, default, .. }) => {
            assert_eq!(name, "color");
            let default = default.expect("default");
            assert_eq!(option_literals(variant(&default)), vec!["red", "blue"]);
        }
        other => panic!("expected access, got {:?}", other),
    }
}

#[test]
fn test_variable_inside_variant() {
    let cmd = parse("{${a}|b}").unwrap();
    let v = variant(&cmd);
    assert_eq!(v.options[0].value, Command::variable("a"));
}

// =========================================================================
// Wrap
// =========================================================================

#[test]
fn test_wrap_command() {
    let cmd = parse("%{happy … on a meadow$${fox|cow}}").unwrap();
    match cmd {
        Command::Wrap(WrapCommand { wrapper, inner, .. }) => {
            assert_eq!(*wrapper, Command::literal("happy … on a meadow"));
            assert_eq!(option_literals(variant(&inner)), vec!["fox", "cow"]);
        }
        other => panic!("expected wrap, got {:?}", other),
    }
}

#[test]
fn test_wrap_with_wildcard_wrapper() {
    let cmd = parse("%{__styles__$$a cat}").unwrap();
    match cmd {
        Command::Wrap(w) => {
            assert_eq!(wildcard(&w.wrapper).wildcard, "styles");
            assert_eq!(*w.inner, Command::literal("a cat"));
        }
        other => panic!("expected wrap, got {:?}", other),
    }
}

// =========================================================================
// Errors
// =========================================================================

#[test]
fn test_unterminated_variant() {
    let err = parse_error("{a|b");
    assert_eq!(err.kind, ParseErrorKind::UnterminatedVariant);
    assert_eq!((err.offset, err.line, err.column), (0, 1, 1));
}

#[test]
fn test_error_location_on_second_line() {
    let err = parse_error("first line\nsecond {a|b");
    assert_eq!(err.kind, ParseErrorKind::UnterminatedVariant);
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 8);
    assert_eq!(
        err.to_string(),
        "unterminated variant at line 2, column 8"
    );
}

#[test]
fn test_unterminated_wrap() {
    assert_eq!(parse_error("%{a$$b").kind, ParseErrorKind::UnterminatedWrap);
    assert_eq!(parse_error("%{ab").kind, ParseErrorKind::UnterminatedWrap);
}

#[test]
fn test_wrap_missing_separator() {
    assert_eq!(parse_error("%{ab}").kind, ParseErrorKind::MissingWrapSeparator);
}

#[test]
fn test_malformed_bound_expression() {
    assert_eq!(
        parse_error("{1-2-3$$a|b}").kind,
        ParseErrorKind::InvalidBoundExpression("1-2-3".to_string())
    );
}

#[test]
fn test_dollar_separator_is_rejected() {
    assert_eq!(parse_error("{2$$ x $ y|z}").kind, ParseErrorKind::DollarSeparator);
}

#[test]
fn test_stray_dollar_in_variant() {
    assert_eq!(parse_error("{a$b}").kind, ParseErrorKind::UnexpectedDollar);
}

#[test]
fn test_invalid_variable_names() {
    assert!(matches!(
        parse_error("${=x}").kind,
        ParseErrorKind::InvalidVariableName(_)
    ));
    assert!(matches!(
        parse_error("${a?}").kind,
        ParseErrorKind::InvalidVariableName(_)
    ));
}

#[test]
fn test_unterminated_variable() {
    assert_eq!(parse_error("${a").kind, ParseErrorKind::UnterminatedVariable);
    assert_eq!(parse_error("${a=b").kind, ParseErrorKind::UnterminatedVariable);
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(parse_error("a /* b").kind, ParseErrorKind::UnterminatedComment);
}

// =========================================================================
// Custom delimiters
// =========================================================================

#[test]
fn test_custom_delimiters() {
    let config = ParserConfig {
        variant_start: "<".to_string(),
        variant_end: ">".to_string(),
        wildcard_wrap: "@@".to_string(),
        ..Default::default()
    };
    let cmd = parse_with_config("<a|b> @@colors@@ {literal}", &config).unwrap();
    let seq = sequence(&cmd);
    assert_eq!(option_literals(variant(&seq.tokens[0])), vec!["a", "b"]);
    assert_eq!(wildcard(&seq.tokens[2]).wildcard, "colors");
    assert_eq!(seq.tokens[3], Command::literal(" {literal}"));
}

#[test]
fn test_parser_config_yaml_defaults() {
    let config: ParserConfig = serde_yaml::from_str("wildcard_wrap: '**'").unwrap();
    assert_eq!(config.wildcard_wrap, "**");
    assert_eq!(config.variant_start, "{");
    assert_eq!(config.variable_start, "${");
    assert_eq!(config.wrap_wildcard("x"), "**x**");
}

// =========================================================================
// Properties
// =========================================================================

mod literal_roundtrip {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Text free of template syntax parses to itself.
        #[test]
        fn plain_text_parses_to_single_literal(text in "[a-zA-Z0-9 ,.!?()\\[\\]<>:-]{0,40}") {
            let cmd = parse(&text).unwrap();
            prop_assert_eq!(cmd, Command::literal(text.clone()));
        }
    }
}
