use super::*;
use crate::config::Config;
use crate::test_support::memory_wildcards;
use std::rc::Rc;

#[test]
fn test_combinatorial_generates_all() {
    let generator = CombinatorialPromptGenerator::new(Rc::new(memory_wildcards()));
    assert_eq!(
        generator.generate("__shapes__ {x|y}", None).unwrap(),
        vec!["square x", "square y", "circle x", "circle y"]
    );
    assert_eq!(generator.generate("{a|b|c}", Some(2)).unwrap(), vec!["a", "b"]);
}

#[test]
fn test_combinatorial_ends_on_nonfinite_template() {
    let generator = CombinatorialPromptGenerator::new(Rc::new(memory_wildcards()));
    assert_eq!(generator.generate("{~a|b}", None).unwrap().len(), 1);
    assert_eq!(generator.generate("__@shapes__", None).unwrap(), vec!["square"]);
}

#[test]
fn test_random_defaults_to_one_prompt() {
    let generator = RandomPromptGenerator::new(Rc::new(memory_wildcards()), Some(1));
    assert_eq!(generator.generate("__colors__", None).unwrap().len(), 1);
    assert_eq!(generator.generate("__colors__", Some(5)).unwrap().len(), 5);
}

#[test]
fn test_random_seed_is_reproducible() {
    let run = || {
        RandomPromptGenerator::new(Rc::new(memory_wildcards()), Some(99))
            .generate("{a|b|c|d} __colors__", Some(12))
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_errors_are_wrapped() {
    let generator = CombinatorialPromptGenerator::default();
    let err = generator.generate("{unterminated", None).unwrap_err();
    assert!(matches!(err, GeneratorError::Prompt(crate::PromptError::Parse(_))));
    assert!(err.to_string().starts_with("failed to generate prompts:"));

    let err = generator.generate("a ${nope}", None).unwrap_err();
    assert!(matches!(
        err,
        GeneratorError::Prompt(crate::PromptError::UnknownVariable { .. })
    ));
}

#[test]
fn test_from_config_forces_method() {
    let config = Config::from_yaml("sampling:\n  method: cyclical\n").unwrap();
    let generator = CombinatorialPromptGenerator::from_config(&config);
    assert_eq!(generator.generate("{a|b}", None).unwrap(), vec!["a", "b"]);

    let generator = RandomPromptGenerator::from_config(&config);
    assert_eq!(generator.generate("{a|b}", Some(3)).unwrap().len(), 3);
}
