use color_eyre::eyre::{Context, Result};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use polarplot::lexer::{
    formatter::{BasicFormatter, ToFormatter, TokenFormatter},
    Lexer, Token, TokenKind,
};

fn tokenize(input: &str) -> String {
    let mut scanner = Lexer::new(input);
    let formatter: BasicFormatter = scanner.create_formatter();
    let mut lines = Vec::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                lines.push(formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => lines.push(formatter.format_lexical_error(&error)),
        }
    }
    lines.join("\n")
}

fn check(input: &str, expected: &str, test_name: &str) {
    assert_eq!(
        tokenize(input),
        expected.trim_end(),
        "Failed the test {test_name}"
    );
}

#[test]
fn smoke_test() {
    check("", "line 1, column 1 EOF", "smoke");
}

#[test]
fn greek_identifiers_count_columns_in_characters() {
    check(
        "θ = π",
        "line 1, column 1 IDENTIFIER θ\n\
         line 1, column 3 EQUAL =\n\
         line 1, column 5 IDENTIFIER π\n\
         line 1, column 6 EOF",
        "greek",
    );
}

#[test]
fn keywords_are_whole_words() {
    check(
        "for over by forever",
        "line 1, column 1 FOR for\n\
         line 1, column 5 OVER over\n\
         line 1, column 10 BY by\n\
         line 1, column 13 IDENTIFIER forever\n\
         line 1, column 20 EOF",
        "keywords",
    );
}

#[test]
fn comment_runs_to_end_of_input() {
    check(
        "x # trailing note",
        "line 1, column 1 IDENTIFIER x\nline 1, column 18 EOF",
        "comment",
    );
}

#[test]
fn lexeme_is_recovered_from_span() -> Result<()> {
    let source = "radius = 12.25";
    let mut scanner = Lexer::new(source);
    let _ = scanner.next_token()?;
    let _ = scanner.next_token()?;
    let number = scanner.next_token()?;
    assert_eq!(number.kind, TokenKind::NumericLiteral);
    assert_eq!(scanner.get_lexeme(&number.span()), Some("12.25"));
    Ok(())
}

#[test]
fn test_all() -> Result<()> {
    let input_dir = Path::new("./test_data/lexer/in");
    let output_dir = Path::new("./test_data/lexer/out");

    let mut failures = Vec::new();
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "plot" {
            continue;
        }

        let test_name = AsRef::<Path>::as_ref(
            path.file_name()
                .expect("File name can't be none as the path is to a real file."),
        );

        let input = read_to_string(&path).context("Failed to open input test data file")?;

        let expected = {
            let output_file_name = test_name.with_extension("txt");
            let output_path = output_dir.join(output_file_name);
            read_to_string(output_path).context("Failed to open output test data file")?
        };

        let res = std::panic::catch_unwind(|| {
            check(&input, &expected, &test_name.to_string_lossy());
        });
        if res.is_err() {
            failures.push(test_name.to_string_lossy().into_owned());
        }
    }

    assert!(failures.is_empty(), "Failed lexer fixtures: {failures:?}");
    Ok(())
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just("=".to_string()),
        Just("-".to_string()),
        Just("+".to_string()),
        Just("*".to_string()),
        Just("/".to_string()),
    ]
}

fn numeric_literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,8}".prop_map(|s| s),
        "[0-9]{1,8}\\.[0-9]{1,8}".prop_map(|s| s),
        "\\.[0-9]{1,8}".prop_map(|s| s),
    ]
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("for".to_string()),
        Just("over".to_string()),
        Just("by".to_string()),
    ]
}

fn token_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            numeric_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens(input in token_sequence_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let mut scanner = Lexer::new(&input);
        let mut num_tokens = 0;
        loop {
            num_tokens += 1;
            match scanner.next_token() {
                Ok(Token { kind: TokenKind::Eof, .. }) => break,
                token => prop_assert!(token.is_ok()),
            }
        }
        prop_assert_eq!(num_tokens, expected_num_tokens);
    }

    #[test]
    fn numeric_literal_is_a_single_token(input in numeric_literal_strategy()) {
        let mut scanner = Lexer::new(&input);
        let token = scanner.next_token();
        prop_assert!(token.is_ok());
        let token = token.unwrap();
        prop_assert_eq!(token.kind, TokenKind::NumericLiteral);
        prop_assert_eq!(scanner.get_lexeme(&token.span()), Some(input.as_str()));
        let is_eof = matches!(scanner.next_token(), Ok(Token { kind: TokenKind::Eof, .. }));
        prop_assert!(is_eof);
    }

    #[test]
    fn lexer_always_reaches_eof(input in "[ -~\n]{0,200}") {
        let mut scanner = Lexer::new(&input);
        let mut steps = 0;
        loop {
            steps += 1;
            prop_assert!(steps <= input.len() + 1);
            if let Ok(Token { kind: TokenKind::Eof, .. }) = scanner.next_token() {
                break;
            }
        }
    }
}
