use stagelex::grammar::{LanguageProfile, SymbolClass};
use stagelex::lexical::{
    classify_constants, classify_symbols, normalize_whitespace, scan_literals, strip_comments,
};
use stagelex::pipeline::{process_source, PipelineContext, Stage};
use stagelex::tokens::{is_well_formed, reconstruct, TokenKind};
use stagelex::DiagnosticKind;

const CORPUS: &[&str] = &[
    "",
    "// hi\nint x=5;\n/* c */\nfloat y=1.5e3;",
    "int main() {\n\treturn a->b >>= 0x1F; // done\n}\n",
    "char c = 'a'; const char* s = \"// not a comment\";",
    "for (char ch = 'a'..'z'; ch != '\\0'; ++ch) {}",
    "auto v = x...y; bool ok = true && !false;",
    "std::vector<int> v{1, 2, 3}; v[0] <<= 2u;",
    "s = \"unterminated;\n/* open comment",
    "char e = ''; a @ b $ c`",
    "x=-1.5e+3;y=.5;z=0777;w=0XABCDEFl;",
    "  \r\n\t leading and trailing  \n\n",
    "naïve = \"héllo\"; // ünïcode",
];

#[test]
fn reconstruction_holds_for_every_stage() {
    let profile = LanguageProfile::cpp();
    for source in CORPUS {
        let result = process_source(source, &profile);
        for record in &result.stages {
            assert!(
                is_well_formed(&record.input, &record.output.tokens),
                "{} produced overlapping or out-of-range tokens for {:?}",
                record.stage,
                source
            );
            assert_eq!(
                reconstruct(&record.input, &record.output.tokens),
                record.input,
                "{} does not reconstruct {:?}",
                record.stage,
                source
            );
        }
    }
}

#[test]
fn text_transforming_stages_output_input_minus_tokens() {
    for source in CORPUS {
        let stripped = strip_comments(source);
        let mut rebuilt = String::new();
        let mut last = 0;
        for token in &stripped.tokens {
            rebuilt.push_str(&source[last..token.span.start]);
            last = token.span.end;
        }
        rebuilt.push_str(&source[last..]);
        assert_eq!(rebuilt, stripped.text, "comment stripping of {:?}", source);
    }
}

#[test]
fn whitespace_normalization_is_idempotent() {
    for source in CORPUS {
        let once = normalize_whitespace(&strip_comments(source).text).text;
        let twice = normalize_whitespace(&once).text;
        assert_eq!(once, twice, "normalizing {:?}", source);
        assert!(!once.starts_with(' ') && !once.ends_with(' '));
        assert!(!once.contains("  "));
    }
}

#[test]
fn maximal_munch_prefers_longest_symbol() {
    let profile = LanguageProfile::cpp();
    let text = ">>=";
    let index = scan_literals(text);
    let output = classify_symbols(text, index.literals(), &profile.symbols);

    assert_eq!(output.tokens.len(), 1);
    assert_eq!(output.tokens[0].lexeme, ">>=");
    assert_eq!(output.tokens[0].kind, TokenKind::Operator);
    assert_eq!(profile.symbols.class_of(">>="), Some(SymbolClass::Operator));
}

#[test]
fn constants_inside_comments_never_reach_classification() {
    let result = process_source("int x = 5; // 10", &LanguageProfile::cpp());
    let constants = result.stage(Stage::ConstantsTagged).unwrap();
    assert_eq!(constants.output.lexemes(TokenKind::DecInt), vec!["5"]);
    assert_eq!(constants.output.found().count(), 1);
}

#[test]
fn range_bounds_are_not_char_literals() {
    let text = "'a'..'z'";
    let index = scan_literals(text);
    assert_eq!(index.ranges().len(), 2);

    let output = classify_constants(text, index.ranges());
    assert!(output.lexemes(TokenKind::CharLiteral).is_empty());

    // A lone char literal is still reported
    let lone = classify_constants("'a'", scan_literals("'a'").ranges());
    assert_eq!(lone.lexemes(TokenKind::CharLiteral), vec!["'a'"]);
}

#[test]
fn keywords_match_whole_words_only() {
    let result = process_source("int return_value = 0;", &LanguageProfile::cpp());
    let keywords = result.stage(Stage::KeywordsTagged).unwrap();
    let identifiers = result.stage(Stage::IdentifiersTagged).unwrap();

    assert_eq!(keywords.output.lexemes(TokenKind::Keyword), vec!["int"]);
    assert_eq!(
        identifiers.output.lexemes(TokenKind::Identifier),
        vec!["return_value"]
    );
}

#[test]
fn end_to_end_scenario() {
    let source = "// hi\nint x=5;\n/* c */\nfloat y=1.5e3;";
    let profile = LanguageProfile::cpp();
    let mut ctx = PipelineContext::new(source, &profile);

    let stripped = ctx.advance().unwrap();
    assert_eq!(stripped.output.text, "\nint x=5;\n\nfloat y=1.5e3;");
    assert_eq!(
        stripped.output.lexemes(TokenKind::Comment),
        vec!["// hi", "/* c */"]
    );

    let normalized = ctx.advance().unwrap();
    assert_eq!(normalized.output.text, "int x=5; float y=1.5e3;");

    let constants = ctx.advance().unwrap();
    let found: Vec<_> = constants
        .output
        .found()
        .map(|t| (t.kind, t.lexeme.as_str()))
        .collect();
    assert_eq!(
        found,
        vec![(TokenKind::DecInt, "5"), (TokenKind::Float, "1.5e3")]
    );

    let keywords = ctx.advance().unwrap();
    assert_eq!(keywords.output.lexemes(TokenKind::Keyword), vec!["int", "float"]);

    let identifiers = ctx.advance().unwrap();
    assert_eq!(identifiers.output.lexemes(TokenKind::Identifier), vec!["x", "y"]);

    let symbols = ctx.advance().unwrap();
    assert_eq!(symbols.output.lexemes(TokenKind::Operator), vec!["=", "="]);
    assert_eq!(symbols.output.lexemes(TokenKind::Punctuator), vec![";", ";"]);
    assert!(symbols.output.of_kind(TokenKind::Unknown).next().is_none());

    assert!(ctx.is_complete());
    assert_eq!(ctx.text(), "int x=5; float y=1.5e3;");
}

#[test]
fn tokens_map_back_to_raw_source() {
    let source = "// hi\nint x=5;\n/* c */\nfloat y=1.5e3;";
    let result = process_source(source, &LanguageProfile::cpp());
    let constants = result.stage(Stage::ConstantsTagged).unwrap();

    for token in constants.output.found() {
        let raw = constants.raw_span(token);
        assert_eq!(&source[raw.start..raw.end], token.lexeme);
    }
}

#[test]
fn unclosed_literals_fall_through_as_plain_text() {
    let result = process_source("s = \"abc;", &LanguageProfile::cpp());
    let constants = result.stage(Stage::ConstantsTagged).unwrap();
    assert!(constants.output.lexemes(TokenKind::StringLiteral).is_empty());

    let identifiers = result.stage(Stage::IdentifiersTagged).unwrap();
    assert_eq!(identifiers.output.lexemes(TokenKind::Identifier), vec!["s", "abc"]);

    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UnterminatedLiteral]);
}

#[test]
fn unterminated_block_comment_consumes_to_end() {
    let result = process_source("int a; /* never closed\nint b;", &LanguageProfile::cpp());
    assert_eq!(result.final_text(), "int a;");
    assert_eq!(
        result.diagnostics[0].kind,
        DiagnosticKind::UnterminatedComment
    );
}

#[test]
fn custom_profile_changes_classification() {
    let profile = LanguageProfile::from_toml_str(
        r#"
name = "cpp-plus"
extends = "cpp"
keywords = ["fn"]
operators = ["=>"]
"#,
    )
    .unwrap();

    let result = process_source("fn f = a => b;", &profile);
    let keywords = result.stage(Stage::KeywordsTagged).unwrap();
    assert_eq!(keywords.output.lexemes(TokenKind::Keyword), vec!["fn"]);

    let symbols = result.stage(Stage::SymbolsTagged).unwrap();
    assert_eq!(symbols.output.lexemes(TokenKind::Operator), vec!["=", "=>"]);
}
