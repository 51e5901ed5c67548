//! Correlate lexical problems with the raw source program
//!
//! The stages never fail; they degrade to `Unknown` tokens or consume to the
//! end of the input. This module reads a finished run and reports those
//! places with raw-source line and column.

use crate::logging::{codes, Code};
use crate::pipeline::{PipelineResult, Stage, StageRecord};
use crate::tokens::TokenKind;
use crate::utils::{SourceMap, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// `/*` without a closing `*/`; the comment ran to the end of input
    UnterminatedComment,
    /// `''`
    EmptyCharLiteral,
    /// A quote that opens no closed literal
    UnterminatedLiteral,
    /// A character no stage classifies
    UnrecognizedCharacter,
}

impl DiagnosticKind {
    pub fn code(&self) -> Code {
        match self {
            Self::UnterminatedComment => codes::lexical::UNTERMINATED_COMMENT,
            Self::EmptyCharLiteral => codes::lexical::EMPTY_CHAR_LITERAL,
            Self::UnterminatedLiteral => codes::lexical::UNTERMINATED_LITERAL,
            Self::UnrecognizedCharacter => codes::lexical::UNRECOGNIZED_CHARACTER,
        }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::UnterminatedComment | Self::EmptyCharLiteral => DiagnosticSeverity::Warning,
            Self::UnterminatedLiteral | Self::UnrecognizedCharacter => DiagnosticSeverity::Error,
        }
    }
}

/// One finding, located in the raw source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: DiagnosticSeverity,
    pub code: String,
    pub message: String,
    /// Stage whose output revealed the problem
    pub stage: Stage,
    /// Span in the raw source
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: String, stage: Stage, span: Span, map: &SourceMap) -> Self {
        let position = map.position_at(span.start);
        Self {
            kind,
            severity: kind.severity(),
            code: kind.code().as_str().to_string(),
            message,
            stage,
            span,
            line: position.line,
            column: position.column,
        }
    }

    /// Cargo-style excerpt: `error[E021]: message` with a caret underline
    pub fn render(&self, map: &SourceMap) -> String {
        let label = format!("{}[{}]", self.severity, self.code);
        map.format_error(&self.span, &label, &self.message)
    }

    /// Send this diagnostic to the global logger and error collector
    pub fn log(&self) {
        match self.severity {
            DiagnosticSeverity::Error => {
                crate::log_error!(self.kind.code(), &self.message,
                    span = self.span,
                    "line" => self.line,
                    "column" => self.column,
                    "stage" => self.stage
                );
            }
            DiagnosticSeverity::Warning => {
                crate::log_warning!(code = self.kind.code(), &self.message,
                    "line" => self.line,
                    "column" => self.column,
                    "stage" => self.stage
                );
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}:{}: {}",
            self.severity, self.code, self.line, self.column, self.message
        )
    }
}

/// Find every unterminated comment, empty char literal, unterminated
/// literal and unrecognized character of a run, in source order
pub fn collect(result: &PipelineResult) -> Vec<Diagnostic> {
    let map = result.source_map();
    let mut diagnostics = Vec::new();

    if let Some(record) = result.stage(Stage::CommentsStripped) {
        unterminated_comments(record, &map, &mut diagnostics);
    }

    let empty_chars: Vec<Span> = result
        .stage(Stage::ConstantsTagged)
        .map(|record| {
            record
                .output
                .of_kind(TokenKind::Unknown)
                .filter(|t| t.lexeme == "''")
                .map(|t| t.span)
                .collect()
        })
        .unwrap_or_default();
    if let Some(record) = result.stage(Stage::ConstantsTagged) {
        for span in &empty_chars {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EmptyCharLiteral,
                "Empty character literal".to_string(),
                record.stage,
                record.input_origin.span_to_source(*span),
                &map,
            ));
        }
    }

    if let Some(record) = result.stage(Stage::SymbolsTagged) {
        for token in record.output.of_kind(TokenKind::Unknown) {
            let is_quote = token.lexeme == "\"" || token.lexeme == "'";
            if is_quote && empty_chars.iter().any(|s| s.contains(token.span.start)) {
                continue;
            }
            let (kind, message) = if is_quote {
                let what = if token.lexeme == "\"" { "string" } else { "character" };
                (
                    DiagnosticKind::UnterminatedLiteral,
                    format!("Unterminated {} literal", what),
                )
            } else {
                (
                    DiagnosticKind::UnrecognizedCharacter,
                    format!("Unrecognized character {:?}", token.lexeme),
                )
            };
            diagnostics.push(Diagnostic::new(
                kind,
                message,
                record.stage,
                record.raw_span(token),
                &map,
            ));
        }
    }

    diagnostics.sort_by_key(|d| (d.span.start, d.span.end));
    diagnostics
}

fn unterminated_comments(record: &StageRecord, map: &SourceMap, out: &mut Vec<Diagnostic>) {
    for token in record.output.of_kind(TokenKind::Comment) {
        let lexeme = token.lexeme.as_str();
        if lexeme.starts_with("/*") && (lexeme.len() < 4 || !lexeme.ends_with("*/")) {
            let opener = Span::at(record.raw_span(token).start, 2);
            out.push(Diagnostic::new(
                DiagnosticKind::UnterminatedComment,
                "Unterminated block comment runs to the end of input".to_string(),
                record.stage,
                opener,
                map,
            ));
        }
    }
}

/// Render every diagnostic followed by a one-line count
pub fn render_all(diagnostics: &[Diagnostic], map: &SourceMap) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&diagnostic.render(map));
        out.push('\n');
    }
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .count();
    let warnings = diagnostics.len() - errors;
    out.push_str(&format!("{} error(s), {} warning(s)\n", errors, warnings));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::LanguageProfile;
    use crate::pipeline::process_source;

    fn diagnose(source: &str) -> Vec<Diagnostic> {
        process_source(source, &LanguageProfile::cpp()).diagnostics
    }

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        assert!(diagnose("int x = 5; char c = 'a'; s = \"ok\";").is_empty());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let diags = diagnose("int a;\n/* open");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnterminatedComment);
        assert_eq!(diags[0].severity, DiagnosticSeverity::Warning);
        assert_eq!((diags[0].line, diags[0].column), (2, 1));
    }

    #[test]
    fn test_empty_char_literal_is_one_warning() {
        let diags = diagnose("char c = '';");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::EmptyCharLiteral);
        assert_eq!(diags[0].span, Span::new(9, 11));
        assert_eq!(diags[0].code, "W023");
    }

    #[test]
    fn test_unterminated_string_located_in_raw_source() {
        let source = "// header\nint x;\n  s = \"abc;";
        let diags = diagnose(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::UnterminatedLiteral);
        assert_eq!(diags[0].span.start, source.find('"').unwrap());
        assert_eq!((diags[0].line, diags[0].column), (3, 7));
    }

    #[test]
    fn test_unrecognized_characters() {
        let diags = diagnose("a @ b\n$c");
        let kinds: Vec<_> = diags.iter().map(|d| (d.kind, d.line, d.column)).collect();
        assert_eq!(
            kinds,
            vec![
                (DiagnosticKind::UnrecognizedCharacter, 1, 3),
                (DiagnosticKind::UnrecognizedCharacter, 2, 1),
            ]
        );
    }

    #[test]
    fn test_render_points_at_the_character() {
        let source = "int a;\nx = @;";
        let result = process_source(source, &LanguageProfile::cpp());
        let rendered = result.diagnostics[0].render(&result.source_map());
        assert!(rendered.starts_with("error[E020]: Unrecognized character \"@\""));
        assert!(rendered.contains("--> 2:5"));
        assert!(rendered.contains("2 | x = @;"));

        let all = render_all(&result.diagnostics, &result.source_map());
        assert!(all.ends_with("1 error(s), 0 warning(s)\n"));
    }
}
