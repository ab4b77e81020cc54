//! Token model: lexical categories, the keyword table and positioned tokens

use core_types::SourcePosition;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lexical category of a scanned unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    /// A byte the lexer does not recognize
    Illegal,
    /// End of input
    Eof,

    /// Identifier that is not a keyword
    Ident,
    /// Decimal integer literal
    Int,
    /// Decimal float literal
    Float,
    /// Quoted string literal (delimiters excluded)
    String,

    /// `<?php`
    PhpOpen,
    /// `?>`
    PhpClose,
    /// `$name`
    Variable,

    /// `=`
    Assign,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
    /// `.`
    Concat,
    /// `++`
    Increment,
    /// `--`
    Decrement,

    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `<=>`
    Spaceship,

    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,

    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,

    /// `=>`
    DoubleArrow,
    /// `->`
    ObjectAccess,
    /// `::`
    StaticAccess,
    /// `\`
    NamespaceSeparator,
    /// `?`
    Question,
    /// `??`
    QuestionQuestion,
    /// `??=`
    QuestionQuestionAssign,
    /// `?->`
    QuestionArrow,

    /// function keyword
    Function,
    /// class keyword
    Class,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// elseif keyword
    Elseif,
    /// while keyword
    While,
    /// for keyword
    For,
    /// foreach keyword
    Foreach,
    /// return keyword
    Return,
    /// echo keyword
    Echo,
    /// print keyword
    Print,
    /// var keyword
    Var,
    /// public keyword
    Public,
    /// private keyword
    Private,
    /// protected keyword
    Protected,
    /// static keyword
    Static,
    /// const keyword
    Const,
    /// new keyword
    New,
    /// extends keyword
    Extends,
    /// implements keyword
    Implements,
    /// interface keyword
    Interface,
    /// namespace keyword
    Namespace,
    /// use keyword
    Use,
    /// require keyword
    Require,
    /// include keyword
    Include,
    /// true keyword
    True,
    /// false keyword
    False,
    /// null keyword
    Null,
    /// array keyword
    Array,
    /// break keyword
    Break,
    /// continue keyword
    Continue,
    /// do keyword
    Do,
    /// as keyword
    As,
    /// try keyword
    Try,
    /// catch keyword
    Catch,
    /// finally keyword
    Finally,
    /// throw keyword
    Throw,
    /// exception keyword
    Exception,
    /// closure keyword
    Closure,
    /// yield keyword
    Yield,
    /// trait keyword
    Trait,
    /// abstract keyword
    Abstract,
    /// final keyword
    Final,
    /// global keyword
    Global,
    /// list keyword
    List,
    /// unset keyword
    Unset,
    /// isset keyword
    Isset,
    /// empty keyword
    Empty,
    /// clone keyword
    Clone,
    /// instanceof keyword
    Instanceof,
    /// match keyword
    Match,
    /// include_once keyword
    IncludeOnce,
    /// require_once keyword
    RequireOnce,
    /// fn keyword
    ArrowFunction,
}

impl TokenKind {
    /// Upper-case name used in diagnostics, e.g. `QUESTION_QUESTION_ASSIGN`
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::PhpOpen => "PHP_OPEN",
            TokenKind::PhpClose => "PHP_CLOSE",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Multiply => "MULTIPLY",
            TokenKind::Divide => "DIVIDE",
            TokenKind::Modulo => "MODULO",
            TokenKind::Concat => "CONCAT",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Lte => "LTE",
            TokenKind::Gte => "GTE",
            TokenKind::Spaceship => "SPACESHIP",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::DoubleArrow => "DOUBLE_ARROW",
            TokenKind::ObjectAccess => "OBJECT_ACCESS",
            TokenKind::StaticAccess => "STATIC_ACCESS",
            TokenKind::NamespaceSeparator => "NAMESPACE_SEPARATOR",
            TokenKind::Question => "QUESTION",
            TokenKind::QuestionQuestion => "QUESTION_QUESTION",
            TokenKind::QuestionQuestionAssign => "QUESTION_QUESTION_ASSIGN",
            TokenKind::QuestionArrow => "QUESTION_ARROW",
            TokenKind::Function => "FUNCTION",
            TokenKind::Class => "CLASS",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Elseif => "ELSEIF",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Foreach => "FOREACH",
            TokenKind::Return => "RETURN",
            TokenKind::Echo => "ECHO",
            TokenKind::Print => "PRINT",
            TokenKind::Var => "VAR",
            TokenKind::Public => "PUBLIC",
            TokenKind::Private => "PRIVATE",
            TokenKind::Protected => "PROTECTED",
            TokenKind::Static => "STATIC",
            TokenKind::Const => "CONST",
            TokenKind::New => "NEW",
            TokenKind::Extends => "EXTENDS",
            TokenKind::Implements => "IMPLEMENTS",
            TokenKind::Interface => "INTERFACE",
            TokenKind::Namespace => "NAMESPACE",
            TokenKind::Use => "USE",
            TokenKind::Require => "REQUIRE",
            TokenKind::Include => "INCLUDE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Array => "ARRAY",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Do => "DO",
            TokenKind::As => "AS",
            TokenKind::Try => "TRY",
            TokenKind::Catch => "CATCH",
            TokenKind::Finally => "FINALLY",
            TokenKind::Throw => "THROW",
            TokenKind::Exception => "EXCEPTION",
            TokenKind::Closure => "CLOSURE",
            TokenKind::Yield => "YIELD",
            TokenKind::Trait => "TRAIT",
            TokenKind::Abstract => "ABSTRACT",
            TokenKind::Final => "FINAL",
            TokenKind::Global => "GLOBAL",
            TokenKind::List => "LIST",
            TokenKind::Unset => "UNSET",
            TokenKind::Isset => "ISSET",
            TokenKind::Empty => "EMPTY",
            TokenKind::Clone => "CLONE",
            TokenKind::Instanceof => "INSTANCEOF",
            TokenKind::Match => "MATCH",
            TokenKind::IncludeOnce => "INCLUDE_ONCE",
            TokenKind::RequireOnce => "REQUIRE_ONCE",
            TokenKind::ArrowFunction => "ARROW_FUNCTION",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Classify an identifier run: a keyword kind or [`TokenKind::Ident`].
///
/// The table is case-sensitive.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::Elseif,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "return" => TokenKind::Return,
        "echo" => TokenKind::Echo,
        "print" => TokenKind::Print,
        "var" => TokenKind::Var,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "static" => TokenKind::Static,
        "const" => TokenKind::Const,
        "new" => TokenKind::New,
        "extends" => TokenKind::Extends,
        "implements" => TokenKind::Implements,
        "interface" => TokenKind::Interface,
        "namespace" => TokenKind::Namespace,
        "use" => TokenKind::Use,
        "require" => TokenKind::Require,
        "include" => TokenKind::Include,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "array" => TokenKind::Array,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "do" => TokenKind::Do,
        "as" => TokenKind::As,
        "try" => TokenKind::Try,
        "catch" => TokenKind::Catch,
        "finally" => TokenKind::Finally,
        "throw" => TokenKind::Throw,
        "exception" => TokenKind::Exception,
        "closure" => TokenKind::Closure,
        "yield" => TokenKind::Yield,
        "trait" => TokenKind::Trait,
        "abstract" => TokenKind::Abstract,
        "final" => TokenKind::Final,
        "global" => TokenKind::Global,
        "list" => TokenKind::List,
        "unset" => TokenKind::Unset,
        "isset" => TokenKind::Isset,
        "empty" => TokenKind::Empty,
        "clone" => TokenKind::Clone,
        "instanceof" => TokenKind::Instanceof,
        "match" => TokenKind::Match,
        "include_once" => TokenKind::IncludeOnce,
        "require_once" => TokenKind::RequireOnce,
        "fn" => TokenKind::ArrowFunction,
        _ => TokenKind::Ident,
    }
}

/// A scanned token.
///
/// `literal` is the text exactly as scanned. Variables keep their `$`
/// sigil, strings drop their delimiters, EOF has an empty literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Lexical category
    pub kind: TokenKind,
    /// Scanned text
    pub literal: String,
    /// Line of the first character (1-based)
    pub line: u32,
    /// Column of the first character (1-based)
    pub column: u32,
    /// Byte offset of the first character
    #[serde(skip)]
    pub offset: usize,
}

impl Token {
    /// Create a token at a position
    pub fn new(kind: TokenKind, literal: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line: position.line,
            column: position.column,
            offset: position.offset,
        }
    }

    /// Position of the first character of the token
    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.line, self.column, self.offset)
    }

    /// Check the token kind
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_keywords() {
        assert_eq!(lookup_ident("function"), TokenKind::Function);
        assert_eq!(lookup_ident("foreach"), TokenKind::Foreach);
        assert_eq!(lookup_ident("require_once"), TokenKind::RequireOnce);
        assert_eq!(lookup_ident("fn"), TokenKind::ArrowFunction);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(lookup_ident("Function"), TokenKind::Ident);
        assert_eq!(lookup_ident("NULL"), TokenKind::Ident);
    }

    #[test]
    fn test_lookup_plain_identifier() {
        assert_eq!(lookup_ident("myFunction"), TokenKind::Ident);
        assert_eq!(lookup_ident("__FILE__"), TokenKind::Ident);
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(TokenKind::Assign.to_string(), "ASSIGN");
        assert_eq!(TokenKind::QuestionQuestionAssign.to_string(), "QUESTION_QUESTION_ASSIGN");
        assert_eq!(TokenKind::NamespaceSeparator.to_string(), "NAMESPACE_SEPARATOR");
        assert_eq!(TokenKind::Eof.to_string(), "EOF");
    }

    #[test]
    fn test_kind_serializes_as_display_name() {
        let json = serde_json::to_value(TokenKind::DoubleArrow).unwrap();
        assert_eq!(json, "DOUBLE_ARROW");
        let json = serde_json::to_value(TokenKind::LParen).unwrap();
        assert_eq!(json, "LPAREN");
    }

    #[test]
    fn test_token_position() {
        let token = Token::new(TokenKind::Variable, "$x", SourcePosition::new(2, 3, 10));
        assert_eq!(token.position(), SourcePosition::new(2, 3, 10));
        assert!(token.is(TokenKind::Variable));
    }
}
