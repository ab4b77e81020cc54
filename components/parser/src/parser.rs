//! Recursive descent statement parser with a Pratt expression core
//!
//! The parser holds exactly two tokens of state, `current` and `peek`.
//! Statement parsers leave `current` on the last token of the construct
//! they consumed; the enclosing loop then advances once. Errors never abort
//! the parse: they are recorded, the construct being built is dropped
//! (`None`), and parsing resumes at the next token.

use crate::ast::*;
use crate::error::ParseError;
use crate::lexer::{is_letter, Lexer};
use crate::token::{Token, TokenKind};
use core_types::{Diagnostic, SourcePosition};
use tracing::debug;

/// Visibility given to members written without a modifier
pub const DEFAULT_VISIBILITY: Visibility = Visibility::Public;

/// Operator binding power, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Starting level; binds nothing
    Lowest,
    /// `=` and `??=`
    Assign,
    /// `? :`
    Ternary,
    /// `||`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `==`, `!=`, `??`
    Equals,
    /// `<`, `>`, `<=`, `>=`, `<=>`
    LessGreater,
    /// `+`, `-`, `.`
    Sum,
    /// `*`, `/`, `%`
    Product,
    /// Unary `-x`, `!x`, `++x`, `--x`
    Prefix,
    /// Calls, subscripts, member access, postfix `++`/`--`
    Call,
}

impl Precedence {
    /// Binding power of a token in infix position
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Assign | TokenKind::QuestionQuestionAssign => Precedence::Assign,
            TokenKind::Question => Precedence::Ternary,
            TokenKind::Or => Precedence::LogicalOr,
            TokenKind::And => Precedence::LogicalAnd,
            TokenKind::Eq | TokenKind::NotEq | TokenKind::QuestionQuestion => Precedence::Equals,
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Lte
            | TokenKind::Gte
            | TokenKind::Spaceship => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Precedence::Sum,
            TokenKind::Multiply | TokenKind::Divide | TokenKind::Modulo => Precedence::Product,
            TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::ObjectAccess
            | TokenKind::QuestionArrow
            | TokenKind::StaticAccess
            | TokenKind::Increment
            | TokenKind::Decrement => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

/// Result of parsing a whole source text
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Best-effort tree; may be missing constructs that failed to parse
    pub program: Program,
    /// Every error recorded, in source order
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    /// True when no errors were recorded
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The program if parsing was clean, otherwise the errors
    pub fn into_result(self) -> Result<Program, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(self.program)
        } else {
            Err(self.errors)
        }
    }
}

/// Parse a complete source text
pub fn parse(source: &str) -> ParseOutcome {
    let mut parser = Parser::from_source(source);
    let program = parser.parse_program();
    ParseOutcome {
        program,
        errors: parser.into_errors(),
    }
}

/// Parser over a token stream
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    peek: Token,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Create a parser pulling tokens from `lexer`
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    /// Create a parser directly over source text
    pub fn from_source(source: &'a str) -> Self {
        Self::new(Lexer::new(source))
    }

    /// Errors recorded so far
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Consume the parser, returning its errors
    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Errors rendered as positioned diagnostics
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(ParseError::to_diagnostic).collect()
    }

    /// Parse every statement up to end of input
    ///
    /// `<?php` and `?>` markers are skipped at the top level.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::PhpOpen) || self.cur_is(TokenKind::PhpClose) {
                self.next_token();
                continue;
            }

            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );
        Program::new(statements)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Function => self.parse_function_declaration().map(Statement::Function),
            TokenKind::Class => self.parse_class_declaration().map(Statement::Class),
            TokenKind::Interface => self.parse_interface_declaration().map(Statement::Interface),
            TokenKind::Trait => self.parse_trait_declaration().map(Statement::Trait),
            TokenKind::Const => self
                .parse_constant_declaration(DEFAULT_VISIBILITY)
                .map(Statement::Constant),
            TokenKind::Namespace => self.parse_namespace_declaration().map(Statement::Namespace),
            TokenKind::Use => self.parse_use_statement().map(Statement::Use),
            TokenKind::Try => self.parse_try_statement().map(Statement::Try),
            TokenKind::Throw => self.parse_throw_statement().map(Statement::Throw),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::If => self.parse_if_statement().map(Statement::If),
            TokenKind::Echo => self.parse_echo_statement().map(Statement::Echo),
            TokenKind::For => self.parse_for_statement().map(Statement::For),
            TokenKind::While => self.parse_while_statement().map(Statement::While),
            TokenKind::Foreach => self.parse_foreach_statement().map(Statement::Foreach),
            TokenKind::Break => self.parse_break_statement().map(Statement::Break),
            TokenKind::Continue => self.parse_continue_statement().map(Statement::Continue),
            _ => self.parse_expression_statement().map(Statement::Expression),
        }
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let position = self.current.position();
        let mut statements = Vec::new();

        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        BlockStatement {
            statements,
            position,
        }
    }

    fn parse_expression_statement(&mut self) -> Option<ExpressionStatement> {
        let position = self.current.position();
        let expression = if self.cur_is(TokenKind::Variable) && self.peek_is(TokenKind::Assign) {
            self.parse_assignment_from_variable()
        } else {
            self.parse_expression(Precedence::Lowest)
        };
        let expression = self.terminated(expression)?;

        Some(ExpressionStatement {
            expression,
            position,
        })
    }

    /// `$name = value` where `current` is the variable
    fn parse_assignment_from_variable(&mut self) -> Option<Expression> {
        let name = self.current_variable();
        self.expect_peek(TokenKind::Assign)?;
        let position = self.current.position();

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        Some(Expression::Assignment(AssignmentExpression {
            name,
            value: Box::new(value),
            position,
        }))
    }

    fn parse_function_declaration(&mut self) -> Option<FunctionDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(FunctionDeclaration {
            name,
            parameters,
            body,
            position,
        })
    }

    /// Parameter list; `current` is the opening parenthesis. Tokens other
    /// than variables between commas are skipped.
    fn parse_function_parameters(&mut self) -> Option<Vec<Variable>> {
        let mut parameters = Vec::new();

        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some(parameters);
        }

        self.next_token();
        if self.cur_is(TokenKind::Variable) {
            parameters.push(self.current_variable());
        }

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            if self.cur_is(TokenKind::Variable) {
                parameters.push(self.current_variable());
            }
        }

        self.expect_peek(TokenKind::RParen)?;
        Some(parameters)
    }

    fn parse_return_statement(&mut self) -> Option<ReturnStatement> {
        let position = self.current.position();

        self.next_token();
        if self.cur_is(TokenKind::Semicolon) {
            return Some(ReturnStatement {
                return_value: None,
                position,
            });
        }

        let value = self.parse_expression(Precedence::Lowest);
        let value = self.terminated(value)?;

        Some(ReturnStatement {
            return_value: Some(value),
            position,
        })
    }

    fn parse_if_statement(&mut self) -> Option<IfStatement> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LBrace)?;
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(IfStatement {
            condition,
            consequence,
            alternative,
            position,
        })
    }

    fn parse_echo_statement(&mut self) -> Option<EchoStatement> {
        let position = self.current.position();

        let mut values = Vec::new();
        let mut complete = true;
        loop {
            self.next_token();
            match self.parse_expression(Precedence::Lowest) {
                Some(value) => values.push(value),
                None => complete = false,
            }
            if !self.peek_is(TokenKind::Comma) {
                break;
            }
            self.next_token();
        }
        self.consume_optional_semicolon();

        complete.then_some(EchoStatement { values, position })
    }

    fn parse_for_statement(&mut self) -> Option<ForStatement> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let init = if self.cur_is(TokenKind::Variable) && self.peek_is(TokenKind::Assign) {
            self.parse_assignment_from_variable()?
        } else {
            self.parse_expression(Precedence::Lowest)?
        };

        self.expect_peek(TokenKind::Semicolon)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Semicolon)?;
        self.next_token();
        let update = self.parse_for_update()?;

        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(ForStatement {
            init,
            condition,
            update,
            body,
            position,
        })
    }

    /// Third clause of a `for` header: `$v = ...`, `$v++`, `$v--` or any
    /// other expression
    fn parse_for_update(&mut self) -> Option<Expression> {
        if !self.cur_is(TokenKind::Variable) {
            return self.parse_expression(Precedence::Lowest);
        }

        let operator = match self.peek.kind {
            TokenKind::Assign => return self.parse_assignment_from_variable(),
            TokenKind::Increment => PostfixOperator::Increment,
            TokenKind::Decrement => PostfixOperator::Decrement,
            _ => return self.parse_expression(Precedence::Lowest),
        };

        let variable = self.current_variable();
        self.next_token();
        Some(Expression::Postfix(PostfixExpression {
            left: Box::new(Expression::Variable(variable)),
            operator,
            position: self.current.position(),
        }))
    }

    fn parse_while_statement(&mut self) -> Option<WhileStatement> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(WhileStatement {
            condition,
            body,
            position,
        })
    }

    fn parse_foreach_statement(&mut self) -> Option<ForeachStatement> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let array = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::As)?;
        self.next_token();

        let key = if self.peek_is(TokenKind::DoubleArrow) {
            if !self.cur_is(TokenKind::Variable) {
                self.record(ParseError::InvalidForeachKey {
                    position: self.current.position(),
                });
                return None;
            }
            let key = self.current_variable();
            self.next_token();
            self.next_token();
            Some(key)
        } else {
            None
        };

        if !self.cur_is(TokenKind::Variable) {
            self.record(ParseError::InvalidForeachValue {
                position: self.current.position(),
            });
            return None;
        }
        let value = self.current_variable();

        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(ForeachStatement {
            array,
            key,
            value,
            body,
            position,
        })
    }

    /// Optional loop level after `break`/`continue`; only an integer literal
    /// immediately following the keyword counts, never a wider expression
    fn parse_loop_level(&mut self) -> Option<Option<Expression>> {
        if !self.peek_is(TokenKind::Int) {
            self.consume_optional_semicolon();
            return Some(None);
        }

        self.next_token();
        let level = self.parse_integer_literal();
        Some(Some(self.terminated(level)?))
    }

    fn parse_break_statement(&mut self) -> Option<BreakStatement> {
        let position = self.current.position();
        let level = self.parse_loop_level()?;
        Some(BreakStatement { level, position })
    }

    fn parse_continue_statement(&mut self) -> Option<ContinueStatement> {
        let position = self.current.position();
        let level = self.parse_loop_level()?;
        Some(ContinueStatement { level, position })
    }

    fn parse_class_declaration(&mut self) -> Option<ClassDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();

        let super_class = if self.peek_is(TokenKind::Extends) {
            self.next_token();
            Some(self.expect_peek_name()?)
        } else {
            None
        };

        let mut interfaces = Vec::new();
        if self.peek_is(TokenKind::Implements) {
            self.next_token();
            self.next_token();
            while !self.cur_is(TokenKind::LBrace) && !self.cur_is(TokenKind::Eof) {
                if self.at_name() {
                    interfaces.push(self.parse_qualified_name()?);
                }
                if self.peek_is(TokenKind::Comma) {
                    self.next_token();
                }
                if self.peek_is(TokenKind::LBrace) {
                    break;
                }
                self.next_token();
            }
        }

        self.expect_peek(TokenKind::LBrace)?;

        let mut class = ClassDeclaration {
            name,
            super_class,
            interfaces,
            trait_uses: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constants: Vec::new(),
            position,
        };

        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if self.cur_is(TokenKind::Use) {
                class.trait_uses.push(self.parse_trait_use());
            } else {
                let (visibility, is_static) = self.parse_member_modifiers();
                match self.current.kind {
                    TokenKind::Const => {
                        if let Some(constant) = self.parse_constant_declaration(visibility) {
                            class.constants.push(constant);
                        }
                    }
                    TokenKind::Function => {
                        if let Some(method) = self.parse_method_declaration(visibility, is_static) {
                            class.methods.push(method);
                        }
                    }
                    TokenKind::Variable => {
                        if let Some(property) = self.parse_property_declaration(visibility, is_static)
                        {
                            class.properties.push(property);
                        }
                    }
                    _ => {}
                }
            }
            self.next_token();
        }

        Some(class)
    }

    /// `[visibility] [static]` prefix of a class or trait member
    fn parse_member_modifiers(&mut self) -> (Visibility, bool) {
        let mut visibility = DEFAULT_VISIBILITY;
        let mut is_static = false;

        if let Some(explicit) = visibility_of(self.current.kind) {
            visibility = explicit;
            self.next_token();
        }
        if self.cur_is(TokenKind::Static) {
            is_static = true;
            self.next_token();
        }

        (visibility, is_static)
    }

    fn parse_property_declaration(
        &mut self,
        visibility: Visibility,
        is_static: bool,
    ) -> Option<PropertyDeclaration> {
        let position = self.current.position();
        let name = self.current_variable();

        let value = if self.peek_is(TokenKind::Assign) {
            self.next_token();
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest);
            Some(self.terminated(value)?)
        } else {
            self.consume_optional_semicolon();
            None
        };

        Some(PropertyDeclaration {
            visibility,
            is_static,
            name,
            value,
            position,
        })
    }

    fn parse_method_declaration(
        &mut self,
        visibility: Visibility,
        is_static: bool,
    ) -> Option<MethodDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(MethodDeclaration {
            visibility,
            is_static,
            name,
            parameters,
            body,
            position,
        })
    }

    fn parse_interface_declaration(&mut self) -> Option<InterfaceDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();
        self.expect_peek(TokenKind::LBrace)?;

        let mut methods = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(method) = self.parse_interface_method() {
                methods.push(method);
            }
            self.next_token();
        }

        Some(InterfaceDeclaration {
            name,
            methods,
            position,
        })
    }

    /// Signature-only method; anything else inside an interface body is
    /// skipped without an error
    fn parse_interface_method(&mut self) -> Option<InterfaceMethod> {
        let position = self.current.position();

        let visibility = match visibility_of(self.current.kind) {
            Some(explicit) => {
                self.next_token();
                explicit
            }
            None => DEFAULT_VISIBILITY,
        };

        if !self.cur_is(TokenKind::Function) {
            return None;
        }
        self.next_token();
        if !self.cur_is(TokenKind::Ident) {
            return None;
        }
        let name = self.current_identifier();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;
        self.consume_optional_semicolon();

        Some(InterfaceMethod {
            visibility,
            name,
            parameters,
            position,
        })
    }

    fn parse_trait_declaration(&mut self) -> Option<TraitDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();
        self.expect_peek(TokenKind::LBrace)?;

        let mut properties = Vec::new();
        let mut methods = Vec::new();

        self.next_token();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            let (visibility, is_static) = self.parse_member_modifiers();
            match self.current.kind {
                TokenKind::Variable => {
                    if let Some(property) = self.parse_property_declaration(visibility, is_static) {
                        properties.push(property);
                    }
                }
                TokenKind::Function => {
                    if let Some(method) = self.parse_method_declaration(visibility, is_static) {
                        methods.push(method);
                    }
                }
                _ => {}
            }
            self.next_token();
        }

        Some(TraitDeclaration {
            name,
            properties,
            methods,
            position,
        })
    }

    /// `use A, B\C;` inside a class body; `current` is `use`
    fn parse_trait_use(&mut self) -> TraitUse {
        let position = self.current.position();
        let mut traits = Vec::new();

        self.next_token();
        while !self.cur_is(TokenKind::Semicolon) && !self.cur_is(TokenKind::Eof) {
            if self.at_name() {
                if let Some(name) = self.parse_qualified_name() {
                    traits.push(name);
                }
            }
            if self.peek_is(TokenKind::Comma) {
                self.next_token();
            }
            self.next_token();
        }

        TraitUse { traits, position }
    }

    /// `const NAME = value;` with `current` on `const`
    fn parse_constant_declaration(&mut self, visibility: Visibility) -> Option<ConstantDeclaration> {
        let position = self.current.position();

        self.expect_peek(TokenKind::Ident)?;
        let name = self.current_identifier();

        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest);
        let value = self.terminated(value)?;

        Some(ConstantDeclaration {
            visibility,
            name,
            value,
            position,
        })
    }

    fn parse_namespace_declaration(&mut self) -> Option<NamespaceDeclaration> {
        let position = self.current.position();
        let name = self.expect_peek_name()?;
        self.consume_optional_semicolon();

        Some(NamespaceDeclaration { name, position })
    }

    fn parse_use_statement(&mut self) -> Option<UseStatement> {
        let position = self.current.position();
        let namespace = self.expect_peek_name()?;

        let alias = if self.peek_is(TokenKind::As) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            Some(self.current_identifier())
        } else {
            None
        };
        self.consume_optional_semicolon();

        Some(UseStatement {
            namespace,
            alias,
            position,
        })
    }

    fn parse_try_statement(&mut self) -> Option<TryStatement> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        let mut catches = Vec::new();
        while self.peek_is(TokenKind::Catch) {
            self.next_token();
            if let Some(clause) = self.parse_catch_clause() {
                catches.push(clause);
            }
        }

        let mut finally = None;
        if self.peek_is(TokenKind::Finally) {
            self.next_token();
            if self.expect_peek(TokenKind::LBrace).is_some() {
                finally = Some(self.parse_block_statement());
            }
        }

        Some(TryStatement {
            body,
            catches,
            finally,
            position,
        })
    }

    fn parse_catch_clause(&mut self) -> Option<CatchClause> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        self.next_token();

        let exception_type = if self.at_name() {
            let name = self.parse_qualified_name()?;
            self.next_token();
            Some(name)
        } else {
            None
        };

        if !self.cur_is(TokenKind::Variable) {
            self.record(ParseError::MissingCatchVariable {
                position: self.current.position(),
            });
            return None;
        }
        let variable = self.current_variable();

        self.expect_peek(TokenKind::RParen)?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(CatchClause {
            exception_type,
            variable,
            body,
            position,
        })
    }

    fn parse_throw_statement(&mut self) -> Option<ThrowStatement> {
        let position = self.current.position();

        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest);
        let expression = self.terminated(expression)?;

        Some(ThrowStatement {
            expression,
            position,
        })
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Parse an expression whose operators all bind tighter than `precedence`
    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.next_token();
            left = self.parse_infix(left)?;
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        let position = self.current.position();
        match self.current.kind {
            TokenKind::Ident | TokenKind::NamespaceSeparator => self.parse_identifier_expression(),
            TokenKind::Variable => Some(Expression::Variable(self.current_variable())),
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::Float => self.parse_float_literal(),
            TokenKind::String => Some(self.parse_string_literal()),
            TokenKind::True | TokenKind::False => Some(Expression::BooleanLiteral(BooleanLiteral {
                value: self.cur_is(TokenKind::True),
                position,
            })),
            TokenKind::Null => Some(Expression::NullLiteral(NullLiteral { position })),
            TokenKind::Not => self.parse_prefix_expression(PrefixOperator::Not),
            TokenKind::Minus => self.parse_prefix_expression(PrefixOperator::Negate),
            TokenKind::Increment => self.parse_prefix_expression(PrefixOperator::Increment),
            TokenKind::Decrement => self.parse_prefix_expression(PrefixOperator::Decrement),
            TokenKind::New => self.parse_new_expression(),
            TokenKind::Function => self.parse_anonymous_function(),
            TokenKind::Yield => self.parse_yield_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::LBracket => self.parse_array_literal(),
            kind => {
                self.record(ParseError::NoPrefixParser { kind, position });
                None
            }
        }
    }

    /// Continue `left` with the operator in `current`
    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let operator = match self.current.kind {
            TokenKind::Plus => InfixOperator::Add,
            TokenKind::Minus => InfixOperator::Subtract,
            TokenKind::Multiply => InfixOperator::Multiply,
            TokenKind::Divide => InfixOperator::Divide,
            TokenKind::Modulo => InfixOperator::Modulo,
            TokenKind::Concat => InfixOperator::Concat,
            TokenKind::Eq => InfixOperator::Equal,
            TokenKind::NotEq => InfixOperator::NotEqual,
            TokenKind::Lt => InfixOperator::Less,
            TokenKind::Gt => InfixOperator::Greater,
            TokenKind::Lte => InfixOperator::LessEqual,
            TokenKind::Gte => InfixOperator::GreaterEqual,
            TokenKind::Spaceship => InfixOperator::Spaceship,
            TokenKind::And => InfixOperator::And,
            TokenKind::Or => InfixOperator::Or,
            TokenKind::QuestionQuestion => InfixOperator::Coalesce,
            TokenKind::Question => return self.parse_ternary_expression(left),
            TokenKind::Assign => return self.parse_assignment_expression(left),
            TokenKind::QuestionQuestionAssign => return self.parse_coalesce_assignment(left),
            TokenKind::LParen => return self.parse_call_expression(left),
            TokenKind::LBracket => return self.parse_index_expression(left),
            TokenKind::Increment => return Some(self.postfix(left, PostfixOperator::Increment)),
            TokenKind::Decrement => return Some(self.postfix(left, PostfixOperator::Decrement)),
            TokenKind::ObjectAccess => return self.parse_object_access(left, false),
            TokenKind::QuestionArrow => return self.parse_object_access(left, true),
            TokenKind::StaticAccess => return self.parse_static_access(left),
            _ => return Some(left),
        };
        self.parse_infix_expression(left, operator)
    }

    /// Bare or `\`-qualified name in expression position
    fn parse_identifier_expression(&mut self) -> Option<Expression> {
        let position = self.current.position();
        let absolute = self.cur_is(TokenKind::NamespaceSeparator);
        if absolute {
            self.expect_peek(TokenKind::Ident)?;
        }

        let mut segments = vec![self.current_identifier()];
        while self.peek_is(TokenKind::NamespaceSeparator) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            segments.push(self.current_identifier());
        }

        if !absolute && segments.len() == 1 {
            return segments.pop().map(Expression::Identifier);
        }

        let name = segments.pop()?;
        Some(Expression::NamespacedIdentifier(NamespacedIdentifier {
            namespace: segments,
            name,
            absolute,
            position,
        }))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        let position = self.current.position();
        let literal = &self.current.literal;

        // A leading zero selects octal, as in the source language
        let parsed = match literal.strip_prefix('0') {
            Some(digits) if !digits.is_empty() => i64::from_str_radix(digits, 8),
            _ => literal.parse::<i64>(),
        };

        match parsed {
            Ok(value) => Some(Expression::IntegerLiteral(IntegerLiteral { value, position })),
            Err(_) => {
                let literal = literal.clone();
                self.record(ParseError::InvalidInteger { literal, position });
                None
            }
        }
    }

    fn parse_float_literal(&mut self) -> Option<Expression> {
        let position = self.current.position();
        match self.current.literal.parse::<f64>() {
            Ok(value) => Some(Expression::FloatLiteral(FloatLiteral { value, position })),
            Err(_) => {
                let literal = self.current.literal.clone();
                self.record(ParseError::InvalidFloat { literal, position });
                None
            }
        }
    }

    fn parse_string_literal(&self) -> Expression {
        let position = self.current.position();
        if self.current.literal.contains('$') {
            return Expression::InterpolatedString(split_interpolated(
                &self.current.literal,
                position,
            ));
        }

        Expression::StringLiteral(StringLiteral {
            value: self.current.literal.clone(),
            position,
        })
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> Option<Expression> {
        let position = self.current.position();

        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;

        Some(Expression::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
            position,
        }))
    }

    fn parse_infix_expression(
        &mut self,
        left: Expression,
        operator: InfixOperator,
    ) -> Option<Expression> {
        let position = self.current.position();
        let precedence = self.cur_precedence();

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            position,
        }))
    }

    fn parse_assignment_expression(&mut self, left: Expression) -> Option<Expression> {
        let position = self.current.position();
        let Expression::Variable(name) = left else {
            self.record(ParseError::InvalidAssignmentTarget { position });
            return None;
        };

        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;

        Some(Expression::Assignment(AssignmentExpression {
            name,
            value: Box::new(value),
            position,
        }))
    }

    /// `$a ??= b` becomes `$a = $a ?? b`
    fn parse_coalesce_assignment(&mut self, left: Expression) -> Option<Expression> {
        let position = self.current.position();
        let Expression::Variable(name) = left else {
            self.record(ParseError::InvalidAssignmentTarget { position });
            return None;
        };

        self.next_token();
        let fallback = self.parse_expression(Precedence::Lowest)?;

        let value = InfixExpression {
            left: Box::new(Expression::Variable(name.clone())),
            operator: InfixOperator::Coalesce,
            right: Box::new(fallback),
            position,
        };
        Some(Expression::Assignment(AssignmentExpression {
            name,
            value: Box::new(Expression::Infix(value)),
            position,
        }))
    }

    fn parse_ternary_expression(&mut self, condition: Expression) -> Option<Expression> {
        let position = self.current.position();

        self.next_token();
        let true_value = self.parse_expression(Precedence::Lowest)?;

        self.expect_peek(TokenKind::Colon)?;
        self.next_token();
        let false_value = self.parse_expression(Precedence::Lowest)?;

        Some(Expression::Ternary(TernaryExpression {
            condition: Box::new(condition),
            true_value: Box::new(true_value),
            false_value: Box::new(false_value),
            position,
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expression)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let position = self.current.position();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;

        Some(Expression::Call(CallExpression {
            function: Box::new(function),
            arguments,
            position,
        }))
    }

    /// Comma-separated expressions up to `end`; `current` is the opener
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut items = Vec::new();

        if self.peek_is(end) {
            self.next_token();
            return Some(items);
        }

        self.next_token();
        items.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            items.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(end)?;
        Some(items)
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let position = self.current.position();

        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;

        Some(Expression::Index(IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
            position,
        }))
    }

    fn postfix(&self, left: Expression, operator: PostfixOperator) -> Expression {
        Expression::Postfix(PostfixExpression {
            left: Box::new(left),
            operator,
            position: self.current.position(),
        })
    }

    fn parse_object_access(&mut self, object: Expression, nullsafe: bool) -> Option<Expression> {
        let position = self.current.position();

        self.next_token();
        let property = self.parse_expression(Precedence::Call)?;

        Some(Expression::ObjectAccess(ObjectAccessExpression {
            object: Box::new(object),
            property: Box::new(property),
            nullsafe,
            position,
        }))
    }

    fn parse_static_access(&mut self, class: Expression) -> Option<Expression> {
        let position = self.current.position();

        self.next_token();
        let property = self.parse_expression(Precedence::Call)?;

        Some(Expression::StaticAccess(StaticAccessExpression {
            class: Box::new(class),
            property: Box::new(property),
            position,
        }))
    }

    /// `[]`, `[a, b]` or `[k => v, ...]`; the first element decides which
    fn parse_array_literal(&mut self) -> Option<Expression> {
        let position = self.current.position();

        if self.peek_is(TokenKind::RBracket) {
            self.next_token();
            return Some(Expression::Array(ArrayLiteral {
                elements: Vec::new(),
                position,
            }));
        }

        self.next_token();
        let first = self.parse_expression(Precedence::Lowest)?;

        if !self.peek_is(TokenKind::DoubleArrow) {
            let mut elements = vec![first];
            while self.peek_is(TokenKind::Comma) {
                self.next_token();
                self.next_token();
                elements.push(self.parse_expression(Precedence::Lowest)?);
            }
            self.expect_peek(TokenKind::RBracket)?;
            return Some(Expression::Array(ArrayLiteral { elements, position }));
        }

        self.next_token();
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        let mut pairs = vec![ArrayPair { key: first, value }];

        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::DoubleArrow)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push(ArrayPair { key, value });
        }
        self.expect_peek(TokenKind::RBracket)?;

        Some(Expression::AssociativeArray(AssociativeArrayLiteral {
            pairs,
            position,
        }))
    }

    fn parse_new_expression(&mut self) -> Option<Expression> {
        let position = self.current.position();
        let class_name = self.expect_peek_name()?;

        let arguments = if self.peek_is(TokenKind::LParen) {
            self.next_token();
            self.parse_expression_list(TokenKind::RParen)?
        } else {
            Vec::new()
        };

        Some(Expression::New(NewExpression {
            class_name,
            arguments,
            position,
        }))
    }

    fn parse_anonymous_function(&mut self) -> Option<Expression> {
        let position = self.current.position();

        self.expect_peek(TokenKind::LParen)?;
        let parameters = self.parse_function_parameters()?;

        let mut use_clause = Vec::new();
        if self.peek_is(TokenKind::Use) {
            self.next_token();
            self.expect_peek(TokenKind::LParen)?;
            self.next_token();
            while !self.cur_is(TokenKind::RParen) && !self.cur_is(TokenKind::Eof) {
                if self.cur_is(TokenKind::Variable) {
                    use_clause.push(self.current_variable());
                }
                if self.peek_is(TokenKind::Comma) {
                    self.next_token();
                }
                self.next_token();
            }
        }

        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block_statement();

        Some(Expression::AnonymousFunction(AnonymousFunction {
            parameters,
            use_clause,
            body,
            position,
        }))
    }

    fn parse_yield_expression(&mut self) -> Option<Expression> {
        let position = self.current.position();
        let mut key = None;
        let mut value = None;

        if !self.peek_is(TokenKind::Semicolon)
            && !self.peek_is(TokenKind::RBrace)
            && !self.peek_is(TokenKind::Eof)
        {
            self.next_token();
            let first = self.parse_expression(Precedence::Lowest)?;

            if self.peek_is(TokenKind::DoubleArrow) {
                self.next_token();
                self.next_token();
                key = Some(Box::new(first));
                value = Some(Box::new(self.parse_expression(Precedence::Lowest)?));
            } else {
                value = Some(Box::new(first));
            }
        }

        Some(Expression::Yield(YieldExpression {
            key,
            value,
            position,
        }))
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn at_name(&self) -> bool {
        self.cur_is(TokenKind::Ident) || self.cur_is(TokenKind::NamespaceSeparator)
    }

    /// Advance onto a (possibly qualified) name and parse it
    fn expect_peek_name(&mut self) -> Option<Identifier> {
        if self.peek_is(TokenKind::Ident) || self.peek_is(TokenKind::NamespaceSeparator) {
            self.next_token();
            self.parse_qualified_name()
        } else {
            self.peek_error(TokenKind::Ident);
            None
        }
    }

    /// `A\B\C` or `\A\B` as a single identifier holding the joined text;
    /// leaves `current` on the last segment
    fn parse_qualified_name(&mut self) -> Option<Identifier> {
        let position = self.current.position();
        let mut value = String::new();

        if self.cur_is(TokenKind::NamespaceSeparator) {
            value.push('\\');
            self.expect_peek(TokenKind::Ident)?;
        }
        value.push_str(&self.current.literal);

        while self.peek_is(TokenKind::NamespaceSeparator) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            value.push('\\');
            value.push_str(&self.current.literal);
        }

        Some(Identifier::new(value, position))
    }

    fn current_identifier(&self) -> Identifier {
        Identifier::new(self.current.literal.clone(), self.current.position())
    }

    fn current_variable(&self) -> Variable {
        let literal = &self.current.literal;
        let name = literal.strip_prefix('$').unwrap_or(literal);
        Variable::new(name, self.current.position())
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Advance if the next token is `kind`, otherwise record an error
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next_token();
            Some(())
        } else {
            self.peek_error(kind);
            None
        }
    }

    fn peek_error(&mut self, expected: TokenKind) {
        self.record(ParseError::UnexpectedToken {
            expected,
            found: self.peek.kind,
            position: self.peek.position(),
        });
    }

    fn consume_optional_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
    }

    /// Consume the statement terminator whether or not `node` parsed, so a
    /// failed expression does not leave a stray `;` behind
    fn terminated<T>(&mut self, node: Option<T>) -> Option<T> {
        self.consume_optional_semicolon();
        node
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    fn cur_precedence(&self) -> Precedence {
        Precedence::of(self.current.kind)
    }

    fn record(&mut self, error: ParseError) {
        debug!(%error, position = %error.position(), "parse error");
        self.errors.push(error);
    }
}

fn visibility_of(kind: TokenKind) -> Option<Visibility> {
    match kind {
        TokenKind::Public => Some(Visibility::Public),
        TokenKind::Protected => Some(Visibility::Protected),
        TokenKind::Private => Some(Visibility::Private),
        _ => None,
    }
}

/// Split a string literal on `$` into literal and variable fragments
///
/// After each `$` the longest run of identifier bytes (no digit first)
/// becomes a variable; a `$` with no such run stays literal text.
fn split_interpolated(literal: &str, position: SourcePosition) -> InterpolatedString {
    let mut parts = Vec::new();
    let mut chunks = literal.split('$');

    if let Some(head) = chunks.next() {
        if !head.is_empty() {
            parts.push(string_part(head, position));
        }
    }

    for chunk in chunks {
        let bytes = chunk.as_bytes();
        let mut end = 0;
        while end < bytes.len() && (is_letter(bytes[end]) || (end > 0 && bytes[end].is_ascii_digit()))
        {
            end += 1;
        }

        if end == 0 {
            parts.push(string_part(&format!("${chunk}"), position));
            continue;
        }

        parts.push(Expression::Variable(Variable::new(&chunk[..end], position)));
        if end < chunk.len() {
            parts.push(string_part(&chunk[end..], position));
        }
    }

    InterpolatedString { parts, position }
}

fn string_part(value: &str, position: SourcePosition) -> Expression {
    Expression::StringLiteral(StringLiteral {
        value: value.to_string(),
        position,
    })
}
