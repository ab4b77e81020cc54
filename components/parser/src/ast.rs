//! Abstract Syntax Tree node definitions
//!
//! Every node kind is its own struct that serializes as an object carrying a
//! `"type"` discriminator equal to the struct name. [`Statement`] and
//! [`Expression`] are closed families over those structs. Positions are kept
//! for diagnostics and semantic analysis but never serialized.

use core_types::SourcePosition;
use serde::Serialize;
use std::fmt;

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Program {
    /// Top-level statements in source order
    pub statements: Vec<Statement>,
}

impl Program {
    /// Create a program from its statements
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Number of top-level statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True when nothing was parsed
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// public
    Public,
    /// protected
    Protected,
    /// private
    Private,
}

impl Visibility {
    /// Keyword text
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    /// +
    #[serde(rename = "+")]
    Add,
    /// -
    #[serde(rename = "-")]
    Subtract,
    /// *
    #[serde(rename = "*")]
    Multiply,
    /// /
    #[serde(rename = "/")]
    Divide,
    /// %
    #[serde(rename = "%")]
    Modulo,
    /// . (string concatenation)
    #[serde(rename = ".")]
    Concat,
    /// ==
    #[serde(rename = "==")]
    Equal,
    /// !=
    #[serde(rename = "!=")]
    NotEqual,
    /// <
    #[serde(rename = "<")]
    Less,
    /// >
    #[serde(rename = ">")]
    Greater,
    /// <=
    #[serde(rename = "<=")]
    LessEqual,
    /// >=
    #[serde(rename = ">=")]
    GreaterEqual,
    /// <=>
    #[serde(rename = "<=>")]
    Spaceship,
    /// &&
    #[serde(rename = "&&")]
    And,
    /// ||
    #[serde(rename = "||")]
    Or,
    /// ??
    #[serde(rename = "??")]
    Coalesce,
}

impl InfixOperator {
    /// Operator text as written in source
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Concat => ".",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
            InfixOperator::Less => "<",
            InfixOperator::Greater => ">",
            InfixOperator::LessEqual => "<=",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::Spaceship => "<=>",
            InfixOperator::And => "&&",
            InfixOperator::Or => "||",
            InfixOperator::Coalesce => "??",
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    /// !
    #[serde(rename = "!")]
    Not,
    /// -
    #[serde(rename = "-")]
    Negate,
    /// ++
    #[serde(rename = "++")]
    Increment,
    /// --
    #[serde(rename = "--")]
    Decrement,
}

impl PrefixOperator {
    /// Operator text as written in source
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOperator::Not => "!",
            PrefixOperator::Negate => "-",
            PrefixOperator::Increment => "++",
            PrefixOperator::Decrement => "--",
        }
    }
}

/// Unary postfix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOperator {
    /// ++
    #[serde(rename = "++")]
    Increment,
    /// --
    #[serde(rename = "--")]
    Decrement,
}

impl PostfixOperator {
    /// Operator text as written in source
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOperator::Increment => "++",
            PostfixOperator::Decrement => "--",
        }
    }
}

// =============================================================================
// Leaf nodes
// =============================================================================

/// Bare name, e.g. a function or class name. Qualified names keep their
/// `\` separators in `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Identifier {
    /// Name text
    pub value: String,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

impl Identifier {
    /// Create an identifier
    pub fn new(value: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }

    /// True for names written with a leading `\`
    pub fn is_fully_qualified(&self) -> bool {
        self.value.starts_with('\\')
    }
}

/// `$name` reference; the sigil is stripped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct Variable {
    /// Name without the `$`
    pub name: String,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

impl Variable {
    /// Create a variable
    pub fn new(name: impl Into<String>, position: SourcePosition) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Integer literal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IntegerLiteral {
    /// Parsed value
    pub value: i64,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Float literal
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FloatLiteral {
    /// Parsed value
    pub value: f64,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// String literal with raw (uninterpreted) content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StringLiteral {
    /// Raw content
    pub value: String,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `true` / `false`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BooleanLiteral {
    /// Literal value
    pub value: bool,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NullLiteral {
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// String split into alternating literal and variable fragments
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InterpolatedString {
    /// `StringLiteral` and `Variable` parts in source order
    pub parts: Vec<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `A\B\name` used as an expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NamespacedIdentifier {
    /// Leading path segments
    pub namespace: Vec<Identifier>,
    /// Final segment
    pub name: Identifier,
    /// Written with a leading `\`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub absolute: bool,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

impl NamespacedIdentifier {
    /// Joined path text, e.g. `\HR\User`
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        if self.absolute {
            out.push('\\');
        }
        for segment in &self.namespace {
            out.push_str(&segment.value);
            out.push('\\');
        }
        out.push_str(&self.name.value);
        out
    }
}

// =============================================================================
// Composite expressions
// =============================================================================

/// `$name = value`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssignmentExpression {
    /// Assigned variable
    pub name: Variable,
    /// Right-hand side
    pub value: Box<Expression>,
    /// Position of the `=` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `left <op> right`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InfixExpression {
    /// Left operand
    pub left: Box<Expression>,
    /// Operator
    pub operator: InfixOperator,
    /// Right operand
    pub right: Box<Expression>,
    /// Position of the operator token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `<op> right`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PrefixExpression {
    /// Operator
    pub operator: PrefixOperator,
    /// Operand
    pub right: Box<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `left <op>`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PostfixExpression {
    /// Operand
    pub left: Box<Expression>,
    /// Operator
    pub operator: PostfixOperator,
    /// Position of the operator token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `condition ? true_value : false_value`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TernaryExpression {
    /// Tested expression
    pub condition: Box<Expression>,
    /// Result when truthy
    pub true_value: Box<Expression>,
    /// Result when falsy
    pub false_value: Box<Expression>,
    /// Position of the `?` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `function(arguments)`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CallExpression {
    /// Callee
    pub function: Box<Expression>,
    /// Arguments in order
    pub arguments: Vec<Expression>,
    /// Position of the `(` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `new ClassName(arguments)`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NewExpression {
    /// Instantiated class name
    pub class_name: Identifier,
    /// Constructor arguments (empty when no parentheses were written)
    pub arguments: Vec<Expression>,
    /// Position of the `new` keyword
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `object->property` or `object?->property`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ObjectAccessExpression {
    /// Accessed object
    pub object: Box<Expression>,
    /// Member expression
    pub property: Box<Expression>,
    /// Written with `?->`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub nullsafe: bool,
    /// Position of the arrow token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `Class::property`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct StaticAccessExpression {
    /// Class expression
    pub class: Box<Expression>,
    /// Member expression
    pub property: Box<Expression>,
    /// Position of the `::` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ArrayLiteral {
    /// Elements in order
    pub elements: Vec<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// One `key => value` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayPair {
    /// Key expression
    pub key: Expression,
    /// Value expression
    pub value: Expression,
}

/// `[k => v, ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AssociativeArrayLiteral {
    /// Entries in order
    pub pairs: Vec<ArrayPair>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `left[index]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IndexExpression {
    /// Indexed expression
    pub left: Box<Expression>,
    /// Index expression
    pub index: Box<Expression>,
    /// Position of the `[` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `function (params) use ($a) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct AnonymousFunction {
    /// Parameters
    pub parameters: Vec<Variable>,
    /// Captured variables
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub use_clause: Vec<Variable>,
    /// Function body
    pub body: BlockStatement,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `yield`, `yield value`, `yield key => value`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct YieldExpression {
    /// Yielded key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Box<Expression>>,
    /// Yielded value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Box<Expression>>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    /// Bare name
    Identifier(Identifier),
    /// Qualified name
    NamespacedIdentifier(NamespacedIdentifier),
    /// `$name`
    Variable(Variable),
    /// Integer literal
    IntegerLiteral(IntegerLiteral),
    /// Float literal
    FloatLiteral(FloatLiteral),
    /// String literal
    StringLiteral(StringLiteral),
    /// Boolean literal
    BooleanLiteral(BooleanLiteral),
    /// `null`
    NullLiteral(NullLiteral),
    /// String with embedded variables
    InterpolatedString(InterpolatedString),
    /// Assignment
    Assignment(AssignmentExpression),
    /// Binary operation
    Infix(InfixExpression),
    /// Prefix operation
    Prefix(PrefixExpression),
    /// Postfix operation
    Postfix(PostfixExpression),
    /// Conditional
    Ternary(TernaryExpression),
    /// Call
    Call(CallExpression),
    /// Instantiation
    New(NewExpression),
    /// Instance member access
    ObjectAccess(ObjectAccessExpression),
    /// Static member access
    StaticAccess(StaticAccessExpression),
    /// Indexed array literal
    Array(ArrayLiteral),
    /// Associative array literal
    AssociativeArray(AssociativeArrayLiteral),
    /// Subscript
    Index(IndexExpression),
    /// Closure
    AnonymousFunction(AnonymousFunction),
    /// Generator yield
    Yield(YieldExpression),
}

impl Expression {
    /// Position of the token that introduced this expression
    pub fn position(&self) -> SourcePosition {
        match self {
            Expression::Identifier(e) => e.position,
            Expression::NamespacedIdentifier(e) => e.position,
            Expression::Variable(e) => e.position,
            Expression::IntegerLiteral(e) => e.position,
            Expression::FloatLiteral(e) => e.position,
            Expression::StringLiteral(e) => e.position,
            Expression::BooleanLiteral(e) => e.position,
            Expression::NullLiteral(e) => e.position,
            Expression::InterpolatedString(e) => e.position,
            Expression::Assignment(e) => e.position,
            Expression::Infix(e) => e.position,
            Expression::Prefix(e) => e.position,
            Expression::Postfix(e) => e.position,
            Expression::Ternary(e) => e.position,
            Expression::Call(e) => e.position,
            Expression::New(e) => e.position,
            Expression::ObjectAccess(e) => e.position,
            Expression::StaticAccess(e) => e.position,
            Expression::Array(e) => e.position,
            Expression::AssociativeArray(e) => e.position,
            Expression::Index(e) => e.position,
            Expression::AnonymousFunction(e) => e.position,
            Expression::Yield(e) => e.position,
        }
    }

    /// Node type name as it appears in serialized output
    pub fn type_name(&self) -> &'static str {
        match self {
            Expression::Identifier(_) => "Identifier",
            Expression::NamespacedIdentifier(_) => "NamespacedIdentifier",
            Expression::Variable(_) => "Variable",
            Expression::IntegerLiteral(_) => "IntegerLiteral",
            Expression::FloatLiteral(_) => "FloatLiteral",
            Expression::StringLiteral(_) => "StringLiteral",
            Expression::BooleanLiteral(_) => "BooleanLiteral",
            Expression::NullLiteral(_) => "NullLiteral",
            Expression::InterpolatedString(_) => "InterpolatedString",
            Expression::Assignment(_) => "AssignmentExpression",
            Expression::Infix(_) => "InfixExpression",
            Expression::Prefix(_) => "PrefixExpression",
            Expression::Postfix(_) => "PostfixExpression",
            Expression::Ternary(_) => "TernaryExpression",
            Expression::Call(_) => "CallExpression",
            Expression::New(_) => "NewExpression",
            Expression::ObjectAccess(_) => "ObjectAccessExpression",
            Expression::StaticAccess(_) => "StaticAccessExpression",
            Expression::Array(_) => "ArrayLiteral",
            Expression::AssociativeArray(_) => "AssociativeArrayLiteral",
            Expression::Index(_) => "IndexExpression",
            Expression::AnonymousFunction(_) => "AnonymousFunction",
            Expression::Yield(_) => "YieldExpression",
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

/// `{ statements }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BlockStatement {
    /// Statements in order
    pub statements: Vec<Statement>,
    /// Position of the `{` token
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Expression used as a statement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ExpressionStatement {
    /// The expression
    pub expression: Expression,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `function name(params) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct FunctionDeclaration {
    /// Function name
    pub name: Identifier,
    /// Parameters
    pub parameters: Vec<Variable>,
    /// Body
    pub body: BlockStatement,
    /// Position of the `function` keyword
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `return [value];`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ReturnStatement {
    /// Returned value, `null` when absent
    pub return_value: Option<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `if (condition) { } [else { }]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct IfStatement {
    /// Tested expression
    pub condition: Expression,
    /// Then-block
    pub consequence: BlockStatement,
    /// Else-block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<BlockStatement>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `for (init; condition; update) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForStatement {
    /// Initializer
    pub init: Expression,
    /// Loop condition
    pub condition: Expression,
    /// Step expression
    pub update: Expression,
    /// Body
    pub body: BlockStatement,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `while (condition) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct WhileStatement {
    /// Loop condition
    pub condition: Expression,
    /// Body
    pub body: BlockStatement,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `foreach (array as [$key =>] $value) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ForeachStatement {
    /// Iterated expression
    pub array: Expression,
    /// Key variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<Variable>,
    /// Value variable
    pub value: Variable,
    /// Body
    pub body: BlockStatement,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `break [level];`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct BreakStatement {
    /// Number of enclosing loops to leave
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `continue [level];`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ContinueStatement {
    /// Number of enclosing loops to skip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `echo a, b;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct EchoStatement {
    /// Echoed expressions
    pub values: Vec<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Class declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ClassDeclaration {
    /// Class name
    pub name: Identifier,
    /// `extends` target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_class: Option<Identifier>,
    /// `implements` list
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Identifier>,
    /// `use Trait;` clauses
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trait_uses: Vec<TraitUse>,
    /// Properties
    pub properties: Vec<PropertyDeclaration>,
    /// Methods
    pub methods: Vec<MethodDeclaration>,
    /// Class constants
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<ConstantDeclaration>,
    /// Position of the `class` keyword
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `[visibility] [static] $name [= value];`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct PropertyDeclaration {
    /// Visibility
    pub visibility: Visibility,
    /// Declared static
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Property variable
    pub name: Variable,
    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Expression>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `[visibility] [static] function name(params) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct MethodDeclaration {
    /// Visibility
    pub visibility: Visibility,
    /// Declared static
    #[serde(rename = "static")]
    pub is_static: bool,
    /// Method name
    pub name: Identifier,
    /// Parameters
    pub parameters: Vec<Variable>,
    /// Body
    pub body: BlockStatement,
    /// Position of the `function` keyword
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Interface declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InterfaceDeclaration {
    /// Interface name
    pub name: Identifier,
    /// Method signatures
    pub methods: Vec<InterfaceMethod>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Body-less method signature inside an interface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct InterfaceMethod {
    /// Visibility
    pub visibility: Visibility,
    /// Method name
    pub name: Identifier,
    /// Parameters
    pub parameters: Vec<Variable>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Trait declaration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TraitDeclaration {
    /// Trait name
    pub name: Identifier,
    /// Properties
    pub properties: Vec<PropertyDeclaration>,
    /// Methods
    pub methods: Vec<MethodDeclaration>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `use A, B;` inside a class body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TraitUse {
    /// Used trait names
    pub traits: Vec<Identifier>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `const NAME = value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ConstantDeclaration {
    /// Visibility (class constants only; `public` elsewhere)
    pub visibility: Visibility,
    /// Constant name
    pub name: Identifier,
    /// Value
    pub value: Expression,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `namespace Name;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct NamespaceDeclaration {
    /// Namespace path
    pub name: Identifier,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `use Path [as Alias];`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct UseStatement {
    /// Imported path
    pub namespace: Identifier,
    /// Local alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<Identifier>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `try { } catch (...) { } [finally { }]`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct TryStatement {
    /// Guarded block
    pub body: BlockStatement,
    /// Catch clauses in order
    pub catches: Vec<CatchClause>,
    /// Finally block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finally: Option<BlockStatement>,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `catch ([Type] $var) { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct CatchClause {
    /// Caught class name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<Identifier>,
    /// Bound variable
    pub variable: Variable,
    /// Handler body
    pub body: BlockStatement,
    /// Position of the `catch` keyword
    #[serde(skip)]
    pub position: SourcePosition,
}

/// `throw expression;`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub struct ThrowStatement {
    /// Thrown value
    pub expression: Expression,
    /// Source position
    #[serde(skip)]
    pub position: SourcePosition,
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    /// Expression statement
    Expression(ExpressionStatement),
    /// Braced block
    Block(BlockStatement),
    /// Function declaration
    Function(FunctionDeclaration),
    /// Return
    Return(ReturnStatement),
    /// If/else
    If(IfStatement),
    /// For loop
    For(ForStatement),
    /// While loop
    While(WhileStatement),
    /// Foreach loop
    Foreach(ForeachStatement),
    /// Break
    Break(BreakStatement),
    /// Continue
    Continue(ContinueStatement),
    /// Echo
    Echo(EchoStatement),
    /// Class declaration
    Class(ClassDeclaration),
    /// Interface declaration
    Interface(InterfaceDeclaration),
    /// Trait declaration
    Trait(TraitDeclaration),
    /// Constant declaration
    Constant(ConstantDeclaration),
    /// Namespace declaration
    Namespace(NamespaceDeclaration),
    /// Use/import
    Use(UseStatement),
    /// Try/catch/finally
    Try(TryStatement),
    /// Throw
    Throw(ThrowStatement),
}

impl Statement {
    /// Position of the token that introduced this statement
    pub fn position(&self) -> SourcePosition {
        match self {
            Statement::Expression(s) => s.position,
            Statement::Block(s) => s.position,
            Statement::Function(s) => s.position,
            Statement::Return(s) => s.position,
            Statement::If(s) => s.position,
            Statement::For(s) => s.position,
            Statement::While(s) => s.position,
            Statement::Foreach(s) => s.position,
            Statement::Break(s) => s.position,
            Statement::Continue(s) => s.position,
            Statement::Echo(s) => s.position,
            Statement::Class(s) => s.position,
            Statement::Interface(s) => s.position,
            Statement::Trait(s) => s.position,
            Statement::Constant(s) => s.position,
            Statement::Namespace(s) => s.position,
            Statement::Use(s) => s.position,
            Statement::Try(s) => s.position,
            Statement::Throw(s) => s.position,
        }
    }
}
