//! AST node definitions.
//!
//! Nodes are arena-allocated and reference their children through `&'a`
//! references and arena slices. Every node starts with a [`NodeData`] that
//! carries its identity and source span. Comments are not stored on nodes;
//! they are associated by [`NodeId`] in a side table (see `comments`).

use crate::operators::*;
use crate::types::ModifierFlags;
use parsley_core::{Atom, SourceSpan};

// ============================================================================
// Core node data
// ============================================================================

/// Identity of a finished node. Unique within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Common data shared by all AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub id: NodeId,
    pub span: SourceSpan,
}

impl NodeData {
    pub fn new(id: NodeId, span: SourceSpan) -> Self {
        Self { id, span }
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

macro_rules! impl_node_data {
    ($ty:ident { $($variant:ident),* $(,)? } $(bare { $($bare:ident),* $(,)? })?) => {
        impl<'a> $ty<'a> {
            pub fn data(&self) -> &NodeData {
                match self {
                    $( $ty::$variant(node) => &node.data, )*
                    $($( $ty::$bare(data) => data, )*)?
                }
            }

            #[inline]
            pub fn span(&self) -> SourceSpan {
                self.data().span
            }
        }
    };
}

// ============================================================================
// Names and literals
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier {
    pub data: NodeData,
    pub name: Atom,
}

/// `#name` inside a class body.
#[derive(Debug, Clone, Copy)]
pub struct PrivateName {
    pub data: NodeData,
    pub name: Atom,
}

#[derive(Debug, Clone, Copy)]
pub struct StringLiteral<'a> {
    pub data: NodeData,
    pub value: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct NumericLiteral<'a> {
    pub data: NodeData,
    pub value: f64,
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct BigIntLiteral<'a> {
    pub data: NodeData,
    /// Digits without the `n` suffix or separators.
    pub value: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct BooleanLiteral {
    pub data: NodeData,
    pub value: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RegExpLiteral<'a> {
    pub data: NodeData,
    pub pattern: &'a str,
    pub flags: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateElement<'a> {
    pub data: NodeData,
    /// `None` when the chunk contains an escape that is only legal in tagged templates.
    pub cooked: Option<&'a str>,
    pub raw: &'a str,
    pub tail: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct TemplateLiteral<'a> {
    pub data: NodeData,
    pub quasis: NodeList<'a, TemplateElement<'a>>,
    pub expressions: NodeList<'a, Expression<'a>>,
}

/// `%%name%%` in template sources.
#[derive(Debug, Clone, Copy)]
pub struct Placeholder {
    pub data: NodeData,
    pub name: Identifier,
}

// ============================================================================
// Program-level nodes
// ============================================================================

/// `#!/usr/bin/env node` on the first line.
#[derive(Debug, Clone, Copy)]
pub struct InterpreterDirective<'a> {
    pub data: NodeData,
    pub value: &'a str,
}

/// A `"use strict"`-style prologue entry.
#[derive(Debug, Clone, Copy)]
pub struct Directive<'a> {
    pub data: NodeData,
    /// Raw text between the quotes.
    pub value: &'a str,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Statement<'a> {
    Block(BlockStatement<'a>),
    Empty(NodeData),
    Expression(ExpressionStatement<'a>),
    If(IfStatement<'a>),
    For(ForStatement<'a>),
    ForIn(ForInStatement<'a>),
    ForOf(ForOfStatement<'a>),
    While(WhileStatement<'a>),
    DoWhile(DoWhileStatement<'a>),
    Return(ReturnStatement<'a>),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Throw(ThrowStatement<'a>),
    Try(TryStatement<'a>),
    Switch(SwitchStatement<'a>),
    Labeled(LabeledStatement<'a>),
    Debugger(NodeData),
    With(WithStatement<'a>),
    VariableDeclaration(VariableDeclaration<'a>),
    FunctionDeclaration(Function<'a>),
    ClassDeclaration(Class<'a>),
    Import(ImportDeclaration<'a>),
    ExportNamed(ExportNamedDeclaration<'a>),
    ExportDefault(ExportDefaultDeclaration<'a>),
    ExportAll(ExportAllDeclaration<'a>),
    TsInterface(TsInterfaceDeclaration<'a>),
    TsTypeAlias(TsTypeAliasDeclaration<'a>),
    TsEnum(TsEnumDeclaration<'a>),
    TsModule(TsModuleDeclaration<'a>),
    TsExportAssignment(TsExportAssignment<'a>),
    TsImportEquals(TsImportEqualsDeclaration<'a>),
    Placeholder(Placeholder),
    /// Stand-in for a statement that could not be parsed.
    Missing(NodeData),
}

impl_node_data!(Statement {
    Block, Expression, If, For, ForIn, ForOf, While, DoWhile, Return, Break,
    Continue, Throw, Try, Switch, Labeled, With, VariableDeclaration,
    FunctionDeclaration, ClassDeclaration, Import, ExportNamed, ExportDefault,
    ExportAll, TsInterface, TsTypeAlias, TsEnum, TsModule, TsExportAssignment,
    TsImportEquals, Placeholder,
} bare { Empty, Debugger, Missing });

#[derive(Debug, Clone, Copy)]
pub struct BlockStatement<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub consequent: &'a Statement<'a>,
    pub alternate: Option<&'a Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ForInit<'a> {
    Variable(&'a VariableDeclaration<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub init: Option<ForInit<'a>>,
    pub test: Option<&'a Expression<'a>>,
    pub update: Option<&'a Expression<'a>>,
    pub body: &'a Statement<'a>,
}

/// Left side of `for (left in/of right)`.
#[derive(Debug, Clone, Copy)]
pub enum ForLeft<'a> {
    Variable(&'a VariableDeclaration<'a>),
    Pattern(&'a Pattern<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ForInStatement<'a> {
    pub data: NodeData,
    pub left: ForLeft<'a>,
    pub right: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ForOfStatement<'a> {
    pub data: NodeData,
    pub is_await: bool,
    pub left: ForLeft<'a>,
    pub right: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct DoWhileStatement<'a> {
    pub data: NodeData,
    pub body: &'a Statement<'a>,
    pub test: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub argument: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct BreakStatement {
    pub data: NodeData,
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, Copy)]
pub struct ContinueStatement {
    pub data: NodeData,
    pub label: Option<Identifier>,
}

#[derive(Debug, Clone, Copy)]
pub struct ThrowStatement<'a> {
    pub data: NodeData,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TryStatement<'a> {
    pub data: NodeData,
    pub block: BlockStatement<'a>,
    pub handler: Option<&'a CatchClause<'a>>,
    pub finalizer: Option<BlockStatement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct CatchClause<'a> {
    pub data: NodeData,
    pub param: Option<&'a Pattern<'a>>,
    pub param_type: Option<&'a TsType<'a>>,
    pub body: BlockStatement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchStatement<'a> {
    pub data: NodeData,
    pub discriminant: &'a Expression<'a>,
    pub cases: NodeList<'a, SwitchCase<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct SwitchCase<'a> {
    pub data: NodeData,
    /// `None` for `default:`.
    pub test: Option<&'a Expression<'a>>,
    pub consequent: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct LabeledStatement<'a> {
    pub data: NodeData,
    pub label: Identifier,
    pub body: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct WithStatement<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub body: &'a Statement<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub kind: VariableKind,
    pub declarations: NodeList<'a, VariableDeclarator<'a>>,
    pub declare: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct VariableDeclarator<'a> {
    pub data: NodeData,
    pub id: Pattern<'a>,
    pub type_annotation: Option<&'a TsType<'a>>,
    /// `let x!: T`
    pub definite: bool,
    pub init: Option<&'a Expression<'a>>,
}

// ============================================================================
// Functions and classes
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct FunctionBody<'a> {
    pub data: NodeData,
    pub directives: NodeList<'a, Directive<'a>>,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Function<'a> {
    pub data: NodeData,
    pub id: Option<Identifier>,
    pub is_async: bool,
    pub is_generator: bool,
    pub declare: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<&'a TsType<'a>>,
    /// `None` for overload signatures and ambient declarations.
    pub body: Option<&'a FunctionBody<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Param<'a> {
    pub data: NodeData,
    /// Parameter property modifiers (`public`, `readonly`, ...).
    pub modifiers: ModifierFlags,
    pub pattern: Pattern<'a>,
    pub optional: bool,
    pub type_annotation: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ArrowBody<'a> {
    Block(&'a FunctionBody<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ArrowFunction<'a> {
    pub data: NodeData,
    pub is_async: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<&'a TsType<'a>>,
    pub body: ArrowBody<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct Class<'a> {
    pub data: NodeData,
    pub id: Option<Identifier>,
    pub is_abstract: bool,
    pub declare: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub super_class: Option<&'a Expression<'a>>,
    pub super_type_arguments: Option<&'a TsTypeArguments<'a>>,
    pub implements: NodeList<'a, TsExpressionWithTypeArguments<'a>>,
    pub body: ClassBody<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassBody<'a> {
    pub data: NodeData,
    pub members: NodeList<'a, ClassMember<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ClassMember<'a> {
    Method(ClassMethod<'a>),
    Property(ClassProperty<'a>),
    StaticBlock(StaticBlock<'a>),
    IndexSignature(TsIndexSignature<'a>),
    /// A stray `;` in a class body.
    Empty(NodeData),
}

impl_node_data!(ClassMember { Method, Property, StaticBlock, IndexSignature } bare { Empty });

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassMethod<'a> {
    pub data: NodeData,
    pub kind: MethodKind,
    pub key: PropertyKey<'a>,
    pub modifiers: ModifierFlags,
    pub optional: bool,
    pub function: &'a Function<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassProperty<'a> {
    pub data: NodeData,
    pub key: PropertyKey<'a>,
    pub modifiers: ModifierFlags,
    pub optional: bool,
    pub definite: bool,
    pub type_annotation: Option<&'a TsType<'a>>,
    pub value: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticBlock<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

/// The name of a property, method or class member.
#[derive(Debug, Clone, Copy)]
pub enum PropertyKey<'a> {
    Identifier(Identifier),
    String(StringLiteral<'a>),
    Number(NumericLiteral<'a>),
    BigInt(BigIntLiteral<'a>),
    Private(PrivateName),
    Computed(ComputedKey<'a>),
}

impl_node_data!(PropertyKey { Identifier, String, Number, BigInt, Private, Computed });

#[derive(Debug, Clone, Copy)]
pub struct ComputedKey<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// ============================================================================
// Modules
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportExportKind {
    Value,
    /// `import type` / `export type`
    Type,
}

#[derive(Debug, Clone, Copy)]
pub struct ImportDeclaration<'a> {
    pub data: NodeData,
    pub kind: ImportExportKind,
    pub specifiers: NodeList<'a, ImportSpecifier<'a>>,
    pub source: StringLiteral<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum ImportSpecifier<'a> {
    /// `import a from "m"`
    Default(Identifier),
    /// `import * as ns from "m"`
    Namespace(ImportNamespaceSpecifier),
    /// `import { a as b } from "m"`
    Named(ImportNamedSpecifier<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ImportNamespaceSpecifier {
    pub data: NodeData,
    pub local: Identifier,
}

#[derive(Debug, Clone, Copy)]
pub struct ImportNamedSpecifier<'a> {
    pub data: NodeData,
    pub imported: ModuleExportName<'a>,
    pub local: Identifier,
    pub is_type: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ModuleExportName<'a> {
    Identifier(Identifier),
    String(StringLiteral<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ExportNamedDeclaration<'a> {
    pub data: NodeData,
    pub kind: ImportExportKind,
    pub declaration: Option<&'a Statement<'a>>,
    pub specifiers: NodeList<'a, ExportSpecifier<'a>>,
    pub source: Option<StringLiteral<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportSpecifier<'a> {
    pub data: NodeData,
    pub local: ModuleExportName<'a>,
    pub exported: ModuleExportName<'a>,
    pub is_type: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum ExportDefaultKind<'a> {
    Function(&'a Function<'a>),
    Class(&'a Class<'a>),
    Interface(&'a TsInterfaceDeclaration<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ExportDefaultDeclaration<'a> {
    pub data: NodeData,
    pub declaration: ExportDefaultKind<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExportAllDeclaration<'a> {
    pub data: NodeData,
    pub kind: ImportExportKind,
    pub exported: Option<ModuleExportName<'a>>,
    pub source: StringLiteral<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum Expression<'a> {
    Identifier(Identifier),
    String(StringLiteral<'a>),
    Number(NumericLiteral<'a>),
    BigInt(BigIntLiteral<'a>),
    Boolean(BooleanLiteral),
    Null(NodeData),
    RegExp(RegExpLiteral<'a>),
    Template(TemplateLiteral<'a>),
    TaggedTemplate(TaggedTemplateExpression<'a>),
    This(NodeData),
    Super(NodeData),
    /// The `import` in `import(...)`.
    Import(NodeData),
    MetaProperty(MetaProperty),
    Array(ArrayExpression<'a>),
    Object(ObjectExpression<'a>),
    Function(Function<'a>),
    Arrow(ArrowFunction<'a>),
    Class(Class<'a>),
    Member(MemberExpression<'a>),
    Call(CallExpression<'a>),
    New(NewExpression<'a>),
    Unary(UnaryExpression<'a>),
    Update(UpdateExpression<'a>),
    Binary(BinaryExpression<'a>),
    Logical(LogicalExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    Conditional(ConditionalExpression<'a>),
    Sequence(SequenceExpression<'a>),
    Parenthesized(ParenthesizedExpression<'a>),
    Yield(YieldExpression<'a>),
    Await(AwaitExpression<'a>),
    JsxElement(&'a JsxElement<'a>),
    JsxFragment(&'a JsxFragment<'a>),
    TsAs(TsAsExpression<'a>),
    TsSatisfies(TsSatisfiesExpression<'a>),
    TsNonNull(TsNonNullExpression<'a>),
    TsTypeAssertion(TsTypeAssertion<'a>),
    Placeholder(Placeholder),
    /// Stand-in for an expression that could not be parsed.
    Missing(NodeData),
}

impl_node_data!(Expression {
    Identifier, String, Number, BigInt, Boolean, RegExp, Template, TaggedTemplate,
    MetaProperty, Array, Object, Function, Arrow, Class, Member, Call, New, Unary,
    Update, Binary, Logical, Assignment, Conditional, Sequence, Parenthesized,
    Yield, Await, JsxElement, JsxFragment, TsAs, TsSatisfies, TsNonNull,
    TsTypeAssertion, Placeholder,
} bare { Null, This, Super, Import, Missing });

impl<'a> Expression<'a> {
    /// Strip any number of enclosing parentheses.
    pub fn without_parens(&self) -> &Expression<'a> {
        let mut expr = self;
        while let Expression::Parenthesized(paren) = expr {
            expr = paren.expression;
        }
        expr
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaggedTemplateExpression<'a> {
    pub data: NodeData,
    pub tag: &'a Expression<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
    pub quasi: TemplateLiteral<'a>,
}

/// `new.target`, `import.meta`
#[derive(Debug, Clone, Copy)]
pub struct MetaProperty {
    pub data: NodeData,
    pub meta: Identifier,
    pub property: Identifier,
}

#[derive(Debug, Clone, Copy)]
pub struct SpreadElement<'a> {
    pub data: NodeData,
    pub argument: &'a Expression<'a>,
}

/// An array element or call argument.
#[derive(Debug, Clone, Copy)]
pub enum ExpressionOrSpread<'a> {
    Expression(Expression<'a>),
    Spread(SpreadElement<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum ArrayElement<'a> {
    Expression(Expression<'a>),
    Spread(SpreadElement<'a>),
    /// An elided slot: `[a, , b]`
    Hole(NodeData),
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, ArrayElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectExpression<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectMember<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ObjectMember<'a> {
    Property(ObjectProperty<'a>),
    Method(ObjectMethod<'a>),
    Spread(SpreadElement<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectProperty<'a> {
    pub data: NodeData,
    pub key: PropertyKey<'a>,
    pub value: &'a Expression<'a>,
    pub shorthand: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectMethod<'a> {
    pub data: NodeData,
    pub kind: MethodKind,
    pub key: PropertyKey<'a>,
    pub function: &'a Function<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum MemberProperty<'a> {
    Identifier(Identifier),
    Private(PrivateName),
    Computed(&'a Expression<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct MemberExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub property: MemberProperty<'a>,
    /// `a?.b`
    pub optional: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub callee: &'a Expression<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
    pub arguments: NodeList<'a, ExpressionOrSpread<'a>>,
    /// `a?.()`
    pub optional: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct NewExpression<'a> {
    pub data: NodeData,
    pub callee: &'a Expression<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
    /// `None` for `new X` without parentheses.
    pub arguments: Option<NodeList<'a, ExpressionOrSpread<'a>>>,
}

#[derive(Debug, Clone, Copy)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: UnaryOperator,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateExpression<'a> {
    pub data: NodeData,
    pub operator: UpdateOperator,
    pub prefix: bool,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub operator: BinaryOperator,
    pub left: &'a Expression<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct LogicalExpression<'a> {
    pub data: NodeData,
    pub operator: LogicalOperator,
    pub left: &'a Expression<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentExpression<'a> {
    pub data: NodeData,
    pub operator: AssignmentOperator,
    pub left: &'a Pattern<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConditionalExpression<'a> {
    pub data: NodeData,
    pub test: &'a Expression<'a>,
    pub consequent: &'a Expression<'a>,
    pub alternate: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct SequenceExpression<'a> {
    pub data: NodeData,
    pub expressions: NodeList<'a, Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParenthesizedExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct YieldExpression<'a> {
    pub data: NodeData,
    pub delegate: bool,
    pub argument: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct AwaitExpression<'a> {
    pub data: NodeData,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsAsExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub type_annotation: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsSatisfiesExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub type_annotation: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsNonNullExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

/// `<T>expr`
#[derive(Debug, Clone, Copy)]
pub struct TsTypeAssertion<'a> {
    pub data: NodeData,
    pub type_annotation: &'a TsType<'a>,
    pub expression: &'a Expression<'a>,
}

// ============================================================================
// Patterns
// ============================================================================

/// A binding or assignment target.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'a> {
    Identifier(Identifier),
    Object(ObjectPattern<'a>),
    Array(ArrayPattern<'a>),
    /// `target = default`
    Assignment(AssignmentPattern<'a>),
    Rest(RestElement<'a>),
    /// Member expressions and other non-binding assignment targets.
    Expression(&'a Expression<'a>),
    Placeholder(Placeholder),
    Missing(NodeData),
}

impl<'a> Pattern<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Pattern::Identifier(node) => &node.data,
            Pattern::Object(node) => &node.data,
            Pattern::Array(node) => &node.data,
            Pattern::Assignment(node) => &node.data,
            Pattern::Rest(node) => &node.data,
            Pattern::Expression(expr) => expr.data(),
            Pattern::Placeholder(node) => &node.data,
            Pattern::Missing(data) => data,
        }
    }

    #[inline]
    pub fn span(&self) -> SourceSpan {
        self.data().span
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectPattern<'a> {
    pub data: NodeData,
    pub properties: NodeList<'a, ObjectPatternProperty<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum ObjectPatternProperty<'a> {
    Property(ObjectPatternEntry<'a>),
    Rest(RestElement<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectPatternEntry<'a> {
    pub data: NodeData,
    pub key: PropertyKey<'a>,
    pub value: Pattern<'a>,
    pub shorthand: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayPattern<'a> {
    pub data: NodeData,
    /// `None` marks an elided slot.
    pub elements: NodeList<'a, Option<Pattern<'a>>>,
}

#[derive(Debug, Clone, Copy)]
pub struct AssignmentPattern<'a> {
    pub data: NodeData,
    pub left: &'a Pattern<'a>,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct RestElement<'a> {
    pub data: NodeData,
    pub argument: &'a Pattern<'a>,
}

// ============================================================================
// JSX
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct JsxIdentifier {
    pub data: NodeData,
    pub name: Atom,
}

/// `<svg:rect>`
#[derive(Debug, Clone, Copy)]
pub struct JsxNamespacedName {
    pub data: NodeData,
    pub namespace: JsxIdentifier,
    pub name: JsxIdentifier,
}

/// `<a.b.c>`
#[derive(Debug, Clone, Copy)]
pub struct JsxMemberExpression<'a> {
    pub data: NodeData,
    pub object: JsxElementName<'a>,
    pub property: JsxIdentifier,
}

#[derive(Debug, Clone, Copy)]
pub enum JsxElementName<'a> {
    Identifier(JsxIdentifier),
    Namespaced(JsxNamespacedName),
    Member(&'a JsxMemberExpression<'a>),
}

impl_node_data!(JsxElementName { Identifier, Namespaced, Member });

#[derive(Debug, Clone, Copy)]
pub struct JsxOpeningElement<'a> {
    pub data: NodeData,
    pub name: JsxElementName<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
    pub attributes: NodeList<'a, JsxAttributeItem<'a>>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxClosingElement<'a> {
    pub data: NodeData,
    pub name: JsxElementName<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxElement<'a> {
    pub data: NodeData,
    pub opening: JsxOpeningElement<'a>,
    pub children: NodeList<'a, JsxChild<'a>>,
    pub closing: Option<JsxClosingElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxFragment<'a> {
    pub data: NodeData,
    pub opening: NodeData,
    pub children: NodeList<'a, JsxChild<'a>>,
    pub closing: NodeData,
}

#[derive(Debug, Clone, Copy)]
pub enum JsxAttributeName {
    Identifier(JsxIdentifier),
    Namespaced(JsxNamespacedName),
}

#[derive(Debug, Clone, Copy)]
pub enum JsxAttributeValue<'a> {
    String(StringLiteral<'a>),
    Expression(JsxExpressionContainer<'a>),
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct JsxAttribute<'a> {
    pub data: NodeData,
    pub name: JsxAttributeName,
    pub value: Option<JsxAttributeValue<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxSpreadAttribute<'a> {
    pub data: NodeData,
    pub argument: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum JsxAttributeItem<'a> {
    Attribute(JsxAttribute<'a>),
    Spread(JsxSpreadAttribute<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct JsxExpressionContainer<'a> {
    pub data: NodeData,
    /// `None` for `{}` or `{/* comment */}`.
    pub expression: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxText<'a> {
    pub data: NodeData,
    /// Text with entities decoded.
    pub value: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy)]
pub struct JsxSpreadChild<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum JsxChild<'a> {
    Text(JsxText<'a>),
    Expression(JsxExpressionContainer<'a>),
    Spread(JsxSpreadChild<'a>),
    Element(&'a JsxElement<'a>),
    Fragment(&'a JsxFragment<'a>),
}

// ============================================================================
// TypeScript: types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsKeywordKind {
    Any,
    Unknown,
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Never,
    Void,
    Undefined,
    Null,
    Intrinsic,
}

impl TsKeywordKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "any" => TsKeywordKind::Any,
            "unknown" => TsKeywordKind::Unknown,
            "number" => TsKeywordKind::Number,
            "string" => TsKeywordKind::String,
            "boolean" => TsKeywordKind::Boolean,
            "bigint" => TsKeywordKind::BigInt,
            "symbol" => TsKeywordKind::Symbol,
            "object" => TsKeywordKind::Object,
            "never" => TsKeywordKind::Never,
            "void" => TsKeywordKind::Void,
            "undefined" => TsKeywordKind::Undefined,
            "null" => TsKeywordKind::Null,
            "intrinsic" => TsKeywordKind::Intrinsic,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TsType<'a> {
    Keyword(TsKeywordType),
    This(NodeData),
    Reference(TsTypeReference<'a>),
    Query(TsTypeQuery<'a>),
    Literal(TsLiteralType<'a>),
    TemplateLiteral(TsTemplateLiteralType<'a>),
    Function(TsFunctionType<'a>),
    Constructor(TsConstructorType<'a>),
    TypeLiteral(TsTypeLiteral<'a>),
    Array(TsArrayType<'a>),
    Tuple(TsTupleType<'a>),
    Union(TsUnionType<'a>),
    Intersection(TsIntersectionType<'a>),
    Conditional(TsConditionalType<'a>),
    Infer(TsInferType<'a>),
    Parenthesized(TsParenthesizedType<'a>),
    Operator(TsTypeOperator<'a>),
    IndexedAccess(TsIndexedAccessType<'a>),
    Mapped(TsMappedType<'a>),
    Predicate(TsTypePredicate<'a>),
    Import(TsImportType<'a>),
    Missing(NodeData),
}

impl_node_data!(TsType {
    Keyword, Reference, Query, Literal, TemplateLiteral, Function, Constructor,
    TypeLiteral, Array, Tuple, Union, Intersection, Conditional, Infer,
    Parenthesized, Operator, IndexedAccess, Mapped, Predicate, Import,
} bare { This, Missing });

#[derive(Debug, Clone, Copy)]
pub struct TsKeywordType {
    pub data: NodeData,
    pub kind: TsKeywordKind,
}

#[derive(Debug, Clone, Copy)]
pub struct TsQualifiedName<'a> {
    pub data: NodeData,
    pub left: TsEntityName<'a>,
    pub right: Identifier,
}

#[derive(Debug, Clone, Copy)]
pub enum TsEntityName<'a> {
    Identifier(Identifier),
    Qualified(&'a TsQualifiedName<'a>),
}

impl<'a> TsEntityName<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            TsEntityName::Identifier(id) => &id.data,
            TsEntityName::Qualified(name) => &name.data,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeArguments<'a> {
    pub data: NodeData,
    pub params: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeParameter<'a> {
    pub data: NodeData,
    pub name: Identifier,
    /// `in`, `out`, `const`
    pub modifiers: ModifierFlags,
    pub constraint: Option<&'a TsType<'a>>,
    pub default: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeParameters<'a> {
    pub data: NodeData,
    pub params: NodeList<'a, TsTypeParameter<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeReference<'a> {
    pub data: NodeData,
    pub type_name: TsEntityName<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
}

/// `typeof x.y`
#[derive(Debug, Clone, Copy)]
pub struct TsTypeQuery<'a> {
    pub data: NodeData,
    pub expr_name: TsEntityName<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsLiteral<'a> {
    String(StringLiteral<'a>),
    Number(NumericLiteral<'a>),
    BigInt(BigIntLiteral<'a>),
    Boolean(BooleanLiteral),
}

#[derive(Debug, Clone, Copy)]
pub struct TsLiteralType<'a> {
    pub data: NodeData,
    /// A leading `-` on a numeric literal type.
    pub negative: bool,
    pub literal: TsLiteral<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTemplateLiteralType<'a> {
    pub data: NodeData,
    pub quasis: NodeList<'a, TemplateElement<'a>>,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsFunctionType<'a> {
    pub data: NodeData,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsConstructorType<'a> {
    pub data: NodeData,
    pub is_abstract: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeLiteral<'a> {
    pub data: NodeData,
    pub members: NodeList<'a, TsTypeElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsArrayType<'a> {
    pub data: NodeData,
    pub element_type: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTupleElement<'a> {
    pub data: NodeData,
    /// `[name: T]`
    pub label: Option<Identifier>,
    pub optional: bool,
    pub rest: bool,
    pub element_type: TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTupleType<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, TsTupleElement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsUnionType<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsIntersectionType<'a> {
    pub data: NodeData,
    pub types: NodeList<'a, TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsConditionalType<'a> {
    pub data: NodeData,
    pub check_type: &'a TsType<'a>,
    pub extends_type: &'a TsType<'a>,
    pub true_type: &'a TsType<'a>,
    pub false_type: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsInferType<'a> {
    pub data: NodeData,
    pub type_parameter: &'a TsTypeParameter<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsParenthesizedType<'a> {
    pub data: NodeData,
    pub type_annotation: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsTypeOperatorKind {
    KeyOf,
    Unique,
    Readonly,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeOperator<'a> {
    pub data: NodeData,
    pub operator: TsTypeOperatorKind,
    pub type_annotation: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsIndexedAccessType<'a> {
    pub data: NodeData,
    pub object_type: &'a TsType<'a>,
    pub index_type: &'a TsType<'a>,
}

/// `+`, `-` or bare modifier on a mapped type's `readonly` / `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedModifier {
    Plus,
    Minus,
    Present,
}

#[derive(Debug, Clone, Copy)]
pub struct TsMappedType<'a> {
    pub data: NodeData,
    pub readonly: Option<MappedModifier>,
    pub type_parameter: &'a TsTypeParameter<'a>,
    pub name_type: Option<&'a TsType<'a>>,
    pub optional: Option<MappedModifier>,
    pub type_annotation: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsPredicateName {
    Identifier(Identifier),
    This(NodeData),
}

/// `x is T`, `asserts x`, `asserts x is T`
#[derive(Debug, Clone, Copy)]
pub struct TsTypePredicate<'a> {
    pub data: NodeData,
    pub asserts: bool,
    pub parameter_name: TsPredicateName,
    pub type_annotation: Option<&'a TsType<'a>>,
}

/// `import("m").Name<T>`
#[derive(Debug, Clone, Copy)]
pub struct TsImportType<'a> {
    pub data: NodeData,
    pub argument: StringLiteral<'a>,
    pub qualifier: Option<TsEntityName<'a>>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
}

// ============================================================================
// TypeScript: members and declarations
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum TsTypeElement<'a> {
    Property(TsPropertySignature<'a>),
    Method(TsMethodSignature<'a>),
    Call(TsSignature<'a>),
    Construct(TsSignature<'a>),
    Index(TsIndexSignature<'a>),
}

impl_node_data!(TsTypeElement { Property, Method, Call, Construct, Index });

#[derive(Debug, Clone, Copy)]
pub struct TsPropertySignature<'a> {
    pub data: NodeData,
    pub key: PropertyKey<'a>,
    pub readonly: bool,
    pub optional: bool,
    pub type_annotation: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsMethodSignature<'a> {
    pub data: NodeData,
    pub kind: MethodKind,
    pub key: PropertyKey<'a>,
    pub optional: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<&'a TsType<'a>>,
}

/// Call (`(x): T`) and construct (`new (x): T`) signatures.
#[derive(Debug, Clone, Copy)]
pub struct TsSignature<'a> {
    pub data: NodeData,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub params: NodeList<'a, Param<'a>>,
    pub return_type: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsIndexSignature<'a> {
    pub data: NodeData,
    pub modifiers: ModifierFlags,
    pub params: NodeList<'a, Param<'a>>,
    pub type_annotation: Option<&'a TsType<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsExpressionWithTypeArguments<'a> {
    pub data: NodeData,
    pub expression: TsEntityName<'a>,
    pub type_arguments: Option<&'a TsTypeArguments<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsInterfaceDeclaration<'a> {
    pub data: NodeData,
    pub id: Identifier,
    pub declare: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub extends: NodeList<'a, TsExpressionWithTypeArguments<'a>>,
    pub body: TsTypeLiteral<'a>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsTypeAliasDeclaration<'a> {
    pub data: NodeData,
    pub id: Identifier,
    pub declare: bool,
    pub type_parameters: Option<&'a TsTypeParameters<'a>>,
    pub type_annotation: &'a TsType<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsEnumMemberId<'a> {
    Identifier(Identifier),
    String(StringLiteral<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct TsEnumMember<'a> {
    pub data: NodeData,
    pub id: TsEnumMemberId<'a>,
    pub initializer: Option<&'a Expression<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsEnumDeclaration<'a> {
    pub data: NodeData,
    pub id: Identifier,
    pub is_const: bool,
    pub declare: bool,
    pub members: NodeList<'a, TsEnumMember<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsModuleKind {
    /// `namespace A {}`
    Namespace,
    /// `module A {}` / `declare module "m" {}`
    Module,
    /// `declare global {}`
    Global,
}

#[derive(Debug, Clone, Copy)]
pub enum TsModuleName<'a> {
    Identifier(Identifier),
    String(StringLiteral<'a>),
}

#[derive(Debug, Clone, Copy)]
pub enum TsModuleBody<'a> {
    Block(TsModuleBlock<'a>),
    /// `namespace A.B {}` nests `B` inside `A`.
    Nested(&'a TsModuleDeclaration<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct TsModuleBlock<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct TsModuleDeclaration<'a> {
    pub data: NodeData,
    pub kind: TsModuleKind,
    pub id: TsModuleName<'a>,
    pub declare: bool,
    /// `None` for the shorthand `declare module "m";`
    pub body: Option<TsModuleBody<'a>>,
}

/// `export = expr`
#[derive(Debug, Clone, Copy)]
pub struct TsExportAssignment<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum TsModuleReference<'a> {
    /// `require("m")`
    External(StringLiteral<'a>),
    Entity(TsEntityName<'a>),
}

/// `import x = require("m")` / `import x = A.B`
#[derive(Debug, Clone, Copy)]
pub struct TsImportEqualsDeclaration<'a> {
    pub data: NodeData,
    pub is_export: bool,
    pub kind: ImportExportKind,
    pub id: Identifier,
    pub module_reference: TsModuleReference<'a>,
}
