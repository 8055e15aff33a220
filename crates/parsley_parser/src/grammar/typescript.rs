//! TypeScript declarations and modifiers.

use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::PResult;
use crate::state::LookaheadToken;
use crate::utilities::can_follow_modifier;
use parsley_ast::{
    ModifierFlags, Statement, TsEnumDeclaration, TsEnumMember, TsEnumMemberId,
    TsInterfaceDeclaration, TsModuleBlock, TsModuleBody, TsModuleDeclaration, TsModuleKind,
    TsModuleName, TsTypeAliasDeclaration, VariableKind,
};
use parsley_core::Position;
use parsley_diagnostics::messages;
use parsley_scanner::{TokenFlags, TokenKind};

impl<'a> Parser<'a> {
    // ========================================================================
    // Modifiers
    // ========================================================================

    /// Modifier words such as `public` or `readonly` in front of a class
    /// member or parameter. A word only acts as a modifier when something
    /// that can be modified follows it on the same line; `static` may be
    /// separated by a line break.
    pub(crate) fn parse_modifiers(&mut self, allowed: ModifierFlags) -> PResult<ModifierFlags> {
        let mut modifiers = ModifierFlags::NONE;
        while self.at(TokenKind::Name) && !self.state.flags.contains(TokenFlags::ESCAPED) {
            let Some(flag) = ModifierFlags::from_keyword(self.token_text()) else {
                break;
            };
            let next = self.lookahead()?;
            if !can_follow_modifier(next.kind)
                || (next.line_break_before && flag != ModifierFlags::STATIC)
            {
                break;
            }

            let word = self.token_text().to_string();
            let span = self.token_span();
            if !allowed.intersects(flag) {
                self.report(&messages::MODIFIER_NOT_ALLOWED, &[&word], span)?;
            } else if modifiers.contains(flag) {
                self.report(&messages::DUPLICATE_MODIFIER, &[&word], span)?;
            }
            if !flag.intersects(ModifierFlags::STATIC | ModifierFlags::ACCESSOR) {
                self.require_ts(span)?;
            }
            if allowed.intersects(flag) {
                modifiers |= flag;
            }
            self.next()?;
        }
        Ok(modifiers)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// A declaration introduced by a contextual keyword, or `None` when the
    /// word is an ordinary identifier here.
    pub(crate) fn try_parse_ts_declaration(
        &mut self,
        start: Position,
    ) -> PResult<Option<Statement<'a>>> {
        if !self.ts_enabled() || self.state.flags.contains(TokenFlags::ESCAPED) {
            return Ok(None);
        }
        let word = self.token_text().to_string();
        if !matches!(
            word.as_str(),
            "interface" | "type" | "enum" | "namespace" | "module" | "abstract" | "declare" | "global"
        ) {
            return Ok(None);
        }
        let next = self.lookahead()?;
        if next.line_break_before {
            return Ok(None);
        }

        let statement = match (word.as_str(), next.kind) {
            ("interface", TokenKind::Name) => {
                Statement::TsInterface(self.parse_interface(start, false)?)
            }
            ("type", TokenKind::Name) => self.parse_type_alias(start, false)?,
            ("enum", TokenKind::Name) => self.parse_enum_declaration(start, false)?,
            ("namespace", TokenKind::Name) | ("module", TokenKind::Name | TokenKind::String) => {
                self.parse_module_declaration(start, false)?
            }
            ("global", TokenKind::BraceL) if self.state.in_ambient => {
                self.parse_module_declaration(start, false)?
            }
            ("abstract", TokenKind::Class) => {
                self.next()?;
                Statement::ClassDeclaration(self.parse_class(start, true, false, true)?)
            }
            ("declare", _) if Self::can_follow_declare(&next) => {
                self.parse_declare_statement(start)?
            }
            _ => return Ok(None),
        };
        Ok(Some(statement))
    }

    fn can_follow_declare(next: &LookaheadToken) -> bool {
        match next.kind {
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class => true,
            TokenKind::Name => [
                "let",
                "interface",
                "type",
                "enum",
                "namespace",
                "module",
                "global",
                "abstract",
                "async",
            ]
            .iter()
            .any(|word| next.is_name(word)),
            _ => false,
        }
    }

    /// `declare ...`. Everything inside is parsed as ambient: bodies and
    /// initializers become optional.
    fn parse_declare_statement(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.next()?;
        let outer = self.state.in_ambient;
        self.state.in_ambient = true;
        let statement = self.parse_ambient_declaration(start);
        self.state.in_ambient = outer;
        statement
    }

    fn parse_ambient_declaration(&mut self, start: Position) -> PResult<Statement<'a>> {
        match self.state.kind {
            TokenKind::Var => self.parse_var_statement(start, VariableKind::Var, true),
            TokenKind::Const => {
                if self.lookahead()?.is_name("enum") {
                    return self.parse_enum_declaration(start, true);
                }
                self.parse_var_statement(start, VariableKind::Const, true)
            }
            TokenKind::Function => {
                let function = self.parse_function(start, true, false, true)?;
                Ok(Statement::FunctionDeclaration(function))
            }
            TokenKind::Class => {
                let class = self.parse_class(start, true, true, false)?;
                Ok(Statement::ClassDeclaration(class))
            }
            _ if self.at_name("let") => self.parse_var_statement(start, VariableKind::Let, true),
            _ if self.at_name("async") => {
                self.next()?;
                let function = self.parse_function(start, true, true, true)?;
                Ok(Statement::FunctionDeclaration(function))
            }
            _ if self.at_name("abstract") => {
                self.next()?;
                let class = self.parse_class(start, true, true, true)?;
                Ok(Statement::ClassDeclaration(class))
            }
            _ if self.at_name("interface") => {
                Ok(Statement::TsInterface(self.parse_interface(start, true)?))
            }
            _ if self.at_name("type") => self.parse_type_alias(start, true),
            _ if self.at_name("enum") => self.parse_enum_declaration(start, true),
            _ if self.at_name("namespace") || self.at_name("module") || self.at_name("global") => {
                self.parse_module_declaration(start, true)
            }
            _ => {
                self.unexpected()?;
                Ok(Statement::Missing(self.finish_node(start)))
            }
        }
    }

    /// `type Name<T> = Type;`
    fn parse_type_alias(&mut self, start: Position, declare: bool) -> PResult<Statement<'a>> {
        let span = self.token_span();
        self.require_ts(span)?;
        self.next()?;
        let id = self.parse_binding_identifier()?;
        let type_parameters = self.parse_type_parameters_opt()?;
        let type_annotation = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.expect(TokenKind::Eq)?;
            p.parse_type_inner()
        })?;
        self.semicolon()?;
        Ok(Statement::TsTypeAlias(TsTypeAliasDeclaration {
            data: self.finish_node(start),
            id,
            declare,
            type_parameters,
            type_annotation: self.alloc(type_annotation),
        }))
    }

    /// `interface Name<T> extends A, B { ... }` at `interface`.
    pub(crate) fn parse_interface(
        &mut self,
        start: Position,
        declare: bool,
    ) -> PResult<TsInterfaceDeclaration<'a>> {
        let span = self.token_span();
        self.require_ts(span)?;
        self.next()?;
        let id = self.parse_binding_identifier()?;
        let type_parameters = self.parse_type_parameters_opt()?;
        let mut extends = Vec::new();
        if self.eat(TokenKind::Extends)? {
            loop {
                extends.push(self.parse_heritage_type()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let body = self.parse_type_members()?;
        Ok(TsInterfaceDeclaration {
            data: self.finish_node(start),
            id,
            declare,
            type_parameters,
            extends: self.alloc_vec(extends),
            body,
        })
    }

    /// `enum E { A, B = 1, "c" }`, optionally preceded by `const`.
    pub(crate) fn parse_enum_declaration(
        &mut self,
        start: Position,
        declare: bool,
    ) -> PResult<Statement<'a>> {
        let span = self.token_span();
        self.require_ts(span)?;
        let is_const = self.eat(TokenKind::Const)?;
        self.expect_name("enum")?;
        let id = self.parse_binding_identifier()?;

        let open = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let mut members = Vec::new();
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            members.push(self.parse_enum_member()?);
            if !self.at(TokenKind::BraceR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BraceR, "enum body", open)?;
        Ok(Statement::TsEnum(TsEnumDeclaration {
            data: self.finish_node(start),
            id,
            is_const,
            declare,
            members: self.alloc_vec(members),
        }))
    }

    fn parse_enum_member(&mut self) -> PResult<TsEnumMember<'a>> {
        let start = self.start_node();
        let id = if self.at(TokenKind::String) {
            TsEnumMemberId::String(self.parse_string_literal()?)
        } else {
            TsEnumMemberId::Identifier(self.parse_identifier_name()?)
        };
        let initializer = if self.eat(TokenKind::Eq)? {
            let value = self.allow_in(|p| p.parse_maybe_assign())?;
            Some(&*self.alloc(value))
        } else {
            None
        };
        Ok(TsEnumMember {
            data: self.finish_node(start),
            id,
            initializer,
        })
    }

    // ========================================================================
    // Namespaces and modules
    // ========================================================================

    /// `namespace A.B { }`, `module "m" { }`, `module "m";` or `global { }`.
    fn parse_module_declaration(&mut self, start: Position, declare: bool) -> PResult<Statement<'a>> {
        let span = self.token_span();
        self.require_ts(span)?;
        let kind = if self.at_name("global") {
            TsModuleKind::Global
        } else if self.at_name("namespace") {
            TsModuleKind::Namespace
        } else {
            TsModuleKind::Module
        };
        if kind != TsModuleKind::Global {
            self.next()?;
        }

        if kind == TsModuleKind::Module && self.at(TokenKind::String) {
            let id = TsModuleName::String(self.parse_string_literal()?);
            let body = if self.at(TokenKind::BraceL) {
                Some(TsModuleBody::Block(self.parse_module_block()?))
            } else {
                self.semicolon()?;
                None
            };
            return Ok(Statement::TsModule(TsModuleDeclaration {
                data: self.finish_node(start),
                kind,
                id,
                declare,
                body,
            }));
        }

        let declaration = self.parse_namespace_rest(start, kind, declare)?;
        Ok(Statement::TsModule(declaration))
    }

    /// The name and body of a namespace. Each dotted segment after the first
    /// becomes a nested declaration.
    fn parse_namespace_rest(
        &mut self,
        start: Position,
        kind: TsModuleKind,
        declare: bool,
    ) -> PResult<TsModuleDeclaration<'a>> {
        let id = self.parse_binding_identifier()?;
        let body = if self.eat(TokenKind::Dot)? {
            let inner_start = self.start_node();
            let inner = self.parse_namespace_rest(inner_start, kind, false)?;
            TsModuleBody::Nested(self.alloc(inner))
        } else {
            TsModuleBody::Block(self.parse_module_block()?)
        };
        Ok(TsModuleDeclaration {
            data: self.finish_node(start),
            kind,
            id: TsModuleName::Identifier(id),
            declare,
            body: Some(body),
        })
    }

    /// `{ ... }` of a namespace. Exports inside it are tracked separately
    /// from the exports of the enclosing file.
    fn parse_module_block(&mut self) -> PResult<TsModuleBlock<'a>> {
        let start = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let outer_exports = std::mem::take(&mut self.state.exported_names);
        let body = self.parse_module_items();
        self.state.exported_names = outer_exports;
        let body = body?;
        self.expect_closing(TokenKind::BraceR, "namespace body", start)?;
        Ok(TsModuleBlock {
            data: self.finish_node(start),
            body: self.alloc_vec(body),
        })
    }

    /// Namespace members. `import` and `export` are allowed here even when
    /// the file is a script.
    fn parse_module_items(&mut self) -> PResult<Vec<Statement<'a>>> {
        let mut body = Vec::new();
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            let before = self.state.start.index;
            let start = self.start_node();
            let kind = self.state.kind;
            let statement = match kind {
                TokenKind::Export => self.parse_export(start)?,
                TokenKind::Import
                    if !matches!(self.lookahead()?.kind, TokenKind::ParenL | TokenKind::Dot) =>
                {
                    self.parse_import(start)?
                }
                _ => self.parse_statement_list_item(false)?,
            };
            body.push(statement);
            if self.state.start.index == before && !self.at(TokenKind::BraceR) {
                self.next()?;
            }
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{
        ClassMember, ModifierFlags, Statement, Syntax, TsEnumMemberId, TsModuleBody,
        TsModuleKind, TsModuleName, TsTypeElement,
    };
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn ts(source: &str) -> ParseOptions {
        ParseOptions::new(source).with_syntax([Syntax::Ts])
    }

    fn codes(root: &crate::Root<'_>) -> Vec<u32> {
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_interface_with_heritage() {
        let arena = AstArena::new();
        let source = "interface Box<T> extends Base, Other<T> {\n  value: T;\n  map<U>(f: (v: T) => U): Box<U>\n}";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::TsInterface(interface) = &root.statements[0] else {
            panic!("expected an interface");
        };
        assert_eq!(interface.extends.len(), 2);
        assert!(interface.type_parameters.is_some());
        assert!(matches!(interface.body.members[1], TsTypeElement::Method(_)));
    }

    #[test]
    fn test_enums() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("const enum E { A, B = 1 << 2, 'c', }\nenum F {}")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::TsEnum(e) = &root.statements[0] else {
            panic!("expected an enum");
        };
        assert!(e.is_const);
        assert_eq!(e.members.len(), 3);
        assert!(e.members[1].initializer.is_some());
        assert!(matches!(e.members[2].id, TsEnumMemberId::String(_)));
        assert!(matches!(&root.statements[1], Statement::TsEnum(f) if f.members.is_empty()));
    }

    #[test]
    fn test_nested_namespace() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("namespace A.B { export const x = 1; }\nexport const x = 2;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::TsModule(outer) = &root.statements[0] else {
            panic!("expected a namespace");
        };
        assert_eq!(outer.kind, TsModuleKind::Namespace);
        let Some(TsModuleBody::Nested(inner)) = outer.body else {
            panic!("expected a nested namespace");
        };
        let Some(TsModuleBody::Block(block)) = inner.body else {
            panic!("expected a namespace body");
        };
        assert!(matches!(block.body[0], Statement::ExportNamed(_)));
    }

    #[test]
    fn test_imports_inside_module_blocks() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("declare module \"m\" { import a from \"b\"; }\nnamespace N { import(\"c\"); }")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let bodies: Vec<_> = root
            .statements
            .iter()
            .map(|statement| {
                let Statement::TsModule(module) = statement else {
                    panic!("expected a module declaration, got {statement:?}");
                };
                let Some(TsModuleBody::Block(block)) = module.body else {
                    panic!("expected a module body");
                };
                block.body[0]
            })
            .collect();
        assert!(matches!(bodies[0], Statement::Import(_)));
        assert!(matches!(bodies[1], Statement::Expression(_)));
    }

    #[test]
    fn test_declare_forms() {
        let arena = AstArena::new();
        let source = "declare module \"m\";\ndeclare module \"n\" { export function f(): void; }\ndeclare global { interface Window {} }\ndeclare const x: number;\ndeclare function g(a: string): void;";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::TsModule(shorthand) = &root.statements[0] else {
            panic!("expected a module declaration");
        };
        assert!(shorthand.declare && shorthand.body.is_none());
        assert!(matches!(shorthand.id, TsModuleName::String(_)));
        let Statement::TsModule(global) = &root.statements[2] else {
            panic!("expected a global declaration");
        };
        assert_eq!(global.kind, TsModuleKind::Global);
        assert!(matches!(root.statements[3], Statement::VariableDeclaration(_)));
        assert!(matches!(root.statements[4], Statement::FunctionDeclaration(f) if f.body.is_none()));
    }

    #[test]
    fn test_contextual_words_stay_identifiers() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("type = 1;\nnamespace\nfoo;\ndeclare;\nabstract = module;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        assert!(root
            .statements
            .iter()
            .all(|statement| matches!(statement, Statement::Expression(_))));
    }

    #[test]
    fn test_abstract_class_and_modifiers() {
        let arena = AstArena::new();
        let source = "abstract class C {\n  private readonly a = 1;\n  protected abstract m(): void;\n  static\n  s = 2;\n  constructor(public x: number) {}\n}";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::ClassDeclaration(class) = &root.statements[0] else {
            panic!("expected a class");
        };
        assert!(class.is_abstract);
        let ClassMember::Property(a) = class.body.members[0] else {
            panic!("expected a property");
        };
        assert_eq!(a.modifiers, ModifierFlags::PRIVATE | ModifierFlags::READONLY);
        let ClassMember::Method(m) = class.body.members[1] else {
            panic!("expected a method");
        };
        assert!(m.modifiers.contains(ModifierFlags::ABSTRACT));
        assert!(m.function.body.is_none());
        let ClassMember::Property(s) = class.body.members[2] else {
            panic!("expected a property");
        };
        assert!(s.modifiers.contains(ModifierFlags::STATIC));
        let ClassMember::Method(constructor) = class.body.members[3] else {
            panic!("expected a constructor");
        };
        assert_eq!(constructor.function.params[0].modifiers, ModifierFlags::PUBLIC);
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_modifier_errors() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("class C { public public x = 1; }")).unwrap();
        assert_eq!(codes(&root), vec![messages::DUPLICATE_MODIFIER.code]);

        let root = parse(&arena, &ts("function f(private x) {}")).unwrap();
        assert_eq!(codes(&root), vec![messages::PARAMETER_PROPERTY_OUTSIDE_CONSTRUCTOR.code]);

        let root = parse(&arena, &ts("class C { constructor(static x) {} }")).unwrap();
        assert_eq!(codes(&root), vec![messages::MODIFIER_NOT_ALLOWED.code]);
    }

    #[test]
    fn test_declarations_without_typescript() {
        let arena = AstArena::new();
        let root = parse(&arena, &ParseOptions::new("type = 1; type\nx = 2;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);

        let root = parse(&arena, &ParseOptions::new("class C { static s = 1; private p; }")).unwrap();
        assert_eq!(codes(&root), vec![messages::TS_NOT_ENABLED.code]);
    }
}
