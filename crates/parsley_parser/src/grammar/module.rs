//! `import` and `export` declarations, including the TypeScript forms
//! (`import type`, `import x = require(...)`, `export =`).

use crate::parser::Parser;
use crate::speculation::PResult;
use parsley_ast::{
    ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultKind, ExportNamedDeclaration,
    ExportSpecifier, Identifier, ImportDeclaration, ImportExportKind, ImportNamedSpecifier,
    ImportNamespaceSpecifier, ImportSpecifier, ModuleExportName, ObjectPatternProperty, Pattern,
    Statement, TsExportAssignment, TsImportEqualsDeclaration, TsModuleReference,
};
use parsley_core::{Atom, Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

impl<'a> Parser<'a> {
    // ========================================================================
    // Imports
    // ========================================================================

    pub(crate) fn parse_import(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.expect(TokenKind::Import)?;

        if self.at(TokenKind::String) {
            let source = self.parse_string_literal()?;
            self.semicolon()?;
            return Ok(Statement::Import(ImportDeclaration {
                data: self.finish_node(start),
                kind: ImportExportKind::Value,
                specifiers: &[],
                source,
            }));
        }

        let mut kind = ImportExportKind::Value;
        if self.at_name("type") && self.is_type_only_import()? {
            let span = self.token_span();
            self.require_ts(span)?;
            self.next()?;
            kind = ImportExportKind::Type;
        }

        let mut specifiers = Vec::new();
        if self.at(TokenKind::Name) {
            let local = self.parse_binding_identifier()?;
            if self.at(TokenKind::Eq) {
                return self.parse_import_equals(start, false, kind, local);
            }
            specifiers.push(ImportSpecifier::Default(local));
            if self.eat(TokenKind::Comma)? {
                self.parse_import_clause(&mut specifiers)?;
            }
        } else {
            self.parse_import_clause(&mut specifiers)?;
        }

        self.expect_name("from")?;
        let source = self.parse_string_literal()?;
        self.semicolon()?;
        Ok(Statement::Import(ImportDeclaration {
            data: self.finish_node(start),
            kind,
            specifiers: self.alloc_vec(specifiers),
            source,
        }))
    }

    /// `import type X`, `import type { ... }`, `import type * as ns`, but
    /// not `import type from "m"`, which imports a default named `type`.
    fn is_type_only_import(&mut self) -> PResult<bool> {
        let next = self.lookahead()?;
        Ok(match next.kind {
            TokenKind::BraceL | TokenKind::Star => true,
            TokenKind::Name => !next.is_name("from"),
            _ => false,
        })
    }

    /// `* as ns` or `{ a, b as c }`.
    fn parse_import_clause(&mut self, specifiers: &mut Vec<ImportSpecifier<'a>>) -> PResult<()> {
        if self.at(TokenKind::Star) {
            let start = self.start_node();
            self.next()?;
            self.expect_name("as")?;
            let local = self.parse_binding_identifier()?;
            specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                data: self.finish_node(start),
                local,
            }));
            return Ok(());
        }

        let open = self.start_node();
        if !self.expect(TokenKind::BraceL)? {
            return Ok(());
        }
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            specifiers.push(self.parse_import_specifier()?);
            if !self.at(TokenKind::BraceR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BraceR, "import list", open)?;
        Ok(())
    }

    fn parse_import_specifier(&mut self) -> PResult<ImportSpecifier<'a>> {
        let start = self.start_node();
        let is_type = self.eat_inline_type_modifier()?;
        let imported = self.parse_module_export_name()?;
        let local = if self.eat_name("as")? {
            self.parse_binding_identifier()?
        } else {
            match imported {
                ModuleExportName::Identifier(id) => {
                    self.check_shorthand_name(&id, true)?;
                    Identifier {
                        data: self.clone_node_without_comments(&id.data),
                        name: id.name,
                    }
                }
                ModuleExportName::String(_) => {
                    let found = self.state.kind.describe();
                    let span = self.token_span();
                    self.report_corrupt(&messages::EXPECTED_TOKEN, &["as", &found], span)?;
                    self.missing_identifier()
                }
            }
        };
        Ok(ImportSpecifier::Named(ImportNamedSpecifier {
            data: self.finish_node(start),
            imported,
            local,
            is_type,
        }))
    }

    /// `type` before a single specifier in TypeScript: `{ type A, b }`.
    fn eat_inline_type_modifier(&mut self) -> PResult<bool> {
        if !self.ts_enabled() || !self.at_name("type") {
            return Ok(false);
        }
        let next = self.lookahead()?;
        let names_something = matches!(next.kind, TokenKind::Name | TokenKind::String)
            || next.kind.is_keyword();
        if names_something && !next.is_name("as") {
            self.next()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn parse_module_export_name(&mut self) -> PResult<ModuleExportName<'a>> {
        if self.at(TokenKind::String) {
            Ok(ModuleExportName::String(self.parse_string_literal()?))
        } else {
            Ok(ModuleExportName::Identifier(self.parse_identifier_name()?))
        }
    }

    /// `import x = require("m")` and `import x = A.B.C`.
    fn parse_import_equals(
        &mut self,
        start: Position,
        is_export: bool,
        kind: ImportExportKind,
        id: Identifier,
    ) -> PResult<Statement<'a>> {
        let span = self.token_span();
        self.require_ts(span)?;
        self.expect(TokenKind::Eq)?;
        let module_reference =
            if self.at_name("require") && self.lookahead()?.kind == TokenKind::ParenL {
                self.next()?;
                let open = self.start_node();
                self.expect(TokenKind::ParenL)?;
                let source = self.parse_string_literal()?;
                self.expect_closing(TokenKind::ParenR, "require call", open)?;
                TsModuleReference::External(source)
            } else {
                TsModuleReference::Entity(self.parse_entity_name()?)
            };
        self.semicolon()?;
        Ok(Statement::TsImportEquals(TsImportEqualsDeclaration {
            data: self.finish_node(start),
            is_export,
            kind,
            id,
            module_reference,
        }))
    }

    // ========================================================================
    // Exports
    // ========================================================================

    pub(crate) fn parse_export(&mut self, start: Position) -> PResult<Statement<'a>> {
        self.expect(TokenKind::Export)?;
        match self.state.kind {
            TokenKind::Star => self.parse_export_all(start, ImportExportKind::Value),
            TokenKind::Default => self.parse_export_default(start),
            TokenKind::BraceL => self.parse_export_list(start, ImportExportKind::Value),
            TokenKind::Eq if self.ts_enabled() => {
                self.next()?;
                let expression = self.parse_expression()?;
                self.semicolon()?;
                Ok(Statement::TsExportAssignment(TsExportAssignment {
                    data: self.finish_node(start),
                    expression: self.alloc(expression),
                }))
            }
            TokenKind::Import if self.ts_enabled() => {
                self.next()?;
                let id = self.parse_binding_identifier()?;
                self.parse_import_equals(start, true, ImportExportKind::Value, id)
            }
            TokenKind::Name if self.at_name("type") && self.ts_enabled() => {
                let next = self.lookahead()?.kind;
                if matches!(next, TokenKind::BraceL | TokenKind::Star) {
                    self.next()?;
                    if self.at(TokenKind::Star) {
                        return self.parse_export_all(start, ImportExportKind::Type);
                    }
                    return self.parse_export_list(start, ImportExportKind::Type);
                }
                self.parse_export_declaration(start)
            }
            _ => self.parse_export_declaration(start),
        }
    }

    fn parse_export_all(&mut self, start: Position, kind: ImportExportKind) -> PResult<Statement<'a>> {
        self.expect(TokenKind::Star)?;
        let exported = if self.eat_name("as")? {
            let name = self.parse_module_export_name()?;
            self.record_export_name(&name)?;
            Some(name)
        } else {
            None
        };
        self.expect_name("from")?;
        let source = self.parse_string_literal()?;
        self.semicolon()?;
        Ok(Statement::ExportAll(ExportAllDeclaration {
            data: self.finish_node(start),
            kind,
            exported,
            source,
        }))
    }

    fn parse_export_default(&mut self, start: Position) -> PResult<Statement<'a>> {
        let default_span = self.token_span();
        self.next()?;
        let declaration_start = self.start_node();
        let declaration = if self.at(TokenKind::Function) {
            let function = self.parse_function(declaration_start, false, false, false)?;
            ExportDefaultKind::Function(self.alloc(function))
        } else if self.at_name("async") && self.is_async_function()? {
            self.next()?;
            let function = self.parse_function(declaration_start, false, true, false)?;
            ExportDefaultKind::Function(self.alloc(function))
        } else if self.at(TokenKind::Class) {
            let class = self.parse_class(declaration_start, false, false, false)?;
            ExportDefaultKind::Class(self.alloc(class))
        } else if self.ts_enabled()
            && self.at_name("abstract")
            && self.lookahead()?.kind == TokenKind::Class
        {
            self.next()?;
            let class = self.parse_class(declaration_start, false, false, true)?;
            ExportDefaultKind::Class(self.alloc(class))
        } else if self.ts_enabled() && self.at_name("interface") && self.lookahead()?.kind == TokenKind::Name {
            let interface = self.parse_interface(declaration_start, false)?;
            ExportDefaultKind::Interface(self.alloc(interface))
        } else {
            let expression = self.allow_in(|p| p.parse_maybe_assign())?;
            self.semicolon()?;
            ExportDefaultKind::Expression(self.alloc(expression))
        };
        let default = self.intern("default");
        self.record_export(default, default_span)?;
        Ok(Statement::ExportDefault(ExportDefaultDeclaration {
            data: self.finish_node(start),
            declaration,
        }))
    }

    fn parse_export_list(&mut self, start: Position, kind: ImportExportKind) -> PResult<Statement<'a>> {
        let open = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let mut specifiers = Vec::new();
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            let specifier_start = self.start_node();
            let is_type = self.eat_inline_type_modifier()?;
            let local = self.parse_module_export_name()?;
            let exported = if self.eat_name("as")? {
                self.parse_module_export_name()?
            } else {
                match local {
                    ModuleExportName::Identifier(id) => ModuleExportName::Identifier(Identifier {
                        data: self.clone_node_without_comments(&id.data),
                        name: id.name,
                    }),
                    other => other,
                }
            };
            self.record_export_name(&exported)?;
            specifiers.push(ExportSpecifier {
                data: self.finish_node(specifier_start),
                local,
                exported,
                is_type,
            });
            if !self.at(TokenKind::BraceR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BraceR, "export list", open)?;
        let source = if self.eat_name("from")? {
            Some(self.parse_string_literal()?)
        } else {
            None
        };
        self.semicolon()?;
        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            data: self.finish_node(start),
            kind,
            declaration: None,
            specifiers: self.alloc_vec(specifiers),
            source,
        }))
    }

    /// `export` followed by a declaration statement.
    fn parse_export_declaration(&mut self, start: Position) -> PResult<Statement<'a>> {
        let found = self.state.kind.describe();
        let span = self.token_span();
        let declaration = self.parse_statement_list_item(true)?;
        let is_declaration = matches!(
            declaration,
            Statement::VariableDeclaration(_)
                | Statement::FunctionDeclaration(_)
                | Statement::ClassDeclaration(_)
                | Statement::TsInterface(_)
                | Statement::TsTypeAlias(_)
                | Statement::TsEnum(_)
                | Statement::TsModule(_)
        );
        if !is_declaration {
            self.report_corrupt(&messages::UNEXPECTED_TOKEN, &[&found], span)?;
        }
        for id in self.exported_value_names(&declaration) {
            self.record_export(id.name, id.data.span)?;
        }
        Ok(Statement::ExportNamed(ExportNamedDeclaration {
            data: self.finish_node(start),
            kind: ImportExportKind::Value,
            declaration: Some(self.alloc(declaration)),
            specifiers: &[],
            source: None,
        }))
    }

    /// Value bindings a declaration exports. Overload signatures, ambient
    /// classes and type-level declarations merge, so they are not tracked.
    fn exported_value_names(&self, declaration: &Statement<'a>) -> Vec<Identifier> {
        let mut names = Vec::new();
        match declaration {
            Statement::VariableDeclaration(variables) if !variables.declare => {
                for declarator in variables.declarations {
                    collect_binding_names(&declarator.id, &mut names);
                }
            }
            Statement::FunctionDeclaration(function) if function.body.is_some() => {
                names.extend(function.id);
            }
            Statement::ClassDeclaration(class) if !class.declare => names.extend(class.id),
            _ => {}
        }
        names
    }

    fn record_export_name(&mut self, name: &ModuleExportName<'a>) -> PResult<()> {
        match name {
            ModuleExportName::Identifier(id) => self.record_export(id.name, id.data.span),
            ModuleExportName::String(literal) => {
                let atom = self.intern(literal.value);
                self.record_export(atom, literal.data.span)
            }
        }
    }

    fn record_export(&mut self, name: Atom, span: SourceSpan) -> PResult<()> {
        let duplicate = self
            .state
            .exported_names
            .iter_rev()
            .any(|(exported, _)| *exported == name);
        if duplicate {
            let text = self.interner.resolve(name).to_string();
            self.report(&messages::DUPLICATE_EXPORT, &[&text], span)?;
        }
        self.state.exported_names.push((name, span));
        Ok(())
    }
}

fn collect_binding_names(pattern: &Pattern<'_>, names: &mut Vec<Identifier>) {
    match pattern {
        Pattern::Identifier(id) => names.push(*id),
        Pattern::Object(object) => {
            for property in object.properties {
                match property {
                    ObjectPatternProperty::Property(entry) => collect_binding_names(&entry.value, names),
                    ObjectPatternProperty::Rest(rest) => collect_binding_names(rest.argument, names),
                }
            }
        }
        Pattern::Array(array) => {
            for element in array.elements.iter().flatten() {
                collect_binding_names(element, names);
            }
        }
        Pattern::Assignment(assign) => collect_binding_names(assign.left, names),
        Pattern::Rest(rest) => collect_binding_names(rest.argument, names),
        Pattern::Expression(_) | Pattern::Placeholder(_) | Pattern::Missing(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{ImportExportKind, ImportSpecifier, SourceType, Statement, Syntax};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn module_codes(source: &str, syntax: &[Syntax]) -> Vec<u32> {
        let arena = AstArena::new();
        let options = ParseOptions::new(source)
            .with_source_type(SourceType::Module)
            .with_syntax(syntax.iter().copied());
        let root = parse(&arena, &options).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_import_forms() {
        let arena = AstArena::new();
        let source = "import a, { b as c, 'd e' as f } from 'm';\nimport * as ns from 'n';\nimport 'side-effect';";
        let options = ParseOptions::new(source).with_source_type(SourceType::Module);
        let root = parse(&arena, &options).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::Import(first) = &root.statements[0] else {
            panic!("expected an import");
        };
        assert_eq!(first.specifiers.len(), 3);
        assert!(matches!(first.specifiers[0], ImportSpecifier::Default(_)));
        assert!(matches!(root.statements[1], Statement::Import(ref i) if matches!(i.specifiers[0], ImportSpecifier::Namespace(_))));
        assert!(matches!(root.statements[2], Statement::Import(ref i) if i.specifiers.is_empty()));
    }

    #[test]
    fn test_export_forms() {
        let source = "export const a = 1, { b } = c;\nexport function f() {}\nexport default class {}\nexport { a as x, f as 'y' };\nexport * as z from 'm';";
        assert!(module_codes(source, &[]).is_empty());
    }

    #[test]
    fn test_duplicate_exports() {
        assert_eq!(
            module_codes("export const a = 1; export { a };", &[]),
            vec![messages::DUPLICATE_EXPORT.code]
        );
        assert_eq!(
            module_codes("export default 1; export default 2;", &[]),
            vec![messages::DUPLICATE_EXPORT.code]
        );
    }

    #[test]
    fn test_typescript_module_forms() {
        let source = "import type { A } from 'a';\nimport { type B, c } from 'b';\nimport fs = require('fs');\nexport type { A };\nexport interface I {}\nexport function g(): void;\nexport function g() {}";
        assert!(module_codes(source, &[Syntax::Ts]).is_empty());

        let arena = AstArena::new();
        let options = ParseOptions::new("import type from 'x';")
            .with_source_type(SourceType::Module)
            .with_syntax([Syntax::Ts]);
        let root = parse(&arena, &options).unwrap();
        assert!(matches!(root.statements[0], Statement::Import(ref i) if i.kind == ImportExportKind::Value));
    }

    #[test]
    fn test_import_in_script() {
        let arena = AstArena::new();
        let options = ParseOptions::new("import a from 'a';").with_source_type(SourceType::Script);
        let root = parse(&arena, &options).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::IMPORT_EXPORT_IN_SCRIPT.code]);
    }
}
