//! Class declarations and expressions.

use crate::parser::Parser;
use crate::scope::{ClassKind, ScopeName, ScopeValue};
use crate::speculation::PResult;
use parsley_ast::{
    Class, ClassBody, ClassMember, ClassMethod, ClassProperty, MethodKind, ModifierFlags,
    PropertyKey, StaticBlock, TsExpressionWithTypeArguments,
};
use parsley_core::Position;
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

const MEMBER_MODIFIERS: ModifierFlags = ModifierFlags::ACCESSIBILITY
    .union(ModifierFlags::STATIC)
    .union(ModifierFlags::READONLY)
    .union(ModifierFlags::ABSTRACT)
    .union(ModifierFlags::OVERRIDE)
    .union(ModifierFlags::DECLARE)
    .union(ModifierFlags::ACCESSOR);

impl<'a> Parser<'a> {
    /// `start` is at `class`, or at `abstract`/`declare`/`export` when the
    /// caller consumed those.
    pub(crate) fn parse_class(
        &mut self,
        start: Position,
        is_statement: bool,
        declare: bool,
        is_abstract: bool,
    ) -> PResult<Class<'a>> {
        self.expect(TokenKind::Class)?;

        let id = if self.at(TokenKind::Name) && !self.at_name("implements") {
            let id = self.with_scope(ScopeName::Strict, ScopeValue::TRUE, |p| {
                p.parse_binding_identifier()
            })?;
            Some(id)
        } else {
            if is_statement {
                let found = self.state.kind.describe();
                let span = self.token_span();
                self.report(&messages::EXPECTED_IDENTIFIER, &[&found], span)?;
            }
            None
        };
        let type_parameters = self.parse_type_parameters_opt()?;

        let mut super_class = None;
        let mut super_type_arguments = None;
        if self.eat(TokenKind::Extends)? {
            let heritage_start = self.start_node();
            let atom = self.parse_expr_atom()?;
            let heritage = self.parse_subscripts(atom, heritage_start, false)?;
            super_class = Some(&*self.alloc(heritage));
            if self.ts_enabled() && self.at(TokenKind::Lt) {
                super_type_arguments = Some(self.parse_type_arguments()?);
            }
        }

        let mut implements = Vec::new();
        if self.at_name("implements") {
            let span = self.token_span();
            self.require_ts(span)?;
            self.next()?;
            loop {
                implements.push(self.parse_heritage_type()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }

        let class_kind = if super_class.is_some() {
            ClassKind::Derived
        } else {
            ClassKind::Base
        };
        let scopes = [
            (ScopeName::Strict, ScopeValue::TRUE),
            (ScopeName::ClassKind, ScopeValue::Class(class_kind)),
        ];
        let body = self.with_scopes(&scopes, |p| p.parse_class_body())?;

        Ok(Class {
            data: self.finish_node(start),
            id,
            is_abstract,
            declare,
            type_parameters,
            super_class,
            super_type_arguments,
            implements: self.alloc_vec(implements),
            body,
        })
    }

    /// `Name.Name<Args>` in `implements` and interface `extends` lists.
    pub(crate) fn parse_heritage_type(&mut self) -> PResult<TsExpressionWithTypeArguments<'a>> {
        let start = self.start_node();
        let expression = self.parse_entity_name()?;
        let type_arguments = if self.at(TokenKind::Lt) {
            Some(self.parse_type_arguments()?)
        } else {
            None
        };
        Ok(TsExpressionWithTypeArguments {
            data: self.finish_node(start),
            expression,
            type_arguments,
        })
    }

    fn parse_class_body(&mut self) -> PResult<ClassBody<'a>> {
        let start = self.start_node();
        self.expect(TokenKind::BraceL)?;
        let mut members = Vec::new();
        let mut has_constructor = false;
        while !self.at(TokenKind::BraceR) && !self.at(TokenKind::Eof) {
            let before = self.state.start.index;
            members.push(self.parse_class_member(&mut has_constructor)?);
            if self.state.start.index == before {
                self.next()?;
            }
        }
        self.expect_closing(TokenKind::BraceR, "class body", start)?;
        Ok(ClassBody {
            data: self.finish_node(start),
            members: self.alloc_vec(members),
        })
    }

    fn parse_class_member(&mut self, has_constructor: &mut bool) -> PResult<ClassMember<'a>> {
        let start = self.start_node();
        if self.eat(TokenKind::Semi)? {
            return Ok(ClassMember::Empty(self.finish_node(start)));
        }
        if self.at_name("static") && self.lookahead()?.kind == TokenKind::BraceL {
            return self.parse_static_block(start).map(ClassMember::StaticBlock);
        }

        let modifiers = self.parse_modifiers(MEMBER_MODIFIERS)?;
        if self.ts_enabled() && self.at(TokenKind::BracketL) && self.is_index_signature()? {
            let signature = self.parse_index_signature(start, modifiers)?;
            self.semicolon()?;
            return Ok(ClassMember::IndexSignature(signature));
        }

        let prefix = self.parse_method_prefix()?;
        let key = self.parse_property_key()?;
        let is_constructor = !modifiers.contains(ModifierFlags::STATIC) && self.is_constructor_key(&key);

        let optional = self.ts_enabled() && self.eat(TokenKind::Question)?;
        if prefix.is_method() || self.at(TokenKind::ParenL) || self.at(TokenKind::Lt) {
            let kind = if is_constructor {
                self.check_constructor_prefix(prefix.kind, prefix.is_async, prefix.is_generator, &key)?;
                MethodKind::Constructor
            } else {
                prefix.kind
            };
            let body_optional = self.ts_enabled()
                || modifiers.contains(ModifierFlags::ABSTRACT)
                || self.state.in_ambient;
            let function = self.parse_method(
                prefix.is_async,
                prefix.is_generator,
                kind,
                kind == MethodKind::Constructor,
                body_optional,
            )?;

            if function.body.is_some() {
                if modifiers.contains(ModifierFlags::ABSTRACT) {
                    let name = self.key_name(&key);
                    self.report(&messages::ABSTRACT_WITH_BODY, &[&name], function.data.span)?;
                }
                if kind == MethodKind::Constructor {
                    if *has_constructor {
                        self.report(&messages::DUPLICATE_CONSTRUCTOR, &[], key_span(&key))?;
                    }
                    *has_constructor = true;
                }
            }
            return Ok(ClassMember::Method(ClassMethod {
                data: self.finish_node(start),
                kind,
                key,
                modifiers,
                optional,
                function: self.alloc(function),
            }));
        }

        if is_constructor {
            self.report(&messages::INVALID_CONSTRUCTOR, &["a field"], key_span(&key))?;
        }
        let definite = !optional && self.ts_enabled() && self.eat(TokenKind::Bang)?;
        let type_annotation = self.parse_type_annotation_opt()?;
        let value = if self.eat(TokenKind::Eq)? {
            let value = self.with_class_initializer_scopes(|p| p.allow_in(|p| p.parse_maybe_assign()))?;
            Some(&*self.alloc(value))
        } else {
            None
        };
        self.semicolon()?;
        Ok(ClassMember::Property(ClassProperty {
            data: self.finish_node(start),
            key,
            modifiers,
            optional,
            definite,
            type_annotation,
            value,
        }))
    }

    fn parse_static_block(&mut self, start: Position) -> PResult<StaticBlock<'a>> {
        self.next()?;
        let open = self.start_node();
        let saved_labels = std::mem::take(&mut self.state.labels);
        let result = self.with_class_initializer_scopes(|p| {
            p.expect(TokenKind::BraceL)?;
            let mut body = Vec::new();
            p.parse_statements_into(TokenKind::BraceR, false, &mut body)?;
            p.expect_closing(TokenKind::BraceR, "static block", open)?;
            Ok(body)
        });
        self.state.labels = saved_labels;
        let body = result?;
        Ok(StaticBlock {
            data: self.finish_node(start),
            body: self.alloc_vec(body),
        })
    }

    /// Field initializers and static blocks see `this` and `super.x` as a
    /// method would, but `arguments` and `await` are off limits.
    fn with_class_initializer_scopes<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<R>,
    ) -> PResult<R> {
        let scopes = [
            (ScopeName::ClassProperty, ScopeValue::TRUE),
            (ScopeName::MethodKind, ScopeValue::Method(MethodKind::Method)),
            (ScopeName::Async, ScopeValue::FALSE),
            (ScopeName::Parameters, ScopeValue::FALSE),
        ];
        self.with_scopes(&scopes, f)
    }

    fn is_constructor_key(&self, key: &PropertyKey<'a>) -> bool {
        match key {
            PropertyKey::Identifier(id) => self.name_of(id) == "constructor",
            PropertyKey::String(literal) => literal.value == "constructor",
            _ => false,
        }
    }

    fn check_constructor_prefix(
        &mut self,
        kind: MethodKind,
        is_async: bool,
        is_generator: bool,
        key: &PropertyKey<'a>,
    ) -> PResult<()> {
        let what = match kind {
            MethodKind::Get | MethodKind::Set => "an accessor",
            _ if is_generator => "a generator",
            _ if is_async => "an async method",
            _ => return Ok(()),
        };
        self.report(&messages::INVALID_CONSTRUCTOR, &[what], key_span(key))
    }

    fn key_name(&self, key: &PropertyKey<'a>) -> String {
        match key {
            PropertyKey::Identifier(id) => self.name_of(id).to_string(),
            PropertyKey::String(literal) => literal.value.to_string(),
            PropertyKey::Number(literal) => literal.raw.to_string(),
            PropertyKey::BigInt(literal) => format!("{}n", literal.value),
            PropertyKey::Private(name) => format!("#{}", self.interner.resolve(name.name)),
            PropertyKey::Computed(_) => "[computed]".to_string(),
        }
    }
}

fn key_span(key: &PropertyKey<'_>) -> parsley_core::SourceSpan {
    match key {
        PropertyKey::Identifier(id) => id.data.span,
        PropertyKey::String(literal) => literal.data.span,
        PropertyKey::Number(literal) => literal.data.span,
        PropertyKey::BigInt(literal) => literal.data.span,
        PropertyKey::Private(name) => name.data.span,
        PropertyKey::Computed(computed) => computed.data.span,
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{ClassMember, MethodKind, Statement, Syntax};
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn codes(source: &str, syntax: &[Syntax]) -> Vec<u32> {
        let arena = AstArena::new();
        let options = ParseOptions::new(source).with_syntax(syntax.iter().copied());
        let root = parse(&arena, &options).unwrap();
        root.diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_class_members() {
        let arena = AstArena::new();
        let source = "class A extends B {\n  #x = 1;\n  static y;\n  'constructor'() { super(); }\n  get z() { return this.#x; }\n  static { this.y = 2; }\n  ;\n}";
        let root = parse(&arena, &ParseOptions::new(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::ClassDeclaration(class) = &root.statements[0] else {
            panic!("expected a class declaration");
        };
        assert!(class.super_class.is_some());
        let members = class.body.members;
        assert_eq!(members.len(), 6);
        assert!(matches!(members[2], ClassMember::Method(m) if m.kind == MethodKind::Constructor));
        assert!(matches!(members[3], ClassMember::Method(m) if m.kind == MethodKind::Get));
        assert!(matches!(members[4], ClassMember::StaticBlock(_)));
        assert!(matches!(members[5], ClassMember::Empty(_)));
    }

    #[test]
    fn test_constructor_rules() {
        assert_eq!(
            codes("class A { constructor() {} constructor() {} }", &[]),
            vec![messages::DUPLICATE_CONSTRUCTOR.code]
        );
        assert_eq!(
            codes("class A { get constructor() {} }", &[]),
            vec![messages::INVALID_CONSTRUCTOR.code]
        );
        assert_eq!(
            codes("class A { constructor() { super(); } }", &[]),
            vec![messages::SUPER_CALL_OUTSIDE_CONSTRUCTOR.code]
        );
        assert!(codes("class A { static constructor() {} }", &[]).is_empty());
    }

    #[test]
    fn test_typescript_members() {
        let source = "abstract class A<T> implements I, J<T> {\n  private readonly x: number = 1;\n  [key: string]: any;\n  constructor(public y: T) {}\n  abstract m(): void;\n  n?(): void;\n}";
        assert!(codes(source, &[Syntax::Ts]).is_empty());
        assert_eq!(
            codes("class A { static static x; }", &[Syntax::Ts]),
            vec![messages::DUPLICATE_MODIFIER.code]
        );
        assert_eq!(
            codes("abstract class A { abstract m() {} }", &[Syntax::Ts]),
            vec![messages::ABSTRACT_WITH_BODY.code]
        );
        assert_eq!(codes("class A { private x; }", &[]), vec![messages::TS_NOT_ENABLED.code]);
    }

    #[test]
    fn test_private_names_need_a_class() {
        assert_eq!(codes("this.#x;", &[]), vec![messages::PRIVATE_NAME_OUTSIDE_CLASS.code]);
    }
}
