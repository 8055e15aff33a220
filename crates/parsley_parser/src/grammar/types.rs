//! TypeScript types: annotations, type parameters and arguments, and the
//! type grammar itself.
//!
//! Types are read with the `Type` scope pushed, which makes the tokenizer
//! return `<` and `>` one character at a time so that `A<B<C>>` closes
//! twice. The scope is popped before the token that ends a type list is
//! consumed, so whatever follows is scanned as ordinary code again.

use crate::parser::Parser;
use crate::scope::{ScopeName, ScopeValue};
use crate::speculation::{BranchOptions, PResult};
use parsley_ast::{
    BooleanLiteral, MappedModifier, MethodKind, ModifierFlags, Param, Pattern, TsArrayType,
    TsConditionalType, TsConstructorType, TsEntityName, TsFunctionType, TsImportType,
    TsIndexSignature, TsIndexedAccessType, TsInferType, TsIntersectionType, TsKeywordKind,
    TsKeywordType, TsLiteral, TsLiteralType, TsMappedType, TsMethodSignature,
    TsParenthesizedType, TsPredicateName, TsPropertySignature, TsQualifiedName, TsSignature,
    TsTemplateLiteralType, TsTupleElement, TsTupleType, TsType, TsTypeArguments, TsTypeElement,
    TsTypeLiteral, TsTypeOperator, TsTypeOperatorKind, TsTypeParameter, TsTypeParameters,
    TsTypePredicate, TsTypeQuery, TsTypeReference, TsUnionType,
};
use parsley_core::{Position, SourceSpan};
use parsley_diagnostics::messages;
use parsley_scanner::TokenKind;

use crate::utilities::is_property_key_start;

/// Type parameters, parameters and return type of a signature.
type SignatureParts<'a> = (
    Option<&'a TsTypeParameters<'a>>,
    &'a [Param<'a>],
    Option<&'a TsType<'a>>,
);

impl<'a> Parser<'a> {
    // ========================================================================
    // Annotations
    // ========================================================================

    /// `: Type` when the current token is a colon.
    pub(crate) fn parse_type_annotation_opt(&mut self) -> PResult<Option<&'a TsType<'a>>> {
        if !self.at(TokenKind::Colon) {
            return Ok(None);
        }
        let span = self.token_span();
        self.require_ts(span)?;
        let annotation = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            p.parse_type_inner()
        })?;
        Ok(Some(self.alloc(annotation)))
    }

    /// A return type annotation, which may also be a type predicate.
    pub(crate) fn parse_return_type_opt(&mut self) -> PResult<Option<&'a TsType<'a>>> {
        if !self.at(TokenKind::Colon) {
            return Ok(None);
        }
        let span = self.token_span();
        self.require_ts(span)?;
        let annotation = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            p.parse_type_or_predicate()
        })?;
        Ok(Some(self.alloc(annotation)))
    }

    /// `x is T`, `asserts x`, `asserts x is T`, or a plain type.
    fn parse_type_or_predicate(&mut self) -> PResult<TsType<'a>> {
        let start = self.start_node();
        if self.at_name("asserts") {
            let next = self.lookahead()?;
            if matches!(next.kind, TokenKind::Name | TokenKind::This) && !next.line_break_before {
                self.next()?;
                let parameter_name = self.parse_predicate_name()?;
                let type_annotation = if self.at_name("is") && !self.has_preceding_line_break() {
                    self.next()?;
                    let asserted = self.parse_type_inner()?;
                    Some(&*self.alloc(asserted))
                } else {
                    None
                };
                return Ok(TsType::Predicate(TsTypePredicate {
                    data: self.finish_node(start),
                    asserts: true,
                    parameter_name,
                    type_annotation,
                }));
            }
        }
        if self.at(TokenKind::Name) || self.at(TokenKind::This) {
            let next = self.lookahead()?;
            if next.is_name("is") && !next.line_break_before {
                let parameter_name = self.parse_predicate_name()?;
                self.next()?;
                let narrowed = self.parse_type_inner()?;
                return Ok(TsType::Predicate(TsTypePredicate {
                    data: self.finish_node(start),
                    asserts: false,
                    parameter_name,
                    type_annotation: Some(self.alloc(narrowed)),
                }));
            }
        }
        self.parse_type_inner()
    }

    fn parse_predicate_name(&mut self) -> PResult<TsPredicateName> {
        if self.at(TokenKind::This) {
            let start = self.start_node();
            self.next()?;
            return Ok(TsPredicateName::This(self.finish_node(start)));
        }
        Ok(TsPredicateName::Identifier(self.parse_identifier_name()?))
    }

    // ========================================================================
    // Type parameters and arguments
    // ========================================================================

    pub(crate) fn parse_type_parameters_opt(
        &mut self,
    ) -> PResult<Option<&'a TsTypeParameters<'a>>> {
        if self.at(TokenKind::Lt) {
            Ok(Some(self.parse_type_parameters()?))
        } else {
            Ok(None)
        }
    }

    /// `<T extends U = V, ...>` at the current `<`.
    pub(crate) fn parse_type_parameters(&mut self) -> PResult<&'a TsTypeParameters<'a>> {
        let start = self.start_node();
        let span = self.token_span();
        self.require_ts(span)?;
        let params = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            let mut params = Vec::new();
            while !p.at(TokenKind::Gt) && !p.at(TokenKind::Eof) {
                params.push(p.parse_type_parameter()?);
                if !p.at(TokenKind::Gt) && !p.expect(TokenKind::Comma)? {
                    break;
                }
            }
            if params.is_empty() {
                p.report_type_expected()?;
            }
            Ok(params)
        })?;
        self.expect_closing(TokenKind::Gt, "type parameter list", start)?;
        let parameters = TsTypeParameters {
            data: self.finish_node(start),
            params: self.alloc_vec(params),
        };
        Ok(self.alloc(parameters))
    }

    fn parse_type_parameter(&mut self) -> PResult<TsTypeParameter<'a>> {
        let start = self.start_node();
        let mut modifiers = ModifierFlags::NONE;
        loop {
            let kind = self.state.kind;
            let (flag, word) = match kind {
                TokenKind::Const => (ModifierFlags::CONST, "const"),
                TokenKind::In => (ModifierFlags::IN, "in"),
                TokenKind::Name
                    if self.at_name("out") && self.lookahead()?.kind == TokenKind::Name =>
                {
                    (ModifierFlags::OUT, "out")
                }
                _ => break,
            };
            if modifiers.contains(flag) {
                let span = self.token_span();
                self.report(&messages::DUPLICATE_MODIFIER, &[word], span)?;
            }
            modifiers |= flag;
            self.next()?;
        }

        let name = self.parse_binding_identifier()?;
        let constraint = if self.eat(TokenKind::Extends)? {
            let constraint = self.parse_type_inner()?;
            Some(&*self.alloc(constraint))
        } else {
            None
        };
        let default = if self.eat(TokenKind::Eq)? {
            let default = self.parse_type_inner()?;
            Some(&*self.alloc(default))
        } else {
            None
        };
        Ok(TsTypeParameter {
            data: self.finish_node(start),
            name,
            modifiers,
            constraint,
            default,
        })
    }

    /// `<A, B>` at the current `<`.
    pub(crate) fn parse_type_arguments(&mut self) -> PResult<&'a TsTypeArguments<'a>> {
        let start = self.start_node();
        let params = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.next()?;
            let mut params = Vec::new();
            while !p.at(TokenKind::Gt) && !p.at(TokenKind::Eof) {
                params.push(p.parse_type_inner()?);
                if !p.at(TokenKind::Gt) && !p.expect(TokenKind::Comma)? {
                    break;
                }
            }
            if params.is_empty() {
                p.report_type_expected()?;
            }
            Ok(params)
        })?;
        self.expect_closing(TokenKind::Gt, "type argument list", start)?;
        let arguments = TsTypeArguments {
            data: self.finish_node(start),
            params: self.alloc_vec(params),
        };
        Ok(self.alloc(arguments))
    }

    /// Type arguments directly after a type name, on the same line.
    fn parse_type_arguments_in_type(&mut self) -> PResult<Option<&'a TsTypeArguments<'a>>> {
        if self.at(TokenKind::Lt) && !self.has_preceding_line_break() {
            Ok(Some(self.parse_type_arguments()?))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// `A` or `A.B.C`.
    pub(crate) fn parse_entity_name(&mut self) -> PResult<TsEntityName<'a>> {
        let start = self.start_node();
        let first = self.parse_identifier_name()?;
        self.parse_entity_name_rest(start, TsEntityName::Identifier(first))
    }

    fn parse_entity_name_rest(
        &mut self,
        start: Position,
        mut name: TsEntityName<'a>,
    ) -> PResult<TsEntityName<'a>> {
        while self.eat(TokenKind::Dot)? {
            let right = self.parse_identifier_name()?;
            let qualified = TsQualifiedName {
                data: self.finish_node(start),
                left: name,
                right,
            };
            name = TsEntityName::Qualified(self.alloc(qualified));
        }
        Ok(name)
    }

    // ========================================================================
    // Function, constructor and conditional types
    // ========================================================================

    /// Any type. Must run with the `Type` scope pushed.
    pub(crate) fn parse_type_inner(&mut self) -> PResult<TsType<'a>> {
        self.parse_type_with(true)
    }

    /// Conditional types are not allowed directly in the `extends` clause of
    /// another conditional type.
    fn parse_type_with(&mut self, allow_conditional: bool) -> PResult<TsType<'a>> {
        let start = self.start_node();
        if self.is_start_of_function_type()? {
            return self.parse_function_type(start);
        }
        if self.at(TokenKind::New)
            || (self.at_name("abstract") && self.lookahead()?.kind == TokenKind::New)
        {
            return self.parse_constructor_type(start);
        }

        let check_type = self.parse_union_type()?;
        if !allow_conditional || self.has_preceding_line_break() || !self.at(TokenKind::Extends) {
            return Ok(check_type);
        }
        self.next()?;
        let extends_type = self.parse_type_with(false)?;
        self.expect(TokenKind::Question)?;
        let true_type = self.parse_type_with(true)?;
        self.expect(TokenKind::Colon)?;
        let false_type = self.parse_type_with(true)?;
        Ok(TsType::Conditional(TsConditionalType {
            data: self.finish_node(start),
            check_type: self.alloc(check_type),
            extends_type: self.alloc(extends_type),
            true_type: self.alloc(true_type),
            false_type: self.alloc(false_type),
        }))
    }

    /// `<` always starts a function type. `(` does when what follows it can
    /// only be a parameter list: `()`, `(...`, `(x:`, `(x,`, `(x?`, `(x=`
    /// or `(x) =>`.
    fn is_start_of_function_type(&mut self) -> PResult<bool> {
        if self.at(TokenKind::Lt) {
            return Ok(true);
        }
        if !self.at(TokenKind::ParenL) {
            return Ok(false);
        }
        self.look(|p| {
            p.next()?;
            if matches!(p.state.kind, TokenKind::ParenR | TokenKind::Ellipsis) {
                return Ok(true);
            }
            if !p.skip_parameter_start()? {
                return Ok(false);
            }
            match p.state.kind {
                TokenKind::Colon | TokenKind::Comma | TokenKind::Question | TokenKind::Eq => {
                    Ok(true)
                }
                TokenKind::ParenR => {
                    p.next()?;
                    Ok(p.at(TokenKind::Arrow))
                }
                _ => Ok(false),
            }
        })
    }

    /// Skip a parameter name or a bracketed binding pattern.
    fn skip_parameter_start(&mut self) -> PResult<bool> {
        if self.at(TokenKind::Name) || self.at(TokenKind::This) {
            self.next()?;
            return Ok(true);
        }
        if !matches!(self.state.kind, TokenKind::BracketL | TokenKind::BraceL) {
            return Ok(false);
        }
        let mut depth = 0usize;
        loop {
            match self.state.kind {
                TokenKind::BracketL | TokenKind::BraceL => depth += 1,
                TokenKind::BracketR | TokenKind::BraceR => depth = depth.saturating_sub(1),
                TokenKind::Eof => return Ok(false),
                _ => {}
            }
            self.next()?;
            if depth == 0 {
                return Ok(true);
            }
        }
    }

    fn parse_function_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        let type_parameters = self.parse_type_parameters_opt()?;
        let params = self.parse_formal_params(false)?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_type_or_predicate()?;
        Ok(TsType::Function(TsFunctionType {
            data: self.finish_node(start),
            type_parameters,
            params,
            return_type: self.alloc(return_type),
        }))
    }

    fn parse_constructor_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        let is_abstract = self.eat_name("abstract")?;
        self.expect(TokenKind::New)?;
        let type_parameters = self.parse_type_parameters_opt()?;
        let params = self.parse_formal_params(false)?;
        self.expect(TokenKind::Arrow)?;
        let return_type = self.parse_type_inner()?;
        Ok(TsType::Constructor(TsConstructorType {
            data: self.finish_node(start),
            is_abstract,
            type_parameters,
            params,
            return_type: self.alloc(return_type),
        }))
    }

    // ========================================================================
    // Unions, intersections, operators
    // ========================================================================

    fn parse_union_type(&mut self) -> PResult<TsType<'a>> {
        self.parse_type_list(TokenKind::Bar, |p| p.parse_intersection_type())
    }

    fn parse_intersection_type(&mut self) -> PResult<TsType<'a>> {
        self.parse_type_list(TokenKind::Amp, |p| p.parse_type_operator())
    }

    /// `A | B | C` or `A & B & C`, with an optional leading operator. A
    /// single member is returned as is.
    fn parse_type_list(
        &mut self,
        operator: TokenKind,
        mut member: impl FnMut(&mut Self) -> PResult<TsType<'a>>,
    ) -> PResult<TsType<'a>> {
        let start = self.start_node();
        self.eat(operator)?;
        let first = member(self)?;
        if !self.at(operator) {
            return Ok(first);
        }
        let mut types = vec![first];
        while self.eat(operator)? {
            types.push(member(self)?);
        }
        let data = self.finish_node(start);
        let types = self.alloc_vec(types);
        Ok(if operator == TokenKind::Bar {
            TsType::Union(TsUnionType { data, types })
        } else {
            TsType::Intersection(TsIntersectionType { data, types })
        })
    }

    fn parse_type_operator(&mut self) -> PResult<TsType<'a>> {
        let start = self.start_node();
        let operator = if self.at_name("keyof") {
            Some(TsTypeOperatorKind::KeyOf)
        } else if self.at_name("unique") {
            Some(TsTypeOperatorKind::Unique)
        } else if self.at_name("readonly") {
            Some(TsTypeOperatorKind::Readonly)
        } else {
            None
        };
        if let Some(operator) = operator {
            self.next()?;
            let operand = self.parse_type_operator()?;
            return Ok(TsType::Operator(TsTypeOperator {
                data: self.finish_node(start),
                operator,
                type_annotation: self.alloc(operand),
            }));
        }
        if self.at_name("infer") {
            return self.parse_infer_type(start);
        }
        self.parse_postfix_type()
    }

    /// `infer U` or `infer U extends C`. The constraint is only taken when
    /// it is not itself the start of a conditional type.
    fn parse_infer_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        self.next()?;
        let param_start = self.start_node();
        let name = self.parse_binding_identifier()?;
        let constraint = self.speculate(BranchOptions::STRICT, |p| {
            if !p.eat(TokenKind::Extends)? {
                return Ok(None);
            }
            let constraint = p.parse_type_with(false)?;
            if p.at(TokenKind::Question) {
                return Ok(None);
            }
            Ok(Some(constraint))
        })?;
        let constraint = match constraint {
            Some(constraint) => Some(&*self.alloc(constraint)),
            None => None,
        };
        let type_parameter = TsTypeParameter {
            data: self.finish_node(param_start),
            name,
            modifiers: ModifierFlags::NONE,
            constraint,
            default: None,
        };
        Ok(TsType::Infer(TsInferType {
            data: self.finish_node(start),
            type_parameter: self.alloc(type_parameter),
        }))
    }

    /// `T[]` and `T[K]`, which must stay on the line of the element type.
    fn parse_postfix_type(&mut self) -> PResult<TsType<'a>> {
        let start = self.start_node();
        let mut ty = self.parse_non_array_type()?;
        while self.at(TokenKind::BracketL) && !self.has_preceding_line_break() {
            self.next()?;
            if self.eat(TokenKind::BracketR)? {
                ty = TsType::Array(TsArrayType {
                    data: self.finish_node(start),
                    element_type: self.alloc(ty),
                });
                continue;
            }
            let index = self.parse_type_inner()?;
            self.expect_closing(TokenKind::BracketR, "indexed access type", start)?;
            ty = TsType::IndexedAccess(TsIndexedAccessType {
                data: self.finish_node(start),
                object_type: self.alloc(ty),
                index_type: self.alloc(index),
            });
        }
        Ok(ty)
    }

    // ========================================================================
    // Primary types
    // ========================================================================

    fn parse_non_array_type(&mut self) -> PResult<TsType<'a>> {
        let start = self.start_node();
        match self.state.kind {
            TokenKind::Name => self.parse_type_name(start),
            TokenKind::Void => self.keyword_type(start, TsKeywordKind::Void),
            TokenKind::Null => self.keyword_type(start, TsKeywordKind::Null),
            TokenKind::This => {
                self.next()?;
                Ok(TsType::This(self.finish_node(start)))
            }
            TokenKind::Typeof => self.parse_type_query(start),
            TokenKind::Import => self.parse_import_type(start),
            TokenKind::String
            | TokenKind::Num
            | TokenKind::BigInt
            | TokenKind::True
            | TokenKind::False => self.parse_literal_type(start, false),
            TokenKind::Minus => {
                if matches!(self.lookahead()?.kind, TokenKind::Num | TokenKind::BigInt) {
                    self.next()?;
                    return self.parse_literal_type(start, true);
                }
                self.type_expected()
            }
            TokenKind::BackQuote => {
                let (quasis, types) = self.parse_template_parts(false, |p| p.parse_type_inner())?;
                Ok(TsType::TemplateLiteral(TsTemplateLiteralType {
                    data: self.finish_node(start),
                    quasis,
                    types,
                }))
            }
            TokenKind::BracketL => self.parse_tuple_type(start),
            TokenKind::BraceL => {
                if self.is_start_of_mapped_type()? {
                    self.parse_mapped_type(start)
                } else {
                    Ok(TsType::TypeLiteral(self.parse_type_members()?))
                }
            }
            TokenKind::ParenL => {
                self.next()?;
                let inner = self.parse_type_inner()?;
                self.expect_closing(TokenKind::ParenR, "parenthesized type", start)?;
                Ok(TsType::Parenthesized(TsParenthesizedType {
                    data: self.finish_node(start),
                    type_annotation: self.alloc(inner),
                }))
            }
            TokenKind::Lt => self.parse_function_type(start),
            TokenKind::New => self.parse_constructor_type(start),
            _ => self.type_expected(),
        }
    }

    fn keyword_type(&mut self, start: Position, kind: TsKeywordKind) -> PResult<TsType<'a>> {
        self.next()?;
        Ok(TsType::Keyword(TsKeywordType {
            data: self.finish_node(start),
            kind,
        }))
    }

    /// A keyword type such as `string`, or a type reference. A keyword
    /// followed by `.` is the start of a qualified name.
    fn parse_type_name(&mut self, start: Position) -> PResult<TsType<'a>> {
        let keyword = TsKeywordKind::from_name(self.token_text());
        let first = self.parse_identifier_name()?;
        if let Some(kind) = keyword {
            if !self.at(TokenKind::Dot) {
                return Ok(TsType::Keyword(TsKeywordType {
                    data: first.data,
                    kind,
                }));
            }
        }
        let type_name = self.parse_entity_name_rest(start, TsEntityName::Identifier(first))?;
        let type_arguments = self.parse_type_arguments_in_type()?;
        Ok(TsType::Reference(TsTypeReference {
            data: self.finish_node(start),
            type_name,
            type_arguments,
        }))
    }

    fn parse_type_query(&mut self, start: Position) -> PResult<TsType<'a>> {
        self.next()?;
        let expr_name = self.parse_entity_name()?;
        let type_arguments = self.parse_type_arguments_in_type()?;
        Ok(TsType::Query(TsTypeQuery {
            data: self.finish_node(start),
            expr_name,
            type_arguments,
        }))
    }

    /// `import("m")`, optionally followed by `.Name` and type arguments.
    fn parse_import_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        self.next()?;
        let open = self.start_node();
        self.expect(TokenKind::ParenL)?;
        let argument = self.parse_string_literal()?;
        self.expect_closing(TokenKind::ParenR, "import type", open)?;
        let qualifier = if self.eat(TokenKind::Dot)? {
            Some(self.parse_entity_name()?)
        } else {
            None
        };
        let type_arguments = self.parse_type_arguments_in_type()?;
        Ok(TsType::Import(TsImportType {
            data: self.finish_node(start),
            argument,
            qualifier,
            type_arguments,
        }))
    }

    fn parse_literal_type(&mut self, start: Position, negative: bool) -> PResult<TsType<'a>> {
        let literal = match self.state.kind {
            TokenKind::String => TsLiteral::String(self.parse_string_literal()?),
            TokenKind::Num => TsLiteral::Number(self.parse_numeric_literal()?),
            TokenKind::BigInt => TsLiteral::BigInt(self.parse_bigint_literal()?),
            kind => {
                let literal_start = self.start_node();
                self.next()?;
                TsLiteral::Boolean(BooleanLiteral {
                    data: self.finish_node(literal_start),
                    value: kind == TokenKind::True,
                })
            }
        };
        Ok(TsType::Literal(TsLiteralType {
            data: self.finish_node(start),
            negative,
            literal,
        }))
    }

    fn parse_tuple_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        self.next()?;
        let mut elements = Vec::new();
        while !self.at(TokenKind::BracketR) && !self.at(TokenKind::Eof) {
            elements.push(self.parse_tuple_element()?);
            if !self.at(TokenKind::BracketR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BracketR, "tuple type", start)?;
        Ok(TsType::Tuple(TsTupleType {
            data: self.finish_node(start),
            elements: self.alloc_vec(elements),
        }))
    }

    /// `T`, `T?`, `...T`, `name: T`, `name?: T` or `...name: T`.
    fn parse_tuple_element(&mut self) -> PResult<TsTupleElement<'a>> {
        let start = self.start_node();
        let rest = self.eat(TokenKind::Ellipsis)?;
        let labeled = (self.at(TokenKind::Name) || self.state.kind.is_keyword())
            && self.look(|p| {
                p.next()?;
                p.eat(TokenKind::Question)?;
                Ok(p.at(TokenKind::Colon))
            })?;

        let mut optional = false;
        let label = if labeled {
            let label = self.parse_identifier_name()?;
            optional = self.eat(TokenKind::Question)?;
            self.expect(TokenKind::Colon)?;
            Some(label)
        } else {
            None
        };
        let element_type = self.parse_type_inner()?;
        if label.is_none() && self.eat(TokenKind::Question)? {
            optional = true;
        }
        Ok(TsTupleElement {
            data: self.finish_node(start),
            label,
            optional,
            rest,
            element_type,
        })
    }

    // ========================================================================
    // Mapped types
    // ========================================================================

    /// `{ [K in ...` with an optional `readonly`, `+readonly` or `-readonly`.
    fn is_start_of_mapped_type(&mut self) -> PResult<bool> {
        self.look(|p| {
            p.next()?;
            if p.at(TokenKind::Plus) || p.at(TokenKind::Minus) {
                p.next()?;
                return Ok(p.at_name("readonly"));
            }
            if p.at_name("readonly") {
                p.next()?;
            }
            if !p.at(TokenKind::BracketL) {
                return Ok(false);
            }
            p.next()?;
            if !p.at(TokenKind::Name) {
                return Ok(false);
            }
            p.next()?;
            Ok(p.at(TokenKind::In))
        })
    }

    fn parse_mapped_modifier(&mut self) -> PResult<Option<MappedModifier>> {
        let modifier = match self.state.kind {
            TokenKind::Plus => MappedModifier::Plus,
            TokenKind::Minus => MappedModifier::Minus,
            _ => return Ok(None),
        };
        self.next()?;
        Ok(Some(modifier))
    }

    fn parse_mapped_type(&mut self, start: Position) -> PResult<TsType<'a>> {
        self.next()?;
        let readonly = match self.parse_mapped_modifier()? {
            Some(modifier) => {
                self.expect_name("readonly")?;
                Some(modifier)
            }
            None if self.eat_name("readonly")? => Some(MappedModifier::Present),
            None => None,
        };

        let bracket = self.start_node();
        self.expect(TokenKind::BracketL)?;
        let param_start = self.start_node();
        let name = self.parse_binding_identifier()?;
        self.expect(TokenKind::In)?;
        let constraint = self.parse_type_inner()?;
        let type_parameter = TsTypeParameter {
            data: self.finish_node(param_start),
            name,
            modifiers: ModifierFlags::NONE,
            constraint: Some(self.alloc(constraint)),
            default: None,
        };
        let name_type = if self.eat_name("as")? {
            let name_type = self.parse_type_inner()?;
            Some(&*self.alloc(name_type))
        } else {
            None
        };
        self.expect_closing(TokenKind::BracketR, "mapped type parameter", bracket)?;

        let optional = match self.parse_mapped_modifier()? {
            Some(modifier) => {
                self.expect(TokenKind::Question)?;
                Some(modifier)
            }
            None if self.eat(TokenKind::Question)? => Some(MappedModifier::Present),
            None => None,
        };
        let type_annotation = if self.eat(TokenKind::Colon)? {
            let value = self.parse_type_inner()?;
            Some(&*self.alloc(value))
        } else {
            None
        };
        if !self.eat(TokenKind::Semi)? {
            self.eat(TokenKind::Comma)?;
        }
        self.expect_closing(TokenKind::BraceR, "mapped type", start)?;
        Ok(TsType::Mapped(TsMappedType {
            data: self.finish_node(start),
            readonly,
            type_parameter: self.alloc(type_parameter),
            name_type,
            optional,
            type_annotation,
        }))
    }

    // ========================================================================
    // Type members
    // ========================================================================

    /// `{ ... }` of a type literal or interface body.
    pub(crate) fn parse_type_members(&mut self) -> PResult<TsTypeLiteral<'a>> {
        let start = self.start_node();
        let members = self.with_scope(ScopeName::Type, ScopeValue::TRUE, |p| {
            p.expect(TokenKind::BraceL)?;
            let mut members = Vec::new();
            while !p.at(TokenKind::BraceR) && !p.at(TokenKind::Eof) {
                let before = p.state.start.index;
                members.push(p.parse_type_member()?);
                p.parse_type_member_separator()?;
                if p.state.start.index == before {
                    p.next()?;
                }
            }
            Ok(members)
        })?;
        self.expect_closing(TokenKind::BraceR, "type literal", start)?;
        Ok(TsTypeLiteral {
            data: self.finish_node(start),
            members: self.alloc_vec(members),
        })
    }

    fn parse_type_member_separator(&mut self) -> PResult<()> {
        if self.eat(TokenKind::Comma)?
            || self.eat(TokenKind::Semi)?
            || self.at(TokenKind::BraceR)
            || self.has_preceding_line_break()
        {
            return Ok(());
        }
        self.expect(TokenKind::Semi).map(drop)
    }

    fn parse_type_member(&mut self) -> PResult<TsTypeElement<'a>> {
        let start = self.start_node();
        if self.at(TokenKind::ParenL) || self.at(TokenKind::Lt) {
            let (type_parameters, params, return_type) = self.parse_signature_rest()?;
            return Ok(TsTypeElement::Call(TsSignature {
                data: self.finish_node(start),
                type_parameters,
                params,
                return_type,
            }));
        }
        if self.at(TokenKind::New)
            && matches!(self.lookahead()?.kind, TokenKind::ParenL | TokenKind::Lt)
        {
            self.next()?;
            let (type_parameters, params, return_type) = self.parse_signature_rest()?;
            return Ok(TsTypeElement::Construct(TsSignature {
                data: self.finish_node(start),
                type_parameters,
                params,
                return_type,
            }));
        }

        let readonly = self.at_name("readonly") && self.modifier_applies()?;
        if readonly {
            self.next()?;
        }
        if self.is_index_signature()? {
            let modifiers = if readonly {
                ModifierFlags::READONLY
            } else {
                ModifierFlags::NONE
            };
            return Ok(TsTypeElement::Index(self.parse_index_signature(start, modifiers)?));
        }

        let kind = if !readonly && (self.at_name("get") || self.at_name("set")) && self.modifier_applies()? {
            let kind = if self.at_name("get") {
                MethodKind::Get
            } else {
                MethodKind::Set
            };
            self.next()?;
            kind
        } else {
            MethodKind::Method
        };
        let key = self.parse_property_key()?;
        let optional = self.eat(TokenKind::Question)?;
        if kind != MethodKind::Method || self.at(TokenKind::ParenL) || self.at(TokenKind::Lt) {
            let (type_parameters, params, return_type) = self.parse_signature_rest()?;
            return Ok(TsTypeElement::Method(TsMethodSignature {
                data: self.finish_node(start),
                kind,
                key,
                optional,
                type_parameters,
                params,
                return_type,
            }));
        }

        let type_annotation = if self.eat(TokenKind::Colon)? {
            let annotation = self.parse_type_inner()?;
            Some(&*self.alloc(annotation))
        } else {
            None
        };
        Ok(TsTypeElement::Property(TsPropertySignature {
            data: self.finish_node(start),
            key,
            readonly,
            optional,
            type_annotation,
        }))
    }

    /// A word such as `readonly` or `get` is a prefix only when a property
    /// key follows it on the same line.
    fn modifier_applies(&mut self) -> PResult<bool> {
        let next = self.lookahead()?;
        Ok(is_property_key_start(next.kind) && !next.line_break_before)
    }

    fn parse_signature_rest(&mut self) -> PResult<SignatureParts<'a>> {
        let type_parameters = self.parse_type_parameters_opt()?;
        let params = self.parse_formal_params(false)?;
        let return_type = self.parse_return_type_opt()?;
        Ok((type_parameters, params, return_type))
    }

    /// `[name: T` at the current `[`, as opposed to a computed key.
    pub(crate) fn is_index_signature(&mut self) -> PResult<bool> {
        if !self.at(TokenKind::BracketL) {
            return Ok(false);
        }
        self.look(|p| {
            p.next()?;
            if !p.at(TokenKind::Name) {
                return Ok(false);
            }
            p.next()?;
            Ok(matches!(p.state.kind, TokenKind::Colon | TokenKind::Comma))
        })
    }

    /// `[key: K]: T` at the current `[`.
    pub(crate) fn parse_index_signature(
        &mut self,
        start: Position,
        modifiers: ModifierFlags,
    ) -> PResult<TsIndexSignature<'a>> {
        let open = self.start_node();
        self.expect(TokenKind::BracketL)?;
        let mut params = Vec::new();
        while !self.at(TokenKind::BracketR) && !self.at(TokenKind::Eof) {
            let param_start = self.start_node();
            let id = self.parse_binding_identifier()?;
            let type_annotation = self.parse_type_annotation_opt()?;
            params.push(Param {
                data: self.finish_node(param_start),
                modifiers: ModifierFlags::NONE,
                pattern: Pattern::Identifier(id),
                optional: false,
                type_annotation,
            });
            if !self.at(TokenKind::BracketR) && !self.expect(TokenKind::Comma)? {
                break;
            }
        }
        self.expect_closing(TokenKind::BracketR, "index signature", open)?;
        let type_annotation = self.parse_type_annotation_opt()?;
        if type_annotation.is_none() {
            let span = SourceSpan::new(start, self.state.last_end);
            self.report(&messages::INDEX_SIGNATURE_TYPE, &[], span)?;
        }
        Ok(TsIndexSignature {
            data: self.finish_node(start),
            modifiers,
            params: self.alloc_vec(params),
            type_annotation,
        })
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn report_type_expected(&mut self) -> PResult<()> {
        let found = self.state.kind.describe();
        let span = self.token_span();
        self.report_corrupt(&messages::TYPE_EXPECTED, &[&found], span)
    }

    fn type_expected(&mut self) -> PResult<TsType<'a>> {
        self.report_type_expected()?;
        Ok(TsType::Missing(self.missing_node()))
    }
}

#[cfg(test)]
mod tests {
    use crate::{parse, ParseOptions};
    use parsley_ast::{
        ModifierFlags, Statement, Syntax, TsKeywordKind, TsType, TsTypeElement,
        TsTypeOperatorKind,
    };
    use parsley_core::AstArena;
    use parsley_diagnostics::messages;

    fn ts(source: &str) -> ParseOptions {
        ParseOptions::new(source).with_syntax([Syntax::Ts])
    }

    /// The aliased type of the first statement, which must be a type alias.
    fn alias_type<'a>(root: &crate::Root<'a>) -> TsType<'a> {
        let Statement::TsTypeAlias(alias) = &root.statements[0] else {
            panic!("expected a type alias, got {:?}", root.statements[0]);
        };
        *alias.type_annotation
    }

    // ========================================================================
    // Type grammar
    // ========================================================================

    #[test]
    fn test_nested_type_arguments_close_twice() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("type A = Map<string, Array<number>>;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Reference(reference) = alias_type(&root) else {
            panic!("expected a type reference");
        };
        let arguments = reference.type_arguments.unwrap();
        assert_eq!(arguments.params.len(), 2);
        assert!(matches!(arguments.params[1], TsType::Reference(_)));
    }

    #[test]
    fn test_type_parameter_modifiers() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("type T<in out X, const Y> = X;\ntype U<out> = out;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let modifiers: Vec<_> = root
            .statements
            .iter()
            .flat_map(|statement| {
                let Statement::TsTypeAlias(alias) = statement else {
                    panic!("expected a type alias");
                };
                alias.type_parameters.unwrap().params.iter().map(|param| param.modifiers)
            })
            .collect();
        assert_eq!(
            modifiers,
            vec![ModifierFlags::IN | ModifierFlags::OUT, ModifierFlags::CONST, ModifierFlags::NONE]
        );
    }

    #[test]
    fn test_function_type_vs_parenthesized() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("type F = (a: string, b?: number) => void;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Function(function) = alias_type(&root) else {
            panic!("expected a function type");
        };
        assert_eq!(function.params.len(), 2);

        let root = parse(&arena, &ts("type P = (string | number)[];")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Array(array) = alias_type(&root) else {
            panic!("expected an array type");
        };
        assert!(matches!(array.element_type, TsType::Parenthesized(_)));
    }

    #[test]
    fn test_conditional_with_infer() {
        let arena = AstArena::new();
        let source = "type U<T> = T extends Promise<infer R extends object> ? R : never;";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Conditional(conditional) = alias_type(&root) else {
            panic!("expected a conditional type");
        };
        let TsType::Reference(promise) = conditional.extends_type else {
            panic!("expected a reference");
        };
        let TsType::Infer(infer) = promise.type_arguments.unwrap().params[0] else {
            panic!("expected an infer type");
        };
        assert!(infer.type_parameter.constraint.is_some());
        assert!(matches!(
            conditional.false_type,
            TsType::Keyword(k) if k.kind == TsKeywordKind::Never
        ));
    }

    #[test]
    fn test_mapped_tuple_and_operators() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("type M = { -readonly [K in keyof T as `get${K}`]+?: T[K] };")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Mapped(mapped) = alias_type(&root) else {
            panic!("expected a mapped type");
        };
        assert!(mapped.name_type.is_some());
        assert!(matches!(
            mapped.type_parameter.constraint,
            Some(TsType::Operator(op)) if op.operator == TsTypeOperatorKind::KeyOf
        ));
        assert!(matches!(mapped.type_annotation, Some(TsType::IndexedAccess(_))));

        let root = parse(&arena, &ts("type T = [a: string, b?: number, ...rest: boolean[]];")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::Tuple(tuple) = alias_type(&root) else {
            panic!("expected a tuple type");
        };
        assert!(tuple.elements[1].optional);
        assert!(tuple.elements[2].rest);
    }

    #[test]
    fn test_type_literal_members() {
        let arena = AstArena::new();
        let source = "type O = {\n  readonly a: string\n  b?(x: number): void;\n  (y: string): number,\n  new (): O;\n  [key: string]: unknown;\n  get c(): number\n};";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let TsType::TypeLiteral(literal) = alias_type(&root) else {
            panic!("expected a type literal");
        };
        let kinds: Vec<_> = literal
            .members
            .iter()
            .map(|member| match member {
                TsTypeElement::Property(p) if p.readonly => "readonly",
                TsTypeElement::Property(_) => "property",
                TsTypeElement::Method(_) => "method",
                TsTypeElement::Call(_) => "call",
                TsTypeElement::Construct(_) => "construct",
                TsTypeElement::Index(_) => "index",
            })
            .collect();
        assert_eq!(kinds, ["readonly", "method", "call", "construct", "index", "method"]);
    }

    #[test]
    fn test_predicates_and_literals() {
        let arena = AstArena::new();
        let source = "function isString(x: unknown): x is string { return true }\nfunction check(v: unknown): asserts v {}\ntype L = -1 | 'a' | true | `x`;";
        let root = parse(&arena, &ts(source)).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
        let Statement::FunctionDeclaration(function) = &root.statements[0] else {
            panic!("expected a function");
        };
        assert!(matches!(function.return_type, Some(TsType::Predicate(p)) if !p.asserts));
        let Statement::FunctionDeclaration(function) = &root.statements[1] else {
            panic!("expected a function");
        };
        assert!(matches!(function.return_type, Some(TsType::Predicate(p)) if p.asserts));
        let Statement::TsTypeAlias(alias) = &root.statements[2] else {
            panic!("expected a type alias");
        };
        let TsType::Union(union) = alias.type_annotation else {
            panic!("expected a union");
        };
        assert!(matches!(union.types[0], TsType::Literal(l) if l.negative));
        assert!(matches!(union.types[3], TsType::TemplateLiteral(_)));
    }

    #[test]
    fn test_comparison_after_as_expression() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("const ok = (x as number) >= 2 && y as Array<T> > z;")).unwrap();
        assert!(root.diagnostics.is_empty(), "{:?}", root.diagnostics);
    }

    // ========================================================================
    // Errors
    // ========================================================================

    #[test]
    fn test_type_errors() {
        let arena = AstArena::new();
        let root = parse(&arena, &ts("let x: = 1;")).unwrap();
        assert!(root.corrupt);
        assert_eq!(root.diagnostics[0].code, messages::TYPE_EXPECTED.code);

        let root = parse(&arena, &ts("class C { [key: string]; }")).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::INDEX_SIGNATURE_TYPE.code]);

        let root = parse(&arena, &ParseOptions::new("let x: number = 1;")).unwrap();
        let codes: Vec<_> = root.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![messages::TS_NOT_ENABLED.code]);
    }
}
