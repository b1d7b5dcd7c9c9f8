//! Type-expression parsing.

use faxc_lex::Token;

use crate::ast::{
    BuiltinType, EnumValueDecl, Ident, StructFieldDecl, Type, TypeFlags, TypeKind, Variadism,
};
use crate::{ParseError, Parser};

fn builtin(token: &Token) -> Option<BuiltinType> {
    Some(match token {
        Token::Void => BuiltinType::Void,
        Token::Bool => BuiltinType::Bool,
        Token::I8 => BuiltinType::I8,
        Token::I16 => BuiltinType::I16,
        Token::I32 => BuiltinType::I32,
        Token::I64 => BuiltinType::I64,
        Token::U8 => BuiltinType::U8,
        Token::U16 => BuiltinType::U16,
        Token::U32 => BuiltinType::U32,
        Token::U64 => BuiltinType::U64,
        Token::Int_ => BuiltinType::Int,
        Token::Uint => BuiltinType::Uint,
        Token::Rune_ => BuiltinType::Rune,
        Token::F32 => BuiltinType::F32,
        Token::F64 => BuiltinType::F64,
        Token::Char => BuiltinType::Char,
        Token::Uintptr => BuiltinType::Uintptr,
        Token::Size => BuiltinType::Size,
        Token::Str_ => BuiltinType::Str,
        _ => return None,
    })
}

pub(crate) fn parse_ident_path(p: &mut Parser) -> Result<Ident, ParseError> {
    let mut segments = vec![p.expect_ident()?];
    while p.eat(&Token::ColonColon) {
        segments.push(p.expect_ident()?);
    }
    let mut iter = segments.into_iter();
    let mut ident = Ident::bare(iter.next().unwrap());
    for seg in iter {
        ident = Ident { name: seg, namespace: Some(Box::new(ident)) };
    }
    Ok(ident)
}

pub(crate) fn parse_type(p: &mut Parser) -> Result<Type, ParseError> {
    let start = p.peek_span();

    let mut flags = TypeFlags::default();
    if p.eat(&Token::Const) {
        flags.is_const = true;
    }

    let kind = parse_type_kind(p)?;
    let span = p.span_from(start);
    Ok(Type { kind, flags, span })
}

fn parse_type_kind(p: &mut Parser) -> Result<TypeKind, ParseError> {
    if p.eat(&Token::Nullable) {
        p.expect(Token::Star)?;
        let referent = Box::new(parse_type(p)?);
        return Ok(TypeKind::Pointer { nullable: true, referent });
    }
    if p.eat(&Token::Star) {
        let referent = Box::new(parse_type(p)?);
        return Ok(TypeKind::Pointer { nullable: false, referent });
    }
    if p.eat(&Token::LBracket) {
        if p.eat(&Token::RBracket) {
            return Ok(TypeKind::Slice(Box::new(parse_type(p)?)));
        }
        if p.eat(&Token::Star) {
            p.expect(Token::RBracket)?;
            return Ok(TypeKind::Array { elem: Box::new(parse_type(p)?), len: None });
        }
        let len = crate::expr::parse_expr(p)?;
        p.expect(Token::RBracket)?;
        let elem = Box::new(parse_type(p)?);
        return Ok(TypeKind::Array { elem, len: Some(Box::new(len)) });
    }
    if p.eat(&Token::Struct) {
        return Ok(TypeKind::Struct(parse_field_list(p)?));
    }
    if p.eat(&Token::Union) {
        return Ok(TypeKind::Union(parse_field_list(p)?));
    }
    if p.eat(&Token::Enum) {
        let storage = if !p.at(&Token::LBrace) {
            Some(Box::new(parse_type(p)?))
        } else {
            None
        };
        p.expect(Token::LBrace)?;
        let mut values = Vec::new();
        while !p.at(&Token::RBrace) {
            let span = p.peek_span();
            let name = p.expect_ident()?;
            let value = if p.eat(&Token::Eq) { Some(crate::expr::parse_expr(p)?) } else { None };
            values.push(EnumValueDecl { name, value, span: p.span_from(span) });
            if !p.eat(&Token::Comma) {
                break;
            }
        }
        p.expect(Token::RBrace)?;
        return Ok(TypeKind::Enum { storage, values });
    }
    if p.eat(&Token::Fn) {
        p.expect(Token::LParen)?;
        let mut params = Vec::new();
        let mut variadism = Variadism::None;
        while !p.at(&Token::RParen) {
            let ty = parse_type(p)?;
            if p.eat(&Token::DotDotDot) {
                params.push(ty);
                variadism = Variadism::Native;
                break;
            }
            params.push(ty);
            if !p.eat(&Token::Comma) {
                break;
            }
        }
        p.expect(Token::RParen)?;
        let result = Box::new(parse_type(p)?);
        return Ok(TypeKind::Function { params, variadism, result });
    }
    if p.eat(&Token::LParen) {
        let mut members = vec![parse_type(p)?];
        while p.eat(&Token::Pipe) {
            members.push(parse_type(p)?);
        }
        p.expect(Token::RParen)?;
        return Ok(TypeKind::TaggedUnion(members));
    }
    if let Some(b) = builtin(p.peek()) {
        p.advance();
        return Ok(TypeKind::Builtin(b));
    }

    let ident = parse_ident_path(p)?;
    Ok(TypeKind::Alias(ident))
}

fn parse_field_list(p: &mut Parser) -> Result<Vec<StructFieldDecl>, ParseError> {
    p.expect(Token::LBrace)?;
    let mut fields = Vec::new();
    while !p.at(&Token::RBrace) {
        let span = p.peek_span();
        let name = p.expect_ident()?;
        p.expect(Token::Colon)?;
        let ty = parse_type(p)?;
        fields.push(StructFieldDecl { name, ty, span: p.span_from(span) });
        if !p.eat(&Token::Comma) {
            break;
        }
    }
    p.expect(Token::RBrace)?;
    Ok(fields)
}
