//! Top-level declaration parsing: `use`, `const`, `let`, `type`, `fn`.

use faxc_lex::Token;

use crate::ast::{Attr, ConstDecl, Decl, DeclKind, FuncDecl, GlobalDecl, Ident, ParamDecl, TypeDecl, Variadism};
use crate::types::{parse_ident_path, parse_type};
use crate::{ParseError, Parser};

pub(crate) fn parse_use(p: &mut Parser) -> Result<Ident, ParseError> {
    p.expect(Token::Use)?;
    let ident = parse_ident_path(p)?;
    p.expect(Token::Semicolon)?;
    Ok(ident)
}

pub(crate) fn parse_decl(p: &mut Parser) -> Result<Decl, ParseError> {
    let start = p.peek_span();
    let exported = p.eat(&Token::Export);
    let attrs = parse_attrs(p)?;

    let kind = match p.peek() {
        Token::Const => DeclKind::Const(parse_const_decl(p)?),
        Token::Let => DeclKind::Global(parse_global_decl(p)?),
        Token::Type => DeclKind::Type(parse_type_decl(p)?),
        Token::Fn => DeclKind::Func(parse_func_decl(p, attrs)?),
        found => {
            return Err(ParseError::Expected {
                expected: "const, let, type, or fn declaration".to_string(),
                found: found.clone(),
                span: p.peek_span(),
            })
        }
    };

    Ok(Decl { kind, exported, span: p.span_from(start) })
}

fn parse_attrs(p: &mut Parser) -> Result<Vec<Attr>, ParseError> {
    let mut attrs = Vec::new();
    while p.eat(&Token::At) {
        let name = p.expect_ident()?;
        match name.as_str() {
            "init" => attrs.push(Attr::Init),
            "fini" => attrs.push(Attr::Fini),
            "test" => attrs.push(Attr::Test),
            "symbol" => {
                p.expect(Token::LParen)?;
                let sym = match p.peek().clone() {
                    Token::Str(s) => {
                        p.advance();
                        s
                    }
                    found => {
                        return Err(ParseError::Expected {
                            expected: "string literal".to_string(),
                            found,
                            span: p.peek_span(),
                        })
                    }
                };
                p.expect(Token::RParen)?;
                attrs.push(Attr::Symbol(sym));
            }
            _ => {
                return Err(ParseError::Unexpected { found: Token::Ident(name), span: p.peek_span() })
            }
        }
    }
    Ok(attrs)
}

fn parse_const_decl(p: &mut Parser) -> Result<ConstDecl, ParseError> {
    p.expect(Token::Const)?;
    let name = p.expect_ident()?;
    p.expect(Token::Colon)?;
    let ty = parse_type(p)?;
    p.expect(Token::Eq)?;
    let init = crate::expr::parse_expr(p)?;
    p.expect(Token::Semicolon)?;
    Ok(ConstDecl { name, ty, init })
}

fn parse_global_decl(p: &mut Parser) -> Result<GlobalDecl, ParseError> {
    p.expect(Token::Let)?;
    let name = p.expect_ident()?;
    p.expect(Token::Colon)?;
    let ty = parse_type(p)?;
    let init = if p.eat(&Token::Eq) { Some(crate::expr::parse_expr(p)?) } else { None };
    p.expect(Token::Semicolon)?;
    Ok(GlobalDecl { name, ty, init })
}

fn parse_type_decl(p: &mut Parser) -> Result<TypeDecl, ParseError> {
    p.expect(Token::Type)?;
    let name = p.expect_ident()?;
    p.expect(Token::Eq)?;
    let ty = parse_type(p)?;
    p.expect(Token::Semicolon)?;
    Ok(TypeDecl { name, ty })
}

fn parse_func_decl(p: &mut Parser, attrs: Vec<Attr>) -> Result<FuncDecl, ParseError> {
    let start = p.peek_span();
    p.expect(Token::Fn)?;
    let name = p.expect_ident()?;
    let (params, variadism) = parse_params(p)?;
    let result = parse_type(p)?;
    let body = if p.eat(&Token::Eq) { Some(crate::expr::parse_expr(p)?) } else { None };
    p.expect(Token::Semicolon)?;
    Ok(FuncDecl { name, params, variadism, result, body, attrs, span: p.span_from(start) })
}

fn parse_params(p: &mut Parser) -> Result<(Vec<ParamDecl>, Variadism), ParseError> {
    p.expect(Token::LParen)?;
    let mut params = Vec::new();
    let mut variadism = Variadism::None;

    while !p.at(&Token::RParen) {
        if p.eat(&Token::DotDotDot) {
            variadism = Variadism::C;
            break;
        }
        let span = p.peek_span();
        let name = p.expect_ident()?;
        p.expect(Token::Colon)?;
        let ty = parse_type(p)?;
        if p.eat(&Token::DotDotDot) {
            params.push(ParamDecl { name, ty, span: p.span_from(span) });
            variadism = Variadism::Native;
            break;
        }
        params.push(ParamDecl { name, ty, span: p.span_from(span) });
        if !p.eat(&Token::Comma) {
            break;
        }
    }

    p.expect(Token::RParen)?;
    Ok((params, variadism))
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_lex::tokenize;
    use faxc_util::FileId;

    fn decl(src: &str) -> Decl {
        let tokens = tokenize(src, FileId::DUMMY).unwrap();
        let mut p = Parser::new(tokens);
        parse_decl(&mut p).unwrap()
    }

    #[test]
    fn const_decl() {
        let d = decl("const PI: f64 = 3.14;");
        assert!(matches!(d.kind, DeclKind::Const(_)));
    }

    #[test]
    fn exported_fn_with_native_variadism() {
        let d = decl("export fn f(a: int, values: int...) void;");
        assert!(d.exported);
        match d.kind {
            DeclKind::Func(f) => {
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.variadism, Variadism::Native);
            }
            _ => panic!("expected a function declaration"),
        }
    }

    #[test]
    fn init_attribute() {
        let d = decl("@init fn setup() void = {};");
        match d.kind {
            DeclKind::Func(f) => assert!(matches!(f.attrs.as_slice(), [Attr::Init])),
            _ => panic!("expected a function declaration"),
        }
    }

    #[test]
    fn global_without_initializer() {
        let d = decl("let counter: int;");
        match d.kind {
            DeclKind::Global(g) => assert!(g.init.is_none()),
            _ => panic!("expected a global declaration"),
        }
    }

    #[test]
    fn type_alias() {
        let d = decl("type celsius = f64;");
        assert!(matches!(d.kind, DeclKind::Type(_)));
    }
}
