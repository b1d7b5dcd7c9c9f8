//! Expression parsing via precedence climbing.
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators |
//! |---|---|
//! | 1 | `\|\|` |
//! | 2 | `&&` |
//! | 3 | `^^` |
//! | 4 | `==` `!=` `<` `<=` `>` `>=` |
//! | 5 | `\|` |
//! | 6 | `^` |
//! | 7 | `&` |
//! | 8 | `<<` `>>` |
//! | 9 | `+` `-` |
//! | 10 | `*` `/` `%` |
//!
//! `as`/`is` bind tighter than any binary operator; assignment is parsed
//! at the top of [`parse_expr`] and is right-associative and
//! non-chaining.

use faxc_lex::Token;

use crate::ast::{
    ArrayElement, BinOp, BindingDecl, CastKind, ControlKind, Expr, ExprKind, MeasureOp,
    MeasureOperand, StructLiteralField, SwitchCase, UnOp,
};
use crate::types::{parse_ident_path, parse_type};
use crate::{ParseError, Parser};

fn binding_power(op: BinOp) -> u8 {
    use BinOp::*;
    match op {
        LOr => 1,
        LAnd => 2,
        LXor => 3,
        Eq | Ne | Lt | Le | Gt | Ge => 4,
        BitOr => 5,
        BitXor => 6,
        BitAnd => 7,
        Shl | Shr => 8,
        Add | Sub => 9,
        Mul | Div | Mod => 10,
    }
}

fn binop_for(token: &Token) -> Option<BinOp> {
    Some(match token {
        Token::PipePipe => BinOp::LOr,
        Token::AmpAmp => BinOp::LAnd,
        Token::CaretCaret => BinOp::LXor,
        Token::EqEq => BinOp::Eq,
        Token::NotEq => BinOp::Ne,
        Token::Lt => BinOp::Lt,
        Token::Le => BinOp::Le,
        Token::Gt => BinOp::Gt,
        Token::Ge => BinOp::Ge,
        Token::Pipe => BinOp::BitOr,
        Token::Caret => BinOp::BitXor,
        Token::Amp => BinOp::BitAnd,
        Token::Shl => BinOp::Shl,
        Token::Shr => BinOp::Shr,
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Percent => BinOp::Mod,
        _ => return None,
    })
}

fn assign_op_for(token: &Token) -> Option<Option<BinOp>> {
    Some(match token {
        Token::Eq => None,
        Token::PlusEq => Some(BinOp::Add),
        Token::MinusEq => Some(BinOp::Sub),
        Token::StarEq => Some(BinOp::Mul),
        Token::SlashEq => Some(BinOp::Div),
        Token::PercentEq => Some(BinOp::Mod),
        Token::AmpEq => Some(BinOp::BitAnd),
        Token::PipeEq => Some(BinOp::BitOr),
        Token::CaretEq => Some(BinOp::BitXor),
        Token::ShlEq => Some(BinOp::Shl),
        Token::ShrEq => Some(BinOp::Shr),
        _ => return None,
    })
}

/// Entry point: assignment, then binary expressions.
pub(crate) fn parse_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let lhs = parse_binary(p, 0)?;

    if let Some(op) = assign_op_for(p.peek()) {
        p.advance();
        let value = Box::new(parse_expr(p)?);
        let span = p.span_from(start);
        let (object, indirect) = match lhs.kind {
            ExprKind::Unarithm { op: UnOp::Deref, operand } => (operand, true),
            other => (Box::new(Expr { kind: other, span: lhs.span }), false),
        };
        return Ok(Expr {
            kind: ExprKind::Assign { object, value, op, indirect },
            span,
        });
    }

    Ok(lhs)
}

fn parse_binary(p: &mut Parser, min_bp: u8) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let mut lhs = parse_cast_chain(p)?;

    loop {
        let Some(op) = binop_for(p.peek()) else { break };
        let bp = binding_power(op);
        if bp < min_bp {
            break;
        }
        p.advance();
        let rhs = parse_binary(p, bp + 1)?;
        let span = p.span_from(start);
        lhs = Expr {
            kind: ExprKind::Binarithm { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
            span,
        };
    }

    Ok(lhs)
}

fn parse_cast_chain(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let mut value = parse_unary(p)?;

    loop {
        if p.eat(&Token::As) {
            let ty = parse_type(p)?;
            let span = p.span_from(start);
            value = Expr { kind: ExprKind::Cast { kind: CastKind::Plain, value: Box::new(value), ty }, span };
        } else if p.eat(&Token::Is) {
            let ty = parse_type(p)?;
            let span = p.span_from(start);
            value = Expr { kind: ExprKind::Cast { kind: CastKind::Test, value: Box::new(value), ty }, span };
        } else {
            break;
        }
    }

    Ok(value)
}

fn parse_unary(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let op = match p.peek() {
        Token::Bang => Some(UnOp::Not),
        Token::Tilde => Some(UnOp::BitNot),
        Token::Minus => Some(UnOp::Neg),
        Token::Plus => Some(UnOp::Plus),
        Token::Amp => Some(UnOp::Address),
        Token::Star => Some(UnOp::Deref),
        _ => None,
    };
    if let Some(op) = op {
        p.advance();
        let operand = Box::new(parse_unary(p)?);
        let span = p.span_from(start);
        return Ok(Expr { kind: ExprKind::Unarithm { op, operand }, span });
    }
    parse_postfix(p)
}

fn parse_postfix(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let mut expr = parse_primary(p)?;

    loop {
        if p.eat(&Token::Dot) {
            let field = p.expect_ident()?;
            let span = p.span_from(start);
            expr = Expr { kind: ExprKind::Field { object: Box::new(expr), field }, span };
        } else if p.eat(&Token::LParen) {
            let mut args = Vec::new();
            while !p.at(&Token::RParen) {
                args.push(parse_expr(p)?);
                if !p.eat(&Token::Comma) {
                    break;
                }
            }
            p.expect(Token::RParen)?;
            let span = p.span_from(start);
            expr = Expr { kind: ExprKind::Call { callee: Box::new(expr), args }, span };
        } else if p.eat(&Token::LBracket) {
            if p.eat(&Token::Colon) {
                let end = if p.at(&Token::RBracket) { None } else { Some(Box::new(parse_expr(p)?)) };
                p.expect(Token::RBracket)?;
                let span = p.span_from(start);
                expr = Expr { kind: ExprKind::Slice { object: Box::new(expr), start: None, end }, span };
                continue;
            }
            let first = parse_expr(p)?;
            if p.eat(&Token::Colon) {
                let end = if p.at(&Token::RBracket) { None } else { Some(Box::new(parse_expr(p)?)) };
                p.expect(Token::RBracket)?;
                let span = p.span_from(start);
                expr = Expr {
                    kind: ExprKind::Slice { object: Box::new(expr), start: Some(Box::new(first)), end },
                    span,
                };
            } else {
                p.expect(Token::RBracket)?;
                let span = p.span_from(start);
                expr = Expr {
                    kind: ExprKind::Index { array: Box::new(expr), index: Box::new(first) },
                    span,
                };
            }
        } else {
            break;
        }
    }

    Ok(expr)
}

fn parse_primary(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();

    match p.peek().clone() {
        Token::Int(v) => {
            p.advance();
            let span = p.span_from(start);
            let kind = if v <= i64::MAX as u64 { ExprKind::ConstantInt(v as i64) } else { ExprKind::ConstantUInt(v) };
            Ok(Expr { kind, span })
        }
        Token::Float(v) => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantFloat(v), span: p.span_from(start) })
        }
        Token::Str(s) => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantStr(s), span: p.span_from(start) })
        }
        Token::Rune(c) => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantRune(c), span: p.span_from(start) })
        }
        Token::True => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantBool(true), span: p.span_from(start) })
        }
        Token::False => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantBool(false), span: p.span_from(start) })
        }
        Token::Null => {
            p.advance();
            Ok(Expr { kind: ExprKind::ConstantNull, span: p.span_from(start) })
        }
        Token::LParen => {
            p.advance();
            let inner = parse_expr(p)?;
            p.expect(Token::RParen)?;
            Ok(inner)
        }
        Token::LBracket => parse_array_literal(p),
        Token::LBrace => parse_list(p),
        Token::Let | Token::Const => parse_binding_expr(p),
        Token::If => parse_if(p),
        Token::For => parse_for(p),
        Token::Switch => parse_switch(p),
        Token::Return => {
            p.advance();
            let value = if p.at(&Token::Semicolon) || p.at(&Token::RBrace) {
                None
            } else {
                Some(Box::new(parse_expr(p)?))
            };
            Ok(Expr { kind: ExprKind::Return(value), span: p.span_from(start) })
        }
        Token::Break => {
            p.advance();
            let label = parse_optional_label(p);
            Ok(Expr { kind: ExprKind::Control { kind: ControlKind::Break, label }, span: p.span_from(start) })
        }
        Token::Continue => {
            p.advance();
            let label = parse_optional_label(p);
            Ok(Expr { kind: ExprKind::Control { kind: ControlKind::Continue, label }, span: p.span_from(start) })
        }
        Token::Defer => {
            p.advance();
            let inner = Box::new(parse_expr(p)?);
            Ok(Expr { kind: ExprKind::Defer(inner), span: p.span_from(start) })
        }
        Token::Assert => parse_assert(p),
        Token::Struct => parse_struct_literal(p),
        Token::Ident(name)
            if (name.as_str() == "len" || name.as_str() == "size" || name.as_str() == "offset")
                && matches!(p.peek_at(1), Token::LParen) =>
        {
            parse_measure(p, name.as_str())
        }
        Token::Ident(_) => {
            let ident = parse_ident_path(p)?;
            Ok(Expr { kind: ExprKind::Ident(ident), span: p.span_from(start) })
        }
        found => Err(ParseError::Unexpected { found, span: p.peek_span() }),
    }
}

fn parse_optional_label(p: &mut Parser) -> Option<faxc_util::Symbol> {
    if let Token::Label(name) = p.peek().clone() {
        p.advance();
        Some(name)
    } else {
        None
    }
}

fn parse_array_literal(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::LBracket)?;
    let mut elements = Vec::new();
    while !p.at(&Token::RBracket) {
        let value = parse_expr(p)?;
        let expand = p.eat(&Token::DotDotDot);
        elements.push(ArrayElement { value, expand });
        if !p.eat(&Token::Comma) {
            break;
        }
    }
    p.expect(Token::RBracket)?;
    Ok(Expr { kind: ExprKind::ArrayLiteral(elements), span: p.span_from(start) })
}

fn parse_list(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::LBrace)?;
    let mut exprs = Vec::new();
    while !p.at(&Token::RBrace) {
        exprs.push(parse_expr(p)?);
        if !p.eat(&Token::Semicolon) {
            break;
        }
    }
    p.expect(Token::RBrace)?;
    Ok(Expr { kind: ExprKind::List(exprs), span: p.span_from(start) })
}

fn parse_binding_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    let mut decls = Vec::new();
    loop {
        let decl_start = p.peek_span();
        let is_static = p.eat(&Token::Static);
        let is_const = match p.peek() {
            Token::Let => {
                p.advance();
                false
            }
            Token::Const => {
                p.advance();
                true
            }
            found => {
                return Err(ParseError::Expected {
                    expected: "let or const".to_string(),
                    found: found.clone(),
                    span: p.peek_span(),
                })
            }
        };
        let name = p.expect_ident()?;
        let ty = if p.eat(&Token::Colon) { Some(parse_type(p)?) } else { None };
        p.expect(Token::Eq)?;
        let init = parse_expr(p)?;
        decls.push(BindingDecl { name, ty, is_const, is_static, init, span: p.span_from(decl_start) });
        if !p.eat(&Token::Comma) {
            break;
        }
    }
    Ok(Expr { kind: ExprKind::Binding(decls), span: p.span_from(start) })
}

fn parse_if(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::If)?;
    p.expect(Token::LParen)?;
    let cond = Box::new(parse_expr(p)?);
    p.expect(Token::RParen)?;
    let then_branch = Box::new(parse_expr(p)?);
    let else_branch = if p.eat(&Token::Else) { Some(Box::new(parse_expr(p)?)) } else { None };
    Ok(Expr { kind: ExprKind::If { cond, then_branch, else_branch }, span: p.span_from(start) })
}

fn parse_for(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::For)?;
    let label = parse_optional_label(p);
    p.expect(Token::LParen)?;

    let first = if p.at(&Token::Semicolon) {
        None
    } else if p.at(&Token::Let) || p.at(&Token::Const) {
        Some(Box::new(parse_binding_expr(p)?))
    } else {
        Some(Box::new(parse_expr(p)?))
    };

    let (bindings, cond, afterthought) = if p.eat(&Token::Semicolon) {
        let cond = if p.at(&Token::Semicolon) { None } else { Some(Box::new(parse_expr(p)?)) };
        p.expect(Token::Semicolon)?;
        let after = if p.at(&Token::RParen) { None } else { Some(Box::new(parse_expr(p)?)) };
        (first, cond, after)
    } else {
        (None, first, None)
    };
    p.expect(Token::RParen)?;
    let body = Box::new(parse_expr(p)?);

    Ok(Expr { kind: ExprKind::For { label, bindings, cond, afterthought, body }, span: p.span_from(start) })
}

fn parse_switch(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::Switch)?;
    let value = Box::new(parse_expr(p)?);
    p.expect(Token::LBrace)?;
    let mut cases = Vec::new();
    while !p.at(&Token::RBrace) {
        p.expect(Token::Case)?;
        let mut options = Vec::new();
        if !p.at(&Token::FatArrow) {
            options.push(parse_expr(p)?);
            while p.eat(&Token::Comma) {
                options.push(parse_expr(p)?);
            }
        }
        p.expect(Token::FatArrow)?;
        let body = parse_expr(p)?;
        cases.push(SwitchCase { options, body });
        if !p.eat(&Token::Comma) {
            p.eat(&Token::Semicolon);
        }
    }
    p.expect(Token::RBrace)?;
    Ok(Expr { kind: ExprKind::Switch { value, cases }, span: p.span_from(start) })
}

fn parse_assert(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::Assert)?;
    p.expect(Token::LParen)?;
    let mut cond = None;
    let mut message = None;
    if !p.at(&Token::RParen) {
        cond = Some(Box::new(parse_expr(p)?));
        if p.eat(&Token::Comma) {
            message = Some(Box::new(parse_expr(p)?));
        }
    }
    p.expect(Token::RParen)?;
    Ok(Expr { kind: ExprKind::Assert { cond, message }, span: p.span_from(start) })
}

fn parse_struct_literal(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.expect(Token::Struct)?;
    p.expect(Token::LBrace)?;
    let mut fields = Vec::new();
    while !p.at(&Token::RBrace) {
        let name = p.expect_ident()?;
        p.expect(Token::Colon)?;
        let value = parse_expr(p)?;
        fields.push(StructLiteralField { name, value });
        if !p.eat(&Token::Comma) {
            break;
        }
    }
    p.expect(Token::RBrace)?;
    Ok(Expr { kind: ExprKind::StructLiteral { name: None, fields }, span: p.span_from(start) })
}

fn parse_measure(p: &mut Parser, which: &str) -> Result<Expr, ParseError> {
    let start = p.peek_span();
    p.advance(); // the `len`/`size`/`offset` identifier
    p.expect(Token::LParen)?;
    let op = match which {
        "len" => MeasureOp::Len,
        "size" => MeasureOp::Size,
        _ => MeasureOp::Offset,
    };
    let operand = if op == MeasureOp::Size {
        MeasureOperand::Type(parse_type(p)?)
    } else {
        MeasureOperand::Expr(Box::new(parse_expr(p)?))
    };
    p.expect(Token::RParen)?;
    Ok(Expr { kind: ExprKind::Measure { op, operand }, span: p.span_from(start) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser as RealParser;
    use faxc_lex::tokenize;
    use faxc_util::FileId;

    fn parse(src: &str) -> Expr {
        let tokens = tokenize(src, FileId::DUMMY).unwrap();
        let mut p = RealParser::new(tokens);
        parse_expr(&mut p).unwrap()
    }

    #[test]
    fn precedence_mul_over_add() {
        let e = parse("2 + 3 * 4");
        match e.kind {
            ExprKind::Binarithm { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(rhs.kind, ExprKind::Binarithm { op: BinOp::Mul, .. }));
            }
            _ => panic!("expected addition at the top"),
        }
    }

    #[test]
    fn index_and_field_chain() {
        let e = parse("a.b[0]");
        assert!(matches!(e.kind, ExprKind::Index { .. }));
    }

    #[test]
    fn slice_with_both_bounds() {
        let e = parse("a[1:2]");
        match e.kind {
            ExprKind::Slice { start: Some(_), end: Some(_), .. } => {}
            _ => panic!("expected a bounded slice"),
        }
    }

    #[test]
    fn cast_binds_tighter_than_binary() {
        let e = parse("a as int + b");
        assert!(matches!(e.kind, ExprKind::Binarithm { op: BinOp::Add, .. }));
    }

    #[test]
    fn indirect_assignment_unwraps_deref() {
        let e = parse("*p = 1");
        match e.kind {
            ExprKind::Assign { indirect: true, .. } => {}
            _ => panic!("expected an indirect assignment"),
        }
    }

    #[test]
    fn labelled_break() {
        let e = parse("break :outer");
        match e.kind {
            ExprKind::Control { kind: ControlKind::Break, label: Some(_) } => {}
            _ => panic!("expected a labelled break"),
        }
    }
}
