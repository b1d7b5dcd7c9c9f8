//! faxc-lex - tokenizer for the checker's input language.
//!
//! Deliberately thin: the interesting engineering in this workspace is the
//! checker (`faxc-sem`), not lexical analysis. This crate turns source text
//! into a flat `Vec<TokenWithSpan>`, tracking byte offsets and line/column
//! via [`cursor::Cursor`].

pub mod cursor;

use cursor::Cursor;
use faxc_util::{FileId, Span, Symbol};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(Symbol),
    Int(u64),
    Float(f64),
    Str(Symbol),
    Rune(char),

    // Keywords
    Fn,
    Use,
    Let,
    Const,
    Static,
    Export,
    Type,
    Struct,
    Union,
    Enum,
    If,
    Else,
    For,
    Break,
    Continue,
    Return,
    Defer,
    Switch,
    Case,
    Assert,
    As,
    Is,
    Null,
    True,
    False,
    Nullable,
    Void,
    Bool,
    Str_,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    Int_,
    Uint,
    Rune_,
    F32,
    F64,
    Char,
    Uintptr,
    Size,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    ColonColon,
    Dot,
    DotDotDot,
    At,
    Label(Symbol),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpAmp,
    PipePipe,
    CaretCaret,
    Shl,
    Shr,

    Eq,
    EqEq,
    FatArrow,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,

    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,

    Eof,
}

/// A token with its source span.
#[derive(Debug, Clone)]
pub struct TokenWithSpan {
    pub token: Token,
    pub span: Span,
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unterminated rune literal")]
    UnterminatedRune { span: Span },
    #[error("invalid numeric literal: {text}")]
    InvalidNumber { text: String, span: Span },
    #[error("unexpected character '{ch}'")]
    UnexpectedChar { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::UnterminatedRune { span }
            | LexError::InvalidNumber { span, .. }
            | LexError::UnexpectedChar { span, .. } => *span,
        }
    }
}

fn keyword(text: &str) -> Option<Token> {
    Some(match text {
        "fn" => Token::Fn,
        "use" => Token::Use,
        "let" => Token::Let,
        "const" => Token::Const,
        "static" => Token::Static,
        "export" => Token::Export,
        "type" => Token::Type,
        "struct" => Token::Struct,
        "union" => Token::Union,
        "enum" => Token::Enum,
        "if" => Token::If,
        "else" => Token::Else,
        "for" => Token::For,
        "break" => Token::Break,
        "continue" => Token::Continue,
        "return" => Token::Return,
        "defer" => Token::Defer,
        "switch" => Token::Switch,
        "case" => Token::Case,
        "assert" => Token::Assert,
        "as" => Token::As,
        "is" => Token::Is,
        "null" => Token::Null,
        "true" => Token::True,
        "false" => Token::False,
        "nullable" => Token::Nullable,
        "void" => Token::Void,
        "bool" => Token::Bool,
        "str" => Token::Str_,
        "i8" => Token::I8,
        "u8" => Token::U8,
        "i16" => Token::I16,
        "u16" => Token::U16,
        "i32" => Token::I32,
        "u32" => Token::U32,
        "i64" => Token::I64,
        "u64" => Token::U64,
        "int" => Token::Int_,
        "uint" => Token::Uint,
        "rune" => Token::Rune_,
        "f32" => Token::F32,
        "f64" => Token::F64,
        "char" => Token::Char,
        "uintptr" => Token::Uintptr,
        "size" => Token::Size,
        _ => return None,
    })
}

/// Tokenize `source`, tagging every span with `file_id`.
pub fn tokenize(source: &str, file_id: FileId) -> Result<Vec<TokenWithSpan>, LexError> {
    let mut cursor = Cursor::new(source);
    let mut out = Vec::new();

    loop {
        skip_trivia(&mut cursor);
        if cursor.is_at_end() {
            out.push(TokenWithSpan {
                token: Token::Eof,
                span: point_span(&cursor, file_id),
            });
            break;
        }

        let start = cursor.position();
        let start_line = cursor.line();
        let start_col = cursor.column();
        let ch = cursor.current_char();

        let token = if ch == '_' || ch.is_alphabetic() {
            lex_ident_or_keyword(&mut cursor)
        } else if ch.is_ascii_digit() {
            lex_number(&mut cursor).map_err(|e| with_span(e, start, cursor.position(), start_line, start_col, file_id))?
        } else if ch == '"' {
            lex_string(&mut cursor).map_err(|e| with_span(e, start, cursor.position(), start_line, start_col, file_id))?
        } else if ch == '\'' {
            lex_rune(&mut cursor).map_err(|e| with_span(e, start, cursor.position(), start_line, start_col, file_id))?
        } else if ch == ':' {
            lex_colon_or_label(&mut cursor)
        } else {
            lex_punct(&mut cursor).ok_or(LexError::UnexpectedChar {
                ch,
                span: Span::with_file(start, start + 1, file_id, start_line, start_col),
            })?
        };

        let end = cursor.position();
        out.push(TokenWithSpan {
            token,
            span: Span::with_file(start, end, file_id, start_line, start_col),
        });
    }

    Ok(out)
}

fn with_span(err: LexError, start: usize, end: usize, line: u32, col: u32, file_id: FileId) -> LexError {
    let span = Span::with_file(start, end, file_id, line, col);
    match err {
        LexError::UnterminatedString { .. } => LexError::UnterminatedString { span },
        LexError::UnterminatedRune { .. } => LexError::UnterminatedRune { span },
        LexError::InvalidNumber { text, .. } => LexError::InvalidNumber { text, span },
        LexError::UnexpectedChar { ch, .. } => LexError::UnexpectedChar { ch, span },
    }
}

fn point_span(cursor: &Cursor, file_id: FileId) -> Span {
    Span::with_file(cursor.position(), cursor.position(), file_id, cursor.line(), cursor.column())
}

fn skip_trivia(cursor: &mut Cursor) {
    loop {
        cursor.skip_whitespace();
        if cursor.current_char() == '/' && cursor.peek_char(1) == '/' {
            while !cursor.is_at_end() && cursor.current_char() != '\n' {
                cursor.advance();
            }
            continue;
        }
        if cursor.current_char() == '/' && cursor.peek_char(1) == '*' {
            cursor.advance_n(2);
            while !cursor.is_at_end() && !(cursor.current_char() == '*' && cursor.peek_char(1) == '/') {
                cursor.advance();
            }
            if !cursor.is_at_end() {
                cursor.advance_n(2);
            }
            continue;
        }
        break;
    }
}

fn lex_ident_or_keyword(cursor: &mut Cursor) -> Token {
    let start = cursor.position();
    while cursor.current_char() == '_' || cursor.current_char().is_alphanumeric() {
        cursor.advance();
    }
    let text = cursor.slice_from(start);
    keyword(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
}

fn lex_number(cursor: &mut Cursor) -> Result<Token, LexError> {
    let start = cursor.position();

    if cursor.current_char() == '0' && matches!(cursor.peek_char(1), 'x' | 'X') {
        cursor.advance_n(2);
        while cursor.current_char().is_ascii_hexdigit() || cursor.current_char() == '_' {
            cursor.advance();
        }
        let text = cursor.slice_from(start + 2).replace('_', "");
        return u64::from_str_radix(&text, 16)
            .map(Token::Int)
            .map_err(|_| LexError::InvalidNumber { text: cursor.slice_from(start).to_string(), span: Span::DUMMY });
    }
    if cursor.current_char() == '0' && matches!(cursor.peek_char(1), 'b' | 'B') {
        cursor.advance_n(2);
        while matches!(cursor.current_char(), '0' | '1' | '_') {
            cursor.advance();
        }
        let text = cursor.slice_from(start + 2).replace('_', "");
        return u64::from_str_radix(&text, 2)
            .map(Token::Int)
            .map_err(|_| LexError::InvalidNumber { text: cursor.slice_from(start).to_string(), span: Span::DUMMY });
    }
    if cursor.current_char() == '0' && matches!(cursor.peek_char(1), 'o' | 'O') {
        cursor.advance_n(2);
        while matches!(cursor.current_char(), '0'..='7' | '_') {
            cursor.advance();
        }
        let text = cursor.slice_from(start + 2).replace('_', "");
        return u64::from_str_radix(&text, 8)
            .map(Token::Int)
            .map_err(|_| LexError::InvalidNumber { text: cursor.slice_from(start).to_string(), span: Span::DUMMY });
    }

    while cursor.current_char().is_ascii_digit() || cursor.current_char() == '_' {
        cursor.advance();
    }

    let mut is_float = false;
    if cursor.current_char() == '.' && cursor.peek_char(1).is_ascii_digit() {
        is_float = true;
        cursor.advance();
        while cursor.current_char().is_ascii_digit() || cursor.current_char() == '_' {
            cursor.advance();
        }
    }
    if matches!(cursor.current_char(), 'e' | 'E') {
        is_float = true;
        cursor.advance();
        if matches!(cursor.current_char(), '+' | '-') {
            cursor.advance();
        }
        while cursor.current_char().is_ascii_digit() {
            cursor.advance();
        }
    }

    // Suffixes (i8, u32, z, ...) are consumed but not retained; the checker
    // derives the literal's type from its hint, per the constant elaborator.
    while cursor.current_char().is_alphanumeric() {
        cursor.advance();
    }

    let text = cursor.slice_from(start).replace('_', "");
    if is_float {
        let numeric: String = text.chars().take_while(|c| c.is_ascii_digit() || *c == '.' || *c == 'e' || *c == 'E' || *c == '+' || *c == '-').collect();
        numeric
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| LexError::InvalidNumber { text: text.clone(), span: Span::DUMMY })
    } else {
        let numeric: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
        numeric
            .parse::<u64>()
            .map(Token::Int)
            .map_err(|_| LexError::InvalidNumber { text: text.clone(), span: Span::DUMMY })
    }
}

fn lex_string(cursor: &mut Cursor) -> Result<Token, LexError> {
    cursor.advance(); // opening quote
    let mut buf = String::new();
    loop {
        if cursor.is_at_end() {
            return Err(LexError::UnterminatedString { span: Span::DUMMY });
        }
        let ch = cursor.current_char();
        if ch == '"' {
            cursor.advance();
            break;
        }
        if ch == '\\' {
            cursor.advance();
            buf.push(unescape(cursor.current_char()));
            cursor.advance();
            continue;
        }
        buf.push(ch);
        cursor.advance();
    }
    Ok(Token::Str(Symbol::intern(&buf)))
}

fn lex_rune(cursor: &mut Cursor) -> Result<Token, LexError> {
    cursor.advance(); // opening quote
    if cursor.is_at_end() {
        return Err(LexError::UnterminatedRune { span: Span::DUMMY });
    }
    let ch = if cursor.current_char() == '\\' {
        cursor.advance();
        let c = unescape(cursor.current_char());
        cursor.advance();
        c
    } else {
        let c = cursor.current_char();
        cursor.advance();
        c
    };
    if cursor.current_char() != '\'' {
        return Err(LexError::UnterminatedRune { span: Span::DUMMY });
    }
    cursor.advance();
    Ok(Token::Rune(ch))
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

fn lex_colon_or_label(cursor: &mut Cursor) -> Token {
    cursor.advance(); // ':'
    if cursor.current_char() == ':' {
        cursor.advance();
        return Token::ColonColon;
    }
    if cursor.current_char() == '_' || cursor.current_char().is_alphabetic() {
        let start = cursor.position();
        while cursor.current_char() == '_' || cursor.current_char().is_alphanumeric() {
            cursor.advance();
        }
        return Token::Label(Symbol::intern(cursor.slice_from(start)));
    }
    Token::Colon
}

fn lex_punct(cursor: &mut Cursor) -> Option<Token> {
    let two = |c: &mut Cursor, snd: char, two_tok: Token, one_tok: Token| {
        if c.peek_char(1) == snd {
            c.advance_n(2);
            two_tok
        } else {
            c.advance();
            one_tok
        }
    };

    Some(match cursor.current_char() {
        '(' => { cursor.advance(); Token::LParen }
        ')' => { cursor.advance(); Token::RParen }
        '{' => { cursor.advance(); Token::LBrace }
        '}' => { cursor.advance(); Token::RBrace }
        '[' => { cursor.advance(); Token::LBracket }
        ']' => { cursor.advance(); Token::RBracket }
        ',' => { cursor.advance(); Token::Comma }
        ';' => { cursor.advance(); Token::Semicolon }
        '@' => { cursor.advance(); Token::At }
        '.' => {
            if cursor.peek_char(1) == '.' && cursor.peek_char(2) == '.' {
                cursor.advance_n(3);
                Token::DotDotDot
            } else {
                cursor.advance();
                Token::Dot
            }
        }
        '+' => two(cursor, '=', Token::PlusEq, Token::Plus),
        '-' => two(cursor, '=', Token::MinusEq, Token::Minus),
        '*' => two(cursor, '=', Token::StarEq, Token::Star),
        '/' => two(cursor, '=', Token::SlashEq, Token::Slash),
        '%' => two(cursor, '=', Token::PercentEq, Token::Percent),
        '~' => { cursor.advance(); Token::Tilde }
        '!' => two(cursor, '=', Token::NotEq, Token::Bang),
        '=' => {
            if cursor.peek_char(1) == '>' {
                cursor.advance_n(2);
                Token::FatArrow
            } else {
                two(cursor, '=', Token::EqEq, Token::Eq)
            }
        }
        '&' => {
            if cursor.peek_char(1) == '&' {
                cursor.advance_n(2);
                Token::AmpAmp
            } else {
                two(cursor, '=', Token::AmpEq, Token::Amp)
            }
        }
        '|' => {
            if cursor.peek_char(1) == '|' {
                cursor.advance_n(2);
                Token::PipePipe
            } else {
                two(cursor, '=', Token::PipeEq, Token::Pipe)
            }
        }
        '^' => {
            if cursor.peek_char(1) == '^' {
                cursor.advance_n(2);
                Token::CaretCaret
            } else {
                two(cursor, '=', Token::CaretEq, Token::Caret)
            }
        }
        '<' => {
            if cursor.peek_char(1) == '<' {
                if cursor.peek_char(2) == '=' {
                    cursor.advance_n(3);
                    Token::ShlEq
                } else {
                    cursor.advance_n(2);
                    Token::Shl
                }
            } else {
                two(cursor, '=', Token::Le, Token::Lt)
            }
        }
        '>' => {
            if cursor.peek_char(1) == '>' {
                if cursor.peek_char(2) == '=' {
                    cursor.advance_n(3);
                    Token::ShrEq
                } else {
                    cursor.advance_n(2);
                    Token::Shr
                }
            } else {
                two(cursor, '=', Token::Ge, Token::Gt)
            }
        }
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Token> {
        tokenize(src, FileId::DUMMY).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(toks("let x = 1;"), vec![
            Token::Let, Token::Ident(Symbol::intern("x")), Token::Eq, Token::Int(1), Token::Semicolon, Token::Eof
        ]);
    }

    #[test]
    fn nullable_pointer_type_tokens() {
        assert_eq!(toks("nullable *int"), vec![Token::Nullable, Token::Star, Token::Int_, Token::Eof]);
    }

    #[test]
    fn labels_and_loops() {
        assert_eq!(toks(":outer for"), vec![Token::Label(Symbol::intern("outer")), Token::For, Token::Eof]);
    }

    #[test]
    fn hex_and_suffixed_literals() {
        assert_eq!(toks("0xFFu8"), vec![Token::Int(255), Token::Eof]);
    }

    #[test]
    fn line_comment_is_skipped() {
        assert_eq!(toks("1 // two\n2"), vec![Token::Int(1), Token::Int(2), Token::Eof]);
    }

    #[test]
    fn string_and_rune_literals() {
        assert_eq!(toks(r#" "hi\n" 'a' "#), vec![
            Token::Str(Symbol::intern("hi\n")), Token::Rune('a'), Token::Eof
        ]);
    }

    #[test]
    fn attribute_prefix() {
        assert_eq!(toks("@init"), vec![Token::At, Token::Ident(Symbol::intern("init")), Token::Eof]);
    }

    #[test]
    fn switch_case_arrow() {
        assert_eq!(toks("case => 1"), vec![Token::Case, Token::FatArrow, Token::Int(1), Token::Eof]);
    }

    #[test]
    fn variadic_ellipsis() {
        assert_eq!(toks("values: int..."), vec![
            Token::Ident(Symbol::intern("values")), Token::Colon, Token::Int_, Token::DotDotDot, Token::Eof
        ]);
    }
}
