//! Lexer and shunting-yard compiler (§4.2).
//!
//! The operator-popping rule intentionally matches the original yobd
//! algorithm rather than a textbook Dijkstra shunting-yard: encountering an
//! `Add`/`Sub` token pops any `Mul`/`Div` sitting on top of the operator
//! stack (since those bind tighter), but encountering a `Mul`/`Div` token
//! never pops another `Mul`/`Div` already on the stack — it is pushed
//! directly. For most expressions this is unobservable, but a run of three
//! or more operators that all share one precedence class without
//! parentheses (e.g. `"8/2/2"`) evaluates right-to-left instead of
//! left-to-right. Schema authors should parenthesize such chains; this
//! crate does not paper over the quirk, since doing so would silently
//! change the value `yobd`-authored schemas were written against.

use crate::error::SchemaError;
use crate::expr::{Expression, Token};
use crate::types::{ByteVar, NumericDomain, Operator};

#[derive(Debug, Clone, Copy, PartialEq)]
enum LexTok {
    Var(ByteVar),
    Int(i32),
    Float(f32),
    LParen,
    RParen,
    Op(Operator),
}

fn is_ident_start(b: u8) -> bool {
    matches!(b, b'A' | b'B' | b'C' | b'D')
}

/// Splits `src` into a flat token stream. Numeric literals are parsed
/// according to `domain` as they are lexed, exactly as the original does
/// (it never lexes generically then reparses).
fn lex(src: &str, domain: NumericDomain) -> Result<Vec<LexTok>, SchemaError> {
    let bytes = src.as_bytes();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let neg_literal = bytes[pos] == b'-'
            && pos + 1 < bytes.len()
            && bytes[pos + 1].is_ascii_digit();

        let start = pos;
        if neg_literal {
            pos += 1;
        }

        if pos < bytes.len() && bytes[pos].is_ascii_digit() {
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos < bytes.len() && bytes[pos] == b'.' {
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            let text = &src[start..pos];
            tokens.push(match domain {
                NumericDomain::Int => LexTok::Int(text.parse::<i32>().map_err(|_| {
                    SchemaError::ParseFail(format!("invalid integer literal `{text}`"))
                })?),
                NumericDomain::Float => LexTok::Float(text.parse::<f32>().map_err(|_| {
                    SchemaError::ParseFail(format!("invalid float literal `{text}`"))
                })?),
            });
            continue;
        }

        let b = bytes[pos];
        let tok = match b {
            b'(' => LexTok::LParen,
            b')' => LexTok::RParen,
            b'+' => LexTok::Op(Operator::Add),
            b'-' => LexTok::Op(Operator::Sub),
            b'*' => LexTok::Op(Operator::Mul),
            b'/' => LexTok::Op(Operator::Div),
            _ if is_ident_start(b) => LexTok::Var(match b {
                b'A' => ByteVar::A,
                b'B' => ByteVar::B,
                b'C' => ByteVar::C,
                _ => ByteVar::D,
            }),
            other => {
                return Err(SchemaError::ParseFail(format!(
                    "unexpected character `{}` in expression `{src}`",
                    other as char
                )));
            }
        };
        tokens.push(tok);
        pos += 1;
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StackItem {
    LParen,
    Op(Operator),
}

fn pop_higher_precedence(op_stack: &mut Vec<StackItem>, out: &mut Vec<Token>) {
    while let Some(StackItem::Op(top)) = op_stack.last().copied() {
        if !top.is_high_precedence() {
            break;
        }
        op_stack.pop();
        out.push(Token::Op(top));
    }
}

/// Compiles an infix expression string into a postfix [`Expression`] via
/// Dijkstra's shunting-yard algorithm.
pub fn compile(src: &str, domain: NumericDomain) -> Result<Expression, SchemaError> {
    let lexed = lex(src, domain)?;

    let mut op_stack: Vec<StackItem> = Vec::new();
    let mut out: Vec<Token> = Vec::new();

    for tok in lexed {
        match tok {
            LexTok::Int(v) => out.push(Token::LitInt(v)),
            LexTok::Float(v) => out.push(Token::LitFloat(v)),
            LexTok::Var(v) => out.push(Token::Var(v)),
            LexTok::Op(op) if op.is_high_precedence() => {
                op_stack.push(StackItem::Op(op));
            }
            LexTok::Op(op) => {
                pop_higher_precedence(&mut op_stack, &mut out);
                op_stack.push(StackItem::Op(op));
            }
            LexTok::LParen => op_stack.push(StackItem::LParen),
            LexTok::RParen => {
                loop {
                    match op_stack.pop() {
                        Some(StackItem::LParen) => break,
                        Some(StackItem::Op(op)) => out.push(Token::Op(op)),
                        None => {
                            return Err(SchemaError::ParseFail(format!(
                                "unmatched `)` in expression `{src}`"
                            )));
                        }
                    }
                }
            }
        }
    }

    while let Some(item) = op_stack.pop() {
        match item {
            StackItem::Op(op) => out.push(Token::Op(op)),
            StackItem::LParen => {
                return Err(SchemaError::ParseFail(format!(
                    "unmatched `(` in expression `{src}`"
                )));
            }
        }
    }

    if out.is_empty() {
        return Err(SchemaError::ParseFail(format!(
            "expression `{src}` compiled to no tokens"
        )));
    }

    Ok(Expression {
        domain,
        postfix: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::eval::evaluate;

    #[test]
    fn simple_affine() {
        let expr = compile("(256*A + B) / 4", NumericDomain::Float).unwrap();
        let v = evaluate(&expr, &[77, 130, 0, 0]).unwrap();
        assert!((v - 4960.5).abs() < 1e-3);
    }

    #[test]
    fn bare_variable() {
        let expr = compile("A", NumericDomain::Float).unwrap();
        assert_eq!(evaluate(&expr, &[60, 0, 0, 0]).unwrap(), 60.0);
    }

    #[test]
    fn unmatched_paren_is_error() {
        assert!(compile("(A + B", NumericDomain::Float).is_err());
        assert!(compile("A + B)", NumericDomain::Float).is_err());
    }

    #[test]
    fn negative_literal_without_space_swallows_operator() {
        // Matches the original lexer's quirk: `-` immediately before a digit
        // always starts a numeric literal, so `3-4` lexes as two literals
        // with no operator between them, not a subtraction.
        let expr = compile("3-4", NumericDomain::Int).unwrap();
        assert_eq!(expr.postfix.len(), 2);
    }

    #[test]
    fn integer_domain_two_byte_combine() {
        let expr = compile("256*A + B", NumericDomain::Int).unwrap();
        let v = evaluate(&expr, &[205, 171, 0, 0]).unwrap();
        assert!((v - 52651.0).abs() < 1e-3);
    }
}
