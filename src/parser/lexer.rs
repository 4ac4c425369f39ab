//! Lexer for identifier dictionary XML using logos

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    // Markup delimiters (longer patterns first)
    #[token("</")]
    CloseTagOpen,
    #[token("/>")]
    SelfClose,
    #[token("<")]
    TagOpen,
    #[token(">")]
    TagClose,
    #[token("=")]
    Equals,

    // Element and attribute names
    #[regex(r"[A-Za-z_:][A-Za-z0-9_:.\-]*", |lex| lex.slice().to_string(), priority = 4)]
    Name(String),

    // Attribute values, either quote style
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()), priority = 5)]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()), priority = 5)]
    String(String),

    // Character data between tags
    #[regex(r#"[^<>=/ \t\n\r]+"#, |lex| lex.slice().to_string(), priority = 1)]
    Text(String),

    // Prolog, comments and DOCTYPE (skip)
    #[regex(r"<\?([^?]|\?[^>])*\?>", logos::skip)]
    ProcessingInstruction,

    #[regex(r"<!--([^-]|-[^-])*-->", logos::skip)]
    Comment,

    #[regex(r"<!DOCTYPE[^>\[]*(\[[^\]]*\])?[ \t\n\r]*>", logos::skip)]
    Doctype,
}

/// Strip the surrounding quotes and expand entity references
fn unquote(slice: &str) -> String {
    unescape(&slice[1..slice.len() - 1])
}

/// Expand the predefined XML entities and numeric character references.
///
/// Unknown references are kept verbatim.
pub fn unescape(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };

        let entity = &tail[1..semi];
        let expanded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match expanded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    out
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
