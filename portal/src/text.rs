//! Plain text out of the rich text fragments stored in news posts.
//!
//! Markup is tokenized, never pattern-replaced: a `>` inside a quoted
//! attribute does not end a tag, and a `<` that does not open a tag stays
//! text.

use itertools::Itertools;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, tag_no_case, take, take_until, take_while},
    character::complete::{alphanumeric1, char, digit1, hex_digit1, satisfy},
    combinator::{map, map_opt, opt, recognize, rest, value},
    multi::many0_count,
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

/// Elements whose content is not text.
const RAW_TEXT: [&str; 2] = ["script", "style"];

/// Elements that separate words when rendered.
const BLOCK: [&str; 24] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "section", "td", "tr",
];

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Entity(char),
    Tag { name: &'a str, closing: bool },
    Skip,
}

fn comment(input: &str) -> IResult<&str, Token> {
    value(
        Token::Skip,
        preceded(
            tag("<!--"),
            alt((terminated(take_until("-->"), tag("-->")), rest)),
        ),
    )(input)
}

fn declaration(input: &str) -> IResult<&str, Token> {
    value(
        Token::Skip,
        tuple((alt((tag("<!"), tag("<?"))), opt(is_not(">")), char('>'))),
    )(input)
}

fn element(input: &str) -> IResult<&str, Token> {
    let (input, _) = char('<')(input)?;
    let (input, closing) = map(opt(char('/')), |slash| slash.is_some())(input)?;
    let (input, name) = recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))(input)?;
    let (input, _) = many0_count(alt((
        delimited(char('"'), opt(is_not("\"")), char('"')),
        delimited(char('\''), opt(is_not("'")), char('\'')),
        map(is_not("\"'>"), Some),
    )))(input)?;
    let (input, _) = char('>')(input)?;

    Ok((input, Token::Tag { name, closing }))
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "aacute" => 'á',
        "eacute" => 'é',
        "iacute" => 'í',
        "oacute" => 'ó',
        "uacute" => 'ú',
        "Aacute" => 'Á',
        "Eacute" => 'É',
        "Iacute" => 'Í',
        "Oacute" => 'Ó',
        "Uacute" => 'Ú',
        "ntilde" => 'ñ',
        "Ntilde" => 'Ñ',
        "uuml" => 'ü',
        "iexcl" => '¡',
        "iquest" => '¿',
        "laquo" => '«',
        "raquo" => '»',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "deg" => '°',
        "ordm" => 'º',
        "ordf" => 'ª',
        _ => return None,
    })
}

fn entity(input: &str) -> IResult<&str, Token> {
    map(
        delimited(
            char('&'),
            alt((
                map_opt(preceded(tag_no_case("#x"), hex_digit1), |hex: &str| {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                }),
                map_opt(preceded(char('#'), digit1), |dec: &str| {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                }),
                map_opt(alphanumeric1, named_entity),
            )),
            char(';'),
        ),
        Token::Entity,
    )(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        comment,
        declaration,
        element,
        entity,
        map(is_not("<&"), Token::Text),
        // a lone `<` or `&`
        map(take(1usize), Token::Text),
    ))(input)
}

/// Text content of an HTML fragment with whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut skipping: Option<&str> = None;
    let mut input = html;

    while !input.is_empty() {
        let Ok((remaining, next)) = token(input) else {
            break;
        };
        input = remaining;

        match next {
            Token::Tag { name, closing } => {
                if let Some(raw) = skipping {
                    if closing && name.eq_ignore_ascii_case(raw) {
                        skipping = None;
                    }
                    continue;
                }
                if !closing && RAW_TEXT.iter().any(|raw| name.eq_ignore_ascii_case(raw)) {
                    skipping = Some(name);
                } else if BLOCK.iter().any(|block| name.eq_ignore_ascii_case(block)) {
                    text.push(' ');
                }
            }
            _ if skipping.is_some() => {}
            Token::Text(chunk) => text.push_str(chunk),
            Token::Entity(c) => text.push(c),
            Token::Skip => {}
        }
    }

    text.split_whitespace().join(" ")
}

/// Cuts `text` after `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((end, _)) => format!("{}...", &text[..end]),
    }
}

/// Short plain text preview of an HTML fragment.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    truncate_chars(&plain_text(html), max_chars)
}
