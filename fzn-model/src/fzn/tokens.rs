use std::fmt::Display;

use chumsky::error::Rich;
use chumsky::extra;
use chumsky::prelude::any;
use chumsky::prelude::choice;
use chumsky::prelude::just;
use chumsky::prelude::none_of;
use chumsky::prelude::one_of;
use chumsky::text;
use chumsky::text::ascii::ident;
use chumsky::IterParser;
use chumsky::Parser;

use crate::ast;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Token<'src> {
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Colon,
    DoubleColon,
    SemiColon,
    DoublePeriod,
    Equal,
    Ident(&'src str),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// The contents of a string literal, with escapes still in place.
    StringLiteral(&'src str),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::OpenBracket => write!(f, "["),
            Token::CloseBracket => write!(f, "]"),
            Token::OpenBrace => write!(f, "{{"),
            Token::CloseBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::DoubleColon => write!(f, "::"),
            Token::SemiColon => write!(f, ";"),
            Token::DoublePeriod => write!(f, ".."),
            Token::Equal => write!(f, "="),
            Token::Ident(ident) => write!(f, "{ident}"),
            Token::Integer(int) => write!(f, "{int}"),
            Token::Float(float) => write!(f, "{float:?}"),
            Token::Boolean(boolean) => write!(f, "{boolean}"),
            Token::StringLiteral(string) => write!(f, "\"{string}\""),
        }
    }
}

type LexExtra<'src> = extra::Err<Rich<'src, char>>;

pub(super) fn lex<'src>(
) -> impl Parser<'src, &'src str, Vec<ast::Node<Token<'src>>>, LexExtra<'src>> {
    trivia().ignore_then(
        token()
            .then_ignore(trivia())
            .repeated()
            .collect::<Vec<_>>(),
    )
}

/// Whitespace and comments between tokens.
fn trivia<'src>() -> impl Parser<'src, &'src str, (), LexExtra<'src>> + Clone {
    choice((
        text::whitespace().at_least(1).ignored(),
        line_comment(),
        block_comment(),
    ))
    .repeated()
    .ignored()
}

fn line_comment<'src>() -> impl Parser<'src, &'src str, (), LexExtra<'src>> + Clone {
    just('%')
        .then(any().and_is(just('\n').not()).repeated())
        .ignored()
}

fn block_comment<'src>() -> impl Parser<'src, &'src str, (), LexExtra<'src>> + Clone {
    just("/*")
        .then(any().and_is(just("*/").not()).repeated())
        .then(just("*/"))
        .ignored()
}

fn token<'src>() -> impl Parser<'src, &'src str, ast::Node<Token<'src>>, LexExtra<'src>> {
    choice((
        // Punctuation
        just(";").to(Token::SemiColon),
        just("::").to(Token::DoubleColon),
        just(":").to(Token::Colon),
        just(",").to(Token::Comma),
        just("..").to(Token::DoublePeriod),
        just("[").to(Token::OpenBracket),
        just("]").to(Token::CloseBracket),
        just("{").to(Token::OpenBrace),
        just("}").to(Token::CloseBrace),
        just("(").to(Token::OpenParen),
        just(")").to(Token::CloseParen),
        just("=").to(Token::Equal),
        // Values. Floats go first, so `1..5` is not mistaken for `1.` followed by `.5`.
        float_literal().map(Token::Float),
        int_literal().map(Token::Integer),
        string_literal().map(Token::StringLiteral),
        // Identifiers (including keywords)
        ident().map(|ident| match ident {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            ident => Token::Ident(ident),
        }),
    ))
    .map_with(|token, extra| {
        let span: chumsky::prelude::SimpleSpan = extra.span();

        ast::Node {
            node: token,
            span: span.into(),
        }
    })
}

/// `[-]?[0-9]+.[0-9]+([Ee][-+]?[0-9]+)?` or `[-]?[0-9]+[Ee][-+]?[0-9]+`
fn float_literal<'src>() -> impl Parser<'src, &'src str, f64, LexExtra<'src>> {
    let exponent = one_of("eE")
        .then(one_of("+-").or_not())
        .then(text::digits(10));
    let fraction = just('.').then(text::digits(10));

    just('-')
        .or_not()
        .then(text::digits(10))
        .then(choice((
            fraction.then(exponent.clone().or_not()).ignored(),
            exponent.ignored(),
        )))
        .to_slice()
        .try_map(|slice: &str, span| {
            slice
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| Rich::custom(span, format!("'{slice}' is not a finite float")))
        })
}

/// Decimal, `0x` hexadecimal or `0o` octal, with an optional minus sign.
fn int_literal<'src>() -> impl Parser<'src, &'src str, i64, LexExtra<'src>> {
    let magnitude = choice((
        just("0x")
            .ignore_then(text::digits(16).to_slice())
            .map(|digits| (digits, 16_u32)),
        just("0o")
            .ignore_then(text::digits(8).to_slice())
            .map(|digits| (digits, 8_u32)),
        text::digits(10).to_slice().map(|digits| (digits, 10_u32)),
    ));

    just('-')
        .or_not()
        .then(magnitude)
        .try_map(|(sign, (digits, radix)), span| {
            let value = i128::from_str_radix(digits, radix)
                .ok()
                .map(|magnitude| if sign.is_some() { -magnitude } else { magnitude })
                .and_then(|value| i64::try_from(value).ok());

            value.ok_or_else(|| {
                Rich::custom(span, format!("integer '{digits}' does not fit in 64 bits"))
            })
        })
}

/// `"..."`, where `\"` does not end the string.
fn string_literal<'src>() -> impl Parser<'src, &'src str, &'src str, LexExtra<'src>> {
    choice((
        just('\\').then(any()).ignored(),
        none_of("\\\"").ignored(),
    ))
    .repeated()
    .to_slice()
    .delimited_by(just('"'), just('"'))
}
