//! The FlatZinc grammar.
//!
//! Parsing happens in two stages. First the source is split into [`Token`]s, skipping whitespace
//! and comments. Then the token stream is parsed into an [`ast::RawModel`], with one parser per
//! nonterminal of the FlatZinc grammar.
use std::collections::BTreeSet;
use std::fmt::Display;
use std::rc::Rc;

use chumsky::error::Rich;
use chumsky::error::RichReason;
use chumsky::extra;
use chumsky::input::Input;
use chumsky::input::MapExtra;
use chumsky::input::ValueInput;
use chumsky::prelude::choice;
use chumsky::prelude::end;
use chumsky::prelude::just;
use chumsky::prelude::recursive;
use chumsky::select;
use chumsky::span::Span;
use chumsky::IterParser;
use chumsky::Parser;
use log::debug;

use crate::ast;
use crate::FznError;

mod tokens;

use tokens::Token;
use tokens::Token::*;

#[derive(Clone, Debug, Default)]
struct ParseState {
    /// The identifiers encountered so far.
    strings: BTreeSet<Rc<str>>,
}

impl ParseState {
    fn get_interned(&mut self, string: &str) -> Rc<str> {
        if let Some(interned) = self.strings.get(string) {
            return Rc::clone(interned);
        }

        let interned: Rc<str> = Rc::from(string);
        let _ = self.strings.insert(Rc::clone(&interned));
        interned
    }
}

/// Parse FlatZinc source text into the raw syntax tree.
///
/// The whole input has to be consumed; otherwise a [`FznError::Syntax`] names the position
/// where parsing stopped.
pub(crate) fn parse(source: &str) -> Result<ast::RawModel, FznError> {
    let mut state = extra::SimpleState(ParseState::default());

    let tokens = tokens::lex()
        .parse(source)
        .into_result()
        .map_err(|reasons| to_syntax_error(source, reasons))?;

    debug!("lexed {} tokens", tokens.len());

    let parser_input = tokens.map(
        ast::Span {
            start: source.len(),
            end: source.len(),
        },
        |node| (&node.node, &node.span),
    );

    let raw_model = model()
        .parse_with_state(parser_input, &mut state)
        .into_result()
        .map_err(|reasons| to_syntax_error(source, reasons))?;

    debug!(
        "parsed {} predicates, {} parameters, {} variables and {} constraints",
        raw_model.predicates.len(),
        raw_model.parameters.len(),
        raw_model.variables.len(),
        raw_model.constraints.len()
    );

    Ok(raw_model)
}

fn to_syntax_error<T, S>(source: &str, reasons: Vec<Rich<'_, T, S>>) -> FznError
where
    T: Display,
    S: Span<Offset = usize>,
{
    // Only the first error is reported.
    let Some(reason) = reasons.into_iter().next() else {
        return FznError::syntax(
            source,
            0,
            0,
            "valid FlatZinc".to_owned(),
            "nothing".to_owned(),
        );
    };

    let span = reason.span();
    let expected = match reason.reason() {
        RichReason::Custom(message) => message.to_string(),
        _ => reason
            .expected()
            .map(|pattern| pattern.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    };
    let found = reason
        .found()
        .map(|found| format!("'{found}'"))
        .unwrap_or_else(|| "end of input".to_owned());

    FznError::syntax(source, span.start(), span.end(), expected, found)
}

/// The extra data attached to the chumsky parsers.
///
/// We specify a rich error type, as well as an instance of [`ParseState`] for string interning.
type FznExtra<'tokens, 'src> =
    extra::Full<Rich<'tokens, Token<'src>, ast::Span>, extra::SimpleState<ParseState>, ()>;

fn model<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::RawModel, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    predicate_item()
        .map_with(to_node)
        .repeated()
        .collect::<Vec<_>>()
        .then(par_decl_item().map_with(to_node).repeated().collect::<Vec<_>>())
        .then(var_decl_item().map_with(to_node).repeated().collect::<Vec<_>>())
        .then(constraint_item().map_with(to_node).repeated().collect::<Vec<_>>())
        .then(solve_item().map_with(to_node))
        .then_ignore(end())
        .map(
            |((((predicates, parameters), variables), constraints), solve)| ast::RawModel {
                predicates,
                parameters,
                variables,
                constraints,
                solve,
            },
        )
}

/// `predicate <identifier> ( <pred-param>, ... );`
fn predicate_item<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::PredicateItem, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let pred_param = pred_param_type()
        .then_ignore(just(Colon))
        .then(identifier())
        .map(|(ty, identifier)| ast::PredParam { ty, identifier });

    keyword("predicate")
        .ignore_then(identifier())
        .then(
            pred_param
                .separated_by(just(Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(OpenParen), just(CloseParen)),
        )
        .then_ignore(just(SemiColon))
        .map(|(identifier, parameters)| ast::PredicateItem {
            identifier,
            parameters,
        })
}

fn pred_param_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::PredParamType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let pred_index_set = choice((
        index_set().map(ast::PredIndexSet::Bounded),
        keyword("int").to(ast::PredIndexSet::Unbounded),
    ));

    choice((
        keyword("array")
            .ignore_then(pred_index_set.delimited_by(just(OpenBracket), just(CloseBracket)))
            .then_ignore(keyword("of"))
            .then(basic_pred_param_type())
            .map(|(index_set, element)| ast::PredParamType::Array { index_set, element }),
        basic_pred_param_type().map(ast::PredParamType::Basic),
    ))
}

fn basic_pred_param_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::BasicPredParamType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    choice((
        basic_var_type().map(ast::BasicPredParamType::Var),
        basic_par_type().map(ast::BasicPredParamType::Par),
        int_range().map(|(lower_bound, upper_bound)| {
            ast::BasicPredParamType::IntBounded {
                lower_bound,
                upper_bound,
            }
        }),
        float_range().map(|(lower_bound, upper_bound)| {
            ast::BasicPredParamType::FloatBounded {
                lower_bound,
                upper_bound,
            }
        }),
        int_list(1).map(ast::BasicPredParamType::IntSet),
        keyword("set").ignore_then(keyword("of")).ignore_then(choice((
            int_range().map(|(lower_bound, upper_bound)| {
                ast::BasicPredParamType::SetBounded {
                    lower_bound,
                    upper_bound,
                }
            }),
            int_list(0).map(ast::BasicPredParamType::SetSet),
        ))),
    ))
}

/// `bool`, `int`, `float` or `set of int`
fn basic_par_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::BasicParType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    choice((
        keyword("bool").to(ast::BasicParType::Bool),
        keyword("int").to(ast::BasicParType::Int),
        keyword("float").to(ast::BasicParType::Float),
        keyword("set")
            .then(keyword("of"))
            .then(keyword("int"))
            .to(ast::BasicParType::SetOfInt),
    ))
}

fn par_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::ParType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    choice((
        keyword("array")
            .ignore_then(index_set().delimited_by(just(OpenBracket), just(CloseBracket)))
            .then_ignore(keyword("of"))
            .then(basic_par_type())
            .map(|(index_set, element)| ast::ParType::Array { index_set, element }),
        basic_par_type().map(ast::ParType::Basic),
    ))
}

/// `var` followed by a domain.
fn basic_var_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::BasicVarType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let set_type = keyword("set").ignore_then(keyword("of")).ignore_then(choice((
        keyword("int").to(ast::BasicVarType::SetUnbounded),
        int_range().map(|(lower_bound, upper_bound)| ast::BasicVarType::SetBounded {
            lower_bound,
            upper_bound,
        }),
        int_list(0).map(ast::BasicVarType::SetSet),
    )));

    keyword("var").ignore_then(choice((
        keyword("bool").to(ast::BasicVarType::Bool),
        keyword("int").to(ast::BasicVarType::IntUnbounded),
        keyword("float").to(ast::BasicVarType::FloatUnbounded),
        int_range().map(|(lower_bound, upper_bound)| ast::BasicVarType::IntBounded {
            lower_bound,
            upper_bound,
        }),
        float_range().map(|(lower_bound, upper_bound)| ast::BasicVarType::FloatBounded {
            lower_bound,
            upper_bound,
        }),
        int_list(1).map(ast::BasicVarType::IntSet),
        set_type,
    )))
}

fn array_var_type<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::ArrayVarType, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    keyword("array")
        .ignore_then(index_set().delimited_by(just(OpenBracket), just(CloseBracket)))
        .then_ignore(keyword("of"))
        .then(basic_var_type())
        .map(|(index_set, element)| ast::ArrayVarType { index_set, element })
}

/// `1..n`
fn index_set<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::IndexSet, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    just(Integer(1))
        .ignore_then(just(DoublePeriod))
        .ignore_then(integer())
        .map(|upper_bound| ast::IndexSet { upper_bound })
}

/// `<par-type> : <identifier> = <par-expr> ;`
fn par_decl_item<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::ParDeclItem, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let par_expr = choice((
        basic_literal_expr()
            .separated_by(just(Comma))
            .collect::<Vec<_>>()
            .delimited_by(just(OpenBracket), just(CloseBracket))
            .map(ast::ParExpr::Array),
        basic_literal_expr().map(ast::ParExpr::Basic),
    ));

    par_type()
        .then_ignore(just(Colon))
        .then(identifier())
        .then_ignore(just(Equal))
        .then(par_expr)
        .then_ignore(just(SemiColon))
        .map(|((ty, identifier), expr)| ast::ParDeclItem {
            ty,
            identifier,
            expr,
        })
}

fn var_decl_item<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::VarDeclItem, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let array_decl = array_var_type()
        .then_ignore(just(Colon))
        .then(identifier())
        .then(annotations())
        .then_ignore(just(Equal))
        .then(array_literal())
        .then_ignore(just(SemiColon))
        .map(|(((ty, identifier), annotations), literals)| {
            ast::VarDeclItem::Array(ast::ArrayVarDecl {
                ty,
                identifier,
                annotations,
                literals,
            })
        });

    let basic_decl = basic_var_type()
        .then_ignore(just(Colon))
        .then(identifier())
        .then(annotations())
        .then(just(Equal).ignore_then(basic_expr()).or_not())
        .then_ignore(just(SemiColon))
        .map(|(((ty, identifier), annotations), expr)| {
            ast::VarDeclItem::Basic(ast::BasicVarDecl {
                ty,
                identifier,
                annotations,
                expr,
            })
        });

    choice((array_decl, basic_decl))
}

/// `constraint <identifier> ( <expr>, ... ) <annotations> ;`
fn constraint_item<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::ConstraintItem, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let expr = choice((
        array_literal().map(ast::Expr::Array),
        basic_expr().map(ast::Expr::Basic),
    ));

    keyword("constraint")
        .ignore_then(identifier())
        .then(
            expr.separated_by(just(Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(OpenParen), just(CloseParen)),
        )
        .then(annotations())
        .then_ignore(just(SemiColon))
        .map(|((identifier, expressions), annotations)| ast::ConstraintItem {
            identifier,
            expressions,
            annotations,
        })
}

/// `solve <annotations> satisfy ;`, or `minimize`/`maximize` followed by an expression.
fn solve_item<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::SolveItem, FznExtra<'tokens, 'src>>
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    let goal = choice((
        keyword("satisfy").to(None),
        keyword("minimize")
            .ignore_then(basic_expr())
            .map(|expr| Some((ast::OptimizationType::Minimize, expr))),
        keyword("maximize")
            .ignore_then(basic_expr())
            .map(|expr| Some((ast::OptimizationType::Maximize, expr))),
    ));

    keyword("solve")
        .ignore_then(annotations())
        .then(goal)
        .then_ignore(just(SemiColon))
        .map(|(annotations, goal)| match goal {
            None => ast::SolveItem::Satisfy { annotations },
            Some((ty, expr)) => ast::SolveItem::Optimize {
                annotations,
                ty,
                expr,
            },
        })
}

/// Zero or more annotations, each introduced by `::`.
fn annotations<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Vec<ast::Annotation>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    just(DoubleColon)
        .ignore_then(annotation())
        .repeated()
        .collect()
}

fn annotation<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::Annotation, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    recursive(|annotation| {
        let basic_ann_expr = choice((
            basic_literal_expr().map(ast::BasicAnnExpr::Literal),
            string().map(ast::BasicAnnExpr::String),
            annotation.map(ast::BasicAnnExpr::Annotation),
        ));

        let ann_expr = choice((
            basic_ann_expr
                .clone()
                .separated_by(just(Comma))
                .collect::<Vec<_>>()
                .delimited_by(just(OpenBracket), just(CloseBracket)),
            basic_ann_expr.map(|expr| vec![expr]),
        ));

        identifier()
            .then(
                ann_expr
                    .separated_by(just(Comma))
                    .collect::<Vec<_>>()
                    .delimited_by(just(OpenParen), just(CloseParen))
                    .or_not(),
            )
            .map(|(identifier, expressions)| ast::Annotation {
                identifier,
                expressions: expressions.unwrap_or_default(),
            })
    })
}

/// `[ <basic-expr>, ... ]`
fn array_literal<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Vec<ast::BasicExpr>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    basic_expr()
        .separated_by(just(Comma))
        .collect::<Vec<_>>()
        .delimited_by(just(OpenBracket), just(CloseBracket))
}

fn basic_expr<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::BasicExpr, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    choice((
        basic_literal_expr().map(ast::BasicExpr::Literal),
        identifier().map(ast::BasicExpr::Identifier),
    ))
}

fn basic_literal_expr<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, ast::BasicLiteralExpr, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    choice((
        just(OpenBrace)
            .then(just(CloseBrace))
            .to(ast::BasicLiteralExpr::EmptySet),
        int_list(1).map(ast::BasicLiteralExpr::IntSet),
        float_list().map(ast::BasicLiteralExpr::FloatSet),
        int_range().map(|(lower_bound, upper_bound)| {
            ast::BasicLiteralExpr::IntSetBounded {
                lower_bound,
                upper_bound,
            }
        }),
        float_range().map(|(lower_bound, upper_bound)| {
            ast::BasicLiteralExpr::FloatSetBounded {
                lower_bound,
                upper_bound,
            }
        }),
        float().map(ast::BasicLiteralExpr::Float),
        integer().map(ast::BasicLiteralExpr::Int),
        boolean().map(ast::BasicLiteralExpr::Bool),
    ))
}

/// `{ <int-literal>, ... }` with at least `min_len` elements.
fn int_list<'tokens, 'src: 'tokens, I>(
    min_len: usize,
) -> impl Parser<'tokens, I, Vec<i64>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    integer()
        .separated_by(just(Comma))
        .at_least(min_len)
        .collect::<Vec<_>>()
        .delimited_by(just(OpenBrace), just(CloseBrace))
}

fn float_list<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Vec<f64>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    float()
        .separated_by(just(Comma))
        .at_least(1)
        .collect::<Vec<_>>()
        .delimited_by(just(OpenBrace), just(CloseBrace))
}

fn int_range<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, (i64, i64), FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    integer().then_ignore(just(DoublePeriod)).then(integer())
}

fn float_range<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, (f64, f64), FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    float().then_ignore(just(DoublePeriod)).then(float())
}

fn to_node<'tokens, 'src: 'tokens, I, T>(
    node: T,
    extra: &mut MapExtra<'tokens, '_, I, FznExtra<'tokens, 'src>>,
) -> ast::Node<T>
where
    I: Input<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    ast::Node {
        node,
        span: extra.span(),
    }
}

fn keyword<'tokens, 'src: 'tokens, I>(
    keyword: &'static str,
) -> impl Parser<'tokens, I, (), FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    just(Ident(keyword)).ignored()
}

fn integer<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, i64, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    select! {
        Integer(int) => int,
    }
}

fn float<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, f64, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    select! {
        Float(float) => float,
    }
}

fn boolean<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, bool, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    select! {
        Boolean(boolean) => boolean,
    }
}

/// A string literal with `\"`, `\\`, `\n` and `\t` resolved.
fn string<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Rc<str>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    select! {
        StringLiteral(string) => string,
    }
    .map(|string: &str| {
        let mut unescaped = String::with_capacity(string.len());
        let mut chars = string.chars();

        while let Some(c) = chars.next() {
            if c != '\\' {
                unescaped.push(c);
                continue;
            }

            match chars.next() {
                Some('n') => unescaped.push('\n'),
                Some('t') => unescaped.push('\t'),
                Some(escaped) => unescaped.push(escaped),
                None => unescaped.push('\\'),
            }
        }

        Rc::from(unescaped)
    })
}

fn identifier<'tokens, 'src: 'tokens, I>(
) -> impl Parser<'tokens, I, Rc<str>, FznExtra<'tokens, 'src>> + Clone
where
    I: ValueInput<'tokens, Span = ast::Span, Token = Token<'src>>,
{
    select! {
        Ident(ident) => ident,
    }
    .map_with(|ident, extra| {
        let state: &mut extra::SimpleState<ParseState> = extra.state();
        state.get_interned(ident)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_set_ann(lower_bound: i64, upper_bound: i64) -> ast::BasicAnnExpr {
        ast::BasicAnnExpr::Literal(ast::BasicLiteralExpr::IntSetBounded {
            lower_bound,
            upper_bound,
        })
    }

    fn ann_ident(identifier: &str) -> ast::BasicAnnExpr {
        ast::BasicAnnExpr::Annotation(ast::Annotation {
            identifier: identifier.into(),
            expressions: vec![],
        })
    }

    #[test]
    fn empty_satisfaction_model() {
        let source = r#"
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");

        assert!(raw_model.predicates.is_empty());
        assert!(raw_model.parameters.is_empty());
        assert!(raw_model.variables.is_empty());
        assert!(raw_model.constraints.is_empty());
        assert_eq!(
            raw_model.solve,
            ast::Node {
                span: ast::Span { start: 9, end: 23 },
                node: ast::SolveItem::Satisfy {
                    annotations: vec![]
                },
            }
        );
    }

    #[test]
    fn optimisation_objectives() {
        let minimize = parse("solve minimize cost;").expect("valid fzn");
        let maximize = parse("solve :: int_search([x], input_order, indomain_min) maximize 3;")
            .expect("valid fzn");

        assert_eq!(
            minimize.solve.node,
            ast::SolveItem::Optimize {
                annotations: vec![],
                ty: ast::OptimizationType::Minimize,
                expr: ast::BasicExpr::Identifier("cost".into()),
            }
        );
        assert_eq!(
            maximize.solve.node,
            ast::SolveItem::Optimize {
                annotations: vec![ast::Annotation {
                    identifier: "int_search".into(),
                    expressions: vec![
                        vec![ann_ident("x")],
                        vec![ann_ident("input_order")],
                        vec![ann_ident("indomain_min")],
                    ],
                }],
                ty: ast::OptimizationType::Maximize,
                expr: ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(3)),
            }
        );
    }

    #[test]
    fn predicate_items() {
        let source = r#"
        predicate my_pred(var int: x, array [int] of var bool: ys, set of {1, 3}: s, 1.0..2.0: f);
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");

        assert_eq!(
            raw_model.predicates[0].node,
            ast::PredicateItem {
                identifier: "my_pred".into(),
                parameters: vec![
                    ast::PredParam {
                        ty: ast::PredParamType::Basic(ast::BasicPredParamType::Var(
                            ast::BasicVarType::IntUnbounded
                        )),
                        identifier: "x".into(),
                    },
                    ast::PredParam {
                        ty: ast::PredParamType::Array {
                            index_set: ast::PredIndexSet::Unbounded,
                            element: ast::BasicPredParamType::Var(ast::BasicVarType::Bool),
                        },
                        identifier: "ys".into(),
                    },
                    ast::PredParam {
                        ty: ast::PredParamType::Basic(ast::BasicPredParamType::SetSet(vec![
                            1, 3
                        ])),
                        identifier: "s".into(),
                    },
                    ast::PredParam {
                        ty: ast::PredParamType::Basic(ast::BasicPredParamType::FloatBounded {
                            lower_bound: 1.0,
                            upper_bound: 2.0,
                        }),
                        identifier: "f".into(),
                    },
                ],
            }
        );
    }

    #[test]
    fn parameter_declarations() {
        let source = r#"
        int: n = 0x10;
        bool: b = false;
        float: f = 2.5e-1;
        set of int: s = {};
        array [1..3] of int: xs = [1, -2, 0o7];
        array [1..2] of set of int: ss = [1..3, {4, 2}];
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");
        let parameters = raw_model
            .parameters
            .into_iter()
            .map(|node| node.node)
            .collect::<Vec<_>>();

        assert_eq!(
            parameters,
            vec![
                ast::ParDeclItem {
                    ty: ast::ParType::Basic(ast::BasicParType::Int),
                    identifier: "n".into(),
                    expr: ast::ParExpr::Basic(ast::BasicLiteralExpr::Int(16)),
                },
                ast::ParDeclItem {
                    ty: ast::ParType::Basic(ast::BasicParType::Bool),
                    identifier: "b".into(),
                    expr: ast::ParExpr::Basic(ast::BasicLiteralExpr::Bool(false)),
                },
                ast::ParDeclItem {
                    ty: ast::ParType::Basic(ast::BasicParType::Float),
                    identifier: "f".into(),
                    expr: ast::ParExpr::Basic(ast::BasicLiteralExpr::Float(0.25)),
                },
                ast::ParDeclItem {
                    ty: ast::ParType::Basic(ast::BasicParType::SetOfInt),
                    identifier: "s".into(),
                    expr: ast::ParExpr::Basic(ast::BasicLiteralExpr::EmptySet),
                },
                ast::ParDeclItem {
                    ty: ast::ParType::Array {
                        index_set: ast::IndexSet { upper_bound: 3 },
                        element: ast::BasicParType::Int,
                    },
                    identifier: "xs".into(),
                    expr: ast::ParExpr::Array(vec![
                        ast::BasicLiteralExpr::Int(1),
                        ast::BasicLiteralExpr::Int(-2),
                        ast::BasicLiteralExpr::Int(7),
                    ]),
                },
                ast::ParDeclItem {
                    ty: ast::ParType::Array {
                        index_set: ast::IndexSet { upper_bound: 2 },
                        element: ast::BasicParType::SetOfInt,
                    },
                    identifier: "ss".into(),
                    expr: ast::ParExpr::Array(vec![
                        ast::BasicLiteralExpr::IntSetBounded {
                            lower_bound: 1,
                            upper_bound: 3,
                        },
                        ast::BasicLiteralExpr::IntSet(vec![4, 2]),
                    ]),
                },
            ]
        );
    }

    #[test]
    fn variable_types() {
        let source = r#"
        var bool: a;
        var int: b;
        var 1..5: c;
        var {1, 3, 5}: d;
        var float: e;
        var -1.5..1.5: f;
        var set of 1..3: g;
        var set of {2, 4}: h;
        var set of int: i;
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");
        let types = raw_model
            .variables
            .into_iter()
            .map(|node| match node.node {
                ast::VarDeclItem::Basic(decl) => decl.ty,
                ast::VarDeclItem::Array(_) => panic!("expected a scalar declaration"),
            })
            .collect::<Vec<_>>();

        assert_eq!(
            types,
            vec![
                ast::BasicVarType::Bool,
                ast::BasicVarType::IntUnbounded,
                ast::BasicVarType::IntBounded {
                    lower_bound: 1,
                    upper_bound: 5
                },
                ast::BasicVarType::IntSet(vec![1, 3, 5]),
                ast::BasicVarType::FloatUnbounded,
                ast::BasicVarType::FloatBounded {
                    lower_bound: -1.5,
                    upper_bound: 1.5
                },
                ast::BasicVarType::SetBounded {
                    lower_bound: 1,
                    upper_bound: 3
                },
                ast::BasicVarType::SetSet(vec![2, 4]),
                ast::BasicVarType::SetUnbounded,
            ]
        );
    }

    #[test]
    fn variable_declarations_with_annotations_and_values() {
        let source = r#"
        var 1..5: x :: output_var :: is_defined_var = 3;
        array [1..2] of var int: xs :: output_array([1..2]) = [x, 4];
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");

        assert_eq!(
            raw_model.variables[0].node,
            ast::VarDeclItem::Basic(ast::BasicVarDecl {
                ty: ast::BasicVarType::IntBounded {
                    lower_bound: 1,
                    upper_bound: 5
                },
                identifier: "x".into(),
                annotations: vec![
                    ast::Annotation {
                        identifier: "output_var".into(),
                        expressions: vec![],
                    },
                    ast::Annotation {
                        identifier: "is_defined_var".into(),
                        expressions: vec![],
                    },
                ],
                expr: Some(ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(3))),
            })
        );
        assert_eq!(
            raw_model.variables[1].node,
            ast::VarDeclItem::Array(ast::ArrayVarDecl {
                ty: ast::ArrayVarType {
                    index_set: ast::IndexSet { upper_bound: 2 },
                    element: ast::BasicVarType::IntUnbounded,
                },
                identifier: "xs".into(),
                annotations: vec![ast::Annotation {
                    identifier: "output_array".into(),
                    expressions: vec![vec![int_set_ann(1, 2)]],
                }],
                literals: vec![
                    ast::BasicExpr::Identifier("x".into()),
                    ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(4)),
                ],
            })
        );
    }

    #[test]
    fn constraints_with_nested_annotations() {
        let source = r#"
        constraint int_lin_le([1, 2], [x, y], 5) :: defines_var(y) :: domain;
        constraint set_in(x, {}) :: mzn_path("model.mzn", [1.5, 2.5]);
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");

        assert_eq!(
            raw_model.constraints[0].node,
            ast::ConstraintItem {
                identifier: "int_lin_le".into(),
                expressions: vec![
                    ast::Expr::Array(vec![
                        ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(1)),
                        ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(2)),
                    ]),
                    ast::Expr::Array(vec![
                        ast::BasicExpr::Identifier("x".into()),
                        ast::BasicExpr::Identifier("y".into()),
                    ]),
                    ast::Expr::Basic(ast::BasicExpr::Literal(ast::BasicLiteralExpr::Int(5))),
                ],
                annotations: vec![
                    ast::Annotation {
                        identifier: "defines_var".into(),
                        expressions: vec![vec![ann_ident("y")]],
                    },
                    ast::Annotation {
                        identifier: "domain".into(),
                        expressions: vec![],
                    },
                ],
            }
        );
        assert_eq!(
            raw_model.constraints[1].node.annotations,
            vec![ast::Annotation {
                identifier: "mzn_path".into(),
                expressions: vec![
                    vec![ast::BasicAnnExpr::String("model.mzn".into())],
                    vec![
                        ast::BasicAnnExpr::Literal(ast::BasicLiteralExpr::Float(1.5)),
                        ast::BasicAnnExpr::Literal(ast::BasicLiteralExpr::Float(2.5)),
                    ],
                ],
            }]
        );
    }

    #[test]
    fn string_escapes_are_resolved() {
        let source = r#"solve :: note("say \"hi\"") satisfy;"#;

        let raw_model = parse(source).expect("valid fzn");

        assert_eq!(
            raw_model.solve.node.annotations()[0].expressions,
            vec![vec![ast::BasicAnnExpr::String("say \"hi\"".into())]]
        );
    }

    #[test]
    fn identifiers_are_interned() {
        let source = r#"
        var int: x;
        constraint int_eq(x, x);
        solve satisfy;
        "#;

        let raw_model = parse(source).expect("valid fzn");
        let declared = Rc::clone(raw_model.variables[0].node.identifier());
        let ast::Expr::Basic(ast::BasicExpr::Identifier(used)) =
            &raw_model.constraints[0].node.expressions[0]
        else {
            panic!("expected an identifier");
        };

        assert!(Rc::ptr_eq(&declared, used));
    }

    #[test]
    fn trailing_input_is_a_syntax_error() {
        let source = "solve satisfy;\nvar int: x;";

        let error = parse(source).expect_err("trailing declaration");

        match error {
            FznError::Syntax {
                span_start,
                remainder,
                ..
            } => {
                assert_eq!(span_start, 15);
                assert_eq!(remainder, "var int: x;");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn items_out_of_order_are_rejected() {
        let source = r#"
        constraint int_eq(x, 1);
        var int: x;
        solve satisfy;
        "#;

        assert!(matches!(parse(source), Err(FznError::Syntax { .. })));
    }

    #[test]
    fn missing_solve_item_is_rejected() {
        assert!(matches!(
            parse("var int: x;"),
            Err(FznError::Syntax { .. })
        ));
    }

    #[test]
    fn lex_errors_are_syntax_errors() {
        assert!(matches!(
            parse("var int: x = 1.0e999; solve satisfy;"),
            Err(FznError::Syntax { .. })
        ));
        assert!(matches!(
            parse("var int: x = #; solve satisfy;"),
            Err(FznError::Syntax { .. })
        ));
    }
}
