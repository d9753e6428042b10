//! nom grammar for the Prolog subset.
//!
//! Precedence, loosest first: `;` then `,` then `\+`. Both connectives are
//! right-associative. `%` starts a line comment.

use super::ast::{ClauseAst, GoalAst, TermAst};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, satisfy},
    combinator::{map, map_res, opt, recognize, verify},
    error::{Error, ErrorKind},
    multi::separated_list1,
    sequence::{delimited, pair, preceded},
    IResult,
};

/// Consume whitespace and `%` line comments
fn ws(mut input: &str) -> IResult<&str, ()> {
    loop {
        input = input.trim_start();
        match input.strip_prefix('%') {
            Some(rest) => {
                input = rest.find('\n').map_or("", |pos| &rest[pos + 1..]);
            }
            None => return Ok((input, ())),
        }
    }
}

/// Skip leading whitespace and comments (infallible form of [`ws`])
pub(super) fn skip_ws(input: &str) -> &str {
    match ws(input) {
        Ok((rest, ())) => rest,
        Err(_) => input,
    }
}

fn ident_tail(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

/// Lowercase-initial name: an atom or functor
fn lower_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(|c| c.is_ascii_lowercase()), ident_tail))(input)
}

/// Uppercase- or underscore-initial name: a variable (a lone `_` is the
/// wildcard)
fn var_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c: char| c.is_ascii_uppercase() || c == '_'),
        ident_tail,
    ))(input)
}

fn integer(input: &str) -> IResult<&str, TermAst> {
    map_res(recognize(pair(opt(char('-')), digit1)), |digits: &str| {
        digits.parse::<i64>().map(TermAst::Int)
    })(input)
}

/// Double-quoted string with `\"` and `\\` escapes
fn string_literal(input: &str) -> IResult<&str, String> {
    let (rest, _) = char('"')(input)?;
    let mut out = String::new();
    let mut iter = rest.char_indices();
    while let Some((idx, c)) = iter.next() {
        match c {
            '"' => return Ok((&rest[idx + 1..], out)),
            '\\' => match iter.next() {
                Some((_, escaped @ ('"' | '\\'))) => out.push(escaped),
                _ => {
                    return Err(nom::Err::Failure(Error::new(
                        &rest[idx..],
                        ErrorKind::EscapedTransform,
                    )))
                }
            },
            _ => out.push(c),
        }
    }
    Err(nom::Err::Failure(Error::new(rest, ErrorKind::Char)))
}

/// Parenthesised argument list, at least one argument; a zero-arity symbol
/// is written without parentheses
fn arg_list(input: &str) -> IResult<&str, Vec<TermAst>> {
    delimited(
        char('('),
        separated_list1(preceded(ws, char(',')), term),
        preceded(ws, char(')')),
    )(input)
}

fn atom_or_compound(input: &str) -> IResult<&str, TermAst> {
    let (rest, name) = lower_name(input)?;
    let (rest, args) = opt(arg_list)(rest)?;
    let ast = match args {
        Some(args) => TermAst::Compound(name.to_string(), args),
        None => TermAst::Atom(name.to_string()),
    };
    Ok((rest, ast))
}

fn variable_or_wildcard(input: &str) -> IResult<&str, TermAst> {
    map(var_name, |name| {
        if name == "_" {
            TermAst::Wildcard
        } else {
            TermAst::Var(name.to_string())
        }
    })(input)
}

/// `[]`, `[a, b]`, or `[H | T]`
fn list_term(input: &str) -> IResult<&str, TermAst> {
    let (rest, _) = char('[')(input)?;
    let (rest, close) = opt(preceded(ws, char(']')))(rest)?;
    if close.is_some() {
        return Ok((rest, TermAst::Atom("[]".to_string())));
    }
    let (rest, items) = separated_list1(preceded(ws, char(',')), term)(rest)?;
    let (rest, tail) = opt(preceded(preceded(ws, char('|')), term))(rest)?;
    let (rest, _) = preceded(ws, char(']'))(rest)?;
    Ok((rest, TermAst::List(items, tail.map(Box::new))))
}

pub(super) fn term(input: &str) -> IResult<&str, TermAst> {
    preceded(
        ws,
        alt((
            list_term,
            map(string_literal, TermAst::Str),
            integer,
            variable_or_wildcard,
            atom_or_compound,
        )),
    )(input)
}

fn call_goal(input: &str) -> IResult<&str, GoalAst> {
    let (rest, name) = lower_name(input)?;
    let (rest, args) = opt(arg_list)(rest)?;
    Ok((rest, GoalAst::Call(name.to_string(), args.unwrap_or_default())))
}

fn variable_goal(input: &str) -> IResult<&str, GoalAst> {
    map(verify(var_name, |name: &str| name != "_"), |name: &str| {
        GoalAst::Var(name.to_string())
    })(input)
}

fn negation(input: &str) -> IResult<&str, GoalAst> {
    map(preceded(tag("\\+"), unary_goal), |inner| {
        GoalAst::Not(Box::new(inner))
    })(input)
}

fn parenthesised(input: &str) -> IResult<&str, GoalAst> {
    delimited(char('('), goal, preceded(ws, char(')')))(input)
}

fn unary_goal(input: &str) -> IResult<&str, GoalAst> {
    preceded(ws, alt((negation, parenthesised, variable_goal, call_goal)))(input)
}

fn conjunction(input: &str) -> IResult<&str, GoalAst> {
    let (rest, first) = unary_goal(input)?;
    let (rest, more) = opt(preceded(preceded(ws, char(',')), conjunction))(rest)?;
    let ast = match more {
        Some(right) => GoalAst::And(Box::new(first), Box::new(right)),
        None => first,
    };
    Ok((rest, ast))
}

fn disjunction(input: &str) -> IResult<&str, GoalAst> {
    let (rest, first) = conjunction(input)?;
    let (rest, more) = opt(preceded(preceded(ws, char(';')), disjunction))(rest)?;
    let ast = match more {
        Some(right) => GoalAst::Or(Box::new(first), Box::new(right)),
        None => first,
    };
    Ok((rest, ast))
}

pub(super) fn goal(input: &str) -> IResult<&str, GoalAst> {
    disjunction(input)
}

/// A full goal input: goal plus terminating `.`
pub(super) fn goal_input(input: &str) -> IResult<&str, GoalAst> {
    let (rest, parsed) = goal(input)?;
    let (rest, _) = opt(preceded(ws, char('.')))(rest)?;
    Ok((rest, parsed))
}

fn head(input: &str) -> IResult<&str, (String, Vec<TermAst>)> {
    let (rest, _) = ws(input)?;
    let (rest, name) = lower_name(rest)?;
    let (rest, args) = opt(arg_list)(rest)?;
    Ok((rest, (name.to_string(), args.unwrap_or_default())))
}

/// `head.` or `head :- body.`
pub(super) fn clause(input: &str) -> IResult<&str, ClauseAst> {
    let (rest, (name, args)) = head(input)?;
    let (rest, body) = opt(preceded(preceded(ws, tag(":-")), goal))(rest)?;
    let (rest, _) = preceded(ws, char('.'))(rest)?;
    Ok((rest, ClauseAst { name, args, body }))
}
