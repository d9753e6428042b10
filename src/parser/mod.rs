//! Parser for the Prolog subset.
//!
//! The grammar produces a string-named AST ([`ast`]); lowering interns the
//! names and rewrites list sugar into `./2` chains. Parse errors are
//! reported as human-readable strings and never reach the resolver.

pub mod ast;
mod grammar;

use crate::logic::{
    Callable, Clause, Functor, Goal, Interner, Term, Variable, QUERY_SCOPE,
};
use ast::{ClauseAst, GoalAst, TermAst};
use std::rc::Rc;

/// Parse a single clause, e.g. `plus(z, N, N).`
pub fn parse_clause(input: &str, interner: &mut Interner) -> Result<Clause, String> {
    let (rest, parsed) = grammar::clause(input).map_err(|_| syntax_error(input))?;
    ensure_consumed(rest)?;
    Ok(lower_clause(&parsed, interner))
}

/// Parse a query goal, e.g. `plus(s(z), z, R).` (the final `.` is optional)
pub fn parse_goal(input: &str, interner: &mut Interner) -> Result<Goal, String> {
    let (rest, parsed) = grammar::goal_input(input).map_err(|_| syntax_error(input))?;
    ensure_consumed(rest)?;
    Ok(lower_goal(&parsed, interner))
}

/// Parse a sequence of clauses separated by whitespace or comments
pub fn parse_program(input: &str, interner: &mut Interner) -> Result<Vec<Clause>, String> {
    let mut clauses = Vec::new();
    let mut rest = grammar::skip_ws(input);
    while !rest.is_empty() {
        let (remaining, parsed) = grammar::clause(rest).map_err(|_| syntax_error(rest))?;
        clauses.push(lower_clause(&parsed, interner));
        rest = grammar::skip_ws(remaining);
    }
    Ok(clauses)
}

fn ensure_consumed(rest: &str) -> Result<(), String> {
    let rest = grammar::skip_ws(rest);
    if rest.is_empty() {
        Ok(())
    } else {
        Err(format!("unexpected trailing input `{}`", excerpt(rest)))
    }
}

fn syntax_error(near: &str) -> String {
    format!("syntax error near `{}`", excerpt(near))
}

/// First line of the remaining input, shortened for error messages
fn excerpt(input: &str) -> &str {
    let line = input.lines().next().unwrap_or("");
    let end = line
        .char_indices()
        .nth(40)
        .map_or(line.len(), |(idx, _)| idx);
    &line[..end]
}

// === Lowering: AST -> interned logic types ===

fn lower_clause(ast: &ClauseAst, interner: &mut Interner) -> Clause {
    let head = lower_callable(&ast.name, &ast.args, interner);
    match &ast.body {
        Some(body) => Clause::rule(head, lower_goal(body, interner)),
        None => Clause::fact(head),
    }
}

fn lower_goal(ast: &GoalAst, interner: &mut Interner) -> Goal {
    match ast {
        GoalAst::Call(name, args) => Goal::Call(lower_callable(name, args, interner)),
        GoalAst::Var(name) => Goal::Var(Variable::new(
            interner.intern_variable(name),
            QUERY_SCOPE,
        )),
        GoalAst::Not(inner) => Goal::Not(Rc::new(lower_goal(inner, interner))),
        GoalAst::And(left, right) => Goal::And(
            Rc::new(lower_goal(left, interner)),
            Rc::new(lower_goal(right, interner)),
        ),
        GoalAst::Or(left, right) => Goal::Or(
            Rc::new(lower_goal(left, interner)),
            Rc::new(lower_goal(right, interner)),
        ),
    }
}

fn lower_callable(name: &str, args: &[TermAst], interner: &mut Interner) -> Callable {
    let name_id = interner.intern_functor(name);
    let args = args.iter().map(|arg| lower_term(arg, interner)).collect();
    Callable::new(name_id, args)
}

fn lower_term(ast: &TermAst, interner: &mut Interner) -> Term {
    match ast {
        TermAst::Atom(name) => Term::Atom(interner.intern_atom(name)),
        TermAst::Int(value) => Term::Int(*value),
        TermAst::Str(value) => Term::Str(value.clone()),
        TermAst::Var(name) => Term::Var(Variable::new(
            interner.intern_variable(name),
            QUERY_SCOPE,
        )),
        TermAst::Wildcard => Term::Wildcard,
        TermAst::Compound(name, args) => {
            let name_id = interner.intern_functor(name);
            let args = args.iter().map(|arg| lower_term(arg, interner)).collect();
            Term::compound(name_id, args)
        }
        TermAst::List(items, tail) => {
            let mut list = match tail {
                Some(tail) => lower_term(tail, interner),
                None => Term::Atom(interner.intern_atom("[]")),
            };
            let cons = interner.intern_functor(".");
            for item in items.iter().rev() {
                let head = lower_term(item, interner);
                list = Term::Compound(Functor::new(cons, 2), vec![head, list]);
            }
            list
        }
    }
}
