//! Syntax tree produced by the grammar, before symbol interning.
//!
//! This is the boundary shape between the surface syntax and the core: a
//! fact is a name with argument terms, a rule adds a goal body, and terms
//! still carry their names as strings. Lowering in [`super`] interns the
//! names and rewrites list sugar.

/// A term as written
#[derive(Debug, Clone, PartialEq)]
pub enum TermAst {
    /// Lowercase-initial symbolic constant
    Atom(String),
    /// Integer literal
    Int(i64),
    /// Double-quoted string literal
    Str(String),
    /// Named variable
    Var(String),
    /// `_`: fresh anonymous variable
    Wildcard,
    /// Functor application
    Compound(String, Vec<TermAst>),
    /// `[a, b | T]` sugar; lowered to `./2` chains ending in `[]`
    List(Vec<TermAst>, Option<Box<TermAst>>),
}

/// A goal as written
#[derive(Debug, Clone, PartialEq)]
pub enum GoalAst {
    /// Predicate call; an atom goal is a zero-argument call
    Call(String, Vec<TermAst>),
    /// Bare variable in goal position
    Var(String),
    /// `\+ G`
    Not(Box<GoalAst>),
    /// `L, R`
    And(Box<GoalAst>, Box<GoalAst>),
    /// `L ; R`
    Or(Box<GoalAst>, Box<GoalAst>),
}

/// A clause as written: `name(args).` or `name(args) :- body.`
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseAst {
    pub name: String,
    pub args: Vec<TermAst>,
    /// `None` for facts
    pub body: Option<GoalAst>,
}
