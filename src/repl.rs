//! Interactive session: command dispatch and answer streaming.
//!
//! The session runs in one of two modes. In store mode input lines are
//! clauses added to the knowledge base; in check mode they are goals to
//! prove. While a goal streams answers, `:n` demands the next one and `:d`
//! releases the remaining search.

use crate::config::SolveConfig;
use crate::kb::KnowledgeBase;
use crate::logic::{Goal, Interner};
use crate::parser;
use crate::solve::{bindings, SolveOutcome, Solver};
use anyhow::Result;
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

/// What the session does with a plain input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Lines are clauses to assert
    Store,
    /// Lines are goals to prove
    Check,
}

/// One interactive session's state
pub struct Session {
    kb: KnowledgeBase,
    interner: Interner,
    config: SolveConfig,
    mode: Mode,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create a session with an empty knowledge base, starting in store mode
    pub fn new() -> Self {
        Session {
            kb: KnowledgeBase::new(),
            interner: Interner::new(),
            config: SolveConfig::default(),
            mode: Mode::Store,
        }
    }

    fn prompt_tag(&self) -> &'static str {
        match self.mode {
            Mode::Store => "store",
            Mode::Check => "check",
        }
    }

    /// Handle one input line. Returns `false` when the session should end.
    fn dispatch(&mut self, line: &str, editor: &mut Reedline) -> Result<bool> {
        match line {
            ":q" | ":quit" => return Ok(false),
            ":h" | ":help" => print_help(),
            ":s" | ":store" => {
                self.mode = Mode::Store;
                println!("store mode: input is added to the knowledge base.");
            }
            ":c" | ":check" => {
                self.mode = Mode::Check;
                println!("check mode: input is proved against the knowledge base.");
            }
            ":o" | ":occurs" => {
                self.config.occurs_check = !self.config.occurs_check;
                println!(
                    "occurs check {}.",
                    if self.config.occurs_check {
                        "enabled"
                    } else {
                        "disabled"
                    }
                );
            }
            ":show" => print!("{}", self.kb.snapshot(&self.interner)),
            _ if line.starts_with(":limit") => {
                match line[":limit".len()..].trim() {
                    "" => println!("step limit: {} (0 = none).", self.config.step_limit),
                    value => match value.parse::<usize>() {
                        Ok(limit) => {
                            self.config.step_limit = limit;
                            println!("step limit set to {limit}.");
                        }
                        Err(_) => println!("usage: :limit <steps>"),
                    },
                }
            }
            ":clear" => {
                self.kb.clear();
                println!("knowledge base cleared.");
            }
            _ => match self.mode {
                Mode::Store => match parser::parse_clause(line, &mut self.interner) {
                    Ok(clause) => {
                        self.kb.assert(clause);
                        println!("ok.");
                    }
                    Err(message) => println!("{message}"),
                },
                Mode::Check => match parser::parse_goal(line, &mut self.interner) {
                    Ok(goal) => self.run_query(&goal, editor)?,
                    Err(message) => println!("{message}"),
                },
            },
        }
        Ok(true)
    }

    /// Stream answers for `goal`, pulling on demand until done
    fn run_query(&self, goal: &Goal, editor: &mut Reedline) -> Result<()> {
        let vars = goal.variables();
        let mut solver = Solver::new(&self.kb, goal, self.config.clone());
        loop {
            match solver.next_outcome() {
                SolveOutcome::Answer(subst) => {
                    let shown = bindings(&vars, &subst);
                    if shown.is_empty() {
                        println!("true.");
                    } else {
                        for (var, term) in &shown {
                            println!(
                                "{} = {}",
                                self.interner.resolve_variable(var.name),
                                term.display(&self.interner)
                            );
                        }
                    }
                    if !await_more(editor)? {
                        break;
                    }
                }
                SolveOutcome::Exhausted => {
                    println!("no.");
                    break;
                }
                SolveOutcome::LimitReached => {
                    println!("step limit reached; stopping this query.");
                    break;
                }
            }
        }
        let stats = solver.statistics();
        println!(
            "% {} steps, {} clauses tried, {} unifications",
            stats.steps, stats.clauses_tried, stats.unifications
        );
        Ok(())
    }
}

/// Ask whether to continue the answer stream
fn await_more(editor: &mut Reedline) -> Result<bool> {
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("more".to_string()),
        DefaultPromptSegment::Empty,
    );
    loop {
        match editor.read_line(&prompt)? {
            Signal::Success(line) => match line.trim() {
                ":n" | ":next" => return Ok(true),
                ":d" | ":done" => return Ok(false),
                other => {
                    println!("type :n for the next answer or :d to stop (got `{other}`)");
                }
            },
            Signal::CtrlC | Signal::CtrlD => return Ok(false),
        }
    }
}

fn print_help() {
    println!(":s, :store   add input clauses to the knowledge base");
    println!(":c, :check   prove input goals against the knowledge base");
    println!(":o, :occurs  toggle the occurs check");
    println!(":limit [n]   show or set the per-answer step limit (0 = none)");
    println!(":show        list the stored clauses");
    println!(":clear       remove every stored clause");
    println!(":n, :next    demand the next answer of a running query");
    println!(":d, :done    stop a running query");
    println!(":h, :help    this help");
    println!(":q, :quit    leave");
}

/// Run the interactive interpreter until the user quits
pub fn run() -> Result<()> {
    let mut session = Session::new();
    let mut editor = Reedline::create();
    println!("monolog (:h for help)");
    loop {
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(session.prompt_tag().to_string()),
            DefaultPromptSegment::Empty,
        );
        match editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                let line = buffer.trim();
                if line.is_empty() {
                    continue;
                }
                if !session.dispatch(line, &mut editor)? {
                    break;
                }
            }
            Signal::CtrlC | Signal::CtrlD => break,
        }
    }
    Ok(())
}
