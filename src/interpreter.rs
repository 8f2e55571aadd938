//! Tree-walking interpreter for parsed SnakeEx programs.
//!
//! Each node takes a set of snakes and returns the set that survives it.
//! Nothing backtracks: every branch point clones the snake and all
//! surviving continuations are carried forward together.

use crate::branches::Branches;
use crate::direction::{Heading, Turn};
use crate::error::RuntimeError;
use crate::grid::Grid;
use crate::pattern::ast::*;
use crate::pattern::char_class::{chars_match, class_matches};
use crate::snake::Snake;

pub struct Interpreter<'a> {
    program: &'a Program,
    grid: &'a Grid,
    budget: Option<usize>,
    steps: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program, grid: &'a Grid, budget: Option<usize>) -> Self {
        Self {
            program,
            grid,
            budget,
            steps: 0,
        }
    }

    /// Run the whole program from `snake`, as a forward call to the first
    /// declaration. The step budget restarts with every call.
    pub fn run(&mut self, snake: Snake) -> Result<Branches, RuntimeError> {
        self.steps = 0;
        let entry = self.program.entry().ok_or(RuntimeError::NoDeclarations)?;
        let call = Call {
            name: entry.name.clone(),
            direction: DirectionSpec::forward(),
            params: Params::default(),
        };
        self.call(&call, snake)
    }

    /// Run `node` for every snake in `branches`.
    pub fn execute(&mut self, node: &Node, branches: Branches) -> Result<Branches, RuntimeError> {
        branches.try_flat_map(|snake| self.execute_one(node, snake))
    }

    fn execute_one(&mut self, node: &Node, mut snake: Snake) -> Result<Branches, RuntimeError> {
        self.tick()?;
        if snake.heading.is_stalled() {
            return Err(RuntimeError::Stalled);
        }

        match node {
            Node::Literal(text) => {
                for target in text.chars() {
                    let insensitive = snake.flags.insensitive;
                    let readable = self
                        .read(&snake)
                        .is_some_and(|cell| chars_match(cell, target, insensitive));
                    if !readable || !snake.advance(self.grid, true) {
                        return Ok(Branches::None);
                    }
                }
                Ok(snake.into())
            }
            Node::CharClass { chars, negate } => {
                let insensitive = snake.flags.insensitive;
                let matched = self
                    .read(&snake)
                    .is_some_and(|cell| class_matches(chars, *negate, cell, insensitive));
                Ok(self.step_if(snake, matched))
            }
            Node::Wildcard => {
                let inside = self.read(&snake).is_some();
                Ok(self.step_if(snake, inside))
            }
            Node::OutOfBounds => {
                let outside = self.read(&snake).is_none();
                Ok(self.step_if(snake, outside))
            }
            Node::Sequence(children) => {
                let mut branches = Branches::Single(snake);
                for child in children {
                    branches = self.execute(child, branches)?;
                    if branches.is_empty() {
                        return Ok(Branches::None);
                    }
                }
                Ok(branches)
            }
            Node::Alternation(children) => {
                let mut out = Branches::None;
                for child in children {
                    out.extend(self.execute_one(child, snake.clone())?);
                }
                Ok(out)
            }
            Node::Closure { inner, repeat } => self.repeat(inner, *repeat, snake),
            Node::Call(call) => self.call(call, snake),
            Node::Direction(spec) => self.turn(snake, spec),
            Node::LookAround { op, inner } => match op {
                LookAround::Not => {
                    let probe = self.execute_one(inner, snake.clone())?;
                    Ok(if probe.is_empty() {
                        snake.into()
                    } else {
                        Branches::None
                    })
                }
                LookAround::Transparent => {
                    let saved = snake.flags.no_mark;
                    snake.flags.no_mark = true;
                    let out = self.execute_one(inner, snake)?;
                    Ok(out.filter_map(|mut s| {
                        s.flags.no_mark = saved;
                        Some(s)
                    }))
                }
                LookAround::MarkedOnly => {
                    let saved = snake.flags.only_marked;
                    snake.flags.only_marked = true;
                    let out = self.execute_one(inner, snake)?;
                    Ok(out.filter_map(|mut s| {
                        s.flags.only_marked = saved;
                        Some(s)
                    }))
                }
            },
        }
    }

    fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        match self.budget {
            Some(budget) if self.steps > budget => Err(RuntimeError::StepBudgetExhausted(budget)),
            _ => Ok(()),
        }
    }

    fn read(&self, snake: &Snake) -> Option<char> {
        self.grid.get(snake.x, snake.y)
    }

    /// Advance `snake` one marked step if `ok`, otherwise fail the branch.
    fn step_if(&self, mut snake: Snake, ok: bool) -> Branches {
        if ok && snake.advance(self.grid, true) {
            snake.into()
        } else {
            Branches::None
        }
    }

    /// Collect the snake after each successful repetition of `inner`.
    ///
    /// Every repetition count in range is a separate continuation, so the
    /// rest of the sequence is tried after 0, 1, 2, ... repetitions at once.
    fn repeat(&mut self, inner: &Node, repeat: Repeat, snake: Snake) -> Result<Branches, RuntimeError> {
        let (min, max) = match repeat {
            Repeat::ZeroOrMore => (0, None),
            Repeat::OneOrMore => (1, None),
            Repeat::Optional => (0, Some(1)),
            Repeat::Bounded(bounds) => (bounds.min.unwrap_or(0), bounds.max),
        };

        let mut out = Branches::None;
        if min == 0 {
            out.extend(snake.clone().into());
        }
        let mut current = Branches::Single(snake);
        let mut count = 0;
        while max.is_none_or(|max| count < max) {
            current = self.execute(inner, current)?;
            if current.is_empty() {
                break;
            }
            count += 1;
            if count >= min {
                out.extend(current.clone());
            }
        }
        Ok(out)
    }

    fn call(&mut self, call: &Call, snake: Snake) -> Result<Branches, RuntimeError> {
        let program = self.program;
        let declaration = program
            .declaration(&call.name)
            .ok_or_else(|| RuntimeError::UndeclaredPattern(call.name.clone()))?;
        let params = Params::merged(&call.params, &declaration.params);

        let caller = snake.clone();
        let mut callee = snake;
        callee.age = 0;
        callee.flags.enable(&params);

        let headed = self.turn(callee, &call.direction)?;
        let returned = self.execute(&declaration.body, headed)?.filter_map(|mut s| {
            if let Some(group) = params.group
                && !s.sync_group(group)
            {
                return None;
            }
            s.return_to(&caller, params.piggyback);
            Some(s)
        });

        if params.advance {
            Ok(returned.filter_map(|mut s| s.advance(self.grid, false).then_some(s)))
        } else {
            Ok(returned)
        }
    }

    /// Apply a direction, branching when it names several headings.
    fn turn(&self, mut snake: Snake, spec: &DirectionSpec) -> Result<Branches, RuntimeError> {
        if spec.absolute {
            snake.heading = Heading::EAST;
        }
        Ok(match Turn::parse(&spec.turns)? {
            Turn::Relative(x, y) => {
                snake.heading = snake.heading.turn(x, y);
                snake.into()
            }
            Turn::Branch(turns) => turns
                .iter()
                .map(|&(x, y)| {
                    let mut branch = snake.clone();
                    branch.heading = snake.heading.turn(x, y);
                    branch
                })
                .collect(),
            Turn::Everywhere => self
                .grid
                .cells()
                .filter(|&cell| cell != snake.position())
                .map(|(x, y)| {
                    let mut branch = snake.clone();
                    branch.heading = Heading::new(x - snake.x, y - snake.y);
                    branch
                })
                .collect(),
        })
    }
}
