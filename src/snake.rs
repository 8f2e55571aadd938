//! The snake: a cursor with a heading and the cells it has matched so far.
//!
//! Snakes are plain values. Every branch point clones them, so one branch
//! never observes another's marks or flags.

use crate::direction::Heading;
use crate::grid::Grid;
use crate::pattern::ast::Params;

/// A grid coordinate `(x, y)`.
pub type Cell = (i32, i32);

/// Number of synchronisation groups (`0`-`9`).
pub const GROUP_COUNT: usize = 10;

/// Behaviour switches a snake carries through a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnakeFlags {
    /// Stepping does not record the cell.
    pub no_mark: bool,
    pub wrap_x: bool,
    pub wrap_y: bool,
    /// Fail on stepping off an already marked cell.
    pub exclusive: bool,
    /// Case-insensitive comparisons.
    pub insensitive: bool,
    /// Fail on stepping off a cell that is not marked.
    pub only_marked: bool,
}

impl SnakeFlags {
    /// Switch on whatever `params` asks for. Flags are never switched off.
    pub fn enable(&mut self, params: &Params) {
        self.wrap_x |= params.wrap_x;
        self.wrap_y |= params.wrap_y;
        self.exclusive |= params.exclusive;
        self.insensitive |= params.insensitive;
        self.no_mark |= params.no_mark;
        self.only_marked |= params.only_marked;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
    /// Steps taken since the innermost call began.
    pub age: usize,
    /// Marked cells in the order they were first marked, without repeats.
    pub marks: Vec<Cell>,
    pub flags: SnakeFlags,
    /// Set when the last step wrapped around an edge.
    pub wrapped: bool,
    /// Age each group was first seen with.
    pub group_ages: [Option<usize>; GROUP_COUNT],
}

impl Snake {
    /// A fresh snake at `(x, y)` heading east.
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            heading: Heading::EAST,
            age: 0,
            marks: Vec::new(),
            flags: SnakeFlags::default(),
            wrapped: false,
            group_ages: [None; GROUP_COUNT],
        }
    }

    pub fn position(&self) -> Cell {
        (self.x, self.y)
    }

    pub fn is_marked(&self, cell: Cell) -> bool {
        self.marks.contains(&cell)
    }

    /// Record the current cell, unless marking is suppressed.
    pub fn mark_current(&mut self) {
        let here = self.position();
        if !self.flags.no_mark && !self.is_marked(here) {
            self.marks.push(here);
        }
    }

    /// Whether the snake may leave its current cell, given the exclusive
    /// and only-marked rules. Neither rule applies before the first mark.
    fn may_leave(&self) -> bool {
        if self.marks.is_empty() {
            return true;
        }
        let marked = self.is_marked(self.position());
        if self.flags.only_marked {
            marked
        } else if self.flags.exclusive {
            !marked
        } else {
            true
        }
    }

    /// Take one step along the heading, marking the cell left behind when
    /// `mark` is set. Returns `false` if the step is not allowed.
    pub fn advance(&mut self, grid: &Grid, mark: bool) -> bool {
        if !self.may_leave() {
            return false;
        }
        if mark {
            self.mark_current();
        }
        self.x += self.heading.dx;
        self.y += self.heading.dy;
        self.wrapped = false;

        let height = grid.height() as i32;
        if self.flags.wrap_y {
            if self.y < 0 {
                self.y = height - 1;
                self.wrapped = true;
            }
            if self.y >= height {
                self.y = 0;
                self.wrapped = true;
            }
        }
        if self.flags.wrap_x
            && let Some(width) = grid.row_len(self.y)
        {
            let width = width as i32;
            if self.x < 0 {
                self.x = width - 1;
                self.wrapped = true;
            }
            if self.x >= width {
                self.x = 0;
                self.wrapped = true;
            }
        }

        self.age += 1;
        true
    }

    /// Check this snake against synchronisation group `group`: the first
    /// snake to reach a group fixes its age, later ones must agree.
    pub fn sync_group(&mut self, group: u8) -> bool {
        let slot = &mut self.group_ages[usize::from(group) % GROUP_COUNT];
        match *slot {
            None => {
                *slot = Some(self.age);
                true
            }
            Some(age) => age == self.age,
        }
    }

    /// Return from a call made by `caller`: position and heading go back
    /// unless `piggyback`, and flags, age and wrap state always do. Marks
    /// and group ages made by the callee are kept.
    pub fn return_to(&mut self, caller: &Snake, piggyback: bool) {
        if !piggyback {
            self.x = caller.x;
            self.y = caller.y;
            self.heading = caller.heading;
        }
        self.flags = caller.flags;
        self.age = caller.age;
        self.wrapped = caller.wrapped;
    }

    /// Marks as a flat `x0, y0, x1, y1, ...` list.
    pub fn flat_marks(&self) -> Vec<i32> {
        self.marks.iter().flat_map(|&(x, y)| [x, y]).collect()
    }
}
