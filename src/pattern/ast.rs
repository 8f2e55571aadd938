//! AST types for SnakeEx programs.

/// A parsed program. The first declaration is where matching starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    /// Look up a declaration by name. The first declaration with the name wins.
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    pub fn entry(&self) -> Option<&Declaration> {
        self.declarations.first()
    }
}

/// `name{params}:body`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub params: Params,
    pub body: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Characters matched one cell at a time.
    Literal(String),
    /// One cell that is (or with `negate`, is not) one of `chars`.
    CharClass { chars: String, negate: bool },
    Sequence(Vec<Node>),
    Alternation(Vec<Node>),
    Closure { inner: Box<Node>, repeat: Repeat },
    Call(Call),
    /// Change heading without consuming a cell.
    Direction(DirectionSpec),
    /// `.`
    Wildcard,
    /// `$`
    OutOfBounds,
    LookAround { op: LookAround, inner: Box<Node> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    Optional,
    /// `%{min,max}`
    Bounded(Bounds),
}

/// Repetition bounds of `%{..}`. A missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookAround {
    /// `!` succeeds, consuming nothing, iff the inner pattern fails.
    Not,
    /// `~` matches without marking.
    Transparent,
    /// `` ` `` matches previously marked cells only.
    MarkedOnly,
}

/// `{name<direction>params}`
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub direction: DirectionSpec,
    pub params: Params,
}

/// The contents of `<...>`: turn letters plus the absolute-heading flag `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionSpec {
    pub turns: String,
    pub absolute: bool,
}

impl DirectionSpec {
    pub fn forward() -> Self {
        Self {
            turns: "F".into(),
            absolute: false,
        }
    }
}

/// Flags shared by declarations and calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Params {
    /// `P` – the callee moves the caller's own cursor.
    pub piggyback: bool,
    /// `H`
    pub wrap_x: bool,
    /// `V`
    pub wrap_y: bool,
    /// `E` – never step onto a marked cell.
    pub exclusive: bool,
    /// `I`
    pub insensitive: bool,
    /// `A` – take one unmarked step after returning.
    pub advance: bool,
    /// `S`
    pub no_mark: bool,
    /// `L`
    pub only_marked: bool,
    /// `0`-`9`
    pub group: Option<u8>,
}

impl Params {
    /// Effective flags for a call: anything set at the call site or on the
    /// declaration applies, and a call-site group overrides the declared one.
    pub fn merged(call: &Params, declared: &Params) -> Params {
        Params {
            piggyback: call.piggyback || declared.piggyback,
            wrap_x: call.wrap_x || declared.wrap_x,
            wrap_y: call.wrap_y || declared.wrap_y,
            exclusive: call.exclusive || declared.exclusive,
            insensitive: call.insensitive || declared.insensitive,
            advance: call.advance || declared.advance,
            no_mark: call.no_mark || declared.no_mark,
            only_marked: call.only_marked || declared.only_marked,
            group: call.group.or(declared.group),
        }
    }
}
