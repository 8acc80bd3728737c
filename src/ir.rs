//! # Intermediate representation
//!
//! The flat instruction list every other component consumes: the walker
//! produces it, the interpreter executes it, the bytecode codec
//! serializes it, and the target emitters lower it into portable source.

/// One of the four directions the car can travel in, and the four initial
/// starting directions a board is walked from.
///
/// `Up` is path 0 and is always the implicit, primary entry at offset 0 of
/// the instruction list. The other three are the *secondary* entries
/// recorded in a program's [`EntryTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, in the fixed walking/path order Up, Right,
    /// Down, Left.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The perpendicular-right direction relative to `self`, i.e. the
    /// direction an `If` tile's "true" branch is walked in.
    pub fn turn_right(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// The direction directly opposite `self`.
    pub fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Zero-based index of this direction's path, matching the walking
    /// order Up=0, Right=1, Down=2, Left=3.
    pub fn path_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// Parse a direction from a case-insensitive first-letter match on
    /// up/right/down/left, as the CLI's `-d` option does.
    pub fn parse_first_letter(s: &str) -> Option<Direction> {
        match s.chars().next()?.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'r' => Some(Direction::Right),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            _ => None,
        }
    }
}

/// An abstract memory action that a redirector or `/` tile can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Dec,
    Inc,
    PrevCell,
    NextCell,
    If,
}

impl Action {
    /// The direction a memory action forces the car into. `If` has no
    /// associated direction — it doesn't change the car's heading itself.
    pub fn forced_direction(self) -> Option<Direction> {
        match self {
            Action::Dec => Some(Direction::Down),
            Action::Inc => Some(Direction::Up),
            Action::PrevCell => Some(Direction::Left),
            Action::NextCell => Some(Direction::Right),
            Action::If => None,
        }
    }

    /// The action that exactly undoes this one: `Dec`/`Inc` and
    /// `PrevCell`/`NextCell` are complementary pairs.
    pub fn complement(self) -> Option<Action> {
        match self {
            Action::Dec => Some(Action::Inc),
            Action::Inc => Some(Action::Dec),
            Action::PrevCell => Some(Action::NextCell),
            Action::NextCell => Some(Action::PrevCell),
            Action::If => None,
        }
    }

    /// The opcode this action lowers to.
    pub fn opcode(self) -> Opcode {
        match self {
            Action::Dec => Opcode::Dec,
            Action::Inc => Opcode::Inc,
            Action::PrevCell => Opcode::PrevCell,
            Action::NextCell => Opcode::NextCell,
            Action::If => Opcode::If,
        }
    }
}

/// An IR opcode. `Dec`/`Inc`/`PrevCell`/`NextCell` carry a repetition count
/// as their argument; `If`/`Goto` carry a zero-based target index into the
/// instruction list; `Exit` ignores its argument (stored as 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Dec,
    Inc,
    PrevCell,
    NextCell,
    If,
    Goto,
    Exit,
}

impl Opcode {
    /// The wire encoding used by the bytecode codec (§4.4): `Dec`=1 .. `Exit`=7.
    pub fn wire_code(self) -> u32 {
        match self {
            Opcode::Dec => 1,
            Opcode::Inc => 2,
            Opcode::PrevCell => 3,
            Opcode::NextCell => 4,
            Opcode::If => 5,
            Opcode::Goto => 6,
            Opcode::Exit => 7,
        }
    }

    /// Inverse of [`Opcode::wire_code`].
    pub fn from_wire_code(code: u32) -> Option<Opcode> {
        match code {
            1 => Some(Opcode::Dec),
            2 => Some(Opcode::Inc),
            3 => Some(Opcode::PrevCell),
            4 => Some(Opcode::NextCell),
            5 => Some(Opcode::If),
            6 => Some(Opcode::Goto),
            7 => Some(Opcode::Exit),
            _ => None,
        }
    }

    /// Whether this opcode's argument is a jump target rather than a count.
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::If | Opcode::Goto)
    }

    /// The memory action this opcode corresponds to, if any.
    pub fn as_action(self) -> Option<Action> {
        match self {
            Opcode::Dec => Some(Action::Dec),
            Opcode::Inc => Some(Action::Inc),
            Opcode::PrevCell => Some(Action::PrevCell),
            Opcode::NextCell => Some(Action::NextCell),
            Opcode::If => Some(Action::If),
            Opcode::Goto | Opcode::Exit => None,
        }
    }
}

/// A single `(opcode, argument)` IR instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Opcode,
    pub arg: u32,
}

impl Instruction {
    pub fn new(op: Opcode, arg: u32) -> Instruction {
        Instruction { op, arg }
    }
}

/// The three secondary entry offsets for Right, Down, and Left. The
/// implicit entry for `Up` is always instruction index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryTable {
    pub right: u32,
    pub down: u32,
    pub left: u32,
}

impl EntryTable {
    /// The instruction index a run should start at for the given direction.
    pub fn offset(&self, direction: Direction) -> usize {
        match direction {
            Direction::Up => 0,
            Direction::Right => self.right as usize,
            Direction::Down => self.down as usize,
            Direction::Left => self.left as usize,
        }
    }
}

/// The complete lowered program: a flat instruction list, the secondary
/// entry table, and the two text-mode flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub entries: EntryTable,
    pub input_as_text: bool,
    pub output_as_text: bool,
}

impl Program {
    /// The set of instruction indices that are the target of some `If` or
    /// nonzero `Goto`, plus the three entry offsets — the basic-block
    /// boundaries the target emitters partition the IR along.
    pub fn jump_targets(&self) -> std::collections::BTreeSet<usize> {
        let mut targets = std::collections::BTreeSet::new();
        targets.insert(0);
        targets.insert(self.entries.right as usize);
        targets.insert(self.entries.down as usize);
        targets.insert(self.entries.left as usize);
        for inst in &self.instructions {
            if inst.op.is_jump() {
                targets.insert(inst.arg as usize);
            }
        }
        targets
    }
}
