//! # Board walker / lowering
//!
//! Simulates the car from the board's start tile for each of the four
//! initial directions, producing the combined IR: a flat instruction list
//! plus the three secondary entry offsets.
//!
//! Grounded in `original_source/hbcht.py`'s `_board_to_commands` /
//! `_path_to_commands`: one `pos_ids` map and one `xys` undo stack are
//! shared across all four path walks and every recursive `If` branch, so a
//! join or a cancellation can reach back across path boundaries.


use std::collections::HashMap;

use crate::board::Board;
use crate::error::LoadError;
use crate::ir::{Action, Direction, EntryTable, Instruction, Opcode};
use crate::tile::Tile;

/// What a non-empty tile resolves to for the walker.
enum Step {
    Action(Action),
    Exit,
    /// A redirector whose forced direction is the reverse of the car's
    /// current direction. It has no effect; the walker keeps advancing
    /// through it as if it were empty.
    Transparent,
}

fn classify_tile(tile: Tile, direc: Direction) -> Step {
    match tile {
        Tile::Exit => Step::Exit,
        Tile::If => Step::Action(Action::If),
        Tile::Dec if direc != Direction::Left => Step::Action(Action::Dec),
        Tile::Inc if direc != Direction::Right => Step::Action(Action::Inc),
        Tile::PrevCell if direc != Direction::Up => Step::Action(Action::PrevCell),
        Tile::NextCell if direc != Direction::Down => Step::Action(Action::NextCell),
        Tile::Dec | Tile::Inc | Tile::PrevCell | Tile::NextCell => Step::Transparent,
        Tile::Empty | Tile::Car => {
            unreachable!("advance() never stops on an Empty or Car tile")
        }
    }
}

/// The lowered IR for a whole board: all four paths, concatenated, plus
/// the entry table for the three non-primary starting directions.
pub struct Lowered {
    pub instructions: Vec<Instruction>,
    pub entries: EntryTable,
}

/// Lower a board into its complete IR by walking all four initial
/// directions in the fixed order Up, Right, Down, Left.
pub fn lower(board: &Board) -> Result<Lowered, LoadError> {
    let mut walker = Walker::new(board);

    let car = board.car_pos();
    let mut entries = EntryTable::default();
    for (i, &direction) in Direction::ALL.iter().enumerate() {
        if i > 0 {
            let offset = walker.instructions.len() as u32;
            match direction {
                Direction::Right => entries.right = offset,
                Direction::Down => entries.down = offset,
                Direction::Left => entries.left = offset,
                Direction::Up => unreachable!("Up is always the first direction walked"),
            }
        }
        let before = walker.instructions.len();
        walker.walk_path(car, direction)?;
        log::debug!(
            "{direction:?} path emitted {} instructions",
            walker.instructions.len() - before
        );
    }

    log::debug!("lowered board into {} instructions total", walker.instructions.len());
    Ok(Lowered {
        instructions: walker.instructions,
        entries,
    })
}

/// What happened after classifying a memory action at a board coordinate.
enum MemoryOutcome {
    /// Fused, cancelled, or freshly emitted; the path keeps walking.
    Continue,
    /// The coordinate had already been visited: a `Goto` was emitted and
    /// the path is done.
    PathEnded,
}

struct Walker<'a> {
    board: &'a Board,
    instructions: Vec<Instruction>,
    /// Board coordinate -> index of the instruction it generated. Shared
    /// across every path and every recursive `If` branch (spec.md §9).
    pos_ids: HashMap<(usize, usize), usize>,
    /// Coordinates of the most recent emissions, parallel to
    /// `instructions`, used to find which `pos_ids` entry to drop on
    /// cancellation.
    xys: Vec<(usize, usize)>,
}

impl<'a> Walker<'a> {
    fn new(board: &'a Board) -> Walker<'a> {
        Walker {
            board,
            instructions: Vec::new(),
            pos_ids: HashMap::new(),
            xys: Vec::new(),
        }
    }

    /// Step one tile in `direc` from `(x, y)`. Vertical motion wraps modulo
    /// board height; horizontal motion wraps modulo the *current* row's
    /// length. Stepping past a (possibly short) row's end reads as `Empty`.
    fn step(&self, x: usize, y: usize, direc: Direction) -> (usize, usize, Tile) {
        let h = self.board.height();
        match direc {
            Direction::Up => {
                let ny = (y + h - 1) % h;
                (x, ny, self.board.tile_at(x, ny))
            }
            Direction::Down => {
                let ny = (y + 1) % h;
                (x, ny, self.board.tile_at(x, ny))
            }
            Direction::Right => {
                let w = self.board.row_len(y);
                let nx = (x + 1) % w;
                (nx, y, self.board.tile_at(nx, y))
            }
            Direction::Left => {
                let w = self.board.row_len(y);
                let nx = (x + w - 1) % w;
                (nx, y, self.board.tile_at(nx, y))
            }
        }
    }

    /// Advance from `(x, y)` in `direc` until a non-`Empty` tile is reached.
    fn advance(&self, mut x: usize, mut y: usize, direc: Direction) -> (usize, usize, Tile) {
        loop {
            let (nx, ny, tile) = self.step(x, y, direc);
            x = nx;
            y = ny;
            if !matches!(tile, Tile::Empty) {
                return (x, y, tile);
            }
        }
    }

    /// Join detection: if `pos` was already visited, either reject the
    /// program (a backward `Goto` within the current path with no
    /// intervening `If`) or emit the `Goto` and report the path as done.
    fn check_join(
        &mut self,
        pos: (usize, usize),
        begin_pos: usize,
    ) -> Result<Option<MemoryOutcome>, LoadError> {
        let Some(&target) = self.pos_ids.get(&pos) else {
            return Ok(None);
        };
        let is_uncrossed_cycle =
            target >= begin_pos && !self.instructions[target..].iter().any(|i| i.op == Opcode::If);
        if is_uncrossed_cycle {
            return Err(LoadError::InfiniteLoop);
        }
        self.instructions
            .push(Instruction::new(Opcode::Goto, target as u32));
        Ok(Some(MemoryOutcome::PathEnded))
    }

    /// Apply peephole fusion, cancellation, and join detection for a
    /// freshly classified memory action (`Dec`/`Inc`/`PrevCell`/`NextCell`)
    /// at board coordinate `pos`, within the path that began at
    /// `begin_pos`. This is the whole of spec.md §4.2 steps 3 and 4,
    /// factored out so it can be driven directly by tests without needing
    /// a real geometric board walk (a bare pair of complementary
    /// redirectors with nothing between them bounces back and forth
    /// forever once walked — a genuine property of the language, not a
    /// bug in this walker — so the fusion/cancellation rule itself is
    /// exercised here in isolation instead).
    fn emit_memory_action(
        &mut self,
        action: Action,
        pos: (usize, usize),
        begin_pos: usize,
    ) -> Result<MemoryOutcome, LoadError> {
        let last_op = self.instructions.last().map(|i| i.op);

        if last_op == Some(action.opcode()) {
            self.instructions.last_mut().unwrap().arg += 1;
            return Ok(MemoryOutcome::Continue);
        }

        if let Some(complement) = action.complement() {
            if last_op == Some(complement.opcode()) {
                let last = self.instructions.last_mut().unwrap();
                if last.arg > 1 {
                    last.arg -= 1;
                } else {
                    self.instructions.pop();
                    if let Some(undone) = self.xys.pop() {
                        self.pos_ids.remove(&undone);
                    }
                }
                return Ok(MemoryOutcome::Continue);
            }
        }

        if let Some(outcome) = self.check_join(pos, begin_pos)? {
            return Ok(outcome);
        }

        self.pos_ids.insert(pos, self.instructions.len());
        self.xys.push(pos);
        self.instructions.push(Instruction::new(action.opcode(), 1));
        Ok(MemoryOutcome::Continue)
    }

    fn walk_path(&mut self, start: (usize, usize), direction: Direction) -> Result<(), LoadError> {
        let begin_pos = self.instructions.len();
        let (mut x, mut y) = start;
        let mut direc = direction;

        loop {
            let (nx, ny, tile) = self.advance(x, y, direc);
            x = nx;
            y = ny;

            let action = match classify_tile(tile, direc) {
                Step::Transparent => continue,
                Step::Exit => {
                    self.instructions.push(Instruction::new(Opcode::Exit, 0));
                    return Ok(());
                }
                Step::Action(action) => action,
            };

            if action == Action::If {
                if let Some(MemoryOutcome::PathEnded) = self.check_join((x, y), begin_pos)? {
                    return Ok(());
                }

                let cid = self.instructions.len();
                self.instructions.push(Instruction::new(Opcode::If, 0));
                self.xys.push((x, y));
                self.pos_ids.insert((x, y), cid);

                let branch_direction = direc.turn_right();
                self.walk_path((x, y), branch_direction)?;

                self.instructions[cid] =
                    Instruction::new(Opcode::If, self.instructions.len() as u32);
                continue;
            }

            direc = action.forced_direction().unwrap();
            match self.emit_memory_action(action, (x, y), begin_pos)? {
                MemoryOutcome::Continue => continue,
                MemoryOutcome::PathEnded => return Ok(()),
            }
        }
    }
}
