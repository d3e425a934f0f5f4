//! Entity registry for balls and blocks
//!
//! Entities live in registration order (which is also id order). Removal
//! only flips `alive`; storage is compacted by [`Registry::commit_removals`]
//! at the end of a tick, so ids and indices held during a tick stay valid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Circle, Rect};

/// Stable ball identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Stable block identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub u32);

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    /// Velocity in pixels per second
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

impl Ball {
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Standard,
    /// Takes several hits
    Armored,
    /// Releases an extra ball when destroyed
    Splitter,
}

/// A block entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub rect: Rect,
    pub hit_points: u8,
    pub alive: bool,
}

impl Block {
    /// Apply one hit; returns true once the block has no hit points left
    pub fn take_hit(&mut self) -> bool {
        self.hit_points = self.hit_points.saturating_sub(1);
        self.hit_points == 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    balls: Vec<Ball>,
    blocks: Vec<Block>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    pub fn spawn_ball(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> BallId {
        let id = BallId(self.next_entity_id());
        self.balls.push(Ball {
            id,
            pos,
            vel,
            radius,
            alive: true,
        });
        id
    }

    pub fn spawn_block(&mut self, rect: Rect, hit_points: u8) -> BlockId {
        self.spawn_block_of_kind(rect, hit_points, BlockKind::Standard)
    }

    pub fn spawn_block_of_kind(&mut self, rect: Rect, hit_points: u8, kind: BlockKind) -> BlockId {
        let id = BlockId(self.next_entity_id());
        let hit_points = hit_points.max(1);
        self.blocks.push(Block {
            id,
            kind,
            rect,
            hit_points,
            alive: true,
        });
        id
    }

    /// Mark a ball dead; storage is reclaimed at end of tick
    pub fn remove_ball(&mut self, id: BallId) {
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
            ball.alive = false;
        }
    }

    /// Mark a block dead; storage is reclaimed at end of tick
    pub fn remove_block(&mut self, id: BlockId) {
        if let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) {
            block.alive = false;
        }
    }

    /// Drop every dead entity from storage
    ///
    /// Returns the number of entities reclaimed.
    pub fn commit_removals(&mut self) -> usize {
        let before = self.balls.len() + self.blocks.len();
        self.balls.retain(|b| b.alive);
        self.blocks.retain(|b| b.alive);
        before - (self.balls.len() + self.blocks.len())
    }

    pub fn iter_alive_balls(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter().filter(|b| b.alive)
    }

    pub fn iter_alive_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.alive)
    }

    pub fn iter_alive_balls_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut().filter(|b| b.alive)
    }

    pub fn iter_alive_blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.blocks.iter_mut().filter(|b| b.alive)
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Raw ball storage (includes dead balls until the end of the tick)
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub(crate) fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    /// Raw block storage (includes dead blocks until the end of the tick)
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn alive_ball_count(&self) -> usize {
        self.iter_alive_balls().count()
    }

    pub fn alive_block_count(&self) -> usize {
        self.iter_alive_blocks().count()
    }
}
