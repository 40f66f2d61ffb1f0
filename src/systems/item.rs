use bevy_ecs::{resource::Resource, system::ResMut};
use glam::IVec2;
use strum_macros::{AsRefStr, EnumIter};
use tracing::debug;

use crate::constants::timing::FRUIT_BLINK_TICKS;

/// The bonus fruit on offer, one kind per level until the list runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum FruitKind {
    Cherry,
    Strawberry,
    Apple,
    Star,
}

impl FruitKind {
    pub fn points(self) -> u32 {
        match self {
            FruitKind::Cherry => 100,
            FruitKind::Strawberry => 300,
            FruitKind::Apple => 500,
            FruitKind::Star => 1000,
        }
    }

    /// Level 1 offers a cherry; every later level the next kind, capped at the last one.
    pub fn for_level(level: u32) -> FruitKind {
        match level.saturating_sub(1) {
            0 => FruitKind::Cherry,
            1 => FruitKind::Strawberry,
            2 => FruitKind::Apple,
            _ => FruitKind::Star,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveFruit {
    pub kind: FruitKind,
    pub tile: IVec2,
    pub points: u32,
    pub remaining_ticks: u32,
}

impl ActiveFruit {
    /// Whether the fruit is about to disappear. Purely cosmetic.
    pub fn is_blinking(&self) -> bool {
        self.remaining_ticks < FRUIT_BLINK_TICKS
    }
}

/// Holds at most one bonus fruit.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FruitState {
    pub active: Option<ActiveFruit>,
}

impl FruitState {
    /// Places a fruit unless one is already on the board. Returns whether it spawned.
    pub fn spawn(&mut self, kind: FruitKind, tile: IVec2, lifetime_ticks: u32) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(ActiveFruit {
            kind,
            tile,
            points: kind.points(),
            remaining_ticks: lifetime_ticks,
        });
        true
    }

    /// Takes the fruit if it sits on `tile`, returning its points.
    pub fn collect(&mut self, tile: IVec2) -> Option<u32> {
        match self.active {
            Some(fruit) if fruit.tile == tile => {
                self.active = None;
                Some(fruit.points)
            }
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Ages the active fruit, removing it when its time runs out.
pub fn fruit_system(mut fruit: ResMut<FruitState>) {
    let Some(active) = fruit.active.as_mut() else {
        return;
    };

    active.remaining_ticks = active.remaining_ticks.saturating_sub(1);
    if active.remaining_ticks == 0 {
        debug!(kind = active.kind.as_ref(), "Fruit expired");
        fruit.active = None;
    }
}
