//! The fixed touch → hurt → armor save → invulnerability save pipeline.
//!
//! Every stage takes the count that survived the previous stage and returns
//! the count that survives it.

use crate::combat::dice::{roll_dice, DiceSource, FaceConvention, D6};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Keeps dice rolling at or above `difficulty`.
    Touch { difficulty: u8 },
    /// Keeps dice rolling at or above `difficulty`.
    Hurt { difficulty: u8 },
    /// A wound passes when its roll is below `threshold`. Zero disables the stage.
    ArmorSave { threshold: u8 },
    /// Same mechanic as the armor save, applied to its survivors.
    InvulnerableSave { threshold: u8 },
}

impl Stage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Touch { .. } => "touch",
            Self::Hurt { .. } => "hurt",
            Self::ArmorSave { .. } => "armor_save",
            Self::InvulnerableSave { .. } => "invulnerable_save",
        }
    }

    pub fn apply<D: DiceSource + ?Sized>(
        self,
        count: u32,
        dice: &mut D,
        faces: FaceConvention,
    ) -> u32 {
        match self {
            Self::Touch { difficulty } | Self::Hurt { difficulty } => {
                count_successes(dice, count, difficulty, faces)
            }
            Self::ArmorSave { threshold } | Self::InvulnerableSave { threshold } => {
                apply_save(dice, count, threshold)
            }
        }
    }
}

/// Roll `count` d6 and count the faces at or above `difficulty`.
pub fn count_successes<D: DiceSource + ?Sized>(
    dice: &mut D,
    count: u32,
    difficulty: u8,
    faces: FaceConvention,
) -> u32 {
    roll_dice(dice, count, D6, faces)
        .filter(|&face| face >= u32::from(difficulty))
        .count() as u32
}

/// Roll one d6 per wound; a wound survives when the roll is strictly below `threshold`.
pub fn apply_save<D: DiceSource + ?Sized>(dice: &mut D, wounds: u32, threshold: u8) -> u32 {
    if threshold == 0 {
        return wounds;
    }
    (0..wounds)
        .filter(|_| dice.roll_die(D6) < u32::from(threshold))
        .count() as u32
}
