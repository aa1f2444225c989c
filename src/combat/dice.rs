//! Dice primitives: the random source seam, the face convention and batch draws.

use serde::Serialize;

/// Sides of every die thrown by the combat sequence.
pub const D6: u32 = 6;

/// A source of independent die rolls.
///
/// `roll_die(sides)` must return a value in `[1, sides]`. Implementations own
/// their state; callers that run trials in parallel give each trial its own
/// source rather than sharing one.
pub trait DiceSource {
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Face range used for the touch and hurt draws.
///
/// `Legacy` adds one to every batch-drawn face, reproducing the `[2, sides + 1]`
/// range of historic results. Save rolls are never shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceConvention {
    #[default]
    Standard,
    Legacy,
}

impl FaceConvention {
    pub const fn from_legacy_flag(legacy: bool) -> Self {
        if legacy {
            Self::Legacy
        } else {
            Self::Standard
        }
    }

    #[inline]
    pub const fn shift(self) -> u32 {
        match self {
            Self::Standard => 0,
            Self::Legacy => 1,
        }
    }
}

/// Lazily draw `count` independent dice. A zero count draws nothing.
///
/// Faces are produced one at a time, so callers that only count them never
/// hold more than one face in memory whatever `count` is.
pub fn roll_dice<'a, D: DiceSource + ?Sized + 'a>(
    dice: &'a mut D,
    count: u32,
    sides: u32,
    faces: FaceConvention,
) -> impl Iterator<Item = u32> + 'a {
    let shift = faces.shift();
    (0..count).map(move |_| dice.roll_die(sides) + shift)
}

/// Replays a fixed list of faces, cycling when exhausted. Lets tests pin every roll.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    cursor: usize,
    draws: usize,
}

impl ScriptedDice {
    pub fn new(faces: impl Into<Vec<u32>>) -> Self {
        Self {
            faces: faces.into(),
            cursor: 0,
            draws: 0,
        }
    }

    /// Always rolls `face`.
    pub fn constant(face: u32) -> Self {
        Self::new(vec![face])
    }

    /// Number of rolls served so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, _sides: u32) -> u32 {
        self.draws += 1;
        let Some(&face) = self.faces.get(self.cursor) else {
            return 1;
        };
        self.cursor = (self.cursor + 1) % self.faces.len();
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_draws_nothing() {
        let mut dice = ScriptedDice::constant(4);
        assert_eq!(roll_dice(&mut dice, 0, D6, FaceConvention::Standard).count(), 0);
        assert_eq!(dice.draws(), 0);
    }

    #[test]
    fn legacy_faces_shift_by_one() {
        let mut dice = ScriptedDice::new([1, 6, 3]);
        let rolled: Vec<u32> = roll_dice(&mut dice, 3, D6, FaceConvention::Legacy).collect();
        assert_eq!(rolled, vec![2, 7, 4]);
    }

    #[test]
    fn standard_faces_are_unchanged() {
        let mut dice = ScriptedDice::new([1, 6, 3]);
        let rolled: Vec<u32> = roll_dice(&mut dice, 4, D6, FaceConvention::Standard).collect();
        assert_eq!(rolled, vec![1, 6, 3, 1]);
    }

    #[test]
    fn draws_happen_only_as_faces_are_consumed() {
        let mut dice = ScriptedDice::constant(2);
        let mut faces = roll_dice(&mut dice, 1_000, D6, FaceConvention::Standard);
        assert_eq!(faces.next(), Some(2));
        assert_eq!(faces.next(), Some(2));
        drop(faces);
        assert_eq!(dice.draws(), 2);
    }

    #[test]
    fn scripted_dice_without_faces_rolls_one() {
        let mut dice = ScriptedDice::new(Vec::<u32>::new());
        assert_eq!(dice.roll_die(D6), 1);
        assert_eq!(dice.draws(), 1);
    }
}
