//! Highlighted-player cursor.

use crate::{PanelError, Result};

/// Local mirror of the player highlighted on the panel.
///
/// The firmware is the source of truth; this mirror stays consistent only
/// because it applies the same wrap arithmetic for every command sent. With
/// zero players the cursor is undefined (`None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerCursor {
    player_count: usize,
    index: Option<usize>,
}

impl PlayerCursor {
    /// Creates a cursor at player 0, or an undefined cursor for an empty roster.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            index: (player_count > 0).then_some(0),
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Highlighted player, `None` while undefined.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Moves to the next player, wrapping to 0.
    pub fn advance(&mut self) {
        if self.player_count == 0 {
            return;
        }
        self.index = Some(match self.index {
            Some(i) => (i + 1) % self.player_count,
            None => 0,
        });
    }

    /// Moves to the previous player, wrapping to the last one.
    pub fn retreat(&mut self) {
        if self.player_count == 0 {
            return;
        }
        self.index = Some(match self.index {
            Some(i) => (i + self.player_count - 1) % self.player_count,
            None => self.player_count - 1,
        });
    }

    /// Checks that `index` names a player on the roster.
    pub fn validate(&self, index: usize) -> Result<()> {
        if index < self.player_count {
            Ok(())
        } else {
            Err(PanelError::InvalidPlayerIndex {
                index,
                player_count: self.player_count,
            })
        }
    }

    /// Jumps to an explicit player.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::InvalidPlayerIndex` and leaves the cursor alone
    /// if `index` is outside `[0, player_count)`.
    pub fn set(&mut self, index: usize) -> Result<()> {
        self.validate(index)?;
        self.index = Some(index);
        Ok(())
    }

    /// Moves back to player 0.
    pub fn reset(&mut self) {
        *self = Self::new(self.player_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_cursor() {
        let cursor = PlayerCursor::new(5);
        assert_eq!(cursor.index(), Some(0));
        assert_eq!(cursor.player_count(), 5);
    }

    #[test]
    fn test_empty_roster_is_undefined() {
        let mut cursor = PlayerCursor::new(0);
        assert_eq!(cursor.index(), None);
        cursor.advance();
        cursor.retreat();
        assert_eq!(cursor.index(), None);
        assert!(cursor.set(0).is_err());
    }

    #[test]
    fn test_wraps_both_directions() {
        let mut cursor = PlayerCursor::new(3);
        cursor.retreat();
        assert_eq!(cursor.index(), Some(2));
        cursor.advance();
        assert_eq!(cursor.index(), Some(0));
    }

    #[test]
    fn test_set_out_of_range() {
        let mut cursor = PlayerCursor::new(4);
        cursor.set(2).unwrap();
        let result = cursor.set(4);
        assert!(matches!(
            result,
            Err(PanelError::InvalidPlayerIndex { index: 4, player_count: 4 })
        ));
        assert_eq!(cursor.index(), Some(2));
    }

    proptest! {
        #[test]
        fn prop_full_cycle_returns_to_start(count in 1usize..32, start in 0usize..32) {
            let mut cursor = PlayerCursor::new(count);
            cursor.set(start % count).unwrap();
            let before = cursor.index();
            for _ in 0..count {
                cursor.advance();
            }
            prop_assert_eq!(cursor.index(), before);
        }

        #[test]
        fn prop_retreat_inverts_advance(count in 1usize..32, start in 0usize..32, steps in 0usize..64) {
            let mut cursor = PlayerCursor::new(count);
            cursor.set(start % count).unwrap();
            let before = cursor.index();
            for _ in 0..steps {
                cursor.advance();
            }
            for _ in 0..steps {
                cursor.retreat();
            }
            prop_assert_eq!(cursor.index(), before);
        }
    }
}
