//! Editor session holding the current puzzle.
//!
//! Each edit builds a complete new [`PuzzleState`] and swaps it in, so the
//! questions, answers and grid never go out of step, and a failed load
//! leaves the puzzle as it was.

use rand::Rng;

use crate::codec::{self, InvalidTokenError, SaveToken};
use crate::grid::{self, LayoutParams};
use crate::puzzle::{GridChoice, PieceIndex, PieceIndexError, PuzzleState, Side};
use crate::shuffle;

pub struct Session {
    state: PuzzleState,
    layout: LayoutParams,
}

impl Session {
    pub fn new(state: PuzzleState) -> Self {
        let layout = grid::compute(state.grid);
        Self { state, layout }
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    /// Layout of the current grid.
    pub fn layout(&self) -> &LayoutParams {
        &self.layout
    }

    pub fn into_state(self) -> PuzzleState {
        self.state
    }

    fn commit(&mut self, next: PuzzleState) {
        if next.grid != self.layout.grid {
            self.layout = grid::compute(next.grid);
        }
        self.state = next;
    }

    pub fn set_grid(&mut self, grid: GridChoice) {
        self.commit(self.state.with_grid(grid));
    }

    /// Replaces the text of one piece. Empty `lines` removes it.
    ///
    /// An index outside `1..=MAX_PIECE_INDEX` is refused and nothing changes.
    pub fn set_text(
        &mut self,
        side: Side,
        index: PieceIndex,
        lines: Vec<String>,
    ) -> Result<(), PieceIndexError> {
        let next = self.state.with_text(side, index, lines)?;
        self.commit(next);
        Ok(())
    }

    /// Removes all text, keeping the grid.
    pub fn clear(&mut self) {
        self.commit(self.state.cleared());
    }

    /// Renumbers the pieces at random using the thread-local RNG.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let next = shuffle::shuffle(rng, &self.state, &self.layout);
        self.commit(next);
    }

    pub fn save(&self) -> SaveToken {
        codec::encode(&self.state)
    }

    /// Replaces the puzzle with the one in `token`.
    ///
    /// On error the current puzzle is kept unchanged.
    pub fn load(&mut self, token: &str) -> Result<(), InvalidTokenError> {
        let next = codec::decode(token)?;
        self.commit(next);
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PuzzleState::default())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::puzzle::{ContentMap, MAX_PIECE_INDEX};

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_default_session_uses_starter_puzzle() {
        let session = Session::default();
        assert_eq!(session.state(), &PuzzleState::default());
        assert_eq!(session.layout().grid, GridChoice::LargeTriangle);
        assert_eq!(session.layout().piece_count(), 18);
    }

    #[test]
    fn test_set_grid_recomputes_layout() {
        let mut session = Session::default();
        session.set_grid(GridChoice::SmallHexagon);
        assert_eq!(session.state().grid, GridChoice::SmallHexagon);
        assert_eq!(session.layout(), &grid::compute(GridChoice::SmallHexagon));
    }

    #[test]
    fn test_failed_load_keeps_state() {
        let mut session = Session::default();
        session
            .set_text(Side::Question, 5, lines(&["kept"]))
            .expect("5 is a valid piece");
        let before = session.state().clone();

        let token = session.save();
        for bad in ["", "not-a-valid-token", &token[..token.len() / 2]] {
            assert!(session.load(bad).is_err(), "{bad:?} should not load");
            assert_eq!(session.state(), &before);
            assert_eq!(session.layout().grid, before.grid);
        }
    }

    #[test]
    fn test_save_then_load_restores_state() {
        let mut session = Session::default();
        session.set_grid(GridChoice::LargeHexagon);
        session
            .set_text(Side::Answer, 30, lines(&["last", "piece"]))
            .expect("30 is a valid piece");
        let token = session.save();
        let saved = session.state().clone();

        session.clear();
        session.set_grid(GridChoice::SmallTriangle);
        session.load(&token).expect("saved token loads");
        assert_eq!(session.state(), &saved);
        assert_eq!(session.layout().piece_count(), 30);
    }

    #[test]
    fn test_set_text_refuses_indices_a_save_could_not_hold() {
        let mut session = Session::default();
        let before = session.state().clone();
        assert_eq!(
            session.set_text(Side::Answer, 0, lines(&["zero"])),
            Err(PieceIndexError::Zero)
        );
        assert_eq!(
            session.set_text(Side::Question, MAX_PIECE_INDEX + 1, lines(&["far"])),
            Err(PieceIndexError::TooLarge(MAX_PIECE_INDEX + 1))
        );
        assert_eq!(session.state(), &before);

        session
            .set_text(Side::Answer, MAX_PIECE_INDEX, lines(&["far"]))
            .expect("the largest piece number is allowed");
        let saved = session.state().clone();
        session.shuffle_with(&mut ChaCha8Rng::seed_from_u64(5));
        session.load(&codec::encode(&saved)).expect("own save loads");
        assert_eq!(session.state(), &saved);
    }

    #[test]
    fn test_clear_keeps_grid() {
        let mut session = Session::default();
        session.set_grid(GridChoice::SmallTriangle);
        session.clear();
        assert_eq!(session.into_state(), PuzzleState::empty(GridChoice::SmallTriangle));
    }

    #[test]
    fn test_shuffle_keeps_pairs_together() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut session = Session::new(PuzzleState {
            grid: GridChoice::SmallTriangle,
            questions: ContentMap::from_iter([(1, vec!["a"]), (2, vec!["b"]), (3, vec!["c"])]),
            answers: ContentMap::from_iter([(1, vec!["x"]), (2, vec!["y"]), (3, vec!["z"])]),
        });
        for _ in 0..20 {
            session.shuffle_with(&mut rng);
            let state = session.state();
            assert_eq!(state.questions.len(), 3);
            for (index, question) in state.questions.iter() {
                let expected = match question[0].as_str() {
                    "a" => "x",
                    "b" => "y",
                    "c" => "z",
                    other => panic!("unexpected question {other}"),
                };
                assert_eq!(state.answers.get(index), Some(&[expected.to_string()][..]));
            }
        }
    }
}
