//! One game between a human player and an [`Agent`].

use crate::{
    config::EngineConfig,
    error::{AgentError, AgentResult},
    history::RepetitionGuard,
    minimax::MinimaxAgent,
    ordering::is_castling,
    Agent,
};
use chess_core::{Color, CoreError, GamePosition, Move, Successor};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingPlayerMove,
    AwaitingAiMove,
    GameOver,
}

/// A move that was played, with flags derived from the position it was
/// played in and the one it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub encoding: String,
    pub is_capture: bool,
    pub is_castle: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_promotion: bool,
}

impl MoveReport {
    fn from_successor(successor: &Successor) -> Self {
        MoveReport {
            encoding: successor.mv.encoding(),
            is_capture: successor.is_capture(),
            is_castle: is_castling(&successor.mv),
            is_check: successor.position.is_check(),
            is_checkmate: successor.position.is_checkmate(),
            is_promotion: successor.mv.promotion.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AiMoveOutcome {
    Played(MoveReport),
    GameOver { result: String },
}

/// The player's move and the engine's reply, if the game went on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub player: MoveReport,
    pub reply: Option<MoveReport>,
    pub state: SessionState,
    pub result: String,
}

/// State of a single game: the position, who plays which side, and the
/// moves played so far.
///
/// Sessions share nothing, so independent games can run side by side; a
/// single session expects one caller at a time.
pub struct GameSession<A: Agent = MinimaxAgent> {
    position: GamePosition,
    guard: RepetitionGuard,
    agent: A,
    player_color: Color,
    state: SessionState,
}

impl GameSession<MinimaxAgent> {
    /// A new game from the starting position with the player on White.
    pub fn new(config: EngineConfig) -> Self {
        let guard = RepetitionGuard::new(&config);
        Self::with_agent(MinimaxAgent::new(config), guard)
    }
}

impl Default for GameSession<MinimaxAgent> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<A: Agent> GameSession<A> {
    pub fn with_agent(agent: A, guard: RepetitionGuard) -> Self {
        GameSession {
            position: GamePosition::new(),
            guard,
            agent,
            player_color: Color::White,
            state: SessionState::AwaitingPlayerMove,
        }
    }

    /// Starts a new game with the player on `color`. When the engine has
    /// White, its first move is played before this returns.
    pub fn set_player_color(&mut self, color: Color) -> Option<MoveReport> {
        self.player_color = color;
        self.reset_game();

        if color == Color::Black {
            match self.request_ai_move() {
                AiMoveOutcome::Played(report) => return Some(report),
                AiMoveOutcome::GameOver { .. } => {}
            }
        }
        None
    }

    /// Back to the starting position with an empty history. The player
    /// keeps their color; no engine move is triggered.
    pub fn reset_game(&mut self) {
        self.position = GamePosition::new();
        self.guard.clear();
        self.refresh_state();
    }

    /// Continues from an arbitrary position, e.g. one loaded from FEN.
    /// The move history starts empty.
    pub fn set_position(&mut self, position: GamePosition) {
        self.position = position;
        self.guard.clear();
        self.refresh_state();
    }

    pub fn position(&self) -> &GamePosition {
        &self.position
    }

    pub fn history(&self) -> &RepetitionGuard {
        &self.guard
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }

    pub fn player_color(&self) -> Color {
        self.player_color
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_key(&self) -> String {
        self.position.canonical_key()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    pub fn result(&self) -> &'static str {
        self.position.result()
    }

    /// Applies the move if it is legal for the side to move, whichever side
    /// that is. Returns `false`, leaving the session untouched, otherwise.
    pub fn apply_player_move(&mut self, encoding: &str) -> bool {
        self.try_apply_player_move(encoding).is_ok()
    }

    pub fn try_apply_player_move(&mut self, encoding: &str) -> AgentResult<MoveReport> {
        let outcome = self.check_player_move(encoding);
        if let Err(err) = &outcome {
            warn!(encoding, %err, "rejected player move");
        }
        let successor = outcome?;

        let report = self.commit(successor);
        info!(mv = %report.encoding, state = ?self.state, "player moved");
        Ok(report)
    }

    /// Lets the engine move for the side to move.
    pub fn request_ai_move(&mut self) -> AiMoveOutcome {
        if self.position.is_game_over() {
            return AiMoveOutcome::GameOver {
                result: self.result().to_string(),
            };
        }

        let chosen = self.agent.best_move(&self.position, &self.guard);
        let mut successors = self.position.successors();
        let index = chosen
            .and_then(|mv| successors.iter().position(|successor| successor.mv == mv))
            .unwrap_or_else(|| {
                warn!(
                    agent = self.agent.name(),
                    ?chosen,
                    "agent gave no legal move, playing the first one"
                );
                0
            });
        let successor = successors.swap_remove(index);

        let report = self.commit(successor);
        info!(
            agent = self.agent.name(),
            mv = %report.encoding,
            check = report.is_check,
            mate = report.is_checkmate,
            "engine moved"
        );
        AiMoveOutcome::Played(report)
    }

    /// The player's move followed by the engine's reply, unless the
    /// player's move ended the game. Unlike [`Self::apply_player_move`],
    /// this refuses to move for the engine's side.
    pub fn play_turn(&mut self, encoding: &str) -> AgentResult<TurnReport> {
        if !self.position.is_game_over() && self.position.side_to_move() != self.player_color {
            warn!(encoding, "turn submitted while the engine is to move");
            return Err(AgentError::NotPlayersTurn);
        }
        let player = self.try_apply_player_move(encoding)?;
        let reply = match self.request_ai_move() {
            AiMoveOutcome::Played(report) => Some(report),
            AiMoveOutcome::GameOver { .. } => None,
        };

        Ok(TurnReport {
            player,
            reply,
            state: self.state,
            result: self.result().to_string(),
        })
    }

    fn check_player_move(&self, encoding: &str) -> AgentResult<Successor> {
        if self.position.is_game_over() {
            return Err(AgentError::GameOver {
                result: self.result().to_string(),
            });
        }
        let mv: Move = encoding.parse()?;
        self.position
            .successors()
            .into_iter()
            .find(|successor| successor.mv == mv)
            .ok_or_else(|| {
                CoreError::IllegalMove {
                    encoding: encoding.to_string(),
                }
                .into()
            })
    }

    fn commit(&mut self, successor: Successor) -> MoveReport {
        let report = MoveReport::from_successor(&successor);
        self.position = successor.position;
        self.guard.record(report.encoding.clone());
        self.refresh_state();
        report
    }

    fn refresh_state(&mut self) {
        self.state = if self.position.is_game_over() {
            SessionState::GameOver
        } else if self.position.side_to_move() == self.player_color {
            SessionState::AwaitingPlayerMove
        } else {
            SessionState::AwaitingAiMove
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Square;

    /// Always plays the last legal move, or something illegal on request.
    struct ScriptedAgent {
        illegal: bool,
    }

    impl Agent for ScriptedAgent {
        fn best_move(&mut self, position: &GamePosition, _: &RepetitionGuard) -> Option<Move> {
            if self.illegal {
                return Some(Move::new(Square::A1, Square::A1));
            }
            position.legal_moves().pop()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn scripted(illegal: bool) -> GameSession<ScriptedAgent> {
        GameSession::with_agent(ScriptedAgent { illegal }, RepetitionGuard::default())
    }

    #[test]
    fn test_state_transitions() {
        let mut session = scripted(false);
        assert_eq!(session.state(), SessionState::AwaitingPlayerMove);

        assert!(session.apply_player_move("e2e4"));
        assert_eq!(session.state(), SessionState::AwaitingAiMove);
        assert_eq!(session.play_turn("d2d4"), Err(AgentError::NotPlayersTurn));

        assert!(matches!(session.request_ai_move(), AiMoveOutcome::Played(_)));
        assert_eq!(session.state(), SessionState::AwaitingPlayerMove);
        assert_eq!(session.history().history().len(), 2);
    }

    #[test]
    fn test_legal_move_accepted_on_engine_turn() {
        let mut session = scripted(false);
        assert!(session.apply_player_move("e2e4"));
        assert_eq!(session.state(), SessionState::AwaitingAiMove);

        // Any legal move for the side to move goes through.
        assert!(!session.apply_player_move("d2d4"));
        assert!(session.apply_player_move("e7e5"));
        assert_eq!(session.state(), SessionState::AwaitingPlayerMove);
        assert_eq!(session.history().history().len(), 2);
    }

    #[test]
    fn test_illegal_agent_move_falls_back_to_first_legal() {
        let mut session = scripted(true);
        let first = session.position().legal_moves()[0].encoding();
        session.set_player_color(Color::Black);
        assert_eq!(session.history().history().iter().next(), Some(first.as_str()));
        assert_eq!(session.state(), SessionState::AwaitingPlayerMove);
    }

    #[test]
    fn test_game_over_rejects_everything() {
        let mut session = scripted(false);
        for mv in ["f2f3", "e7e5", "g2g4"] {
            session.position = session.position.apply(&mv.parse().unwrap());
        }
        session.player_color = Color::Black;
        assert!(session.apply_player_move("d8h4"));
        assert_eq!(session.state(), SessionState::GameOver);
        assert_eq!(session.result(), "0-1");

        assert_eq!(
            session.request_ai_move(),
            AiMoveOutcome::GameOver {
                result: "0-1".into()
            }
        );
        assert!(matches!(
            session.try_apply_player_move("e2e4"),
            Err(AgentError::GameOver { .. })
        ));
    }

    #[test]
    fn test_report_flags() {
        let mut session = scripted(false);
        session.set_position(GamePosition::from_fen("r3k3/1P6/8/8/8/8/8/4K2R w K - 0 1").unwrap());

        let castle = session.try_apply_player_move("e1g1").unwrap();
        assert!(castle.is_castle && !castle.is_capture);

        // The castle flag is geometric: a rook sliding two files counts too.
        session.set_position(GamePosition::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 30").unwrap());
        assert!(session.try_apply_player_move("a1c1").unwrap().is_castle);
        session.set_position(GamePosition::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 30").unwrap());
        assert!(!session.try_apply_player_move("a1b1").unwrap().is_castle);

        session.set_position(GamePosition::from_fen("r3k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap());
        let promotion = session.try_apply_player_move("b7a8q").unwrap();
        assert!(promotion.is_promotion && promotion.is_capture && promotion.is_check);
        assert!(!promotion.is_checkmate);
    }
}
