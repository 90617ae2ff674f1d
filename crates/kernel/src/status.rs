use std::fmt;

use serde::{Deserialize, Serialize};

/// Game status as seen by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// No drawing surface yet; geometry is unknown.
    #[default]
    NotReady,
    Ready,
    Win,
    Loss,
}

/// Inputs to the status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusTransition {
    /// The drawing surface and viewport were established.
    SurfaceReady,
    /// External logic ended the round.
    GameOver { won: bool },
    /// External logic restarted the round.
    Resume,
}

/// Errors from the status machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("illegal status transition {transition:?} from {from}")]
    IllegalTransition {
        from: GameStatus,
        transition: StatusTransition,
    },
}

impl GameStatus {
    /// Apply a transition. Only these five edges exist:
    /// `NotReady -> Ready`, `Ready -> Win`, `Ready -> Loss`, `Win -> Ready`,
    /// `Loss -> Ready`, plus the `Ready -> Ready` resume.
    pub fn apply(self, transition: StatusTransition) -> Result<GameStatus, StatusError> {
        use GameStatus::*;
        use StatusTransition::*;
        match (self, transition) {
            (NotReady, SurfaceReady) => Ok(Ready),
            (Ready, GameOver { won: true }) => Ok(Win),
            (Ready, GameOver { won: false }) => Ok(Loss),
            (Ready | Win | Loss, Resume) => Ok(Ready),
            (from, transition) => Err(StatusError::IllegalTransition { from, transition }),
        }
    }

    /// True once the surface has been established.
    pub fn is_ready(self) -> bool {
        self != GameStatus::NotReady
    }

    /// Text shown over the scene when the round is over.
    pub fn banner(self) -> Option<&'static str> {
        match self {
            GameStatus::Win => Some("WIN"),
            GameStatus::Loss => Some("LOSS"),
            _ => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::NotReady => "NOT_READY",
            GameStatus::Ready => "READY",
            GameStatus::Win => "WIN",
            GameStatus::Loss => "LOSS",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GameStatus::*;
    use StatusTransition::*;

    const ALL_STATUSES: [GameStatus; 4] = [NotReady, Ready, Win, Loss];
    const ALL_TRANSITIONS: [StatusTransition; 4] = [
        SurfaceReady,
        GameOver { won: true },
        GameOver { won: false },
        Resume,
    ];

    #[test]
    fn starts_not_ready() {
        assert_eq!(GameStatus::default(), NotReady);
        assert!(!NotReady.is_ready());
    }

    #[test]
    fn legal_edges() {
        assert_eq!(NotReady.apply(SurfaceReady), Ok(Ready));
        assert_eq!(Ready.apply(GameOver { won: true }), Ok(Win));
        assert_eq!(Ready.apply(GameOver { won: false }), Ok(Loss));
        assert_eq!(Win.apply(Resume), Ok(Ready));
        assert_eq!(Loss.apply(Resume), Ok(Ready));
        assert_eq!(Ready.apply(Resume), Ok(Ready));
    }

    #[test]
    fn every_other_edge_is_rejected() {
        let legal = [
            (NotReady, SurfaceReady),
            (Ready, GameOver { won: true }),
            (Ready, GameOver { won: false }),
            (Ready, Resume),
            (Win, Resume),
            (Loss, Resume),
        ];
        for from in ALL_STATUSES {
            for transition in ALL_TRANSITIONS {
                let result = from.apply(transition);
                if legal.contains(&(from, transition)) {
                    assert!(result.is_ok(), "{from} {transition:?} should be legal");
                } else {
                    assert_eq!(
                        result,
                        Err(StatusError::IllegalTransition { from, transition })
                    );
                }
            }
        }
    }

    #[test]
    fn banners() {
        assert_eq!(Win.banner(), Some("WIN"));
        assert_eq!(Loss.banner(), Some("LOSS"));
        assert_eq!(Ready.banner(), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(NotReady.to_string(), "NOT_READY");
        assert_eq!(Win.to_string(), "WIN");
    }
}
