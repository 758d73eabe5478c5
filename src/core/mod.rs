pub mod score;
pub mod score_data;

pub use score::Score;
pub use score_data::{
    ConnectionsScore, DigitPartyScore, GamePayload, GameType, MistakeSource, ScoreData, WordleScore,
};
