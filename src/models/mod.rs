pub mod activity;
pub mod coordinates;
pub mod itinerary;
pub mod knowledge;

pub use activity::{Activity, DayCluster};
pub use coordinates::Coordinates;
pub use itinerary::{BalanceRequest, BalanceOutcome, DayBounds, PlanDaysRequest};
pub use knowledge::{
    AnswerPayload, AskRequest, ChunkType, ChunkTypeCount, Confidence, KnowledgeChunk,
    KnowledgeStatus, SourceRef,
};
