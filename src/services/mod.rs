pub mod context_budget;
pub mod day_balancer;
pub mod day_planner;
pub mod llm;
pub mod rag;
pub mod tokens;
