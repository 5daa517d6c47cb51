//! Test helpers shared across Blogsmith crates.

pub mod history;
pub mod llm;
pub mod records;

pub use history::{FailingHistory, FlakyLoadHistory, GatedHistory, UndeletableHistory};
pub use llm::{EmptyResponseLLM, FailingLLM, FixedChatResponse, FixedLLM, RecordingChatLLM};
pub use records::{content, record, user};
