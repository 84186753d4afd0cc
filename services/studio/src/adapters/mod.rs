pub mod file_kv;
pub mod gemini_llm;

pub use file_kv::FileKvStore;
pub use gemini_llm::GeminiEvaluationAdapter;
