// Content generation: prompt construction, tone calibration, orchestration.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod tone;
