mod traits;
mod gemini;
pub mod retry;
pub mod fetcher;

pub use traits::*;
pub use gemini::GeminiClient;
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
pub use fetcher::{FetchError, ResponseFetcher};
