/// Cyber Law Bot — centralized constants.
/// Persona strings, fallback messages, storage keys and retry defaults
/// live here so the fetcher, the stores and the CLI agree on them.

// ─── Persona ──────────────────────────────────────────────────────────────────

pub mod persona {
    pub const CHATBOT_NAME: &str = "Cyber Law Bot";

    pub const SYSTEM_INSTRUCTION: &str = "You are an expert on Indian Cyber Law. Provide clear, concise, and accurate information based on the latest legal frameworks in India. Do not provide legal advice, but rather educational and informative responses. Structure your answers with headings and bullet points for clarity where appropriate.";

    pub const GREETING: &str = "Hello! I'm your guide to Indian Cyber Law. How can I help you today? You can ask me about topics like data privacy or online fraud.";
}

// ─── User-facing fallback text ────────────────────────────────────────────────

pub mod messages {
    /// Returned in place of an answer when the API rejects the prompt on content grounds.
    pub const CONTENT_POLICY_REFUSAL: &str =
        "I cannot answer this question as it may violate content safety policies.";

    /// Returned in place of an answer when the API rejects the credential.
    pub const CREDENTIAL_SUPPORT: &str =
        "There seems to be an issue with the API configuration. Please contact support.";

    pub const MISSING_CREDENTIAL: &str = "API_KEY is not set. Please configure your environment.";

    pub const RETRIES_EXHAUSTED: &str = "Failed to get a response from the chatbot after multiple retries. Please check your connection.";

    /// Prefix for the assistant message appended when a turn fails.
    pub const TURN_FAILED_PREFIX: &str = "Sorry, something went wrong.";
}

// ─── Models & endpoints ───────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
}

pub mod endpoints {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
}

// ─── Defaults ─────────────────────────────────────────────────────────────────

pub mod defaults {
    pub const API_KEY_ENV: &str = "API_KEY";
    pub const MAX_RETRIES: u32 = 2;
    pub const BASE_DELAY_MS: u64 = 1000;
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
}

// ─── Storage ──────────────────────────────────────────────────────────────────

pub mod storage {
    pub const THEME_KEY: &str = "theme";
    pub const BOOKMARKS_KEY: &str = "bookmarks";
    pub const APP_DIR: &str = "cyberlaw";
    pub const STORAGE_FILE: &str = "storage.json";
    pub const CONFIG_FILE: &str = "config.toml";
}
