pub(super) const MAX_LOG_CAPACITY: usize = 100;
pub(super) const MAX_COOLDOWN_SECONDS: u32 = 60 * 60;
pub(super) const MIN_RESPONSE_BYTES: usize = 1024;

pub(super) fn clamp_log_capacity(value: usize) -> usize {
    value.clamp(1, MAX_LOG_CAPACITY)
}

pub(super) fn clamp_cooldown_seconds(value: u32) -> u32 {
    value.min(MAX_COOLDOWN_SECONDS)
}

pub(super) fn clamp_response_bytes(value: usize) -> usize {
    value.max(MIN_RESPONSE_BYTES)
}

pub(super) fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

pub(super) fn default_model() -> String {
    "gemini-2.5-flash-lite".to_string()
}

pub(super) fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

pub(super) fn default_max_response_bytes() -> usize {
    256 * 1024
}

pub(super) fn default_action_delay_ms() -> u64 {
    1_000
}

pub(super) fn default_settle_delay_ms() -> u64 {
    1_500
}

pub(super) fn default_cooldown_seconds() -> u32 {
    5
}

pub(super) fn default_log_capacity() -> usize {
    crate::command_log::DEFAULT_LOG_CAPACITY
}
