// =============================================================================
// SkillSwap Backend Constants
// =============================================================================
// This file contains all constants used throughout the backend to enable
// easy tuning and configuration from a single location.

// =============================================================================
// SWAP LISTINGS & OFFERS
// =============================================================================

/// Lower bound for estimated / proposed hours
pub const MIN_SWAP_HOURS: i32 = 1;

/// Upper bound for estimated / proposed hours
pub const MAX_SWAP_HOURS: i32 = 100;

// =============================================================================
// PROFILES & SKILLS
// =============================================================================

/// Minimum display name length, counted after trimming
pub const PROFILE_NAME_MIN_CHARS: usize = 2;

/// Display name used when a user has not created a profile yet
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous";

/// Display name used when a referenced skill cannot be resolved
pub const UNKNOWN_SKILL_NAME: &str = "Unknown";

// =============================================================================
// FAIRNESS CALCULATOR
// =============================================================================

/// Market base hourly rates (USD) used by the fairness calculator
pub const SKILL_BASE_RATES: &[(&str, f64)] = &[
    ("Graphic Design", 45.0),
    ("Logo Design", 50.0),
    ("Web Development", 75.0),
    ("Content Writing", 35.0),
    ("SEO Services", 60.0),
    ("Social Media Management", 40.0),
    ("Video Editing", 55.0),
    ("Photography", 65.0),
    ("Copywriting", 50.0),
    ("UI/UX Design", 70.0),
    ("Marketing Strategy", 80.0),
    ("Email Marketing", 45.0),
];

/// Base rate applied to skills missing from the table
pub const DEFAULT_BASE_RATE: f64 = 50.0;

/// Fairness percentage at or above which a swap is considered balanced
pub const BALANCED_THRESHOLD_PERCENT: f64 = 70.0;

/// Value difference above which the calculator suggests adjusting the swap
pub const ADJUSTMENT_HINT_DIFFERENCE: f64 = 100.0;

// =============================================================================
// GENERATIVE MODEL
// =============================================================================

/// Only secret the relay is allowed to hand out
pub const RELAY_SECRET_NAME: &str = "GEMINI_API_KEY";

/// Default model used for strategy and hashtag generation
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default Gemini REST base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Timeout for a single generation request
pub const GENERATION_TIMEOUT_SECS: u64 = 60;

/// Sampling settings for hashtag generation
pub const HASHTAG_TEMPERATURE: f32 = 0.8;
pub const HASHTAG_TOP_K: u32 = 40;
pub const HASHTAG_TOP_P: f32 = 0.95;
pub const HASHTAG_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Prefix for exported strategy documents
pub const STRATEGY_EXPORT_PREFIX: &str = "social-media-strategy";

/// Headings shorter than this may be detected by being all caps
pub const CAPS_HEADING_MAX_CHARS: usize = 100;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Default relay / generator requests per minute per client IP
pub const DEFAULT_RELAY_RATE_LIMIT_PER_MINUTE: u32 = 20;

/// Rate limit window duration in seconds
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

// =============================================================================
// AUTH
// =============================================================================

/// Audience claim issued by the hosted auth provider
pub const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

// =============================================================================
// SERVER CONFIGURATION
// =============================================================================

/// Default server port if not specified in environment
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default database pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Looks up the base hourly rate for a skill name
pub fn base_rate_for(skill: &str) -> f64 {
    SKILL_BASE_RATES
        .iter()
        .find(|(name, _)| *name == skill)
        .map(|(_, rate)| *rate)
        .unwrap_or(DEFAULT_BASE_RATE)
}

/// Validates if hours fall inside the accepted swap range
pub fn is_valid_swap_hours(hours: i32) -> bool {
    (MIN_SWAP_HOURS..=MAX_SWAP_HOURS).contains(&hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_rate_lookup() {
        assert_eq!(base_rate_for("Web Development"), 75.0);
        assert_eq!(base_rate_for("Basket Weaving"), DEFAULT_BASE_RATE);
    }

    #[test]
    fn test_swap_hours_bounds() {
        assert!(is_valid_swap_hours(1));
        assert!(is_valid_swap_hours(100));
        assert!(!is_valid_swap_hours(0));
        assert!(!is_valid_swap_hours(101));
    }
}
