//! Social media strategy generator and hashtag relay logic.
//!
//! Prompt templating, the three-step business profile form and the heuristic
//! that turns the model's free text into renderable blocks.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::gemini::{GenerationConfig, TextGenerator};
use crate::{
    constants::*,
    error::{AppError, AppResult},
};

static MARKDOWN_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s").expect("valid regex"));
static BOLD_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\*\*.*\*\*$").expect("valid regex"));
static HEADING_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#+\s|\*\*").expect("valid regex"));
static LIST_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\-*•]").expect("valid regex"));
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:\d+[.)]?|[-*•])\s*").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Everything the strategy form collects about a business
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    pub business_name: String,
    pub industry: String,
    pub business_description: String,
    pub unique_selling_point: String,
    pub brand_values: String,
    pub current_challenges: String,
    pub brand_tone: String,
    pub goals: Vec<String>,
    pub audience: String,
    pub brand_personality: String,
    pub platforms: Vec<String>,
    pub competitors: String,
    pub budget: String,
}

/// Steps of the strategy form, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    BusinessDetails,
    AudienceAndGoals,
    PlatformsAndBudget,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [
        FormStep::BusinessDetails,
        FormStep::AudienceAndGoals,
        FormStep::PlatformsAndBudget,
    ];

    pub fn number(self) -> u8 {
        match self {
            FormStep::BusinessDetails => 1,
            FormStep::AudienceAndGoals => 2,
            FormStep::PlatformsAndBudget => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormStep::BusinessDetails => "Business Details",
            FormStep::AudienceAndGoals => "Audience & Goals",
            FormStep::PlatformsAndBudget => "Platforms & Budget",
        }
    }

    pub fn next(self) -> Option<FormStep> {
        match self {
            FormStep::BusinessDetails => Some(FormStep::AudienceAndGoals),
            FormStep::AudienceAndGoals => Some(FormStep::PlatformsAndBudget),
            FormStep::PlatformsAndBudget => None,
        }
    }

    pub fn prev(self) -> Option<FormStep> {
        match self {
            FormStep::BusinessDetails => None,
            FormStep::AudienceAndGoals => Some(FormStep::BusinessDetails),
            FormStep::PlatformsAndBudget => Some(FormStep::AudienceAndGoals),
        }
    }

    /// Checks the fields this step requires before the form may advance.
    pub fn validate(self, profile: &BusinessProfile) -> AppResult<()> {
        let required: Vec<(&str, &str, &str)> = match self {
            FormStep::BusinessDetails => vec![
                ("businessName", profile.business_name.as_str(), "Business name is required"),
                ("industry", profile.industry.as_str(), "Industry is required"),
                (
                    "businessDescription",
                    profile.business_description.as_str(),
                    "Business description is required",
                ),
                (
                    "uniqueSellingPoint",
                    profile.unique_selling_point.as_str(),
                    "Unique selling point is required",
                ),
            ],
            FormStep::AudienceAndGoals => vec![
                ("audience", profile.audience.as_str(), "Target audience is required"),
                ("brandPersonality", profile.brand_personality.as_str(), "Brand personality is required"),
            ],
            FormStep::PlatformsAndBudget => {
                if profile.platforms.iter().all(|p| p.trim().is_empty()) {
                    return Err(AppError::invalid("platforms", "Select at least one platform"));
                }
                Vec::new()
            }
        };

        match required.into_iter().find(|(_, value, _)| value.trim().is_empty()) {
            Some((field, _, message)) => Err(AppError::invalid(field, message)),
            None => Ok(()),
        }
    }
}

impl BusinessProfile {
    /// First step that still fails validation, if any
    pub fn first_incomplete_step(&self) -> Option<FormStep> {
        FormStep::ALL.into_iter().find(|step| step.validate(self).is_err())
    }

    pub fn validate(&self) -> AppResult<()> {
        FormStep::ALL.into_iter().try_for_each(|step| step.validate(self))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepStatus {
    pub step: FormStep,
    pub number: u8,
    pub title: &'static str,
    pub complete: bool,
}

/// Where a partially filled form stands, so a client can resume it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormProgress {
    pub steps: Vec<StepStatus>,
    /// First step still missing required fields
    pub current_step: Option<FormStep>,
    pub previous_step: Option<FormStep>,
    pub next_step: Option<FormStep>,
    pub ready: bool,
}

pub fn form_progress(profile: &BusinessProfile) -> FormProgress {
    let steps = FormStep::ALL
        .into_iter()
        .map(|step| StepStatus {
            step,
            number: step.number(),
            title: step.title(),
            complete: step.validate(profile).is_ok(),
        })
        .collect();
    let current_step = profile.first_incomplete_step();

    FormProgress {
        steps,
        current_step,
        previous_step: current_step.and_then(FormStep::prev),
        next_step: current_step.and_then(FormStep::next),
        ready: current_step.is_none(),
    }
}

pub fn build_strategy_prompt(profile: &BusinessProfile) -> String {
    format!(
        "Generate a comprehensive social media strategy for a {industry} business named {name}.

BUSINESS CONTEXT:
Business Description: {description}
Unique Selling Point: {usp}
Brand Values & Mission: {values}
Brand Personality: {personality}
Brand Tone: {tone}
Current Challenges: {challenges}

STRATEGY DETAILS:
Marketing goals: {goals}
Target audience: {audience}
Preferred platforms: {platforms}
Competitors: {competitors}
Budget range: {budget}

Please provide a detailed strategy including:
1. Content strategy recommendations
2. Posting frequency and timing
3. Engagement tactics
4. Platform-specific best practices
5. Measurable goals and KPIs
6. Content calendar suggestions
7. Brand positioning recommendations",
        industry = profile.industry,
        name = profile.business_name,
        description = profile.business_description,
        usp = profile.unique_selling_point,
        values = profile.brand_values,
        personality = profile.brand_personality,
        tone = profile.brand_tone,
        challenges = profile.current_challenges,
        goals = profile.goals.join(", "),
        audience = profile.audience,
        platforms = profile.platforms.join(", "),
        competitors = profile.competitors,
        budget = profile.budget,
    )
}

/// A renderable piece of generated strategy text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StrategyBlock {
    Heading { text: String },
    List { items: Vec<String> },
    Paragraph { text: String },
}

fn is_heading(block: &str) -> bool {
    MARKDOWN_HEADING.is_match(block)
        || BOLD_LINE.is_match(block)
        || (block.chars().count() < CAPS_HEADING_MAX_CHARS
            && block.contains(' ')
            && block == block.to_uppercase())
}

/// Splits model output on blank lines and classifies each block.
pub fn parse_strategy(text: &str) -> Vec<StrategyBlock> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            if is_heading(block) {
                StrategyBlock::Heading {
                    text: HEADING_MARKUP.replace_all(block, "").trim().to_string(),
                }
            } else if LIST_START.is_match(block) {
                StrategyBlock::List {
                    items: block
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
                        .collect(),
                }
            } else {
                StrategyBlock::Paragraph {
                    text: block.to_string(),
                }
            }
        })
        .collect()
}

/// File name (without extension) offered when exporting a strategy
pub fn export_file_stem(business_name: &str) -> String {
    let name = business_name.trim();
    let dashed = if name.is_empty() {
        "strategy".to_string()
    } else {
        WHITESPACE_RUN.replace_all(name, "-").into_owned()
    };
    format!("{}-{}", STRATEGY_EXPORT_PREFIX, dashed)
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedStrategy {
    pub business_name: String,
    pub strategy: String,
    pub blocks: Vec<StrategyBlock>,
    pub export_file_stem: String,
}

pub async fn generate_strategy(
    generator: &dyn TextGenerator,
    profile: BusinessProfile,
) -> AppResult<GeneratedStrategy> {
    profile.validate()?;

    let prompt = build_strategy_prompt(&profile);
    let strategy = generator.generate(&prompt, None).await?;

    info!("Generated strategy for {} ({} chars)", profile.business_name, strategy.len());

    Ok(GeneratedStrategy {
        blocks: parse_strategy(&strategy),
        export_file_stem: export_file_stem(&profile.business_name),
        business_name: profile.business_name,
        strategy,
    })
}

// Hashtags

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HashtagRequest {
    pub business_name: String,
    pub industry: String,
    pub platforms: Vec<String>,
    pub goals: Vec<String>,
    pub target_audience: String,
}

pub fn hashtag_generation_config() -> GenerationConfig {
    GenerationConfig {
        temperature: HASHTAG_TEMPERATURE,
        top_k: HASHTAG_TOP_K,
        top_p: HASHTAG_TOP_P,
        max_output_tokens: HASHTAG_MAX_OUTPUT_TOKENS,
    }
}

fn joined_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

pub fn build_hashtag_prompt(req: &HashtagRequest) -> String {
    format!(
        "Generate 15-20 relevant and trending hashtags for a {industry} business called \"{name}\".

Business Context:
- Industry: {industry}
- Target Audience: {audience}
- Platforms: {platforms}
- Goals: {goals}

Requirements:
- Mix of popular, niche, and branded hashtags
- Include industry-specific hashtags
- Add location-based hashtags if relevant
- Include trending and evergreen hashtags
- Format as a simple comma-separated list
- No explanations, just the hashtags with # symbol

Example format: #hashtag1, #hashtag2, #hashtag3",
        industry = req.industry,
        name = req.business_name,
        audience = req.target_audience,
        platforms = joined_or(&req.platforms, "Social Media"),
        goals = joined_or(&req.goals, "Brand awareness"),
    )
}

/// Comma-split, trimmed, non-empty, each prefixed with `#`
pub fn normalize_hashtags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| {
            if tag.starts_with('#') {
                tag.to_string()
            } else {
                format!("#{}", tag)
            }
        })
        .collect()
}

pub async fn generate_hashtags(generator: &dyn TextGenerator, req: &HashtagRequest) -> AppResult<Vec<String>> {
    let prompt = build_hashtag_prompt(req);
    let text = generator
        .generate(&prompt, Some(hashtag_generation_config()))
        .await?;
    Ok(normalize_hashtags(&text))
}
