pub mod catalog;
pub mod listings;
pub mod messages;
pub mod offers;
pub mod profiles;

pub use catalog::{Skill, SkillCategory, SkillWithCategory};
pub use listings::{CreateListingRequest, ListingStatus, ListingView, NewListing, SwapListing};
pub use messages::{ConversationSummary, Message, MessageView, NewMessage, SendMessageRequest};
pub use offers::{NewOffer, OfferStatus, OfferView, ProposeOfferRequest, SwapOffer};
pub use profiles::{
    NewUserSkill, ProfileUpdate, PublicProfile, SaveUserSkillRequest, SkillLevel, SkillType,
    UpdateProfileRequest, UserProfile, UserSkill, UserSkillView,
};

/// Treats `""` (what HTML forms submit for untouched optional inputs) as absent.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
