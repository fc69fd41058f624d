//! Order entity, status lifecycle, and story template catalog
//!
//! The order is the sole persisted entity. Internal storage locators
//! (`photo_path`, `pdf_path`) live on the entity but are never serialized to
//! clients; external responses go through the [`OrderSummary`] projection.

use crate::blob::StoredBlob;
use crate::core::error::FieldError;
use crate::core::validation;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of story templates a customer can order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryTemplate {
    EnchantedForest,
    PrincessDragon,
    MagicGarden,
}

impl StoryTemplate {
    /// All valid template identifiers, in catalog order
    pub const ALL: [StoryTemplate; 3] = [
        StoryTemplate::EnchantedForest,
        StoryTemplate::PrincessDragon,
        StoryTemplate::MagicGarden,
    ];

    /// The wire identifier for this template
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryTemplate::EnchantedForest => "enchanted-forest",
            StoryTemplate::PrincessDragon => "princess-dragon",
            StoryTemplate::MagicGarden => "magic-garden",
        }
    }

    /// The fixed book title for this template
    pub fn title(&self) -> &'static str {
        match self {
            StoryTemplate::EnchantedForest => "The Enchanted Forest Adventure",
            StoryTemplate::PrincessDragon => "The Princess and the Dragon",
            StoryTemplate::MagicGarden => "The Magic Garden",
        }
    }

    /// Parse a wire identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }

    /// Wire identifiers of every template, for validation messages
    pub fn identifiers() -> [&'static str; 3] {
        [
            StoryTemplate::EnchantedForest.as_str(),
            StoryTemplate::PrincessDragon.as_str(),
            StoryTemplate::MagicGarden.as_str(),
        ]
    }
}

impl fmt::Display for StoryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle status
///
/// `Processing` is part of the persisted model but no exposed operation sets
/// it; the only implemented transition is to `Ready` via PDF attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Ready,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
        }
    }
}

/// Raw order submission, as received from the client
#[derive(Debug, Clone, Default)]
pub struct OrderInput {
    pub child_name: String,
    pub email: String,
    pub story_template: String,
    pub notes: String,
}

/// An order submission that passed validation
///
/// Field values are normalized: name trimmed, email lower-cased, template
/// resolved against the catalog.
#[derive(Debug, Clone)]
pub struct ValidOrderInput {
    pub child_name: String,
    pub email: String,
    pub story_template: StoryTemplate,
    pub notes: String,
}

impl OrderInput {
    /// Validate and normalize the submission
    ///
    /// Errors are collected across all fields so the client can display
    /// every problem at once.
    pub fn validate(self) -> Result<ValidOrderInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = validation::string_length("childName", &self.child_name, 2, 50) {
            errors.push(e);
        }
        if let Some(e) = validation::matches_pattern(
            "email",
            self.email.trim(),
            &validation::EMAIL_PATTERN,
            "must be a valid email address",
        ) {
            errors.push(e);
        }
        let template = StoryTemplate::parse(&self.story_template);
        if template.is_none() {
            errors.push(FieldError::new(
                "storyTemplate",
                format!(
                    "must be one of: {}",
                    StoryTemplate::identifiers().join(", ")
                ),
            ));
        }
        if let Some(e) = validation::max_length("notes", &self.notes, 500) {
            errors.push(e);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidOrderInput {
            child_name: self.child_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            story_template: template.expect("template validated above"),
            notes: self.notes,
        })
    }
}

/// Generate a fresh order id: `FT` + last 6 digits of the current epoch
/// millis + a zero-padded 3-digit random suffix (`FT\d{9}`).
pub fn generate_order_id() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    let random: u32 = rand::thread_rng().gen_range(0..1000);
    format!("FT{}{:03}", tail, random)
}

/// The persisted order record
///
/// Serialization uses camelCase wire names so the document-store
/// representation matches the established collection layout. This struct is
/// only ever serialized toward storage; client responses use
/// [`OrderSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub child_name: String,
    pub email: String,
    pub story_template: StoryTemplate,
    pub story_title: String,
    pub photo_url: String,
    pub photo_path: String,
    pub status: OrderStatus,
    pub pdf_url: Option<String>,
    pub pdf_path: Option<String>,
    pub notification_sent: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Construct a new pending order from validated input and a stored photo
    ///
    /// The order id is generated here, before first persistence; clients
    /// never supply it. `story_title` is denormalized from the template.
    pub fn new(input: ValidOrderInput, photo: StoredBlob) -> Self {
        let now = Utc::now();
        Self {
            order_id: generate_order_id(),
            child_name: input.child_name,
            email: input.email,
            story_template: input.story_template,
            story_title: input.story_template.title().to_string(),
            photo_url: photo.public_url,
            photo_path: photo.internal_path,
            status: OrderStatus::Pending,
            pdf_url: None,
            pdf_path: None,
            notification_sent: false,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the generated id, used when the store rejects a collision
    pub fn regenerate_id(&mut self) {
        self.order_id = generate_order_id();
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Attach a stored PDF and complete the order
    pub fn attach_pdf(&mut self, pdf: StoredBlob) {
        self.pdf_url = Some(pdf.public_url);
        self.pdf_path = Some(pdf.internal_path);
        self.status = OrderStatus::Ready;
        self.touch();
    }

    /// Record a successful outbound notification
    pub fn mark_notified(&mut self) {
        self.notification_sent = true;
        self.touch();
    }

    /// The public projection of this order
    ///
    /// Internal storage paths are excluded by construction; there is no way
    /// for them to leak through this view.
    pub fn summary(&self) -> OrderSummary {
        OrderSummary {
            order_id: self.order_id.clone(),
            child_name: self.child_name.clone(),
            email: self.email.clone(),
            story_title: self.story_title.clone(),
            status: self.status,
            created_at: self.created_at,
            photo_url: self.photo_url.clone(),
            pdf_url: self.pdf_url.clone(),
        }
    }
}

/// Field-filtered public view of an order
///
/// `pdfUrl` serializes as `null` until a PDF is attached, matching the wire
/// contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub child_name: String,
    pub email: String,
    pub story_title: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub photo_url: String,
    pub pdf_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> OrderInput {
        OrderInput {
            child_name: "Mia".to_string(),
            email: "mia@x.com".to_string(),
            story_template: "magic-garden".to_string(),
            notes: String::new(),
        }
    }

    fn stored_photo() -> StoredBlob {
        StoredBlob {
            public_url: "/uploads/photos/123-456.png".to_string(),
            internal_path: "uploads/photos/123-456.png".to_string(),
        }
    }

    // ── StoryTemplate ────────────────────────────────────────────────────

    #[test]
    fn test_template_titles_are_fixed() {
        assert_eq!(
            StoryTemplate::EnchantedForest.title(),
            "The Enchanted Forest Adventure"
        );
        assert_eq!(
            StoryTemplate::PrincessDragon.title(),
            "The Princess and the Dragon"
        );
        assert_eq!(StoryTemplate::MagicGarden.title(), "The Magic Garden");
    }

    #[test]
    fn test_template_parse_roundtrip() {
        for template in StoryTemplate::ALL {
            assert_eq!(StoryTemplate::parse(template.as_str()), Some(template));
        }
    }

    #[test]
    fn test_template_parse_unknown_returns_none() {
        assert_eq!(StoryTemplate::parse("unknown-template"), None);
        assert_eq!(StoryTemplate::parse(""), None);
    }

    #[test]
    fn test_template_serde_uses_kebab_case() {
        let json = serde_json::to_string(&StoryTemplate::EnchantedForest).unwrap();
        assert_eq!(json, "\"enchanted-forest\"");
        let back: StoryTemplate = serde_json::from_str("\"magic-garden\"").unwrap();
        assert_eq!(back, StoryTemplate::MagicGarden);
    }

    // ── Validation ───────────────────────────────────────────────────────

    #[test]
    fn test_validate_accepts_minimal_valid_input() {
        let valid = valid_input().validate().expect("input should validate");
        assert_eq!(valid.child_name, "Mia");
        assert_eq!(valid.story_template, StoryTemplate::MagicGarden);
    }

    #[test]
    fn test_validate_one_char_name_fails() {
        let mut input = valid_input();
        input.child_name = "A".to_string();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "childName");
    }

    #[test]
    fn test_validate_two_char_name_succeeds() {
        let mut input = valid_input();
        input.child_name = "Al".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_email_fails() {
        let mut input = valid_input();
        input.email = "not-an-email".to_string();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "email");
    }

    #[test]
    fn test_validate_lowercases_email() {
        let mut input = valid_input();
        input.email = "A@B.co".to_string();
        let valid = input.validate().expect("email should validate");
        assert_eq!(valid.email, "a@b.co");
    }

    #[test]
    fn test_validate_unknown_template_fails() {
        let mut input = valid_input();
        input.story_template = "unknown-template".to_string();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors[0].field, "storyTemplate");
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let input = OrderInput {
            child_name: "A".to_string(),
            email: "nope".to_string(),
            story_template: "bad".to_string(),
            notes: "x".repeat(501),
        };
        let errors = input.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["childName", "email", "storyTemplate", "notes"]);
    }

    #[test]
    fn test_validate_trims_child_name() {
        let mut input = valid_input();
        input.child_name = "  Mia  ".to_string();
        let valid = input.validate().expect("trimmed name should validate");
        assert_eq!(valid.child_name, "Mia");
    }

    // ── Order id generation ──────────────────────────────────────────────

    #[test]
    fn test_order_id_format() {
        for _ in 0..100 {
            let id = generate_order_id();
            assert_eq!(id.len(), 11, "id should be FT + 9 digits: {}", id);
            assert!(id.starts_with("FT"));
            assert!(id[2..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    // ── Order lifecycle ──────────────────────────────────────────────────

    #[test]
    fn test_new_order_is_pending_with_derived_title() {
        let order = Order::new(valid_input().validate().unwrap(), stored_photo());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.story_title, "The Magic Garden");
        assert!(order.pdf_url.is_none());
        assert!(order.pdf_path.is_none());
        assert!(!order.notification_sent);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[test]
    fn test_attach_pdf_completes_order() {
        let mut order = Order::new(valid_input().validate().unwrap(), stored_photo());
        order.attach_pdf(StoredBlob {
            public_url: "/uploads/pdfs/FT.pdf".to_string(),
            internal_path: "uploads/pdfs/FT.pdf".to_string(),
        });
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.pdf_url.as_deref(), Some("/uploads/pdfs/FT.pdf"));
        assert!(order.updated_at >= order.created_at);
    }

    #[test]
    fn test_regenerate_id_changes_id() {
        let mut order = Order::new(valid_input().validate().unwrap(), stored_photo());
        let original = order.order_id.clone();
        // A collision on all three digits and the same millisecond is
        // possible, so only assert the format here.
        order.regenerate_id();
        assert!(order.order_id.starts_with("FT"));
        assert_eq!(order.order_id.len(), original.len());
    }

    // ── Summary projection ───────────────────────────────────────────────

    #[test]
    fn test_summary_excludes_internal_paths() {
        let mut order = Order::new(valid_input().validate().unwrap(), stored_photo());
        order.attach_pdf(StoredBlob {
            public_url: "/uploads/pdfs/FT.pdf".to_string(),
            internal_path: "uploads/pdfs/FT.pdf".to_string(),
        });

        let json = serde_json::to_value(order.summary()).unwrap();
        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert!(!keys.contains(&"photoPath"));
        assert!(!keys.contains(&"pdfPath"));
        assert!(keys.contains(&"orderId"));
        assert!(keys.contains(&"photoUrl"));
    }

    #[test]
    fn test_summary_pdf_url_serializes_as_null_when_pending() {
        let order = Order::new(valid_input().validate().unwrap(), stored_photo());
        let json = serde_json::to_value(order.summary()).unwrap();
        assert!(json.get("pdfUrl").unwrap().is_null());
        assert_eq!(json.get("status").unwrap(), "pending");
    }
}
