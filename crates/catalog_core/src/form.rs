//! crates/catalog_core/src/form.rs
//!
//! The product form: field edits, the bounded image-list editor, and the
//! editor that ties a draft to the modal controller.

use std::str::FromStr;

use crate::domain::{Product, ProductDraft, ProductPayload, MAX_IMAGES};
use crate::modal::{DialogOptions, ModalController, ModalMode};

//=========================================================================================
// Form Error Type
//=========================================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field {0} expects a checkbox value")]
    ExpectedCheckbox(ProductField),
    #[error("Field {0} expects a text value")]
    ExpectedText(ProductField),
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: ProductField, value: String },
    #[error("Image slot {index} is out of range (at most {max} images)", max = MAX_IMAGES)]
    ImageIndexOutOfRange { index: usize },
    #[error("At most {max} images are allowed", max = MAX_IMAGES)]
    ImageListFull,
    #[error("The product dialog is not open")]
    DialogClosed,
    #[error("Fields cannot be edited in {0} mode")]
    ReadOnly(ModalMode),
}

//=========================================================================================
// Field Names and Values
//=========================================================================================

/// Every user-editable field of a draft. The record id is not editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Title,
    Category,
    OriginPrice,
    Price,
    Unit,
    Description,
    Content,
    IsEnabled,
    ImageUrl,
}

impl ProductField {
    pub const ALL: [ProductField; 9] = [
        ProductField::Title,
        ProductField::Category,
        ProductField::OriginPrice,
        ProductField::Price,
        ProductField::Unit,
        ProductField::Description,
        ProductField::Content,
        ProductField::IsEnabled,
        ProductField::ImageUrl,
    ];

    /// The field's name on the wire and in the form.
    pub fn name(self) -> &'static str {
        match self {
            ProductField::Title => "title",
            ProductField::Category => "category",
            ProductField::OriginPrice => "origin_price",
            ProductField::Price => "price",
            ProductField::Unit => "unit",
            ProductField::Description => "description",
            ProductField::Content => "content",
            ProductField::IsEnabled => "is_enabled",
            ProductField::ImageUrl => "imageUrl",
        }
    }

    pub fn is_checkbox(self) -> bool {
        self == ProductField::IsEnabled
    }
}

impl std::fmt::Display for ProductField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .or(match s {
                "image_url" => Some(ProductField::ImageUrl),
                _ => None,
            })
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// A value coming from a form control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Text(String),
    Checkbox(bool),
}

//=========================================================================================
// Draft Editing
//=========================================================================================

impl ProductDraft {
    /// Generic field update. The checkbox field stores a boolean; every
    /// other field stores the raw input.
    pub fn edit_field(&mut self, field: ProductField, input: FieldInput) -> Result<(), FormError> {
        match input {
            FieldInput::Checkbox(checked) if field.is_checkbox() => self.is_enabled = checked,
            FieldInput::Checkbox(_) => return Err(FormError::ExpectedText(field)),
            FieldInput::Text(text) => match self.text_field_mut(field) {
                Some(slot) => *slot = text,
                None => return Err(FormError::ExpectedCheckbox(field)),
            },
        }
        Ok(())
    }

    fn text_field_mut(&mut self, field: ProductField) -> Option<&mut String> {
        match field {
            ProductField::Title => Some(&mut self.title),
            ProductField::Category => Some(&mut self.category),
            ProductField::OriginPrice => Some(&mut self.origin_price),
            ProductField::Price => Some(&mut self.price),
            ProductField::Unit => Some(&mut self.unit),
            ProductField::Description => Some(&mut self.description),
            ProductField::Content => Some(&mut self.content),
            ProductField::ImageUrl => Some(&mut self.image_url),
            ProductField::IsEnabled => None,
        }
    }

    /// Replaces the image at `index` and applies the grow/shrink policy.
    ///
    /// Filling the last slot appends a fresh empty one while fewer than
    /// `MAX_IMAGES` exist. Clearing a slot drops the trailing empty slot as
    /// long as at least one slot remains.
    pub fn edit_image_at(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        if index >= MAX_IMAGES {
            return Err(FormError::ImageIndexOutOfRange { index });
        }
        let value = value.into();
        let images = &mut self.images_url;
        if index >= images.len() {
            images.resize(index + 1, String::new());
        }
        let filled = !value.is_empty();
        images[index] = value;

        let len = images.len();
        if filled && index == len - 1 && len < MAX_IMAGES {
            images.push(String::new());
        }
        if !filled && len > 1 && images.last().is_some_and(|last| last.is_empty()) {
            images.pop();
        }
        Ok(())
    }

    /// Appends one empty slot.
    pub fn add_image_slot(&mut self) -> Result<(), FormError> {
        if self.images_url.len() >= MAX_IMAGES {
            return Err(FormError::ImageListFull);
        }
        self.images_url.push(String::new());
        Ok(())
    }

    /// Drops the last slot, whatever it holds.
    pub fn remove_last_image_slot(&mut self) {
        self.images_url.pop();
    }

    /// Coerces the draft into the record sent to the catalog.
    pub fn to_payload(&self) -> Result<ProductPayload, FormError> {
        Ok(ProductPayload {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            origin_price: coerce_number(ProductField::OriginPrice, &self.origin_price)?,
            price: coerce_number(ProductField::Price, &self.price)?,
            unit: self.unit.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            is_enabled: u8::from(self.is_enabled),
            image_url: self.image_url.clone(),
            images_url: self
                .images_url
                .iter()
                .filter(|url| !url.is_empty())
                .cloned()
                .collect(),
        })
    }
}

/// Blank input counts as zero; anything else must parse as a finite number.
fn coerce_number(field: ProductField, raw: &str) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FormError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

//=========================================================================================
// Product Editor
//=========================================================================================

/// What confirming the dialog should do.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Create(ProductPayload),
    Update { id: String, payload: ProductPayload },
    Delete { id: String },
}

/// The draft bound to the modal dialog.
#[derive(Debug, Clone, Default)]
pub struct ProductEditor {
    modal: ModalController,
    draft: ProductDraft,
}

impl ProductEditor {
    pub fn new(options: DialogOptions) -> Self {
        Self {
            modal: ModalController::new(options),
            draft: ProductDraft::template(),
        }
    }

    /// Sets the mode, loads the draft from `source` (or the empty template)
    /// and shows the dialog.
    pub fn open(&mut self, mode: ModalMode, source: Option<&Product>) {
        self.draft = source
            .map(ProductDraft::from_product)
            .unwrap_or_else(ProductDraft::template);
        self.modal.open(mode);
    }

    /// Hides the dialog. The draft and mode stay until the next `open`.
    pub fn close(&mut self) {
        self.modal.close();
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn mode(&self) -> ModalMode {
        self.modal.active_mode()
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn edit_field(&mut self, field: ProductField, input: FieldInput) -> Result<(), FormError> {
        self.editable_draft()?.edit_field(field, input)
    }

    pub fn edit_image_at(&mut self, index: usize, value: impl Into<String>) -> Result<(), FormError> {
        self.editable_draft()?.edit_image_at(index, value)
    }

    pub fn add_image_slot(&mut self) -> Result<(), FormError> {
        self.editable_draft()?.add_image_slot()
    }

    pub fn remove_last_image_slot(&mut self) -> Result<(), FormError> {
        self.editable_draft()?.remove_last_image_slot();
        Ok(())
    }

    /// Resolves the confirm button for the current mode.
    pub fn confirm(&self) -> Result<PendingAction, FormError> {
        match self.modal.active_mode() {
            ModalMode::None => Err(FormError::DialogClosed),
            ModalMode::Create => Ok(PendingAction::Create(self.draft.to_payload()?)),
            ModalMode::Edit => Ok(PendingAction::Update {
                id: self.draft.id.clone(),
                payload: self.draft.to_payload()?,
            }),
            ModalMode::Delete => Ok(PendingAction::Delete {
                id: self.draft.id.clone(),
            }),
        }
    }

    fn editable_draft(&mut self) -> Result<&mut ProductDraft, FormError> {
        match self.modal.active_mode() {
            ModalMode::None => Err(FormError::DialogClosed),
            mode if !mode.is_editable() => Err(FormError::ReadOnly(mode)),
            _ => Ok(&mut self.draft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> FieldInput {
        FieldInput::Text(value.to_string())
    }

    fn images(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_scenario_appends_empty_slot() {
        let mut editor = ProductEditor::default();
        editor.open(ModalMode::Create, None);
        editor.edit_field(ProductField::Title, text("Shirt")).unwrap();
        editor.edit_image_at(0, "http://a").unwrap();

        assert_eq!(editor.draft().title, "Shirt");
        assert_eq!(editor.draft().images_url, images(&["http://a", ""]));
    }

    #[test]
    fn edit_scenario_keeps_single_cleared_slot() {
        let product = Product {
            id: "5".into(),
            title: "Hat".into(),
            images_url: images(&["x"]),
            ..Default::default()
        };
        let mut editor = ProductEditor::default();
        editor.open(ModalMode::Edit, Some(&product));
        editor.edit_image_at(0, "").unwrap();

        assert_eq!(editor.draft().images_url, images(&[""]));
    }

    #[test]
    fn filling_last_slot_appends_exactly_one() {
        let mut draft = ProductDraft {
            images_url: images(&["a", ""]),
            ..Default::default()
        };
        draft.edit_image_at(1, "b").unwrap();
        assert_eq!(draft.images_url, images(&["a", "b", ""]));

        // Filling a slot that is not last leaves the length alone.
        draft.edit_image_at(0, "c").unwrap();
        assert_eq!(draft.images_url, images(&["c", "b", ""]));
    }

    #[test]
    fn growth_stops_at_five() {
        let mut draft = ProductDraft::default();
        for (i, url) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            draft.edit_image_at(i, *url).unwrap();
        }
        assert_eq!(draft.images_url, images(&["a", "b", "c", "d", "e"]));
        assert_eq!(
            draft.edit_image_at(5, "f"),
            Err(FormError::ImageIndexOutOfRange { index: 5 })
        );
    }

    #[test]
    fn clearing_a_slot_drops_trailing_empty() {
        let mut draft = ProductDraft {
            images_url: images(&["a", "b", ""]),
            ..Default::default()
        };
        draft.edit_image_at(1, "").unwrap();
        assert_eq!(draft.images_url, images(&["a", ""]));
    }

    #[test]
    fn clearing_without_trailing_empty_keeps_length() {
        let mut draft = ProductDraft {
            images_url: images(&["a", "b", "c", "d", "e"]),
            ..Default::default()
        };
        draft.edit_image_at(4, "").unwrap();
        assert_eq!(draft.images_url, images(&["a", "b", "c", "d"]));

        let mut draft = ProductDraft {
            images_url: images(&["a", "b"]),
            ..Default::default()
        };
        draft.edit_image_at(0, "").unwrap();
        assert_eq!(draft.images_url, images(&["", "b"]));
    }

    #[test]
    fn edit_sequences_keep_length_within_bounds() {
        let values = ["", "http://a", "http://b"];
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..200 {
            let mut draft = ProductDraft::default();
            for _ in 0..30 {
                seed ^= seed << 13;
                seed ^= seed >> 7;
                seed ^= seed << 17;
                let len = draft.images_url.len().max(1);
                let index = (seed as usize) % len.min(MAX_IMAGES);
                let value = values[(seed >> 32) as usize % values.len()];
                draft.edit_image_at(index, value).unwrap();
                let len = draft.images_url.len();
                assert!((1..=MAX_IMAGES).contains(&len), "length {len} out of bounds");
            }
        }
    }

    #[test]
    fn manual_slots_are_capped() {
        let mut draft = ProductDraft::default();
        for _ in 0..MAX_IMAGES {
            draft.add_image_slot().unwrap();
        }
        assert_eq!(draft.add_image_slot(), Err(FormError::ImageListFull));

        draft.remove_last_image_slot();
        assert_eq!(draft.images_url.len(), MAX_IMAGES - 1);

        let mut empty = ProductDraft::default();
        empty.remove_last_image_slot();
        assert!(empty.images_url.is_empty());
    }

    #[test]
    fn checkbox_stores_boolean() {
        let mut draft = ProductDraft::default();
        draft
            .edit_field(ProductField::IsEnabled, FieldInput::Checkbox(true))
            .unwrap();
        assert!(draft.is_enabled);

        assert_eq!(
            draft.edit_field(ProductField::IsEnabled, text("yes")),
            Err(FormError::ExpectedCheckbox(ProductField::IsEnabled))
        );
        assert_eq!(
            draft.edit_field(ProductField::Price, FieldInput::Checkbox(true)),
            Err(FormError::ExpectedText(ProductField::Price))
        );
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("origin_price".parse::<ProductField>(), Ok(ProductField::OriginPrice));
        assert_eq!("imageUrl".parse::<ProductField>(), Ok(ProductField::ImageUrl));
        assert_eq!("image_url".parse::<ProductField>(), Ok(ProductField::ImageUrl));
        assert_eq!(
            "id".parse::<ProductField>(),
            Err(FormError::UnknownField("id".into()))
        );
    }

    #[test]
    fn payload_coerces_numbers_and_strips_empty_images() {
        let draft = ProductDraft {
            title: "Shirt".into(),
            origin_price: " 120 ".into(),
            price: "".into(),
            is_enabled: true,
            images_url: images(&["a", "", "b", ""]),
            ..Default::default()
        };

        let payload = draft.to_payload().unwrap();

        assert_eq!(payload.origin_price, 120.0);
        assert_eq!(payload.price, 0.0);
        assert_eq!(payload.is_enabled, 1);
        assert_eq!(payload.images_url, images(&["a", "b"]));
    }

    #[test]
    fn payload_rejects_non_numeric_price() {
        let draft = ProductDraft {
            price: "cheap".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.to_payload(),
            Err(FormError::InvalidNumber {
                field: ProductField::Price,
                value: "cheap".into()
            })
        );
    }

    #[test]
    fn confirm_follows_mode() {
        let product = Product {
            id: "p9".into(),
            price: 10.0,
            ..Default::default()
        };
        let mut editor = ProductEditor::default();
        assert_eq!(editor.confirm(), Err(FormError::DialogClosed));

        editor.open(ModalMode::Edit, Some(&product));
        match editor.confirm().unwrap() {
            PendingAction::Update { id, payload } => {
                assert_eq!(id, "p9");
                assert_eq!(payload.price, 10.0);
            }
            other => panic!("unexpected action {other:?}"),
        }

        editor.open(ModalMode::Delete, Some(&product));
        assert_eq!(
            editor.confirm(),
            Ok(PendingAction::Delete { id: "p9".into() })
        );

        editor.close();
        assert_eq!(editor.confirm(), Err(FormError::DialogClosed));
    }

    #[test]
    fn delete_mode_is_read_only() {
        let mut editor = ProductEditor::default();
        editor.open(ModalMode::Delete, Some(&Product::default()));
        assert_eq!(
            editor.edit_field(ProductField::Title, text("x")),
            Err(FormError::ReadOnly(ModalMode::Delete))
        );
        assert_eq!(
            editor.add_image_slot(),
            Err(FormError::ReadOnly(ModalMode::Delete))
        );
    }

    #[test]
    fn open_replaces_previous_draft() {
        let product = Product {
            id: "1".into(),
            title: "Old".into(),
            images_url: images(&["x", "y"]),
            ..Default::default()
        };
        let mut editor = ProductEditor::default();
        editor.open(ModalMode::Edit, Some(&product));
        editor.close();

        // The draft survives a close.
        assert_eq!(editor.draft().title, "Old");

        editor.open(ModalMode::Create, None);
        assert_eq!(editor.draft(), &ProductDraft::template());
    }
}
