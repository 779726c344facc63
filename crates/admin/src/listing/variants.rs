//! Color variant list editor.
//!
//! The list is never empty and every edit returns a new list. Removal here is
//! unconditional apart from the "keep one" rule; the confirmation step lives
//! in [`ListingScreen`](super::ListingScreen).

use serde::{Deserialize, Serialize};

use crate::models::VariantRow;

/// Transient identity of a variant on the form.
///
/// New variants get locally allocated keys; variants loaded from the table
/// reuse their row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantKey(i64);

impl VariantKey {
    #[must_use]
    pub const fn new(key: i64) -> Self {
        Self(key)
    }

    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for VariantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One color/stock entry on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorVariant {
    pub key: VariantKey,
    pub color: String,
    pub total_quantity: u32,
    pub available_quantity: u32,
    /// Photo picked on this device, or the stored URL for loaded variants.
    pub image_ref: Option<String>,
    /// URL already resolved in storage.
    pub image_url: Option<String>,
}

impl ColorVariant {
    /// A blank variant with both quantities at 1.
    #[must_use]
    pub const fn blank(key: VariantKey) -> Self {
        Self {
            key,
            color: String::new(),
            total_quantity: 1,
            available_quantity: 1,
            image_ref: None,
            image_url: None,
        }
    }

    /// Form state for a stored row. The stored URL doubles as the local
    /// reference so an untouched photo is not uploaded again.
    #[must_use]
    pub fn from_row(row: &VariantRow) -> Self {
        Self {
            key: VariantKey::new(row.id.as_i64()),
            color: row.color.clone(),
            total_quantity: row.total_quantity,
            available_quantity: row.available_quantity,
            image_ref: row.image_url.clone(),
            image_url: row.image_url.clone(),
        }
    }

    /// Whether the color is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.color.trim().is_empty()
    }

    /// Whether the picked photo differs from the resolved URL.
    #[must_use]
    pub fn needs_upload(&self) -> bool {
        match &self.image_ref {
            Some(reference) => self.image_url.as_ref() != Some(reference),
            None => false,
        }
    }
}

/// A single edit to the variant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantEdit {
    /// Append a blank variant.
    Add,
    /// Drop a variant (ignored when it is the last one).
    Remove(VariantKey),
    Color(VariantKey, String),
    /// Set the total; clamps `available_quantity` down when it would exceed it.
    TotalQuantity(VariantKey, u32),
    /// Set the available count; never touches the total.
    AvailableQuantity(VariantKey, u32),
    /// Attach a newly picked photo.
    Image(VariantKey, String),
}

/// Ordered, never-empty list of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantList {
    variants: Vec<ColorVariant>,
    next_key: i64,
}

impl Default for VariantList {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantList {
    /// A list holding one blank variant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variants: vec![ColorVariant::blank(VariantKey::new(1))],
            next_key: 2,
        }
    }

    /// Replace the list with stored rows. Keeps the current list if `rows`
    /// is empty.
    #[must_use]
    pub fn with_rows(self, rows: &[VariantRow]) -> Self {
        if rows.is_empty() {
            return self;
        }

        let variants: Vec<ColorVariant> = rows.iter().map(ColorVariant::from_row).collect();
        let max_key = variants
            .iter()
            .map(|v| v.key.as_i64())
            .chain(std::iter::once(self.next_key - 1))
            .max()
            .unwrap_or(0);

        Self {
            variants,
            next_key: max_key + 1,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Never true: the list keeps at least one variant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Whether a remove would be accepted.
    #[must_use]
    pub fn can_remove(&self) -> bool {
        self.variants.len() > 1
    }

    #[must_use]
    pub fn get(&self, key: VariantKey) -> Option<&ColorVariant> {
        self.variants.iter().find(|v| v.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorVariant> {
        self.variants.iter()
    }

    /// Variants with a non-blank color, in list order.
    pub fn named(&self) -> impl Iterator<Item = &ColorVariant> {
        self.variants.iter().filter(|v| !v.is_blank())
    }

    /// Key of the most recently added variant.
    #[must_use]
    pub fn last_key(&self) -> Option<VariantKey> {
        self.variants.last().map(|v| v.key)
    }

    /// Apply one edit, returning the next list.
    #[must_use]
    pub fn apply(mut self, edit: VariantEdit) -> Self {
        match edit {
            VariantEdit::Add => {
                self.variants
                    .push(ColorVariant::blank(VariantKey::new(self.next_key)));
                self.next_key += 1;
            }
            VariantEdit::Remove(key) => {
                if self.can_remove() {
                    self.variants.retain(|v| v.key != key);
                }
            }
            VariantEdit::Color(key, color) => {
                self.update(key, |v| v.color = color);
            }
            VariantEdit::TotalQuantity(key, total) => {
                self.update(key, |v| {
                    v.total_quantity = total;
                    if v.available_quantity > total {
                        v.available_quantity = total;
                    }
                });
            }
            VariantEdit::AvailableQuantity(key, available) => {
                self.update(key, |v| v.available_quantity = available);
            }
            VariantEdit::Image(key, reference) => {
                self.update(key, |v| v.image_ref = Some(reference));
            }
        }
        self
    }

    fn update(&mut self, key: VariantKey, f: impl FnOnce(&mut ColorVariant)) {
        if let Some(variant) = self.variants.iter_mut().find(|v| v.key == key) {
            f(variant);
        }
    }
}
