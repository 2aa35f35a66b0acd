use super::ids::Id;

/// A phone number or email address with its subtype code and display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub label: String,
    pub value: String,
    pub kind: i64,
}

impl Item {
    pub fn new(label: impl Into<String>, value: impl Into<String>, kind: i64) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind,
        }
    }
}

/// A structured postal address. Parts the provider left empty are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    pub label: String,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub region: String,
    pub country: String,
    pub kind: i64,
}

/// One contact as assembled from the provider's data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub identifier: String,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub note: Option<String>,
    pub birthday: Option<String>,
    pub account_type: Option<String>,
    pub account_name: Option<String>,
    pub phones: Vec<Item>,
    pub emails: Vec<Item>,
    pub postal_addresses: Vec<PostalAddress>,
    pub avatar: Option<Vec<u8>>,
}

impl Contact {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// The name shown by the provider: non-empty name parts joined by spaces.
    pub fn composed_display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [
            &self.prefix,
            &self.given_name,
            &self.middle_name,
            &self.family_name,
            &self.suffix,
        ]
        .iter()
        .filter_map(|p| p.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// A row of the provider's `raw_contacts` table. Several raw contacts from
/// different accounts can be joined into one `Contact`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContact {
    pub id: Id<RawContact>,
    pub contact_id: Id<Contact>,
    pub account_type: Option<String>,
    pub account_name: Option<String>,
}
