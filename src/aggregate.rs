//! Folds flat provider data rows into one `Contact` per contact id.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::db::columns::{event, Column, MimeKind};
use crate::db::cursor::{DataRow, RowError};
use crate::labels::{self, LabelKind, LabelMode};
use crate::model::{Contact, Item, PostalAddress};
use crate::validation;

/// Streaming aggregation over a cursor. Contacts come out of `finish` in
/// the order their ids were first seen.
pub struct Aggregator<'a> {
    mode: LabelMode<'a>,
    contacts: Vec<Contact>,
    index: HashMap<String, usize>,
    skipped: usize,
}

impl<'a> Aggregator<'a> {
    pub fn new(mode: LabelMode<'a>) -> Self {
        Self {
            mode,
            contacts: Vec::new(),
            index: HashMap::new(),
            skipped: 0,
        }
    }

    /// Fold one row. A row that cannot be decoded is logged and dropped.
    pub fn push<R: DataRow + ?Sized>(&mut self, row: &R) {
        let id = match row.text(Column::ContactId) {
            Ok(Some(id)) => id,
            Ok(None) => {
                debug!("row without contact id skipped");
                self.skipped += 1;
                return;
            }
            Err(e) => {
                warn!(error = %e, "unreadable contact id, row skipped");
                self.skipped += 1;
                return;
            }
        };

        let slot = self.slot_for(id);
        match decode(row, self.mode) {
            Ok(decoded) => decoded.apply_to(&mut self.contacts[slot]),
            Err(e) => {
                warn!(
                    contact_id = %self.contacts[slot].identifier,
                    error = %e,
                    "error processing contact row, skipped"
                );
                self.skipped += 1;
            }
        }
    }

    /// Rows dropped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn finish(self) -> Vec<Contact> {
        self.contacts
    }

    fn slot_for(&mut self, id: String) -> usize {
        if let Some(&slot) = self.index.get(&id) {
            return slot;
        }
        let slot = self.contacts.len();
        self.contacts.push(Contact::new(id.clone()));
        self.index.insert(id, slot);
        slot
    }
}

/// Aggregate an already materialised row sequence.
pub fn aggregate<I, R>(rows: I, mode: LabelMode<'_>) -> Vec<Contact>
where
    I: IntoIterator<Item = R>,
    R: DataRow,
{
    let mut aggregator = Aggregator::new(mode);
    for row in rows {
        aggregator.push(&row);
    }
    aggregator.finish()
}

/// Stable sort by given name; a missing given name sorts as `""`.
pub fn sort_by_given_name(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        a.given_name
            .as_deref()
            .unwrap_or_default()
            .cmp(b.given_name.as_deref().unwrap_or_default())
    });
}

struct DecodedRow {
    display_name: Option<String>,
    account_type: Option<String>,
    account_name: Option<String>,
    attribute: Attribute,
}

enum Attribute {
    Name {
        given: Option<String>,
        middle: Option<String>,
        family: Option<String>,
        prefix: Option<String>,
        suffix: Option<String>,
    },
    Note(Option<String>),
    Phone(Item),
    Email(Item),
    Organization {
        company: Option<String>,
        title: Option<String>,
    },
    Postal(PostalAddress),
    Birthday(Option<String>),
    Ignored,
}

impl DecodedRow {
    fn apply_to(self, contact: &mut Contact) {
        contact.display_name = self.display_name;
        contact.account_type = self.account_type;
        contact.account_name = self.account_name;

        match self.attribute {
            Attribute::Name {
                given,
                middle,
                family,
                prefix,
                suffix,
            } => {
                contact.given_name = given;
                contact.middle_name = middle;
                contact.family_name = family;
                contact.prefix = prefix;
                contact.suffix = suffix;
            }
            Attribute::Note(note) => contact.note = note,
            Attribute::Phone(item) => contact.phones.push(item),
            Attribute::Email(item) => contact.emails.push(item),
            Attribute::Organization { company, title } => {
                contact.company = company;
                contact.job_title = title;
            }
            Attribute::Postal(address) => contact.postal_addresses.push(address),
            Attribute::Birthday(date) => contact.birthday = date,
            Attribute::Ignored => {}
        }
    }
}

fn decode<R: DataRow + ?Sized>(row: &R, mode: LabelMode<'_>) -> Result<DecodedRow, RowError> {
    let kind = text(row, Column::Mimetype)?
        .as_deref()
        .and_then(MimeKind::from_mime);

    let attribute = match kind {
        Some(MimeKind::Name) => Attribute::Name {
            given: text(row, Column::GivenName)?,
            middle: text(row, Column::MiddleName)?,
            family: text(row, Column::FamilyName)?,
            prefix: text(row, Column::Prefix)?,
            suffix: text(row, Column::Suffix)?,
        },
        Some(MimeKind::Note) => Attribute::Note(text(row, Column::Note)?),
        Some(MimeKind::Phone) => match labelled(row, Column::Number, LabelKind::Phone, mode)? {
            Some(item) => Attribute::Phone(item),
            None => Attribute::Ignored,
        },
        Some(MimeKind::Email) => match labelled(row, Column::EmailAddress, LabelKind::Email, mode)? {
            Some(item) => Attribute::Email(item),
            None => Attribute::Ignored,
        },
        Some(MimeKind::Organization) => Attribute::Organization {
            company: text(row, Column::Company)?,
            title: text(row, Column::Title)?,
        },
        Some(MimeKind::Postal) => {
            let code = type_code(row)?;
            let raw_label = text(row, Column::Label)?;
            Attribute::Postal(PostalAddress {
                label: labels::resolve(LabelKind::Postal, code, raw_label.as_deref(), mode),
                street: text(row, Column::Street)?.unwrap_or_default(),
                city: text(row, Column::City)?.unwrap_or_default(),
                postcode: text(row, Column::Postcode)?.unwrap_or_default(),
                region: text(row, Column::Region)?.unwrap_or_default(),
                country: text(row, Column::Country)?.unwrap_or_default(),
                kind: code,
            })
        }
        Some(MimeKind::Event) => {
            if type_code(row)? == event::BIRTHDAY {
                Attribute::Birthday(text(row, Column::StartDate)?)
            } else {
                Attribute::Ignored
            }
        }
        Some(MimeKind::Photo) | None => Attribute::Ignored,
    };

    Ok(DecodedRow {
        display_name: text(row, Column::DisplayName)?,
        account_type: text(row, Column::AccountType)?,
        account_name: text(row, Column::AccountName)?,
        attribute,
    })
}

/// Phone or email value; `None` when the value is blank.
fn labelled<R: DataRow + ?Sized>(
    row: &R,
    value_column: Column,
    kind: LabelKind,
    mode: LabelMode<'_>,
) -> Result<Option<Item>, RowError> {
    let value = text(row, value_column)?;
    if !validation::is_present(value.as_deref()) {
        return Ok(None);
    }
    let code = type_code(row)?;
    let raw_label = text(row, Column::Label)?;
    let label = labels::resolve(kind, code, raw_label.as_deref(), mode);
    Ok(value.map(|v| Item::new(label, v, code)))
}

/// Text columns outside the projection read as absent.
fn text<R: DataRow + ?Sized>(row: &R, column: Column) -> Result<Option<String>, RowError> {
    match row.text(column) {
        Err(RowError::MissingColumn(_)) => Ok(None),
        other => other,
    }
}

/// The subtype code; NULL reads as 0.
fn type_code<R: DataRow + ?Sized>(row: &R) -> Result<i64, RowError> {
    Ok(row.int(Column::Type)?.unwrap_or(0))
}
