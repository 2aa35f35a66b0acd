use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::info;

use crate::db::batch::{apply_batch, Operation, Table};
use crate::db::columns::{event, organization, Column, MimeKind, TYPE_CUSTOM};
use crate::db::contact_repo;
use crate::error::{ContactsError, ContactsResult};
use crate::model::{Contact, Id, RawContact};
use crate::validation;

/// Selects the data rows of every raw contact joined into one contact.
const CONTACT_ROWS_OF_KIND: &str =
    "raw_contact_id IN (SELECT _id FROM raw_contacts WHERE contact_id = ?) AND mimetype = ?";

/// Data rows rewritten wholesale by an update.
const REPLACED_KINDS: [MimeKind; 5] = [
    MimeKind::Organization,
    MimeKind::Phone,
    MimeKind::Email,
    MimeKind::Note,
    MimeKind::Postal,
];

/// The raw contact a data row belongs to.
#[derive(Debug, Clone, Copy)]
enum Owner {
    /// Raw contact inserted by an earlier operation of the same batch.
    Inserted(usize),
    Existing(Id<RawContact>),
}

fn data_insert(owner: Owner, kind: MimeKind) -> Operation {
    let op = Operation::insert(Table::Data);
    let op = match owner {
        Owner::Inserted(index) => op.with_back_reference(Column::RawContactId, index),
        Owner::Existing(id) => op.with_value(Column::RawContactId, id.value),
    };
    op.with_mime(kind)
}

fn with_name_values(op: Operation, contact: &Contact) -> Operation {
    op.with_value(Column::StructuredDisplayName, contact.composed_display_name())
        .with_value(Column::GivenName, contact.given_name.clone())
        .with_value(Column::MiddleName, contact.middle_name.clone())
        .with_value(Column::FamilyName, contact.family_name.clone())
        .with_value(Column::Prefix, contact.prefix.clone())
        .with_value(Column::Suffix, contact.suffix.clone())
}

/// Custom subtypes carry their label; predefined ones store only the code.
fn with_type(op: Operation, kind: i64, label: &str) -> Operation {
    let op = op.with_value(Column::Type, kind);
    if kind == TYPE_CUSTOM {
        op.with_value(Column::Label, label.to_string())
    } else {
        op
    }
}

/// Note, organization, phones, emails, addresses and birthday rows.
fn detail_inserts(owner: Owner, contact: &Contact) -> Vec<Operation> {
    let mut ops = vec![
        data_insert(owner, MimeKind::Note).with_value(Column::Note, contact.note.clone()),
        data_insert(owner, MimeKind::Organization)
            .with_value(Column::Type, organization::WORK)
            .with_value(Column::Company, contact.company.clone())
            .with_value(Column::Title, contact.job_title.clone()),
    ];

    for phone in &contact.phones {
        let op = data_insert(owner, MimeKind::Phone).with_value(Column::Number, phone.value.clone());
        ops.push(with_type(op, phone.kind, &phone.label));
    }

    for email in &contact.emails {
        let op = data_insert(owner, MimeKind::Email).with_value(Column::EmailAddress, email.value.clone());
        ops.push(with_type(op, email.kind, &email.label));
    }

    for address in &contact.postal_addresses {
        let op = data_insert(owner, MimeKind::Postal)
            .with_value(Column::Street, address.street.clone())
            .with_value(Column::City, address.city.clone())
            .with_value(Column::Region, address.region.clone())
            .with_value(Column::Postcode, address.postcode.clone())
            .with_value(Column::Country, address.country.clone());
        ops.push(with_type(op, address.kind, &address.label));
    }

    if let Some(birthday) = validation::trim_optional(contact.birthday.as_deref()) {
        ops.push(
            data_insert(owner, MimeKind::Event)
                .with_value(Column::Type, event::BIRTHDAY)
                .with_value(Column::StartDate, birthday),
        );
    }

    ops
}

fn photo_insert(owner: Owner, avatar: &[u8]) -> Operation {
    data_insert(owner, MimeKind::Photo)
        .with_value(Column::IsSuperPrimary, 1_i64)
        .with_value(Column::Photo, avatar.to_vec())
}

/// Insert a new local contact. Returns the identifier the provider gave it.
pub fn add_contact(conn: &Connection, contact: &Contact) -> ContactsResult<Id<Contact>> {
    let raw = Owner::Inserted(0);
    let mut ops = vec![
        Operation::insert(Table::RawContacts)
            .with_value(Column::AccountType, Value::Null)
            .with_value(Column::AccountName, Value::Null),
        with_name_values(data_insert(raw, MimeKind::Name), contact),
    ];
    ops.extend(detail_inserts(raw, contact));
    if let Some(avatar) = contact.avatar.as_deref().filter(|a| !a.is_empty()) {
        ops.push(photo_insert(raw, avatar));
    }

    let results = apply_batch(conn, &ops)?;
    let raw_id = results
        .first()
        .and_then(|r| r.inserted_id())
        .ok_or_else(|| ContactsError::Other("raw contact insert returned no id".into()))?;

    let contact_id: i64 = conn.query_row(
        "SELECT contact_id FROM raw_contacts WHERE _id = ?1",
        [raw_id],
        |row| row.get(0),
    )?;
    info!(contact_id, "contact added");
    Ok(Id::new(contact_id))
}

/// Replace a contact's details with the given values.
///
/// The name row is updated in place; organization, phones, emails, note,
/// addresses and birthday are deleted and written again. The photo is only
/// touched when `contact.avatar` is set, and an empty avatar removes it.
pub fn update_contact(conn: &Connection, contact: &Contact) -> ContactsResult<()> {
    let contact_id = existing_contact(conn, Some(&contact.identifier))?;
    let raws = contact_repo::raw_contacts_for(conn, contact_id)?;
    let first = raws.first().ok_or_else(|| not_found(contact_id))?;
    let owner = Owner::Existing(first.id);

    let contact_arg = Value::Integer(contact_id.value);
    let rows_of = |kind: MimeKind| {
        vec![contact_arg.clone(), Value::Text(kind.mime().to_string())]
    };

    let mut ops: Vec<Operation> = REPLACED_KINDS
        .iter()
        .map(|kind| Operation::delete(Table::Data).with_selection(CONTACT_ROWS_OF_KIND, rows_of(*kind)))
        .collect();

    let mut birthday_args = rows_of(MimeKind::Event);
    birthday_args.push(Value::Integer(event::BIRTHDAY));
    ops.push(
        Operation::delete(Table::Data)
            .with_selection(format!("{} AND type = ?", CONTACT_ROWS_OF_KIND), birthday_args),
    );

    if contact_repo::has_kind(conn, contact_id, MimeKind::Name)? {
        ops.push(with_name_values(
            Operation::update(Table::Data).with_selection(CONTACT_ROWS_OF_KIND, rows_of(MimeKind::Name)),
            contact,
        ));
    } else {
        ops.push(with_name_values(data_insert(owner, MimeKind::Name), contact));
    }

    ops.extend(detail_inserts(owner, contact));

    if let Some(avatar) = &contact.avatar {
        ops.push(Operation::delete(Table::Data).with_selection(CONTACT_ROWS_OF_KIND, rows_of(MimeKind::Photo)));
        if !avatar.is_empty() {
            ops.push(photo_insert(owner, avatar));
        }
    }

    apply_batch(conn, &ops)?;
    info!(contact_id = contact_id.value, "contact updated");
    Ok(())
}

/// Delete a contact with all of its raw contacts and data rows.
pub fn delete_contact(conn: &Connection, identifier: Option<&str>) -> ContactsResult<()> {
    let contact_id = existing_contact(conn, identifier)?;
    let ops = [Operation::delete(Table::RawContacts)
        .with_selection("contact_id = ?", vec![Value::Integer(contact_id.value)])];
    apply_batch(conn, &ops)?;
    info!(contact_id = contact_id.value, "contact deleted");
    Ok(())
}

fn existing_contact(conn: &Connection, identifier: Option<&str>) -> ContactsResult<Id<Contact>> {
    let identifier = validation::identifier(identifier)?;
    let contact_id = Id::new(validation::numeric_id(&identifier)?);
    if !contact_repo::contact_exists(conn, contact_id)? {
        return Err(not_found(contact_id));
    }
    Ok(contact_id)
}

fn not_found(contact_id: Id<Contact>) -> ContactsError {
    ContactsError::NotFound {
        entity_type: "Contact".into(),
        id: contact_id.to_string(),
    }
}
