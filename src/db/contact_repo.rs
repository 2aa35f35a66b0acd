use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::columns::{Column, MimeKind, PROJECTION};
use crate::aggregate::Aggregator;
use crate::error::ContactsResult;
use crate::labels::LabelMode;
use crate::model::{Contact, Id, RawContact};

fn projection() -> String {
    PROJECTION
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run a `data_view` query and fold its rows into contacts.
///
/// `selection` uses `?` placeholders bound to `args`. Rows arrive in data
/// row order, so contacts come out in the order their first row was written.
pub fn fold_query(
    conn: &Connection,
    selection: &str,
    args: &[Value],
    mode: LabelMode<'_>,
) -> ContactsResult<Vec<Contact>> {
    let sql = format!(
        "SELECT {} FROM data_view WHERE {} ORDER BY _id",
        projection(),
        selection
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(args.iter()))?;

    let mut aggregator = Aggregator::new(mode);
    while let Some(row) = rows.next()? {
        aggregator.push(row);
    }
    Ok(aggregator.finish())
}

/// Selection matching rows of every aggregated kind.
pub fn aggregated_kinds_selection() -> (String, Vec<Value>) {
    let kinds = MimeKind::AGGREGATED;
    let clause = format!(
        "{} IN ({})",
        Column::Mimetype.name(),
        vec!["?"; kinds.len()].join(", ")
    );
    let args = kinds
        .iter()
        .map(|k| Value::Text(k.mime().to_string()))
        .collect();
    (clause, args)
}

pub fn contact_exists(conn: &Connection, contact_id: Id<Contact>) -> ContactsResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT _id FROM contacts WHERE _id = ?1",
            params![contact_id.value],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Whether any raw contact of the contact has a row of `kind`.
pub fn has_kind(conn: &Connection, contact_id: Id<Contact>, kind: MimeKind) -> ContactsResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM data_view WHERE contact_id = ?1 AND mimetype = ?2",
        params![contact_id.value, kind.mime()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn raw_contacts_for(conn: &Connection, contact_id: Id<Contact>) -> ContactsResult<Vec<RawContact>> {
    let mut stmt = conn.prepare(
        "SELECT _id, contact_id, account_type, account_name
         FROM raw_contacts WHERE contact_id = ?1 ORDER BY _id",
    )?;

    let raws = stmt
        .query_map(params![contact_id.value], |row| {
            Ok(RawContact {
                id: Id::new(row.get(0)?),
                contact_id: Id::new(row.get(1)?),
                account_type: row.get(2)?,
                account_name: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(raws)
}

/// Contact id of each raw contact with its numbers, for phone lookup.
pub fn phone_numbers(conn: &Connection) -> ContactsResult<Vec<(i64, String)>> {
    let mut stmt = conn.prepare(
        "SELECT contact_id, number FROM data_view
         WHERE mimetype = ?1 AND number IS NOT NULL ORDER BY _id",
    )?;

    let numbers = stmt
        .query_map(params![MimeKind::Phone.mime()], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(numbers)
}

/// Stored photo bytes. High resolution prefers the display photo and falls
/// back to the thumbnail.
pub fn find_photo(
    conn: &Connection,
    contact_id: Id<Contact>,
    high_res: bool,
) -> ContactsResult<Option<Vec<u8>>> {
    let mut stmt = conn.prepare(
        "SELECT photo, display_photo FROM data_view
         WHERE contact_id = ?1 AND mimetype = ?2
         ORDER BY is_super_primary DESC, _id LIMIT 1",
    )?;

    let found: Option<(Option<Vec<u8>>, Option<Vec<u8>>)> = stmt
        .query_row(params![contact_id.value, MimeKind::Photo.mime()], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    Ok(found.and_then(|(thumbnail, display)| {
        if high_res {
            display.or(thumbnail)
        } else {
            thumbnail
        }
    }))
}
