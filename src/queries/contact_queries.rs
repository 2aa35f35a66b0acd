use rusqlite::types::Value;
use rusqlite::Connection;

use crate::aggregate;
use crate::db::columns::MimeKind;
use crate::db::contact_repo;
use crate::error::ContactsResult;
use crate::labels::{LabelMode, LabelService};
use crate::model::{Contact, Id};

/// Digits compared from the end when both numbers are long enough.
const PHONE_MATCH_DIGITS: usize = 7;

/// Flags shared by the contact read paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub with_thumbnails: bool,
    pub photo_high_resolution: bool,
    pub order_by_given_name: bool,
    pub localized_labels: bool,
}

/// Contacts whose display name starts with `query`, or every contact when
/// there is no query. `contact_id` restricts the result to one contact.
pub fn get_contacts(
    conn: &Connection,
    query: Option<&str>,
    contact_id: Option<&str>,
    options: QueryOptions,
    labels: Option<&dyn LabelService>,
) -> ContactsResult<Vec<Contact>> {
    let (mut selection, mut args) = match query {
        Some(q) => (
            "display_name LIKE ? ESCAPE '\\'".to_string(),
            vec![Value::Text(format!("{}%", like_escaped(q)))],
        ),
        None => contact_repo::aggregated_kinds_selection(),
    };

    if let Some(id) = contact_id {
        let Ok(id) = Id::<Contact>::parse(id) else {
            return Ok(Vec::new());
        };
        selection = format!("({}) AND contact_id = ?", selection);
        args.push(Value::Integer(id.value));
    }

    let mode = LabelMode::select(options.localized_labels, labels);
    let contacts = contact_repo::fold_query(conn, &selection, &args, mode)?;
    finish(conn, contacts, options)
}

/// The contact with this identifier, or `None` when nothing matches.
pub fn contact_by_identifier(
    conn: &Connection,
    identifier: &str,
    mode: LabelMode<'_>,
) -> ContactsResult<Option<Contact>> {
    let Ok(id) = Id::<Contact>::parse(identifier) else {
        return Ok(None);
    };
    let contacts = contact_repo::fold_query(conn, "contact_id = ?", &[Value::Integer(id.value)], mode)?;
    Ok(contacts.into_iter().next())
}

/// Contacts owning a phone number that matches `phone`.
pub fn contacts_for_phone(
    conn: &Connection,
    phone: &str,
    options: QueryOptions,
    labels: Option<&dyn LabelService>,
) -> ContactsResult<Vec<Contact>> {
    if phone.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<i64> = Vec::new();
    for (contact_id, number) in contact_repo::phone_numbers(conn)? {
        if numbers_match(phone, &number) && !ids.contains(&contact_id) {
            ids.push(contact_id);
        }
    }
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let selection = format!("contact_id IN ({})", vec!["?"; ids.len()].join(", "));
    let args: Vec<Value> = ids.into_iter().map(Value::Integer).collect();
    let mode = LabelMode::select(options.localized_labels, labels);
    let contacts = contact_repo::fold_query(conn, &selection, &args, mode)?;
    finish(conn, contacts, options)
}

/// Contacts with an email address containing `email`.
pub fn contacts_for_email(
    conn: &Connection,
    email: &str,
    options: QueryOptions,
    labels: Option<&dyn LabelService>,
) -> ContactsResult<Vec<Contact>> {
    if email.is_empty() {
        return Ok(Vec::new());
    }

    let selection =
        "contact_id IN (SELECT contact_id FROM data_view WHERE mimetype = ? AND address LIKE ? ESCAPE '\\')";
    let args = vec![
        Value::Text(MimeKind::Email.mime().to_string()),
        Value::Text(format!("%{}%", like_escaped(email))),
    ];
    let mode = LabelMode::select(options.localized_labels, labels);
    let contacts = contact_repo::fold_query(conn, selection, &args, mode)?;
    finish(conn, contacts, options)
}

fn finish(
    conn: &Connection,
    mut contacts: Vec<Contact>,
    options: QueryOptions,
) -> ContactsResult<Vec<Contact>> {
    if options.with_thumbnails {
        for contact in contacts.iter_mut() {
            let photo = match Id::<Contact>::parse(&contact.identifier) {
                Ok(id) => contact_repo::find_photo(conn, id, options.photo_high_resolution)?,
                Err(_) => None,
            };
            contact.avatar = Some(photo.unwrap_or_default());
        }
    }

    if options.order_by_given_name {
        aggregate::sort_by_given_name(&mut contacts);
    }

    Ok(contacts)
}

/// `text` as a literal inside a `LIKE ... ESCAPE '\'` pattern.
fn like_escaped(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn digits(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

/// Loose phone number comparison: equal digits, or equal trailing digits
/// when both numbers are long enough to carry a subscriber number.
pub fn numbers_match(a: &str, b: &str) -> bool {
    let (a, b) = (digits(a), digits(b));
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    a.len() >= PHONE_MATCH_DIGITS
        && b.len() >= PHONE_MATCH_DIGITS
        && a[a.len() - PHONE_MATCH_DIGITS..] == b[b.len() - PHONE_MATCH_DIGITS..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_escaped_quotes_wildcards() {
        assert_eq!(like_escaped("a_b%c\\d"), "a\\_b\\%c\\\\d");
        assert_eq!(like_escaped("ann@example.com"), "ann@example.com");
    }

    #[test]
    fn numbers_match_ignores_formatting() {
        assert!(numbers_match("(555) 123-4567", "555.123.4567"));
    }

    #[test]
    fn numbers_match_with_country_code() {
        assert!(numbers_match("+33 6 12 34 56 78", "06 12 34 56 78"));
    }

    #[test]
    fn short_numbers_must_be_equal() {
        assert!(numbers_match("555", "555"));
        assert!(!numbers_match("555", "1555"));
    }

    #[test]
    fn numbers_without_digits_never_match() {
        assert!(!numbers_match("abc", "abc"));
    }
}
