//! Contact maps as exchanged over the method channel.
//!
//! Outgoing maps always carry every key: absent values are `""`, the avatar
//! is a byte array, and subtype codes are decimal strings. Incoming maps may
//! omit anything.

use serde_json::{json, Map, Value};

use crate::model::{Contact, Item, PostalAddress};

/// Subtype code used when an incoming value has none.
const UNKNOWN_TYPE: i64 = -1;

pub fn contact_to_value(contact: &Contact) -> Value {
    let text = |v: &Option<String>| Value::String(v.clone().unwrap_or_default());
    json!({
        "identifier": contact.identifier,
        "displayName": text(&contact.display_name),
        "givenName": text(&contact.given_name),
        "middleName": text(&contact.middle_name),
        "familyName": text(&contact.family_name),
        "prefix": text(&contact.prefix),
        "suffix": text(&contact.suffix),
        "company": text(&contact.company),
        "jobTitle": text(&contact.job_title),
        "avatar": contact.avatar.clone().unwrap_or_default(),
        "note": text(&contact.note),
        "birthday": text(&contact.birthday),
        "androidAccountType": text(&contact.account_type),
        "androidAccountName": text(&contact.account_name),
        "emails": contact.emails.iter().map(item_to_value).collect::<Vec<_>>(),
        "phones": contact.phones.iter().map(item_to_value).collect::<Vec<_>>(),
        "postalAddresses": contact.postal_addresses.iter().map(address_to_value).collect::<Vec<_>>(),
    })
}

pub fn contacts_to_value(contacts: &[Contact]) -> Value {
    Value::Array(contacts.iter().map(contact_to_value).collect())
}

fn item_to_value(item: &Item) -> Value {
    json!({
        "label": item.label,
        "value": item.value,
        "type": item.kind.to_string(),
    })
}

fn address_to_value(address: &PostalAddress) -> Value {
    json!({
        "label": address.label,
        "street": address.street,
        "city": address.city,
        "postcode": address.postcode,
        "region": address.region,
        "country": address.country,
        "type": address.kind.to_string(),
    })
}

/// Decode a contact map. Anything that is not an object decodes as an
/// empty contact.
pub fn contact_from_value(value: &Value) -> Contact {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);
    let singular = |key: &str| string_of(map.get(key)).filter(|s| !s.is_empty());

    Contact {
        identifier: string_of(map.get("identifier")).unwrap_or_default(),
        display_name: singular("displayName"),
        given_name: singular("givenName"),
        middle_name: singular("middleName"),
        family_name: singular("familyName"),
        prefix: singular("prefix"),
        suffix: singular("suffix"),
        company: singular("company"),
        job_title: singular("jobTitle"),
        note: singular("note"),
        birthday: singular("birthday"),
        account_type: singular("androidAccountType"),
        account_name: singular("androidAccountName"),
        phones: objects(map.get("phones")).map(item_from_map).collect(),
        emails: objects(map.get("emails")).map(item_from_map).collect(),
        postal_addresses: objects(map.get("postalAddresses")).map(address_from_map).collect(),
        avatar: map.get("avatar").and_then(bytes_of),
    }
}

fn item_from_map(map: &Map<String, Value>) -> Item {
    Item {
        label: string_of(map.get("label")).unwrap_or_default(),
        value: string_of(map.get("value")).unwrap_or_default(),
        kind: type_of(map.get("type")),
    }
}

fn address_from_map(map: &Map<String, Value>) -> PostalAddress {
    let part = |key: &str| string_of(map.get(key)).unwrap_or_default();
    PostalAddress {
        label: part("label"),
        street: part("street"),
        city: part("city"),
        postcode: part("postcode"),
        region: part("region"),
        country: part("country"),
        kind: type_of(map.get("type")),
    }
}

/// Strings as-is, numbers and booleans in their display form.
fn string_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn type_of(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(UNKNOWN_TYPE),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(UNKNOWN_TYPE),
        _ => UNKNOWN_TYPE,
    }
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn bytes_of(value: &Value) -> Option<Vec<u8>> {
    value
        .as_array()?
        .iter()
        .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
        .collect()
}
