use contacts_service::db::columns::{phone, TYPE_CUSTOM};
use contacts_service::db::schema;
use contacts_service::labels::{LabelMode, StockLabels};
use contacts_service::model::{Contact, Id, Item};
use contacts_service::ops::contact_ops;
use contacts_service::queries::contact_queries::{self, numbers_match, QueryOptions};
use rusqlite::Connection;

struct People {
    ann: Id<Contact>,
    bob: Id<Contact>,
    annie: Id<Contact>,
}

fn person(given: &str, family: &str) -> Contact {
    let mut c = Contact::new("");
    c.given_name = Some(given.into());
    c.family_name = Some(family.into());
    c
}

fn setup() -> (Connection, People) {
    let conn = schema::test_connection();

    let mut ann = person("Ann", "Lee");
    ann.phones.push(Item::new("mobile", "+1 (415) 555-0100", phone::MOBILE));
    ann.emails.push(Item::new("home", "ann@example.com", 1));
    ann.avatar = Some(vec![4, 2]);

    let mut bob = person("Bob", "Roe");
    bob.phones.push(Item::new("Gym", "555-0199", TYPE_CUSTOM));
    bob.emails.push(Item::new("work", "bob@corp.example", 2));

    let annie = person("Annie", "Hall");

    let people = People {
        ann: contact_ops::add_contact(&conn, &ann).unwrap(),
        bob: contact_ops::add_contact(&conn, &bob).unwrap(),
        annie: contact_ops::add_contact(&conn, &annie).unwrap(),
    };
    (conn, people)
}

fn ids(contacts: &[Contact]) -> Vec<String> {
    contacts.iter().map(|c| c.identifier.clone()).collect()
}

// ==========================================================================
// GET CONTACTS
// ==========================================================================

#[test]
fn all_contacts_in_insertion_order() {
    let (conn, p) = setup();
    let contacts = contact_queries::get_contacts(&conn, None, None, QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&contacts), vec![p.ann.to_string(), p.bob.to_string(), p.annie.to_string()]);
    assert!(contacts.iter().all(|c| c.avatar.is_none()));
}

#[test]
fn query_matches_display_name_prefix() {
    let (conn, p) = setup();
    let contacts =
        contact_queries::get_contacts(&conn, Some("Ann"), None, QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&contacts), vec![p.ann.to_string(), p.annie.to_string()]);
    // Every row of a matching contact is folded, not just the name row.
    assert_eq!(contacts[0].phones.len(), 1);

    let none = contact_queries::get_contacts(&conn, Some("Lee"), None, QueryOptions::default(), None).unwrap();
    assert!(none.is_empty());
}

#[test]
fn contact_id_restricts_result() {
    let (conn, p) = setup();
    let id = p.bob.to_string();
    let contacts =
        contact_queries::get_contacts(&conn, None, Some(&id), QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&contacts), vec![id]);

    let bad = contact_queries::get_contacts(&conn, None, Some("x"), QueryOptions::default(), None).unwrap();
    assert!(bad.is_empty());
}

#[test]
fn thumbnails_fill_avatars() {
    let (conn, p) = setup();
    let options = QueryOptions {
        with_thumbnails: true,
        ..QueryOptions::default()
    };
    let contacts = contact_queries::get_contacts(&conn, None, None, options, None).unwrap();

    let ann = contacts.iter().find(|c| c.identifier == p.ann.to_string()).unwrap();
    let bob = contacts.iter().find(|c| c.identifier == p.bob.to_string()).unwrap();
    assert_eq!(ann.avatar, Some(vec![4, 2]));
    assert_eq!(bob.avatar, Some(Vec::new()));
}

#[test]
fn order_by_given_name() {
    let (conn, p) = setup();
    let options = QueryOptions {
        order_by_given_name: true,
        ..QueryOptions::default()
    };

    let mut zed = person("Zed", "Ax");
    zed.note = Some("last".into());
    let zed = contact_ops::add_contact(&conn, &zed).unwrap();
    let al = contact_ops::add_contact(&conn, &person("Al", "Bo")).unwrap();

    let contacts = contact_queries::get_contacts(&conn, None, None, options, None).unwrap();
    assert_eq!(
        ids(&contacts),
        vec![
            al.to_string(),
            p.ann.to_string(),
            p.annie.to_string(),
            p.bob.to_string(),
            zed.to_string()
        ]
    );
}

#[test]
fn localized_labels_use_label_service() {
    let (conn, p) = setup();
    let options = QueryOptions {
        localized_labels: true,
        ..QueryOptions::default()
    };

    let stock = StockLabels;
    let contacts = contact_queries::get_contacts(&conn, None, None, options, Some(&stock)).unwrap();
    let bob = contacts.iter().find(|c| c.identifier == p.bob.to_string()).unwrap();
    assert_eq!(bob.phones[0].label, "custom");
    assert_eq!(bob.emails[0].label, "work");

    // Without a service, localized requests use the fixed labels.
    let contacts = contact_queries::get_contacts(&conn, None, None, options, None).unwrap();
    let ann = contacts.iter().find(|c| c.identifier == p.ann.to_string()).unwrap();
    assert_eq!(ann.phones[0].label, "mobile");
}

// ==========================================================================
// PHONE AND EMAIL LOOKUP
// ==========================================================================

#[test]
fn phone_lookup_ignores_formatting() {
    let (conn, p) = setup();
    let found =
        contact_queries::contacts_for_phone(&conn, "4155550100", QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&found), vec![p.ann.to_string()]);

    let found =
        contact_queries::contacts_for_phone(&conn, "555 0199", QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&found), vec![p.bob.to_string()]);
}

#[test]
fn phone_lookup_without_match() {
    let (conn, _) = setup();
    assert!(contact_queries::contacts_for_phone(&conn, "123", QueryOptions::default(), None)
        .unwrap()
        .is_empty());
    assert!(contact_queries::contacts_for_phone(&conn, "", QueryOptions::default(), None)
        .unwrap()
        .is_empty());
}

#[test]
fn numbers_match_trailing_digits() {
    assert!(numbers_match("+1 415 555 0100", "(415) 555-0100"));
    assert!(numbers_match("555-0100", "5550100"));
    assert!(!numbers_match("555-0100", "555-0101"));
    assert!(!numbers_match("0100", "5550100"));
    assert!(!numbers_match("", ""));
}

#[test]
fn email_lookup_returns_full_contacts() {
    let (conn, p) = setup();
    let found =
        contact_queries::contacts_for_email(&conn, "corp.example", QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&found), vec![p.bob.to_string()]);
    assert_eq!(found[0].given_name.as_deref(), Some("Bob"));
    assert_eq!(found[0].phones.len(), 1);

    let found = contact_queries::contacts_for_email(&conn, "example", QueryOptions::default(), None).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn email_wildcards_match_literally() {
    let (conn, _) = setup();
    let mut underscored = person("Ada", "Byron");
    underscored.emails.push(Item::new("home", "a_b@x.org", 1));
    let underscored = contact_ops::add_contact(&conn, &underscored).unwrap();
    let mut plain = person("Axel", "Berg");
    plain.emails.push(Item::new("home", "axb@x.org", 1));
    contact_ops::add_contact(&conn, &plain).unwrap();

    let found = contact_queries::contacts_for_email(&conn, "a_b@", QueryOptions::default(), None).unwrap();
    assert_eq!(ids(&found), vec![underscored.to_string()]);

    let found = contact_queries::contacts_for_email(&conn, "%", QueryOptions::default(), None).unwrap();
    assert!(found.is_empty());
}

#[test]
fn name_prefix_wildcards_match_literally() {
    let (conn, _) = setup();
    let found = contact_queries::get_contacts(&conn, Some("_nn"), None, QueryOptions::default(), None).unwrap();
    assert!(found.is_empty());
}

#[test]
fn contact_by_identifier_missing() {
    let (conn, _) = setup();
    let mode = LabelMode::Fixed;
    assert!(contact_queries::contact_by_identifier(&conn, "999", mode).unwrap().is_none());
    assert!(contact_queries::contact_by_identifier(&conn, "abc", mode).unwrap().is_none());
}
