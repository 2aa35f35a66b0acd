use std::sync::{Arc, Mutex};

use contacts_service::channel::{
    ContactsPlugin, ContactsUi, MethodCall, MethodResult, Reply, UiCompletion, UiOutcome,
};
use contacts_service::config::ServiceConfig;
use contacts_service::db::columns::phone;
use contacts_service::db::schema;
use contacts_service::model::{Contact, Id, Item};
use contacts_service::ops::contact_ops;
use serde_json::{json, Value};
use tokio::runtime::Handle;

/// A plugin over a provider holding one contact, Ann.
fn setup() -> (ContactsPlugin, Id<Contact>) {
    let conn = schema::test_connection();
    let mut ann = Contact::new("");
    ann.given_name = Some("Ann".into());
    ann.family_name = Some("Lee".into());
    ann.phones.push(Item::new("home", "555", phone::HOME));
    ann.avatar = Some(vec![5, 6]);
    let id = contact_ops::add_contact(&conn, &ann).unwrap();

    let plugin = ContactsPlugin::new(conn, &ServiceConfig::default(), Handle::current());
    (plugin, id)
}

async fn call(plugin: &ContactsPlugin, method: &str, arguments: Value) -> MethodResult {
    let (reply, pending) = Reply::channel();
    plugin.handle(MethodCall::new(method, arguments), reply);
    pending.wait().await.expect("request answered")
}

fn success(result: MethodResult) -> Value {
    match result {
        MethodResult::Success(value) => value,
        other => panic!("expected success, got {:?}", other),
    }
}

/// Completes every screen with a fixed outcome and records what was opened.
struct ScriptedUi {
    outcome: Option<UiOutcome>,
    opened: Mutex<Vec<String>>,
}

impl ScriptedUi {
    fn new(outcome: Option<UiOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            opened: Mutex::new(Vec::new()),
        })
    }

    fn finish(&self, screen: String, done: UiCompletion) {
        self.opened.lock().unwrap().push(screen);
        match &self.outcome {
            Some(outcome) => done.complete(outcome.clone()),
            // Screen never reports back.
            None => drop(done),
        }
    }
}

impl ContactsUi for ScriptedUi {
    fn open_contact_form(&self, done: UiCompletion) {
        self.finish("form".into(), done);
    }

    fn open_existing_contact(&self, identifier: &str, done: UiCompletion) {
        self.finish(format!("existing:{}", identifier), done);
    }

    fn pick_contact(&self, done: UiCompletion) {
        self.finish("picker".into(), done);
    }
}

// ==========================================================================
// PROVIDER METHODS
// ==========================================================================

#[tokio::test(flavor = "multi_thread")]
async fn unknown_method_is_not_implemented() {
    let (plugin, _) = setup();
    assert_eq!(call(&plugin, "getGroups", Value::Null).await, MethodResult::NotImplemented);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_contacts_returns_wire_maps() {
    let (plugin, id) = setup();
    let value = success(call(&plugin, "getContacts", json!({"withThumbnails": true})).await);

    let contacts = value.as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["identifier"], id.to_string());
    assert_eq!(contacts[0]["displayName"], "Ann Lee");
    assert_eq!(contacts[0]["middleName"], "");
    assert_eq!(contacts[0]["phones"], json!([{"label": "home", "value": "555", "type": "1"}]));
    assert_eq!(contacts[0]["avatar"], json!([5, 6]));
}

#[tokio::test(flavor = "multi_thread")]
async fn phone_and_email_lookups() {
    let (plugin, id) = setup();
    let found = success(call(&plugin, "getContactsForPhone", json!({"phone": "555"})).await);
    assert_eq!(found[0]["identifier"], id.to_string());

    let found = success(call(&plugin, "getContactsForEmail", json!({"email": "nobody@"})).await);
    assert_eq!(found, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn add_update_delete_through_channel() {
    let (plugin, _) = setup();

    let added = call(
        &plugin,
        "addContact",
        json!({"givenName": "Bob", "phones": [{"label": "work", "value": "777", "type": 3}]}),
    )
    .await;
    assert_eq!(added, MethodResult::Success(Value::Null));

    let all = success(call(&plugin, "getContacts", json!({"query": "Bob"})).await);
    let bob = all[0].clone();
    assert_eq!(bob["phones"][0]["value"], "777");

    let mut changed = bob.clone();
    changed["familyName"] = json!("Roe");
    assert_eq!(call(&plugin, "updateContact", changed).await, MethodResult::Success(Value::Null));
    let all = success(call(&plugin, "getContacts", json!({"query": "Bob"})).await);
    assert_eq!(all[0]["displayName"], "Bob Roe");

    assert_eq!(call(&plugin, "deleteContact", bob).await, MethodResult::Success(Value::Null));
    let all = success(call(&plugin, "getContacts", json!({"query": "Bob"})).await);
    assert_eq!(all, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_without_valid_identifier_is_null_error() {
    let (plugin, _) = setup();
    for contact in [json!({"givenName": "Nobody"}), json!({"identifier": "404"})] {
        match call(&plugin, "deleteContact", contact).await {
            MethodResult::Error { code, message, .. } => {
                assert_eq!(code, "null");
                assert_eq!(message, "Failed to delete the contact, make sure it has a valid identifier");
            }
            other => panic!("expected error, got {:?}", other),
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn update_unknown_contact_is_null_error() {
    let (plugin, _) = setup();
    let result = call(&plugin, "updateContact", json!({"identifier": "404"})).await;
    assert!(matches!(result, MethodResult::Error { ref code, .. } if code == "null"));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_avatar_bytes_or_null() {
    let (plugin, id) = setup();
    let avatar = call(&plugin, "getAvatar", json!({"contact": {"identifier": id.to_string()}})).await;
    assert_eq!(avatar, MethodResult::Success(json!([5, 6])));

    let avatar = call(&plugin, "getAvatar", json!({"contact": {"identifier": "404"}})).await;
    assert_eq!(avatar, MethodResult::Success(Value::Null));
}

// ==========================================================================
// UI METHODS
// ==========================================================================

#[tokio::test(flavor = "multi_thread")]
async fn ui_methods_without_ui_could_not_open() {
    let (plugin, id) = setup();
    let existing = json!({"contact": {"identifier": id.to_string()}});
    for (method, args) in [
        ("openContactForm", Value::Null),
        ("openDeviceContactPicker", Value::Null),
        ("openExistingContact", existing),
    ] {
        assert_eq!(call(&plugin, method, args).await, MethodResult::Success(json!(2)), "{}", method);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn picker_returns_picked_contact() {
    let (plugin, id) = setup();
    let ui = ScriptedUi::new(Some(UiOutcome::Completed(Some(id.to_string()))));
    let plugin = plugin.with_ui(ui.clone());

    let picked = success(call(&plugin, "openDeviceContactPicker", Value::Null).await);
    assert_eq!(picked.as_array().unwrap().len(), 1);
    assert_eq!(picked[0]["givenName"], "Ann");
    assert_eq!(*ui.opened.lock().unwrap(), vec!["picker".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn picker_cancel_and_abandon() {
    let (plugin, _) = setup();
    let plugin = plugin.with_ui(ScriptedUi::new(Some(UiOutcome::Canceled)));
    assert_eq!(call(&plugin, "openDeviceContactPicker", Value::Null).await, MethodResult::Success(json!(1)));

    let (plugin, _) = setup();
    let plugin = plugin.with_ui(ScriptedUi::new(None));
    assert_eq!(call(&plugin, "openDeviceContactPicker", Value::Null).await, MethodResult::Success(json!(1)));

    let (plugin, _) = setup();
    let plugin = plugin.with_ui(ScriptedUi::new(Some(UiOutcome::CouldNotOpen)));
    assert_eq!(call(&plugin, "openDeviceContactPicker", Value::Null).await, MethodResult::Success(json!(2)));
}

#[tokio::test(flavor = "multi_thread")]
async fn form_reports_saved_contact() {
    let (plugin, id) = setup();
    let plugin = plugin.with_ui(ScriptedUi::new(Some(UiOutcome::Completed(Some(id.to_string())))));
    let saved = success(call(&plugin, "openContactForm", Value::Null).await);
    assert_eq!(saved["identifier"], id.to_string());
    assert_eq!(saved["familyName"], "Lee");

    let (plugin, _) = setup();
    let plugin = plugin.with_ui(ScriptedUi::new(Some(UiOutcome::Completed(None))));
    assert_eq!(call(&plugin, "openContactForm", Value::Null).await, MethodResult::Success(Value::Null));
}

#[tokio::test(flavor = "multi_thread")]
async fn existing_contact_must_exist() {
    let (plugin, id) = setup();
    let ui = ScriptedUi::new(Some(UiOutcome::Canceled));
    let plugin = plugin.with_ui(ui.clone());

    let missing = call(&plugin, "openExistingContact", json!({"contact": {"identifier": "404"}})).await;
    assert_eq!(missing, MethodResult::Success(json!(2)));
    assert!(ui.opened.lock().unwrap().is_empty());

    let args = json!({"contact": {"identifier": id.to_string()}});
    assert_eq!(call(&plugin, "openExistingContact", args).await, MethodResult::Success(json!(1)));
    assert_eq!(*ui.opened.lock().unwrap(), vec![format!("existing:{}", id)]);
}
