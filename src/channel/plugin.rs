use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde_json::{json, Value};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use super::codec;
use super::reply::{MethodResult, Reply};
use super::ui::{ContactsUi, UiCompletion, UiOutcome, FORM_COULD_NOT_BE_OPEN, FORM_OPERATION_CANCELED};
use super::MethodCall;
use crate::config::ServiceConfig;
use crate::error::{ContactsError, ContactsResult};
use crate::labels::{LabelMode, LabelService, StockLabels};
use crate::ops::{avatar_ops, contact_ops};
use crate::queries::contact_queries::{self, QueryOptions};

/// State shared by every in-flight request.
struct Shared {
    conn: Mutex<Connection>,
    labels: Option<Arc<dyn LabelService>>,
}

impl Shared {
    fn with_conn<T, F>(&self, work: F) -> ContactsResult<T>
    where
        F: FnOnce(&Connection, Option<&dyn LabelService>) -> ContactsResult<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ContactsError::Other("provider connection lock poisoned".into()))?;
        work(&conn, self.labels.as_deref())
    }
}

/// Run provider work on the blocking pool.
async fn run_blocking<T, F>(shared: Arc<Shared>, work: F) -> ContactsResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Connection, Option<&dyn LabelService>) -> ContactsResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || shared.with_conn(work))
        .await
        .map_err(|e| ContactsError::Other(format!("provider task failed: {}", e)))?
}

/// How a failed call is reported.
#[derive(Debug, Clone, Copy)]
struct Failure {
    prefix: &'static str,
    /// Reply for a request naming no usable contact, if it differs.
    bad_identifier: Option<&'static str>,
}

impl Failure {
    const READ: Failure = Failure {
        prefix: "",
        bad_identifier: None,
    };
    const ADD: Failure = Failure {
        prefix: "Failed to add contact: ",
        bad_identifier: None,
    };
    const DELETE: Failure = Failure {
        prefix: "Failed to delete contact: ",
        bad_identifier: Some("Failed to delete the contact, make sure it has a valid identifier"),
    };
    const UPDATE: Failure = Failure {
        prefix: "Failed to update contact: ",
        bad_identifier: Some("Failed to update the contact, make sure it has a valid identifier"),
    };

    fn reply_for(self, e: &ContactsError) -> MethodResult {
        warn!(error = %e, "method call failed");
        match (self.bad_identifier, e) {
            (
                Some(message),
                ContactsError::MissingIdentifier
                | ContactsError::NotFound { .. }
                | ContactsError::InvalidArgument { .. },
            ) => MethodResult::error("null", message),
            _ => MethodResult::error("ERROR", format!("{}{}", self.prefix, e)),
        }
    }
}

/// Method-channel handler over a contacts provider.
///
/// `handle` returns immediately; provider work runs on the runtime's
/// blocking pool and the request's `Reply` is sent when it finishes.
pub struct ContactsPlugin {
    shared: Arc<Shared>,
    ui: Option<Arc<dyn ContactsUi>>,
    runtime: Handle,
    channel_name: String,
    localized_default: bool,
}

impl ContactsPlugin {
    /// A plugin using the stock labels for localized mode and no UI.
    pub fn new(conn: Connection, config: &ServiceConfig, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                conn: Mutex::new(conn),
                labels: Some(Arc::new(StockLabels)),
            }),
            ui: None,
            runtime,
            channel_name: config.channel_name.clone(),
            localized_default: config.localized_labels,
        }
    }

    /// Replace the localized label service. `None` makes localized requests
    /// fall back to the fixed labels.
    pub fn with_label_service(mut self, labels: Option<Arc<dyn LabelService>>) -> Self {
        match Arc::get_mut(&mut self.shared).map(|s| &mut s.labels) {
            Some(slot) => *slot = labels,
            None => warn!("label service not replaced, plugin already shared"),
        }
        self
    }

    pub fn with_ui(mut self, ui: Arc<dyn ContactsUi>) -> Self {
        self.ui = Some(ui);
        self
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn handle(&self, call: MethodCall, reply: Reply) {
        debug!(method = %call.method, "method call");
        let localized = call.argument_bool("androidLocalizedLabels", self.localized_default);

        match call.method.as_str() {
            "getContacts" => {
                let options = call.query_options(self.localized_default);
                let query = call.argument_str("query").map(str::to_string);
                self.spawn_provider(reply, Failure::READ, move |conn, labels| {
                    let contacts =
                        contact_queries::get_contacts(conn, query.as_deref(), None, options, labels)?;
                    Ok(codec::contacts_to_value(&contacts))
                });
            }
            "getContactsForPhone" => {
                let options = call.query_options(self.localized_default);
                let phone = call.argument_str("phone").unwrap_or_default().to_string();
                self.spawn_provider(reply, Failure::READ, move |conn, labels| {
                    let contacts = contact_queries::contacts_for_phone(conn, &phone, options, labels)?;
                    Ok(codec::contacts_to_value(&contacts))
                });
            }
            "getContactsForEmail" => {
                let options = call.query_options(self.localized_default);
                let email = call.argument_str("email").unwrap_or_default().to_string();
                self.spawn_provider(reply, Failure::READ, move |conn, labels| {
                    let contacts = contact_queries::contacts_for_email(conn, &email, options, labels)?;
                    Ok(codec::contacts_to_value(&contacts))
                });
            }
            "getAvatar" => {
                let contact = codec::contact_from_value(call.argument("contact").unwrap_or(&Value::Null));
                let high_res = call.argument_bool("photoHighResolution", false);
                self.spawn_provider(reply, Failure::READ, move |conn, _| {
                    let avatar = avatar_ops::load_avatar(conn, Some(&contact.identifier), high_res)?;
                    Ok(avatar.map(Value::from).unwrap_or(Value::Null))
                });
            }
            "addContact" => {
                let contact = codec::contact_from_value(&call.arguments);
                self.spawn_provider(reply, Failure::ADD, move |conn, _| {
                    contact_ops::add_contact(conn, &contact)?;
                    Ok(Value::Null)
                });
            }
            "deleteContact" => {
                let contact = codec::contact_from_value(&call.arguments);
                self.spawn_provider(reply, Failure::DELETE, move |conn, _| {
                    contact_ops::delete_contact(conn, Some(&contact.identifier))?;
                    Ok(Value::Null)
                });
            }
            "updateContact" => {
                let contact = codec::contact_from_value(&call.arguments);
                self.spawn_provider(reply, Failure::UPDATE, move |conn, _| {
                    contact_ops::update_contact(conn, &contact)?;
                    Ok(Value::Null)
                });
            }
            "openExistingContact" => {
                let contact = codec::contact_from_value(call.argument("contact").unwrap_or(&Value::Null));
                self.open_existing_contact(contact.identifier, localized, reply);
            }
            "openContactForm" => self.open_contact_form(localized, reply),
            "openDeviceContactPicker" => self.open_contact_picker(localized, reply),
            other => {
                debug!(method = other, "method not implemented");
                reply.send(MethodResult::NotImplemented);
            }
        }
    }

    fn spawn_provider<F>(&self, reply: Reply, failure: Failure, work: F)
    where
        F: FnOnce(&Connection, Option<&dyn LabelService>) -> ContactsResult<Value> + Send + 'static,
    {
        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            let result = match run_blocking(shared, work).await {
                Ok(value) => MethodResult::Success(value),
                Err(e) => failure.reply_for(&e),
            };
            reply.send(result);
        });
    }

    fn open_contact_form(&self, localized: bool, reply: Reply) {
        let Some(ui) = self.ui.clone() else {
            reply.success(json!(FORM_COULD_NOT_BE_OPEN));
            return;
        };
        let (done, outcome) = UiCompletion::new();
        ui.open_contact_form(done);

        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            let outcome = outcome.await.unwrap_or(UiOutcome::Canceled);
            reply.send(form_result(shared, outcome, localized).await);
        });
    }

    fn open_existing_contact(&self, identifier: String, localized: bool, reply: Reply) {
        let Some(ui) = self.ui.clone() else {
            reply.success(json!(FORM_COULD_NOT_BE_OPEN));
            return;
        };

        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            let id = identifier.clone();
            let exists = run_blocking(shared.clone(), move |conn, labels| {
                let mode = LabelMode::select(localized, labels);
                Ok(contact_queries::contact_by_identifier(conn, &id, mode)?.is_some())
            })
            .await;

            match exists {
                Ok(true) => {}
                Ok(false) => {
                    debug!(identifier = %identifier, "existing contact not found");
                    reply.success(json!(FORM_COULD_NOT_BE_OPEN));
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "existing contact lookup failed");
                    reply.success(json!(FORM_COULD_NOT_BE_OPEN));
                    return;
                }
            }

            let (done, outcome) = UiCompletion::new();
            ui.open_existing_contact(&identifier, done);
            let outcome = outcome.await.unwrap_or(UiOutcome::Canceled);
            reply.send(form_result(shared, outcome, localized).await);
        });
    }

    fn open_contact_picker(&self, localized: bool, reply: Reply) {
        let Some(ui) = self.ui.clone() else {
            reply.success(json!(FORM_COULD_NOT_BE_OPEN));
            return;
        };
        let (done, outcome) = UiCompletion::new();
        ui.pick_contact(done);

        let shared = self.shared.clone();
        self.runtime.spawn(async move {
            let result = match outcome.await.unwrap_or(UiOutcome::Canceled) {
                UiOutcome::Completed(Some(id)) => {
                    let picked = run_blocking(shared, move |conn, labels| {
                        let options = QueryOptions {
                            localized_labels: localized,
                            ..QueryOptions::default()
                        };
                        contact_queries::get_contacts(conn, None, Some(&id), options, labels)
                    })
                    .await;
                    match picked {
                        Ok(contacts) => MethodResult::Success(codec::contacts_to_value(&contacts)),
                        Err(e) => {
                            warn!(error = %e, "picked contact lookup failed");
                            MethodResult::Success(json!(FORM_OPERATION_CANCELED))
                        }
                    }
                }
                UiOutcome::Completed(None) | UiOutcome::Canceled => {
                    MethodResult::Success(json!(FORM_OPERATION_CANCELED))
                }
                UiOutcome::CouldNotOpen => MethodResult::Success(json!(FORM_COULD_NOT_BE_OPEN)),
            };
            reply.send(result);
        });
    }
}

/// Reply for a closed contact form: the saved contact when the form reports
/// one, `null` when it doesn't, or a form code.
async fn form_result(shared: Arc<Shared>, outcome: UiOutcome, localized: bool) -> MethodResult {
    match outcome {
        UiOutcome::Completed(Some(id)) => {
            let saved = run_blocking(shared, move |conn, labels| {
                let mode = LabelMode::select(localized, labels);
                contact_queries::contact_by_identifier(conn, &id, mode)
            })
            .await;
            match saved {
                Ok(Some(contact)) => MethodResult::Success(codec::contact_to_value(&contact)),
                Ok(None) => MethodResult::Success(json!(FORM_OPERATION_CANCELED)),
                Err(e) => {
                    warn!(error = %e, "saved contact lookup failed");
                    MethodResult::Success(json!(FORM_OPERATION_CANCELED))
                }
            }
        }
        UiOutcome::Completed(None) => MethodResult::Success(Value::Null),
        UiOutcome::Canceled => MethodResult::Success(json!(FORM_OPERATION_CANCELED)),
        UiOutcome::CouldNotOpen => MethodResult::Success(json!(FORM_COULD_NOT_BE_OPEN)),
    }
}
