use rusqlite::Connection;

use crate::db::contact_repo;
use crate::error::ContactsResult;
use crate::model::{Contact, Id};

/// Photo bytes of a contact as stored by the provider. `None` when there is
/// no identifier, the identifier is not a provider id, or no photo exists.
pub fn load_avatar(
    conn: &Connection,
    identifier: Option<&str>,
    high_res: bool,
) -> ContactsResult<Option<Vec<u8>>> {
    let Some(Ok(id)) = identifier.map(Id::<Contact>::parse) else {
        return Ok(None);
    };
    contact_repo::find_photo(conn, id, high_res)
}
