use rusqlite::Connection;

use crate::error::ContactsResult;

/// Initialize the provider schema. Creates all tables, triggers and views
/// if they don't exist.
pub fn initialize(conn: &Connection) -> ContactsResult<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS contacts (
            _id INTEGER PRIMARY KEY AUTOINCREMENT
        );

        CREATE TABLE IF NOT EXISTS raw_contacts (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            contact_id INTEGER REFERENCES contacts(_id),
            account_type TEXT,
            account_name TEXT
        );

        CREATE TABLE IF NOT EXISTS data (
            _id INTEGER PRIMARY KEY AUTOINCREMENT,
            raw_contact_id INTEGER NOT NULL REFERENCES raw_contacts(_id) ON DELETE CASCADE,
            mimetype TEXT NOT NULL,
            is_super_primary INTEGER NOT NULL DEFAULT 0,
            name_display_name TEXT,
            given_name TEXT,
            middle_name TEXT,
            family_name TEXT,
            prefix TEXT,
            suffix TEXT,
            note TEXT,
            number TEXT,
            address TEXT,
            type INTEGER,
            label TEXT,
            company TEXT,
            title TEXT,
            street TEXT,
            city TEXT,
            region TEXT,
            postcode TEXT,
            country TEXT,
            start_date TEXT,
            photo BLOB,
            display_photo BLOB
        );

        CREATE INDEX IF NOT EXISTS data_raw_contact_idx ON data(raw_contact_id, mimetype);

        -- A raw contact inserted without a contact gets a contact of its own.
        CREATE TRIGGER IF NOT EXISTS raw_contacts_join AFTER INSERT ON raw_contacts
        WHEN NEW.contact_id IS NULL
        BEGIN
            INSERT INTO contacts DEFAULT VALUES;
            UPDATE raw_contacts SET contact_id = last_insert_rowid() WHERE _id = NEW._id;
        END;

        CREATE TRIGGER IF NOT EXISTS raw_contacts_orphan AFTER DELETE ON raw_contacts
        BEGIN
            DELETE FROM contacts
            WHERE _id = OLD.contact_id
              AND NOT EXISTS (SELECT 1 FROM raw_contacts WHERE contact_id = OLD.contact_id);
        END;

        CREATE VIEW IF NOT EXISTS data_view AS
        SELECT
            d._id, d.raw_contact_id, r.contact_id, d.mimetype, d.is_super_primary,
            (SELECT n.name_display_name
               FROM data n JOIN raw_contacts nr ON n.raw_contact_id = nr._id
              WHERE nr.contact_id = r.contact_id
                AND n.mimetype = 'vnd.android.cursor.item/name'
              ORDER BY n._id LIMIT 1) AS display_name,
            r.account_type, r.account_name,
            d.name_display_name, d.given_name, d.middle_name, d.family_name, d.prefix, d.suffix,
            d.note, d.number, d.address, d.type, d.label, d.company, d.title,
            d.street, d.city, d.region, d.postcode, d.country, d.start_date,
            d.photo, d.display_photo
        FROM data d JOIN raw_contacts r ON d.raw_contact_id = r._id;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
