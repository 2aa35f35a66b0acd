//! Column catalogue and constants of the contacts provider.

/// A column of `data_view` (and, for the data-specific ones, of `data`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DataId,
    RawContactId,
    ContactId,
    Mimetype,
    DisplayName,
    AccountType,
    AccountName,
    StructuredDisplayName,
    GivenName,
    MiddleName,
    FamilyName,
    Prefix,
    Suffix,
    Note,
    Number,
    EmailAddress,
    Type,
    Label,
    Company,
    Title,
    Street,
    City,
    Region,
    Postcode,
    Country,
    StartDate,
    IsSuperPrimary,
    Photo,
    DisplayPhoto,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::DataId => "_id",
            Column::RawContactId => "raw_contact_id",
            Column::ContactId => "contact_id",
            Column::Mimetype => "mimetype",
            Column::DisplayName => "display_name",
            Column::AccountType => "account_type",
            Column::AccountName => "account_name",
            Column::StructuredDisplayName => "name_display_name",
            Column::GivenName => "given_name",
            Column::MiddleName => "middle_name",
            Column::FamilyName => "family_name",
            Column::Prefix => "prefix",
            Column::Suffix => "suffix",
            Column::Note => "note",
            Column::Number => "number",
            Column::EmailAddress => "address",
            Column::Type => "type",
            Column::Label => "label",
            Column::Company => "company",
            Column::Title => "title",
            Column::Street => "street",
            Column::City => "city",
            Column::Region => "region",
            Column::Postcode => "postcode",
            Column::Country => "country",
            Column::StartDate => "start_date",
            Column::IsSuperPrimary => "is_super_primary",
            Column::Photo => "photo",
            Column::DisplayPhoto => "display_photo",
        }
    }
}

/// Columns read by every contact query, in select order.
pub const PROJECTION: &[Column] = &[
    Column::DataId,
    Column::ContactId,
    Column::DisplayName,
    Column::Mimetype,
    Column::AccountType,
    Column::AccountName,
    Column::StructuredDisplayName,
    Column::GivenName,
    Column::MiddleName,
    Column::FamilyName,
    Column::Prefix,
    Column::Suffix,
    Column::Note,
    Column::Number,
    Column::EmailAddress,
    Column::Type,
    Column::Label,
    Column::Company,
    Column::Title,
    Column::Street,
    Column::City,
    Column::Region,
    Column::Postcode,
    Column::Country,
    Column::StartDate,
];

/// The attribute kind a data row carries, stored in its `mimetype` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeKind {
    Name,
    Note,
    Phone,
    Email,
    Organization,
    Postal,
    Event,
    Photo,
}

impl MimeKind {
    /// Kinds folded into a contact by the aggregator.
    pub const AGGREGATED: [MimeKind; 7] = [
        MimeKind::Note,
        MimeKind::Email,
        MimeKind::Phone,
        MimeKind::Name,
        MimeKind::Organization,
        MimeKind::Postal,
        MimeKind::Event,
    ];

    pub fn mime(self) -> &'static str {
        match self {
            MimeKind::Name => "vnd.android.cursor.item/name",
            MimeKind::Note => "vnd.android.cursor.item/note",
            MimeKind::Phone => "vnd.android.cursor.item/phone_v2",
            MimeKind::Email => "vnd.android.cursor.item/email_v2",
            MimeKind::Organization => "vnd.android.cursor.item/organization",
            MimeKind::Postal => "vnd.android.cursor.item/postal-address_v2",
            MimeKind::Event => "vnd.android.cursor.item/contact_event",
            MimeKind::Photo => "vnd.android.cursor.item/photo",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        [
            MimeKind::Name,
            MimeKind::Note,
            MimeKind::Phone,
            MimeKind::Email,
            MimeKind::Organization,
            MimeKind::Postal,
            MimeKind::Event,
            MimeKind::Photo,
        ]
        .into_iter()
        .find(|k| k.mime() == mime)
    }
}

/// Subtype code shared by every kind for a user-labelled value.
pub const TYPE_CUSTOM: i64 = 0;

pub mod phone {
    pub const HOME: i64 = 1;
    pub const MOBILE: i64 = 2;
    pub const WORK: i64 = 3;
    pub const FAX_WORK: i64 = 4;
    pub const FAX_HOME: i64 = 5;
    pub const PAGER: i64 = 6;
    pub const OTHER: i64 = 7;
    pub const CALLBACK: i64 = 8;
    pub const CAR: i64 = 9;
    pub const COMPANY_MAIN: i64 = 10;
    pub const ISDN: i64 = 11;
    pub const MAIN: i64 = 12;
    pub const OTHER_FAX: i64 = 13;
    pub const RADIO: i64 = 14;
    pub const TELEX: i64 = 15;
    pub const TTY_TDD: i64 = 16;
    pub const WORK_MOBILE: i64 = 17;
    pub const WORK_PAGER: i64 = 18;
    pub const ASSISTANT: i64 = 19;
    pub const MMS: i64 = 20;
}

pub mod email {
    pub const HOME: i64 = 1;
    pub const WORK: i64 = 2;
    pub const OTHER: i64 = 3;
    pub const MOBILE: i64 = 4;
}

pub mod postal {
    pub const HOME: i64 = 1;
    pub const WORK: i64 = 2;
    pub const OTHER: i64 = 3;
}

pub mod event {
    pub const ANNIVERSARY: i64 = 1;
    pub const OTHER: i64 = 2;
    pub const BIRTHDAY: i64 = 3;
}

pub mod organization {
    pub const WORK: i64 = 1;
}
